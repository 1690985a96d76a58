use crate::cursor::EventCursor;
use crate::decoder::choice::ChoiceDecoder;
use crate::decoder::generic::GenericValueDecoder;
use crate::decoder::{Decoder, TargetSet};
use crate::err::DecodeResult;
use crate::event::EventKind;
use crate::name::ElementName;
use crate::value::Value;

use log::trace;

/// One decoded child of a sequence, in document order.
pub type Property = (ElementName, Option<Value>);

/// Walks the children of a container element, dispatching each one by name.
///
/// Children accepted by the registered decoders are decoded by them, all other children by the
/// fallback [`GenericValueDecoder`]. Text directly inside the container is ignored.
#[derive(Debug)]
pub struct SequenceDecoder {
    container: Option<ElementName>,
    registered: ChoiceDecoder<Value>,
    fallback: GenericValueDecoder,
}

impl SequenceDecoder {
    /// `container: None` accepts any container element.
    pub fn new(
        container: Option<ElementName>,
        registered: ChoiceDecoder<Value>,
        fallback: GenericValueDecoder,
    ) -> Self {
        SequenceDecoder {
            container,
            registered,
            fallback,
        }
    }

    /// Decoder for any container, with every child decoded generically.
    pub fn generic(fallback: GenericValueDecoder) -> Self {
        Self::new(None, ChoiceDecoder::new(), fallback)
    }

    fn decode_child(&self, cursor: &mut dyn EventCursor) -> DecodeResult<Property> {
        let name = cursor.element_name()?.clone();

        let value = if self.registered.can_handle(&name) {
            self.registered.decode(cursor)?
        } else {
            self.fallback.decode(cursor)?
        };
        cursor.require(EventKind::EndElement, None, Some(name.local_name()))?;

        Ok((name, value))
    }
}

impl Decoder for SequenceDecoder {
    type Output = Vec<Property>;

    fn decode(&self, cursor: &mut dyn EventCursor) -> DecodeResult<Option<Vec<Property>>> {
        let local_name = self.container.as_ref().map(ElementName::local_name);
        cursor.require(EventKind::StartElement, None, local_name)?;
        let container = cursor.element_name()?.clone();

        let mut properties = Vec::new();
        let mut kind = cursor.advance()?;
        while kind != EventKind::EndElement {
            if kind == EventKind::StartElement {
                properties.push(self.decode_child(cursor)?);
            } else {
                trace!("Offset {}: skipping {} in `{}`", cursor.position(), kind, container);
            }
            kind = cursor.advance()?;
        }

        cursor.require(
            EventKind::EndElement,
            container.namespace(),
            Some(container.local_name()),
        )?;

        if properties.is_empty() {
            Ok(None)
        } else {
            Ok(Some(properties))
        }
    }

    fn can_handle(&self, name: &ElementName) -> bool {
        match &self.container {
            Some(container) => name.matches(None, Some(container.local_name())),
            None => true,
        }
    }

    fn targets(&self) -> TargetSet {
        self.container.iter().cloned().collect()
    }
}

use crate::cursor::EventCursor;
use crate::decoder::choice::ChoiceDecoder;
use crate::decoder::primitives::PrimitivesValueDecoder;
use crate::decoder::{Decoder, TargetSet, ValueDecoder};
use crate::err::DecodeResult;
use crate::event::EventKind;
use crate::name::ElementName;
use crate::value::Value;

use log::{debug, trace};

/// Decodes an element whose content type is only known at decode time.
///
/// Value content goes through [`PrimitivesValueDecoder`]; a nested element is handed to the
/// structured choice (typically a geometry decoder followed by an envelope decoder). In both
/// cases the outer element must close where the content ends.
#[derive(Debug, Default)]
pub struct GenericValueDecoder {
    primitives: PrimitivesValueDecoder,
    structured: ChoiceDecoder<Value>,
}

impl GenericValueDecoder {
    pub fn new(structured: ChoiceDecoder<Value>) -> Self {
        GenericValueDecoder {
            primitives: PrimitivesValueDecoder::new(),
            structured,
        }
    }

    /// Geometry first, envelope second.
    pub fn with_geometry_and_envelope<G, E>(geometry: G, envelope: E) -> Self
    where
        G: Decoder<Output = Value> + Send + Sync + 'static,
        E: Decoder<Output = Value> + Send + Sync + 'static,
    {
        Self::new(
            ChoiceDecoder::new()
                .with_option(geometry)
                .with_option(envelope),
        )
    }

    pub fn structured(&self) -> &ChoiceDecoder<Value> {
        &self.structured
    }
}

impl Decoder for GenericValueDecoder {
    type Output = Value;

    fn decode(&self, cursor: &mut dyn EventCursor) -> DecodeResult<Option<Value>> {
        cursor.require(EventKind::StartElement, None, None)?;
        let outer = cursor.element_name()?.clone();
        trace!("Offset {}: generic decode of `{}`", cursor.position(), outer);

        let mut value = None;
        if cursor.advance()?.is_value() {
            let start = cursor.position();
            value = self.primitives.decode(cursor)?;
            // Re-sync only when the value decoder did not consume its event. Any value event
            // left over is caught by the END_ELEMENT check below.
            if cursor.position() == start && cursor.is_value() {
                cursor.advance()?;
            }
        }

        if cursor.event_kind() == EventKind::StartElement {
            let nested = cursor.element_name()?.clone();
            if value.is_some() {
                debug!(
                    "Offset {}: `{}` mixes a value with nested `{}`, keeping the nested one",
                    cursor.position(),
                    outer,
                    nested
                );
            }

            value = self.structured.decode(cursor)?;
            cursor.require(
                EventKind::EndElement,
                nested.namespace(),
                Some(nested.local_name()),
            )?;
            cursor.advance()?;
        }

        cursor.require(
            EventKind::EndElement,
            outer.namespace(),
            Some(outer.local_name()),
        )?;
        Ok(value)
    }

    fn can_handle(&self, _name: &ElementName) -> bool {
        true
    }

    fn targets(&self) -> TargetSet {
        TargetSet::new()
    }
}

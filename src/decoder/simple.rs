use crate::cursor::{EventCursor, go_to_end};
use crate::decoder::{Decoder, TargetSet, ValueDecoder};
use crate::err::DecodeResult;
use crate::event::EventKind;
use crate::name::ElementName;

use log::trace;

/// Decodes `<name>value-events</name>` with a fixed [`ValueDecoder`].
///
/// Only the local name is checked, both on the way in and on the way out. An element without
/// value events decodes to `None`.
#[derive(Debug, Clone)]
pub struct SimpleDecoder<V> {
    name: ElementName,
    value_decoder: V,
    skip_unexpected_content: bool,
}

impl<V: ValueDecoder> SimpleDecoder<V> {
    pub fn with_value_decoder(name: impl Into<ElementName>, value_decoder: V) -> Self {
        SimpleDecoder {
            name: name.into(),
            value_decoder,
            skip_unexpected_content: false,
        }
    }

    /// Skip whatever is left between the value and the closing tag instead of failing on it.
    pub fn skip_unexpected_content(mut self, skip: bool) -> Self {
        self.skip_unexpected_content = skip;
        self
    }

    pub fn name(&self) -> &ElementName {
        &self.name
    }

    pub fn value_decoder(&self) -> &V {
        &self.value_decoder
    }
}

impl<V: ValueDecoder> Decoder for SimpleDecoder<V> {
    type Output = V::Output;

    fn decode(&self, cursor: &mut dyn EventCursor) -> DecodeResult<Option<V::Output>> {
        let local_name = Some(self.name.local_name());

        cursor.require(EventKind::StartElement, None, local_name)?;
        trace!("Offset {}: decoding `{}`", cursor.position(), self.name);
        cursor.advance()?;

        let value = if cursor.is_value() {
            self.value_decoder.decode(cursor)?
        } else {
            None
        };

        if self.skip_unexpected_content {
            go_to_end(cursor, &self.name)?;
        }

        cursor.require(EventKind::EndElement, None, local_name)?;
        Ok(value)
    }

    fn can_handle(&self, name: &ElementName) -> bool {
        name.matches(None, Some(self.name.local_name()))
    }

    fn targets(&self) -> TargetSet {
        let mut targets = TargetSet::new();
        targets.insert(self.name.clone());
        targets
    }
}

use crate::cursor::EventCursor;
use crate::decoder::simple::SimpleDecoder;
use crate::decoder::{ValueDecoder, ensure_can_handle};
use crate::err::DecodeResult;
use crate::event::EventKind;
use crate::name::ElementName;

use log::trace;

/// Reassembles a string that the stream may have split over several `VALUE_STRING` events.
///
/// Returns `None` when no string event was present and `Some("")` for a single zero-length
/// event. `VALUE_CDATA` is not accepted here.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringValueDecoder;

impl StringValueDecoder {
    pub fn new() -> Self {
        StringValueDecoder
    }
}

impl ValueDecoder for StringValueDecoder {
    type Output = String;

    fn can_handle(&self, kind: EventKind) -> bool {
        kind == EventKind::ValueString
    }

    fn decode(&self, cursor: &mut dyn EventCursor) -> DecodeResult<Option<String>> {
        ensure_can_handle(self, "StringValueDecoder", cursor)?;

        let mut out: Option<String> = None;
        let mut chunks = 0_usize;
        while cursor.event_kind() == EventKind::ValueString {
            out.get_or_insert_with(String::new)
                .push_str(cursor.string_value()?);
            chunks += 1;
            cursor.advance()?;
        }

        trace!(
            "Offset {}: reassembled string from {} chunk(s)",
            cursor.position(),
            chunks
        );
        Ok(out)
    }
}

/// Element decoder for string content.
pub type StringDecoder = SimpleDecoder<StringValueDecoder>;

impl StringDecoder {
    pub fn new(name: impl Into<ElementName>) -> Self {
        SimpleDecoder::with_value_decoder(name, StringValueDecoder)
    }
}

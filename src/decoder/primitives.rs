use crate::cursor::EventCursor;
use crate::decoder::primitive::PrimitiveValueDecoder;
use crate::decoder::primitive_list::decode_packed_array;
use crate::decoder::string::StringValueDecoder;
use crate::decoder::{ValueDecoder, ensure_can_handle};
use crate::err::DecodeResult;
use crate::event::EventKind;
use crate::value::Value;

/// Value-level entry point when the content type is not known in advance.
///
/// Strings go through [`StringValueDecoder`], packed events (value-count > 1) become a
/// [`crate::PrimitiveArray`] of the event's kind, anything else is read as a single scalar.
#[derive(Debug, Clone, Default)]
pub struct PrimitivesValueDecoder {
    strings: StringValueDecoder,
    scalars: PrimitiveValueDecoder<Value>,
}

impl PrimitivesValueDecoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ValueDecoder for PrimitivesValueDecoder {
    type Output = Value;

    fn can_handle(&self, kind: EventKind) -> bool {
        kind.is_value()
    }

    fn decode(&self, cursor: &mut dyn EventCursor) -> DecodeResult<Option<Value>> {
        ensure_can_handle(self, "PrimitivesValueDecoder", cursor)?;

        if cursor.event_kind() == EventKind::ValueString {
            return Ok(self.strings.decode(cursor)?.map(Value::String));
        }

        if cursor.value_count()? > 1 {
            return Ok(decode_packed_array(cursor)?.map(Value::Array));
        }

        self.scalars.decode(cursor)
    }
}

use crate::cursor::EventCursor;
use crate::decoder::simple::SimpleDecoder;
use crate::decoder::{ValueDecoder, ensure_can_handle};
use crate::err::{DecodeError, DecodeResult};
use crate::event::EventKind;
use crate::name::ElementName;
use crate::settings::DecoderSettings;
use crate::value::{Primitive, Value};

use log::trace;
use std::fmt;
use std::marker::PhantomData;

/// Reads the `index`-th scalar of the current value event with the accessor matching its kind.
///
/// `VALUE_STRING` and `VALUE_CDATA` both read as [`Value::String`].
pub fn read_value(cursor: &dyn EventCursor, index: usize) -> DecodeResult<Value> {
    let value = match cursor.event_kind() {
        EventKind::ValueBool => Value::Bool(cursor.bool_value(index)?),
        EventKind::ValueInt => Value::Int(cursor.int_value(index)?),
        EventKind::ValueLong => Value::Long(cursor.long_value(index)?),
        EventKind::ValueFloat => Value::Float(cursor.float_value(index)?),
        EventKind::ValueDouble => Value::Double(cursor.double_value(index)?),
        EventKind::ValueByte => Value::Byte(cursor.byte_value(index)?),
        EventKind::ValueString | EventKind::ValueCdata => {
            Value::String(cursor.string_value()?.to_owned())
        }
        kind @ (EventKind::StartElement | EventKind::EndElement) => {
            return Err(DecodeError::UnsupportedValueKind {
                decoder: "read_value",
                kind,
                position: cursor.position(),
            });
        }
    };

    Ok(value)
}

/// Decodes exactly one scalar value event and converts it to `T`.
///
/// The cursor is moved past that single event only; a value with no conversion to `T`
/// decodes to `None`.
pub struct PrimitiveValueDecoder<T> {
    _target: PhantomData<fn() -> T>,
}

impl<T: Primitive> PrimitiveValueDecoder<T> {
    pub fn new() -> Self {
        PrimitiveValueDecoder {
            _target: PhantomData,
        }
    }
}

impl<T: Primitive> Default for PrimitiveValueDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for PrimitiveValueDecoder<T> {
    fn clone(&self) -> Self {
        PrimitiveValueDecoder {
            _target: PhantomData,
        }
    }
}

impl<T: Primitive> fmt::Debug for PrimitiveValueDecoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrimitiveValueDecoder<{}>", T::TARGET)
    }
}

impl<T: Primitive> ValueDecoder for PrimitiveValueDecoder<T> {
    type Output = T;

    fn can_handle(&self, kind: EventKind) -> bool {
        kind.is_value()
    }

    fn decode(&self, cursor: &mut dyn EventCursor) -> DecodeResult<Option<T>> {
        ensure_can_handle(self, "PrimitiveValueDecoder", cursor)?;

        let raw = read_value(cursor, 0)?;
        trace!(
            "Offset {}: read {:?}, converting to {}",
            cursor.position(),
            raw,
            T::TARGET
        );
        cursor.advance()?;

        Ok(T::from_value(raw))
    }
}

/// Element decoder for a single scalar.
pub type PrimitiveDecoder<T> = SimpleDecoder<PrimitiveValueDecoder<T>>;

impl<T: Primitive> PrimitiveDecoder<T> {
    pub fn new(name: impl Into<ElementName>) -> Self {
        Self::with_settings(name, &DecoderSettings::default())
    }

    pub fn with_settings(name: impl Into<ElementName>, settings: &DecoderSettings) -> Self {
        SimpleDecoder::with_value_decoder(name, PrimitiveValueDecoder::new())
            .skip_unexpected_content(settings.should_skip_unexpected_content())
    }
}

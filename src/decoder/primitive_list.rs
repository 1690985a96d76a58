use crate::cursor::EventCursor;
use crate::decoder::primitive::read_value;
use crate::decoder::simple::SimpleDecoder;
use crate::decoder::{ValueDecoder, ensure_can_handle};
use crate::err::{DecodeError, DecodeResult};
use crate::event::EventKind;
use crate::name::ElementName;
use crate::settings::DecoderSettings;
use crate::value::{ArrayElement, ArrayKind, PrimitiveArray};

use log::trace;
use std::fmt;
use std::marker::PhantomData;

/// Accumulates the items of a primitive array from packed value events and string runs.
#[derive(Debug, Clone)]
pub struct ArrayBuilder<T> {
    values: Vec<T>,
}

impl<T: ArrayElement> Default for ArrayBuilder<T> {
    fn default() -> Self {
        ArrayBuilder { values: Vec::new() }
    }
}

impl<T: ArrayElement> ArrayBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorbs every value packed in the current (non-text) value event.
    pub fn add_new_values(&mut self, cursor: &dyn EventCursor) -> DecodeResult<()> {
        let count = cursor.value_count()?;
        self.values.reserve(count);

        for index in 0..count {
            let raw = read_value(cursor, index)?;
            let value = T::from_value(raw).ok_or_else(|| DecodeError::UnsupportedValueKind {
                decoder: "ArrayBuilder",
                kind: cursor.event_kind(),
                position: cursor.position(),
            })?;
            self.values.push(value);
        }

        Ok(())
    }

    /// Absorbs a string-encoded array, items separated by whitespace and/or commas.
    pub fn add_from_str(&mut self, text: &str, position: u64) -> DecodeResult<()> {
        let tokens = text
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty());

        for token in tokens {
            let value = T::parse_item(token).ok_or_else(|| DecodeError::InvalidArrayItem {
                text: token.to_string(),
                element: T::TARGET,
                position,
            })?;
            self.values.push(value);
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn build(self) -> Vec<T> {
        self.values
    }
}

/// Pending string chunks of an array run, flushed into the builder as one text.
struct TextRun {
    text: String,
    position: u64,
}

impl TextRun {
    fn push(&mut self, chunk: &str, position: u64) {
        if self.text.is_empty() {
            self.position = position;
        }
        self.text.push_str(chunk);
    }

    fn flush_into<T: ArrayElement>(&mut self, builder: &mut ArrayBuilder<T>) -> DecodeResult<()> {
        if !self.text.is_empty() {
            builder.add_from_str(&self.text, self.position)?;
            self.text.clear();
        }
        Ok(())
    }
}

/// Decodes a run of value events into a `Vec<T>`.
///
/// The run may mix packed typed events and string-encoded chunks; pending text is flushed into
/// the array before each typed event and once more at the end of the run. `VALUE_CDATA` is not
/// supported.
pub struct PrimitiveListValueDecoder<T> {
    _element: PhantomData<fn() -> T>,
}

impl<T: ArrayElement> PrimitiveListValueDecoder<T> {
    pub fn new() -> Self {
        PrimitiveListValueDecoder {
            _element: PhantomData,
        }
    }
}

impl<T: ArrayElement> Default for PrimitiveListValueDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for PrimitiveListValueDecoder<T> {
    fn clone(&self) -> Self {
        PrimitiveListValueDecoder {
            _element: PhantomData,
        }
    }
}

impl<T: ArrayElement> fmt::Debug for PrimitiveListValueDecoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrimitiveListValueDecoder<{:?}>", T::KIND)
    }
}

impl<T: ArrayElement> ValueDecoder for PrimitiveListValueDecoder<T> {
    type Output = Vec<T>;

    fn can_handle(&self, kind: EventKind) -> bool {
        kind.is_value() && kind != EventKind::ValueCdata
    }

    fn decode(&self, cursor: &mut dyn EventCursor) -> DecodeResult<Option<Vec<T>>> {
        ensure_can_handle(self, "PrimitiveListValueDecoder", cursor)?;

        let mut builder = ArrayBuilder::<T>::new();
        let mut pending = TextRun {
            text: String::new(),
            position: cursor.position(),
        };

        while cursor.is_value() {
            match cursor.event_kind() {
                EventKind::ValueString => pending.push(cursor.string_value()?, cursor.position()),
                kind @ EventKind::ValueCdata => {
                    return Err(DecodeError::UnsupportedValueKind {
                        decoder: "PrimitiveListValueDecoder",
                        kind,
                        position: cursor.position(),
                    });
                }
                _ => {
                    pending.flush_into(&mut builder)?;
                    builder.add_new_values(cursor)?;
                }
            }
            cursor.advance()?;
        }
        pending.flush_into(&mut builder)?;

        trace!(
            "Offset {}: decoded {:?} array of {} item(s)",
            cursor.position(),
            T::KIND,
            builder.len()
        );
        Ok(Some(builder.build()))
    }
}

fn decode_as<T: ArrayElement>(cursor: &mut dyn EventCursor) -> DecodeResult<Option<PrimitiveArray>> {
    let values = PrimitiveListValueDecoder::<T>::new().decode(cursor)?;
    Ok(values.map(T::into_array))
}

/// Decodes the run starting at the current packed value event into the array type matching
/// that event's kind. Text events have no array form and fail with a configuration error.
pub fn decode_packed_array(cursor: &mut dyn EventCursor) -> DecodeResult<Option<PrimitiveArray>> {
    match ArrayKind::from_event_kind(cursor.event_kind())? {
        ArrayKind::Bool => decode_as::<bool>(cursor),
        ArrayKind::Byte => decode_as::<i8>(cursor),
        ArrayKind::Int => decode_as::<i32>(cursor),
        ArrayKind::Long => decode_as::<i64>(cursor),
        ArrayKind::Float => decode_as::<f32>(cursor),
        ArrayKind::Double => decode_as::<f64>(cursor),
    }
}

/// Element decoder for a primitive array.
pub type PrimitiveListDecoder<T> = SimpleDecoder<PrimitiveListValueDecoder<T>>;

impl<T: ArrayElement> PrimitiveListDecoder<T> {
    pub fn new(name: impl Into<ElementName>) -> Self {
        Self::with_settings(name, &DecoderSettings::default())
    }

    pub fn with_settings(name: impl Into<ElementName>, settings: &DecoderSettings) -> Self {
        SimpleDecoder::with_value_decoder(name, PrimitiveListValueDecoder::new())
            .skip_unexpected_content(settings.should_skip_unexpected_content())
    }
}

use crate::cursor::EventCursor;
use crate::err::{DecodeError, DecodeResult};
use crate::event::{Event, EventKind};
use crate::name::ElementName;

/// In-memory [`EventCursor`] over a buffered list of events.
///
/// The position reported in errors is the index of the current event.
#[derive(Debug, Clone)]
pub struct EventStream {
    events: Vec<Event>,
    pos: usize,
}

macro_rules! scalar_accessor {
    ($fn_name: ident, $variant: ident, $t: ty, $accessor: expr) => {
        fn $fn_name(&self, index: usize) -> DecodeResult<$t> {
            match self.current() {
                Event::$variant(values) => values.get(index).copied().ok_or_else(|| {
                    self.value_access_error($accessor, index)
                }),
                _ => Err(self.value_access_error($accessor, index)),
            }
        }
    };
}

impl EventStream {
    pub fn new(events: Vec<Event>) -> DecodeResult<Self> {
        if events.is_empty() {
            return Err(DecodeError::Configuration {
                message: "an event stream needs at least one event".to_string(),
            });
        }

        Ok(EventStream { events, pos: 0 })
    }

    pub fn builder() -> EventStreamBuilder {
        EventStreamBuilder::default()
    }

    pub fn current(&self) -> &Event {
        &self.events[self.pos]
    }

    pub fn index(&self) -> usize {
        self.pos
    }

    pub fn is_last(&self) -> bool {
        self.pos + 1 == self.events.len()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    fn value_access_error(&self, accessor: &'static str, index: usize) -> DecodeError {
        DecodeError::ValueAccess {
            accessor,
            kind: self.event_kind(),
            index,
            position: self.position(),
        }
    }
}

impl EventCursor for EventStream {
    fn event_kind(&self) -> EventKind {
        self.current().kind()
    }

    fn element_name(&self) -> DecodeResult<&ElementName> {
        self.current()
            .element_name()
            .ok_or_else(|| DecodeError::NoElementName {
                kind: self.event_kind(),
                position: self.position(),
            })
    }

    fn value_count(&self) -> DecodeResult<usize> {
        let kind = self.event_kind();
        if !kind.is_value() {
            return Err(self.value_access_error("value_count", 0));
        }
        Ok(self.current().value_count())
    }

    scalar_accessor!(bool_value, Bool, bool, "bool");
    scalar_accessor!(int_value, Int, i32, "int");
    scalar_accessor!(long_value, Long, i64, "long");
    scalar_accessor!(float_value, Float, f32, "float");
    scalar_accessor!(double_value, Double, f64, "double");
    scalar_accessor!(byte_value, Byte, i8, "byte");

    fn string_value(&self) -> DecodeResult<&str> {
        match self.current() {
            Event::String(s) | Event::Cdata(s) => Ok(s),
            _ => Err(self.value_access_error("string", 0)),
        }
    }

    fn advance(&mut self) -> DecodeResult<EventKind> {
        if self.is_last() {
            return Err(DecodeError::UnexpectedEndOfStream {
                position: self.position(),
            });
        }
        self.pos += 1;
        Ok(self.event_kind())
    }

    fn position(&self) -> u64 {
        self.pos as u64
    }
}

/// Fluent construction of an [`EventStream`].
#[derive(Debug, Clone, Default)]
pub struct EventStreamBuilder {
    events: Vec<Event>,
}

impl EventStreamBuilder {
    pub fn event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    pub fn start(self, name: impl Into<ElementName>) -> Self {
        self.event(Event::StartElement(name.into()))
    }

    pub fn end(self, name: impl Into<ElementName>) -> Self {
        self.event(Event::EndElement(name.into()))
    }

    /// `start(name)`, the given value events, `end(name)`.
    pub fn element(
        mut self,
        name: impl Into<ElementName>,
        values: impl IntoIterator<Item = Event>,
    ) -> Self {
        let name = name.into();
        self.events.push(Event::StartElement(name.clone()));
        self.events.extend(values);
        self.events.push(Event::EndElement(name));
        self
    }

    pub fn bools(self, values: impl Into<Vec<bool>>) -> Self {
        self.event(Event::Bool(values.into()))
    }

    pub fn ints(self, values: impl Into<Vec<i32>>) -> Self {
        self.event(Event::Int(values.into()))
    }

    pub fn longs(self, values: impl Into<Vec<i64>>) -> Self {
        self.event(Event::Long(values.into()))
    }

    pub fn floats(self, values: impl Into<Vec<f32>>) -> Self {
        self.event(Event::Float(values.into()))
    }

    pub fn doubles(self, values: impl Into<Vec<f64>>) -> Self {
        self.event(Event::Double(values.into()))
    }

    pub fn bytes(self, values: impl Into<Vec<i8>>) -> Self {
        self.event(Event::Byte(values.into()))
    }

    pub fn string(self, value: impl Into<String>) -> Self {
        self.event(Event::String(value.into()))
    }

    pub fn cdata(self, value: impl Into<String>) -> Self {
        self.event(Event::Cdata(value.into()))
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    pub fn build(self) -> DecodeResult<EventStream> {
        EventStream::new(self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_accessors_follow_current_event() {
        let mut stream = EventStream::builder()
            .start("a")
            .ints([7, 8])
            .string("x")
            .end("a")
            .build()
            .unwrap();

        assert_eq!(stream.element_name().unwrap(), &ElementName::local("a"));
        assert!(stream.value_count().is_err());

        assert_eq!(stream.advance().unwrap(), EventKind::ValueInt);
        assert_eq!(stream.value_count().unwrap(), 2);
        assert_eq!(stream.int_value(1).unwrap(), 8);
        assert!(matches!(
            stream.int_value(2),
            Err(DecodeError::ValueAccess { index: 2, .. })
        ));
        assert!(stream.long_value(0).is_err());
        assert!(stream.element_name().is_err());

        assert_eq!(stream.advance().unwrap(), EventKind::ValueString);
        assert_eq!(stream.string_value().unwrap(), "x");

        assert_eq!(stream.advance().unwrap(), EventKind::EndElement);
        assert!(matches!(
            stream.advance(),
            Err(DecodeError::UnexpectedEndOfStream { position: 3 })
        ));
    }

    #[test]
    fn test_require() {
        let stream = EventStream::builder()
            .start(ElementName::new("urn:x", "a"))
            .end(ElementName::new("urn:x", "a"))
            .build()
            .unwrap();

        assert!(stream.require(EventKind::StartElement, None, None).is_ok());
        assert!(stream.require(EventKind::StartElement, None, Some("a")).is_ok());
        assert!(
            stream
                .require(EventKind::StartElement, Some("urn:x"), Some("a"))
                .is_ok()
        );

        let err = stream
            .require(EventKind::StartElement, Some("urn:y"), Some("a"))
            .unwrap_err();
        assert!(err.is_structural_mismatch());
        assert_eq!(
            err.to_string(),
            "Offset 0: expected START_ELEMENT for `{urn:y}a`, found `{urn:x}a`"
        );

        let err = stream.require(EventKind::EndElement, None, None).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnexpectedEvent {
                expected: EventKind::EndElement,
                found: EventKind::StartElement,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_stream_is_rejected() {
        assert!(matches!(
            EventStream::new(vec![]),
            Err(DecodeError::Configuration { .. })
        ));
    }
}

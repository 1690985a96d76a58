use crate::name::ElementName;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of the event a cursor is positioned at.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    StartElement,
    EndElement,
    ValueBool,
    ValueInt,
    ValueLong,
    ValueFloat,
    ValueDouble,
    ValueByte,
    ValueString,
    ValueCdata,
}

impl EventKind {
    pub fn is_value(self) -> bool {
        !matches!(self, EventKind::StartElement | EventKind::EndElement)
    }

    /// Value kinds whose payload is text rather than packed scalars.
    pub fn is_text(self) -> bool {
        matches!(self, EventKind::ValueString | EventKind::ValueCdata)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::StartElement => "START_ELEMENT",
            EventKind::EndElement => "END_ELEMENT",
            EventKind::ValueBool => "VALUE_BOOL",
            EventKind::ValueInt => "VALUE_INT",
            EventKind::ValueLong => "VALUE_LONG",
            EventKind::ValueFloat => "VALUE_FLOAT",
            EventKind::ValueDouble => "VALUE_DOUBLE",
            EventKind::ValueByte => "VALUE_BYTE",
            EventKind::ValueString => "VALUE_STRING",
            EventKind::ValueCdata => "VALUE_CDATA",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An owned event, as held by [`crate::EventStream`].
///
/// Scalar value events carry a vector; its length is the event's value-count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    StartElement(ElementName),
    EndElement(ElementName),
    Bool(Vec<bool>),
    Int(Vec<i32>),
    Long(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    Byte(Vec<i8>),
    String(String),
    Cdata(String),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::StartElement(_) => EventKind::StartElement,
            Event::EndElement(_) => EventKind::EndElement,
            Event::Bool(_) => EventKind::ValueBool,
            Event::Int(_) => EventKind::ValueInt,
            Event::Long(_) => EventKind::ValueLong,
            Event::Float(_) => EventKind::ValueFloat,
            Event::Double(_) => EventKind::ValueDouble,
            Event::Byte(_) => EventKind::ValueByte,
            Event::String(_) => EventKind::ValueString,
            Event::Cdata(_) => EventKind::ValueCdata,
        }
    }

    pub fn element_name(&self) -> Option<&ElementName> {
        match self {
            Event::StartElement(name) | Event::EndElement(name) => Some(name),
            _ => None,
        }
    }

    /// Number of scalars packed in a value event, 0 for element events.
    pub fn value_count(&self) -> usize {
        match self {
            Event::StartElement(_) | Event::EndElement(_) => 0,
            Event::Bool(v) => v.len(),
            Event::Int(v) => v.len(),
            Event::Long(v) => v.len(),
            Event::Float(v) => v.len(),
            Event::Double(v) => v.len(),
            Event::Byte(v) => v.len(),
            Event::String(_) | Event::Cdata(_) => 1,
        }
    }
}

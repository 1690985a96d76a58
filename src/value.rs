//! Decoded values and the fixed conversion table between scalar kinds.
//!
//! A decoder produces `Option<Value>` (or `Option<T>` for a [`Primitive`] target), where `None`
//! stands for an empty element or an absent payload. Conversions follow a small closed table:
//! numeric targets accept any numeric scalar (narrowing casts truncate) and parse strings,
//! `Bool` accepts integers and strings, `String` accepts any scalar. Combinations outside the
//! table convert to `None` instead of failing.

use crate::err::{DecodeError, DecodeResult};
use crate::event::EventKind;
use crate::name::ElementName;

use jiff::Timestamp;
use log::debug;
use serde_json::json;
use std::fmt;

/// Target type of a primitive conversion.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TargetType {
    Object,
    String,
    Bool,
    Double,
    Float,
    Byte,
    Int,
    Long,
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetType::Object => "object",
            TargetType::String => "string",
            TargetType::Bool => "bool",
            TargetType::Double => "double",
            TargetType::Float => "float",
            TargetType::Byte => "byte",
            TargetType::Int => "int",
            TargetType::Long => "long",
        };
        f.write_str(name)
    }
}

/// Element kind of a homogeneous primitive array.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ArrayKind {
    Bool,
    Byte,
    Int,
    Long,
    Float,
    Double,
}

impl ArrayKind {
    /// Array kind matching a packed value event. Text events have no array form.
    pub fn from_event_kind(kind: EventKind) -> DecodeResult<ArrayKind> {
        match kind {
            EventKind::ValueBool => Ok(ArrayKind::Bool),
            EventKind::ValueByte => Ok(ArrayKind::Byte),
            EventKind::ValueInt => Ok(ArrayKind::Int),
            EventKind::ValueLong => Ok(ArrayKind::Long),
            EventKind::ValueFloat => Ok(ArrayKind::Float),
            EventKind::ValueDouble => Ok(ArrayKind::Double),
            other => Err(DecodeError::Configuration {
                message: format!("no primitive array type for {} events", other),
            }),
        }
    }
}

/// A homogeneous primitive array.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveArray {
    Bool(Vec<bool>),
    Byte(Vec<i8>),
    Int(Vec<i32>),
    Long(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
}

impl PrimitiveArray {
    pub fn kind(&self) -> ArrayKind {
        match self {
            PrimitiveArray::Bool(_) => ArrayKind::Bool,
            PrimitiveArray::Byte(_) => ArrayKind::Byte,
            PrimitiveArray::Int(_) => ArrayKind::Int,
            PrimitiveArray::Long(_) => ArrayKind::Long,
            PrimitiveArray::Float(_) => ArrayKind::Float,
            PrimitiveArray::Double(_) => ArrayKind::Double,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PrimitiveArray::Bool(v) => v.len(),
            PrimitiveArray::Byte(v) => v.len(),
            PrimitiveArray::Int(v) => v.len(),
            PrimitiveArray::Long(v) => v.len(),
            PrimitiveArray::Float(v) => v.len(),
            PrimitiveArray::Double(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of a pluggable structured decoder (geometry, envelope, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Structured {
    pub name: ElementName,
    pub content: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Byte(i8),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Array(PrimitiveArray),
    Date(Timestamp),
    Structured(Structured),
}

impl Value {
    /// Converts the value to `target` following the conversion table.
    pub fn convert(self, target: TargetType) -> Option<Value> {
        let converted = match target {
            TargetType::Object => Some(self),
            TargetType::String => self.as_text().map(Value::String),
            TargetType::Bool => self.as_bool().map(Value::Bool),
            TargetType::Double => self.as_f64().map(Value::Double),
            TargetType::Float => self.as_f64().map(|v| Value::Float(v as f32)),
            TargetType::Byte => self.as_i64().map(|v| Value::Byte(v as i8)),
            TargetType::Int => self.as_i64().map(|v| Value::Int(v as i32)),
            TargetType::Long => self.as_i64().map(Value::Long),
        };

        if converted.is_none() {
            debug!("no {} conversion defined for the decoded value", target);
        }
        converted
    }

    fn as_text(&self) -> Option<String> {
        match self {
            Value::Bool(v) => Some(v.to_string()),
            Value::Byte(v) => Some(v.to_string()),
            Value::Int(v) => Some(v.to_string()),
            Value::Long(v) => Some(v.to_string()),
            // `{:?}` keeps the fractional part of whole numbers ("1.0", not "1").
            Value::Float(v) => Some(format!("{:?}", v)),
            Value::Double(v) => Some(format!("{:?}", v)),
            Value::String(s) => Some(s.clone()),
            Value::Date(ts) => Some(ts.to_string()),
            Value::Array(_) | Value::Structured(_) => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            Value::Byte(v) => Some(*v != 0),
            Value::Int(v) => Some(*v != 0),
            Value::Long(v) => Some(*v != 0),
            Value::String(s) => Some(s.trim().eq_ignore_ascii_case("true")),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Byte(v) => Some(f64::from(*v)),
            Value::Int(v) => Some(f64::from(*v)),
            Value::Long(v) => Some(*v as f64),
            Value::Float(v) => Some(f64::from(*v)),
            Value::Double(v) => Some(*v),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(v) => Some(i64::from(*v)),
            Value::Int(v) => Some(i64::from(*v)),
            Value::Long(v) => Some(*v),
            Value::Float(v) => Some(*v as i64),
            Value::Double(v) => Some(*v as i64),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Bool(v) => json!(v),
            Value::Byte(v) => json!(v),
            Value::Int(v) => json!(v),
            Value::Long(v) => json!(v),
            Value::Float(v) => json!(v),
            Value::Double(v) => json!(v),
            Value::String(s) => json!(s),
            Value::Array(PrimitiveArray::Bool(v)) => json!(v),
            Value::Array(PrimitiveArray::Byte(v)) => json!(v),
            Value::Array(PrimitiveArray::Int(v)) => json!(v),
            Value::Array(PrimitiveArray::Long(v)) => json!(v),
            Value::Array(PrimitiveArray::Float(v)) => json!(v),
            Value::Array(PrimitiveArray::Double(v)) => json!(v),
            Value::Date(ts) => json!(ts.to_string()),
            Value::Structured(s) => s.content.clone(),
        }
    }
}

/// A type a primitive value decoder can produce.
pub trait Primitive: Sized {
    const TARGET: TargetType;

    fn from_value(value: Value) -> Option<Self>;
}

impl Primitive for Value {
    const TARGET: TargetType = TargetType::Object;

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl Primitive for String {
    const TARGET: TargetType = TargetType::String;

    fn from_value(value: Value) -> Option<Self> {
        match value.convert(TargetType::String)? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Element type of a [`PrimitiveArray`].
pub trait ArrayElement: Primitive + Copy + Send + Sync + 'static {
    const KIND: ArrayKind;

    /// Parses one token of a string-encoded array.
    fn parse_item(token: &str) -> Option<Self>;

    fn into_array(values: Vec<Self>) -> PrimitiveArray;
}

macro_rules! primitive {
    ($t: ty, $target: ident, $kind: ident) => {
        impl Primitive for $t {
            const TARGET: TargetType = TargetType::$target;

            fn from_value(value: Value) -> Option<Self> {
                match value.convert(TargetType::$target)? {
                    Value::$target(v) => Some(v),
                    _ => None,
                }
            }
        }

        impl ArrayElement for $t {
            const KIND: ArrayKind = ArrayKind::$kind;

            fn parse_item(token: &str) -> Option<Self> {
                token.parse().ok()
            }

            fn into_array(values: Vec<Self>) -> PrimitiveArray {
                PrimitiveArray::$kind(values)
            }
        }
    };
}

primitive!(i8, Byte, Byte);
primitive!(i32, Int, Int);
primitive!(i64, Long, Long);
primitive!(f32, Float, Float);
primitive!(f64, Double, Double);

impl Primitive for bool {
    const TARGET: TargetType = TargetType::Bool;

    fn from_value(value: Value) -> Option<Self> {
        match value.convert(TargetType::Bool)? {
            Value::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl ArrayElement for bool {
    const KIND: ArrayKind = ArrayKind::Bool;

    fn parse_item(token: &str) -> Option<Self> {
        match token {
            "1" => Some(true),
            "0" => Some(false),
            _ if token.eq_ignore_ascii_case("true") => Some(true),
            _ if token.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    fn into_array(values: Vec<Self>) -> PrimitiveArray {
        PrimitiveArray::Bool(values)
    }
}

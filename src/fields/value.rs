//! Field values and descriptors

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of a scene field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Integer,
    Boolean,
    Float,
    Enum,
    Text,
}

impl FieldKind {
    /// Whether a control can drive this kind of field
    pub fn is_numeric(&self) -> bool {
        !matches!(self, FieldKind::Text)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::Float => "float",
            FieldKind::Enum => "enum",
            FieldKind::Text => "text",
        };
        f.write_str(name)
    }
}

/// Value stored in a scene field
///
/// Serialized untagged, so scene files read naturally:
/// `true`, `3`, `0.5`, `{ index: 1, variants: [Low, High] }`, `"label"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Enum { index: usize, variants: Vec<String> },
    Text(String),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Boolean(_) => FieldKind::Boolean,
            FieldValue::Integer(_) => FieldKind::Integer,
            FieldValue::Float(_) => FieldKind::Float,
            FieldValue::Enum { .. } => FieldKind::Enum,
            FieldValue::Text(_) => FieldKind::Text,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(x) => write!(f, "{:.3}", x),
            FieldValue::Enum { index, variants } => match variants.get(*index) {
                Some(name) => write!(f, "{} ({})", name, index),
                None => write!(f, "#{}", index),
            },
            FieldValue::Text(s) => write!(f, "{:?}", s),
        }
    }
}

/// A field a binding can target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub path: String,
    pub kind: FieldKind,
}

/// Errors raised by a field store
#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("unknown object '{0}'")]
    UnknownObject(String),

    #[error("object '{object}' has no field '{path}'")]
    UnknownField { object: String, path: String },

    #[error("field '{path}' is {expected}, cannot write {found}")]
    TypeMismatch {
        path: String,
        expected: FieldKind,
        found: FieldKind,
    },

    #[error("enum field '{path}' has {count} variants, index {index} is out of range")]
    EnumOutOfRange {
        path: String,
        index: usize,
        count: usize,
    },

    #[error("enum field '{path}' cannot take negative index {value}")]
    NegativeEnumIndex { path: String, value: i64 },
}

//! Typed preference values.

use std::fmt;

/// The value of a preference entry.
///
/// A closed set of kinds; anything the registry cannot express as one of them
/// is reported as [`Unsupported`](Self::Unsupported) and skipped by the
/// bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum PreferenceValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// A value of a kind that cannot be mirrored, tagged with its type name.
    Unsupported { type_name: String },
}

impl PreferenceValue {
    pub fn unsupported(type_name: impl Into<String>) -> Self {
        Self::Unsupported {
            type_name: type_name.into(),
        }
    }

    /// Short name of the value's kind.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Unsupported { type_name } => type_name,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported { .. })
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns this value as a float. Also converts integers to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for PreferenceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(v) => f.write_str(v),
            Self::Unsupported { type_name } => write!(f, "<{type_name}>"),
        }
    }
}

impl From<bool> for PreferenceValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for PreferenceValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for PreferenceValue {
    fn from(v: i32) -> Self {
        Self::Integer(v as i64)
    }
}

impl From<f64> for PreferenceValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for PreferenceValue {
    fn from(v: f32) -> Self {
        Self::Float(v as f64)
    }
}

impl From<String> for PreferenceValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for PreferenceValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

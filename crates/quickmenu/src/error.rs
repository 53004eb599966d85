//! Error types for menu operations.
//!
//! Routine pre-materialization states (host not ready, element not yet
//! generated) are never errors; they turn the operation into a no-op.

use crate::element::ElementId;

/// Result type alias for menu operations.
pub type Result<T> = std::result::Result<T, MenuError>;

/// Errors that can occur while building or driving a menu.
#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    /// A selection index outside the option set.
    #[error("Selection index {index} out of range for {len} options")]
    SelectionOutOfRange { index: usize, len: usize },

    /// The preference registry rejected a write.
    #[error("Preference '{entry}' rejected the value: {message}")]
    Preference { entry: String, message: String },

    /// A preference entry whose value kind cannot be mirrored into a control.
    #[error("Preference '{entry}' has unsupported type '{type_name}'")]
    UnsupportedPreference { entry: String, type_name: String },

    /// Host input addressed to an element that does not exist (or no longer does).
    #[error("Unknown element '{0}'")]
    UnknownElement(ElementId),

    /// Host input whose kind does not match the addressed control.
    #[error("Element '{element}' does not accept {input} input")]
    InputKindMismatch {
        element: ElementId,
        input: &'static str,
    },

    /// Configuration could not be parsed.
    #[error("Invalid menu configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl MenuError {
    /// Create a preference write error.
    pub fn preference(entry: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Preference {
            entry: entry.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported-preference error.
    pub fn unsupported_preference(entry: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::UnsupportedPreference {
            entry: entry.into(),
            type_name: type_name.into(),
        }
    }
}

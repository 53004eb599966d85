//! The preference registry boundary.

use std::sync::Arc;

use crate::error::Result;
use crate::prefs::PreferenceValue;

/// An enumerable source of named, typed, mutable settings.
pub trait PreferenceRegistry: Send + Sync {
    /// The registry's categories, in the registry's own order.
    fn categories(&self) -> Vec<Arc<dyn PreferenceCategory>>;
}

/// A named group of preference entries.
pub trait PreferenceCategory: Send + Sync {
    /// Stable identifier, used to look up the mirrored page.
    fn identifier(&self) -> &str;

    fn display_name(&self) -> &str;

    fn entries(&self) -> Vec<Arc<dyn PreferenceEntry>>;
}

/// One setting.
pub trait PreferenceEntry: Send + Sync {
    fn identifier(&self) -> &str;

    fn display_name(&self) -> &str;

    fn description(&self) -> &str;

    /// Current value.
    fn value(&self) -> PreferenceValue;

    /// Replace the value. The registry may coerce or reject it.
    fn set_value(&self, value: PreferenceValue) -> Result<()>;

    /// Text form offered for keyboard editing, if the entry has one.
    ///
    /// By default only string entries are editable as text.
    fn string_form(&self) -> Option<String> {
        match self.value() {
            PreferenceValue::String(s) => Some(s),
            _ => None,
        }
    }
}

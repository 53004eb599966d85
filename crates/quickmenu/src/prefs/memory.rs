//! An in-memory [`PreferenceRegistry`].
//!
//! Writes are coerced to the kind of the entry's current value; string
//! writes (as produced by keyboard editing) are parsed.

use std::sync::Arc;

use parking_lot::RwLock;
use quickmenu_core::Callback;
use quickmenu_core::logging::targets;

use crate::error::{MenuError, Result};
use crate::prefs::{PreferenceCategory, PreferenceEntry, PreferenceRegistry, PreferenceValue};

/// Registry backed by process memory.
#[derive(Default)]
pub struct MemoryRegistry {
    categories: RwLock<Vec<Arc<MemoryCategory>>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category, or return the existing one with that identifier.
    pub fn add_category(&self, identifier: &str, display_name: &str) -> Arc<MemoryCategory> {
        let mut categories = self.categories.write();
        if let Some(existing) = categories.iter().find(|c| c.identifier == identifier) {
            return existing.clone();
        }
        let category = Arc::new(MemoryCategory {
            identifier: identifier.to_string(),
            display_name: display_name.to_string(),
            entries: RwLock::new(Vec::new()),
        });
        categories.push(category.clone());
        category
    }

    pub fn category(&self, identifier: &str) -> Option<Arc<MemoryCategory>> {
        self.categories
            .read()
            .iter()
            .find(|c| c.identifier == identifier)
            .cloned()
    }
}

impl PreferenceRegistry for MemoryRegistry {
    fn categories(&self) -> Vec<Arc<dyn PreferenceCategory>> {
        self.categories
            .read()
            .iter()
            .map(|c| c.clone() as Arc<dyn PreferenceCategory>)
            .collect()
    }
}

/// A category of a [`MemoryRegistry`].
pub struct MemoryCategory {
    identifier: String,
    display_name: String,
    entries: RwLock<Vec<Arc<MemoryEntry>>>,
}

impl MemoryCategory {
    pub fn add_entry(
        &self,
        identifier: &str,
        display_name: &str,
        description: &str,
        value: impl Into<PreferenceValue>,
    ) -> Arc<MemoryEntry> {
        let entry = Arc::new(MemoryEntry {
            identifier: identifier.to_string(),
            display_name: display_name.to_string(),
            description: description.to_string(),
            value: RwLock::new(value.into()),
            string_form: RwLock::new(None),
            on_changed: Callback::new(),
        });
        self.entries.write().push(entry.clone());
        entry
    }

    pub fn entry(&self, identifier: &str) -> Option<Arc<MemoryEntry>> {
        self.entries
            .read()
            .iter()
            .find(|e| e.identifier == identifier)
            .cloned()
    }
}

impl PreferenceCategory for MemoryCategory {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn entries(&self) -> Vec<Arc<dyn PreferenceEntry>> {
        self.entries
            .read()
            .iter()
            .map(|e| e.clone() as Arc<dyn PreferenceEntry>)
            .collect()
    }
}

/// An entry of a [`MemoryCategory`].
pub struct MemoryEntry {
    identifier: String,
    display_name: String,
    description: String,
    value: RwLock<PreferenceValue>,
    string_form: RwLock<Option<String>>,
    on_changed: Callback<PreferenceValue>,
}

impl MemoryEntry {
    /// Offer `text` for keyboard editing regardless of the value kind.
    ///
    /// A later string write replaces the offered text.
    pub fn set_string_form(&self, text: Option<String>) {
        *self.string_form.write() = text;
    }

    /// Set the callback run after every accepted write.
    pub fn on_changed<F>(&self, f: F)
    where
        F: Fn(&PreferenceValue) + Send + Sync + 'static,
    {
        self.on_changed.set(f);
    }

    fn coerce(&self, current: &PreferenceValue, value: PreferenceValue) -> Result<PreferenceValue> {
        use PreferenceValue as V;

        let reject = |expected: &str| {
            MenuError::preference(&self.identifier, format!("expected {expected}, got '{value}'"))
        };

        match (current, &value) {
            (V::Unsupported { type_name }, _) => Err(MenuError::unsupported_preference(
                &self.identifier,
                type_name.as_str(),
            )),
            (_, V::Unsupported { type_name }) => Err(MenuError::unsupported_preference(
                &self.identifier,
                type_name.as_str(),
            )),
            (V::Bool(_), V::Bool(_))
            | (V::Integer(_), V::Integer(_))
            | (V::Float(_), V::Float(_))
            | (V::String(_), V::String(_)) => Ok(value),
            (V::Float(_), V::Integer(v)) => Ok(V::Float(*v as f64)),
            (V::String(_), other) => Ok(V::String(other.to_string())),
            (V::Bool(_), V::String(text)) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "1" => Ok(V::Bool(true)),
                "false" | "off" | "0" => Ok(V::Bool(false)),
                _ => Err(reject("a boolean")),
            },
            (V::Integer(_), V::String(text)) => {
                text.trim().parse().map(V::Integer).map_err(|_| reject("an integer"))
            }
            (V::Float(_), V::String(text)) => {
                text.trim().parse().map(V::Float).map_err(|_| reject("a number"))
            }
            (V::Bool(_), _) => Err(reject("a boolean")),
            (V::Integer(_), _) => Err(reject("an integer")),
            (V::Float(_), _) => Err(reject("a number")),
        }
    }
}

impl PreferenceEntry for MemoryEntry {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn value(&self) -> PreferenceValue {
        self.value.read().clone()
    }

    fn set_value(&self, value: PreferenceValue) -> Result<()> {
        let text = value.as_str().map(str::to_string);
        let accepted = {
            let mut current = self.value.write();
            let accepted = self.coerce(&current, value)?;
            *current = accepted.clone();
            accepted
        };

        if let Some(text) = text {
            let mut string_form = self.string_form.write();
            if string_form.is_some() {
                *string_form = Some(text);
            }
        }

        tracing::debug!(target: targets::PREFS, entry = %self.identifier, value = %accepted, "preference written");
        self.on_changed.invoke(&accepted);
        Ok(())
    }

    fn string_form(&self) -> Option<String> {
        if let Some(text) = self.string_form.read().clone() {
            return Some(text);
        }
        match self.value() {
            PreferenceValue::String(s) => Some(s),
            _ => None,
        }
    }
}

static_assertions::assert_impl_all!(MemoryRegistry: Send, Sync);

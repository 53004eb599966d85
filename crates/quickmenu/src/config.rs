//! Menu configuration.
//!
//! Every field has a default, so an empty document is a valid configuration:
//!
//! ```
//! use quickmenu::MenuConfig;
//!
//! let config = MenuConfig::from_toml_str(
//!     r#"
//!     element_prefix = "ext"
//!
//!     [prefs]
//!     show_tab = true
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.element_prefix, "ext");
//! assert!(config.prefs.show_tab);
//! assert_eq!(config.prefs.mod_name, "Preferences");
//! ```

use serde::Deserialize;

use crate::error::Result;

/// Top-level configuration for a [`Menu`](crate::Menu).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Prefix of every generated element ID.
    pub element_prefix: String,
    /// Chrome and labels of the preference bridge.
    pub prefs: PrefsConfig,
    /// The menu's own settings page.
    pub settings: SettingsConfig,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            element_prefix: "qm".to_string(),
            prefs: PrefsConfig::default(),
            settings: SettingsConfig::default(),
        }
    }
}

impl MenuConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// Configuration of the preference bridge's root page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PrefsConfig {
    /// Extension namespace of the bridge's root page.
    pub mod_name: String,
    /// Icon of the root page's tab.
    pub tab_icon: Option<String>,
    pub menu_title: String,
    pub menu_subtitle: String,
    /// Header of the row listing one opener button per preference category.
    pub category_name: String,
    /// Header of the row inside each mirrored category page.
    pub page_category_name: String,
    /// Icon of the category opener buttons.
    pub open_icon: String,
    /// Icon of the "Edit ..." buttons.
    pub edit_icon: String,
    /// Whether the bridge's tab is visible initially.
    pub show_tab: bool,
}

impl Default for PrefsConfig {
    fn default() -> Self {
        Self {
            mod_name: "Preferences".to_string(),
            tab_icon: Some("Settings".to_string()),
            menu_title: "Preferences".to_string(),
            menu_subtitle: "Control your preferences from other extensions".to_string(),
            category_name: "Categories".to_string(),
            page_category_name: "Preferences".to_string(),
            open_icon: "Star".to_string(),
            edit_icon: "Pencil".to_string(),
            show_tab: false,
        }
    }
}

/// Configuration of the menu's own settings page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// Suffix of the settings page's element ID (after the element prefix).
    pub element_id: String,
    pub category_name: String,
    pub show_tab_label: String,
    pub show_tab_tooltip: String,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            element_id: "SettingsPage".to_string(),
            category_name: "Main".to_string(),
            show_tab_label: "Show Prefs Tab".to_string(),
            show_tab_tooltip: "Displays the preferences tab".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MenuError;

    #[test]
    fn test_empty_document_is_default() {
        let config = MenuConfig::from_toml_str("").unwrap();
        assert_eq!(config, MenuConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = MenuConfig::from_toml_str(
            r#"
            [prefs]
            mod_name = "Settings"
            tab_icon = "Gear"

            [settings]
            category_name = "General"
            "#,
        )
        .unwrap();

        assert_eq!(config.element_prefix, "qm");
        assert_eq!(config.prefs.mod_name, "Settings");
        assert_eq!(config.prefs.tab_icon.as_deref(), Some("Gear"));
        assert_eq!(config.prefs.edit_icon, "Pencil");
        assert_eq!(config.settings.category_name, "General");
        assert_eq!(config.settings.element_id, "SettingsPage");
    }

    #[test]
    fn test_invalid_document() {
        let err = MenuConfig::from_toml_str("element_prefix = 3").unwrap_err();
        assert!(matches!(err, MenuError::Config(_)));
    }
}

//! Mirroring a preference registry into pages and writing edits back.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use quickmenu_core::logging::targets;

use crate::category::Category;
use crate::control::Toggle;
use crate::error::{MenuError, Result};
use crate::menu::Menu;
use crate::page::Page;
use crate::prefs::{PreferenceEntry, PreferenceRegistry, PreferenceValue};

/// Mirrors a [`PreferenceRegistry`] into a tree of pages.
///
/// The bridge's root page holds one opener button per registry category,
/// sorted by display name. Each category page lists a toggle per boolean
/// entry and an "Edit ..." button per entry with a text form. Control edits
/// are written back to the registry.
pub struct PreferenceBridge {
    menu: Menu,
    registry: Arc<dyn PreferenceRegistry>,
    root: Mutex<Option<Arc<Page>>>,
    pages: RwLock<HashMap<String, Arc<Page>>>,
    settings_toggle: Mutex<Option<Arc<Toggle>>>,
}

impl PreferenceBridge {
    pub fn new(menu: Menu, registry: Arc<dyn PreferenceRegistry>) -> Self {
        Self {
            menu,
            registry,
            root: Mutex::new(None),
            pages: RwLock::new(HashMap::new()),
            settings_toggle: Mutex::new(None),
        }
    }

    /// Build the mirrored tree. Later calls return the existing root page.
    pub fn build(&self) -> Arc<Page> {
        let mut root = self.root.lock();
        if let Some(page) = root.as_ref() {
            return page.clone();
        }

        let config = &self.menu.config().prefs;
        let page = self
            .menu
            .get_or_create_root_page(&config.mod_name, config.tab_icon.as_deref());
        page.set_menu_title(config.menu_title.as_str());
        page.set_menu_subtitle(config.menu_subtitle.as_str());
        page.set_hide_tab(!config.show_tab);

        let mirrored = self.populate(&page);
        tracing::info!(target: targets::PREFS, categories = mirrored, "preference bridge built");

        *root = Some(page.clone());
        page
    }

    /// Mirror the registry again into the existing root page.
    ///
    /// The category index is rebuilt from scratch. Pages generated by earlier
    /// runs stay in the host, since elements are never removed.
    pub fn regenerate(&self) -> Arc<Page> {
        let existing = self.root.lock().clone();
        let Some(page) = existing else {
            return self.build();
        };

        let orphaned = self.pages.read().len();
        if orphaned > 0 {
            tracing::warn!(
                target: targets::PREFS,
                orphaned,
                "regenerating preference pages, previous host pages are left in place"
            );
        }

        let mirrored = self.populate(&page);
        tracing::debug!(target: targets::PREFS, categories = mirrored, "preference bridge regenerated");
        page
    }

    /// The bridge's root page, once built.
    pub fn root_page(&self) -> Option<Arc<Page>> {
        self.root.lock().clone()
    }

    /// The page mirroring the registry category `identifier`.
    pub fn page_for(&self, identifier: &str) -> Option<Arc<Page>> {
        self.pages.read().get(identifier).cloned()
    }

    /// Number of mirrored category pages in the current index.
    pub fn page_count(&self) -> usize {
        self.pages.read().len()
    }

    /// Install the menu's settings page, a protected page with a toggle that
    /// shows or hides the bridge's tab and stores the choice in `show_tab`.
    ///
    /// `show_tab` must hold a boolean. Later calls return the existing toggle.
    pub fn install_settings_page(&self, show_tab: Arc<dyn PreferenceEntry>) -> Result<Arc<Toggle>> {
        let mut installed = self.settings_toggle.lock();
        if let Some(toggle) = installed.as_ref() {
            return Ok(toggle.clone());
        }

        let value = show_tab.value();
        let Some(visible) = value.as_bool() else {
            return Err(MenuError::unsupported_preference(
                show_tab.identifier(),
                value.type_name(),
            ));
        };

        let config = &self.menu.config().settings;
        let page = self.menu.protected_page(&config.element_id);
        let category = page.add_category_with_header(config.category_name.as_str(), false);
        let toggle = category.add_toggle(
            config.show_tab_label.as_str(),
            config.show_tab_tooltip.as_str(),
            visible,
        );

        let root = self.build();
        root.set_hide_tab(!visible);

        let target = Arc::downgrade(&root);
        toggle.on_value_updated(move |visible| {
            if let Err(err) = show_tab.set_value(PreferenceValue::Bool(visible)) {
                tracing::warn!(target: targets::PREFS, error = %err, "could not store tab visibility");
            }
            if let Some(root) = target.upgrade() {
                root.set_hide_tab(!visible);
            }
        });

        *installed = Some(toggle.clone());
        Ok(toggle)
    }

    /// Add a category row of opener buttons to `page` and rebuild the index.
    fn populate(&self, page: &Page) -> usize {
        let config = &self.menu.config().prefs;
        let openers = page.add_category(config.category_name.as_str());

        let mut categories = self.registry.categories();
        categories.sort_by(|a, b| a.display_name().cmp(b.display_name()));

        let mut pages = self.pages.write();
        pages.clear();

        for category in &categories {
            let name = category.display_name();
            let sub_page = openers.add_page(
                name,
                Some(config.open_icon.as_str()),
                format!("Opens the preferences category for {name}"),
                &config.mod_name,
            );
            let row = sub_page.add_category(config.page_category_name.as_str());

            for entry in category.entries() {
                self.mirror_entry(&row, entry);
            }

            if pages
                .insert(category.identifier().to_string(), sub_page)
                .is_some()
            {
                tracing::warn!(
                    target: targets::PREFS,
                    category = category.identifier(),
                    "duplicate category identifier, keeping the last page"
                );
            }
        }

        categories.len()
    }

    fn mirror_entry(&self, row: &Category, entry: Arc<dyn PreferenceEntry>) {
        match entry.value() {
            PreferenceValue::Bool(state) => {
                let toggle = row.add_toggle(entry.display_name(), entry.description(), state);
                let target = entry.clone();
                toggle.on_value_updated(move |state| write_back(target.as_ref(), PreferenceValue::Bool(state)));
            }
            PreferenceValue::Unsupported { type_name } => {
                let err = MenuError::unsupported_preference(entry.identifier(), type_name);
                tracing::warn!(target: targets::PREFS, error = %err, "skipping preference");
                return;
            }
            PreferenceValue::String(_) | PreferenceValue::Integer(_) | PreferenceValue::Float(_) => {}
        }

        if entry.string_form().is_none() {
            tracing::trace!(target: targets::PREFS, entry = entry.identifier(), "no control for preference");
            return;
        }

        let button = row.add_button(
            format!("Edit {}", entry.display_name()),
            Some(self.menu.config().prefs.edit_icon.as_str()),
            entry.description(),
        );
        let runtime = self.menu.runtime().clone();
        button.on_press(move || {
            let initial = entry.string_form().unwrap_or_default();
            let target = entry.clone();
            runtime.open_keyboard(
                initial,
                Box::new(move |text| write_back(target.as_ref(), PreferenceValue::String(text))),
            );
        });
    }
}

static_assertions::assert_impl_all!(PreferenceBridge: Send, Sync);

fn write_back(entry: &dyn PreferenceEntry, value: PreferenceValue) {
    if let Err(err) = entry.set_value(value) {
        tracing::warn!(target: targets::PREFS, entry = entry.identifier(), error = %err, "preference write rejected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::UiElement;
    use crate::host::{HostEvent, RecordingHost};
    use crate::prefs::MemoryRegistry;

    fn bridge() -> (Arc<RecordingHost>, Arc<MemoryRegistry>, PreferenceBridge) {
        let host = Arc::new(RecordingHost::new());
        let menu = Menu::new(host.clone());
        let registry = Arc::new(MemoryRegistry::new());
        let bridge = PreferenceBridge::new(menu, registry.clone());
        (host, registry, bridge)
    }

    #[test]
    fn test_build_is_idempotent() {
        let (_, registry, bridge) = bridge();
        registry.add_category("general", "General");

        let first = bridge.build();
        let second = bridge.build();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.children().len(), 1);
        assert_eq!(first.menu_title(), "Preferences");
        assert!(first.hide_tab());
    }

    #[test]
    fn test_categories_sorted_and_indexed() {
        let (_, registry, bridge) = bridge();
        registry.add_category("zeta", "Zeta");
        registry.add_category("alpha", "Alpha");

        let root = bridge.build();
        let openers = root.children()[0].children();
        let names: Vec<_> = openers.iter().map(|c| c.display_name()).collect();

        assert_eq!(names, vec!["Alpha", "Open Alpha", "Zeta", "Open Zeta"]);
        assert_eq!(bridge.page_for("zeta").map(|p| p.page_name().to_string()).as_deref(), Some("Zeta"));
        assert!(bridge.page_for("missing").is_none());
    }

    #[test]
    fn test_unsupported_and_numeric_entries_skipped() {
        let (_, registry, bridge) = bridge();
        let general = registry.add_category("general", "General");
        general.add_entry("color", "Color", "", PreferenceValue::unsupported("Color"));
        general.add_entry("volume", "Volume", "", 0.5);
        general.add_entry("enabled", "Enabled", "", false);

        bridge.build();
        let page = bridge.page_for("general").unwrap();
        let row = page.children()[0].children();
        let names: Vec<_> = row.iter().map(|c| c.display_name()).collect();
        assert_eq!(names, vec!["Enabled"]);
    }

    #[test]
    fn test_regenerate_rebuilds_index() {
        let (host, registry, bridge) = bridge();
        registry.add_category("general", "General");
        bridge.build();
        bridge.menu.host_ready();
        let before = bridge.page_for("general").unwrap();
        host.clear();

        registry.add_category("audio", "Audio");
        let root = bridge.regenerate();

        assert_eq!(bridge.page_count(), 2);
        assert!(!Arc::ptr_eq(&before, &bridge.page_for("general").unwrap()));
        assert_eq!(root.children().len(), 2);
        assert!(host.events().iter().all(|e| e.is_structural()));
    }

    #[test]
    fn test_settings_page_toggles_tab() {
        let (host, registry, bridge) = bridge();
        let own = registry.add_category("quickmenu", "QuickMenu");
        let show_tab = own.add_entry("show_tab", "Show Prefs Tab", "", false);

        let toggle = bridge.install_settings_page(show_tab.clone()).unwrap();
        bridge.menu.host_ready();
        host.clear();

        toggle.apply_host_change(true);

        assert_eq!(show_tab.value(), PreferenceValue::Bool(true));
        let root = bridge.root_page().unwrap();
        assert!(!root.hide_tab());
        assert_eq!(
            host.events(),
            vec![HostEvent::SetTabHidden {
                page_id: root.element_id().clone(),
                hidden: false,
            }]
        );
        assert!(Arc::ptr_eq(&toggle, &bridge.install_settings_page(show_tab).unwrap()));
    }

    #[test]
    fn test_settings_page_requires_bool() {
        let (_, registry, bridge) = bridge();
        let own = registry.add_category("quickmenu", "QuickMenu");
        let entry = own.add_entry("show_tab", "Show Prefs Tab", "", "yes");

        let err = bridge.install_settings_page(entry).unwrap_err();
        assert!(matches!(err, MenuError::UnsupportedPreference { .. }));
    }
}

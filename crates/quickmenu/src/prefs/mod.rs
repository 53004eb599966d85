//! Preference registry mirroring.
//!
//! A [`PreferenceRegistry`] is an external, enumerable collection of typed
//! settings. The [`PreferenceBridge`] generates a page tree from it and writes
//! control edits back:
//!
//! ```
//! use std::sync::Arc;
//! use quickmenu::host::RecordingHost;
//! use quickmenu::prefs::{MemoryRegistry, PreferenceBridge};
//! use quickmenu::Menu;
//!
//! let registry = Arc::new(MemoryRegistry::new());
//! let general = registry.add_category("general", "General");
//! general.add_entry("enabled", "Enabled", "Turns the feature on", true);
//!
//! let menu = Menu::new(Arc::new(RecordingHost::new()));
//! let bridge = PreferenceBridge::new(menu, registry);
//! bridge.build();
//!
//! assert!(bridge.page_for("general").is_some());
//! ```

mod bridge;
mod memory;
mod registry;
mod value;

pub use bridge::PreferenceBridge;
pub use memory::{MemoryCategory, MemoryEntry, MemoryRegistry};
pub use registry::{PreferenceCategory, PreferenceEntry, PreferenceRegistry};
pub use value::PreferenceValue;

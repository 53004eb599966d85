//! QuickMenu - declarative menus for an external rendering host.
//!
//! Extensions build pages, category rows and controls; the tree is
//! materialized into the host once the host reports readiness, and later
//! property changes are pushed to it from any thread through the dispatch
//! queue.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use quickmenu::prelude::*;
//!
//! let host = Arc::new(RecordingHost::new());
//! let menu = Menu::new(host.clone());
//!
//! let page = menu.get_or_create_root_page("MyMod", Some("Star"));
//! let general = page.add_category("General");
//! let enabled = general.add_toggle("Enabled", "Turns the feature on", false);
//! enabled.on_value_updated(|state| println!("enabled: {state}"));
//!
//! menu.host_ready();
//! menu.handle_input(HostInput::ToggleChanged {
//!     element_id: enabled.element_id().clone(),
//!     state: true,
//! })?;
//! menu.drain_pending();
//!
//! assert!(enabled.is_toggled());
//! # Ok::<(), quickmenu::MenuError>(())
//! ```

pub use quickmenu_core::*;

pub mod category;
pub mod config;
pub mod control;
pub mod element;
pub mod error;
pub mod host;
pub mod logging;
pub mod menu;
pub mod page;
pub mod prefs;
pub mod prelude;

pub use category::Category;
pub use config::{MenuConfig, PrefsConfig, SettingsConfig};
pub use control::{Button, MultiSelect, Slider, Toggle};
pub use element::{ElementId, ElementKind, UiElement};
pub use error::{MenuError, Result};
pub use host::{HostEvent, HostInput, RecordingHost, RenderingHost};
pub use menu::{Menu, MenuBuilder, flush_forest};
pub use page::Page;

//! Prelude module for QuickMenu.
//!
//! ```ignore
//! use quickmenu::prelude::*;
//! ```

// ============================================================================
// Menu and tree
// ============================================================================

pub use crate::{Category, Menu, MenuBuilder, MenuConfig, Page};
pub use crate::element::{ElementId, ElementKind, UiElement};

// ============================================================================
// Controls
// ============================================================================

pub use crate::control::{Button, MultiSelect, Slider, Toggle};

// ============================================================================
// Host boundary
// ============================================================================

pub use crate::host::{HostEvent, HostInput, RecordingHost, RenderingHost};
pub use quickmenu_core::{DispatchQueue, DrainReport, ThreadAffinity};

// ============================================================================
// Preferences
// ============================================================================

pub use crate::prefs::{
    MemoryRegistry, PreferenceBridge, PreferenceCategory, PreferenceEntry, PreferenceRegistry,
    PreferenceValue,
};

// ============================================================================
// Errors
// ============================================================================

pub use crate::error::{MenuError, Result};

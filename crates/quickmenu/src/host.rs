//! The rendering host boundary.
//!
//! The rendering host is the external engine that draws the menu. The core
//! talks to it with fire-and-forget [`HostEvent`]s, always from the
//! designated thread, and receives user interaction back as [`HostInput`]
//! through [`Menu::handle_input`](crate::Menu::handle_input).

use parking_lot::Mutex;

use crate::element::ElementId;

/// Events sent to the rendering host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Create a page (and a tab, for root pages).
    CreatePage {
        page_name: String,
        mod_name: String,
        icon: Option<String>,
        element_id: ElementId,
        is_root: bool,
        clean_name: String,
    },
    /// Create a row inside a page, with an optional header.
    CreateRow {
        page_id: ElementId,
        row_id: ElementId,
        header: Option<String>,
    },
    CreateButton {
        row_id: ElementId,
        element_id: ElementId,
        label: String,
        icon: Option<String>,
        tooltip: String,
    },
    CreateToggle {
        row_id: ElementId,
        element_id: ElementId,
        label: String,
        tooltip: String,
        state: bool,
    },
    CreateSlider {
        page_id: ElementId,
        element_id: ElementId,
        label: String,
        tooltip: String,
        value: f32,
        min: f32,
        max: f32,
    },
    /// Replace the text of an element.
    UpdateText { target_id: ElementId, text: String },
    /// Replace the title bar text shown while a page is open.
    UpdateMenuTitle {
        page_id: ElementId,
        title: String,
        subtitle: String,
    },
    /// Show or hide a root page's tab.
    SetTabHidden { page_id: ElementId, hidden: bool },
    /// Navigate to a page.
    PushPage { target_id: ElementId },
    UpdateToggle { element_id: ElementId, state: bool },
    UpdateSlider { element_id: ElementId, value: f32 },
    /// Show a multi-select dialog.
    OpenMultiSelect {
        element_id: ElementId,
        label: String,
        options: Vec<String>,
        selected: usize,
    },
    /// Request text input; answered by [`HostInput::KeyboardSubmitted`].
    OpenKeyboard { initial: String },
}

impl HostEvent {
    /// The host-side event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreatePage { .. } => "createPage",
            Self::CreateRow { .. } => "createRow",
            Self::CreateButton { .. } => "createButton",
            Self::CreateToggle { .. } => "createToggle",
            Self::CreateSlider { .. } => "createSlider",
            Self::UpdateText { .. } => "updateText",
            Self::UpdateMenuTitle { .. } => "updateMenuTitle",
            Self::SetTabHidden { .. } => "setTabHidden",
            Self::PushPage { .. } => "pushPage",
            Self::UpdateToggle { .. } => "updateToggle",
            Self::UpdateSlider { .. } => "updateSlider",
            Self::OpenMultiSelect { .. } => "openMultiSelect",
            Self::OpenKeyboard { .. } => "openKeyboard",
        }
    }

    /// The element this event creates or targets, if any.
    pub fn element_id(&self) -> Option<&ElementId> {
        match self {
            Self::CreatePage { element_id, .. }
            | Self::CreateButton { element_id, .. }
            | Self::CreateToggle { element_id, .. }
            | Self::CreateSlider { element_id, .. }
            | Self::UpdateToggle { element_id, .. }
            | Self::UpdateSlider { element_id, .. }
            | Self::OpenMultiSelect { element_id, .. } => Some(element_id),
            Self::CreateRow { row_id, .. } => Some(row_id),
            Self::UpdateText { target_id, .. } | Self::PushPage { target_id } => Some(target_id),
            Self::UpdateMenuTitle { page_id, .. } | Self::SetTabHidden { page_id, .. } => {
                Some(page_id)
            }
            Self::OpenKeyboard { .. } => None,
        }
    }

    /// Whether this event creates a new host element.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::CreatePage { .. }
                | Self::CreateRow { .. }
                | Self::CreateButton { .. }
                | Self::CreateToggle { .. }
                | Self::CreateSlider { .. }
        )
    }
}

/// User interaction reported by the rendering host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostInput {
    ButtonPressed { element_id: ElementId },
    ToggleChanged { element_id: ElementId, state: bool },
    SliderChanged { element_id: ElementId, value: f32 },
    OptionSelected { element_id: ElementId, index: usize },
    KeyboardSubmitted { text: String },
}

impl HostInput {
    /// Short name of the input kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ButtonPressed { .. } => "button",
            Self::ToggleChanged { .. } => "toggle",
            Self::SliderChanged { .. } => "slider",
            Self::OptionSelected { .. } => "option",
            Self::KeyboardSubmitted { .. } => "keyboard",
        }
    }

    /// The control this input is addressed to. Keyboard input has none.
    pub fn element_id(&self) -> Option<&ElementId> {
        match self {
            Self::ButtonPressed { element_id }
            | Self::ToggleChanged { element_id, .. }
            | Self::SliderChanged { element_id, .. }
            | Self::OptionSelected { element_id, .. } => Some(element_id),
            Self::KeyboardSubmitted { .. } => None,
        }
    }
}

/// The external engine that renders the menu.
///
/// `submit` is only ever called from the designated thread.
pub trait RenderingHost: Send + Sync {
    fn submit(&self, event: HostEvent);
}

/// A rendering host that records every event it receives.
///
/// ```
/// use quickmenu::host::{HostEvent, RecordingHost, RenderingHost};
///
/// let host = RecordingHost::new();
/// host.submit(HostEvent::OpenKeyboard { initial: "hi".into() });
/// assert_eq!(host.names(), vec!["openKeyboard"]);
/// ```
#[derive(Debug, Default)]
pub struct RecordingHost {
    events: Mutex<Vec<HostEvent>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every event received so far, in order.
    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().clone()
    }

    /// Take the recorded events, leaving the log empty.
    pub fn take(&self) -> Vec<HostEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Event names in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(HostEvent::name).collect()
    }

    /// IDs of the elements created so far, in creation order.
    pub fn created_ids(&self) -> Vec<ElementId> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.is_structural())
            .filter_map(|e| e.element_id().cloned())
            .collect()
    }

    /// Number of recorded events that create or target `id`.
    pub fn count_for(&self, id: &ElementId) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| e.element_id() == Some(id))
            .count()
    }
}

impl RenderingHost for RecordingHost {
    fn submit(&self, event: HostEvent) {
        self.events.lock().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_and_targets() {
        let row = ElementId::new("qm-Row-1");
        let event = HostEvent::CreateRow {
            page_id: ElementId::new("qm-Mod-MainPage"),
            row_id: row.clone(),
            header: None,
        };
        assert_eq!(event.name(), "createRow");
        assert_eq!(event.element_id(), Some(&row));
        assert!(event.is_structural());

        let push = HostEvent::PushPage {
            target_id: row.clone(),
        };
        assert!(!push.is_structural());
        assert_eq!(push.element_id(), Some(&row));
        assert_eq!(HostEvent::OpenKeyboard { initial: String::new() }.element_id(), None);
    }

    #[test]
    fn test_recording_host() {
        let host = RecordingHost::new();
        let id = ElementId::new("qm-Toggle-1");
        host.submit(HostEvent::CreateToggle {
            row_id: ElementId::new("qm-Row-1"),
            element_id: id.clone(),
            label: "Enabled".into(),
            tooltip: String::new(),
            state: true,
        });
        host.submit(HostEvent::UpdateToggle {
            element_id: id.clone(),
            state: false,
        });

        assert_eq!(host.len(), 2);
        assert_eq!(host.created_ids(), vec![id.clone()]);
        assert_eq!(host.count_for(&id), 2);
        assert_eq!(host.take().len(), 2);
        assert!(host.is_empty());
    }
}

//! On/off switches.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use quickmenu_core::Callback;

use crate::control::ControlHandle;
use crate::element::{ElementBase, ElementId, ElementKind, PendingPush, UiElement};
use crate::host::HostEvent;
use crate::menu::MenuRuntime;

/// An on/off switch inside a category row.
pub struct Toggle {
    base: ElementBase,
    runtime: Arc<MenuRuntime>,
    me: Weak<Toggle>,
    row_id: ElementId,
    label: String,
    tooltip: String,
    state: AtomicBool,
    on_value_updated: Callback<bool>,
    state_push: PendingPush,
}

impl Toggle {
    pub(crate) fn new(
        runtime: Arc<MenuRuntime>,
        row_id: ElementId,
        label: impl Into<String>,
        tooltip: impl Into<String>,
        state: bool,
    ) -> Arc<Self> {
        let id = runtime.ids().allocate(ElementKind::Toggle);
        let toggle = Arc::new_cyclic(|me| Self {
            base: ElementBase::new(id.clone()),
            runtime: runtime.clone(),
            me: me.clone(),
            row_id,
            label: label.into(),
            tooltip: tooltip.into(),
            state: AtomicBool::new(state),
            on_value_updated: Callback::new(),
            state_push: PendingPush::default(),
        });
        runtime.register_control(id, ControlHandle::toggle(&toggle));
        toggle
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    /// Current state.
    pub fn is_toggled(&self) -> bool {
        self.state.load(Ordering::Acquire)
    }

    /// Change the state and push it to the host.
    ///
    /// Does not invoke the update callback.
    pub fn set_toggled(&self, state: bool) {
        self.state.store(state, Ordering::Release);
        self.schedule_push();
    }

    /// Set the callback run when the user flips the toggle.
    pub fn on_value_updated<F>(&self, f: F)
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.on_value_updated.set(move |state: &bool| f(*state));
    }

    /// Record a user-driven change reported by the host.
    pub(crate) fn apply_host_change(&self, state: bool) {
        self.state.store(state, Ordering::Release);
        self.on_value_updated.invoke(&state);
    }

    fn schedule_push(&self) {
        if !self.state_push.begin() {
            return;
        }
        let Some(me) = self.me.upgrade() else {
            self.state_push.finish();
            return;
        };
        self.runtime.on_host_thread(move || {
            me.state_push.finish();
            me.push_state();
        });
    }

    fn push_state(&self) {
        if !self.runtime.is_ready() || !self.is_generated() {
            return;
        }
        self.runtime.emit(HostEvent::UpdateToggle {
            element_id: self.base.id().clone(),
            state: self.is_toggled(),
        });
    }
}

impl UiElement for Toggle {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Toggle
    }

    fn display_name(&self) -> String {
        self.label.clone()
    }

    fn defer_generate(&self) -> bool {
        self.runtime.defer_generate(&self.me)
    }

    fn create_in_host(&self) {
        self.runtime.emit(HostEvent::CreateToggle {
            row_id: self.row_id.clone(),
            element_id: self.base.id().clone(),
            label: self.label.clone(),
            tooltip: self.tooltip.clone(),
            state: self.is_toggled(),
        });
    }
}

impl std::fmt::Debug for Toggle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toggle")
            .field("id", self.base.id())
            .field("label", &self.label)
            .field("state", &self.state.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(Toggle: Send, Sync);

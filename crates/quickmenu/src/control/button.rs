//! Push buttons, including the opener buttons of sub-pages.

use std::sync::{Arc, Weak};

use quickmenu_core::Callback;

use crate::control::ControlHandle;
use crate::element::{ElementBase, ElementId, ElementKind, UiElement};
use crate::host::HostEvent;
use crate::menu::MenuRuntime;

/// A push button inside a category row.
pub struct Button {
    base: ElementBase,
    runtime: Arc<MenuRuntime>,
    me: Weak<Button>,
    row_id: ElementId,
    label: String,
    icon: Option<String>,
    tooltip: String,
    on_press: Callback<()>,
}

impl Button {
    pub(crate) fn new(
        runtime: Arc<MenuRuntime>,
        row_id: ElementId,
        label: impl Into<String>,
        icon: Option<String>,
        tooltip: impl Into<String>,
    ) -> Arc<Self> {
        let id = runtime.ids().allocate(ElementKind::Button);
        let button = Arc::new_cyclic(|me| Self {
            base: ElementBase::new(id.clone()),
            runtime: runtime.clone(),
            me: me.clone(),
            row_id,
            label: label.into(),
            icon,
            tooltip: tooltip.into(),
            on_press: Callback::new(),
        });
        runtime.register_control(id, ControlHandle::button(&button));
        button
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    /// Set the callback run when the user presses the button.
    pub fn on_press<F>(&self, f: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_press.set(move |_: &()| f());
    }

    pub(crate) fn press(&self) {
        if !self.on_press.invoke(&()) {
            tracing::trace!(target: quickmenu_core::logging::targets::TREE, id = %self.base.id(), "press without callback");
        }
    }
}

impl UiElement for Button {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Button
    }

    fn display_name(&self) -> String {
        self.label.clone()
    }

    fn defer_generate(&self) -> bool {
        self.runtime.defer_generate(&self.me)
    }

    fn create_in_host(&self) {
        self.runtime.emit(HostEvent::CreateButton {
            row_id: self.row_id.clone(),
            element_id: self.base.id().clone(),
            label: self.label.clone(),
            icon: self.icon.clone(),
            tooltip: self.tooltip.clone(),
        });
    }
}

static_assertions::assert_impl_all!(Button: Send, Sync);

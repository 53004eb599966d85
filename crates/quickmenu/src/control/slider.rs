//! Float sliders bounded by a fixed range.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use quickmenu_core::Callback;
use quickmenu_core::logging::targets;

use crate::control::ControlHandle;
use crate::element::{ElementBase, ElementId, ElementKind, PendingPush, UiElement};
use crate::host::HostEvent;
use crate::menu::MenuRuntime;

/// A float slider placed directly on a page.
///
/// The value is always kept inside `[min, max]`.
pub struct Slider {
    base: ElementBase,
    runtime: Arc<MenuRuntime>,
    me: Weak<Slider>,
    page_id: ElementId,
    label: String,
    tooltip: String,
    min: f32,
    max: f32,
    value: Mutex<f32>,
    on_value_updated: Callback<f32>,
    value_push: PendingPush,
}

impl Slider {
    pub(crate) fn new(
        runtime: Arc<MenuRuntime>,
        page_id: ElementId,
        label: impl Into<String>,
        tooltip: impl Into<String>,
        initial: f32,
        min: f32,
        max: f32,
    ) -> Arc<Self> {
        let (min, max) = ordered_bounds(min, max);
        let initial = if initial.is_finite() { initial.clamp(min, max) } else { min };

        let id = runtime.ids().allocate(ElementKind::Slider);
        let slider = Arc::new_cyclic(|me| Self {
            base: ElementBase::new(id.clone()),
            runtime: runtime.clone(),
            me: me.clone(),
            page_id,
            label: label.into(),
            tooltip: tooltip.into(),
            min,
            max,
            value: Mutex::new(initial),
            on_value_updated: Callback::new(),
            value_push: PendingPush::default(),
        });
        runtime.register_control(id, ControlHandle::slider(&slider));
        slider
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn value(&self) -> f32 {
        *self.value.lock()
    }

    /// Set the value (clamped into range) and push it to the host.
    ///
    /// Non-finite values are ignored.
    pub fn set_value(&self, value: f32) {
        if !value.is_finite() {
            return;
        }
        *self.value.lock() = value.clamp(self.min, self.max);
        self.schedule_push();
    }

    /// Set the callback run when the user moves the slider.
    pub fn on_value_updated<F>(&self, f: F)
    where
        F: Fn(f32) + Send + Sync + 'static,
    {
        self.on_value_updated.set(move |value: &f32| f(*value));
    }

    pub(crate) fn apply_host_change(&self, value: f32) {
        if !value.is_finite() {
            tracing::warn!(target: targets::HOST, id = %self.base.id(), value, "non-finite slider value dropped");
            return;
        }
        let value = value.clamp(self.min, self.max);
        *self.value.lock() = value;
        self.on_value_updated.invoke(&value);
    }

    fn schedule_push(&self) {
        if !self.value_push.begin() {
            return;
        }
        let Some(me) = self.me.upgrade() else {
            self.value_push.finish();
            return;
        };
        self.runtime.on_host_thread(move || {
            me.value_push.finish();
            me.push_value();
        });
    }

    fn push_value(&self) {
        if !self.runtime.is_ready() || !self.is_generated() {
            return;
        }
        self.runtime.emit(HostEvent::UpdateSlider {
            element_id: self.base.id().clone(),
            value: self.value(),
        });
    }
}

/// Order the bounds. A non-finite bound collapses onto the other one; with no
/// finite bound the range is `[0, 0]`.
fn ordered_bounds(min: f32, max: f32) -> (f32, f32) {
    let (min, max) = match (min.is_finite(), max.is_finite()) {
        (true, true) => (min, max),
        (true, false) => (min, min),
        (false, true) => (max, max),
        (false, false) => (0.0, 0.0),
    };
    if min <= max { (min, max) } else { (max, min) }
}

impl UiElement for Slider {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Slider
    }

    fn display_name(&self) -> String {
        self.label.clone()
    }

    fn defer_generate(&self) -> bool {
        self.runtime.defer_generate(&self.me)
    }

    fn create_in_host(&self) {
        self.runtime.emit(HostEvent::CreateSlider {
            page_id: self.page_id.clone(),
            element_id: self.base.id().clone(),
            label: self.label.clone(),
            tooltip: self.tooltip.clone(),
            value: self.value(),
            min: self.min,
            max: self.max,
        });
    }
}

static_assertions::assert_impl_all!(Slider: Send, Sync);

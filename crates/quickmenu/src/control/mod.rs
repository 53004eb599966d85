//! Leaf controls.
//!
//! Controls hold a value and one update callback. The host reports
//! user-driven changes through [`Menu::handle_input`](crate::Menu::handle_input);
//! the stored value is updated and the callback runs on the designated thread
//! during the next drain. Programmatic value changes go the other way and are
//! pushed to the host with last-write-wins coalescing.

mod button;
mod multi_select;
mod slider;
mod toggle;

use std::sync::{Arc, Weak};

pub use button::Button;
pub use multi_select::MultiSelect;
pub use slider::Slider;
pub use toggle::Toggle;

/// Non-owning handle used to route host input to a control.
#[derive(Clone)]
pub(crate) enum ControlHandle {
    Button(Weak<Button>),
    Toggle(Weak<Toggle>),
    Slider(Weak<Slider>),
    MultiSelect(Weak<MultiSelect>),
}

impl ControlHandle {
    pub(crate) fn button(control: &Arc<Button>) -> Self {
        Self::Button(Arc::downgrade(control))
    }

    pub(crate) fn toggle(control: &Arc<Toggle>) -> Self {
        Self::Toggle(Arc::downgrade(control))
    }

    pub(crate) fn slider(control: &Arc<Slider>) -> Self {
        Self::Slider(Arc::downgrade(control))
    }

    pub(crate) fn multi_select(control: &Arc<MultiSelect>) -> Self {
        Self::MultiSelect(Arc::downgrade(control))
    }

    /// Whether the control is still alive.
    pub(crate) fn is_alive(&self) -> bool {
        match self {
            Self::Button(w) => w.strong_count() > 0,
            Self::Toggle(w) => w.strong_count() > 0,
            Self::Slider(w) => w.strong_count() > 0,
            Self::MultiSelect(w) => w.strong_count() > 0,
        }
    }
}

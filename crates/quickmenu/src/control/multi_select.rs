//! The standalone multi-select dialog.
//!
//! Unlike the other controls it lives outside the page tree and is shown with
//! [`Menu::open_multi_select`](crate::Menu::open_multi_select).

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use quickmenu_core::Callback;

use crate::control::ControlHandle;
use crate::element::ElementId;
use crate::error::{MenuError, Result};
use crate::menu::MenuRuntime;

/// A pick-one-of-many dialog.
///
/// Unlike the tree controls, a multi-select is not materialized as part of a
/// page. The host shows it on demand, see
/// [`Menu::open_multi_select`](crate::Menu::open_multi_select).
pub struct MultiSelect {
    id: ElementId,
    label: String,
    options: Vec<String>,
    selected: AtomicUsize,
    on_option_updated: Callback<usize>,
}

impl MultiSelect {
    pub(crate) fn new(
        runtime: &MenuRuntime,
        label: impl Into<String>,
        options: Vec<String>,
        selected: usize,
    ) -> Result<Arc<Self>> {
        check_index(selected, options.len())?;

        let id = runtime.ids().allocate_tagged("MultiSelect");
        let multi_select = Arc::new(Self {
            id: id.clone(),
            label: label.into(),
            options,
            selected: AtomicUsize::new(selected),
            on_option_updated: Callback::new(),
        });
        runtime.register_control(id, ControlHandle::multi_select(&multi_select));
        Ok(multi_select)
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Index of the selected option.
    pub fn selected(&self) -> usize {
        self.selected.load(Ordering::Acquire)
    }

    /// Label of the selected option.
    pub fn selected_label(&self) -> &str {
        &self.options[self.selected()]
    }

    /// Select an option. The new index is shown the next time the dialog opens.
    pub fn set_selected(&self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.selected.store(index, Ordering::Release);
        Ok(())
    }

    /// Set the callback run when the user picks an option.
    pub fn on_option_updated<F>(&self, f: F)
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.on_option_updated.set(move |index: &usize| f(*index));
    }

    pub(crate) fn check_index(&self, index: usize) -> Result<()> {
        check_index(index, self.options.len())
    }

    pub(crate) fn apply_host_change(&self, index: usize) {
        self.selected.store(index, Ordering::Release);
        self.on_option_updated.invoke(&index);
    }
}

fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(MenuError::SelectionOutOfRange { index, len })
    }
}

static_assertions::assert_impl_all!(MultiSelect: Send, Sync);

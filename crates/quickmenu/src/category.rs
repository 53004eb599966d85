//! Category rows: an optional header over an ordered run of controls.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::control::{Button, Toggle};
use crate::element::{ElementBase, ElementId, ElementKind, PendingPush, UiElement};
use crate::host::HostEvent;
use crate::menu::MenuRuntime;
use crate::page::Page;

/// A row of controls inside a page, under an optional header.
///
/// Children render top to bottom in insertion order.
pub struct Category {
    base: ElementBase,
    runtime: Arc<MenuRuntime>,
    me: Weak<Category>,
    page: Weak<Page>,
    page_id: ElementId,
    name: RwLock<String>,
    show_header: bool,
    children: RwLock<Vec<Arc<dyn UiElement>>>,
    name_push: PendingPush,
}

impl Category {
    pub(crate) fn new(
        runtime: Arc<MenuRuntime>,
        page: Weak<Page>,
        page_id: ElementId,
        name: String,
        show_header: bool,
    ) -> Arc<Self> {
        let id = runtime.ids().allocate(ElementKind::Category);
        Arc::new_cyclic(|me| Self {
            base: ElementBase::new(id),
            runtime,
            me: me.clone(),
            page,
            page_id,
            name: RwLock::new(name),
            show_header,
            children: RwLock::new(Vec::new()),
            name_push: PendingPush::default(),
        })
    }

    pub fn name(&self) -> String {
        self.name.read().clone()
    }

    /// Rename the category and push the new header text to the host.
    ///
    /// Renames from several threads before a drain send only the last name.
    pub fn set_name(&self, name: impl Into<String>) {
        *self.name.write() = name.into();
        self.schedule_name_push();
    }

    pub fn shows_header(&self) -> bool {
        self.show_header
    }

    /// The page this category belongs to, if it is still alive.
    pub fn page(&self) -> Option<Arc<Page>> {
        self.page.upgrade()
    }

    /// ID of the host element displaying the header text.
    pub fn header_text_id(&self) -> ElementId {
        self.base.id().child("HeaderText")
    }

    pub fn add_button(
        &self,
        label: impl Into<String>,
        icon: Option<&str>,
        tooltip: impl Into<String>,
    ) -> Arc<Button> {
        let button = Button::new(
            self.runtime.clone(),
            self.base.id().clone(),
            label,
            icon.map(str::to_string),
            tooltip,
        );
        self.push_child(button.clone());
        button
    }

    pub fn add_toggle(&self, label: impl Into<String>, tooltip: impl Into<String>, state: bool) -> Arc<Toggle> {
        let toggle = Toggle::new(self.runtime.clone(), self.base.id().clone(), label, tooltip, state);
        self.push_child(toggle.clone());
        toggle
    }

    /// Create a sub-page together with an "Open {name}" button that opens it.
    ///
    /// `mod_name` should match the extension's root page.
    pub fn add_page(
        &self,
        page_name: &str,
        icon: Option<&str>,
        tooltip: impl Into<String>,
        mod_name: &str,
    ) -> Arc<Page> {
        let page = Page::sub(self.runtime.clone(), mod_name, page_name);
        self.push_child(page.clone());

        let opener = self.add_button(format!("Open {page_name}"), icon, tooltip);
        let target = Arc::downgrade(&page);
        opener.on_press(move || {
            if let Some(page) = target.upgrade() {
                page.open();
            }
        });

        page
    }

    fn push_child(&self, child: Arc<dyn UiElement>) {
        self.children.write().push(child.clone());
        if let Some(me) = self.me.upgrade() {
            self.runtime.materialize_child(me, child);
        }
    }

    fn schedule_name_push(&self) {
        if !self.name_push.begin() {
            return;
        }
        let Some(me) = self.me.upgrade() else {
            self.name_push.finish();
            return;
        };
        self.runtime.on_host_thread(move || {
            me.name_push.finish();
            me.push_name();
        });
    }

    fn push_name(&self) {
        if !self.runtime.is_ready() || !self.is_generated() {
            return;
        }
        self.runtime.emit(HostEvent::UpdateText {
            target_id: self.header_text_id(),
            text: self.name(),
        });
    }
}

impl UiElement for Category {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Category
    }

    fn display_name(&self) -> String {
        self.name()
    }

    fn children(&self) -> Vec<Arc<dyn UiElement>> {
        self.children.read().clone()
    }

    fn defer_generate(&self) -> bool {
        self.runtime.defer_generate(&self.me)
    }

    fn create_in_host(&self) {
        self.runtime.emit(HostEvent::CreateRow {
            page_id: self.page_id.clone(),
            row_id: self.base.id().clone(),
            header: self.show_header.then(|| self.name()),
        });
    }
}

static_assertions::assert_impl_all!(Category: Send, Sync);

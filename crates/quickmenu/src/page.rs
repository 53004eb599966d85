//! Pages: ordered collections of categories and controls.
//!
//! A root page also produces a navigation tab; a sub-page is opened through
//! the button [`Category::add_page`] creates alongside it.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use quickmenu_core::logging::targets;

use crate::category::Category;
use crate::control::Slider;
use crate::element::{ElementBase, ElementId, ElementKind, PendingPush, UiElement, clean_name};
use crate::host::HostEvent;
use crate::menu::MenuRuntime;

/// Page name used by every root page.
pub const ROOT_PAGE_NAME: &str = "MainPage";

#[derive(Debug, Default)]
struct PageChrome {
    menu_title: String,
    menu_subtitle: String,
    hide_tab: bool,
}

/// A page of the menu.
///
/// Children are appended by the `add_*` operations and are never removed.
/// Structural mutation of one page from several threads at once is not
/// supported; property setters are safe from any thread.
pub struct Page {
    base: ElementBase,
    runtime: Arc<MenuRuntime>,
    me: Weak<Page>,
    root: bool,
    page_name: String,
    mod_name: String,
    tab_icon: Option<String>,
    children: RwLock<Vec<Arc<dyn UiElement>>>,
    chrome: RwLock<PageChrome>,
    title_push: PendingPush,
    tab_push: PendingPush,
}

impl Page {
    fn build(
        runtime: Arc<MenuRuntime>,
        base: ElementBase,
        root: bool,
        page_name: String,
        mod_name: String,
        tab_icon: Option<String>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            base,
            runtime,
            me: me.clone(),
            root,
            page_name,
            mod_name,
            tab_icon,
            children: RwLock::new(Vec::new()),
            chrome: RwLock::new(PageChrome::default()),
            title_push: PendingPush::default(),
            tab_push: PendingPush::default(),
        })
    }

    pub(crate) fn root(runtime: Arc<MenuRuntime>, mod_name: &str, tab_icon: Option<String>) -> Arc<Self> {
        let id = runtime.ids().root_page(mod_name);
        Self::build(
            runtime,
            ElementBase::new(id),
            true,
            ROOT_PAGE_NAME.to_string(),
            mod_name.to_string(),
            tab_icon,
        )
    }

    pub(crate) fn sub(runtime: Arc<MenuRuntime>, mod_name: &str, page_name: &str) -> Arc<Self> {
        let id = runtime.ids().sub_page(mod_name, page_name);
        Self::build(
            runtime,
            ElementBase::new(id),
            false,
            page_name.to_string(),
            mod_name.to_string(),
            None,
        )
    }

    pub(crate) fn protected(runtime: Arc<MenuRuntime>, id: ElementId) -> Arc<Self> {
        let page_name = id.to_string();
        Self::build(
            runtime,
            ElementBase::protected(id),
            false,
            page_name,
            String::new(),
            None,
        )
    }

    /// Whether this page also produces a navigation tab.
    pub fn is_root_page(&self) -> bool {
        self.root
    }

    pub fn page_name(&self) -> &str {
        &self.page_name
    }

    /// Extension namespace owning this page.
    pub fn mod_name(&self) -> &str {
        &self.mod_name
    }

    pub fn tab_icon(&self) -> Option<&str> {
        self.tab_icon.as_deref()
    }

    pub fn menu_title(&self) -> String {
        self.chrome.read().menu_title.clone()
    }

    pub fn menu_subtitle(&self) -> String {
        self.chrome.read().menu_subtitle.clone()
    }

    pub fn hide_tab(&self) -> bool {
        self.chrome.read().hide_tab
    }

    /// Set the title shown while this page is open.
    pub fn set_menu_title(&self, title: impl Into<String>) {
        self.chrome.write().menu_title = title.into();
        self.schedule_title_push();
    }

    /// Set the subtitle shown while this page is open.
    pub fn set_menu_subtitle(&self, subtitle: impl Into<String>) {
        self.chrome.write().menu_subtitle = subtitle.into();
        self.schedule_title_push();
    }

    /// Show or hide this page's tab.
    pub fn set_hide_tab(&self, hidden: bool) {
        self.chrome.write().hide_tab = hidden;
        self.schedule_tab_push();
    }

    /// Add a category (row) with a visible header.
    pub fn add_category(&self, name: impl Into<String>) -> Arc<Category> {
        self.add_category_with_header(name, true)
    }

    /// Add a category (row), choosing whether its header is shown.
    pub fn add_category_with_header(&self, name: impl Into<String>, show_header: bool) -> Arc<Category> {
        let category = Category::new(
            self.runtime.clone(),
            self.me.clone(),
            self.base.id().clone(),
            name.into(),
            show_header,
        );
        self.push_child(category.clone());
        category
    }

    /// Add a slider directly to this page.
    pub fn add_slider(
        &self,
        label: impl Into<String>,
        tooltip: impl Into<String>,
        initial: f32,
        min: f32,
        max: f32,
    ) -> Arc<Slider> {
        let slider = Slider::new(
            self.runtime.clone(),
            self.base.id().clone(),
            label,
            tooltip,
            initial,
            min,
            max,
        );
        self.push_child(slider.clone());
        slider
    }

    /// Navigate the host to this page.
    ///
    /// No-op unless the host is ready and the page is generated.
    pub fn open(&self) {
        let Some(me) = self.me.upgrade() else {
            return;
        };
        self.runtime.on_host_thread(move || {
            if !me.runtime.is_ready() || !me.is_generated() {
                tracing::trace!(target: targets::TREE, id = %me.base.id(), "open ignored, page not materialized");
                return;
            }
            me.runtime.emit(HostEvent::PushPage {
                target_id: me.base.id().clone(),
            });
        });
    }

    fn push_child(&self, child: Arc<dyn UiElement>) {
        self.children.write().push(child.clone());
        if let Some(me) = self.me.upgrade() {
            self.runtime.materialize_child(me, child);
        }
    }

    fn schedule_title_push(&self) {
        if self.base.is_protected() || !self.title_push.begin() {
            return;
        }
        let Some(me) = self.me.upgrade() else {
            self.title_push.finish();
            return;
        };
        self.runtime.on_host_thread(move || {
            me.title_push.finish();
            me.push_title();
        });
    }

    fn push_title(&self) {
        if !self.runtime.is_ready() || !self.is_generated() {
            return;
        }
        let (title, subtitle) = {
            let chrome = self.chrome.read();
            (chrome.menu_title.clone(), chrome.menu_subtitle.clone())
        };
        self.runtime.emit(HostEvent::UpdateMenuTitle {
            page_id: self.base.id().clone(),
            title,
            subtitle,
        });
    }

    fn schedule_tab_push(&self) {
        if !self.tab_push.begin() {
            return;
        }
        let Some(me) = self.me.upgrade() else {
            self.tab_push.finish();
            return;
        };
        self.runtime.on_host_thread(move || {
            me.tab_push.finish();
            me.push_tab();
        });
    }

    fn push_tab(&self) {
        if !self.runtime.is_ready() || !self.is_generated() {
            return;
        }
        self.runtime.emit(HostEvent::SetTabHidden {
            page_id: self.base.id().clone(),
            hidden: self.hide_tab(),
        });
    }
}

impl UiElement for Page {
    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Page
    }

    fn display_name(&self) -> String {
        if self.root {
            format!("{} ({})", self.mod_name, self.page_name)
        } else {
            self.page_name.clone()
        }
    }

    fn children(&self) -> Vec<Arc<dyn UiElement>> {
        self.children.read().clone()
    }

    fn defer_generate(&self) -> bool {
        self.runtime.defer_generate(&self.me)
    }

    fn create_in_host(&self) {
        self.runtime.emit(HostEvent::CreatePage {
            page_name: self.page_name.clone(),
            mod_name: self.mod_name.clone(),
            icon: self.tab_icon.clone(),
            element_id: self.base.id().clone(),
            is_root: self.root,
            clean_name: clean_name(&self.page_name),
        });

        let has_title = {
            let chrome = self.chrome.read();
            !chrome.menu_title.is_empty() || !chrome.menu_subtitle.is_empty()
        };
        if has_title {
            self.push_title();
        }

        if self.root && self.hide_tab() {
            self.runtime.emit(HostEvent::SetTabHidden {
                page_id: self.base.id().clone(),
                hidden: true,
            });
        }
    }
}

static_assertions::assert_impl_all!(Page: Send, Sync);

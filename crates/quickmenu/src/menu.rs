//! The menu facade: host readiness, root pages and host input routing.
//!
//! A [`Menu`] owns the process-scoped state every tree node shares: the
//! rendering host, the dispatch queue, the one-way readiness flag and the
//! ordered collection of root pages. Extensions build their pages through it
//! and the host integration drives it:
//!
//! ```
//! use std::sync::Arc;
//! use quickmenu::host::RecordingHost;
//! use quickmenu::Menu;
//!
//! let host = Arc::new(RecordingHost::new());
//! let menu = Menu::new(host.clone());
//!
//! let page = menu.create_root_page("MyMod", Some("Star"));
//! page.add_category("General").add_toggle("Enabled", "Turns the thing on", true);
//! assert!(host.is_empty());
//!
//! menu.host_ready();
//! assert_eq!(host.names(), vec!["createPage", "createRow", "createToggle"]);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use quickmenu_core::logging::targets;
use quickmenu_core::{DispatchQueue, DrainReport, ThreadAffinity};

use crate::config::MenuConfig;
use crate::control::{ControlHandle, MultiSelect};
use crate::element::{ElementId, IdAllocator, UiElement};
use crate::error::{MenuError, Result};
use crate::host::{HostEvent, HostInput, RenderingHost};
use crate::page::Page;

type KeyboardCallback = Box<dyn FnOnce(String) + Send + 'static>;

/// State shared by every node of one menu.
pub(crate) struct MenuRuntime {
    host: Arc<dyn RenderingHost>,
    queue: DispatchQueue,
    ready: AtomicBool,
    ids: IdAllocator,
    config: MenuConfig,
    controls: RwLock<HashMap<ElementId, ControlHandle>>,
    keyboard: Mutex<Option<KeyboardCallback>>,
}

impl MenuRuntime {
    fn new(host: Arc<dyn RenderingHost>, config: MenuConfig, designated: ThreadAffinity) -> Self {
        Self {
            host,
            queue: DispatchQueue::new(designated),
            ready: AtomicBool::new(false),
            ids: IdAllocator::new(config.element_prefix.clone()),
            config,
            controls: RwLock::new(HashMap::new()),
            keyboard: Mutex::new(None),
        }
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Flip readiness on. Returns `true` only for the transition itself.
    fn mark_ready(&self) -> bool {
        !self.ready.swap(true, Ordering::AcqRel)
    }

    pub(crate) fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    pub(crate) fn config(&self) -> &MenuConfig {
        &self.config
    }

    pub(crate) fn queue(&self) -> &DispatchQueue {
        &self.queue
    }

    /// Send an event to the host. Designated thread only.
    pub(crate) fn emit(&self, event: HostEvent) {
        self.queue
            .designated()
            .debug_assert_same_thread("host events must be emitted on the designated thread");
        tracing::trace!(
            target: targets::HOST,
            event = event.name(),
            id = ?event.element_id().map(ElementId::as_str),
            "emit"
        );
        self.host.submit(event);
    }

    /// Run `f` now when on the designated thread, otherwise queue it.
    pub(crate) fn on_host_thread<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.queue.run_or_enqueue(f);
    }

    /// Queue `generate` of `node` for the next drain unless already on the
    /// designated thread. Returns `true` when queued.
    pub(crate) fn defer_generate<T: UiElement>(&self, node: &Weak<T>) -> bool {
        if self.queue.is_designated_thread() {
            return false;
        }
        let node = node.clone();
        self.queue.enqueue(move || {
            if let Some(node) = node.upgrade() {
                node.generate_now();
            }
        });
        true
    }

    /// Generate a freshly added child once its parent is in the host.
    ///
    /// Before readiness the child stays pending; the readiness flush reaches
    /// it through its parent.
    pub(crate) fn materialize_child(&self, parent: Arc<dyn UiElement>, child: Arc<dyn UiElement>) {
        if !self.is_ready() {
            tracing::trace!(target: targets::TREE, id = %child.element_id(), "host not ready, child pending");
            return;
        }
        self.on_host_thread(move || {
            if parent.is_generated() {
                child.generate_now();
            }
        });
    }

    fn materialize_root(&self, page: Arc<Page>) {
        if !self.is_ready() {
            return;
        }
        self.on_host_thread(move || page.generate_now());
    }

    pub(crate) fn register_control(&self, id: ElementId, handle: ControlHandle) {
        self.controls.write().insert(id, handle);
    }

    fn control(&self, id: &ElementId) -> Option<ControlHandle> {
        self.controls.read().get(id).filter(|h| h.is_alive()).cloned()
    }

    /// Ask the host for text input; `on_submit` runs once with the result.
    ///
    /// A newer request replaces a pending one. No-op before readiness.
    pub(crate) fn open_keyboard(self: &Arc<Self>, initial: String, on_submit: KeyboardCallback) {
        let runtime = self.clone();
        self.on_host_thread(move || {
            if !runtime.is_ready() {
                tracing::trace!(target: targets::HOST, "keyboard requested before host ready");
                return;
            }
            if runtime.keyboard.lock().replace(on_submit).is_some() {
                tracing::debug!(target: targets::HOST, "pending keyboard request replaced");
            }
            runtime.emit(HostEvent::OpenKeyboard { initial });
        });
    }
}

/// Generate every root page of `roots` that is not generated yet, depth first.
///
/// Returns the number of root pages handed to generation by this call.
/// Already generated pages are skipped entirely, so repeated flushes emit
/// nothing new. Called off the designated thread, the generation is queued
/// for the next drain.
pub fn flush_forest(roots: &[Arc<Page>]) -> usize {
    let mut generated = 0;
    for page in roots {
        if !page.is_generated() {
            page.generate();
            generated += 1;
        }
    }
    generated
}

/// Builder for [`Menu`].
pub struct MenuBuilder {
    host: Arc<dyn RenderingHost>,
    config: MenuConfig,
    designated: Option<ThreadAffinity>,
}

impl MenuBuilder {
    pub fn config(mut self, config: MenuConfig) -> Self {
        self.config = config;
        self
    }

    /// The thread allowed to call the host. Defaults to the thread calling
    /// [`build`](Self::build).
    pub fn designated_thread(mut self, designated: ThreadAffinity) -> Self {
        self.designated = Some(designated);
        self
    }

    pub fn build(self) -> Menu {
        let designated = self.designated.unwrap_or_else(ThreadAffinity::current);
        Menu {
            runtime: Arc::new(MenuRuntime::new(self.host, self.config, designated)),
            root_pages: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

/// Handle to one menu. Cheap to clone; clones share all state.
#[derive(Clone)]
pub struct Menu {
    runtime: Arc<MenuRuntime>,
    root_pages: Arc<RwLock<Vec<Arc<Page>>>>,
}

impl Menu {
    /// Create a menu with the default configuration, bound to the calling thread.
    pub fn new(host: Arc<dyn RenderingHost>) -> Self {
        Self::builder(host).build()
    }

    pub fn builder(host: Arc<dyn RenderingHost>) -> MenuBuilder {
        MenuBuilder {
            host,
            config: MenuConfig::default(),
            designated: None,
        }
    }

    pub fn config(&self) -> &MenuConfig {
        self.runtime.config()
    }

    pub fn is_host_ready(&self) -> bool {
        self.runtime.is_ready()
    }

    /// Record that the host is ready and materialize every pending page.
    ///
    /// One-way: later calls do nothing. Off the designated thread the flush
    /// runs during the next drain.
    pub fn host_ready(&self) {
        if !self.runtime.mark_ready() {
            return;
        }
        tracing::info!(target: targets::HOST, "host ready");

        let roots = self.root_pages.clone();
        self.runtime.on_host_thread(move || {
            let snapshot = roots.read().clone();
            let generated = flush_forest(&snapshot);
            tracing::debug!(target: targets::TREE, generated, "flushed pending pages");
        });
    }

    /// Run every queued action. Call once per host tick from the designated thread.
    pub fn drain_pending(&self) -> DrainReport {
        self.runtime.queue().drain()
    }

    pub fn dispatch_queue(&self) -> &DispatchQueue {
        self.runtime.queue()
    }

    /// Create a root page, which also produces a navigation tab.
    ///
    /// Root pages are keyed by extension namespace. If `mod_name` already has
    /// one, that page is returned unchanged and a warning is logged; use
    /// [`get_or_create_root_page`](Self::get_or_create_root_page) when sharing
    /// a namespace is expected.
    pub fn create_root_page(&self, mod_name: &str, tab_icon: Option<&str>) -> Arc<Page> {
        let (page, created) = self.root_page_for(mod_name, tab_icon);
        if !created {
            tracing::warn!(target: targets::TREE, id = %page.element_id(), "root page already exists, returning it");
        }
        page
    }

    /// The root page of `mod_name`, created on first use.
    pub fn get_or_create_root_page(&self, mod_name: &str, tab_icon: Option<&str>) -> Arc<Page> {
        self.root_page_for(mod_name, tab_icon).0
    }

    fn root_page_for(&self, mod_name: &str, tab_icon: Option<&str>) -> (Arc<Page>, bool) {
        let id = self.runtime.ids().root_page(mod_name);
        let page = {
            let mut roots = self.root_pages.write();
            if let Some(existing) = roots.iter().find(|p| p.is_root_page() && *p.element_id() == id) {
                return (existing.clone(), false);
            }
            let page = Page::root(self.runtime.clone(), mod_name, tab_icon.map(str::to_string));
            roots.push(page.clone());
            page
        };
        self.runtime.materialize_root(page.clone());
        (page, true)
    }

    /// Map a page onto an element the host already contains.
    ///
    /// The page never emits its own creation event or title pushes, but its
    /// children are materialized as usual. Asking twice for the same name
    /// returns the same page.
    pub fn protected_page(&self, name: &str) -> Arc<Page> {
        let id = self.runtime.ids().well_known(name);
        let page = {
            let mut roots = self.root_pages.write();
            if let Some(existing) = roots.iter().find(|p| *p.element_id() == id) {
                return existing.clone();
            }
            let page = Page::protected(self.runtime.clone(), id);
            roots.push(page.clone());
            page
        };
        self.runtime.materialize_root(page.clone());
        page
    }

    /// Snapshot of the root pages in registration order.
    pub fn root_pages(&self) -> Vec<Arc<Page>> {
        self.root_pages.read().clone()
    }

    /// Create a multi-select dialog. Fails if `selected` is not a valid index.
    pub fn create_multi_select(
        &self,
        label: impl Into<String>,
        options: Vec<String>,
        selected: usize,
    ) -> Result<Arc<MultiSelect>> {
        MultiSelect::new(&self.runtime, label, options, selected)
    }

    /// Show a multi-select dialog. No-op before readiness.
    pub fn open_multi_select(&self, multi_select: &Arc<MultiSelect>) {
        let runtime = self.runtime.clone();
        let multi_select = multi_select.clone();
        self.runtime.on_host_thread(move || {
            if !runtime.is_ready() {
                return;
            }
            runtime.emit(HostEvent::OpenMultiSelect {
                element_id: multi_select.id().clone(),
                label: multi_select.label().to_string(),
                options: multi_select.options().to_vec(),
                selected: multi_select.selected(),
            });
        });
    }

    /// Ask the host for text input. `on_submit` runs once, on the designated
    /// thread, with the submitted text.
    pub fn open_keyboard<F>(&self, initial: impl Into<String>, on_submit: F)
    where
        F: FnOnce(String) + Send + 'static,
    {
        self.runtime.open_keyboard(initial.into(), Box::new(on_submit));
    }

    /// Route user interaction reported by the host. Callable from any thread.
    ///
    /// The addressed control's value is updated and its callback invoked
    /// during the next drain. Input for unknown elements, input of the wrong
    /// kind and out-of-range selections are rejected without side effects.
    pub fn handle_input(&self, input: HostInput) -> Result<()> {
        tracing::trace!(target: targets::HOST, input = input.name(), "host input");
        let queue = self.runtime.queue();

        if let HostInput::KeyboardSubmitted { text } = input {
            match self.runtime.keyboard.lock().take() {
                Some(on_submit) => queue.enqueue(move || on_submit(text)),
                None => tracing::debug!(target: targets::HOST, "keyboard input without pending request"),
            }
            return Ok(());
        }
        let Some(id) = input.element_id().cloned() else {
            return Ok(());
        };

        let handle = self
            .runtime
            .control(&id)
            .ok_or_else(|| MenuError::UnknownElement(id.clone()))?;

        match (handle, input) {
            (ControlHandle::Button(button), HostInput::ButtonPressed { .. }) => {
                let button = button.upgrade().ok_or(MenuError::UnknownElement(id))?;
                queue.enqueue(move || button.press());
            }
            (ControlHandle::Toggle(toggle), HostInput::ToggleChanged { state, .. }) => {
                let toggle = toggle.upgrade().ok_or(MenuError::UnknownElement(id))?;
                queue.enqueue(move || toggle.apply_host_change(state));
            }
            (ControlHandle::Slider(slider), HostInput::SliderChanged { value, .. }) => {
                let slider = slider.upgrade().ok_or(MenuError::UnknownElement(id))?;
                queue.enqueue(move || slider.apply_host_change(value));
            }
            (ControlHandle::MultiSelect(multi_select), HostInput::OptionSelected { index, .. }) => {
                let multi_select = multi_select.upgrade().ok_or(MenuError::UnknownElement(id))?;
                multi_select.check_index(index)?;
                queue.enqueue(move || multi_select.apply_host_change(index));
            }
            (_, input) => {
                return Err(MenuError::InputKindMismatch {
                    element: id,
                    input: input.name(),
                });
            }
        }
        Ok(())
    }

    pub(crate) fn runtime(&self) -> &Arc<MenuRuntime> {
        &self.runtime
    }
}

impl std::fmt::Debug for Menu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Menu")
            .field("ready", &self.is_host_ready())
            .field("root_pages", &self.root_pages.read().len())
            .field("queue", self.runtime.queue())
            .finish()
    }
}

static_assertions::assert_impl_all!(Menu: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingHost;
    use std::sync::atomic::AtomicUsize;

    fn menu() -> (Arc<RecordingHost>, Menu) {
        let host = Arc::new(RecordingHost::new());
        let menu = Menu::new(host.clone());
        (host, menu)
    }

    #[test]
    fn test_nothing_emitted_before_ready() {
        let (host, menu) = menu();
        let page = menu.create_root_page("Mod", None);
        let category = page.add_category("Row");
        category.add_button("Press", None, "");
        category.set_name("Renamed");
        page.set_menu_title("Title");
        page.open();

        assert!(host.is_empty());
        assert!(!page.is_generated());
        assert!(menu.dispatch_queue().is_empty());
    }

    #[test]
    fn test_host_ready_is_one_way() {
        let (host, menu) = menu();
        menu.create_root_page("Mod", None);

        menu.host_ready();
        menu.host_ready();

        assert!(menu.is_host_ready());
        assert_eq!(host.names(), vec!["createPage"]);
    }

    #[test]
    fn test_children_added_after_ready_generate_immediately() {
        let (host, menu) = menu();
        menu.host_ready();

        let page = menu.create_root_page("Mod", None);
        let category = page.add_category("Row");
        let toggle = category.add_toggle("Enabled", "", false);

        assert!(toggle.is_generated());
        assert_eq!(host.names(), vec!["createPage", "createRow", "createToggle"]);
    }

    #[test]
    fn test_get_or_create_root_page_shares_page() {
        let (_host, menu) = menu();
        let first = menu.get_or_create_root_page("Shared Mod", Some("Star"));
        let second = menu.get_or_create_root_page("Shared Mod", None);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(menu.root_pages().len(), 1);
        assert_eq!(first.element_id(), "qm-SharedMod-MainPage");
    }

    #[test]
    fn test_protected_page_children_only() {
        let (host, menu) = menu();
        let page = menu.protected_page("SettingsPage");
        let category = page.add_category("Main");
        page.set_menu_title("ignored");

        menu.host_ready();

        assert!(page.is_generated());
        assert_eq!(host.created_ids(), vec![category.element_id().clone()]);
        assert!(Arc::ptr_eq(&page, &menu.protected_page("SettingsPage")));
    }

    #[test]
    fn test_flush_forest_counts_new_roots() {
        let (host, menu) = menu();
        menu.create_root_page("A", None);
        menu.create_root_page("B", None);

        let roots = menu.root_pages();
        assert_eq!(flush_forest(&roots), 2);
        assert_eq!(flush_forest(&roots), 0);
        assert_eq!(host.len(), 2);
    }

    #[test]
    fn test_handle_input_runs_callback_on_drain() {
        let (_host, menu) = menu();
        let toggle = menu.create_root_page("Mod", None).add_category("Row").add_toggle("T", "", false);
        let seen = Arc::new(AtomicUsize::new(0));
        let s = seen.clone();
        toggle.on_value_updated(move |state| {
            assert!(state);
            s.fetch_add(1, Ordering::SeqCst);
        });

        menu.handle_input(HostInput::ToggleChanged {
            element_id: toggle.element_id().clone(),
            state: true,
        })
        .unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 0);

        let report = menu.drain_pending();
        assert_eq!(report.executed, 1);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert!(toggle.is_toggled());
    }

    #[test]
    fn test_handle_input_rejects_bad_input() {
        let (_host, menu) = menu();
        let button = menu.create_root_page("Mod", None).add_category("Row").add_button("B", None, "");

        let unknown = menu.handle_input(HostInput::ButtonPressed {
            element_id: ElementId::new("qm-Button-missing"),
        });
        assert!(matches!(unknown, Err(MenuError::UnknownElement(_))));

        let mismatch = menu.handle_input(HostInput::SliderChanged {
            element_id: button.element_id().clone(),
            value: 1.0,
        });
        assert!(matches!(
            mismatch,
            Err(MenuError::InputKindMismatch { input: "slider", .. })
        ));
        assert!(menu.dispatch_queue().is_empty());
    }

    #[test]
    fn test_multi_select_round_trip() {
        let (host, menu) = menu();
        menu.host_ready();
        let options = vec!["Low".to_string(), "High".to_string()];
        assert!(matches!(
            menu.create_multi_select("Quality", options.clone(), 2),
            Err(MenuError::SelectionOutOfRange { index: 2, len: 2 })
        ));

        let quality = menu.create_multi_select("Quality", options, 0).unwrap();
        menu.open_multi_select(&quality);
        assert_eq!(host.names(), vec!["openMultiSelect"]);

        let out_of_range = menu.handle_input(HostInput::OptionSelected {
            element_id: quality.id().clone(),
            index: 5,
        });
        assert!(out_of_range.is_err());

        menu.handle_input(HostInput::OptionSelected {
            element_id: quality.id().clone(),
            index: 1,
        })
        .unwrap();
        menu.drain_pending();
        assert_eq!(quality.selected_label(), "High");
    }

    #[test]
    fn test_keyboard_callback_runs_once() {
        let (host, menu) = menu();
        menu.host_ready();
        let submitted = Arc::new(Mutex::new(Vec::new()));
        let s = submitted.clone();
        menu.open_keyboard("start", move |text| s.lock().push(text));
        assert_eq!(
            host.events(),
            vec![HostEvent::OpenKeyboard {
                initial: "start".into()
            }]
        );

        for text in ["first", "second"] {
            menu.handle_input(HostInput::KeyboardSubmitted { text: text.into() })
                .unwrap();
        }
        menu.drain_pending();
        assert_eq!(*submitted.lock(), vec!["first".to_string()]);
    }

    #[test]
    fn test_off_thread_ready_flushes_on_drain() {
        let (host, menu) = menu();
        menu.create_root_page("Mod", None);

        let remote = menu.clone();
        std::thread::spawn(move || remote.host_ready()).join().unwrap();
        assert!(host.is_empty());

        menu.drain_pending();
        assert_eq!(host.names(), vec!["createPage"]);
    }
}

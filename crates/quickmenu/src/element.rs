//! Element identity and the materialization protocol.
//!
//! Every node of the menu tree implements [`UiElement`] and embeds an
//! [`ElementBase`]. Materialization ("generation") is the one-time act of
//! telling the rendering host that a node exists:
//!
//! 1. If the node is already generated, [`UiElement::generate`] returns
//!    without contacting the host.
//! 2. Otherwise the node emits exactly one structural event (skipped for
//!    protected nodes, which the host already contains), is marked generated,
//!    and then generates each of its current children in order.
//!
//! The generated flag is claimed atomically, so two racing `generate` calls
//! still produce a single host event. Host calls only happen on the
//! designated thread; `generate` from any other thread is queued.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use quickmenu_core::logging::targets;
use uuid::Uuid;

/// Stable identifier of an element inside the rendering host.
///
/// Assigned at construction and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(Arc<str>);

impl ElementId {
    /// Wrap an identifier string.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive the ID of a sub-element living inside this one.
    pub fn child(&self, suffix: &str) -> Self {
        Self::new(format!("{}-{}", self.0, suffix))
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ElementId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl PartialEq<str> for ElementId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for ElementId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// The kind of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Page,
    Category,
    Button,
    Toggle,
    Slider,
}

impl ElementKind {
    /// Tag used inside generated element IDs.
    pub fn id_tag(self) -> &'static str {
        match self {
            Self::Page => "Page",
            Self::Category => "Row",
            Self::Button => "Button",
            Self::Toggle => "Toggle",
            Self::Slider => "Slider",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Page => "Page",
            Self::Category => "Category",
            Self::Button => "Button",
            Self::Toggle => "Toggle",
            Self::Slider => "Slider",
        };
        f.write_str(name)
    }
}

/// Identity and generation state shared by every element.
#[derive(Debug)]
pub struct ElementBase {
    id: ElementId,
    generated: AtomicBool,
    protected: bool,
}

impl ElementBase {
    pub(crate) fn new(id: ElementId) -> Self {
        Self {
            id,
            generated: AtomicBool::new(false),
            protected: false,
        }
    }

    pub(crate) fn protected(id: ElementId) -> Self {
        Self {
            id,
            generated: AtomicBool::new(false),
            protected: true,
        }
    }

    /// The element's stable ID.
    pub fn id(&self) -> &ElementId {
        &self.id
    }

    /// Whether the element has been materialized in the host.
    pub fn is_generated(&self) -> bool {
        self.generated.load(Ordering::Acquire)
    }

    /// Whether the host already contains this element by convention.
    pub fn is_protected(&self) -> bool {
        self.protected
    }

    /// Claim the one-time generation. Returns `true` for exactly one caller.
    fn claim_generation(&self) -> bool {
        self.generated
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// A node of the menu tree.
pub trait UiElement: Send + Sync + 'static {
    /// Identity and generation state.
    fn base(&self) -> &ElementBase;

    /// What kind of node this is.
    fn kind(&self) -> ElementKind;

    /// Human-readable label, for diagnostics.
    fn display_name(&self) -> String;

    /// Snapshot of the node's children in insertion order.
    fn children(&self) -> Vec<Arc<dyn UiElement>> {
        Vec::new()
    }

    /// Emit this node's structural event to the host.
    ///
    /// Called at most once, by [`generate_now`](Self::generate_now).
    #[doc(hidden)]
    fn create_in_host(&self);

    /// Queue generation on the designated thread when called elsewhere.
    ///
    /// Returns `true` when the work was queued instead of run here. Nodes not
    /// bound to a menu never defer.
    #[doc(hidden)]
    fn defer_generate(&self) -> bool {
        false
    }

    /// Materialize this node and then its children, depth first.
    ///
    /// Off the designated thread nothing reaches the host here; the work runs
    /// during the next drain.
    fn generate(&self) {
        if self.defer_generate() {
            tracing::trace!(target: targets::TREE, id = %self.element_id(), "generate queued for designated thread");
            return;
        }
        self.generate_now();
    }

    /// [`generate`](Self::generate) on the current thread. Designated thread only.
    #[doc(hidden)]
    fn generate_now(&self) {
        let base = self.base();
        if !base.claim_generation() {
            return;
        }

        if base.is_protected() {
            tracing::trace!(target: targets::TREE, id = %base.id(), "protected element, skipping create");
        } else {
            tracing::debug!(target: targets::TREE, id = %base.id(), kind = %self.kind(), "generate");
            self.create_in_host();
        }

        for child in self.children() {
            child.generate_now();
        }
    }

    /// The element's stable ID.
    fn element_id(&self) -> &ElementId {
        self.base().id()
    }

    /// Whether the element has been materialized in the host.
    fn is_generated(&self) -> bool {
        self.base().is_generated()
    }

    /// Whether the host already contains this element by convention.
    fn is_protected(&self) -> bool {
        self.base().is_protected()
    }
}

/// Strip everything but ASCII letters and digits, for use inside IDs.
pub fn clean_name(name: &str) -> String {
    name.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Hands out element IDs that are unique within the process and, through a
/// random per-process nonce, distinct from the IDs of earlier runs.
#[derive(Debug)]
pub(crate) struct IdAllocator {
    prefix: String,
    nonce: String,
    next: AtomicU64,
}

impl IdAllocator {
    pub(crate) fn new(prefix: impl Into<String>) -> Self {
        let nonce = Uuid::new_v4().simple().to_string().chars().take(8).collect();
        Self {
            prefix: prefix.into(),
            nonce,
            next: AtomicU64::new(1),
        }
    }

    fn suffix(&self) -> String {
        let seq = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}{:x}", self.nonce, seq)
    }

    /// `{prefix}-{tag}-{suffix}`
    pub(crate) fn allocate(&self, kind: ElementKind) -> ElementId {
        self.allocate_tagged(kind.id_tag())
    }

    pub(crate) fn allocate_tagged(&self, tag: &str) -> ElementId {
        ElementId::new(format!("{}-{}-{}", self.prefix, tag, self.suffix()))
    }

    /// `{prefix}-{mod}-MainPage`: one root page per extension namespace.
    pub(crate) fn root_page(&self, mod_name: &str) -> ElementId {
        ElementId::new(format!("{}-{}-MainPage", self.prefix, clean_name(mod_name)))
    }

    /// `{prefix}-{mod}-{page}-{suffix}`
    pub(crate) fn sub_page(&self, mod_name: &str, page_name: &str) -> ElementId {
        ElementId::new(format!(
            "{}-{}-{}-{}",
            self.prefix,
            clean_name(mod_name),
            clean_name(page_name),
            self.suffix()
        ))
    }

    /// `{prefix}-{name}` for elements the host already knows.
    pub(crate) fn well_known(&self, name: &str) -> ElementId {
        ElementId::new(format!("{}-{}", self.prefix, name))
    }
}

/// Coalesces property pushes: at most one push per property is queued at a
/// time, and that push reads the live value when it runs.
#[derive(Debug, Default)]
pub(crate) struct PendingPush(AtomicBool);

impl PendingPush {
    /// Returns `true` if the caller should schedule a push.
    pub(crate) fn begin(&self) -> bool {
        !self.0.swap(true, Ordering::AcqRel)
    }

    /// Mark the scheduled push as running. Call before reading the value.
    pub(crate) fn finish(&self) {
        self.0.store(false, Ordering::Release);
    }
}

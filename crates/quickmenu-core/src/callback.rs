//! Single-slot update callbacks.
//!
//! Every control carries exactly one callback slot that the host's
//! user-driven changes are delivered to. Setting a new callback replaces the
//! previous one.
//!
//! ```
//! use quickmenu_core::Callback;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//!
//! let on_toggle = Callback::<bool>::new();
//! let seen = Arc::new(AtomicBool::new(false));
//!
//! let s = seen.clone();
//! on_toggle.set(move |state| s.store(*state, Ordering::SeqCst));
//!
//! assert!(on_toggle.invoke(&true));
//! assert!(seen.load(Ordering::SeqCst));
//! ```

use std::sync::Arc;

use parking_lot::Mutex;

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A replaceable callback slot.
pub struct Callback<Args> {
    slot: Mutex<Option<Slot<Args>>>,
}

impl<Args> Default for Callback<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> Callback<Args> {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Install `f`, replacing any previous callback.
    pub fn set<F>(&self, f: F)
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        *self.slot.lock() = Some(Arc::new(f));
    }

    /// Remove the callback.
    pub fn clear(&self) {
        self.slot.lock().take();
    }

    /// Whether a callback is installed.
    pub fn is_set(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Invoke the callback, if any. Returns `false` when the slot is empty.
    ///
    /// The slot lock is released before the callback runs, so the callback
    /// may replace itself.
    pub fn invoke(&self, args: &Args) -> bool {
        let slot = self.slot.lock().clone();
        match slot {
            Some(f) => {
                f(args);
                true
            }
            None => false,
        }
    }
}

impl<Args> std::fmt::Debug for Callback<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callback")
            .field("is_set", &self.is_set())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};

    #[test]
    fn test_empty_slot() {
        let cb = Callback::<i32>::new();
        assert!(!cb.is_set());
        assert!(!cb.invoke(&1));
    }

    #[test]
    fn test_set_replaces_previous() {
        let cb = Callback::<i32>::new();
        let total = Arc::new(AtomicI32::new(0));

        let t = total.clone();
        cb.set(move |v| {
            t.fetch_add(*v, Ordering::SeqCst);
        });
        let t = total.clone();
        cb.set(move |v| {
            t.fetch_add(*v * 100, Ordering::SeqCst);
        });

        cb.invoke(&2);
        assert_eq!(total.load(Ordering::SeqCst), 200);
    }

    #[test]
    fn test_clear() {
        let cb = Callback::<()>::new();
        cb.set(|_| {});
        cb.clear();
        assert!(!cb.invoke(&()));
    }

    #[test]
    fn test_callback_can_replace_itself() {
        let cb = Arc::new(Callback::<i32>::new());
        let hits = Arc::new(AtomicI32::new(0));

        let inner = cb.clone();
        let h = hits.clone();
        cb.set(move |_| {
            h.fetch_add(1, Ordering::SeqCst);
            inner.clear();
        });

        assert!(cb.invoke(&0));
        assert!(!cb.invoke(&0));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}

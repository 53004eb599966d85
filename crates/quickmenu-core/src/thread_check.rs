//! Designated-thread tracking for host-visible work.
//!
//! The rendering host may only be called from one thread. A [`ThreadAffinity`]
//! records that thread once at startup and is then handed to every component
//! that needs to decide between calling the host directly and deferring the
//! call through the [`DispatchQueue`](crate::dispatch::DispatchQueue).
//!
//! ```
//! use quickmenu_core::thread_check::ThreadAffinity;
//!
//! let designated = ThreadAffinity::current();
//! assert!(designated.is_same_thread());
//!
//! let moved = designated;
//! std::thread::spawn(move || {
//!     assert!(!moved.is_same_thread());
//! })
//! .join()
//! .unwrap();
//! ```

use std::thread::ThreadId;

/// The thread permitted to call into the rendering host.
///
/// Copyable so it can be captured by queued closures and shared between all
/// tree nodes without synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Bind to the calling thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
        }
    }

    /// Bind to an explicit thread.
    #[inline]
    pub fn from_thread_id(thread_id: ThreadId) -> Self {
        Self { thread_id }
    }

    /// Get the thread ID this affinity is bound to.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Check if the current thread is the designated one.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Panics if called from any other thread.
    ///
    /// # Panics
    ///
    /// Panics with a descriptive message naming both threads.
    pub fn assert_same_thread(&self, msg: &str) {
        if !self.is_same_thread() {
            self.panic_wrong_thread(msg);
        }
    }

    /// Debug-only variant of [`assert_same_thread`](Self::assert_same_thread).
    #[inline]
    pub fn debug_assert_same_thread(&self, msg: &str) {
        #[cfg(debug_assertions)]
        self.assert_same_thread(msg);
        #[cfg(not(debug_assertions))]
        let _ = msg;
    }

    #[cold]
    #[inline(never)]
    fn panic_wrong_thread(&self, msg: &str) -> ! {
        let current = std::thread::current();
        let current_name = current.name().unwrap_or("<unnamed>");
        let current_id = current.id();

        panic!(
            "\n\
            ══════════════════════════════════════════════════════════════════════\n\
            DESIGNATED THREAD VIOLATION\n\
            ══════════════════════════════════════════════════════════════════════\n\
            \n\
            {msg}\n\
            \n\
            Designated thread: {:?}\n\
            Current thread: \"{current_name}\" (ID: {current_id:?})\n\
            \n\
            Host calls must be made from the designated thread. Enqueue the\n\
            work on the dispatch queue instead; it is drained once per host\n\
            tick on the designated thread.\n\
            \n\
            ══════════════════════════════════════════════════════════════════════",
            self.thread_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_same_thread() {
        let affinity = ThreadAffinity::current();
        assert!(affinity.is_same_thread());
        affinity.assert_same_thread("should not panic");
    }

    #[test]
    fn test_different_thread() {
        let affinity = ThreadAffinity::current();
        let result = Arc::new(AtomicBool::new(false));

        let result_clone = result.clone();
        std::thread::spawn(move || {
            result_clone.store(!affinity.is_same_thread(), Ordering::SeqCst);
        })
        .join()
        .unwrap();

        assert!(result.load(Ordering::SeqCst));
    }

    #[test]
    fn test_panic_on_wrong_thread() {
        let affinity = ThreadAffinity::current();

        let result = std::thread::spawn(move || {
            affinity.assert_same_thread("host call off the designated thread");
        })
        .join();

        assert!(result.is_err(), "expected affinity violation to panic");
    }

    #[test]
    fn test_bound_to_other_thread() {
        let other = std::thread::spawn(|| std::thread::current().id())
            .join()
            .unwrap();
        let affinity = ThreadAffinity::from_thread_id(other);

        assert_eq!(affinity.thread_id(), other);
        assert!(!affinity.is_same_thread());
    }
}

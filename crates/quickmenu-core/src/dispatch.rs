//! Single-consumer dispatch queue for host-visible work.
//!
//! Any thread may enqueue a deferred action; only the designated thread
//! drains. Draining happens once per host tick, driven by an external
//! scheduler through [`DispatchQueue::drain`].
//!
//! # Ordering
//!
//! Actions run in FIFO order of their enqueue. Actions enqueued by an action
//! that is currently running are picked up by the same drain pass.
//!
//! # Failure isolation
//!
//! A panicking action is caught, logged and counted in the [`DrainReport`];
//! the drain continues with the next action.
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use quickmenu_core::dispatch::DispatchQueue;
//! use quickmenu_core::thread_check::ThreadAffinity;
//!
//! let queue = DispatchQueue::new(ThreadAffinity::current());
//! let hits = Arc::new(AtomicUsize::new(0));
//!
//! let h = hits.clone();
//! queue.enqueue(move || {
//!     h.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! let report = queue.drain();
//! assert_eq!(report.executed, 1);
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use crate::logging::targets;
use crate::thread_check::ThreadAffinity;

/// A boxed deferred action.
type Action = Box<dyn FnOnce() + Send + 'static>;

/// A queued action tagged with its enqueue sequence number.
struct QueuedAction {
    sequence: u64,
    action: Action,
}

/// Outcome of one [`DispatchQueue::drain`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Number of actions that ran to completion.
    pub executed: usize,
    /// Number of actions that panicked.
    pub failed: usize,
}

impl DrainReport {
    /// Total number of actions dequeued during the pass.
    pub fn total(&self) -> usize {
        self.executed + self.failed
    }
}

/// Process-wide FIFO of deferred actions, drained on the designated thread.
pub struct DispatchQueue {
    sender: Sender<QueuedAction>,
    receiver: Receiver<QueuedAction>,
    designated: ThreadAffinity,
    next_sequence: AtomicU64,
}

impl DispatchQueue {
    /// Create an empty queue drained by `designated`.
    pub fn new(designated: ThreadAffinity) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self {
            sender,
            receiver,
            designated,
            next_sequence: AtomicU64::new(1),
        }
    }

    /// The thread this queue is drained on.
    pub fn designated(&self) -> ThreadAffinity {
        self.designated
    }

    /// Whether the caller is on the designated thread.
    #[inline]
    pub fn is_designated_thread(&self) -> bool {
        self.designated.is_same_thread()
    }

    /// Append an action. Never blocks.
    pub fn enqueue<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(target: targets::DISPATCH, sequence, "enqueue");
        // The receiver lives as long as `self`, so the channel cannot be disconnected.
        let _ = self.sender.send(QueuedAction {
            sequence,
            action: Box::new(action),
        });
    }

    /// Run `action` now when on the designated thread, otherwise enqueue it.
    ///
    /// Returns `true` if the action ran synchronously.
    pub fn run_or_enqueue<F>(&self, action: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_designated_thread() {
            action();
            true
        } else {
            self.enqueue(action);
            false
        }
    }

    /// Number of actions waiting to run.
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Run every pending action in FIFO order.
    ///
    /// Keeps going until the queue is observed empty, so actions enqueued while
    /// draining run in this same pass. Called from any other thread than the
    /// designated one, this logs a warning and runs nothing.
    pub fn drain(&self) -> DrainReport {
        let mut report = DrainReport::default();

        if !self.is_designated_thread() {
            tracing::warn!(
                target: targets::DISPATCH,
                pending = self.pending_count(),
                "drain requested off the designated thread, ignoring"
            );
            return report;
        }

        loop {
            let queued = match self.receiver.try_recv() {
                Ok(queued) => queued,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            };

            let sequence = queued.sequence;
            match panic::catch_unwind(AssertUnwindSafe(queued.action)) {
                Ok(()) => report.executed += 1,
                Err(payload) => {
                    report.failed += 1;
                    tracing::warn!(
                        target: targets::DISPATCH,
                        sequence,
                        reason = panic_message(payload.as_ref()),
                        "queued action panicked, continuing drain"
                    );
                }
            }
        }

        if report.total() > 0 {
            tracing::trace!(
                target: targets::DISPATCH,
                executed = report.executed,
                failed = report.failed,
                "drain complete"
            );
        }
        report
    }
}

impl std::fmt::Debug for DispatchQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchQueue")
            .field("designated", &self.designated)
            .field("pending", &self.pending_count())
            .finish()
    }
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}

static_assertions::assert_impl_all!(DispatchQueue: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn queue() -> Arc<DispatchQueue> {
        Arc::new(DispatchQueue::new(ThreadAffinity::current()))
    }

    #[test]
    fn test_fifo_across_threads() {
        let queue = queue();
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 1..=3 {
            let queue = queue.clone();
            let order = order.clone();
            std::thread::spawn(move || {
                queue.enqueue(move || order.lock().push(i));
            })
            .join()
            .unwrap();
        }

        assert_eq!(queue.pending_count(), 3);
        let report = queue.drain();
        assert_eq!(report.executed, 3);
        assert_eq!(*order.lock(), vec![1, 2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_refill_during_drain() {
        let queue = queue();
        let order = Arc::new(Mutex::new(Vec::new()));

        let inner_queue = queue.clone();
        let inner_order = order.clone();
        queue.enqueue(move || {
            inner_order.lock().push("outer");
            let order = inner_order.clone();
            inner_queue.enqueue(move || order.lock().push("inner"));
        });

        let report = queue.drain();
        assert_eq!(report.executed, 2);
        assert_eq!(*order.lock(), vec!["outer", "inner"]);
    }

    #[test]
    fn test_panicking_action_is_isolated() {
        let queue = queue();
        let order = Arc::new(Mutex::new(Vec::new()));

        let o = order.clone();
        queue.enqueue(move || o.lock().push(1));
        queue.enqueue(|| panic!("faulty callback"));
        let o = order.clone();
        queue.enqueue(move || o.lock().push(3));

        let report = queue.drain();
        assert_eq!(report, DrainReport { executed: 2, failed: 1 });
        assert_eq!(*order.lock(), vec![1, 3]);
    }

    #[test]
    fn test_drain_off_thread_is_ignored() {
        let queue = queue();
        queue.enqueue(|| {});

        let q = queue.clone();
        let report = std::thread::spawn(move || q.drain()).join().unwrap();

        assert_eq!(report.total(), 0);
        assert_eq!(queue.pending_count(), 1);
    }

    #[test]
    fn test_run_or_enqueue() {
        let queue = queue();
        let hits = Arc::new(Mutex::new(0));

        let h = hits.clone();
        assert!(queue.run_or_enqueue(move || *h.lock() += 1));
        assert_eq!(*hits.lock(), 1);

        let q = queue.clone();
        let h = hits.clone();
        let ran = std::thread::spawn(move || q.run_or_enqueue(move || *h.lock() += 1))
            .join()
            .unwrap();
        assert!(!ran);
        assert_eq!(*hits.lock(), 1);

        queue.drain();
        assert_eq!(*hits.lock(), 2);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("static");
        assert_eq!(panic_message(payload.as_ref()), "static");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn std::any::Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "<non-string panic payload>");
    }
}

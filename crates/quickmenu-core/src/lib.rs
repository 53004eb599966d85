//! Core runtime pieces for QuickMenu.
//!
//! This crate holds the host-agnostic machinery the menu tree is built on:
//!
//! - **Designated thread**: [`ThreadAffinity`] records the one thread allowed
//!   to call into the rendering host
//! - **Dispatch queue**: [`DispatchQueue`] turns host-mutation requests from
//!   arbitrary threads into a single FIFO drained on the designated thread
//! - **Callbacks**: [`Callback`] is the single replaceable slot controls use to
//!   report user-driven changes
//! - **Logging**: tracing targets per subsystem
//!
//! # Example
//!
//! ```
//! use quickmenu_core::{DispatchQueue, ThreadAffinity};
//!
//! let queue = DispatchQueue::new(ThreadAffinity::current());
//!
//! std::thread::scope(|s| {
//!     s.spawn(|| queue.enqueue(|| println!("runs on the designated thread")));
//! });
//!
//! // Once per host tick, on the designated thread:
//! let report = queue.drain();
//! assert_eq!(report.executed, 1);
//! ```

pub mod callback;
pub mod dispatch;
pub mod logging;
pub mod thread_check;

pub use callback::Callback;
pub use dispatch::{DispatchQueue, DrainReport};
pub use thread_check::ThreadAffinity;

//! Single-user task management core.
//!
//! The [`store::TaskStore`] owns the canonical task collection and writes
//! every mutation through to a [`io::kv::KvStore`] backend. The functions
//! under [`ops`] derive views from the collection (status filters, search,
//! calendar buckets, statistics, reminder queues) without mutating it.
//! [`schedule`] runs the periodic reminder check against an injectable
//! [`time::Clock`].
//!
//! Presentation is out of scope: this crate exposes data, not markup.

pub mod io;
pub mod model;
pub mod ops;
pub mod schedule;
pub mod store;
pub mod time;

pub use model::{Priority, Settings, SubTask, Task};
pub use store::{StoreError, TaskStore};

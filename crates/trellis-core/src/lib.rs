//! Core systems for Trellis.
//!
//! This crate carries the toolkit-independent plumbing that the grid engine
//! and the UI adapters are built on:
//!
//! - [`Signal`] — typed publish/subscribe with an explicit connect/disconnect
//!   lifecycle. All change notification in Trellis flows through signals;
//!   toolkit-native event types never cross this boundary.
//! - [`LruCache`] — a bounded associative cache with deterministic
//!   least-recently-used eviction, used to memoize formatted cell values.
//! - [`Worker`] — a dedicated background thread with a task queue and
//!   generation-tagged result delivery, so long-running work never blocks or
//!   mutates UI state directly.
//!
//! # Logging
//!
//! Trellis is instrumented with the `tracing` crate. Install a subscriber in
//! the host application to see output:
//!
//! ```ignore
//! tracing_subscriber::fmt::init();
//! ```
//!
//! See [`logging`] for the target names used for filtering.

pub mod cache;
pub mod logging;
pub mod signal;
pub mod worker;

pub use cache::LruCache;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use worker::{Worker, WorkerBuilder, WorkerConfig};

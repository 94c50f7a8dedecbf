//! Reference-counted resource pooling and deadline-based call routing.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌───────────────────────────────────────────────┐
//!                    │                    Router                      │
//!                    │                                                │
//!   get(seq, task) ──┼─▶ ResourcePool ──▶ PendingCall ──▶ DeadlinePool│
//!                    │   (borrow one      (seq + task     (deadline   │
//!                    │    endpoint)        + lease)        under seq) │
//!                    │                                                │
//!   put(seq, rc)  ───┼─▶ DeadlinePool::remove ──▶ complete ──▶ task   │
//!                    │                                                │
//!   cleanup()     ───┼─▶ DeadlinePool::sweep ──▶ drop ──▶ on_timeout  │
//!                    └───────────────────────────────────────────────┘
//!                                        │
//!                                        ▼
//!                          RouteHandler (create / destroy / on_timeout)
//! ```
//!
//! The crate performs no network I/O: keys, channels, and tasks are opaque
//! values supplied through the [`RouteHandler`] capability. The router only
//! coordinates ownership and deadlines.

// Core subsystems
pub mod config;
pub mod handler;
pub mod pool;
pub mod routing;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::RouterConfig;
pub use handler::{BoxError, RouteHandler};
pub use lifecycle::{Shutdown, ShutdownSignal};
pub use pool::{DeadlinePool, ResourceLease, ResourcePool};
pub use routing::{Router, Sweeper};

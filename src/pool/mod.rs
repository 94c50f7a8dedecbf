//! Pooling subsystem.
//!
//! # Data Flow
//! ```text
//! RouteHandler::create ──▶ resource.rs (live bucket, refcounted entries)
//!                              │ erase / reconcile
//!                              ▼
//!                          retiring bucket ──▶ RouteHandler::destroy
//!
//! PendingCall ──▶ deadline.rs (absolute deadlines, owned values)
//!                     │ sweep / clear
//!                     ▼
//!                 value dropped (expiry is delivered through teardown)
//! ```
//!
//! # Design Decisions
//! - Each pool guards its own state with one non-reentrant mutex; the two
//!   locks are never held at the same time
//! - Expiry behavior lives entirely in the dropped value, keeping the
//!   deadline store generic
//! - Handler callbacks run under the invoking pool's lock and must not call
//!   back into it

pub mod deadline;
pub mod resource;

pub use deadline::DeadlinePool;
pub use resource::{ResourceLease, ResourcePool};

//! Handler capability supplied by the embedding application.
//!
//! # Responsibilities
//! - Create and destroy the channels the pool hands out
//! - Receive notifications for calls that expired before completion
//!
//! # Design Decisions
//! - Associated types instead of free type parameters so `Router<H>` stays a
//!   single-parameter type
//! - `create` returns a boxed error: the pool logs the cause and reports the
//!   failure to callers as "no resource"
//! - `on_timeout` defaults to a no-op so simple handlers implement two methods

use std::fmt::Debug;
use std::hash::Hash;

/// Boxed error type returned by channel factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Capability interface between the routing core and its environment.
///
/// # Reentrancy
///
/// `create` and `destroy` run while the lock of the resource pool that
/// invoked them is held. `on_timeout` fires after the expired call has
/// already left the deadline store and its lock was released, but it may
/// run on a thread that is mid-`cleanup` or mid-`get`. Treat all three the
/// same way: they may allocate or perform I/O, but they must **never** call
/// back into the `Router`, `ResourcePool`, or `DeadlinePool` that owns them
/// (`get`, `put`, `cleanup`, `add`, `release`, ...). The pool locks are not
/// reentrant; a nested call deadlocks the calling thread.
pub trait RouteHandler: Send + Sync + 'static {
    /// Identifier of a logical endpoint (e.g. a host address).
    type Key: Clone + Eq + Hash + Debug + Send + Sync + 'static;

    /// Identifier correlating an issued call with its completion or timeout.
    /// Unique among concurrently pending calls by caller contract.
    type Seq: Clone + Eq + Hash + Debug + Send + Sync + 'static;

    /// Caller-owned per-call state, returned on completion or handed to
    /// [`RouteHandler::on_timeout`] on expiry.
    type Task: Send + 'static;

    /// Handle callers use to perform the call. Expected to be a cheap handle
    /// (`Arc`, sender half, client stub); the pool clones it per borrow.
    type Channel: Clone + Send + Sync + 'static;

    /// Produce a channel for `key`. A returned error is logged and surfaced
    /// to callers as an absent resource; nothing is inserted into the pool.
    fn create(&self, key: &Self::Key) -> Result<Self::Channel, BoxError>;

    /// Release a channel. Called exactly once per successfully created
    /// channel, after the entry left the live set and its refcount reached
    /// zero (or unconditionally on `clear`).
    fn destroy(&self, key: &Self::Key, channel: Self::Channel);

    /// A call expired before anyone completed it. Receives ownership of the
    /// task, if the call still held one. Default: drop it silently.
    fn on_timeout(&self, seq: Self::Seq, task: Option<Self::Task>) {
        let _ = (seq, task);
    }
}

//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Embedding application:
//!     build Shutdown → hand subscriptions to background tasks (sweeper)
//!
//! Teardown:
//!     Shutdown::trigger → tasks exit their loops
//!     → Router::shutdown (expire pending, drain endpoints)
//! ```
//!
//! # Design Decisions
//! - The signal is a latch: tasks subscribed after the trigger still see it
//! - Triggering is idempotent and never blocks
//! - Draining itself belongs to the router, not to the signal

pub mod shutdown;

pub use shutdown::{Shutdown, ShutdownSignal};

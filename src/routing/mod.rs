//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! get(seq, task, timeout)
//!     → ResourcePool::get_next (borrow an endpoint round-robin)
//!     → pending.rs (PendingCall: seq + task + lease)
//!     → DeadlinePool::insert under seq
//!     → Return: endpoint channel or None
//!
//! put(seq, rc)
//!     → DeadlinePool::remove(seq)
//!     → PendingCall::complete (release borrow, hand task back)
//!     → Return: task or None (unknown sequence)
//!
//! cleanup()  [driven by sweeper.rs]
//!     → DeadlinePool::sweep
//!     → dropped PendingCalls notify on_timeout and release their borrow
//! ```
//!
//! # Design Decisions
//! - Per-sequence state machine: issued → completed | expired | abandoned
//! - Exactly-once completion enforced by ownership: `put` and the sweep
//!   contend for the same deadline entry, and only one can win it
//! - Timeouts are fixed at issue time; no targeted cancellation exists

pub mod pending;
pub mod router;
pub mod sweeper;

pub use router::{Router, FALLBACK_TIMEOUT};
pub use sweeper::Sweeper;

//! Call routing over pooled endpoints.
//!
//! # Responsibilities
//! - Manage endpoint membership (add/remove/replace)
//! - Issue calls: pick an endpoint round-robin, record the in-flight call
//!   under its sequence number with a deadline
//! - Complete calls: match a sequence number back to its call, return the
//!   caller's task, release the borrowed endpoint
//! - Expire calls whose deadline passed, via periodic [`Router::cleanup`]
//!
//! # Design Decisions
//! - Explicit `None` on exhaustion and on unknown sequence numbers rather
//!   than a silent default; callers must check
//! - The router holds no lock of its own: ResourcePool and DeadlinePool each
//!   guard themselves, and the router never holds both at once
//! - A `put` racing a sweep for the same sequence is settled by the deadline
//!   pool's lock; exactly one side observes the entry

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::RouterConfig;
use crate::handler::RouteHandler;
use crate::observability::metrics;
use crate::pool::{DeadlinePool, ResourcePool};
use crate::routing::pending::PendingCall;

/// Applied when the configured default timeout is non-positive.
pub const FALLBACK_TIMEOUT: Duration = Duration::from_secs(5);

/// Routes asynchronous multiplexed calls to pooled endpoints and matches
/// completions (or timeouts) back to the issuing caller by sequence number.
pub struct Router<H: RouteHandler> {
    handler: Arc<H>,
    resources: Arc<ResourcePool<H>>,
    pending: DeadlinePool<H::Seq, PendingCall<H>>,
    /// Set by `clear_all`; suppresses timeout notifications for good.
    clearing: Arc<AtomicBool>,
}

impl<H: RouteHandler> Router<H> {
    pub fn new(handler: Arc<H>, config: &RouterConfig) -> Self {
        let mut default_timeout = config.default_timeout();
        if default_timeout.is_zero() {
            tracing::warn!(
                fallback_ms = FALLBACK_TIMEOUT.as_millis() as u64,
                "non-positive default call timeout, using fallback"
            );
            default_timeout = FALLBACK_TIMEOUT;
        }
        Self {
            resources: Arc::new(ResourcePool::new(Arc::clone(&handler))),
            pending: DeadlinePool::new(default_timeout),
            handler,
            clearing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Pre-warm a specific endpoint without an in-flight call. `false` when
    /// the factory failed.
    pub fn add_endpoint(&self, key: &H::Key) -> bool {
        match self.resources.add(key) {
            Some(lease) => {
                self.resources.release(lease);
                true
            }
            None => false,
        }
    }

    /// Tear down a specific endpoint. Destruction is deferred while calls
    /// still borrow it.
    pub fn remove_endpoint(&self, key: &H::Key) {
        self.resources.erase(key);
    }

    /// Replace the endpoint membership wholesale. Membership changes assume
    /// a single writer; not safe to call concurrently with itself.
    pub fn set_endpoints(&self, keys: &[H::Key]) {
        self.resources.reconcile(keys);
    }

    /// Issue a call: borrow the next endpoint round-robin, record the call
    /// under `seq` with `timeout` (router default when `None`), and return
    /// the endpoint's channel. `None` when no endpoint is available, in
    /// which case nothing was recorded.
    ///
    /// `seq` must be unique among concurrently pending calls; reusing a
    /// pending sequence displaces the earlier call, which then counts as
    /// expired.
    pub fn get(&self, seq: H::Seq, task: H::Task, timeout: Option<Duration>) -> Option<H::Channel> {
        let Some(lease) = self.resources.get_next() else {
            tracing::debug!(seq = ?seq, "no live endpoint available");
            return None;
        };
        let channel = lease.channel().clone();
        let call = PendingCall::new(
            seq.clone(),
            task,
            lease,
            Arc::clone(&self.resources),
            Arc::clone(&self.handler),
            Arc::clone(&self.clearing),
        );
        self.pending.insert(seq, call, timeout);
        metrics::record_pending_calls(self.pending.len());
        Some(channel)
    }

    /// Complete the call issued under `seq`, returning the caller's task and
    /// releasing the borrowed endpoint. `None` when the sequence is unknown:
    /// already completed, already expired, or never issued.
    ///
    /// `rc` is the caller-reported result code; it is recorded for
    /// instrumentation and has no other effect.
    pub fn put(&self, seq: &H::Seq, rc: i32) -> Option<H::Task> {
        let call = self.pending.remove(seq)?;
        metrics::record_call_completed(rc);
        metrics::record_pending_calls(self.pending.len());
        call.complete()
    }

    /// Expire pending calls whose deadline has passed. Intended to be driven
    /// periodically by the owner (see [`Sweeper`](crate::routing::Sweeper));
    /// the router schedules nothing itself.
    pub fn cleanup(&self) {
        let swept = self.pending.sweep();
        if swept > 0 {
            metrics::record_sweep(swept);
            metrics::record_pending_calls(self.pending.len());
            tracing::debug!(swept, "expired pending calls");
        }
    }

    /// Graceful teardown: every remaining pending call expires (with
    /// notification), then the resource pool drains. Blocks until all
    /// retired endpoints are destroyed.
    pub fn shutdown(&self) {
        let expired = self.pending.clear();
        tracing::info!(expired, "router shutting down, draining endpoints");
        self.resources.drain_all(true);
    }

    /// Unconditional teardown for abandoning the router outright: disposes
    /// everything without waiting and without timeout notifications. The
    /// suppression stays in effect afterwards, and it also stops calls
    /// that a concurrent [`cleanup`](Router::cleanup) pulled out of the
    /// deadline store from notifying or releasing into the cleared pool.
    pub fn clear_all(&self) {
        tracing::warn!("router clear_all: unconditional teardown, notifications suppressed");
        self.clearing.store(true, Ordering::SeqCst);
        self.pending.clear();
        self.resources.clear();
    }

    /// Number of calls currently awaiting completion or expiry.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of live endpoints.
    pub fn live_endpoints(&self) -> usize {
        self.resources.live_len()
    }

    /// Number of removed endpoints still borrowed by in-flight calls.
    pub fn retiring_endpoints(&self) -> usize {
        self.resources.retiring_len()
    }
}

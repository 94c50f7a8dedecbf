//! In-flight call record.
//!
//! # Responsibilities
//! - Bind a sequence number to its task payload and the resource lease the
//!   call borrowed
//! - Guarantee exactly-once completion: either an explicit `complete`, or a
//!   timeout notification when the record is dropped un-completed
//!
//! # Design Decisions
//! - Timeout delivery is `Drop`: the deadline pool owns these records and
//!   dropping one *is* the expiry path, so no separate notification
//!   scheduling exists
//! - `complete` consumes the record; the `done` flag only tells `Drop` that
//!   release and hand-back already happened
//! - A shared `clearing` flag short-circuits both notification and lease
//!   release when the router is being abandoned: teardown never re-enters
//!   the handler, and records expiring mid-teardown never touch a pool
//!   that is about to be (or already has been) cleared

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::handler::RouteHandler;
use crate::observability::metrics;
use crate::pool::{ResourceLease, ResourcePool};

pub(crate) struct PendingCall<H: RouteHandler> {
    seq: Option<H::Seq>,
    task: Option<H::Task>,
    lease: Option<ResourceLease<H::Key, H::Channel>>,
    resources: Arc<ResourcePool<H>>,
    handler: Arc<H>,
    clearing: Arc<AtomicBool>,
    done: bool,
}

impl<H: RouteHandler> PendingCall<H> {
    pub(crate) fn new(
        seq: H::Seq,
        task: H::Task,
        lease: ResourceLease<H::Key, H::Channel>,
        resources: Arc<ResourcePool<H>>,
        handler: Arc<H>,
        clearing: Arc<AtomicBool>,
    ) -> Self {
        Self {
            seq: Some(seq),
            task: Some(task),
            lease: Some(lease),
            resources,
            handler,
            clearing,
            done: false,
        }
    }

    /// Explicit completion: releases the borrowed resource and hands the
    /// task back to the caller. Consuming `self` makes a later timeout
    /// notification structurally impossible.
    pub(crate) fn complete(mut self) -> Option<H::Task> {
        self.done = true;
        if let Some(lease) = self.lease.take() {
            self.resources.release(lease);
        }
        self.task.take()
    }
}

impl<H: RouteHandler> Drop for PendingCall<H> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        if !self.clearing.load(Ordering::SeqCst) {
            if let Some(seq) = self.seq.take() {
                metrics::record_call_timeout();
                tracing::debug!(seq = ?seq, "pending call expired without completion");
                self.handler.on_timeout(seq, self.task.take());
            }
        }
        // Re-read the flag: teardown may have started while the
        // notification ran. Once clearing, the pool destroys entries
        // unconditionally, so a release would touch freed bookkeeping.
        if self.clearing.load(Ordering::SeqCst) {
            return;
        }
        if let Some(lease) = self.lease.take() {
            self.resources.release(lease);
        }
    }
}

//! Reference-counted keyed resource pool.
//!
//! # Responsibilities
//! - Own one channel per endpoint key, created lazily by the handler factory
//! - Track outstanding borrows per entry and defer destruction until the
//!   last borrow returns
//! - Select entries round-robin or uniformly at random
//! - Apply membership diffs and drain everything on shutdown
//!
//! # Design Decisions
//! - Two buckets: `live` (unique entry per key) and `retiring` (removed but
//!   still borrowed; duplicates per key allowed under remove/re-add churn)
//! - A monotonically increasing entry id travels inside every
//!   [`ResourceLease`], so a release always finds the exact entry it
//!   borrowed, even across churn on the same key
//! - The round-robin cursor indexes an insertion-ordered key vector and is
//!   reset on every structural mutation; fairness holds between mutations
//! - Factory and teardown callbacks run while the pool lock is held and must
//!   not call back into this pool

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::Instant;

use crate::handler::RouteHandler;
use crate::observability::metrics;

/// One outstanding borrow of a pooled resource.
///
/// A lease pins the entry it was taken from: the entry is not destroyed
/// until every lease on it has been passed back to
/// [`ResourcePool::release`]. Leases are not `Clone`; each borrow operation
/// yields exactly one.
pub struct ResourceLease<K, C> {
    key: K,
    channel: C,
    entry_id: u64,
}

impl<K, C> ResourceLease<K, C> {
    /// Key of the borrowed endpoint.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Channel handle of the borrowed endpoint.
    pub fn channel(&self) -> &C {
        &self.channel
    }
}

struct Entry<H: RouteHandler> {
    entry_id: u64,
    key: H::Key,
    channel: H::Channel,
    refcount: u32,
    /// Refreshed on every successful borrow.
    last_active: Instant,
}

impl<H: RouteHandler> Entry<H> {
    fn lease(&self) -> ResourceLease<H::Key, H::Channel> {
        ResourceLease {
            key: self.key.clone(),
            channel: self.channel.clone(),
            entry_id: self.entry_id,
        }
    }
}

struct PoolState<H: RouteHandler> {
    live: HashMap<H::Key, Entry<H>>,
    /// Insertion order of live keys; drives the round-robin cursor.
    order: Vec<H::Key>,
    /// Next index into `order`; reset to zero on structural mutation.
    cursor: usize,
    /// Entries removed from `live` while still borrowed.
    retiring: Vec<Entry<H>>,
    next_id: u64,
}

/// Keyed store of reference-counted resources with deferred destruction.
pub struct ResourcePool<H: RouteHandler> {
    handler: Arc<H>,
    state: Mutex<PoolState<H>>,
    /// Signalled whenever the retiring bucket empties out.
    drained: Condvar,
}

impl<H: RouteHandler> ResourcePool<H> {
    pub fn new(handler: Arc<H>) -> Self {
        Self {
            handler,
            state: Mutex::new(PoolState {
                live: HashMap::new(),
                order: Vec::new(),
                cursor: 0,
                retiring: Vec::new(),
                next_id: 0,
            }),
            drained: Condvar::new(),
        }
    }

    fn locked(&self) -> MutexGuard<'_, PoolState<H>> {
        self.state.lock().expect("resource pool lock poisoned")
    }

    /// Create-or-get: returns a lease on `key`, creating the entry through
    /// the handler factory if absent. `None` means the factory failed and
    /// nothing was inserted.
    pub fn add(&self, key: &H::Key) -> Option<ResourceLease<H::Key, H::Channel>> {
        let mut guard = self.locked();
        let state = &mut *guard;
        if let Some(entry) = state.live.get_mut(key) {
            entry.refcount += 1;
            entry.last_active = Instant::now();
            return Some(entry.lease());
        }
        let lease = self.create_locked(state, key, 1);
        self.publish_sizes(state);
        lease
    }

    /// Returns a lease only if `key` is already live; never creates.
    pub fn get(&self, key: &H::Key) -> Option<ResourceLease<H::Key, H::Channel>> {
        let mut guard = self.locked();
        let entry = guard.live.get_mut(key)?;
        entry.refcount += 1;
        entry.last_active = Instant::now();
        Some(entry.lease())
    }

    /// Round-robin borrow over the live set. `None` when no endpoint is live.
    pub fn get_next(&self) -> Option<ResourceLease<H::Key, H::Channel>> {
        let mut guard = self.locked();
        let state = &mut *guard;
        if state.order.is_empty() {
            return None;
        }
        let idx = state.cursor % state.order.len();
        state.cursor = idx + 1;
        Self::borrow_at(state, idx)
    }

    /// Uniformly random borrow over the live set.
    pub fn get_random(&self) -> Option<ResourceLease<H::Key, H::Channel>> {
        let mut guard = self.locked();
        let state = &mut *guard;
        if state.order.is_empty() {
            return None;
        }
        let idx = fastrand::usize(..state.order.len());
        Self::borrow_at(state, idx)
    }

    fn borrow_at(
        state: &mut PoolState<H>,
        idx: usize,
    ) -> Option<ResourceLease<H::Key, H::Channel>> {
        let key = state.order[idx].clone();
        match state.live.get_mut(&key) {
            Some(entry) => {
                entry.refcount += 1;
                entry.last_active = Instant::now();
                Some(entry.lease())
            }
            None => {
                debug_assert!(false, "ordered key missing from live set");
                None
            }
        }
    }

    /// Return a borrow. If the entry is retiring and this was its last
    /// lease, it is destroyed and any drain waiter is woken.
    pub fn release(&self, lease: ResourceLease<H::Key, H::Channel>) {
        let mut guard = self.locked();
        let state = &mut *guard;
        if let Some(entry) = state.live.get_mut(&lease.key) {
            if entry.entry_id == lease.entry_id {
                debug_assert!(entry.refcount > 0, "refcount underflow on live entry");
                entry.refcount = entry.refcount.saturating_sub(1);
                return;
            }
        }
        if let Some(pos) = state
            .retiring
            .iter()
            .position(|e| e.entry_id == lease.entry_id)
        {
            let entry = &mut state.retiring[pos];
            debug_assert!(entry.refcount > 0, "refcount underflow on retiring entry");
            entry.refcount = entry.refcount.saturating_sub(1);
            if entry.refcount == 0 {
                let entry = state.retiring.swap_remove(pos);
                self.destroy_entry(entry);
                if state.retiring.is_empty() {
                    self.drained.notify_all();
                }
            }
            self.publish_sizes(state);
            return;
        }
        debug_assert!(false, "released a lease that matches no pooled entry");
        tracing::warn!(key = ?lease.key, "release matched no pooled entry, ignoring");
    }

    /// Remove `key` from the live set. Destroys the entry immediately if
    /// unreferenced, otherwise parks it in the retiring bucket.
    pub fn erase(&self, key: &H::Key) {
        let mut guard = self.locked();
        let state = &mut *guard;
        self.erase_locked(state, key);
        self.publish_sizes(state);
    }

    /// Diff the live set against `keys`: endpoints absent from `keys` are
    /// erased, new ones are created unreferenced. Retiring entries are left
    /// alone. Single-writer by contract; not safe to call concurrently with
    /// itself.
    pub fn reconcile(&self, keys: &[H::Key]) {
        let mut guard = self.locked();
        let state = &mut *guard;
        let stale: Vec<H::Key> = state
            .live
            .keys()
            .filter(|k| !keys.contains(*k))
            .cloned()
            .collect();
        for key in &stale {
            self.erase_locked(state, key);
        }
        for key in keys {
            if !state.live.contains_key(key) {
                // Unreferenced until a later borrow; factory failures are
                // logged inside and the key is simply skipped.
                let _ = self.create_locked(state, key, 0);
            }
        }
        state.cursor = 0;
        self.publish_sizes(state);
    }

    /// Erase every live entry. With `wait`, blocks the calling thread until
    /// the retiring bucket has fully drained.
    pub fn drain_all(&self, wait: bool) {
        let mut guard = self.locked();
        {
            let state = &mut *guard;
            let live = std::mem::take(&mut state.live);
            state.order.clear();
            state.cursor = 0;
            for (_, entry) in live {
                if entry.refcount == 0 {
                    self.destroy_entry(entry);
                } else {
                    state.retiring.push(entry);
                }
            }
            self.publish_sizes(state);
        }
        if wait {
            while !guard.retiring.is_empty() {
                guard = self
                    .drained
                    .wait(guard)
                    .expect("resource pool lock poisoned");
            }
        }
    }

    /// Destroy everything in both buckets regardless of refcounts. Teardown
    /// path only: outstanding leases become dangling and must not be
    /// released afterwards.
    pub fn clear(&self) {
        let mut guard = self.locked();
        let state = &mut *guard;
        let live = std::mem::take(&mut state.live);
        let retiring = std::mem::take(&mut state.retiring);
        state.order.clear();
        state.cursor = 0;
        let count = live.len() + retiring.len();
        if count > 0 {
            tracing::info!(count, "clearing resource pool unconditionally");
        }
        for (_, entry) in live {
            self.destroy_entry(entry);
        }
        for entry in retiring {
            self.destroy_entry(entry);
        }
        self.publish_sizes(state);
        self.drained.notify_all();
    }

    /// Number of live endpoints.
    pub fn live_len(&self) -> usize {
        self.locked().live.len()
    }

    /// Number of removed-but-still-borrowed entries.
    pub fn retiring_len(&self) -> usize {
        self.locked().retiring.len()
    }

    fn create_locked(
        &self,
        state: &mut PoolState<H>,
        key: &H::Key,
        refcount: u32,
    ) -> Option<ResourceLease<H::Key, H::Channel>> {
        // Factory runs under the pool lock; see the reentrancy contract on
        // `RouteHandler`.
        let channel = match self.handler.create(key) {
            Ok(channel) => channel,
            Err(error) => {
                metrics::record_create_failure();
                tracing::warn!(key = ?key, %error, "channel factory failed, endpoint not added");
                return None;
            }
        };
        let entry = Entry::<H> {
            entry_id: state.next_id,
            key: key.clone(),
            channel,
            refcount,
            last_active: Instant::now(),
        };
        state.next_id += 1;
        let lease = entry.lease();
        state.order.push(entry.key.clone());
        state.live.insert(entry.key.clone(), entry);
        state.cursor = 0;
        Some(lease)
    }

    fn erase_locked(&self, state: &mut PoolState<H>, key: &H::Key) {
        let Some(entry) = state.live.remove(key) else {
            return;
        };
        state.order.retain(|k| k != key);
        state.cursor = 0;
        if entry.refcount == 0 {
            self.destroy_entry(entry);
        } else {
            tracing::debug!(key = ?key, refcount = entry.refcount, "endpoint removed while borrowed, retiring");
            state.retiring.push(entry);
        }
    }

    fn destroy_entry(&self, entry: Entry<H>) {
        let idle_ms = entry.last_active.elapsed().as_millis() as u64;
        let Entry { key, channel, .. } = entry;
        metrics::record_resource_destroyed();
        tracing::debug!(key = ?key, idle_ms, "destroying pooled resource");
        self.handler.destroy(&key, channel);
    }

    fn publish_sizes(&self, state: &PoolState<H>) {
        metrics::record_pool_size(state.live.len(), state.retiring.len());
    }
}

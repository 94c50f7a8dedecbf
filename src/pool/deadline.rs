//! Deadline-stamped value store.
//!
//! # Responsibilities
//! - Attach an absolute deadline to every inserted value
//! - Hand a value back on explicit removal without disposing it
//! - Dispose expired values on demand (`sweep`) and everything on `clear`
//!
//! # Design Decisions
//! - The pool owns its values; "disposal" is simply dropping one. Whatever
//!   should happen on expiry lives in the value's `Drop` impl, which keeps
//!   this store generic
//! - Displaced and expired values are dropped *after* the pool lock is
//!   released, so a value's teardown may take other locks without nesting
//! - No background activity; the owner calls [`DeadlinePool::sweep`]
//!   periodically

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

struct DeadlineEntry<V> {
    deadline: Instant,
    value: V,
}

/// Keyed store of values that expire at an absolute deadline.
pub struct DeadlinePool<K, V> {
    entries: Mutex<HashMap<K, DeadlineEntry<V>>>,
    default_timeout: Duration,
}

impl<K, V> DeadlinePool<K, V>
where
    K: Clone + Eq + Hash,
{
    /// `default_timeout` applies to inserts that do not carry their own.
    pub fn new(default_timeout: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            default_timeout,
        }
    }

    fn locked(&self) -> MutexGuard<'_, HashMap<K, DeadlineEntry<V>>> {
        self.entries.lock().expect("deadline pool lock poisoned")
    }

    /// Insert `value` with deadline `now + timeout` (the pool default when
    /// `timeout` is absent or zero). A value already stored under `key` is
    /// displaced and disposed.
    pub fn insert(&self, key: K, value: V, timeout: Option<Duration>) {
        let ttl = match timeout {
            Some(t) if !t.is_zero() => t,
            _ => self.default_timeout,
        };
        let entry = DeadlineEntry {
            deadline: Instant::now() + ttl,
            value,
        };
        let displaced = self.locked().insert(key, entry);
        // Disposal runs outside the lock.
        drop(displaced);
    }

    /// Remove `key`, transferring ownership of its value to the caller.
    /// `None` when the key is absent (already removed or already swept).
    pub fn remove(&self, key: &K) -> Option<V> {
        self.locked().remove(key).map(|entry| entry.value)
    }

    /// Dispose every value whose deadline has passed. Returns how many
    /// expired. Values are dropped after the lock is released.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let expired: Vec<V> = {
            let mut entries = self.locked();
            let keys: Vec<K> = entries
                .iter()
                .filter(|(_, entry)| entry.deadline <= now)
                .map(|(key, _)| key.clone())
                .collect();
            keys.iter()
                .filter_map(|key| entries.remove(key))
                .map(|entry| entry.value)
                .collect()
        };
        let count = expired.len();
        drop(expired);
        count
    }

    /// Dispose everything unconditionally. Returns how many values were
    /// dropped.
    pub fn clear(&self) -> usize {
        let drained: Vec<V> = self
            .locked()
            .drain()
            .map(|(_, entry)| entry.value)
            .collect();
        let count = drained.len();
        drop(drained);
        count
    }

    pub fn len(&self) -> usize {
        self.locked().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locked().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Counts drops, standing in for a value whose teardown has effects.
    struct Tracked(Arc<AtomicUsize>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn tracked() -> (Arc<AtomicUsize>, impl Fn() -> Tracked) {
        let drops = Arc::new(AtomicUsize::new(0));
        let make = {
            let drops = Arc::clone(&drops);
            move || Tracked(Arc::clone(&drops))
        };
        (drops, make)
    }

    #[test]
    fn test_remove_returns_value_without_disposing() {
        let (drops, make) = tracked();
        let pool = DeadlinePool::new(Duration::from_secs(5));
        pool.insert(1u64, make(), None);
        let value = pool.remove(&1).unwrap();
        assert_eq!(drops.load(Ordering::SeqCst), 0);
        assert!(pool.remove(&1).is_none());
        drop(value);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_sweep_disposes_only_expired() {
        let (drops, make) = tracked();
        let pool = DeadlinePool::new(Duration::from_secs(5));
        pool.insert(1u64, make(), Some(Duration::from_millis(10)));
        pool.insert(2u64, make(), Some(Duration::from_secs(60)));
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(pool.sweep(), 1);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
        assert_eq!(pool.len(), 1);
        assert!(pool.remove(&1).is_none());
        assert!(pool.remove(&2).is_some());
    }

    #[test]
    fn test_insert_replaces_and_disposes_previous() {
        let (drops, make) = tracked();
        let pool = DeadlinePool::new(Duration::from_secs(5));
        pool.insert(1u64, make(), None);
        pool.insert(1u64, make(), None);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_zero_timeout_uses_default() {
        let (drops, make) = tracked();
        let pool = DeadlinePool::new(Duration::from_secs(60));
        pool.insert(1u64, make(), Some(Duration::ZERO));
        // Default is a minute out; an immediate sweep must not expire it.
        assert_eq!(pool.sweep(), 0);
        assert_eq!(drops.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_clear_disposes_everything() {
        let (drops, make) = tracked();
        let pool = DeadlinePool::new(Duration::from_secs(5));
        pool.insert(1u64, make(), None);
        pool.insert(2u64, make(), None);
        assert_eq!(pool.clear(), 2);
        assert_eq!(drops.load(Ordering::SeqCst), 2);
        assert!(pool.is_empty());
    }
}

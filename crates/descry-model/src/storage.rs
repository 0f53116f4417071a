// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Memoized, lock-guarded caches for demand-driven resolution.
//!
//! Every cache slot is computed at most once. The lock is released while a
//! value is computed, so a computation may call into other caches (or other
//! keys of the same cache). Asking for the slot that the current thread is
//! computing is a resolution cycle and is rejected; other threads asking
//! for it wait until it is done.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use thiserror::Error;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("recursive computation of `{key}` in the {cache} cache")]
    RecursiveComputation { cache: &'static str, key: String },

    #[error("the {cache} cache holds no value for `{key}`")]
    Absent { cache: &'static str, key: String },
}

#[derive(Debug)]
enum Slot<V> {
    Computing(ThreadId),
    Done(Option<V>),
}

/// A compute-if-absent map. Absent results are stored too, so that a name
/// that does not resolve is looked up only once and is distinguishable
/// from a name that was never asked for.
#[derive(Debug)]
pub struct MemoizedCache<K, V> {
    label: &'static str,
    slots: Mutex<HashMap<K, Slot<V>>>,
    ready: Condvar,
}

impl<K, V> MemoizedCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            slots: Mutex::new(HashMap::new()),
            ready: Condvar::new(),
        }
    }

    /// Return the stored result for `key`, computing it with `compute` on
    /// first use. A failed computation leaves the slot empty.
    pub fn get_or_compute<E, F>(&self, key: &K, compute: F) -> Result<Option<V>, E>
    where
        E: From<StorageError>,
        F: FnOnce() -> Result<Option<V>, E>,
    {
        let me = thread::current().id();
        let mut slots = self.lock();
        loop {
            match slots.get(key) {
                Some(Slot::Done(value)) => return Ok(value.clone()),
                Some(Slot::Computing(owner)) if *owner == me => {
                    return Err(StorageError::RecursiveComputation {
                        cache: self.label,
                        key: format!("{:?}", key),
                    }
                    .into());
                }
                Some(Slot::Computing(_)) => {
                    slots = self.ready.wait(slots).unwrap_or_else(PoisonError::into_inner);
                }
                None => break,
            }
        }
        slots.insert(key.clone(), Slot::Computing(me));
        drop(slots);

        trace!(cache = self.label, ?key, "computing slot");
        let mut pending = PendingSlot { cache: self, key: Some(key) };
        let value = compute()?;
        pending.finish(value.clone());
        Ok(value)
    }

    /// Like [`get_or_compute`](Self::get_or_compute) for computations that
    /// always produce a value.
    pub fn get_or_compute_value<E, F>(&self, key: &K, compute: F) -> Result<V, E>
    where
        E: From<StorageError>,
        F: FnOnce() -> Result<V, E>,
    {
        let value = self.get_or_compute(key, || compute().map(Some))?;
        value.ok_or_else(|| {
            StorageError::Absent {
                cache: self.label,
                key: format!("{:?}", key),
            }
            .into()
        })
    }

    /// `None` if `key` was never computed, `Some(result)` otherwise.
    pub fn get(&self, key: &K) -> Option<Option<V>> {
        match self.lock().get(key) {
            Some(Slot::Done(value)) => Some(value.clone()),
            _ => None,
        }
    }

    pub fn is_computed(&self, key: &K) -> bool {
        matches!(self.lock().get(key), Some(Slot::Done(_)))
    }

    /// All computed present values, in no particular order.
    pub fn values(&self) -> Vec<V> {
        self.lock()
            .values()
            .filter_map(|slot| match slot {
                Slot::Done(Some(value)) => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, Slot<V>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears a `Computing` slot if the computation fails or panics, and wakes
/// waiting threads either way.
struct PendingSlot<'a, K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    cache: &'a MemoizedCache<K, V>,
    key: Option<&'a K>,
}

impl<K, V> PendingSlot<'_, K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    fn finish(&mut self, value: Option<V>) {
        if let Some(key) = self.key.take() {
            self.cache.lock().insert(key.clone(), Slot::Done(value));
            self.cache.ready.notify_all();
        }
    }
}

impl<K, V> Drop for PendingSlot<'_, K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.cache.lock().remove(key);
            self.cache.ready.notify_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn computes_once() {
        let cache: MemoizedCache<String, u32> = MemoizedCache::new("test");
        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            let value = cache
                .get_or_compute::<StorageError, _>(&"a".to_string(), || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Some(7))
                })
                .unwrap();
            assert_eq!(value, Some(7));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn absent_result_is_remembered() {
        let cache: MemoizedCache<u32, u32> = MemoizedCache::new("test");
        assert_eq!(cache.get(&1), None);
        let calls = AtomicUsize::new(0);
        for _ in 0..2 {
            let value = cache
                .get_or_compute::<StorageError, _>(&1, || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(None)
                })
                .unwrap();
            assert_eq!(value, None);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.get(&1), Some(None));
        assert!(cache.values().is_empty());
    }

    #[test]
    fn reentry_on_same_key_is_rejected() {
        let cache: MemoizedCache<u32, u32> = MemoizedCache::new("test");
        let result = cache.get_or_compute::<StorageError, _>(&1, || {
            cache.get_or_compute::<StorageError, _>(&1, || Ok(Some(2)))
        });
        assert!(matches!(
            result,
            Err(StorageError::RecursiveComputation { cache: "test", .. })
        ));
        // The failed slot is cleared and can be computed again.
        assert_eq!(cache.get(&1), None);
        let value = cache.get_or_compute::<StorageError, _>(&1, || Ok(Some(3))).unwrap();
        assert_eq!(value, Some(3));
    }

    #[test]
    fn reentry_on_other_key_is_allowed() {
        let cache: MemoizedCache<u32, u32> = MemoizedCache::new("test");
        let value = cache
            .get_or_compute::<StorageError, _>(&1, || {
                let inner = cache.get_or_compute::<StorageError, _>(&2, || Ok(Some(20)))?;
                Ok(inner.map(|v| v + 1))
            })
            .unwrap();
        assert_eq!(value, Some(21));
        assert_eq!(cache.get(&2), Some(Some(20)));
    }

    #[test]
    fn concurrent_callers_share_one_computation() {
        let cache: Arc<MemoizedCache<u32, u32>> = Arc::new(MemoizedCache::new("test"));
        let calls = Arc::new(AtomicUsize::new(0));
        let mut handles = vec![];
        for _ in 0..8 {
            let cache = cache.clone();
            let calls = calls.clone();
            handles.push(thread::spawn(move || {
                cache
                    .get_or_compute::<StorageError, _>(&5, || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        thread::sleep(std::time::Duration::from_millis(5));
                        Ok(Some(50))
                    })
                    .unwrap()
            }));
        }
        for h in handles {
            assert_eq!(h.join().unwrap(), Some(50));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn value_variant_reports_stored_value() {
        let cache: MemoizedCache<u32, &'static str> = MemoizedCache::new("test");
        let v = cache
            .get_or_compute_value::<StorageError, _>(&1, || Ok("one"))
            .unwrap();
        assert_eq!(v, "one");
        assert!(cache.is_computed(&1));
    }
}

//! Per-scope instance cache.
//!
//! Every scope (the root container included) owns one [`ScopeCache`].
//! Services registered with [`Lifetime::Scoped`](crate::lifetime::Lifetime::Scoped)
//! store their instance here on first resolve and hand out clones afterwards.

use std::any::Any;
use std::fmt;

use dashmap::DashMap;
use tracing::trace;

use crate::error::{Result, TazyinError};
use crate::key::ServiceKey;

/// Instances created within one scope, keyed by service type.
#[derive(Default)]
pub struct ScopeCache {
    instances: DashMap<ServiceKey, Box<dyn Any + Send + Sync>>,
}

impl ScopeCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached `T`, or creates, caches and returns it.
    ///
    /// `create` runs without any map lock held, so it may resolve other
    /// scoped services from the same cache. If two callers race, the first
    /// stored value wins and both receive clones of it.
    pub fn get_or_try_insert_with<T, F>(&self, key: &ServiceKey, create: F) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Result<T>,
    {
        if let Some(value) = self.get::<T>(key) {
            trace!(key = %key, "Scope cache hit");
            return Ok(value);
        }

        let created = create()?;
        let stored = self
            .instances
            .entry(key.clone())
            .or_insert_with(|| Box::new(created));

        stored.downcast_ref::<T>().cloned().ok_or_else(|| {
            TazyinError::construction::<T>(format!(
                "Scope cache holds a different type under {key}"
            ))
        })
    }

    /// Number of cached instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns true if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    fn get<T: Clone + 'static>(&self, key: &ServiceKey) -> Option<T> {
        self.instances
            .get(key)
            .and_then(|entry| entry.value().downcast_ref::<T>().cloned())
    }
}

impl fmt::Debug for ScopeCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeCache")
            .field("cached", &self.instances.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn creates_once_then_clones() {
        let cache = ScopeCache::new();
        let key = ServiceKey::of::<String>();
        let calls = AtomicU32::new(0);

        let create = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(String::from("request-1"))
        };

        let a: String = cache.get_or_try_insert_with(&key, create).unwrap();
        let b: String = cache.get_or_try_insert_with(&key, create).unwrap();

        assert_eq!(a, "request-1");
        assert_eq!(b, "request-1");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_creation_caches_nothing() {
        let cache = ScopeCache::new();
        let key = ServiceKey::of::<u32>();

        let result: Result<u32> =
            cache.get_or_try_insert_with(&key, || Err(TazyinError::construction::<u32>("boom")));

        assert!(result.is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn nested_creation_does_not_deadlock() {
        let cache = ScopeCache::new();
        let outer = ServiceKey::of::<String>();
        let inner = ServiceKey::of::<u32>();

        let value: String = cache
            .get_or_try_insert_with(&outer, || {
                let n: u32 = cache.get_or_try_insert_with(&inner, || Ok(7))?;
                Ok(format!("inner={n}"))
            })
            .unwrap();

        assert_eq!(value, "inner=7");
        assert_eq!(cache.len(), 2);
    }
}

//! Service registry: stores the descriptors and constructors of a container.
//!
//! A [`ServiceDescriptor`] associates a [`ServiceKey`] with a lifetime and a
//! type-erased factory. The lifetime policy is baked into the factory when
//! the descriptor is created, while the concrete type is still known:
//! singletons close over a `OnceCell`, scoped services go through the
//! resolver's [`ScopeCache`](crate::scope::ScopeCache), transients call
//! straight through.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, trace};

use crate::error::{AlreadyRegisteredError, Result, TazyinError};
use crate::key::ServiceKey;
use crate::lifetime::Lifetime;
use crate::resolver::Resolver;

/// Type alias for type-erased factory functions.
///
/// A factory takes the [`Resolver`] (to resolve sub-dependencies)
/// and returns a boxed `Any` or an error.
///
/// Factories are shared between threads (the container is `Send + Sync`),
/// hence `Arc`.
pub type FactoryFn =
    Arc<dyn Fn(&dyn Resolver) -> Result<Box<dyn Any + Send + Sync>> + Send + Sync>;

/// Erases a typed constructor into a [`FactoryFn`].
///
/// Used for the constructor table consulted by
/// [`ResolverApi::activate`](crate::resolver::ResolverApi::activate).
pub fn erase<T, F>(factory: F) -> FactoryFn
where
    T: Send + Sync + 'static,
    F: Fn(&dyn Resolver) -> Result<T> + Send + Sync + 'static,
{
    Arc::new(move |resolver: &dyn Resolver| {
        Ok(Box::new(factory(resolver)?) as Box<dyn Any + Send + Sync>)
    })
}

/// One registration: which service, how long it lives, how to make it.
#[derive(Clone)]
pub struct ServiceDescriptor {
    key: ServiceKey,
    lifetime: Lifetime,
    factory: FactoryFn,
}

impl ServiceDescriptor {
    /// Creates a descriptor for `T` with the given lifetime.
    ///
    /// Cached lifetimes hand out clones, so `T` must be `Clone`
    /// (use `Arc<T>` for services).
    pub fn new<T, F>(lifetime: Lifetime, factory: F) -> Self
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<T> + Send + Sync + 'static,
    {
        match lifetime {
            Lifetime::Singleton => Self::singleton(factory),
            Lifetime::Scoped => Self::scoped(factory),
            Lifetime::Transient => Self::transient(factory),
        }
    }

    /// Factory runs once, on first resolve. Later resolves clone the value.
    pub fn singleton<T, F>(factory: F) -> Self
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<T> + Send + Sync + 'static,
    {
        let cell: OnceCell<T> = OnceCell::new();

        Self {
            key: ServiceKey::of::<T>(),
            lifetime: Lifetime::Singleton,
            factory: Arc::new(move |resolver: &dyn Resolver| {
                let value = cell.get_or_try_init(|| factory(resolver))?;
                Ok(Box::new(value.clone()) as Box<dyn Any + Send + Sync>)
            }),
        }
    }

    /// Factory runs once per scope.
    pub fn scoped<T, F>(factory: F) -> Self
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<T> + Send + Sync + 'static,
    {
        let key = ServiceKey::of::<T>();
        let cache_key = key.clone();

        Self {
            key,
            lifetime: Lifetime::Scoped,
            factory: Arc::new(move |resolver: &dyn Resolver| {
                let value = resolver
                    .scope()
                    .get_or_try_insert_with(&cache_key, || factory(resolver))?;
                Ok(Box::new(value) as Box<dyn Any + Send + Sync>)
            }),
        }
    }

    /// Factory runs on every resolve.
    pub fn transient<T, F>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&dyn Resolver) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            key: ServiceKey::of::<T>(),
            lifetime: Lifetime::Transient,
            factory: erase(factory),
        }
    }

    /// The service type this descriptor produces.
    pub fn key(&self) -> &ServiceKey {
        &self.key
    }

    /// How long produced instances live.
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// The lifetime-aware, type-erased factory.
    pub fn factory(&self) -> &FactoryFn {
        &self.factory
    }
}

impl fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("key", &self.key)
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

/// Stores all descriptors and constructors.
///
/// Populated during the build phase; read-only once the container exists.
#[derive(Default)]
pub(crate) struct Registry {
    descriptors: HashMap<ServiceKey, ServiceDescriptor>,
    constructors: HashMap<ServiceKey, FactoryFn>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a descriptor.
    ///
    /// # Errors
    /// Returns [`TazyinError::AlreadyRegistered`] if the key is
    /// already registered and `allow_override` is false.
    pub fn register(&mut self, descriptor: ServiceDescriptor, allow_override: bool) -> Result<()> {
        let key = descriptor.key.clone();

        if !allow_override && self.descriptors.contains_key(&key) {
            return Err(TazyinError::AlreadyRegistered(AlreadyRegisteredError { key }));
        }

        debug!(key = %key, lifetime = %descriptor.lifetime, "Registered service");
        self.descriptors.insert(key, descriptor);
        Ok(())
    }

    /// Adds (or replaces) the constructor for an implementation type.
    pub fn register_constructor(&mut self, key: ServiceKey, constructor: FactoryFn) {
        debug!(key = %key, "Registered constructor");
        self.constructors.insert(key, constructor);
    }

    pub fn get(&self, key: &ServiceKey) -> Option<&ServiceDescriptor> {
        self.descriptors.get(key)
    }

    pub fn constructor(&self, key: &ServiceKey) -> Option<FactoryFn> {
        let found = self.constructors.get(key).cloned();
        trace!(key = %key, found = found.is_some(), "Constructor lookup");
        found
    }

    /// Number of registered services (constructors not counted).
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Type names of everything registered, for "did you mean?" hints.
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.descriptors.keys().map(|k| k.type_name())
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("descriptors", &self.descriptors.len())
            .field("constructors", &self.constructors.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Database;

    fn make_descriptor(lifetime: Lifetime) -> ServiceDescriptor {
        ServiceDescriptor::new(lifetime, |_| Ok(42u32))
    }

    #[test]
    fn register_and_get() {
        let mut reg = Registry::new();
        reg.register(make_descriptor(Lifetime::Singleton), false).unwrap();

        let descriptor = reg.get(&ServiceKey::of::<u32>()).unwrap();
        assert_eq!(descriptor.lifetime(), Lifetime::Singleton);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn duplicate_fails() {
        let mut reg = Registry::new();
        reg.register(make_descriptor(Lifetime::Singleton), false).unwrap();

        match reg.register(make_descriptor(Lifetime::Transient), false) {
            Err(TazyinError::AlreadyRegistered(err)) => {
                assert_eq!(err.key, ServiceKey::of::<u32>());
            }
            other => panic!("Expected AlreadyRegistered, got: {other:?}"),
        }
        assert_eq!(reg.get(&ServiceKey::of::<u32>()).unwrap().lifetime(), Lifetime::Singleton);
    }

    #[test]
    fn duplicate_with_override_replaces() {
        let mut reg = Registry::new();
        reg.register(make_descriptor(Lifetime::Singleton), false).unwrap();
        reg.register(make_descriptor(Lifetime::Transient), true).unwrap();

        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get(&ServiceKey::of::<u32>()).unwrap().lifetime(), Lifetime::Transient);
    }

    #[test]
    fn constructors_are_separate_from_services() {
        let mut reg = Registry::new();
        let key = ServiceKey::of::<Database>();
        reg.register_constructor(key.clone(), erase(|_| Ok(Database)));

        assert!(reg.constructor(&key).is_some());
        assert!(reg.get(&key).is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn descriptor_reports_key_and_lifetime() {
        let descriptor = ServiceDescriptor::scoped(|_| Ok(String::from("x")));
        assert_eq!(descriptor.key(), &ServiceKey::of::<String>());
        assert_eq!(descriptor.lifetime(), Lifetime::Scoped);
        assert!(format!("{descriptor:?}").contains("Scoped"));
    }
}

//! # The Container
//!
//! A deliberately small DI container: enough to register services with a
//! lifetime, resolve them, open scopes, and activate implementation types
//! from an explicit constructor table.
//!
//! # Architecture
//! ```text
//! ContainerBuilder  ──build()──>  Container  (root scope)
//!                                    │
//!                              create_scope()
//!                                    │
//!                                    ▼
//!                              ScopedContainer  (own scope cache)
//! ```
//!
//! # Examples
//! ```rust
//! use tazyin_container::prelude::*;
//! use std::sync::Arc;
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! struct FixedClock;
//! impl Clock for FixedClock {
//!     fn now(&self) -> u64 { 1_700_000_000 }
//! }
//!
//! struct Stamp(u64);
//!
//! let container = Container::builder()
//!     .singleton_with::<Arc<dyn Clock>>(|_| Ok(Arc::new(FixedClock) as Arc<dyn Clock>))
//!     .transient_with::<Stamp>(|r| {
//!         let clock: Arc<dyn Clock> = r.resolve()?;
//!         Ok(Stamp(clock.now()))
//!     })
//!     .build()
//!     .expect("Failed to build container");
//!
//! let stamp: Stamp = container.resolve().expect("Failed to resolve");
//! assert_eq!(stamp.0, 1_700_000_000);
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use tazyin_support::rendering::suggest_similar;
use tracing::{debug, info, instrument, warn};

use crate::error::{NotRegisteredError, Result, TazyinError};
use crate::key::ServiceKey;
use crate::provider::{Provider, ServiceRegistry};
use crate::registry::{FactoryFn, Registry, ServiceDescriptor, erase};
use crate::resolver::{Resolver, ResolverApi};
use crate::scope::ScopeCache;

const MAX_SUGGESTIONS: usize = 3;

// ============================================================
// ContainerBuilder
// ============================================================

/// Builds a [`Container`].
///
/// Plain registrations chain by value. Helpers that hand something back
/// (such as decorated registrations) go through the `&mut`
/// [`ServiceRegistry`] implementation instead:
///
/// ```rust,ignore
/// let mut builder = Container::builder()
///     .singleton_value(Config::load())
///     .constructor::<EnglishGreeter>(|_| Ok(EnglishGreeter));
///
/// builder
///     .register_decorated_singleton_impl::<Arc<dyn Greeter>, EnglishGreeter>()?
///     .add_decorator_fn(|inner| Arc::new(Loud(inner)) as Arc<dyn Greeter>);
///
/// let container = builder.build()?;
/// ```
pub struct ContainerBuilder {
    registry: Registry,
    allow_override: bool,
    deferred_error: Option<TazyinError>,
}

impl ContainerBuilder {
    fn new() -> Self {
        Self {
            registry: Registry::new(),
            allow_override: false,
            deferred_error: None,
        }
    }

    /// Allow replacing previously registered services.
    pub fn allow_override(mut self, allow: bool) -> Self {
        self.allow_override = allow;
        self
    }

    // ── Singleton ──

    /// Register a pre-built value as a singleton.
    ///
    /// Cloned on every resolve (use `Arc<T>` for cheap sharing).
    pub fn singleton_value<T: Clone + Send + Sync + 'static>(self, value: T) -> Self {
        self.register_deferred(ServiceDescriptor::singleton(move |_| Ok(value.clone())))
    }

    /// Register a singleton factory, called once on first resolve.
    pub fn singleton_with<T: Clone + Send + Sync + 'static>(
        self,
        factory: impl Fn(&dyn Resolver) -> Result<T> + Send + Sync + 'static,
    ) -> Self {
        self.register_deferred(ServiceDescriptor::singleton(factory))
    }

    // ── Scoped ──

    /// Register a scoped factory, called once per scope.
    pub fn scoped_with<T: Clone + Send + Sync + 'static>(
        self,
        factory: impl Fn(&dyn Resolver) -> Result<T> + Send + Sync + 'static,
    ) -> Self {
        self.register_deferred(ServiceDescriptor::scoped(factory))
    }

    // ── Transient ──

    /// Register a transient factory, called on every resolve.
    pub fn transient_with<T: Send + Sync + 'static>(
        self,
        factory: impl Fn(&dyn Resolver) -> Result<T> + Send + Sync + 'static,
    ) -> Self {
        self.register_deferred(ServiceDescriptor::transient(factory))
    }

    // ── Constructors ──

    /// Register how to construct an implementation type.
    ///
    /// This does not make `T` resolvable. It lets
    /// [`ResolverApi::activate`] build `T`, which is what
    /// implementation-type registrations and decorator types rely on.
    pub fn constructor<T: Send + Sync + 'static>(
        mut self,
        constructor: impl Fn(&dyn Resolver) -> Result<T> + Send + Sync + 'static,
    ) -> Self {
        self.registry.register_constructor(ServiceKey::of::<T>(), erase(constructor));
        self
    }

    // ── Provider modules ──

    /// Add a [`Provider`] module.
    pub fn add_provider(mut self, provider: &dyn Provider) -> Self {
        debug!(provider = provider.name(), "Adding provider");
        if let Err(err) = provider.register(&mut self) {
            self.defer(err);
        }
        self
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns true if no services are registered.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    // ── Build ──

    /// Freeze the registrations into an immutable container.
    ///
    /// # Errors
    /// Returns the first registration error raised by a by-value
    /// registration (e.g. a duplicate service).
    #[instrument(skip(self), name = "container_build")]
    pub fn build(self) -> Result<Container> {
        if let Some(err) = self.deferred_error {
            warn!(error = %err, "Container build failed");
            return Err(err);
        }

        info!(registered = self.registry.len(), "Container built");
        Ok(Container {
            registry: Arc::new(self.registry),
            root: ScopeCache::new(),
        })
    }

    // ── Internal ──

    fn register_deferred(mut self, descriptor: ServiceDescriptor) -> Self {
        if let Err(err) = self.registry.register(descriptor, self.allow_override) {
            self.defer(err);
        }
        self
    }

    fn defer(&mut self, err: TazyinError) {
        warn!(error = %err, "Registration failed");
        if self.deferred_error.is_none() {
            self.deferred_error = Some(err);
        }
    }
}

impl ServiceRegistry for ContainerBuilder {
    fn register(&mut self, descriptor: ServiceDescriptor) -> Result<()> {
        self.registry.register(descriptor, self.allow_override)
    }

    fn register_constructor(&mut self, key: ServiceKey, constructor: FactoryFn) {
        self.registry.register_constructor(key, constructor);
    }
}

impl fmt::Debug for ContainerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerBuilder")
            .field("registry", &self.registry)
            .field("allow_override", &self.allow_override)
            .finish()
    }
}

// ═══════════════════════════════════════════
// Container
// ═══════════════════════════════════════════

/// Immutable, thread-safe container.
///
/// Created by [`ContainerBuilder::build()`]. The container is also the
/// root scope: scoped services resolved directly from it are cached here.
pub struct Container {
    registry: Arc<Registry>,
    root: ScopeCache,
}

impl Container {
    /// Create a new builder.
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    /// Resolve a service by type.
    ///
    /// ```rust,ignore
    /// let greeter: Arc<dyn Greeter> = container.resolve()?;
    /// ```
    pub fn resolve<T: Send + Sync + 'static>(&self) -> Result<T> {
        (self as &dyn Resolver).resolve()
    }

    /// Create a child scope with its own cache for scoped services.
    pub fn create_scope(&self) -> ScopedContainer<'_> {
        debug!("Creating new scope");
        ScopedContainer {
            parent: self,
            cache: ScopeCache::new(),
        }
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns true if no services are registered.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Runs the registered factory for `key` against `resolver`.
    fn resolve_with(
        &self,
        key: &ServiceKey,
        resolver: &dyn Resolver,
    ) -> Result<Box<dyn Any + Send + Sync>> {
        let descriptor = self.registry.get(key).ok_or_else(|| {
            TazyinError::NotRegistered(NotRegisteredError {
                requested: key.clone(),
                suggestions: suggest_similar(
                    key.type_name(),
                    self.registry.type_names(),
                    MAX_SUGGESTIONS,
                ),
            })
        })?;

        (descriptor.factory())(resolver)
    }
}

impl Resolver for Container {
    fn resolve_key(&self, key: &ServiceKey) -> Result<Box<dyn Any + Send + Sync>> {
        self.resolve_with(key, self)
    }

    fn constructor(&self, key: &ServiceKey) -> Option<FactoryFn> {
        self.registry.constructor(key)
    }

    fn scope(&self) -> &ScopeCache {
        &self.root
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("registered", &self.registry.len())
            .finish()
    }
}

// ═══════════════════════════════════════════
// ScopedContainer
// ═══════════════════════════════════════════

/// A child scope (e.g. one request).
///
/// Singletons are shared with the parent; scoped services get one
/// instance per `ScopedContainer`; transients are never cached.
pub struct ScopedContainer<'a> {
    parent: &'a Container,
    cache: ScopeCache,
}

impl ScopedContainer<'_> {
    /// Resolve a service within this scope.
    pub fn resolve<T: Send + Sync + 'static>(&self) -> Result<T> {
        (self as &dyn Resolver).resolve()
    }
}

impl Resolver for ScopedContainer<'_> {
    fn resolve_key(&self, key: &ServiceKey) -> Result<Box<dyn Any + Send + Sync>> {
        self.parent.resolve_with(key, self)
    }

    fn constructor(&self, key: &ServiceKey) -> Option<FactoryFn> {
        self.parent.constructor(key)
    }

    fn scope(&self) -> &ScopeCache {
        &self.cache
    }
}

impl fmt::Debug for ScopedContainer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedContainer")
            .field("cache", &self.cache)
            .finish()
    }
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::{Container, ContainerBuilder, ScopedContainer};
    pub use crate::error::{Result, TazyinError};
    pub use crate::key::ServiceKey;
    pub use crate::lifetime::Lifetime;
    pub use crate::provider::{Provider, ServiceRegistry};
    pub use crate::registry::ServiceDescriptor;
    pub use crate::resolver::{Resolver, ResolverApi};
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════

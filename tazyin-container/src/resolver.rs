//! The resolver capability handed to every factory.
//!
//! Factories and decorators never see the container itself. They receive a
//! `&dyn Resolver`, which can:
//! - resolve a registered service ([`ResolverApi::resolve`])
//! - build an unregistered implementation type from its registered
//!   constructor ([`ResolverApi::activate`])
//! - expose the current scope's instance cache
//!
//! # Examples
//! ```rust
//! use tazyin_container::prelude::*;
//!
//! let container = Container::builder()
//!     .singleton_value(String::from("postgres://localhost"))
//!     .transient_with::<Vec<u8>>(|r| {
//!         let url: String = r.resolve()?;
//!         Ok(url.into_bytes())
//!     })
//!     .build()
//!     .expect("Failed to build container");
//!
//! let bytes: Vec<u8> = container.resolve().expect("Failed to resolve");
//! assert_eq!(bytes, b"postgres://localhost");
//! ```

use std::any::{Any, type_name};
use std::fmt;

use tracing::trace;

use crate::error::{NotConstructibleError, Result, TazyinError};
use crate::key::ServiceKey;
use crate::registry::FactoryFn;
use crate::scope::ScopeCache;

/// Type-erased resolution capability.
///
/// Implemented by [`Container`](crate::container::Container),
/// [`ScopedContainer`](crate::container::ScopedContainer) and
/// [`ArgumentResolver`]. Use the typed methods of [`ResolverApi`] instead
/// of calling these directly.
pub trait Resolver: Send + Sync {
    /// Resolves a registered service, honoring its lifetime.
    fn resolve_key(&self, key: &ServiceKey) -> Result<Box<dyn Any + Send + Sync>>;

    /// Looks up the constructor registered for an implementation type.
    fn constructor(&self, key: &ServiceKey) -> Option<FactoryFn>;

    /// The instance cache of the scope this resolver belongs to.
    fn scope(&self) -> &ScopeCache;
}

/// Typed resolution on top of [`Resolver`].
pub trait ResolverApi {
    /// Resolves a registered service of type `T`.
    fn resolve<T: Send + Sync + 'static>(&self) -> Result<T>;

    /// Constructs `T` with its registered constructor.
    ///
    /// `T` does not need to be registered as a service; only
    /// `ContainerBuilder::constructor::<T>` is required. The constructor
    /// receives this resolver, so argument overlays stay visible to it.
    fn activate<T: Send + Sync + 'static>(&self) -> Result<T>;
}

impl<'r> ResolverApi for dyn Resolver + 'r {
    fn resolve<T: Send + Sync + 'static>(&self) -> Result<T> {
        let key = ServiceKey::of::<T>();
        trace!(key = %key, "Resolving");
        let boxed = self.resolve_key(&key)?;
        downcast(key, boxed)
    }

    fn activate<T: Send + Sync + 'static>(&self) -> Result<T> {
        let key = ServiceKey::of::<T>();
        let constructor = self.constructor(&key).ok_or_else(|| {
            TazyinError::NotConstructible(NotConstructibleError { key: key.clone() })
        })?;

        trace!(key = %key, "Activating");
        let boxed = constructor(self)?;
        downcast(key, boxed)
    }
}

pub(crate) fn downcast<T: 'static>(key: ServiceKey, boxed: Box<dyn Any + Send + Sync>) -> Result<T> {
    boxed.downcast::<T>().map(|b| *b).map_err(|_| TazyinError::ConstructionFailed {
        key,
        source: format!("Type mismatch: expected {}", type_name::<T>()).into(),
    })
}

/// A resolver that supplies one extra argument to a constructor.
///
/// Requests for `A` are answered with a clone of the supplied value;
/// everything else goes to the parent resolver. Decorator types use
/// this to receive the instance they wrap: the decorator's constructor
/// simply resolves the service type it decorates.
///
/// ```rust,ignore
/// let inner: Arc<dyn Greeter> = ...;
/// let overlay = ArgumentResolver::new(inner, resolver);
/// let decorator: LoudGreeter = (&overlay as &dyn Resolver).activate()?;
/// ```
pub struct ArgumentResolver<'a, A> {
    argument: A,
    parent: &'a dyn Resolver,
}

impl<'a, A> ArgumentResolver<'a, A>
where
    A: Clone + Send + Sync + 'static,
{
    pub fn new(argument: A, parent: &'a dyn Resolver) -> Self {
        Self { argument, parent }
    }
}

impl<A> Resolver for ArgumentResolver<'_, A>
where
    A: Clone + Send + Sync + 'static,
{
    fn resolve_key(&self, key: &ServiceKey) -> Result<Box<dyn Any + Send + Sync>> {
        if *key == ServiceKey::of::<A>() {
            trace!(key = %key, "Using supplied argument");
            return Ok(Box::new(self.argument.clone()));
        }
        self.parent.resolve_key(key)
    }

    fn constructor(&self, key: &ServiceKey) -> Option<FactoryFn> {
        self.parent.constructor(key)
    }

    fn scope(&self) -> &ScopeCache {
        self.parent.scope()
    }
}

impl<A> fmt::Debug for ArgumentResolver<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentResolver")
            .field("argument", &type_name::<A>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Container;

    #[derive(Clone)]
    struct Inner(&'static str);

    struct Wrapper {
        inner: Inner,
        suffix: String,
    }

    #[test]
    fn activate_uses_registered_constructor() {
        let container = Container::builder()
            .singleton_value(String::from("!"))
            .constructor::<Wrapper>(|r| {
                Ok(Wrapper {
                    inner: Inner("default"),
                    suffix: r.resolve()?,
                })
            })
            .build()
            .unwrap();

        let resolver: &dyn Resolver = &container;
        let wrapper: Wrapper = resolver.activate().unwrap();
        assert_eq!(wrapper.inner.0, "default");
        assert_eq!(wrapper.suffix, "!");
    }

    #[test]
    fn activate_without_constructor_fails() {
        let container = Container::builder().build().unwrap();
        let resolver: &dyn Resolver = &container;

        match resolver.activate::<Wrapper>() {
            Err(TazyinError::NotConstructible(err)) => {
                assert!(err.key.type_name().contains("Wrapper"));
            }
            Err(other) => panic!("Expected NotConstructible, got: {other:?}"),
            Ok(_) => panic!("Expected NotConstructible, got a value"),
        }
    }

    #[test]
    fn overlay_supplies_argument_to_constructor() {
        let container = Container::builder()
            .singleton_value(String::from("?"))
            .constructor::<Wrapper>(|r| {
                Ok(Wrapper {
                    inner: r.resolve()?,
                    suffix: r.resolve()?,
                })
            })
            .build()
            .unwrap();

        let overlay = ArgumentResolver::new(Inner("supplied"), &container);
        let resolver: &dyn Resolver = &overlay;
        let wrapper: Wrapper = resolver.activate().unwrap();

        assert_eq!(wrapper.inner.0, "supplied");
        assert_eq!(wrapper.suffix, "?");
    }

    #[test]
    fn overlay_delegates_missing_services() {
        let container = Container::builder().build().unwrap();
        let overlay = ArgumentResolver::new(Inner("x"), &container);
        let resolver: &dyn Resolver = &overlay;

        assert!(matches!(
            resolver.resolve::<u64>(),
            Err(TazyinError::NotRegistered(_))
        ));
    }
}

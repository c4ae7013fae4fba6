//! The decorating builder.
//!
//! A [`DecoratingBuilder<S>`] owns one composed factory for `S`. Adding a
//! decorator replaces that factory with a new one that runs the old factory
//! first and then the decorator on its output:
//!
//! ```text
//! base                          → f0 = r ↦ base(r)
//! .add_decorator(d1)            → f1 = r ↦ d1(f0(r), r)
//! .add_decorator(d2)            → f2 = r ↦ d2(f1(r), r)
//! build(r)                      = d2(d1(base(r), r), r)
//! ```
//!
//! Nothing runs until [`build`](DecoratingBuilder::build) is called, and
//! every `build` runs the whole chain again. Caching is the container's job,
//! driven by the registration's lifetime.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tazyin_container::error::Result;
use tazyin_container::key::ServiceKey;
use tazyin_container::resolver::{ArgumentResolver, Resolver, ResolverApi};
use tracing::{debug, trace};

/// A shared factory producing `S` from a resolver.
pub type ServiceFactory<S> = Arc<dyn Fn(&dyn Resolver) -> Result<S> + Send + Sync>;

struct Chain<S> {
    factory: ServiceFactory<S>,
    depth: usize,
}

/// Accumulates decorator layers around a base factory.
///
/// The handle returned by the registration helpers and the factory stored
/// in the container share one chain, so decorators added after registration
/// are seen by every later resolve. Add decorators while wiring the
/// application, before the first resolve.
pub struct DecoratingBuilder<S> {
    key: ServiceKey,
    chain: Arc<RwLock<Chain<S>>>,
}

impl<S: 'static> DecoratingBuilder<S> {
    /// Creates a builder around a base factory.
    pub fn new<F>(base: F) -> Self
    where
        F: Fn(&dyn Resolver) -> Result<S> + Send + Sync + 'static,
    {
        Self::from_factory(Arc::new(base))
    }

    /// Creates a builder around an existing shared factory, stored as-is.
    pub fn from_factory(base: ServiceFactory<S>) -> Self {
        Self {
            key: ServiceKey::of::<S>(),
            chain: Arc::new(RwLock::new(Chain {
                factory: base,
                depth: 0,
            })),
        }
    }

    /// Wraps the current chain in one more decorator.
    ///
    /// `decorator` receives the instance produced by everything added so
    /// far, plus the resolver. Neither the existing chain nor `decorator`
    /// is invoked here.
    pub fn add_decorator<F>(&mut self, decorator: F) -> &mut Self
    where
        F: Fn(S, &dyn Resolver) -> Result<S> + Send + Sync + 'static,
    {
        let depth = {
            let mut chain = self.chain.write();
            let inner = Arc::clone(&chain.factory);
            chain.factory =
                Arc::new(move |resolver: &dyn Resolver| decorator(inner(resolver)?, resolver));
            chain.depth += 1;
            chain.depth
        };

        debug!(service = %self.key, depth, "Decorator added");
        self
    }

    /// Adds a decorator that needs nothing from the resolver.
    pub fn add_decorator_fn<F>(&mut self, decorator: F) -> &mut Self
    where
        F: Fn(S) -> S + Send + Sync + 'static,
    {
        self.add_decorator(move |inner, _| Ok(decorator(inner)))
    }

    /// Runs the whole chain: base factory first, newest decorator last.
    ///
    /// Errors from any layer are returned unchanged.
    pub fn build(&self, resolver: &dyn Resolver) -> Result<S> {
        let factory = self.factory();
        trace!(service = %self.key, "Building decorated service");
        factory(resolver)
    }

    /// The current composed factory.
    ///
    /// Each decorator addition replaces it with a new `Arc`.
    pub fn factory(&self) -> ServiceFactory<S> {
        Arc::clone(&self.chain.read().factory)
    }

    /// Number of decorators added so far.
    pub fn depth(&self) -> usize {
        self.chain.read().depth
    }

    /// Key of the decorated service type.
    pub fn service_key(&self) -> &ServiceKey {
        &self.key
    }

    /// A second handle on the same chain, for the container's factory.
    pub(crate) fn share(&self) -> Self {
        Self {
            key: self.key.clone(),
            chain: Arc::clone(&self.chain),
        }
    }
}

impl<S> DecoratingBuilder<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Adds a decorator implementation type `D`, activated per build.
    ///
    /// `D` is constructed with the constructor registered through
    /// `ContainerBuilder::constructor::<D>`. While that constructor runs,
    /// resolving `S` yields the instance being decorated rather than
    /// the registered (decorated) service.
    ///
    /// ```rust,ignore
    /// let mut builder = Container::builder()
    ///     .constructor::<LoggingGreeter>(|r| {
    ///         Ok(LoggingGreeter { inner: r.resolve()?, prefix: r.resolve()? })
    ///     });
    ///
    /// builder
    ///     .register_decorated_transient_fn(|| Arc::new(Plain) as Arc<dyn Greeter>)?
    ///     .add_decorator_impl::<LoggingGreeter>();
    /// ```
    pub fn add_decorator_impl<D>(&mut self) -> &mut Self
    where
        D: Into<S> + Send + Sync + 'static,
    {
        self.add_decorator(|inner: S, resolver: &dyn Resolver| {
            let arguments = ArgumentResolver::new(inner, resolver);
            let decorator: D = (&arguments as &dyn Resolver).activate()?;
            Ok(decorator.into())
        })
    }
}

impl<S> fmt::Debug for DecoratingBuilder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoratingBuilder")
            .field("service", &self.key)
            .field("depth", &self.chain.read().depth)
            .finish()
    }
}

//! Decorated registrations.
//!
//! Every helper here adds exactly one [`ServiceDescriptor`] for `S` to the
//! registry and hands back the [`DecoratingBuilder<S>`] behind it. Decorators
//! added to that builder afterwards change what the registration produces,
//! never how many registrations exist.
//!
//! | helper                                   | base instance comes from                       |
//! |------------------------------------------|------------------------------------------------|
//! | `register_decorated[_<lifetime>]`        | a factory taking the resolver                  |
//! | `register_decorated[_<lifetime>]_fn`     | a factory taking nothing                       |
//! | `register_decorated[_<lifetime>]_impl`   | activating implementation type `I`, then `Into` |
//! | `register_decorated_singleton_value`     | an existing value                              |

use tazyin_container::error::{Result, TazyinError};
use tazyin_container::lifetime::Lifetime;
use tazyin_container::provider::ServiceRegistry;
use tazyin_container::registry::ServiceDescriptor;
use tazyin_container::resolver::{Resolver, ResolverApi};
use tracing::debug;

use crate::builder::DecoratingBuilder;

/// Decorated registration helpers for any [`ServiceRegistry`].
///
/// Implemented for every registry, including `dyn ServiceRegistry`, so
/// providers can use it too.
pub trait DecoratedRegistration: ServiceRegistry {
    /// Registers `S` with a resolver-aware base factory.
    ///
    /// `lifetime` may be a [`Lifetime`], or an `i32` / `&str` taken from
    /// configuration.
    ///
    /// # Errors
    /// - [`TazyinError::LifetimeOutOfRange`] if `lifetime` is not a
    ///   recognized value. Nothing is registered in that case.
    /// - Whatever the registry rejects the descriptor with (e.g.
    ///   [`TazyinError::AlreadyRegistered`]).
    fn register_decorated<S, L>(
        &mut self,
        lifetime: L,
        factory: impl Fn(&dyn Resolver) -> Result<S> + Send + Sync + 'static,
    ) -> Result<DecoratingBuilder<S>>
    where
        S: Clone + Send + Sync + 'static,
        L: TryInto<Lifetime>,
        TazyinError: From<L::Error>,
    {
        let lifetime = lifetime.try_into()?;
        let builder = DecoratingBuilder::new(factory);
        let registered = builder.share();

        self.register(ServiceDescriptor::new(
            lifetime,
            move |resolver: &dyn Resolver| registered.build(resolver),
        ))?;

        debug!(service = %builder.service_key(), lifetime = %lifetime, "Registered decorated service");
        Ok(builder)
    }

    /// Registers `S` with a base factory that needs no dependencies.
    fn register_decorated_fn<S, L>(
        &mut self,
        lifetime: L,
        factory: impl Fn() -> S + Send + Sync + 'static,
    ) -> Result<DecoratingBuilder<S>>
    where
        S: Clone + Send + Sync + 'static,
        L: TryInto<Lifetime>,
        TazyinError: From<L::Error>,
    {
        self.register_decorated(lifetime, move |_: &dyn Resolver| Ok(factory()))
    }

    /// Registers `S`, built by activating implementation type `I`.
    ///
    /// `I` needs a constructor (`ContainerBuilder::constructor::<I>`) and an
    /// `Into<S>` conversion, e.g. `impl From<EnglishGreeter> for Arc<dyn Greeter>`.
    fn register_decorated_impl<S, I, L>(&mut self, lifetime: L) -> Result<DecoratingBuilder<S>>
    where
        S: Clone + Send + Sync + 'static,
        I: Into<S> + Send + Sync + 'static,
        L: TryInto<Lifetime>,
        TazyinError: From<L::Error>,
    {
        self.register_decorated(lifetime, |resolver: &dyn Resolver| {
            Ok(resolver.activate::<I>()?.into())
        })
    }

    // ── Singleton ──

    fn register_decorated_singleton<S>(
        &mut self,
        factory: impl Fn(&dyn Resolver) -> Result<S> + Send + Sync + 'static,
    ) -> Result<DecoratingBuilder<S>>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.register_decorated(Lifetime::Singleton, factory)
    }

    fn register_decorated_singleton_fn<S>(
        &mut self,
        factory: impl Fn() -> S + Send + Sync + 'static,
    ) -> Result<DecoratingBuilder<S>>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.register_decorated_fn(Lifetime::Singleton, factory)
    }

    fn register_decorated_singleton_impl<S, I>(&mut self) -> Result<DecoratingBuilder<S>>
    where
        S: Clone + Send + Sync + 'static,
        I: Into<S> + Send + Sync + 'static,
    {
        self.register_decorated_impl::<S, I, _>(Lifetime::Singleton)
    }

    /// Registers an existing instance as the undecorated singleton.
    ///
    /// The decorator chain still runs, once, on first resolve.
    fn register_decorated_singleton_value<S>(&mut self, value: S) -> Result<DecoratingBuilder<S>>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.register_decorated(Lifetime::Singleton, move |_: &dyn Resolver| Ok(value.clone()))
    }

    // ── Scoped ──

    fn register_decorated_scoped<S>(
        &mut self,
        factory: impl Fn(&dyn Resolver) -> Result<S> + Send + Sync + 'static,
    ) -> Result<DecoratingBuilder<S>>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.register_decorated(Lifetime::Scoped, factory)
    }

    fn register_decorated_scoped_fn<S>(
        &mut self,
        factory: impl Fn() -> S + Send + Sync + 'static,
    ) -> Result<DecoratingBuilder<S>>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.register_decorated_fn(Lifetime::Scoped, factory)
    }

    fn register_decorated_scoped_impl<S, I>(&mut self) -> Result<DecoratingBuilder<S>>
    where
        S: Clone + Send + Sync + 'static,
        I: Into<S> + Send + Sync + 'static,
    {
        self.register_decorated_impl::<S, I, _>(Lifetime::Scoped)
    }

    // ── Transient ──

    fn register_decorated_transient<S>(
        &mut self,
        factory: impl Fn(&dyn Resolver) -> Result<S> + Send + Sync + 'static,
    ) -> Result<DecoratingBuilder<S>>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.register_decorated(Lifetime::Transient, factory)
    }

    fn register_decorated_transient_fn<S>(
        &mut self,
        factory: impl Fn() -> S + Send + Sync + 'static,
    ) -> Result<DecoratingBuilder<S>>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.register_decorated_fn(Lifetime::Transient, factory)
    }

    fn register_decorated_transient_impl<S, I>(&mut self) -> Result<DecoratingBuilder<S>>
    where
        S: Clone + Send + Sync + 'static,
        I: Into<S> + Send + Sync + 'static,
    {
        self.register_decorated_impl::<S, I, _>(Lifetime::Transient)
    }
}

impl<R: ServiceRegistry + ?Sized> DecoratedRegistration for R {}

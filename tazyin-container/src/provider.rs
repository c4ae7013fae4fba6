//! Registration seam and provider modules.
//!
//! [`ServiceRegistry`] is the only thing registration helpers need from a
//! container: a place to put descriptors and constructors. The
//! [`ContainerBuilder`](crate::container::ContainerBuilder) implements it,
//! and so can test doubles.
//!
//! A [`Provider`] groups related registrations:
//!
//! ```rust,ignore
//! struct GreetingProvider;
//!
//! impl Provider for GreetingProvider {
//!     fn register(&self, registry: &mut dyn ServiceRegistry) -> Result<()> {
//!         registry.register(ServiceDescriptor::singleton(|_| {
//!             Ok(Arc::new(EnglishGreeter) as Arc<dyn Greeter>)
//!         }))
//!     }
//! }
//! ```

use crate::error::Result;
use crate::key::ServiceKey;
use crate::registry::{FactoryFn, ServiceDescriptor};

/// Where registrations go.
pub trait ServiceRegistry {
    /// Adds one service registration.
    ///
    /// # Errors
    /// Implementations may reject duplicates with
    /// [`TazyinError::AlreadyRegistered`](crate::error::TazyinError::AlreadyRegistered).
    fn register(&mut self, descriptor: ServiceDescriptor) -> Result<()>;

    /// Adds the constructor used to activate an implementation type.
    fn register_constructor(&mut self, key: ServiceKey, constructor: FactoryFn);
}

/// A module that registers related services.
///
/// Split registrations by concern instead of keeping one giant block:
///
/// ```rust,ignore
/// let container = Container::builder()
///     .add_provider(&DatabaseProvider)
///     .add_provider(&GreetingProvider)
///     .build()?;
/// ```
pub trait Provider: Send + Sync {
    /// Registers this module's services.
    ///
    /// Called once, while the container is being built.
    fn register(&self, registry: &mut dyn ServiceRegistry) -> Result<()>;

    /// Human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

//! # Tazyin Decorator
//!
//! Decorator chaining for the Tazyin container.
//!
//! Register a service once, then wrap it in any number of decorator
//! layers. Each layer receives the instance built so far plus a resolver
//! for its own dependencies:
//!
//! ```rust
//! use std::sync::Arc;
//! use tazyin_container::prelude::*;
//! use tazyin_decorator::DecoratedRegistration;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct Plain;
//! impl Greeter for Plain {
//!     fn greet(&self) -> String { "hello".into() }
//! }
//!
//! struct Loud(Arc<dyn Greeter>);
//! impl Greeter for Loud {
//!     fn greet(&self) -> String { self.0.greet().to_uppercase() }
//! }
//!
//! let mut builder = Container::builder();
//! builder
//!     .register_decorated_singleton_fn(|| Arc::new(Plain) as Arc<dyn Greeter>)
//!     .expect("register")
//!     .add_decorator_fn(|inner| Arc::new(Loud(inner)) as Arc<dyn Greeter>);
//!
//! let container = builder.build().expect("build");
//! let greeter: Arc<dyn Greeter> = container.resolve().expect("resolve");
//! assert_eq!(greeter.greet(), "HELLO");
//! ```

pub mod builder;
pub mod registration;

pub use builder::{DecoratingBuilder, ServiceFactory};
pub use registration::DecoratedRegistration;

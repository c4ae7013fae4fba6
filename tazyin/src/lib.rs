//! # Tazyin: decorator chaining for dependency injection
//!
//! Register a service, then wrap it in decorator layers, each of which gets
//! the instance built so far plus a resolver for its own dependencies. The
//! whole chain is stored as one registration with a singleton, scoped or
//! transient lifetime.
//!
//! ```rust
//! use std::sync::Arc;
//! use tazyin::prelude::*;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self, name: &str) -> String;
//! }
//!
//! struct Plain;
//! impl Greeter for Plain {
//!     fn greet(&self, name: &str) -> String { format!("hello {name}") }
//! }
//!
//! struct Suffixed {
//!     inner: Arc<dyn Greeter>,
//!     suffix: String,
//! }
//! impl Greeter for Suffixed {
//!     fn greet(&self, name: &str) -> String {
//!         format!("{}{}", self.inner.greet(name), self.suffix)
//!     }
//! }
//!
//! let mut builder = Container::builder().singleton_value(String::from("!"));
//! builder
//!     .register_decorated_transient_fn(|| Arc::new(Plain) as Arc<dyn Greeter>)
//!     .expect("register")
//!     .add_decorator(|inner, r| {
//!         Ok(Arc::new(Suffixed { inner, suffix: r.resolve()? }) as Arc<dyn Greeter>)
//!     });
//!
//! let container = builder.build().expect("build");
//! let greeter: Arc<dyn Greeter> = container.resolve().expect("resolve");
//! assert_eq!(greeter.greet("tazyin"), "hello tazyin!");
//! ```

pub use tazyin_container::*;
pub use tazyin_decorator::*;
pub use tazyin_support::*;

pub mod prelude {
    pub use tazyin_container::prelude::*;
    pub use tazyin_decorator::{DecoratedRegistration, DecoratingBuilder};
}

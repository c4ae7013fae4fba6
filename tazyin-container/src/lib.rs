//! Core container implementation for Tazyin.

pub mod container;
pub mod error;
pub mod key;
pub mod lifetime;
pub mod provider;
pub mod registry;
pub mod resolver;
pub mod scope;

pub use container::prelude;
pub use error::{Result, TazyinError};
pub use key::ServiceKey;
pub use lifetime::Lifetime;

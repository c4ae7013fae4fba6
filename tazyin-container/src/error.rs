//! Error types for Tazyin operations.
//!
//! Configuration errors (bad lifetime values, duplicate registrations)
//! surface where the bad value was introduced. Resolution errors raised by
//! user factories or decorators travel back to the caller untouched.

use std::convert::Infallible;
use std::fmt;

use crate::key::ServiceKey;

/// Main error type for all Tazyin operations.
#[derive(Debug, thiserror::Error)]
pub enum TazyinError {
    /// Requested service was never registered.
    #[error("{}", .0)]
    NotRegistered(NotRegisteredError),

    /// Activation was requested for a type without a constructor.
    #[error("{}", .0)]
    NotConstructible(NotConstructibleError),

    /// A lifetime value outside the recognized set.
    #[error("{}", .0)]
    LifetimeOutOfRange(LifetimeOutOfRangeError),

    /// Service was already registered (when override is disabled).
    #[error("{}", .0)]
    AlreadyRegistered(AlreadyRegisteredError),

    /// A factory failed or produced the wrong type.
    #[error("Failed to construct {key}: {source}")]
    ConstructionFailed {
        key: ServiceKey,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl TazyinError {
    /// Wraps an application error raised while constructing `T`.
    ///
    /// ```rust,ignore
    /// builder.transient_with::<Config>(|_| {
    ///     Config::load().map_err(TazyinError::construction::<Config>)
    /// })
    /// ```
    pub fn construction<T: ?Sized + 'static>(
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        TazyinError::ConstructionFailed {
            key: ServiceKey::of::<T>(),
            source: source.into(),
        }
    }
}

// Lets a typed `Lifetime` go through the same `TryInto<Lifetime>` path
// as the fallible `i32` and `&str` inputs.
impl From<Infallible> for TazyinError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Error when a service was not registered.
#[derive(Debug)]
pub struct NotRegisteredError {
    /// The service that was requested
    pub requested: ServiceKey,
    /// Registered types with similar names
    pub suggestions: Vec<&'static str>,
}

impl fmt::Display for NotRegisteredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Service not registered: {}", self.requested)?;

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        write!(
            f,
            "\n  Hint: Did you forget to register {}?",
            self.requested.type_name()
        )
    }
}

/// Error when a type has no registered constructor.
#[derive(Debug)]
pub struct NotConstructibleError {
    pub key: ServiceKey,
}

impl fmt::Display for NotConstructibleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No constructor registered for {}", self.key)?;
        write!(
            f,
            "\n  Hint: Call .constructor::<{}>(..) on the container builder",
            self.key.short_name()
        )
    }
}

/// Error when a lifetime value is not one of the recognized lifetimes.
#[derive(Debug)]
pub struct LifetimeOutOfRangeError {
    /// The rejected input, as text
    pub value: String,
}

impl fmt::Display for LifetimeOutOfRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lifetime out of range: {:?}", self.value)?;
        write!(
            f,
            "\n  Hint: Expected singleton (0), scoped (1) or transient (2)"
        )
    }
}

/// Error when trying to register a service that already exists.
#[derive(Debug)]
pub struct AlreadyRegisteredError {
    pub key: ServiceKey,
}

impl fmt::Display for AlreadyRegisteredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Service already registered: {}", self.key)?;
        write!(
            f,
            "\n  Hint: Add decorators to the existing registration, or enable allow_override"
        )
    }
}

/// Convenient Result type for Tazyin operations.
pub type Result<T> = std::result::Result<T, TazyinError>;

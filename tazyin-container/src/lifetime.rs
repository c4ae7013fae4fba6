//! Service lifetimes.
//!
//! A lifetime decides how often a registered factory runs:
//! - [`Lifetime::Singleton`]: once for the whole container
//! - [`Lifetime::Scoped`]: once per scope (e.g., per request)
//! - [`Lifetime::Transient`]: on every resolve
//!
//! # Ordering
//! Lifetimes are ordered by longevity: `Singleton > Scoped > Transient`.
//!
//! # Configuration
//! Lifetimes can come from configuration. They deserialize from the
//! lowercase names and convert from `&str` (any case) or from the numeric
//! values `0 | 1 | 2`. Anything else is rejected with
//! [`TazyinError::LifetimeOutOfRange`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LifetimeOutOfRangeError, TazyinError};

/// Defines how long a resolved service lives.
///
/// # Examples
/// ```
/// use tazyin_container::lifetime::Lifetime;
///
/// assert!(Lifetime::Singleton > Lifetime::Scoped);
/// assert_eq!(Lifetime::try_from("Transient").unwrap(), Lifetime::Transient);
/// assert!(Lifetime::try_from(7).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifetime {
    /// One instance for the lifetime of the container.
    ///
    /// The factory (and the whole decorator chain) runs on first resolve;
    /// later resolves return clones of the cached value.
    Singleton,

    /// One instance per scope.
    ///
    /// The root container acts as its own scope.
    Scoped,

    /// A fresh instance on every resolve. Never cached.
    Transient,
}

impl Lifetime {
    /// Every recognized lifetime, longest-lived first.
    pub const ALL: [Lifetime; 3] = [Lifetime::Singleton, Lifetime::Scoped, Lifetime::Transient];

    /// Returns `true` if resolved instances are cached.
    #[inline]
    pub fn is_cached(&self) -> bool {
        matches!(self, Lifetime::Singleton | Lifetime::Scoped)
    }

    /// Numeric value used by the `i32` conversion.
    #[inline]
    pub fn as_i32(&self) -> i32 {
        match self {
            Lifetime::Singleton => 0,
            Lifetime::Scoped => 1,
            Lifetime::Transient => 2,
        }
    }

    #[inline]
    fn longevity(&self) -> u8 {
        match self {
            Lifetime::Singleton => 2,
            Lifetime::Scoped => 1,
            Lifetime::Transient => 0,
        }
    }
}

impl PartialOrd for Lifetime {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Lifetime {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.longevity().cmp(&other.longevity())
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifetime::Singleton => write!(f, "Singleton"),
            Lifetime::Scoped => write!(f, "Scoped"),
            Lifetime::Transient => write!(f, "Transient"),
        }
    }
}

impl TryFrom<i32> for Lifetime {
    type Error = TazyinError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Lifetime::ALL
            .into_iter()
            .find(|lifetime| lifetime.as_i32() == value)
            .ok_or_else(|| out_of_range(value.to_string()))
    }
}

impl TryFrom<&str> for Lifetime {
    type Error = TazyinError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for Lifetime {
    type Err = TazyinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Lifetime::ALL
            .into_iter()
            .find(|lifetime| lifetime.to_string().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| out_of_range(s.to_string()))
    }
}

fn out_of_range(value: String) -> TazyinError {
    TazyinError::LifetimeOutOfRange(LifetimeOutOfRangeError { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifetime_ordering() {
        assert!(Lifetime::Singleton > Lifetime::Scoped);
        assert!(Lifetime::Scoped > Lifetime::Transient);
        assert!(Lifetime::Singleton > Lifetime::Transient);
    }

    #[test]
    fn lifetime_is_cached() {
        assert!(Lifetime::Singleton.is_cached());
        assert!(Lifetime::Scoped.is_cached());
        assert!(!Lifetime::Transient.is_cached());
    }

    #[test]
    fn lifetime_display() {
        assert_eq!(Lifetime::Singleton.to_string(), "Singleton");
        assert_eq!(Lifetime::Scoped.to_string(), "Scoped");
        assert_eq!(Lifetime::Transient.to_string(), "Transient");
    }

    #[test]
    fn from_recognized_numbers() {
        for lifetime in Lifetime::ALL {
            assert_eq!(Lifetime::try_from(lifetime.as_i32()).unwrap(), lifetime);
        }
    }

    #[test]
    fn undefined_number_is_out_of_range() {
        match Lifetime::try_from(-12345) {
            Err(TazyinError::LifetimeOutOfRange(err)) => assert_eq!(err.value, "-12345"),
            other => panic!("Expected LifetimeOutOfRange, got: {other:?}"),
        }
    }

    #[test]
    fn parse_names_any_case() {
        assert_eq!("singleton".parse::<Lifetime>().unwrap(), Lifetime::Singleton);
        assert_eq!(" SCOPED ".parse::<Lifetime>().unwrap(), Lifetime::Scoped);
        assert_eq!(Lifetime::try_from("Transient").unwrap(), Lifetime::Transient);
    }

    #[test]
    fn unknown_name_is_out_of_range() {
        assert!(matches!(
            "request".parse::<Lifetime>(),
            Err(TazyinError::LifetimeOutOfRange(_))
        ));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Lifetime::Scoped).unwrap();
        assert_eq!(json, "\"scoped\"");

        let parsed: Lifetime = serde_json::from_str("\"transient\"").unwrap();
        assert_eq!(parsed, Lifetime::Transient);

        assert!(serde_json::from_str::<Lifetime>("\"forever\"").is_err());
    }
}

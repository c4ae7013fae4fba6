//! Service identification keys.
//!
//! [`ServiceKey`] identifies a registration within the container.
//! It wraps the [`TypeId`] of the service type and keeps the
//! type name around for diagnostics.

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

use tazyin_support::rendering::shorten_type_name;

/// Uniquely identifies a service in the container.
///
/// Services are keyed by their Rust type. Decorated services are
/// usually trait objects behind an `Arc`, so the key of
/// `Arc<dyn Greeter>` differs from the key of the concrete `Greeter`
/// implementation.
///
/// # Examples
/// ```
/// use tazyin_container::key::ServiceKey;
///
/// let key = ServiceKey::of::<String>();
/// assert_eq!(key.type_name(), "alloc::string::String");
/// assert_eq!(key.short_name(), "String");
/// ```
#[derive(Clone)]
pub struct ServiceKey {
    type_id: TypeId,
    type_name: &'static str,
}

impl ServiceKey {
    /// Creates the key for type `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    /// Returns the [`TypeId`] of this service.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the fully qualified type name.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the type name with module paths stripped.
    pub fn short_name(&self) -> String {
        shorten_type_name(self.type_name)
    }
}

// Equality and hashing ignore the name: TypeId alone is the identity.
impl PartialEq for ServiceKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ServiceKey {}

impl Hash for ServiceKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceKey({})", self.type_name)
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    trait Greeter {}
    struct EnglishGreeter;

    #[test]
    fn key_of_type() {
        let key = ServiceKey::of::<EnglishGreeter>();
        assert!(key.type_name().contains("EnglishGreeter"));
        assert_eq!(key.short_name(), "EnglishGreeter");
    }

    #[test]
    fn same_type_equal() {
        assert_eq!(ServiceKey::of::<String>(), ServiceKey::of::<String>());
    }

    #[test]
    fn trait_object_differs_from_implementation() {
        assert_ne!(
            ServiceKey::of::<Arc<dyn Greeter>>(),
            ServiceKey::of::<Arc<EnglishGreeter>>()
        );
    }

    #[test]
    fn display_uses_short_name() {
        let key = ServiceKey::of::<Arc<dyn Greeter>>();
        assert_eq!(key.to_string(), "Arc<dyn Greeter>");
    }

    #[test]
    fn key_in_hashmap() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ServiceKey::of::<String>(), "string");
        map.insert(ServiceKey::of::<u32>(), "u32");
        assert_eq!(map.get(&ServiceKey::of::<String>()), Some(&"string"));
        assert_eq!(map.get(&ServiceKey::of::<bool>()), None);
    }
}

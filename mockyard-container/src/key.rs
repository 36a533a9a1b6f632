//! Service identification keys.
//!
//! [`ServiceKey`] uniquely identifies a service within the container.
//! It pairs a [`TypeId`] with the human-readable type name used in
//! error output.

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

use mockyard_support::rendering::shorten_type_name;

/// Uniquely identifies a service in the container.
///
/// Each service is identified by the Rust type under which it is
/// registered and resolved. Trait-object services are keyed by their
/// handle type, e.g. `Arc<dyn Greeter>`.
///
/// # Examples
/// ```
/// use mockyard_container::key::ServiceKey;
///
/// let key = ServiceKey::of::<String>();
/// assert_eq!(key.type_name(), "alloc::string::String");
/// ```
#[derive(Clone)]
pub struct ServiceKey {
    type_id: TypeId,
    type_name: &'static str,
}

impl ServiceKey {
    /// Creates a key for type `T`.
    ///
    /// # Examples
    /// ```
    /// use mockyard_container::key::ServiceKey;
    ///
    /// let key = ServiceKey::of::<i32>();
    /// ```
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    /// Creates a key from a raw [`TypeId`] and type name.
    ///
    /// Prefer [`ServiceKey::of`] when possible — this exists for
    /// registration tables that carry the pieces separately.
    #[inline]
    pub fn from_raw(type_id: TypeId, type_name: &'static str) -> Self {
        Self { type_id, type_name }
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
    ///
    /// Used in error messages: `Arc<dyn my_app::Greeter>` reads better
    /// than its five-segment qualified form.
    pub fn short_name(&self) -> String {
        shorten_type_name(self.type_name)
    }
}

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
        write!(f, "{}", self.short_name())
    }
}

//! Service lifecycle scopes.
//!
//! Scopes determine how long a resolved service lives:
//! - [`Scope::Container`] — one instance per owning container
//! - [`Scope::Transient`] — new instance every time
//!
//! There is no application-wide singleton scope. A container is the
//! widest lifetime mockyard knows about: a fresh container always
//! starts with fresh instances, which is exactly what one test case
//! wants from another.

use std::fmt;

/// Defines the lifetime of a service within the container.
///
/// # Examples
/// ```
/// use mockyard_container::scope::Scope;
///
/// assert!(Scope::Container.is_cached());
/// assert!(!Scope::Transient.is_cached());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// One instance shared for the lifetime of the owning container.
    ///
    /// Created on first resolve, reused by every later resolve against
    /// the same container, dropped when the container is disposed.
    ///
    /// # When to use
    /// - Mock objects (one mock per interface per test)
    /// - The class under test and its collaborators
    Container,

    /// New instance created on every resolve call.
    ///
    /// Never cached. Each `resolve()` runs the factory again.
    ///
    /// # When to use
    /// - Lightweight stateless values
    /// - Objects with mutable state that must not leak between
    ///   resolutions
    Transient,
}

impl Scope {
    /// Returns `true` if this scope caches instances.
    #[inline]
    pub fn is_cached(&self) -> bool {
        matches!(self, Scope::Container)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Container => write!(f, "Container"),
            Scope::Transient => write!(f, "Transient"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_equality() {
        assert_eq!(Scope::Container, Scope::Container);
        assert_ne!(Scope::Container, Scope::Transient);
    }

    #[test]
    fn scope_is_cached() {
        assert!(Scope::Container.is_cached());
        assert!(!Scope::Transient.is_cached());
    }

    #[test]
    fn scope_display() {
        assert_eq!(format!("{}", Scope::Container), "Container");
        assert_eq!(format!("{}", Scope::Transient), "Transient");
    }
}

//! Fallback registration sources.
//!
//! A [`RegistrationSource`] is a resolution strategy the container
//! consults only after its registration table misses. Sources are kept
//! in an explicit ordered list and tried first-to-last; the first one
//! to return a registration wins, and the produced registration is
//! cached in the table so later requests for the same key never reach
//! the sources again.
//!
//! # Examples
//! ```rust,ignore
//! struct AutoMockSource { /* ... */ }
//!
//! impl RegistrationSource for AutoMockSource {
//!     fn registration_for(&self, key: &ServiceKey) -> Option<Registration> {
//!         let entry = mock_table_lookup(key.type_id())?;
//!         Some(entry.just_in_time_registration(key.clone()))
//!     }
//! }
//! ```

use crate::key::ServiceKey;
use crate::registry::Registration;

/// A resolution strategy consulted when no explicit registration
/// satisfies a request.
///
/// Implementations must behave as pure functions of the key: the
/// container may consult a source any number of times, and whether a
/// produced registration is used or raced out by a concurrent insert
/// is the container's business.
pub trait RegistrationSource: Send + Sync {
    /// Returns a just-in-time registration for `key`, or `None` to
    /// decline the request.
    fn registration_for(&self, key: &ServiceKey) -> Option<Registration>;

    /// Optional: human-readable name for log output.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

//! Error types for mock construction and verification.

use std::fmt;

/// An expected interaction that never occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmetExpectation {
    /// The mocked trait the member belongs to.
    pub trait_name: &'static str,
    /// The member that was never exercised.
    pub method: &'static str,
}

impl fmt::Display for UnmetExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.trait_name, self.method)
    }
}

/// Verification failed: one or more expected interactions never
/// occurred across the factory's mocks.
///
/// Raised at disposal time, after container teardown has been
/// guaranteed — a failed verification never leaks instances.
#[derive(Debug)]
pub struct VerificationError {
    pub unmet: Vec<UnmetExpectation>,
}

impl std::error::Error for VerificationError {}

impl fmt::Display for VerificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Verification failed: {} expected interaction(s) never occurred:",
            self.unmet.len()
        )?;
        for unmet in &self.unmet {
            write!(f, "\n    - {unmet}")?;
        }
        write!(
            f,
            "\n  Hint: Exercise the member through the resolved service, or \
             drop the stub if the interaction is not expected in this test"
        )
    }
}

/// Failure while building a mock object.
#[derive(Debug, thiserror::Error)]
pub enum DoubleError {
    /// The constructed mock object could not be recovered as the
    /// requested service type.
    #[error(
        "Mock object is not a {expected}\n  \
         Hint: The mock registration's service type must match the type \
         the mock struct is erased as"
    )]
    ObjectType { expected: &'static str },
}

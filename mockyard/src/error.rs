//! Error type of the facade.

use mockyard_container::{ContainerError, ServiceKey};
use mockyard_double::VerificationError;

/// Errors surfaced by [`AutoMocker`](crate::AutoMocker) operations.
#[derive(Debug, thiserror::Error)]
pub enum MockerError {
    /// The underlying container refused the operation: unresolvable
    /// type, duplicate registration, construction failure, or the
    /// container was already disposed.
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// The service resolved, but to something the mock factory never
    /// built — there is no mock-control handle to hand out.
    #[error(
        "Resolved instance of {key} is not mock-backed\n  \
         Hint: {key} has an explicit registration; resolve() the real \
         service instead, or drop the explicit registration to get the \
         auto-mock back"
    )]
    NotMockBacked { key: ServiceKey },

    /// Disposal-time verification failed. The container was torn down
    /// regardless; nothing leaks.
    #[error(transparent)]
    Verification(#[from] VerificationError),
}

/// Convenient Result type for facade operations.
pub type Result<T> = std::result::Result<T, MockerError>;

//! Error types for container operations.
//!
//! Every failure carries the service key it concerns and renders with
//! enough context to act on. Nothing is swallowed or downgraded: each
//! error is a hard stop surfaced to the immediate caller.

use crate::key::ServiceKey;
use std::fmt;

/// Main error type for all container operations.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// Requested service was never registered and no fallback source
    /// could supply it.
    #[error("{}", .0)]
    NotRegistered(NotRegisteredError),

    /// Factory returned an error during construction.
    #[error("Failed to construct {key}: {source}")]
    ConstructionFailed {
        key: ServiceKey,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Service was already registered (when override was not requested).
    #[error("{}", .0)]
    AlreadyRegistered(AlreadyRegisteredError),

    /// The container has been disposed; its registrations and instances
    /// are gone.
    #[error(
        "Container is disposed: cannot resolve {requested}\n  \
         Hint: The owning test rig has been torn down. Keep the rig alive \
         for the duration of the test case"
    )]
    Disposed { requested: ServiceKey },
}

impl ContainerError {
    /// Wraps an arbitrary construction failure for `key`.
    pub fn construction(
        key: ServiceKey,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ContainerError::ConstructionFailed {
            key,
            source: Box::new(source),
        }
    }
}

/// Error when a service was not registered.
///
/// Includes "did you mean?" suggestions against the registered keys.
#[derive(Debug)]
pub struct NotRegisteredError {
    /// The service that was requested
    pub requested: ServiceKey,
    /// Similar types that ARE registered
    pub suggestions: Vec<String>,
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
            "\n  Hint: Concrete types are never auto-mocked. Register {} \
             explicitly, or declare a mock double for the trait it stands in for",
            self.requested.short_name()
        )
    }
}

/// Error when registering a service that already exists.
#[derive(Debug)]
pub struct AlreadyRegisteredError {
    pub key: ServiceKey,
}

impl fmt::Display for AlreadyRegisteredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Service already registered: {}", self.key)?;
        write!(
            f,
            "\n  Hint: Use the replace_* registration methods to override \
             an existing registration deliberately"
        )
    }
}

/// Convenient Result type for container operations.
pub type Result<T> = std::result::Result<T, ContainerError>;

//! The auto-mock registration source.
//!
//! This is the hook that turns a resolution failure into a mock: the
//! container consults it only after its registration table misses, and
//! it answers for exactly the service types present in the mockable
//! table. Everything else — concrete types above all — is declined so
//! the container can report an honest `NotRegistered`.

use std::sync::Arc;

use tracing::{debug, trace};

use mockyard_container::ServiceKey;
use mockyard_container::registry::Registration;
use mockyard_container::source::RegistrationSource;
use mockyard_double::MockFactory;

use crate::table;

/// Fallback provider that synthesizes mock-backed registrations on
/// demand.
///
/// The registrations it produces are per-container scoped: the
/// container caches them in its table, so one interface is mocked at
/// most once per container and every later resolve returns the same
/// instance.
pub struct AutoMockSource {
    factory: Arc<MockFactory>,
}

impl AutoMockSource {
    /// Creates a source that builds mocks through `factory`.
    pub fn new(factory: Arc<MockFactory>) -> Self {
        Self { factory }
    }
}

impl RegistrationSource for AutoMockSource {
    fn registration_for(&self, key: &ServiceKey) -> Option<Registration> {
        let Some(entry) = table::entry_for(key.type_id()) else {
            // Not a registered mockable trait: decline and let the
            // container fail the lookup.
            trace!(key = %key, "Declining non-mockable type");
            return None;
        };

        debug!(key = %key, mock = entry.trait_name(), "Synthesizing mock registration");
        Some(entry.registration(key.clone(), Arc::clone(&self.factory)))
    }

    fn name(&self) -> &str {
        "AutoMockSource"
    }
}

impl std::fmt::Debug for AutoMockSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoMockSource")
            .field("behavior", &self.factory.behavior())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Behavior, Double, MockControl, register_mock};

    trait SourceProbe: Send + Sync {
        fn poke(&self) -> u32;
    }

    struct MockSourceProbe {
        control: MockControl,
    }

    impl Double for MockSourceProbe {
        fn with_behavior(behavior: Behavior) -> Self {
            Self {
                control: MockControl::new("SourceProbe", behavior),
            }
        }

        fn control(&self) -> &MockControl {
            &self.control
        }
    }

    impl SourceProbe for MockSourceProbe {
        fn poke(&self) -> u32 {
            self.control.invoke("poke", (), || 0)
        }
    }

    register_mock!(Arc<dyn SourceProbe> => MockSourceProbe, "SourceProbe");

    fn source() -> AutoMockSource {
        AutoMockSource::new(Arc::new(MockFactory::new(Behavior::Loose)))
    }

    #[test]
    fn supplies_registration_for_mockable_trait() {
        let registration = source().registration_for(&ServiceKey::of::<Arc<dyn SourceProbe>>());
        assert!(registration.is_some());
    }

    #[test]
    fn declines_concrete_types() {
        struct PlainService;
        assert!(source()
            .registration_for(&ServiceKey::of::<PlainService>())
            .is_none());
        assert!(source()
            .registration_for(&ServiceKey::of::<Arc<PlainService>>())
            .is_none());
    }

    #[test]
    fn source_name_for_logs() {
        assert_eq!(source().name(), "AutoMockSource");
    }
}

//! The mock factory.
//!
//! One [`MockFactory`] lives per test rig. It builds every mock under
//! a single behavior mode fixed at construction, keeps a ledger of the
//! controls it has handed out (keyed by the service type the mock was
//! built for), and answers verification queries over all of them at
//! once.

use std::any::TypeId;
use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::debug;

use crate::behavior::Behavior;
use crate::control::{MockControl, VerifyMode};
use crate::double::Double;
use crate::error::VerificationError;
use crate::handle::MockHandle;

/// Builds and tracks mock doubles under one behavior mode.
pub struct MockFactory {
    behavior: Behavior,
    ledger: Mutex<HashMap<TypeId, MockControl>>,
}

impl MockFactory {
    /// Creates a factory whose mocks all use `behavior`.
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            ledger: Mutex::new(HashMap::new()),
        }
    }

    /// The behavior mode of every mock this factory builds.
    ///
    /// Immutable for the lifetime of the factory.
    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    /// Builds a double under the factory's behavior mode.
    ///
    /// Building alone does not enter the ledger; call
    /// [`MockFactory::adopt`] once the double is paired with the
    /// service type it stands in for.
    pub fn build<M: Double>(&self) -> M {
        M::with_behavior(self.behavior)
    }

    /// Records the control of a freshly built mock under the service
    /// type it satisfies, so a later request for "the control of
    /// service T" finds the paired control rather than re-mocking.
    pub fn adopt(&self, service: TypeId, handle: &MockHandle) {
        let control = handle.control().clone();
        debug!(mock = control.trait_name(), "Adopting mock into ledger");
        self.ledger.lock().insert(service, control);
    }

    /// The control paired with service type `service`, if this factory
    /// built a mock for it.
    pub fn control_for(&self, service: TypeId) -> Option<MockControl> {
        self.ledger.lock().get(&service).cloned()
    }

    /// Removes the control paired with `service`, returning it if one
    /// was adopted.
    ///
    /// Called when an explicit registration replaces a synthesized
    /// mock: the evicted control no longer describes what `service`
    /// resolves to, and an evicted mock is excluded from verification.
    pub fn evict(&self, service: TypeId) -> Option<MockControl> {
        let evicted = self.ledger.lock().remove(&service);
        if let Some(control) = &evicted {
            debug!(mock = control.trait_name(), "Evicting mock from ledger");
        }
        evicted
    }

    /// Number of mocks adopted so far.
    pub fn mock_count(&self) -> usize {
        self.ledger.lock().len()
    }

    /// Full verification: every stubbed-or-required member of every
    /// adopted mock must have been exercised.
    pub fn verify_all(&self) -> Result<(), VerificationError> {
        self.verify(VerifyMode::All)
    }

    /// Default verification: only members explicitly marked required
    /// must have been exercised.
    pub fn verify_required(&self) -> Result<(), VerificationError> {
        self.verify(VerifyMode::Required)
    }

    fn verify(&self, mode: VerifyMode) -> Result<(), VerificationError> {
        let controls: Vec<MockControl> = self.ledger.lock().values().cloned().collect();

        let mut unmet: Vec<_> = controls
            .iter()
            .flat_map(|control| control.verify(mode))
            .collect();
        unmet.sort_by_key(|u| (u.trait_name, u.method));

        if unmet.is_empty() {
            Ok(())
        } else {
            Err(VerificationError { unmet })
        }
    }
}

impl std::fmt::Debug for MockFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockFactory")
            .field("behavior", &self.behavior)
            .field("mocks", &self.mock_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    trait Beeper: Send + Sync {
        fn beep(&self) -> u32;
    }

    struct MockBeeper {
        control: MockControl,
    }

    impl Double for MockBeeper {
        fn with_behavior(behavior: Behavior) -> Self {
            Self {
                control: MockControl::new("Beeper", behavior),
            }
        }

        fn control(&self) -> &MockControl {
            &self.control
        }
    }

    impl Beeper for MockBeeper {
        fn beep(&self) -> u32 {
            self.control.invoke("beep", (), || 0)
        }
    }

    fn adopt_beeper(factory: &MockFactory) -> Arc<dyn Beeper> {
        let mock: MockBeeper = factory.build();
        let control = mock.control().clone();
        let handle = MockHandle::new(Arc::new(mock) as Arc<dyn Beeper>, control);
        factory.adopt(TypeId::of::<Arc<dyn Beeper>>(), &handle);
        handle.into_object().unwrap()
    }

    #[test]
    fn build_uses_factory_behavior() {
        let factory = MockFactory::new(Behavior::Strict);
        let mock: MockBeeper = factory.build();
        assert_eq!(mock.control().behavior(), Behavior::Strict);
    }

    #[test]
    fn adopted_control_is_retrievable_by_service_type() {
        let factory = MockFactory::new(Behavior::Loose);
        let beeper = adopt_beeper(&factory);

        let control = factory
            .control_for(TypeId::of::<Arc<dyn Beeper>>())
            .expect("adopted above");

        // The ledger control and the resolved object share state.
        control.returns::<(), u32>("beep", 7);
        assert_eq!(beeper.beep(), 7);
        assert_eq!(control.call_count("beep"), 1);
    }

    #[test]
    fn unknown_service_has_no_control() {
        let factory = MockFactory::new(Behavior::Loose);
        assert!(factory.control_for(TypeId::of::<Arc<String>>()).is_none());
        assert_eq!(factory.mock_count(), 0);
    }

    #[test]
    fn verify_required_passes_with_no_requirements() {
        let factory = MockFactory::new(Behavior::Loose);
        let _beeper = adopt_beeper(&factory);

        assert!(factory.verify_required().is_ok());
    }

    #[test]
    fn verify_all_reports_unexercised_stub() {
        let factory = MockFactory::new(Behavior::Loose);
        let _beeper = adopt_beeper(&factory);

        factory
            .control_for(TypeId::of::<Arc<dyn Beeper>>())
            .unwrap()
            .returns::<(), u32>("beep", 1);

        let err = factory.verify_all().unwrap_err();
        assert_eq!(err.unmet.len(), 1);
        assert_eq!(err.unmet[0].method, "beep");

        // verify_required still passes: nothing was marked required.
        assert!(factory.verify_required().is_ok());
    }

    #[test]
    fn evicted_mock_is_forgotten() {
        let factory = MockFactory::new(Behavior::Loose);
        let _beeper = adopt_beeper(&factory);

        factory
            .control_for(TypeId::of::<Arc<dyn Beeper>>())
            .unwrap()
            .require("beep");

        let evicted = factory.evict(TypeId::of::<Arc<dyn Beeper>>());
        assert!(evicted.is_some());
        assert!(factory.control_for(TypeId::of::<Arc<dyn Beeper>>()).is_none());
        // The unmet requirement left with the control.
        assert!(factory.verify_required().is_ok());
        assert_eq!(factory.mock_count(), 0);
    }

    #[test]
    fn verify_passes_once_member_is_exercised() {
        let factory = MockFactory::new(Behavior::Loose);
        let beeper = adopt_beeper(&factory);

        let control = factory.control_for(TypeId::of::<Arc<dyn Beeper>>()).unwrap();
        control.returns::<(), u32>("beep", 2);
        control.require("beep");

        assert!(factory.verify_all().is_err());
        assert_eq!(beeper.beep(), 2);
        assert!(factory.verify_all().is_ok());
        assert!(factory.verify_required().is_ok());
    }
}

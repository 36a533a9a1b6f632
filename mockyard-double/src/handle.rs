//! Pairing of a mock object with its control.

use std::any::Any;

use crate::control::MockControl;
use crate::error::DoubleError;

/// A freshly built mock: the type-erased service object together with
/// the [`MockControl`] that configures and observes it.
///
/// The handle is a transfer shape. Once a mock enters a container, the
/// object lives in the container's registration cache and the control
/// lives in the factory's ledger; the handle itself is consumed.
pub struct MockHandle {
    object: Box<dyn Any + Send + Sync>,
    control: MockControl,
}

impl MockHandle {
    /// Pairs `object` (typically an `Arc<dyn Trait>`) with its
    /// control.
    pub fn new<T: Any + Send + Sync>(object: T, control: MockControl) -> Self {
        Self {
            object: Box::new(object),
            control,
        }
    }

    /// The control half of the pair.
    pub fn control(&self) -> &MockControl {
        &self.control
    }

    /// Recovers the typed service object, consuming the handle.
    ///
    /// # Errors
    /// [`DoubleError::ObjectType`] if the handle was built with a
    /// different service type than `T`.
    pub fn into_object<T: Any + Send + Sync>(self) -> Result<T, DoubleError> {
        let MockHandle { object, .. } = self;
        object
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| DoubleError::ObjectType {
                expected: std::any::type_name::<T>(),
            })
    }
}

impl std::fmt::Debug for MockHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockHandle")
            .field("control", &self.control)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::Behavior;
    use std::sync::Arc;

    trait Greeter: Send + Sync {}
    struct Stand;
    impl Greeter for Stand {}

    #[test]
    fn recovers_typed_object() {
        let control = MockControl::new("Greeter", Behavior::Loose);
        let object = Arc::new(Stand) as Arc<dyn Greeter>;
        let handle = MockHandle::new(object, control);

        let recovered: Arc<dyn Greeter> = handle.into_object().unwrap();
        drop(recovered);
    }

    #[test]
    fn wrong_type_is_an_error() {
        let control = MockControl::new("Greeter", Behavior::Loose);
        let handle = MockHandle::new(Arc::new(Stand) as Arc<dyn Greeter>, control);

        let err = handle.into_object::<Arc<String>>().unwrap_err();
        assert!(matches!(err, DoubleError::ObjectType { .. }));
    }

    #[test]
    fn control_survives_next_to_object() {
        let control = MockControl::new("Greeter", Behavior::Loose);
        let handle = MockHandle::new(Arc::new(Stand) as Arc<dyn Greeter>, control.clone());

        control.require("greet");
        // The handle's control shares state with the caller's clone.
        assert_eq!(
            handle
                .control()
                .verify(crate::control::VerifyMode::Required)
                .len(),
            1
        );
    }
}

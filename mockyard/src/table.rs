//! The mockable-service table.
//!
//! Rust has no runtime reflection, so "can this type be mocked?" is
//! answered at compile time: every mockable trait-object service
//! contributes a [`MockableEntry`] to a distributed table via
//! [`register_mock!`](crate::register_mock), and the auto-mock source
//! consults the table by [`TypeId`] at resolution time. A type with no
//! entry is a concrete type as far as auto-mocking is concerned and is
//! declined.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;

use mockyard_container::ServiceKey;
use mockyard_container::registry::Registration;
use mockyard_double::MockFactory;

/// One mockable trait-object service.
///
/// Entries are submitted by [`register_mock!`](crate::register_mock);
/// the `registration` hook carries the concrete service type in its
/// body, which is what lets a type-erased lookup produce a fully typed
/// just-in-time registration.
pub struct MockableEntry {
    service_type: fn() -> TypeId,
    trait_name: &'static str,
    registration: fn(ServiceKey, Arc<MockFactory>) -> Registration,
}

impl MockableEntry {
    /// Creates an entry. Exposed for the macro; not meant to be called
    /// directly.
    pub const fn new(
        service_type: fn() -> TypeId,
        trait_name: &'static str,
        registration: fn(ServiceKey, Arc<MockFactory>) -> Registration,
    ) -> Self {
        Self {
            service_type,
            trait_name,
            registration,
        }
    }

    /// The `TypeId` of the service handle type (e.g. `Arc<dyn Greeter>`).
    pub fn service_type(&self) -> TypeId {
        (self.service_type)()
    }

    /// The mocked trait's name, used in logs and failure messages.
    pub fn trait_name(&self) -> &'static str {
        self.trait_name
    }

    /// Builds the just-in-time registration for this service: a
    /// per-container factory that constructs the mock through
    /// `factory` and adopts its control.
    pub fn registration(&self, key: ServiceKey, factory: Arc<MockFactory>) -> Registration {
        (self.registration)(key, factory)
    }
}

impl std::fmt::Debug for MockableEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockableEntry")
            .field("trait_name", &self.trait_name)
            .finish()
    }
}

inventory::collect!(MockableEntry);

static INDEX: Lazy<HashMap<TypeId, &'static MockableEntry>> = Lazy::new(|| {
    inventory::iter::<MockableEntry>()
        .map(|entry| (entry.service_type(), entry))
        .collect()
});

/// Looks up the mockable entry for a service type, if one was
/// registered anywhere in the linked program.
pub fn entry_for(service_type: TypeId) -> Option<&'static MockableEntry> {
    INDEX.get(&service_type).copied()
}

/// Number of mockable services known to this program.
pub fn mockable_count() -> usize {
    INDEX.len()
}

/// Declares a trait-object service as mockable.
///
/// `$service` is the service handle type (an `Arc<dyn Trait>`),
/// `$mock` the [`Double`](crate::Double) standing in for it, and the
/// trailing literal the trait name used in failure messages.
///
/// ```rust,ignore
/// register_mock!(Arc<dyn Greeter> => MockGreeter, "Greeter");
/// ```
///
/// The expansion submits one [`MockableEntry`] whose registration
/// hook builds the mock under the factory's behavior mode, pairs it
/// with its control in a [`MockHandle`](crate::MockHandle), adopts
/// the control into the factory's ledger, and hands the typed service
/// to the container's per-container cache.
#[macro_export]
macro_rules! register_mock {
    ($service:ty => $mock:ty, $name:literal) => {
        const _: () = {
            fn service_type() -> ::std::any::TypeId {
                ::std::any::TypeId::of::<$service>()
            }

            fn registration(
                key: $crate::ServiceKey,
                factory: ::std::sync::Arc<$crate::MockFactory>,
            ) -> $crate::Registration {
                $crate::Registration::cached::<$service>(key, move |_| {
                    let mock: $mock = factory.build();
                    let control = $crate::Double::control(&mock).clone();
                    let handle = $crate::MockHandle::new(
                        ::std::sync::Arc::new(mock) as $service,
                        control,
                    );
                    factory.adopt(::std::any::TypeId::of::<$service>(), &handle);
                    handle.into_object::<$service>().map_err(|source| {
                        $crate::ContainerError::construction(
                            $crate::ServiceKey::of::<$service>(),
                            source,
                        )
                    })
                })
            }

            $crate::inventory::submit! {
                $crate::MockableEntry::new(service_type, $name, registration)
            }
        };
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Behavior, Double, MockControl};

    trait TableProbe: Send + Sync {
        fn ping(&self) -> bool;
    }

    struct MockTableProbe {
        control: MockControl,
    }

    impl Double for MockTableProbe {
        fn with_behavior(behavior: Behavior) -> Self {
            Self {
                control: MockControl::new("TableProbe", behavior),
            }
        }

        fn control(&self) -> &MockControl {
            &self.control
        }
    }

    impl TableProbe for MockTableProbe {
        fn ping(&self) -> bool {
            self.control.invoke("ping", (), || false)
        }
    }

    crate::register_mock!(Arc<dyn TableProbe> => MockTableProbe, "TableProbe");

    #[test]
    fn registered_service_is_found() {
        let entry = entry_for(TypeId::of::<Arc<dyn TableProbe>>()).expect("registered above");
        assert_eq!(entry.trait_name(), "TableProbe");
        assert_eq!(entry.service_type(), TypeId::of::<Arc<dyn TableProbe>>());
    }

    #[test]
    fn unregistered_service_is_absent() {
        assert!(entry_for(TypeId::of::<Arc<String>>()).is_none());
        assert!(entry_for(TypeId::of::<String>()).is_none());
    }

    #[test]
    fn table_counts_this_binary_entries() {
        assert!(mockable_count() >= 1);
    }

    #[test]
    fn entry_registration_builds_a_working_mock() {
        let entry = entry_for(TypeId::of::<Arc<dyn TableProbe>>()).unwrap();
        let factory = Arc::new(MockFactory::new(Behavior::Loose));
        let registration =
            entry.registration(ServiceKey::of::<Arc<dyn TableProbe>>(), factory.clone());

        struct NoDeps;
        impl mockyard_container::registry::Resolver for NoDeps {
            fn resolve_key(
                &self,
                key: &ServiceKey,
            ) -> mockyard_container::Result<Box<dyn std::any::Any + Send + Sync>> {
                Err(mockyard_container::ContainerError::Disposed {
                    requested: key.clone(),
                })
            }
        }

        let probe = registration
            .produce(&NoDeps)
            .unwrap()
            .downcast::<Arc<dyn TableProbe>>()
            .unwrap();
        assert!(!probe.ping()); // loose default

        let control = factory
            .control_for(TypeId::of::<Arc<dyn TableProbe>>())
            .expect("adopted during construction");
        assert_eq!(control.call_count("ping"), 1);
    }
}

//! Service registry — stores all registrations for a container.
//!
//! The registry maps [`ServiceKey`] to factory functions that know how
//! to create instances. Unlike a build-once container, registrations
//! may arrive at any point in the container's life: explicit calls and
//! fallback sources both insert here.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::error::{AlreadyRegisteredError, ContainerError};
use crate::key::ServiceKey;
use crate::scope::Scope;

/// Type alias for factory functions.
///
/// A factory takes a reference to the [`Resolver`] (to resolve its own
/// dependencies) and returns a boxed `Any` or an error.
///
/// # Why `Arc` and not `Box`?
/// Registrations are cloned out of the registry before the factory
/// runs, so the container lock is never held across user code. `Arc`
/// makes that clone cheap.
pub type FactoryFn = Arc<
    dyn Fn(&dyn Resolver) -> Result<Box<dyn Any + Send + Sync>, ContainerError> + Send + Sync,
>;

/// Trait for resolving services.
///
/// This is what factory functions receive to resolve their own
/// dependencies. Separated from the container type to avoid circular
/// references.
pub trait Resolver: Send + Sync {
    fn resolve_key(&self, key: &ServiceKey) -> Result<Box<dyn Any + Send + Sync>, ContainerError>;
}

/// Registration entry for a single service.
#[derive(Clone)]
pub struct Registration {
    key: ServiceKey,
    scope: Scope,
    factory: FactoryFn,
}

impl Registration {
    /// A per-container registration: the factory runs once, the result
    /// is cached and cloned out on every later resolve.
    ///
    /// **`T` must implement `Clone`** — `Arc<T>` services make the
    /// clone identity-preserving, which is how "resolving twice returns
    /// the same instance" holds.
    pub fn cached<T: Clone + Send + Sync + 'static>(
        key: ServiceKey,
        factory: impl Fn(&dyn Resolver) -> Result<T, ContainerError> + Send + Sync + 'static,
    ) -> Self {
        let cell: Arc<OnceCell<T>> = Arc::new(OnceCell::new());

        Self {
            key,
            scope: Scope::Container,
            factory: Arc::new(move |resolver: &dyn Resolver| {
                let value = cell.get_or_try_init(|| factory(resolver))?;
                Ok(Box::new(value.clone()) as Box<dyn Any + Send + Sync>)
            }),
        }
    }

    /// A transient registration: the factory runs on every resolve.
    pub fn transient<T: Send + Sync + 'static>(
        key: ServiceKey,
        factory: impl Fn(&dyn Resolver) -> Result<T, ContainerError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            key,
            scope: Scope::Transient,
            factory: Arc::new(move |resolver: &dyn Resolver| {
                Ok(Box::new(factory(resolver)?) as Box<dyn Any + Send + Sync>)
            }),
        }
    }

    /// A pre-built value, cloned out on every resolve.
    pub fn value<T: Clone + Send + Sync + 'static>(key: ServiceKey, value: T) -> Self {
        Self {
            key,
            scope: Scope::Container,
            factory: Arc::new(move |_: &dyn Resolver| {
                Ok(Box::new(value.clone()) as Box<dyn Any + Send + Sync>)
            }),
        }
    }

    /// The key this registration satisfies.
    pub fn key(&self) -> &ServiceKey {
        &self.key
    }

    /// The lifetime of instances produced by this registration.
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Runs the factory against `resolver`.
    pub fn produce(
        &self,
        resolver: &dyn Resolver,
    ) -> Result<Box<dyn Any + Send + Sync>, ContainerError> {
        (self.factory)(resolver)
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("key", &self.key)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Stores all service registrations of one container.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    registrations: HashMap<ServiceKey, Registration>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            registrations: HashMap::new(),
        }
    }

    /// Registers a factory for a service key.
    ///
    /// # Errors
    /// Returns [`ContainerError::AlreadyRegistered`] if the key is
    /// already registered and `allow_override` is false.
    pub fn register(
        &mut self,
        registration: Registration,
        allow_override: bool,
    ) -> Result<(), ContainerError> {
        let key = registration.key().clone();

        if !allow_override && self.registrations.contains_key(&key) {
            return Err(ContainerError::AlreadyRegistered(AlreadyRegisteredError {
                key,
            }));
        }

        debug!(key = %key, scope = %registration.scope(), "Registered service");
        self.registrations.insert(key, registration);
        Ok(())
    }

    /// Looks up a registration by key.
    pub fn get(&self, key: &ServiceKey) -> Option<&Registration> {
        self.registrations.get(key)
    }

    /// Returns `true` if `key` has a registration.
    pub fn contains(&self, key: &ServiceKey) -> bool {
        self.registrations.contains_key(key)
    }

    /// Returns the number of registered services.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Returns `true` if no services are registered.
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Returns the keys of all registered services.
    pub fn registered_keys(&self) -> Vec<ServiceKey> {
        self.registrations.keys().cloned().collect()
    }

    /// Drops every registration and, with them, every cached instance.
    pub fn clear(&mut self) {
        self.registrations.clear();
    }
}

//! # The Container — resolution core of mockyard
//!
//! A dynamically-registering service container. Registrations arrive
//! at any point in the container's life: explicit calls from test
//! code, and just-in-time registrations supplied by fallback
//! [`RegistrationSource`]s when a lookup misses the table.
//!
//! # Architecture
//! ```text
//! resolve::<T>()
//!     │
//!     ├─ registration table hit ──────────────► run factory
//!     │
//!     └─ miss ─► sources, in order ─► Some(reg) ─► cache in table, run factory
//!                        │
//!                        └─ all decline ─► NotRegistered
//! ```
//!
//! # Examples
//! ```rust
//! use mockyard_container::prelude::*;
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct EnglishGreeter;
//! impl Greeter for EnglishGreeter {
//!     fn greet(&self) -> String { "hello".into() }
//! }
//!
//! let container = Container::new();
//! container
//!     .register_cached_with::<Arc<dyn Greeter>>(|_| {
//!         Ok(Arc::new(EnglishGreeter) as Arc<dyn Greeter>)
//!     })
//!     .expect("fresh container has no conflicting registration");
//!
//! let greeter: Arc<dyn Greeter> = container.resolve().expect("registered above");
//! assert_eq!(greeter.greet(), "hello");
//! ```

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use mockyard_support::rendering::suggest_similar;

use crate::error::{ContainerError, NotRegisteredError, Result};
use crate::key::ServiceKey;
use crate::registry::{Registration, Registry, Resolver};
use crate::source::RegistrationSource;

// ═══════════════════════════════════════════
// Container
// ═══════════════════════════════════════════

/// A cheaply cloneable handle to one service container.
///
/// Clones share the same underlying state: registering through one
/// handle is visible through every other. The container is the unit of
/// instance lifetime — disposing it drops every registration and every
/// cached instance at once.
#[derive(Clone)]
pub struct Container {
    inner: Arc<RwLock<ContainerState>>,
}

struct ContainerState {
    registry: Registry,
    sources: Vec<Arc<dyn RegistrationSource>>,
    disposed: bool,
}

impl Container {
    /// Creates an empty, open container with no fallback sources.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(ContainerState {
                registry: Registry::new(),
                sources: Vec::new(),
                disposed: false,
            })),
        }
    }

    // ── Registration ──

    /// Register a pre-built value, cloned out on every resolve.
    ///
    /// Use `Arc<T>` for identity-preserving sharing.
    pub fn register_value<T: Clone + Send + Sync + 'static>(&self, value: T) -> Result<()> {
        self.install(Registration::value(ServiceKey::of::<T>(), value), false)
    }

    /// Register a per-container factory.
    ///
    /// Called ONCE on first resolve; the result is cloned on every
    /// later resolve against this container.
    ///
    /// **`T` must implement `Clone`** — use `Arc<T>` for services.
    pub fn register_cached_with<T: Clone + Send + Sync + 'static>(
        &self,
        factory: impl Fn(&dyn Resolver) -> Result<T> + Send + Sync + 'static,
    ) -> Result<()> {
        self.install(Registration::cached(ServiceKey::of::<T>(), factory), false)
    }

    /// Register a transient factory, run on every resolve.
    pub fn register_transient_with<T: Send + Sync + 'static>(
        &self,
        factory: impl Fn(&dyn Resolver) -> Result<T> + Send + Sync + 'static,
    ) -> Result<()> {
        self.install(
            Registration::transient(ServiceKey::of::<T>(), factory),
            false,
        )
    }

    /// Register a pre-built value, replacing any existing registration
    /// for `T` (including one synthesized by a fallback source).
    pub fn replace_value<T: Clone + Send + Sync + 'static>(&self, value: T) -> Result<()> {
        self.install(Registration::value(ServiceKey::of::<T>(), value), true)
    }

    /// Register a per-container factory, replacing any existing
    /// registration for `T`. Replacing abandons the memoized instance
    /// of the old registration.
    pub fn replace_cached_with<T: Clone + Send + Sync + 'static>(
        &self,
        factory: impl Fn(&dyn Resolver) -> Result<T> + Send + Sync + 'static,
    ) -> Result<()> {
        self.install(Registration::cached(ServiceKey::of::<T>(), factory), true)
    }

    fn install(&self, registration: Registration, allow_override: bool) -> Result<()> {
        let mut state = self.inner.write();
        if state.disposed {
            return Err(ContainerError::Disposed {
                requested: registration.key().clone(),
            });
        }
        state.registry.register(registration, allow_override)
    }

    // ── Fallback sources ──

    /// Installs a fallback registration source.
    ///
    /// Sources are consulted in installation order, only after the
    /// registration table misses.
    pub fn add_source(&self, source: Arc<dyn RegistrationSource>) {
        let mut state = self.inner.write();
        if state.disposed {
            trace!(source = source.name(), "Ignoring source on disposed container");
            return;
        }
        debug!(source = source.name(), "Installed fallback source");
        state.sources.push(source);
    }

    // ── Resolution ──

    /// Resolve a service by type.
    ///
    /// ```rust,ignore
    /// let greeter: Arc<dyn Greeter> = container.resolve()?;
    /// ```
    pub fn resolve<T: Send + Sync + 'static>(&self) -> Result<T> {
        let key = ServiceKey::of::<T>();
        trace!(key = %key, "Resolving");

        let boxed = self.resolve_internal(&key)?;
        downcast_resolved::<T>(boxed, key)
    }

    /// Returns `true` if `T` currently has a registration.
    ///
    /// Fallback sources are NOT consulted: this answers "has an
    /// explicit or already-synthesized registration", not "could be
    /// resolved".
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.contains_key(&ServiceKey::of::<T>())
    }

    /// Key-level variant of [`Container::contains`].
    pub fn contains_key(&self, key: &ServiceKey) -> bool {
        let state = self.inner.read();
        !state.disposed && state.registry.contains(key)
    }

    /// Internal resolve — returns a type-erased value.
    ///
    /// The container lock is never held while a factory runs, so
    /// factories are free to resolve their own dependencies through
    /// the same container.
    fn resolve_internal(&self, key: &ServiceKey) -> Result<Box<dyn Any + Send + Sync>> {
        let (registration, registered_keys) = {
            let state = self.inner.read();
            if state.disposed {
                return Err(ContainerError::Disposed {
                    requested: key.clone(),
                });
            }
            match state.registry.get(key) {
                Some(reg) => (Some(reg.clone()), Vec::new()),
                None => (None, state.registry.registered_keys()),
            }
        };

        let registration = match registration {
            Some(reg) => reg,
            None => match self.registration_from_sources(key)? {
                Some(reg) => reg,
                None => {
                    return Err(ContainerError::NotRegistered(NotRegisteredError {
                        requested: key.clone(),
                        suggestions: self.find_suggestions(key, &registered_keys),
                    }));
                }
            },
        };

        let resolver = ContainerResolver { container: self };
        registration.produce(&resolver)
    }

    /// Consults the fallback sources, caching the first registration
    /// they supply.
    fn registration_from_sources(&self, key: &ServiceKey) -> Result<Option<Registration>> {
        let sources: Vec<Arc<dyn RegistrationSource>> = self.inner.read().sources.clone();

        for source in sources {
            // Pure function of the key; called outside the lock.
            let Some(registration) = source.registration_for(key) else {
                continue;
            };
            debug!(key = %key, source = source.name(), "Source supplied registration");

            let mut state = self.inner.write();
            if state.disposed {
                return Err(ContainerError::Disposed {
                    requested: key.clone(),
                });
            }
            // A concurrent resolve may have inserted the same key first;
            // the table entry wins so memoization stays per-container.
            if let Some(existing) = state.registry.get(key) {
                return Ok(Some(existing.clone()));
            }
            state.registry.register(registration.clone(), false)?;
            return Ok(Some(registration));
        }

        Ok(None)
    }

    fn find_suggestions(&self, key: &ServiceKey, registered: &[ServiceKey]) -> Vec<String> {
        let names: Vec<&str> = registered.iter().map(|k| k.type_name()).collect();
        suggest_similar(key.type_name(), &names, 3)
    }

    // ── Teardown ──

    /// Tears the container down, dropping every registration, cached
    /// instance, and fallback source. Idempotent.
    ///
    /// Every operation after disposal fails with
    /// [`ContainerError::Disposed`].
    pub fn dispose(&self) {
        let mut state = self.inner.write();
        if state.disposed {
            return;
        }
        debug!(registered = state.registry.len(), "Disposing container");
        state.disposed = true;
        state.registry.clear();
        state.sources.clear();
    }

    /// Returns `true` once [`Container::dispose`] has run.
    pub fn is_disposed(&self) -> bool {
        self.inner.read().disposed
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.read();
        f.debug_struct("Container")
            .field("registered", &state.registry.len())
            .field("sources", &state.sources.len())
            .field("disposed", &state.disposed)
            .finish()
    }
}

// ═══════════════════════════════════════════
// ContainerResolver (internal bridge)
// ═══════════════════════════════════════════

/// Internal resolver passed to factory functions.
struct ContainerResolver<'a> {
    container: &'a Container,
}

impl Resolver for ContainerResolver<'_> {
    fn resolve_key(&self, key: &ServiceKey) -> Result<Box<dyn Any + Send + Sync>> {
        self.container.resolve_internal(key)
    }
}

// ═══════════════════════════════════════════
// Injectable + free resolve
// ═══════════════════════════════════════════

/// A concrete service that can state its own constructor dependencies.
///
/// This is the explicit stand-in for reflective constructor discovery:
/// the implementation pulls each dependency out of the resolver, and
/// whatever supplies those dependencies (an explicit registration or a
/// synthesized mock) is the container's business.
///
/// ```rust,ignore
/// struct GreetingService {
///     greeter: Arc<dyn Greeter>,
/// }
///
/// impl Injectable for GreetingService {
///     fn inject(r: &dyn Resolver) -> Result<Self> {
///         Ok(Self { greeter: resolve(r)? })
///     }
/// }
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Construct `Self`, resolving every dependency from `resolver`.
    fn inject(resolver: &dyn Resolver) -> Result<Self>;
}

/// Resolve a typed service from a [`Resolver`].
///
/// Use this inside factory closures and [`Injectable::inject`] bodies:
///
/// ```rust,ignore
/// container.register_cached_with::<MyService>(|r| {
///     let greeter: Arc<dyn Greeter> = mockyard_container::container::resolve(r)?;
///     Ok(MyService { greeter })
/// })
/// ```
pub fn resolve<T: Send + Sync + 'static>(resolver: &dyn Resolver) -> Result<T> {
    let key = ServiceKey::of::<T>();
    let boxed = resolver.resolve_key(&key)?;
    downcast_resolved::<T>(boxed, key)
}

fn downcast_resolved<T: Send + Sync + 'static>(
    boxed: Box<dyn Any + Send + Sync>,
    key: ServiceKey,
) -> Result<T> {
    boxed.downcast::<T>().map(|b| *b).map_err(|_| {
        ContainerError::ConstructionFailed {
            key,
            source: format!("Type mismatch: expected {}", type_name::<T>()).into(),
        }
    })
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::{Container, Injectable, resolve};
    pub use crate::error::{ContainerError, Result};
    pub use crate::key::ServiceKey;
    pub use crate::registry::{Registration, Resolver};
    pub use crate::scope::Scope;
    pub use crate::source::RegistrationSource;
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════

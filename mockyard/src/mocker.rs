//! # The AutoMocker facade
//!
//! One `AutoMocker` is one test case's world: it owns a fresh
//! [`Container`] with the [`AutoMockSource`] pre-installed and a
//! [`MockFactory`] fixed to one behavior mode. Resolving an
//! unregistered mockable trait yields a mock; registering real
//! implementations overrides that, per service, at any time.
//!
//! # Lifecycle
//! ```text
//! AutoMocker::loose() ──► Open ── dispose() ──► Disposed (terminal)
//!                           │
//!                  resolve / mock / create / provide
//! ```
//!
//! Disposal verifies first (full or required-only, per the verify-all
//! flag), then tears the container down unconditionally, then surfaces
//! the verification verdict. Dropping an undisposed facade (early
//! return, panic) tears the container down without verifying.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument};

use mockyard_container::container::{Container, Injectable};
use mockyard_container::{ContainerError, ServiceKey};
use mockyard_double::{Behavior, MockControl, MockFactory};

use crate::error::{MockerError, Result};
use crate::source::AutoMockSource;

/// Facade bundling a mock factory and a resolution container with
/// auto-mocking pre-installed.
pub struct AutoMocker {
    container: Container,
    factory: Arc<MockFactory>,
    verify_all: bool,
}

impl AutoMocker {
    /// A facade whose mocks tolerate uninstructed calls, answering
    /// them with defaults.
    pub fn loose() -> Self {
        Self::with_behavior(Behavior::Loose)
    }

    /// A facade whose mocks fail the test on any uninstructed call.
    pub fn strict() -> Self {
        Self::with_behavior(Behavior::Strict)
    }

    /// Builds the factory, a fresh container, and wires them: the
    /// factory is registered into the container (torn down with it)
    /// and the auto-mock source is installed as the fallback provider.
    pub fn with_behavior(behavior: Behavior) -> Self {
        let factory = Arc::new(MockFactory::new(behavior));
        let container = Container::new();

        container
            .register_value(Arc::clone(&factory))
            .expect("fresh container accepts its first registration");
        container.add_source(Arc::new(AutoMockSource::new(Arc::clone(&factory))));

        debug!(behavior = %behavior, "AutoMocker ready");
        Self {
            container,
            factory,
            verify_all: false,
        }
    }

    /// The behavior mode every mock of this facade is built under.
    pub fn behavior(&self) -> Behavior {
        self.factory.behavior()
    }

    /// Whether disposal runs full verification (`true`) or
    /// required-only verification (`false`, the default).
    pub fn verify_all(&self) -> bool {
        self.verify_all
    }

    /// Flips the disposal-time verification mode. May be changed at
    /// any point before disposal.
    pub fn set_verify_all(&mut self, verify_all: bool) {
        self.verify_all = verify_all;
    }

    /// The owned container. Useful for low-level registrations and for
    /// observing teardown from tests; most callers never need it.
    pub fn container(&self) -> &Container {
        &self.container
    }

    // ── Operations ──

    /// Resolve a service, synthesizing a mock if `T` is a mockable
    /// trait-object type with no explicit registration.
    ///
    /// # Errors
    /// `Container(NotRegistered)` when `T` is neither registered nor
    /// mockable (a concrete type, say); `Container(ConstructionFailed)`
    /// when a factory — mock construction included — fails.
    pub fn resolve<T: Send + Sync + 'static>(&self) -> Result<T> {
        Ok(self.container.resolve()?)
    }

    /// Resolve `T` (synthesizing its mock if needed) and return the
    /// paired mock-control handle.
    ///
    /// # Errors
    /// Everything [`AutoMocker::resolve`] can raise, plus
    /// [`MockerError::NotMockBacked`] when `T` resolved to an
    /// explicitly registered real implementation.
    pub fn mock<T: Send + Sync + 'static>(&self) -> Result<MockControl> {
        let _instance: T = self.container.resolve()?;

        self.factory
            .control_for(TypeId::of::<T>())
            .ok_or_else(|| MockerError::NotMockBacked {
                key: ServiceKey::of::<T>(),
            })
    }

    /// Resolve a concrete service, registering `T::inject`
    /// per-container first if `T` has no registration yet.
    ///
    /// This is how a class under test gets built with every dependency
    /// auto-mocked: its `Injectable` impl pulls dependencies from the
    /// container, and unregistered mockable traits come back as mocks.
    ///
    /// Calling twice reuses the first registration — and the cached
    /// instance that goes with it.
    pub fn create<T: Injectable + Clone>(&self) -> Result<T> {
        if let Err(err) = self
            .container
            .register_cached_with::<T>(|resolver| T::inject(resolver))
        {
            match err {
                // Registered on an earlier call (or explicitly): reuse.
                ContainerError::AlreadyRegistered(_) => {}
                other => return Err(other.into()),
            }
        }
        Ok(self.container.resolve()?)
    }

    /// Register `I` as the implementation behind service `S`, replacing
    /// any existing registration (a synthesized mock included), and
    /// resolve it.
    ///
    /// `S: From<I>` is the coercion seam: for `S = Arc<dyn Trait>` the
    /// impl is one line wrapping the implementation in an `Arc`.
    pub fn provide_impl<S, I>(&self) -> Result<S>
    where
        S: From<I> + Clone + Send + Sync + 'static,
        I: Injectable,
    {
        self.factory.evict(TypeId::of::<S>());
        self.container
            .replace_cached_with::<S>(|resolver| Ok(S::from(I::inject(resolver)?)))?;
        Ok(self.container.resolve()?)
    }

    /// Register a pre-built instance as the provider for service `S`,
    /// replacing any existing registration, and resolve it.
    ///
    /// Resolution is identity-preserving: for `Arc` services, every
    /// later resolve returns the very instance provided here.
    pub fn provide<S: Clone + Send + Sync + 'static>(&self, instance: S) -> Result<S> {
        self.factory.evict(TypeId::of::<S>());
        self.container.replace_value(instance)?;
        Ok(self.container.resolve()?)
    }

    // ── Lifecycle ──

    /// Verifies, then tears the container down, then reports.
    ///
    /// Teardown is unconditional: a failed verification still releases
    /// the container and every instance it owns. The facade is
    /// consumed — post-disposal facade calls do not exist, and
    /// post-disposal access through a retained [`Container`] clone
    /// fails with a disposed error.
    pub fn dispose(self) -> Result<()> {
        self.finish()
    }

    #[instrument(skip(self), name = "mocker_dispose")]
    fn finish(&self) -> Result<()> {
        let verdict = if self.verify_all {
            self.factory.verify_all()
        } else {
            self.factory.verify_required()
        };

        // Teardown happens whatever the verdict said.
        self.container.dispose();

        verdict?;
        Ok(())
    }
}

impl Drop for AutoMocker {
    fn drop(&mut self) {
        // Exit paths that skipped dispose() — early returns, panics —
        // still tear the container down. No verification here: a
        // panicking test already failed. Idempotent after dispose().
        self.container.dispose();
    }
}

impl fmt::Debug for AutoMocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoMocker")
            .field("behavior", &self.factory.behavior())
            .field("mocks", &self.factory.mock_count())
            .field("verify_all", &self.verify_all)
            .field("disposed", &self.container.is_disposed())
            .finish()
    }
}

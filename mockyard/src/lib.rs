//! # Mockyard — an auto-mocking test container
//!
//! Mockyard binds a resolution container to a mock factory so a test
//! can resolve any trait-object service and transparently receive a
//! mock for it, with no manual wiring per dependency.
//!
//! # Quick start
//! ```rust
//! use std::sync::Arc;
//! use mockyard::{AutoMocker, Behavior, Double, MockControl, register_mock};
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct MockGreeter {
//!     control: MockControl,
//! }
//!
//! impl Double for MockGreeter {
//!     fn with_behavior(behavior: Behavior) -> Self {
//!         Self { control: MockControl::new("Greeter", behavior) }
//!     }
//!     fn control(&self) -> &MockControl {
//!         &self.control
//!     }
//! }
//!
//! impl Greeter for MockGreeter {
//!     fn greet(&self) -> String {
//!         self.control.invoke("greet", (), String::new)
//!     }
//! }
//!
//! register_mock!(Arc<dyn Greeter> => MockGreeter, "Greeter");
//!
//! let mocker = AutoMocker::loose();
//! let control = mocker.mock::<Arc<dyn Greeter>>().expect("Greeter is mockable");
//! control.returns::<(), String>("greet", "hello".into());
//!
//! let greeter: Arc<dyn Greeter> = mocker.resolve().expect("mock already synthesized");
//! assert_eq!(greeter.greet(), "hello");
//!
//! mocker.dispose().expect("no required expectation is unmet");
//! ```

pub mod error;
pub mod mocker;
pub mod source;
pub mod table;

pub use error::{MockerError, Result};
pub use mocker::AutoMocker;
pub use source::AutoMockSource;
pub use table::MockableEntry;

pub use mockyard_container::container::{Container, Injectable, resolve};
pub use mockyard_container::registry::{Registration, Resolver};
pub use mockyard_container::{ContainerError, Scope, ServiceKey};
pub use mockyard_double::{
    Behavior, Double, DoubleError, MockControl, MockFactory, MockHandle, UnmetExpectation,
    VerificationError, VerifyMode,
};

// `register_mock!` expands to paths below `$crate::inventory`.
pub use inventory;

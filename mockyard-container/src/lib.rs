//! Resolution container for the mockyard test rig.

pub mod container;
pub mod error;
pub mod key;
pub mod registry;
pub mod scope;
pub mod source;

pub use container::prelude;
pub use error::{ContainerError, Result};
pub use key::ServiceKey;
pub use scope::Scope;

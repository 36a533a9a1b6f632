//! The contract mock structs satisfy.

use crate::behavior::Behavior;
use crate::control::MockControl;

/// A hand-written (or macro-emitted) mock struct.
///
/// A double embeds one [`MockControl`] and routes every trait method
/// through [`MockControl::invoke`]. The factory only needs these two
/// entry points: build under a behavior mode, and reach the control.
///
/// # Examples
/// ```
/// use mockyard_double::{Behavior, Double, MockControl};
///
/// trait Greeter: Send + Sync {
///     fn greet(&self, name: &str) -> String;
/// }
///
/// struct MockGreeter {
///     control: MockControl,
/// }
///
/// impl Double for MockGreeter {
///     fn with_behavior(behavior: Behavior) -> Self {
///         Self { control: MockControl::new("Greeter", behavior) }
///     }
///
///     fn control(&self) -> &MockControl {
///         &self.control
///     }
/// }
///
/// impl Greeter for MockGreeter {
///     fn greet(&self, name: &str) -> String {
///         self.control
///             .invoke("greet", (name.to_owned(),), String::new)
///     }
/// }
///
/// let mock = MockGreeter::with_behavior(Behavior::Loose);
/// mock.control().returns::<(String,), String>("greet", "hello".into());
/// assert_eq!(mock.greet("world"), "hello");
/// ```
pub trait Double: Send + Sync + Sized {
    /// Builds the double under the given behavior mode.
    fn with_behavior(behavior: Behavior) -> Self;

    /// The control handle shared with everyone who stubs or verifies
    /// this double.
    fn control(&self) -> &MockControl;
}

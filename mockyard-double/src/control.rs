//! The mock-control handle.
//!
//! A [`MockControl`] is the companion object of one mock: test code
//! uses it to stub methods and mark expectations, the mock's trait
//! impl routes every call through it, and verification reads the call
//! log out of it at disposal time.
//!
//! The control is a cheap clone over shared state, so the handle the
//! test holds and the handle embedded in the resolved mock object
//! observe each other: stub after resolving, call, then assert on
//! counts — all through the same state.

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::behavior::Behavior;
use crate::error::UnmetExpectation;

/// Which members must have been exercised for verification to pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyMode {
    /// Only members explicitly marked with [`MockControl::require`].
    Required,
    /// Every stubbed member, plus the required ones.
    All,
}

/// Stubbed behavior for one method: a type-erased closure from the
/// method's argument tuple to its return value.
struct Stub<A, R> {
    run: Box<dyn Fn(A) -> R + Send + Sync>,
}

#[derive(Default)]
struct ControlInner {
    stubs: HashMap<&'static str, Arc<dyn Any + Send + Sync>>,
    calls: HashMap<&'static str, u64>,
    required: HashSet<&'static str>,
}

struct ControlState {
    trait_name: &'static str,
    behavior: Behavior,
    inner: Mutex<ControlInner>,
}

/// Handle for configuring and observing one mock.
///
/// # Examples
/// ```
/// use mockyard_double::{Behavior, MockControl};
///
/// let control = MockControl::new("Greeter", Behavior::Loose);
/// control.returns::<(String,), String>("greet", "hello".into());
///
/// // What the mock's trait impl does on every call:
/// let out: String = control.invoke("greet", (String::from("world"),), String::new);
/// assert_eq!(out, "hello");
/// assert_eq!(control.call_count("greet"), 1);
/// ```
#[derive(Clone)]
pub struct MockControl {
    state: Arc<ControlState>,
}

impl MockControl {
    /// Creates a control for a mock of `trait_name` under `behavior`.
    pub fn new(trait_name: &'static str, behavior: Behavior) -> Self {
        Self {
            state: Arc::new(ControlState {
                trait_name,
                behavior,
                inner: Mutex::new(ControlInner::default()),
            }),
        }
    }

    /// The name of the mocked trait, as used in failure messages.
    pub fn trait_name(&self) -> &'static str {
        self.state.trait_name
    }

    /// The behavior mode the mock was built under.
    pub fn behavior(&self) -> Behavior {
        self.state.behavior
    }

    /// Stubs `method` with a closure from its argument tuple to its
    /// return value.
    ///
    /// The type parameters must match what the mock's trait impl
    /// passes to [`MockControl::invoke`] for the same method. Stubbing
    /// a method marks it as a mocked member for
    /// [`VerifyMode::All`] verification.
    pub fn returns_with<A: 'static, R: 'static>(
        &self,
        method: &'static str,
        f: impl Fn(A) -> R + Send + Sync + 'static,
    ) {
        trace!(mock = self.state.trait_name, method, "Stubbing method");
        let stub: Arc<dyn Any + Send + Sync> = Arc::new(Stub::<A, R> { run: Box::new(f) });
        self.state.inner.lock().stubs.insert(method, stub);
    }

    /// Stubs `method` to return a clone of `value` on every call.
    pub fn returns<A: 'static, R: Clone + Send + Sync + 'static>(
        &self,
        method: &'static str,
        value: R,
    ) {
        self.returns_with::<A, R>(method, move |_| value.clone());
    }

    /// Marks `method` as a required interaction: default verification
    /// fails unless it was called at least once.
    pub fn require(&self, method: &'static str) {
        self.state.inner.lock().required.insert(method);
    }

    /// Routes one call through the control. This is what a mock's
    /// trait impl calls for every method.
    ///
    /// Records the call, then runs the stub if one is installed.
    /// Without a stub, loose mocks return `unstubbed()` and strict
    /// mocks panic.
    ///
    /// # Panics
    /// - Strict behavior and no stub for `method`.
    /// - A stub was installed with argument/return types that differ
    ///   from `A`/`R`.
    pub fn invoke<A: 'static, R: 'static>(
        &self,
        method: &'static str,
        args: A,
        unstubbed: impl FnOnce() -> R,
    ) -> R {
        let stub = {
            let mut inner = self.state.inner.lock();
            *inner.calls.entry(method).or_insert(0) += 1;
            inner.stubs.get(method).cloned()
        };

        // The stub runs with the lock released; it may re-enter the
        // control (e.g. stub one method in terms of another's count).
        if let Some(stub) = stub {
            let Some(stub) = stub.downcast_ref::<Stub<A, R>>() else {
                panic!(
                    "mock of {}: stub for `{}` has a mismatched signature",
                    self.state.trait_name, method
                );
            };
            return (stub.run)(args);
        }

        match self.state.behavior {
            Behavior::Loose => unstubbed(),
            Behavior::Strict => panic!(
                "strict mock of {}: unexpected call to `{}`",
                self.state.trait_name, method
            ),
        }
    }

    /// Number of times `method` has been invoked on this mock.
    pub fn call_count(&self, method: &str) -> u64 {
        self.state
            .inner
            .lock()
            .calls
            .get(method)
            .copied()
            .unwrap_or(0)
    }

    /// Total invocations across all methods.
    pub fn total_calls(&self) -> u64 {
        self.state.inner.lock().calls.values().sum()
    }

    /// Returns the members whose expected interactions never occurred
    /// under `mode`. Empty means verification passes.
    pub fn verify(&self, mode: VerifyMode) -> Vec<UnmetExpectation> {
        let inner = self.state.inner.lock();

        let mut watched: Vec<&'static str> = match mode {
            VerifyMode::Required => inner.required.iter().copied().collect(),
            VerifyMode::All => {
                let mut set: HashSet<&'static str> = inner.stubs.keys().copied().collect();
                set.extend(inner.required.iter().copied());
                set.into_iter().collect()
            }
        };
        watched.sort_unstable();

        watched
            .into_iter()
            .filter(|method| inner.calls.get(method).copied().unwrap_or(0) == 0)
            .map(|method| UnmetExpectation {
                trait_name: self.state.trait_name,
                method,
            })
            .collect()
    }
}

impl std::fmt::Debug for MockControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.state.inner.lock();
        f.debug_struct("MockControl")
            .field("trait_name", &self.state.trait_name)
            .field("behavior", &self.state.behavior)
            .field("stubbed", &inner.stubs.len())
            .field("calls", &inner.calls.values().sum::<u64>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loose_unstubbed_returns_default() {
        let control = MockControl::new("Greeter", Behavior::Loose);
        let out: String = control.invoke("greet", (), String::new);
        assert_eq!(out, "");
        assert_eq!(control.call_count("greet"), 1);
    }

    #[test]
    #[should_panic(expected = "unexpected call to `greet`")]
    fn strict_unstubbed_panics() {
        let control = MockControl::new("Greeter", Behavior::Strict);
        let _: String = control.invoke("greet", (), String::new);
    }

    #[test]
    fn stub_overrides_default() {
        let control = MockControl::new("Greeter", Behavior::Loose);
        control.returns_with::<(String,), String>("greet", |(name,)| format!("hi {name}"));

        let out: String = control.invoke("greet", (String::from("ada"),), String::new);
        assert_eq!(out, "hi ada");
    }

    #[test]
    fn stub_satisfies_strict_mode() {
        let control = MockControl::new("Greeter", Behavior::Strict);
        control.returns::<(), u32>("count", 3);

        let out: u32 = control.invoke("count", (), || 0);
        assert_eq!(out, 3);
    }

    #[test]
    #[should_panic(expected = "mismatched signature")]
    fn mismatched_stub_signature_panics() {
        let control = MockControl::new("Greeter", Behavior::Loose);
        control.returns::<(), u32>("count", 3);

        // Invoked with a different return type than the stub was
        // installed for.
        let _: String = control.invoke("count", (), String::new);
    }

    #[test]
    fn call_counts_accumulate_per_method() {
        let control = MockControl::new("Greeter", Behavior::Loose);
        let _: () = control.invoke("reset", (), || ());
        let _: () = control.invoke("reset", (), || ());
        let _: u32 = control.invoke("count", (), || 0);

        assert_eq!(control.call_count("reset"), 2);
        assert_eq!(control.call_count("count"), 1);
        assert_eq!(control.call_count("never"), 0);
        assert_eq!(control.total_calls(), 3);
    }

    #[test]
    fn verify_required_only_checks_required() {
        let control = MockControl::new("Greeter", Behavior::Loose);
        control.returns::<(), u32>("count", 3);
        control.require("reset");

        // `count` is stubbed but not required; only `reset` is unmet.
        let unmet = control.verify(VerifyMode::Required);
        assert_eq!(unmet.len(), 1);
        assert_eq!(unmet[0].method, "reset");

        let _: () = control.invoke("reset", (), || ());
        assert!(control.verify(VerifyMode::Required).is_empty());
    }

    #[test]
    fn verify_all_checks_stubbed_members() {
        let control = MockControl::new("Greeter", Behavior::Loose);
        control.returns::<(), u32>("count", 3);
        control.require("reset");

        let unmet = control.verify(VerifyMode::All);
        let methods: Vec<&str> = unmet.iter().map(|u| u.method).collect();
        assert_eq!(methods, vec!["count", "reset"]);

        let _: u32 = control.invoke("count", (), || 0);
        let _: () = control.invoke("reset", (), || ());
        assert!(control.verify(VerifyMode::All).is_empty());
    }

    #[test]
    fn clones_share_state() {
        let control = MockControl::new("Greeter", Behavior::Loose);
        let other = control.clone();

        other.returns::<(), u32>("count", 5);
        let out: u32 = control.invoke("count", (), || 0);

        assert_eq!(out, 5);
        assert_eq!(other.call_count("count"), 1);
    }
}

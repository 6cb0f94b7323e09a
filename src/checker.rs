use crate::predicate::Predicate;
use std::collections::HashMap;

/// A checker decides whether a first-party caveat predicate holds
///
/// Implement this trait to provide custom caveat logic. The verifier treats
/// predicates as opaque bytes and asks each registered checker in turn; a
/// single approval satisfies the caveat.
pub trait Checker: Send + Sync {
    /// Returns true if the predicate is satisfied
    fn check(&self, predicate: &[u8]) -> bool;
}

impl<C: Checker + ?Sized> Checker for Box<C> {
    fn check(&self, predicate: &[u8]) -> bool {
        (**self).check(predicate)
    }
}

/// A checker that approves every predicate
///
/// Useful for testing or when you only care about signature verification
pub struct AcceptAll;

impl Checker for AcceptAll {
    fn check(&self, _predicate: &[u8]) -> bool {
        true
    }
}

/// A checker that declines every predicate
pub struct RejectAll;

impl Checker for RejectAll {
    fn check(&self, _predicate: &[u8]) -> bool {
        false
    }
}

/// Approves exactly one predicate, byte for byte
///
/// # Example
/// ```
/// use macaroons::checker::{Checker, ExactChecker};
///
/// let checker = ExactChecker::new("account = 3735928559");
/// assert!(checker.check(b"account = 3735928559"));
/// assert!(!checker.check(b"account = 3735928559 "));
/// ```
pub struct ExactChecker {
    expected: Vec<u8>,
}

impl ExactChecker {
    pub fn new(expected: impl Into<Vec<u8>>) -> Self {
        Self {
            expected: expected.into(),
        }
    }
}

impl Checker for ExactChecker {
    fn check(&self, predicate: &[u8]) -> bool {
        predicate == self.expected.as_slice()
    }
}

/// A function-based checker for simple use cases
///
/// # Example
/// ```
/// use macaroons::checker::{Checker, FnChecker};
///
/// let checker = FnChecker::new(|predicate| predicate.starts_with(b"time < "));
///
/// assert!(checker.check(b"time < 2030-01-01T00:00:00Z"));
/// assert!(!checker.check(b"account = bob"));
/// ```
pub struct FnChecker<F>
where
    F: Fn(&[u8]) -> bool + Send + Sync,
{
    func: F,
}

impl<F> FnChecker<F>
where
    F: Fn(&[u8]) -> bool + Send + Sync,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Checker for FnChecker<F>
where
    F: Fn(&[u8]) -> bool + Send + Sync,
{
    fn check(&self, predicate: &[u8]) -> bool {
        (self.func)(predicate)
    }
}

/// Evaluates `key op value` predicates against a context map
///
/// Predicates that are not UTF-8 or do not parse are declined, leaving them
/// to other checkers.
///
/// # Example
/// ```
/// use macaroons::checker::{Checker, ContextChecker};
///
/// let checker = ContextChecker::empty()
///     .with("account", "alice")
///     .with("time", "2025-06-01T12:00:00Z");
///
/// assert!(checker.check(b"account = alice"));
/// assert!(checker.check(b"time < 2025-12-31T23:59:59Z"));
/// assert!(!checker.check(b"account = bob"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContextChecker {
    context: HashMap<String, String>,
}

impl ContextChecker {
    pub fn new(context: HashMap<String, String>) -> Self {
        Self { context }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds a key-value pair to the context
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.context.insert(key.into(), value.into());
    }
}

impl Checker for ContextChecker {
    fn check(&self, predicate: &[u8]) -> bool {
        let Ok(text) = std::str::from_utf8(predicate) else {
            return false;
        };

        Predicate::parse(text).is_some_and(|p| p.evaluate(&self.context))
    }
}

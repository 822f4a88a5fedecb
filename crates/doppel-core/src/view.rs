//! Verification view of a double
//!
//! [`SpyView`] hands out recorders instead of values, for asserting on calls
//! and reconfiguring behavior. It is read-only: every write fails.

use crate::error::{DoubleError, DoubleResult};
use crate::recorder::MemberRecorder;
use crate::registry::Registry;
use doppel_spy::Spy;
use doppel_value::Value;
use std::fmt;
use std::rc::Rc;

/// Read-only view exposing the recorder of each member
#[derive(Clone)]
pub struct SpyView {
    registry: Rc<Registry>,
}

impl SpyView {
    pub(crate) fn new(registry: Rc<Registry>) -> Self {
        Self { registry }
    }

    /// Recorder for `name`, instrumenting it on first access
    ///
    /// # Errors
    /// Returns `ReservedKeyViolation` for the reserved key
    pub fn get(&self, name: &str) -> DoubleResult<MemberRecorder> {
        self.registry.ensure(name)
    }

    /// Always fails; the view is read-only
    ///
    /// # Errors
    /// Always returns `ReadOnlyVerificationFacade`
    pub fn set(&self, name: &str, _value: impl Into<Value>) -> DoubleResult<()> {
        tracing::warn!("rejected write to {}.{}", self.registry.reserved_key(), name);
        Err(DoubleError::read_only(self.registry.reserved_key(), name))
    }

    /// Function spy of `name`
    ///
    /// # Errors
    /// Returns `WrongFacetAccess` if `name` is a property
    pub fn func(&self, name: &str) -> DoubleResult<Spy> {
        self.get(name)?.func().cloned()
    }

    /// Getter spy of `name`
    ///
    /// # Errors
    /// Returns `WrongFacetAccess` if `name` is a function
    pub fn getter(&self, name: &str) -> DoubleResult<Spy> {
        self.get(name)?.getter().cloned()
    }

    /// Setter spy of `name`
    ///
    /// # Errors
    /// Returns `WrongFacetAccess` if `name` is a function
    pub fn setter(&self, name: &str) -> DoubleResult<Spy> {
        self.get(name)?.setter().cloned()
    }

    /// Boxed value of property `name`
    ///
    /// # Errors
    /// Returns `WrongFacetAccess` if `name` is a function
    pub fn stored_value(&self, name: &str) -> DoubleResult<Value> {
        self.get(name)?.value()
    }

    /// Number of instrumented members
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Check if no member was touched yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check whether both views belong to the same double
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.registry, &other.registry)
    }
}

impl fmt::Debug for SpyView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SpyView").field(&self.registry).finish()
    }
}

//! Spy factories
//!
//! [`SpyFactory`] is the capability a double needs from its host test
//! framework: create a named spy, and create a get/set pair for an accessor.

use crate::spy::Spy;
use doppel_value::Callable;
use std::cell::RefCell;
use std::fmt::Debug;

/// Getter/setter spies installed on one accessor
#[derive(Debug, Clone)]
pub struct AccessorSpies {
    /// Spy invoked on every read
    pub get: Spy,
    /// Spy invoked on every write, with the written value as sole argument
    pub set: Spy,
}

/// Source of spies for a double
pub trait SpyFactory: Debug {
    /// Create spy for a function member
    ///
    /// `original` is the blueprint's implementation, used by call-through.
    fn create_spy(&self, name: &str, original: Option<Callable>) -> Spy;

    /// Create getter/setter spies for a property member
    fn spy_on_accessor(&self, name: &str) -> AccessorSpies {
        AccessorSpies {
            get: self.create_spy(&format!("{name}.get"), None),
            set: self.create_spy(&format!("{name}.set"), None),
        }
    }
}

/// Factory producing free-standing spies
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultSpyFactory;

impl DefaultSpyFactory {
    /// Create factory
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SpyFactory for DefaultSpyFactory {
    fn create_spy(&self, name: &str, original: Option<Callable>) -> Spy {
        Spy::with_original(name, original)
    }
}

/// Factory that remembers every spy it creates
///
/// Lets a test harness clear all call histories between cases.
#[derive(Debug, Default)]
pub struct TrackingSpyFactory {
    spies: RefCell<Vec<Spy>>,
}

impl TrackingSpyFactory {
    /// Create empty factory
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All spies created so far, in creation order
    #[must_use]
    pub fn spies(&self) -> Vec<Spy> {
        self.spies.borrow().clone()
    }

    /// Find a spy by name
    #[must_use]
    pub fn find(&self, name: &str) -> Option<Spy> {
        self.spies
            .borrow()
            .iter()
            .find(|spy| spy.name() == name)
            .cloned()
    }

    /// Number of spies created
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.spies.borrow().len()
    }

    /// Check if no spies were created
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spies.borrow().is_empty()
    }

    /// Clear the call history of every spy
    pub fn reset_all(&self) {
        let spies = self.spies();
        tracing::debug!("resetting call history of {} spies", spies.len());
        for spy in &spies {
            spy.reset_calls();
        }
    }
}

impl SpyFactory for TrackingSpyFactory {
    fn create_spy(&self, name: &str, original: Option<Callable>) -> Spy {
        let spy = Spy::with_original(name, original);
        self.spies.borrow_mut().push(spy.clone());
        spy
    }
}

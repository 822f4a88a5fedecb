//! Mock factory
//!
//! Single entry point turning a blueprint into a [`Double`].

use crate::config::MockConfig;
use crate::double::Double;
use crate::registry::Registry;
use doppel_spy::{DefaultSpyFactory, SpyFactory};
use doppel_value::Shape;
use std::rc::Rc;

/// Creates doubles sharing one configuration and spy source
///
/// Doubles never share state with each other, even when created by the same
/// factory.
#[derive(Debug, Clone)]
pub struct MockFactory {
    config: MockConfig,
    spies: Rc<dyn SpyFactory>,
}

impl MockFactory {
    /// Create factory with default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With configuration
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: MockConfig) -> Self {
        self.config = config;
        self
    }

    /// With spy source
    #[inline]
    #[must_use]
    pub fn with_spy_factory(mut self, spies: Rc<dyn SpyFactory>) -> Self {
        self.spies = spies;
        self
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    /// Create a double imitating `blueprint`
    #[must_use]
    pub fn create<S: Shape + 'static>(&self, blueprint: S) -> Double {
        self.create_shared(Rc::new(blueprint))
    }

    /// Create a double from a shared blueprint
    ///
    /// Class-like blueprints are resolved to their prototype; anything else
    /// is used as the shape directly.
    #[must_use]
    pub fn create_shared(&self, blueprint: Rc<dyn Shape>) -> Double {
        let shape = blueprint.prototype().unwrap_or(blueprint);
        tracing::debug!("creating double for {:?}", shape);
        Double::new(Registry::new(
            shape,
            Rc::clone(&self.spies),
            self.config.clone(),
        ))
    }
}

impl Default for MockFactory {
    fn default() -> Self {
        Self {
            config: MockConfig::default(),
            spies: Rc::new(DefaultSpyFactory),
        }
    }
}

/// Create a double with the default factory
#[must_use]
pub fn create<S: Shape + 'static>(blueprint: S) -> Double {
    MockFactory::new().create(blueprint)
}

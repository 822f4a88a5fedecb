//! Double configuration

use serde::{Deserialize, Serialize};

/// Reserved key under which the verification view is reachable
pub const DEFAULT_RESERVED_KEY: &str = "_spy";

/// Configuration shared by every double a factory creates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    /// Member name that yields the verification view from the stub
    pub reserved_key: String,
    /// Emit a trace event for every stub read and write
    pub trace_accesses: bool,
}

impl MockConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With reserved key
    #[inline]
    #[must_use]
    pub fn with_reserved_key(mut self, key: impl Into<String>) -> Self {
        self.reserved_key = key.into();
        self
    }

    /// With access tracing
    #[inline]
    #[must_use]
    pub fn with_trace_accesses(mut self, enabled: bool) -> Self {
        self.trace_accesses = enabled;
        self
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            reserved_key: DEFAULT_RESERVED_KEY.to_string(),
            trace_accesses: false,
        }
    }
}

use serde::{Deserialize, Serialize};

/// Configuration for the deferred-update executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Whether batch entry points may run deferred updates inline at all.
    /// With this off, every update goes through the enqueue path.
    pub opportunistic_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            opportunistic_enabled: true,
        }
    }
}

impl Config {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable opportunistic inline execution.
    pub fn with_opportunistic_enabled(mut self, enabled: bool) -> Self {
        self.opportunistic_enabled = enabled;
        self
    }
}

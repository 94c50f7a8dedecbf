//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Router configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Deadline for calls that do not carry their own timeout, in
    /// milliseconds. Zero falls back to 5000 at router construction.
    pub default_timeout_ms: u64,

    /// Cadence of the background deadline sweep, in milliseconds.
    pub sweep_interval_ms: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: 5_000,
            sweep_interval_ms: 100,
        }
    }
}

impl RouterConfig {
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: RouterConfig = toml::from_str("").unwrap();
        assert_eq!(config.default_timeout_ms, 5_000);
        assert_eq!(config.sweep_interval_ms, 100);
    }

    #[test]
    fn test_partial_config() {
        let config: RouterConfig = toml::from_str("default_timeout_ms = 250").unwrap();
        assert_eq!(config.default_timeout(), Duration::from_millis(250));
        assert_eq!(config.sweep_interval_ms, 100);
    }
}

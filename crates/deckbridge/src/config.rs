//! Dispatch configuration.

use std::path::Path;
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

fn default_ready_timeout_ms() -> u64 {
    10_000
}

/// Tunables for the command dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// How long a dispatch waits for a bridge to register before degrading to
    /// a timeout outcome. Overridable per call.
    #[serde(default = "default_ready_timeout_ms")]
    pub ready_timeout_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            ready_timeout_ms: default_ready_timeout_ms(),
        }
    }
}

impl DispatchConfig {
    /// Layered load: defaults, then an optional TOML file, then `DECKBRIDGE_*`
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed("DECKBRIDGE_")).extract()
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout_is_ten_seconds() {
        let config = DispatchConfig::default();
        assert_eq!(config.ready_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_file_overrides_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deckbridge.toml");
        std::fs::write(&path, "ready_timeout_ms = 250\n").unwrap();

        let config = DispatchConfig::load(Some(&path)).unwrap();
        assert_eq!(config.ready_timeout_ms, 250);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = DispatchConfig::load(None).unwrap();
        assert_eq!(config.ready_timeout_ms, 10_000);
    }
}

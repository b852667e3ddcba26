//! Replay configuration.

use std::path::PathBuf;

use beacon_tips::{Platform, Result};

/// Configuration for a replay run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayConfig {
    /// Session script to replay
    pub script: PathBuf,

    /// JSON file holding the durable key-value store
    pub store_path: PathBuf,

    /// Force a platform instead of detecting it from the script's device
    pub platform: Option<Platform>,
}

impl ReplayConfig {
    /// Create config from environment variables with sensible defaults.
    ///
    /// - `BEACON_SCRIPT`: session script (default `session.json`)
    /// - `BEACON_STORE`: store file (default `./beacon-store.json`)
    /// - `BEACON_PLATFORM`: `desktop`, `mobile` or `standalone`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let script = PathBuf::from(
            lookup("BEACON_SCRIPT").unwrap_or_else(|| "session.json".to_string()),
        );

        let store_path = PathBuf::from(
            lookup("BEACON_STORE").unwrap_or_else(|| "./beacon-store.json".to_string()),
        );

        let platform = lookup("BEACON_PLATFORM")
            .filter(|p| !p.trim().is_empty())
            .map(|p| p.trim().parse::<Platform>())
            .transpose()?;

        Ok(Self {
            script,
            store_path,
            platform,
        })
    }

    /// Override the script path, e.g. from the command line.
    pub fn with_script(mut self, script: impl Into<PathBuf>) -> Self {
        self.script = script.into();
        self
    }
}

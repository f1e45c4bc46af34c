//! Engine configuration, read from TOML.
//!
//! ```toml
//! [general]
//! tick_rate = 20
//! hybrid_supernaturals = false
//! log_filter = "info"
//!
//! [storage]
//! player_lookup = "auto"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

use crate::error::Result;

/// Host ticks between scheduler ticks when unset or invalid.
pub const DEFAULT_TICK_RATE: i64 = 20;

/// Largest accepted tick rate (one minute of host ticks).
pub const MAX_TICK_RATE: i64 = 1200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub general: GeneralConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Host ticks between two scheduler ticks.
    pub tick_rate: i64,
    /// Allow more than one supernatural affliction per entity.
    pub hybrid_supernaturals: bool,
    /// Default tracing directive when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            hybrid_supernaturals: false,
            log_filter: "info".to_string(),
        }
    }
}

impl GeneralConfig {
    /// The tick rate as used by the scheduler; always in `1..=MAX_TICK_RATE`.
    pub fn tick_rate(&self) -> u64 {
        if (1..=MAX_TICK_RATE).contains(&self.tick_rate) {
            self.tick_rate as u64
        } else {
            DEFAULT_TICK_RATE as u64
        }
    }
}

/// How persisted records are looked up when an entity joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlayerLookup {
    /// By entity id only.
    Uuid,
    /// By display name, falling back to id.
    Name,
    /// By id, falling back to display name.
    #[default]
    Auto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    pub player_lookup: PlayerLookup,
}

impl EngineConfig {
    /// Parse and validate. Out-of-range values are replaced by defaults with a warning.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(source)?;
        Ok(config.validated())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Replace invalid values by their defaults.
    pub fn validated(mut self) -> Self {
        let rate = self.general.tick_rate;
        if !(1..=MAX_TICK_RATE).contains(&rate) {
            warn!(
                tick_rate = rate,
                max = MAX_TICK_RATE,
                "invalid tick rate, using {DEFAULT_TICK_RATE}"
            );
            self.general.tick_rate = DEFAULT_TICK_RATE;
        }
        if self.general.log_filter.trim().is_empty() {
            self.general.log_filter = GeneralConfig::default().log_filter;
        }
        self
    }
}

//! On-disk level description.
//!
//! A level file names the scoring divisor and world seed, and may override
//! any part of the simulation configuration. Omitted configuration fields
//! keep their defaults.

use pdogs_core::config::{ConfigError, Level, SimConfig};
use serde::{Deserialize, Serialize};

/// Level file contents as written by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelFile {
    /// Display name. Empty when omitted.
    #[serde(default)]
    pub name: String,
    pub divisor: u32,
    pub seed: u32,
    #[serde(default)]
    pub config: SimConfig,
}

/// A validated level ready to hand to the manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedLevel {
    pub name: String,
    pub level: Level,
    pub config: SimConfig,
}

impl LevelFile {
    pub fn level(&self) -> Level {
        Level::new(self.divisor, self.seed)
    }

    /// Validate the level and configuration together.
    pub fn validate(self) -> Result<LoadedLevel, ConfigError> {
        let level = self.level();
        level.validate()?;
        self.config.validate()?;
        Ok(LoadedLevel {
            name: self.name,
            level,
            config: self.config,
        })
    }
}

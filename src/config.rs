use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Parameters shared by the backfill and daily generators.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// RNG seed; one seed drives every draw of a run.
    pub seed: u64,
    /// Population size created by a backfill.
    pub total_users: u32,
    /// Length of the backfill horizon in days.
    pub days_back: u32,
    /// Mean install volume around which the daily generator varies.
    pub base_installs_per_day: u32,
    /// Floor on new installs for a daily run.
    pub min_daily_installs: u32,
    /// Cap on events emitted before `app_close` in a single session.
    pub max_events_per_session: usize,
    /// Returning users sampled as potential inviters on a daily run.
    pub inviter_sample_size: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            total_users: 1000,
            days_back: 30,
            base_installs_per_day: 33,
            min_daily_installs: 5,
            max_events_per_session: 500,
            inviter_sample_size: 100,
        }
    }
}

impl GeneratorConfig {
    /// Read a JSON config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_events_per_session == 0 {
            return Err(Error::Config(
                "max_events_per_session must be at least 1".to_string(),
            ));
        }
        if self.days_back == 0 {
            return Err(Error::Config("days_back must be at least 1".to_string()));
        }
        Ok(())
    }
}

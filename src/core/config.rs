//! Engine configuration and the fixed constants it works against
//!
//! Tunables load from TOML; the constants below are tied to the impulse and
//! consumption formulas and stay compiled in.

use std::path::Path;

use serde::Deserialize;

use crate::core::error::{Result, WellError};

/// Period of the gravity/destroy accumulator (time units)
///
/// Every time this much wall time accumulates, each live well runs one
/// destroy -> terrain -> pull tick. Not configurable: the pull impulse
/// formula is tuned against this cadence.
pub const GRAVITY_PERIOD: f32 = 0.5;

/// Slack subtracted from the destroy radius before pulling
///
/// Entities closer than `destroy_radius - PULL_SKIP_EPSILON` are left to the
/// destruction pass. Without the slack an entity sitting on the boundary
/// could be both consumed and pulled in the same tick.
pub const PULL_SKIP_EPSILON: f32 = 0.01;

/// Energy gained for every non-empty terrain cell cleared
pub const TERRAIN_ENERGY_PER_CELL: f32 = 1.0;

/// Energy gained for consuming an entity without a consumable-energy value
pub const FLAT_CONSUME_ENERGY: f32 = 1.0;

/// One step of the optional energy -> level table
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LevelThreshold {
    /// Minimum energy (inclusive) for this level
    pub min_energy: f32,
    /// Level granted at or above `min_energy`
    pub level: u32,
}

/// Configuration for the well engine
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Period of the energy decay accumulator (time units)
    ///
    /// Every period, each registered well loses its `drain_rate` in energy.
    /// Decoupled from `GRAVITY_PERIOD` so starvation speed can be tuned
    /// without changing how often wells act.
    pub decay_interval: f32,

    /// Drain rate given to wells created with `WellState::new`
    ///
    /// At the default (1.0) and the default decay interval, a well loses one
    /// energy per time unit.
    pub default_drain_rate: f32,

    /// Upper bound on catch-up passes per accumulator per `advance` call
    ///
    /// `None` keeps the unbounded catch-up: after a stall every missed pass
    /// fires. With `Some(n)`, passes beyond `n` are dropped along with the
    /// accumulated time they represent.
    pub max_catch_up_passes: Option<u32>,

    /// Optional energy -> level table, ascending by `min_energy`
    ///
    /// Empty means levels are managed by the caller.
    pub level_thresholds: Vec<LevelThreshold>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            decay_interval: 1.0,
            default_drain_rate: 1.0,
            max_catch_up_passes: None,
            level_thresholds: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Table of levels used by the stock singularity tuning
    pub fn with_standard_levels(mut self) -> Self {
        self.level_thresholds = vec![
            LevelThreshold { min_energy: 1.0, level: 1 },
            LevelThreshold { min_energy: 200.0, level: 2 },
            LevelThreshold { min_energy: 500.0, level: 3 },
            LevelThreshold { min_energy: 1000.0, level: 4 },
            LevelThreshold { min_energy: 2000.0, level: 5 },
            LevelThreshold { min_energy: 3000.0, level: 6 },
        ];
        self
    }

    /// Load and validate config from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse and validate config from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(self.decay_interval.is_finite() && self.decay_interval > 0.0) {
            return Err(WellError::InvalidConfig(format!(
                "decay_interval ({}) must be positive and finite",
                self.decay_interval
            )));
        }

        if !self.default_drain_rate.is_finite() {
            return Err(WellError::InvalidConfig(format!(
                "default_drain_rate ({}) must be finite",
                self.default_drain_rate
            )));
        }

        if self.max_catch_up_passes == Some(0) {
            return Err(WellError::InvalidConfig(
                "max_catch_up_passes must be at least 1 when set".into(),
            ));
        }

        // Thresholds must ascend in energy and never lower the level
        for pair in self.level_thresholds.windows(2) {
            let (lower, upper) = (pair[0], pair[1]);
            if upper.min_energy <= lower.min_energy || upper.level < lower.level {
                return Err(WellError::InvalidConfig(format!(
                    "level thresholds out of order: {:?} then {:?}",
                    lower, upper
                )));
            }
        }

        Ok(())
    }

    /// Level for `energy` according to `level_thresholds`
    ///
    /// Returns `None` when the table is empty.
    pub fn level_for(&self, energy: f32) -> Option<u32> {
        if self.level_thresholds.is_empty() {
            return None;
        }
        let level = self
            .level_thresholds
            .iter()
            .rev()
            .find(|t| energy >= t.min_energy)
            .map(|t| t.level)
            .unwrap_or(0);
        Some(level)
    }
}

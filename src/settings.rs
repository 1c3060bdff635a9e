//! Simulation configuration
//!
//! Loaded from a JSON file by the driver binary; every field has a default
//! so partial files are accepted.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, SimError};
use crate::sim::Direction;

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === World ===
    /// Grid width in cells
    pub width: i32,
    /// Grid height in cells
    pub height: i32,

    // === Local snake ===
    /// Body length of a freshly spawned snake
    pub initial_length: u32,
    /// Heading of a freshly spawned snake
    pub initial_direction: Direction,
    /// First food is placed this many cells ahead of the starting head
    pub initial_food_distance: i32,

    // === Food ===
    /// Nutritional value of each food
    pub food_value: u32,
    /// New foods placed every time a food is eaten
    pub foods_per_meal: u32,
    /// Bound on rejection sampling for a free cell
    pub max_placement_attempts: u32,

    // === Rules ===
    /// Whether running into any snake body kills
    pub fatal_snake_collision: bool,

    // === Clock ===
    /// Redraw/flush rate
    pub fine_hz: u32,
    /// Milliseconds between world advancements
    pub coarse_interval_ms: u64,
    /// Most logical ticks run by one `advance` call before the backlog is dropped
    pub max_catch_up: u32,

    /// RNG seed for food placement
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,

            initial_length: INITIAL_LENGTH,
            initial_direction: Direction::Right,
            initial_food_distance: INITIAL_FOOD_DISTANCE,

            food_value: FOOD_VALUE,
            foods_per_meal: 1,
            max_placement_attempts: MAX_PLACEMENT_ATTEMPTS,

            fatal_snake_collision: true,

            fine_hz: FINE_HZ,
            coarse_interval_ms: COARSE_INTERVAL_MS,
            max_catch_up: MAX_CATCH_UP,

            seed: 0,
        }
    }
}

impl SimConfig {
    /// Square grid with all other settings at their defaults
    pub fn with_size(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> Result<(), SimError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(SimError::InvalidConfig("grid dimensions must be positive"));
        }
        // body cells are walked with i32 offsets
        if i64::from(self.width) * i64::from(self.height) > i64::from(i32::MAX / 2) {
            return Err(SimError::InvalidConfig("grid has too many cells"));
        }
        if self.initial_length == 0 {
            return Err(SimError::InvalidConfig("initial_length must be at least 1"));
        }
        if self.fine_hz == 0 {
            return Err(SimError::InvalidConfig("fine_hz must be non-zero"));
        }
        if self.coarse_interval_ms == 0 {
            return Err(SimError::InvalidConfig("coarse_interval_ms must be non-zero"));
        }
        if self.max_placement_attempts == 0 {
            return Err(SimError::InvalidConfig(
                "max_placement_attempts must be non-zero",
            ));
        }
        Ok(())
    }

    /// Period of the fine (flush) clock
    pub fn fine_period(&self) -> Duration {
        Duration::from_secs(1) / self.fine_hz.max(1)
    }

    /// Period of the coarse (advancement) clock
    pub fn coarse_period(&self) -> Duration {
        Duration::from_millis(self.coarse_interval_ms)
    }

    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Config saved to {}", path.as_ref().display());
        Ok(())
    }
}

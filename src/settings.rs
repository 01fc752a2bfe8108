//! Game settings and preferences
//!
//! Runtime configuration for a session, persisted as JSON next to the
//! binary. Missing fields fall back to their defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SimError};
use crate::sim::SimParams;

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Base car speed multiplier
    pub fn car_speed_multiplier(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.75,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.4,
        }
    }

    /// Base train speed multiplier
    pub fn train_speed_multiplier(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.8,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.25,
        }
    }

    /// Parameters a fresh session starts from
    pub fn default_params(&self) -> Result<SimParams> {
        let mut params = SimParams::new();
        params.set_car_speed_multiplier(self.car_speed_multiplier())?;
        params.set_train_speed_multiplier(self.train_speed_multiplier())?;
        Ok(params)
    }
}

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    /// Simulation ticks per second
    pub tick_rate_hz: u32,
    /// Fixed RNG seed; random when absent
    pub seed: Option<u64>,
    /// Lifetime of a picked-up power-up
    pub power_up_duration_ms: f32,
    /// Direction commands that may wait for the simulation thread
    pub input_queue_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            tick_rate_hz: TICK_RATE_HZ,
            seed: None,
            power_up_duration_ms: POWER_UP_DURATION_MS,
            input_queue_capacity: INPUT_QUEUE_CAPACITY,
        }
    }
}

impl Settings {
    /// Sleep between two ticks
    pub fn tick_interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.tick_rate_hz.max(1) as u64)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_rate_hz == 0 {
            return Err(SimError::InvalidParameter {
                name: "tick_rate_hz",
                value: self.tick_rate_hz.to_string(),
            });
        }
        if !self.power_up_duration_ms.is_finite() || self.power_up_duration_ms <= 0.0 {
            return Err(SimError::InvalidParameter {
                name: "power_up_duration_ms",
                value: self.power_up_duration_ms.to_string(),
            });
        }
        if self.input_queue_capacity == 0 {
            return Err(SimError::InvalidParameter {
                name: "input_queue_capacity",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file; a missing file means defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

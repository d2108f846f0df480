use crate::error::ConfigError;
use anyhow::{Context, Result};
use arrowex_core::ClickRegions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub screen_width: u32,
    pub screen_height: u32,
    /// Loop rate; also the sample rate of pointer trajectories
    pub tick_rate_hz: f64,
    pub element_count: usize,
    pub active_duration_ms: u64,
    pub feedback_duration_ms: u64,
    /// Discrete motion intensities, each scheduled `repetitions` times
    pub motion_percents: Vec<u8>,
    pub repetitions: usize,
    /// Pointer samples above this line (smaller y) count as crossing
    pub reference_line_y: f64,
    pub field: FieldConfig,
    pub regions: ClickRegions,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            screen_width: 900,
            screen_height: 700,
            tick_rate_hz: 60.0,
            element_count: 40,
            active_duration_ms: 800,
            feedback_duration_ms: 1000,
            motion_percents: vec![0, 10, 25, 50, 80],
            repetitions: 2,
            reference_line_y: 525.0,
            field: FieldConfig::default(),
            regions: ClickRegions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub bounds: FieldBounds,
    pub min_separation: f64,
    pub max_attempts: usize,
    /// Pixels per tick for moving elements
    pub speed: f64,
    pub arrow_length: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            bounds: FieldBounds::default(),
            min_separation: 28.0,
            max_attempts: 5000,
            speed: 2.5,
            arrow_length: 20.0,
        }
    }
}

/// Inclusive integer rectangle arrows are placed in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldBounds {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
}

impl Default for FieldBounds {
    fn default() -> Self {
        // 120 px side margins on a 900 px canvas, 40 px above the reference line
        Self {
            x_min: 120,
            x_max: 780,
            y_min: 100,
            y_max: 485,
        }
    }
}

impl ExperimentConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: ExperimentConfig =
            toml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.motion_percents.is_empty() {
            return Err(ConfigError::NoMotionPercents);
        }
        if let Some(&p) = self.motion_percents.iter().find(|&&p| p > 100) {
            return Err(ConfigError::MotionPercentOutOfRange(p));
        }
        if self.repetitions == 0 {
            return Err(ConfigError::NoRepetitions);
        }
        if self.element_count == 0 {
            return Err(ConfigError::NoElements);
        }
        if !(self.tick_rate_hz > 0.0) {
            return Err(ConfigError::InvalidTickRate(self.tick_rate_hz));
        }
        if !(self.field.min_separation >= 0.0) {
            return Err(ConfigError::InvalidSeparation(self.field.min_separation));
        }
        let b = self.field.bounds;
        if b.x_min > b.x_max || b.y_min > b.y_max {
            return Err(ConfigError::InvertedBounds {
                x_min: b.x_min,
                x_max: b.x_max,
                y_min: b.y_min,
                y_max: b.y_max,
            });
        }
        Ok(())
    }

    pub fn total_rounds(&self) -> usize {
        self.motion_percents.len() * self.repetitions
    }

    pub fn active_duration(&self) -> Duration {
        Duration::from_millis(self.active_duration_ms)
    }

    pub fn feedback_duration(&self) -> Duration {
        Duration::from_millis(self.feedback_duration_ms)
    }
}

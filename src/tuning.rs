//! Data-driven game balance
//!
//! Every constant that shapes a session lives here so a JSON file can
//! rebalance the game without a rebuild. Missing fields fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::PatternLevels;

/// Errors raised while loading tuning data
#[derive(thiserror::Error, Debug)]
pub enum TuningError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse error
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Values that would break the simulation
    #[error("Invalid tuning: {0}")]
    Invalid(String),
}

/// Game balance constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Session ===
    /// Lives at session start
    pub lives: u32,
    /// Final level; clearing it wins the game
    pub max_levels: u32,
    /// Score awarded per destroyed brick
    pub brick_score: u64,

    // === Ball ===
    /// Ball diameter
    pub ball_size: i32,
    /// Per-axis speed of a freshly spawned ball
    pub ball_speed: i32,
    /// Balls in the default ball set
    pub ball_count: u32,

    // === Paddle ===
    pub paddle_width: i32,
    pub paddle_height: i32,
    /// Distance from the arena bottom to the paddle top
    pub paddle_bottom_offset: i32,
    /// Base paddle speed (pixels per tick)
    pub paddle_speed: i32,

    // === Power-ups ===
    /// PADDLE_SPEED multiplier
    pub paddle_speed_multiplier: f32,
    /// PADDLE_SPEED duration (ticks)
    pub paddle_speed_ticks: u32,
    /// PADDLE_GROW width increment
    pub paddle_grow_amount: i32,
    /// PADDLE_GROW hold duration before easing back (ticks)
    pub paddle_grow_ticks: u32,
    /// Width cap while stacked grow boosts are active
    pub paddle_max_width: i32,
    /// Width lost per tick while easing back to base
    pub paddle_shrink_rate: i32,
    /// Power-up capsule edge length
    pub power_up_size: i32,
    /// Power-up fall speed (pixels per tick)
    pub power_up_fall_speed: i32,
    /// BALL_CLONE spawn offset on both axes
    pub clone_offset: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lives: 3,
            max_levels: 7,
            brick_score: 100,

            ball_size: 12,
            ball_speed: 5,
            ball_count: 1,

            paddle_width: 100,
            paddle_height: 18,
            paddle_bottom_offset: 50,
            paddle_speed: 6,

            paddle_speed_multiplier: 1.8,
            paddle_speed_ticks: 60 * 5,
            paddle_grow_amount: 80,
            paddle_grow_ticks: 60 * 10,
            paddle_max_width: 260,
            paddle_shrink_rate: 2,
            power_up_size: 14,
            power_up_fall_speed: 3,
            clone_offset: 8,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&contents)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for writing a starter file)
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |msg: &str| Err(TuningError::Invalid(msg.to_string()));

        if self.lives == 0 {
            return invalid("lives must be at least 1");
        }
        if self.max_levels == 0 || self.max_levels > PatternLevels::LEVEL_COUNT {
            return Err(TuningError::Invalid(format!(
                "max_levels must be within 1..={}",
                PatternLevels::LEVEL_COUNT
            )));
        }
        if self.ball_size <= 0 || self.paddle_width <= 0 || self.paddle_height <= 0 {
            return invalid("ball and paddle sizes must be positive");
        }
        if self.ball_speed <= 0 {
            return invalid("ball_speed must be positive");
        }
        if self.ball_count == 0 {
            return invalid("ball_count must be at least 1");
        }
        if self.paddle_speed <= 0 || self.paddle_speed_multiplier < 1.0 {
            return invalid("paddle speed must be positive and boosts must not slow it down");
        }
        if self.paddle_max_width < self.paddle_width || self.paddle_shrink_rate <= 0 {
            return invalid("paddle_max_width must cover the base width and shrink rate be positive");
        }
        if self.power_up_size <= 0 || self.power_up_fall_speed <= 0 {
            return invalid("power-ups must have a positive size and fall speed");
        }
        Ok(())
    }
}

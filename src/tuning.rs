//! Data-driven game balance
//!
//! Every field has a default, so a tuning document only needs to name the
//! values it overrides.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_LIVES;

/// Errors raised while loading a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning field `{field}` out of range: {reason}")]
    OutOfRange {
        field: &'static str,
        reason: &'static str,
    },
}

/// Balance knobs for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Lives at the start of a run
    pub initial_lives: u8,
    /// Baseline horizontal speed (pixels per frame)
    pub initial_speed: f32,
    /// Speed added each time the score reaches a multiple of `speed_step_score`
    pub speed_step: f32,
    pub speed_step_score: u64,

    /// Vertical velocity applied by a jump (negative is up)
    pub jump_power: f32,
    /// Added to vertical velocity every frame
    pub gravity: f32,
    /// Minimum time between the first and second jump
    pub jump_cooldown_ms: f64,

    /// Special attacks available per run
    pub special_charges: u8,

    /// Obstacle spawn interval at score 0
    pub base_obstacle_interval_ms: f64,
    /// Interval floor
    pub min_obstacle_interval_ms: f64,
    /// Per-frame power-up spawn probability
    pub power_up_chance: f64,
    /// Share of power-ups that grant a life
    pub life_power_up_weight: f64,
    /// Upper bound of the random speed added to new obstacles
    pub obstacle_speed_jitter: f32,
    /// Upper bound of the random speed added to new power-ups
    pub power_up_speed_jitter: f32,

    /// Awarded when an obstacle leaves the field
    pub clear_bonus: u64,
    /// Awarded by a score power-up
    pub score_power_up_bonus: u64,
    /// Awarded by a special attack
    pub special_bonus: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_lives: 2,
            initial_speed: 2.5,
            speed_step: 0.3,
            speed_step_score: 1000,

            jump_power: -16.0,
            gravity: 0.7,
            jump_cooldown_ms: 600.0,

            special_charges: 3,

            base_obstacle_interval_ms: 2000.0,
            min_obstacle_interval_ms: 1000.0,
            power_up_chance: 0.005,
            life_power_up_weight: 0.5,
            obstacle_speed_jitter: 1.0,
            power_up_speed_jitter: 0.5,

            clear_bonus: 10,
            score_power_up_bonus: 50,
            special_bonus: 100,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that every knob keeps the game's invariants intact
    pub fn validate(&self) -> Result<(), TuningError> {
        fn out(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::OutOfRange { field, reason })
        }

        if self.initial_lives == 0 || self.initial_lives > MAX_LIVES {
            return out("initial_lives", "must be between 1 and 5");
        }
        if self.special_charges > crate::consts::MAX_SPECIAL_CHARGES {
            return out("special_charges", "must be at most 3");
        }
        if !(self.initial_speed > 0.0) {
            return out("initial_speed", "must be positive");
        }
        if self.speed_step < 0.0 {
            return out("speed_step", "must not be negative");
        }
        if self.speed_step_score == 0 {
            return out("speed_step_score", "must be positive");
        }
        if !(self.jump_power < 0.0) {
            return out("jump_power", "must be negative (upward)");
        }
        if !(self.gravity > 0.0) {
            return out("gravity", "must be positive");
        }
        if self.jump_cooldown_ms < 0.0 {
            return out("jump_cooldown_ms", "must not be negative");
        }
        if !(self.min_obstacle_interval_ms > 0.0) {
            return out("min_obstacle_interval_ms", "must be positive");
        }
        if self.base_obstacle_interval_ms < self.min_obstacle_interval_ms {
            return out("base_obstacle_interval_ms", "must not be below the minimum interval");
        }
        if !(0.0..=1.0).contains(&self.power_up_chance) {
            return out("power_up_chance", "must be a probability");
        }
        if !(0.0..=1.0).contains(&self.life_power_up_weight) {
            return out("life_power_up_weight", "must be a probability");
        }
        if self.obstacle_speed_jitter < 0.0 || self.power_up_speed_jitter < 0.0 {
            return out("speed_jitter", "must not be negative");
        }
        Ok(())
    }
}

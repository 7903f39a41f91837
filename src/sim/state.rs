//! Game state and core simulation types
//!
//! One `GameState` is the single source of truth for a run. It is created at
//! start, mutated once per frame by `tick`, replaced wholesale on restart and
//! frozen (not destroyed) once the run is over.

use serde::{Deserialize, Serialize};

use super::entities::{Particle, PowerUp, PowerUpKind, Villain};
use super::player::{JumpTracker, Player};
use crate::consts::{MAX_JUMPS, MAX_SPECIAL_CHARGES};
use crate::tuning::Tuning;

/// Something the outside world may want to react to (sound, flash, HUD)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Jump impulse applied; `count` is the jump number (1 or 2)
    Jumped { count: u8 },
    /// An obstacle left the field and was scored
    ObstacleCleared,
    /// The player ran into an obstacle
    ObstacleHit { lives_left: u8 },
    PowerUpCollected { kind: PowerUpKind },
    /// A special attack fired and destroyed `destroyed` obstacles
    SpecialAttack { destroyed: usize },
    /// Request a full-screen flash overlay
    ScreenFlash,
    /// Baseline speed went up
    SpeedUp { speed: f32 },
    /// Terminal state reached; snapshot of the final score
    GameOver { final_score: u64 },
}

/// Complete game state for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub score: u64,
    /// 0..=MAX_LIVES; reaching 0 ends the run
    pub lives: u8,
    pub game_over: bool,
    /// Baseline horizontal speed for new entities (pixels per frame)
    pub game_speed: f32,
    pub player: Player,
    /// Ordered by spawn time
    pub obstacles: Vec<Villain>,
    pub power_ups: Vec<PowerUp>,
    pub particles: Vec<Particle>,
    pub special_particles: Vec<Particle>,
    pub last_obstacle_spawn_ms: f64,
    pub obstacle_interval_ms: f64,
    pub jumps: JumpTracker,
    /// 0..=MAX_SPECIAL_CHARGES
    pub special_charges: u8,
    /// Last score multiple that raised the speed (fires once per multiple)
    pub last_speed_up_score: u64,
    /// Frames simulated this run
    pub frame: u64,
    pub tuning: Tuning,
    /// Events raised since the owner last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh run with the player resting on the ground
    pub fn new(tuning: Tuning) -> Self {
        Self {
            score: 0,
            lives: tuning.initial_lives,
            game_over: false,
            game_speed: tuning.initial_speed,
            player: Player::new(&tuning),
            obstacles: Vec::new(),
            power_ups: Vec::new(),
            particles: Vec::new(),
            special_particles: Vec::new(),
            last_obstacle_spawn_ms: 0.0,
            obstacle_interval_ms: tuning.base_obstacle_interval_ms,
            jumps: JumpTracker::new(tuning.jump_cooldown_ms),
            special_charges: tuning.special_charges.min(MAX_SPECIAL_CHARGES),
            last_speed_up_score: 0,
            frame: 0,
            tuning,
            events: Vec::new(),
        }
    }

    /// Replace every field with its initial value, keeping the tuning
    pub fn reset(&mut self) {
        *self = Self::new(self.tuning.clone());
    }

    pub fn max_jumps(&self) -> u8 {
        MAX_JUMPS
    }

    pub fn max_special_charges(&self) -> u8 {
        MAX_SPECIAL_CHARGES
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_initial_values() {
        let state = GameState::default();
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 2);
        assert!(!state.game_over);
        assert_eq!(state.game_speed, 2.5);
        assert_eq!(state.obstacle_interval_ms, 2000.0);
        assert_eq!(state.jumps.count, 0);
        assert_eq!(state.jumps.cooldown_ms, 600.0);
        assert_eq!(state.special_charges, 3);
        assert_eq!(state.max_jumps(), 2);
        assert_eq!(state.max_special_charges(), 3);
        assert!(state.player.is_grounded());
    }

    #[test]
    fn test_reset_restores_everything() {
        let mut state = GameState::default();
        state.score = 4321;
        state.lives = 0;
        state.game_over = true;
        state.game_speed = 9.0;
        state.special_charges = 0;
        state.jumps.count = 2;
        state.jumps.last_jump_ms = 99.0;
        state.obstacle_interval_ms = 1000.0;
        state.last_obstacle_spawn_ms = 12345.0;
        state.last_speed_up_score = 4000;
        state.frame = 77;
        state.player.pos.y = 10.0;
        state.player.vel_y = -8.0;
        state.player.is_jumping = true;
        state.obstacles.push(Villain {
            pos: Vec2::new(10.0, 10.0),
            width: 40.0,
            height: 50.0,
            speed: 3.0,
            variant: 2,
        });
        state.events.push(GameEvent::ScreenFlash);

        state.reset();

        let fresh = GameState::default();
        assert_eq!(state.score, fresh.score);
        assert_eq!(state.lives, fresh.lives);
        assert!(!state.game_over);
        assert_eq!(state.game_speed, fresh.game_speed);
        assert_eq!(state.special_charges, fresh.special_charges);
        assert_eq!(state.jumps, fresh.jumps);
        assert_eq!(state.obstacle_interval_ms, fresh.obstacle_interval_ms);
        assert_eq!(state.last_obstacle_spawn_ms, 0.0);
        assert_eq!(state.last_speed_up_score, 0);
        assert_eq!(state.frame, 0);
        assert!(state.obstacles.is_empty());
        assert!(state.events.is_empty());
        assert_eq!(state.player.pos.y, state.player.ground_y);
        assert_eq!(state.player.vel_y, 0.0);
        assert!(!state.player.is_jumping);
    }

    #[test]
    fn test_custom_tuning_survives_reset() {
        let mut state = GameState::new(Tuning {
            initial_lives: 4,
            ..Tuning::default()
        });
        state.lives = 1;
        state.reset();
        assert_eq!(state.lives, 4);
    }
}

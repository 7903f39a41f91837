//! Player controller: jump state machine plus gravity integration

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Bounds, Rect};
use crate::consts::{MAX_JUMPS, PLAYER_SIZE, PLAYER_X};
use crate::ground_y;
use crate::tuning::Tuning;

/// Where the player is in a jump sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpPhase {
    Grounded,
    /// Airborne after `n` jumps (1 or 2)
    Jumping(u8),
}

/// Jump bookkeeping shared with the HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpTracker {
    /// Jumps used since last touching the ground (0..=MAX_JUMPS)
    pub count: u8,
    /// Timestamp of the most recent jump
    pub last_jump_ms: f64,
    /// Required gap between first and second jump
    pub cooldown_ms: f64,
}

impl JumpTracker {
    pub fn new(cooldown_ms: f64) -> Self {
        Self {
            count: 0,
            last_jump_ms: 0.0,
            cooldown_ms,
        }
    }

    pub fn phase(&self) -> JumpPhase {
        match self.count {
            0 => JumpPhase::Grounded,
            n => JumpPhase::Jumping(n),
        }
    }

    /// Jumps still available before landing
    pub fn remaining(&self) -> u8 {
        MAX_JUMPS.saturating_sub(self.count)
    }

    /// Consume a jump if the state machine allows one at `now_ms`
    fn try_take(&mut self, now_ms: f64) -> bool {
        let allowed = match self.phase() {
            JumpPhase::Grounded => true,
            JumpPhase::Jumping(1) => now_ms - self.last_jump_ms >= self.cooldown_ms,
            JumpPhase::Jumping(_) => false,
        };
        if allowed {
            self.count += 1;
            self.last_jump_ms = now_ms;
        }
        allowed
    }
}

/// The runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner; x never changes
    pub pos: Vec2,
    pub vel_y: f32,
    pub width: f32,
    pub height: f32,
    /// Set by the first jump, cleared on landing
    pub is_jumping: bool,
    pub jump_power: f32,
    pub gravity: f32,
    /// Resting y of the top edge
    pub ground_y: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        let ground = ground_y();
        Self {
            pos: Vec2::new(PLAYER_X, ground),
            vel_y: 0.0,
            width: PLAYER_SIZE,
            height: PLAYER_SIZE,
            is_jumping: false,
            jump_power: tuning.jump_power,
            gravity: tuning.gravity,
            ground_y: ground,
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.pos.y >= self.ground_y
    }

    /// Advance one frame. Returns true if a jump impulse was applied.
    ///
    /// The controller does not debounce: the caller must deliver at most one
    /// `jump_requested` pulse per physical press.
    pub fn update(&mut self, jumps: &mut JumpTracker, jump_requested: bool, now_ms: f64) -> bool {
        let jumped = jump_requested && jumps.try_take(now_ms);
        if jumped {
            self.vel_y = self.jump_power;
            self.is_jumping = true;
        }

        // Integrate unconditionally, then clamp to the floor
        self.vel_y += self.gravity;
        self.pos.y += self.vel_y;

        if self.pos.y >= self.ground_y {
            self.pos.y = self.ground_y;
            self.vel_y = 0.0;
            self.is_jumping = false;
            jumps.count = 0;
        }

        jumped
    }
}

impl Bounds for Player {
    fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }
}

//! Demo-mode player
//!
//! Produces the same one-shot requests a human would, so the simulation
//! cannot tell the difference.

use super::player::JumpPhase;
use super::state::GameState;

/// Frames of warning the autopilot wants before an obstacle arrives
const JUMP_LEAD_FRAMES: f32 = 14.0;
/// Obstacles on the field that justify spending a special charge
const CROWD_THRESHOLD: usize = 3;

/// Requests chosen for the next frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutopilotChoice {
    pub jump: bool,
    pub special: bool,
}

/// Decide what to press this frame
pub fn choose(state: &GameState) -> AutopilotChoice {
    let player_front = state.player.pos.x + state.player.width;

    let next_gap = state
        .obstacles
        .iter()
        .filter(|o| o.pos.x + o.width > state.player.pos.x)
        .map(|o| (o.pos.x - player_front, o.speed))
        .min_by(|a, b| a.0.total_cmp(&b.0));

    let jump = match (state.jumps.phase(), next_gap) {
        (JumpPhase::Grounded, Some((gap, speed))) => gap >= 0.0 && gap <= speed * JUMP_LEAD_FRAMES,
        _ => false,
    };

    let special = state.special_charges > 0 && state.obstacles.len() >= CROWD_THRESHOLD;

    AutopilotChoice { jump, special }
}

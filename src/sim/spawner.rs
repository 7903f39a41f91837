//! Time-gated obstacle spawning and random power-up drops

use rand::Rng;

use super::entities::{PowerUp, Villain, push_bounded};
use super::state::GameState;
use crate::consts::{MAX_OBSTACLES, MAX_POWER_UPS};
use crate::tuning::Tuning;

/// Obstacle interval for a score: shrinks by 100ms per 100 points down to the floor
pub fn obstacle_interval_for_score(score: u64, tuning: &Tuning) -> f64 {
    let reduction = (score as f64 / 100.0) * 100.0;
    (tuning.base_obstacle_interval_ms - reduction).max(tuning.min_obstacle_interval_ms)
}

/// Spawn a villain if the interval has elapsed. Returns true on spawn.
pub fn spawn_obstacle<R: Rng>(state: &mut GameState, now_ms: f64, rng: &mut R) -> bool {
    if now_ms - state.last_obstacle_spawn_ms <= state.obstacle_interval_ms {
        return false;
    }

    let villain = Villain::spawn(rng, state.game_speed, state.tuning.obstacle_speed_jitter);
    if !push_bounded(&mut state.obstacles, villain, MAX_OBSTACLES) {
        return false;
    }

    state.last_obstacle_spawn_ms = now_ms;
    state.obstacle_interval_ms = obstacle_interval_for_score(state.score, &state.tuning);
    log::debug!(
        "Villain spawned ({} on field), next in {}ms",
        state.obstacles.len(),
        state.obstacle_interval_ms
    );
    true
}

/// Independent per-frame roll for a power-up. Returns true on spawn.
pub fn spawn_power_up<R: Rng>(state: &mut GameState, rng: &mut R) -> bool {
    if !rng.random_bool(state.tuning.power_up_chance) {
        return false;
    }
    let power_up = PowerUp::spawn(
        rng,
        state.game_speed,
        state.tuning.power_up_speed_jitter,
        state.tuning.life_power_up_weight,
    );
    log::debug!("Power-up spawned: {:?}", power_up.kind);
    push_bounded(&mut state.power_ups, power_up, MAX_POWER_UPS)
}

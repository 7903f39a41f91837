//! Per-frame simulation step
//!
//! Advances the game state by exactly one frame, in a fixed order: player,
//! special attack, spawning, obstacles, power-ups, particles, speed ramp.

use glam::Vec2;
use rand::Rng;

use super::collision::{Bounds, check_collision};
use super::entities::{Entity, Particle, PowerUpKind, advance_all, push_bounded};
use super::spawner::{spawn_obstacle, spawn_power_up};
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Particle colour for a collected life
const LIFE_PARTICLE_COLOR: u32 = 0x2ED573;
/// Particle colour for debris from a special attack
const DESTROY_PARTICLE_COLOR: u32 = 0xFF4500;

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Wall-clock timestamp for cooldowns and spawn timing
    pub now_ms: f64,
    /// One-shot jump request
    pub jump: bool,
    /// One-shot special attack request
    pub special: bool,
    /// Accent colour for hit and score particles (0xRRGGBB)
    pub accent_color: u32,
}

/// Advance the game state by one frame
pub fn tick<R: Rng>(state: &mut GameState, input: &TickInput, rng: &mut R) {
    // Frozen after game over
    if state.game_over {
        return;
    }

    state.frame += 1;

    // Player controller
    if state
        .player
        .update(&mut state.jumps, input.jump, input.now_ms)
    {
        state.events.push(GameEvent::Jumped {
            count: state.jumps.count,
        });
    }

    if input.special {
        special_attack(state, rng);
    }

    spawn_obstacle(state, input.now_ms, rng);
    spawn_power_up(state, rng);

    if update_obstacles(state, input.accent_color, rng) {
        return;
    }
    update_power_ups(state, input.accent_color, rng);

    advance_all(&mut state.particles);
    advance_all(&mut state.special_particles);

    ramp_speed(state);
}

/// Clear the field. A no-op when no charges remain.
fn special_attack<R: Rng>(state: &mut GameState, rng: &mut R) {
    if state.special_charges == 0 {
        return;
    }
    state.special_charges -= 1;

    for _ in 0..SPECIAL_PARTICLES {
        let pos = Vec2::new(
            rng.random::<f32>() * FIELD_WIDTH,
            rng.random::<f32>() * FIELD_HEIGHT,
        );
        push_bounded(
            &mut state.special_particles,
            Particle::flare(rng, pos),
            MAX_SPECIAL_PARTICLES,
        );
    }

    let destroyed = state.obstacles.len();
    for obstacle in std::mem::take(&mut state.obstacles) {
        let center = obstacle.bounds().center();
        burst(state, rng, center, DESTROY_PARTICLE_COLOR, DESTROY_PARTICLES);
    }

    state.score += state.tuning.special_bonus;
    state.events.push(GameEvent::ScreenFlash);
    state.events.push(GameEvent::SpecialAttack { destroyed });
    log::info!(
        "Special attack! {} villains destroyed, {} charges left",
        destroyed,
        state.special_charges
    );
}

/// Move obstacles, score the ones that left, resolve hits.
/// Returns true if the run ended this frame.
fn update_obstacles<R: Rng>(state: &mut GameState, accent: u32, rng: &mut R) -> bool {
    for obstacle in state.obstacles.iter_mut() {
        obstacle.update();
    }

    let before = state.obstacles.len();
    state.obstacles.retain(|o| !o.is_off_screen());
    let cleared = before - state.obstacles.len();
    for _ in 0..cleared {
        state.score += state.tuning.clear_bonus;
        state.events.push(GameEvent::ObstacleCleared);
    }

    let mut i = 0;
    while i < state.obstacles.len() {
        if !check_collision(&state.player, &state.obstacles[i]) {
            i += 1;
            continue;
        }

        state.obstacles.remove(i);
        state.lives = state.lives.saturating_sub(1);
        let center = state.player.bounds().center();
        burst(state, rng, center, accent, HIT_PARTICLES);
        state.events.push(GameEvent::ObstacleHit {
            lives_left: state.lives,
        });

        if state.lives == 0 {
            state.game_over = true;
            state.events.push(GameEvent::GameOver {
                final_score: state.score,
            });
            log::info!("Game over - final score {}", state.score);
            return true;
        }
    }
    false
}

fn update_power_ups<R: Rng>(state: &mut GameState, accent: u32, rng: &mut R) {
    for power_up in state.power_ups.iter_mut() {
        power_up.update();
    }
    state.power_ups.retain(|p| !p.is_off_screen());

    let mut i = 0;
    while i < state.power_ups.len() {
        if !check_collision(&state.player, &state.power_ups[i]) {
            i += 1;
            continue;
        }

        let power_up = state.power_ups.remove(i);
        let center = state.player.bounds().center();
        match power_up.kind {
            PowerUpKind::Life => {
                state.lives = (state.lives + 1).min(MAX_LIVES);
                burst(state, rng, center, LIFE_PARTICLE_COLOR, HIT_PARTICLES);
            }
            PowerUpKind::Score => {
                state.score += state.tuning.score_power_up_bonus;
                burst(state, rng, center, accent, HIT_PARTICLES);
            }
        }
        state.events.push(GameEvent::PowerUpCollected {
            kind: power_up.kind,
        });
    }
}

/// Raise the baseline speed when the score sits on an exact multiple.
///
/// Multiples jumped over in a single frame never fire; each reached multiple
/// fires once.
fn ramp_speed(state: &mut GameState) {
    let step = state.tuning.speed_step_score;
    if state.score > 0 && state.score % step == 0 && state.score != state.last_speed_up_score {
        state.last_speed_up_score = state.score;
        state.game_speed += state.tuning.speed_step;
        state.events.push(GameEvent::SpeedUp {
            speed: state.game_speed,
        });
        log::info!("Speed up at {} points: {:.1}", state.score, state.game_speed);
    }
}

fn burst<R: Rng>(state: &mut GameState, rng: &mut R, center: Vec2, color: u32, count: usize) {
    for _ in 0..count {
        push_bounded(
            &mut state.particles,
            Particle::spark(rng, center, color),
            MAX_PARTICLES,
        );
    }
}

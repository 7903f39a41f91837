//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per frame, clock passed in explicitly
//! - Injected RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod entities;
pub mod player;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Bounds, Rect, check_collision};
pub use entities::{Entity, Particle, ParticleKind, PowerUp, PowerUpKind, Villain};
pub use player::{JumpPhase, JumpTracker, Player};
pub use spawner::obstacle_interval_for_score;
pub use state::{GameEvent, GameState};
pub use tick::{TickInput, tick};

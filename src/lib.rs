//! Dash Runner - a single-screen endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, spawning, collisions, scoring)
//! - `renderer`: Draw-primitive surface and the per-frame scene painter
//! - `audio`: Procedural sound effects (no audio assets)
//! - `platform`: Input debouncing and deferred one-shot timers
//! - `game`: Owned game context tying the above together
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod character;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use character::Character;
pub use game::{FrameOutcome, Game, HudSnapshot};
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (canvas backing size in pixels)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 400.0;

    /// Fixed simulation step (one 60 Hz frame)
    pub const SIM_STEP_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per rendered frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest frame delta fed to the accumulator (tab switches, debugger pauses)
    pub const MAX_FRAME_DELTA_MS: f64 = 100.0;

    /// Player placement
    pub const PLAYER_X: f32 = 150.0;
    pub const PLAYER_SIZE: f32 = 40.0;
    /// Player rests this far above the bottom edge
    pub const GROUND_OFFSET: f32 = 80.0;
    /// Painted floor strip height
    pub const GROUND_STRIP_HEIGHT: f32 = 20.0;

    /// Hard caps on counters
    pub const MAX_LIVES: u8 = 5;
    pub const MAX_JUMPS: u8 = 2;
    pub const MAX_SPECIAL_CHARGES: u8 = 3;

    /// Entity capacity bounds
    pub const MAX_OBSTACLES: usize = 32;
    pub const MAX_POWER_UPS: usize = 16;
    pub const MAX_PARTICLES: usize = 512;
    pub const MAX_SPECIAL_PARTICLES: usize = 256;

    /// Villain size ranges (width, height)
    pub const VILLAIN_MIN_WIDTH: f32 = 35.0;
    pub const VILLAIN_MAX_WIDTH: f32 = 50.0;
    pub const VILLAIN_MIN_HEIGHT: f32 = 45.0;
    pub const VILLAIN_MAX_HEIGHT: f32 = 70.0;
    /// Number of cosmetic villain variants
    pub const VILLAIN_VARIANTS: u8 = 7;

    /// Power-up geometry
    pub const POWER_UP_SIZE: f32 = 20.0;
    /// Power-ups float between these offsets above the bottom edge
    pub const POWER_UP_MIN_LIFT: f32 = 100.0;
    pub const POWER_UP_LIFT_RANGE: f32 = 100.0;

    /// Particle bursts
    pub const HIT_PARTICLES: usize = 10;
    pub const DESTROY_PARTICLES: usize = 15;
    pub const SPECIAL_PARTICLES: usize = 50;
    pub const SPARK_LIFE: u32 = 30;
    pub const FLARE_LIFE: u32 = 60;
}

/// Ground level for the player's top edge
#[inline]
pub fn ground_y() -> f32 {
    consts::FIELD_HEIGHT - consts::GROUND_OFFSET
}

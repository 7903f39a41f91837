//! Field entities: villains, power-ups and particles
//!
//! Each entity knows how to advance itself by one frame. Drawing lives in the
//! renderer so the simulation stays free of surface types.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Bounds, Rect};
use crate::consts::*;

/// Per-frame behaviour shared by every entity list
pub trait Entity {
    /// Advance one frame
    fn update(&mut self);
    /// True once the entity should be dropped from its list
    fn is_expired(&self) -> bool;
}

/// Advance every entity and drop the expired ones, preserving order
pub fn advance_all<E: Entity>(list: &mut Vec<E>) {
    for entity in list.iter_mut() {
        entity.update();
    }
    list.retain(|e| !e.is_expired());
}

/// Push unless the list is already at capacity
pub(crate) fn push_bounded<T>(list: &mut Vec<T>, item: T, cap: usize) -> bool {
    if list.len() >= cap {
        return false;
    }
    list.push(item);
    true
}

/// A hostile runner approaching from the right
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Villain {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Leftward speed in pixels per frame
    pub speed: f32,
    /// Cosmetic sprite variant (0..VILLAIN_VARIANTS)
    pub variant: u8,
}

impl Villain {
    /// Spawn at the right edge, standing on the bottom of the field
    pub fn spawn<R: Rng>(rng: &mut R, base_speed: f32, jitter: f32) -> Self {
        let width = rng.random_range(VILLAIN_MIN_WIDTH..VILLAIN_MAX_WIDTH);
        let height = rng.random_range(VILLAIN_MIN_HEIGHT..VILLAIN_MAX_HEIGHT);
        Self {
            pos: Vec2::new(FIELD_WIDTH, FIELD_HEIGHT - height),
            width,
            height,
            speed: base_speed + rng.random::<f32>() * jitter,
            variant: rng.random_range(0..VILLAIN_VARIANTS),
        }
    }

    /// Fully past the left edge
    pub fn is_off_screen(&self) -> bool {
        self.pos.x + self.width < 0.0
    }
}

impl Entity for Villain {
    fn update(&mut self) {
        self.pos.x -= self.speed;
    }

    fn is_expired(&self) -> bool {
        self.is_off_screen()
    }
}

impl Bounds for Villain {
    fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }
}

/// Power-up effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// +1 life (capped)
    Life,
    /// Score bonus
    Score,
}

/// A floating collectible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub kind: PowerUpKind,
}

impl PowerUp {
    pub fn spawn<R: Rng>(rng: &mut R, base_speed: f32, jitter: f32, life_weight: f64) -> Self {
        let lift = POWER_UP_MIN_LIFT + rng.random::<f32>() * POWER_UP_LIFT_RANGE;
        let speed = base_speed + rng.random::<f32>() * jitter;
        let kind = if rng.random_bool(life_weight) {
            PowerUpKind::Life
        } else {
            PowerUpKind::Score
        };
        Self {
            pos: Vec2::new(FIELD_WIDTH, FIELD_HEIGHT - lift),
            width: POWER_UP_SIZE,
            height: POWER_UP_SIZE,
            speed,
            kind,
        }
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.x + self.width < 0.0
    }
}

impl Entity for PowerUp {
    fn update(&mut self) {
        self.pos.x -= self.speed;
    }

    fn is_expired(&self) -> bool {
        self.is_off_screen()
    }
}

impl Bounds for PowerUp {
    fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }
}

/// Particle flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Small square debris, pulled down by gravity
    Spark,
    /// Spinning diamond from a special attack, slowed by drag
    Flare,
}

const SPARK_GRAVITY: f32 = 0.2;
const FLARE_DRAG: f32 = 0.98;

/// Short-lived visual effect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Frames left
    pub life: u32,
    pub max_life: u32,
    /// 0xRRGGBB (flares use a fixed palette)
    pub color: u32,
    pub size: f32,
    pub rotation: f32,
    pub spin: f32,
}

impl Particle {
    pub fn spark<R: Rng>(rng: &mut R, pos: Vec2, color: u32) -> Self {
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * 10.0,
            (rng.random::<f32>() - 0.5) * 10.0,
        );
        Self {
            kind: ParticleKind::Spark,
            pos,
            vel,
            life: SPARK_LIFE,
            max_life: SPARK_LIFE,
            color,
            size: rng.random::<f32>() * 3.0 + 1.0,
            rotation: 0.0,
            spin: 0.0,
        }
    }

    pub fn flare<R: Rng>(rng: &mut R, pos: Vec2) -> Self {
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * 20.0,
            (rng.random::<f32>() - 0.5) * 20.0,
        );
        Self {
            kind: ParticleKind::Flare,
            pos,
            vel,
            life: FLARE_LIFE,
            max_life: FLARE_LIFE,
            color: 0xFF4500,
            size: rng.random::<f32>() * 8.0 + 4.0,
            rotation: 0.0,
            spin: (rng.random::<f32>() - 0.5) * 0.2,
        }
    }

    /// Opacity from remaining life (1.0 fresh, 0.0 dead)
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            return 0.0;
        }
        self.life as f32 / self.max_life as f32
    }
}

impl Entity for Particle {
    fn update(&mut self) {
        self.pos += self.vel;
        self.life = self.life.saturating_sub(1);
        match self.kind {
            ParticleKind::Spark => self.vel.y += SPARK_GRAVITY,
            ParticleKind::Flare => {
                self.rotation += self.spin;
                self.vel *= FLARE_DRAG;
            }
        }
    }

    fn is_expired(&self) -> bool {
        self.life == 0
    }
}

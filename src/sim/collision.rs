//! Axis-aligned collision detection
//!
//! Everything in the runner is an upright box, so overlap is a plain
//! rectangle test. There is no swept check: a very fast, very thin obstacle
//! can step over the player between frames.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict overlap; touching edges do not count
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Anything that occupies a box on the field
pub trait Bounds {
    fn bounds(&self) -> Rect;
}

impl Bounds for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

/// Check whether two entities overlap
#[inline]
pub fn check_collision(a: &impl Bounds, b: &impl Bounds) -> bool {
    a.bounds().intersects(&b.bounds())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_boxes_collide() {
        let player = Rect::new(150.0, 0.0, 40.0, 40.0);
        let obstacle = Rect::new(160.0, 10.0, 30.0, 30.0);
        assert!(check_collision(&player, &obstacle));
        assert!(check_collision(&obstacle, &player));
    }

    #[test]
    fn test_distant_boxes_miss() {
        let player = Rect::new(150.0, 0.0, 40.0, 40.0);
        let obstacle = Rect::new(300.0, 10.0, 30.0, 30.0);
        assert!(!check_collision(&player, &obstacle));
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!check_collision(&a, &right));
        assert!(!check_collision(&a, &below));
    }

    #[test]
    fn test_containment_collides() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 5.0, 5.0);
        assert!(check_collision(&outer, &inner));
    }

    #[test]
    fn test_center() {
        let r = Rect::new(10.0, 20.0, 40.0, 60.0);
        assert_eq!(r.center(), Vec2::new(30.0, 50.0));
    }
}

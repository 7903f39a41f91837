//! Draw primitives accepted by a render target

use glam::Vec2;

use crate::character::Character;
use crate::consts::VILLAIN_VARIANTS;
use crate::sim::Rect;

/// Artwork ids used for villain sprites, indexed by variant
pub const VILLAIN_SPRITE_IDS: [u16; VILLAIN_VARIANTS as usize] = [52, 92, 109, 124, 143, 149, 150];

/// RGBA colour, 8-bit channels plus float alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::hex(0xFFFFFF);
    pub const BLACK: Color = Color::hex(0x000000);

    /// Opaque colour from 0xRRGGBB
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xFF) as u8,
            g: ((rgb >> 8) & 0xFF) as u8,
            b: (rgb & 0xFF) as u8,
            a: 1.0,
        }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS colour string
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

/// One path command, mirroring the Canvas2D path API
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    MoveTo(Vec2),
    LineTo(Vec2),
    Arc {
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        /// Counter-clockwise sweep
        ccw: bool,
    },
    Close,
}

/// A sequence of path commands filled or stroked as one shape
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    pub ops: Vec<PathOp>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.ops.push(PathOp::MoveTo(Vec2::new(x, y)));
        self
    }

    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        self.ops.push(PathOp::LineTo(Vec2::new(x, y)));
        self
    }

    pub fn arc(mut self, x: f32, y: f32, radius: f32, start: f32, end: f32, ccw: bool) -> Self {
        self.ops.push(PathOp::Arc {
            center: Vec2::new(x, y),
            radius,
            start,
            end,
            ccw,
        });
        self
    }

    /// Full circle as its own subpath
    pub fn circle(self, x: f32, y: f32, radius: f32) -> Self {
        self.move_to(x + radius, y)
            .arc(x, y, radius, 0.0, std::f32::consts::TAU, false)
    }

    pub fn close(mut self) -> Self {
        self.ops.push(PathOp::Close);
        self
    }
}

/// Sprite identity; one image per id is shared by every entity using it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Hero(Character),
    Villain(u8),
}

impl SpriteId {
    /// Artwork id used to build the image URL
    pub fn image_id(&self) -> u16 {
        match self {
            SpriteId::Hero(c) => c.sprite_id(),
            SpriteId::Villain(v) => VILLAIN_SPRITE_IDS[*v as usize % VILLAIN_SPRITE_IDS.len()],
        }
    }
}

/// Load state of a sprite image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageStatus {
    #[default]
    Loading,
    Loaded,
    /// Permanent; the image is never retried
    Failed,
}

/// Render target. Implementations never fail: a primitive that cannot be
/// drawn is skipped.
pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32);
    /// Fill `rect` with a top-to-bottom linear gradient
    fn fill_vertical_gradient(&mut self, rect: Rect, top: Color, bottom: Color);
    fn fill_path(&mut self, path: &Path, color: Color);
    fn stroke_path(&mut self, path: &Path, color: Color, line_width: f32);
    fn draw_image(&mut self, sprite: SpriteId, rect: Rect);
    fn image_status(&self, sprite: SpriteId) -> ImageStatus;
    /// Global alpha for subsequent primitives
    fn set_alpha(&mut self, alpha: f32);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, angle: f32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_css() {
        assert_eq!(Color::hex(0xFF8C00).to_css(), "#ff8c00");
        assert_eq!(Color::rgba(255, 69, 0, 0.3).to_css(), "rgba(255, 69, 0, 0.3)");
        assert_eq!(Color::WHITE.with_alpha(0.7).to_css(), "rgba(255, 255, 255, 0.7)");
    }

    #[test]
    fn test_circle_starts_its_own_subpath() {
        let path = Path::new().circle(10.0, 20.0, 5.0);
        assert_eq!(path.ops[0], PathOp::MoveTo(Vec2::new(15.0, 20.0)));
        assert!(matches!(path.ops[1], PathOp::Arc { radius: 5.0, .. }));
    }

    #[test]
    fn test_sprite_ids() {
        assert_eq!(SpriteId::Hero(Character::Volt).image_id(), 25);
        assert_eq!(SpriteId::Villain(0).image_id(), 52);
        assert_eq!(SpriteId::Villain(6).image_id(), 150);
    }
}

//! Canvas rendering module
//!
//! Paints one frame from a read-only view of the game state. Every entity
//! draws itself through the `Draw` capability onto a `Surface`, falling back
//! to a procedural shape whenever its sprite image is not (or never will be)
//! available.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod draw_list;
pub mod shapes;
pub mod surface;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use draw_list::{DrawCmd, DrawList};
pub use surface::{Color, ImageStatus, Path, PathOp, SpriteId, Surface};

use glam::Vec2;

use crate::character::{Character, Feature};
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH, GROUND_STRIP_HEIGHT};
use crate::sim::{Bounds, GameState, Particle, ParticleKind, Player, PowerUp, PowerUpKind, Rect, Villain};

const SKY_TOP: Color = Color::hex(0x87CEEB);
const SKY_BOTTOM: Color = Color::hex(0x98FB98);
const CLOUD: Color = Color::rgba(255, 255, 255, 0.7);
const GROUND: Color = Color::hex(0x2F3542);
const FLASH: Color = Color::rgba(255, 69, 0, 0.3);

const VILLAIN_BODY: Color = Color::hex(0x8B0000);
const VILLAIN_BORDER: Color = Color::hex(0xDC143C);
const VILLAIN_EYES: Color = Color::hex(0xFF0000);

const HEART_FILL: Color = Color::hex(0xFF6B6B);
const HEART_BORDER: Color = Color::hex(0xFF4757);
const SCORE_FILL: Color = Color::hex(0xFFA502);

const FLARE_OUTER: Color = Color::hex(0xFF4500);
const FLARE_INNER: Color = Color::hex(0xFFD700);

/// Everything a frame needs
pub struct Scene<'a> {
    pub state: &'a GameState,
    pub character: Character,
    /// Wall clock, drives the drifting clouds
    pub time_ms: f64,
    /// Screen flash strength (0 = none, 1 = full)
    pub flash_alpha: f32,
}

/// Something that can paint itself
pub trait Draw {
    fn draw(&self, surface: &mut dyn Surface, scene: &Scene);
}

/// Paint a full frame, back to front
pub fn render(surface: &mut dyn Surface, scene: &Scene) {
    let field = Rect::new(0.0, 0.0, FIELD_WIDTH, FIELD_HEIGHT);
    surface.fill_vertical_gradient(field, SKY_TOP, SKY_BOTTOM);

    for i in 0..shapes::CLOUD_COUNT {
        let (x, y) = shapes::cloud_origin(i, scene.time_ms);
        surface.fill_path(&shapes::cloud(x, y), CLOUD);
    }

    let state = scene.state;
    state.player.draw(surface, scene);
    draw_all(&state.obstacles, surface, scene);
    draw_all(&state.power_ups, surface, scene);
    draw_all(&state.particles, surface, scene);
    draw_all(&state.special_particles, surface, scene);

    surface.fill_rect(
        Rect::new(0.0, FIELD_HEIGHT - GROUND_STRIP_HEIGHT, FIELD_WIDTH, GROUND_STRIP_HEIGHT),
        GROUND,
    );

    if scene.flash_alpha > 0.0 {
        surface.fill_rect(field, FLASH.with_alpha(FLASH.a * scene.flash_alpha.min(1.0)));
    }
}

fn draw_all<D: Draw>(items: &[D], surface: &mut dyn Surface, scene: &Scene) {
    for item in items {
        item.draw(surface, scene);
    }
}

impl Draw for Player {
    fn draw(&self, surface: &mut dyn Surface, scene: &Scene) {
        let r = self.bounds();
        let character = scene.character;
        let sprite = SpriteId::Hero(character);

        if surface.image_status(sprite) == ImageStatus::Loaded {
            surface.save();
            surface.draw_image(sprite, r);
            surface.restore();
        } else {
            let c = r.center();
            let body = Path::new().circle(c.x, c.y, r.width / 2.0);
            surface.fill_path(&body, Color::hex(character.color()));
            surface.stroke_path(&body, Color::hex(character.effect_color()), 2.0);

            match character.feature() {
                Feature::Wing => {
                    surface.fill_path(&shapes::crest(c.x, r.y - 5.0, 8.0, 15.0), Color::hex(0xFF6347))
                }
                Feature::Ears => {
                    surface.fill_path(&shapes::crest(c.x, r.y - 5.0, 6.0, 13.0), Color::hex(0xFFD700))
                }
                Feature::Shell => {
                    surface.fill_path(&Path::new().circle(c.x, c.y, r.width / 3.0), Color::hex(0x2F4F4F))
                }
            }

            let eyes = shapes::dots((r.x + 12.0, r.y + 12.0), (r.x + 23.0, r.y + 12.0), 3.0);
            surface.fill_path(&eyes, Color::BLACK);
            let glints = shapes::dots((r.x + 11.0, r.y + 11.0), (r.x + 22.0, r.y + 11.0), 1.0);
            surface.fill_path(&glints, Color::WHITE);
        }

        if self.is_jumping {
            let mid = r.y + r.height / 2.0;
            let accent = shapes::dots((r.x - 3.0, mid), (r.right() + 3.0, mid), 2.0);
            surface.fill_path(&accent, Color::hex(character.effect_color()));
        }
    }
}

impl Draw for Villain {
    fn draw(&self, surface: &mut dyn Surface, _scene: &Scene) {
        let r = self.bounds();
        let sprite = SpriteId::Villain(self.variant);

        if surface.image_status(sprite) == ImageStatus::Loaded {
            surface.draw_image(sprite, r);
            return;
        }

        surface.fill_rect(r, VILLAIN_BODY);
        surface.stroke_rect(r, VILLAIN_BORDER, 2.0);
        let eyes = shapes::dots((r.x + 8.0, r.y + 8.0), (r.right() - 8.0, r.y + 8.0), 3.0);
        surface.fill_path(&eyes, VILLAIN_EYES);
        let mouth = Rect::new(r.x + r.width / 2.0 - 3.0, r.bottom() - 10.0, 6.0, 3.0);
        surface.fill_rect(mouth, Color::BLACK);
    }
}

impl Draw for PowerUp {
    fn draw(&self, surface: &mut dyn Surface, _scene: &Scene) {
        let r = self.bounds();
        match self.kind {
            PowerUpKind::Life => {
                let heart = shapes::heart(r);
                surface.fill_path(&heart, HEART_FILL);
                surface.stroke_path(&heart, HEART_BORDER, 2.0);
            }
            PowerUpKind::Score => {
                surface.fill_rect(r, SCORE_FILL);
                surface.stroke_rect(r, Color::WHITE, 2.0);
            }
        }
    }
}

impl Draw for Particle {
    fn draw(&self, surface: &mut dyn Surface, _scene: &Scene) {
        match self.kind {
            ParticleKind::Spark => {
                surface.set_alpha(self.alpha());
                surface.fill_rect(
                    Rect::new(self.pos.x, self.pos.y, self.size, self.size),
                    Color::hex(self.color),
                );
                surface.set_alpha(1.0);
            }
            ParticleKind::Flare => {
                surface.save();
                surface.set_alpha(self.alpha());
                surface.translate(Vec2::new(self.pos.x, self.pos.y));
                surface.rotate(self.rotation);
                surface.fill_path(&shapes::diamond(self.size), FLARE_OUTER);
                surface.fill_path(&shapes::diamond(self.size / 2.0), FLARE_INNER);
                surface.restore();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn villain() -> Villain {
        Villain {
            pos: Vec2::new(400.0, 350.0),
            width: 40.0,
            height: 50.0,
            speed: 2.5,
            variant: 2,
        }
    }

    fn frame(state: &GameState, list: &mut DrawList, flash_alpha: f32) {
        let scene = Scene {
            state,
            character: Character::Blaze,
            time_ms: 0.0,
            flash_alpha,
        };
        render(list, &scene);
    }

    #[test]
    fn test_empty_frame_layout() {
        let state = GameState::default();
        let mut list = DrawList::new();
        frame(&state, &mut list, 0.0);

        assert!(
            matches!(list.cmds.first(), Some(DrawCmd::Gradient(_, top, bottom)) if *top == SKY_TOP && *bottom == SKY_BOTTOM)
        );
        let clouds = list
            .cmds
            .iter()
            .filter(|c| matches!(c, DrawCmd::FillPath(_, color) if *color == CLOUD))
            .count();
        assert_eq!(clouds, shapes::CLOUD_COUNT);
        assert_eq!(
            list.cmds.last(),
            Some(&DrawCmd::FillRect(Rect::new(0.0, 380.0, 800.0, 20.0), GROUND))
        );
    }

    #[test]
    fn test_player_fallback_until_loaded() {
        let state = GameState::default();
        let hero = SpriteId::Hero(Character::Blaze);

        let mut list = DrawList::new();
        frame(&state, &mut list, 0.0);
        assert!(!list.cmds.iter().any(|c| matches!(c, DrawCmd::Image(..))));
        assert!(
            list.cmds
                .iter()
                .any(|c| matches!(c, DrawCmd::FillPath(_, color) if *color == Color::hex(0xFF8C00)))
        );

        let mut list = DrawList::new();
        list.set_image_status(hero, ImageStatus::Loaded);
        frame(&state, &mut list, 0.0);
        assert!(list.cmds.contains(&DrawCmd::Image(hero, state.player.bounds())));
    }

    #[test]
    fn test_failed_villain_sprite_uses_procedural_shape() {
        let mut state = GameState::default();
        state.obstacles.push(villain());
        let mut list = DrawList::new();
        list.set_image_status(SpriteId::Villain(2), ImageStatus::Failed);
        frame(&state, &mut list, 0.0);

        let body = state.obstacles[0].bounds();
        assert!(list.cmds.contains(&DrawCmd::FillRect(body, VILLAIN_BODY)));
        assert!(list.cmds.contains(&DrawCmd::StrokeRect(body, VILLAIN_BORDER, 2.0)));
    }

    #[test]
    fn test_jump_accent_only_while_airborne() {
        let accent = Color::hex(Character::Blaze.effect_color());
        let mut state = GameState::default();

        let mut list = DrawList::new();
        frame(&state, &mut list, 0.0);
        let grounded = list
            .cmds
            .iter()
            .filter(|c| matches!(c, DrawCmd::FillPath(_, color) if *color == accent))
            .count();
        assert_eq!(grounded, 0);

        state.player.is_jumping = true;
        let mut list = DrawList::new();
        frame(&state, &mut list, 0.0);
        let airborne = list
            .cmds
            .iter()
            .filter(|c| matches!(c, DrawCmd::FillPath(_, color) if *color == accent))
            .count();
        assert_eq!(airborne, 1);
    }

    #[test]
    fn test_particles_paint_after_entities_and_before_ground() {
        let mut state = GameState::default();
        state.obstacles.push(villain());
        state.particles.push(Particle {
            kind: ParticleKind::Spark,
            pos: Vec2::new(10.0, 10.0),
            vel: Vec2::ZERO,
            life: 15,
            max_life: 30,
            color: 0x2ED573,
            size: 2.0,
            rotation: 0.0,
            spin: 0.0,
        });
        let mut list = DrawList::new();
        frame(&state, &mut list, 0.0);

        let villain_at = list
            .cmds
            .iter()
            .position(|c| matches!(c, DrawCmd::FillRect(_, color) if *color == VILLAIN_BODY))
            .unwrap();
        let spark_at = list
            .cmds
            .iter()
            .position(|c| *c == DrawCmd::Alpha(0.5))
            .unwrap();
        let ground_at = list.cmds.len() - 1;
        assert!(villain_at < spark_at && spark_at < ground_at);
    }

    #[test]
    fn test_flash_overlay_is_last() {
        let state = GameState::default();
        let mut list = DrawList::new();
        frame(&state, &mut list, 1.0);
        let field = Rect::new(0.0, 0.0, FIELD_WIDTH, FIELD_HEIGHT);
        assert_eq!(list.cmds.last(), Some(&DrawCmd::FillRect(field, FLASH)));
    }

    #[test]
    fn test_render_does_not_touch_state() {
        let mut state = GameState::default();
        state.obstacles.push(villain());
        let before = format!("{:?}", state);
        let mut list = DrawList::new();
        frame(&state, &mut list, 0.5);
        assert_eq!(before, format!("{:?}", state));
    }
}

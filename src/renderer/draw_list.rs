//! Recording render target
//!
//! Stores every primitive instead of rasterising it. Used by the headless
//! build and by tests that inspect what a frame would paint.

use std::collections::HashMap;

use glam::Vec2;

use super::surface::{Color, ImageStatus, Path, SpriteId, Surface};
use crate::sim::Rect;

/// One recorded primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    FillRect(Rect, Color),
    StrokeRect(Rect, Color, f32),
    Gradient(Rect, Color, Color),
    FillPath(Path, Color),
    StrokePath(Path, Color, f32),
    Image(SpriteId, Rect),
    Alpha(f32),
    Save,
    Restore,
    Translate(Vec2),
    Rotate(f32),
}

#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub cmds: Vec<DrawCmd>,
    images: HashMap<SpriteId, ImageStatus>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend an image finished (or failed) loading
    pub fn set_image_status(&mut self, sprite: SpriteId, status: ImageStatus) {
        self.images.insert(sprite, status);
    }

    /// Drop recorded commands, keeping image statuses
    pub fn clear(&mut self) {
        self.cmds.clear();
    }

    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }
}

impl Surface for DrawList {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.cmds.push(DrawCmd::FillRect(rect, color));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32) {
        self.cmds.push(DrawCmd::StrokeRect(rect, color, line_width));
    }

    fn fill_vertical_gradient(&mut self, rect: Rect, top: Color, bottom: Color) {
        self.cmds.push(DrawCmd::Gradient(rect, top, bottom));
    }

    fn fill_path(&mut self, path: &Path, color: Color) {
        self.cmds.push(DrawCmd::FillPath(path.clone(), color));
    }

    fn stroke_path(&mut self, path: &Path, color: Color, line_width: f32) {
        self.cmds.push(DrawCmd::StrokePath(path.clone(), color, line_width));
    }

    fn draw_image(&mut self, sprite: SpriteId, rect: Rect) {
        self.cmds.push(DrawCmd::Image(sprite, rect));
    }

    fn image_status(&self, sprite: SpriteId) -> ImageStatus {
        self.images.get(&sprite).copied().unwrap_or_default()
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.cmds.push(DrawCmd::Alpha(alpha));
    }

    fn save(&mut self) {
        self.cmds.push(DrawCmd::Save);
    }

    fn restore(&mut self) {
        self.cmds.push(DrawCmd::Restore);
    }

    fn translate(&mut self, offset: Vec2) {
        self.cmds.push(DrawCmd::Translate(offset));
    }

    fn rotate(&mut self, angle: f32) {
        self.cmds.push(DrawCmd::Rotate(angle));
    }
}

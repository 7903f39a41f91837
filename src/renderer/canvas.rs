//! Canvas2D render target with sprite loading

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::surface::{Color, ImageStatus, Path, PathOp, SpriteId, Surface};
use crate::sim::Rect;

struct Sprite {
    image: HtmlImageElement,
    status: Rc<Cell<ImageStatus>>,
}

/// `CanvasRenderingContext2d` wrapper
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    sprites: HashMap<SpriteId, Sprite>,
}

impl CanvasSurface {
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            ctx,
            sprites: HashMap::new(),
        })
    }

    /// Start loading a sprite. Status flips to `Loaded` or `Failed` from the
    /// image's own load events.
    pub fn load_sprite(&mut self, sprite: SpriteId, url: &str) {
        if self.sprites.contains_key(&sprite) {
            return;
        }
        let Ok(image) = HtmlImageElement::new() else {
            log::warn!("Could not create image for {:?}", sprite);
            return;
        };
        let status = Rc::new(Cell::new(ImageStatus::Loading));

        {
            let status = status.clone();
            let onload = Closure::<dyn FnMut()>::new(move || {
                if status.get() == ImageStatus::Loading {
                    status.set(ImageStatus::Loaded);
                }
            });
            image.set_onload(Some(onload.as_ref().unchecked_ref()));
            onload.forget();
        }
        {
            let status = status.clone();
            let url = url.to_string();
            let onerror = Closure::<dyn FnMut()>::new(move || {
                log::warn!("Sprite failed to load: {} (using fallback)", url);
                status.set(ImageStatus::Failed);
            });
            image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            onerror.forget();
        }

        image.set_src(url);
        self.sprites.insert(sprite, Sprite { image, status });
    }

    fn trace(&self, path: &Path) {
        self.ctx.begin_path();
        for op in &path.ops {
            match *op {
                PathOp::MoveTo(p) => self.ctx.move_to(p.x as f64, p.y as f64),
                PathOp::LineTo(p) => self.ctx.line_to(p.x as f64, p.y as f64),
                PathOp::Arc {
                    center,
                    radius,
                    start,
                    end,
                    ccw,
                } => {
                    let _ = self.ctx.arc_with_anticlockwise(
                        center.x as f64,
                        center.y as f64,
                        radius as f64,
                        start as f64,
                        end as f64,
                        ccw,
                    );
                }
                PathOp::Close => self.ctx.close_path(),
            }
        }
    }
}

impl Surface for CanvasSurface {
    fn fill_rect(&mut self, r: Rect, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .fill_rect(r.x as f64, r.y as f64, r.width as f64, r.height as f64);
    }

    fn stroke_rect(&mut self, r: Rect, color: Color, line_width: f32) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(line_width as f64);
        self.ctx
            .stroke_rect(r.x as f64, r.y as f64, r.width as f64, r.height as f64);
    }

    fn fill_vertical_gradient(&mut self, r: Rect, top: Color, bottom: Color) {
        let gradient =
            self.ctx
                .create_linear_gradient(r.x as f64, r.y as f64, r.x as f64, r.bottom() as f64);
        let _ = gradient.add_color_stop(0.0, &top.to_css());
        let _ = gradient.add_color_stop(1.0, &bottom.to_css());
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx
            .fill_rect(r.x as f64, r.y as f64, r.width as f64, r.height as f64);
    }

    fn fill_path(&mut self, path: &Path, color: Color) {
        self.trace(path);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn stroke_path(&mut self, path: &Path, color: Color, line_width: f32) {
        self.trace(path);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(line_width as f64);
        self.ctx.stroke();
    }

    fn draw_image(&mut self, sprite: SpriteId, r: Rect) {
        let Some(s) = self.sprites.get(&sprite) else {
            return;
        };
        let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            &s.image,
            r.x as f64,
            r.y as f64,
            r.width as f64,
            r.height as f64,
        );
    }

    fn image_status(&self, sprite: SpriteId) -> ImageStatus {
        self.sprites
            .get(&sprite)
            .map(|s| s.status.get())
            .unwrap_or(ImageStatus::Failed)
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha as f64);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, offset: Vec2) {
        let _ = self.ctx.translate(offset.x as f64, offset.y as f64);
    }

    fn rotate(&mut self, angle: f32) {
        let _ = self.ctx.rotate(angle as f64);
    }
}

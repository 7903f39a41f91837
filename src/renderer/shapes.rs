//! Path generation for the procedural shapes

use std::f32::consts::PI;

use super::surface::Path;
use crate::consts::FIELD_WIDTH;
use crate::sim::Rect;

/// Number of background clouds
pub const CLOUD_COUNT: usize = 5;

/// Cloud anchor at `time_ms`; clouds drift right and wrap around the field
pub fn cloud_origin(index: usize, time_ms: f64) -> (f32, f32) {
    let span = (FIELD_WIDTH + 100.0) as f64;
    let x = (time_ms * 0.01 + index as f64 * 200.0).rem_euclid(span) - 50.0;
    let y = 50.0 + index as f32 * 30.0;
    (x as f32, y)
}

/// Three overlapping puffs
pub fn cloud(x: f32, y: f32) -> Path {
    Path::new()
        .circle(x, y, 20.0)
        .circle(x + 25.0, y, 25.0)
        .circle(x + 50.0, y, 20.0)
}

/// Heart filling `r`: two upper lobes and a point at the bottom centre
pub fn heart(r: Rect) -> Path {
    let lobe = r.width / 4.0;
    let top = r.y + r.height / 3.0;
    Path::new()
        .arc(r.x + r.width / 4.0, top, lobe, 0.0, PI, true)
        .arc(r.x + r.width * 3.0 / 4.0, top, lobe, 0.0, PI, true)
        .move_to(r.x + r.width / 2.0, r.bottom())
        .line_to(r.x, top)
        .line_to(r.right(), top)
        .close()
}

/// Vertical diamond centred on the origin
pub fn diamond(half_height: f32) -> Path {
    Path::new()
        .move_to(0.0, -half_height)
        .line_to(-half_height / 2.0, 0.0)
        .line_to(0.0, half_height)
        .line_to(half_height / 2.0, 0.0)
        .close()
}

/// Upward triangle with its base centred at (`cx`, `base_y`)
pub fn crest(cx: f32, base_y: f32, half_base: f32, height: f32) -> Path {
    Path::new()
        .move_to(cx - half_base, base_y)
        .line_to(cx + half_base, base_y)
        .line_to(cx, base_y - height)
        .close()
}

/// Pair of equal dots, drawn as one path
pub fn dots(a: (f32, f32), b: (f32, f32), radius: f32) -> Path {
    Path::new().circle(a.0, a.1, radius).circle(b.0, b.1, radius)
}

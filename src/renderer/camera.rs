//! World <-> screen projection
//!
//! The world is viewed by a 60° perspective camera 15 units back, which at
//! the z = 0 play plane is an orthographic view `VIEW_HALF_HEIGHT` tall on
//! either side of the origin. Width follows the canvas aspect ratio.

use glam::Vec2;

use crate::consts::VIEW_HALF_HEIGHT;

/// Canvas size in physical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Half the visible world width
    pub fn half_width(&self) -> f32 {
        VIEW_HALF_HEIGHT * self.aspect()
    }

    /// World position to normalized device coordinates (-1..1, y up)
    pub fn world_to_ndc(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x / self.half_width(), p.y / VIEW_HALF_HEIGHT)
    }

    /// World position to pixel coordinates (origin top-left, y down)
    pub fn world_to_screen(&self, p: Vec2) -> Vec2 {
        let ndc = self.world_to_ndc(p);
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.width as f32,
            (1.0 - ndc.y) * 0.5 * self.height as f32,
        )
    }

    /// World length to pixels
    pub fn units_to_pixels(&self, units: f32) -> f32 {
        units * self.height as f32 / (2.0 * VIEW_HALF_HEIGHT)
    }
}

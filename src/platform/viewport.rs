//! Canvas ↔ world mapping
//!
//! The world is a fixed 1200×800 rectangle, letterboxed into whatever size
//! the canvas has. The shader applies the same transform.

use glam::Vec2;

use crate::consts::WORLD_SIZE;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Canvas size in pixels
    pub size: Vec2,
    /// Pixels per world unit
    pub scale: f32,
    /// Canvas position of the world origin
    pub offset: Vec2,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        let size = Vec2::new(width.max(1.0), height.max(1.0));
        let scale = (size.x / WORLD_SIZE.x).min(size.y / WORLD_SIZE.y);
        let offset = (size - WORLD_SIZE * scale) * 0.5;
        Self {
            size,
            scale,
            offset,
        }
    }

    pub fn screen_to_world(&self, p: Vec2) -> Vec2 {
        (p - self.offset) / self.scale
    }

    pub fn world_to_screen(&self, p: Vec2) -> Vec2 {
        p * self.scale + self.offset
    }
}

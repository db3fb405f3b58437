//! Rendering backend seam
//!
//! The simulation never rasterises anything itself. Entities describe what they
//! look like through a `Renderer`, which owns a 2D transform (translate + uniform
//! scale) with a global alpha, a save/restore stack and the current shadow style.

pub mod recorder;

pub use recorder::{DrawCommand, Recorder};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Camera transform: `screen = world * scale + offset`, drawn with `alpha`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub offset: Vec2,
    pub scale: f32,
    pub alpha: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
            alpha: 1.0,
        }
    }
}

impl Viewport {
    /// Screen (canvas) position to world position
    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        if self.scale == 0.0 {
            return screen - self.offset;
        }
        (screen - self.offset) / self.scale
    }

    /// World position to screen (canvas) position
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        world * self.scale + self.offset
    }
}

/// Drop shadow applied to subsequent draws
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    /// CSS-style hex colour, e.g. `#00ff00`
    pub color: String,
    pub blur: f32,
    #[serde(default)]
    pub offset: Vec2,
}

impl Shadow {
    pub fn new(color: impl Into<String>, blur: f32) -> Self {
        Self {
            color: color.into(),
            blur,
            offset: Vec2::ZERO,
        }
    }
}

/// Fill/stroke styling for primitive shapes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapeStyle {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub line_width: f32,
}

impl ShapeStyle {
    pub fn outline(color: impl Into<String>, line_width: f32) -> Self {
        Self {
            fill: None,
            stroke: Some(color.into()),
            line_width,
        }
    }
}

/// One sprite blit: a source frame of a named sheet drawn centred on `position`
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteDraw {
    pub sheet: String,
    pub position: Vec2,
    /// Top-left of the frame inside the sheet image, in pixels
    pub source: Vec2,
    pub source_size: Vec2,
    pub drawn_size: Vec2,
    pub rotation: f32,
    pub alpha: f32,
    pub mirrored: bool,
}

/// Drawing backend consumed by entities and layers
pub trait Renderer {
    /// Wipe the whole canvas
    fn clear(&mut self);

    /// Canvas size in screen pixels
    fn canvas_size(&self) -> Vec2;

    fn viewport(&self) -> Viewport;

    fn set_viewport(&mut self, viewport: Viewport);

    /// Push the current transform, alpha and shadow
    fn save(&mut self);

    /// Pop back to the last saved transform, alpha and shadow
    fn restore(&mut self);

    fn set_shadow(&mut self, shadow: &Shadow);

    fn reset_shadow(&mut self);

    fn draw_sprite(&mut self, sprite: &SpriteDraw);

    fn draw_circle(&mut self, center: Vec2, radius: f32, style: &ShapeStyle);

    fn draw_rect(&mut self, min: Vec2, size: Vec2, style: &ShapeStyle);
}

//! Sprite sheets and sprites
//!
//! A sheet is a grid of equally sized frames separated by a border. Image
//! decoding belongs to the rendering backend; sheets only carry geometry and
//! the name the backend uses to find the image.

use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;

use super::entity::{Body, Entity, Transform};
use super::shapes::{Circle, Rect};
use crate::config::{GameConfig, SheetConfig};
use crate::error::ConfigError;
use crate::renderer::{Renderer, SpriteDraw};

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    name: String,
    /// Frame size in pixels (already scaled)
    sprite_size: Vec2,
    border: f32,
}

impl SpriteSheet {
    pub fn new(name: impl Into<String>, config: &SheetConfig) -> Self {
        Self {
            name: name.into(),
            sprite_size: Vec2::new(config.sprite_width, config.sprite_height) * config.inner_scale,
            border: config.border * config.inner_scale,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sprite_size(&self) -> Vec2 {
        self.sprite_size
    }

    /// Sprite showing frame (`frame_x`, `frame_y`), positioned at the origin
    pub fn get(self: &Rc<Self>, frame_x: u32, frame_y: u32) -> Sprite {
        Sprite {
            body: Body::default(),
            sheet: Rc::clone(self),
            frame: (frame_x, frame_y),
            drawn_size: self.sprite_size,
            rotation: 0.0,
            alpha: 1.0,
            mirrored: false,
        }
    }

    /// Pixel origin of a frame inside the sheet image
    pub fn frame_origin(&self, frame: (u32, u32)) -> Vec2 {
        let stride = self.sprite_size + Vec2::splat(self.border);
        Vec2::new(frame.0 as f32 * stride.x, frame.1 as f32 * stride.y)
    }
}

/// One frame of a sheet, drawn centred on its position
#[derive(Debug, Clone)]
pub struct Sprite {
    body: Body,
    sheet: Rc<SpriteSheet>,
    frame: (u32, u32),
    drawn_size: Vec2,
    rotation: f32,
    alpha: f32,
    mirrored: bool,
}

impl Sprite {
    pub fn placed(mut self, pos: Vec2) -> Self {
        self.body.pos = pos;
        self
    }

    pub fn sheet(&self) -> &SpriteSheet {
        &self.sheet
    }

    pub fn frame(&self) -> (u32, u32) {
        self.frame
    }

    pub fn set_frame(&mut self, frame_x: u32, frame_y: u32) {
        self.frame = (frame_x, frame_y);
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
    }

    pub fn flip(&mut self) {
        self.mirrored = !self.mirrored;
    }

    pub fn drawn_size(&self) -> Vec2 {
        self.drawn_size
    }

    pub fn set_drawn_size(&mut self, size: Vec2) {
        self.drawn_size = size;
    }

    pub fn to_draw(&self) -> SpriteDraw {
        SpriteDraw {
            sheet: self.sheet.name.clone(),
            position: self.body.pos,
            source: self.sheet.frame_origin(self.frame),
            source_size: self.sheet.sprite_size,
            drawn_size: self.drawn_size,
            rotation: self.rotation,
            alpha: self.alpha,
            mirrored: self.mirrored,
        }
    }
}

impl Transform for Sprite {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn scale_about(&mut self, factor: f32, origin: Vec2) {
        self.body.pos = origin + (self.body.pos - origin) * factor;
        self.drawn_size *= factor;
    }

    /// Rotating a sprite also turns the image
    fn rotate_about(&mut self, phi: f32, origin: Vec2) {
        self.body.pos = crate::rotate_point(self.body.pos, phi, origin);
        self.rotation += phi;
    }

    fn bounding_rect(&self) -> Rect {
        Rect::centered(self.body.pos, self.drawn_size).padded(self.body.hitbox_padding)
    }

    fn bounding_circle(&self) -> Circle {
        Circle::new(
            self.body.pos,
            self.drawn_size.max_element() / 2.0 + self.body.hitbox_padding,
        )
    }

    fn is_point_over(&self, point: Vec2) -> bool {
        self.bounding_rect().contains(point)
    }

    fn get_drawn(&self, renderer: &mut dyn Renderer) {
        renderer.draw_sprite(&self.to_draw());
    }
}

impl<C> Entity<C> for Sprite {}

/// Sheets by name, built from the configuration
#[derive(Debug, Default)]
pub struct SheetRegistry {
    sheets: HashMap<String, Rc<SpriteSheet>>,
}

impl SheetRegistry {
    pub fn from_config(config: &GameConfig) -> Self {
        let sheets = config
            .sheets
            .iter()
            .map(|(name, sheet)| (name.clone(), Rc::new(SpriteSheet::new(name.clone(), sheet))))
            .collect();
        Self { sheets }
    }

    pub fn insert(&mut self, sheet: SpriteSheet) {
        self.sheets.insert(sheet.name.clone(), Rc::new(sheet));
    }

    pub fn get(&self, name: &str) -> Result<Rc<SpriteSheet>, ConfigError> {
        self.sheets
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownSheet(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

//! Headless renderer that records draw calls
//!
//! Used by the binary and by tests: every draw is captured together with the
//! viewport and shadow in effect at the time.

use glam::Vec2;

use super::{Renderer, Shadow, ShapeStyle, SpriteDraw, Viewport};

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Sprite {
        sprite: SpriteDraw,
        viewport: Viewport,
        shadow: Option<Shadow>,
    },
    Circle {
        center: Vec2,
        radius: f32,
        style: ShapeStyle,
        viewport: Viewport,
    },
    Rect {
        min: Vec2,
        size: Vec2,
        style: ShapeStyle,
        viewport: Viewport,
    },
}

#[derive(Debug, Clone)]
struct SavedState {
    viewport: Viewport,
    shadow: Option<Shadow>,
}

#[derive(Debug)]
pub struct Recorder {
    canvas: Vec2,
    viewport: Viewport,
    shadow: Option<Shadow>,
    stack: Vec<SavedState>,
    commands: Vec<DrawCommand>,
}

impl Recorder {
    pub fn new(canvas: Vec2) -> Self {
        Self {
            canvas,
            viewport: Viewport::default(),
            shadow: None,
            stack: Vec::new(),
            commands: Vec::new(),
        }
    }

    pub fn resize(&mut self, canvas: Vec2) {
        self.canvas = canvas;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain everything recorded so far
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Sprites recorded since the last `clear`
    pub fn sprites_since_clear(&self) -> impl Iterator<Item = &SpriteDraw> {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear))
            .map_or(0, |i| i + 1);
        self.commands[start..].iter().filter_map(|c| match c {
            DrawCommand::Sprite { sprite, .. } => Some(sprite),
            _ => None,
        })
    }

    /// Saved states not yet restored
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl Renderer for Recorder {
    fn clear(&mut self) {
        // The log only ever holds the current frame
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn canvas_size(&self) -> Vec2 {
        self.canvas
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn save(&mut self) {
        self.stack.push(SavedState {
            viewport: self.viewport,
            shadow: self.shadow.clone(),
        });
    }

    fn restore(&mut self) {
        if let Some(saved) = self.stack.pop() {
            self.viewport = saved.viewport;
            self.shadow = saved.shadow;
        } else {
            log::warn!("Renderer restore without a matching save");
        }
    }

    fn set_shadow(&mut self, shadow: &Shadow) {
        self.shadow = Some(shadow.clone());
    }

    fn reset_shadow(&mut self) {
        self.shadow = None;
    }

    fn draw_sprite(&mut self, sprite: &SpriteDraw) {
        self.commands.push(DrawCommand::Sprite {
            sprite: sprite.clone(),
            viewport: self.viewport,
            shadow: self.shadow.clone(),
        });
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, style: &ShapeStyle) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            style: style.clone(),
            viewport: self.viewport,
        });
    }

    fn draw_rect(&mut self, min: Vec2, size: Vec2, style: &ShapeStyle) {
        self.commands.push(DrawCommand::Rect {
            min,
            size,
            style: style.clone(),
            viewport: self.viewport,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_restore_viewport_and_shadow() {
        let mut r = Recorder::new(Vec2::new(1600.0, 900.0));
        r.save();
        r.set_viewport(Viewport {
            offset: Vec2::new(10.0, 20.0),
            scale: 2.0,
            alpha: 0.5,
        });
        r.set_shadow(&Shadow::new("#000000", 20.0));
        r.draw_circle(Vec2::ZERO, 5.0, &ShapeStyle::outline("red", 1.0));
        r.restore();

        assert_eq!(r.viewport(), Viewport::default());
        assert_eq!(r.depth(), 0);
        match &r.commands()[0] {
            DrawCommand::Circle { viewport, .. } => assert_eq!(viewport.scale, 2.0),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_clear_resets_log() {
        let mut r = Recorder::new(Vec2::new(100.0, 100.0));
        r.draw_rect(Vec2::ZERO, Vec2::ONE, &ShapeStyle::default());
        r.clear();
        assert_eq!(r.commands(), &[DrawCommand::Clear]);
        assert_eq!(r.sprites_since_clear().count(), 0);
    }
}

//! Layers
//!
//! A layer is an ordered list of top-level entities with an optional camera of
//! its own. An unanchored layer draws through whatever viewport is current; an
//! anchored one replaces offset and scale for the duration of its pass. Layer
//! alpha multiplies the current alpha either way.
//!
//! Per tick a layer draws every entity first and only then steps them, so the
//! frame on screen (and the listen pass that follows) reflects the state from
//! before this tick's update.

use glam::Vec2;

use super::entity::{Entity, Transform, draw};
use crate::input::InputState;
use crate::renderer::{Renderer, Viewport};

/// Optional per-layer camera; setting offset or scale anchors the layer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera {
    pub offset: Option<Vec2>,
    pub scale: Option<f32>,
    pub alpha: Option<f32>,
}

impl Camera {
    pub fn is_anchored(&self) -> bool {
        self.offset.is_some() || self.scale.is_some()
    }
}

#[derive(Debug)]
pub struct Layer<E> {
    entities: Vec<E>,
    pub camera: Camera,
    pub hidden: bool,
    pub paused: bool,
    pub muted: bool,
}

impl<E> Default for Layer<E> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            camera: Camera::default(),
            hidden: false,
            paused: false,
            muted: false,
        }
    }
}

impl<E: Transform> Layer<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(entities: impl IntoIterator<Item = E>) -> Self {
        Self {
            entities: entities.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn add(&mut self, entity: E) -> &mut Self {
        self.entities.push(entity);
        self
    }

    pub fn adds(&mut self, entities: impl IntoIterator<Item = E>) -> &mut Self {
        self.entities.extend(entities);
        self
    }

    pub fn empty(&mut self) -> &mut Self {
        self.entities.clear();
        self
    }

    pub fn entities(&self) -> &[E] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [E] {
        &mut self.entities
    }

    pub fn hide(&mut self) -> &mut Self {
        self.hidden = true;
        self
    }

    pub fn show(&mut self) -> &mut Self {
        self.hidden = false;
        self
    }

    pub fn pause(&mut self) -> &mut Self {
        self.paused = true;
        self
    }

    pub fn unpause(&mut self) -> &mut Self {
        self.paused = false;
        self
    }

    pub fn mute(&mut self) -> &mut Self {
        self.muted = true;
        self
    }

    pub fn unmute(&mut self) -> &mut Self {
        self.muted = false;
        self
    }

    // === Viewport ===

    pub fn move_viewport(&mut self, delta: Vec2) -> &mut Self {
        self.camera.offset = Some(self.camera.offset.unwrap_or(Vec2::ZERO) + delta);
        self
    }

    pub fn set_viewport_position(&mut self, offset: Vec2) -> &mut Self {
        self.camera.offset = Some(offset);
        self
    }

    pub fn scale_viewport(&mut self, factor: f32) -> &mut Self {
        self.camera.scale = Some(self.camera.scale.unwrap_or(1.0) * factor);
        self
    }

    pub fn set_viewport_scale(&mut self, scale: f32) -> &mut Self {
        self.camera.scale = Some(scale);
        self
    }

    pub fn set_alpha(&mut self, alpha: f32) -> &mut Self {
        self.camera.alpha = Some(alpha);
        self
    }

    pub fn unanchor_viewport(&mut self) -> &mut Self {
        self.camera.offset = None;
        self.camera.scale = None;
        self
    }

    /// Put the world origin at `ratio` of the canvas (0.5, 0.5 = centre)
    pub fn align(&mut self, canvas: Vec2, ratio: Vec2) -> &mut Self {
        self.set_viewport_position(canvas * ratio)
    }

    pub fn center(&mut self, canvas: Vec2) -> &mut Self {
        self.align(canvas, Vec2::splat(0.5))
    }

    /// Uniform scale that fits `target` world units inside the canvas
    pub fn scale_to_size(&mut self, canvas: Vec2, target: Vec2) -> &mut Self {
        let fit = canvas / target;
        self.set_viewport_scale(fit.min_element())
    }

    /// Viewport this layer draws through, given the one currently active
    pub fn effective_viewport(&self, current: Viewport) -> Viewport {
        let mut viewport = if self.camera.is_anchored() {
            Viewport {
                offset: self.camera.offset.unwrap_or(Vec2::ZERO),
                scale: self.camera.scale.unwrap_or(1.0),
                alpha: current.alpha,
            }
        } else {
            current
        };
        viewport.alpha *= self.camera.alpha.unwrap_or(1.0);
        viewport
    }

    /// Screen position to this layer's world position
    pub fn to_local(&self, current: Viewport, screen: Vec2) -> Vec2 {
        self.effective_viewport(current).to_world(screen)
    }

    fn before_pass(&self, renderer: &mut dyn Renderer) {
        renderer.save();
        let viewport = self.effective_viewport(renderer.viewport());
        renderer.set_viewport(viewport);
    }

    // === Passes ===

    /// Draw everything, then step everything unless paused
    pub fn handle_draw<C>(&mut self, renderer: &mut dyn Renderer, ctx: &mut C)
    where
        E: Entity<C>,
    {
        if self.hidden {
            return;
        }
        self.before_pass(renderer);
        for entity in &self.entities {
            draw(renderer, entity);
        }
        if !self.paused {
            for entity in &mut self.entities {
                entity.step(ctx);
            }
        }
        renderer.restore();
    }

    /// Offer the pointer to entities topmost first
    pub fn handle_listen(&mut self, renderer: &dyn Renderer, input: &InputState) {
        if self.hidden || self.muted {
            return;
        }
        let local = self.to_local(renderer.viewport(), input.mouse.raw);
        let pointer = input.pointer_at(local);
        for entity in self.entities.iter_mut().rev() {
            entity.listen(&pointer);
        }
    }

    /// Draw/step pass followed by the listen pass
    pub fn handle<C>(&mut self, renderer: &mut dyn Renderer, input: &InputState, ctx: &mut C)
    where
        E: Entity<C>,
    {
        self.handle_draw(renderer, ctx);
        self.handle_listen(renderer, input);
    }

    /// Drop expired entities at every depth, returning how many went
    pub fn cull(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| !e.is_expired());
        let mut removed = before - self.entities.len();
        for entity in &mut self.entities {
            removed += entity.cull();
        }
        removed
    }

    /// Cull only on ticks divisible by `n`
    pub fn cull_if_nth_frame(&mut self, tick: u64, n: u64) -> usize {
        if n == 0 || tick % n != 0 {
            return 0;
        }
        self.cull()
    }
}

/// Run every layer's draw pass in order, then every listen pass in reverse
pub fn handle_layers<E, C>(
    layers: &mut [Layer<E>],
    renderer: &mut dyn Renderer,
    input: &InputState,
    ctx: &mut C,
) where
    E: Entity<C>,
{
    for layer in layers.iter_mut() {
        layer.handle_draw(renderer, ctx);
    }
    for layer in layers.iter_mut().rev() {
        layer.handle_listen(renderer, input);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Button, Pointer};
    use crate::renderer::{DrawCommand, Recorder, ShapeStyle};
    use crate::sim::container::Container;
    use crate::sim::entity::{Body, PointerEvent};
    use crate::sim::shapes::CircleShape;

    /// Records the position it was drawn at and counts steps
    #[derive(Debug, Default)]
    struct Probe {
        body: Body,
        steps: u32,
        events: Vec<PointerEvent>,
    }

    impl Probe {
        fn at(x: f32, y: f32) -> Self {
            let mut probe = Self {
                body: Body::new(Vec2::new(x, y)),
                ..Default::default()
            };
            probe.body.hitbox_padding = 10.0;
            probe
        }
    }

    impl Transform for Probe {
        fn body(&self) -> &Body {
            &self.body
        }

        fn body_mut(&mut self) -> &mut Body {
            &mut self.body
        }

        fn is_point_over(&self, point: Vec2) -> bool {
            self.bounding_rect().contains(point)
        }

        fn get_drawn(&self, renderer: &mut dyn Renderer) {
            renderer.draw_circle(self.body.pos, 1.0, &ShapeStyle::default());
        }

        fn on_pointer(&mut self, event: PointerEvent, _pointer: &Pointer<'_>) {
            self.events.push(event);
        }
    }

    impl Entity<u32> for Probe {
        fn update(&mut self, ticks: &mut u32) {
            *ticks += 1;
            self.steps += 1;
            self.accelerate(Vec2::X);
        }
    }

    fn drawn_positions(recorder: &Recorder) -> Vec<Vec2> {
        recorder
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Circle { center, .. } => Some(*center),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_draw_happens_before_update() {
        let mut recorder = Recorder::new(Vec2::new(800.0, 600.0));
        let mut layer = Layer::of([Probe::at(0.0, 0.0)]);
        let mut ticks = 0;

        layer.handle_draw(&mut recorder, &mut ticks);
        layer.handle_draw(&mut recorder, &mut ticks);

        assert_eq!(ticks, 2);
        // Drawn at the pre-step positions: 0 then 1
        assert_eq!(drawn_positions(&recorder), vec![Vec2::ZERO, Vec2::X]);
        assert_eq!(layer.entities()[0].position(), Vec2::new(3.0, 0.0));
        assert_eq!(recorder.depth(), 0);
    }

    #[test]
    fn test_paused_layer_draws_without_stepping() {
        let mut recorder = Recorder::new(Vec2::new(800.0, 600.0));
        let mut layer = Layer::of([Probe::at(0.0, 0.0)]);
        layer.pause();
        let mut ticks = 0;
        layer.handle_draw(&mut recorder, &mut ticks);
        assert_eq!(ticks, 0);
        assert_eq!(drawn_positions(&recorder).len(), 1);

        layer.hide();
        layer.handle_draw(&mut recorder, &mut ticks);
        assert_eq!(drawn_positions(&recorder).len(), 1);
    }

    #[test]
    fn test_anchored_viewport_is_restored() {
        let canvas = Vec2::new(1600.0, 900.0);
        let mut recorder = Recorder::new(canvas);
        let mut layer = Layer::of([CircleShape::new(Vec2::ZERO, 5.0)]);
        layer.center(canvas).scale_to_size(canvas, Vec2::new(3200.0, 900.0)).set_alpha(0.5);

        layer.handle_draw(&mut recorder, &mut ());
        match &recorder.commands()[0] {
            DrawCommand::Circle { viewport, .. } => {
                assert_eq!(viewport.offset, Vec2::new(800.0, 450.0));
                assert_eq!(viewport.scale, 0.5);
                assert_eq!(viewport.alpha, 0.5);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(recorder.viewport(), Viewport::default());
    }

    #[test]
    fn test_unanchored_layer_inherits_viewport() {
        let layer: Layer<CircleShape> = Layer::new();
        let current = Viewport {
            offset: Vec2::new(10.0, 10.0),
            scale: 2.0,
            alpha: 0.8,
        };
        assert_eq!(layer.effective_viewport(current), current);
        assert_eq!(layer.to_local(current, Vec2::new(30.0, 10.0)), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_listen_in_layer_space_topmost_first() {
        let canvas = Vec2::new(200.0, 200.0);
        let recorder = Recorder::new(canvas);
        let mut layer = Layer::of([Probe::at(0.0, 0.0), Probe::at(0.0, 0.0)]);
        layer.center(canvas);

        let mut input = InputState::new();
        input.move_mouse(Vec2::new(100.0, 100.0));
        input.press_button(Button::Left);
        layer.handle_listen(&recorder, &input);

        // Both see the pointer at their position; the top one claims input first
        for probe in layer.entities() {
            assert_eq!(probe.events, vec![PointerEvent::Over, PointerEvent::Down]);
        }

        layer.mute();
        input.move_mouse(Vec2::new(0.0, 0.0));
        layer.handle_listen(&recorder, &input);
        assert_eq!(layer.entities()[0].events.len(), 2);
    }

    #[test]
    fn test_cull_every_nth_tick() {
        let mut inner = Container::of([Probe::at(0.0, 0.0), Probe::at(1.0, 1.0)]);
        inner.children_mut()[0].expire();
        let mut outer = Probe::at(5.0, 5.0);
        outer.expire();
        let mut layer: Layer<Container<Probe>> = Layer::of([inner, Container::of([outer])]);

        assert_eq!(layer.cull_if_nth_frame(29, 30), 0);
        assert_eq!(layer.entities()[0].len(), 2);
        assert_eq!(layer.cull_if_nth_frame(30, 30), 2);
        assert_eq!(layer.entities()[0].len(), 1);
        assert_eq!(layer.entities()[1].len(), 0);
    }

    #[test]
    fn test_handle_layers_draws_all_before_listening() {
        let mut recorder = Recorder::new(Vec2::new(100.0, 100.0));
        let input = InputState::new();
        let mut layers = vec![Layer::of([Probe::at(0.0, 0.0)]), Layer::of([Probe::at(5.0, 0.0)])];
        let mut ticks = 0;
        handle_layers(&mut layers, &mut recorder, &input, &mut ticks);
        assert_eq!(ticks, 2);
        assert_eq!(drawn_positions(&recorder), vec![Vec2::ZERO, Vec2::new(5.0, 0.0)]);
    }
}

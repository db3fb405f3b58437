//! Entity core
//!
//! Every scene object owns a [`Body`] (position, velocity, flags, attached
//! animations, pointer state) and implements [`Transform`]. Only `body` and
//! `body_mut` are required; composites override the geometry primitives
//! (`move_by`, `place`, `rotate_about`, `scale_about`, bounds) so that
//! transforming a parent transforms its whole subtree.
//!
//! Velocity is private to the body: it changes only through `accelerate`,
//! `traction`, `stop` and `cap_velocity`, and is applied by `travel`.
//!
//! Removal is two-phase: `expire` only flags the entity. Owners drop expired
//! children when they are culled, so other entities can still see an expired
//! entity's last state for the rest of the tick.

use glam::Vec2;

use super::animation::{Animation, run_animations};
use super::shapes::{Circle, Rect};
use crate::input::Pointer;
use crate::renderer::{Renderer, Shadow};
use crate::{direction, distance, polar_to_cartesian, rotate_point};

/// Pointer interaction reported to [`Transform::on_pointer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Over,
    Out,
    Down,
    Up,
    Drag,
}

#[derive(Debug, Default, Clone, Copy)]
struct PointerTracker {
    over: bool,
    down: bool,
    dragging: bool,
    /// Offset from the entity centre to the pointer when the drag started
    grab: Vec2,
}

impl PointerTracker {
    fn track(&mut self, over: bool, pointer: &Pointer<'_>) -> Vec<PointerEvent> {
        let mut events = Vec::new();

        if over && !self.over {
            events.push(PointerEvent::Over);
        } else if !over && self.over {
            events.push(PointerEvent::Out);
        }
        self.over = over;

        if pointer.pressed {
            if !self.down {
                if over {
                    events.push(PointerEvent::Down);
                    self.down = true;
                }
            } else {
                if !self.dragging {
                    self.dragging = pointer.claim_drag();
                }
                if self.dragging {
                    events.push(PointerEvent::Drag);
                }
            }
        } else if self.down {
            events.push(PointerEvent::Up);
            self.down = false;
            if self.dragging {
                pointer.release_drag();
                self.dragging = false;
            }
        }
        events
    }
}

/// State shared by every entity
#[derive(Debug, Default)]
pub struct Body {
    pub pos: Vec2,
    vel: Vec2,
    expired: bool,
    pub hidden: bool,
    /// Muted entities ignore the pointer
    pub muted: bool,
    pub shadow: Option<Shadow>,
    /// Grows the default bounding rect/circle
    pub hitbox_padding: f32,
    /// Default pointer hook drags the entity around
    pub draggable: bool,
    pub(crate) animations: Vec<Box<dyn Animation>>,
    pointer: PointerTracker,
}

impl Body {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            ..Default::default()
        }
    }

    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    pub fn expired(&self) -> bool {
        self.expired
    }

    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    pub fn is_pointer_over(&self) -> bool {
        self.pointer.over
    }

    pub fn is_pointer_down(&self) -> bool {
        self.pointer.down
    }

    pub fn is_dragging(&self) -> bool {
        self.pointer.dragging
    }
}

impl Clone for Body {
    /// Copies geometry, velocity and styling; animations and pointer state start fresh
    fn clone(&self) -> Self {
        Self {
            pos: self.pos,
            vel: self.vel,
            expired: self.expired,
            hidden: self.hidden,
            muted: self.muted,
            shadow: self.shadow.clone(),
            hitbox_padding: self.hitbox_padding,
            draggable: self.draggable,
            animations: Vec::new(),
            pointer: PointerTracker::default(),
        }
    }
}

/// Positionable, movable, drawable scene object
pub trait Transform {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    fn position(&self) -> Vec2 {
        self.body().pos
    }

    fn velocity(&self) -> Vec2 {
        self.body().vel
    }

    fn is_expired(&self) -> bool {
        self.body().expired
    }

    fn is_hidden(&self) -> bool {
        self.body().hidden
    }

    // === Geometry primitives (composites override) ===

    /// Translate by `delta`
    fn move_by(&mut self, delta: Vec2) {
        self.body_mut().pos += delta;
    }

    /// Put the entity at `pos`
    fn place(&mut self, pos: Vec2) {
        self.body_mut().pos = pos;
    }

    /// Translate by `r` along bearing `phi`
    fn move_polar(&mut self, phi: f32, r: f32) {
        self.move_by(polar_to_cartesian(r, phi));
    }

    /// Scale the position away from `origin`
    fn scale_about(&mut self, factor: f32, origin: Vec2) {
        let pos = self.position();
        self.body_mut().pos = origin + (pos - origin) * factor;
    }

    /// Rotate the position about `origin` (orientation is left to subclasses)
    fn rotate_about(&mut self, phi: f32, origin: Vec2) {
        let pos = rotate_point(self.position(), phi, origin);
        self.body_mut().pos = pos;
    }

    fn center(&self) -> Vec2 {
        self.position()
    }

    fn bounding_rect(&self) -> Rect {
        let padding = self.body().hitbox_padding;
        Rect::centered(self.position(), Vec2::splat(padding * 2.0))
    }

    fn bounding_circle(&self) -> Circle {
        Circle::new(self.position(), self.body().hitbox_padding)
    }

    fn is_point_over(&self, _point: Vec2) -> bool {
        false
    }

    /// Emit draw calls; shadow and visibility are handled by [`draw`]
    fn get_drawn(&self, _renderer: &mut dyn Renderer) {}

    /// Drop expired descendants, returning how many were removed
    fn cull(&mut self) -> usize {
        0
    }

    // === Derived operations ===

    fn rotate(&mut self, phi: f32) {
        let origin = self.position();
        self.rotate_about(phi, origin);
    }

    fn scale(&mut self, factor: f32) {
        let origin = self.position();
        self.scale_about(factor, origin);
    }

    fn accelerate(&mut self, acceleration: Vec2) {
        self.body_mut().vel += acceleration;
    }

    fn accelerate_polar(&mut self, phi: f32, r: f32) {
        self.accelerate(polar_to_cartesian(r, phi));
    }

    /// Multiply velocity by `fraction` (1.0 keeps it, 0.0 stops)
    fn traction(&mut self, fraction: f32) {
        self.body_mut().vel *= fraction;
    }

    fn stop(&mut self) {
        self.body_mut().vel = Vec2::ZERO;
    }

    /// Clamp each velocity component to `[min, max]`
    fn cap_velocity(&mut self, max: Vec2, min: Vec2) {
        let body = self.body_mut();
        body.vel = body.vel.clamp(min.min(max), max);
    }

    /// Apply velocity to position once
    fn travel(&mut self) {
        let vel = self.velocity();
        self.move_by(vel);
    }

    /// Move `ratio` of the way toward `target`
    fn ease_to(&mut self, target: Vec2, ratio: f32) {
        let delta = (target - self.position()) * ratio;
        self.move_by(delta);
    }

    /// Move so that `center()` lands on `pos`
    fn center_on(&mut self, pos: Vec2) {
        let delta = pos - self.center();
        self.move_by(delta);
    }

    /// Move onto the grid (remainder of `position + offset` is dropped)
    fn snap_to_grid(&mut self, grid: Vec2, offset: Vec2) {
        let rem = (self.position() + offset) % grid;
        self.move_by(-rem);
    }

    fn direction_to(&self, target: Vec2) -> f32 {
        direction(self.position(), target)
    }

    fn distance_to(&self, target: Vec2) -> f32 {
        distance(self.position(), target)
    }

    /// Segment from the position along the velocity, scaled for display
    fn movement_vector(&self, scale: f32) -> (Vec2, Vec2) {
        let pos = self.position();
        (pos, pos + self.velocity() * scale)
    }

    /// Flag for removal at the owner's next cull
    fn expire(&mut self) {
        self.body_mut().expired = true;
    }

    fn hide(&mut self) {
        self.body_mut().hidden = true;
    }

    fn show(&mut self) {
        self.body_mut().hidden = false;
    }

    fn mute(&mut self) {
        self.body_mut().muted = true;
    }

    fn unmute(&mut self) {
        self.body_mut().muted = false;
    }

    fn set_shadow(&mut self, shadow: Shadow) {
        self.body_mut().shadow = Some(shadow);
    }

    fn reset_shadow(&mut self) {
        self.body_mut().shadow = None;
    }

    fn set_hitbox_padding(&mut self, padding: f32) {
        self.body_mut().hitbox_padding = padding;
    }

    fn enable_drag(&mut self) {
        self.body_mut().draggable = true;
    }

    // === Pointer ===

    /// Track the pointer against this entity and fire pointer events
    fn listen(&mut self, pointer: &Pointer<'_>) {
        track_pointer(self, pointer);
    }

    /// Pointer hook; the default implements drag-to-move for draggable entities
    fn on_pointer(&mut self, event: PointerEvent, pointer: &Pointer<'_>) {
        if !self.body().draggable {
            return;
        }
        match event {
            PointerEvent::Down => {
                let grab = pointer.position - self.center();
                self.body_mut().pointer.grab = grab;
            }
            PointerEvent::Drag => {
                let target = pointer.position - self.body().pointer.grab;
                self.center_on(target);
            }
            _ => {}
        }
    }

    // === Animations ===

    /// Attach an animation (its start hook runs immediately)
    fn add_animation(&mut self, mut animation: Box<dyn Animation>)
    where
        Self: Sized,
    {
        animation.on_start(self);
        self.body_mut().animations.push(animation);
    }

    fn add_animations(&mut self, animations: Vec<Box<dyn Animation>>)
    where
        Self: Sized,
    {
        for animation in animations {
            self.add_animation(animation);
        }
    }

    /// Replace every attached animation without running hooks
    fn set_animation(&mut self, animation: Box<dyn Animation>) {
        self.body_mut().animations = vec![animation];
    }

    /// Detach everything, running each finish hook
    fn clear_animations(&mut self)
    where
        Self: Sized,
    {
        let animations = std::mem::take(&mut self.body_mut().animations);
        for mut animation in animations {
            animation.on_finish(self);
        }
    }

    /// Advance attached animations one frame, evicting finished ones
    fn animate(&mut self)
    where
        Self: Sized,
    {
        run_animations(self);
    }
}

/// Per-tick behaviour, with `C` as the caller's tick context
pub trait Entity<C>: Transform {
    /// Gameplay hook, runs before `animate` and `travel`
    fn update(&mut self, _ctx: &mut C) {}

    /// One simulation step: update, animate, then integrate velocity
    fn step(&mut self, ctx: &mut C)
    where
        Self: Sized,
    {
        self.update(ctx);
        self.animate();
        self.travel();
    }
}

/// Draw an entity with its shadow, unless hidden
pub fn draw(renderer: &mut dyn Renderer, entity: &dyn Transform) {
    let body = entity.body();
    if body.hidden {
        return;
    }
    match &body.shadow {
        Some(shadow) => renderer.set_shadow(shadow),
        None => renderer.reset_shadow(),
    }
    entity.get_drawn(renderer);
}

/// Default pointer tracking for one entity (composites call this for themselves)
pub fn track_pointer<T: Transform + ?Sized>(entity: &mut T, pointer: &Pointer<'_>) {
    if entity.body().muted {
        return;
    }
    let over = entity.is_point_over(pointer.position);
    let events = entity.body_mut().pointer.track(over, pointer);
    for event in events {
        entity.on_pointer(event, pointer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Button, InputState};
    use proptest::prelude::*;
    use std::f32::consts::PI;

    #[derive(Debug, Default)]
    struct Dot {
        body: Body,
        updates: u32,
        pointer_events: Vec<PointerEvent>,
    }

    impl Dot {
        fn at(pos: Vec2) -> Self {
            Self {
                body: Body::new(pos),
                ..Default::default()
            }
        }
    }

    impl Transform for Dot {
        fn body(&self) -> &Body {
            &self.body
        }

        fn body_mut(&mut self) -> &mut Body {
            &mut self.body
        }

        fn is_point_over(&self, point: Vec2) -> bool {
            self.bounding_rect().contains(point)
        }

        fn on_pointer(&mut self, event: PointerEvent, pointer: &Pointer<'_>) {
            self.pointer_events.push(event);
            if self.body.draggable {
                let grab = pointer.position - self.center();
                if event == PointerEvent::Down {
                    self.body.pointer.grab = grab;
                } else if event == PointerEvent::Drag {
                    let target = pointer.position - self.body.pointer.grab;
                    self.center_on(target);
                }
            }
        }
    }

    impl Entity<()> for Dot {
        fn update(&mut self, _ctx: &mut ()) {
            self.updates += 1;
        }
    }

    #[test]
    fn test_velocity_integration() {
        let mut dot = Dot::at(Vec2::ZERO);
        dot.accelerate(Vec2::new(2.0, 0.0));
        dot.accelerate_polar(PI / 2.0, 1.0);
        assert_eq!(dot.position(), Vec2::ZERO);

        dot.travel();
        assert!((dot.position() - Vec2::new(2.0, 1.0)).length() < 1e-5);

        dot.traction(0.5);
        dot.travel();
        assert!((dot.position() - Vec2::new(3.0, 1.5)).length() < 1e-5);

        dot.stop();
        dot.travel();
        assert!((dot.position() - Vec2::new(3.0, 1.5)).length() < 1e-5);
    }

    #[test]
    fn test_cap_velocity() {
        let mut dot = Dot::at(Vec2::ZERO);
        dot.accelerate(Vec2::new(50.0, -50.0));
        dot.cap_velocity(Vec2::splat(10.0), Vec2::splat(-5.0));
        assert_eq!(dot.velocity(), Vec2::new(10.0, -5.0));
    }

    #[test]
    fn test_rotate_moves_position_about_origin() {
        let mut dot = Dot::at(Vec2::new(10.0, 0.0));
        dot.rotate_about(PI / 2.0, Vec2::ZERO);
        assert!((dot.position() - Vec2::new(0.0, 10.0)).length() < 1e-4);

        // Rotating about itself leaves the position alone
        dot.rotate(1.3);
        assert!((dot.position() - Vec2::new(0.0, 10.0)).length() < 1e-4);
    }

    #[test]
    fn test_ease_center_and_snap() {
        let mut dot = Dot::at(Vec2::ZERO);
        dot.ease_to(Vec2::new(10.0, 20.0), 0.5);
        assert_eq!(dot.position(), Vec2::new(5.0, 10.0));

        dot.center_on(Vec2::new(33.0, 17.0));
        dot.snap_to_grid(Vec2::splat(16.0), Vec2::ZERO);
        assert_eq!(dot.position(), Vec2::new(32.0, 16.0));
    }

    #[test]
    fn test_direction_and_distance_to() {
        let dot = Dot::at(Vec2::new(1.0, 1.0));
        assert!((dot.distance_to(Vec2::new(4.0, 5.0)) - 5.0).abs() < 1e-5);
        assert!((dot.direction_to(Vec2::new(1.0, 9.0)) - PI / 2.0).abs() < 1e-6);
        assert!((dot.direction_to(Vec2::new(-3.0, 1.0)) - PI).abs() < 1e-6);
    }

    #[test]
    fn test_expire_only_flags() {
        let mut dot = Dot::at(Vec2::ONE);
        dot.expire();
        assert!(dot.is_expired());
        assert_eq!(dot.position(), Vec2::ONE);
    }

    #[test]
    fn test_step_order() {
        let mut dot = Dot::at(Vec2::ZERO);
        dot.accelerate(Vec2::X);
        dot.step(&mut ());
        assert_eq!(dot.updates, 1);
        assert_eq!(dot.position(), Vec2::X);
    }

    #[test]
    fn test_draw_skips_hidden_and_applies_shadow() {
        use crate::renderer::{DrawCommand, Recorder, ShapeStyle};
        use crate::sim::shapes::CircleShape;

        let mut recorder = Recorder::new(Vec2::new(100.0, 100.0));
        let mut shape = CircleShape::new(Vec2::ZERO, 3.0);
        shape.style = ShapeStyle::default();
        shape.set_shadow(Shadow::new("#00ff00", 5.0));
        draw(&mut recorder, &shape);
        shape.hide();
        draw(&mut recorder, &shape);

        assert_eq!(recorder.commands().len(), 1);
        assert!(matches!(recorder.commands()[0], DrawCommand::Circle { .. }));
    }

    #[test]
    fn test_pointer_events_and_drag() {
        let mut input = InputState::new();
        let mut dot = Dot::at(Vec2::ZERO);
        dot.set_hitbox_padding(5.0);
        dot.enable_drag();

        input.move_mouse(Vec2::new(1.0, 1.0));
        dot.listen(&input.pointer_at(input.mouse.raw));
        assert_eq!(dot.pointer_events, vec![PointerEvent::Over]);

        input.press_button(Button::Left);
        dot.listen(&input.pointer_at(input.mouse.raw));
        assert!(dot.body().is_pointer_down());

        // Second tick held: the drag is claimed and the entity follows the pointer
        input.move_mouse(Vec2::new(21.0, 1.0));
        dot.listen(&input.pointer_at(input.mouse.raw));
        assert!(dot.body().is_dragging());
        assert!((dot.position() - Vec2::new(20.0, 0.0)).length() < 1e-5);

        input.release_button(Button::Left);
        dot.listen(&input.pointer_at(input.mouse.raw));
        assert_eq!(dot.pointer_events.last(), Some(&PointerEvent::Up));
        assert!(!input.mouse.drag_claimed());
    }

    #[test]
    fn test_muted_entity_ignores_pointer() {
        let input = InputState::new();
        let mut dot = Dot::at(Vec2::ZERO);
        dot.set_hitbox_padding(5.0);
        dot.mute();
        dot.listen(&input.pointer_at(Vec2::ZERO));
        assert!(dot.pointer_events.is_empty());
    }

    proptest! {
        #[test]
        fn prop_move_polar_round_trip(
            x in -500.0f32..500.0,
            y in -500.0f32..500.0,
            phi in -10.0f32..10.0,
            r in 0.0f32..200.0,
        ) {
            let mut dot = Dot::at(Vec2::new(x, y));
            dot.move_polar(phi, r);
            dot.move_polar(phi + PI, r);
            prop_assert!((dot.position() - Vec2::new(x, y)).length() < 1e-2);
        }
    }
}

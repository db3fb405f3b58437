//! Actor: the composite every gameplay entity is built on
//!
//! An actor is a small fixed subtree: a container of sprites plus a hit circle
//! (hidden unless debugging). Moving the actor moves the whole subtree and
//! advances the walk cycle whenever the move is non-zero, so velocity-driven
//! entities animate as they travel.

use glam::Vec2;

use super::catalog::CreatureBlueprint;
use super::counters::MovementAnimation;
use crate::consts::SPRITE_FACING_OFFSET;
use crate::polar_to_cartesian;
use crate::renderer::{Renderer, Shadow};
use crate::sim::animation::run_animations;
use crate::sim::{Body, Circle, CircleShape, Container, Rect, Sprite, Transform, draw};

/// Delegate `Transform` to a wrapped actor field
macro_rules! forward_transform {
    ($ty:ty => $field:ident) => {
        impl $crate::sim::Transform for $ty {
            fn body(&self) -> &$crate::sim::Body {
                $crate::sim::Transform::body(&self.$field)
            }

            fn body_mut(&mut self) -> &mut $crate::sim::Body {
                $crate::sim::Transform::body_mut(&mut self.$field)
            }

            fn move_by(&mut self, delta: ::glam::Vec2) {
                $crate::sim::Transform::move_by(&mut self.$field, delta)
            }

            fn place(&mut self, pos: ::glam::Vec2) {
                $crate::sim::Transform::place(&mut self.$field, pos)
            }

            fn move_polar(&mut self, phi: f32, r: f32) {
                $crate::sim::Transform::move_polar(&mut self.$field, phi, r)
            }

            fn scale_about(&mut self, factor: f32, origin: ::glam::Vec2) {
                $crate::sim::Transform::scale_about(&mut self.$field, factor, origin)
            }

            fn rotate_about(&mut self, phi: f32, origin: ::glam::Vec2) {
                $crate::sim::Transform::rotate_about(&mut self.$field, phi, origin)
            }

            fn center(&self) -> ::glam::Vec2 {
                $crate::sim::Transform::center(&self.$field)
            }

            fn bounding_rect(&self) -> $crate::sim::Rect {
                $crate::sim::Transform::bounding_rect(&self.$field)
            }

            fn bounding_circle(&self) -> $crate::sim::Circle {
                $crate::sim::Transform::bounding_circle(&self.$field)
            }

            fn is_point_over(&self, point: ::glam::Vec2) -> bool {
                $crate::sim::Transform::is_point_over(&self.$field, point)
            }

            fn get_drawn(&self, renderer: &mut dyn $crate::renderer::Renderer) {
                $crate::sim::Transform::get_drawn(&self.$field, renderer)
            }

            fn cull(&mut self) -> usize {
                $crate::sim::Transform::cull(&mut self.$field)
            }

            fn animate(&mut self)
            where
                Self: Sized,
            {
                $crate::sim::Transform::animate(&mut self.$field)
            }
        }
    };
}

pub(crate) use forward_transform;

#[derive(Debug)]
pub struct Actor {
    body: Body,
    pub sprites: Container<Sprite>,
    pub hit_circle: CircleShape,
    pub move_speed: f32,
    movement: MovementAnimation,
    /// Sprite whose frame follows the walk cycle
    animated_sprite: usize,
    /// Sprite turned toward the direction of `move_polar`
    facing_sprite: Option<usize>,
}

impl Actor {
    /// Lower sprite of a creature (body, walk cycle, faces movement)
    pub const BOTTOM: usize = 0;
    /// Upper sprite of a creature (head or turret, faces the aim)
    pub const TOP: usize = 1;

    pub fn new(pos: Vec2, hit_circle_radius: f32, move_speed: f32) -> Self {
        let mut hit_circle = CircleShape::new(pos, hit_circle_radius);
        hit_circle.hide();
        Self {
            body: Body::new(pos),
            sprites: Container::new(pos),
            hit_circle,
            move_speed,
            movement: MovementAnimation::disabled(),
            animated_sprite: 0,
            facing_sprite: None,
        }
    }

    /// Add a sprite centred on the actor
    pub fn with_sprite(mut self, sprite: Sprite, shadow: Option<&Shadow>) -> Self {
        let mut sprite = sprite.placed(self.body.pos);
        if let Some(shadow) = shadow {
            sprite.set_shadow(shadow.clone());
        }
        self.sprites.add(sprite);
        self
    }

    /// Drive sprite `index` from a walk cycle
    pub fn with_walk_cycle(mut self, index: usize, breakpoints: [u32; 4]) -> Self {
        self.movement = MovementAnimation::new(breakpoints);
        self.animated_sprite = index;
        self
    }

    /// Turn sprite `index` toward the direction of every polar move
    pub fn facing_movement(mut self, index: usize) -> Self {
        self.facing_sprite = Some(index);
        self
    }

    /// Two-sprite creature: body at frame (0, 0), head at frame (0, 1)
    pub fn creature(pos: Vec2, blueprint: &CreatureBlueprint) -> Self {
        let template = &blueprint.template;
        Actor::new(pos, template.hit_circle_radius, template.move_speed)
            .with_sprite(blueprint.sheet.get(0, 0), template.shadow.as_ref())
            .with_sprite(blueprint.sheet.get(0, 1), template.shadow.as_ref())
            .with_walk_cycle(Self::BOTTOM, template.move_animation_breakpoints)
            .facing_movement(Self::BOTTOM)
    }

    pub fn hit_circle(&self) -> Circle {
        self.hit_circle.circle()
    }

    pub fn show_hit_circle(&mut self) {
        self.hit_circle.show();
    }

    pub fn hide_hit_circle(&mut self) {
        self.hit_circle.hide();
    }

    pub fn disable_walk_cycle(&mut self) {
        self.movement.disable();
    }

    pub fn sprite(&self, index: usize) -> Option<&Sprite> {
        self.sprites.get(index)
    }

    pub fn sprite_mut(&mut self, index: usize) -> Option<&mut Sprite> {
        self.sprites.get_mut(index)
    }

    pub fn set_sprite_rotation(&mut self, index: usize, rotation: f32) {
        if let Some(sprite) = self.sprites.get_mut(index) {
            sprite.set_rotation(rotation);
        }
    }

    /// Expire and stop drawing at once; the owner drops it at the next cull
    pub fn destroy(&mut self) {
        self.expire();
        self.hide();
    }
}

impl Transform for Actor {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn move_by(&mut self, delta: Vec2) {
        self.body.pos += delta;
        self.sprites.move_by(delta);
        self.hit_circle.move_by(delta);
        if let Some((fx, fy)) = self.movement.tick(delta != Vec2::ZERO) {
            if let Some(sprite) = self.sprites.get_mut(self.animated_sprite) {
                sprite.set_frame(fx, fy);
            }
        }
    }

    fn place(&mut self, pos: Vec2) {
        let delta = pos - self.body.pos;
        self.body.pos = pos;
        self.sprites.move_by(delta);
        self.hit_circle.move_by(delta);
    }

    fn move_polar(&mut self, phi: f32, r: f32) {
        self.move_by(polar_to_cartesian(r, phi));
        if let Some(index) = self.facing_sprite {
            self.set_sprite_rotation(index, phi + SPRITE_FACING_OFFSET);
        }
    }

    fn scale_about(&mut self, factor: f32, origin: Vec2) {
        self.body.pos = origin + (self.body.pos - origin) * factor;
        self.sprites.scale_about(factor, origin);
        self.hit_circle.scale_about(factor, origin);
    }

    fn rotate_about(&mut self, phi: f32, origin: Vec2) {
        self.body.pos = crate::rotate_point(self.body.pos, phi, origin);
        self.sprites.rotate_about(phi, origin);
        self.hit_circle.rotate_about(phi, origin);
    }

    /// The hit circle, not the sprites, is what collides
    fn bounding_circle(&self) -> Circle {
        let circle = self.hit_circle.circle();
        Circle::new(circle.center, circle.radius + self.body.hitbox_padding)
    }

    fn bounding_rect(&self) -> Rect {
        self.sprites
            .bounding_rect()
            .union(&self.hit_circle.bounding_rect())
            .padded(self.body.hitbox_padding)
    }

    fn is_point_over(&self, point: Vec2) -> bool {
        self.bounding_circle().contains(point)
    }

    fn get_drawn(&self, renderer: &mut dyn Renderer) {
        draw(renderer, &self.sprites);
        draw(renderer, &self.hit_circle);
    }

    fn animate(&mut self)
    where
        Self: Sized,
    {
        run_animations(self);
        self.sprites.animate();
    }
}

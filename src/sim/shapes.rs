//! Geometric primitives: circles, rectangles and a drawable circle entity

use glam::Vec2;

use super::collision::{circle_vs_circle, point_in_circle, point_in_rect, rect_intersection};
use super::entity::{Body, Entity, Transform};
use crate::renderer::{Renderer, ShapeStyle};

/// Circle used for hit tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn overlaps(&self, other: &Circle) -> bool {
        circle_vs_circle(self, other)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point_in_circle(point, self)
    }

    /// Axis-aligned square around the circle
    pub fn bounding_rect(&self) -> Rect {
        Rect::centered(self.center, Vec2::splat(self.radius * 2.0))
    }
}

/// Axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size * 0.5,
            size,
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &Rect) -> Rect {
        let min = self.min.min(other.min);
        let max = self.max().max(other.max());
        Rect::new(min, max - min)
    }

    /// Grown by `padding` on every side
    pub fn padded(&self, padding: f32) -> Rect {
        Rect::new(self.min - Vec2::splat(padding), self.size + Vec2::splat(padding * 2.0))
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point_in_rect(point, self)
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        rect_intersection(self, other)
    }

    /// Circle through the corners, grown by `padding`
    pub fn bounding_circle(&self, padding: f32) -> Circle {
        Circle::new(self.center(), self.size.length() * 0.5 + padding)
    }
}

/// Circle that lives in the scene (hit-circle visualisation)
#[derive(Debug)]
pub struct CircleShape {
    body: Body,
    pub radius: f32,
    pub style: ShapeStyle,
}

impl CircleShape {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            body: Body::new(center),
            radius,
            style: ShapeStyle::outline("#ff0000", 1.0),
        }
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.body.pos, self.radius)
    }
}

impl Transform for CircleShape {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn scale_about(&mut self, factor: f32, origin: Vec2) {
        self.body.pos = origin + (self.body.pos - origin) * factor;
        self.radius *= factor;
    }

    fn bounding_circle(&self) -> Circle {
        Circle::new(self.body.pos, self.radius + self.body.hitbox_padding)
    }

    fn bounding_rect(&self) -> Rect {
        self.bounding_circle().bounding_rect()
    }

    fn is_point_over(&self, point: Vec2) -> bool {
        self.bounding_circle().contains(point)
    }

    fn get_drawn(&self, renderer: &mut dyn Renderer) {
        renderer.draw_circle(self.body.pos, self.radius, &self.style);
    }
}

impl<C> Entity<C> for CircleShape {}

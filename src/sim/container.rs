//! Composite entity
//!
//! A `Container` owns an ordered list of children. Forward order is draw order;
//! listening runs backward so the topmost child sees the pointer first.
//! Transforming the container transforms the whole subtree.

use glam::Vec2;

use super::entity::{Body, Entity, Transform, draw, track_pointer};
use super::shapes::{Circle, Rect};
use crate::input::Pointer;
use crate::renderer::Renderer;

#[derive(Debug)]
pub struct Container<E> {
    body: Body,
    children: Vec<E>,
}

impl<E> Default for Container<E> {
    fn default() -> Self {
        Self {
            body: Body::default(),
            children: Vec::new(),
        }
    }
}

impl<E: Transform> Container<E> {
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: Body::new(pos),
            children: Vec::new(),
        }
    }

    pub fn of(children: impl IntoIterator<Item = E>) -> Self {
        let mut container = Self::default();
        container.adds(children);
        container
    }

    pub fn add(&mut self, child: E) {
        self.children.push(child);
        self.body.pos = self.center();
    }

    pub fn adds(&mut self, children: impl IntoIterator<Item = E>) {
        self.children.extend(children);
        self.body.pos = self.center();
    }

    /// Remove and return the child at `index`
    pub fn remove(&mut self, index: usize) -> Option<E> {
        if index >= self.children.len() {
            return None;
        }
        let child = self.children.remove(index);
        self.body.pos = self.center();
        Some(child)
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    pub fn children(&self) -> &[E] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [E] {
        &mut self.children
    }

    pub fn get(&self, index: usize) -> Option<&E> {
        self.children.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut E> {
        self.children.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.children.iter()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Visit children in draw order
    pub fn for_each(&mut self, mut f: impl FnMut(&mut E, usize)) {
        for (i, child) in self.children.iter_mut().enumerate() {
            f(child, i);
        }
    }

    /// Visit children topmost first
    pub fn for_each_rev(&mut self, mut f: impl FnMut(&mut E, usize)) {
        for (i, child) in self.children.iter_mut().enumerate().rev() {
            f(child, i);
        }
    }
}

impl<E: Transform> Transform for Container<E> {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn move_by(&mut self, delta: Vec2) {
        self.body.pos += delta;
        for child in &mut self.children {
            child.move_by(delta);
        }
    }

    fn place(&mut self, pos: Vec2) {
        let delta = pos - self.center();
        self.body.pos = pos;
        for child in &mut self.children {
            child.move_by(delta);
        }
    }

    fn scale_about(&mut self, factor: f32, origin: Vec2) {
        self.body.pos = origin + (self.body.pos - origin) * factor;
        for child in &mut self.children {
            child.scale_about(factor, origin);
        }
    }

    /// The subtree turns rigidly about `origin`
    fn rotate_about(&mut self, phi: f32, origin: Vec2) {
        self.body.pos = crate::rotate_point(self.body.pos, phi, origin);
        for child in &mut self.children {
            child.rotate_about(phi, origin);
        }
    }

    /// Centroid of the children's centres; an empty container reports its own position
    fn center(&self) -> Vec2 {
        if self.children.is_empty() {
            return self.body.pos;
        }
        let sum: Vec2 = self.children.iter().map(|c| c.center()).sum();
        sum / self.children.len() as f32
    }

    /// Union of the children's rects; an empty container is a zero-area rect at its position
    fn bounding_rect(&self) -> Rect {
        let union = self
            .children
            .iter()
            .map(|c| c.bounding_rect())
            .reduce(|acc, r| acc.union(&r))
            .unwrap_or_else(|| Rect::new(self.body.pos, Vec2::ZERO));
        union.padded(self.body.hitbox_padding)
    }

    fn bounding_circle(&self) -> Circle {
        let rect = self
            .children
            .iter()
            .map(|c| c.bounding_rect())
            .reduce(|acc, r| acc.union(&r))
            .unwrap_or_else(|| Rect::new(self.body.pos, Vec2::ZERO));
        rect.bounding_circle(self.body.hitbox_padding)
    }

    fn is_point_over(&self, point: Vec2) -> bool {
        self.bounding_rect().contains(point)
    }

    fn get_drawn(&self, renderer: &mut dyn Renderer) {
        for child in &self.children {
            draw(renderer, child);
        }
    }

    fn travel(&mut self) {
        let vel = self.velocity();
        self.move_by(vel);
        for child in &mut self.children {
            child.travel();
        }
    }

    fn listen(&mut self, pointer: &Pointer<'_>) {
        if self.body.muted {
            return;
        }
        for child in self.children.iter_mut().rev() {
            child.listen(pointer);
        }
        track_pointer(self, pointer);
    }

    fn cull(&mut self) -> usize {
        let before = self.children.len();
        self.children.retain(|c| !c.is_expired());
        let mut removed = before - self.children.len();
        for child in &mut self.children {
            removed += child.cull();
        }
        if removed > 0 && !self.children.is_empty() {
            self.body.pos = self.center();
        }
        removed
    }

    fn animate(&mut self)
    where
        Self: Sized,
    {
        super::animation::run_animations(self);
        for child in &mut self.children {
            child.animate();
        }
    }
}

impl<C, E: Entity<C>> Entity<C> for Container<E> {
    fn update(&mut self, ctx: &mut C) {
        for child in &mut self.children {
            child.update(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::animation::Move;
    use std::f32::consts::PI;

    #[derive(Debug, Default)]
    struct Dot {
        body: Body,
        updates: u32,
        travels: u32,
    }

    impl Dot {
        fn at(x: f32, y: f32) -> Self {
            Self {
                body: Body::new(Vec2::new(x, y)),
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

        fn travel(&mut self) {
            self.travels += 1;
            let vel = self.velocity();
            self.move_by(vel);
        }
    }

    impl Entity<()> for Dot {
        fn update(&mut self, _ctx: &mut ()) {
            self.updates += 1;
        }
    }

    #[test]
    fn test_centroid_on_add() {
        let mut c = Container::new(Vec2::new(100.0, 100.0));
        assert_eq!(c.center(), Vec2::new(100.0, 100.0));
        c.add(Dot::at(0.0, 0.0));
        c.add(Dot::at(10.0, 20.0));
        assert_eq!(c.position(), Vec2::new(5.0, 10.0));
    }

    #[test]
    fn test_move_and_place_move_subtree() {
        let mut c = Container::of([Dot::at(0.0, 0.0), Dot::at(10.0, 0.0)]);
        c.move_by(Vec2::new(1.0, 2.0));
        assert_eq!(c.children()[1].position(), Vec2::new(11.0, 2.0));

        c.place(Vec2::new(0.0, 0.0));
        assert_eq!(c.position(), Vec2::ZERO);
        assert_eq!(c.children()[0].position(), Vec2::new(-5.0, 0.0));
        assert_eq!(c.children()[1].position(), Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_rotate_turns_children_about_pivot() {
        let mut c = Container::of([Dot::at(-10.0, 0.0), Dot::at(10.0, 0.0)]);
        c.rotate(PI / 2.0);
        assert!((c.children()[0].position() - Vec2::new(0.0, -10.0)).length() < 1e-4);
        assert!((c.children()[1].position() - Vec2::new(0.0, 10.0)).length() < 1e-4);
    }

    #[test]
    fn test_rotate_about_external_origin_keeps_centroid() {
        let mut c = Container::of([Dot::at(-10.0, 0.0), Dot::at(10.0, 0.0)]);
        c.rotate_about(PI, Vec2::new(100.0, 0.0));
        assert!((c.children()[0].position() - Vec2::new(210.0, 0.0)).length() < 1e-3);
        assert!((c.children()[1].position() - Vec2::new(190.0, 0.0)).length() < 1e-3);
        assert!((c.position() - Vec2::new(200.0, 0.0)).length() < 1e-3);
        assert!((c.position() - c.center()).length() < 1e-3);

        // Quarter turn about a point off both axes
        let mut c = Container::of([Dot::at(0.0, 0.0), Dot::at(4.0, 2.0), Dot::at(2.0, 7.0)]);
        c.rotate_about(PI / 2.0, Vec2::new(-5.0, 3.0));
        assert!((c.position() - c.center()).length() < 1e-3);
        assert!((c.children()[0].position() - Vec2::new(-2.0, 8.0)).length() < 1e-3);
    }

    #[test]
    fn test_scale_about_origin() {
        let mut c = Container::of([Dot::at(2.0, 0.0), Dot::at(4.0, 0.0)]);
        c.scale_about(2.0, Vec2::ZERO);
        assert_eq!(c.children()[1].position(), Vec2::new(8.0, 0.0));
        assert_eq!(c.position(), Vec2::new(6.0, 0.0));
    }

    #[test]
    fn test_empty_bounding_rect_is_degenerate() {
        let c: Container<Dot> = Container::new(Vec2::new(7.0, -3.0));
        let rect = c.bounding_rect();
        assert_eq!(rect.min, Vec2::new(7.0, -3.0));
        assert_eq!(rect.size, Vec2::ZERO);
        assert!(rect.center().is_finite());
        assert_eq!(c.bounding_circle().radius, 0.0);
    }

    #[test]
    fn test_bounding_rect_is_union() {
        let mut a = Dot::at(0.0, 0.0);
        a.set_hitbox_padding(1.0);
        let mut b = Dot::at(10.0, 5.0);
        b.set_hitbox_padding(2.0);
        let c = Container::of([a, b]);
        let rect = c.bounding_rect();
        assert_eq!(rect.min, Vec2::new(-1.0, -1.0));
        assert_eq!(rect.max(), Vec2::new(12.0, 7.0));
        assert!(c.is_point_over(Vec2::new(6.0, 3.0)));
    }

    #[test]
    fn test_cull_removes_expired_and_is_idempotent() {
        let mut c = Container::of([Dot::at(0.0, 0.0), Dot::at(10.0, 0.0), Dot::at(20.0, 0.0)]);
        c.children_mut()[1].expire();

        // Expired children still get stepped until the cull
        c.step(&mut ());
        assert_eq!(c.children()[1].updates, 1);

        assert_eq!(c.cull(), 1);
        assert_eq!(c.len(), 2);
        assert_eq!(c.position(), Vec2::new(10.0, 0.0));
        assert_eq!(c.cull(), 0);

        c.step(&mut ());
        assert!(c.children().iter().all(|d| d.updates == 2 && d.travels == 2));
    }

    #[test]
    fn test_cull_recurses_into_nested_containers() {
        let mut inner = Container::of([Dot::at(0.0, 0.0), Dot::at(1.0, 0.0)]);
        inner.children_mut()[0].expire();
        let mut outer = Container::of([inner]);
        assert_eq!(outer.cull(), 1);
        assert_eq!(outer.children()[0].len(), 1);
    }

    #[test]
    fn test_travel_composes_parent_and_child_velocity() {
        let mut c = Container::of([Dot::at(0.0, 0.0)]);
        c.accelerate(Vec2::new(1.0, 0.0));
        c.children_mut()[0].accelerate(Vec2::new(0.0, 2.0));
        c.travel();
        assert_eq!(c.children()[0].position(), Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_container_animation_moves_children() {
        let mut c = Container::of([Dot::at(0.0, 0.0), Dot::at(2.0, 0.0)]);
        c.add_animation(Box::new(Move::new(Vec2::new(10.0, 0.0), 10)));
        for _ in 0..10 {
            c.animate();
        }
        assert!((c.children()[1].position() - Vec2::new(12.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn test_for_each_orders() {
        let mut c = Container::of([Dot::at(0.0, 0.0), Dot::at(1.0, 0.0), Dot::at(2.0, 0.0)]);
        let mut forward = Vec::new();
        c.for_each(|_, i| forward.push(i));
        let mut backward = Vec::new();
        c.for_each_rev(|_, i| backward.push(i));
        assert_eq!(forward, vec![0, 1, 2]);
        assert_eq!(backward, vec![2, 1, 0]);
    }
}

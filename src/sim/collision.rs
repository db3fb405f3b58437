//! Collision detection
//!
//! Overlap tests between hit circles, rectangles and points. Touching shapes do
//! not count as overlapping: circles collide only when the gap between their
//! edges is strictly negative.

use glam::Vec2;

use super::entity::Transform;
use super::shapes::{Circle, Rect};

/// True if two circles overlap
#[inline]
pub fn circle_vs_circle(a: &Circle, b: &Circle) -> bool {
    a.center.distance(b.center) - a.radius - b.radius < 0.0
}

/// True if `point` lies strictly inside `circle`
#[inline]
pub fn point_in_circle(point: Vec2, circle: &Circle) -> bool {
    point.distance(circle.center) < circle.radius
}

/// True if `point` lies inside `rect` (edges inclusive)
#[inline]
pub fn point_in_rect(point: Vec2, rect: &Rect) -> bool {
    let max = rect.max();
    point.x >= rect.min.x && point.x <= max.x && point.y >= rect.min.y && point.y <= max.y
}

/// True if two rectangles overlap with non-zero area
#[inline]
pub fn rect_vs_rect(a: &Rect, b: &Rect) -> bool {
    rect_intersection(a, b).is_some()
}

/// Overlapping region of two rectangles, if any
pub fn rect_intersection(a: &Rect, b: &Rect) -> Option<Rect> {
    let min = a.min.max(b.min);
    let max = a.max().min(b.max());
    if max.x > min.x && max.y > min.y {
        Some(Rect::new(min, max - min))
    } else {
        None
    }
}

/// Test every pair of entities by bounding circle
///
/// `on_collide(i, j)` is called for each overlapping pair in both orders, so
/// each side gets to react once as "self".
pub fn mass_circles<T: Transform>(entities: &[T], mut on_collide: impl FnMut(usize, usize)) {
    let circles: Vec<Circle> = entities.iter().map(|e| e.bounding_circle()).collect();
    for i in 0..circles.len() {
        for j in (i + 1)..circles.len() {
            if circle_vs_circle(&circles[i], &circles[j]) {
                on_collide(i, j);
                on_collide(j, i);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::shapes::CircleShape;

    #[test]
    fn test_circle_vs_circle() {
        let a = Circle::new(Vec2::ZERO, 10.0);
        assert!(circle_vs_circle(&a, &Circle::new(Vec2::new(15.0, 0.0), 10.0)));
        // Exactly touching is not a hit
        assert!(!circle_vs_circle(&a, &Circle::new(Vec2::new(20.0, 0.0), 10.0)));
        assert!(!circle_vs_circle(&a, &Circle::new(Vec2::new(0.0, 50.0), 10.0)));
    }

    #[test]
    fn test_point_tests() {
        let c = Circle::new(Vec2::new(5.0, 5.0), 2.0);
        assert!(point_in_circle(Vec2::new(6.0, 5.0), &c));
        assert!(!point_in_circle(Vec2::new(8.0, 5.0), &c));

        let r = Rect::new(Vec2::ZERO, Vec2::new(10.0, 4.0));
        assert!(point_in_rect(Vec2::new(10.0, 4.0), &r));
        assert!(!point_in_rect(Vec2::new(10.1, 2.0), &r));
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let b = Rect::new(Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0));
        let overlap = rect_intersection(&a, &b).unwrap();
        assert_eq!(overlap.min, Vec2::new(5.0, 5.0));
        assert_eq!(overlap.size, Vec2::new(5.0, 5.0));

        let c = Rect::new(Vec2::new(10.0, 0.0), Vec2::new(3.0, 3.0));
        assert!(!rect_vs_rect(&a, &c));
    }

    #[test]
    fn test_mass_circles_reports_both_orders() {
        let shapes = vec![
            CircleShape::new(Vec2::ZERO, 10.0),
            CircleShape::new(Vec2::new(5.0, 0.0), 10.0),
            CircleShape::new(Vec2::new(500.0, 0.0), 10.0),
        ];
        let mut pairs = Vec::new();
        mass_circles(&shapes, |i, j| pairs.push((i, j)));
        assert_eq!(pairs, vec![(0, 1), (1, 0)]);
    }
}

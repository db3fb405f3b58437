//! Entity core
//!
//! Scene objects, composition, animation and the fixed-tick loop:
//! - Bodies carry position, velocity and flags; `Transform` moves them
//! - Containers compose entities and propagate transforms to the subtree
//! - Layers group top-level entities under an optional camera
//! - The loop fires one callback per tick and clears input edges afterwards

pub mod animation;
pub mod collision;
pub mod container;
pub mod entity;
pub mod layer;
pub mod shapes;
pub mod sprite;
pub mod tick;

pub use animation::{Animation, Ease, Move, Progress, Sequence, Sin, SmoothStart, SmoothStop, Wait};
pub use collision::{circle_vs_circle, mass_circles, point_in_circle, point_in_rect, rect_vs_rect};
pub use container::Container;
pub use entity::{Body, Entity, PointerEvent, Transform, draw};
pub use layer::{Camera, Layer, handle_layers};
pub use shapes::{Circle, CircleShape, Rect};
pub use sprite::{SheetRegistry, Sprite, SpriteSheet};
pub use tick::{Clock, GameLoop, TickHandler};

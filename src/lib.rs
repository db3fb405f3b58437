//! MX Arena - a top-down arena shooter
//!
//! Core modules:
//! - `sim`: Entity core (bodies, containers, animations, layers, fixed-tick loop)
//! - `game`: Gameplay entities (player, monsters, projectiles, particles)
//! - `renderer`: Rendering backend seam and a headless command recorder
//! - `rng`: Seedable deterministic random source
//! - `input`: Per-game input state with edge-triggered flags
//! - `config`: Data-driven templates and tuning

pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod renderer;
pub mod rng;
pub mod sim;

pub use config::GameConfig;
pub use error::ConfigError;
pub use rng::{Rng, Seed};

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// Game configuration constants
pub mod consts {
    /// Default fixed simulation rate
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Expired entities are swept every N ticks
    pub const CULL_EVERY_N_TICKS: u64 = 30;

    /// Logical view size the gameplay layer is scaled to fit
    pub const VIEW_WIDTH: f32 = 1600.0;
    pub const VIEW_HEIGHT: f32 = 900.0;

    /// Sprites are drawn "up"-facing, so facing angles need a quarter turn
    pub const SPRITE_FACING_OFFSET: f32 = std::f32::consts::FRAC_PI_2;

    /// Projectiles leave the muzzle this far ahead of the shooter
    pub const PROJECTILE_MUZZLE_OFFSET: f32 = 40.0;
    /// Particles spawn this far along their firing direction
    pub const PARTICLE_MUZZLE_OFFSET: f32 = 20.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid may round up to TAU itself
    if wrapped >= PI { wrapped - TAU } else { wrapped }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
///
/// The angle follows the library's quadrant convention: `atan(y/x)` shifted by
/// π when `x < 0`, and a vertical special case when `x == 0`. Angles therefore
/// land in (-π/2, 3π/2], not atan2's (-π, π].
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), bearing(pos))
}

/// Bearing of a vector (0 = +x, counter-clockwise toward +y)
#[inline]
pub fn bearing(delta: Vec2) -> f32 {
    if delta.x == 0.0 {
        if delta.y > 0.0 { FRAC_PI_2 } else { FRAC_PI_2 * 3.0 }
    } else {
        let phi = (delta.y / delta.x).atan();
        if delta.x < 0.0 { phi + PI } else { phi }
    }
}

/// Bearing from `from` toward `to`
#[inline]
pub fn direction(from: Vec2, to: Vec2) -> f32 {
    bearing(to - from)
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Rotate `point` about `origin` by `phi` radians
#[inline]
pub fn rotate_point(point: Vec2, phi: f32, origin: Vec2) -> Vec2 {
    let (r, theta) = cartesian_to_polar(point - origin);
    origin + polar_to_cartesian(r, theta + phi)
}

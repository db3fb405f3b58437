//! Per-tick gameplay context
//!
//! Entities never reach into the view that owns them. Everything they may read
//! or request during one tick goes through a `Frame`: the input, the RNG, the
//! player's position, a registry of hittable monsters, and queues for hits and
//! newly spawned entities that the view applies once the layer pass is over.

use glam::Vec2;

use super::monster::Monster;
use super::particle::{Debris, Particle};
use super::projectile::Projectile;
use crate::config::Controls;
use crate::input::InputState;
use crate::rng::Rng;
use crate::sim::{Circle, Transform};

/// Hittable snapshot of a live monster
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub id: u32,
    pub circle: Circle,
    pub health: u32,
}

/// Damage dealt during the tick, applied after the layer pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub target: u32,
    pub damage: u32,
    /// Heading of whatever dealt the hit
    pub heading: f32,
    pub position: Vec2,
}

/// Entity queued for insertion once the layer pass is over
#[derive(Debug)]
pub enum Spawn {
    Projectile(Projectile),
    Particle(Particle),
    Debris(Debris),
}

pub struct Frame<'a> {
    pub input: &'a InputState,
    pub controls: Controls,
    pub rng: &'a mut Rng,
    pub player_pos: Vec2,
    /// Pointer in gameplay-layer coordinates
    pub pointer: Vec2,
    pub targets: Vec<Target>,
    pub spawns: Vec<Spawn>,
    pub hits: Vec<Hit>,
}

impl<'a> Frame<'a> {
    pub fn new(input: &'a InputState, controls: Controls, rng: &'a mut Rng) -> Self {
        Self {
            input,
            controls,
            rng,
            player_pos: Vec2::ZERO,
            pointer: Vec2::ZERO,
            targets: Vec::new(),
            spawns: Vec::new(),
            hits: Vec::new(),
        }
    }

    /// Rebuild the target registry from the monsters' current state
    pub fn refresh_targets(&mut self, monsters: &[Monster]) {
        self.targets.clear();
        self.targets.extend(
            monsters
                .iter()
                .filter(|m| !m.is_expired() && m.health() > 0)
                .map(|m| Target {
                    id: m.id(),
                    circle: m.hit_circle(),
                    health: m.health(),
                }),
        );
    }

    /// Hit the first live target overlapping `circle`
    ///
    /// The target's registry health drops at once, so a target killed earlier
    /// in the tick can't be struck again.
    pub fn strike(&mut self, circle: Circle, damage: u32, heading: f32) -> bool {
        let Some(target) = self
            .targets
            .iter_mut()
            .find(|t| t.health > 0 && t.circle.overlaps(&circle))
        else {
            return false;
        };
        target.health = target.health.saturating_sub(damage);
        self.hits.push(Hit {
            target: target.id,
            damage,
            heading,
            position: circle.center,
        });
        true
    }
}

//! Projectiles
//!
//! Fired with an initial impulse and pushed by constant thrust along the fire
//! direction. Each update tests the hit circle against the tick's target
//! registry: the first hit damages one monster and destroys the projectile.

use glam::Vec2;

use super::actor::{Actor, forward_transform};
use super::catalog::ProjectileBlueprint;
use super::counters::DurationCounter;
use super::frame::Frame;
use crate::rng::Rng;
use crate::sim::{Circle, Entity, Transform};

#[derive(Debug)]
pub struct Projectile {
    actor: Actor,
    accuracy: f32,
    muzzle_offset: f32,
    thrust: f32,
    damage: u32,
    heading: f32,
    duration: Option<DurationCounter>,
}

forward_transform!(Projectile => actor);

impl Projectile {
    pub fn new(pos: Vec2, blueprint: &ProjectileBlueprint, rng: &mut Rng) -> Self {
        let template = &blueprint.template;
        let actor = Actor::new(pos, template.hit_circle_radius, template.move_speed)
            .with_sprite(blueprint.sheet.get(0, 0), template.shadow.as_ref())
            .with_walk_cycle(0, template.move_animation_breakpoints)
            .facing_movement(0);
        Self {
            actor,
            accuracy: template.accuracy,
            muzzle_offset: template.muzzle_offset,
            thrust: template.thrust,
            damage: template.damage,
            heading: 0.0,
            duration: template
                .duration
                .map(|duration| DurationCounter::new(duration.sample(rng))),
        }
    }

    /// Launch along `direction`, jittered by up to ± accuracy
    pub fn fire(mut self, direction: f32, rng: &mut Rng) -> Self {
        let heading = if self.accuracy > 0.0 {
            direction + rng.float(-self.accuracy, self.accuracy)
        } else {
            direction
        };
        self.heading = heading;
        self.move_polar(heading, self.muzzle_offset);
        self.accelerate_polar(heading, self.actor.move_speed);
        self
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn damage(&self) -> u32 {
        self.damage
    }

    pub fn hit_circle(&self) -> Circle {
        self.actor.hit_circle()
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn actor_mut(&mut self) -> &mut Actor {
        &mut self.actor
    }
}

impl<'a> Entity<Frame<'a>> for Projectile {
    fn update(&mut self, ctx: &mut Frame<'a>) {
        if self.is_expired() {
            return;
        }
        if self.thrust != 0.0 {
            self.accelerate_polar(self.heading, self.thrust);
        }
        if ctx.strike(self.hit_circle(), self.damage, self.heading) {
            log::trace!("Projectile hit at {}", self.position());
            self.actor.destroy();
            return;
        }
        if let Some(duration) = self.duration.as_mut() {
            if duration.tick().over() {
                self.actor.destroy();
            }
        }
    }
}

//! Monsters: walk straight at the player, bleed when hit

use std::f32::consts::PI;
use std::rc::Rc;

use glam::Vec2;

use super::actor::{Actor, forward_transform};
use super::catalog::{CreatureBlueprint, ParticleBlueprint};
use super::frame::{Frame, Hit};
use super::particle::Particle;
use crate::consts::SPRITE_FACING_OFFSET;
use crate::rng::Rng;
use crate::sim::{Circle, Entity, Transform};

#[derive(Debug)]
pub struct Monster {
    actor: Actor,
    id: u32,
    health: u32,
    blood: Option<Rc<ParticleBlueprint>>,
    burst_count: usize,
    burst_spread: f32,
}

forward_transform!(Monster => actor);

impl Monster {
    pub fn new(id: u32, pos: Vec2, blueprint: &CreatureBlueprint) -> Self {
        let template = &blueprint.template;
        Self {
            actor: Actor::creature(pos, blueprint),
            id,
            health: template.health,
            blood: blueprint.blood.clone(),
            burst_count: template.burst_count,
            burst_spread: template.burst_spread,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn health(&self) -> u32 {
        self.health
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

    /// Apply a hit; returns the blood it spills
    ///
    /// Every hit sprays one particle along the hit's heading. The killing hit
    /// also destroys the monster and fans `burst_count` particles around the
    /// opposite direction.
    pub fn take_damage(&mut self, hit: &Hit, rng: &mut Rng) -> Vec<Particle> {
        if self.health == 0 {
            return Vec::new();
        }
        self.health = self.health.saturating_sub(hit.damage);
        let dead = self.health == 0;
        if dead {
            log::debug!("Monster {} destroyed", self.id);
            self.actor.destroy();
        }

        let Some(blood) = &self.blood else {
            return Vec::new();
        };
        let pos = self.position();
        let mut spill = vec![Particle::new(pos, blood, rng).fire(hit.heading)];
        if dead {
            for _ in 0..self.burst_count {
                let jitter = if self.burst_spread > 0.0 {
                    rng.float(-self.burst_spread, self.burst_spread)
                } else {
                    0.0
                };
                spill.push(Particle::new(pos, blood, rng).fire(hit.heading + PI + jitter));
            }
        }
        spill
    }
}

impl<'a> Entity<Frame<'a>> for Monster {
    fn update(&mut self, ctx: &mut Frame<'a>) {
        if self.is_expired() {
            return;
        }
        let direction = self.direction_to(ctx.player_pos);
        self.move_polar(direction, self.actor.move_speed);
        self.actor
            .set_sprite_rotation(Actor::TOP, direction + SPRITE_FACING_OFFSET);
    }
}

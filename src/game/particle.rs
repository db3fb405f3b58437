//! Particles and the debris they leave behind

use std::f32::consts::TAU;
use std::rc::Rc;

use glam::Vec2;

use super::actor::{Actor, forward_transform};
use super::catalog::{DebrisBlueprint, ParticleBlueprint};
use super::counters::DurationCounter;
use super::frame::{Frame, Spawn};
use crate::rng::Rng;
use crate::sim::{Entity, Transform};

/// Short-lived effect: decelerates, spins, then may drop debris
#[derive(Debug)]
pub struct Particle {
    actor: Actor,
    traction: f32,
    spin: f32,
    muzzle_offset: f32,
    duration: Option<DurationCounter>,
    debris: Option<Rc<DebrisBlueprint>>,
}

forward_transform!(Particle => actor);

impl Particle {
    pub fn new(pos: Vec2, blueprint: &ParticleBlueprint, rng: &mut Rng) -> Self {
        let template = &blueprint.template;
        let offset = template.move_speed_offset;
        let move_speed = if offset > 0.0 {
            template.move_speed + rng.float(-offset, offset)
        } else {
            template.move_speed
        };
        let actor = Actor::new(pos, template.hit_circle_radius, move_speed)
            .with_sprite(blueprint.sheet.get(0, 0), template.shadow.as_ref())
            .with_walk_cycle(0, template.move_animation_breakpoints);
        Self {
            actor,
            traction: template.traction,
            spin: template.spin,
            muzzle_offset: template.muzzle_offset,
            duration: template
                .duration
                .map(|duration| DurationCounter::new(duration.sample(rng))),
            debris: blueprint.debris.clone(),
        }
    }

    pub fn fire(mut self, direction: f32) -> Self {
        self.move_polar(direction, self.muzzle_offset);
        self.accelerate_polar(direction, self.actor.move_speed);
        self
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn actor_mut(&mut self) -> &mut Actor {
        &mut self.actor
    }
}

impl<'a> Entity<Frame<'a>> for Particle {
    fn update(&mut self, ctx: &mut Frame<'a>) {
        if self.is_expired() {
            return;
        }
        self.traction(self.traction);
        self.rotate(self.spin);
        let over = self
            .duration
            .as_mut()
            .is_some_and(|duration| duration.tick().over());
        if over {
            self.actor.destroy();
            if let Some(debris) = &self.debris {
                let debris = Debris::new(self.position(), debris, ctx.rng);
                ctx.spawns.push(Spawn::Debris(debris));
            }
        }
    }
}

/// Floor decoration with a random frame and rotation, fading out over its lifetime
#[derive(Debug)]
pub struct Debris {
    actor: Actor,
    duration: DurationCounter,
}

forward_transform!(Debris => actor);

impl Debris {
    pub fn new(pos: Vec2, blueprint: &DebrisBlueprint, rng: &mut Rng) -> Self {
        let template = &blueprint.template;
        let [range_x, range_y] = template.sprite_choice_range;
        let frame_x = rng.int(0, range_x as i32).max(0) as u32;
        let frame_y = rng.int(0, range_y as i32).max(0) as u32;
        let mut actor = Actor::new(pos, 0.0, 0.0)
            .with_sprite(blueprint.sheet.get(frame_x, frame_y), template.shadow.as_ref());
        actor.rotate(rng.float(0.0, TAU));
        actor.disable_walk_cycle();
        Self {
            actor,
            duration: DurationCounter::new(template.duration.sample(rng)),
        }
    }

    pub fn alpha(&self) -> f32 {
        self.actor.sprite(0).map_or(0.0, |sprite| sprite.alpha())
    }

    pub fn frame(&self) -> (u32, u32) {
        self.actor.sprite(0).map_or((0, 0), |sprite| sprite.frame())
    }
}

impl<'a> Entity<Frame<'a>> for Debris {
    fn update(&mut self, _ctx: &mut Frame<'a>) {
        if self.is_expired() {
            return;
        }
        let alpha = self.duration.fract();
        if let Some(sprite) = self.actor.sprite_mut(0) {
            sprite.set_alpha(alpha);
        }
        if self.duration.tick().over() {
            self.actor.destroy();
        }
    }
}

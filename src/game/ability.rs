//! Cooldown-gated abilities
//!
//! A cooldown counts down on every call, whether or not the trigger is held.
//! The ability fires when the trigger is held and the count is below zero,
//! then restarts at `max`. Nothing is queued: a trigger held while cooling is
//! simply ignored.

use std::rc::Rc;

use glam::Vec2;

use super::catalog::ProjectileBlueprint;
use super::frame::{Frame, Spawn};
use super::projectile::Projectile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldown {
    max: u32,
    left: i64,
}

impl Cooldown {
    /// Ready immediately; afterwards fires at most once every `max + 1` calls
    pub fn new(max: u32) -> Self {
        Self { max, left: 0 }
    }

    pub fn is_ready(&self) -> bool {
        self.left < 0
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Count down; returns true when this call fires
    pub fn handle(&mut self, trigger: bool) -> bool {
        // Clamped at -1: "ready" needs no further history
        self.left = (self.left - 1).max(-1);
        if trigger && self.left < 0 {
            self.left = self.max as i64;
            return true;
        }
        false
    }
}

/// Ability gated by a [`Cooldown`], used within tick context `C`
pub trait CooldownAbility<C> {
    type Args;

    fn cooldown_mut(&mut self) -> &mut Cooldown;

    /// The effect itself
    fn use_ability(&mut self, args: Self::Args, ctx: &mut C);

    /// Called once per tick; runs `use_ability` when the cooldown lets it
    fn handle(&mut self, args: Self::Args, trigger: bool, ctx: &mut C) -> bool {
        if self.cooldown_mut().handle(trigger) {
            self.use_ability(args, ctx);
            return true;
        }
        false
    }
}

/// Fires a projectile from the user's position toward an aim direction
#[derive(Debug, Clone)]
pub struct LaserAttack {
    cooldown: Cooldown,
    projectile: Rc<ProjectileBlueprint>,
}

impl LaserAttack {
    pub fn new(projectile: Rc<ProjectileBlueprint>, cooldown: u32) -> Self {
        Self {
            cooldown: Cooldown::new(cooldown),
            projectile,
        }
    }
}

impl<'a> CooldownAbility<Frame<'a>> for LaserAttack {
    /// (origin, aim direction)
    type Args = (Vec2, f32);

    fn cooldown_mut(&mut self) -> &mut Cooldown {
        &mut self.cooldown
    }

    fn use_ability(&mut self, (origin, direction): (Vec2, f32), ctx: &mut Frame<'a>) {
        let laser = Projectile::new(origin, &self.projectile, ctx.rng).fire(direction, ctx.rng);
        log::trace!("Laser fired from {origin} toward {direction:.3}");
        ctx.spawns.push(Spawn::Projectile(laser));
    }
}

//! The player: key-driven movement, pointer aim, cooldown-gated laser

use glam::Vec2;

use super::ability::{CooldownAbility, LaserAttack};
use super::actor::{Actor, forward_transform};
use super::catalog::CreatureBlueprint;
use super::frame::Frame;
use crate::bearing;
use crate::config::Controls;
use crate::consts::SPRITE_FACING_OFFSET;
use crate::input::{Button, InputState, Key};
use crate::sim::{Entity, Transform};

#[derive(Debug)]
pub struct Player {
    actor: Actor,
    attack: Option<LaserAttack>,
}

forward_transform!(Player => actor);

impl Player {
    pub fn new(pos: Vec2, blueprint: &CreatureBlueprint) -> Self {
        let attack = blueprint
            .attack
            .as_ref()
            .map(|attack| LaserAttack::new(attack.projectile.clone(), attack.cooldown));
        Self {
            actor: Actor::creature(pos, blueprint),
            attack,
        }
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn actor_mut(&mut self) -> &mut Actor {
        &mut self.actor
    }
}

fn axis(input: &InputState, negative: Key, positive: Key) -> f32 {
    let mut value = 0.0;
    if input.is_down(negative) {
        value -= 1.0;
    }
    if input.is_down(positive) {
        value += 1.0;
    }
    value
}

/// Unit step per axis from the movement keys
///
/// Diagonals are deliberately left unnormalised: up+left moves √2 times
/// faster than up alone.
pub fn movement_axes(input: &InputState, controls: &Controls) -> Vec2 {
    Vec2::new(
        axis(input, controls.left, controls.right),
        axis(input, controls.up, controls.down),
    )
}

impl<'a> Entity<Frame<'a>> for Player {
    fn update(&mut self, ctx: &mut Frame<'a>) {
        let aim = self.direction_to(ctx.pointer);
        self.actor
            .set_sprite_rotation(Actor::TOP, aim + SPRITE_FACING_OFFSET);

        let step = movement_axes(ctx.input, &ctx.controls) * self.actor.move_speed;
        if step != Vec2::ZERO {
            self.move_polar(bearing(step), step.length());
        }

        let trigger = ctx.input.mouse_down(Button::Left);
        let origin = self.position();
        if let Some(attack) = self.attack.as_mut() {
            attack.handle((origin, aim), trigger, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::catalog::Catalog;
    use crate::game::frame::Spawn;
    use crate::rng::Rng;

    fn player() -> Player {
        let catalog = Catalog::resolve(&GameConfig::default()).unwrap();
        Player::new(Vec2::ZERO, &catalog.player)
    }

    fn step_with(player: &mut Player, input: &InputState, ticks: usize) -> Vec<Spawn> {
        let mut rng = Rng::new(4);
        let mut frame = Frame::new(input, Controls::default(), &mut rng);
        frame.pointer = Vec2::new(0.0, -100.0);
        for _ in 0..ticks {
            player.step(&mut frame);
        }
        frame.spawns
    }

    #[test]
    fn test_straight_movement() {
        let mut input = InputState::new();
        input.press_key(Key::D);
        let mut player = player();
        step_with(&mut player, &input, 5);
        assert!((player.position() - Vec2::new(10.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_diagonal_is_not_normalised() {
        let mut input = InputState::new();
        input.press_key(Key::W);
        input.press_key(Key::A);
        let mut player = player();
        step_with(&mut player, &input, 1);
        assert!((player.position() - Vec2::new(-2.0, -2.0)).length() < 1e-4);
        assert!((player.position().length() - 2.0 * std::f32::consts::SQRT_2).abs() < 1e-4);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut input = InputState::new();
        input.press_key(Key::A);
        input.press_key(Key::D);
        let mut player = player();
        step_with(&mut player, &input, 3);
        assert_eq!(player.position(), Vec2::ZERO);
        // No movement, no walk cycle
        assert_eq!(player.actor().sprite(Actor::BOTTOM).unwrap().frame(), (0, 0));
    }

    #[test]
    fn test_faces_pointer() {
        let input = InputState::new();
        let mut player = player();
        step_with(&mut player, &input, 1);
        // Pointer straight "up" the screen (negative y)
        let top = player.actor().sprite(Actor::TOP).unwrap();
        let expected = crate::bearing(Vec2::new(0.0, -100.0)) + SPRITE_FACING_OFFSET;
        assert!((top.rotation() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_fires_while_button_held() {
        let mut input = InputState::new();
        input.press_button(Button::Left);
        let mut player = player();
        // Cooldown 3: fires on ticks 0, 4 and 8
        let spawns = step_with(&mut player, &input, 9);
        assert_eq!(spawns.len(), 3);
        assert!(spawns.iter().all(|s| matches!(s, Spawn::Projectile(_))));

        let idle = InputState::new();
        assert!(step_with(&mut player, &idle, 10).is_empty());
    }
}

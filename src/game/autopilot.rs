//! Demo driver: plays the game by writing raw input
//!
//! Aims at the monster nearest the player and holds fire while any monster is
//! alive. Movement circles the arena on a fixed key pattern so the player never
//! parks in one spot.

use std::cmp::Ordering;

use glam::Vec2;

use crate::config::Controls;
use crate::input::{Button, InputState};
use crate::renderer::Viewport;

#[derive(Debug, Clone)]
pub struct Autopilot {
    controls: Controls,
    /// Ticks spent on each leg of the strafe pattern
    pub strafe_period: u64,
}

impl Autopilot {
    pub const DEFAULT_STRAFE_PERIOD: u64 = 90;

    pub fn new(controls: Controls) -> Self {
        Self {
            controls,
            strafe_period: Self::DEFAULT_STRAFE_PERIOD,
        }
    }

    /// Write this tick's input
    ///
    /// `targets` are world positions; `viewport` maps them to the screen
    /// position the mouse has to be at.
    pub fn drive(
        &self,
        tick: u64,
        input: &mut InputState,
        player_pos: Vec2,
        targets: impl IntoIterator<Item = Vec2>,
        viewport: Viewport,
    ) {
        let nearest = targets.into_iter().min_by(|a, b| {
            a.distance_squared(player_pos)
                .partial_cmp(&b.distance_squared(player_pos))
                .unwrap_or(Ordering::Equal)
        });
        match nearest {
            Some(target) => {
                input.move_mouse(viewport.to_screen(target));
                input.press_button(Button::Left);
            }
            None => input.release_button(Button::Left),
        }

        // Right, down, left, up: a square around the start position
        let legs = [
            self.controls.right,
            self.controls.down,
            self.controls.left,
            self.controls.up,
        ];
        let leg = ((tick / self.strafe_period.max(1)) % legs.len() as u64) as usize;
        for (i, key) in legs.into_iter().enumerate() {
            if i == leg {
                input.press_key(key);
            } else {
                input.release_key(key);
            }
        }
    }
}

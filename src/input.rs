//! Input state
//!
//! Level-triggered key and button state plus one-shot "just pressed/released"
//! edges. Raw events are written between ticks; the loop clears the edges after
//! every tick so each edge is seen by exactly one tick.

use std::cell::Cell;
use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Keyboard keys the game binds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
    Space,
    Escape,
    Enter,
    Shift,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    Left,
    Middle,
    Right,
}

impl Button {
    fn index(self) -> usize {
        match self {
            Button::Left => 0,
            Button::Middle => 1,
            Button::Right => 2,
        }
    }
}

/// Mouse state in screen (canvas) coordinates
#[derive(Debug, Default)]
pub struct Mouse {
    /// Latest pointer position
    pub raw: Vec2,
    /// Accumulated movement since the last edge clear
    pub movement: Vec2,
    buttons: [bool; 3],
    just_down: [bool; 3],
    just_up: [bool; 3],
    /// Set while some entity owns the current drag
    drag_claimed: Cell<bool>,
}

impl Mouse {
    pub fn is_down(&self, button: Button) -> bool {
        self.buttons[button.index()]
    }

    pub fn is_just_down(&self, button: Button) -> bool {
        self.just_down[button.index()]
    }

    pub fn is_just_up(&self, button: Button) -> bool {
        self.just_up[button.index()]
    }

    pub fn drag_claimed(&self) -> bool {
        self.drag_claimed.get()
    }
}

/// Keyboard and mouse state for one game instance
#[derive(Debug, Default)]
pub struct InputState {
    keys_down: HashSet<Key>,
    just_down: HashSet<Key>,
    just_up: HashSet<Key>,
    pub mouse: Mouse,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press; repeats while held do not create a new edge
    pub fn press_key(&mut self, key: Key) {
        if self.keys_down.insert(key) {
            self.just_down.insert(key);
        }
    }

    pub fn release_key(&mut self, key: Key) {
        if self.keys_down.remove(&key) {
            self.just_up.insert(key);
        }
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn is_just_down(&self, key: Key) -> bool {
        self.just_down.contains(&key)
    }

    pub fn is_just_up(&self, key: Key) -> bool {
        self.just_up.contains(&key)
    }

    pub fn move_mouse(&mut self, to: Vec2) {
        self.mouse.movement += to - self.mouse.raw;
        self.mouse.raw = to;
    }

    pub fn press_button(&mut self, button: Button) {
        let i = button.index();
        if !self.mouse.buttons[i] {
            self.mouse.just_down[i] = true;
        }
        self.mouse.buttons[i] = true;
    }

    pub fn release_button(&mut self, button: Button) {
        let i = button.index();
        if self.mouse.buttons[i] {
            self.mouse.just_up[i] = true;
        }
        self.mouse.buttons[i] = false;
        if button == Button::Left {
            self.mouse.drag_claimed.set(false);
        }
    }

    pub fn mouse_down(&self, button: Button) -> bool {
        self.mouse.is_down(button)
    }

    pub fn mouse_just_down(&self, button: Button) -> bool {
        self.mouse.is_just_down(button)
    }

    /// Clear every one-shot edge flag (called once per tick by the loop)
    pub fn clear_edges(&mut self) {
        self.just_down.clear();
        self.just_up.clear();
        self.mouse.just_down = [false; 3];
        self.mouse.just_up = [false; 3];
        self.mouse.movement = Vec2::ZERO;
    }

    /// Pointer as seen through a layer's coordinate transform
    pub fn pointer_at(&self, position: Vec2) -> Pointer<'_> {
        Pointer {
            position,
            pressed: self.mouse.is_down(Button::Left),
            just_pressed: self.mouse.is_just_down(Button::Left),
            drag: &self.mouse.drag_claimed,
        }
    }
}

/// Pointer handed to listening entities, already in layer-local coordinates
#[derive(Debug, Clone, Copy)]
pub struct Pointer<'a> {
    pub position: Vec2,
    pub pressed: bool,
    pub just_pressed: bool,
    drag: &'a Cell<bool>,
}

impl<'a> Pointer<'a> {
    /// Same pointer state at a different (e.g. layer-local) position
    pub fn at(&self, position: Vec2) -> Pointer<'a> {
        Pointer { position, ..*self }
    }

    /// Try to become the single drag owner; false when someone else holds it
    pub fn claim_drag(&self) -> bool {
        if self.drag.get() {
            return false;
        }
        self.drag.set(true);
        true
    }

    pub fn release_drag(&self) {
        self.drag.set(false);
    }

    pub fn drag_claimed(&self) -> bool {
        self.drag.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_edges_cleared_once() {
        let mut input = InputState::new();
        input.press_key(Key::W);
        assert!(input.is_down(Key::W));
        assert!(input.is_just_down(Key::W));

        input.clear_edges();
        assert!(input.is_down(Key::W));
        assert!(!input.is_just_down(Key::W));

        // Holding the key does not re-trigger the edge
        input.press_key(Key::W);
        assert!(!input.is_just_down(Key::W));

        input.release_key(Key::W);
        assert!(input.is_just_up(Key::W));
        assert!(!input.is_down(Key::W));
    }

    #[test]
    fn test_mouse_buttons_and_movement() {
        let mut input = InputState::new();
        input.move_mouse(Vec2::new(10.0, 5.0));
        input.move_mouse(Vec2::new(12.0, 9.0));
        assert_eq!(input.mouse.movement, Vec2::new(12.0, 9.0));

        input.press_button(Button::Left);
        assert!(input.mouse_down(Button::Left));
        assert!(input.mouse_just_down(Button::Left));
        assert!(!input.mouse_down(Button::Right));

        input.clear_edges();
        assert!(input.mouse_down(Button::Left));
        assert!(!input.mouse_just_down(Button::Left));
        assert_eq!(input.mouse.movement, Vec2::ZERO);
    }

    #[test]
    fn test_single_drag_claim() {
        let mut input = InputState::new();
        input.press_button(Button::Left);
        {
            let pointer = input.pointer_at(Vec2::ZERO);
            assert!(pointer.claim_drag());
            assert!(!pointer.at(Vec2::ONE).claim_drag());
        }
        input.release_button(Button::Left);
        assert!(!input.mouse.drag_claimed());
    }
}

//! Keyboard polling boundary
//!
//! The platform feeds raw key codes into `KeyState`; the game only asks
//! whether an action is held.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Browser-style key codes for the arrow keys
pub mod keys {
    pub const LEFT: u32 = 37;
    pub const UP: u32 = 38;
    pub const RIGHT: u32 = 39;
    pub const DOWN: u32 = 40;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Left,
    Up,
    Right,
    Down,
}

/// Anything that can be polled for held actions
pub trait InputSource {
    fn is_down(&self, action: Action) -> bool;
}

/// Key to action bindings plus the set of keys currently held
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    actions: HashSet<Action>,
    bindings: HashMap<u32, Action>,
    pressed: HashSet<u32>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arrow keys bound to the four movement actions
    pub fn arrows() -> Self {
        let mut state = Self::new();
        for (key, action) in [
            (keys::LEFT, Action::Left),
            (keys::UP, Action::Up),
            (keys::RIGHT, Action::Right),
            (keys::DOWN, Action::Down),
        ] {
            state.register_action(action);
            state.register_key(key, action);
        }
        state
    }

    pub fn register_action(&mut self, action: Action) {
        self.actions.insert(action);
    }

    pub fn register_key(&mut self, key: u32, action: Action) {
        self.bindings.insert(key, action);
    }

    pub fn press(&mut self, key: u32) {
        self.pressed.insert(key);
    }

    pub fn release(&mut self, key: u32) {
        self.pressed.remove(&key);
    }

    pub fn release_all(&mut self) {
        self.pressed.clear();
    }
}

impl InputSource for KeyState {
    fn is_down(&self, action: Action) -> bool {
        self.actions.contains(&action)
            && self
                .pressed
                .iter()
                .any(|key| self.bindings.get(key) == Some(&action))
    }
}

/// Raw movement direction from the held actions (not normalized)
pub fn movement(input: &impl InputSource) -> Vec2 {
    let mut direction = Vec2::ZERO;
    if input.is_down(Action::Left) {
        direction.x -= 1.0;
    }
    if input.is_down(Action::Right) {
        direction.x += 1.0;
    }
    if input.is_down(Action::Up) {
        direction.y -= 1.0;
    }
    if input.is_down(Action::Down) {
        direction.y += 1.0;
    }
    direction
}

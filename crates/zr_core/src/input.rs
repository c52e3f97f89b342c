//! Live pressed/released key table.
//!
//! - **Level-triggered (held):** `is_held(key)` is true every frame the key is
//!   physically down. Movement, turning and the fire trigger read this.
//!
//! - **Edge-triggered (just_pressed):** true only until `end_frame()`, which the
//!   main loop calls once per rendered frame. Only application-level toggles
//!   (pause, debug panel, modal acknowledge) read edges, and they are read once
//!   per frame before stepping. The simulation never does, because several
//!   fixed steps may run against the same edge.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    W,
    A,
    S,
    D,
    Q,
    E,
    N,
    M,
    Space,
    P,
    Enter,
    Escape,
    F3,
}

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn any_held(&self, keys: &[Key]) -> bool {
        keys.iter().any(|key| self.held.contains(key))
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    /// Forget every key, as if all were released. Used when a modal takes
    /// focus: key-up events delivered to the dialog must not leave movement stuck.
    pub fn release_all(&mut self) {
        if !self.held.is_empty() {
            log::debug!("Releasing {} held key(s)", self.held.len());
        }
        self.held.clear();
        self.just_pressed.clear();
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_down_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::W);
        assert!(input.is_held(Key::W));
        assert!(input.is_just_pressed(Key::W));
    }

    #[test]
    fn key_up_clears_held() {
        let mut input = InputState::new();
        input.key_down(Key::Space);
        input.key_up(Key::Space);
        assert!(!input.is_held(Key::Space));
    }

    #[test]
    fn os_key_repeat_does_not_retrigger_edge() {
        let mut input = InputState::new();
        input.key_down(Key::P);
        input.end_frame();
        // Auto-repeat delivers another press while the key is still held.
        input.key_down(Key::P);
        assert!(input.is_held(Key::P));
        assert!(!input.is_just_pressed(Key::P));
    }

    #[test]
    fn end_frame_keeps_held_state() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        input.end_frame();
        assert!(!input.is_just_pressed(Key::A));
        assert!(input.is_held(Key::A));
    }

    #[test]
    fn any_held_matches_alternate_bindings() {
        let mut input = InputState::new();
        input.key_down(Key::Up);
        assert!(input.any_held(&[Key::W, Key::Up]));
        assert!(!input.any_held(&[Key::S, Key::Down]));
    }

    #[test]
    fn release_all_forgets_everything() {
        let mut input = InputState::new();
        input.key_down(Key::W);
        input.key_down(Key::Space);
        input.release_all();
        assert!(!input.is_held(Key::W));
        assert!(!input.is_held(Key::Space));
        assert!(!input.is_just_pressed(Key::W));
    }

    #[test]
    fn default_state_is_empty() {
        let input = InputState::default();
        assert!(!input.is_held(Key::Space));
        assert!(!input.is_just_pressed(Key::Enter));
    }
}

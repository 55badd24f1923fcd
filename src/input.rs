//! Abstract player intents, decoupled from how keys are read.

use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Jump,
    Shoot,
    Dash,
    Pause,
    Confirm,
    Quit,
}

/// Actions held down plus the ones that went down since the last tick.
#[derive(Debug, Clone, Default)]
pub struct Input {
    held: HashSet<Action>,
    pressed: HashSet<Action>,
    /// Seconds since each held action was last pressed.
    since_press: HashMap<Action, f32>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `action` as held, recording an edge if it was not held before.
    pub fn press(&mut self, action: Action) {
        if self.held.insert(action) {
            self.pressed.insert(action);
        }
        self.since_press.insert(action, 0.0);
    }

    pub fn release(&mut self, action: Action) {
        self.held.remove(&action);
        self.since_press.remove(&action);
    }

    /// A one-shot edge with no matching release (mouse clicks).
    pub fn tap(&mut self, action: Action) {
        self.pressed.insert(action);
    }

    pub fn held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    pub fn pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Clears edges; called once per simulation tick.
    pub fn end_tick(&mut self) {
        self.pressed.clear();
    }

    /// Releases actions not pressed again within `hold` seconds. Used when
    /// the terminal never reports releases and key repeat keeps a key held.
    pub fn expire(&mut self, dt: f32, hold: f32) {
        self.since_press.retain(|_, age| {
            *age += dt;
            *age <= hold
        });
        self.held.retain(|action| self.since_press.contains_key(action));
    }

    pub fn clear(&mut self) {
        self.held.clear();
        self.pressed.clear();
        self.since_press.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_records_single_edge() {
        let mut input = Input::new();
        input.press(Action::Jump);
        assert!(input.pressed(Action::Jump));
        assert!(input.held(Action::Jump));

        input.end_tick();
        input.press(Action::Jump); // key repeat
        assert!(!input.pressed(Action::Jump));
        assert!(input.held(Action::Jump));

        input.release(Action::Jump);
        assert!(!input.held(Action::Jump));
    }

    #[test]
    fn tap_is_edge_only() {
        let mut input = Input::new();
        input.tap(Action::Shoot);
        assert!(input.pressed(Action::Shoot));
        assert!(!input.held(Action::Shoot));
        input.end_tick();
        assert!(!input.pressed(Action::Shoot));
    }

    #[test]
    fn key_repeat_keeps_a_single_edge() {
        const TICK: f32 = 1.0 / 60.0;
        let mut input = Input::new();
        input.press(Action::Dash);
        assert!(input.pressed(Action::Dash));

        // Repeats every other tick never re-trigger the press.
        for tick in 0..40 {
            input.end_tick();
            input.expire(TICK, 0.5);
            if tick % 2 == 0 {
                input.press(Action::Dash);
            }
            assert!(!input.pressed(Action::Dash));
            assert!(input.held(Action::Dash));
        }

        // No more repeats: the key counts as released once the hold runs out.
        for _ in 0..31 {
            input.end_tick();
            input.expire(TICK, 0.5);
        }
        assert!(!input.held(Action::Dash));
        input.press(Action::Dash);
        assert!(input.pressed(Action::Dash));
    }
}

//! Keyboard input
//!
//! Key events update a held-state struct (last write wins); the game loop
//! samples it once per fixed frame.

use serde::{Deserialize, Serialize};

use super::InputSource;
use crate::sim::TickInput;

/// Movement intent a key maps onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Left,
    Right,
    Jump,
}

/// Key names (as reported by `KeyboardEvent.key`) for each action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub jump: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let keys = |names: &[&str]| names.iter().map(|k| k.to_string()).collect();
        Self {
            left: keys(&["ArrowLeft", "a"]),
            right: keys(&["ArrowRight", "d"]),
            jump: keys(&[" ", "ArrowUp", "w"]),
        }
    }
}

impl KeyBindings {
    /// Action bound to `key`; letters match regardless of case
    pub fn action(&self, key: &str) -> Option<Action> {
        let bound = |keys: &[String]| keys.iter().any(|k| k.eq_ignore_ascii_case(key));
        if bound(&self.left) {
            Some(Action::Left)
        } else if bound(&self.right) {
            Some(Action::Right)
        } else if bound(&self.jump) {
            Some(Action::Jump)
        } else {
            None
        }
    }
}

/// Currently held movement keys
#[derive(Debug, Clone, Default)]
pub struct InputState {
    bindings: KeyBindings,
    held: TickInput,
}

impl InputState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: TickInput::default(),
        }
    }

    /// Returns true when the key is bound
    pub fn key_down(&mut self, key: &str) -> bool {
        self.set(key, true)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.set(key, false)
    }

    /// Release everything (focus lost)
    pub fn clear(&mut self) {
        self.held = TickInput::default();
    }

    fn set(&mut self, key: &str, down: bool) -> bool {
        match self.bindings.action(key) {
            Some(Action::Left) => self.held.left = down,
            Some(Action::Right) => self.held.right = down,
            Some(Action::Jump) => self.held.jump = down,
            None => return false,
        }
        true
    }
}

impl InputSource for InputState {
    fn intent(&self) -> TickInput {
        self.held
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.action("ArrowLeft"), Some(Action::Left));
        assert_eq!(bindings.action("D"), Some(Action::Right));
        assert_eq!(bindings.action(" "), Some(Action::Jump));
        assert_eq!(bindings.action("Escape"), None);
    }

    #[test]
    fn test_key_events_update_intent() {
        let mut input = InputState::default();
        assert!(input.key_down("a"));
        assert!(input.key_down("w"));
        assert_eq!(
            input.intent(),
            TickInput {
                left: true,
                right: false,
                jump: true
            }
        );

        input.key_up("a");
        assert!(!input.intent().left);
        assert!(!input.key_down("q"));

        input.clear();
        assert_eq!(input.intent(), TickInput::default());
    }

    #[test]
    fn test_custom_bindings_from_json() {
        let bindings: KeyBindings = serde_json::from_str(r#"{ "jump": ["k"] }"#).unwrap();
        assert_eq!(bindings.action("k"), Some(Action::Jump));
        assert_eq!(bindings.action(" "), None);
        assert_eq!(bindings.action("ArrowLeft"), Some(Action::Left));
    }
}

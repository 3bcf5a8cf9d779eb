//! Game actions and the per-frame action state scripts read from
//!
//! Raw devices are mapped onto these actions by the binding table in
//! `ember-game`; everything below that layer only ever sees actions.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    /// Move left (A / Left arrow by default)
    Left,
    /// Move right (D / Right arrow by default)
    Right,
    /// Jump (Space by default)
    Jump,
    /// Up (W by default, also jumps)
    Up,
    /// Leave the game (Escape by default)
    Quit,
}

/// Current state of all actions for a frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Actions currently held down
    pub held: HashSet<InputAction>,
    /// Actions that were just pressed this frame
    pub just_pressed: HashSet<InputAction>,
    /// Actions that were just released this frame
    pub just_released: HashSet<InputAction>,
    /// Last known cursor position in window pixels
    pub mouse_position: Vec2,
}

impl InputState {
    /// Create a new empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently held
    pub fn is_held(&self, action: InputAction) -> bool {
        self.held.contains(&action)
    }

    /// Check if any of the given actions is currently held
    pub fn any_held(&self, actions: &[InputAction]) -> bool {
        actions.iter().any(|a| self.is_held(*a))
    }

    /// Check if an action was just pressed this frame
    pub fn is_just_pressed(&self, action: InputAction) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Check if an action was just released this frame
    pub fn is_just_released(&self, action: InputAction) -> bool {
        self.just_released.contains(&action)
    }

    /// Mark an action as pressed
    pub fn press(&mut self, action: InputAction) {
        if self.held.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Mark an action as released
    pub fn release(&mut self, action: InputAction) {
        if self.held.remove(&action) {
            self.just_released.insert(action);
        }
    }

    /// Clear frame-specific data (call at end of frame)
    pub fn clear_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }

    /// Clear all input state
    pub fn clear_all(&mut self) {
        self.held.clear();
        self.clear_frame();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_state() {
        let mut state = InputState::new();
        state.press(InputAction::Left);
        state.press(InputAction::Jump);

        assert!(state.is_held(InputAction::Left));
        assert!(state.is_just_pressed(InputAction::Jump));
        assert!(!state.is_held(InputAction::Right));
        assert!(state.any_held(&[InputAction::Up, InputAction::Jump]));

        state.clear_frame();
        assert!(state.is_held(InputAction::Left));
        assert!(!state.is_just_pressed(InputAction::Jump));
    }

    #[test]
    fn test_repeat_press_is_not_just_pressed() {
        let mut state = InputState::new();
        state.press(InputAction::Jump);
        state.clear_frame();
        state.press(InputAction::Jump);
        assert!(!state.is_just_pressed(InputAction::Jump));

        state.release(InputAction::Jump);
        assert!(state.is_just_released(InputAction::Jump));
        assert!(!state.is_held(InputAction::Jump));
    }
}

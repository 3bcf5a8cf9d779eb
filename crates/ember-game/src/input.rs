//! Input system with action-based mapping
//!
//! Raw key and button events are tracked per binding; an action is held
//! while any of its bindings is down.

use std::collections::{HashMap, HashSet};

use ember_core::{InputAction, InputState, Vec2};
use winit::event::{ElementState, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Binding of a physical key to an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputBinding {
    /// Keyboard key
    Key(KeyCode),
    /// Mouse button
    Mouse(u32), // 0 = left, 1 = right, 2 = middle
}

impl From<KeyCode> for InputBinding {
    fn from(key: KeyCode) -> Self {
        Self::Key(key)
    }
}

impl From<MouseButton> for InputBinding {
    fn from(button: MouseButton) -> Self {
        Self::Mouse(match button {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
            MouseButton::Middle => 2,
            MouseButton::Back => 3,
            MouseButton::Forward => 4,
            MouseButton::Other(id) => id as u32,
        })
    }
}

/// Maps physical inputs to game actions. An action may have any number of
/// bindings; a binding drives at most one action.
#[derive(Debug, Clone)]
pub struct InputBindings {
    /// Key/button to action mappings
    bindings: HashMap<InputBinding, InputAction>,
    /// Reverse lookup: action to all bindings
    reverse: HashMap<InputAction, Vec<InputBinding>>,
}

impl Default for InputBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();

        bindings.bind(KeyCode::KeyA, InputAction::Left);
        bindings.bind(KeyCode::ArrowLeft, InputAction::Left);
        bindings.bind(KeyCode::KeyD, InputAction::Right);
        bindings.bind(KeyCode::ArrowRight, InputAction::Right);
        bindings.bind(KeyCode::Space, InputAction::Jump);
        bindings.bind(KeyCode::KeyW, InputAction::Up);
        bindings.bind(KeyCode::Escape, InputAction::Quit);

        bindings
    }
}

impl InputBindings {
    /// Create new input bindings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// A table with nothing bound
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
            reverse: HashMap::new(),
        }
    }

    /// Bind a key or button to an action, moving it off any previous action
    pub fn bind(&mut self, binding: impl Into<InputBinding>, action: InputAction) {
        let binding = binding.into();
        if let Some(previous) = self.bindings.insert(binding, action) {
            if let Some(list) = self.reverse.get_mut(&previous) {
                list.retain(|b| *b != binding);
            }
        }
        self.reverse.entry(action).or_default().push(binding);
    }

    /// Unbind a key or button
    pub fn unbind(&mut self, binding: impl Into<InputBinding>) {
        let binding = binding.into();
        if let Some(action) = self.bindings.remove(&binding) {
            if let Some(bindings) = self.reverse.get_mut(&action) {
                bindings.retain(|b| *b != binding);
            }
        }
    }

    /// Get the action for a binding, if any
    pub fn action(&self, binding: InputBinding) -> Option<InputAction> {
        self.bindings.get(&binding).copied()
    }

    /// All bindings of an action
    pub fn bindings_for(&self, action: InputAction) -> &[InputBinding] {
        self.reverse.get(&action).map_or(&[], Vec::as_slice)
    }
}

/// Input handler that processes raw events and updates action state
#[derive(Debug, Default)]
pub struct InputHandler {
    /// Current action state
    pub state: InputState,
    /// Input bindings
    pub bindings: InputBindings,
    /// Physical inputs currently down, bound or not
    down: HashSet<InputBinding>,
}

impl InputHandler {
    /// Create a new input handler with default bindings
    pub fn new() -> Self {
        Self::with_bindings(InputBindings::default())
    }

    pub fn with_bindings(bindings: InputBindings) -> Self {
        Self {
            state: InputState::new(),
            bindings,
            down: HashSet::new(),
        }
    }

    /// Handle a keyboard event
    pub fn handle_keyboard(&mut self, physical_key: PhysicalKey, element_state: ElementState) {
        if let PhysicalKey::Code(key_code) = physical_key {
            self.handle_binding(InputBinding::Key(key_code), element_state);
        }
    }

    /// Handle a mouse button event
    pub fn handle_mouse_button(&mut self, button: MouseButton, element_state: ElementState) {
        self.handle_binding(button.into(), element_state);
    }

    /// Handle cursor movement, in window pixels
    pub fn handle_cursor_moved(&mut self, x: f64, y: f64) {
        self.state.mouse_position = Vec2::new(x as f32, y as f32);
    }

    /// Press or release a single binding and refresh its action
    pub fn handle_binding(&mut self, binding: InputBinding, element_state: ElementState) {
        match element_state {
            ElementState::Pressed => {
                self.down.insert(binding);
            }
            ElementState::Released => {
                self.down.remove(&binding);
            }
        }

        let Some(action) = self.bindings.action(binding) else {
            return;
        };
        let any_down = self
            .bindings
            .bindings_for(action)
            .iter()
            .any(|b| self.down.contains(b));
        if any_down {
            self.state.press(action);
        } else {
            self.state.release(action);
        }
    }

    /// Whether a physical key or button is currently down
    pub fn is_down(&self, binding: InputBinding) -> bool {
        self.down.contains(&binding)
    }

    /// Drop everything held, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.down.clear();
        self.state.clear_all();
    }

    /// Clear frame-specific input data
    pub fn end_frame(&mut self) {
        self.state.clear_frame();
    }
}

/// A source of per-frame input for the frame scheduler.
pub trait InputSource {
    /// Gather pending events. Edge-triggered state from the previous frame
    /// is cleared first.
    fn poll(&mut self);

    /// Action state as of the last poll
    fn state(&self) -> &InputState;

    /// Whether a physical key or button is down
    fn is_down(&self, binding: InputBinding) -> bool;

    /// Whether the user asked to leave (window closed or Quit pressed)
    fn quit_requested(&self) -> bool;
}

/// Replays a fixed sequence of per-frame inputs; used for headless runs.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    handler: InputHandler,
    frames: std::collections::VecDeque<Vec<(InputBinding, ElementState)>>,
    quit_after: Option<u64>,
    polled: u64,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self {
            handler: InputHandler::new(),
            ..Default::default()
        }
    }

    /// Queue the events delivered by the next unscripted poll
    pub fn push_frame(&mut self, events: Vec<(InputBinding, ElementState)>) -> &mut Self {
        self.frames.push_back(events);
        self
    }

    /// Request quit on the `frame`-th poll (1-based)
    pub fn quit_after(mut self, frame: u64) -> Self {
        self.quit_after = Some(frame);
        self
    }

    pub fn polled(&self) -> u64 {
        self.polled
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) {
        self.handler.end_frame();
        self.polled += 1;
        for (binding, state) in self.frames.pop_front().unwrap_or_default() {
            self.handler.handle_binding(binding, state);
        }
    }

    fn state(&self) -> &InputState {
        &self.handler.state
    }

    fn is_down(&self, binding: InputBinding) -> bool {
        self.handler.is_down(binding)
    }

    fn quit_requested(&self) -> bool {
        self.state().is_held(InputAction::Quit)
            || self.quit_after.is_some_and(|n| self.polled >= n)
    }
}

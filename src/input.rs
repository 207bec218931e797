//! Per-frame input snapshot
//!
//! The game loop that owns the window translates raw events into `Key`s and feeds
//! them to an `InputState`. Scenes only ever read the snapshot, so they behave the
//! same whether the keys came from a keyboard, a touch overlay or a test.

use std::collections::HashSet;

/// Logical keys the game understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Jump,
    Interact,
    Attack,
    UseItem,
    Confirm,
    Back,
    NextTool,
    PrevTool,
    Undo,
    Save,
    TestPlay,
    /// Number row 1-9 (stored as 0-8)
    Hotbar(u8),
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
    pressed: HashSet<Key>,
    mouse: Option<(f32, f32)>,
    mouse_clicked: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key going down. Only the first down event counts as a press.
    pub fn press(&mut self, key: Key) {
        if self.held.insert(key) {
            self.pressed.insert(key);
        }
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Records a mouse position in screen pixels
    pub fn move_mouse(&mut self, x: f32, y: f32) {
        self.mouse = Some((x, y));
    }

    pub fn click(&mut self, x: f32, y: f32) {
        self.move_mouse(x, y);
        self.mouse_clicked = true;
    }

    /// Clears per-frame state. Call once after every update.
    pub fn end_frame(&mut self) {
        self.pressed.clear();
        self.mouse_clicked = false;
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// True only on the frame the key went down
    pub fn was_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn mouse(&self) -> Option<(f32, f32)> {
        self.mouse
    }

    pub fn was_clicked(&self) -> bool {
        self.mouse_clicked
    }

    /// -1, 0 or 1 from the Left/Right keys
    pub fn axis_x(&self) -> f32 {
        match (self.is_held(Key::Left), self.is_held(Key::Right)) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    /// -1, 0 or 1 from the Up/Down keys (down is positive, like screen space)
    pub fn axis_y(&self) -> f32 {
        match (self.is_held(Key::Up), self.is_held(Key::Down)) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    /// The hotbar key pressed this frame, if any
    pub fn hotbar_pressed(&self) -> Option<usize> {
        self.pressed.iter().find_map(|key| match key {
            Key::Hotbar(n) => Some(*n as usize),
            _ => None,
        })
    }

    /// Direction pressed this frame, for menu-style navigation
    pub fn direction_pressed(&self) -> Option<Key> {
        [Key::Up, Key::Down, Key::Left, Key::Right]
            .into_iter()
            .find(|key| self.was_pressed(*key))
    }
}

use super::TILE_SIZE;
use crate::animation::FrameAnimator;
use crate::collision::{Collidable, Rect};
use serde::{Deserialize, Serialize};

const BUTTON_FRAMES: usize = 4;
const BUTTON_FPS: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonState {
    Released,
    Pressing,
    Pressed,
    Releasing,
}

/// How a button behaves once it is fully pressed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ButtonMode {
    /// Stays pressed forever
    OneShot,
    /// Pressing again releases it
    Toggle,
    /// Pops back up after `seconds`
    Timed { seconds: f32 },
}

impl Default for ButtonMode {
    fn default() -> Self {
        ButtonMode::OneShot
    }
}

/// Emitted when a button finishes a press or a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Activated(u32),
    Deactivated(u32),
}

impl ButtonEvent {
    pub fn link_id(&self) -> u32 {
        match self {
            ButtonEvent::Activated(id) | ButtonEvent::Deactivated(id) => *id,
        }
    }
}

/// A wall button that drives linked doors.
#[derive(Debug, Clone)]
pub struct ButtonEntity {
    pub id: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub state: ButtonState,
    pub link_id: Option<u32>,
    pub mode: ButtonMode,
    held_for: f32,
    animator: FrameAnimator,
}

impl ButtonEntity {
    pub fn new(id: usize, x: f32, y: f32, link_id: Option<u32>, mode: ButtonMode) -> Self {
        ButtonEntity {
            id,
            x,
            y,
            width: TILE_SIZE,
            height: TILE_SIZE,
            state: ButtonState::Released,
            link_id,
            mode,
            held_for: 0.0,
            animator: FrameAnimator::new(BUTTON_FRAMES, BUTTON_FPS),
        }
    }

    pub fn frame(&self) -> usize {
        self.animator.frame()
    }

    /// Presses the button
    ///
    /// Starts `Pressing` from `Released`; a `Toggle` button that is fully pressed
    /// starts `Releasing` instead. Returns false when the press had no effect.
    pub fn press(&mut self) -> bool {
        match (self.state, self.mode) {
            (ButtonState::Released, _) => {
                self.state = ButtonState::Pressing;
                true
            }
            (ButtonState::Pressed, ButtonMode::Toggle) => {
                self.state = ButtonState::Releasing;
                true
            }
            _ => false,
        }
    }

    /// Advances the animation and timers
    ///
    /// Returns an event when a linked button finishes pressing or releasing.
    pub fn update(&mut self, dt: f32) -> Option<ButtonEvent> {
        match self.state {
            ButtonState::Pressing => {
                self.animator.advance(dt);
                if self.animator.at_end() {
                    self.state = ButtonState::Pressed;
                    self.held_for = 0.0;
                    return self.link_id.map(ButtonEvent::Activated);
                }
            }
            ButtonState::Pressed => {
                if let ButtonMode::Timed { seconds } = self.mode {
                    self.held_for += dt;
                    if self.held_for >= seconds {
                        self.state = ButtonState::Releasing;
                    }
                }
            }
            ButtonState::Releasing => {
                self.animator.rewind(dt);
                if self.animator.at_start() {
                    self.state = ButtonState::Released;
                    return self.link_id.map(ButtonEvent::Deactivated);
                }
            }
            ButtonState::Released => {}
        }
        None
    }

    pub fn is_pressed(&self) -> bool {
        self.state == ButtonState::Pressed
    }
}

impl Collidable for ButtonEntity {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Steps the button for `seconds` and collects every event it emits
    fn run(button: &mut ButtonEntity, seconds: f32) -> Vec<ButtonEvent> {
        let steps = (seconds * 60.0).round() as usize;
        (0..steps).filter_map(|_| button.update(1.0 / 60.0)).collect()
    }

    #[test]
    fn test_one_shot_press_emits_once() {
        let mut button = ButtonEntity::new(0, 0.0, 0.0, Some(7), ButtonMode::OneShot);
        assert!(button.press());
        assert_eq!(button.state, ButtonState::Pressing);

        let events = run(&mut button, 1.0);
        assert_eq!(events, vec![ButtonEvent::Activated(7)]);
        assert!(button.is_pressed());
        assert_eq!(button.frame(), BUTTON_FRAMES - 1);

        assert!(!button.press());
        assert!(run(&mut button, 5.0).is_empty());
    }

    #[test]
    fn test_toggle_button_releases_on_second_press() {
        let mut button = ButtonEntity::new(0, 0.0, 0.0, Some(2), ButtonMode::Toggle);
        button.press();
        run(&mut button, 1.0);

        assert!(button.press());
        let events = run(&mut button, 1.0);
        assert_eq!(events, vec![ButtonEvent::Deactivated(2)]);
        assert_eq!(button.state, ButtonState::Released);
    }

    #[test]
    fn test_timed_button_pops_back_up() {
        let mut button = ButtonEntity::new(0, 0.0, 0.0, Some(5), ButtonMode::Timed { seconds: 1.0 });
        button.press();

        let events = run(&mut button, 3.0);
        assert_eq!(
            events,
            vec![ButtonEvent::Activated(5), ButtonEvent::Deactivated(5)]
        );
        assert_eq!(button.state, ButtonState::Released);
    }

    #[test]
    fn test_unlinked_button_still_animates() {
        let mut button = ButtonEntity::new(0, 0.0, 0.0, None, ButtonMode::OneShot);
        button.press();
        assert!(run(&mut button, 1.0).is_empty());
        assert!(button.is_pressed());
    }

    #[test]
    fn test_mode_json_shape() {
        let mode: ButtonMode = serde_json::from_str(r#"{"type":"timed","seconds":2.5}"#).unwrap();
        assert_eq!(mode, ButtonMode::Timed { seconds: 2.5 });
    }
}

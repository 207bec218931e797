use super::TILE_SIZE;
use crate::animation::FrameAnimator;
use crate::collision::{Collidable, Rect};
use crate::inventory::Inventory;
use serde::{Deserialize, Serialize};

const DOOR_FRAMES: usize = 6;
const DOOR_FPS: f32 = 12.0;

/// Door lifecycle
///
/// - **Closed**: solid, frame 0
/// - **Opening**: still solid, frames advance toward the last one
/// - **Open**: passable, last frame
/// - **Closing**: passable until fully shut, frames rewind toward 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorState {
    Closed,
    Opening,
    Open,
    Closing,
}

/// Outcome of trying to open a door by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockResult {
    /// The door started moving
    Toggled,
    /// A key was used up and the door started opening
    UsedKey(String),
    /// The door needs a key the player doesn't have
    MissingKey(String),
    /// The door is driven by a button and ignores direct interaction
    Linked,
}

/// A door, one tile wide and two tiles tall.
///
/// Doors with a `link_id` are opened and closed by buttons. Doors with a
/// `required_key` open when the player brings the key. Doors with neither simply
/// toggle when interacted with.
#[derive(Debug, Clone)]
pub struct DoorEntity {
    pub id: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub state: DoorState,
    pub link_id: Option<u32>,
    pub required_key: Option<String>,
    animator: FrameAnimator,
}

impl DoorEntity {
    pub fn new(id: usize, x: f32, y: f32, link_id: Option<u32>) -> Self {
        DoorEntity {
            id,
            x,
            y,
            width: TILE_SIZE,
            height: TILE_SIZE * 2.0,
            state: DoorState::Closed,
            link_id,
            required_key: None,
            animator: FrameAnimator::new(DOOR_FRAMES, DOOR_FPS),
        }
    }

    pub fn with_key(mut self, key_item_id: impl Into<String>) -> Self {
        self.required_key = Some(key_item_id.into());
        self
    }

    /// Current animation frame (0 = shut)
    pub fn frame(&self) -> usize {
        self.animator.frame()
    }

    /// Requests the door to open
    ///
    /// A closing door reverses from its current frame. Returns false when the door
    /// is already open or opening.
    pub fn open(&mut self) -> bool {
        match self.state {
            DoorState::Closed | DoorState::Closing => {
                self.state = DoorState::Opening;
                true
            }
            DoorState::Opening | DoorState::Open => false,
        }
    }

    /// Requests the door to close
    ///
    /// An opening door reverses from its current frame. Returns false when the door
    /// is already closed or closing.
    pub fn close(&mut self) -> bool {
        match self.state {
            DoorState::Open | DoorState::Opening => {
                self.state = DoorState::Closing;
                true
            }
            DoorState::Closed | DoorState::Closing => false,
        }
    }

    pub fn toggle(&mut self) -> bool {
        match self.state {
            DoorState::Closed | DoorState::Closing => self.open(),
            DoorState::Open | DoorState::Opening => self.close(),
        }
    }

    /// Handles the player interacting with the door directly
    ///
    /// Keyed doors consume one key from `inventory` the first time they open and then
    /// behave like plain doors.
    pub fn interact(&mut self, inventory: &mut Inventory) -> UnlockResult {
        if self.link_id.is_some() {
            return UnlockResult::Linked;
        }

        if let Some(key) = self.required_key.clone() {
            if inventory.remove_exact(&key, 1).is_err() {
                return UnlockResult::MissingKey(key);
            }
            self.required_key = None;
            self.open();
            return UnlockResult::UsedKey(key);
        }

        self.toggle();
        UnlockResult::Toggled
    }

    /// Advances the animation
    ///
    /// A closing door whose doorway is `obstructed` holds its current frame until
    /// the way is clear. Returns true when the door finished a transition this frame.
    pub fn update(&mut self, dt: f32, obstructed: bool) -> bool {
        match self.state {
            DoorState::Opening => {
                self.animator.advance(dt);
                if self.animator.at_end() {
                    self.state = DoorState::Open;
                    return true;
                }
            }
            DoorState::Closing => {
                if obstructed {
                    return false;
                }
                self.animator.rewind(dt);
                if self.animator.at_start() {
                    self.state = DoorState::Closed;
                    return true;
                }
            }
            DoorState::Closed | DoorState::Open => {}
        }
        false
    }

    /// Whether the door blocks movement
    pub fn is_solid(&self) -> bool {
        matches!(self.state, DoorState::Closed | DoorState::Opening)
    }
}

impl Collidable for DoorEntity {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

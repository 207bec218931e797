use super::TILE_SIZE;
use crate::animation::FrameAnimator;
use crate::collision::{Collidable, Rect};
use crate::inventory::Inventory;
use serde::{Deserialize, Serialize};

const VAULT_FRAMES: usize = 5;
const VAULT_FPS: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VaultState {
    Closed,
    Opening,
    Open,
    Closing,
}

/// Where a vault keeps its items.
#[derive(Debug, Clone, PartialEq)]
pub enum VaultContents {
    /// Shares the save file's vault, so items survive across levels and sessions
    Persistent,
    /// Items belong to this level and are reset every time it loads
    Local(Inventory),
}

/// A storage chest placed in a level.
#[derive(Debug, Clone)]
pub struct VaultEntity {
    pub id: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub state: VaultState,
    pub contents: VaultContents,
    animator: FrameAnimator,
}

impl VaultEntity {
    pub fn new(id: usize, x: f32, y: f32, contents: VaultContents) -> Self {
        VaultEntity {
            id,
            x,
            y,
            width: TILE_SIZE,
            height: TILE_SIZE,
            state: VaultState::Closed,
            contents,
            animator: FrameAnimator::new(VAULT_FRAMES, VAULT_FPS),
        }
    }

    pub fn frame(&self) -> usize {
        self.animator.frame()
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self.contents, VaultContents::Persistent)
    }

    /// Opens a closed vault or closes an open one
    pub fn interact(&mut self) {
        self.state = match self.state {
            VaultState::Closed | VaultState::Closing => VaultState::Opening,
            VaultState::Open | VaultState::Opening => VaultState::Closing,
        };
    }

    /// Starts closing unless already closed or closing
    pub fn close(&mut self) {
        if matches!(self.state, VaultState::Open | VaultState::Opening) {
            self.state = VaultState::Closing;
        }
    }

    /// Items can only be moved in or out while the lid is fully open
    pub fn is_accessible(&self) -> bool {
        self.state == VaultState::Open
    }

    /// Returns the level-local inventory, if this vault has one
    pub fn local_inventory_mut(&mut self) -> Option<&mut Inventory> {
        match &mut self.contents {
            VaultContents::Local(inventory) => Some(inventory),
            VaultContents::Persistent => None,
        }
    }

    pub fn update(&mut self, dt: f32) {
        match self.state {
            VaultState::Opening => {
                self.animator.advance(dt);
                if self.animator.at_end() {
                    self.state = VaultState::Open;
                    log::debug!("Vault {} open", self.id);
                }
            }
            VaultState::Closing => {
                self.animator.rewind(dt);
                if self.animator.at_start() {
                    self.state = VaultState::Closed;
                }
            }
            VaultState::Closed | VaultState::Open => {}
        }
    }
}

impl Collidable for VaultEntity {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(vault: &mut VaultEntity, seconds: f32) {
        for _ in 0..(seconds * 60.0) as usize {
            vault.update(1.0 / 60.0);
        }
    }

    #[test]
    fn test_only_accessible_when_fully_open() {
        let mut vault = VaultEntity::new(0, 0.0, 0.0, VaultContents::Local(Inventory::new(4)));
        vault.interact();
        assert_eq!(vault.state, VaultState::Opening);
        assert!(!vault.is_accessible());

        run(&mut vault, 1.0);
        assert!(vault.is_accessible());

        vault.interact();
        assert!(!vault.is_accessible());
        run(&mut vault, 1.0);
        assert_eq!(vault.state, VaultState::Closed);
        assert_eq!(vault.frame(), 0);
    }

    #[test]
    fn test_close_is_noop_when_closed() {
        let mut vault = VaultEntity::new(0, 0.0, 0.0, VaultContents::Persistent);
        vault.close();
        assert_eq!(vault.state, VaultState::Closed);
        assert!(vault.is_persistent());
        assert!(vault.local_inventory_mut().is_none());
    }
}

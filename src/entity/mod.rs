//! Interactive world entities
//!
//! Every entity here is a small enum state machine whose visible frame is driven by a
//! `FrameAnimator`:
//!
//! - `ButtonEntity`: Released → Pressing → Pressed → Releasing
//! - `DoorEntity`: Closed → Opening → Open → Closing
//! - `VaultEntity`: Closed → Opening → Open → Closing, with item storage
//! - `ItemEntity`: an item lying in the level, waiting to be picked up
//!
//! Buttons and doors are wired together by link ids: a button emits `ButtonEvent`s
//! and `apply_button_events` forwards them to every door sharing the id.

pub mod button;
pub mod door;
pub mod item_entity;
pub mod vault;

pub use button::{ButtonEntity, ButtonEvent, ButtonMode, ButtonState};
pub use door::{DoorEntity, DoorState};
pub use item_entity::ItemEntity;
pub use vault::{VaultContents, VaultEntity, VaultState};

/// Side length of one level tile in pixels; entities are placed on this grid
pub const TILE_SIZE: f32 = 32.0;

/// Forwards button events to linked doors
///
/// `Activated(id)` opens every door with that link id, `Deactivated(id)` closes them.
/// Returns how many doors changed their target state.
pub fn apply_button_events(events: &[ButtonEvent], doors: &mut [DoorEntity]) -> usize {
    let mut changed = 0;

    for event in events {
        for door in doors.iter_mut().filter(|d| d.link_id == Some(event.link_id())) {
            let moved = match event {
                ButtonEvent::Activated(_) => door.open(),
                ButtonEvent::Deactivated(_) => door.close(),
            };
            if moved {
                log::info!("Door {:?} {:?} by link {}", door.id, door.state, event.link_id());
                changed += 1;
            }
        }
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_only_reach_matching_links() {
        let mut doors = vec![
            DoorEntity::new(0, 0.0, 0.0, Some(1)),
            DoorEntity::new(1, 64.0, 0.0, Some(2)),
            DoorEntity::new(2, 128.0, 0.0, None),
        ];

        let changed = apply_button_events(&[ButtonEvent::Activated(1)], &mut doors);
        assert_eq!(changed, 1);
        assert_eq!(doors[0].state, DoorState::Opening);
        assert_eq!(doors[1].state, DoorState::Closed);
        assert_eq!(doors[2].state, DoorState::Closed);
    }

    #[test]
    fn test_deactivation_closes_open_door() {
        let mut doors = vec![DoorEntity::new(0, 0.0, 0.0, Some(4))];
        apply_button_events(&[ButtonEvent::Activated(4)], &mut doors);
        for _ in 0..60 {
            doors[0].update(1.0 / 60.0, false);
        }
        assert_eq!(doors[0].state, DoorState::Open);

        apply_button_events(&[ButtonEvent::Deactivated(4)], &mut doors);
        assert_eq!(doors[0].state, DoorState::Closing);
    }
}

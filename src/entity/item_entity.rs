use crate::animation::FrameAnimator;
use crate::collision::{Collidable, Rect};
use crate::item::Item;

/// Mob drops vanish after five minutes
pub const DROP_DESPAWN_SECONDS: f32 = 300.0;

const PICKUP_SIZE: f32 = 16.0;
const BOB_FRAMES: usize = 8;
const BOB_FPS: f32 = 6.0;

/// An item lying in the level.
///
/// Level-placed items stay forever; dropped items get a despawn timer and a short
/// pickup cooldown so they don't vanish into the player the frame they spawn.
#[derive(Debug, Clone)]
pub struct ItemEntity {
    pub x: f32,
    pub y: f32,
    pub item: Item,
    age: f32,
    despawn_after: Option<f32>,
    pickup_cooldown: f32,
    bob: FrameAnimator,
}

impl ItemEntity {
    /// An item placed by the level designer
    pub fn placed(x: f32, y: f32, item: Item) -> Self {
        ItemEntity {
            x,
            y,
            item,
            age: 0.0,
            despawn_after: None,
            pickup_cooldown: 0.0,
            bob: FrameAnimator::looping(BOB_FRAMES, BOB_FPS),
        }
    }

    /// An item dropped by a mob or the player
    pub fn dropped(x: f32, y: f32, item: Item) -> Self {
        ItemEntity {
            despawn_after: Some(DROP_DESPAWN_SECONDS),
            pickup_cooldown: 0.5,
            ..Self::placed(x, y, item)
        }
    }

    /// Advances timers
    ///
    /// Returns true when the item has despawned and should be removed.
    pub fn update(&mut self, dt: f32) -> bool {
        self.age += dt;
        self.pickup_cooldown = (self.pickup_cooldown - dt).max(0.0);
        self.bob.advance(dt);

        self.despawn_after.is_some_and(|limit| self.age >= limit)
    }

    /// Blocks pickup for `seconds`, e.g. after the player couldn't carry it
    pub fn hold_off(&mut self, seconds: f32) {
        self.pickup_cooldown = self.pickup_cooldown.max(seconds);
    }

    pub fn can_pickup(&self) -> bool {
        self.pickup_cooldown <= 0.0
    }

    /// Vertical bob offset in pixels (-3..=3), for the renderer
    pub fn bob_offset(&self) -> f32 {
        let phase = self.bob.frame() as f32 / BOB_FRAMES as f32;
        (phase * std::f32::consts::TAU).sin() * 3.0
    }

    pub fn time_until_despawn(&self) -> Option<f32> {
        self.despawn_after.map(|limit| (limit - self.age).max(0.0))
    }
}

impl Collidable for ItemEntity {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, PICKUP_SIZE, PICKUP_SIZE)
    }
}

use super::data::LevelData;
use super::grid::BlockGrid;
use crate::collision::{Collidable, Rect};
use crate::combat::{DamageEvent, DamageSource, Facing};
use crate::config::PhysicsConfig;
use crate::entity::{
    ButtonEntity, ButtonEvent, DoorEntity, ItemEntity, TILE_SIZE, VaultContents, VaultEntity,
    apply_button_events,
};
use crate::input::InputState;
use crate::inventory::Inventory;
use crate::item::{ItemRegistry, RangedWeapon};
use crate::mob::{Mob, MobRegistry};
use crate::player::Player;
use crate::stats::StatusEffectAttachment;

/// How far from the player's center an entity can be interacted with
pub const INTERACT_RANGE: f32 = 48.0;

/// Falling this far below the level counts as death
const FALL_MARGIN: f32 = 64.0;
const PROJECTILE_SIZE: f32 = 8.0;
const WALL_THICKNESS: f32 = 32.0;

/// A shot from a ranged weapon.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub velocity_x: f32,
    pub damage: f32,
    pub effect: Option<StatusEffectAttachment>,
    traveled: f32,
    range: f32,
}

impl Projectile {
    pub fn new(
        x: f32,
        y: f32,
        facing: Facing,
        weapon: &RangedWeapon,
        damage: f32,
        effect: Option<StatusEffectAttachment>,
    ) -> Self {
        Projectile {
            x,
            y,
            velocity_x: facing.sign() * weapon.projectile_speed,
            damage,
            effect,
            traveled: 0.0,
            range: weapon.range,
        }
    }

    pub fn is_spent(&self) -> bool {
        self.traveled >= self.range
    }
}

impl Collidable for Projectile {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, PROJECTILE_SIZE, PROJECTILE_SIZE)
    }
}

/// Terrain probe shared by the world and its entity updates
fn solid_at(grid: &BlockGrid, doors: &[DoorEntity], x: f32, y: f32) -> bool {
    grid.is_solid_at_pixel(x, y)
        || doors
            .iter()
            .any(|door| door.is_solid() && door.bounds().contains_point(x, y))
}

/// Something the player can interact with, by index into the world's lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interactable {
    Button(usize),
    Door(usize),
    Vault(usize),
}

/// The live state of one level being played.
#[derive(Debug, Clone)]
pub struct LevelWorld {
    pub data: LevelData,
    pub grid: BlockGrid,
    pub player: Player,
    pub doors: Vec<DoorEntity>,
    pub buttons: Vec<ButtonEntity>,
    pub vaults: Vec<VaultEntity>,
    pub items: Vec<ItemEntity>,
    pub mobs: Vec<Mob>,
    pub projectiles: Vec<Projectile>,
    pub elapsed: f32,
}

impl LevelWorld {
    /// Builds the runtime world for a level
    ///
    /// Placements referencing unknown item or mob ids are skipped with a warning.
    /// `vault_slots` is used for local vaults that don't set `maxSlots`.
    pub fn load(data: &LevelData, items: &ItemRegistry, mobs: &MobRegistry, vault_slots: usize) -> Self {
        let grid = data.build_grid();
        let tile = |x: i32, y: i32| (x as f32 * TILE_SIZE, y as f32 * TILE_SIZE);

        let doors = data
            .doors
            .iter()
            .enumerate()
            .map(|(id, placement)| {
                let (x, y) = tile(placement.x, placement.y);
                let door = DoorEntity::new(id, x, y, placement.link_id);
                match &placement.required_key {
                    Some(key) => door.with_key(key.clone()),
                    None => door,
                }
            })
            .collect();

        let buttons = data
            .buttons
            .iter()
            .enumerate()
            .map(|(id, placement)| {
                let (x, y) = tile(placement.x, placement.y);
                ButtonEntity::new(id, x, y, placement.link_id, placement.mode)
            })
            .collect();

        let vaults = data
            .vaults
            .iter()
            .enumerate()
            .map(|(id, placement)| {
                let (x, y) = tile(placement.x, placement.y);
                let contents = if placement.persistent {
                    VaultContents::Persistent
                } else {
                    let slots = if placement.max_slots == 0 {
                        vault_slots
                    } else {
                        placement.max_slots
                    };
                    VaultContents::Local(Inventory::from_saved(&placement.items, slots, items))
                };
                VaultEntity::new(id, x, y, contents)
            })
            .collect();

        let placed_items = data
            .items
            .iter()
            .filter_map(|placement| {
                let (x, y) = tile(placement.x, placement.y);
                match items.create_stack(&placement.item_id, placement.stack_count) {
                    Some(item) => Some(ItemEntity::placed(x + 8.0, y + 16.0, item)),
                    None => {
                        log::warn!("Level '{}': unknown item '{}'", data.id, placement.item_id);
                        None
                    }
                }
            })
            .collect();

        let live_mobs = data
            .mobs
            .iter()
            .filter_map(|placement| {
                let (x, y) = tile(placement.x, placement.y);
                let mob = mobs.create(&placement.mob_id, x, y);
                if mob.is_none() {
                    log::warn!("Level '{}': unknown mob '{}'", data.id, placement.mob_id);
                }
                mob
            })
            .collect();

        log::info!("Loaded level '{}' ({}x{})", data.id, data.width, data.height);

        LevelWorld {
            data: data.clone(),
            grid,
            player: Player::new(data.spawn.x, data.spawn.y),
            doors,
            buttons,
            vaults,
            items: placed_items,
            mobs: live_mobs,
            projectiles: Vec::new(),
            elapsed: 0.0,
        }
    }

    pub fn id(&self) -> &str {
        &self.data.id
    }

    /// Everything that blocks movement around `area`: solid blocks, closed doors,
    /// and the left and right edges of the level
    pub fn solids_near(&self, area: &Rect) -> Vec<Rect> {
        let mut solids = self.grid.solid_rects_near(area);
        let reach = area.inflated(TILE_SIZE);

        solids.extend(
            self.doors
                .iter()
                .filter(|door| door.is_solid())
                .map(|door| door.bounds())
                .filter(|bounds| bounds.intersects(&reach)),
        );

        let height = self.grid.pixel_height() + FALL_MARGIN * 2.0;
        solids.push(Rect::new(-WALL_THICKNESS, -FALL_MARGIN, WALL_THICKNESS, height));
        solids.push(Rect::new(self.grid.pixel_width(), -FALL_MARGIN, WALL_THICKNESS, height));
        solids
    }

    /// Terrain probe: blocks and closed doors
    pub fn is_solid_at(&self, x: f32, y: f32) -> bool {
        solid_at(&self.grid, &self.doors, x, y)
    }

    /// Moves the player for one frame
    pub fn step_player(&mut self, input: &InputState, physics: &PhysicsConfig, dt: f32) {
        let speed = self.player.effects.speed_multiplier();
        self.player.apply_input(input, physics, speed);

        let sweep = self.player.bounds().inflated(physics.max_fall_speed * dt + TILE_SIZE);
        let solids = self.solids_near(&sweep);
        self.player.step(dt, physics, &solids);
    }

    /// Advances every entity except the player
    ///
    /// Returns the button events that fired; linked doors have already reacted.
    pub fn update(&mut self, dt: f32, physics: &PhysicsConfig) -> Vec<ButtonEvent> {
        self.elapsed += dt;

        let events: Vec<ButtonEvent> = self
            .buttons
            .iter_mut()
            .filter_map(|button| button.update(dt))
            .collect();
        apply_button_events(&events, &mut self.doors);

        let player_bounds = self.player.bounds();
        for door in &mut self.doors {
            let bounds = door.bounds();
            let obstructed = bounds.intersects(&player_bounds)
                || self.mobs.iter().any(|mob| !mob.is_dead() && mob.bounds().intersects(&bounds));
            door.update(dt, obstructed);
        }

        for vault in &mut self.vaults {
            vault.update(dt);
        }

        self.items.retain_mut(|item| !item.update(dt));

        for index in 0..self.mobs.len() {
            let area = self.mobs[index].bounds().inflated(TILE_SIZE);
            let solids = self.solids_near(&area);
            let (grid, doors) = (&self.grid, &self.doors);
            let probe = |x: f32, y: f32| solid_at(grid, doors, x, y);
            self.mobs[index].update(dt, physics, &solids, probe);
        }

        self.update_projectiles(dt);
        events
    }

    fn update_projectiles(&mut self, dt: f32) {
        let mut projectiles = std::mem::take(&mut self.projectiles);
        let (grid, doors, mobs) = (&self.grid, &self.doors, &mut self.mobs);

        projectiles.retain_mut(|shot| {
            let step = shot.velocity_x * dt;
            shot.x += step;
            shot.traveled += step.abs();

            let bounds = shot.bounds();
            let (cx, cy) = bounds.center();
            if shot.is_spent() || solid_at(grid, doors, cx, cy) {
                return false;
            }

            let hit = mobs
                .iter_mut()
                .find(|mob| !mob.is_dead() && mob.bounds().intersects(&bounds));
            match hit {
                Some(mob) => {
                    let event = DamageEvent::physical(shot.damage, DamageSource::Player);
                    mob.take_hit(&event, shot.effect.as_ref());
                    false
                }
                None => true,
            }
        });

        self.projectiles = projectiles;
    }

    /// Hits every live mob overlapping `hitbox`
    ///
    /// Returns how many mobs took damage.
    pub fn melee_attack(
        &mut self,
        hitbox: &Rect,
        event: &DamageEvent,
        effect: Option<&StatusEffectAttachment>,
    ) -> usize {
        self.mobs
            .iter_mut()
            .filter(|mob| !mob.is_dead() && mob.bounds().intersects(hitbox))
            .map(|mob| mob.take_hit(event, effect))
            .filter(|result| result.damage_dealt > 0.0)
            .count()
    }

    pub fn spawn_projectile(&mut self, projectile: Projectile) {
        self.projectiles.push(projectile);
    }

    /// Removes and returns the mobs that died since the last call
    pub fn remove_dead_mobs(&mut self) -> Vec<Mob> {
        let (dead, alive) = std::mem::take(&mut self.mobs)
            .into_iter()
            .partition(|mob| mob.is_dead());
        self.mobs = alive;
        dead
    }

    /// Removes and returns the items the player is touching and allowed to pick up
    pub fn take_touching_items(&mut self) -> Vec<ItemEntity> {
        let player = self.player.bounds();
        let (touching, rest) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| item.can_pickup() && item.bounds().intersects(&player));
        self.items = rest;
        touching
    }

    /// Live mobs touching the player
    pub fn mobs_touching_player(&self) -> impl Iterator<Item = &Mob> {
        let player = self.player.bounds();
        self.mobs
            .iter()
            .filter(move |mob| !mob.is_dead() && mob.bounds().intersects(&player))
    }

    pub fn player_on_hazard(&self) -> bool {
        self.grid.hazard_overlap(&self.player.bounds())
    }

    pub fn player_fell_out(&self) -> bool {
        self.player.y > self.grid.pixel_height() + FALL_MARGIN
    }

    pub fn player_at_exit(&self) -> bool {
        self.data
            .exit
            .is_some_and(|exit| exit.intersects(&self.player.bounds()))
    }

    /// The closest interactable entity within reach of the player
    pub fn nearest_interactable(&self) -> Option<Interactable> {
        let player = self.player.bounds();
        let range_sq = INTERACT_RANGE * INTERACT_RANGE;

        let buttons = self
            .buttons
            .iter()
            .enumerate()
            .map(|(i, b)| (Interactable::Button(i), b.bounds()));
        let doors = self
            .doors
            .iter()
            .enumerate()
            .map(|(i, d)| (Interactable::Door(i), d.bounds()));
        let vaults = self
            .vaults
            .iter()
            .enumerate()
            .map(|(i, v)| (Interactable::Vault(i), v.bounds()));

        buttons
            .chain(doors)
            .chain(vaults)
            .map(|(target, bounds)| (target, bounds.center_distance_sq(&player)))
            .filter(|(_, distance)| *distance <= range_sq)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(target, _)| target)
    }

    /// Puts the player back at the level spawn
    pub fn respawn_player(&mut self) {
        self.player.respawn(self.data.spawn.x, self.data.spawn.y);
        for vault in &mut self.vaults {
            vault.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{ButtonMode, DoorState};
    use crate::input::Key;
    use crate::level::data::{ButtonPlacement, DoorPlacement, ItemPlacement, MobPlacement};

    const DT: f32 = 1.0 / 60.0;

    fn registries() -> (ItemRegistry, MobRegistry) {
        (ItemRegistry::create_default(), MobRegistry::create_default())
    }

    fn flat_level() -> LevelData {
        let mut level = LevelData::new("flat", "Flat", 20, 8);
        level.spawn.x = 40.0;
        level
    }

    fn settle(world: &mut LevelWorld, seconds: f32) {
        let physics = PhysicsConfig::default();
        let input = InputState::new();
        for _ in 0..(seconds / DT) as usize {
            world.step_player(&input, &physics, DT);
            world.update(DT, &physics);
        }
    }

    #[test]
    fn test_unknown_ids_are_skipped() {
        let (items, mobs) = registries();
        let mut level = flat_level();
        level.items.push(ItemPlacement {
            x: 3,
            y: 6,
            item_id: "sapphire".to_string(),
            stack_count: 1,
        });
        level.items.push(ItemPlacement {
            x: 4,
            y: 6,
            item_id: "unobtainium".to_string(),
            stack_count: 1,
        });
        level.mobs.push(MobPlacement {
            x: 10,
            y: 6,
            mob_id: "dragon".to_string(),
        });

        let world = LevelWorld::load(&level, &items, &mobs, 54);
        assert_eq!(world.items.len(), 1);
        assert!(world.mobs.is_empty());
    }

    #[test]
    fn test_player_lands_on_floor() {
        let (items, mobs) = registries();
        let mut world = LevelWorld::load(&flat_level(), &items, &mobs, 54);
        settle(&mut world, 2.0);

        assert!(world.player.on_ground);
        assert_eq!(world.player.bounds().bottom(), 7.0 * TILE_SIZE);
        assert!(!world.player_fell_out());
    }

    #[test]
    fn test_level_edges_are_walls() {
        let (items, mobs) = registries();
        let mut world = LevelWorld::load(&flat_level(), &items, &mobs, 54);
        let physics = PhysicsConfig::default();
        let mut input = InputState::new();
        input.press(Key::Left);

        for _ in 0..240 {
            world.step_player(&input, &physics, DT);
        }
        assert_eq!(world.player.x, 0.0);
    }

    #[test]
    fn test_button_opens_linked_door() {
        let (items, mobs) = registries();
        let mut level = flat_level();
        level.buttons.push(ButtonPlacement {
            x: 2,
            y: 6,
            link_id: Some(4),
            mode: ButtonMode::OneShot,
        });
        level.doors.push(DoorPlacement {
            x: 10,
            y: 5,
            link_id: Some(4),
            required_key: None,
        });

        let mut world = LevelWorld::load(&level, &items, &mobs, 54);
        assert_eq!(world.nearest_interactable(), Some(Interactable::Button(0)));

        world.buttons[0].press();
        settle(&mut world, 1.5);
        assert_eq!(world.doors[0].state, DoorState::Open);
        assert!(!world.is_solid_at(10.0 * TILE_SIZE + 4.0, 5.5 * TILE_SIZE));
    }

    #[test]
    fn test_projectile_hits_mob() {
        let (items, mobs) = registries();
        let mut level = flat_level();
        level.mobs.push(MobPlacement {
            x: 6,
            y: 6,
            mob_id: "slime".to_string(),
        });
        let mut world = LevelWorld::load(&level, &items, &mobs, 54);
        settle(&mut world, 0.5);

        let bow = items.get("wooden_bow").unwrap().ranged().unwrap().clone();
        let mob_y = world.mobs[0].y + 4.0;
        world.spawn_projectile(Projectile::new(40.0, mob_y, Facing::Right, &bow, 100.0, None));
        settle(&mut world, 1.0);

        assert!(world.projectiles.is_empty());
        assert_eq!(world.remove_dead_mobs().len(), 1);
        assert!(world.mobs.is_empty());
    }
}

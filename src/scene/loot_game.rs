use super::{GameContext, Scene, SceneTransition};
use crate::camera::Camera;
use crate::collision::Collidable;
use crate::combat::{DamageEvent, DamageSource};
use crate::entity::{ItemEntity, VaultContents, VaultState};
use crate::entity::door::UnlockResult;
use crate::input::{InputState, Key};
use crate::inventory::{Inventory, InventoryError};
use crate::item::{ItemCategory, Rarity};
use crate::level::{INTERACT_RANGE, Interactable, LevelData, LevelWorld, Projectile};
use crate::player::ATTACK_COOLDOWN;

/// Damage dealt by spikes on contact
pub const SPIKE_DAMAGE: f32 = 3.0;
/// Damage of a bare-handed swing
const FIST_DAMAGE: f32 = 1.0;
/// How long an item the player couldn't carry waits before being offered again
const PICKUP_RETRY: f32 = 2.0;

/// Plays one level.
///
/// The scene owns the `LevelWorld` and drives it with the player's input. Inventory,
/// vault and progress changes go straight into the shared `GameContext`.
pub struct LootGameScene {
    world: LevelWorld,
    camera: Camera,
    open_vault: Option<usize>,
    deaths: u32,
    /// Started from the editor; finishing doesn't count as progress
    test_play: bool,
}

impl LootGameScene {
    pub fn new(level: &LevelData, ctx: &GameContext) -> Self {
        LootGameScene {
            world: LevelWorld::load(level, &ctx.items, &ctx.mobs, ctx.config.vault_slots),
            camera: Camera::new(ctx.config.viewport_width, ctx.config.viewport_height),
            open_vault: None,
            deaths: 0,
            test_play: false,
        }
    }

    /// A play session started from the level editor
    pub fn test_play(level: &LevelData, ctx: &GameContext) -> Self {
        LootGameScene {
            test_play: true,
            ..Self::new(level, ctx)
        }
    }

    pub fn world(&self) -> &LevelWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut LevelWorld {
        &mut self.world
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn deaths(&self) -> u32 {
        self.deaths
    }

    pub fn open_vault(&self) -> Option<usize> {
        self.open_vault
    }

    /// The inventory behind the open vault, if one is fully open
    fn vault_inventory<'a>(
        world: &'a mut LevelWorld,
        shared: &'a mut Inventory,
        open: Option<usize>,
    ) -> Option<&'a mut Inventory> {
        let vault = world.vaults.get_mut(open?)?;
        if !vault.is_accessible() {
            return None;
        }
        match &mut vault.contents {
            VaultContents::Persistent => Some(shared),
            VaultContents::Local(inventory) => Some(inventory),
        }
    }

    /// Moves the stack in an inventory slot into the open vault
    pub fn deposit_slot(&mut self, slot: usize, ctx: &mut GameContext) -> Result<u32, InventoryError> {
        let vault = Self::vault_inventory(&mut self.world, &mut ctx.vault, self.open_vault)
            .ok_or(InventoryError::Closed)?;
        ctx.inventory.inventory.transfer_slot_to(slot, vault)
    }

    /// Moves the stack in a vault slot into the player's inventory
    pub fn withdraw_slot(&mut self, slot: usize, ctx: &mut GameContext) -> Result<u32, InventoryError> {
        let vault = Self::vault_inventory(&mut self.world, &mut ctx.vault, self.open_vault)
            .ok_or(InventoryError::Closed)?;
        vault.transfer_slot_to(slot, &mut ctx.inventory.inventory)
    }

    fn interact(&mut self, ctx: &mut GameContext) {
        match self.world.nearest_interactable() {
            Some(Interactable::Button(index)) => {
                self.world.buttons[index].press();
            }
            Some(Interactable::Door(index)) => {
                let result = self.world.doors[index].interact(&mut ctx.inventory.inventory);
                let item_name = |id: &str| {
                    ctx.items
                        .get(id)
                        .map(|item| item.name().to_string())
                        .unwrap_or_else(|| id.to_string())
                };
                match result {
                    UnlockResult::MissingKey(key) => {
                        let message = format!("Needs a {}", item_name(&key));
                        ctx.toasts.push(message);
                    }
                    UnlockResult::UsedKey(key) => {
                        let message = format!("Used {}", item_name(&key));
                        ctx.toasts.push(message);
                    }
                    UnlockResult::Linked => ctx.toasts.push("It won't budge"),
                    UnlockResult::Toggled => {}
                }
            }
            Some(Interactable::Vault(index)) => {
                if let Some(previous) = self.open_vault.filter(|&previous| previous != index) {
                    if let Some(vault) = self.world.vaults.get_mut(previous) {
                        vault.close();
                    }
                }
                let vault = &mut self.world.vaults[index];
                vault.interact();
                if vault.state == VaultState::Opening {
                    log::info!("Vault {} opened in '{}'", index, self.world.data.id);
                    self.open_vault = Some(index);
                } else {
                    self.open_vault = None;
                }
            }
            None => {}
        }
    }

    fn attack(&mut self, ctx: &mut GameContext) {
        let weapon = ctx.inventory.weapon();
        let ranged = weapon.and_then(|w| w.ranged()).cloned();
        let cooldown = ranged.map(|r| r.cooldown).unwrap_or(ATTACK_COOLDOWN);
        if !self.world.player.try_attack(cooldown) {
            return;
        }

        let damage = weapon.map(|w| w.damage()).unwrap_or(0.0).max(FIST_DAMAGE)
            + self.world.player.effects.damage_bonus();
        let effect = weapon.and_then(|w| w.status_effect()).cloned();

        let player = &self.world.player;
        match ranged {
            Some(ranged) => {
                let (cx, cy) = player.bounds().center();
                let shot = Projectile::new(cx, cy - 4.0, player.facing, &ranged, damage, effect);
                self.world.spawn_projectile(shot);
            }
            None => {
                let hitbox = player.melee_hitbox();
                let event = DamageEvent::physical(damage, DamageSource::Player);
                let hits = self.world.melee_attack(&hitbox, &event, effect.as_ref());
                log::trace!("Swing hit {} mobs", hits);
            }
        }
    }

    /// Uses the selected hotbar item: drinks consumables, equips gear
    fn use_selected(&mut self, ctx: &mut GameContext) {
        let slot = ctx.inventory.selected_hotbar_slot();
        let Some(item) = ctx.inventory.selected_item().cloned() else {
            return;
        };

        match item.category() {
            ItemCategory::Consumable => {
                if item.heal_amount() > 0.0 {
                    self.world.player.health.heal(item.heal_amount());
                }
                if let Some(effect) = item.status_effect() {
                    self.world.player.effects.apply(effect);
                }
                if let Err(e) = ctx.inventory.inventory.take_from_slot(slot, 1) {
                    log::warn!("Could not use {}: {}", item.id(), e);
                }
            }
            ItemCategory::Weapon | ItemCategory::Armor => match ctx.inventory.equip_from_slot(slot) {
                Ok(()) => ctx.toasts.push(format!("Equipped {}", item.name())),
                Err(e) => log::warn!("Could not equip {}: {}", item.id(), e),
            },
            _ => {}
        }
    }

    /// Closes any vault the player has walked away from and forgets the open one once it shuts
    fn check_open_vault(&mut self) {
        let player = self.world.player.bounds();
        let reach = INTERACT_RANGE * 2.0;
        for vault in &mut self.world.vaults {
            if vault.bounds().center_distance_sq(&player) > reach * reach {
                vault.close();
            }
        }

        let still_open = self
            .open_vault
            .and_then(|index| self.world.vaults.get(index))
            .is_some_and(|vault| matches!(vault.state, VaultState::Opening | VaultState::Open));
        if !still_open {
            self.open_vault = None;
        }
    }

    fn apply_hazards(&mut self, ctx: &GameContext) {
        let defense = ctx.inventory.total_defense();
        let hits: Vec<DamageEvent> = self.world.mobs_touching_player().map(|mob| mob.contact_hit()).collect();
        for hit in &hits {
            self.world.player.take_hit(hit, defense);
        }

        if self.world.player_on_hazard() {
            let spikes = DamageEvent::true_damage(SPIKE_DAMAGE, DamageSource::Hazard);
            self.world.player.take_hit(&spikes, defense);
        }
    }

    fn drop_loot(&mut self, ctx: &mut GameContext) {
        for mob in self.world.remove_dead_mobs() {
            let Some(item) = mob.roll_drops(&mut ctx.rng, &ctx.items) else {
                continue;
            };
            let (cx, _) = mob.bounds().center();
            let bottom = mob.bounds().bottom();
            log::debug!("{} dropped {} x{}", mob.name, item.id(), item.stack_count());
            self.world.items.push(ItemEntity::dropped(cx - 8.0, bottom - 16.0, item));
        }
    }

    fn collect_items(&mut self, ctx: &mut GameContext) {
        for mut entity in self.world.take_touching_items() {
            let total = entity.item.stack_count();
            let mut collected = entity.item.clone();

            match ctx.inventory.inventory.add_item(entity.item.clone()) {
                None => {
                    ctx.save.record_item_collected(&collected);
                    if collected.rarity() >= Rarity::Legendary {
                        ctx.toasts.push(format!(
                            "Found {} {}!",
                            collected.rarity().display_name(),
                            collected.name()
                        ));
                    }
                }
                Some(leftover) => {
                    let picked = total - leftover.stack_count();
                    if picked > 0 {
                        collected.set_stack_count_clamped(picked);
                        ctx.save.record_item_collected(&collected);
                    }
                    ctx.toasts.push("Inventory full");
                    entity.item = leftover;
                    entity.hold_off(PICKUP_RETRY);
                    self.world.items.push(entity);
                }
            }
        }
    }

    fn respawn(&mut self, ctx: &mut GameContext) {
        self.deaths += 1;
        log::info!("Player died in '{}' ({} deaths)", self.world.data.id, self.deaths);
        ctx.toasts.push("You died");
        self.world.respawn_player();
        self.open_vault = None;
    }

    fn complete(&mut self, ctx: &mut GameContext) -> SceneTransition {
        if self.test_play {
            ctx.toasts.push("Test run complete");
            return SceneTransition::Pop;
        }

        let id = self.world.data.id.clone();
        log::info!("Level '{}' complete", id);
        ctx.save.mark_level_completed(&id);
        ctx.persist();
        ctx.toasts.push(format!("{} complete!", self.world.data.name));
        SceneTransition::Pop
    }
}

impl Scene for LootGameScene {
    fn name(&self) -> &str {
        "loot_game"
    }

    fn update(&mut self, input: &InputState, dt: f32, ctx: &mut GameContext) -> SceneTransition {
        if input.was_pressed(Key::Back) {
            if !self.test_play {
                ctx.persist();
            }
            return SceneTransition::Pop;
        }

        if let Some(slot) = input.hotbar_pressed() {
            ctx.inventory.set_hotbar_slot(slot);
        }

        let physics = ctx.config.physics.clone();
        self.world.step_player(input, &physics, dt);

        if input.was_pressed(Key::Interact) {
            self.interact(ctx);
        }
        if input.was_pressed(Key::Attack) {
            self.attack(ctx);
        }
        if input.was_pressed(Key::UseItem) {
            self.use_selected(ctx);
        }

        self.world.update(dt, &physics);
        self.world.player.tick(dt);
        self.check_open_vault();
        self.apply_hazards(ctx);
        self.drop_loot(ctx);
        self.collect_items(ctx);

        if self.world.player.is_dead() || self.world.player_fell_out() {
            self.respawn(ctx);
        } else if self.world.player_at_exit() {
            return self.complete(ctx);
        }

        let (width, height) = (self.world.grid.pixel_width(), self.world.grid.pixel_height());
        self.camera.follow(&self.world.player.bounds(), width, height);
        SceneTransition::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ButtonMode;
    use crate::level::{
        BlockKind, BlockPlacement, ButtonPlacement, DoorPlacement, ItemPlacement, MobPlacement,
        VaultPlacement,
    };
    use crate::collision::Rect;
    use crate::player::PLAYER_MAX_HEALTH;
    use crate::scene::test_support::{context, run, tap};

    /// A 20x8 room with a floor on row 7 and the player spawning at tile 2
    fn room() -> LevelData {
        let mut level = LevelData::new("room", "Room", 20, 8);
        level.spawn.x = 64.0;
        level.spawn.y = 160.0;
        level
    }

    fn settle(scene: &mut LootGameScene, ctx: &mut GameContext) {
        run(scene, ctx, &mut InputState::new(), 60);
    }

    #[test]
    fn test_pickup_updates_counters() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        let mut level = room();
        level.items.push(ItemPlacement {
            x: 2,
            y: 6,
            item_id: "amber_crown".to_string(),
            stack_count: 1,
        });
        level.items.push(ItemPlacement {
            x: 2,
            y: 6,
            item_id: "amber_shard".to_string(),
            stack_count: 4,
        });

        let mut scene = LootGameScene::new(&level, &ctx);
        settle(&mut scene, &mut ctx);

        assert!(scene.world().items.is_empty());
        assert!(ctx.inventory.has_item("amber_crown", 1));
        assert_eq!(ctx.save.data().total_items_collected, 5);
        assert_eq!(ctx.save.data().legendary_items_found, 1);
        assert!(ctx.toasts.messages().any(|m| m.contains("Amber Crown")));
    }

    #[test]
    fn test_full_inventory_leaves_item_and_toasts() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        while ctx.inventory.inventory.add_item(ctx.items.create("amber_crown").unwrap()).is_none() {}

        let mut level = room();
        level.items.push(ItemPlacement {
            x: 2,
            y: 6,
            item_id: "moon_heart".to_string(),
            stack_count: 1,
        });

        let mut scene = LootGameScene::new(&level, &ctx);
        settle(&mut scene, &mut ctx);

        assert_eq!(scene.world().items.len(), 1);
        assert_eq!(scene.world().items[0].item.id(), "moon_heart");
        assert!(ctx.toasts.messages().any(|m| m == "Inventory full"));
        assert_eq!(ctx.save.data().mythic_items_found, 0);
    }

    #[test]
    fn test_reaching_exit_completes_level() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        let mut level = room();
        level.exit = Some(Rect::new(160.0, 160.0, 64.0, 64.0));

        let mut scene = LootGameScene::new(&level, &ctx);
        let mut input = InputState::new();
        input.press(Key::Right);

        let transition = run(&mut scene, &mut ctx, &mut input, 240);
        assert!(matches!(transition, SceneTransition::Pop));
        assert!(ctx.save.is_level_completed("room"));
        assert!(dir.path().join("save.json").exists());
    }

    #[test]
    fn test_test_play_does_not_record_progress() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        let mut level = room();
        level.exit = Some(Rect::new(0.0, 0.0, 640.0, 256.0));

        let mut scene = LootGameScene::test_play(&level, &ctx);
        let transition = run(&mut scene, &mut ctx, &mut InputState::new(), 5);
        assert!(matches!(transition, SceneTransition::Pop));
        assert!(!ctx.save.is_level_completed("room"));
    }

    #[test]
    fn test_back_persists_and_pops() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        let mut scene = LootGameScene::new(&room(), &ctx);

        assert!(matches!(tap(&mut scene, &mut ctx, Key::Back), SceneTransition::Pop));
        assert!(dir.path().join("save.json").exists());
    }

    #[test]
    fn test_spikes_kill_and_respawn() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        let mut level = room();
        level.blocks.retain(|b| b.x != 2);
        level.blocks.push(BlockPlacement {
            x: 2,
            y: 7,
            kind: BlockKind::Spikes,
        });

        let mut scene = LootGameScene::new(&level, &ctx);
        run(&mut scene, &mut ctx, &mut InputState::new(), 60 * 12);

        assert!(scene.deaths() >= 1);
        assert!(ctx.toasts.messages().any(|m| m == "You died"));
        assert!(scene.world().player.health.current() <= PLAYER_MAX_HEALTH);
    }

    #[test]
    fn test_vault_deposit_and_withdraw() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        ctx.inventory.inventory.add_item(ctx.items.create_stack("gold_coin", 5).unwrap());

        let mut level = room();
        level.vaults.push(VaultPlacement {
            x: 3,
            y: 6,
            persistent: true,
            max_slots: 54,
            items: Vec::new(),
        });
        let mut scene = LootGameScene::new(&level, &ctx);
        settle(&mut scene, &mut ctx);

        assert_eq!(scene.deposit_slot(0, &mut ctx), Err(InventoryError::Closed));

        tap(&mut scene, &mut ctx, Key::Interact);
        assert_eq!(scene.open_vault(), Some(0));
        settle(&mut scene, &mut ctx);

        assert_eq!(scene.deposit_slot(0, &mut ctx), Ok(5));
        assert_eq!(ctx.vault.count_item("gold_coin"), 5);
        assert_eq!(scene.withdraw_slot(0, &mut ctx), Ok(5));
        assert_eq!(ctx.inventory.inventory.count_item("gold_coin"), 5);
    }

    #[test]
    fn test_walking_away_closes_every_vault() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        let mut level = room();
        for x in [3, 10] {
            level.vaults.push(VaultPlacement {
                x,
                y: 6,
                persistent: false,
                max_slots: 9,
                items: Vec::new(),
            });
        }
        let mut scene = LootGameScene::new(&level, &ctx);
        settle(&mut scene, &mut ctx);

        tap(&mut scene, &mut ctx, Key::Interact);
        assert_eq!(scene.open_vault(), Some(0));
        settle(&mut scene, &mut ctx);
        assert_eq!(scene.world().vaults[0].state, VaultState::Open);

        scene.world_mut().player.x = 322.0;
        tap(&mut scene, &mut ctx, Key::Interact);
        assert_eq!(scene.open_vault(), Some(1));
        assert!(!scene.world().vaults[0].is_accessible());
        settle(&mut scene, &mut ctx);
        assert_eq!(scene.world().vaults[1].state, VaultState::Open);

        let mut input = InputState::new();
        input.press(Key::Right);
        run(&mut scene, &mut ctx, &mut input, 120);
        settle(&mut scene, &mut ctx);

        for vault in &scene.world().vaults {
            assert_eq!(vault.state, VaultState::Closed);
        }
        assert_eq!(scene.open_vault(), None);
        assert_eq!(scene.deposit_slot(0, &mut ctx), Err(InventoryError::Closed));
    }

    #[test]
    fn test_bow_fires_at_its_own_cooldown() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        ctx.inventory.inventory.add_item(ctx.items.create("wooden_bow").unwrap());
        ctx.inventory.equip_from_slot(0).unwrap();
        let cooldown = ctx.inventory.weapon().unwrap().ranged().unwrap().cooldown;
        assert!(cooldown > ATTACK_COOLDOWN);

        let mut scene = LootGameScene::new(&room(), &ctx);
        settle(&mut scene, &mut ctx);

        let dt = ctx.config.fixed_timestep;
        let mut shots = 0;
        for _ in 0..60 {
            let before = scene.world().projectiles.len();
            let mut input = InputState::new();
            input.press(Key::Attack);
            scene.update(&input, dt, &mut ctx);
            if scene.world().projectiles.len() > before {
                shots += 1;
            }
        }

        // One second of holding Attack with a 0.6s bow
        assert_eq!(shots, 2);
    }

    #[test]
    fn test_button_opens_door_and_potion_heals() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        ctx.inventory.inventory.add_item(ctx.items.create("health_potion").unwrap());

        let mut level = room();
        level.buttons.push(ButtonPlacement {
            x: 3,
            y: 6,
            link_id: Some(1),
            mode: ButtonMode::OneShot,
        });
        level.doors.push(DoorPlacement {
            x: 8,
            y: 5,
            link_id: Some(1),
            required_key: None,
        });

        let mut scene = LootGameScene::new(&level, &ctx);
        settle(&mut scene, &mut ctx);
        tap(&mut scene, &mut ctx, Key::Interact);
        settle(&mut scene, &mut ctx);
        settle(&mut scene, &mut ctx);
        assert!(!scene.world().doors[0].is_solid());

        scene.world_mut().player.health.take_damage(10.0);
        tap(&mut scene, &mut ctx, Key::UseItem);
        assert_eq!(scene.world().player.health.current(), PLAYER_MAX_HEALTH - 5.0);
        assert!(!ctx.inventory.has_item("health_potion", 1));
    }

    #[test]
    fn test_sword_kills_slime() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        ctx.inventory.inventory.add_item(ctx.items.create("iron_sword").unwrap());
        ctx.inventory.equip_from_slot(0).unwrap();

        let mut level = room();
        level.mobs.push(MobPlacement {
            x: 3,
            y: 6,
            mob_id: "slime".to_string(),
        });
        let mut scene = LootGameScene::new(&level, &ctx);

        let dt = ctx.config.fixed_timestep;
        for _ in 0..180 {
            let mut input = InputState::new();
            input.press(Key::Attack);
            scene.update(&input, dt, &mut ctx);
        }

        assert!(scene.world().mobs.is_empty());
    }
}

//! Scenes and the state they share
//!
//! The game is a stack of scenes. Only the top one receives `update`; it answers
//! with a `SceneTransition` telling the `SceneManager` whether to push a new
//! scene, pop itself, swap itself out or quit. Everything that outlives a single
//! scene (registries, the save, the player's inventory) lives in `GameContext`.

pub mod creative;
pub mod level_select;
pub mod loot_game;
pub mod overworld;

pub use creative::{CreativeScene, EditorTool};
pub use level_select::{LevelEntry, LevelSelectionScene};
pub use loot_game::LootGameScene;
pub use overworld::{MapNode, NodeKind, NodeLinks, OverworldScene};

use crate::cloud::{AppsScriptTransport, CloudEvent, CloudSyncManager};
use crate::config::GameConfig;
use crate::input::InputState;
use crate::inventory::{Inventory, PlayerInventory};
use crate::item::ItemRegistry;
use crate::level::LevelLibrary;
use crate::mob::MobRegistry;
use crate::save::SaveManager;
use crate::toast::ToastQueue;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;

/// What the scene stack should do after an update
pub enum SceneTransition {
    None,
    Push(Box<dyn Scene>),
    Pop,
    Replace(Box<dyn Scene>),
    Quit,
}

impl fmt::Debug for SceneTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneTransition::None => write!(f, "None"),
            SceneTransition::Push(scene) => write!(f, "Push({})", scene.name()),
            SceneTransition::Pop => write!(f, "Pop"),
            SceneTransition::Replace(scene) => write!(f, "Replace({})", scene.name()),
            SceneTransition::Quit => write!(f, "Quit"),
        }
    }
}

pub trait Scene {
    fn name(&self) -> &str;

    /// Runs one frame
    fn update(&mut self, input: &InputState, dt: f32, ctx: &mut GameContext) -> SceneTransition;

    /// Called when the scene is back on top after the one above it popped
    fn resumed(&mut self, _ctx: &mut GameContext) {}
}

/// Everything the scenes share.
pub struct GameContext {
    pub config: GameConfig,
    pub items: ItemRegistry,
    pub mobs: MobRegistry,
    pub levels: LevelLibrary,
    pub save: SaveManager,
    pub inventory: PlayerInventory,
    /// The shared vault that persistent level vaults open into
    pub vault: Inventory,
    pub toasts: ToastQueue,
    pub cloud: Option<CloudSyncManager>,
    /// Loot rolls
    pub rng: StdRng,
}

impl GameContext {
    /// Builds the context: registries, levels, the save file and cloud sync
    pub fn new(config: GameConfig) -> Self {
        let mut levels = LevelLibrary::with_builtin();
        if let Some(dir) = &config.levels_dir {
            if dir.is_dir() {
                match levels.load_dir(dir) {
                    Ok(count) => log::info!("Loaded {} levels from {}", count, dir.display()),
                    Err(e) => log::warn!("Could not read levels from {}: {}", dir.display(), e),
                }
            }
        }

        let mut save = SaveManager::new(config.save_path());
        save.load();

        let cloud = config
            .cloud_url
            .as_ref()
            .map(|url| CloudSyncManager::new(AppsScriptTransport::new(url.clone())));

        let mut ctx = GameContext {
            inventory: PlayerInventory::new(config.inventory_slots),
            vault: Inventory::new(config.vault_slots),
            config,
            items: ItemRegistry::create_default(),
            mobs: MobRegistry::create_default(),
            levels,
            save,
            toasts: ToastQueue::new(),
            cloud,
            rng: StdRng::from_entropy(),
        };
        ctx.restore_from_save();
        ctx
    }

    /// Rebuilds the runtime inventory and vault from the save data
    ///
    /// The save keeps no slot positions and no equipment, so everything comes back
    /// packed into the first slots with nothing equipped.
    pub fn restore_from_save(&mut self) {
        let data = self.save.data();
        let inventory_slots = self.config.inventory_slots.max(data.inventory.len());
        let vault_slots = self.config.vault_slots.max(data.vault_items.len());

        self.inventory = PlayerInventory::from_inventory(Inventory::from_saved(
            &data.inventory,
            inventory_slots,
            &self.items,
        ));
        self.vault = Inventory::from_saved(&data.vault_items, vault_slots, &self.items);
    }

    /// Copies the runtime inventory and vault into the save and writes it
    ///
    /// Failures are logged and shown as a toast. Returns whether the save was written.
    pub fn persist(&mut self) -> bool {
        let inventory = self.inventory.all_items().map(|item| item.to_saved()).collect();
        self.save.set_inventory(inventory);
        self.save.set_vault(self.vault.to_saved());

        match self.save.save() {
            Ok(_) => true,
            Err(e) => {
                log::warn!("Could not save game: {}", e);
                self.toasts.push("Could not save game");
                false
            }
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.config.username.as_deref()
    }

    /// Starts downloading the cloud save. Returns false when cloud sync is off.
    pub fn sync_pull(&mut self) -> bool {
        let username = self.username().unwrap_or_default().to_string();
        match self.cloud.as_mut() {
            Some(cloud) => {
                cloud.fetch_cloud_save(&username);
                true
            }
            None => {
                self.toasts.push("Cloud sync is not configured");
                false
            }
        }
    }

    /// Writes the local save and starts uploading it. Returns false when cloud
    /// sync is off or the save couldn't be serialized.
    pub fn sync_push(&mut self) -> bool {
        if self.cloud.is_none() {
            self.toasts.push("Cloud sync is not configured");
            return false;
        }

        self.persist();
        let json = match self.save.to_json() {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not serialize save for upload: {}", e);
                self.toasts.push("Could not prepare cloud save");
                return false;
            }
        };

        let username = self.username().unwrap_or_default().to_string();
        if let Some(cloud) = self.cloud.as_mut() {
            cloud.upload_save(&username, json);
        }
        true
    }

    /// Turns finished cloud operations into toasts, applying a fetched save
    pub fn poll_cloud(&mut self) -> Vec<CloudEvent> {
        let Some(cloud) = self.cloud.as_mut() else {
            return Vec::new();
        };
        let events = cloud.poll();

        for event in &events {
            self.handle_cloud_event(event);
        }
        events
    }

    /// Blocks until every cloud operation has finished, then handles the results
    /// like `poll_cloud` does
    pub fn wait_for_cloud(&mut self) -> Vec<CloudEvent> {
        let events = self.cloud.as_mut().map(|cloud| cloud.wait()).unwrap_or_default();
        for event in &events {
            self.handle_cloud_event(event);
        }
        events
    }

    fn handle_cloud_event(&mut self, event: &CloudEvent) {
        match event {
            CloudEvent::Fetched(Some(json)) => match self.save.apply_json(json) {
                Ok(()) => {
                    self.restore_from_save();
                    if let Err(e) = self.save.save() {
                        log::warn!("Could not write pulled save: {}", e);
                    }
                    self.toasts.push("Cloud save loaded");
                }
                Err(e) => {
                    log::warn!("Cloud save is unusable: {}", e);
                    self.toasts.push("Cloud save is damaged");
                }
            },
            CloudEvent::Fetched(None) => self.toasts.push("No cloud save found"),
            CloudEvent::Uploaded => self.toasts.push("Saved to cloud"),
            CloudEvent::Failed(reason) => self.toasts.push(format!("Cloud sync failed: {}", reason)),
        }
    }

    /// Per-frame bookkeeping that runs no matter which scene is on top
    pub fn tick(&mut self, dt: f32) {
        self.toasts.update(dt);
        self.poll_cloud();
    }
}

/// Owns the scene stack and routes updates to the top scene.
pub struct SceneManager {
    stack: Vec<Box<dyn Scene>>,
    running: bool,
}

impl SceneManager {
    pub fn new(initial: Box<dyn Scene>) -> Self {
        log::debug!("Starting in scene {}", initial.name());
        SceneManager {
            stack: vec![initial],
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running && !self.stack.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn current_name(&self) -> Option<&str> {
        self.stack.last().map(|scene| scene.name())
    }

    /// Runs one frame of the top scene and applies its transition
    pub fn update(&mut self, input: &InputState, dt: f32, ctx: &mut GameContext) {
        if !self.is_running() {
            return;
        }

        ctx.tick(dt);
        let Some(top) = self.stack.last_mut() else {
            return;
        };
        let transition = top.update(input, dt, ctx);
        self.apply(transition, ctx);
    }

    fn apply(&mut self, transition: SceneTransition, ctx: &mut GameContext) {
        match transition {
            SceneTransition::None => {}
            SceneTransition::Push(scene) => {
                log::debug!("Push scene {}", scene.name());
                self.stack.push(scene);
            }
            SceneTransition::Pop => {
                if let Some(scene) = self.stack.pop() {
                    log::debug!("Pop scene {}", scene.name());
                }
                match self.stack.last_mut() {
                    Some(scene) => scene.resumed(ctx),
                    None => self.running = false,
                }
            }
            SceneTransition::Replace(scene) => {
                self.stack.pop();
                log::debug!("Replace with scene {}", scene.name());
                self.stack.push(scene);
            }
            SceneTransition::Quit => {
                log::info!("Quit requested");
                self.running = false;
            }
        }
    }
}

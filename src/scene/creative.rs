use super::{GameContext, LootGameScene, Scene, SceneTransition};
use crate::camera::Camera;
use crate::collision::Rect;
use crate::color::Color;
use crate::entity::{ButtonMode, TILE_SIZE};
use crate::input::{InputState, Key};
use crate::level::{
    BlockKind, BlockPlacement, ButtonPlacement, DoorPlacement, ItemPlacement, LevelData, LightSource,
    MobPlacement, VaultPlacement,
};
use std::path::PathBuf;

/// Snapshots kept for undo; the oldest is dropped past this
pub const MAX_UNDO: usize = 64;

const NEW_LEVEL_WIDTH: usize = 40;
const NEW_LEVEL_HEIGHT: usize = 15;
const LIGHT_RADIUS: f32 = 96.0;
const LOCAL_VAULT_SLOTS: usize = 27;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorTool {
    Block(BlockKind),
    Item(String),
    Mob(String),
    Light,
    Door,
    Button,
    Vault,
    Spawn,
    Exit,
    Erase,
}

impl EditorTool {
    pub fn label(&self) -> String {
        match self {
            EditorTool::Block(kind) => format!("Block: {:?}", kind),
            EditorTool::Item(id) => format!("Item: {}", id),
            EditorTool::Mob(id) => format!("Mob: {}", id),
            other => format!("{:?}", other),
        }
    }
}

/// The level editor.
///
/// Works on its own copy of a `LevelData`; nothing reaches the library until the
/// level is saved.
pub struct CreativeScene {
    level: LevelData,
    tools: Vec<EditorTool>,
    tool_index: usize,
    /// Tile under the cursor
    cursor: (i32, i32),
    /// Link id given to new doors and buttons
    link_id: Option<u32>,
    undo: Vec<LevelData>,
    camera: Camera,
}

impl CreativeScene {
    pub fn new(level: LevelData, ctx: &GameContext) -> Self {
        let mut tools: Vec<EditorTool> = BlockKind::ALL.into_iter().map(EditorTool::Block).collect();
        tools.extend(
            ctx.items
                .all_items()
                .into_iter()
                .map(|item| EditorTool::Item(item.id().to_string())),
        );
        tools.extend(ctx.mobs.ids().into_iter().map(|id| EditorTool::Mob(id.to_string())));
        tools.extend([
            EditorTool::Light,
            EditorTool::Door,
            EditorTool::Button,
            EditorTool::Vault,
            EditorTool::Spawn,
            EditorTool::Exit,
            EditorTool::Erase,
        ]);

        let cursor = (
            (level.spawn.x / TILE_SIZE) as i32,
            (level.spawn.y / TILE_SIZE) as i32,
        );
        log::info!("Editing level '{}'", level.id);

        CreativeScene {
            level,
            tools,
            tool_index: 0,
            cursor,
            link_id: None,
            undo: Vec::new(),
            camera: Camera::new(ctx.config.viewport_width, ctx.config.viewport_height),
        }
    }

    /// A blank level with an unused `custom_<n>` id
    pub fn new_level(ctx: &GameContext) -> Self {
        let n = (1..)
            .find(|n| ctx.levels.get(&format!("custom_{}", n)).is_none())
            .unwrap_or(1);
        let level = LevelData::new(
            format!("custom_{}", n),
            format!("Custom Level {}", n),
            NEW_LEVEL_WIDTH,
            NEW_LEVEL_HEIGHT,
        );
        Self::new(level, ctx)
    }

    pub fn level(&self) -> &LevelData {
        &self.level
    }

    pub fn tool(&self) -> &EditorTool {
        &self.tools[self.tool_index]
    }

    pub fn tools(&self) -> &[EditorTool] {
        &self.tools
    }

    pub fn cursor(&self) -> (i32, i32) {
        self.cursor
    }

    pub fn link_id(&self) -> Option<u32> {
        self.link_id
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Switches to `tool` if it is in the palette
    pub fn select_tool(&mut self, tool: &EditorTool) -> bool {
        match self.tools.iter().position(|t| t == tool) {
            Some(index) => {
                self.tool_index = index;
                true
            }
            None => false,
        }
    }

    fn cycle_tool(&mut self, forward: bool) {
        let len = self.tools.len();
        self.tool_index = if forward {
            (self.tool_index + 1) % len
        } else {
            (self.tool_index + len - 1) % len
        };
        log::debug!("Tool: {}", self.tool().label());
    }

    /// Moves the cursor, staying inside the level
    pub fn set_cursor(&mut self, x: i32, y: i32) {
        let max_x = self.level.width.saturating_sub(1) as i32;
        let max_y = self.level.height.saturating_sub(1) as i32;
        self.cursor = (x.clamp(0, max_x), y.clamp(0, max_y));
    }

    /// Applies the current tool at the cursor
    ///
    /// Whatever of the same kind was on that tile is replaced. Returns false if
    /// the level didn't change, in which case no undo step is recorded.
    pub fn apply_tool(&mut self) -> bool {
        let before = self.level.clone();
        let (x, y) = self.cursor;
        let (px, py) = (x as f32 * TILE_SIZE, y as f32 * TILE_SIZE);
        let at = |tx: i32, ty: i32| tx == x && ty == y;
        let in_tile = |lx: f32, ly: f32| (lx / TILE_SIZE).floor() as i32 == x && (ly / TILE_SIZE).floor() as i32 == y;
        let level = &mut self.level;

        match self.tools[self.tool_index].clone() {
            EditorTool::Block(kind) => {
                level.blocks.retain(|b| !at(b.x, b.y));
                level.blocks.push(BlockPlacement { x, y, kind });
            }
            EditorTool::Item(item_id) => {
                level.items.retain(|p| !at(p.x, p.y));
                level.items.push(ItemPlacement {
                    x,
                    y,
                    item_id,
                    stack_count: 1,
                });
            }
            EditorTool::Mob(mob_id) => {
                level.mobs.retain(|p| !at(p.x, p.y));
                level.mobs.push(MobPlacement { x, y, mob_id });
            }
            EditorTool::Light => {
                level.lights.retain(|l| !in_tile(l.x, l.y));
                level.lights.push(LightSource {
                    x: px + TILE_SIZE / 2.0,
                    y: py + TILE_SIZE / 2.0,
                    radius: LIGHT_RADIUS,
                    intensity: 1.0,
                    color: Color::AMBER,
                });
            }
            EditorTool::Door => {
                level.doors.retain(|p| !at(p.x, p.y));
                level.doors.push(DoorPlacement {
                    x,
                    y,
                    link_id: self.link_id,
                    required_key: None,
                });
            }
            EditorTool::Button => {
                level.buttons.retain(|p| !at(p.x, p.y));
                level.buttons.push(ButtonPlacement {
                    x,
                    y,
                    link_id: self.link_id,
                    mode: ButtonMode::default(),
                });
            }
            EditorTool::Vault => {
                level.vaults.retain(|p| !at(p.x, p.y));
                level.vaults.push(VaultPlacement {
                    x,
                    y,
                    persistent: false,
                    max_slots: LOCAL_VAULT_SLOTS,
                    items: Vec::new(),
                });
            }
            EditorTool::Spawn => {
                level.spawn.x = px;
                level.spawn.y = py;
            }
            EditorTool::Exit => {
                level.exit = Some(Rect::new(px, py, TILE_SIZE, TILE_SIZE));
            }
            EditorTool::Erase => {
                level.blocks.retain(|b| !at(b.x, b.y));
                level.items.retain(|p| !at(p.x, p.y));
                level.mobs.retain(|p| !at(p.x, p.y));
                level.doors.retain(|p| !at(p.x, p.y));
                level.buttons.retain(|p| !at(p.x, p.y));
                level.vaults.retain(|p| !at(p.x, p.y));
                level.lights.retain(|l| !in_tile(l.x, l.y));
                if level.exit.is_some_and(|exit| in_tile(exit.x, exit.y)) {
                    level.exit = None;
                }
            }
        }

        if self.level == before {
            return false;
        }
        self.undo.push(before);
        if self.undo.len() > MAX_UNDO {
            self.undo.remove(0);
        }
        true
    }

    /// Restores the last snapshot. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.undo.pop() {
            Some(previous) => {
                self.level = previous;
                true
            }
            None => false,
        }
    }

    /// Validates the level, writes it to the editor output directory and adds it
    /// to the library
    pub fn save(&self, ctx: &mut GameContext) -> Option<PathBuf> {
        if let Err(e) = self.level.validate() {
            log::warn!("Not saving '{}': {}", self.level.id, e);
            ctx.toasts.push(format!("Can't save: {}", e));
            return None;
        }

        let path = ctx.config.editor_output_dir().join(format!("{}.json", self.level.id));
        if let Err(e) = self.level.save_to_file(&path) {
            log::warn!("Could not write {}: {}", path.display(), e);
            ctx.toasts.push("Could not save level");
            return None;
        }

        log::info!("Saved level '{}' to {}", self.level.id, path.display());
        ctx.levels.insert(self.level.clone());
        ctx.toasts.push(format!("Saved {}", self.level.name));
        Some(path)
    }

    fn handle_mouse(&mut self, input: &InputState) -> bool {
        let Some((sx, sy)) = input.mouse() else {
            return false;
        };
        let (wx, wy) = self.camera.screen_to_world(sx, sy);
        let (tx, ty) = ((wx / TILE_SIZE).floor() as i32, (wy / TILE_SIZE).floor() as i32);
        let inside = tx >= 0 && ty >= 0 && (tx as usize) < self.level.width && (ty as usize) < self.level.height;
        if inside {
            self.cursor = (tx, ty);
        }
        inside && input.was_clicked()
    }
}

impl Scene for CreativeScene {
    fn name(&self) -> &str {
        "creative"
    }

    fn update(&mut self, input: &InputState, _dt: f32, ctx: &mut GameContext) -> SceneTransition {
        if input.was_pressed(Key::Back) {
            return SceneTransition::Pop;
        }
        if input.was_pressed(Key::TestPlay) {
            return SceneTransition::Push(Box::new(LootGameScene::test_play(&self.level, ctx)));
        }

        if input.was_pressed(Key::NextTool) {
            self.cycle_tool(true);
        }
        if input.was_pressed(Key::PrevTool) {
            self.cycle_tool(false);
        }
        if let Some(slot) = input.hotbar_pressed() {
            let link = slot as u32 + 1;
            self.link_id = if self.link_id == Some(link) { None } else { Some(link) };
        }

        if let Some(direction) = input.direction_pressed() {
            let (x, y) = self.cursor;
            match direction {
                Key::Left => self.set_cursor(x - 1, y),
                Key::Right => self.set_cursor(x + 1, y),
                Key::Up => self.set_cursor(x, y - 1),
                Key::Down => self.set_cursor(x, y + 1),
                _ => {}
            }
        }

        let clicked = self.handle_mouse(input);
        if clicked || input.was_pressed(Key::Confirm) {
            self.apply_tool();
        }
        if input.was_pressed(Key::Undo) {
            self.undo();
        }
        if input.was_pressed(Key::Save) {
            self.save(ctx);
        }

        let (x, y) = self.cursor;
        let cursor = Rect::new(x as f32 * TILE_SIZE, y as f32 * TILE_SIZE, TILE_SIZE, TILE_SIZE);
        self.camera.follow(&cursor, self.level.pixel_width(), self.level.pixel_height());
        SceneTransition::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::test_support::{context, tap};

    fn editor(ctx: &GameContext) -> CreativeScene {
        CreativeScene::new(LevelData::new("edit", "Edit Me", 20, 10), ctx)
    }

    #[test]
    fn test_new_level_picks_free_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        ctx.levels.insert(LevelData::new("custom_1", "Taken", 10, 10));

        let scene = CreativeScene::new_level(&ctx);
        assert_eq!(scene.level().id, "custom_2");
        assert!(scene.level().validate().is_ok());
    }

    #[test]
    fn test_place_replaces_and_undo_restores() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let mut scene = editor(&ctx);
        scene.set_cursor(3, 9);
        let original = scene.level().clone();

        assert!(scene.select_tool(&EditorTool::Block(BlockKind::Brick)));
        assert!(scene.apply_tool());
        let at_cursor: Vec<_> = scene.level().blocks.iter().filter(|b| (b.x, b.y) == (3, 9)).collect();
        assert_eq!(at_cursor.len(), 1);
        assert_eq!(at_cursor[0].kind, BlockKind::Brick);

        // Same tool, same tile: nothing changes and no undo step
        assert!(!scene.apply_tool());
        assert_eq!(scene.undo_depth(), 1);

        assert!(scene.undo());
        assert_eq!(scene.level(), &original);
        assert!(!scene.undo());
    }

    #[test]
    fn test_undo_is_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let mut scene = editor(&ctx);
        scene.select_tool(&EditorTool::Block(BlockKind::Dirt));

        for i in 0..(MAX_UNDO as i32 + 10) {
            scene.set_cursor(i % 20, (i / 20) % 9);
            scene.select_tool(&EditorTool::Block(if i % 2 == 0 { BlockKind::Dirt } else { BlockKind::Wood }));
            scene.apply_tool();
        }
        assert_eq!(scene.undo_depth(), MAX_UNDO);
    }

    #[test]
    fn test_keys_move_cursor_and_cycle_tools() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        let mut scene = editor(&ctx);
        scene.set_cursor(0, 0);

        tap(&mut scene, &mut ctx, Key::Left);
        tap(&mut scene, &mut ctx, Key::Up);
        assert_eq!(scene.cursor(), (0, 0));
        tap(&mut scene, &mut ctx, Key::Right);
        tap(&mut scene, &mut ctx, Key::Down);
        assert_eq!(scene.cursor(), (1, 1));

        assert_eq!(scene.tool(), &EditorTool::Block(BlockKind::Stone));
        tap(&mut scene, &mut ctx, Key::PrevTool);
        assert_eq!(scene.tool(), &EditorTool::Erase);
        tap(&mut scene, &mut ctx, Key::NextTool);
        assert_eq!(scene.tool(), &EditorTool::Block(BlockKind::Stone));
    }

    #[test]
    fn test_linked_door_and_button() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        let mut scene = editor(&ctx);

        tap(&mut scene, &mut ctx, Key::Hotbar(2));
        assert_eq!(scene.link_id(), Some(3));

        scene.select_tool(&EditorTool::Door);
        scene.set_cursor(8, 7);
        tap(&mut scene, &mut ctx, Key::Confirm);
        scene.select_tool(&EditorTool::Button);
        scene.set_cursor(4, 8);
        tap(&mut scene, &mut ctx, Key::Confirm);

        assert_eq!(scene.level().doors[0].link_id, Some(3));
        assert_eq!(scene.level().buttons[0].link_id, Some(3));

        tap(&mut scene, &mut ctx, Key::Hotbar(2));
        assert_eq!(scene.link_id(), None);
    }

    #[test]
    fn test_click_maps_through_camera() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        let mut scene = editor(&ctx);
        scene.select_tool(&EditorTool::Mob("slime".to_string()));

        let mut input = InputState::new();
        let (sx, sy) = scene.camera().world_to_screen(5.0 * TILE_SIZE + 4.0, 2.0 * TILE_SIZE + 4.0);
        input.click(sx, sy);
        scene.update(&input, 1.0 / 60.0, &mut ctx);

        assert_eq!(scene.cursor(), (5, 2));
        assert_eq!(scene.level().mobs.len(), 1);
        assert_eq!(scene.level().mobs[0].mob_id, "slime");
    }

    #[test]
    fn test_erase_clears_tile() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let mut scene = editor(&ctx);
        scene.set_cursor(6, 9);

        scene.select_tool(&EditorTool::Item("sapphire".to_string()));
        scene.apply_tool();
        scene.select_tool(&EditorTool::Light);
        scene.apply_tool();
        scene.select_tool(&EditorTool::Erase);
        assert!(scene.apply_tool());

        assert!(scene.level().items.is_empty());
        assert!(scene.level().lights.is_empty());
        assert!(!scene.level().blocks.iter().any(|b| (b.x, b.y) == (6, 9)));
    }

    #[test]
    fn test_save_writes_file_and_registers() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        let mut scene = editor(&ctx);
        scene.set_cursor(15, 8);
        scene.select_tool(&EditorTool::Exit);
        scene.apply_tool();

        tap(&mut scene, &mut ctx, Key::Save);
        let path = dir.path().join("levels").join("edit.json");
        assert!(path.exists());
        assert_eq!(LevelData::load_from_file(&path).unwrap(), *scene.level());
        assert!(ctx.levels.get("edit").is_some());
        assert!(ctx.toasts.messages().any(|m| m == "Saved Edit Me"));
    }

    #[test]
    fn test_invalid_level_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        let mut level = LevelData::new("bad", "Bad", 20, 10);
        level.spawn.x = -50.0;
        let scene = CreativeScene::new(level, &ctx);

        assert!(scene.save(&mut ctx).is_none());
        assert!(ctx.levels.get("bad").is_none());
        assert!(ctx.toasts.messages().any(|m| m.starts_with("Can't save")));
    }

    #[test]
    fn test_test_play_and_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        let mut scene = editor(&ctx);

        let transition = tap(&mut scene, &mut ctx, Key::TestPlay);
        assert!(matches!(transition, SceneTransition::Push(s) if s.name() == "loot_game"));
        assert!(matches!(tap(&mut scene, &mut ctx, Key::Back), SceneTransition::Pop));
    }
}

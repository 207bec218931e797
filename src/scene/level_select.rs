use super::{GameContext, LootGameScene, Scene, SceneTransition};
use crate::input::{InputState, Key};

/// One row of the level list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelEntry {
    pub id: String,
    pub name: String,
    pub locked: bool,
    pub completed: bool,
}

/// A flat list of every known level, for jumping straight into one.
pub struct LevelSelectionScene {
    entries: Vec<LevelEntry>,
    selected: usize,
}

impl LevelSelectionScene {
    pub fn new(ctx: &GameContext) -> Self {
        LevelSelectionScene {
            entries: Self::collect_entries(ctx),
            selected: 0,
        }
    }

    fn collect_entries(ctx: &GameContext) -> Vec<LevelEntry> {
        let save = ctx.save.data();
        ctx.levels
            .iter()
            .map(|level| LevelEntry {
                id: level.id.clone(),
                name: level.name.clone(),
                locked: !ctx.levels.is_unlocked(&level.id, save),
                completed: ctx.save.is_level_completed(&level.id),
            })
            .collect()
    }

    pub fn entries(&self) -> &[LevelEntry] {
        &self.entries
    }

    pub fn selected(&self) -> Option<&LevelEntry> {
        self.entries.get(self.selected)
    }

    fn move_selection(&mut self, forward: bool) {
        let len = self.entries.len();
        if len == 0 {
            return;
        }
        self.selected = if forward {
            (self.selected + 1) % len
        } else {
            (self.selected + len - 1) % len
        };
    }
}

impl Scene for LevelSelectionScene {
    fn name(&self) -> &str {
        "level_select"
    }

    fn update(&mut self, input: &InputState, _dt: f32, ctx: &mut GameContext) -> SceneTransition {
        if input.was_pressed(Key::Back) {
            return SceneTransition::Pop;
        }
        if input.was_pressed(Key::Down) {
            self.move_selection(true);
        }
        if input.was_pressed(Key::Up) {
            self.move_selection(false);
        }

        if !input.was_pressed(Key::Confirm) {
            return SceneTransition::None;
        }
        let Some(entry) = self.selected() else {
            return SceneTransition::None;
        };
        if entry.locked {
            ctx.toasts.push(format!("{} is locked", entry.name));
            return SceneTransition::None;
        }

        match ctx.levels.get(&entry.id) {
            Some(level) => SceneTransition::Push(Box::new(LootGameScene::new(level, ctx))),
            None => {
                log::warn!("Level '{}' disappeared from the library", entry.id);
                SceneTransition::None
            }
        }
    }

    /// Completion may have changed while a level was being played
    fn resumed(&mut self, ctx: &mut GameContext) {
        self.entries = Self::collect_entries(ctx);
        if self.selected >= self.entries.len() {
            self.selected = 0;
        }
    }
}

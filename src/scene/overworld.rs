use super::{CreativeScene, GameContext, LevelSelectionScene, LootGameScene, Scene, SceneTransition};
use crate::input::{InputState, Key};
use crate::level::LevelLibrary;
use crate::loot::{self, ChestKind};
use chrono::{DateTime, Utc};

/// Pixel spacing between map nodes
const NODE_SPACING: f32 = 96.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Level(String),
    DailyChest,
    MonthlyChest,
    LevelSelect,
    Creative,
}

/// Neighbouring node indices in each direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeLinks {
    pub up: Option<usize>,
    pub down: Option<usize>,
    pub left: Option<usize>,
    pub right: Option<usize>,
}

impl NodeLinks {
    pub fn get(&self, direction: Key) -> Option<usize> {
        match direction {
            Key::Up => self.up,
            Key::Down => self.down,
            Key::Left => self.left,
            Key::Right => self.right,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapNode {
    pub id: String,
    pub name: String,
    pub position: (f32, f32),
    pub kind: NodeKind,
    pub links: NodeLinks,
}

impl MapNode {
    fn new(id: impl Into<String>, name: impl Into<String>, column: i32, row: i32, kind: NodeKind) -> Self {
        MapNode {
            id: id.into(),
            name: name.into(),
            position: (column as f32 * NODE_SPACING, row as f32 * NODE_SPACING),
            kind,
            links: NodeLinks::default(),
        }
    }
}

/// Lays out the overworld map
///
/// The levels form a chain from left to right in library order. The daily chest
/// sits left of the first level and the monthly chest above it. Level select is
/// below the first level with the editor to its right.
pub fn build_map(levels: &LevelLibrary) -> Vec<MapNode> {
    let mut nodes = vec![
        MapNode::new("daily_chest", ChestKind::Daily.display_name(), 0, 1, NodeKind::DailyChest),
        MapNode::new("monthly_chest", ChestKind::Monthly.display_name(), 1, 0, NodeKind::MonthlyChest),
        MapNode::new("level_select", "Level Select", 1, 2, NodeKind::LevelSelect),
        MapNode::new("creative", "Creative", 2, 2, NodeKind::Creative),
    ];
    let (daily, monthly, select, creative) = (0, 1, 2, 3);
    nodes[select].links.right = Some(creative);
    nodes[creative].links.left = Some(select);

    let first_level = nodes.len();
    for (column, level) in (1..).zip(levels.iter()) {
        nodes.push(MapNode::new(
            level.id.clone(),
            level.name.clone(),
            column,
            1,
            NodeKind::Level(level.id.clone()),
        ));
    }

    let last = nodes.len();
    for index in first_level..last {
        if index > first_level {
            nodes[index].links.left = Some(index - 1);
        }
        if index + 1 < last {
            nodes[index].links.right = Some(index + 1);
        }
    }

    // Without levels the side nodes hang off each other instead
    let hub = if last > first_level { first_level } else { select };
    nodes[daily].links.right = Some(hub);
    nodes[monthly].links.down = Some(hub);
    if hub == first_level {
        nodes[hub].links.left = Some(daily);
        nodes[hub].links.up = Some(monthly);
        nodes[hub].links.down = Some(select);
        nodes[select].links.up = Some(hub);
    } else {
        nodes[select].links.left = Some(daily);
        nodes[select].links.up = Some(monthly);
    }

    nodes
}

/// Opens a reward chest into the player's inventory
///
/// Items that don't fit go to the vault. Returns false if the chest was already
/// opened in the current period.
pub fn open_chest(kind: ChestKind, ctx: &mut GameContext, now: DateTime<Utc>) -> bool {
    if !ctx.save.can_open_chest(kind, now) {
        ctx.toasts.push(format!("The {} is empty. Come back later", kind.display_name()));
        return false;
    }

    let items = loot::open_chest(kind, &mut ctx.rng, &ctx.items);
    let mut overflowed = false;
    for item in &items {
        ctx.save.record_item_collected(item);
        let Some(leftover) = ctx.inventory.inventory.add_item(item.clone()) else {
            continue;
        };
        overflowed = true;
        if let Some(lost) = ctx.vault.add_item(leftover) {
            log::warn!("No room for {} x{} from {}", lost.id(), lost.stack_count(), kind.display_name());
        }
    }

    ctx.save.mark_chest_opened(kind, now);
    ctx.persist();
    log::info!("Opened {} with {} items", kind.display_name(), items.len());

    let names: Vec<&str> = items.iter().map(|item| item.name()).collect();
    ctx.toasts.push(format!("{}: {}", kind.display_name(), names.join(", ")));
    if overflowed {
        ctx.toasts.push("Inventory full, extra loot sent to the vault");
    }
    true
}

/// The world map the game starts on.
pub struct OverworldScene {
    nodes: Vec<MapNode>,
    selected: usize,
}

impl OverworldScene {
    pub fn new(ctx: &GameContext) -> Self {
        let nodes = build_map(&ctx.levels);
        let selected = nodes
            .iter()
            .position(|node| matches!(node.kind, NodeKind::Level(_)))
            .unwrap_or(0);
        OverworldScene { nodes, selected }
    }

    pub fn nodes(&self) -> &[MapNode] {
        &self.nodes
    }

    pub fn selected(&self) -> &MapNode {
        &self.nodes[self.selected]
    }

    /// Moves the selection to the node with `id`, if there is one
    pub fn select(&mut self, id: &str) -> bool {
        match self.nodes.iter().position(|node| node.id == id) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }

    fn enter(&mut self, ctx: &mut GameContext) -> SceneTransition {
        match self.selected().kind.clone() {
            NodeKind::Level(id) => {
                let Some(level) = ctx.levels.get(&id) else {
                    return SceneTransition::None;
                };
                if !ctx.levels.is_unlocked(&id, ctx.save.data()) {
                    let required = level.requires.clone().unwrap_or_default();
                    let name = ctx
                        .levels
                        .get(&required)
                        .map(|l| l.name.clone())
                        .unwrap_or(required);
                    ctx.toasts.push(format!("Complete {} first", name));
                    return SceneTransition::None;
                }
                SceneTransition::Push(Box::new(LootGameScene::new(level, ctx)))
            }
            NodeKind::DailyChest => {
                open_chest(ChestKind::Daily, ctx, Utc::now());
                SceneTransition::None
            }
            NodeKind::MonthlyChest => {
                open_chest(ChestKind::Monthly, ctx, Utc::now());
                SceneTransition::None
            }
            NodeKind::LevelSelect => SceneTransition::Push(Box::new(LevelSelectionScene::new(ctx))),
            NodeKind::Creative => SceneTransition::Push(Box::new(CreativeScene::new_level(ctx))),
        }
    }
}

impl Scene for OverworldScene {
    fn name(&self) -> &str {
        "overworld"
    }

    fn update(&mut self, input: &InputState, _dt: f32, ctx: &mut GameContext) -> SceneTransition {
        if input.was_pressed(Key::Back) {
            ctx.persist();
            return SceneTransition::Quit;
        }

        if let Some(direction) = input.direction_pressed() {
            if let Some(next) = self.selected().links.get(direction) {
                self.selected = next;
            }
        }

        if input.was_pressed(Key::Confirm) {
            return self.enter(ctx);
        }
        SceneTransition::None
    }

    /// The editor may have added levels, so the map is rebuilt
    fn resumed(&mut self, ctx: &mut GameContext) {
        let current = self.selected().id.clone();
        self.nodes = build_map(&ctx.levels);
        if !self.select(&current) {
            self.selected = 0;
        }
    }
}

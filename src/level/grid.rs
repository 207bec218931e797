use crate::collision::Rect;
use crate::color::Color;
use crate::entity::TILE_SIZE;
use serde::{Deserialize, Serialize};

/// Block types that can be placed on the level grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Stone,
    Dirt,
    Grass,
    Wood,
    Brick,
    Glass,
    Spikes,
}

impl BlockKind {
    pub const ALL: [BlockKind; 7] = [
        BlockKind::Stone,
        BlockKind::Dirt,
        BlockKind::Grass,
        BlockKind::Wood,
        BlockKind::Brick,
        BlockKind::Glass,
        BlockKind::Spikes,
    ];

    /// Everything blocks movement except spikes, which hurt instead
    pub fn is_solid(&self) -> bool {
        !matches!(self, BlockKind::Spikes)
    }

    pub fn is_hazard(&self) -> bool {
        matches!(self, BlockKind::Spikes)
    }

    /// Placeholder color for renderers without textures
    pub fn color(&self) -> Color {
        match self {
            BlockKind::Stone => Color::rgb(120, 120, 130),
            BlockKind::Dirt => Color::rgb(121, 85, 58),
            BlockKind::Grass => Color::rgb(76, 153, 0),
            BlockKind::Wood => Color::rgb(160, 110, 60),
            BlockKind::Brick => Color::rgb(170, 74, 68),
            BlockKind::Glass => Color::rgb(180, 220, 240),
            BlockKind::Spikes => Color::rgb(200, 200, 210),
        }
    }
}

/// Dense tile grid for one level.
///
/// Coordinates are in tiles with (0, 0) at the top-left. Reads outside the grid
/// return None and writes outside it are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockGrid {
    cells: Vec<Vec<Option<BlockKind>>>,
    pub width: usize,
    pub height: usize,
}

impl BlockGrid {
    pub fn new(width: usize, height: usize) -> Self {
        BlockGrid {
            cells: vec![vec![None; width]; height],
            width,
            height,
        }
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    pub fn get(&self, x: i32, y: i32) -> Option<BlockKind> {
        if !self.in_bounds(x, y) {
            return None;
        }
        self.cells[y as usize][x as usize]
    }

    /// Places a block, returning false when `(x, y)` is off the grid
    pub fn set(&mut self, x: i32, y: i32, kind: BlockKind) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.cells[y as usize][x as usize] = Some(kind);
        true
    }

    /// Removes a block, returning what was there
    pub fn clear(&mut self, x: i32, y: i32) -> Option<BlockKind> {
        if !self.in_bounds(x, y) {
            return None;
        }
        self.cells[y as usize][x as usize].take()
    }

    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * TILE_SIZE
    }

    pub fn pixel_height(&self) -> f32 {
        self.height as f32 * TILE_SIZE
    }

    pub fn tile_rect(x: i32, y: i32) -> Rect {
        Rect::new(x as f32 * TILE_SIZE, y as f32 * TILE_SIZE, TILE_SIZE, TILE_SIZE)
    }

    /// Tile coordinates containing a pixel position
    pub fn tile_at_pixel(x: f32, y: f32) -> (i32, i32) {
        ((x / TILE_SIZE).floor() as i32, (y / TILE_SIZE).floor() as i32)
    }

    /// Every placed block with its coordinates, row by row
    pub fn blocks(&self) -> impl Iterator<Item = (i32, i32, BlockKind)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(x, cell)| cell.map(|kind| (x as i32, y as i32, kind)))
        })
    }

    /// Tile range covered by `area`, padded by one tile on every side
    fn tiles_around(area: &Rect) -> (i32, i32, i32, i32) {
        let (x0, y0) = Self::tile_at_pixel(area.x, area.y);
        let (x1, y1) = Self::tile_at_pixel(area.right(), area.bottom());
        (x0 - 1, y0 - 1, x1 + 1, y1 + 1)
    }

    /// Rectangles of the solid blocks in and around `area`
    pub fn solid_rects_near(&self, area: &Rect) -> Vec<Rect> {
        let (x0, y0, x1, y1) = Self::tiles_around(area);
        let mut rects = Vec::new();

        for y in y0..=y1 {
            for x in x0..=x1 {
                if self.get(x, y).is_some_and(|kind| kind.is_solid()) {
                    rects.push(Self::tile_rect(x, y));
                }
            }
        }

        rects
    }

    pub fn is_solid_at_pixel(&self, x: f32, y: f32) -> bool {
        let (tx, ty) = Self::tile_at_pixel(x, y);
        self.get(tx, ty).is_some_and(|kind| kind.is_solid())
    }

    /// Whether `area` overlaps any hazard block
    pub fn hazard_overlap(&self, area: &Rect) -> bool {
        let (x0, y0, x1, y1) = Self::tiles_around(area);

        (y0..=y1).any(|y| {
            (x0..=x1).any(|x| {
                self.get(x, y).is_some_and(|kind| kind.is_hazard())
                    && Self::tile_rect(x, y).intersects(area)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut grid = BlockGrid::new(4, 3);
        assert!(!grid.set(-1, 0, BlockKind::Stone));
        assert!(!grid.set(4, 0, BlockKind::Stone));
        assert_eq!(grid.get(0, 3), None);
        assert_eq!(grid.clear(9, 9), None);

        assert!(grid.set(3, 2, BlockKind::Brick));
        assert_eq!(grid.get(3, 2), Some(BlockKind::Brick));
        assert_eq!(grid.clear(3, 2), Some(BlockKind::Brick));
        assert_eq!(grid.get(3, 2), None);
    }

    #[test]
    fn test_spikes_are_hazards_not_walls() {
        let mut grid = BlockGrid::new(4, 4);
        grid.set(1, 3, BlockKind::Spikes);
        grid.set(2, 3, BlockKind::Stone);

        let standing = Rect::new(32.0, 80.0, 20.0, 30.0);
        assert!(grid.hazard_overlap(&standing));
        assert_eq!(grid.solid_rects_near(&standing), vec![BlockGrid::tile_rect(2, 3)]);

        assert!(!grid.is_solid_at_pixel(40.0, 100.0));
        assert!(grid.is_solid_at_pixel(70.0, 100.0));
    }

    #[test]
    fn test_blocks_iterates_placed_cells() {
        let mut grid = BlockGrid::new(3, 2);
        grid.set(2, 0, BlockKind::Wood);
        grid.set(0, 1, BlockKind::Glass);

        let blocks: Vec<_> = grid.blocks().collect();
        assert_eq!(blocks, vec![(2, 0, BlockKind::Wood), (0, 1, BlockKind::Glass)]);
        assert_eq!(grid.pixel_width(), 96.0);
    }
}

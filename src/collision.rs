/// Collision detection for Amber Moon
///
/// Everything in the world is an axis-aligned rectangle in world pixels. Blocks, doors,
/// the player, mobs and pickups all expose a `Rect`, and the checks in this module are
/// pure functions over those rectangles.
///
/// # Architecture
///
/// - `Rect`: f32 rectangle (x, y = top-left corner)
/// - `Collidable` trait: anything with bounds
/// - AABB functions: intersection and penetration depth
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in world pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    #[serde(rename = "width")]
    pub w: f32,
    #[serde(rename = "height")]
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        aabb_intersect(self, other)
    }

    /// Point containment with an inclusive top-left and exclusive bottom-right edge.
    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Grows the rectangle by `amount` on every side.
    pub fn inflated(&self, amount: f32) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            self.w + amount * 2.0,
            self.h + amount * 2.0,
        )
    }

    /// Squared distance between the two centers.
    pub fn center_distance_sq(&self, other: &Rect) -> f32 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        (ax - bx).powi(2) + (ay - by).powi(2)
    }
}

/// Anything that occupies space in the level.
pub trait Collidable {
    fn bounds(&self) -> Rect;
}

impl Collidable for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

/// Checks if two axis-aligned bounding boxes intersect.
///
/// Touching edges do not count as an intersection. A player standing exactly on
/// top of a block is therefore not "inside" it.
pub fn aabb_intersect(a: &Rect, b: &Rect) -> bool {
    let x_overlap = a.x < b.right() && a.right() > b.x;
    let y_overlap = a.y < b.bottom() && a.bottom() > b.y;

    x_overlap && y_overlap
}

/// Calculates the signed penetration between two rectangles.
///
/// - `overlap_x`: positive if `a` sits to the left of `b` (push `a` left), negative otherwise
/// - `overlap_y`: positive if `a` sits above `b` (push `a` up), negative otherwise
///
/// Only meaningful if the rectangles intersect.
pub fn calculate_overlap(a: &Rect, b: &Rect) -> (f32, f32) {
    let overlap_x = if a.x <= b.x {
        a.right() - b.x
    } else {
        a.x - b.right()
    };

    let overlap_y = if a.y <= b.y {
        a.bottom() - b.y
    } else {
        a.y - b.bottom()
    };

    (overlap_x, overlap_y)
}

/// Returns the indices of everything in `others` that overlaps `entity`.
pub fn check_collisions_with_collection<T: Collidable>(
    entity: &impl Collidable,
    others: &[T],
) -> Vec<usize> {
    let entity_bounds = entity.bounds();

    others
        .iter()
        .enumerate()
        .filter(|(_, other)| aabb_intersect(&entity_bounds, &other.bounds()))
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_intersect_overlapping() {
        let rect_a = Rect::new(0.0, 0.0, 32.0, 32.0);
        let rect_b = Rect::new(16.0, 16.0, 32.0, 32.0);

        assert!(aabb_intersect(&rect_a, &rect_b));
        assert!(aabb_intersect(&rect_b, &rect_a));
    }

    #[test]
    fn test_aabb_intersect_touching_edges() {
        let rect_a = Rect::new(0.0, 0.0, 32.0, 32.0);
        let rect_b = Rect::new(32.0, 0.0, 32.0, 32.0);

        assert!(!aabb_intersect(&rect_a, &rect_b));
    }

    #[test]
    fn test_aabb_intersect_contained() {
        let large = Rect::new(0.0, 0.0, 100.0, 100.0);
        let small = Rect::new(25.0, 25.0, 50.0, 50.0);

        assert!(aabb_intersect(&large, &small));
        assert!(aabb_intersect(&small, &large));
    }

    #[test]
    fn test_calculate_overlap_horizontal() {
        let rect_a = Rect::new(0.0, 0.0, 32.0, 32.0);
        let rect_b = Rect::new(20.0, 0.0, 32.0, 32.0);

        let (overlap_x, overlap_y) = calculate_overlap(&rect_a, &rect_b);

        assert_eq!(overlap_x, 12.0);
        assert_eq!(overlap_y, 32.0);
    }

    #[test]
    fn test_calculate_overlap_from_right_is_negative() {
        let rect_a = Rect::new(20.0, 0.0, 32.0, 32.0);
        let rect_b = Rect::new(0.0, 0.0, 32.0, 32.0);

        let (overlap_x, _) = calculate_overlap(&rect_a, &rect_b);
        assert_eq!(overlap_x, -12.0);
    }

    #[test]
    fn test_contains_point_edges() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains_point(0.0, 0.0));
        assert!(!rect.contains_point(10.0, 5.0));
    }

    #[test]
    fn test_collection_check_returns_indices() {
        let player = Rect::new(0.0, 0.0, 10.0, 10.0);
        let others = vec![
            Rect::new(5.0, 5.0, 10.0, 10.0),
            Rect::new(50.0, 50.0, 10.0, 10.0),
            Rect::new(-5.0, 0.0, 6.0, 6.0),
        ];

        assert_eq!(check_collisions_with_collection(&player, &others), vec![0, 2]);
    }
}

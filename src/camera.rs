use crate::collision::Rect;
use crate::level::ParallaxLayer;

/// A viewport into the world, in world pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Camera {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Camera {
            x: 0.0,
            y: 0.0,
            viewport_width,
            viewport_height,
        }
    }

    /// Centers on `target`, clamped so the view never leaves a `world_width` x
    /// `world_height` world. A world smaller than the viewport is centered instead.
    pub fn follow(&mut self, target: &Rect, world_width: f32, world_height: f32) {
        let (cx, cy) = target.center();
        self.x = clamp_axis(cx - self.viewport_width / 2.0, self.viewport_width, world_width);
        self.y = clamp_axis(cy - self.viewport_height / 2.0, self.viewport_height, world_height);
    }

    pub fn view(&self) -> Rect {
        Rect::new(self.x, self.y, self.viewport_width, self.viewport_height)
    }

    /// Where a parallax layer is drawn; slower layers lag behind the world
    pub fn parallax_offset(&self, layer: &ParallaxLayer) -> (f32, f32) {
        (-self.x * layer.scroll_factor, layer.y_offset - self.y * layer.scroll_factor)
    }

    pub fn screen_to_world(&self, screen_x: f32, screen_y: f32) -> (f32, f32) {
        (screen_x + self.x, screen_y + self.y)
    }

    pub fn world_to_screen(&self, world_x: f32, world_y: f32) -> (f32, f32) {
        (world_x - self.x, world_y - self.y)
    }
}

fn clamp_axis(position: f32, viewport: f32, world: f32) -> f32 {
    if world <= viewport {
        (world - viewport) / 2.0
    } else {
        position.clamp(0.0, world - viewport)
    }
}

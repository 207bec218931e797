//! Frame-index animation shared by every world entity
//!
//! Doors, buttons and vaults all move through a short strip of frames while they change
//! state. `FrameAnimator` owns the fractional playhead for that strip; the renderer only
//! ever needs `frame()`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameAnimator {
    frame_count: usize,
    frames_per_second: f32,
    position: f32,
    looping: bool,
}

impl FrameAnimator {
    /// Creates a clamped animator sitting on frame 0.
    pub fn new(frame_count: usize, frames_per_second: f32) -> Self {
        FrameAnimator {
            frame_count: frame_count.max(1),
            frames_per_second,
            position: 0.0,
            looping: false,
        }
    }

    /// Creates an animator that wraps back to frame 0 after the last frame.
    pub fn looping(frame_count: usize, frames_per_second: f32) -> Self {
        FrameAnimator {
            looping: true,
            ..Self::new(frame_count, frames_per_second)
        }
    }

    fn last_position(&self) -> f32 {
        (self.frame_count - 1) as f32
    }

    /// Moves the playhead forward by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.position += self.frames_per_second * dt;

        if self.looping {
            self.position %= self.frame_count as f32;
        } else {
            self.position = self.position.min(self.last_position());
        }
    }

    /// Moves the playhead backward by `dt` seconds. Looping animators wrap.
    pub fn rewind(&mut self, dt: f32) {
        self.position -= self.frames_per_second * dt;

        if self.looping {
            self.position = self.position.rem_euclid(self.frame_count as f32);
        } else {
            self.position = self.position.max(0.0);
        }
    }

    /// Current whole frame index.
    pub fn frame(&self) -> usize {
        (self.position.floor() as usize).min(self.frame_count - 1)
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Playhead as a 0.0..=1.0 fraction of the strip.
    pub fn progress(&self) -> f32 {
        if self.frame_count <= 1 {
            1.0
        } else {
            self.position / self.last_position()
        }
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.last_position()
    }

    pub fn at_start(&self) -> bool {
        self.position <= 0.0
    }

    pub fn jump_to_end(&mut self) {
        self.position = self.last_position();
    }

    pub fn jump_to_start(&mut self) {
        self.position = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_clamps_at_last_frame() {
        let mut anim = FrameAnimator::new(4, 10.0);
        anim.advance(0.15);
        assert_eq!(anim.frame(), 1);

        anim.advance(5.0);
        assert_eq!(anim.frame(), 3);
        assert!(anim.at_end());
    }

    #[test]
    fn test_rewind_clamps_at_zero() {
        let mut anim = FrameAnimator::new(4, 10.0);
        anim.jump_to_end();
        anim.rewind(0.1);
        assert_eq!(anim.frame(), 2);

        anim.rewind(10.0);
        assert_eq!(anim.frame(), 0);
        assert!(anim.at_start());
    }

    #[test]
    fn test_looping_wraps() {
        let mut anim = FrameAnimator::looping(4, 4.0);
        anim.advance(1.25);
        assert_eq!(anim.frame(), 1);

        anim.rewind(0.5);
        assert_eq!(anim.frame(), 3);
    }

    #[test]
    fn test_single_frame_is_always_complete() {
        let anim = FrameAnimator::new(0, 10.0);
        assert_eq!(anim.frame_count(), 1);
        assert!(anim.at_end());
        assert_eq!(anim.progress(), 1.0);
    }
}

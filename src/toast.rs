//! Toast notifications
//!
//! Short status messages ("Inventory full", "Cloud save failed") shown one at a
//! time. The queue only tracks text and lifetime; a renderer reads `current()` and
//! `alpha()` each frame.

use std::collections::VecDeque;

/// Seconds a toast stays on screen
pub const TOAST_LIFETIME: f32 = 2.5;
/// The last part of the lifetime spent fading out
pub const TOAST_FADE: f32 = 0.5;
/// Older toasts are dropped past this many
pub const MAX_TOASTS: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub text: String,
    pub age: f32,
}

impl Toast {
    /// Opacity, 255 until the fade starts then linearly down to 0
    pub fn alpha(&self) -> u8 {
        let remaining = (TOAST_LIFETIME - self.age).max(0.0);
        if remaining >= TOAST_FADE {
            255
        } else {
            (remaining / TOAST_FADE * 255.0) as u8
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: impl Into<String>) {
        let text = text.into();
        log::debug!("Toast: {}", text);

        self.toasts.push_back(Toast { text, age: 0.0 });
        while self.toasts.len() > MAX_TOASTS {
            self.toasts.pop_front();
        }
    }

    /// Ages the visible toast and moves on when it expires
    pub fn update(&mut self, dt: f32) {
        if let Some(front) = self.toasts.front_mut() {
            front.age += dt;
            if front.age >= TOAST_LIFETIME {
                self.toasts.pop_front();
            }
        }
    }

    /// The toast on screen right now
    pub fn current(&self) -> Option<&Toast> {
        self.toasts.front()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Every queued message, oldest first
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.toasts.iter().map(|toast| toast.text.as_str())
    }
}

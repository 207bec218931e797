//! Health and status effects
//!
//! Both the player and mobs carry a `Health` pool and a set of `ActiveEffects`.
//! Items attach status effects (a poisoned dagger, a regeneration potion), which end up
//! here once they land on a target.
//!
//! # Design Notes
//!
//! - All values are f32 so damage-over-time can apply fractional amounts per frame
//! - Re-applying an effect refreshes it instead of stacking a second copy

use serde::{Deserialize, Serialize};

/// A character's health points.
///
/// # Example
///
/// ```rust
/// use amber_moon::stats::Health;
///
/// let mut health = Health::new(100.0);
/// health.take_damage(30.0);
/// assert_eq!(health.current(), 70.0);
/// assert_eq!(health.percentage(), 0.7);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Health {
    /// Creates a new Health instance with full health
    pub fn new(max: f32) -> Self {
        Health { current: max, max }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Returns health as a percentage (0.0 to 1.0)
    pub fn percentage(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Applies damage to health
    ///
    /// Returns how much was actually dealt, whether it was fatal, and the overkill.
    pub fn take_damage(&mut self, amount: f32) -> DamageResult {
        if amount <= 0.0 {
            return DamageResult::no_damage();
        }

        let old_health = self.current;
        self.current = (self.current - amount).max(0.0);

        DamageResult {
            damage_dealt: old_health - self.current,
            is_fatal: self.current <= 0.0,
            overkill: if self.current <= 0.0 {
                amount - old_health
            } else {
                0.0
            },
        }
    }

    /// Heals health, capped at max health
    ///
    /// Returns the amount actually healed.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if amount <= 0.0 {
            return 0.0;
        }
        let old_health = self.current;
        self.current = (self.current + amount).min(self.max);
        self.current - old_health
    }

    /// Restores health to max (used on respawn)
    pub fn reset(&mut self) {
        self.current = self.max;
    }
}

/// Result of a damage operation
#[derive(Debug, Clone, PartialEq)]
pub struct DamageResult {
    /// Actual damage dealt (may be less than requested if target had less health)
    pub damage_dealt: f32,
    /// Whether this damage killed the target
    pub is_fatal: bool,
    /// Excess damage beyond what was needed to kill (0.0 if not fatal)
    pub overkill: f32,
}

impl DamageResult {
    pub fn no_damage() -> Self {
        DamageResult {
            damage_dealt: 0.0,
            is_fatal: false,
            overkill: 0.0,
        }
    }
}

/// Kinds of timed effects an item can attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusEffectKind {
    /// Lose `magnitude` HP per second
    Poison,
    /// Lose `magnitude` HP per second
    Burn,
    /// Movement halved
    Freeze,
    /// Gain `magnitude` HP per second
    Regeneration,
    /// Attacks deal `magnitude` extra damage
    Strength,
    /// Movement multiplied by `1 + magnitude`
    Swiftness,
}

/// A status effect as it is described on an item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusEffectAttachment {
    pub kind: StatusEffectKind,
    /// Seconds
    pub duration: f32,
    pub magnitude: f32,
}

/// A status effect currently running on a target.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveEffect {
    pub kind: StatusEffectKind,
    pub remaining: f32,
    pub magnitude: f32,
}

/// All effects currently applied to one target.
#[derive(Debug, Clone, Default)]
pub struct ActiveEffects {
    effects: Vec<ActiveEffect>,
}

impl ActiveEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies an effect.
    ///
    /// An effect of the same kind is refreshed: the longer duration and the larger
    /// magnitude win.
    pub fn apply(&mut self, attachment: &StatusEffectAttachment) {
        if attachment.duration <= 0.0 {
            return;
        }

        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == attachment.kind) {
            existing.remaining = existing.remaining.max(attachment.duration);
            existing.magnitude = existing.magnitude.max(attachment.magnitude);
        } else {
            self.effects.push(ActiveEffect {
                kind: attachment.kind,
                remaining: attachment.duration,
                magnitude: attachment.magnitude,
            });
        }
    }

    /// Advances every effect by `dt` seconds.
    ///
    /// Returns the net health change for this tick (negative for damage-over-time).
    /// Effects that run out are removed after contributing their final slice.
    pub fn tick(&mut self, dt: f32) -> f32 {
        let mut delta = 0.0;

        for effect in &mut self.effects {
            let slice = dt.min(effect.remaining);
            match effect.kind {
                StatusEffectKind::Poison | StatusEffectKind::Burn => {
                    delta -= effect.magnitude * slice;
                }
                StatusEffectKind::Regeneration => {
                    delta += effect.magnitude * slice;
                }
                _ => {}
            }
            effect.remaining -= dt;
        }

        self.effects.retain(|e| e.remaining > 0.0);
        delta
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.effects.iter().fold(1.0, |acc, effect| match effect.kind {
            StatusEffectKind::Freeze => acc * 0.5,
            StatusEffectKind::Swiftness => acc * (1.0 + effect.magnitude),
            _ => acc,
        })
    }

    pub fn damage_bonus(&self) -> f32 {
        self.effects
            .iter()
            .filter(|e| e.kind == StatusEffectKind::Strength)
            .map(|e| e.magnitude)
            .sum()
    }

    pub fn has(&self, kind: StatusEffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.effects.iter()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}

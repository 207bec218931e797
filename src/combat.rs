//! Damage calculation
//!
//! This module sits on top of `stats` and decides how much of a hit actually lands:
//! - Damage types (Physical is reduced by defense, True is not)
//! - Damage sources (for logging and death messages)
//! - Melee hitboxes in front of an attacker

use crate::collision::Rect;

/// Types of damage that can be dealt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageType {
    /// Reduced by defense, never below 1
    Physical,
    /// Ignores all defenses (spikes, damage-over-time)
    True,
}

/// Source of damage for tracking and game logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageSource {
    Player,
    Mob,
    Hazard,
    StatusEffect,
}

/// Which way a character is looking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn reversed(&self) -> Facing {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// A complete damage event with type and source information
#[derive(Debug, Clone, PartialEq)]
pub struct DamageEvent {
    /// Base damage amount (before defense)
    pub amount: f32,
    pub damage_type: DamageType,
    pub source: DamageSource,
}

impl DamageEvent {
    pub fn physical(amount: f32, source: DamageSource) -> Self {
        DamageEvent {
            amount,
            damage_type: DamageType::Physical,
            source,
        }
    }

    pub fn true_damage(amount: f32, source: DamageSource) -> Self {
        DamageEvent {
            amount,
            damage_type: DamageType::True,
            source,
        }
    }
}

/// Calculates final damage after applying defense
///
/// # Formula
///
/// - **Physical**: `max(amount - defense, 1)`, so armor never makes a hit free
/// - **True**: `amount`
///
/// Zero or negative amounts always deal nothing.
pub fn calculate_damage(event: &DamageEvent, defense: f32) -> f32 {
    if event.amount <= 0.0 {
        return 0.0;
    }

    match event.damage_type {
        DamageType::Physical => (event.amount - defense.max(0.0)).max(1.0),
        DamageType::True => event.amount,
    }
}

/// Builds the melee hitbox in front of an attacker.
///
/// The box is `range` wide, as tall as the attacker, and starts at the attacker's
/// leading edge.
pub fn melee_hitbox(attacker: &Rect, facing: Facing, range: f32) -> Rect {
    let x = match facing {
        Facing::Right => attacker.right(),
        Facing::Left => attacker.x - range,
    };
    Rect::new(x, attacker.y, range, attacker.h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physical_damage_reduced_by_defense() {
        let event = DamageEvent::physical(10.0, DamageSource::Mob);
        assert_eq!(calculate_damage(&event, 3.0), 7.0);
    }

    #[test]
    fn test_physical_damage_floors_at_one() {
        let event = DamageEvent::physical(2.0, DamageSource::Mob);
        assert_eq!(calculate_damage(&event, 50.0), 1.0);
    }

    #[test]
    fn test_true_damage_ignores_defense() {
        let event = DamageEvent::true_damage(5.0, DamageSource::Hazard);
        assert_eq!(calculate_damage(&event, 100.0), 5.0);
    }

    #[test]
    fn test_zero_damage_stays_zero() {
        let event = DamageEvent::physical(0.0, DamageSource::Player);
        assert_eq!(calculate_damage(&event, 0.0), 0.0);
    }

    #[test]
    fn test_melee_hitbox_direction() {
        let body = Rect::new(100.0, 50.0, 20.0, 30.0);

        let right = melee_hitbox(&body, Facing::Right, 24.0);
        assert_eq!(right, Rect::new(120.0, 50.0, 24.0, 30.0));

        let left = melee_hitbox(&body, Facing::Left, 24.0);
        assert_eq!(left, Rect::new(76.0, 50.0, 24.0, 30.0));
    }
}

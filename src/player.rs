use crate::collision::{Collidable, Rect};
use crate::combat::{DamageEvent, Facing, calculate_damage, melee_hitbox};
use crate::config::PhysicsConfig;
use crate::input::{InputState, Key};
use crate::stats::{ActiveEffects, DamageResult, Health};

pub const PLAYER_WIDTH: f32 = 20.0;
pub const PLAYER_HEIGHT: f32 = 30.0;
pub const PLAYER_MAX_HEALTH: f32 = 20.0;

/// Seconds between swings
pub const ATTACK_COOLDOWN: f32 = 0.35;
/// Seconds of invulnerability after taking a hit
pub const HIT_INVULNERABILITY: f32 = 1.0;
const MELEE_RANGE: f32 = 28.0;

/// The player's platformer body.
///
/// Movement is split into `apply_input` (intent) and `step` (physics), so the
/// world can collect nearby solids between the two.
#[derive(Debug, Clone)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub on_ground: bool,
    pub facing: Facing,
    pub health: Health,
    pub effects: ActiveEffects,
    attack_cooldown: f32,
    invulnerable: f32,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Player {
            x,
            y,
            velocity_x: 0.0,
            velocity_y: 0.0,
            on_ground: false,
            facing: Facing::Right,
            health: Health::new(PLAYER_MAX_HEALTH),
            effects: ActiveEffects::new(),
            attack_cooldown: 0.0,
            invulnerable: 0.0,
        }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn velocity(&self) -> (f32, f32) {
        (self.velocity_x, self.velocity_y)
    }

    /// Turns held keys into horizontal velocity and a jump
    ///
    /// Jumping only works from the ground; holding Jump in the air does nothing.
    pub fn apply_input(&mut self, input: &InputState, physics: &PhysicsConfig, speed_multiplier: f32) {
        let axis = input.axis_x();
        self.velocity_x = axis * physics.move_speed * speed_multiplier;

        if axis < 0.0 {
            self.facing = Facing::Left;
        } else if axis > 0.0 {
            self.facing = Facing::Right;
        }

        if input.was_pressed(Key::Jump) && self.on_ground {
            self.velocity_y = -physics.jump_velocity;
            self.on_ground = false;
        }
    }

    /// Integrates gravity and velocity, resolving collisions one axis at a time
    pub fn step(&mut self, dt: f32, physics: &PhysicsConfig, solids: &[Rect]) {
        self.velocity_y = (self.velocity_y + physics.gravity * dt).min(physics.max_fall_speed);

        self.x += self.velocity_x * dt;
        for solid in solids {
            let body = self.bounds();
            if !body.intersects(solid) {
                continue;
            }
            if self.velocity_x > 0.0 {
                self.x = solid.x - PLAYER_WIDTH;
            } else if self.velocity_x < 0.0 {
                self.x = solid.right();
            }
        }

        self.y += self.velocity_y * dt;
        self.on_ground = false;
        for solid in solids {
            let body = self.bounds();
            if !body.intersects(solid) {
                continue;
            }
            if self.velocity_y > 0.0 {
                self.y = solid.y - PLAYER_HEIGHT;
                self.on_ground = true;
            } else if self.velocity_y < 0.0 {
                self.y = solid.bottom();
            }
            self.velocity_y = 0.0;
        }
    }

    /// Counts down cooldowns and applies status effects
    ///
    /// Returns the health change caused by effects this tick.
    pub fn tick(&mut self, dt: f32) -> f32 {
        self.attack_cooldown = (self.attack_cooldown - dt).max(0.0);
        self.invulnerable = (self.invulnerable - dt).max(0.0);

        let delta = self.effects.tick(dt);
        if delta < 0.0 {
            self.health.take_damage(-delta);
        } else if delta > 0.0 {
            self.health.heal(delta);
        }
        delta
    }

    /// Starts an attack if the last one has cooled down, then waits `cooldown` seconds
    pub fn try_attack(&mut self, cooldown: f32) -> bool {
        if self.attack_cooldown > 0.0 {
            return false;
        }
        self.attack_cooldown = cooldown;
        true
    }

    pub fn melee_hitbox(&self) -> Rect {
        melee_hitbox(&self.bounds(), self.facing, MELEE_RANGE)
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable > 0.0
    }

    /// Applies a hit after armor, then grants a short invulnerability window
    pub fn take_hit(&mut self, event: &DamageEvent, defense: f32) -> DamageResult {
        if self.is_invulnerable() || !self.health.is_alive() {
            return DamageResult::no_damage();
        }

        let amount = calculate_damage(event, defense);
        let result = self.health.take_damage(amount);
        self.invulnerable = HIT_INVULNERABILITY;
        log::debug!(
            "Player took {:.1} damage from {:?} ({:.1} left)",
            result.damage_dealt,
            event.source,
            self.health.current()
        );
        result
    }

    pub fn is_dead(&self) -> bool {
        !self.health.is_alive()
    }

    /// Puts the player back at `(x, y)` with full health and no effects
    pub fn respawn(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.velocity_x = 0.0;
        self.velocity_y = 0.0;
        self.on_ground = false;
        self.health.reset();
        self.effects.clear();
        self.attack_cooldown = 0.0;
        self.invulnerable = 0.0;
    }
}

impl Collidable for Player {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, PLAYER_WIDTH, PLAYER_HEIGHT)
    }
}

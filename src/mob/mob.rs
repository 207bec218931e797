use super::template::MobTemplate;
use crate::animation::FrameAnimator;
use crate::collision::{Collidable, Rect};
use crate::combat::{DamageEvent, DamageSource, Facing, calculate_damage};
use crate::config::PhysicsConfig;
use crate::item::{Item, ItemRegistry};
use crate::loot::LootTable;
use crate::stats::{ActiveEffects, DamageResult, Health, StatusEffectAttachment};
use rand::Rng;

/// Seconds a mob stays stunned and immune after a hit
pub const MOB_INVULNERABILITY: f32 = 0.4;

const WALK_FRAMES: usize = 4;
const WALK_FPS: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MobState {
    /// Walking back and forth
    Patrol,
    /// Knocked back by a hit, not moving
    Hurt,
    Dead,
}

/// A live mob in a level.
#[derive(Debug, Clone)]
pub struct Mob {
    pub template_id: String,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub velocity_y: f32,
    pub width: f32,
    pub height: f32,
    pub facing: Facing,
    pub state: MobState,
    pub health: Health,
    pub effects: ActiveEffects,
    pub on_ground: bool,
    speed: f32,
    defense: f32,
    contact_damage: f32,
    flying: bool,
    drops: LootTable,
    invulnerable: f32,
    animator: FrameAnimator,
}

impl Mob {
    pub fn from_template(template: &MobTemplate, x: f32, y: f32) -> Self {
        Mob {
            template_id: template.id.clone(),
            name: template.name.clone(),
            x,
            y,
            velocity_y: 0.0,
            width: template.width,
            height: template.height,
            facing: Facing::Left,
            state: MobState::Patrol,
            health: Health::new(template.max_health),
            effects: ActiveEffects::new(),
            on_ground: false,
            speed: template.speed,
            defense: template.defense,
            contact_damage: template.contact_damage,
            flying: template.flying,
            drops: template.loot_table(),
            invulnerable: 0.0,
            animator: FrameAnimator::looping(WALK_FRAMES, WALK_FPS),
        }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn frame(&self) -> usize {
        self.animator.frame()
    }

    pub fn is_dead(&self) -> bool {
        self.state == MobState::Dead
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable > 0.0
    }

    /// The hit this mob deals when it touches the player
    pub fn contact_hit(&self) -> DamageEvent {
        DamageEvent::physical(self.contact_damage, DamageSource::Mob)
    }

    /// Advances AI, physics and status effects
    ///
    /// `solids` are the obstacles near the mob. `solid_at(x, y)` probes the
    /// terrain for ledge detection.
    pub fn update<F>(&mut self, dt: f32, physics: &PhysicsConfig, solids: &[Rect], solid_at: F)
    where
        F: Fn(f32, f32) -> bool,
    {
        if self.is_dead() {
            return;
        }

        let delta = self.effects.tick(dt);
        if delta < 0.0 {
            self.health.take_damage(-delta);
        } else if delta > 0.0 {
            self.health.heal(delta);
        }
        if !self.health.is_alive() {
            self.die();
            return;
        }

        self.invulnerable = (self.invulnerable - dt).max(0.0);
        if self.state == MobState::Hurt && !self.is_invulnerable() {
            self.state = MobState::Patrol;
        }

        let speed = match self.state {
            MobState::Patrol => self.speed * self.effects.speed_multiplier(),
            MobState::Hurt | MobState::Dead => 0.0,
        };
        if speed > 0.0 {
            self.animator.advance(dt);
        }

        self.x += self.facing.sign() * speed * dt;
        let mut blocked = false;
        for solid in solids {
            if !self.bounds().intersects(solid) {
                continue;
            }
            match self.facing {
                Facing::Right => self.x = solid.x - self.width,
                Facing::Left => self.x = solid.right(),
            }
            blocked = true;
        }

        if !self.flying {
            self.velocity_y = (self.velocity_y + physics.gravity * dt).min(physics.max_fall_speed);
            self.y += self.velocity_y * dt;
            self.on_ground = false;
            for solid in solids {
                if !self.bounds().intersects(solid) {
                    continue;
                }
                if self.velocity_y > 0.0 {
                    self.y = solid.y - self.height;
                    self.on_ground = true;
                } else if self.velocity_y < 0.0 {
                    self.y = solid.bottom();
                }
                self.velocity_y = 0.0;
            }
        }

        let at_ledge = !self.flying && self.on_ground && {
            let probe_x = match self.facing {
                Facing::Right => self.x + self.width + 1.0,
                Facing::Left => self.x - 1.0,
            };
            !solid_at(probe_x, self.y + self.height + 1.0)
        };

        if blocked || at_ledge {
            self.facing = self.facing.reversed();
        }
    }

    /// Applies a hit from the player
    ///
    /// Hits during the invulnerability window are ignored. A weapon's status
    /// effect is applied along with the damage.
    pub fn take_hit(&mut self, event: &DamageEvent, effect: Option<&StatusEffectAttachment>) -> DamageResult {
        if self.is_dead() || self.is_invulnerable() {
            return DamageResult::no_damage();
        }

        let amount = calculate_damage(event, self.defense);
        let result = self.health.take_damage(amount);
        if let Some(effect) = effect {
            self.effects.apply(effect);
        }

        if result.is_fatal {
            self.die();
        } else {
            self.state = MobState::Hurt;
            self.invulnerable = MOB_INVULNERABILITY;
        }
        result
    }

    fn die(&mut self) {
        self.state = MobState::Dead;
        self.effects.clear();
        log::debug!("{} died at ({:.0}, {:.0})", self.name, self.x, self.y);
    }

    /// Rolls this mob's drop table
    pub fn roll_drops<R: Rng>(&self, rng: &mut R, registry: &ItemRegistry) -> Option<Item> {
        self.drops.roll(rng, registry)
    }
}

impl Collidable for Mob {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mob::MobRegistry;
    use crate::stats::StatusEffectKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const DT: f32 = 1.0 / 60.0;

    fn slime_at(x: f32, y: f32) -> Mob {
        MobRegistry::create_default().create("slime", x, y).unwrap()
    }

    fn run(mob: &mut Mob, solids: &[Rect], seconds: f32) {
        let physics = PhysicsConfig::default();
        let ground = |x: f32, y: f32| solids.iter().any(|s| s.contains_point(x, y));
        for _ in 0..(seconds / DT) as usize {
            mob.update(DT, &physics, solids, ground);
        }
    }

    #[test]
    fn test_turns_around_at_wall() {
        let solids = vec![
            Rect::new(0.0, 100.0, 640.0, 32.0),
            Rect::new(0.0, 0.0, 32.0, 100.0),
        ];
        let mut mob = slime_at(100.0, 84.0);
        assert_eq!(mob.facing, Facing::Left);

        run(&mut mob, &solids, 3.0);
        assert_eq!(mob.facing, Facing::Right);
        assert!(mob.x >= 32.0);
    }

    #[test]
    fn test_turns_around_at_ledge() {
        let solids = vec![Rect::new(64.0, 100.0, 128.0, 32.0)];
        let mut mob = slime_at(100.0, 84.0);

        run(&mut mob, &solids, 1.5);
        assert_eq!(mob.facing, Facing::Right);
        assert!(mob.on_ground);
        assert!(mob.x >= 63.0);
    }

    #[test]
    fn test_hit_window_and_death() {
        let mut mob = slime_at(0.0, 0.0);
        let hit = DamageEvent::physical(4.0, DamageSource::Player);

        assert_eq!(mob.take_hit(&hit, None).damage_dealt, 4.0);
        assert_eq!(mob.state, MobState::Hurt);
        assert_eq!(mob.take_hit(&hit, None).damage_dealt, 0.0);

        run(&mut mob, &[], MOB_INVULNERABILITY + 0.05);
        assert_eq!(mob.state, MobState::Patrol);

        assert!(mob.take_hit(&hit, None).is_fatal);
        assert!(mob.is_dead());
    }

    #[test]
    fn test_poison_can_kill() {
        let mut mob = slime_at(0.0, 0.0);
        let poison = StatusEffectAttachment {
            kind: StatusEffectKind::Poison,
            duration: 10.0,
            magnitude: 2.0,
        };
        mob.take_hit(&DamageEvent::physical(1.0, DamageSource::Player), Some(&poison));
        assert!(mob.effects.has(StatusEffectKind::Poison));

        run(&mut mob, &[], 4.0);
        assert!(mob.is_dead());
    }

    #[test]
    fn test_drops_come_from_table() {
        let items = ItemRegistry::create_default();
        let golem = MobRegistry::create_default().create("stone_golem", 0.0, 0.0).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let drop = golem.roll_drops(&mut rng, &items).unwrap();
            assert!(["iron_ore", "amber_shard", "sapphire"].contains(&drop.id()));
        }
    }
}

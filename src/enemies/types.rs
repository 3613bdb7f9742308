//! Enemy templates and pooled enemy instances.

use crate::core::geometry::{Rect, Vec2};
use crate::pool::Poolable;
use crate::stats::CurrencyId;
use serde::{Deserialize, Serialize};

/// One possible payout of a rainbow enemy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RainbowDrop {
    pub currency: CurrencyId,
    pub base_amount: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EnemyBehavior {
    /// Walks in a fixed direction chosen at spawn.
    #[default]
    Straight,
    /// Homes toward its arrival point while circling.
    Wandering {
        circle_radius: f32,
        /// Rotations per second.
        circle_speed: f32,
    },
    /// Splits into `count` enemies of template `child` on death.
    Splitting { child: String, count: u32 },
    /// Drops one randomly picked currency, scaled by stage instead of the
    /// currency multiplier table.
    Rainbow { drops: Vec<RainbowDrop> },
}

impl EnemyBehavior {
    pub fn split_child(&self) -> Option<&str> {
        match self {
            EnemyBehavior::Splitting { child, .. } => Some(child),
            _ => None,
        }
    }
}

fn default_reflection_multiplier() -> f32 {
    1.0
}

fn default_move_speed() -> f32 {
    2.0
}

/// Authored enemy data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnemyTemplate {
    pub id: String,
    pub hp: i32,
    pub currency: CurrencyId,
    #[serde(default)]
    pub base_currency_amount: i32,
    #[serde(default = "default_reflection_multiplier")]
    pub reflection_multiplier: f32,
    #[serde(default)]
    pub exp: i32,
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,
    /// Collision box size; `None` means the enemy is a point.
    #[serde(default)]
    pub collision_size: Option<Vec2>,
    /// Rewards wait for the host to report the death animation finished.
    #[serde(default)]
    pub awaits_death_animation: bool,
    #[serde(default)]
    pub behavior: EnemyBehavior,
}

impl EnemyTemplate {
    pub fn new(id: &str, hp: i32, currency: CurrencyId, base_currency_amount: i32) -> Self {
        Self {
            id: id.to_string(),
            hp,
            currency,
            base_currency_amount,
            reflection_multiplier: 1.0,
            exp: 10,
            move_speed: default_move_speed(),
            collision_size: Some(Vec2::new(0.8, 0.8)),
            awaits_death_animation: false,
            behavior: EnemyBehavior::Straight,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyState {
    /// In the pool, not in play.
    Inactive,
    Alive,
    /// Health reached zero; rewards are pending.
    Dying,
}

/// What a hit did to an enemy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitOutcome {
    Hurt { health_fraction: f32 },
    Killed,
    /// The enemy was not alive; nothing happened.
    Ignored,
}

/// A live enemy. Pools hold one prototype per template and clone it on growth.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub template: EnemyTemplate,
    pub is_boss: bool,
    pub position: Vec2,
    pub target: Vec2,
    pub state: EnemyState,
    pub max_health: i32,
    pub health: i32,
    /// Seconds since spawn.
    pub age: f64,
    pub(crate) direction: Option<Vec2>,
    pub(crate) circle_angle: f32,
    pub(crate) stage_reflection: f32,
    pub(crate) enrage_health_fraction: f32,
    pub(crate) enrage_multiplier: f32,
}

impl Enemy {
    pub fn new(template: EnemyTemplate) -> Self {
        let max_health = template.hp.max(1);
        Self {
            template,
            is_boss: false,
            position: Vec2::ZERO,
            target: Vec2::ZERO,
            state: EnemyState::Inactive,
            max_health,
            health: max_health,
            age: 0.0,
            direction: None,
            circle_angle: 0.0,
            stage_reflection: 1.0,
            enrage_health_fraction: 0.0,
            enrage_multiplier: 1.0,
        }
    }

    /// A boss that enrages below `enrage_health_fraction`.
    pub fn boss(template: EnemyTemplate, enrage_health_fraction: f32, enrage_multiplier: f32) -> Self {
        let mut enemy = Self::new(template);
        enemy.is_boss = true;
        enemy.enrage_health_fraction = enrage_health_fraction;
        enemy.enrage_multiplier = enrage_multiplier;
        enemy
    }

    /// Resets per-life state. Call right after the instance is placed.
    pub fn spawn(&mut self, target: Vec2, health_multiplier: f32, reflection_multiplier: f32, circle_angle: f32) {
        let scaled = (self.template.hp as f32 * health_multiplier).round_ties_even();
        self.max_health = (scaled as i32).max(1);
        self.health = self.max_health;
        self.target = target;
        self.state = EnemyState::Alive;
        self.age = 0.0;
        self.direction = None;
        self.circle_angle = circle_angle;
        self.stage_reflection = reflection_multiplier;
    }

    pub fn is_alive(&self) -> bool {
        self.state == EnemyState::Alive
    }

    pub fn is_dying(&self) -> bool {
        self.state == EnemyState::Dying
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        (self.health.max(0) as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }

    pub fn is_enraged(&self) -> bool {
        self.is_boss && self.is_alive() && self.health_fraction() < self.enrage_health_fraction
    }

    /// Per-hit reflection multiplier: template × stage × enrage.
    pub fn reflection_multiplier(&self) -> f32 {
        let base = self.template.reflection_multiplier * self.stage_reflection;
        if self.is_enraged() {
            base * self.enrage_multiplier
        } else {
            base
        }
    }

    /// Collision box centred on the position, if the template has one.
    pub fn bounds(&self) -> Option<Rect> {
        self.template
            .collision_size
            .map(|size| Rect::from_center_size(self.position, size))
    }

    /// Whether any part of the enemy lies inside `area`.
    pub fn overlaps(&self, area: &Rect) -> bool {
        match self.bounds() {
            Some(b) => b.overlaps(area),
            None => area.contains(self.position),
        }
    }

    pub fn take_damage(&mut self, amount: i32) -> HitOutcome {
        if !self.is_alive() {
            return HitOutcome::Ignored;
        }
        self.health = self.health.saturating_sub(amount.max(0));
        if self.health <= 0 {
            self.state = EnemyState::Dying;
            HitOutcome::Killed
        } else {
            HitOutcome::Hurt {
                health_fraction: self.health_fraction(),
            }
        }
    }
}

impl Poolable for Enemy {
    fn on_acquire(&mut self, position: Vec2, _rotation: f32) {
        self.position = position;
        self.state = EnemyState::Alive;
        self.age = 0.0;
        self.direction = None;
    }

    fn on_release(&mut self) {
        self.state = EnemyState::Inactive;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slime(hp: i32) -> Enemy {
        let mut e = Enemy::new(EnemyTemplate::new("slime", hp, CurrencyId::BlueBits, 1));
        e.spawn(Vec2::ZERO, 1.0, 1.0, 0.0);
        e
    }

    #[test]
    fn test_spawn_scales_health_by_stage() {
        let mut e = Enemy::new(EnemyTemplate::new("slime", 20, CurrencyId::BlueBits, 1));
        e.spawn(Vec2::ZERO, 1.5, 1.0, 0.0);
        assert_eq!(e.max_health, 30);
        assert_eq!(e.health, 30);
        assert!(e.is_alive());
    }

    #[test]
    fn test_spawn_health_rounds_half_even() {
        let mut e = Enemy::new(EnemyTemplate::new("slime", 5, CurrencyId::BlueBits, 1));
        e.spawn(Vec2::ZERO, 0.5, 1.0, 0.0);
        assert_eq!(e.max_health, 2);
    }

    #[test]
    fn test_lethal_hit_moves_to_dying() {
        let mut e = slime(20);
        assert_eq!(e.take_damage(25), HitOutcome::Killed);
        assert!(e.health <= 0);
        assert!(e.is_dying());
    }

    #[test]
    fn test_dying_enemy_ignores_hits() {
        let mut e = slime(20);
        e.take_damage(25);
        assert_eq!(e.take_damage(5), HitOutcome::Ignored);
    }

    #[test]
    fn test_hurt_reports_fraction() {
        let mut e = slime(20);
        assert_eq!(
            e.take_damage(5),
            HitOutcome::Hurt {
                health_fraction: 0.75
            }
        );
    }

    #[test]
    fn test_overlap_point_enemy() {
        let mut e = slime(10);
        e.template.collision_size = None;
        e.position = Vec2::new(0.5, 0.5);
        let area = Rect::from_center_size(Vec2::ZERO, Vec2::new(2.0, 2.0));
        assert!(e.overlaps(&area));
        e.position = Vec2::new(1.5, 0.0);
        assert!(!e.overlaps(&area));
    }

    #[test]
    fn test_overlap_uses_bounds() {
        let mut e = slime(10);
        e.position = Vec2::new(1.3, 0.0); // box reaches x = 0.9
        let area = Rect::from_center_size(Vec2::ZERO, Vec2::new(2.0, 2.0));
        assert!(e.overlaps(&area));
    }

    #[test]
    fn test_boss_enrage_multiplies_reflection() {
        let mut template = EnemyTemplate::new("boss", 100, CurrencyId::PinkBits, 10);
        template.reflection_multiplier = 2.0;
        let mut boss = Enemy::boss(template, 0.3, 2.0);
        boss.spawn(Vec2::ZERO, 1.0, 1.5, 0.0);
        assert!((boss.reflection_multiplier() - 3.0).abs() < 1e-6);
        boss.take_damage(75);
        assert!(boss.is_enraged());
        assert!((boss.reflection_multiplier() - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_normal_enemy_never_enrages() {
        let mut e = slime(100);
        e.take_damage(99);
        assert!(!e.is_enraged());
    }

    #[test]
    fn test_behavior_json_tagged() {
        let json = r#"{ "kind": "splitting", "child": "small", "count": 2 }"#;
        let b: EnemyBehavior = serde_json::from_str(json).unwrap();
        assert_eq!(b.split_child(), Some("small"));
    }
}

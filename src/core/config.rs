//! Balance configuration and authored content.
//!
//! All structs accept partial JSON: missing fields fall back to the shipped
//! defaults through `#[serde(default)]`.

use super::constants::*;
use super::error::ConfigError;
use super::geometry::{Rect, Vec2};
use crate::enemies::{default_roster, EnemyTemplate};
use crate::spawning::{default_stages, StageSpawnConfig};
use crate::upgrades::{default_catalog, UpgradeDefinition};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How spawn entries share the spawner's accumulator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SpawnTimerMode {
    /// One accumulator for all entries, reset when it reaches the largest
    /// unmodified interval. An entry whose interval has elapsed keeps firing
    /// every tick until that reset.
    #[default]
    SharedReset,
    /// Each entry has its own accumulator and fires once per interval.
    Independent,
}

/// Top-level balance knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub exp_per_level: i32,
    pub base_attack_period: f64,
    pub min_attack_period: f64,
    pub hp_loss_interval: f64,
    pub min_damage_after_armor: i32,
    pub base_attack_size: f32,
    /// Footprint multiplier per area level, index 0 = level 0.
    pub attack_size_multipliers: Vec<f32>,
    pub enemy_health_multipliers: Vec<f32>,
    pub enemy_reflection_multipliers: Vec<f32>,
    pub enemy_currency_multipliers: Vec<f32>,
    pub base_pickup_radius: f32,
    pub pickup_distance_threshold: f32,
    pub drop_fly_time: f64,
    pub drop_max_speed: f32,
    pub drop_acceleration: f32,
    pub spawn_timer_mode: SpawnTimerMode,
    pub arena: ArenaConfig,
    pub boss: BossConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            exp_per_level: EXP_PER_LEVEL_MULTIPLIER,
            base_attack_period: BASE_ATTACK_PERIOD_SECONDS,
            min_attack_period: MIN_ATTACK_PERIOD_SECONDS,
            hp_loss_interval: HP_LOSS_INTERVAL_SECONDS,
            min_damage_after_armor: MIN_DAMAGE_AFTER_ARMOR,
            base_attack_size: BASE_ATTACK_SIZE,
            attack_size_multipliers: (0..=MAX_ATTACK_SIZE_LEVEL)
                .map(|level| 1.0 + ATTACK_SIZE_STEP_PER_LEVEL * level as f32)
                .collect(),
            enemy_health_multipliers: vec![1.0, 1.5, 2.2, 3.0, 4.0, 5.5, 7.5, 10.0],
            enemy_reflection_multipliers: vec![1.0, 1.2, 1.5, 1.8, 2.2, 2.7, 3.3, 4.0],
            enemy_currency_multipliers: vec![1.0, 1.5, 2.0, 3.0, 4.0, 5.0, 6.5, 8.0],
            base_pickup_radius: BASE_PICKUP_RADIUS,
            pickup_distance_threshold: PICKUP_DISTANCE_THRESHOLD,
            drop_fly_time: DROP_FLY_TIME_SECONDS,
            drop_max_speed: DROP_MAX_SPEED,
            drop_acceleration: DROP_ACCELERATION,
            spawn_timer_mode: SpawnTimerMode::SharedReset,
            arena: ArenaConfig::default(),
            boss: BossConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("base_attack_period", self.base_attack_period)?;
        positive("min_attack_period", self.min_attack_period)?;
        positive("hp_loss_interval", self.hp_loss_interval)?;
        positive("drop_fly_time", self.drop_fly_time)?;
        positive("boss.charge_seconds", self.boss.charge_seconds)?;
        positive("boss.lifetime_seconds", self.boss.lifetime_seconds)?;
        positive("base_attack_size", self.base_attack_size as f64)?;
        positive("base_pickup_radius", self.base_pickup_radius as f64)?;
        positive("arena.player_move_speed", self.arena.player_move_speed as f64)?;
        if self.exp_per_level <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "exp_per_level",
                reason: format!("must be positive, got {}", self.exp_per_level),
            });
        }
        if self.min_damage_after_armor < 1 {
            return Err(ConfigError::InvalidValue {
                field: "min_damage_after_armor",
                reason: format!("must be at least 1, got {}", self.min_damage_after_armor),
            });
        }
        if self.attack_size_multipliers.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "attack_size_multipliers",
                reason: "needs at least one entry for area level 0".to_string(),
            });
        }
        for (field, table) in [
            ("attack_size_multipliers", &self.attack_size_multipliers),
            ("enemy_health_multipliers", &self.enemy_health_multipliers),
            ("enemy_reflection_multipliers", &self.enemy_reflection_multipliers),
            ("enemy_currency_multipliers", &self.enemy_currency_multipliers),
        ] {
            if let Some(bad) = table.iter().find(|v| !v.is_finite() || **v < 0.0) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("entry {} is not a finite non-negative number", bad),
                });
            }
        }
        if self.boss.start_points_a.is_empty() || self.boss.start_points_b.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "boss.start_points",
                reason: "both point lists need at least one point".to_string(),
            });
        }
        Ok(())
    }

    pub fn health_multiplier(&self, stage: u32) -> f32 {
        stage_multiplier(&self.enemy_health_multipliers, stage)
    }

    pub fn reflection_multiplier(&self, stage: u32) -> f32 {
        stage_multiplier(&self.enemy_reflection_multipliers, stage)
    }

    pub fn currency_multiplier(&self, stage: u32) -> f32 {
        stage_multiplier(&self.enemy_currency_multipliers, stage)
    }

    /// Footprint multiplier for an area level, clamped into the table.
    pub fn attack_size_multiplier(&self, level: i32) -> f32 {
        if self.attack_size_multipliers.is_empty() {
            return 1.0;
        }
        let max = self.attack_size_multipliers.len() - 1;
        let idx = (level.max(0) as usize).min(max);
        self.attack_size_multipliers[idx]
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("must be a positive finite number, got {}", value),
        })
    }
}

/// Looks up a 1-based stage in a multiplier table, clamping past the end.
/// An empty table means no scaling.
pub fn stage_multiplier(table: &[f32], stage: u32) -> f32 {
    if table.is_empty() {
        return 1.0;
    }
    let idx = (stage.max(1) as usize - 1).min(table.len() - 1);
    table[idx]
}

/// Play-area geometry and player movement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ArenaConfig {
    /// Visible area; enemies spawn just outside it.
    pub view: Rect,
    /// The player's target position is clamped into this rectangle.
    pub movement_bounds: Rect,
    /// Enemies head toward a random point inside this region.
    pub arrival_area: Rect,
    pub player_move_speed: f32,
    pub resting_position: Vec2,
    pub spawn_edge_buffer: f32,
    pub offscreen_buffer_fraction: f32,
    pub spawn_grace_seconds: f64,
    pub pool_size: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            view: Rect::new(
                Vec2::new(-VIEW_HALF_WIDTH, -VIEW_HALF_HEIGHT),
                Vec2::new(VIEW_HALF_WIDTH, VIEW_HALF_HEIGHT),
            ),
            movement_bounds: Rect::new(
                Vec2::new(-VIEW_HALF_WIDTH + 0.5, -VIEW_HALF_HEIGHT + 1.0),
                Vec2::new(VIEW_HALF_WIDTH - 0.5, VIEW_HALF_HEIGHT - 1.0),
            ),
            arrival_area: Rect::new(Vec2::new(-3.0, -5.0), Vec2::new(3.0, 5.0)),
            player_move_speed: PLAYER_MOVE_SPEED,
            resting_position: Vec2::new(PLAYER_RESTING_X, PLAYER_RESTING_Y),
            spawn_edge_buffer: SPAWN_EDGE_BUFFER,
            offscreen_buffer_fraction: OFFSCREEN_BUFFER_FRACTION,
            spawn_grace_seconds: ENEMY_SPAWN_GRACE_SECONDS,
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BossConfig {
    pub charge_seconds: f64,
    pub lifetime_seconds: f64,
    pub move_speed: f32,
    pub arrival_distance: f32,
    /// The boss enters at one list and heads for a point of the other.
    pub start_points_a: Vec<Vec2>,
    pub start_points_b: Vec<Vec2>,
    /// Health fraction below which the boss enrages.
    pub enrage_health_fraction: f32,
    pub enrage_reflection_multiplier: f32,
    pub stages_unlocked_per_defeat: u32,
}

impl Default for BossConfig {
    fn default() -> Self {
        let top = VIEW_HALF_HEIGHT + 2.0;
        Self {
            charge_seconds: BOSS_CHARGE_SECONDS,
            lifetime_seconds: BOSS_LIFETIME_SECONDS,
            move_speed: BOSS_MOVE_SPEED,
            arrival_distance: BOSS_ARRIVAL_DISTANCE,
            start_points_a: vec![
                Vec2::new(-3.0, top),
                Vec2::new(0.0, top),
                Vec2::new(3.0, top),
            ],
            start_points_b: vec![
                Vec2::new(-3.0, -top),
                Vec2::new(0.0, -top),
                Vec2::new(3.0, -top),
            ],
            enrage_health_fraction: 0.3,
            enrage_reflection_multiplier: 2.0,
            stages_unlocked_per_defeat: STAGES_UNLOCKED_PER_BOSS,
        }
    }
}

/// All authored game data: upgrade forest, enemy roster and stage waves.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentPack {
    pub upgrades: Vec<UpgradeDefinition>,
    pub enemies: Vec<EnemyTemplate>,
    pub stages: Vec<StageSpawnConfig>,
}

impl Default for ContentPack {
    fn default() -> Self {
        Self {
            upgrades: default_catalog(),
            enemies: default_roster(),
            stages: default_stages(),
        }
    }
}

impl ContentPack {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let pack: ContentPack = serde_json::from_str(json)?;
        pack.validate()?;
        Ok(pack)
    }

    /// Checks enemy ids and references. The upgrade forest is validated when the
    /// tree is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut ids: HashSet<&str> = HashSet::new();
        for template in &self.enemies {
            if !ids.insert(template.id.as_str()) {
                return Err(ConfigError::DuplicateEnemyTemplate(template.id.clone()));
            }
        }
        let known = |id: &str| -> Result<(), ConfigError> {
            if ids.contains(id) {
                Ok(())
            } else {
                Err(ConfigError::UnknownEnemyTemplate(id.to_string()))
            }
        };
        for template in &self.enemies {
            if let Some(child) = template.behavior.split_child() {
                known(child)?;
            }
        }
        for stage in &self.stages {
            for entry in &stage.entries {
                known(&entry.template)?;
                positive("stages.entries.spawn_interval", entry.spawn_interval)?;
            }
            if let Some(boss) = &stage.boss {
                known(boss)?;
            }
        }
        Ok(())
    }

    pub fn template(&self, id: &str) -> Option<&EnemyTemplate> {
        self.enemies.iter().find(|e| e.id == id)
    }
}

//! Pure combat math shared by the resolver and the simulator.
//!
//! Every rounding step uses round-half-to-even so results match the
//! shipped balance tables exactly.

use crate::core::geometry::{Rect, Vec2};
use crate::stats::{StatId, StatTable};
use rand::Rng;

/// Seconds between attacks.
///
/// # Arguments
/// * `base_period` - Period with no attack-speed bonus
/// * `min_period` - Floor for very high bonuses
/// * `attack_speed_percent` - Bonus from the `AttackSpeedPercent` stat
pub fn attack_period(base_period: f64, min_period: f64, attack_speed_percent: i32) -> f64 {
    let period = base_period * (1.0 - attack_speed_percent as f64 / 100.0);
    period.max(min_period)
}

/// Square attack footprint centred on the player.
pub fn attack_footprint(center: Vec2, base_size: f32, size_multiplier: f32) -> Rect {
    let side = base_size * size_multiplier;
    Rect::from_center_size(center, Vec2::new(side, side))
}

/// Damage after the per-enemy-in-area bonus.
pub fn area_scaled_damage(base_damage: i32, bonus_percent_per_enemy: i32, enemy_count: usize) -> i32 {
    let factor = 1.0 + bonus_percent_per_enemy as f64 * enemy_count as f64 / 100.0;
    round_to_i32(base_damage as f64 * factor)
}

/// Critical damage: `damage × (100 + crit_damage_percent) / 100`.
pub fn crit_damage(damage: i32, crit_damage_percent: i32) -> i32 {
    round_to_i32(damage as f64 * (100.0 + crit_damage_percent as f64) / 100.0)
}

/// Uniform roll in `[0, 100)` against the crit rate. A rate of 100 or more
/// always crits and 0 or less never does.
pub fn roll_crit(crit_rate_percent: i32, rng: &mut impl Rng) -> bool {
    if crit_rate_percent >= 100 {
        return true;
    }
    if crit_rate_percent <= 0 {
        return false;
    }
    rng.gen_range(0.0..100.0) < crit_rate_percent as f64
}

/// Reflection sub-total: `base_reflection × Σ multipliers`, truncated.
///
/// Returns `None` when nothing positive was reflected. A positive raw value
/// below 1 truncates to `Some(0)`, which still deals the intake floor.
pub fn reflection_total(base_reflection: i32, multiplier_sum: f32) -> Option<i32> {
    let raw = base_reflection as f64 * multiplier_sum as f64;
    if raw > 0.0 {
        Some(raw.min(i32::MAX as f64) as i32)
    } else {
        None
    }
}

/// HP lost to one hit: `max(min_damage, incoming − armor)`.
pub fn damage_after_armor(incoming: i32, armor: i32, min_damage: i32) -> i32 {
    incoming.saturating_sub(armor).max(min_damage)
}

/// Armor against the normal-enemy reflection sub-total.
pub fn normal_armor(stats: &StatTable) -> i32 {
    stats.total_armor()
}

/// Armor against the boss reflection sub-total.
pub fn boss_armor(stats: &StatTable) -> i32 {
    stats.total_armor().saturating_add(stats.get(StatId::BossArmor))
}

/// Radius inside which drops start flying to the player.
pub fn pickup_radius(base_radius: f32, increase_percent: i32) -> f32 {
    base_radius * (1.0 + increase_percent as f32 / 100.0)
}

fn round_to_i32(value: f64) -> i32 {
    value
        .round_ties_even()
        .clamp(i32::MIN as f64, i32::MAX as f64) as i32
}

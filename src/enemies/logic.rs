//! Enemy movement, despawn checks and death payouts.

use super::types::{Enemy, EnemyBehavior};
use crate::core::geometry::{Rect, Vec2};
use crate::stats::{CurrencyId, StatTable};
use rand::Rng;

/// Moves a regular enemy by one tick and ages it.
pub fn advance_enemy(enemy: &mut Enemy, dt: f64) {
    if !enemy.is_alive() {
        return;
    }
    enemy.age += dt;
    let dt = dt as f32;
    let speed = enemy.template.move_speed;

    match enemy.template.behavior {
        EnemyBehavior::Wandering {
            circle_radius,
            circle_speed,
        } => {
            enemy.circle_angle = (enemy.circle_angle + circle_speed * 360.0 * dt) % 360.0;
            let radians = enemy.circle_angle.to_radians();
            let offset = Vec2::new(radians.cos() * circle_radius, radians.sin() * circle_radius);
            let heading = (enemy.target - enemy.position).normalized();
            let movement = heading.scale(speed) + offset.scale(circle_speed);
            enemy.position += movement.scale(dt);
        }
        _ => {
            let direction = match enemy.direction {
                Some(d) => d,
                None => {
                    let d = (enemy.target - enemy.position).normalized();
                    enemy.direction = Some(d);
                    d
                }
            };
            enemy.position += direction.scale(speed * dt);
        }
    }
}

/// Homes the boss toward its target, stopping within `arrival_distance`.
pub fn advance_boss(boss: &mut Enemy, dt: f64, move_speed: f32, arrival_distance: f32) {
    if !boss.is_alive() {
        return;
    }
    boss.age += dt;
    if boss.position.distance(boss.target) <= arrival_distance {
        return;
    }
    let direction = (boss.target - boss.position).normalized();
    let step = move_speed * dt as f32;
    let remaining = boss.position.distance(boss.target);
    if step >= remaining {
        boss.position = boss.target;
    } else {
        boss.position += direction.scale(step);
    }
}

/// An enemy past its spawn grace period and outside the padded view.
pub fn should_despawn(enemy: &Enemy, view: &Rect, buffer_fraction: f32, grace_seconds: f64) -> bool {
    if !enemy.is_alive() || enemy.age < grace_seconds {
        return false;
    }
    !view.expanded_by_fraction(buffer_fraction).contains(enemy.position)
}

/// Currency and amount an enemy pays out on death.
///
/// Regular enemies pay `round((base + bonus) × currency_multiplier)` in their
/// own currency. Rainbow enemies pick one entry and pay `base × stage`.
pub fn death_payout(
    enemy: &Enemy,
    stats: &StatTable,
    currency_multiplier: f32,
    stage: u32,
    rng: &mut impl Rng,
) -> Option<(CurrencyId, i32)> {
    match &enemy.template.behavior {
        EnemyBehavior::Rainbow { drops } => {
            if drops.is_empty() {
                return None;
            }
            let pick = drops[rng.gen_range(0..drops.len())];
            let amount = pick.base_amount.saturating_mul(stage as i32);
            (amount > 0).then_some((pick.currency, amount))
        }
        _ => {
            let currency = enemy.template.currency;
            let bonus = stats.get(currency.drop_bonus_stat());
            let raw = (enemy.template.base_currency_amount.saturating_add(bonus)) as f32
                * currency_multiplier;
            let amount = raw.round_ties_even() as i32;
            (amount > 0).then_some((currency, amount))
        }
    }
}

/// Position for one drop or child: inside the collision box, or scattered
/// within `fallback_radius` when the enemy has none.
pub fn scatter_point(enemy: &Enemy, fallback_radius: f32, rng: &mut impl Rng) -> Vec2 {
    match enemy.bounds() {
        Some(bounds) => bounds.random_point(rng),
        None => enemy.position + Vec2::random_in_circle(fallback_radius, rng),
    }
}

/// A point just outside one of the view's four edges, picked uniformly by
/// edge and then along it.
pub fn random_spawn_point(view: &Rect, edge_buffer: f32, rng: &mut impl Rng) -> Vec2 {
    use crate::core::geometry::random_between;
    match rng.gen_range(0..4) {
        0 => Vec2::new(
            random_between(view.min.x, view.max.x, rng),
            view.max.y + edge_buffer,
        ),
        1 => Vec2::new(
            random_between(view.min.x, view.max.x, rng),
            view.min.y - edge_buffer,
        ),
        2 => Vec2::new(
            view.min.x - edge_buffer,
            random_between(view.min.y, view.max.y, rng),
        ),
        _ => Vec2::new(
            view.max.x + edge_buffer,
            random_between(view.min.y, view.max.y, rng),
        ),
    }
}

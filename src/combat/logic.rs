//! The player's side of combat: movement, the attack cycle, reflection
//! intake, attrition and healing.

use super::math::{
    area_scaled_damage, attack_footprint, attack_period, boss_armor, crit_damage,
    damage_after_armor, normal_armor, reflection_total, roll_crit,
};
use super::types::{AttackReport, EnemyHit, EnemyRef, PlayerInput, PlayerState};
use crate::core::config::{ArenaConfig, GameConfig};
use crate::core::geometry::Vec2;
use crate::enemies::{Enemy, EnemyPools, HitOutcome};
use crate::spawning::BossController;
use crate::stats::{CurrencyId, CurrencyWallet, StatId, StatTable};
use rand::Rng;
use tracing::{debug, info};

/// Result of one attack firing.
#[derive(Debug, Clone)]
pub struct AttackResult {
    pub report: AttackReport,
    /// Hurt enemies with their new health fraction.
    pub hurt: Vec<(EnemyRef, f32)>,
    /// Set when this attack killed the boss.
    pub defeated_boss: Option<Enemy>,
}

/// Per-run totals for the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunTally {
    pub kills: u32,
    pub attacks: u32,
    pub exp_gained: i64,
    pub levels_gained: u32,
    pub damage_dealt: i64,
    pub damage_taken: i64,
    pub collected: CurrencyWallet,
    pub elapsed: f64,
}

#[derive(Debug, Clone)]
pub struct CombatResolver {
    state: PlayerState,
    hp: i32,
    max_hp: i32,
    position: Vec2,
    attack_timer: f64,
    attrition_timer: f64,
    tally: RunTally,
}

impl CombatResolver {
    pub fn new(resting_position: Vec2) -> Self {
        Self {
            state: PlayerState::Idle,
            hp: 0,
            max_hp: 0,
            position: resting_position,
            attack_timer: 0.0,
            attrition_timer: 0.0,
            tally: RunTally::default(),
        }
    }

    /// Starts a run at full HP in the middle of the arena.
    pub fn enter(&mut self, stats: &StatTable) {
        self.max_hp = stats.max_hp().max(1);
        self.hp = self.max_hp;
        self.position = Vec2::ZERO;
        self.attack_timer = 0.0;
        self.attrition_timer = 0.0;
        self.tally = RunTally::default();
        self.state = PlayerState::Active;
        info!(hp = self.hp, "combat entered");
    }

    /// Stops both cycles and parks the player off-screen.
    pub fn leave(&mut self, resting_position: Vec2) {
        self.state = PlayerState::Idle;
        self.position = resting_position;
        self.attack_timer = 0.0;
        self.attrition_timer = 0.0;
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == PlayerState::Active
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn tally(&self) -> &RunTally {
        &self.tally
    }

    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        self.hp as f32 / self.max_hp as f32
    }

    /// Follows the pointer, clamped to the movement bounds.
    pub fn move_player(&mut self, input: PlayerInput, arena: &ArenaConfig, dt: f64) {
        if !self.is_active() || !input.active {
            return;
        }
        let target = arena.movement_bounds.clamp_point(input.pointer);
        let t = (arena.player_move_speed * dt as f32).min(1.0);
        self.position = self.position.lerp(target, t);
    }

    /// Shared damage intake. Returns the HP actually lost.
    ///
    /// HP never drops below zero. Reaching zero ends the run: Victorious when
    /// the boss is already defeated, Dead otherwise.
    pub fn take_damage(&mut self, incoming: i32, armor: i32, min_damage: i32, boss_defeated: bool) -> i32 {
        if !self.is_active() {
            return 0;
        }
        let damage = damage_after_armor(incoming, armor, min_damage);
        let lost = damage.min(self.hp).max(0);
        self.hp -= lost;
        self.tally.damage_taken += lost as i64;
        if self.hp <= 0 {
            self.finish(boss_defeated);
        }
        lost
    }

    /// Heals up to max HP. Returns the HP restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if !self.is_active() || amount <= 0 {
            return 0;
        }
        let healed = amount.min(self.max_hp - self.hp).max(0);
        self.hp += healed;
        healed
    }

    /// Marks the run won if it is still going.
    pub fn declare_victory(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state = PlayerState::Victorious;
        info!(hp = self.hp, "player victorious");
        true
    }

    fn finish(&mut self, boss_defeated: bool) {
        if boss_defeated {
            self.state = PlayerState::Victorious;
            info!("player victorious");
        } else {
            self.state = PlayerState::Dead;
            info!(elapsed = self.tally.elapsed, kills = self.tally.kills, "player died");
        }
    }

    /// Advances the attack timer and fires as often as the period allows.
    pub fn attack_cycle(
        &mut self,
        dt: f64,
        stats: &StatTable,
        config: &GameConfig,
        enemies: &mut EnemyPools,
        boss: &mut BossController,
        rng: &mut impl Rng,
    ) -> Vec<AttackResult> {
        let mut results = Vec::new();
        if !self.is_active() {
            return results;
        }
        self.tally.elapsed += dt;
        self.attack_timer += dt;
        let period = attack_period(
            config.base_attack_period,
            config.min_attack_period,
            stats.get(StatId::AttackSpeedPercent),
        );
        while self.attack_timer >= period && self.is_active() {
            self.attack_timer -= period;
            if let Some(result) = self.fire_attack(stats, config, enemies, boss, rng) {
                results.push(result);
            }
        }
        results
    }

    /// One attack: hit everything in the footprint, then take reflection.
    pub fn fire_attack(
        &mut self,
        stats: &StatTable,
        config: &GameConfig,
        enemies: &mut EnemyPools,
        boss: &mut BossController,
        rng: &mut impl Rng,
    ) -> Option<AttackResult> {
        let size = config.attack_size_multiplier(stats.get(StatId::AttackSizeLevel));
        let footprint = attack_footprint(self.position, config.base_attack_size, size);

        let mut targets: Vec<EnemyRef> = enemies
            .iter_active()
            .filter(|(_, _, e)| e.is_alive() && e.overlaps(&footprint))
            .map(|(template, handle, _)| EnemyRef::pooled(template, handle))
            .collect();
        if boss.boss().is_some_and(|b| b.overlaps(&footprint)) {
            targets.push(EnemyRef::Boss);
        }
        if targets.is_empty() {
            return None;
        }

        let mut damage = area_scaled_damage(
            stats.total_damage(),
            stats.get(StatId::AdditionalDamagePerEnemyInAreaPercent),
            targets.len(),
        );
        let was_crit = roll_crit(stats.get(StatId::CritRatePercent), rng);
        if was_crit {
            damage = crit_damage(damage, stats.get(StatId::CritDamagePercent));
        }
        let boss_bonus = stats.get(StatId::BossDamage);

        let mut report = AttackReport {
            damage_per_enemy: damage,
            was_crit,
            ..AttackReport::default()
        };
        let mut hurt = Vec::new();
        let mut normal_multiplier = 0.0f32;
        let mut boss_multiplier = 0.0f32;
        let mut boss_killed = false;

        for target in targets {
            let enemy = match target {
                EnemyRef::Pooled { template, handle } => enemies.get_mut(template, handle),
                EnemyRef::Boss => boss.boss_mut(),
            };
            let Some(enemy) = enemy else { continue };

            let dealt = if enemy.is_boss {
                damage.saturating_add(boss_bonus)
            } else {
                damage
            };
            let outcome = enemy.take_damage(dealt);
            if enemy.is_boss {
                boss_multiplier += enemy.reflection_multiplier();
            } else {
                normal_multiplier += enemy.reflection_multiplier();
            }

            let killed = outcome == HitOutcome::Killed;
            if let HitOutcome::Hurt { health_fraction } = outcome {
                hurt.push((target, health_fraction));
            }
            if killed && target == EnemyRef::Boss {
                boss_killed = true;
            }
            debug!(
                enemy = %enemy.template.id,
                damage = dealt,
                health = enemy.health,
                killed,
                "enemy hit"
            );
            report.total_damage += dealt as i64;
            report.hits.push(EnemyHit {
                enemy: target,
                damage: dealt,
                killed,
            });
        }

        let defeated_boss = if boss_killed {
            boss.take_defeated()
        } else {
            None
        };
        let boss_defeated = boss.is_defeated();

        let base_reflection = stats.get(StatId::BaseReflection);
        let min_damage = config.min_damage_after_armor;
        if let Some(total) = reflection_total(base_reflection, normal_multiplier) {
            report.normal_reflection = total;
            report.reflection_taken += self.take_damage(total, normal_armor(stats), min_damage, boss_defeated);
        }
        if let Some(total) = reflection_total(base_reflection, boss_multiplier) {
            report.boss_reflection = total;
            report.reflection_taken += self.take_damage(total, boss_armor(stats), min_damage, boss_defeated);
        }

        let heal = stats
            .get(StatId::HealPerEnemyHit)
            .saturating_mul(report.hits.len() as i32);
        report.healed = self.heal(heal);

        self.tally.attacks += 1;
        self.tally.damage_dealt += report.total_damage;
        debug!(
            enemies = report.hits.len(),
            damage = report.damage_per_enemy,
            total = report.total_damage,
            crit = report.was_crit,
            reflection = report.reflection_taken,
            hp = self.hp,
            "attack resolved"
        );

        Some(AttackResult {
            report,
            hurt,
            defeated_boss,
        })
    }

    /// Advances the attrition timer. Returns the HP lost this tick.
    pub fn attrition_cycle(&mut self, dt: f64, stats: &StatTable, config: &GameConfig, boss_defeated: bool) -> i32 {
        if !self.is_active() {
            return 0;
        }
        self.attrition_timer += dt;
        let mut lost = 0;
        while self.attrition_timer >= config.hp_loss_interval && self.is_active() {
            self.attrition_timer -= config.hp_loss_interval;
            let amount = stats.get(StatId::HpLossPerSecond).min(self.hp);
            if amount <= 0 {
                continue;
            }
            self.hp -= amount;
            self.tally.damage_taken += amount as i64;
            lost += amount;
            if self.hp <= 0 {
                self.finish(boss_defeated);
            }
        }
        lost
    }

    /// Books a completed enemy death and applies the kill heal.
    pub fn record_kill(&mut self, stats: &StatTable) -> i32 {
        self.tally.kills += 1;
        self.heal(stats.get(StatId::HealPerEnemyKill))
    }

    pub fn record_experience(&mut self, amount: i32, levels: u32) {
        self.tally.exp_gained += amount as i64;
        self.tally.levels_gained += levels;
    }

    pub fn record_collected(&mut self, currency: CurrencyId, amount: i32) {
        self.tally.collected.add(currency, amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::BossConfig;
    use crate::enemies::{EnemyTemplate, SpawnScaling};
    use crate::pool::PoolHandle;
    use crate::enemies::TemplateId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup() -> (CombatResolver, EnemyPools, BossController, StatTable, GameConfig) {
        let mut stats = StatTable::new();
        stats.set(StatId::CritRatePercent, 0);
        let mut resolver = CombatResolver::new(Vec2::new(100.0, 0.0));
        resolver.enter(&stats);
        let pools = EnemyPools::new(
            &[EnemyTemplate::new("slime", 20, CurrencyId::BlueBits, 1)],
            4,
        );
        (resolver, pools, BossController::new(), stats, GameConfig::default())
    }

    fn place(pools: &mut EnemyPools, position: Vec2, rng: &mut ChaCha8Rng) -> (TemplateId, PoolHandle) {
        let id = pools.id_of("slime").unwrap();
        let handle = pools
            .spawn(id, position, Vec2::ZERO, SpawnScaling::default(), rng)
            .unwrap();
        (id, handle)
    }

    #[test]
    fn test_enter_and_leave() {
        let (mut r, ..) = setup();
        assert_eq!(r.state(), PlayerState::Active);
        assert_eq!(r.hp(), 100);
        assert_eq!(r.position(), Vec2::ZERO);
        r.leave(Vec2::new(100.0, 0.0));
        assert_eq!(r.state(), PlayerState::Idle);
        assert_eq!(r.position(), Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_move_player_clamped_and_smoothed() {
        let (mut r, ..) = setup();
        let arena = ArenaConfig::default();
        r.move_player(PlayerInput::pressed(Vec2::new(50.0, 0.0)), &arena, 0.05);
        // Lerp factor 10 × 0.05 = 0.5 toward the clamped x = 4.5.
        assert!((r.position().x - 2.25).abs() < 1e-5);
        r.move_player(PlayerInput::pressed(Vec2::new(50.0, 0.0)), &arena, 1.0);
        assert!((r.position().x - arena.movement_bounds.max.x).abs() < 1e-5);
    }

    #[test]
    fn test_idle_input_does_not_move() {
        let (mut r, ..) = setup();
        r.move_player(PlayerInput::idle(), &ArenaConfig::default(), 1.0);
        assert_eq!(r.position(), Vec2::ZERO);
    }

    // =========================================================================
    // Damage intake
    // =========================================================================

    #[test]
    fn test_intake_floor_and_zero_floor() {
        let (mut r, ..) = setup();
        assert_eq!(r.take_damage(5, 50, 1, false), 1);
        assert_eq!(r.hp(), 99);
        assert_eq!(r.take_damage(500, 0, 1, false), 99);
        assert_eq!(r.hp(), 0);
        assert_eq!(r.state(), PlayerState::Dead);
        assert_eq!(r.take_damage(5, 0, 1, false), 0);
    }

    #[test]
    fn test_lethal_intake_after_boss_defeat_is_victory() {
        let (mut r, ..) = setup();
        r.take_damage(1000, 0, 1, true);
        assert_eq!(r.state(), PlayerState::Victorious);
    }

    #[test]
    fn test_heal_capped() {
        let (mut r, ..) = setup();
        r.take_damage(10, 0, 1, false);
        assert_eq!(r.heal(50), 10);
        assert_eq!(r.hp(), 100);
    }

    #[test]
    fn test_attrition_ignores_armor() {
        let (mut r, _, _, mut stats, config) = setup();
        stats.set(StatId::BaseArmor, 50);
        stats.set(StatId::HpLossPerSecond, 3);
        assert_eq!(r.attrition_cycle(0.5, &stats, &config, false), 0);
        assert_eq!(r.attrition_cycle(0.5, &stats, &config, false), 3);
        assert_eq!(r.attrition_cycle(2.0, &stats, &config, false), 6);
        assert_eq!(r.hp(), 91);
    }

    #[test]
    fn test_attrition_kills() {
        let (mut r, _, _, mut stats, config) = setup();
        stats.set(StatId::HpLossPerSecond, 60);
        r.attrition_cycle(2.0, &stats, &config, false);
        assert_eq!(r.hp(), 0);
        assert_eq!(r.state(), PlayerState::Dead);
    }

    // =========================================================================
    // Attacks
    // =========================================================================

    #[test]
    fn test_attack_waits_one_period() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (mut r, mut pools, mut boss, stats, config) = setup();
        place(&mut pools, Vec2::ZERO, &mut rng);
        assert!(r
            .attack_cycle(0.5, &stats, &config, &mut pools, &mut boss, &mut rng)
            .is_empty());
        assert_eq!(
            r.attack_cycle(0.5, &stats, &config, &mut pools, &mut boss, &mut rng)
                .len(),
            1
        );
    }

    #[test]
    fn test_attack_speed_fires_more_often() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (mut r, mut pools, mut boss, mut stats, config) = setup();
        stats.set(StatId::AttackSpeedPercent, 50);
        stats.set(StatId::BaseReflection, 0);
        let (id, h) = place(&mut pools, Vec2::ZERO, &mut rng);
        pools.get_mut(id, h).unwrap().health = 10_000;
        let fired = r.attack_cycle(2.0, &stats, &config, &mut pools, &mut boss, &mut rng);
        assert_eq!(fired.len(), 4);
    }

    #[test]
    fn test_no_targets_no_report() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (mut r, mut pools, mut boss, stats, config) = setup();
        place(&mut pools, Vec2::new(4.0, 4.0), &mut rng);
        assert!(r
            .fire_attack(&stats, &config, &mut pools, &mut boss, &mut rng)
            .is_none());
        assert_eq!(r.hp(), 100);
    }

    #[test]
    fn test_area_bonus_and_reflection() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (mut r, mut pools, mut boss, mut stats, config) = setup();
        stats.set(StatId::AdditionalDamagePerEnemyInAreaPercent, 10);
        stats.set(StatId::BaseArmor, 2);
        place(&mut pools, Vec2::new(0.2, 0.0), &mut rng);
        place(&mut pools, Vec2::new(-0.2, 0.0), &mut rng);
        let result = r
            .fire_attack(&stats, &config, &mut pools, &mut boss, &mut rng)
            .unwrap();
        // 10 × 1.2 = 12 per enemy; reflection 5 × 2 = 10, minus 2 armor.
        assert_eq!(result.report.damage_per_enemy, 12);
        assert_eq!(result.report.total_damage, 24);
        assert_eq!(result.report.normal_reflection, 10);
        assert_eq!(result.report.reflection_taken, 8);
        assert_eq!(r.hp(), 92);
        assert_eq!(result.hurt.len(), 2);
    }

    #[test]
    fn test_full_crit_rate_is_deterministic() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let (mut r, mut pools, mut boss, mut stats, config) = setup();
        stats.set(StatId::CritRatePercent, 100);
        stats.set(StatId::CritDamagePercent, 150);
        stats.set(StatId::BaseReflection, 0);
        let (id, h) = place(&mut pools, Vec2::ZERO, &mut rng);
        for _ in 0..20 {
            pools.get_mut(id, h).unwrap().health = 10_000;
            let result = r
                .fire_attack(&stats, &config, &mut pools, &mut boss, &mut rng)
                .unwrap();
            assert!(result.report.was_crit);
            assert_eq!(result.report.damage_per_enemy, 25);
        }
    }

    #[test]
    fn test_kill_marks_dying_and_excludes_from_next_scan() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let (mut r, mut pools, mut boss, mut stats, config) = setup();
        stats.set(StatId::Damage, 15);
        let (id, h) = place(&mut pools, Vec2::ZERO, &mut rng);
        let result = r
            .fire_attack(&stats, &config, &mut pools, &mut boss, &mut rng)
            .unwrap();
        assert_eq!(result.report.kills(), 1);
        assert!(pools.get(id, h).unwrap().is_dying());
        assert!(r
            .fire_attack(&stats, &config, &mut pools, &mut boss, &mut rng)
            .is_none());
    }

    #[test]
    fn test_heal_per_hit() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let (mut r, mut pools, mut boss, mut stats, config) = setup();
        stats.set(StatId::HealPerEnemyHit, 3);
        stats.set(StatId::BaseArmor, 100);
        place(&mut pools, Vec2::ZERO, &mut rng);
        place(&mut pools, Vec2::ZERO, &mut rng);
        r.take_damage(20, 0, 1, false);
        let result = r
            .fire_attack(&stats, &config, &mut pools, &mut boss, &mut rng)
            .unwrap();
        // Reflection floors at 1, then 2 hits heal 6.
        assert_eq!(result.report.reflection_taken, 1);
        assert_eq!(result.report.healed, 6);
        assert_eq!(r.hp(), 85);
    }

    #[test]
    fn test_boss_bonus_damage_and_separate_armor() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let (mut r, mut pools, _, mut stats, config) = setup();
        stats.set(StatId::BossDamage, 7);
        stats.set(StatId::BossArmor, 3);
        let mut boss = BossController::new();
        boss.start(
            Some(EnemyTemplate::new("boss", 1000, CurrencyId::PinkBits, 10)),
            1,
            1,
        );
        let boss_config = BossConfig {
            start_points_a: vec![Vec2::ZERO],
            start_points_b: vec![Vec2::ZERO],
            ..BossConfig::default()
        };
        boss.tick(30.0, &boss_config, SpawnScaling::default(), &mut rng);
        place(&mut pools, Vec2::ZERO, &mut rng);
        let result = r
            .fire_attack(&stats, &config, &mut pools, &mut boss, &mut rng)
            .unwrap();
        let boss_hit = result
            .report
            .hits
            .iter()
            .find(|h| h.enemy == EnemyRef::Boss)
            .unwrap();
        // Two enemies in area, no area bonus: 10 + 7 for the boss.
        assert_eq!(boss_hit.damage, 17);
        assert_eq!(result.report.normal_reflection, 5);
        assert_eq!(result.report.boss_reflection, 5);
        // 5 (no armor) + max(1, 5 − 3).
        assert_eq!(result.report.reflection_taken, 7);
    }

    #[test]
    fn test_boss_kill_beats_simultaneous_death() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let (mut r, mut pools, _, mut stats, config) = setup();
        stats.set(StatId::BaseReflection, 1000);
        let mut boss = BossController::new();
        boss.start(
            Some(EnemyTemplate::new("boss", 5, CurrencyId::PinkBits, 10)),
            1,
            1,
        );
        let boss_config = BossConfig {
            start_points_a: vec![Vec2::ZERO],
            start_points_b: vec![Vec2::ZERO],
            ..BossConfig::default()
        };
        boss.tick(30.0, &boss_config, SpawnScaling::default(), &mut rng);
        let result = r
            .fire_attack(&stats, &config, &mut pools, &mut boss, &mut rng)
            .unwrap();
        assert!(result.defeated_boss.is_some());
        assert!(boss.is_defeated());
        assert_eq!(r.hp(), 0);
        assert_eq!(r.state(), PlayerState::Victorious);
    }

    #[test]
    fn test_record_kill_heals_and_counts() {
        let (mut r, _, _, mut stats, _) = setup();
        stats.set(StatId::HealPerEnemyKill, 4);
        r.take_damage(10, 0, 1, false);
        assert_eq!(r.record_kill(&stats), 4);
        assert_eq!(r.tally().kills, 1);
        assert_eq!(r.hp(), 94);
    }
}

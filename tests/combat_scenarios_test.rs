//! Attack resolution scenarios driven through `CombatResolver` directly:
//! kills, crits, area scaling, reflection with armor, boss priority and the
//! attrition cycle.
//!
//! Uses seeded ChaCha8Rng for deterministic behavior.

use slime_breach::combat::{AttackResult, CombatResolver, EnemyRef, PlayerState};
use slime_breach::core::{GameConfig, Vec2};
use slime_breach::enemies::{EnemyPools, EnemyTemplate, SpawnScaling, TemplateId};
use slime_breach::pool::PoolHandle;
use slime_breach::spawning::{BossController, BossEvent};
use slime_breach::stats::{CurrencyId, StatId, StatTable};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

struct Arena {
    config: GameConfig,
    stats: StatTable,
    pools: EnemyPools,
    boss: BossController,
    resolver: CombatResolver,
    rng: ChaCha8Rng,
}

impl Arena {
    fn new(enemy_hp: i32) -> Self {
        let config = GameConfig::default();
        let mut stats = StatTable::new();
        stats.set(StatId::CritRatePercent, 0);
        let mut resolver = CombatResolver::new(config.arena.resting_position);
        resolver.enter(&stats);
        Self {
            pools: EnemyPools::new(&[EnemyTemplate::new("slime", enemy_hp, CurrencyId::BlueBits, 1)], 4),
            boss: BossController::new(),
            config,
            stats,
            resolver,
            rng: ChaCha8Rng::seed_from_u64(42),
        }
    }

    /// Re-enters combat so HP picks up stat changes.
    fn reenter(&mut self) {
        self.resolver.enter(&self.stats);
    }

    fn spawn_at_player(&mut self) -> PoolHandle {
        self.pools
            .spawn(TemplateId(0), Vec2::ZERO, Vec2::ZERO, SpawnScaling::default(), &mut self.rng)
            .unwrap()
    }

    fn spawn_boss_at_player(&mut self, hp: i32) {
        let template = EnemyTemplate::new("king", hp, CurrencyId::PinkBits, 5);
        self.boss.start(Some(template), 1, 1);
        let event = self.boss.tick(
            self.config.boss.charge_seconds,
            &self.config.boss,
            SpawnScaling::default(),
            &mut self.rng,
        );
        assert!(matches!(event, Some(BossEvent::Spawned { .. })));
        self.boss.boss_mut().unwrap().position = Vec2::ZERO;
    }

    fn fire(&mut self) -> Option<AttackResult> {
        self.resolver.fire_attack(
            &self.stats,
            &self.config,
            &mut self.pools,
            &mut self.boss,
            &mut self.rng,
        )
    }
}

// =============================================================================
// Hits and kills
// =============================================================================

#[test]
fn test_lethal_hit_kills_and_leaves_scans() {
    let mut arena = Arena::new(20);
    arena.stats.set(StatId::BaseDamage, 25);
    let handle = arena.spawn_at_player();

    let result = arena.fire().unwrap();
    assert_eq!(result.report.enemies_hit(), 1);
    assert_eq!(result.report.kills(), 1);
    assert_eq!(result.report.hits[0].damage, 25);
    assert_eq!(result.report.hits[0].enemy, EnemyRef::pooled(TemplateId(0), handle));
    assert!(result.hurt.is_empty());

    let enemy = arena.pools.get(TemplateId(0), handle).unwrap();
    assert!(enemy.is_dying());
    // The dying enemy is no longer a target.
    assert!(arena.fire().is_none());
}

#[test]
fn test_survivor_reports_health_fraction() {
    let mut arena = Arena::new(40);
    let handle = arena.spawn_at_player();
    let result = arena.fire().unwrap();
    assert_eq!(
        result.hurt,
        vec![(EnemyRef::pooled(TemplateId(0), handle), 0.75)]
    );
    assert_eq!(result.report.kills(), 0);
}

#[test]
fn test_enemy_outside_footprint_is_not_hit() {
    let mut arena = Arena::new(20);
    arena
        .pools
        .spawn(TemplateId(0), Vec2::new(4.0, 8.0), Vec2::ZERO, SpawnScaling::default(), &mut arena.rng)
        .unwrap();
    assert!(arena.fire().is_none());
}

#[test]
fn test_full_crit_rate_always_crits() {
    let mut arena = Arena::new(1000);
    arena.stats.set(StatId::CritRatePercent, 100);
    arena.stats.set(StatId::CritDamagePercent, 100);
    arena.stats.set(StatId::BaseReflection, 0);
    arena.spawn_at_player();

    for _ in 0..20 {
        let report = arena.fire().unwrap().report;
        assert!(report.was_crit);
        assert_eq!(report.damage_per_enemy, 20);
    }
}

#[test]
fn test_area_bonus_scales_with_enemy_count() {
    let mut arena = Arena::new(1000);
    arena.stats.set(StatId::AdditionalDamagePerEnemyInAreaPercent, 50);
    arena.spawn_at_player();
    arena.spawn_at_player();

    let report = arena.fire().unwrap().report;
    assert_eq!(report.enemies_hit(), 2);
    assert_eq!(report.damage_per_enemy, 20);
    assert_eq!(report.total_damage, 40);
}

// =============================================================================
// Reflection and armor
// =============================================================================

#[test]
fn test_reflection_sums_over_enemies_hit() {
    let mut arena = Arena::new(1000);
    arena.spawn_at_player();
    arena.spawn_at_player();

    let report = arena.fire().unwrap().report;
    assert_eq!(report.normal_reflection, 10);
    assert_eq!(report.reflection_taken, 10);
    assert_eq!(arena.resolver.hp(), arena.resolver.max_hp() - 10);
}

#[test]
fn test_armor_never_reduces_below_floor() {
    let mut arena = Arena::new(1000);
    arena.stats.set(StatId::BaseArmor, 50);
    arena.spawn_at_player();

    let report = arena.fire().unwrap().report;
    assert_eq!(report.normal_reflection, 5);
    assert_eq!(report.reflection_taken, arena.config.min_damage_after_armor);
}

#[test]
fn test_boss_reflection_uses_boss_armor() {
    let mut arena = Arena::new(1000);
    arena.stats.set(StatId::BossArmor, 3);
    arena.spawn_at_player();
    arena.spawn_boss_at_player(1000);

    let report = arena.fire().unwrap().report;
    assert_eq!(report.enemies_hit(), 2);
    assert_eq!(report.normal_reflection, 5);
    assert_eq!(report.boss_reflection, 5);
    // 5 against no armor plus 5 - 3 against the boss.
    assert_eq!(report.reflection_taken, 7);
}

#[test]
fn test_boss_takes_bonus_damage() {
    let mut arena = Arena::new(1000);
    arena.stats.set(StatId::BossDamage, 7);
    arena.spawn_at_player();
    arena.spawn_boss_at_player(1000);

    let report = arena.fire().unwrap().report;
    let boss_hit = report.hits.iter().find(|h| h.enemy == EnemyRef::Boss).unwrap();
    let slime_hit = report.hits.iter().find(|h| h.enemy != EnemyRef::Boss).unwrap();
    assert_eq!(slime_hit.damage, 10);
    assert_eq!(boss_hit.damage, 17);
}

#[test]
fn test_lethal_reflection_kills_player() {
    let mut arena = Arena::new(1000);
    arena.stats.set(StatId::BaseHp, 5);
    arena.stats.set(StatId::BaseReflection, 50);
    arena.reenter();
    arena.spawn_at_player();

    arena.fire().unwrap();
    assert_eq!(arena.resolver.hp(), 0);
    assert_eq!(arena.resolver.state(), PlayerState::Dead);
    assert!(!arena.resolver.is_active());
}

#[test]
fn test_boss_kill_wins_even_with_lethal_reflection() {
    let mut arena = Arena::new(1000);
    arena.stats.set(StatId::BaseHp, 5);
    arena.stats.set(StatId::BaseReflection, 50);
    arena.reenter();
    arena.spawn_boss_at_player(10);

    let result = arena.fire().unwrap();
    assert!(result.defeated_boss.is_some());
    assert!(arena.boss.is_defeated());
    assert_eq!(arena.resolver.state(), PlayerState::Victorious);
}

#[test]
fn test_heal_per_hit_is_capped_at_max_hp() {
    let mut arena = Arena::new(1000);
    arena.stats.set(StatId::HealPerEnemyHit, 4);
    arena.spawn_at_player();
    arena.spawn_at_player();

    let report = arena.fire().unwrap().report;
    // Takes 10 reflection, then heals 8.
    assert_eq!(report.reflection_taken, 10);
    assert_eq!(report.healed, 8);
    assert_eq!(arena.resolver.hp(), arena.resolver.max_hp() - 2);

    arena.stats.set(StatId::BaseReflection, 0);
    let report = arena.fire().unwrap().report;
    assert_eq!(report.healed, 2);
    assert_eq!(arena.resolver.hp(), arena.resolver.max_hp());
}

// =============================================================================
// Timed cycles
// =============================================================================

#[test]
fn test_first_attack_waits_one_period() {
    let mut arena = Arena::new(1000);
    arena.spawn_at_player();

    let early = arena.resolver.attack_cycle(
        0.5,
        &arena.stats,
        &arena.config,
        &mut arena.pools,
        &mut arena.boss,
        &mut arena.rng,
    );
    assert!(early.is_empty());
    let due = arena.resolver.attack_cycle(
        0.5,
        &arena.stats,
        &arena.config,
        &mut arena.pools,
        &mut arena.boss,
        &mut arena.rng,
    );
    assert_eq!(due.len(), 1);
}

#[test]
fn test_attack_speed_shortens_period() {
    let mut arena = Arena::new(100_000);
    arena.stats.set(StatId::AttackSpeedPercent, 50);
    arena.spawn_at_player();

    let results = arena.resolver.attack_cycle(
        2.0,
        &arena.stats,
        &arena.config,
        &mut arena.pools,
        &mut arena.boss,
        &mut arena.rng,
    );
    assert_eq!(results.len(), 4);
}

#[test]
fn test_attrition_ignores_armor() {
    let mut arena = Arena::new(1000);
    arena.stats.set(StatId::HpLossPerSecond, 3);
    arena.stats.set(StatId::BaseArmor, 100);

    let lost = arena
        .resolver
        .attrition_cycle(1.0, &arena.stats, &arena.config, false);
    assert_eq!(lost, 3);
    assert_eq!(arena.resolver.hp(), arena.resolver.max_hp() - 3);
}

#[test]
fn test_attrition_death_after_boss_is_victory() {
    let mut arena = Arena::new(1000);
    arena.stats.set(StatId::BaseHp, 2);
    arena.stats.set(StatId::HpLossPerSecond, 5);
    arena.reenter();

    arena
        .resolver
        .attrition_cycle(1.0, &arena.stats, &arena.config, true);
    assert_eq!(arena.resolver.state(), PlayerState::Victorious);
}

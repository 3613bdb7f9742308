//! Per-tick combat orchestration.
//!
//! [`CombatSession`] owns every entity in the arena and advances them in a
//! fixed order each tick. It returns [`TickEvent`]s so the render and
//! animation layer can react without the simulation depending on it.

use super::config::{ContentPack, GameConfig};
use super::constants::DROP_FALLBACK_SCATTER_RADIUS;
use super::geometry::Vec2;
use crate::combat::{
    pickup_radius, AttackReport, AttackResult, Collected, CombatResolver, DropField, EnemyRef,
    PlayerInput, PlayerState,
};
use crate::enemies::{
    advance_enemy, death_payout, scatter_point, should_despawn, Enemy, EnemyBehavior, EnemyPools,
    EnemyTemplate, SpawnScaling, TemplateId,
};
use crate::pool::PoolHandle;
use crate::spawning::{BossController, BossEvent, SpawnArea, StageSpawnConfig, WaveSpawner};
use crate::stats::{grant_experience, CurrencyId, CurrencyWallet, StatId, StatTable};
use rand::Rng;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageSource {
    Reflection,
    Attrition,
}

/// A single event produced by a combat tick, in chronological order.
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    // ── Enemies ─────────────────────────────────────────────────
    EnemySpawned {
        enemy: EnemyRef,
        template: String,
        position: Vec2,
    },
    /// Health changed but the enemy survived.
    EnemyHurt { enemy: EnemyRef, health_fraction: f32 },
    /// Health reached zero. When `awaiting_animation` is set, rewards wait
    /// for `complete_death_animation`.
    EnemyDied {
        enemy: EnemyRef,
        awaiting_animation: bool,
    },
    /// Walked off-screen and was released without rewards.
    EnemyDespawned { enemy: EnemyRef },

    // ── Boss ────────────────────────────────────────────────────
    BossSpawned { position: Vec2, target: Vec2 },
    BossDefeated,
    BossExpired,

    // ── Player ──────────────────────────────────────────────────
    PlayerAttack(AttackReport),
    PlayerDamaged {
        amount: i32,
        hp: i32,
        source: DamageSource,
    },
    PlayerHealed { amount: i32, hp: i32 },
    LeveledUp { new_level: i32 },
    PlayerDied,
    PlayerVictorious,

    // ── Currency ────────────────────────────────────────────────
    /// `count` single-unit drops entered the arena.
    CurrencyDropped { currency: CurrencyId, count: i32 },
    CurrencyCollected { currency: CurrencyId, amount: i32 },

    // ── Progression ─────────────────────────────────────────────
    StageUnlocked { current: u32, unlocked: u32 },
}

/// Everything in the arena for one combat run.
#[derive(Debug, Clone)]
pub struct CombatSession {
    enemies: EnemyPools,
    drops: DropField,
    spawner: WaveSpawner,
    boss: BossController,
    resolver: CombatResolver,
    templates: Vec<EnemyTemplate>,
    stages: Vec<StageSpawnConfig>,
    /// Pooled enemies whose death animation has not finished yet.
    pending_deaths: Vec<(TemplateId, PoolHandle)>,
    /// The defeated boss while its death animation plays.
    dying_boss: Option<Enemy>,
    stage: u32,
}

impl CombatSession {
    pub fn new(config: &GameConfig, content: &ContentPack) -> Self {
        Self {
            enemies: EnemyPools::new(&content.enemies, config.arena.pool_size),
            drops: DropField::new(config.arena.pool_size),
            spawner: WaveSpawner::new(config.spawn_timer_mode),
            boss: BossController::new(),
            resolver: CombatResolver::new(config.arena.resting_position),
            templates: content.enemies.clone(),
            stages: content.stages.clone(),
            pending_deaths: Vec::new(),
            dying_boss: None,
            stage: 1,
        }
    }

    /// Clears the arena and starts a run on `stage`.
    pub fn start(&mut self, stage: u32, unlocked_stage: u32, stats: &StatTable, config: &GameConfig) {
        self.clear();
        self.stage = stage.max(1);
        self.spawner = WaveSpawner::new(config.spawn_timer_mode);
        self.spawner.start(&self.stages, self.stage, &self.enemies);

        let boss_template = self
            .stages
            .iter()
            .find(|s| s.stage == self.stage)
            .and_then(|s| s.boss.as_deref())
            .and_then(|id| self.templates.iter().find(|t| t.id == id))
            .cloned();
        self.boss.start(boss_template, self.stage, unlocked_stage);
        self.resolver.enter(stats);
        info!(stage = self.stage, unlocked = unlocked_stage, "combat run started");
    }

    /// Stops every cycle and empties the arena. Pending rewards are dropped.
    pub fn stop(&mut self, config: &GameConfig) {
        self.clear();
        self.resolver.leave(config.arena.resting_position);
    }

    fn clear(&mut self) {
        self.spawner.stop();
        self.boss.stop();
        self.enemies.release_all();
        self.drops.release_all();
        self.pending_deaths.clear();
        self.dying_boss = None;
    }

    pub fn stage(&self) -> u32 {
        self.stage
    }

    pub fn resolver(&self) -> &CombatResolver {
        &self.resolver
    }

    pub fn player_state(&self) -> PlayerState {
        self.resolver.state()
    }

    pub fn enemies(&self) -> &EnemyPools {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut EnemyPools {
        &mut self.enemies
    }

    pub fn drops(&self) -> &DropField {
        &self.drops
    }

    pub fn boss(&self) -> &BossController {
        &self.boss
    }

    pub fn spawner(&self) -> &WaveSpawner {
        &self.spawner
    }

    pub fn pending_deaths(&self) -> usize {
        self.pending_deaths.len() + usize::from(self.dying_boss.is_some())
    }

    fn scaling(&self, config: &GameConfig) -> SpawnScaling {
        SpawnScaling {
            health: config.health_multiplier(self.stage),
            reflection: config.reflection_multiplier(self.stage),
        }
    }

    /// Advances the run by `dt` seconds. After the run ends only drops
    /// already in flight keep moving.
    ///
    /// Order: player movement, wave spawner, boss, enemy movement and
    /// despawn, attack cycle, death completion, attrition, currency pickup,
    /// outcome. Stats are read as each step fires, so purchases made
    /// between ticks apply on the next tick.
    pub fn tick(
        &mut self,
        dt: f64,
        input: PlayerInput,
        stats: &mut StatTable,
        wallet: &mut CurrencyWallet,
        config: &GameConfig,
        rng: &mut impl Rng,
    ) -> Vec<TickEvent> {
        let mut events = Vec::new();
        if dt <= 0.0 {
            return events;
        }
        if !self.resolver.is_active() {
            // Drops launched before the run ended still land.
            if self.resolver.state().is_terminal() {
                let collected = self
                    .drops
                    .advance_flights(dt, self.resolver.position(), config, wallet);
                self.push_collected(collected, &mut events);
            }
            return events;
        }

        // ── 1. Player movement ──────────────────────────────────
        self.resolver.move_player(input, &config.arena, dt);

        // ── 2. Wave spawner ─────────────────────────────────────
        let scaling = self.scaling(config);
        let area = SpawnArea {
            view: &config.arena.view,
            arrival: &config.arena.arrival_area,
            edge_buffer: config.arena.spawn_edge_buffer,
            scaling,
        };
        let spawned = self.spawner.tick(
            dt,
            stats.get(StatId::SpawnRatePercent),
            &mut self.enemies,
            area,
            rng,
        );
        for (template, handle) in spawned {
            self.push_spawned(template, handle, &mut events);
        }

        // ── 3. Boss ─────────────────────────────────────────────
        match self.boss.tick(dt, &config.boss, scaling, rng) {
            Some(BossEvent::Spawned { position, target }) => {
                events.push(TickEvent::BossSpawned { position, target });
            }
            Some(BossEvent::Expired) => events.push(TickEvent::BossExpired),
            None => {}
        }

        // ── 4. Enemy movement and off-screen despawn ────────────
        let mut despawned = Vec::new();
        for (template, handle, enemy) in self.enemies.iter_active_mut() {
            advance_enemy(enemy, dt);
            if should_despawn(
                enemy,
                &config.arena.view,
                config.arena.offscreen_buffer_fraction,
                config.arena.spawn_grace_seconds,
            ) {
                despawned.push((template, handle));
            }
        }
        for (template, handle) in despawned {
            self.enemies.release(template, handle);
            events.push(TickEvent::EnemyDespawned {
                enemy: EnemyRef::pooled(template, handle),
            });
        }

        // ── 5. Attack cycle ─────────────────────────────────────
        let attacks = self.resolver.attack_cycle(
            dt,
            stats,
            config,
            &mut self.enemies,
            &mut self.boss,
            rng,
        );

        // ── 6. Death completion ─────────────────────────────────
        for result in attacks {
            self.handle_attack(result, stats, config, rng, &mut events);
        }

        // ── 7. Attrition ────────────────────────────────────────
        let lost = self
            .resolver
            .attrition_cycle(dt, stats, config, self.boss.is_defeated());
        if lost > 0 {
            events.push(TickEvent::PlayerDamaged {
                amount: lost,
                hp: self.resolver.hp(),
                source: DamageSource::Attrition,
            });
        }

        // ── 8. Currency pickup and flight ───────────────────────
        let radius = pickup_radius(
            config.base_pickup_radius,
            stats.get(StatId::CurrencyPickupRadiusIncreasePercent),
        );
        let collected = self
            .drops
            .update(dt, self.resolver.position(), radius, config, wallet);
        self.push_collected(collected, &mut events);

        // ── 9. Outcome ──────────────────────────────────────────
        if self.boss.is_defeated() {
            self.resolver.declare_victory();
        }
        match self.resolver.state() {
            PlayerState::Dead => events.push(TickEvent::PlayerDied),
            PlayerState::Victorious => events.push(TickEvent::PlayerVictorious),
            PlayerState::Active | PlayerState::Idle => {}
        }

        events
    }

    fn push_collected(&mut self, collected: Vec<Collected>, events: &mut Vec<TickEvent>) {
        for c in collected {
            self.resolver.record_collected(c.currency, c.amount);
            events.push(TickEvent::CurrencyCollected {
                currency: c.currency,
                amount: c.amount,
            });
        }
    }

    fn push_spawned(&self, template: TemplateId, handle: PoolHandle, events: &mut Vec<TickEvent>) {
        if let Some(enemy) = self.enemies.get(template, handle) {
            events.push(TickEvent::EnemySpawned {
                enemy: EnemyRef::pooled(template, handle),
                template: enemy.template.id.clone(),
                position: enemy.position,
            });
        }
    }

    fn handle_attack(
        &mut self,
        result: AttackResult,
        stats: &mut StatTable,
        config: &GameConfig,
        rng: &mut impl Rng,
        events: &mut Vec<TickEvent>,
    ) {
        let AttackResult {
            report,
            hurt,
            defeated_boss,
        } = result;

        for (enemy, health_fraction) in hurt {
            events.push(TickEvent::EnemyHurt {
                enemy,
                health_fraction,
            });
        }

        let killed: Vec<EnemyRef> = report
            .hits
            .iter()
            .filter(|h| h.killed)
            .map(|h| h.enemy)
            .collect();
        let reflection_taken = report.reflection_taken;
        let healed = report.healed;
        events.push(TickEvent::PlayerAttack(report));
        if reflection_taken > 0 {
            events.push(TickEvent::PlayerDamaged {
                amount: reflection_taken,
                hp: self.resolver.hp(),
                source: DamageSource::Reflection,
            });
        }
        if healed > 0 {
            events.push(TickEvent::PlayerHealed {
                amount: healed,
                hp: self.resolver.hp(),
            });
        }

        for enemy in killed {
            match enemy {
                EnemyRef::Pooled { template, handle } => {
                    let awaiting = self
                        .enemies
                        .get(template, handle)
                        .is_some_and(|e| e.template.awaits_death_animation);
                    events.push(TickEvent::EnemyDied {
                        enemy,
                        awaiting_animation: awaiting,
                    });
                    if awaiting {
                        self.pending_deaths.push((template, handle));
                    } else {
                        self.complete_pooled_death(template, handle, stats, config, rng, events);
                    }
                }
                EnemyRef::Boss => {}
            }
        }

        if let Some(boss) = defeated_boss {
            let awaiting = boss.template.awaits_death_animation;
            events.push(TickEvent::EnemyDied {
                enemy: EnemyRef::Boss,
                awaiting_animation: awaiting,
            });
            events.push(TickEvent::BossDefeated);
            if awaiting {
                self.dying_boss = Some(boss);
            } else {
                self.complete_boss_death(&boss, stats, config, rng, events);
            }
        }
    }

    /// Grants the rewards of an enemy whose death animation just finished.
    /// Unknown or already completed enemies are ignored.
    pub fn complete_death_animation(
        &mut self,
        enemy: EnemyRef,
        stats: &mut StatTable,
        config: &GameConfig,
        rng: &mut impl Rng,
    ) -> Vec<TickEvent> {
        let mut events = Vec::new();
        match enemy {
            EnemyRef::Pooled { template, handle } => {
                let Some(idx) = self
                    .pending_deaths
                    .iter()
                    .position(|&p| p == (template, handle))
                else {
                    debug!(?enemy, "death animation for unknown enemy");
                    return events;
                };
                self.pending_deaths.swap_remove(idx);
                self.complete_pooled_death(template, handle, stats, config, rng, &mut events);
            }
            EnemyRef::Boss => {
                if let Some(boss) = self.dying_boss.take() {
                    self.complete_boss_death(&boss, stats, config, rng, &mut events);
                }
            }
        }
        events
    }

    /// Experience, kill heal, drops and split children, then release.
    fn complete_pooled_death(
        &mut self,
        template: TemplateId,
        handle: PoolHandle,
        stats: &mut StatTable,
        config: &GameConfig,
        rng: &mut impl Rng,
        events: &mut Vec<TickEvent>,
    ) {
        let Some(enemy) = self.enemies.get(template, handle).cloned() else {
            return;
        };
        if !enemy.is_dying() {
            return;
        }

        let exp = enemy.template.exp;
        if exp > 0 {
            let levels = grant_experience(stats, exp, config.exp_per_level);
            self.resolver.record_experience(exp, levels);
            if levels > 0 {
                events.push(TickEvent::LeveledUp {
                    new_level: stats.get(StatId::Level),
                });
            }
        }

        let healed = self.resolver.record_kill(stats);
        if healed > 0 {
            events.push(TickEvent::PlayerHealed {
                amount: healed,
                hp: self.resolver.hp(),
            });
        }

        self.drop_currency(&enemy, stats, config, rng, events);

        if let EnemyBehavior::Splitting { child, count } = &enemy.template.behavior {
            match self.enemies.id_of(child) {
                Some(child_id) => {
                    let scaling = self.scaling(config);
                    for _ in 0..*count {
                        let position = scatter_point(&enemy, DROP_FALLBACK_SCATTER_RADIUS, rng);
                        if let Some(h) =
                            self.enemies
                                .spawn(child_id, position, enemy.target, scaling, rng)
                        {
                            self.push_spawned(child_id, h, events);
                        }
                    }
                }
                None => debug!(child = %child, "split child template missing"),
            }
        }

        self.enemies.release(template, handle);
    }

    /// The boss pays currency only.
    fn complete_boss_death(
        &mut self,
        boss: &Enemy,
        stats: &StatTable,
        config: &GameConfig,
        rng: &mut impl Rng,
        events: &mut Vec<TickEvent>,
    ) {
        self.drop_currency(boss, stats, config, rng, events);
    }

    fn drop_currency(
        &mut self,
        enemy: &Enemy,
        stats: &StatTable,
        config: &GameConfig,
        rng: &mut impl Rng,
        events: &mut Vec<TickEvent>,
    ) {
        let multiplier = config.currency_multiplier(self.stage);
        let Some((currency, amount)) = death_payout(enemy, stats, multiplier, self.stage, rng) else {
            return;
        };
        for _ in 0..amount {
            let position = scatter_point(enemy, DROP_FALLBACK_SCATTER_RADIUS, rng);
            self.drops.spawn(currency, position);
        }
        events.push(TickEvent::CurrencyDropped {
            currency,
            count: amount,
        });
    }
}

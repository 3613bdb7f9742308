//! Timer-driven wave spawning for regular enemies.

use crate::core::config::SpawnTimerMode;
use crate::core::constants::MIN_SPAWN_RATE_MODIFIER;
use crate::core::geometry::Rect;
use crate::enemies::{random_spawn_point, EnemyPools, SpawnScaling, TemplateId};
use crate::pool::PoolHandle;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

fn default_spawn_amount() -> u32 {
    1
}

/// One enemy type's pacing within a stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageSpawnEntry {
    pub template: String,
    /// Seconds between batches before the spawn-rate modifier.
    pub spawn_interval: f64,
    #[serde(default = "default_spawn_amount")]
    pub spawn_amount: u32,
    /// Alive cap for this template; zero or negative means unlimited.
    #[serde(default)]
    pub max_capacity: i32,
    /// Seconds after combat starts before this entry is considered.
    #[serde(default)]
    pub start_time: f64,
}

impl StageSpawnEntry {
    pub fn new(template: &str, spawn_interval: f64, spawn_amount: u32, max_capacity: i32) -> Self {
        Self {
            template: template.to_string(),
            spawn_interval,
            spawn_amount,
            max_capacity,
            start_time: 0.0,
        }
    }

    pub fn starting_at(mut self, start_time: f64) -> Self {
        self.start_time = start_time;
        self
    }
}

/// Spawn setup for one stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageSpawnConfig {
    pub stage: u32,
    pub entries: Vec<StageSpawnEntry>,
    /// Boss template for this stage, if any.
    #[serde(default)]
    pub boss: Option<String>,
}

/// Where and how spawned enemies enter play.
#[derive(Debug, Clone, Copy)]
pub struct SpawnArea<'a> {
    pub view: &'a Rect,
    pub arrival: &'a Rect,
    pub edge_buffer: f32,
    pub scaling: SpawnScaling,
}

/// Batch size after the capacity cap.
pub fn capped_spawn_count(amount: u32, max_capacity: i32, active: usize) -> u32 {
    if max_capacity <= 0 {
        return amount;
    }
    let room = (max_capacity as i64 - active as i64).max(0) as u32;
    amount.min(room)
}

/// Interval after the spawn-rate stat (percent, 100 = unmodified).
pub fn adjusted_interval(spawn_interval: f64, spawn_rate_percent: i32) -> f64 {
    spawn_interval / (spawn_rate_percent as f64 / 100.0).max(MIN_SPAWN_RATE_MODIFIER)
}

#[derive(Debug, Clone)]
struct ActiveEntry {
    template: TemplateId,
    entry: StageSpawnEntry,
    /// Own accumulator, used only in `SpawnTimerMode::Independent`.
    timer: f64,
}

#[derive(Debug, Clone)]
pub struct WaveSpawner {
    mode: SpawnTimerMode,
    entries: Vec<ActiveEntry>,
    timer: f64,
    elapsed: f64,
    running: bool,
}

impl WaveSpawner {
    pub fn new(mode: SpawnTimerMode) -> Self {
        Self {
            mode,
            entries: Vec::new(),
            timer: 0.0,
            elapsed: 0.0,
            running: false,
        }
    }

    pub fn mode(&self) -> SpawnTimerMode {
        self.mode
    }

    /// Loads the entries for `stage`. A stage without a config spawns nothing.
    pub fn start(&mut self, stages: &[StageSpawnConfig], stage: u32, pools: &EnemyPools) {
        self.entries.clear();
        self.timer = 0.0;
        self.elapsed = 0.0;
        self.running = true;

        let Some(config) = stages.iter().find(|c| c.stage == stage) else {
            warn!(stage, "no spawn configuration for stage");
            return;
        };
        if config.entries.is_empty() {
            warn!(stage, "spawn configuration has no entries");
        }
        for entry in &config.entries {
            match pools.id_of(&entry.template) {
                Some(template) => self.entries.push(ActiveEntry {
                    template,
                    entry: entry.clone(),
                    timer: 0.0,
                }),
                None => warn!(template = %entry.template, "spawn entry names unknown template"),
            }
        }
        debug!(stage, entries = self.entries.len(), "wave spawner started");
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.entries.clear();
        self.timer = 0.0;
        self.elapsed = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Seconds since `start`.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    fn max_interval(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.entry.spawn_interval)
            .fold(0.0, f64::max)
    }

    /// Advances the timers and spawns whatever is due.
    pub fn tick(
        &mut self,
        dt: f64,
        spawn_rate_percent: i32,
        pools: &mut EnemyPools,
        area: SpawnArea<'_>,
        rng: &mut impl Rng,
    ) -> Vec<(TemplateId, PoolHandle)> {
        let mut spawned = Vec::new();
        if !self.running {
            return spawned;
        }
        self.elapsed += dt;

        match self.mode {
            SpawnTimerMode::SharedReset => {
                self.timer += dt;
                for i in 0..self.entries.len() {
                    let entry = &self.entries[i];
                    if self.elapsed < entry.entry.start_time {
                        continue;
                    }
                    let interval = adjusted_interval(entry.entry.spawn_interval, spawn_rate_percent);
                    if self.timer >= interval {
                        spawn_batch(&self.entries[i], pools, area, rng, &mut spawned);
                    }
                }
                if self.timer >= self.max_interval() {
                    self.timer = 0.0;
                }
            }
            SpawnTimerMode::Independent => {
                for i in 0..self.entries.len() {
                    if self.elapsed < self.entries[i].entry.start_time {
                        continue;
                    }
                    let interval =
                        adjusted_interval(self.entries[i].entry.spawn_interval, spawn_rate_percent);
                    self.entries[i].timer += dt;
                    if self.entries[i].timer >= interval {
                        self.entries[i].timer -= interval;
                        spawn_batch(&self.entries[i], pools, area, rng, &mut spawned);
                    }
                }
            }
        }
        spawned
    }
}

fn spawn_batch(
    entry: &ActiveEntry,
    pools: &mut EnemyPools,
    area: SpawnArea<'_>,
    rng: &mut impl Rng,
    out: &mut Vec<(TemplateId, PoolHandle)>,
) {
    let active = pools.active_count(entry.template);
    let count = capped_spawn_count(entry.entry.spawn_amount, entry.entry.max_capacity, active);
    for _ in 0..count {
        let position = random_spawn_point(area.view, area.edge_buffer, rng);
        let target = area.arrival.random_point(rng);
        if let Some(handle) = pools.spawn(entry.template, position, target, area.scaling, rng) {
            out.push((entry.template, handle));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Vec2;
    use crate::enemies::EnemyTemplate;
    use crate::stats::CurrencyId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Fixture {
        pools: EnemyPools,
        view: Rect,
        arrival: Rect,
        rng: ChaCha8Rng,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                pools: EnemyPools::new(
                    &[
                        EnemyTemplate::new("fast", 10, CurrencyId::BlueBits, 1),
                        EnemyTemplate::new("slow", 10, CurrencyId::PinkBits, 1),
                    ],
                    4,
                ),
                view: Rect::from_center_size(Vec2::ZERO, Vec2::new(10.0, 18.0)),
                arrival: Rect::from_center_size(Vec2::ZERO, Vec2::new(2.0, 2.0)),
                rng: ChaCha8Rng::seed_from_u64(42),
            }
        }

        fn tick(&mut self, spawner: &mut WaveSpawner, dt: f64, rate: i32) -> usize {
            let area = SpawnArea {
                view: &self.view,
                arrival: &self.arrival,
                edge_buffer: 0.5,
                scaling: SpawnScaling::default(),
            };
            spawner
                .tick(dt, rate, &mut self.pools, area, &mut self.rng)
                .len()
        }
    }

    fn stage(entries: Vec<StageSpawnEntry>) -> Vec<StageSpawnConfig> {
        vec![StageSpawnConfig {
            stage: 1,
            entries,
            boss: None,
        }]
    }

    #[test]
    fn test_capped_spawn_count() {
        assert_eq!(capped_spawn_count(3, 5, 4), 1);
        assert_eq!(capped_spawn_count(3, 5, 5), 0);
        assert_eq!(capped_spawn_count(3, 5, 9), 0);
        assert_eq!(capped_spawn_count(3, 0, 100), 3);
        assert_eq!(capped_spawn_count(3, -1, 100), 3);
    }

    #[test]
    fn test_adjusted_interval() {
        assert_eq!(adjusted_interval(2.0, 100), 2.0);
        assert_eq!(adjusted_interval(2.0, 200), 1.0);
        // Floor of 0.01 on the modifier
        assert_eq!(adjusted_interval(2.0, 0), 200.0);
        assert_eq!(adjusted_interval(2.0, -50), 200.0);
    }

    #[test]
    fn test_cap_limits_batch() {
        let mut fx = Fixture::new();
        let mut spawner = WaveSpawner::new(SpawnTimerMode::SharedReset);
        let stages = stage(vec![StageSpawnEntry::new("fast", 2.0, 3, 5)]);
        spawner.start(&stages, 1, &fx.pools);
        let fast = fx.pools.id_of("fast").unwrap();
        for _ in 0..4 {
            fx.pools
                .spawn(fast, Vec2::ZERO, Vec2::ZERO, SpawnScaling::default(), &mut fx.rng);
        }
        assert_eq!(fx.tick(&mut spawner, 2.0, 100), 1);
        assert_eq!(fx.pools.active_count(fast), 5);
    }

    #[test]
    fn test_missing_stage_spawns_nothing() {
        let mut fx = Fixture::new();
        let mut spawner = WaveSpawner::new(SpawnTimerMode::SharedReset);
        let stages = stage(vec![StageSpawnEntry::new("fast", 1.0, 1, 0)]);
        spawner.start(&stages, 7, &fx.pools);
        assert_eq!(spawner.entry_count(), 0);
        assert_eq!(fx.tick(&mut spawner, 10.0, 100), 0);
    }

    #[test]
    fn test_start_time_delays_entry() {
        let mut fx = Fixture::new();
        let mut spawner = WaveSpawner::new(SpawnTimerMode::Independent);
        let stages = stage(vec![StageSpawnEntry::new("fast", 1.0, 1, 0).starting_at(5.0)]);
        spawner.start(&stages, 1, &fx.pools);
        let mut total = 0;
        for _ in 0..4 {
            total += fx.tick(&mut spawner, 1.0, 100);
        }
        assert_eq!(total, 0);
        for _ in 0..3 {
            total += fx.tick(&mut spawner, 1.0, 100);
        }
        assert!(total >= 1);
    }

    #[test]
    fn test_stopped_spawner_is_inert() {
        let mut fx = Fixture::new();
        let mut spawner = WaveSpawner::new(SpawnTimerMode::SharedReset);
        let stages = stage(vec![StageSpawnEntry::new("fast", 1.0, 1, 0)]);
        spawner.start(&stages, 1, &fx.pools);
        spawner.stop();
        assert_eq!(fx.tick(&mut spawner, 5.0, 100), 0);
    }

    // =========================================================================
    // Shared accumulator
    // =========================================================================

    #[test]
    fn test_shared_timer_fires_every_tick_until_reset() {
        // fast (1s) and slow (3s) share one accumulator that resets at 3s.
        // Once the accumulator passes 1s the fast entry fires on every tick.
        let mut fx = Fixture::new();
        let mut spawner = WaveSpawner::new(SpawnTimerMode::SharedReset);
        let stages = stage(vec![
            StageSpawnEntry::new("fast", 1.0, 1, 0),
            StageSpawnEntry::new("slow", 3.0, 1, 0),
        ]);
        spawner.start(&stages, 1, &fx.pools);
        let fast = fx.pools.id_of("fast").unwrap();
        let slow = fx.pools.id_of("slow").unwrap();

        // 0.5 .. 3.0 in half-second ticks: fast fires at 1.0, 1.5, 2.0, 2.5, 3.0
        for _ in 0..6 {
            fx.tick(&mut spawner, 0.5, 100);
        }
        assert_eq!(fx.pools.active_count(fast), 5);
        assert_eq!(fx.pools.active_count(slow), 1);

        // Reset happened at 3.0; the next fast spawn needs another full second.
        fx.tick(&mut spawner, 0.5, 100);
        assert_eq!(fx.pools.active_count(fast), 5);
        fx.tick(&mut spawner, 0.5, 100);
        assert_eq!(fx.pools.active_count(fast), 6);
    }

    #[test]
    fn test_independent_timers_fire_once_per_interval() {
        let mut fx = Fixture::new();
        let mut spawner = WaveSpawner::new(SpawnTimerMode::Independent);
        let stages = stage(vec![
            StageSpawnEntry::new("fast", 1.0, 1, 0),
            StageSpawnEntry::new("slow", 3.0, 1, 0),
        ]);
        spawner.start(&stages, 1, &fx.pools);
        let fast = fx.pools.id_of("fast").unwrap();
        let slow = fx.pools.id_of("slow").unwrap();
        for _ in 0..12 {
            fx.tick(&mut spawner, 0.5, 100);
        }
        assert_eq!(fx.pools.active_count(fast), 6);
        assert_eq!(fx.pools.active_count(slow), 2);
    }

    #[test]
    fn test_spawn_rate_shortens_interval() {
        let mut fx = Fixture::new();
        let mut spawner = WaveSpawner::new(SpawnTimerMode::Independent);
        let stages = stage(vec![StageSpawnEntry::new("fast", 2.0, 1, 0)]);
        spawner.start(&stages, 1, &fx.pools);
        let mut total = 0;
        for _ in 0..4 {
            total += fx.tick(&mut spawner, 1.0, 200);
        }
        assert_eq!(total, 4);
    }

    #[test]
    fn test_spawned_enemies_start_outside_view() {
        let mut fx = Fixture::new();
        let mut spawner = WaveSpawner::new(SpawnTimerMode::Independent);
        let stages = stage(vec![StageSpawnEntry::new("fast", 0.1, 2, 0)]);
        spawner.start(&stages, 1, &fx.pools);
        for _ in 0..10 {
            fx.tick(&mut spawner, 0.1, 100);
        }
        for (_, _, enemy) in fx.pools.iter_active() {
            assert!(!fx.view.contains(enemy.position));
            assert!(fx.arrival.contains(enemy.target));
        }
    }
}

//! Currency drops: spawning on death, pickup radius, homing flight and
//! exactly-once crediting.

use crate::core::config::GameConfig;
use crate::core::geometry::Vec2;
use crate::pool::{ObjectPool, PoolHandle, Poolable};
use crate::stats::{CurrencyId, CurrencyWallet};

/// One pickup worth `amount` of a currency.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyDrop {
    pub currency: CurrencyId,
    pub amount: i32,
    pub position: Vec2,
    flying: bool,
    flight_time: f64,
    speed: f32,
    credited: bool,
}

impl CurrencyDrop {
    pub fn new(currency: CurrencyId) -> Self {
        Self {
            currency,
            amount: 1,
            position: Vec2::ZERO,
            flying: false,
            flight_time: 0.0,
            speed: 0.0,
            credited: false,
        }
    }

    pub fn is_flying(&self) -> bool {
        self.flying
    }

    pub fn is_credited(&self) -> bool {
        self.credited
    }

    pub fn start_flight(&mut self) {
        if self.flying {
            return;
        }
        self.flying = true;
        self.flight_time = 0.0;
        self.speed = 0.0;
        self.credited = false;
    }

    /// One-shot check-and-set. Returns true only the first time.
    pub fn try_credit(&mut self) -> bool {
        if self.credited {
            return false;
        }
        self.credited = true;
        true
    }

    /// Advances the flight by `dt`. Returns true once the drop should be
    /// credited and released, either because the flight time ran out or
    /// because it reached the player.
    pub fn advance_flight(&mut self, dt: f64, player: Vec2, config: &GameConfig) -> bool {
        if !self.flying {
            return false;
        }
        self.flight_time += dt;
        if self.flight_time >= config.drop_fly_time {
            return true;
        }

        let dt = dt as f32;
        self.speed = (self.speed + config.drop_acceleration * dt).min(config.drop_max_speed);
        let direction = (player - self.position).normalized();
        self.position += direction.scale(self.speed * dt);

        self.position.distance(player) < config.pickup_distance_threshold
    }
}

impl Poolable for CurrencyDrop {
    fn on_acquire(&mut self, position: Vec2, _rotation: f32) {
        self.position = position;
        self.amount = 1;
        self.flying = false;
        self.flight_time = 0.0;
        self.speed = 0.0;
        self.credited = false;
    }

    fn on_release(&mut self) {
        self.flying = false;
    }
}

/// A drop that reached the player this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collected {
    pub currency: CurrencyId,
    pub amount: i32,
}

/// All drops in the arena, one pool per currency.
#[derive(Debug, Clone)]
pub struct DropField {
    pools: Vec<ObjectPool<CurrencyDrop>>,
}

impl DropField {
    pub fn new(preallocate: usize) -> Self {
        let pools = CurrencyId::ALL
            .iter()
            .map(|&c| ObjectPool::with_capacity(CurrencyDrop::new(c), preallocate))
            .collect();
        Self { pools }
    }

    pub fn spawn(&mut self, currency: CurrencyId, position: Vec2) -> PoolHandle {
        self.pools[currency.index()].acquire(position, 0.0)
    }

    pub fn get(&self, currency: CurrencyId, handle: PoolHandle) -> Option<&CurrencyDrop> {
        self.pools[currency.index()].get(handle)
    }

    pub fn active_count(&self) -> usize {
        self.pools.iter().map(|p| p.active_count()).sum()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (PoolHandle, &CurrencyDrop)> {
        self.pools.iter().flat_map(|p| p.iter_active())
    }

    pub fn release_all(&mut self) {
        for pool in &mut self.pools {
            pool.release_all();
        }
    }

    /// Drops currently flying toward the player.
    pub fn flying_count(&self) -> usize {
        self.iter_active().filter(|(_, d)| d.is_flying()).count()
    }

    /// Starts flights inside `pickup_radius`, advances flights in progress and
    /// credits finished ones to `wallet`. Each drop is credited at most once.
    pub fn update(
        &mut self,
        dt: f64,
        player: Vec2,
        pickup_radius: f32,
        config: &GameConfig,
        wallet: &mut CurrencyWallet,
    ) -> Vec<Collected> {
        self.step(dt, player, Some(pickup_radius), config, wallet)
    }

    /// Advances only the flights already in progress. Used once the run has
    /// ended, when no new pickups may start.
    pub fn advance_flights(
        &mut self,
        dt: f64,
        player: Vec2,
        config: &GameConfig,
        wallet: &mut CurrencyWallet,
    ) -> Vec<Collected> {
        self.step(dt, player, None, config, wallet)
    }

    fn step(
        &mut self,
        dt: f64,
        player: Vec2,
        pickup_radius: Option<f32>,
        config: &GameConfig,
        wallet: &mut CurrencyWallet,
    ) -> Vec<Collected> {
        let mut collected = Vec::new();
        for pool in &mut self.pools {
            let mut finished = Vec::new();
            for (handle, drop) in pool.iter_active_mut() {
                if let Some(radius) = pickup_radius {
                    if !drop.is_flying() && drop.position.distance(player) <= radius {
                        drop.start_flight();
                    }
                }
                if drop.advance_flight(dt, player, config) {
                    if drop.try_credit() {
                        wallet.add(drop.currency, drop.amount);
                        collected.push(Collected {
                            currency: drop.currency,
                            amount: drop.amount,
                        });
                    }
                    finished.push(handle);
                }
            }
            for handle in finished {
                pool.release(handle);
            }
        }
        collected
    }
}

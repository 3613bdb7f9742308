//! One object pool per enemy template.

use super::types::{Enemy, EnemyTemplate};
use crate::core::geometry::Vec2;
use crate::pool::{ObjectPool, PoolHandle};
use rand::Rng;
use std::collections::HashMap;

/// Index of a template inside `EnemyPools`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateId(pub usize);

/// Per-spawn scaling taken from the stage tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnScaling {
    pub health: f32,
    pub reflection: f32,
}

impl Default for SpawnScaling {
    fn default() -> Self {
        Self {
            health: 1.0,
            reflection: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnemyPools {
    pools: Vec<ObjectPool<Enemy>>,
    ids: HashMap<String, TemplateId>,
}

impl EnemyPools {
    pub fn new(templates: &[EnemyTemplate], preallocate: usize) -> Self {
        let mut pools = Vec::with_capacity(templates.len());
        let mut ids = HashMap::new();
        for template in templates {
            ids.entry(template.id.clone())
                .or_insert(TemplateId(pools.len()));
            pools.push(ObjectPool::with_capacity(
                Enemy::new(template.clone()),
                preallocate,
            ));
        }
        Self { pools, ids }
    }

    pub fn id_of(&self, template: &str) -> Option<TemplateId> {
        self.ids.get(template).copied()
    }

    pub fn template_count(&self) -> usize {
        self.pools.len()
    }

    /// Takes an enemy from the template's pool and readies it for play.
    pub fn spawn(
        &mut self,
        id: TemplateId,
        position: Vec2,
        target: Vec2,
        scaling: SpawnScaling,
        rng: &mut impl Rng,
    ) -> Option<PoolHandle> {
        let pool = self.pools.get_mut(id.0)?;
        let handle = pool.acquire(position, 0.0);
        let angle = rng.gen_range(0.0..360.0);
        if let Some(enemy) = pool.get_mut(handle) {
            enemy.spawn(target, scaling.health, scaling.reflection, angle);
        }
        Some(handle)
    }

    pub fn release(&mut self, id: TemplateId, handle: PoolHandle) -> bool {
        self.pools
            .get_mut(id.0)
            .is_some_and(|pool| pool.release(handle))
    }

    pub fn get(&self, id: TemplateId, handle: PoolHandle) -> Option<&Enemy> {
        self.pools.get(id.0)?.get(handle)
    }

    pub fn get_mut(&mut self, id: TemplateId, handle: PoolHandle) -> Option<&mut Enemy> {
        self.pools.get_mut(id.0)?.get_mut(handle)
    }

    /// Enemies of one template in play, dying ones included.
    pub fn active_count(&self, id: TemplateId) -> usize {
        self.pools.get(id.0).map_or(0, |p| p.active_count())
    }

    pub fn total_active(&self) -> usize {
        self.pools.iter().map(|p| p.active_count()).sum()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (TemplateId, PoolHandle, &Enemy)> {
        self.pools.iter().enumerate().flat_map(|(i, pool)| {
            pool.iter_active()
                .map(move |(handle, enemy)| (TemplateId(i), handle, enemy))
        })
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (TemplateId, PoolHandle, &mut Enemy)> {
        self.pools.iter_mut().enumerate().flat_map(|(i, pool)| {
            pool.iter_active_mut()
                .map(move |(handle, enemy)| (TemplateId(i), handle, enemy))
        })
    }

    pub fn release_all(&mut self) {
        for pool in &mut self.pools {
            pool.release_all();
        }
    }
}

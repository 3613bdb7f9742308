//! Reusable instance storage for enemies and currency drops.
//!
//! Slots are never freed. Inactive slot indices sit on a free-list stack, so
//! acquire and release are O(1) and an active slot is never handed out twice.

use crate::core::geometry::Vec2;

/// Hooks run when a pooled instance changes state.
pub trait Poolable {
    fn on_acquire(&mut self, position: Vec2, rotation: f32);
    fn on_release(&mut self) {}
}

/// Stable index of a pool slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolHandle(pub usize);

#[derive(Debug, Clone)]
struct Slot<T> {
    value: T,
    active: bool,
}

#[derive(Debug, Clone)]
pub struct ObjectPool<T: Poolable + Clone> {
    prototype: T,
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    active: usize,
}

impl<T: Poolable + Clone> ObjectPool<T> {
    pub fn new(prototype: T) -> Self {
        Self {
            prototype,
            slots: Vec::new(),
            free: Vec::new(),
            active: 0,
        }
    }

    pub fn with_capacity(prototype: T, n: usize) -> Self {
        let mut pool = Self::new(prototype);
        pool.preallocate(n);
        pool
    }

    /// Builds `n` more inactive instances.
    pub fn preallocate(&mut self, n: usize) {
        for _ in 0..n {
            self.slots.push(Slot {
                value: self.prototype.clone(),
                active: false,
            });
            self.free.push(self.slots.len() - 1);
        }
    }

    /// Reactivates a free instance, growing the pool when none is free.
    pub fn acquire(&mut self, position: Vec2, rotation: f32) -> PoolHandle {
        let idx = match self.free.pop() {
            Some(idx) => idx,
            None => {
                self.slots.push(Slot {
                    value: self.prototype.clone(),
                    active: false,
                });
                self.slots.len() - 1
            }
        };
        let slot = &mut self.slots[idx];
        slot.active = true;
        slot.value.on_acquire(position, rotation);
        self.active += 1;
        PoolHandle(idx)
    }

    /// Deactivates an instance. Returns false if it was already inactive.
    pub fn release(&mut self, handle: PoolHandle) -> bool {
        let Some(slot) = self.slots.get_mut(handle.0) else {
            return false;
        };
        if !slot.active {
            return false;
        }
        slot.active = false;
        slot.value.on_release();
        self.free.push(handle.0);
        self.active -= 1;
        true
    }

    pub fn release_all(&mut self) {
        for idx in 0..self.slots.len() {
            self.release(PoolHandle(idx));
        }
    }

    pub fn is_active(&self, handle: PoolHandle) -> bool {
        self.slots.get(handle.0).is_some_and(|s| s.active)
    }

    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        self.slots
            .get(handle.0)
            .filter(|s| s.active)
            .map(|s| &s.value)
    }

    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.0)
            .filter(|s| s.active)
            .map(|s| &mut s.value)
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (PoolHandle, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, s)| (PoolHandle(i), &s.value))
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (PoolHandle, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, s)| (PoolHandle(i), &mut s.value))
    }

    /// Handles of all active instances, in slot order.
    pub fn active_handles(&self) -> Vec<PoolHandle> {
        self.iter_active().map(|(h, _)| h).collect()
    }

    pub fn active_count(&self) -> usize {
        self.active
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

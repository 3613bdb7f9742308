//! Stage selection and unlocks.

use crate::utils::persistence::Persistence;
use tracing::{info, warn};

/// Current and highest unlocked stage, both 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageProgression {
    current: u32,
    unlocked: u32,
}

impl Default for StageProgression {
    fn default() -> Self {
        Self {
            current: 1,
            unlocked: 1,
        }
    }
}

impl StageProgression {
    /// Builds from saved values, repairing out-of-range data.
    pub fn new(current: u32, unlocked: u32) -> Self {
        let unlocked = unlocked.max(1);
        Self {
            current: current.clamp(1, unlocked),
            unlocked,
        }
    }

    pub fn load(store: &dyn Persistence) -> Self {
        let (current, unlocked) = store.load_stage();
        Self::new(current, unlocked)
    }

    pub fn save(&self, store: &mut dyn Persistence) {
        if let Err(e) = store.save_stage(self.current, self.unlocked) {
            warn!(error = %e, "failed to save stage progress");
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn unlocked(&self) -> u32 {
        self.unlocked
    }

    /// Whether the current stage is the frontier (the only place bosses spawn).
    pub fn is_frontier(&self) -> bool {
        self.current == self.unlocked
    }

    pub fn can_increase(&self) -> bool {
        self.current < self.unlocked
    }

    pub fn can_decrease(&self) -> bool {
        self.current > 1
    }

    pub fn increase(&mut self) -> bool {
        if !self.can_increase() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn decrease(&mut self) -> bool {
        if !self.can_decrease() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Jumps to any unlocked stage.
    pub fn select(&mut self, stage: u32) -> bool {
        if stage == 0 || stage > self.unlocked || stage == self.current {
            return false;
        }
        self.current = stage;
        true
    }

    /// Raises both the unlocked and current stage by `amount`.
    pub fn unlock(&mut self, amount: u32) {
        self.unlocked = self.unlocked.saturating_add(amount);
        self.current = self.current.saturating_add(amount).min(self.unlocked);
        info!(
            current = self.current,
            unlocked = self.unlocked,
            "stages unlocked"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::persistence::MemoryStore;

    #[test]
    fn test_default_is_stage_one() {
        let p = StageProgression::default();
        assert_eq!((p.current(), p.unlocked()), (1, 1));
        assert!(p.is_frontier());
    }

    #[test]
    fn test_increase_capped_by_unlocked() {
        let mut p = StageProgression::new(1, 2);
        assert!(p.increase());
        assert!(!p.increase());
        assert_eq!(p.current(), 2);
    }

    #[test]
    fn test_decrease_floor_one() {
        let mut p = StageProgression::new(2, 2);
        assert!(p.decrease());
        assert!(!p.decrease());
        assert_eq!(p.current(), 1);
        assert!(!p.is_frontier());
    }

    #[test]
    fn test_unlock_advances_both() {
        let mut p = StageProgression::new(3, 3);
        p.unlock(1);
        assert_eq!((p.current(), p.unlocked()), (4, 4));
    }

    #[test]
    fn test_unlock_from_lower_stage() {
        let mut p = StageProgression::new(1, 3);
        p.unlock(1);
        assert_eq!((p.current(), p.unlocked()), (2, 4));
    }

    #[test]
    fn test_new_repairs_bad_data() {
        let p = StageProgression::new(0, 0);
        assert_eq!((p.current(), p.unlocked()), (1, 1));
        let p = StageProgression::new(9, 3);
        assert_eq!(p.current(), 3);
    }

    #[test]
    fn test_select() {
        let mut p = StageProgression::new(1, 4);
        assert!(p.select(3));
        assert_eq!(p.current(), 3);
        assert!(!p.select(5));
        assert!(!p.select(0));
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let mut p = StageProgression::default();
        p.unlock(2);
        p.save(&mut store);
        assert_eq!(StageProgression::load(&store), p);
    }

    #[test]
    fn test_failed_save_does_not_panic() {
        let mut store = MemoryStore::new();
        store.fail_saves = true;
        StageProgression::new(2, 2).save(&mut store);
        assert_eq!(StageProgression::load(&store), StageProgression::default());
    }
}

//! Player-side combat types.

use crate::core::geometry::Vec2;
use crate::enemies::TemplateId;
use crate::pool::PoolHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    /// Not on the combat screen.
    #[default]
    Idle,
    Active,
    /// HP reached zero. Terminal until the next `enter`.
    Dead,
    /// The boss was defeated. Terminal until the next `enter`.
    Victorious,
}

impl PlayerState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PlayerState::Dead | PlayerState::Victorious)
    }
}

/// Pointer sample from the input collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayerInput {
    /// World position of the pointer or touch.
    pub pointer: Vec2,
    /// Whether the pointer is held down this tick.
    pub active: bool,
}

impl PlayerInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn pressed(pointer: Vec2) -> Self {
        Self {
            pointer,
            active: true,
        }
    }
}

/// Identifies an enemy in play, pooled or the stage boss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyRef {
    Pooled {
        template: TemplateId,
        handle: PoolHandle,
    },
    Boss,
}

impl EnemyRef {
    pub fn pooled(template: TemplateId, handle: PoolHandle) -> Self {
        EnemyRef::Pooled { template, handle }
    }
}

/// Damage dealt to one enemy by one attack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyHit {
    pub enemy: EnemyRef,
    pub damage: i32,
    pub killed: bool,
}

/// Diagnostics for one firing of the attack cycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttackReport {
    pub hits: Vec<EnemyHit>,
    /// Damage before the boss bonus, after area scaling and crit.
    pub damage_per_enemy: i32,
    pub total_damage: i64,
    pub was_crit: bool,
    /// Reflection sub-totals before armor; zero when nothing contributed.
    pub normal_reflection: i32,
    pub boss_reflection: i32,
    /// HP the player actually lost to reflection.
    pub reflection_taken: i32,
    pub healed: i32,
}

impl AttackReport {
    pub fn enemies_hit(&self) -> usize {
        self.hits.len()
    }

    pub fn kills(&self) -> usize {
        self.hits.iter().filter(|h| h.killed).count()
    }
}

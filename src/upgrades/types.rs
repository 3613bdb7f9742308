//! Upgrade definitions, runtime nodes and purchase outcomes.

use super::formula::{clamp_cost, CostFormula};
use crate::stats::{CurrencyId, StatId};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

fn default_requirement_level() -> i32 {
    1
}

/// Authored data for one upgrade.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpgradeDefinition {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub stat: StatId,
    pub per_upgrade_value: i32,
    pub max_level: i32,
    /// Arithmetic over `n`, the level being bought.
    pub cost_formula: String,
    pub cost_currency: CurrencyId,
    #[serde(default)]
    pub unlock_root: Option<String>,
    #[serde(default = "default_requirement_level")]
    pub unlock_requirement_level: i32,
}

impl UpgradeDefinition {
    /// Shorthand for catalogs and tests.
    pub fn new(
        id: &str,
        stat: StatId,
        per_upgrade_value: i32,
        max_level: i32,
        cost_formula: &str,
        cost_currency: CurrencyId,
    ) -> Self {
        Self {
            id: id.to_string(),
            display_name: String::new(),
            description: String::new(),
            stat,
            per_upgrade_value,
            max_level,
            cost_formula: cost_formula.to_string(),
            cost_currency,
            unlock_root: None,
            unlock_requirement_level: 1,
        }
    }

    pub fn named(mut self, display_name: &str, description: &str) -> Self {
        self.display_name = display_name.to_string();
        self.description = description.to_string();
        self
    }

    pub fn unlocked_by(mut self, root: &str, level: i32) -> Self {
        self.unlock_root = Some(root.to_string());
        self.unlock_requirement_level = level;
        self
    }
}

/// Runtime state of one upgrade inside an `UpgradeTree`.
#[derive(Debug, Clone)]
pub struct UpgradeNode {
    pub definition: UpgradeDefinition,
    pub(crate) formula: CostFormula,
    pub(crate) current_level: i32,
    pub(crate) unlocked: bool,
    pub(crate) root: Option<usize>,
}

impl UpgradeNode {
    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn current_level(&self) -> i32 {
        self.current_level
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn is_maxed(&self) -> bool {
        self.current_level >= self.definition.max_level
    }

    /// Evaluates the cost formula at `current_level + 1`. A formula that
    /// fails to evaluate costs 1.
    pub fn cost_for_next_level(&self) -> i32 {
        let n = self.current_level.saturating_add(1);
        match self.formula.evaluate(n) {
            Ok(raw) => clamp_cost(raw),
            Err(e) => {
                warn!(
                    upgrade = %self.definition.id,
                    formula = %self.formula,
                    level = n,
                    error = %e,
                    "cost formula failed, falling back to 1"
                );
                1
            }
        }
    }

    /// Total stat contribution at the current level.
    pub fn stat_contribution(&self) -> i32 {
        self.current_level
            .saturating_mul(self.definition.per_upgrade_value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseError {
    UnknownUpgrade(String),
    Locked,
    MaxLevel,
    InsufficientFunds {
        currency: CurrencyId,
        required: i32,
        available: i32,
    },
}

impl fmt::Display for PurchaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PurchaseError::UnknownUpgrade(id) => write!(f, "no upgrade named '{}'", id),
            PurchaseError::Locked => write!(f, "upgrade is locked"),
            PurchaseError::MaxLevel => write!(f, "upgrade is at max level"),
            PurchaseError::InsufficientFunds {
                currency,
                required,
                available,
            } => write!(
                f,
                "need {} {} but only have {}",
                required,
                currency.name(),
                available
            ),
        }
    }
}

impl std::error::Error for PurchaseError {}

/// What a successful purchase did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub id: String,
    pub new_level: i32,
    pub cost: i32,
    pub currency: CurrencyId,
    pub stat: StatId,
    pub stat_delta: i32,
    /// Dependents whose unlocked flag turned on as a result.
    pub newly_unlocked: Vec<String>,
}

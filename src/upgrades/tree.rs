//! The upgrade forest: validation, purchases and unlock propagation.

use super::formula::CostFormula;
use super::types::{PurchaseError, PurchaseReceipt, UpgradeDefinition, UpgradeNode};
use crate::core::error::ConfigError;
use crate::stats::{CurrencyWallet, StatTable};
use crate::utils::persistence::Persistence;
use std::collections::{HashMap, HashSet};
use std::io;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct UpgradeTree {
    nodes: Vec<UpgradeNode>,
    index: HashMap<String, usize>,
    /// Direct dependents of each node (nodes naming it as unlock root).
    dependents: Vec<Vec<usize>>,
}

impl UpgradeTree {
    /// Builds and validates the forest. All nodes start at level 0.
    pub fn build(definitions: &[UpgradeDefinition]) -> Result<Self, ConfigError> {
        let mut index = HashMap::new();
        let mut nodes = Vec::with_capacity(definitions.len());

        for def in definitions {
            if index.insert(def.id.clone(), nodes.len()).is_some() {
                return Err(ConfigError::DuplicateUpgrade(def.id.clone()));
            }
            if def.max_level < 0 {
                return Err(ConfigError::InvalidMaxLevel {
                    upgrade: def.id.clone(),
                    max_level: def.max_level,
                });
            }
            let formula =
                CostFormula::parse(&def.cost_formula).map_err(|source| ConfigError::Formula {
                    upgrade: def.id.clone(),
                    formula: def.cost_formula.clone(),
                    source,
                })?;
            nodes.push(UpgradeNode {
                definition: def.clone(),
                formula,
                current_level: 0,
                unlocked: true,
                root: None,
            });
        }

        let mut dependents = vec![Vec::new(); nodes.len()];
        for i in 0..nodes.len() {
            let Some(root_id) = nodes[i].definition.unlock_root.clone() else {
                continue;
            };
            let root = *index
                .get(&root_id)
                .ok_or_else(|| ConfigError::UnknownUnlockRoot {
                    upgrade: nodes[i].definition.id.clone(),
                    root: root_id.clone(),
                })?;
            nodes[i].root = Some(root);
            dependents[root].push(i);
        }

        let mut tree = Self {
            nodes,
            index,
            dependents,
        };
        tree.check_cycles()?;
        for i in 0..tree.nodes.len() {
            tree.nodes[i].unlocked = tree.compute_unlocked(i);
        }
        Ok(tree)
    }

    /// Walks each node's root chain; reaching a node twice means a cycle.
    fn check_cycles(&self) -> Result<(), ConfigError> {
        for start in 0..self.nodes.len() {
            let mut seen = HashSet::new();
            let mut chain = vec![self.nodes[start].id().to_string()];
            seen.insert(start);
            let mut current = self.nodes[start].root;
            while let Some(next) = current {
                chain.push(self.nodes[next].id().to_string());
                if !seen.insert(next) {
                    return Err(ConfigError::CyclicUnlock(chain));
                }
                current = self.nodes[next].root;
            }
        }
        Ok(())
    }

    fn compute_unlocked(&self, i: usize) -> bool {
        let node = &self.nodes[i];
        match node.root {
            None => true,
            Some(root) => {
                self.nodes[root].current_level >= node.definition.unlock_requirement_level
            }
        }
    }

    /// Recomputes dependents of `from` until no flag changes. Returns the ids
    /// that became unlocked.
    fn propagate_unlocks(&mut self, from: usize) -> Vec<String> {
        let mut newly_unlocked = Vec::new();
        let mut worklist: Vec<usize> = self.dependents[from].clone();
        while let Some(i) = worklist.pop() {
            let unlocked = self.compute_unlocked(i);
            if unlocked == self.nodes[i].unlocked {
                continue;
            }
            self.nodes[i].unlocked = unlocked;
            if unlocked {
                newly_unlocked.push(self.nodes[i].id().to_string());
            }
            worklist.extend(self.dependents[i].iter().copied());
        }
        newly_unlocked
    }

    fn slot(&self, id: &str) -> Result<usize, PurchaseError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| PurchaseError::UnknownUpgrade(id.to_string()))
    }

    pub fn node(&self, id: &str) -> Option<&UpgradeNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn nodes(&self) -> &[UpgradeNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn level(&self, id: &str) -> Option<i32> {
        self.node(id).map(|n| n.current_level)
    }

    pub fn is_unlocked(&self, id: &str) -> Option<bool> {
        self.node(id).map(|n| n.unlocked)
    }

    pub fn cost_for_next_level(&self, id: &str) -> Option<i32> {
        self.node(id).map(|n| n.cost_for_next_level())
    }

    fn check_upgradable(&self, i: usize) -> Result<(), PurchaseError> {
        let node = &self.nodes[i];
        let root_ok = match node.root {
            None => true,
            Some(root) => {
                self.nodes[root].current_level >= node.definition.unlock_requirement_level
            }
        };
        if !node.unlocked || !root_ok {
            return Err(PurchaseError::Locked);
        }
        if node.is_maxed() {
            return Err(PurchaseError::MaxLevel);
        }
        Ok(())
    }

    pub fn can_upgrade(&self, id: &str) -> bool {
        self.slot(id)
            .and_then(|i| self.check_upgradable(i))
            .is_ok()
    }

    /// Buys one level. On any error nothing is mutated.
    pub fn purchase(
        &mut self,
        id: &str,
        wallet: &mut CurrencyWallet,
        stats: &mut StatTable,
    ) -> Result<PurchaseReceipt, PurchaseError> {
        let i = self.slot(id)?;
        self.check_upgradable(i)?;

        let node = &self.nodes[i];
        let cost = node.cost_for_next_level();
        let currency = node.definition.cost_currency;
        if !wallet.spend(currency, cost) {
            return Err(PurchaseError::InsufficientFunds {
                currency,
                required: cost,
                available: wallet.get(currency),
            });
        }

        let node = &mut self.nodes[i];
        node.current_level += 1;
        let stat = node.definition.stat;
        let stat_delta = node.definition.per_upgrade_value;
        let new_level = node.current_level;
        stats.add(stat, stat_delta);

        let newly_unlocked = self.propagate_unlocks(i);
        info!(
            upgrade = id,
            level = new_level,
            cost,
            unlocked = newly_unlocked.len(),
            "upgrade purchased"
        );
        Ok(PurchaseReceipt {
            id: id.to_string(),
            new_level,
            cost,
            currency,
            stat,
            stat_delta,
            newly_unlocked,
        })
    }

    /// Sets a level from saved data or debug tooling, applying the stat
    /// difference and re-propagating unlocks. Returns newly unlocked ids, or
    /// `None` for an unknown upgrade.
    pub fn restore_level(
        &mut self,
        id: &str,
        level: i32,
        stats: &mut StatTable,
    ) -> Option<Vec<String>> {
        let i = *self.index.get(id)?;
        let node = &mut self.nodes[i];
        let level = level.clamp(0, node.definition.max_level);
        let old = node.current_level;
        if level == old {
            return Some(Vec::new());
        }
        node.current_level = level;
        stats.add(
            node.definition.stat,
            (level - old).saturating_mul(node.definition.per_upgrade_value),
        );
        debug!(upgrade = id, from = old, to = level, "upgrade level restored");
        Some(self.propagate_unlocks(i))
    }

    /// Restores every node's saved level.
    pub fn load_levels(&mut self, store: &dyn Persistence, stats: &mut StatTable) {
        let ids: Vec<String> = self.nodes.iter().map(|n| n.id().to_string()).collect();
        for id in ids {
            let level = store.load_upgrade_level(&id);
            self.restore_level(&id, level, stats);
        }
    }

    pub fn save_levels(&self, store: &mut dyn Persistence) -> io::Result<()> {
        for node in &self.nodes {
            store.save_upgrade_level(node.id(), node.current_level)?;
        }
        Ok(())
    }

    /// The cheapest purchasable upgrade the wallet can cover.
    pub fn cheapest_affordable(&self, wallet: &CurrencyWallet) -> Option<&UpgradeNode> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(i, _)| self.check_upgradable(*i).is_ok())
            .map(|(_, n)| (n, n.cost_for_next_level()))
            .filter(|(n, cost)| wallet.has_at_least(n.definition.cost_currency, *cost))
            .min_by_key(|(_, cost)| *cost)
            .map(|(n, _)| n)
    }
}

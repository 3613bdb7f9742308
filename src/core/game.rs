//! Session-level game: the upgrade economy between runs plus the combat
//! session, wired to a persistence collaborator.

use super::config::{ContentPack, GameConfig};
use super::error::ConfigError;
use super::tick::{CombatSession, TickEvent};
use crate::combat::{EnemyRef, PlayerInput, PlayerState};
use crate::progression::StageProgression;
use crate::stats::{CurrencyWallet, StatTable};
use crate::upgrades::{PurchaseError, PurchaseReceipt, UpgradeTree};
use crate::utils::persistence::Persistence;
use rand::Rng;
use tracing::{info, warn};

pub struct Game<P: Persistence> {
    config: GameConfig,
    tree: UpgradeTree,
    stats: StatTable,
    wallet: CurrencyWallet,
    progression: StageProgression,
    session: CombatSession,
    persistence: P,
}

impl<P: Persistence> Game<P> {
    /// Validates the data, builds the upgrade forest and restores saved
    /// levels, stage progress and balances.
    pub fn new(config: GameConfig, content: ContentPack, persistence: P) -> Result<Self, ConfigError> {
        config.validate()?;
        content.validate()?;
        let mut tree = UpgradeTree::build(&content.upgrades)?;
        let mut stats = StatTable::new();
        tree.load_levels(&persistence, &mut stats);
        let wallet = persistence.load_wallet();
        let progression = StageProgression::load(&persistence);
        let session = CombatSession::new(&config, &content);
        info!(
            upgrades = tree.len(),
            stage = progression.current(),
            unlocked = progression.unlocked(),
            "game loaded"
        );
        Ok(Self {
            config,
            tree,
            stats,
            wallet,
            progression,
            session,
            persistence,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn stats(&self) -> &StatTable {
        &self.stats
    }

    pub fn wallet(&self) -> &CurrencyWallet {
        &self.wallet
    }

    pub fn wallet_mut(&mut self) -> &mut CurrencyWallet {
        &mut self.wallet
    }

    pub fn tree(&self) -> &UpgradeTree {
        &self.tree
    }

    pub fn progression(&self) -> &StageProgression {
        &self.progression
    }

    pub fn session(&self) -> &CombatSession {
        &self.session
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn player_state(&self) -> PlayerState {
        self.session.player_state()
    }

    pub fn in_combat(&self) -> bool {
        self.player_state() != PlayerState::Idle
    }

    /// Buys one level of an upgrade. Failures leave everything untouched.
    pub fn purchase(&mut self, id: &str) -> Result<PurchaseReceipt, PurchaseError> {
        self.tree.purchase(id, &mut self.wallet, &mut self.stats)
    }

    /// Starts a run on the current stage.
    pub fn enter_combat(&mut self) {
        self.session.start(
            self.progression.current(),
            self.progression.unlocked(),
            &self.stats,
            &self.config,
        );
    }

    /// Advances combat. A boss victory unlocks the next stage and saves it.
    pub fn tick(&mut self, dt: f64, input: PlayerInput, rng: &mut impl Rng) -> Vec<TickEvent> {
        let mut events = self.session.tick(
            dt,
            input,
            &mut self.stats,
            &mut self.wallet,
            &self.config,
            rng,
        );
        if events.contains(&TickEvent::PlayerVictorious) {
            self.progression
                .unlock(self.config.boss.stages_unlocked_per_defeat);
            self.progression.save(&mut self.persistence);
            events.push(TickEvent::StageUnlocked {
                current: self.progression.current(),
                unlocked: self.progression.unlocked(),
            });
        }
        events
    }

    /// Host callback: an enemy's death animation finished.
    pub fn complete_death_animation(&mut self, enemy: EnemyRef, rng: &mut impl Rng) -> Vec<TickEvent> {
        self.session
            .complete_death_animation(enemy, &mut self.stats, &self.config, rng)
    }

    /// Leaves the combat screen.
    pub fn leave_combat(&mut self) {
        self.session.stop(&self.config);
    }

    /// Persists balances, stage progress and upgrade levels. Failures are
    /// logged; play continues.
    pub fn end_session(&mut self) {
        self.leave_combat();
        if let Err(e) = self.persistence.save_wallet(&self.wallet) {
            warn!(error = %e, "failed to save wallet");
        }
        self.progression.save(&mut self.persistence);
        if let Err(e) = self.tree.save_levels(&mut self.persistence) {
            warn!(error = %e, "failed to save upgrade levels");
        }
        info!(total_currency = self.wallet.total(), "session saved");
    }

    pub fn increase_stage(&mut self) -> bool {
        self.progression.increase()
    }

    pub fn decrease_stage(&mut self) -> bool {
        self.progression.decrease()
    }

    pub fn select_stage(&mut self, stage: u32) -> bool {
        self.progression.select(stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{CurrencyId, StatId};
    use crate::utils::persistence::{MemoryStore, SaveData};

    fn game() -> Game<MemoryStore> {
        Game::new(GameConfig::default(), ContentPack::default(), MemoryStore::new()).unwrap()
    }

    #[test]
    fn test_new_game_defaults() {
        let g = game();
        assert_eq!(g.progression().current(), 1);
        assert_eq!(g.wallet().total(), 0);
        assert_eq!(g.player_state(), PlayerState::Idle);
        assert!(!g.tree().is_empty());
    }

    #[test]
    fn test_loads_saved_levels_into_stats() {
        let mut data = SaveData::default();
        data.upgrade_levels.insert("damage".to_string(), 2);
        data.current_stage = 2;
        data.unlocked_stage = 3;
        let g = Game::new(
            GameConfig::default(),
            ContentPack::default(),
            MemoryStore::with_data(data),
        )
        .unwrap();
        let per = g.tree().node("damage").unwrap().definition.per_upgrade_value;
        assert_eq!(g.stats().get(StatId::Damage), 2 * per);
        assert_eq!(g.progression().current(), 2);
        assert_eq!(g.progression().unlocked(), 3);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig {
            base_attack_period: 0.0,
            ..GameConfig::default()
        };
        assert!(Game::new(config, ContentPack::default(), MemoryStore::new()).is_err());
    }

    #[test]
    fn test_purchase_and_end_session_persist() {
        let mut g = game();
        g.wallet_mut().add(CurrencyId::BlueBits, 100);
        let receipt = g.purchase("damage").unwrap();
        assert_eq!(receipt.new_level, 1);
        g.end_session();
        let data = &g.persistence().data;
        assert_eq!(data.upgrade_levels.get("damage"), Some(&1));
        assert_eq!(data.wallet.get(CurrencyId::BlueBits), 100 - receipt.cost);
    }

    #[test]
    fn test_enter_and_leave_combat() {
        let mut g = game();
        g.enter_combat();
        assert!(g.in_combat());
        assert_eq!(g.session().resolver().hp(), g.stats().max_hp());
        g.leave_combat();
        assert!(!g.in_combat());
    }

    #[test]
    fn test_stage_selection_bounded() {
        let mut g = game();
        assert!(!g.increase_stage());
        assert!(!g.decrease_stage());
        assert!(!g.select_stage(2));
    }
}

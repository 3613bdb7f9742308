use crate::core::constants::{NUM_CURRENCIES, NUM_STATS, STARTING_CURRENCY};
use serde::{Deserialize, Serialize};

/// Every stat the upgrade tree or combat formulas can touch.
///
/// The set is closed: each variant has a default in [`StatId::default_value`],
/// so a stat can never be read before it has a value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum StatId {
    Hp,
    BaseHp,
    HpLossPerSecond,
    Damage,
    BaseDamage,
    AttackSizeLevel,
    AttackSpeedPercent,
    Exp,
    Level,
    BaseReflection,
    Armor,
    BaseArmor,
    BossArmor,
    BossDamage,
    CritRatePercent,
    CritDamagePercent,
    AdditionalDamagePerEnemyInAreaPercent,
    AdditionalBlueBitsDropPerEnemy,
    AdditionalPinkBitsDropPerEnemy,
    AdditionalYellowBitsDropPerEnemy,
    AdditionalGreenBitsDropPerEnemy,
    SpawnRatePercent,
    HealPerEnemyHit,
    HealPerEnemyKill,
    CurrencyPickupRadiusIncreasePercent,
}

impl StatId {
    pub const ALL: [StatId; NUM_STATS] = [
        StatId::Hp,
        StatId::BaseHp,
        StatId::HpLossPerSecond,
        StatId::Damage,
        StatId::BaseDamage,
        StatId::AttackSizeLevel,
        StatId::AttackSpeedPercent,
        StatId::Exp,
        StatId::Level,
        StatId::BaseReflection,
        StatId::Armor,
        StatId::BaseArmor,
        StatId::BossArmor,
        StatId::BossDamage,
        StatId::CritRatePercent,
        StatId::CritDamagePercent,
        StatId::AdditionalDamagePerEnemyInAreaPercent,
        StatId::AdditionalBlueBitsDropPerEnemy,
        StatId::AdditionalPinkBitsDropPerEnemy,
        StatId::AdditionalYellowBitsDropPerEnemy,
        StatId::AdditionalGreenBitsDropPerEnemy,
        StatId::SpawnRatePercent,
        StatId::HealPerEnemyHit,
        StatId::HealPerEnemyKill,
        StatId::CurrencyPickupRadiusIncreasePercent,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Value a fresh profile starts with.
    pub fn default_value(&self) -> i32 {
        match self {
            StatId::BaseHp => 100,
            StatId::HpLossPerSecond => 1,
            StatId::BaseDamage => 10,
            StatId::Level => 1,
            StatId::BaseReflection => 5,
            StatId::CritRatePercent => 5,
            StatId::CritDamagePercent => 150,
            StatId::SpawnRatePercent => 100,
            StatId::Hp
            | StatId::Damage
            | StatId::AttackSizeLevel
            | StatId::AttackSpeedPercent
            | StatId::Exp
            | StatId::Armor
            | StatId::BaseArmor
            | StatId::BossArmor
            | StatId::BossDamage
            | StatId::AdditionalDamagePerEnemyInAreaPercent
            | StatId::AdditionalBlueBitsDropPerEnemy
            | StatId::AdditionalPinkBitsDropPerEnemy
            | StatId::AdditionalYellowBitsDropPerEnemy
            | StatId::AdditionalGreenBitsDropPerEnemy
            | StatId::HealPerEnemyHit
            | StatId::HealPerEnemyKill
            | StatId::CurrencyPickupRadiusIncreasePercent => 0,
        }
    }

    /// Short label for summaries and logs.
    pub fn label(&self) -> &'static str {
        match self {
            StatId::Hp => "HP",
            StatId::BaseHp => "Base HP",
            StatId::HpLossPerSecond => "HP Loss/s",
            StatId::Damage => "Damage",
            StatId::BaseDamage => "Base Damage",
            StatId::AttackSizeLevel => "Attack Size",
            StatId::AttackSpeedPercent => "Attack Speed %",
            StatId::Exp => "EXP",
            StatId::Level => "Level",
            StatId::BaseReflection => "Reflection",
            StatId::Armor => "Armor",
            StatId::BaseArmor => "Base Armor",
            StatId::BossArmor => "Boss Armor",
            StatId::BossDamage => "Boss Damage",
            StatId::CritRatePercent => "Crit Rate %",
            StatId::CritDamagePercent => "Crit Damage %",
            StatId::AdditionalDamagePerEnemyInAreaPercent => "Damage/Enemy in Area %",
            StatId::AdditionalBlueBitsDropPerEnemy => "Blue Bits/Enemy",
            StatId::AdditionalPinkBitsDropPerEnemy => "Pink Bits/Enemy",
            StatId::AdditionalYellowBitsDropPerEnemy => "Yellow Bits/Enemy",
            StatId::AdditionalGreenBitsDropPerEnemy => "Green Bits/Enemy",
            StatId::SpawnRatePercent => "Spawn Rate %",
            StatId::HealPerEnemyHit => "Heal/Hit",
            StatId::HealPerEnemyKill => "Heal/Kill",
            StatId::CurrencyPickupRadiusIncreasePercent => "Pickup Radius %",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum CurrencyId {
    BlueBits,
    PinkBits,
    YellowBits,
    GreenBits,
}

impl CurrencyId {
    pub const ALL: [CurrencyId; NUM_CURRENCIES] = [
        CurrencyId::BlueBits,
        CurrencyId::PinkBits,
        CurrencyId::YellowBits,
        CurrencyId::GreenBits,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            CurrencyId::BlueBits => "Blue Bits",
            CurrencyId::PinkBits => "Pink Bits",
            CurrencyId::YellowBits => "Yellow Bits",
            CurrencyId::GreenBits => "Green Bits",
        }
    }

    /// The per-enemy drop bonus stat for this currency.
    pub fn drop_bonus_stat(&self) -> StatId {
        match self {
            CurrencyId::BlueBits => StatId::AdditionalBlueBitsDropPerEnemy,
            CurrencyId::PinkBits => StatId::AdditionalPinkBitsDropPerEnemy,
            CurrencyId::YellowBits => StatId::AdditionalYellowBitsDropPerEnemy,
            CurrencyId::GreenBits => StatId::AdditionalGreenBitsDropPerEnemy,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatTable {
    values: [i32; NUM_STATS],
}

impl Default for StatTable {
    fn default() -> Self {
        Self::new()
    }
}

impl StatTable {
    pub fn new() -> Self {
        let mut values = [0; NUM_STATS];
        for stat in StatId::ALL {
            values[stat.index()] = stat.default_value();
        }
        Self { values }
    }

    pub fn get(&self, stat: StatId) -> i32 {
        self.values[stat.index()]
    }

    pub fn set(&mut self, stat: StatId, value: i32) {
        self.values[stat.index()] = value;
    }

    pub fn add(&mut self, stat: StatId, delta: i32) {
        let slot = &mut self.values[stat.index()];
        *slot = slot.saturating_add(delta);
    }

    /// Max HP = base + bonus.
    pub fn max_hp(&self) -> i32 {
        self.get(StatId::BaseHp).saturating_add(self.get(StatId::Hp))
    }

    /// Per-hit damage before area scaling and crits.
    pub fn total_damage(&self) -> i32 {
        self.get(StatId::BaseDamage).saturating_add(self.get(StatId::Damage))
    }

    pub fn total_armor(&self) -> i32 {
        self.get(StatId::BaseArmor).saturating_add(self.get(StatId::Armor))
    }
}

/// Non-negative balances per currency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrencyWallet {
    balances: [i32; NUM_CURRENCIES],
}

impl Default for CurrencyWallet {
    fn default() -> Self {
        Self::new()
    }
}

impl CurrencyWallet {
    pub fn new() -> Self {
        Self {
            balances: [STARTING_CURRENCY; NUM_CURRENCIES],
        }
    }

    pub fn get(&self, currency: CurrencyId) -> i32 {
        self.balances[currency.index()]
    }

    pub fn set(&mut self, currency: CurrencyId, value: i32) {
        self.balances[currency.index()] = value.max(0);
    }

    pub fn add(&mut self, currency: CurrencyId, amount: i32) {
        let slot = &mut self.balances[currency.index()];
        *slot = slot.saturating_add(amount).max(0);
    }

    pub fn has_at_least(&self, currency: CurrencyId, amount: i32) -> bool {
        self.get(currency) >= amount
    }

    /// Spends `amount` if the balance covers it. Returns false and leaves the
    /// balance untouched otherwise.
    pub fn spend(&mut self, currency: CurrencyId, amount: i32) -> bool {
        if !self.has_at_least(currency, amount) {
            return false;
        }
        let slot = &mut self.balances[currency.index()];
        *slot = slot.saturating_sub(amount).max(0);
        true
    }

    pub fn total(&self) -> i64 {
        self.balances.iter().map(|&b| b as i64).sum()
    }
}

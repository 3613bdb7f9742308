//! The shipped upgrade catalog.

use super::types::UpgradeDefinition;
use crate::stats::{CurrencyId, StatId};

/// Default upgrade forest. `damage` is the only root; every other node hangs
/// off it through a chain of unlock roots.
pub fn default_catalog() -> Vec<UpgradeDefinition> {
    use CurrencyId::*;
    vec![
        UpgradeDefinition::new("damage", StatId::Damage, 2, 20, "5+5*(n-1)", BlueBits)
            .named("Sharper Edge", "+2 damage per level"),
        // Survival branch
        UpgradeDefinition::new("max_hp", StatId::Hp, 10, 20, "8*n", BlueBits)
            .named("Thick Skin", "+10 max HP per level")
            .unlocked_by("damage", 1),
        UpgradeDefinition::new("armor", StatId::Armor, 1, 10, "15*n", PinkBits)
            .named("Plating", "+1 armor per level")
            .unlocked_by("max_hp", 2),
        UpgradeDefinition::new("boss_armor", StatId::BossArmor, 2, 10, "20*n", YellowBits)
            .named("Boss Plating", "+2 armor against bosses per level")
            .unlocked_by("armor", 2),
        UpgradeDefinition::new("reflection_dampening", StatId::BaseReflection, -1, 4, "25*n*n", PinkBits)
            .named("Dampening", "-1 reflected damage per enemy struck")
            .unlocked_by("armor", 3),
        UpgradeDefinition::new("heal_per_kill", StatId::HealPerEnemyKill, 1, 10, "12*n", PinkBits)
            .named("Siphon", "Heal 1 HP per kill per level")
            .unlocked_by("max_hp", 3),
        UpgradeDefinition::new("heal_per_hit", StatId::HealPerEnemyHit, 1, 5, "25*n", GreenBits)
            .named("Leech", "Heal 1 HP per enemy struck per level")
            .unlocked_by("heal_per_kill", 2),
        // Offense branch
        UpgradeDefinition::new("attack_size", StatId::AttackSizeLevel, 1, 14, "10*n*n", BlueBits)
            .named("Wide Swing", "Larger attack area")
            .unlocked_by("damage", 2),
        UpgradeDefinition::new(
            "area_damage",
            StatId::AdditionalDamagePerEnemyInAreaPercent,
            5,
            10,
            "20*n",
            PinkBits,
        )
        .named("Crowd Fury", "+5% damage per enemy in the attack area")
        .unlocked_by("attack_size", 1),
        UpgradeDefinition::new("attack_speed", StatId::AttackSpeedPercent, 5, 10, "15+10*n", BlueBits)
            .named("Quick Hands", "+5% attack speed per level")
            .unlocked_by("damage", 3),
        UpgradeDefinition::new("crit_rate", StatId::CritRatePercent, 2, 20, "10*n", PinkBits)
            .named("Keen Eye", "+2% crit chance per level")
            .unlocked_by("damage", 3),
        UpgradeDefinition::new("crit_damage", StatId::CritDamagePercent, 10, 20, "15*n", YellowBits)
            .named("Brutality", "+10% crit damage per level")
            .unlocked_by("crit_rate", 2),
        UpgradeDefinition::new("boss_damage", StatId::BossDamage, 5, 10, "30*n", YellowBits)
            .named("Giant Slayer", "+5 damage against bosses per level")
            .unlocked_by("crit_damage", 1),
        // Economy branch
        UpgradeDefinition::new("blue_drop", StatId::AdditionalBlueBitsDropPerEnemy, 1, 10, "12*n", BlueBits)
            .named("Blue Harvest", "+1 Blue Bit per kill")
            .unlocked_by("damage", 1),
        UpgradeDefinition::new("pink_drop", StatId::AdditionalPinkBitsDropPerEnemy, 1, 10, "18*n", BlueBits)
            .named("Pink Harvest", "+1 Pink Bit per kill")
            .unlocked_by("blue_drop", 2),
        UpgradeDefinition::new("yellow_drop", StatId::AdditionalYellowBitsDropPerEnemy, 1, 10, "18*n", PinkBits)
            .named("Yellow Harvest", "+1 Yellow Bit per kill")
            .unlocked_by("pink_drop", 2),
        UpgradeDefinition::new("green_drop", StatId::AdditionalGreenBitsDropPerEnemy, 1, 10, "18*n", YellowBits)
            .named("Green Harvest", "+1 Green Bit per kill")
            .unlocked_by("yellow_drop", 2),
        UpgradeDefinition::new(
            "pickup_radius",
            StatId::CurrencyPickupRadiusIncreasePercent,
            10,
            10,
            "6*n",
            BlueBits,
        )
        .named("Magnet", "+10% pickup radius per level")
        .unlocked_by("blue_drop", 1),
        UpgradeDefinition::new("spawn_rate", StatId::SpawnRatePercent, 10, 10, "20*n", PinkBits)
            .named("Lure", "+10% enemy spawn rate per level")
            .unlocked_by("blue_drop", 3),
    ]
}

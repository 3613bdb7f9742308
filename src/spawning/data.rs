//! The shipped stage wave table.

use super::wave::{StageSpawnConfig, StageSpawnEntry};
use crate::enemies::{
    BLUE_SLIME, BOSS_PINK_SLIME, GREEN_SLIME, PINK_SLIME, RAINBOW_SLIME, YELLOW_SLIME,
};

pub const DEFAULT_STAGE_COUNT: u32 = 5;

pub fn default_stages() -> Vec<StageSpawnConfig> {
    (1..=DEFAULT_STAGE_COUNT).map(stage_waves).collect()
}

fn stage_waves(stage: u32) -> StageSpawnConfig {
    let mut entries = vec![StageSpawnEntry::new(BLUE_SLIME, 2.0, 2, 8 + 2 * stage as i32)];
    if stage >= 2 {
        entries.push(StageSpawnEntry::new(PINK_SLIME, 3.0, 1, 4 + stage as i32).starting_at(5.0));
    }
    if stage >= 3 {
        entries.push(StageSpawnEntry::new(YELLOW_SLIME, 4.0, 1, 4).starting_at(10.0));
    }
    if stage >= 4 {
        entries.push(StageSpawnEntry::new(GREEN_SLIME, 6.0, 1, 3).starting_at(15.0));
    }
    entries.push(StageSpawnEntry::new(RAINBOW_SLIME, 12.0, 1, 1).starting_at(20.0));
    StageSpawnConfig {
        stage,
        entries,
        boss: Some(BOSS_PINK_SLIME.to_string()),
    }
}

//! The shipped enemy roster.

use super::types::{EnemyBehavior, EnemyTemplate, RainbowDrop};
use crate::core::geometry::Vec2;
use crate::stats::CurrencyId;

pub const BLUE_SLIME: &str = "blue_slime";
pub const PINK_SLIME: &str = "pink_slime";
pub const YELLOW_SLIME: &str = "yellow_slime";
pub const GREEN_SLIME: &str = "green_slime";
pub const GREEN_SLIME_SMALL: &str = "green_slime_small";
pub const RAINBOW_SLIME: &str = "rainbow_slime";
pub const BOSS_PINK_SLIME: &str = "boss_pink_slime";

pub fn default_roster() -> Vec<EnemyTemplate> {
    vec![
        EnemyTemplate {
            exp: 10,
            move_speed: 1.5,
            ..EnemyTemplate::new(BLUE_SLIME, 20, CurrencyId::BlueBits, 1)
        },
        EnemyTemplate {
            exp: 15,
            move_speed: 1.8,
            reflection_multiplier: 1.2,
            ..EnemyTemplate::new(PINK_SLIME, 35, CurrencyId::PinkBits, 1)
        },
        EnemyTemplate {
            exp: 20,
            move_speed: 1.2,
            behavior: EnemyBehavior::Wandering {
                circle_radius: 1.0,
                circle_speed: 0.5,
            },
            ..EnemyTemplate::new(YELLOW_SLIME, 50, CurrencyId::YellowBits, 1)
        },
        EnemyTemplate {
            exp: 25,
            move_speed: 1.0,
            collision_size: Some(Vec2::new(1.2, 1.2)),
            behavior: EnemyBehavior::Splitting {
                child: GREEN_SLIME_SMALL.to_string(),
                count: 2,
            },
            ..EnemyTemplate::new(GREEN_SLIME, 70, CurrencyId::GreenBits, 1)
        },
        EnemyTemplate {
            exp: 5,
            move_speed: 2.2,
            collision_size: Some(Vec2::new(0.5, 0.5)),
            ..EnemyTemplate::new(GREEN_SLIME_SMALL, 15, CurrencyId::GreenBits, 1)
        },
        EnemyTemplate {
            exp: 40,
            move_speed: 2.5,
            reflection_multiplier: 0.5,
            behavior: EnemyBehavior::Rainbow {
                drops: vec![
                    RainbowDrop {
                        currency: CurrencyId::BlueBits,
                        base_amount: 5,
                    },
                    RainbowDrop {
                        currency: CurrencyId::PinkBits,
                        base_amount: 4,
                    },
                    RainbowDrop {
                        currency: CurrencyId::YellowBits,
                        base_amount: 3,
                    },
                    RainbowDrop {
                        currency: CurrencyId::GreenBits,
                        base_amount: 2,
                    },
                ],
            },
            ..EnemyTemplate::new(RAINBOW_SLIME, 30, CurrencyId::BlueBits, 0)
        },
        EnemyTemplate {
            exp: 200,
            move_speed: 3.0,
            reflection_multiplier: 3.0,
            collision_size: Some(Vec2::new(2.5, 2.5)),
            ..EnemyTemplate::new(BOSS_PINK_SLIME, 1500, CurrencyId::PinkBits, 30)
        },
    ]
}

// Tick and timing
pub const TICK_INTERVAL_MS: u64 = 16;
pub const BASE_ATTACK_PERIOD_SECONDS: f64 = 1.0;
pub const MIN_ATTACK_PERIOD_SECONDS: f64 = 0.05;
pub const HP_LOSS_INTERVAL_SECONDS: f64 = 1.0;
pub const MIN_SPAWN_RATE_MODIFIER: f64 = 0.01;

// Experience
pub const EXP_PER_LEVEL_MULTIPLIER: i32 = 100;

// Stats and counts
pub const NUM_STATS: usize = 25;
pub const NUM_CURRENCIES: usize = 4;
pub const STARTING_CURRENCY: i32 = 0;

// Damage intake
pub const MIN_DAMAGE_AFTER_ARMOR: i32 = 1;

// Attack footprint (area level 0..=MAX_ATTACK_SIZE_LEVEL)
pub const MAX_ATTACK_SIZE_LEVEL: usize = 14;
pub const ATTACK_SIZE_STEP_PER_LEVEL: f32 = 0.1;
pub const BASE_ATTACK_SIZE: f32 = 2.0;

// Player movement
pub const PLAYER_MOVE_SPEED: f32 = 10.0;
pub const PLAYER_RESTING_X: f32 = 100.0;
pub const PLAYER_RESTING_Y: f32 = 0.0;

// Currency pickup and flight
pub const BASE_PICKUP_RADIUS: f32 = 2.0;
pub const PICKUP_DISTANCE_THRESHOLD: f32 = 0.25;
pub const DROP_FLY_TIME_SECONDS: f64 = 1.0;
pub const DROP_MAX_SPEED: f32 = 15.0;
pub const DROP_ACCELERATION: f32 = 5.0;
pub const DROP_FALLBACK_SCATTER_RADIUS: f32 = 0.5;

// Enemy lifecycle
pub const ENEMY_SPAWN_GRACE_SECONDS: f64 = 8.0;
pub const OFFSCREEN_BUFFER_FRACTION: f32 = 0.1;
pub const SPAWN_EDGE_BUFFER: f32 = 0.5;
pub const DEFAULT_POOL_SIZE: usize = 10;

// Boss
pub const BOSS_CHARGE_SECONDS: f64 = 30.0;
pub const BOSS_LIFETIME_SECONDS: f64 = 180.0;
pub const BOSS_MOVE_SPEED: f32 = 3.0;
pub const BOSS_ARRIVAL_DISTANCE: f32 = 0.1;
pub const STAGES_UNLOCKED_PER_BOSS: u32 = 1;

// Visible play area (orthographic camera centred on the origin)
pub const VIEW_HALF_WIDTH: f32 = 5.0;
pub const VIEW_HALF_HEIGHT: f32 = 9.0;

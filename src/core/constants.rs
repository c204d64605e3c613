// Tick and timing
pub const TICK_INTERVAL_MS: u64 = 100;
pub const TICKS_PER_SECOND: u64 = 1000 / TICK_INTERVAL_MS;
pub const AUTOSAVE_DEBOUNCE_MS: u64 = 1_500;

// Experience curve: max_exp = realm exp base * level^EXPONENT
pub const BASE_EXP_PER_TICK: f64 = 1.0;
pub const EXP_CURVE_EXPONENT: f64 = 1.5;
pub const SPIRIT_EXP_BONUS_PER_POINT: f64 = 0.01;
pub const OFFLINE_MULTIPLIER: f64 = 0.5;
pub const MAX_OFFLINE_SECONDS: i64 = 7 * 24 * 60 * 60;
/// Percent of max hp recovered per second of meditation.
pub const MEDITATION_HP_REGEN_PERCENT: u32 = 1;

// Realm levels
pub const MIN_REALM_LEVEL: u8 = 1;
pub const MAX_REALM_LEVEL: u8 = 9;
pub const STAT_GROWTH_PER_LEVEL: f64 = 0.12;

// Starting character
pub const STARTING_LUCK: u32 = 10;
pub const STARTING_SPIRIT_STONES: u64 = 50;

// Adventures
pub const ADVENTURE_EXP_MIN_TICKS: u64 = 150;
pub const ADVENTURE_EXP_MAX_TICKS: u64 = 300;
pub const ADVENTURE_STONES_MIN: u64 = 5;
pub const ADVENTURE_STONES_MAX: u64 = 25;
pub const ADVENTURE_MATERIAL_CHANCE: f64 = 0.12;
pub const ADVENTURE_TRIAL_CHANCE: f64 = 0.05;
pub const ADVENTURE_DAMAGE_PERCENT_MAX: u32 = 30;

// Refinement
pub const MAX_REFINEMENT: u32 = 100;
pub const REFINEMENT_STEP: u32 = 10;
pub const REFINEMENT_STONE_COST: u64 = 20;

// Death flow
pub const DEATH_EXP_PENALTY_PERCENT: u64 = 50;

// Save format
pub const SAVE_VERSION_MAGIC: u64 = 0x5741_5354_4C41_4E44; // "WASTLAND"

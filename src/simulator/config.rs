//! Simulation configuration.

use crate::character::realm::Realm;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of simulation runs to perform
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Maximum meditation ticks per run before timeout
    pub max_ticks_per_run: u64,

    /// Realm a run is trying to enter
    pub target_realm: Realm,

    /// Ticks between adventures (0 = never adventure)
    pub adventure_interval: u64,

    /// Whether runs spend spirit stones refining breakthrough materials
    pub auto_refine: bool,

    /// Log verbosity (0 = silent, 1 = summary, 2 = detailed)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 100,
            seed: None,
            max_ticks_per_run: 2_000_000,
            target_realm: Realm::GoldenCore,
            adventure_interval: 600,
            auto_refine: true,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Quick config for checking one realm's tribulation odds
    pub fn realm_balance_test(target_realm: Realm) -> Self {
        Self {
            num_runs: 20,
            target_realm,
            ..Default::default()
        }
    }
}

//! Breakthroughs and heavenly tribulations.
//!
//! The threshold monitor, condition checker, tribulation decision, resolver
//! and applier, wired together by [`BreakthroughMachine`].

pub mod applier;
pub mod conditions;
pub mod config;
pub mod machine;
pub mod policy;
pub mod resolver;
pub mod types;

pub use applier::{apply_breakthrough, apply_tribulation_failure};
pub use conditions::check_breakthrough;
pub use config::{ConfigError, TribulationConfig};
pub use machine::BreakthroughMachine;
pub use policy::{requires_tribulation, strike_count};
pub use resolver::{resolve_with_rng, strike_survival_chance};
pub use types::*;

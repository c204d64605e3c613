//! Game balance simulator for Monte Carlo analysis.
//!
//! Run many simulated characters to see how long each realm takes to reach
//! and how often heavenly tribulations kill. Runs drive a real
//! [`GameSession`](crate::core::GameSession), so results match gameplay.

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::{RunStats, SimReport};
pub use runner::{run_simulation, run_simulation_with, simulate_single_run};

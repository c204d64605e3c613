//! Wasteland - Cultivation Breakthrough Engine
//!
//! This module exposes the game logic for testing and external use.

pub mod build_info;
pub mod character;
pub mod core;
pub mod items;
pub mod persistence;
pub mod quests;
pub mod simulator;
pub mod tribulation;

pub use crate::core::game_state::{PlayerState, ProgressFlag};
pub use crate::core::session::GameSession;
pub use crate::tribulation::{BreakthroughMachine, Transition, TribulationResult};

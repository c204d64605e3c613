//! Core game state and logic.

#![allow(unused_imports)]

pub mod collaborators;
pub mod constants;
pub mod game_logic;
pub mod game_state;
pub mod session;
pub mod tick;

pub use collaborators::*;
pub use constants::*;
pub use game_logic::*;
pub use game_state::*;
pub use session::GameSession;
pub use tick::{game_tick, TickEvent, TickResult};

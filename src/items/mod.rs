//! Item system: types and the inventory.

pub mod inventory;
pub mod types;

pub use inventory::*;
pub use types::*;

//! Character attributes, realms, and derived stats.

#![allow(unused_imports)]

pub mod attributes;
pub mod death;
pub mod derived_stats;
pub mod realm;

pub use attributes::*;
pub use death::*;
pub use derived_stats::*;
pub use realm::*;

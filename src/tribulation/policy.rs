//! Decides whether a realm transition summons a heavenly tribulation.

use crate::character::realm::{Realm, TribulationRule};
use crate::core::game_state::PlayerState;

/// Pure predicate over the player and the realm being entered.
pub fn requires_tribulation(player: &PlayerState, target: Realm) -> bool {
    match target.info().tribulation {
        TribulationRule::Never => false,
        TribulationRule::Always => true,
        TribulationRule::UnlessFlag(flag) => !player.has_flag(flag),
    }
}

/// Number of strikes the heavens send for `target`. At least one.
pub fn strike_count(target: Realm) -> u32 {
    target.info().tribulation_strikes.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::game_state::ProgressFlag;

    #[test]
    fn test_first_realm_never_requires() {
        let p = PlayerState::new("Test".to_string(), 0);
        assert!(!requires_tribulation(&p, Realm::QiRefining));
    }

    #[test]
    fn test_always_realms() {
        let mut p = PlayerState::new("Test".to_string(), 0);
        assert!(requires_tribulation(&p, Realm::Foundation));
        // Flags do not waive an Always rule
        p.flags.insert(ProgressFlag::StableFoundation);
        assert!(requires_tribulation(&p, Realm::Foundation));
    }

    #[test]
    fn test_golden_core_waived_by_stable_foundation() {
        let mut p = PlayerState::new("Test".to_string(), 0);
        assert!(requires_tribulation(&p, Realm::GoldenCore));
        p.flags.insert(ProgressFlag::StableFoundation);
        assert!(!requires_tribulation(&p, Realm::GoldenCore));
    }

    #[test]
    fn test_strike_counts() {
        assert_eq!(strike_count(Realm::Foundation), 3);
        assert_eq!(strike_count(Realm::TrueImmortal), 9);
        assert_eq!(strike_count(Realm::QiRefining), 1);
    }
}

//! Runs a heavenly tribulation to an outcome.
//!
//! The presentation layer may also supply an outcome directly through
//! [`TribulationResult::success`] / [`TribulationResult::failure`]; this module
//! is the built-in resolution used by the terminal host and the simulator.

use super::config::TribulationConfig;
use super::types::{TribulationResult, TribulationState};
use crate::character::realm::Realm;
use crate::core::game_state::PlayerState;
use rand::Rng;

/// Stat ratios stop helping past twice the realm's base value.
const MAX_STAT_RATIO: f64 = 2.0;

fn stat_ratio(value: u32, base: u32) -> f64 {
    (value as f64 / base.max(1) as f64).min(MAX_STAT_RATIO)
}

/// Chance to survive a single strike when entering `target`.
pub fn strike_survival_chance(
    player: &PlayerState,
    target: Realm,
    config: &TribulationConfig,
) -> f64 {
    let info = target.info();
    let attrs = &player.attributes;

    let mut chance = config.base_survival_chance;
    chance += config.defense_weight * stat_ratio(attrs.defense, info.base_defense);
    chance += config.spirit_weight * stat_ratio(attrs.spirit, info.base_spirit);
    chance += config.physique_weight * stat_ratio(attrs.physique, info.base_physique);
    chance += config.luck_weight * attrs.luck as f64;
    chance.clamp(config.min_chance, config.max_chance)
}

/// Hp lost to each survived strike.
pub fn strike_damage(player: &PlayerState, config: &TribulationConfig) -> u32 {
    let damage = u64::from(player.attributes.max_hp) * u64::from(config.strike_hp_percent) / 100;
    u32::try_from(damage).unwrap_or(u32::MAX).max(1)
}

/// Rolls every strike against the snapshot taken at confirmation.
pub fn resolve_with_rng(
    state: &TribulationState,
    config: &TribulationConfig,
    rng: &mut impl Rng,
) -> TribulationResult {
    let snapshot = &state.snapshot;
    let target = state.target.realm;
    let chance = strike_survival_chance(snapshot, target, config);
    let damage = strike_damage(snapshot, config);
    let mut hp_loss: u32 = 0;

    for strike in 1..=state.strikes {
        let roll: f64 = rng.gen();
        log::debug!(
            "tribulation strike {}/{}: roll {:.3} vs chance {:.3}",
            strike,
            state.strikes,
            roll,
            chance
        );

        if roll >= chance {
            return TribulationResult::failure(
                format!(
                    "Lightning strike {} of {} tore through your meridians.",
                    strike, state.strikes
                ),
                format!("Struck down by the {} tribulation", target),
            );
        }

        hp_loss = hp_loss.saturating_add(damage);
        if hp_loss >= snapshot.attributes.hp {
            return TribulationResult::failure(
                format!(
                    "You endured strike {} of {}, but your body gave out.",
                    strike, state.strikes
                ),
                format!("Body shattered during the {} tribulation", target),
            );
        }
    }

    TribulationResult::success(
        format!(
            "You weathered all {} strikes and entered {}.",
            state.strikes, target
        ),
        Some(hp_loss).filter(|loss| *loss > 0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::realm::RealmPosition;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn open_state(strikes: u32) -> TribulationState {
        let mut snapshot = PlayerState::new("Test".to_string(), 0);
        snapshot.realm_level = 9;
        TribulationState {
            target: RealmPosition::new(Realm::Foundation, 1),
            snapshot,
            strikes,
        }
    }

    fn certain(chance: f64) -> TribulationConfig {
        TribulationConfig {
            min_chance: chance,
            max_chance: chance,
            ..Default::default()
        }
    }

    #[test]
    fn test_certain_survival_reports_hp_cost() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let state = open_state(3);
        let result = resolve_with_rng(&state, &certain(1.0), &mut rng);
        // 5% of 100 max hp per strike
        assert_eq!(result, TribulationResult::success(result.description(), Some(15)));
        assert!(result.is_success());
    }

    #[test]
    fn test_certain_failure_on_first_strike() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = resolve_with_rng(&open_state(3), &certain(0.0), &mut rng);
        match result {
            TribulationResult::Failure {
                description,
                death_reason,
            } => {
                assert!(description.contains("strike 1 of 3"));
                assert!(death_reason.contains("Foundation Establishment"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_hp_exhaustion_fails() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut state = open_state(3);
        state.snapshot.attributes.hp = 10;
        let result = resolve_with_rng(&state, &certain(1.0), &mut rng);
        assert!(!result.is_success());
        assert!(result.description().contains("body gave out"));
    }

    #[test]
    fn test_strike_damage_floors_at_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let config = TribulationConfig {
            strike_hp_percent: 0,
            ..certain(1.0)
        };
        let result = resolve_with_rng(&open_state(2), &config, &mut rng);
        assert_eq!(result, TribulationResult::success(result.description(), Some(2)));
    }

    #[test]
    fn test_oversized_strike_percent_does_not_overflow() {
        let config = TribulationConfig {
            strike_hp_percent: 50_000_000,
            ..certain(1.0)
        };
        let mut state = open_state(3);
        state.snapshot.attributes.max_hp = u32::MAX;
        state.snapshot.attributes.hp = u32::MAX;

        assert_eq!(strike_damage(&state.snapshot, &config), u32::MAX);
        let result = resolve_with_rng(&state, &config, &mut ChaCha8Rng::seed_from_u64(1));
        assert!(!result.is_success());
    }

    #[test]
    fn test_survival_chance_rises_with_stats() {
        let config = TribulationConfig::default();
        let weak = PlayerState::new("Weak".to_string(), 0);
        let mut strong = weak.clone();
        strong.attributes.defense = 100;
        strong.attributes.spirit = 100;
        strong.attributes.physique = 100;

        let weak_chance = strike_survival_chance(&weak, Realm::Foundation, &config);
        let strong_chance = strike_survival_chance(&strong, Realm::Foundation, &config);
        assert!(strong_chance > weak_chance);
        assert!(strong_chance <= config.max_chance);
        assert!(weak_chance >= config.min_chance);
    }

    #[test]
    fn test_seeded_resolution_is_deterministic() {
        let config = TribulationConfig::default();
        let state = open_state(3);
        let a = resolve_with_rng(&state, &config, &mut ChaCha8Rng::seed_from_u64(42));
        let b = resolve_with_rng(&state, &config, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}

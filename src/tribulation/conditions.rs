//! Non-experience prerequisites for entering a realm.

use super::types::ConditionCheck;
use crate::character::realm::{Realm, Requirement};
use crate::core::game_state::PlayerState;

/// Checks whether `player` satisfies the entry requirement of `target`.
pub fn check_breakthrough(player: &PlayerState, target: Realm) -> ConditionCheck {
    match target.info().requirement {
        Requirement::None => ConditionCheck::pass(format!("Ready to enter {}", target)),
        Requirement::Flag(flag) => {
            if player.has_flag(flag) {
                ConditionCheck::pass(format!("{} complete, ready to enter {}", flag.name(), target))
            } else {
                ConditionCheck::fail(format!(
                    "Your cultivation stalls at the peak. Complete the {} before entering {}.",
                    flag.name(),
                    target
                ))
            }
        }
        Requirement::Item {
            kind,
            min_refinement,
        } => {
            if player
                .inventory
                .find_refined(kind, min_refinement)
                .is_some()
            {
                return ConditionCheck::pass(format!("{} ready, entering {}", kind.name(), target));
            }
            let best = player
                .inventory
                .items()
                .iter()
                .filter(|i| i.kind == kind)
                .map(|i| i.refinement)
                .max();
            match best {
                Some(progress) => ConditionCheck::fail(format!(
                    "Your {} is only {}% refined. {} requires {}%.",
                    kind.name(),
                    progress,
                    target,
                    min_refinement
                )),
                None => ConditionCheck::fail(format!(
                    "Entering {} requires a {} refined to {}%.",
                    target,
                    kind.name(),
                    min_refinement
                )),
            }
        }
    }
}

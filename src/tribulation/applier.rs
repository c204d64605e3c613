//! Commits a breakthrough or a tribulation death into a new `PlayerState`.

use crate::character::derived_stats::DerivedStats;
use crate::character::realm::Requirement;
use crate::core::game_logic::exp_for_level;
use crate::core::game_state::PlayerState;

/// Advances one position and returns the replacement record.
///
/// Everything lands in the same value: new realm/level, fresh max exp,
/// carried-over exp, recomputed stats, the consumed breakthrough material and
/// the tribulation hp cost.
///
/// The cost is subtracted exactly while it is below the current hp. A cost at
/// or above it leaves hp at 1, since a successful breakthrough never kills.
///
/// The material is checked before a tribulation opens. If it has gone missing
/// by the time the breakthrough lands, the advance still happens and the gap
/// is logged.
///
/// Returns the player unchanged at the terminal position.
pub fn apply_breakthrough(player: &PlayerState, hp_loss: u32) -> PlayerState {
    let from = player.position();
    let Some(to) = from.next() else {
        return player.clone();
    };

    let mut next = player.clone();

    if to.realm != from.realm {
        if let Requirement::Item {
            kind,
            min_refinement,
        } = to.realm.info().requirement
        {
            let used = next
                .inventory
                .find_refined(kind, min_refinement)
                .map(|item| item.id);
            match used.map(|id| next.inventory.consume_one(id)) {
                Some(Ok(())) => {}
                Some(Err(e)) => log::warn!("could not consume {}: {}", kind.name(), e),
                None => log::warn!(
                    "{} entered {} without a refined {}",
                    player.character_name,
                    to.realm,
                    kind.name()
                ),
            }
        }
    }

    next.realm = to.realm;
    next.realm_level = to.level;
    next.exp = player.exp.saturating_sub(player.max_exp);
    next.max_exp = exp_for_level(to);

    let derived = DerivedStats::calculate_derived_stats(to, &next.inventory);
    next.attributes = derived.apply_to(&player.attributes);
    next.attributes.hp = next.attributes.hp.saturating_sub(hp_loss).max(1);
    next.total_breakthroughs += 1;

    log::info!(
        "{} broke through {} -> {} (hp cost {})",
        player.character_name,
        from,
        to,
        hp_loss
    );

    next
}

/// Records a tribulation death: hp 0, reason kept for the death flow,
/// realm and level untouched.
pub fn apply_tribulation_failure(player: &PlayerState, reason: &str) -> PlayerState {
    let mut next = player.clone();
    next.attributes.hp = 0;
    next.death_reason = Some(reason.to_string());
    log::warn!("{} died: {}", player.character_name, reason);
    next
}

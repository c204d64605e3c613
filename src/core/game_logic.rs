use crate::character::derived_stats::DerivedStats;
use crate::character::realm::{Realm, RealmPosition, Requirement};
use crate::core::constants::*;
use crate::core::game_state::{PlayerState, ProgressFlag};
use crate::items::{InventoryError, ItemKind};
use rand::Rng;

/// Experience required to leave `position`.
pub fn exp_for_level(position: RealmPosition) -> u64 {
    let base = position.realm.info().exp_base as f64;
    (base * f64::powf(position.level as f64, EXP_CURVE_EXPONENT)) as u64
}

/// Exp rates scale with the realm's curve so time-per-level stays comparable.
pub fn realm_exp_multiplier(realm: Realm) -> f64 {
    realm.info().exp_base as f64 / Realm::QiRefining.info().exp_base as f64
}

/// Meditation exp per tick, boosted by equipped spirit bonuses.
pub fn exp_gain_per_tick(player: &PlayerState) -> f64 {
    let spirit_bonus = player.inventory.equipped_bonus().spirit as f64;
    BASE_EXP_PER_TICK
        * realm_exp_multiplier(player.realm)
        * (1.0 + spirit_bonus * SPIRIT_EXP_BONUS_PER_POINT)
}

/// Adds exp without evaluating breakthroughs; the breakthrough machine
/// decides what happens once exp reaches the threshold.
pub fn apply_exp(player: &PlayerState, amount: u64) -> PlayerState {
    PlayerState {
        exp: player.exp.saturating_add(amount),
        ..player.clone()
    }
}

/// Recomputes attributes for the current position and equipment.
pub fn recalculate_stats(player: &PlayerState) -> PlayerState {
    let derived = DerivedStats::calculate_derived_stats(player.position(), &player.inventory);
    PlayerState {
        attributes: derived.apply_to(&player.attributes),
        ..player.clone()
    }
}

/// Result of a single adventure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdventureReport {
    pub exp_gained: u64,
    pub stones_gained: u64,
    pub item_found: Option<ItemKind>,
    pub flag_earned: Option<ProgressFlag>,
    pub damage_taken: u32,
}

/// Material worth hunting for at the player's current realm.
fn material_for(player: &PlayerState) -> ItemKind {
    let upcoming = Realm::all()
        .into_iter()
        .filter(|r| *r > player.realm)
        .find_map(|r| match r.info().requirement {
            Requirement::Item { kind, .. } => Some(kind),
            _ => None,
        });
    upcoming.unwrap_or(ItemKind::HealingPill)
}

/// Trial a lucky adventure can complete at the player's current realm.
fn trial_for(player: &PlayerState) -> Option<ProgressFlag> {
    if player.realm == Realm::QiRefining && !player.has_flag(ProgressFlag::StableFoundation) {
        return Some(ProgressFlag::StableFoundation);
    }
    let next = player.realm.next()?;
    match next.info().requirement {
        Requirement::Flag(flag) if !player.has_flag(flag) => Some(flag),
        _ => None,
    }
}

/// Sends the character out into the wasteland. Adventures wound but never kill.
pub fn go_on_adventure(player: &PlayerState, rng: &mut impl Rng) -> (PlayerState, AdventureReport) {
    let mut next = player.clone();
    let mut report = AdventureReport::default();

    let ticks = rng.gen_range(ADVENTURE_EXP_MIN_TICKS..=ADVENTURE_EXP_MAX_TICKS);
    report.exp_gained = (exp_gain_per_tick(player) * ticks as f64) as u64;
    next.exp = next.exp.saturating_add(report.exp_gained);

    let stones = rng.gen_range(ADVENTURE_STONES_MIN..=ADVENTURE_STONES_MAX);
    report.stones_gained = (stones as f64 * realm_exp_multiplier(player.realm)) as u64;
    next.spirit_stones = next.spirit_stones.saturating_add(report.stones_gained);

    if rng.gen::<f64>() < ADVENTURE_MATERIAL_CHANCE {
        let kind = material_for(player);
        next.inventory.add(kind, 1);
        report.item_found = Some(kind);
    }

    if rng.gen::<f64>() < ADVENTURE_TRIAL_CHANCE {
        if let Some(flag) = trial_for(player) {
            next.flags.insert(flag);
            report.flag_earned = Some(flag);
        }
    }

    let percent = rng.gen_range(0..=ADVENTURE_DAMAGE_PERCENT_MAX);
    report.damage_taken = next.attributes.max_hp * percent / 100;
    next.attributes.wound(report.damage_taken);

    (next, report)
}

/// Spends spirit stones to advance an item's refinement.
pub fn refine_item(player: &PlayerState, item_id: u64) -> Result<PlayerState, InventoryError> {
    if player.spirit_stones < REFINEMENT_STONE_COST {
        return Err(InventoryError::InsufficientStones {
            need: REFINEMENT_STONE_COST,
            have: player.spirit_stones,
        });
    }
    let mut next = player.clone();
    next.inventory.refine(item_id, REFINEMENT_STEP)?;
    next.spirit_stones -= REFINEMENT_STONE_COST;
    Ok(next)
}

/// Equips an item and recomputes stats in the same update.
pub fn equip_item(player: &PlayerState, item_id: u64) -> Result<PlayerState, InventoryError> {
    let mut next = player.clone();
    next.inventory.equip(item_id)?;
    Ok(recalculate_stats(&next))
}

/// Swallows a healing pill, restoring hp to full.
pub fn use_healing_pill(player: &PlayerState) -> Result<PlayerState, InventoryError> {
    let pill = player
        .inventory
        .items()
        .iter()
        .find(|i| i.kind == ItemKind::HealingPill)
        .map(|i| i.id)
        .ok_or_else(|| InventoryError::NoneLeft(ItemKind::HealingPill.name().to_string()))?;

    let mut next = player.clone();
    next.inventory.consume_one(pill)?;
    next.attributes.heal_full();
    Ok(next)
}

/// Hp recovered by one second of meditation.
pub fn meditation_regen(player: &PlayerState) -> u32 {
    (player.attributes.max_hp * MEDITATION_HP_REGEN_PERCENT / 100).max(1)
}

/// Report of offline progression results
#[derive(Debug, Default, PartialEq)]
pub struct OfflineReport {
    pub elapsed_seconds: i64,
    pub exp_gained: u64,
}

/// Exp banked during offline time, at a reduced rate and capped at seven days.
pub fn calculate_offline_exp(elapsed_seconds: i64, exp_per_tick: f64) -> f64 {
    let capped_seconds = elapsed_seconds.clamp(0, MAX_OFFLINE_SECONDS);
    let ticks = capped_seconds as f64 * TICKS_PER_SECOND as f64;
    ticks * exp_per_tick * OFFLINE_MULTIPLIER
}

/// Banks offline exp. Breakthroughs are left to the machine afterwards.
pub fn process_offline_progression(
    player: &PlayerState,
    current_time: i64,
) -> (PlayerState, OfflineReport) {
    let elapsed_seconds = current_time - player.last_save_time;
    if elapsed_seconds <= 0 {
        return (player.clone(), OfflineReport::default());
    }

    let exp = calculate_offline_exp(elapsed_seconds, exp_gain_per_tick(player)) as u64;
    let mut next = apply_exp(player, exp);
    next.last_save_time = current_time;

    (
        next,
        OfflineReport {
            elapsed_seconds,
            exp_gained: exp,
        },
    )
}

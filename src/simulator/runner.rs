//! Main simulation runner driving a real [`GameSession`].
//!
//! Every run plays the same tick loop the terminal host does, confirming
//! every tribulation and resolving it with the built-in strike rolls.
//! Statistics are gathered from the transitions the session returns.

use super::config::SimConfig;
use super::report::{RunStats, SimReport};
use crate::character::death::ReviveWithPenalty;
use crate::character::realm::Requirement;
use crate::core::collaborators::{NoQuests, NoSave};
use crate::core::constants::REFINEMENT_STONE_COST;
use crate::core::game_logic::use_healing_pill;
use crate::core::session::GameSession;
use crate::core::tick::{game_tick, TickEvent};
use crate::items::ItemKind;
use crate::tribulation::{BreakthroughMachine, TribulationConfig, Transition};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

type SimSession = GameSession<NoSave, ReviveWithPenalty, NoQuests>;

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig) -> SimReport {
    run_simulation_with(config, &TribulationConfig::default())
}

pub fn run_simulation_with(config: &SimConfig, tribulation: &TribulationConfig) -> SimReport {
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed + run_idx as u64),
            None => ChaCha8Rng::from_entropy(),
        };

        let stats = simulate_single_run(config, tribulation, &mut rng);

        if config.verbosity >= 2 {
            println!(
                "Run {}/{} - {} {}, Ticks {}, Tribulations {}/{}, Deaths {}",
                run_idx + 1,
                config.num_runs,
                stats.final_realm,
                stats.final_level,
                stats.total_ticks,
                stats.tribulations_survived,
                stats.tribulations_faced,
                stats.total_deaths
            );
        }
        all_runs.push(stats);
    }

    SimReport::from_runs(all_runs, config.target_realm, config.max_ticks_per_run)
}

/// Plays one character from Qi Refining 1 until the target realm or timeout.
pub fn simulate_single_run(
    config: &SimConfig,
    tribulation: &TribulationConfig,
    rng: &mut impl Rng,
) -> RunStats {
    let player = crate::core::game_state::PlayerState::new("Simulated".to_string(), 0);
    let mut session: SimSession = GameSession::new(
        player,
        BreakthroughMachine::new(tribulation.clone()),
        NoSave,
        ReviveWithPenalty::default(),
        NoQuests,
    );
    let mut stats = RunStats::new();

    for tick in 1..=config.max_ticks_per_run {
        stats.total_ticks = tick;

        let result = game_tick(&mut session);
        for event in &result.events {
            if let TickEvent::Breakthrough { to, .. } = event {
                record_entry(&mut stats, to.realm.index(), tick);
            }
        }
        drive_pending(&mut session, rng, &mut stats, tick);

        if config.adventure_interval > 0 && tick % config.adventure_interval == 0 {
            let (_, transition) = session.adventure(rng);
            stats.adventures += 1;
            handle_transition(&mut session, transition, rng, &mut stats, tick);
        }

        if config.auto_refine {
            refine_next_material(&mut session, rng, &mut stats, tick);
        }

        if session.player().realm >= config.target_realm {
            stats.reached_target = true;
            break;
        }
    }

    stats.final_realm = session.player().realm;
    stats.final_level = session.player().realm_level;
    stats
}

/// The tick already committed whatever it decided; this picks up the
/// confirmation the machine may now be waiting on.
fn drive_pending(session: &mut SimSession, rng: &mut impl Rng, stats: &mut RunStats, tick: u64) {
    if session.machine().pending_confirmation().is_some() {
        face_tribulation(session, rng, stats, tick);
    }
}

fn handle_transition(
    session: &mut SimSession,
    transition: Transition,
    rng: &mut impl Rng,
    stats: &mut RunStats,
    tick: u64,
) {
    match transition {
        Transition::AwaitingConfirmation(_) => face_tribulation(session, rng, stats, tick),
        Transition::Advanced { from, to, .. } if from.realm != to.realm => {
            record_entry(stats, to.realm.index(), tick);
        }
        _ => {}
    }
}

fn face_tribulation(session: &mut SimSession, rng: &mut impl Rng, stats: &mut RunStats, tick: u64) {
    let player = session.player();
    if player.attributes.hp < player.attributes.max_hp {
        if let Ok(healed) = use_healing_pill(player) {
            session.replace_player(healed);
        }
    }

    if session.confirm_tribulation().is_err() {
        return;
    }
    stats.tribulations_faced += 1;

    match session.run_tribulation(rng) {
        Ok((_, Transition::Advanced { to, .. })) => {
            stats.tribulations_survived += 1;
            record_entry(stats, to.realm.index(), tick);
        }
        Ok((_, Transition::Died { .. })) => stats.total_deaths += 1,
        Ok(_) => {}
        Err(e) => log::warn!("simulated tribulation could not resolve: {}", e),
    }
}

fn record_entry(stats: &mut RunStats, realm_index: usize, tick: u64) {
    if let Some(slot) = stats.realm_entry_ticks.get_mut(realm_index) {
        slot.get_or_insert(tick);
    }
}

/// Refines one unit of the material the next realm demands, if affordable.
fn refine_next_material(
    session: &mut SimSession,
    rng: &mut impl Rng,
    stats: &mut RunStats,
    tick: u64,
) {
    let player = session.player();
    let Some(next) = player.realm.next() else {
        return;
    };
    let Requirement::Item {
        kind,
        min_refinement,
    } = next.info().requirement
    else {
        return;
    };
    if player.spirit_stones < REFINEMENT_STONE_COST
        || player.inventory.find_refined(kind, min_refinement).is_some()
    {
        return;
    }

    let Some(id) = best_candidate(session, kind) else {
        return;
    };
    if let Ok(transition) = session.refine(id) {
        stats.items_refined += 1;
        handle_transition(session, transition, rng, stats, tick);
    }
}

/// The most refined unit of `kind`, so progress concentrates on one item.
fn best_candidate(session: &SimSession, kind: ItemKind) -> Option<u64> {
    session
        .player()
        .inventory
        .items()
        .iter()
        .filter(|i| i.kind == kind)
        .max_by_key(|i| i.refinement)
        .map(|i| i.id)
}

//! Integration test: breakthrough state machine
//!
//! Drives BreakthroughMachine through every path a host can take: level-ups,
//! blocked breakthroughs, declined and confirmed tribulations, and the
//! terminal peak.

use wasteland::character::realm::{Realm, RealmPosition};
use wasteland::core::game_logic::exp_for_level;
use wasteland::items::ItemKind;
use wasteland::tribulation::{BreakthroughPhase, TribulationResult};
use wasteland::{BreakthroughMachine, PlayerState, Transition};

fn player_at(realm: Realm, level: u8) -> PlayerState {
    let mut player = PlayerState::new("Integration Test Survivor".to_string(), 0);
    player.realm = realm;
    player.realm_level = level;
    player.max_exp = exp_for_level(player.position());
    player
}

fn full(realm: Realm, level: u8) -> PlayerState {
    let mut player = player_at(realm, level);
    player.exp = player.max_exp;
    player
}

/// Commits the replacement record a transition carries, if any.
fn commit(player: PlayerState, transition: &Transition) -> PlayerState {
    transition.player().cloned().unwrap_or(player)
}

#[test]
fn test_terminal_peak_is_idempotent() {
    let mut machine = BreakthroughMachine::default();
    let mut player = full(Realm::TrueImmortal, 9);
    player.exp = player.max_exp + 5_000;

    let t = machine.evaluate(&player);
    let Transition::Terminal { player: clamped } = &t else {
        panic!("expected terminal, got {:?}", t);
    };
    assert_eq!(clamped.exp, clamped.max_exp);
    assert_eq!(clamped.position(), RealmPosition::new(Realm::TrueImmortal, 9));

    let player = commit(player, &t);
    for _ in 0..5 {
        assert_eq!(machine.evaluate(&player), Transition::None);
    }
    assert_eq!(player.exp, player.max_exp);
}

#[test]
fn test_one_evaluate_one_advance() {
    let mut machine = BreakthroughMachine::default();
    // Enough exp for several levels; only one may be applied per call
    let mut player = full(Realm::QiRefining, 3);
    player.exp = 10_000;

    let t = machine.evaluate(&player);
    assert!(t.is_advance());
    let advanced = commit(player.clone(), &t);
    assert_eq!(advanced.realm_level, 4);
    assert_eq!(advanced.exp, 10_000 - player.max_exp);

    // A repeated render against the stale snapshot must not advance again
    for _ in 0..3 {
        assert_eq!(machine.evaluate(&player), Transition::Suppressed);
    }
}

#[test]
fn test_breakthrough_without_tribulation_applies_once() {
    let mut machine = BreakthroughMachine::default();
    let mut player = full(Realm::Foundation, 9);
    player.flags.insert(wasteland::ProgressFlag::StableFoundation);
    let id = player.inventory.add(ItemKind::CoreEssence, 1);
    for _ in 0..10 {
        player.inventory.refine(id, 10).unwrap();
    }

    let t = machine.evaluate(&player);
    let Transition::Advanced { to, hp_loss, .. } = &t else {
        panic!("expected advance, got {:?}", t);
    };
    assert_eq!(*to, RealmPosition::new(Realm::GoldenCore, 1));
    assert_eq!(*hp_loss, 0);

    let next = commit(player.clone(), &t);
    assert_eq!(next.inventory.count(ItemKind::CoreEssence), 0);
    assert_eq!(machine.evaluate(&player), Transition::Suppressed);
    assert_eq!(machine.evaluate(&next), Transition::None);
}

#[test]
fn test_decline_creates_no_tribulation_and_keeps_hp() {
    let mut machine = BreakthroughMachine::default();
    let mut player = full(Realm::QiRefining, 9);
    player.exp += 30;
    player.attributes.wound(15);
    let hp_before = player.attributes.hp;

    assert!(matches!(
        machine.evaluate(&player),
        Transition::AwaitingConfirmation(_)
    ));
    let t = machine.resolve_confirmation(&player, false).unwrap();
    let Transition::Declined { player: declined } = &t else {
        panic!("expected decline, got {:?}", t);
    };

    assert!(machine.open_tribulation().is_none());
    assert_eq!(machine.phase(), BreakthroughPhase::Idle);
    assert_eq!(declined.attributes.hp, hp_before);
    assert_eq!(declined.exp, declined.max_exp);
    assert_eq!(declined.realm, Realm::QiRefining);
}

#[test]
fn test_success_applies_advance_and_hp_loss_together() {
    let mut machine = BreakthroughMachine::default();
    let player = full(Realm::QiRefining, 9);
    let hp_before = player.attributes.hp;

    machine.evaluate(&player);
    machine.resolve_confirmation(&player, true).unwrap();

    let t = machine
        .complete(&player, TribulationResult::success("The clouds part.", Some(7)))
        .unwrap();
    let Transition::Advanced { player: next, hp_loss, .. } = &t else {
        panic!("expected advance, got {:?}", t);
    };
    assert_eq!(*hp_loss, 7);
    assert_eq!(next.realm, Realm::Foundation);
    assert_eq!(next.attributes.hp, hp_before - 7);
}

#[test]
fn test_failure_kills_without_advancing() {
    let mut machine = BreakthroughMachine::default();
    let player = full(Realm::QiRefining, 9);

    machine.evaluate(&player);
    machine.resolve_confirmation(&player, true).unwrap();
    let t = machine
        .complete(
            &player,
            TribulationResult::failure("The ninth bolt falls.", "Reduced to ash"),
        )
        .unwrap();

    let Transition::Died { player: dead, reason } = &t else {
        panic!("expected death, got {:?}", t);
    };
    assert_eq!(dead.attributes.hp, 0);
    assert_eq!(dead.death_reason.as_deref(), Some("Reduced to ash"));
    assert_eq!(reason, "Reduced to ash");
    assert_eq!(dead.position(), player.position());
    assert_eq!(machine.phase(), BreakthroughPhase::Idle);
}

#[test]
fn test_qi_refining_peak_scenario() {
    let mut machine = BreakthroughMachine::default();
    let mut player = player_at(Realm::QiRefining, 9);
    player.max_exp = 100;
    player.exp = 100;
    let hp_before = player.attributes.hp;

    let t = machine.evaluate(&player);
    let Transition::AwaitingConfirmation(pending) = &t else {
        panic!("expected confirmation, got {:?}", t);
    };
    assert_eq!(pending.target, RealmPosition::new(Realm::Foundation, 1));
    assert_eq!(machine.phase(), BreakthroughPhase::AwaitingConfirm);

    let t = machine.resolve_confirmation(&player, true).unwrap();
    assert!(matches!(t, Transition::TribulationOpened(_)));
    assert_eq!(machine.phase(), BreakthroughPhase::TribulationOpen);

    let t = machine
        .complete(&player, TribulationResult::success("Forced", Some(20)))
        .unwrap();
    let next = commit(player, &t);
    assert_eq!(next.realm, Realm::Foundation);
    assert_eq!(next.realm_level, 1);
    assert_eq!(next.attributes.hp, hp_before - 20);
}

#[test]
fn test_missing_item_blocks_and_clamps() {
    let mut machine = BreakthroughMachine::default();
    let mut player = full(Realm::Foundation, 9);
    player.exp += 250;

    let t = machine.evaluate(&player);
    let Transition::Blocked { player: blocked, message } = &t else {
        panic!("expected blocked, got {:?}", t);
    };
    assert!(message.contains(ItemKind::CoreEssence.name()));
    assert_eq!(blocked.exp, blocked.max_exp);
    assert_eq!(blocked.position(), player.position());
    assert_eq!(blocked.inventory, player.inventory);
    assert_eq!(blocked.attributes, player.attributes);

    // The clamped record does not prompt again
    let blocked = blocked.clone();
    assert_eq!(machine.evaluate(&blocked), Transition::Suppressed);
}

#[test]
fn test_no_reprompt_after_decline_until_exp_grows() {
    let mut machine = BreakthroughMachine::default();
    let player = full(Realm::QiRefining, 9);

    machine.evaluate(&player);
    let t = machine.resolve_confirmation(&player, false).unwrap();
    let mut player = commit(player, &t);

    for _ in 0..10 {
        assert_eq!(machine.evaluate(&player), Transition::Suppressed);
    }

    player.exp += 1;
    assert!(matches!(
        machine.evaluate(&player),
        Transition::AwaitingConfirmation(_)
    ));
}

#[test]
fn test_cancel_open_tribulation() {
    let mut machine = BreakthroughMachine::default();
    let mut player = full(Realm::QiRefining, 9);
    player.exp += 40;

    machine.evaluate(&player);
    machine.resolve_confirmation(&player, true).unwrap();
    let t = machine.cancel(&player).unwrap();
    let player = commit(player, &t);

    assert!(machine.open_tribulation().is_none());
    assert_eq!(player.exp, player.max_exp);
    assert_eq!(machine.evaluate(&player), Transition::Suppressed);
}

#[test]
fn test_out_of_phase_calls_error() {
    let mut machine = BreakthroughMachine::default();
    let player = full(Realm::QiRefining, 9);
    assert!(machine.resolve_confirmation(&player, true).is_err());
    assert!(machine.cancel(&player).is_err());
    assert!(machine
        .complete(&player, TribulationResult::success("", None))
        .is_err());
}

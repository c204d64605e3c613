//! The breakthrough state machine.
//!
//! ```text
//! IDLE --(exp>=maxExp)--> CHECKING_CONDITIONS
//! CHECKING_CONDITIONS --(fail)--> IDLE (exp clamped)
//! CHECKING_CONDITIONS --(pass, no tribulation)--> APPLY_BREAKTHROUGH --> IDLE
//! CHECKING_CONDITIONS --(pass, tribulation)--> AWAITING_CONFIRM
//! AWAITING_CONFIRM --(decline)--> IDLE (exp clamped, flag set)
//! AWAITING_CONFIRM --(confirm)--> TRIBULATION_OPEN
//! TRIBULATION_OPEN --(success)--> APPLY_BREAKTHROUGH --> IDLE
//! TRIBULATION_OPEN --(failure)--> DEATH_FLOW --> IDLE
//! ```
//!
//! The machine never mutates the player. Every call takes the current
//! snapshot and returns a [`Transition`]; the host commits any replacement
//! record it carries and calls [`BreakthroughMachine::evaluate`] again on the
//! next change.

use super::applier::{apply_breakthrough, apply_tribulation_failure};
use super::conditions::check_breakthrough;
use super::config::TribulationConfig;
use super::policy::{requires_tribulation, strike_count};
use super::types::{
    BreakthroughError, BreakthroughPhase, PendingConfirmation, TribulationResult,
    TribulationState, Transition,
};
use crate::character::realm::RealmPosition;
use crate::core::game_state::PlayerState;

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    AwaitingConfirm(PendingConfirmation),
    TribulationOpen(TribulationState),
}

#[derive(Debug, Clone)]
pub struct BreakthroughMachine {
    config: TribulationConfig,
    /// One-shot guard: set once an exp value has been acted on.
    triggered: bool,
    /// Exp value the guard was set for.
    last_evaluated_exp: Option<u64>,
    /// Last observed position; a change re-arms the guard.
    previous_position: Option<RealmPosition>,
    phase: Phase,
}

impl Default for BreakthroughMachine {
    fn default() -> Self {
        Self::new(TribulationConfig::default())
    }
}

impl BreakthroughMachine {
    pub fn new(config: TribulationConfig) -> Self {
        Self {
            config,
            triggered: false,
            last_evaluated_exp: None,
            previous_position: None,
            phase: Phase::Idle,
        }
    }

    pub fn config(&self) -> &TribulationConfig {
        &self.config
    }

    pub fn phase(&self) -> BreakthroughPhase {
        match self.phase {
            Phase::Idle => BreakthroughPhase::Idle,
            Phase::AwaitingConfirm(_) => BreakthroughPhase::AwaitingConfirm,
            Phase::TribulationOpen(_) => BreakthroughPhase::TribulationOpen,
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    pub fn pending_confirmation(&self) -> Option<&PendingConfirmation> {
        match &self.phase {
            Phase::AwaitingConfirm(pending) => Some(pending),
            _ => None,
        }
    }

    pub fn open_tribulation(&self) -> Option<&TribulationState> {
        match &self.phase {
            Phase::TribulationOpen(state) => Some(state),
            _ => None,
        }
    }

    fn arm(&mut self) {
        self.triggered = false;
        self.last_evaluated_exp = None;
    }

    fn mark_triggered(&mut self, exp: u64) {
        self.triggered = true;
        self.last_evaluated_exp = Some(exp);
    }

    /// Threshold monitor. Call on every player change.
    pub fn evaluate(&mut self, player: &PlayerState) -> Transition {
        let position = player.position();
        if self.previous_position != Some(position) {
            if self.previous_position.is_some() {
                log::debug!("position changed to {}, re-arming breakthrough", position);
            }
            self.previous_position = Some(position);
            self.arm();
        }

        if self.phase != Phase::Idle {
            return Transition::None;
        }

        if player.exp < player.max_exp {
            self.arm();
            return Transition::None;
        }

        let Some(target) = position.next() else {
            if player.exp == player.max_exp {
                return Transition::None;
            }
            return Transition::Terminal {
                player: player.with_exp_clamped(),
            };
        };

        if self.triggered {
            match self.last_evaluated_exp {
                Some(seen) if player.exp > seen => self.arm(),
                _ => return Transition::Suppressed,
            }
        }

        if !position.at_realm_peak() {
            self.mark_triggered(player.exp);
            return self.advance(player, 0);
        }

        let check = check_breakthrough(player, target.realm);
        if !check.can_breakthrough {
            log::info!("{}", check.message);
            let clamped = player.with_exp_clamped();
            self.mark_triggered(clamped.exp);
            return Transition::Blocked {
                player: clamped,
                message: check.message,
            };
        }

        self.mark_triggered(player.exp);

        if !requires_tribulation(player, target.realm) {
            return self.advance(player, 0);
        }

        let pending = PendingConfirmation {
            target,
            strikes: strike_count(target.realm),
            reveal_delay_ms: self.config.reveal_delay_ms,
        };
        log::info!(
            "{} faces the {} tribulation ({} strikes)",
            player.character_name,
            target.realm,
            pending.strikes
        );
        self.phase = Phase::AwaitingConfirm(pending.clone());
        Transition::AwaitingConfirmation(pending)
    }

    fn advance(&mut self, player: &PlayerState, hp_loss: u32) -> Transition {
        let from = player.position();
        let next = apply_breakthrough(player, hp_loss);
        Transition::Advanced {
            to: next.position(),
            player: next,
            from,
            hp_loss,
        }
    }

    /// Resumes from AWAITING_CONFIRM with the player's answer.
    pub fn resolve_confirmation(
        &mut self,
        player: &PlayerState,
        confirmed: bool,
    ) -> Result<Transition, BreakthroughError> {
        let Phase::AwaitingConfirm(pending) = &self.phase else {
            return Err(BreakthroughError::NotAwaitingConfirmation);
        };

        if !confirmed {
            log::info!("{} declined the tribulation", player.character_name);
            self.phase = Phase::Idle;
            let clamped = player.with_exp_clamped();
            self.mark_triggered(clamped.exp);
            return Ok(Transition::Declined { player: clamped });
        }

        let state = TribulationState {
            target: pending.target,
            snapshot: player.clone(),
            strikes: pending.strikes,
        };
        self.phase = Phase::TribulationOpen(state.clone());
        Ok(Transition::TribulationOpened(state))
    }

    /// Abandons an open tribulation. Treated like a decline.
    pub fn cancel(&mut self, player: &PlayerState) -> Result<Transition, BreakthroughError> {
        if !matches!(self.phase, Phase::TribulationOpen(_)) {
            return Err(BreakthroughError::NoOpenTribulation);
        }
        self.phase = Phase::Idle;
        let clamped = player.with_exp_clamped();
        self.mark_triggered(clamped.exp);
        Ok(Transition::Cancelled { player: clamped })
    }

    /// Consumes the result of the open tribulation.
    pub fn complete(
        &mut self,
        player: &PlayerState,
        result: TribulationResult,
    ) -> Result<Transition, BreakthroughError> {
        if !matches!(self.phase, Phase::TribulationOpen(_)) {
            return Err(BreakthroughError::NoOpenTribulation);
        }
        self.phase = Phase::Idle;

        match result {
            TribulationResult::Success { hp_loss, .. } => {
                Ok(self.advance(player, hp_loss.unwrap_or(0)))
            }
            TribulationResult::Failure { death_reason, .. } => {
                self.mark_triggered(player.exp);
                Ok(Transition::Died {
                    player: apply_tribulation_failure(player, &death_reason),
                    reason: death_reason,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::realm::Realm;
    use crate::core::game_logic::exp_for_level;

    fn player_at(realm: Realm, level: u8) -> PlayerState {
        let mut p = PlayerState::new("Test".to_string(), 0);
        p.realm = realm;
        p.realm_level = level;
        p.max_exp = exp_for_level(p.position());
        p
    }

    fn commit(transition: Transition, current: &PlayerState) -> PlayerState {
        transition.into_player().unwrap_or_else(|| current.clone())
    }

    #[test]
    fn test_below_threshold_is_idle() {
        let mut machine = BreakthroughMachine::default();
        let p = player_at(Realm::QiRefining, 1);
        assert_eq!(machine.evaluate(&p), Transition::None);
        assert_eq!(machine.phase(), BreakthroughPhase::Idle);
    }

    #[test]
    fn test_minor_level_advances_once() {
        let mut machine = BreakthroughMachine::default();
        let mut p = player_at(Realm::QiRefining, 2);
        p.exp = p.max_exp;

        let first = machine.evaluate(&p);
        assert!(first.is_advance());
        // Stale re-render before the host commits
        assert_eq!(machine.evaluate(&p), Transition::Suppressed);

        let committed = commit(first, &p);
        assert_eq!(committed.realm_level, 3);
        assert_eq!(machine.evaluate(&committed), Transition::None);
    }

    #[test]
    fn test_realm_peak_requires_confirmation() {
        let mut machine = BreakthroughMachine::default();
        let mut p = player_at(Realm::QiRefining, 9);
        p.exp = p.max_exp;

        match machine.evaluate(&p) {
            Transition::AwaitingConfirmation(pending) => {
                assert_eq!(pending.target, RealmPosition::new(Realm::Foundation, 1));
                assert_eq!(pending.strikes, 3);
            }
            other => panic!("expected confirmation, got {:?}", other),
        }
        assert_eq!(machine.phase(), BreakthroughPhase::AwaitingConfirm);
        // Only one open attempt at a time
        assert_eq!(machine.evaluate(&p), Transition::None);
    }

    #[test]
    fn test_resolve_without_pending_is_error() {
        let mut machine = BreakthroughMachine::default();
        let p = player_at(Realm::QiRefining, 9);
        assert_eq!(
            machine.resolve_confirmation(&p, true),
            Err(BreakthroughError::NotAwaitingConfirmation)
        );
        assert_eq!(
            machine.complete(&p, TribulationResult::success("ok", None)),
            Err(BreakthroughError::NoOpenTribulation)
        );
        assert_eq!(machine.cancel(&p), Err(BreakthroughError::NoOpenTribulation));
    }

    #[test]
    fn test_waived_tribulation_applies_directly() {
        let mut machine = BreakthroughMachine::default();
        let mut p = player_at(Realm::Foundation, 9);
        p.exp = p.max_exp;
        p.flags
            .insert(crate::core::game_state::ProgressFlag::StableFoundation);
        let id = p.inventory.add(crate::items::ItemKind::CoreEssence, 1);
        p.inventory.refine(id, 100).unwrap();

        match machine.evaluate(&p) {
            Transition::Advanced { to, hp_loss, .. } => {
                assert_eq!(to, RealmPosition::new(Realm::GoldenCore, 1));
                assert_eq!(hp_loss, 0);
            }
            other => panic!("expected advance, got {:?}", other),
        }
    }

    #[test]
    fn test_confirm_then_cancel_clamps() {
        let mut machine = BreakthroughMachine::default();
        let mut p = player_at(Realm::QiRefining, 9);
        p.exp = p.max_exp + 50;

        machine.evaluate(&p);
        let opened = machine.resolve_confirmation(&p, true).unwrap();
        assert!(matches!(opened, Transition::TribulationOpened(_)));
        assert!(machine.open_tribulation().is_some());

        match machine.cancel(&p).unwrap() {
            Transition::Cancelled { player } => assert_eq!(player.exp, player.max_exp),
            other => panic!("expected cancel, got {:?}", other),
        }
        assert_eq!(machine.phase(), BreakthroughPhase::Idle);
    }

    #[test]
    fn test_exp_drop_rearms() {
        let mut machine = BreakthroughMachine::default();
        let mut p = player_at(Realm::QiRefining, 9);
        p.exp = p.max_exp;
        machine.evaluate(&p);
        let declined = commit(machine.resolve_confirmation(&p, false).unwrap(), &p);
        assert!(machine.is_triggered());

        let mut drained = declined.clone();
        drained.exp = 0;
        assert_eq!(machine.evaluate(&drained), Transition::None);
        assert!(!machine.is_triggered());

        assert!(matches!(
            machine.evaluate(&declined),
            Transition::AwaitingConfirmation(_)
        ));
    }
}

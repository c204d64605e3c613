//! A running game: the player record, the breakthrough machine and the
//! collaborators around them.
//!
//! Every change goes through [`GameSession::commit`], which replaces the
//! player wholesale and hands the new record to the saver. Machine
//! transitions that carry a replacement record are committed the same way.

use crate::core::collaborators::{DeathFlow, QuestSink, SaveSink};
use crate::core::game_logic::{equip_item, go_on_adventure, refine_item, AdventureReport};
use crate::core::game_state::PlayerState;
use crate::items::InventoryError;
use crate::quests::QuestKind;
use crate::tribulation::{
    resolve_with_rng, BreakthroughError, BreakthroughMachine, TribulationResult, Transition,
};
use rand::Rng;

/// Upper bound on chained level-ups settled in one call.
const MAX_SETTLE_STEPS: usize = 1_000;

pub struct GameSession<S: SaveSink, D: DeathFlow, Q: QuestSink> {
    player: PlayerState,
    machine: BreakthroughMachine,
    saver: S,
    death_flow: D,
    quests: Q,
    /// Fractional meditation exp not yet banked.
    pub(crate) exp_carry: f64,
    /// Ticks since the last whole second of play time.
    pub(crate) tick_counter: u64,
}

impl<S: SaveSink, D: DeathFlow, Q: QuestSink> GameSession<S, D, Q> {
    pub fn new(
        player: PlayerState,
        machine: BreakthroughMachine,
        saver: S,
        death_flow: D,
        quests: Q,
    ) -> Self {
        Self {
            player,
            machine,
            saver,
            death_flow,
            quests,
            exp_carry: 0.0,
            tick_counter: 0,
        }
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn machine(&self) -> &BreakthroughMachine {
        &self.machine
    }

    pub fn saver(&self) -> &S {
        &self.saver
    }

    pub fn saver_mut(&mut self) -> &mut S {
        &mut self.saver
    }

    pub fn death_flow(&self) -> &D {
        &self.death_flow
    }

    pub fn quests(&self) -> &Q {
        &self.quests
    }

    pub fn quests_mut(&mut self) -> &mut Q {
        &mut self.quests
    }

    /// Replaces the player record and requests a save.
    pub(crate) fn commit(&mut self, player: PlayerState) {
        self.player = player;
        self.saver.request_save(&self.player);
    }

    pub(crate) fn record_quest(&mut self, kind: QuestKind, amount: u32) {
        self.quests.record_progress(kind, amount);
    }

    /// Commits an externally built record, then lets the machine react to it.
    pub fn replace_player(&mut self, player: PlayerState) -> Transition {
        self.commit(player);
        self.evaluate()
    }

    /// Runs the threshold monitor once against the current record.
    pub fn evaluate(&mut self) -> Transition {
        let transition = self.machine.evaluate(&self.player);
        self.apply(transition)
    }

    /// Evaluates until the machine stops advancing, e.g. after a large
    /// offline exp grant. Returns every transition that did something.
    pub fn settle(&mut self) -> Vec<Transition> {
        let mut transitions = Vec::new();
        for _ in 0..MAX_SETTLE_STEPS {
            let transition = self.evaluate();
            let advanced = transition.is_advance();
            if !matches!(transition, Transition::None | Transition::Suppressed) {
                transitions.push(transition);
            }
            if !advanced {
                break;
            }
        }
        transitions
    }

    /// Commits whatever the transition carries and notifies collaborators.
    fn apply(&mut self, transition: Transition) -> Transition {
        match &transition {
            Transition::Died { player, .. } => {
                self.commit(player.clone());
                let revived = self.death_flow.handle_death(&self.player);
                self.commit(revived);
            }
            Transition::Advanced { player, from, to, .. } => {
                if from.realm != to.realm {
                    self.record_quest(QuestKind::Breakthrough, 1);
                }
                self.commit(player.clone());
            }
            other => {
                if let Some(player) = other.player() {
                    self.commit(player.clone());
                }
            }
        }
        transition
    }

    pub fn confirm_tribulation(&mut self) -> Result<Transition, BreakthroughError> {
        let transition = self.machine.resolve_confirmation(&self.player, true)?;
        Ok(self.apply(transition))
    }

    pub fn decline_tribulation(&mut self) -> Result<Transition, BreakthroughError> {
        let transition = self.machine.resolve_confirmation(&self.player, false)?;
        Ok(self.apply(transition))
    }

    pub fn cancel_tribulation(&mut self) -> Result<Transition, BreakthroughError> {
        let transition = self.machine.cancel(&self.player)?;
        Ok(self.apply(transition))
    }

    /// Hands an externally decided outcome to the machine.
    pub fn finish_tribulation(
        &mut self,
        result: TribulationResult,
    ) -> Result<Transition, BreakthroughError> {
        let transition = self.machine.complete(&self.player, result)?;
        Ok(self.apply(transition))
    }

    /// Resolves the open tribulation with the built-in strike rolls.
    pub fn run_tribulation(
        &mut self,
        rng: &mut impl Rng,
    ) -> Result<(TribulationResult, Transition), BreakthroughError> {
        let state = self
            .machine
            .open_tribulation()
            .ok_or(BreakthroughError::NoOpenTribulation)?;
        let result = resolve_with_rng(state, self.machine.config(), rng);
        let transition = self.finish_tribulation(result.clone())?;
        Ok((result, transition))
    }

    pub fn adventure(&mut self, rng: &mut impl Rng) -> (AdventureReport, Transition) {
        let (next, report) = go_on_adventure(&self.player, rng);
        self.record_quest(QuestKind::Adventure, 1);
        (report, self.replace_player(next))
    }

    pub fn refine(&mut self, item_id: u64) -> Result<Transition, InventoryError> {
        let next = refine_item(&self.player, item_id)?;
        Ok(self.replace_player(next))
    }

    pub fn equip(&mut self, item_id: u64) -> Result<Transition, InventoryError> {
        let next = equip_item(&self.player, item_id)?;
        Ok(self.replace_player(next))
    }
}

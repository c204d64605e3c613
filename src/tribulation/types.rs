use crate::character::realm::RealmPosition;
use crate::core::game_state::PlayerState;
use thiserror::Error;

/// Outcome of the prerequisite check for a realm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionCheck {
    pub can_breakthrough: bool,
    pub message: String,
}

impl ConditionCheck {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            can_breakthrough: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            can_breakthrough: false,
            message: message.into(),
        }
    }
}

/// Suspend point: the host shows a modal and answers with
/// `BreakthroughMachine::resolve_confirmation`.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingConfirmation {
    pub target: RealmPosition,
    pub strikes: u32,
    /// Cosmetic delay before the modal should appear.
    pub reveal_delay_ms: u64,
}

/// One open tribulation attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct TribulationState {
    pub target: RealmPosition,
    /// The player as they were when the tribulation was confirmed.
    pub snapshot: PlayerState,
    pub strikes: u32,
}

/// Resolution of a tribulation, consumed once by the applier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TribulationResult {
    Success {
        description: String,
        hp_loss: Option<u32>,
    },
    Failure {
        description: String,
        death_reason: String,
    },
}

impl TribulationResult {
    pub fn success(description: impl Into<String>, hp_loss: Option<u32>) -> Self {
        TribulationResult::Success {
            description: description.into(),
            hp_loss,
        }
    }

    pub fn failure(description: impl Into<String>, death_reason: impl Into<String>) -> Self {
        TribulationResult::Failure {
            description: description.into(),
            death_reason: death_reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TribulationResult::Success { .. })
    }

    pub fn description(&self) -> &str {
        match self {
            TribulationResult::Success { description, .. }
            | TribulationResult::Failure { description, .. } => description,
        }
    }
}

/// Where the machine currently waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakthroughPhase {
    Idle,
    AwaitingConfirm,
    TribulationOpen,
}

/// What a machine call decided. Variants carrying a `PlayerState` hold the
/// replacement record the host must commit.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Nothing to do.
    None,
    /// Already handled this exp value.
    Suppressed,
    /// Peak of the final realm; exp clamped.
    Terminal { player: PlayerState },
    /// Prerequisite missing; exp clamped.
    Blocked {
        player: PlayerState,
        message: String,
    },
    AwaitingConfirmation(PendingConfirmation),
    /// Player refused the tribulation; exp clamped.
    Declined { player: PlayerState },
    TribulationOpened(TribulationState),
    /// Player walked away from an open tribulation; exp clamped.
    Cancelled { player: PlayerState },
    Advanced {
        player: PlayerState,
        from: RealmPosition,
        to: RealmPosition,
        hp_loss: u32,
    },
    /// Tribulation failed. hp is 0 and the death reason is recorded.
    Died { player: PlayerState, reason: String },
}

impl Transition {
    pub fn player(&self) -> Option<&PlayerState> {
        match self {
            Transition::Terminal { player }
            | Transition::Blocked { player, .. }
            | Transition::Declined { player }
            | Transition::Cancelled { player }
            | Transition::Advanced { player, .. }
            | Transition::Died { player, .. } => Some(player),
            Transition::None
            | Transition::Suppressed
            | Transition::AwaitingConfirmation(_)
            | Transition::TribulationOpened(_) => None,
        }
    }

    pub fn into_player(self) -> Option<PlayerState> {
        match self {
            Transition::Terminal { player }
            | Transition::Blocked { player, .. }
            | Transition::Declined { player }
            | Transition::Cancelled { player }
            | Transition::Advanced { player, .. }
            | Transition::Died { player, .. } => Some(player),
            _ => None,
        }
    }

    pub fn is_advance(&self) -> bool {
        matches!(self, Transition::Advanced { .. })
    }
}

/// Machine calls made in the wrong phase.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BreakthroughError {
    #[error("no tribulation is awaiting confirmation")]
    NotAwaitingConfirmation,
    #[error("no tribulation is open")]
    NoOpenTribulation,
}

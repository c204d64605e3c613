use crate::core::collaborators::DeathFlow;
use crate::core::constants::DEATH_EXP_PENALTY_PERCENT;
use crate::core::game_state::PlayerState;

/// Default death flow: the character is pulled back from the brink at the
/// cost of part of their banked exp.
#[derive(Debug, Clone)]
pub struct ReviveWithPenalty {
    pub exp_penalty_percent: u64,
    /// Reasons consumed so far, most recent last.
    pub history: Vec<String>,
}

impl Default for ReviveWithPenalty {
    fn default() -> Self {
        Self {
            exp_penalty_percent: DEATH_EXP_PENALTY_PERCENT,
            history: Vec::new(),
        }
    }
}

impl DeathFlow for ReviveWithPenalty {
    fn handle_death(&mut self, player: &PlayerState) -> PlayerState {
        if !player.is_dead() {
            return player.clone();
        }

        let mut next = player.clone();
        let reason = next
            .death_reason
            .take()
            .unwrap_or_else(|| "Unknown causes".to_string());

        let penalty = next.exp * self.exp_penalty_percent.min(100) / 100;
        next.exp -= penalty;
        next.attributes.heal_full();
        next.total_deaths += 1;

        log::info!(
            "{} revived after death ({}), lost {} exp",
            next.character_name,
            reason,
            penalty
        );
        self.history.push(reason);
        next
    }
}

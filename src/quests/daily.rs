//! Daily quest board. Goals reset at the start of each calendar day.

use crate::core::collaborators::QuestSink;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestKind {
    /// Seconds spent meditating.
    Meditate,
    Adventure,
    Breakthrough,
}

impl QuestKind {
    pub fn all() -> [QuestKind; 3] {
        [QuestKind::Meditate, QuestKind::Adventure, QuestKind::Breakthrough]
    }

    pub fn description(&self) -> &'static str {
        match self {
            QuestKind::Meditate => "Meditate",
            QuestKind::Adventure => "Venture into the wasteland",
            QuestKind::Breakthrough => "Break through",
        }
    }

    fn default_goal(&self) -> u32 {
        match self {
            QuestKind::Meditate => 600,
            QuestKind::Adventure => 3,
            QuestKind::Breakthrough => 1,
        }
    }

    fn reward_stones(&self) -> u64 {
        match self {
            QuestKind::Meditate => 30,
            QuestKind::Adventure => 40,
            QuestKind::Breakthrough => 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyQuest {
    pub kind: QuestKind,
    pub goal: u32,
    pub progress: u32,
    pub claimed: bool,
}

impl DailyQuest {
    fn new(kind: QuestKind) -> Self {
        Self {
            kind,
            goal: kind.default_goal(),
            progress: 0,
            claimed: false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= self.goal
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyQuestBoard {
    pub date: NaiveDate,
    pub quests: Vec<DailyQuest>,
}

impl DailyQuestBoard {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            quests: QuestKind::all().into_iter().map(DailyQuest::new).collect(),
        }
    }

    pub fn today() -> Self {
        Self::new(local_date())
    }

    /// Resets the board when `today` is a new day. Returns true on reset.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        if today == self.date {
            return false;
        }
        *self = Self::new(today);
        true
    }

    pub fn get(&self, kind: QuestKind) -> Option<&DailyQuest> {
        self.quests.iter().find(|q| q.kind == kind)
    }

    pub fn record(&mut self, kind: QuestKind, amount: u32) {
        if let Some(quest) = self.quests.iter_mut().find(|q| q.kind == kind) {
            let was_complete = quest.is_complete();
            quest.progress = quest.progress.saturating_add(amount).min(quest.goal);
            if !was_complete && quest.is_complete() {
                log::info!("Daily quest complete: {}", kind.description());
            }
        }
    }

    /// Records progress against the board for `today`, resetting it first
    /// if the day has changed.
    pub fn record_on(&mut self, kind: QuestKind, amount: u32, today: NaiveDate) {
        self.roll_over(today);
        self.record(kind, amount);
    }

    /// Claims a completed quest's spirit stone reward once.
    pub fn claim(&mut self, kind: QuestKind) -> Option<u64> {
        self.claim_on(kind, local_date())
    }

    /// Claims against the board for `today`. A stale board is reset first,
    /// so yesterday's completions cannot be paid out.
    pub fn claim_on(&mut self, kind: QuestKind, today: NaiveDate) -> Option<u64> {
        self.roll_over(today);
        let quest = self.quests.iter_mut().find(|q| q.kind == kind)?;
        if !quest.is_complete() || quest.claimed {
            return None;
        }
        quest.claimed = true;
        Some(kind.reward_stones())
    }

    pub fn completed_count(&self) -> usize {
        self.quests.iter().filter(|q| q.is_complete()).count()
    }

    pub fn load_from_path(path: &Path) -> io::Result<Self> {
        let json = fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn save_to_path(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }
}

impl QuestSink for DailyQuestBoard {
    fn record_progress(&mut self, kind: QuestKind, amount: u32) {
        self.record_on(kind, amount, local_date());
    }
}

/// The calendar day quests are tracked against.
pub fn local_date() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn test_new_board_has_all_quests() {
        let board = DailyQuestBoard::new(day(1));
        assert_eq!(board.quests.len(), 3);
        assert_eq!(board.completed_count(), 0);
    }

    #[test]
    fn test_progress_caps_at_goal() {
        let mut board = DailyQuestBoard::new(day(1));
        board.record(QuestKind::Breakthrough, 5);
        let quest = board.get(QuestKind::Breakthrough).unwrap();
        assert_eq!(quest.progress, 1);
        assert!(quest.is_complete());
    }

    #[test]
    fn test_claim_once() {
        let mut board = DailyQuestBoard::new(day(1));
        assert_eq!(board.claim(QuestKind::Adventure), None);
        board.record_progress(QuestKind::Adventure, 3);
        assert_eq!(board.claim(QuestKind::Adventure), Some(40));
        assert_eq!(board.claim(QuestKind::Adventure), None);
    }

    #[test]
    fn test_roll_over_resets() {
        let mut board = DailyQuestBoard::new(day(1));
        board.record(QuestKind::Adventure, 2);
        assert!(!board.roll_over(day(1)));
        assert_eq!(board.get(QuestKind::Adventure).unwrap().progress, 2);

        assert!(board.roll_over(day(2)));
        assert_eq!(board.date, day(2));
        assert_eq!(board.get(QuestKind::Adventure).unwrap().progress, 0);
    }

    #[test]
    fn test_progress_past_midnight_lands_on_new_day() {
        let mut board = DailyQuestBoard::new(day(1));
        board.record_on(QuestKind::Adventure, 2, day(1));
        board.record_on(QuestKind::Adventure, 1, day(2));

        assert_eq!(board.date, day(2));
        let quest = board.get(QuestKind::Adventure).unwrap();
        assert_eq!(quest.progress, 1);
        assert!(!quest.is_complete());
    }

    #[test]
    fn test_stale_board_cannot_pay_out() {
        let mut board = DailyQuestBoard::new(day(1));
        board.record_on(QuestKind::Breakthrough, 1, day(1));
        assert!(board.get(QuestKind::Breakthrough).unwrap().is_complete());

        assert_eq!(board.claim_on(QuestKind::Breakthrough, day(2)), None);
        assert_eq!(board.date, day(2));
        assert_eq!(board.completed_count(), 0);
    }

    #[test]
    fn test_claim_same_day_pays() {
        let mut board = DailyQuestBoard::new(day(4));
        board.record_on(QuestKind::Breakthrough, 1, day(4));
        assert_eq!(board.claim_on(QuestKind::Breakthrough, day(4)), Some(100));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir()
            .join(format!("wasteland-quests-{}", uuid::Uuid::new_v4()))
            .join("quests.json");
        let mut board = DailyQuestBoard::new(day(3));
        board.record(QuestKind::Meditate, 120);
        board.save_to_path(&path).unwrap();

        let json = fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"2026-10-03\""));
        let loaded = DailyQuestBoard::load_from_path(&path).unwrap();
        assert_eq!(loaded, board);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}

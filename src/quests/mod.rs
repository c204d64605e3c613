//! Daily quests.

pub mod daily;

pub use daily::{local_date, DailyQuest, DailyQuestBoard, QuestKind};

use crate::character::attributes::Attributes;
use crate::character::realm::{Realm, RealmPosition};
use crate::core::constants::STARTING_SPIRIT_STONES;
use crate::core::game_logic::exp_for_level;
use crate::items::Inventory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Challenge-completed markers that gate breakthroughs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProgressFlag {
    /// A flawless foundation; the Golden Core forms without lightning.
    StableFoundation,
    HeartDemonTrial,
    DaoComprehension,
    AscensionTrial,
}

impl ProgressFlag {
    pub fn name(&self) -> &'static str {
        match self {
            ProgressFlag::StableFoundation => "Stable Foundation",
            ProgressFlag::HeartDemonTrial => "Heart Demon Trial",
            ProgressFlag::DaoComprehension => "Dao Comprehension",
            ProgressFlag::AscensionTrial => "Ascension Trial",
        }
    }
}

/// The whole character. Replaced wholesale on every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub character_id: String,
    pub character_name: String,
    pub realm: Realm,
    pub realm_level: u8,
    pub exp: u64,
    pub max_exp: u64,
    pub attributes: Attributes,
    pub inventory: Inventory,
    pub spirit_stones: u64,
    pub flags: BTreeSet<ProgressFlag>,
    /// Set when the character dies; taken by the death flow.
    pub death_reason: Option<String>,
    pub total_breakthroughs: u64,
    pub total_deaths: u64,
    pub last_save_time: i64,
    pub play_time_seconds: u64,
}

impl PlayerState {
    /// Creates a fresh Qi Refining 1 character.
    pub fn new(character_name: String, current_time: i64) -> Self {
        use uuid::Uuid;

        let position = RealmPosition::start();

        Self {
            character_id: Uuid::new_v4().to_string(),
            character_name,
            realm: position.realm,
            realm_level: position.level,
            exp: 0,
            max_exp: exp_for_level(position),
            attributes: Attributes::new(),
            inventory: Inventory::new(),
            spirit_stones: STARTING_SPIRIT_STONES,
            flags: BTreeSet::new(),
            death_reason: None,
            total_breakthroughs: 0,
            total_deaths: 0,
            last_save_time: current_time,
            play_time_seconds: 0,
        }
    }

    pub fn position(&self) -> RealmPosition {
        RealmPosition::new(self.realm, self.realm_level)
    }

    pub fn has_flag(&self, flag: ProgressFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn is_dead(&self) -> bool {
        self.attributes.is_dead()
    }

    /// Copy with exp clamped to max_exp.
    pub fn with_exp_clamped(&self) -> Self {
        Self {
            exp: self.exp.min(self.max_exp),
            ..self.clone()
        }
    }

    pub fn exp_progress(&self) -> f64 {
        if self.max_exp == 0 {
            return 1.0;
        }
        (self.exp as f64 / self.max_exp as f64).min(1.0)
    }
}

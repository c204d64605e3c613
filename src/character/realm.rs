use crate::core::constants::{MAX_REALM_LEVEL, MIN_REALM_LEVEL};
use crate::core::game_state::ProgressFlag;
use crate::items::types::ItemKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Major power tiers, in breakthrough order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Realm {
    QiRefining,
    Foundation,
    GoldenCore,
    NascentSoul,
    SpiritSevering,
    VoidRefining,
    DaoUnion,
    Mahayana,
    TrueImmortal,
}

impl Realm {
    pub fn all() -> [Realm; 9] {
        [
            Realm::QiRefining,
            Realm::Foundation,
            Realm::GoldenCore,
            Realm::NascentSoul,
            Realm::SpiritSevering,
            Realm::VoidRefining,
            Realm::DaoUnion,
            Realm::Mahayana,
            Realm::TrueImmortal,
        ]
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn next(&self) -> Option<Realm> {
        Realm::all().get(self.index() + 1).copied()
    }

    pub fn is_final(&self) -> bool {
        self.next().is_none()
    }

    pub fn info(&self) -> &'static RealmInfo {
        &REALM_TABLE[self.index()]
    }

    pub fn name(&self) -> &'static str {
        self.info().name
    }
}

impl fmt::Display for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What must hold before the character may break into a realm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    None,
    Flag(ProgressFlag),
    Item { kind: ItemKind, min_refinement: u32 },
}

/// Whether entering a realm summons a heavenly tribulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TribulationRule {
    Never,
    Always,
    /// Required unless the player already holds the flag.
    UnlessFlag(ProgressFlag),
}

/// Static properties of a realm.
#[derive(Debug, Clone)]
pub struct RealmInfo {
    pub realm: Realm,
    pub name: &'static str,
    pub exp_base: u64,
    pub base_attack: u32,
    pub base_defense: u32,
    pub base_max_hp: u32,
    pub base_spirit: u32,
    pub base_physique: u32,
    pub base_speed: u32,
    pub requirement: Requirement,
    pub tribulation: TribulationRule,
    pub tribulation_strikes: u32,
}

static REALM_TABLE: [RealmInfo; 9] = [
    RealmInfo {
        realm: Realm::QiRefining,
        name: "Qi Refining",
        exp_base: 100,
        base_attack: 10,
        base_defense: 5,
        base_max_hp: 100,
        base_spirit: 10,
        base_physique: 10,
        base_speed: 10,
        requirement: Requirement::None,
        tribulation: TribulationRule::Never,
        tribulation_strikes: 0,
    },
    RealmInfo {
        realm: Realm::Foundation,
        name: "Foundation Establishment",
        exp_base: 400,
        base_attack: 30,
        base_defense: 15,
        base_max_hp: 300,
        base_spirit: 30,
        base_physique: 25,
        base_speed: 20,
        requirement: Requirement::None,
        tribulation: TribulationRule::Always,
        tribulation_strikes: 3,
    },
    RealmInfo {
        realm: Realm::GoldenCore,
        name: "Golden Core",
        exp_base: 1_500,
        base_attack: 80,
        base_defense: 40,
        base_max_hp: 800,
        base_spirit: 80,
        base_physique: 60,
        base_speed: 35,
        requirement: Requirement::Item {
            kind: ItemKind::CoreEssence,
            min_refinement: 100,
        },
        tribulation: TribulationRule::UnlessFlag(ProgressFlag::StableFoundation),
        tribulation_strikes: 3,
    },
    RealmInfo {
        realm: Realm::NascentSoul,
        name: "Nascent Soul",
        exp_base: 5_000,
        base_attack: 200,
        base_defense: 100,
        base_max_hp: 2_000,
        base_spirit: 200,
        base_physique: 150,
        base_speed: 60,
        requirement: Requirement::Flag(ProgressFlag::HeartDemonTrial),
        tribulation: TribulationRule::Always,
        tribulation_strikes: 5,
    },
    RealmInfo {
        realm: Realm::SpiritSevering,
        name: "Spirit Severing",
        exp_base: 15_000,
        base_attack: 500,
        base_defense: 250,
        base_max_hp: 5_000,
        base_spirit: 500,
        base_physique: 350,
        base_speed: 90,
        requirement: Requirement::Item {
            kind: ItemKind::SoulMarrow,
            min_refinement: 100,
        },
        tribulation: TribulationRule::Always,
        tribulation_strikes: 5,
    },
    RealmInfo {
        realm: Realm::VoidRefining,
        name: "Void Refining",
        exp_base: 45_000,
        base_attack: 1_200,
        base_defense: 600,
        base_max_hp: 12_000,
        base_spirit: 1_200,
        base_physique: 800,
        base_speed: 130,
        requirement: Requirement::None,
        tribulation: TribulationRule::Always,
        tribulation_strikes: 7,
    },
    RealmInfo {
        realm: Realm::DaoUnion,
        name: "Dao Union",
        exp_base: 120_000,
        base_attack: 3_000,
        base_defense: 1_500,
        base_max_hp: 30_000,
        base_spirit: 3_000,
        base_physique: 2_000,
        base_speed: 180,
        requirement: Requirement::Flag(ProgressFlag::DaoComprehension),
        tribulation: TribulationRule::Always,
        tribulation_strikes: 7,
    },
    RealmInfo {
        realm: Realm::Mahayana,
        name: "Mahayana",
        exp_base: 300_000,
        base_attack: 7_500,
        base_defense: 3_700,
        base_max_hp: 75_000,
        base_spirit: 7_500,
        base_physique: 5_000,
        base_speed: 240,
        requirement: Requirement::Item {
            kind: ItemKind::ImmortalMarrow,
            min_refinement: 100,
        },
        tribulation: TribulationRule::Always,
        tribulation_strikes: 9,
    },
    RealmInfo {
        realm: Realm::TrueImmortal,
        name: "True Immortal",
        exp_base: 800_000,
        base_attack: 20_000,
        base_defense: 10_000,
        base_max_hp: 200_000,
        base_spirit: 20_000,
        base_physique: 12_000,
        base_speed: 320,
        requirement: Requirement::Flag(ProgressFlag::AscensionTrial),
        tribulation: TribulationRule::Always,
        tribulation_strikes: 9,
    },
];

/// A realm together with its sub-level (1-9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RealmPosition {
    pub realm: Realm,
    pub level: u8,
}

impl RealmPosition {
    pub fn new(realm: Realm, level: u8) -> Self {
        Self {
            realm,
            level: level.clamp(MIN_REALM_LEVEL, MAX_REALM_LEVEL),
        }
    }

    pub fn start() -> Self {
        Self::new(Realm::QiRefining, MIN_REALM_LEVEL)
    }

    /// The position one breakthrough ahead, or `None` at the peak.
    pub fn next(&self) -> Option<RealmPosition> {
        if self.level < MAX_REALM_LEVEL {
            return Some(Self::new(self.realm, self.level + 1));
        }
        self.realm
            .next()
            .map(|realm| Self::new(realm, MIN_REALM_LEVEL))
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }

    /// True when the next step crosses into a new realm.
    pub fn at_realm_peak(&self) -> bool {
        self.level == MAX_REALM_LEVEL
    }
}

impl fmt::Display for RealmPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.realm.name(), self.level)
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    // Breakthrough materials, refined before use
    CoreEssence,
    SoulMarrow,
    ImmortalMarrow,
    // Equipment
    Weapon,
    Armor,
    Talisman,
    // Consumables
    HealingPill,
}

impl ItemKind {
    /// Returns the display name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::CoreEssence => "Core Condensing Essence",
            ItemKind::SoulMarrow => "Soul Marrow",
            ItemKind::ImmortalMarrow => "Immortal Marrow",
            ItemKind::Weapon => "Weapon",
            ItemKind::Armor => "Armor",
            ItemKind::Talisman => "Talisman",
            ItemKind::HealingPill => "Healing Pill",
        }
    }

    pub fn is_equipment(&self) -> bool {
        matches!(self, ItemKind::Weapon | ItemKind::Armor | ItemKind::Talisman)
    }

    pub fn is_refinable(&self) -> bool {
        matches!(
            self,
            ItemKind::CoreEssence | ItemKind::SoulMarrow | ItemKind::ImmortalMarrow
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBonus {
    pub attack: u32,
    pub defense: u32,
    pub max_hp: u32,
    pub spirit: u32,
    pub speed: u32,
}

impl StatBonus {
    pub fn total(&self) -> u32 {
        self.attack + self.defense + self.max_hp + self.spirit + self.speed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub kind: ItemKind,
    pub name: String,
    pub quantity: u32,
    pub equipped: bool,
    /// Processing progress, 0-100. Only meaningful for refinable kinds.
    pub refinement: u32,
    pub bonus: StatBonus,
}

impl Item {
    pub fn new(id: u64, kind: ItemKind, quantity: u32) -> Self {
        Self {
            id,
            kind,
            name: kind.name().to_string(),
            quantity,
            equipped: false,
            refinement: 0,
            bonus: StatBonus::default(),
        }
    }

    pub fn equipment(id: u64, kind: ItemKind, name: &str, bonus: StatBonus) -> Self {
        Self {
            name: name.to_string(),
            bonus,
            ..Self::new(id, kind, 1)
        }
    }
}

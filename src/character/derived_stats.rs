use super::attributes::Attributes;
use super::realm::RealmPosition;
use crate::core::constants::STAT_GROWTH_PER_LEVEL;
use crate::items::Inventory;

/// Stats recomputed from realm base values whenever the position changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedStats {
    pub attack: u32,
    pub defense: u32,
    pub max_hp: u32,
    pub spirit: u32,
    pub physique: u32,
    pub speed: u32,
}

impl DerivedStats {
    /// Base values for a position with no equipment.
    pub fn for_position(position: RealmPosition) -> Self {
        Self::calculate_derived_stats(position, &Inventory::new())
    }

    /// Realm base values scaled by sub-level, plus equipped item bonuses.
    pub fn calculate_derived_stats(position: RealmPosition, inventory: &Inventory) -> Self {
        let info = position.realm.info();
        let growth = 1.0 + STAT_GROWTH_PER_LEVEL * (position.level.saturating_sub(1)) as f64;
        let scale = |base: u32| (base as f64 * growth).round() as u32;
        let bonus = inventory.equipped_bonus();

        Self {
            attack: scale(info.base_attack) + bonus.attack,
            defense: scale(info.base_defense) + bonus.defense,
            max_hp: scale(info.base_max_hp) + bonus.max_hp,
            spirit: scale(info.base_spirit) + bonus.spirit,
            physique: scale(info.base_physique),
            speed: scale(info.base_speed) + bonus.speed,
        }
    }

    /// Writes these stats over `attrs`. Luck is untouched and current hp is
    /// capped at the new maximum.
    pub fn apply_to(&self, attrs: &Attributes) -> Attributes {
        Attributes {
            attack: self.attack,
            defense: self.defense,
            hp: attrs.hp.min(self.max_hp),
            max_hp: self.max_hp,
            spirit: self.spirit,
            physique: self.physique,
            speed: self.speed,
            luck: attrs.luck,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::realm::Realm;
    use crate::items::{Item, ItemKind, StatBonus};

    #[test]
    fn test_start_position_matches_fresh_attributes() {
        let derived = DerivedStats::for_position(RealmPosition::start());
        let fresh = Attributes::new();
        assert_eq!(derived.attack, fresh.attack);
        assert_eq!(derived.defense, fresh.defense);
        assert_eq!(derived.max_hp, fresh.max_hp);
        assert_eq!(derived.spirit, fresh.spirit);
    }

    #[test]
    fn test_level_growth() {
        let lvl1 = DerivedStats::for_position(RealmPosition::new(Realm::Foundation, 1));
        let lvl9 = DerivedStats::for_position(RealmPosition::new(Realm::Foundation, 9));
        assert_eq!(lvl1.max_hp, 300);
        // 300 * (1 + 0.12 * 8) = 588
        assert_eq!(lvl9.max_hp, 588);
        assert!(lvl9.attack > lvl1.attack);
        assert!(lvl9.defense > lvl1.defense);
    }

    #[test]
    fn test_equipment_bonus_applies() {
        let mut inv = Inventory::new();
        let id = inv.insert(Item::equipment(
            0,
            ItemKind::Armor,
            "Scrap Plate",
            StatBonus {
                defense: 7,
                max_hp: 20,
                ..Default::default()
            },
        ));
        inv.equip(id).unwrap();

        let pos = RealmPosition::start();
        let bare = DerivedStats::for_position(pos);
        let geared = DerivedStats::calculate_derived_stats(pos, &inv);
        assert_eq!(geared.defense, bare.defense + 7);
        assert_eq!(geared.max_hp, bare.max_hp + 20);
    }

    #[test]
    fn test_apply_keeps_luck_and_caps_hp() {
        let mut attrs = Attributes::new();
        attrs.luck = 42;
        attrs.hp = 80;
        let derived = DerivedStats::for_position(RealmPosition::new(Realm::Foundation, 1));
        let applied = derived.apply_to(&attrs);
        assert_eq!(applied.luck, 42);
        assert_eq!(applied.hp, 80);
        assert_eq!(applied.max_hp, 300);

        let shrunk = DerivedStats {
            max_hp: 50,
            ..derived
        }
        .apply_to(&attrs);
        assert_eq!(shrunk.hp, 50);
    }
}

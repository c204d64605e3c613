use crate::core::constants::STARTING_LUCK;
use serde::{Deserialize, Serialize};

/// Core combat attributes plus current hp.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attributes {
    pub attack: u32,
    pub defense: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub spirit: u32,
    pub physique: u32,
    pub speed: u32,
    pub luck: u32,
}

impl Default for Attributes {
    fn default() -> Self {
        Self::new()
    }
}

impl Attributes {
    /// Fresh Qi Refining 1 attributes.
    pub fn new() -> Self {
        Self {
            attack: 10,
            defense: 5,
            hp: 100,
            max_hp: 100,
            spirit: 10,
            physique: 10,
            speed: 10,
            luck: STARTING_LUCK,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.hp == 0
    }

    pub fn heal_full(&mut self) {
        self.hp = self.max_hp;
    }

    pub fn heal(&mut self, amount: u32) {
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
    }

    /// Deals damage without killing: hp never drops below 1.
    pub fn wound(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount).max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_attributes() {
        let attrs = Attributes::new();
        assert_eq!(attrs.hp, attrs.max_hp);
        assert_eq!(attrs.luck, STARTING_LUCK);
        assert!(!attrs.is_dead());
    }

    #[test]
    fn test_wound_never_kills() {
        let mut attrs = Attributes::new();
        attrs.wound(500);
        assert_eq!(attrs.hp, 1);
        attrs.heal(30);
        assert_eq!(attrs.hp, 31);
        attrs.heal(1_000);
        assert_eq!(attrs.hp, attrs.max_hp);
    }
}

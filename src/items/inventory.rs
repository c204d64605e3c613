//! Unordered item collection with stacking, equip state and refinement.

use super::types::{Item, ItemKind, StatBonus};
use crate::core::constants::MAX_REFINEMENT;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("no item with id {0}")]
    UnknownItem(u64),
    #[error("no {0} left")]
    NoneLeft(String),
    #[error("{0} cannot be refined")]
    NotRefinable(String),
    #[error("{0} is already fully refined")]
    FullyRefined(String),
    #[error("{0} cannot be equipped")]
    NotEquipment(String),
    #[error("not enough spirit stones (need {need}, have {have})")]
    InsufficientStones { need: u64, have: u64 },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<Item>,
    next_id: u64,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Adds `quantity` of a plain item. Unrefined materials and consumables
    /// stack onto an existing unrefined stack of the same kind.
    pub fn add(&mut self, kind: ItemKind, quantity: u32) -> u64 {
        if !kind.is_equipment() {
            if let Some(stack) = self
                .items
                .iter_mut()
                .find(|i| i.kind == kind && i.refinement == 0)
            {
                stack.quantity = stack.quantity.saturating_add(quantity);
                return stack.id;
            }
        }
        let id = self.allocate_id();
        self.items.push(Item::new(id, kind, quantity));
        id
    }

    /// Inserts a fully built item, assigning it a fresh id.
    pub fn insert(&mut self, mut item: Item) -> u64 {
        let id = self.allocate_id();
        item.id = id;
        self.items.push(item);
        id
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn count(&self, kind: ItemKind) -> u32 {
        self.items
            .iter()
            .filter(|i| i.kind == kind)
            .map(|i| i.quantity)
            .sum()
    }

    /// Finds the most refined stack of `kind` that has reached `min_refinement`.
    pub fn find_refined(&self, kind: ItemKind, min_refinement: u32) -> Option<&Item> {
        self.items
            .iter()
            .filter(|i| i.kind == kind && i.quantity > 0 && i.refinement >= min_refinement)
            .max_by_key(|i| i.refinement)
    }

    /// Removes one unit from the given stack, dropping the stack when empty.
    pub fn consume_one(&mut self, id: u64) -> Result<(), InventoryError> {
        let index = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or(InventoryError::UnknownItem(id))?;
        let item = &mut self.items[index];
        item.quantity = item.quantity.saturating_sub(1);
        if item.quantity == 0 {
            self.items.remove(index);
        }
        Ok(())
    }

    /// Advances refinement of one unit. A multi-unit stack is split so the
    /// refined unit carries its own progress. Returns the refined item's id.
    pub fn refine(&mut self, id: u64, step: u32) -> Result<u64, InventoryError> {
        let index = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or(InventoryError::UnknownItem(id))?;
        let item = &self.items[index];
        if !item.kind.is_refinable() {
            return Err(InventoryError::NotRefinable(item.name.clone()));
        }
        if item.refinement >= MAX_REFINEMENT {
            return Err(InventoryError::FullyRefined(item.name.clone()));
        }

        let target_id = if item.quantity > 1 {
            let mut split = item.clone();
            split.quantity = 1;
            self.items[index].quantity -= 1;
            self.insert(split)
        } else {
            id
        };

        let target = self
            .items
            .iter_mut()
            .find(|i| i.id == target_id)
            .ok_or(InventoryError::UnknownItem(target_id))?;
        target.refinement = (target.refinement + step).min(MAX_REFINEMENT);
        Ok(target_id)
    }

    /// Equips an item, unequipping anything else of the same kind.
    pub fn equip(&mut self, id: u64) -> Result<(), InventoryError> {
        let kind = match self.get(id) {
            Some(item) if item.kind.is_equipment() => item.kind,
            Some(item) => return Err(InventoryError::NotEquipment(item.name.clone())),
            None => return Err(InventoryError::UnknownItem(id)),
        };
        for item in self.items.iter_mut().filter(|i| i.kind == kind) {
            item.equipped = item.id == id;
        }
        Ok(())
    }

    pub fn iter_equipped(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|i| i.equipped)
    }

    /// Sum of bonuses from everything equipped.
    pub fn equipped_bonus(&self) -> StatBonus {
        self.iter_equipped().fold(StatBonus::default(), |acc, item| StatBonus {
            attack: acc.attack + item.bonus.attack,
            defense: acc.defense + item.bonus.defense,
            max_hp: acc.max_hp + item.bonus.max_hp,
            spirit: acc.spirit + item.bonus.spirit,
            speed: acc.speed + item.bonus.speed,
        })
    }
}

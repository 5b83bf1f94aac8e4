//! Bounded character inventory.

use crate::state::types::ItemStack;

/// Inventory slot containing an item and its quantity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventorySlot {
    pub code: String,
    pub quantity: u32,
}

impl InventorySlot {
    pub fn new(code: impl Into<String>, quantity: u32) -> Self {
        Self {
            code: code.into(),
            quantity,
        }
    }
}

/// Item storage bounded by a total item count and a number of distinct slots.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    pub slots: Vec<InventorySlot>,
    pub max_items: u32,
    pub max_slots: u32,
}

impl Inventory {
    pub const DEFAULT_MAX_ITEMS: u32 = 100;
    pub const DEFAULT_MAX_SLOTS: u32 = 20;

    pub fn new(max_items: u32) -> Self {
        Self {
            slots: Vec::new(),
            max_items,
            max_slots: Self::DEFAULT_MAX_SLOTS,
        }
    }

    pub fn quantity_of(&self, code: &str) -> u32 {
        self.slots
            .iter()
            .filter(|slot| slot.code == code)
            .map(|slot| slot.quantity)
            .sum()
    }

    pub fn total_items(&self) -> u32 {
        self.slots.iter().map(|slot| slot.quantity).sum()
    }

    pub fn free_space(&self) -> u32 {
        self.max_items.saturating_sub(self.total_items())
    }

    pub fn used_slots(&self) -> u32 {
        self.slots.iter().filter(|slot| slot.quantity > 0).count() as u32
    }

    pub fn is_full(&self) -> bool {
        self.free_space() == 0 || self.used_slots() >= self.max_slots
    }

    /// Whether `quantity` units of `code` can be added.
    pub fn can_hold(&self, code: &str, quantity: u32) -> bool {
        if quantity > self.free_space() {
            return false;
        }
        self.quantity_of(code) > 0 || self.used_slots() < self.max_slots
    }

    pub fn add(&mut self, code: &str, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.slots.iter_mut().find(|slot| slot.code == code) {
            Some(slot) => slot.quantity += quantity,
            None => self.slots.push(InventorySlot::new(code, quantity)),
        }
    }

    /// Removes up to `quantity` units, returning how many were removed.
    pub fn remove(&mut self, code: &str, quantity: u32) -> u32 {
        let mut removed = 0;
        if let Some(slot) = self.slots.iter_mut().find(|slot| slot.code == code) {
            removed = slot.quantity.min(quantity);
            slot.quantity -= removed;
        }
        self.slots.retain(|slot| slot.quantity > 0);
        removed
    }

    pub fn stacks(&self) -> impl Iterator<Item = ItemStack> + '_ {
        self.slots
            .iter()
            .filter(|slot| slot.quantity > 0)
            .map(|slot| ItemStack::new(slot.code.clone(), slot.quantity))
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ITEMS)
    }
}

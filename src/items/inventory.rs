//! Inventory system
//!
//! Carried items as stacks, bounded by total carry weight.

use serde::{Deserialize, Serialize};

use super::item::{ItemDefinition, ItemId};
use super::loot::DropResult;
use crate::error::InventoryError;

/// A stack of identical items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item_id: ItemId,
    pub quantity: u32,
    /// Stack size limit copied from the definition when the stack was opened
    pub max_stack: u32,
    /// Weight of a single unit
    pub unit_weight: f32,
    pub unit_value: u32,
    /// Level of the drop that opened this stack
    pub item_level: i32,
}

impl ItemStack {
    pub fn weight(&self) -> f32 {
        self.unit_weight * self.quantity as f32
    }

    pub fn space_left(&self) -> u32 {
        self.max_stack.saturating_sub(self.quantity)
    }

    pub fn is_full(&self) -> bool {
        self.space_left() == 0
    }
}

/// Carried inventory with a weight limit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    max_weight: f32,
    stacks: Vec<ItemStack>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(50.0)
    }
}

impl Inventory {
    /// Create an empty inventory that can carry up to `max_weight`
    pub fn new(max_weight: f32) -> Self {
        Self {
            max_weight,
            stacks: Vec::new(),
        }
    }

    pub fn max_weight(&self) -> f32 {
        self.max_weight
    }

    /// Get current number of stacks
    pub fn stack_count(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    pub fn stacks(&self) -> &[ItemStack] {
        &self.stacks
    }

    pub fn total_weight(&self) -> f32 {
        self.stacks.iter().map(ItemStack::weight).sum()
    }

    pub fn total_value(&self) -> u64 {
        self.stacks
            .iter()
            .map(|s| u64::from(s.unit_value) * u64::from(s.quantity))
            .sum()
    }

    pub fn remaining_capacity(&self) -> f32 {
        (self.max_weight - self.total_weight()).max(0.0)
    }

    /// Total units held of an item
    pub fn count(&self, item_id: &str) -> u32 {
        self.stacks
            .iter()
            .filter(|s| s.item_id == item_id)
            .map(|s| s.quantity)
            .sum()
    }

    /// Check if `quantity` units would fit under the weight limit
    pub fn can_carry(&self, item: &ItemDefinition, quantity: u32) -> bool {
        self.total_weight() + item.physical_weight * quantity as f32 <= self.max_weight
    }

    /// Add `quantity` units at the item's base level
    pub fn add(&mut self, item: &ItemDefinition, quantity: u32) -> Result<u32, InventoryError> {
        self.add_leveled(item, item.base_item_level, quantity)
    }

    /// Add `quantity` units; either all of them fit or none are added.
    /// Stackable items top up existing stacks before new stacks are opened.
    pub fn add_leveled(&mut self, item: &ItemDefinition, item_level: i32, quantity: u32) -> Result<u32, InventoryError> {
        if quantity == 0 {
            return Err(InventoryError::ZeroQuantity);
        }

        let would_weigh = self.total_weight() + item.physical_weight * quantity as f32;
        if would_weigh > self.max_weight {
            return Err(InventoryError::TooHeavy {
                item: item.id.clone(),
                quantity,
                would_weigh,
                max_weight: self.max_weight,
            });
        }

        let mut remaining = quantity;
        if item.stackable {
            for stack in self
                .stacks
                .iter_mut()
                .filter(|s| s.item_id == item.id && s.item_level == item_level)
            {
                let moved = stack.space_left().min(remaining);
                stack.quantity += moved;
                remaining -= moved;
                if remaining == 0 {
                    break;
                }
            }
        }

        let limit = item.stack_limit();
        while remaining > 0 {
            let take = limit.min(remaining);
            self.stacks.push(ItemStack {
                item_id: item.id.clone(),
                quantity: take,
                max_stack: limit,
                unit_weight: item.physical_weight,
                unit_value: item.value,
                item_level,
            });
            remaining -= take;
        }

        Ok(quantity)
    }

    /// Pick up loot drops; drops that are too heavy are handed back
    pub fn add_drops<'a>(&mut self, drops: &[DropResult<'a>]) -> Vec<DropResult<'a>> {
        let mut left_behind = Vec::new();
        for drop in drops {
            if let Err(e) = self.add_leveled(drop.item, drop.item_level, 1) {
                log::debug!("Left {} behind: {}", drop.item.id, e);
                left_behind.push(*drop);
            }
        }
        left_behind
    }

    /// Remove up to `quantity` units, newest stacks first. Returns how many were removed.
    pub fn remove(&mut self, item_id: &str, quantity: u32) -> u32 {
        let mut remaining = quantity;
        for stack in self.stacks.iter_mut().rev().filter(|s| s.item_id == item_id) {
            let taken = stack.quantity.min(remaining);
            stack.quantity -= taken;
            remaining -= taken;
            if remaining == 0 {
                break;
            }
        }
        self.stacks.retain(|s| s.quantity > 0);
        quantity - remaining
    }

    /// Merge partial stacks of the same item and level
    pub fn consolidate(&mut self) {
        let mut merged: Vec<ItemStack> = Vec::with_capacity(self.stacks.len());
        for mut stack in self.stacks.drain(..) {
            let (id, level) = (stack.item_id.clone(), stack.item_level);
            for existing in merged
                .iter_mut()
                .filter(|s| s.item_id == id && s.item_level == level)
            {
                let moved = existing.space_left().min(stack.quantity);
                existing.quantity += moved;
                stack.quantity -= moved;
                if stack.quantity == 0 {
                    break;
                }
            }
            if stack.quantity > 0 {
                merged.push(stack);
            }
        }
        self.stacks = merged;
    }
}

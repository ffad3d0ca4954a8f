//! Item definitions
//!
//! Static item records and the read-only catalog that owns them.

use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};

use super::bucket::LevelBucketIndex;

/// Unique item ID, as authored in the data files
pub type ItemId = String;

fn default_base_weight() -> f32 {
    1.0
}

fn default_max_stack() -> u32 {
    1
}

/// An immutable item record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Unique template ID for reference
    pub id: ItemId,
    /// Display name
    pub name: String,
    /// Level the item is authored for
    pub base_item_level: i32,
    /// Relative drop weight before any profile modifiers
    #[serde(default = "default_base_weight")]
    pub base_weight: f32,
    /// Free-form tags used by loot profiles (e.g. "fire", "cursed")
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub stackable: bool,
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
    /// Gold value
    #[serde(default)]
    pub value: u32,
    /// Carry weight of a single unit
    #[serde(default)]
    pub physical_weight: f32,
}

impl ItemDefinition {
    /// Create a non-stackable item with neutral weights and no tags
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, base_item_level: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_item_level,
            base_weight: default_base_weight(),
            tags: BTreeSet::new(),
            stackable: false,
            max_stack: default_max_stack(),
            value: 0,
            physical_weight: 0.0,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_base_weight(mut self, weight: f32) -> Self {
        self.base_weight = weight;
        self
    }

    pub fn with_stacking(mut self, max_stack: u32) -> Self {
        self.stackable = max_stack > 1;
        self.max_stack = max_stack.max(1);
        self
    }

    pub fn with_physical_weight(mut self, weight: f32) -> Self {
        self.physical_weight = weight;
        self
    }

    pub fn with_value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Largest number of units a single inventory stack may hold
    pub fn stack_limit(&self) -> u32 {
        if self.stackable {
            self.max_stack.max(1)
        } else {
            1
        }
    }
}

/// Read-only item catalog with its level bucket index
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: Vec<ItemDefinition>,
    index: LevelBucketIndex,
}

impl ItemCatalog {
    /// Build a catalog; the bucket index is built once here
    pub fn new(items: Vec<ItemDefinition>) -> Self {
        let index = LevelBucketIndex::build(&items);
        Self { items, index }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[ItemDefinition] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&ItemDefinition> {
        self.items.get(index)
    }

    /// Find an item by ID
    pub fn find(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Items that might fall in `[min_level, max_level]`.
    /// Neighbouring items from the same buckets are included; callers filter exactly.
    pub fn candidates(&self, min_level: i32, max_level: i32) -> impl Iterator<Item = &ItemDefinition> + '_ {
        self.index
            .lookup(min_level, max_level)
            .filter_map(move |idx| self.items.get(idx))
    }
}

impl From<Vec<ItemDefinition>> for ItemCatalog {
    fn from(items: Vec<ItemDefinition>) -> Self {
        Self::new(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_limit() {
        let sword = ItemDefinition::new("sword", "Sword", 3);
        assert_eq!(sword.stack_limit(), 1);

        let arrows = ItemDefinition::new("arrow", "Arrow", 1).with_stacking(50);
        assert!(arrows.stackable);
        assert_eq!(arrows.stack_limit(), 50);
    }

    #[test]
    fn test_catalog_find() {
        let catalog = ItemCatalog::new(vec![
            ItemDefinition::new("a", "A", 1),
            ItemDefinition::new("b", "B", 12),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.find("b").map(|i| i.base_item_level), Some(12));
        assert!(catalog.find("c").is_none());
    }

    #[test]
    fn test_item_from_ron() {
        let ron_src = r#"(id: "ember_blade", name: "Ember Blade", base_item_level: 14, tags: ["fire", "weapon"])"#;
        let item: ItemDefinition = ron::from_str(ron_src).unwrap();
        assert_eq!(item.base_weight, 1.0);
        assert_eq!(item.max_stack, 1);
        assert!(item.has_tag("fire"));
    }
}

//! Item system

pub mod item;
pub mod bucket;
pub mod loot;
pub mod inventory;

pub use item::{ItemDefinition, ItemCatalog, ItemId};
pub use bucket::LevelBucketIndex;
pub use loot::{LootProfile, LootProfiles, LevelCurve, LootRoller, LootRoll, LootPreview, DropResult};
pub use inventory::{Inventory, ItemStack};

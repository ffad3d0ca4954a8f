//! Dungeon Dresser - loot, inventory and tile dressing for grid levels
//!
//! Rolls weighted loot for enemies and containers, keeps a weight-limited
//! inventory, and turns a raw room grid into connected wall meshes and
//! seamless dual-grid floors.

pub mod error;
pub mod items;
pub mod world;
pub mod entities;
pub mod data;
pub mod dressing;

// Re-export commonly used types
pub use data::DataManager;
pub use dressing::{dress_level, DressedLevel};
pub use error::{DataError, InventoryError, PlacementError};
pub use items::{Inventory, ItemCatalog, LootRoller};

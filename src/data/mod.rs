//! Data loading and external content
//!
//! Items, loot profiles and the tileset live in RON files so they can be
//! tuned without recompiling.

pub mod defaults;
pub mod loader;

pub use defaults::{default_items, default_loot_profiles, default_tile_config, TileConfig};
pub use loader::{data_directory, export_default_data, DataManager};

//! RON data loader
//!
//! Loads items, loot profiles and the tileset from RON files, with a
//! per-file fallback to the built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::defaults::{default_items, default_loot_profiles, default_tile_config, TileConfig};
use crate::error::DataError;
use crate::items::{ItemCatalog, ItemDefinition, LootProfiles};

pub const ITEMS_FILE: &str = "items.ron";
pub const LOOT_PROFILES_FILE: &str = "loot_profiles.ron";
pub const TILES_FILE: &str = "tiles.ron";

/// All static data, loaded once at startup and passed by reference
#[derive(Debug, Clone)]
pub struct DataManager {
    pub items: ItemCatalog,
    pub loot_profiles: LootProfiles,
    pub tiles: TileConfig,
}

impl DataManager {
    /// Load from the data directory, falling back to defaults per file
    pub fn new() -> Self {
        Self::load_from(&data_directory())
    }

    /// Load every data file under `base_path`
    pub fn load_from(base_path: &Path) -> Self {
        let items: Vec<ItemDefinition> = load_or_default(&base_path.join(ITEMS_FILE), default_items);
        let loot_profiles = load_or_default(&base_path.join(LOOT_PROFILES_FILE), default_loot_profiles);
        let tiles = load_or_default(&base_path.join(TILES_FILE), default_tile_config);

        log::info!(
            "Loaded {} items, {} loot profiles from {:?}",
            items.len(),
            loot_profiles.profiles.len(),
            base_path
        );

        Self {
            items: ItemCatalog::new(items),
            loot_profiles,
            tiles,
        }
    }

    /// Get item catalog
    pub fn catalog(&self) -> &ItemCatalog {
        &self.items
    }

    /// Get loot profiles
    pub fn profiles(&self) -> &LootProfiles {
        &self.loot_profiles
    }

    /// Get tileset configuration
    pub fn tile_config(&self) -> &TileConfig {
        &self.tiles
    }
}

impl Default for DataManager {
    fn default() -> Self {
        Self {
            items: ItemCatalog::new(default_items()),
            loot_profiles: default_loot_profiles(),
            tiles: default_tile_config(),
        }
    }
}

/// The user's data directory if it exists, otherwise `assets/data`
pub fn data_directory() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "dungeon-dresser", "DungeonDresser") {
        let path = proj_dirs.data_dir().join("data");
        if path.is_dir() {
            return path;
        }
    }
    PathBuf::from("assets/data")
}

/// Read and parse one RON file
pub fn load_ron<T: DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    let content = fs::read_to_string(path).map_err(|source| DataError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&content).map_err(|e| DataError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn load_or_default<T, F>(path: &Path, default: F) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    if !path.exists() {
        log::debug!("{:?} not found, using defaults", path);
        return default();
    }
    match load_ron(path) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            default()
        }
    }
}

fn write_ron<T: Serialize>(path: &Path, what: &'static str, value: &T) -> Result<(), DataError> {
    let text = ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default()).map_err(|e| DataError::Serialize {
        what,
        message: e.to_string(),
    })?;
    fs::write(path, text).map_err(|source| DataError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Export all default data to RON files for easy editing
pub fn export_default_data(base_path: &Path) -> Result<(), DataError> {
    fs::create_dir_all(base_path).map_err(|source| DataError::Write {
        path: base_path.to_path_buf(),
        source,
    })?;

    write_ron(&base_path.join(ITEMS_FILE), "items", &default_items())?;
    write_ron(&base_path.join(LOOT_PROFILES_FILE), "loot profiles", &default_loot_profiles())?;
    write_ron(&base_path.join(TILES_FILE), "tiles", &default_tile_config())?;

    log::info!("Exported default data to {:?}", base_path);
    Ok(())
}

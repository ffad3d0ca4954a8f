//! Built-in data
//!
//! Used whenever a data file is missing or broken, and written out by
//! `export_default_data` as a starting point for editing.

use serde::{Deserialize, Serialize};

use crate::items::{ItemDefinition, LevelCurve, LootProfile, LootProfiles};
use crate::world::generation::{LevelParams, LevelPalette};
use crate::world::{CompositorConfig, FloorTileSet, FloorTypeRegistry, TileId, WallConfig, WallTileSet};

pub const WALL_TILE: TileId = 1;
pub const DOOR_TILE: TileId = 2;
pub const DIRT_TILE: TileId = 3;
pub const STONE_TILE: TileId = 4;
pub const WOOD_TILE: TileId = 5;
pub const MOSS_TILE: TileId = 6;
pub const OPEN_DOOR_MESH: TileId = 52;

/// Tile ids, floor types and wall meshes for one tileset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileConfig {
    pub floors: FloorTypeRegistry,
    /// Wall meshes; without them wall connection is skipped
    #[serde(default)]
    pub walls: Option<WallTileSet>,
    pub wall_config: WallConfig,
    #[serde(default)]
    pub compositor: CompositorConfig,
    pub palette: LevelPalette,
    #[serde(default)]
    pub level: LevelParams,
    /// Open-door mesh swapped in when a door is used
    pub open_door_tile: TileId,
    /// Number of meshes in the mesh library
    pub mesh_library_size: u32,
    /// Stacked floor layers the renderer supports
    pub max_layers: u8,
}

impl Default for TileConfig {
    fn default() -> Self {
        default_tile_config()
    }
}

fn floor_set(first: TileId) -> FloorTileSet {
    FloorTileSet {
        whole: first,
        half: first + 1,
        three_quarter: first + 2,
        quarter: first + 3,
    }
}

pub fn default_tile_config() -> TileConfig {
    let mut floors = FloorTypeRegistry::new();
    for (name, tile, first_mesh) in [
        ("dirt", DIRT_TILE, 20),
        ("stone", STONE_TILE, 24),
        ("wood", WOOD_TILE, 28),
        ("moss", MOSS_TILE, 32),
    ] {
        floors.register_floor_type(name, floor_set(first_mesh));
        floors.map_tile_id_to_type(tile, name);
    }

    TileConfig {
        floors,
        walls: Some(WallTileSet::sequential(40)),
        wall_config: WallConfig {
            plane_y: 0,
            wall_tile: WALL_TILE,
            door_placeholder: Some(DOOR_TILE),
        },
        compositor: CompositorConfig::default(),
        palette: LevelPalette {
            wall: WALL_TILE,
            door: DOOR_TILE,
            corridor: DIRT_TILE,
            room_floors: vec![STONE_TILE, WOOD_TILE],
            patch_floors: vec![MOSS_TILE],
        },
        level: LevelParams::default(),
        open_door_tile: OPEN_DOOR_MESH,
        mesh_library_size: 64,
        max_layers: 4,
    }
}

pub fn default_items() -> Vec<ItemDefinition> {
    vec![
        // Consumables
        ItemDefinition::new("health_potion", "Health Potion", 1)
            .with_tags(["consumable", "potion"])
            .with_stacking(10)
            .with_physical_weight(0.5)
            .with_value(15),
        ItemDefinition::new("torch", "Torch", 1)
            .with_tags(["consumable", "fire"])
            .with_stacking(5)
            .with_physical_weight(1.0)
            .with_value(2),
        ItemDefinition::new("elixir", "Elixir of Vigor", 18)
            .with_tags(["consumable", "potion"])
            .with_base_weight(0.4)
            .with_stacking(5)
            .with_physical_weight(0.5)
            .with_value(120),
        ItemDefinition::new("fire_bomb", "Fire Bomb", 12)
            .with_tags(["consumable", "fire"])
            .with_base_weight(0.6)
            .with_stacking(5)
            .with_physical_weight(1.0)
            .with_value(45),
        // Weapons
        ItemDefinition::new("rusty_sword", "Rusty Sword", 2)
            .with_tags(["weapon"])
            .with_physical_weight(4.0)
            .with_value(10),
        ItemDefinition::new("iron_mace", "Iron Mace", 8)
            .with_tags(["weapon"])
            .with_physical_weight(6.0)
            .with_value(40),
        ItemDefinition::new("ember_blade", "Ember Blade", 14)
            .with_tags(["weapon", "fire"])
            .with_base_weight(0.5)
            .with_physical_weight(4.5)
            .with_value(150),
        ItemDefinition::new("grave_axe", "Grave Axe", 22)
            .with_tags(["weapon", "cursed"])
            .with_base_weight(0.3)
            .with_physical_weight(8.0)
            .with_value(260),
        // Armor
        ItemDefinition::new("leather_cap", "Leather Cap", 3)
            .with_tags(["armor"])
            .with_physical_weight(1.5)
            .with_value(12),
        ItemDefinition::new("chain_vest", "Chain Vest", 11)
            .with_tags(["armor"])
            .with_base_weight(0.7)
            .with_physical_weight(12.0)
            .with_value(90),
        ItemDefinition::new("plate_armor", "Plate Armor", 20)
            .with_tags(["armor"])
            .with_base_weight(0.4)
            .with_physical_weight(25.0)
            .with_value(300),
        // Trinkets
        ItemDefinition::new("bone_charm", "Bone Charm", 6)
            .with_tags(["trinket", "cursed"])
            .with_physical_weight(0.2)
            .with_value(30),
        ItemDefinition::new("cinder_ring", "Cinder Ring", 16)
            .with_tags(["trinket", "fire"])
            .with_base_weight(0.3)
            .with_physical_weight(0.1)
            .with_value(200),
    ]
}

pub fn default_loot_profiles() -> LootProfiles {
    LootProfiles {
        profiles: vec![
            LootProfile {
                level_range: 6,
                min_drops: 1,
                max_drops: 3,
                allow_higher_level: false,
                prefer_exact_level: true,
                excluded_tags: ["cursed"].into_iter().map(String::from).collect(),
                ..LootProfile::named("chest")
            },
            LootProfile {
                level_range: 4,
                drop_chance: 0.6,
                item_level_bonus: 1,
                level_curve: Some(LevelCurve::linear_falloff()),
                ..LootProfile::named("enemy")
            },
            LootProfile {
                level_range: 8,
                item_level_multiplier: 1.5,
                item_level_bonus: 2,
                min_drops: 2,
                max_drops: 4,
                bonus_tags: [("fire".to_string(), 3.0)].into_iter().collect(),
                prefer_exact_level: true,
                weight_falloff_rate: 0.2,
                ..LootProfile::named("fire_elite")
            },
            LootProfile {
                level_range: 10,
                drop_chance: 0.35,
                required_tags: ["consumable"].into_iter().map(String::from).collect(),
                ..LootProfile::named("urn")
            },
        ],
    }
}

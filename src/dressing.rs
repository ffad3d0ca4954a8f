//! Level dressing pass
//!
//! Runs wall connection and floor compositing over a generated level. Both
//! plans are computed against the untouched grid before either is applied.

use crate::data::TileConfig;
use crate::world::generation::Level;
use crate::world::{
    apply_plan, ApplyReport, DualGridCompositor, LayeredTileStore, PlacementPlan, SparseGrid, WallConnectionPlanner,
    WallPlan,
};

/// A level after dressing
#[derive(Debug, Clone)]
pub struct DressedLevel {
    /// Primary grid with resolved wall meshes and the floor source tiles removed
    pub grid: SparseGrid,
    /// Dual-grid floor meshes
    pub floors: LayeredTileStore,
    pub wall_plan: WallPlan,
    pub floor_plan: PlacementPlan,
    pub wall_report: ApplyReport,
    pub floor_report: ApplyReport,
    /// Source floor tiles cleared after compositing
    pub cleared: usize,
}

pub fn wall_planner(tiles: &TileConfig) -> WallConnectionPlanner {
    match &tiles.walls {
        Some(walls) => WallConnectionPlanner::new(walls.clone(), tiles.wall_config),
        None => WallConnectionPlanner::without_tiles(tiles.wall_config),
    }
}

pub fn floor_compositor(tiles: &TileConfig) -> DualGridCompositor {
    DualGridCompositor::new(tiles.floors.clone(), tiles.compositor)
}

/// Dress `level` with the given tileset
pub fn dress_level(tiles: &TileConfig, level: &Level) -> DressedLevel {
    let planner = wall_planner(tiles);
    let compositor = floor_compositor(tiles);
    let mut grid = level.grid.clone();

    // Read phase
    let wall_plan = planner.plan(&grid, &level.rooms);
    let floor_plan = compositor.composite(&grid);

    // Write phase
    let wall_report = wall_plan.apply(&mut grid);
    let mut floors = LayeredTileStore::new(tiles.mesh_library_size, tiles.max_layers);
    let floor_report = apply_plan(&floor_plan, &mut floors);
    let cleared = compositor.clear_source_tiles(&mut grid);

    log::info!(
        "Dressed level: {} walls, {} floor meshes on {} layers, {} placements skipped",
        wall_report.applied,
        floor_report.applied,
        floors.layer_count(),
        wall_report.skipped.len() + floor_report.skipped.len() + floor_plan.skipped.len()
    );

    DressedLevel {
        grid,
        floors,
        wall_plan,
        floor_plan,
        wall_report,
        floor_report,
        cleared,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::default_tile_config;
    use crate::world::generation::generate_level;
    use crate::world::GridSource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn dressed(seed: u64) -> (TileConfig, Level, DressedLevel) {
        let tiles = default_tile_config();
        let level = generate_level(&mut StdRng::seed_from_u64(seed), &tiles.level, &tiles.palette);
        let dressed = dress_level(&tiles, &level);
        (tiles, level, dressed)
    }

    #[test]
    fn test_dressed_level_has_no_raw_tiles_left() {
        let (tiles, level, dressed) = dressed(17);
        let walls = tiles.walls.clone().unwrap();

        assert!(dressed.wall_report.skipped.is_empty());
        assert!(dressed.floor_report.skipped.is_empty());
        assert!(dressed.floor_plan.skipped.is_empty());
        assert!(!dressed.floors.is_empty());

        for (coord, cell) in dressed.grid.iter() {
            assert_ne!(cell.tile, tiles.wall_config.wall_tile, "raw wall left at {coord}");
            assert!(!tiles.floors.is_registered_floor(cell.tile), "floor source left at {coord}");
        }
        for door in &level.doors {
            assert_eq!(dressed.grid.get_cell(*door), Some(tiles.palette.door));
        }
        for room in &level.rooms {
            for coord in room.perimeter(0) {
                let tile = dressed.grid.get_cell(coord).unwrap();
                assert!(walls.contains(tile) || tile == tiles.palette.door);
            }
        }
    }

    #[test]
    fn test_dressing_is_deterministic() {
        let (_, _, a) = dressed(5);
        let (_, _, b) = dressed(5);
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.floor_plan, b.floor_plan);
        assert_eq!(a.wall_plan, b.wall_plan);
    }

    #[test]
    fn test_missing_wall_meshes_leave_walls_raw() {
        let mut tiles = default_tile_config();
        tiles.walls = None;
        let level = generate_level(&mut StdRng::seed_from_u64(8), &tiles.level, &tiles.palette);
        let dressed = dress_level(&tiles, &level);

        assert!(dressed.wall_plan.is_empty());
        assert!(dressed.grid.iter().any(|(_, cell)| cell.tile == tiles.wall_config.wall_tile));
        assert!(!dressed.floors.is_empty());
    }
}

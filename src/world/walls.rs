//! Wall connection planning
//!
//! Room perimeters are carved with one generic wall id. The planner looks at
//! every perimeter cell's neighbours and swaps the generic id for the wall
//! mesh that connects to them. All neighbour reads happen against the grid
//! as it was before planning; replacements are collected into a plan and
//! written in one batch afterwards.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::adjacency::{AdjacencyMap, Direction, WallShapeResolver};
use super::grid::{GridCoord, GridSource};
use super::placement::{apply_plan, ApplyReport, GridSink, PlacementEntry, PlacementKind, PlacementPlan, Surface};
use super::tile::{TileId, WallTileSet};

/// A rectangular room, bounds inclusive of its wall ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub x1: i32,
    pub z1: i32,
    pub x2: i32,
    pub z2: i32,
}

impl Room {
    /// Room whose wall ring starts at `(x, z)` and spans `width` x `depth` cells
    pub fn new(x: i32, z: i32, width: i32, depth: i32) -> Self {
        Self {
            x1: x,
            z1: z,
            x2: x + width.max(1) - 1,
            z2: z + depth.max(1) - 1,
        }
    }

    pub fn center(&self) -> (i32, i32) {
        ((self.x1 + self.x2) / 2, (self.z1 + self.z2) / 2)
    }

    pub fn intersects(&self, other: &Room) -> bool {
        self.x1 <= other.x2 && self.x2 >= other.x1 && self.z1 <= other.z2 && self.z2 >= other.z1
    }

    pub fn contains(&self, x: i32, z: i32) -> bool {
        x >= self.x1 && x <= self.x2 && z >= self.z1 && z <= self.z2
    }

    pub fn is_perimeter(&self, x: i32, z: i32) -> bool {
        self.contains(x, z) && (x == self.x1 || x == self.x2 || z == self.z1 || z == self.z2)
    }

    /// Wall ring cells on level `y`, row by row
    pub fn perimeter(&self, y: i32) -> impl Iterator<Item = GridCoord> + '_ {
        self.cells(y).filter(move |c| self.is_perimeter(c.x, c.z))
    }

    /// Cells inside the wall ring on level `y`
    pub fn interior(&self, y: i32) -> impl Iterator<Item = GridCoord> + '_ {
        self.cells(y).filter(move |c| !self.is_perimeter(c.x, c.z))
    }

    fn cells(&self, y: i32) -> impl Iterator<Item = GridCoord> + '_ {
        (self.z1..=self.z2).flat_map(move |z| (self.x1..=self.x2).map(move |x| GridCoord::plane(x, z, y)))
    }
}

/// Which ids the planner reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallConfig {
    /// Level the walls stand on
    #[serde(default)]
    pub plane_y: i32,
    /// Generic wall id written by room carving
    pub wall_tile: TileId,
    /// Doorway marker; connects like a wall but is never replaced
    #[serde(default)]
    pub door_placeholder: Option<TileId>,
}

/// Wall replacements for one planning pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WallPlan {
    pub placements: PlacementPlan,
}

impl WallPlan {
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn entries(&self) -> &[PlacementEntry] {
        &self.placements.entries
    }

    /// Write every replacement in one batch
    pub fn apply<S: GridSink + ?Sized>(&self, sink: &mut S) -> ApplyReport {
        let report = apply_plan(&self.placements, sink);
        log::debug!("Applied {} wall replacements ({} refused)", report.applied, report.skipped.len());
        report
    }
}

/// Plans which wall mesh goes on each wall cell
#[derive(Debug, Clone)]
pub struct WallConnectionPlanner {
    resolver: Option<WallShapeResolver>,
    config: WallConfig,
}

impl WallConnectionPlanner {
    pub fn new(tiles: WallTileSet, config: WallConfig) -> Self {
        Self {
            resolver: Some(WallShapeResolver::new(tiles)),
            config,
        }
    }

    /// Planner without a wall vocabulary; every pass is a no-op
    pub fn without_tiles(config: WallConfig) -> Self {
        Self { resolver: None, config }
    }

    pub fn config(&self) -> &WallConfig {
        &self.config
    }

    /// Plan replacements for the wall rings of `rooms`.
    /// Cells shared by several rooms are planned once.
    pub fn plan<G: GridSource + ?Sized>(&self, grid: &G, rooms: &[Room]) -> WallPlan {
        let cells: BTreeSet<GridCoord> = rooms.iter().flat_map(|room| room.perimeter(self.config.plane_y)).collect();
        self.plan_cells(grid, cells)
    }

    /// Plan replacements for `cells`, in the order given
    pub fn plan_cells<G, I>(&self, grid: &G, cells: I) -> WallPlan
    where
        G: GridSource + ?Sized,
        I: IntoIterator<Item = GridCoord>,
    {
        let Some(resolver) = &self.resolver else {
            log::warn!("No wall tiles configured, skipping wall connection");
            return WallPlan::default();
        };

        let mut plan = PlacementPlan::new();
        for coord in cells {
            let Some(tile) = grid.get_cell(coord) else { continue };
            if !self.is_replaceable(resolver, tile) {
                continue;
            }

            let adjacency = AdjacencyMap::from_fn(|dir: Direction| {
                grid.get_cell(dir.neighbour_of(coord))
                    .is_some_and(|t| self.connects(resolver, t))
            });
            let result = resolver.resolve(adjacency);

            plan.push(PlacementEntry {
                coord,
                layer: 0,
                surface: Surface::Primary,
                tile: result.tile_id,
                rotation: result.rotation,
                kind: PlacementKind::Wall(result.shape),
            });
        }

        log::debug!("Planned {} wall replacements", plan.len());
        WallPlan { placements: plan }
    }

    /// Generic walls and already-resolved wall meshes can be (re)placed
    fn is_replaceable(&self, resolver: &WallShapeResolver, tile: TileId) -> bool {
        tile == self.config.wall_tile || resolver.tiles().contains(tile)
    }

    fn connects(&self, resolver: &WallShapeResolver, tile: TileId) -> bool {
        self.is_replaceable(resolver, tile) || Some(tile) == self.config.door_placeholder
    }
}

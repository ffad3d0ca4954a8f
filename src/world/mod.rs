//! World module
//!
//! Sparse tile grid, wall and floor dressing passes, and level generation.

pub mod grid;
pub mod tile;
pub mod orientation;
pub mod adjacency;
pub mod placement;
pub mod dual_grid;
pub mod walls;
pub mod generation;

pub use grid::{Cell, GridCoord, GridSource, SparseGrid};
pub use tile::{CrossVariant, FloorShape, TVariant, TileId, WallShape, WallTileSet};
pub use orientation::Rotation;
pub use adjacency::{AdjacencyMap, Direction, TileShapeResult, WallShapeResolver};
pub use placement::{apply_plan, ApplyReport, GridSink, LayeredTileStore, PlacementEntry, PlacementKind, PlacementPlan, Surface};
pub use dual_grid::{CompositorConfig, DualGridCompositor, FloorTileSet, FloorTypeRegistry, QuadrantGroup, Quadrants};
pub use walls::{Room, WallConfig, WallConnectionPlanner, WallPlan};

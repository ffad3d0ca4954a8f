//! Placement plans
//!
//! Compositing and wall planning only read the grid and produce a plan.
//! Writing the plan into a sink is a separate step that runs once the whole
//! plan exists.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::grid::{Cell, GridCoord, SparseGrid};
use super::orientation::{grid_write_code, Rotation};
use super::tile::{FloorShape, TileId, WallShape};
use crate::error::PlacementError;

/// Vertical gap between stacked floor layers
pub const LAYER_Y_OFFSET: f32 = 0.01;

/// Where a placement is materialized
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Surface {
    /// The grid itself
    Primary,
    /// A free mesh slot raised above the grid
    Auxiliary { y_offset: f32 },
}

impl Surface {
    /// Surface for a stacking layer; layer 0 is the grid
    pub fn for_layer(layer: u8) -> Self {
        Self::stacked(layer, LAYER_Y_OFFSET)
    }

    /// Like `for_layer` with a custom gap between layers
    pub fn stacked(layer: u8, step: f32) -> Self {
        if layer == 0 {
            Surface::Primary
        } else {
            Surface::Auxiliary {
                y_offset: f32::from(layer) * step,
            }
        }
    }
}

/// What produced a placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementKind {
    Floor { floor_type: String, shape: FloorShape },
    Wall(WallShape),
}

/// A single tile/mesh to write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementEntry {
    pub coord: GridCoord,
    pub layer: u8,
    pub surface: Surface,
    pub tile: TileId,
    pub rotation: Rotation,
    pub kind: PlacementKind,
}

impl PlacementEntry {
    /// Orientation code for the grid-write path
    pub fn orientation_code(&self) -> u8 {
        grid_write_code(self.rotation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// A tile id maps to a floor type that was never registered
    UnregisteredFloorType(String),
}

/// Work dropped while building a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedPlacement {
    pub coord: GridCoord,
    pub reason: SkipReason,
}

/// Placements computed in one pass, plus what was skipped
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementPlan {
    pub entries: Vec<PlacementEntry>,
    pub skipped: Vec<SkippedPlacement>,
}

impl PlacementPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: PlacementEntry) {
        self.entries.push(entry);
    }

    pub fn skip(&mut self, coord: GridCoord, reason: SkipReason) {
        self.skipped.push(SkippedPlacement { coord, reason });
    }

    /// Entries at `coord` on any layer
    pub fn at(&self, coord: GridCoord) -> impl Iterator<Item = &PlacementEntry> + '_ {
        self.entries.iter().filter(move |e| e.coord == coord)
    }

    /// Highest layer used, if any
    pub fn max_layer(&self) -> Option<u8> {
        self.entries.iter().map(|e| e.layer).max()
    }
}

/// Something that can materialize placements
pub trait GridSink {
    fn write(&mut self, entry: &PlacementEntry) -> Result<(), PlacementError>;
}

/// Outcome of applying a plan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyReport {
    pub applied: usize,
    pub skipped: Vec<PlacementError>,
}

/// Write every entry of `plan` into `sink`. Refused entries are recorded and
/// the rest of the batch still goes through.
pub fn apply_plan<S: GridSink + ?Sized>(plan: &PlacementPlan, sink: &mut S) -> ApplyReport {
    let mut report = ApplyReport::default();
    for entry in &plan.entries {
        match sink.write(entry) {
            Ok(()) => report.applied += 1,
            Err(e) => {
                log::debug!("Skipped placement: {}", e);
                report.skipped.push(e);
            }
        }
    }
    report
}

/// The primary grid holds one cell per coordinate, so only layer 0 fits
impl GridSink for SparseGrid {
    fn write(&mut self, entry: &PlacementEntry) -> Result<(), PlacementError> {
        if entry.layer > 0 {
            return Err(PlacementError::LayerOutOfRange {
                coord: entry.coord,
                layer: entry.layer,
                max_layers: 1,
            });
        }
        self.set_cell(
            entry.coord,
            Cell {
                tile: entry.tile,
                rotation: entry.rotation,
            },
        );
        Ok(())
    }
}

/// A mesh written into a `LayeredTileStore`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedMesh {
    pub tile: TileId,
    pub rotation: Rotation,
    pub surface: Surface,
}

/// In-memory sink with stacked layers, backed by a mesh library of fixed size
#[derive(Debug, Clone, Default)]
pub struct LayeredTileStore {
    library_size: u32,
    max_layers: u8,
    meshes: BTreeMap<(GridCoord, u8), Vec<PlacedMesh>>,
}

impl LayeredTileStore {
    /// Accepts tile ids below `library_size` on layers below `max_layers`
    pub fn new(library_size: u32, max_layers: u8) -> Self {
        Self {
            library_size,
            max_layers,
            meshes: BTreeMap::new(),
        }
    }

    /// Meshes at `coord` on `layer`
    pub fn get(&self, coord: GridCoord, layer: u8) -> &[PlacedMesh] {
        self.meshes.get(&(coord, layer)).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of meshes stored
    pub fn len(&self) -> usize {
        self.meshes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Number of distinct layers in use
    pub fn layer_count(&self) -> usize {
        let mut layers: Vec<u8> = self.meshes.keys().map(|(_, layer)| *layer).collect();
        layers.sort_unstable();
        layers.dedup();
        layers.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridCoord, u8, &PlacedMesh)> + '_ {
        self.meshes
            .iter()
            .flat_map(|((coord, layer), meshes)| meshes.iter().map(move |m| (*coord, *layer, m)))
    }

    pub fn clear(&mut self) {
        self.meshes.clear();
    }
}

impl GridSink for LayeredTileStore {
    fn write(&mut self, entry: &PlacementEntry) -> Result<(), PlacementError> {
        if entry.tile >= self.library_size {
            return Err(PlacementError::TileOutOfRange {
                coord: entry.coord,
                tile: entry.tile,
                library_size: self.library_size,
            });
        }
        if entry.layer >= self.max_layers {
            return Err(PlacementError::LayerOutOfRange {
                coord: entry.coord,
                layer: entry.layer,
                max_layers: self.max_layers,
            });
        }

        self.meshes.entry((entry.coord, entry.layer)).or_default().push(PlacedMesh {
            tile: entry.tile,
            rotation: entry.rotation,
            surface: entry.surface,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_entry(x: i32, layer: u8, tile: TileId) -> PlacementEntry {
        PlacementEntry {
            coord: GridCoord::new(x, 0, 0),
            layer,
            surface: Surface::for_layer(layer),
            tile,
            rotation: Rotation::Deg90,
            kind: PlacementKind::Floor {
                floor_type: "stone".into(),
                shape: FloorShape::Whole,
            },
        }
    }

    #[test]
    fn test_surface_for_layer() {
        assert_eq!(Surface::for_layer(0), Surface::Primary);
        match Surface::for_layer(2) {
            Surface::Auxiliary { y_offset } => assert!((y_offset - 0.02).abs() < 1e-6),
            other => panic!("unexpected surface {other:?}"),
        }
    }

    #[test]
    fn test_apply_skips_bad_entries_and_continues() {
        let mut plan = PlacementPlan::new();
        plan.push(floor_entry(0, 0, 3));
        plan.push(floor_entry(1, 0, 99));
        plan.push(floor_entry(2, 1, 4));
        plan.push(floor_entry(3, 5, 4));

        let mut store = LayeredTileStore::new(10, 2);
        let report = apply_plan(&plan, &mut store);

        assert_eq!(report.applied, 2);
        assert_eq!(report.skipped.len(), 2);
        assert!(matches!(report.skipped[0], PlacementError::TileOutOfRange { tile: 99, .. }));
        assert!(matches!(report.skipped[1], PlacementError::LayerOutOfRange { layer: 5, .. }));
        assert_eq!(store.len(), 2);
        assert_eq!(store.layer_count(), 2);
        assert_eq!(store.get(GridCoord::new(0, 0, 0), 0)[0].tile, 3);
    }

    #[test]
    fn test_store_keeps_several_meshes_per_layer() {
        let mut store = LayeredTileStore::new(10, 1);
        store.write(&floor_entry(0, 0, 1)).unwrap();
        store.write(&floor_entry(0, 0, 2)).unwrap();
        assert_eq!(store.get(GridCoord::new(0, 0, 0), 0).len(), 2);
    }

    #[test]
    fn test_sparse_grid_sink_is_single_layer() {
        let mut grid = SparseGrid::new();
        assert!(grid.write(&floor_entry(0, 0, 7)).is_ok());
        assert_eq!(grid.get(GridCoord::new(0, 0, 0)).map(|c| c.rotation), Some(Rotation::Deg90));
        assert!(grid.write(&floor_entry(1, 1, 7)).is_err());
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_orientation_code_uses_grid_write_table() {
        assert_eq!(floor_entry(0, 0, 1).orientation_code(), 16);
    }
}

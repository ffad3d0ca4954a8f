//! Dual-grid floor compositing
//!
//! Floors are drawn on a second grid shifted half a cell from the primary
//! one. Each virtual cell `(x, z)` samples the four primary cells
//! `(x, z)`, `(x+1, z)`, `(x, z+1)` and `(x+1, z+1)` (quadrants 0-3:
//! top-left, top-right, bottom-left, bottom-right) and picks a floor piece
//! per floor type from which of those quadrants it covers.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::grid::{GridCoord, GridSource, SparseGrid};
use super::orientation::Rotation;
use super::placement::{PlacementEntry, PlacementKind, PlacementPlan, SkipReason, Surface, LAYER_Y_OFFSET};
use super::tile::{FloorShape, TileId};

/// Set of quadrants of one virtual cell, bit `i` = quadrant `i`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Quadrants(u8);

impl Quadrants {
    pub const TOP_LEFT: u8 = 0;
    pub const TOP_RIGHT: u8 = 1;
    pub const BOTTOM_LEFT: u8 = 2;
    pub const BOTTOM_RIGHT: u8 = 3;

    pub const EMPTY: Quadrants = Quadrants(0);
    pub const ALL: Quadrants = Quadrants(0b1111);

    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 0b1111)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn from_indices(indices: &[u8]) -> Self {
        indices.iter().fold(Self::EMPTY, |q, i| q.with(*i))
    }

    pub fn with(self, quadrant: u8) -> Self {
        Self::from_bits(self.0 | (1 << quadrant))
    }

    pub fn contains(self, quadrant: u8) -> bool {
        quadrant < 4 && self.0 & (1 << quadrant) != 0
    }

    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn indices(self) -> impl Iterator<Item = u8> {
        (0..4u8).filter(move |q| self.contains(*q))
    }

    /// Two diagonal quadrants ({TL, BR} or {TR, BL})
    pub fn is_diagonal_pair(self) -> bool {
        self.0 == 0b1001 || self.0 == 0b0110
    }

    /// Turn clockwise: TL -> TR -> BR -> BL -> TL
    pub fn rotated(self, rotation: Rotation) -> Self {
        (0..rotation.quarter_turns()).fold(self, |q, _| q.rotated_once())
    }

    fn rotated_once(self) -> Self {
        const NEXT: [u8; 4] = [
            Quadrants::TOP_RIGHT,
            Quadrants::BOTTOM_RIGHT,
            Quadrants::TOP_LEFT,
            Quadrants::BOTTOM_LEFT,
        ];
        self.indices().fold(Self::EMPTY, |q, i| q.with(NEXT[usize::from(i)]))
    }
}

/// Quadrants a floor piece covers at rotation 0
pub fn canonical_quadrants(shape: FloorShape) -> Quadrants {
    match shape {
        FloorShape::Quarter => Quadrants::from_bits(0b0001),
        FloorShape::Half => Quadrants::from_bits(0b0011),
        FloorShape::ThreeQuarter => Quadrants::from_bits(0b0111),
        FloorShape::Whole => Quadrants::ALL,
    }
}

/// Quadrants a floor piece covers once rotated
pub fn covered_quadrants(shape: FloorShape, rotation: Rotation) -> Quadrants {
    canonical_quadrants(shape).rotated(rotation)
}

/// One floor piece for one floor type in one virtual cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorPiece {
    pub shape: FloorShape,
    pub rotation: Rotation,
}

/// Floor pieces covering exactly `quadrants`.
///
/// Diagonal pairs become two quarter pieces; every other non-empty set is a
/// single piece. Empty sets produce nothing.
pub fn resolve_pieces(quadrants: Quadrants) -> Vec<FloorPiece> {
    let shape = match quadrants.len() {
        0 => return Vec::new(),
        1 => FloorShape::Quarter,
        2 if quadrants.is_diagonal_pair() => {
            return quadrants
                .indices()
                .filter_map(|q| single_piece(FloorShape::Quarter, Quadrants::EMPTY.with(q)))
                .collect();
        }
        2 => FloorShape::Half,
        3 => FloorShape::ThreeQuarter,
        _ => FloorShape::Whole,
    };

    single_piece(shape, quadrants).into_iter().collect()
}

fn single_piece(shape: FloorShape, quadrants: Quadrants) -> Option<FloorPiece> {
    Rotation::ALL
        .into_iter()
        .find(|r| covered_quadrants(shape, *r) == quadrants)
        .map(|rotation| FloorPiece { shape, rotation })
}

/// Tile ids for the four floor pieces of one floor type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorTileSet {
    pub whole: TileId,
    pub half: TileId,
    pub three_quarter: TileId,
    pub quarter: TileId,
}

impl FloorTileSet {
    pub fn tile_for(&self, shape: FloorShape) -> TileId {
        match shape {
            FloorShape::Whole => self.whole,
            FloorShape::Half => self.half,
            FloorShape::ThreeQuarter => self.three_quarter,
            FloorShape::Quarter => self.quarter,
        }
    }
}

/// Floor types and which primary tile ids belong to them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FloorTypeRegistry {
    #[serde(default)]
    floor_types: BTreeMap<String, FloorTileSet>,
    #[serde(default)]
    tile_types: BTreeMap<TileId, String>,
}

impl FloorTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_floor_type(&mut self, name: impl Into<String>, tiles: FloorTileSet) {
        self.floor_types.insert(name.into(), tiles);
    }

    /// Declare that primary tile `tile` is floor of type `name`.
    /// The type does not have to be registered yet.
    pub fn map_tile_id_to_type(&mut self, tile: TileId, name: impl Into<String>) {
        self.tile_types.insert(tile, name.into());
    }

    pub fn floor_type_of(&self, tile: TileId) -> Option<&str> {
        self.tile_types.get(&tile).map(String::as_str)
    }

    pub fn tiles_for(&self, name: &str) -> Option<&FloorTileSet> {
        self.floor_types.get(name)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.floor_types.contains_key(name)
    }

    pub fn floor_type_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.floor_types.keys().map(String::as_str)
    }

    /// Check if `tile` is floor of a registered type
    pub fn is_registered_floor(&self, tile: TileId) -> bool {
        self.floor_type_of(tile).is_some_and(|name| self.is_registered(name))
    }
}

/// Floor types present in one virtual cell, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuadrantGroup<'a> {
    groups: Vec<(&'a str, Quadrants)>,
}

impl<'a> QuadrantGroup<'a> {
    /// Group four quadrant labels; `None` is an empty quadrant
    pub fn from_labels(labels: [Option<&'a str>; 4]) -> Self {
        let mut group = Self::default();
        for (quadrant, label) in (0u8..).zip(labels) {
            let Some(name) = label else { continue };
            match group.groups.iter_mut().find(|(n, _)| *n == name) {
                Some((_, quadrants)) => *quadrants = quadrants.with(quadrant),
                None => group.groups.push((name, Quadrants::EMPTY.with(quadrant))),
            }
        }
        group
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn get(&self, name: &str) -> Option<Quadrants> {
        self.groups.iter().find(|(n, _)| *n == name).map(|(_, q)| *q)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, Quadrants)> + '_ {
        self.groups.iter().copied()
    }
}

/// Compositor settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositorConfig {
    /// Level of the floor plane in the primary grid
    pub plane_y: i32,
    /// Vertical gap between stacked floor layers
    pub layer_offset: f32,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            plane_y: 0,
            layer_offset: LAYER_Y_OFFSET,
        }
    }
}

/// Turns floor tiles of a primary grid into dual-grid floor placements
#[derive(Debug, Clone, Default)]
pub struct DualGridCompositor {
    registry: FloorTypeRegistry,
    config: CompositorConfig,
}

impl DualGridCompositor {
    pub fn new(registry: FloorTypeRegistry, config: CompositorConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &FloorTypeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// Sample the four quadrants of virtual cell `(x, z)`
    pub fn sample<'s, G: GridSource + ?Sized>(&'s self, grid: &G, x: i32, z: i32) -> QuadrantGroup<'s> {
        let y = self.config.plane_y;
        let label = |dx: i32, dz: i32| {
            grid.get_cell(GridCoord::plane(x + dx, z + dz, y))
                .and_then(|tile| self.registry.floor_type_of(tile))
        };
        QuadrantGroup::from_labels([label(0, 0), label(1, 0), label(0, 1), label(1, 1)])
    }

    /// Build the floor placement plan for the whole occupied extent.
    /// The grid is only read; nothing is written until the plan is applied.
    pub fn composite<G: GridSource + ?Sized>(&self, grid: &G) -> PlacementPlan {
        let mut plan = PlacementPlan::new();
        let Some((min, max)) = grid.occupied_extent() else {
            return plan;
        };

        let mut warned: BTreeSet<&str> = BTreeSet::new();
        for z in min.z..=max.z {
            for x in min.x..=max.x {
                let group = self.sample(grid, x, z);
                if group.is_empty() {
                    continue;
                }
                let coord = GridCoord::plane(x, z, self.config.plane_y);
                self.place_cell(coord, &group, &mut plan, &mut warned);
            }
        }

        log::debug!(
            "Composited floor over ({}, {})..=({}, {}): {} placements, {} skipped",
            min.x,
            min.z,
            max.x,
            max.z,
            plan.len(),
            plan.skipped.len()
        );
        plan
    }

    fn place_cell<'s>(
        &'s self,
        coord: GridCoord,
        group: &QuadrantGroup<'s>,
        plan: &mut PlacementPlan,
        warned: &mut BTreeSet<&'s str>,
    ) {
        let mut layer: u8 = 0;
        for (floor_type, quadrants) in group.iter() {
            let Some(tiles) = self.registry.tiles_for(floor_type) else {
                if warned.insert(floor_type) {
                    log::warn!("Floor type '{}' is mapped but not registered, skipping it", floor_type);
                }
                plan.skip(coord, SkipReason::UnregisteredFloorType(floor_type.to_string()));
                continue;
            };

            let surface = Surface::stacked(layer, self.config.layer_offset);
            for piece in resolve_pieces(quadrants) {
                plan.push(PlacementEntry {
                    coord,
                    layer,
                    surface,
                    tile: tiles.tile_for(piece.shape),
                    rotation: piece.rotation,
                    kind: PlacementKind::Floor {
                        floor_type: floor_type.to_string(),
                        shape: piece.shape,
                    },
                });
            }
            layer = layer.saturating_add(1);
        }
    }

    /// Remove the source floor tiles that compositing replaced. Takes the
    /// grid mutably, so it can only run once `composite` has returned.
    pub fn clear_source_tiles(&self, grid: &mut SparseGrid) -> usize {
        let removed = grid.retain_on_plane(self.config.plane_y, |_, cell| !self.registry.is_registered_floor(cell.tile));
        log::debug!("Cleared {} source floor tiles", removed);
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STONE: TileId = 1;
    const GRASS: TileId = 2;
    const LAVA: TileId = 3;
    const WALL: TileId = 9;

    fn compositor() -> DualGridCompositor {
        let mut registry = FloorTypeRegistry::new();
        registry.register_floor_type("stone", FloorTileSet { whole: 100, half: 101, three_quarter: 102, quarter: 103 });
        registry.register_floor_type("grass", FloorTileSet { whole: 200, half: 201, three_quarter: 202, quarter: 203 });
        registry.map_tile_id_to_type(STONE, "stone");
        registry.map_tile_id_to_type(GRASS, "grass");
        registry.map_tile_id_to_type(LAVA, "lava");
        DualGridCompositor::new(registry, CompositorConfig::default())
    }

    fn at(x: i32, z: i32) -> GridCoord {
        GridCoord::plane(x, z, 0)
    }

    #[test]
    fn test_quadrant_rotation_cycle() {
        let tl = Quadrants::from_indices(&[Quadrants::TOP_LEFT]);
        assert_eq!(tl.rotated(Rotation::Deg90), Quadrants::from_indices(&[Quadrants::TOP_RIGHT]));
        assert_eq!(tl.rotated(Rotation::Deg180), Quadrants::from_indices(&[Quadrants::BOTTOM_RIGHT]));
        assert_eq!(tl.rotated(Rotation::Deg270), Quadrants::from_indices(&[Quadrants::BOTTOM_LEFT]));
    }

    #[test]
    fn test_pieces_cover_exactly_the_input() {
        for bits in 1..16u8 {
            let quadrants = Quadrants::from_bits(bits);
            let pieces = resolve_pieces(quadrants);
            assert!(!pieces.is_empty());

            let mut covered = Quadrants::EMPTY;
            for piece in &pieces {
                let q = covered_quadrants(piece.shape, piece.rotation);
                assert_eq!(covered.bits() & q.bits(), 0, "pieces overlap for {bits:04b}");
                covered = Quadrants::from_bits(covered.bits() | q.bits());
            }
            assert_eq!(covered, quadrants, "round trip failed for {bits:04b}");

            let expected = match quadrants.len() {
                1 => FloorShape::Quarter,
                2 if quadrants.is_diagonal_pair() => FloorShape::Quarter,
                2 => FloorShape::Half,
                3 => FloorShape::ThreeQuarter,
                _ => FloorShape::Whole,
            };
            assert!(pieces.iter().all(|p| p.shape == expected));
        }
    }

    #[test]
    fn test_diagonal_pairs_never_half() {
        for bits in [0b1001u8, 0b0110] {
            let pieces = resolve_pieces(Quadrants::from_bits(bits));
            assert_eq!(pieces.len(), 2);
            assert!(pieces.iter().all(|p| p.shape == FloorShape::Quarter));
        }
        for bits in [0b0011u8, 0b1100, 0b0101, 0b1010] {
            let pieces = resolve_pieces(Quadrants::from_bits(bits));
            assert_eq!(pieces.len(), 1);
            assert_eq!(pieces[0].shape, FloorShape::Half);
        }
    }

    #[test]
    fn test_fixed_rotations() {
        let piece = |indices: &[u8]| resolve_pieces(Quadrants::from_indices(indices))[0];
        assert_eq!(piece(&[1]).rotation, Rotation::Deg90);
        assert_eq!(piece(&[2]).rotation, Rotation::Deg270);
        assert_eq!(piece(&[1, 3]).rotation, Rotation::Deg90);
        assert_eq!(piece(&[0, 2]).rotation, Rotation::Deg270);
        assert_eq!(piece(&[0, 1, 3]).rotation, Rotation::Deg90);
        assert_eq!(piece(&[1, 2, 3]).rotation, Rotation::Deg180);
        assert_eq!(piece(&[0, 2, 3]).rotation, Rotation::Deg270);
        assert_eq!(piece(&[0, 1, 2, 3]).rotation, Rotation::Deg0);
    }

    #[test]
    fn test_composite_square_room() {
        let mut grid = SparseGrid::new();
        grid.fill_rect((0, 0), (1, 1), 0, STONE);

        let plan = compositor().composite(&grid);
        assert_eq!(plan.len(), 4);
        assert!(plan.skipped.is_empty());

        let only = |x, z| {
            let entries: Vec<_> = plan.at(at(x, z)).collect();
            assert_eq!(entries.len(), 1);
            (entries[0].tile, entries[0].rotation)
        };
        assert_eq!(only(0, 0), (100, Rotation::Deg0));
        assert_eq!(only(1, 0), (101, Rotation::Deg270));
        assert_eq!(only(0, 1), (101, Rotation::Deg0));
        assert_eq!(only(1, 1), (103, Rotation::Deg0));
    }

    #[test]
    fn test_each_floor_type_gets_its_own_layer() {
        let mut grid = SparseGrid::new();
        grid.fill_rect((0, 0), (1, 0), 0, STONE);
        grid.fill_rect((0, 1), (1, 1), 0, GRASS);

        let plan = compositor().composite(&grid);
        let cell: Vec<_> = plan.at(at(0, 0)).collect();
        assert_eq!(cell.len(), 2);

        assert_eq!(cell[0].layer, 0);
        assert_eq!(cell[0].surface, Surface::Primary);
        assert_eq!((cell[0].tile, cell[0].rotation), (101, Rotation::Deg0));

        assert_eq!(cell[1].layer, 1);
        assert!(matches!(cell[1].surface, Surface::Auxiliary { y_offset } if (y_offset - 0.01).abs() < 1e-6));
        assert_eq!((cell[1].tile, cell[1].rotation), (201, Rotation::Deg180));
    }

    #[test]
    fn test_three_floor_types_stack_three_layers() {
        const SAND: TileId = 4;
        let mut registry = FloorTypeRegistry::new();
        registry.register_floor_type("stone", FloorTileSet { whole: 100, half: 101, three_quarter: 102, quarter: 103 });
        registry.register_floor_type("grass", FloorTileSet { whole: 200, half: 201, three_quarter: 202, quarter: 203 });
        registry.register_floor_type("sand", FloorTileSet { whole: 300, half: 301, three_quarter: 302, quarter: 303 });
        registry.map_tile_id_to_type(STONE, "stone");
        registry.map_tile_id_to_type(GRASS, "grass");
        registry.map_tile_id_to_type(SAND, "sand");
        let compositor = DualGridCompositor::new(registry, CompositorConfig::default());

        let mut grid = SparseGrid::new();
        grid.set_tile(at(0, 0), STONE);
        grid.set_tile(at(1, 0), GRASS);
        grid.fill_rect((0, 1), (1, 1), 0, SAND);

        let plan = compositor.composite(&grid);
        let cell: Vec<_> = plan.at(at(0, 0)).collect();
        assert_eq!(cell.len(), 3);

        assert_eq!(cell[0].layer, 0);
        assert_eq!(cell[0].surface, Surface::Primary);
        assert_eq!((cell[0].tile, cell[0].rotation), (103, Rotation::Deg0));

        assert_eq!(cell[1].layer, 1);
        assert!(matches!(cell[1].surface, Surface::Auxiliary { y_offset } if (y_offset - 0.01).abs() < 1e-6));
        assert_eq!((cell[1].tile, cell[1].rotation), (203, Rotation::Deg90));

        assert_eq!(cell[2].layer, 2);
        assert!(matches!(cell[2].surface, Surface::Auxiliary { y_offset } if (y_offset - 0.02).abs() < 1e-6));
        assert_eq!((cell[2].tile, cell[2].rotation), (301, Rotation::Deg180));
        assert_eq!(plan.max_layer(), Some(2));
    }

    #[test]
    fn test_diagonal_neighbours_share_a_layer() {
        let mut grid = SparseGrid::new();
        grid.set_tile(at(0, 0), STONE);
        grid.set_tile(at(1, 1), STONE);

        let plan = compositor().composite(&grid);
        let cell: Vec<_> = plan.at(at(0, 0)).collect();
        assert_eq!(cell.len(), 2);
        assert!(cell.iter().all(|e| e.layer == 0 && e.tile == 103));
        assert_eq!(cell[0].rotation, Rotation::Deg0);
        assert_eq!(cell[1].rotation, Rotation::Deg180);
    }

    #[test]
    fn test_unregistered_type_is_skipped_without_taking_a_layer() {
        let mut grid = SparseGrid::new();
        grid.set_tile(at(0, 0), LAVA);
        grid.set_tile(at(1, 0), STONE);

        let plan = compositor().composite(&grid);
        let cell: Vec<_> = plan.at(at(0, 0)).collect();
        assert_eq!(cell.len(), 1);
        assert_eq!(cell[0].layer, 0);
        assert_eq!((cell[0].tile, cell[0].rotation), (103, Rotation::Deg90));
        assert_eq!(
            plan.skipped[0].reason,
            SkipReason::UnregisteredFloorType("lava".to_string())
        );
    }

    #[test]
    fn test_unmapped_tiles_sample_empty() {
        let mut grid = SparseGrid::new();
        grid.fill_rect((0, 0), (1, 1), 0, WALL);
        assert!(compositor().composite(&grid).is_empty());
        assert!(compositor().composite(&SparseGrid::new()).is_empty());
    }

    #[test]
    fn test_clear_source_tiles_after_composite() {
        let mut grid = SparseGrid::new();
        grid.fill_rect((0, 0), (2, 0), 0, STONE);
        grid.set_tile(at(0, 1), WALL);
        grid.set_tile(at(1, 1), LAVA);

        let compositor = compositor();
        let plan = compositor.composite(&grid);
        assert!(!plan.is_empty());

        assert_eq!(compositor.clear_source_tiles(&mut grid), 3);
        assert_eq!(grid.get_cell(at(0, 1)), Some(WALL));
        assert_eq!(grid.get_cell(at(1, 1)), Some(LAVA));
    }
}

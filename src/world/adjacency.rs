//! Wall shape resolution from neighbour occupancy
//!
//! The four cardinal neighbours pick the shape family and rotation from a
//! fixed table. Diagonals only refine junctions (three or four cardinals),
//! where they decide between inner- and outer-corner meshes.

use serde::{Deserialize, Serialize};

use super::grid::GridCoord;
use super::orientation::Rotation;
use super::tile::{CrossVariant, TVariant, TileId, WallShape, WallTileSet};

/// One of the eight neighbour directions. North is -z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
    NorthEast,
    SouthEast,
    SouthWest,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    /// (dx, dz) step to the neighbour
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
            Direction::NorthEast => (1, -1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (-1, 1),
            Direction::NorthWest => (-1, -1),
        }
    }

    /// Cardinals occupy bits 0-3 (N,E,S,W), diagonals bits 4-7 (NE,SE,SW,NW)
    fn bit(self) -> u8 {
        match self {
            Direction::North => 1 << 0,
            Direction::East => 1 << 1,
            Direction::South => 1 << 2,
            Direction::West => 1 << 3,
            Direction::NorthEast => 1 << 4,
            Direction::SouthEast => 1 << 5,
            Direction::SouthWest => 1 << 6,
            Direction::NorthWest => 1 << 7,
        }
    }

    pub fn neighbour_of(self, coord: GridCoord) -> GridCoord {
        let (dx, dz) = self.offset();
        coord.offset(dx, dz)
    }
}

/// Occupancy of a cell's eight neighbours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AdjacencyMap(u8);

impl AdjacencyMap {
    pub const EMPTY: AdjacencyMap = AdjacencyMap(0);

    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// Build a map by asking `occupied` about every direction
    pub fn from_fn<F>(mut occupied: F) -> Self
    where
        F: FnMut(Direction) -> bool,
    {
        Direction::ALL
            .iter()
            .filter(|dir| occupied(**dir))
            .fold(Self::EMPTY, |map, dir| map.with(*dir))
    }

    pub fn with(self, dir: Direction) -> Self {
        Self(self.0 | dir.bit())
    }

    pub fn contains(self, dir: Direction) -> bool {
        self.0 & dir.bit() != 0
    }

    /// Cardinal nibble: bit 0 N, 1 E, 2 S, 3 W
    pub fn cardinals(self) -> u8 {
        self.0 & 0x0F
    }

    /// Diagonal nibble: bit 0 NE, 1 SE, 2 SW, 3 NW
    pub fn diagonals(self) -> u8 {
        self.0 >> 4
    }

    /// The same pattern turned clockwise
    pub fn rotated(self, rotation: Rotation) -> Self {
        let turns = rotation.quarter_turns();
        Self(rotate_nibble(self.cardinals(), turns) | (rotate_nibble(self.diagonals(), turns) << 4))
    }
}

/// Rotate a 4-bit ring clockwise by `turns` positions
fn rotate_nibble(nibble: u8, turns: u8) -> u8 {
    let turns = turns % 4;
    let nibble = nibble & 0x0F;
    ((nibble << turns) | (nibble >> ((4 - turns) % 4))) & 0x0F
}

/// First rotation that turns `canonical` into `pattern`
fn rotation_matching(canonical: u8, pattern: u8) -> Option<Rotation> {
    Rotation::ALL
        .into_iter()
        .find(|r| rotate_nibble(canonical, r.quarter_turns()) == pattern)
}

/// Shape families distinguished by cardinal neighbours alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CardinalShape {
    Isolated,
    EndCap,
    Straight,
    Corner,
    TJunction,
    Cross,
}

/// Indexed by the cardinal nibble (N | E<<1 | S<<2 | W<<3)
const CARDINAL_TABLE: [(CardinalShape, Rotation); 16] = [
    (CardinalShape::Isolated, Rotation::Deg0),    // -
    (CardinalShape::EndCap, Rotation::Deg0),      // N
    (CardinalShape::EndCap, Rotation::Deg90),     // E
    (CardinalShape::Corner, Rotation::Deg0),      // N E
    (CardinalShape::EndCap, Rotation::Deg180),    // S
    (CardinalShape::Straight, Rotation::Deg0),    // N S
    (CardinalShape::Corner, Rotation::Deg90),     // E S
    (CardinalShape::TJunction, Rotation::Deg90),  // N E S
    (CardinalShape::EndCap, Rotation::Deg270),    // W
    (CardinalShape::Corner, Rotation::Deg270),    // N W
    (CardinalShape::Straight, Rotation::Deg90),   // E W
    (CardinalShape::TJunction, Rotation::Deg0),   // N E W
    (CardinalShape::Corner, Rotation::Deg180),    // S W
    (CardinalShape::TJunction, Rotation::Deg270), // N S W
    (CardinalShape::TJunction, Rotation::Deg180), // E S W
    (CardinalShape::Cross, Rotation::Deg0),       // N E S W
];

// Diagonal patterns at rotation 0 (bit 0 NE, 1 SE, 2 SW, 3 NW).
// A T at rotation 0 is open to the south with its stem pointing north.
const T_INNER_LEFT: u8 = 0b1000;
const T_INNER_RIGHT: u8 = 0b0001;
const CROSS_SINGLE: u8 = 0b0001;
const CROSS_DOUBLE: u8 = 0b1001;
const CROSS_DIAGONAL: u8 = 0b0101;
const CROSS_FILLED: u8 = 0b0111;

/// Result of resolving one wall cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileShapeResult {
    pub shape: WallShape,
    pub tile_id: TileId,
    pub rotation: Rotation,
}

/// Maps neighbour occupancy to a wall mesh and rotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallShapeResolver {
    tiles: WallTileSet,
}

impl WallShapeResolver {
    pub fn new(tiles: WallTileSet) -> Self {
        Self { tiles }
    }

    pub fn tiles(&self) -> &WallTileSet {
        &self.tiles
    }

    /// Shape and tile id for a cell. Total over all 256 patterns.
    pub fn resolve(&self, adjacency: AdjacencyMap) -> TileShapeResult {
        let (shape, rotation) = classify(adjacency);
        TileShapeResult {
            shape,
            tile_id: self.tiles.tile_for(shape),
            rotation,
        }
    }
}

/// Shape and rotation for a neighbour pattern, independent of tile ids
pub fn classify(adjacency: AdjacencyMap) -> (WallShape, Rotation) {
    let (family, rotation) = CARDINAL_TABLE[usize::from(adjacency.cardinals())];
    let diagonals = adjacency.diagonals();

    match family {
        CardinalShape::Isolated => (WallShape::Isolated, rotation),
        CardinalShape::EndCap => (WallShape::EndCap, rotation),
        CardinalShape::Straight => (WallShape::Straight, rotation),
        CardinalShape::Corner => (WallShape::Corner, rotation),
        CardinalShape::TJunction => refine_t_junction(rotation, diagonals),
        CardinalShape::Cross => {
            let (variant, rotation) = refine_cross_variant(diagonals);
            (WallShape::Cross(variant), rotation)
        }
    }
}

fn refine_t_junction(rotation: Rotation, diagonals: u8) -> (WallShape, Rotation) {
    let turns = rotation.quarter_turns();
    let left = diagonals & rotate_nibble(T_INNER_LEFT, turns) != 0;
    let right = diagonals & rotate_nibble(T_INNER_RIGHT, turns) != 0;

    match (left, right) {
        (false, false) => (WallShape::TJunction(TVariant::Plain), rotation),
        (true, false) => (WallShape::TJunction(TVariant::InnerLeft), rotation),
        (false, true) => (WallShape::TJunction(TVariant::InnerRight), rotation),
        // Both inner corners filled: a flat face along the through axis.
        // Straight walls are symmetric, so only 0 and 90 are reported.
        (true, true) => {
            let across = Rotation::from_quarter_turns(i32::from(turns + 1) % 2);
            (WallShape::Straight, across)
        }
    }
}

fn refine_cross_variant(diagonals: u8) -> (CrossVariant, Rotation) {
    let matching = |canonical: u8| rotation_matching(canonical, diagonals).unwrap_or(Rotation::Deg0);

    match diagonals.count_ones() {
        0 => (CrossVariant::Plain, Rotation::Deg0),
        1 => (CrossVariant::SingleNotch, matching(CROSS_SINGLE)),
        2 if rotation_matching(CROSS_DIAGONAL, diagonals).is_some() => {
            (CrossVariant::DiagonalNotch, matching(CROSS_DIAGONAL))
        }
        2 => (CrossVariant::DoubleNotch, matching(CROSS_DOUBLE)),
        3 => (CrossVariant::Filled, matching(CROSS_FILLED)),
        _ => (CrossVariant::Filled, Rotation::Deg0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::*;

    fn adj(dirs: &[Direction]) -> AdjacencyMap {
        dirs.iter().fold(AdjacencyMap::EMPTY, |map, dir| map.with(*dir))
    }

    #[test]
    fn test_rotate_nibble() {
        assert_eq!(rotate_nibble(0b0001, 1), 0b0010);
        assert_eq!(rotate_nibble(0b1000, 1), 0b0001);
        assert_eq!(rotate_nibble(0b1001, 2), 0b0110);
        assert_eq!(rotate_nibble(0b0101, 0), 0b0101);
    }

    #[test]
    fn test_total_and_deterministic() {
        let resolver = WallShapeResolver::new(WallTileSet::sequential(1));
        for bits in 0..=255u8 {
            let map = AdjacencyMap::from_bits(bits);
            let first = resolver.resolve(map);
            let second = resolver.resolve(map);
            assert_eq!(first, second, "pattern {bits:#010b}");
            assert!(WallShape::ALL.contains(&first.shape));
            assert_eq!(first.tile_id, resolver.tiles().tile_for(first.shape));
        }
    }

    #[test]
    fn test_cardinal_table() {
        assert_eq!(classify(adj(&[])), (WallShape::Isolated, Rotation::Deg0));
        assert_eq!(classify(adj(&[West])), (WallShape::EndCap, Rotation::Deg270));
        assert_eq!(classify(adj(&[North, South])), (WallShape::Straight, Rotation::Deg0));
        assert_eq!(classify(adj(&[East, West])), (WallShape::Straight, Rotation::Deg90));
        assert_eq!(classify(adj(&[East, South])), (WallShape::Corner, Rotation::Deg90));
        assert_eq!(classify(adj(&[North, West])), (WallShape::Corner, Rotation::Deg270));
        assert_eq!(
            classify(adj(&[North, East, West])),
            (WallShape::TJunction(TVariant::Plain), Rotation::Deg0)
        );
        assert_eq!(
            classify(adj(&[North, East, South, West])),
            (WallShape::Cross(CrossVariant::Plain), Rotation::Deg0)
        );
    }

    #[test]
    fn test_diagonals_ignored_below_three_cardinals() {
        let all_diagonals = [NorthEast, SouthEast, SouthWest, NorthWest];
        for cardinals in [vec![], vec![North], vec![North, South], vec![South, West]] {
            let plain = classify(adj(&cardinals));
            let mut with_diagonals = cardinals.clone();
            with_diagonals.extend_from_slice(&all_diagonals);
            assert_eq!(classify(adj(&with_diagonals)), plain);
        }
    }

    #[test]
    fn test_t_junction_inner_corners() {
        // Open to the south, stem north: NW is left of the stem, NE is right
        assert_eq!(
            classify(adj(&[North, East, West, NorthWest])),
            (WallShape::TJunction(TVariant::InnerLeft), Rotation::Deg0)
        );
        assert_eq!(
            classify(adj(&[North, East, West, NorthEast])),
            (WallShape::TJunction(TVariant::InnerRight), Rotation::Deg0)
        );
        // Outer diagonals on the open side do not matter
        assert_eq!(
            classify(adj(&[North, East, West, SouthEast, SouthWest])),
            (WallShape::TJunction(TVariant::Plain), Rotation::Deg0)
        );
        // Open to the west, stem east: NE is left, SE is right
        assert_eq!(
            classify(adj(&[North, East, South, NorthEast])),
            (WallShape::TJunction(TVariant::InnerLeft), Rotation::Deg90)
        );
    }

    #[test]
    fn test_t_with_both_inner_corners_is_straight_face() {
        assert_eq!(
            classify(adj(&[North, East, West, NorthEast, NorthWest])),
            (WallShape::Straight, Rotation::Deg90)
        );
        assert_eq!(
            classify(adj(&[North, East, South, NorthEast, SouthEast])),
            (WallShape::Straight, Rotation::Deg0)
        );
    }

    #[test]
    fn test_cross_variants() {
        let cross = [North, East, South, West];
        let with = |extra: &[Direction]| {
            let mut dirs = cross.to_vec();
            dirs.extend_from_slice(extra);
            classify(adj(&dirs))
        };

        assert_eq!(with(&[SouthWest]), (WallShape::Cross(CrossVariant::SingleNotch), Rotation::Deg180));
        assert_eq!(with(&[NorthEast, SouthEast]), (WallShape::Cross(CrossVariant::DoubleNotch), Rotation::Deg90));
        assert_eq!(with(&[NorthWest, NorthEast]), (WallShape::Cross(CrossVariant::DoubleNotch), Rotation::Deg0));
        assert_eq!(with(&[SouthEast, NorthWest]), (WallShape::Cross(CrossVariant::DiagonalNotch), Rotation::Deg90));
        assert_eq!(
            with(&[NorthEast, SouthEast, NorthWest]),
            (WallShape::Cross(CrossVariant::Filled), Rotation::Deg270)
        );
        assert_eq!(
            with(&[NorthEast, SouthEast, SouthWest, NorthWest]),
            (WallShape::Cross(CrossVariant::Filled), Rotation::Deg0)
        );
    }

    #[test]
    fn test_rotating_pattern_rotates_result() {
        // Asymmetric shapes follow the pattern around exactly
        for bits in 0..=255u8 {
            let map = AdjacencyMap::from_bits(bits);
            let (shape, rotation) = classify(map);
            if matches!(shape, WallShape::EndCap | WallShape::Corner | WallShape::TJunction(_)) {
                let (turned_shape, turned_rotation) = classify(map.rotated(Rotation::Deg90));
                assert_eq!(turned_shape, shape);
                assert_eq!(turned_rotation, rotation.then(Rotation::Deg90));
            }
        }
    }
}

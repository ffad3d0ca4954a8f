//! Sparse tile grid
//!
//! Only occupied cells are stored; a missing cell means empty.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::orientation::Rotation;
use super::tile::TileId;

/// Integer cell coordinate. `y` is the vertical level, `x`/`z` span the floor plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Coordinate on the floor plane at level `y`
    pub const fn plane(x: i32, z: i32, y: i32) -> Self {
        Self { x, y, z }
    }

    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y,
            z: self.z + dz,
        }
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Read access to a primary grid
pub trait GridSource {
    /// Tile at `coord`, or `None` if the cell is empty
    fn get_cell(&self, coord: GridCoord) -> Option<TileId>;

    /// Inclusive per-axis bounds of every occupied cell
    fn occupied_extent(&self) -> Option<(GridCoord, GridCoord)>;
}

/// A stored cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub tile: TileId,
    pub rotation: Rotation,
}

impl Cell {
    pub fn new(tile: TileId) -> Self {
        Self {
            tile,
            rotation: Rotation::Deg0,
        }
    }
}

/// Sparse grid of tile ids
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseGrid {
    cells: BTreeMap<GridCoord, Cell>,
}

impl SparseGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, coord: GridCoord) -> Option<&Cell> {
        self.cells.get(&coord)
    }

    /// Set tile type at position, keeping rotation 0
    pub fn set_tile(&mut self, coord: GridCoord, tile: TileId) {
        self.cells.insert(coord, Cell::new(tile));
    }

    pub fn set_cell(&mut self, coord: GridCoord, cell: Cell) {
        self.cells.insert(coord, cell);
    }

    pub fn remove(&mut self, coord: GridCoord) -> Option<Cell> {
        self.cells.remove(&coord)
    }

    /// Fill an inclusive x/z rectangle on level `y`
    pub fn fill_rect(&mut self, (x1, z1): (i32, i32), (x2, z2): (i32, i32), y: i32, tile: TileId) {
        for z in z1.min(z2)..=z1.max(z2) {
            for x in x1.min(x2)..=x1.max(x2) {
                self.set_tile(GridCoord::plane(x, z, y), tile);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridCoord, &Cell)> + '_ {
        self.cells.iter().map(|(coord, cell)| (*coord, cell))
    }

    /// Keep only the cells on level `y` that `keep` accepts; returns how many were removed
    pub fn retain_on_plane<F>(&mut self, y: i32, mut keep: F) -> usize
    where
        F: FnMut(GridCoord, &Cell) -> bool,
    {
        let before = self.cells.len();
        self.cells.retain(|coord, cell| coord.y != y || keep(*coord, cell));
        before - self.cells.len()
    }
}

impl GridSource for SparseGrid {
    fn get_cell(&self, coord: GridCoord) -> Option<TileId> {
        self.cells.get(&coord).map(|cell| cell.tile)
    }

    fn occupied_extent(&self) -> Option<(GridCoord, GridCoord)> {
        let mut coords = self.cells.keys();
        let first = *coords.next()?;
        Some(coords.fold((first, first), |(min, max), c| {
            (
                GridCoord::new(min.x.min(c.x), min.y.min(c.y), min.z.min(c.z)),
                GridCoord::new(max.x.max(c.x), max.y.max(c.y), max.z.max(c.z)),
            )
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent() {
        let mut grid = SparseGrid::new();
        assert_eq!(grid.occupied_extent(), None);

        grid.set_tile(GridCoord::new(3, 0, -2), 1);
        grid.set_tile(GridCoord::new(-1, 0, 5), 1);
        grid.set_tile(GridCoord::new(0, 2, 0), 1);

        let (min, max) = grid.occupied_extent().unwrap();
        assert_eq!(min, GridCoord::new(-1, 0, -2));
        assert_eq!(max, GridCoord::new(3, 2, 5));
    }

    #[test]
    fn test_fill_and_retain() {
        let mut grid = SparseGrid::new();
        grid.fill_rect((0, 0), (2, 1), 0, 7);
        grid.set_tile(GridCoord::new(0, 1, 0), 7);
        assert_eq!(grid.len(), 7);

        let removed = grid.retain_on_plane(0, |coord, _| coord.x == 0);
        assert_eq!(removed, 4);
        assert_eq!(grid.get_cell(GridCoord::new(0, 1, 0)), Some(7));
        assert_eq!(grid.get_cell(GridCoord::new(2, 0, 1)), None);
    }
}

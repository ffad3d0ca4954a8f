//! Tile definitions
//!
//! Tile ids plus the wall-shape and floor-piece vocabularies.

use serde::{Deserialize, Serialize};

/// Tile / mesh id as stored in a grid
pub type TileId = u32;

/// Variants of a three-armed wall junction.
///
/// The stem is the arm opposite the open side; the inner diagonals are the
/// two diagonal cells flanking the stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TVariant {
    /// Neither inner diagonal is wall
    Plain,
    /// Only the inner diagonal to the left of the stem is wall
    InnerLeft,
    /// Only the inner diagonal to the right of the stem is wall
    InnerRight,
}

/// Variants of a four-armed wall junction, by how many diagonals are wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrossVariant {
    Plain,
    SingleNotch,
    /// Two neighbouring diagonals
    DoubleNotch,
    /// Two opposite diagonals
    DiagonalNotch,
    /// Three or four diagonals
    Filled,
}

/// Closed vocabulary of wall shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallShape {
    Isolated,
    EndCap,
    Straight,
    Corner,
    TJunction(TVariant),
    Cross(CrossVariant),
}

impl WallShape {
    /// Every shape the resolver can produce
    pub const ALL: [WallShape; 12] = [
        WallShape::Isolated,
        WallShape::EndCap,
        WallShape::Straight,
        WallShape::Corner,
        WallShape::TJunction(TVariant::Plain),
        WallShape::TJunction(TVariant::InnerLeft),
        WallShape::TJunction(TVariant::InnerRight),
        WallShape::Cross(CrossVariant::Plain),
        WallShape::Cross(CrossVariant::SingleNotch),
        WallShape::Cross(CrossVariant::DoubleNotch),
        WallShape::Cross(CrossVariant::DiagonalNotch),
        WallShape::Cross(CrossVariant::Filled),
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WallShape::Isolated => "isolated",
            WallShape::EndCap => "end_cap",
            WallShape::Straight => "straight",
            WallShape::Corner => "corner",
            WallShape::TJunction(TVariant::Plain) => "t_junction",
            WallShape::TJunction(TVariant::InnerLeft) => "t_inner_left",
            WallShape::TJunction(TVariant::InnerRight) => "t_inner_right",
            WallShape::Cross(CrossVariant::Plain) => "cross",
            WallShape::Cross(CrossVariant::SingleNotch) => "cross_single_notch",
            WallShape::Cross(CrossVariant::DoubleNotch) => "cross_double_notch",
            WallShape::Cross(CrossVariant::DiagonalNotch) => "cross_diagonal_notch",
            WallShape::Cross(CrossVariant::Filled) => "cross_filled",
        }
    }
}

/// Dual-grid floor pieces, by how many quadrants of a virtual cell they cover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloorShape {
    Quarter,
    Half,
    ThreeQuarter,
    Whole,
}

impl FloorShape {
    pub fn name(&self) -> &'static str {
        match self {
            FloorShape::Quarter => "quarter",
            FloorShape::Half => "half",
            FloorShape::ThreeQuarter => "three_quarter",
            FloorShape::Whole => "whole",
        }
    }
}

/// Tile ids registered for each wall shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallTileSet {
    pub isolated: TileId,
    pub end_cap: TileId,
    pub straight: TileId,
    pub corner: TileId,
    pub t_junction: TileId,
    pub t_inner_left: TileId,
    pub t_inner_right: TileId,
    pub cross: TileId,
    pub cross_single_notch: TileId,
    pub cross_double_notch: TileId,
    pub cross_diagonal_notch: TileId,
    pub cross_filled: TileId,
}

impl WallTileSet {
    /// Twelve consecutive ids starting at `first`, in `WallShape::ALL` order
    pub fn sequential(first: TileId) -> Self {
        Self {
            isolated: first,
            end_cap: first + 1,
            straight: first + 2,
            corner: first + 3,
            t_junction: first + 4,
            t_inner_left: first + 5,
            t_inner_right: first + 6,
            cross: first + 7,
            cross_single_notch: first + 8,
            cross_double_notch: first + 9,
            cross_diagonal_notch: first + 10,
            cross_filled: first + 11,
        }
    }

    pub fn tile_for(&self, shape: WallShape) -> TileId {
        match shape {
            WallShape::Isolated => self.isolated,
            WallShape::EndCap => self.end_cap,
            WallShape::Straight => self.straight,
            WallShape::Corner => self.corner,
            WallShape::TJunction(TVariant::Plain) => self.t_junction,
            WallShape::TJunction(TVariant::InnerLeft) => self.t_inner_left,
            WallShape::TJunction(TVariant::InnerRight) => self.t_inner_right,
            WallShape::Cross(CrossVariant::Plain) => self.cross,
            WallShape::Cross(CrossVariant::SingleNotch) => self.cross_single_notch,
            WallShape::Cross(CrossVariant::DoubleNotch) => self.cross_double_notch,
            WallShape::Cross(CrossVariant::DiagonalNotch) => self.cross_diagonal_notch,
            WallShape::Cross(CrossVariant::Filled) => self.cross_filled,
        }
    }

    /// Check if `tile` is one of the registered wall-shape ids
    pub fn contains(&self, tile: TileId) -> bool {
        WallShape::ALL.iter().any(|shape| self.tile_for(*shape) == tile)
    }
}

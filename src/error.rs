//! Error types
//!
//! Nothing in the dressing passes is fatal; these errors describe a single
//! unit of work that was skipped or a data file that could not be used.

use std::path::PathBuf;
use thiserror::Error;

use crate::items::ItemId;
use crate::world::{GridCoord, TileId};

/// Failures while loading or exporting RON data files
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("failed to serialize {what}: {message}")]
    Serialize { what: &'static str, message: String },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single placement a grid sink refused to materialize
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("tile id {tile} at {coord} is outside the mesh library (size {library_size})")]
    TileOutOfRange {
        coord: GridCoord,
        tile: TileId,
        library_size: u32,
    },
    #[error("layer {layer} at {coord} exceeds the sink's {max_layers} layers")]
    LayerOutOfRange {
        coord: GridCoord,
        layer: u8,
        max_layers: u8,
    },
}

/// Reasons an inventory refused an item
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InventoryError {
    #[error("adding {quantity}x {item} would weigh {would_weigh:.2}, limit is {max_weight:.2}")]
    TooHeavy {
        item: ItemId,
        quantity: u32,
        would_weigh: f32,
        max_weight: f32,
    },
    #[error("quantity must be at least 1")]
    ZeroQuantity,
}

//! Rotations and backend orientation codes
//!
//! Rotations are clockwise quarter turns seen from above, with north at -z.
//!
//! Rendering backends store a cell's orientation as a small integer code.
//! Two conversions exist and they disagree on which code means 90 and which
//! means 270 degrees: the grid-write path (codes stored with a grid cell) and
//! the mesh-instance path (codes used when a mesh is instanced directly).
//! They are kept as separate tables on purpose; check both against the
//! target backend before relying on either.

use serde::{Deserialize, Serialize};

/// A clockwise quarter-turn rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Rotation::Deg0, Rotation::Deg90, Rotation::Deg180, Rotation::Deg270];

    /// Rotation of `turns` clockwise quarter turns (wraps, accepts negatives)
    pub fn from_quarter_turns(turns: i32) -> Self {
        match turns.rem_euclid(4) {
            0 => Rotation::Deg0,
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            _ => Rotation::Deg270,
        }
    }

    pub fn quarter_turns(self) -> u8 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 1,
            Rotation::Deg180 => 2,
            Rotation::Deg270 => 3,
        }
    }

    pub fn degrees(self) -> u16 {
        u16::from(self.quarter_turns()) * 90
    }

    pub fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    /// Apply `other` after `self`
    pub fn then(self, other: Rotation) -> Rotation {
        Rotation::from_quarter_turns(i32::from(self.quarter_turns()) + i32::from(other.quarter_turns()))
    }
}

/// Degrees for an orientation code stored with a grid cell
pub fn grid_write_degrees(code: u8) -> Option<u16> {
    match code {
        0 => Some(0),
        16 => Some(90),
        10 => Some(180),
        22 => Some(270),
        _ => None,
    }
}

/// Degrees for an orientation code used when instancing a mesh directly
pub fn mesh_instance_degrees(code: u8) -> Option<u16> {
    match code {
        0 => Some(0),
        22 => Some(90),
        10 => Some(180),
        16 => Some(270),
        _ => None,
    }
}

/// Orientation code to store with a grid cell
pub fn grid_write_code(rotation: Rotation) -> u8 {
    match rotation {
        Rotation::Deg0 => 0,
        Rotation::Deg90 => 16,
        Rotation::Deg180 => 10,
        Rotation::Deg270 => 22,
    }
}

/// Orientation code for a directly instanced mesh
pub fn mesh_instance_code(rotation: Rotation) -> u8 {
    match rotation {
        Rotation::Deg0 => 0,
        Rotation::Deg90 => 22,
        Rotation::Deg180 => 10,
        Rotation::Deg270 => 16,
    }
}

//! Procedural level generation
//!
//! Produces the raw primary grid that wall planning and floor compositing
//! dress afterwards.

pub mod rooms;

pub use rooms::{generate_level, Level, LevelParams, LevelPalette};

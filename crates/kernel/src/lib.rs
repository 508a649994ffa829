//! Puzzle kernel: authoritative cube state, layer turns and replay.
//!
//! # Invariants
//! - Every cubie sits on an integer grid point with coordinates in `-1..=1`,
//!   never the center, and no two cubies share a point.
//! - A layer turn moves exactly the cubies of that layer and no others.
//! - Orientations are renormalized after every composition.
//! - All state mutations flow through explicit operations and are logged.

pub mod error;
pub mod moves;
pub mod puzzle;

pub use error::PuzzleError;
pub use moves::parse_moves;
pub use puzzle::{Cubie, Layer, LayerTurn, Puzzle, PuzzleEvent};

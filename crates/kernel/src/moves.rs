//! Face-turn notation: `U D R L F B`, optionally followed by `'` or `2`.
//!
//! `F` is the -Z face and `B` the +Z face. A bare letter turns that face a
//! quarter turn clockwise as seen looking at it from outside the puzzle.

use crate::error::PuzzleError;
use crate::puzzle::{Layer, LayerTurn};
use cubeview_mesh::Face;

impl LayerTurn {
    /// Quarter turns of the outer layer behind `face`, counted clockwise
    /// seen from outside.
    pub fn face_turn(face: Face, clockwise_quarters: i32) -> Self {
        let layer = Layer {
            axis: face.axis(),
            depth: face.sign(),
        };
        // Clockwise from outside is a negative rotation about the outward
        // normal, which is `sign × axis`.
        Self::new(layer, -face.sign() * clockwise_quarters)
    }

    /// Parse a single move token such as `R`, `U'` or `F2`.
    pub fn from_notation(token: &str) -> Result<Self, PuzzleError> {
        let invalid = || PuzzleError::InvalidMove {
            token: token.to_string(),
        };
        let mut chars = token.chars();
        let face = chars.next().and_then(Face::from_letter).ok_or_else(invalid)?;
        let quarters = match chars.as_str() {
            "" => 1,
            "'" => -1,
            "2" => 2,
            _ => return Err(invalid()),
        };
        Ok(Self::face_turn(face, quarters))
    }

    /// Notation for this turn, if it is an outer-layer turn.
    pub fn to_notation(&self) -> Option<String> {
        let face = Face::ALL
            .into_iter()
            .find(|f| f.axis() == self.layer.axis && f.sign() == self.layer.depth)?;
        // Back to clockwise-from-outside quarters.
        let suffix = match (-face.sign() * self.quarter_turns).rem_euclid(4) {
            0 => return None,
            1 => "",
            2 => "2",
            _ => "'",
        };
        Some(format!("{}{suffix}", face.letter()))
    }
}

/// Parse a whitespace-separated move sequence.
pub fn parse_moves(moves: &str) -> Result<Vec<LayerTurn>, PuzzleError> {
    moves.split_whitespace().map(LayerTurn::from_notation).collect()
}

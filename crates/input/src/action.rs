use crate::pick::PickHit;
use cubeview_kernel::{LayerTurn, Puzzle, PuzzleError};
use cubeview_math::Quaternion;

/// A high-level action produced from raw pointer and keyboard input.
///
/// The puzzle consumes actions, never raw input events, so the desktop app,
/// the CLI and tests all drive the same state transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Rotate the whole puzzle by this delta.
    Orbit(Quaternion),
    /// Turn one layer.
    TurnLayer(LayerTurn),
    /// A face was grabbed; nothing changes until the drag turns its layer.
    Pick(PickHit),
    /// Return the puzzle to its initial state.
    Reset,
    /// Input that maps to nothing.
    Noop,
}

impl Action {
    /// Apply this action to the puzzle.
    pub fn apply(&self, puzzle: &mut Puzzle) -> Result<(), PuzzleError> {
        match self {
            Action::Orbit(delta) => puzzle.orbit(*delta)?,
            Action::TurnLayer(turn) => puzzle.turn_layer(*turn)?,
            Action::Reset => puzzle.reset(),
            Action::Pick(_) | Action::Noop => {}
        }
        Ok(())
    }

    /// True if applying this action changes the puzzle.
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Action::Orbit(_) | Action::TurnLayer(_) | Action::Reset
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn orbit_rotates_puzzle() {
        let mut puzzle = Puzzle::new();
        let q = Quaternion::from_axis_angle(Vec3::Y, 45.0).unwrap();
        Action::Orbit(q).apply(&mut puzzle).unwrap();
        assert!(puzzle.orientation().same_rotation(&q, 1e-6));
    }

    #[test]
    fn turn_and_reset() {
        let mut puzzle = Puzzle::new();
        let turn = LayerTurn::from_notation("F").unwrap();
        Action::TurnLayer(turn).apply(&mut puzzle).unwrap();
        assert!(!puzzle.is_home());
        Action::Reset.apply(&mut puzzle).unwrap();
        assert!(puzzle.is_home());
    }

    #[test]
    fn noop_leaves_puzzle_alone() {
        let mut puzzle = Puzzle::new();
        assert!(!Action::Noop.mutates());
        Action::Noop.apply(&mut puzzle).unwrap();
        assert!(puzzle.events().is_empty());
    }
}

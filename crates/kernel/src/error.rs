use cubeview_math::MathError;
use thiserror::Error;

/// Errors raised by puzzle operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PuzzleError {
    /// Layer depth outside `-1..=1`.
    #[error("invalid layer depth {depth} (expected -1, 0 or 1)")]
    InvalidLayer { depth: i32 },

    /// A move token that is not face-turn notation.
    #[error("invalid move `{token}`")]
    InvalidMove { token: String },

    #[error(transparent)]
    Math(#[from] MathError),
}

use thiserror::Error;

/// Result type alias using [`MathError`].
pub type Result<T> = std::result::Result<T, MathError>;

/// Failures of the spatial math routines.
///
/// All of these are recoverable: callers are expected to skip the update that
/// produced them (one frame, one pick) rather than propagate a broken value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// A vector or quaternion was too close to zero to normalize.
    #[error("degenerate input: {what}")]
    Degenerate {
        /// What was being normalized or derived.
        what: &'static str,
    },

    /// Gauss-Jordan elimination found no usable pivot.
    #[error("matrix is singular (no pivot in column {column})")]
    SingularMatrix {
        /// Column in which elimination stopped.
        column: usize,
    },

    /// A parameter outside its valid range.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: f32,
        reason: &'static str,
    },
}

impl MathError {
    pub fn degenerate(what: &'static str) -> Self {
        MathError::Degenerate { what }
    }
}

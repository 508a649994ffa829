//! Checked vector helpers on top of `glam`.
//!
//! `dot`, `cross` and `length` come straight from glam. Cross products are
//! right-handed: `X × Y = Z`.

use crate::error::{MathError, Result};
use glam::{Vec3, Vec4};

/// Lengths below this are treated as zero.
pub const TOLERANCE: f32 = 1e-6;

/// Euclidean length of `v`.
pub fn norm(v: Vec3) -> f32 {
    v.length()
}

/// `v / |v|`, or [`MathError::Degenerate`] when `|v|` is below [`TOLERANCE`].
pub fn normalize(v: Vec3) -> Result<Vec3> {
    let magnitude = v.length();
    if magnitude.is_nan() || magnitude < TOLERANCE {
        return Err(MathError::degenerate("vector too short to normalize"));
    }
    Ok(v / magnitude)
}

/// Four-component version of [`normalize`].
pub fn normalize4(v: Vec4) -> Result<Vec4> {
    let magnitude = v.length();
    if magnitude.is_nan() || magnitude < TOLERANCE {
        return Err(MathError::degenerate("vector too short to normalize"));
    }
    Ok(v / magnitude)
}

/// Component-wise comparison within `eps`.
pub fn approx_eq(a: Vec3, b: Vec3, eps: f32) -> bool {
    (a - b).abs().max_element() <= eps
}

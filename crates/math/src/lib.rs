//! Spatial math: vectors, row-major 4×4 matrices, and rotation quaternions.
//!
//! Vectors are `glam` types. Matrices are stored row-major and act on column
//! vectors (`M · v`), so translations live in the rightmost column.
//!
//! # Invariants
//! - Every operation is pure; nothing here holds state between calls.
//! - Degenerate inputs (near-zero vectors, singular matrices, zero axes)
//!   produce a [`MathError`], never a NaN-bearing result.

pub mod error;
pub mod matrix;
pub mod quaternion;
pub mod vector;

pub use error::{MathError, Result};
pub use glam::{Vec2, Vec3, Vec4};
pub use matrix::Matrix4;
pub use quaternion::Quaternion;

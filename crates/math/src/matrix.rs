use crate::error::{MathError, Result};
use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use std::ops::Mul;

#[inline]
const fn idx(row: usize, col: usize) -> usize {
    row * 4 + col
}

fn swap_rows(m: &mut [f32; 16], a: usize, b: usize) {
    if a != b {
        for col in 0..4 {
            m.swap(idx(a, col), idx(b, col));
        }
    }
}

/// A 4×4 matrix stored row-major, acting on column vectors.
///
/// `a * b` applies `b` first, then `a`. Upload to a GPU through
/// [`Matrix4::to_cols_array_2d`], which produces the column-major layout
/// shaders expect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix4 {
    m: [f32; 16],
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4 {
    #[rustfmt::skip]
    pub const IDENTITY: Self = Self::from_rows([
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ]);

    pub const ZERO: Self = Self::from_rows([0.0; 16]);

    /// Build from 16 values in row-major order.
    pub const fn from_rows(m: [f32; 16]) -> Self {
        Self { m }
    }

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// The 16 values in row-major order.
    pub fn as_rows(&self) -> &[f32; 16] {
        &self.m
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.m[idx(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.m[idx(row, col)] = value;
    }

    pub fn row(&self, row: usize) -> Vec4 {
        Vec4::new(
            self.get(row, 0),
            self.get(row, 1),
            self.get(row, 2),
            self.get(row, 3),
        )
    }

    /// Pure translation by `t`, stored in the rightmost column.
    pub fn translation(t: Vec3) -> Self {
        let mut out = Self::IDENTITY;
        out.set(0, 3, t.x);
        out.set(1, 3, t.y);
        out.set(2, 3, t.z);
        out
    }

    /// Matrix product `self · rhs`. Not commutative.
    pub fn multiply(&self, rhs: &Matrix4) -> Matrix4 {
        let mut out = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                out[idx(row, col)] = (0..4)
                    .map(|i| self.m[idx(row, i)] * rhs.m[idx(i, col)])
                    .sum();
            }
        }
        Self::from_rows(out)
    }

    pub fn transpose(&self) -> Matrix4 {
        let mut out = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                out[idx(col, row)] = self.m[idx(row, col)];
            }
        }
        Self::from_rows(out)
    }

    pub fn transform(&self, v: Vec4) -> Vec4 {
        Vec4::new(
            self.row(0).dot(v),
            self.row(1).dot(v),
            self.row(2).dot(v),
            self.row(3).dot(v),
        )
    }

    /// Transform a point (`w = 1`). Affine matrices leave `w` at one, so no
    /// perspective divide is applied.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.transform(p.extend(1.0)).truncate()
    }

    /// Transform a direction (`w = 0`); translation does not apply.
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        self.transform(v.extend(0.0)).truncate()
    }

    /// Invert in place by Gauss-Jordan elimination with partial pivoting.
    ///
    /// Each column pivots on the row with the largest absolute value. A zero
    /// (or NaN) pivot after the row search fails with
    /// [`MathError::SingularMatrix`], and `self` is left untouched.
    pub fn invert(&mut self) -> Result<()> {
        let mut work = self.m;
        let mut augment = Self::IDENTITY.m;

        for col in 0..4 {
            let mut pivot_row = col;
            for row in col + 1..4 {
                if work[idx(row, col)].abs() > work[idx(pivot_row, col)].abs() {
                    pivot_row = row;
                }
            }
            swap_rows(&mut work, col, pivot_row);
            swap_rows(&mut augment, col, pivot_row);

            let pivot = work[idx(col, col)];
            // Also rejects NaN pivots.
            if !(pivot.abs() > 0.0) {
                return Err(MathError::SingularMatrix { column: col });
            }
            for j in 0..4 {
                work[idx(col, j)] /= pivot;
                augment[idx(col, j)] /= pivot;
            }

            for row in 0..4 {
                if row == col {
                    continue;
                }
                let factor = work[idx(row, col)];
                if factor == 0.0 {
                    continue;
                }
                for j in 0..4 {
                    work[idx(row, j)] -= factor * work[idx(col, j)];
                    augment[idx(row, j)] -= factor * augment[idx(col, j)];
                }
            }
        }

        self.m = augment;
        Ok(())
    }

    /// Inverted copy of `self`. See [`Matrix4::invert`].
    pub fn inverse(&self) -> Result<Matrix4> {
        let mut out = *self;
        out.invert()?;
        Ok(out)
    }

    /// Symmetric-frustum perspective projection, GL clip conventions.
    ///
    /// View-space depth `-near` maps to clip `z/w = -1` and `-far` to `+1`.
    pub fn perspective(fovy_degrees: f32, aspect: f32, near: f32, far: f32) -> Result<Matrix4> {
        if !(fovy_degrees > 0.0 && fovy_degrees < 180.0) {
            return Err(MathError::InvalidParameter {
                name: "fovy",
                value: fovy_degrees,
                reason: "must be in (0, 180) degrees",
            });
        }
        if !(aspect > 0.0) {
            return Err(MathError::InvalidParameter {
                name: "aspect",
                value: aspect,
                reason: "must be positive",
            });
        }
        if !(near > 0.0) {
            return Err(MathError::InvalidParameter {
                name: "near",
                value: near,
                reason: "must be positive",
            });
        }
        if !(far > near) {
            return Err(MathError::InvalidParameter {
                name: "far",
                value: far,
                reason: "must be greater than near",
            });
        }

        let t = near * (fovy_degrees.to_radians() / 2.0).tan();
        let b = -t;
        let r = t * aspect;
        let l = -r;
        let (n, f) = (near, far);

        #[rustfmt::skip]
        let m = [
            2.0 * n / (r - l), 0.0,               (r + l) / (r - l),  0.0,
            0.0,               2.0 * n / (t - b), (t + b) / (t - b),  0.0,
            0.0,               0.0,               -(f + n) / (f - n), -2.0 * f * n / (f - n),
            0.0,               0.0,               -1.0,               0.0,
        ];
        Ok(Self::from_rows(m))
    }

    /// Column-major nested arrays, the layout of a WGSL `mat4x4<f32>`.
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        let t = self.transpose().m;
        [
            [t[0], t[1], t[2], t[3]],
            [t[4], t[5], t[6], t[7]],
            [t[8], t[9], t[10], t[11]],
            [t[12], t[13], t[14], t[15]],
        ]
    }

    /// True if every entry differs from `other`'s by at most `eps`.
    pub fn abs_diff_eq(&self, other: &Matrix4, eps: f32) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        self.multiply(&rhs)
    }
}

impl Mul<Vec4> for Matrix4 {
    type Output = Vec4;

    fn mul(self, rhs: Vec4) -> Vec4 {
        self.transform(rhs)
    }
}

impl From<Matrix4> for Mat4 {
    fn from(m: Matrix4) -> Mat4 {
        Mat4::from_cols_array_2d(&m.to_cols_array_2d())
    }
}

impl From<Mat4> for Matrix4 {
    fn from(m: Mat4) -> Matrix4 {
        // glam is column-major; its column array read as rows is the transpose.
        Matrix4::from_rows(m.to_cols_array()).transpose()
    }
}

use crate::error::{MathError, Result};
use crate::matrix::Matrix4;
use crate::vector;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// A rotation quaternion: vector part `(x, y, z)` and scalar part `s`.
///
/// Constructors produce unit quaternions. Composition accumulates rounding
/// error, so long-lived orientations should be passed through
/// [`Quaternion::normalized`] after each update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub s: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, s: f32) -> Self {
        Self { x, y, z, s }
    }

    /// Rotation of `degrees` about `axis` (right-hand rule).
    ///
    /// `axis` need not be unit length but must not be zero.
    pub fn from_axis_angle(axis: Vec3, degrees: f32) -> Result<Self> {
        let axis = vector::normalize(axis)
            .map_err(|_| MathError::degenerate("rotation axis is zero"))?;
        let half = degrees.to_radians() / 2.0;
        let (sin, cos) = half.sin_cos();
        Ok(Self::new(axis.x * sin, axis.y * sin, axis.z * sin, cos))
    }

    pub fn vector(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Hamilton product `self · inner`: rotate by `inner` first, then `self`.
    pub fn compose(self, inner: Quaternion) -> Quaternion {
        let (a, b) = (self.vector(), inner.vector());
        let v = b * self.s + a * inner.s + a.cross(b);
        Self::new(v.x, v.y, v.z, self.s * inner.s - a.dot(b))
    }

    /// Negated vector part; the inverse rotation for unit quaternions.
    pub fn conjugate(&self) -> Quaternion {
        Self::new(-self.x, -self.y, -self.z, self.s)
    }

    pub fn norm(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.s * self.s).sqrt()
    }

    pub fn normalized(&self) -> Result<Quaternion> {
        let n = self.norm();
        if n.is_nan() || n < vector::TOLERANCE {
            return Err(MathError::degenerate("quaternion too short to normalize"));
        }
        Ok(Self::new(self.x / n, self.y / n, self.z / n, self.s / n))
    }

    /// Rotation matrix of a unit quaternion, embedded in a homogeneous 4×4.
    pub fn to_rotation_matrix(&self) -> Matrix4 {
        let (x2, y2, z2) = (self.x + self.x, self.y + self.y, self.z + self.z);
        let (xx2, xy2, xz2) = (self.x * x2, self.x * y2, self.x * z2);
        let (yy2, yz2, zz2) = (self.y * y2, self.y * z2, self.z * z2);
        let (sx2, sy2, sz2) = (self.s * x2, self.s * y2, self.s * z2);

        #[rustfmt::skip]
        let m = [
            1.0 - (yy2 + zz2), xy2 - sz2,         xz2 + sy2,         0.0,
            xy2 + sz2,         1.0 - (xx2 + zz2), yz2 - sx2,         0.0,
            xz2 - sy2,         yz2 + sx2,         1.0 - (xx2 + yy2), 0.0,
            0.0,               0.0,               0.0,               1.0,
        ];
        Matrix4::from_rows(m)
    }

    /// Rotate `v` by this quaternion.
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        let u = self.vector();
        let t = 2.0 * u.cross(v);
        v + self.s * t + u.cross(t)
    }

    /// True if `self` and `other` describe the same rotation within `eps`
    /// (`q` and `-q` are the same rotation).
    pub fn same_rotation(&self, other: &Quaternion, eps: f32) -> bool {
        let dot = self.x * other.x + self.y * other.y + self.z * other.z + self.s * other.s;
        (dot.abs() - 1.0).abs() <= eps
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: Quaternion) -> Quaternion {
        self.compose(rhs)
    }
}

impl From<Quaternion> for Quat {
    fn from(q: Quaternion) -> Quat {
        Quat::from_xyzw(q.x, q.y, q.z, q.s)
    }
}

impl From<Quat> for Quaternion {
    fn from(q: Quat) -> Quaternion {
        Quaternion::new(q.x, q.y, q.z, q.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::approx_eq;
    use glam::Mat4;

    const EPS: f32 = 1e-5;

    fn axes() -> Vec<Vec3> {
        vec![
            Vec3::X,
            Vec3::Y,
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-0.3, 0.8, 2.0),
        ]
    }

    #[test]
    fn axis_angle_is_unit_length() {
        for axis in axes() {
            for deg in [0.0, 17.0, 90.0, 180.0, 275.0] {
                let q = Quaternion::from_axis_angle(axis, deg).unwrap();
                assert!((q.norm() - 1.0).abs() < EPS);
            }
        }
    }

    #[test]
    fn axis_angle_uses_half_angle() {
        let q = Quaternion::from_axis_angle(Vec3::Z, 90.0).unwrap();
        let h = std::f32::consts::FRAC_1_SQRT_2;
        assert!((q.z - h).abs() < EPS);
        assert!((q.s - h).abs() < EPS);
    }

    #[test]
    fn zero_axis_is_degenerate() {
        assert!(matches!(
            Quaternion::from_axis_angle(Vec3::ZERO, 45.0),
            Err(MathError::Degenerate { .. })
        ));
    }

    #[test]
    fn rotation_axis_is_fixed_point() {
        for axis in axes() {
            let unit = axis.normalize();
            for deg in [10.0, 90.0, 133.0, -60.0] {
                let m = Quaternion::from_axis_angle(axis, deg)
                    .unwrap()
                    .to_rotation_matrix();
                assert!(approx_eq(m.transform_vector(unit), unit, EPS));
            }
        }
    }

    #[test]
    fn quarter_turn_about_z_maps_x_to_y() {
        let q = Quaternion::from_axis_angle(Vec3::Z, 90.0).unwrap();
        let m = q.to_rotation_matrix();
        assert!(approx_eq(m.transform_vector(Vec3::X), Vec3::Y, EPS));
        assert!(approx_eq(q.rotate(Vec3::X), Vec3::Y, EPS));
    }

    #[test]
    fn compose_with_conjugate_is_identity() {
        for axis in axes() {
            let q = Quaternion::from_axis_angle(axis, 71.0).unwrap();
            let id = q.compose(q.conjugate());
            assert!(id.same_rotation(&Quaternion::IDENTITY, EPS));
            assert!(approx_eq(id.vector(), Vec3::ZERO, EPS));
        }
    }

    #[test]
    fn compose_applies_inner_first() {
        let about_x = Quaternion::from_axis_angle(Vec3::X, 90.0).unwrap();
        let about_z = Quaternion::from_axis_angle(Vec3::Z, 90.0).unwrap();
        // X first sends Y to Z; Z then leaves Z alone.
        let q = about_z * about_x;
        assert!(approx_eq(q.rotate(Vec3::Y), Vec3::Z, EPS));
        // The other order sends Y to -X, then X leaves it there.
        let r = about_x * about_z;
        assert!(approx_eq(r.rotate(Vec3::Y), -Vec3::X, EPS));
    }

    #[test]
    fn compose_matches_glam() {
        let a = Quaternion::from_axis_angle(Vec3::new(1.0, 2.0, 3.0), 40.0).unwrap();
        let b = Quaternion::from_axis_angle(Vec3::new(-1.0, 0.5, 0.0), 110.0).unwrap();
        let ours = a * b;
        let theirs = Quaternion::from(Quat::from(a) * Quat::from(b));
        assert!(ours.same_rotation(&theirs, EPS));
    }

    #[test]
    fn rotation_matrix_matches_glam() {
        let q = Quaternion::from_axis_angle(Vec3::new(0.2, -1.0, 0.7), 123.0).unwrap();
        let ours = q.to_rotation_matrix();
        let theirs = Matrix4::from(Mat4::from_quat(Quat::from(q)));
        assert!(ours.abs_diff_eq(&theirs, EPS));
    }

    #[test]
    fn normalized_removes_drift() {
        let step = Quaternion::from_axis_angle(Vec3::new(1.0, 1.0, 1.0), 3.0).unwrap();
        let mut q = Quaternion::IDENTITY;
        for _ in 0..10_000 {
            q = step * q;
        }
        let q = q.normalized().unwrap();
        assert!((q.norm() - 1.0).abs() < 1e-6);
        assert!(Quaternion::new(0.0, 0.0, 0.0, 0.0).normalized().is_err());
    }
}

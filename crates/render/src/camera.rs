use cubeview_math::{Matrix4, Result, Vec3, vector};
use serde::{Deserialize, Serialize};

/// A look-at camera with an explicit orthonormal basis.
///
/// `forward`, `up` and `left` are unit length and mutually perpendicular
/// after every successful [`Camera::look_at`]. A failed `look_at` leaves the
/// whole basis untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Vec3,
    forward: Vec3,
    up: Vec3,
    left: Vec3,
    up_hint: Vec3,
}

impl Default for Camera {
    /// At the origin looking down -Z with +Y up.
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
            left: Vec3::NEG_X,
            up_hint: Vec3::Y,
        }
    }
}

impl Camera {
    /// Place a camera at `position` looking at `target`.
    pub fn new(position: Vec3, target: Vec3, up_hint: Vec3) -> Result<Self> {
        let mut camera = Self {
            position,
            up_hint,
            ..Self::default()
        };
        camera.look_at(target)?;
        Ok(camera)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn left(&self) -> Vec3 {
        self.left
    }

    pub fn right(&self) -> Vec3 {
        -self.left
    }

    pub fn up_hint(&self) -> Vec3 {
        self.up_hint
    }

    /// Move the camera without changing where it points. Call
    /// [`Camera::look_at`] afterwards to re-aim it.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Set the up hint used by the next [`Camera::look_at`].
    pub fn set_up_hint(&mut self, up_hint: Vec3) {
        self.up_hint = up_hint;
    }

    /// Rebuild the basis so the camera faces `target`.
    pub fn look_at(&mut self, target: Vec3) -> Result<()> {
        let forward = vector::normalize(target - self.position)?;
        let left = vector::normalize(self.up_hint.cross(forward))?;
        let up = vector::normalize(forward.cross(left))?;
        self.forward = forward;
        self.left = left;
        self.up = up;
        Ok(())
    }

    /// World-to-eye transform: translate by `-position`, then rotate into the
    /// basis with rows `-left`, `up`, `-forward`.
    pub fn view_matrix(&self) -> Matrix4 {
        let (r, u, b) = (-self.left, self.up, -self.forward);
        #[rustfmt::skip]
        let rotation = Matrix4::from_rows([
            r.x, r.y, r.z, 0.0,
            u.x, u.y, u.z, 0.0,
            b.x, b.y, b.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ]);
        rotation * Matrix4::translation(-self.position)
    }

    /// Perspective projection; see [`Matrix4::perspective`].
    pub fn perspective_matrix(
        &self,
        fovy_degrees: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Result<Matrix4> {
        Matrix4::perspective(fovy_degrees, aspect, near, far)
    }
}

/// Projection parameters; the aspect ratio comes from the viewport each frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub fovy_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fovy_degrees: 60.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Projection {
    pub fn matrix(&self, aspect: f32) -> Result<Matrix4> {
        Matrix4::perspective(self.fovy_degrees, aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubeview_math::MathError;
    use cubeview_math::vector::approx_eq;
    use glam::{Mat4, Vec4};

    const EPS: f32 = 1e-5;

    fn assert_orthonormal(c: &Camera) {
        for v in [c.forward(), c.up(), c.left()] {
            assert!((v.length() - 1.0).abs() < EPS);
        }
        assert!(c.forward().dot(c.up()).abs() < EPS);
        assert!(c.forward().dot(c.left()).abs() < EPS);
        assert!(c.up().dot(c.left()).abs() < EPS);
    }

    #[test]
    fn look_down_negative_z_from_origin() {
        let mut cam = Camera::default();
        cam.look_at(Vec3::new(0.0, 0.0, -1.0)).unwrap();
        assert!(approx_eq(cam.forward(), Vec3::NEG_Z, EPS));
        assert!(approx_eq(cam.left(), Vec3::NEG_X, EPS));
        assert!(approx_eq(cam.up(), Vec3::Y, EPS));
        assert!(cam.view_matrix().abs_diff_eq(&Matrix4::IDENTITY, EPS));

        let before = cam;
        cam.look_at(Vec3::new(0.0, 0.0, -1.0)).unwrap();
        assert_eq!(cam, before);
    }

    #[test]
    fn basis_is_orthonormal() {
        let cam = Camera::new(Vec3::new(5.0, 4.0, 7.0), Vec3::ZERO, Vec3::Y).unwrap();
        assert_orthonormal(&cam);
        assert!(approx_eq(
            cam.forward(),
            (-Vec3::new(5.0, 4.0, 7.0)).normalize(),
            EPS
        ));
    }

    #[test]
    fn view_times_inverse_is_identity() {
        let cam = Camera::new(Vec3::new(-3.0, 2.0, 6.0), Vec3::new(0.5, 0.0, 0.0), Vec3::Y)
            .unwrap();
        let view = cam.view_matrix();
        let product = view * view.inverse().unwrap();
        assert!(product.abs_diff_eq(&Matrix4::IDENTITY, 1e-5));
    }

    #[test]
    fn view_moves_camera_to_origin_and_target_ahead() {
        let target = Vec3::new(1.0, -1.0, 0.0);
        let cam = Camera::new(Vec3::new(4.0, 3.0, 5.0), target, Vec3::Y).unwrap();
        let view = cam.view_matrix();
        assert!(approx_eq(view.transform_point(cam.position()), Vec3::ZERO, EPS));
        let eye = view.transform_point(target);
        assert!(eye.x.abs() < EPS && eye.y.abs() < EPS && eye.z < 0.0);
    }

    #[test]
    fn view_matches_glam_look_at() {
        let (eye, target) = (Vec3::new(5.0, 4.0, 7.0), Vec3::ZERO);
        let cam = Camera::new(eye, target, Vec3::Y).unwrap();
        let theirs = Matrix4::from(Mat4::look_at_rh(eye, target, Vec3::Y));
        assert!(cam.view_matrix().abs_diff_eq(&theirs, 1e-5));
    }

    #[test]
    fn degenerate_look_at_keeps_basis() {
        let mut cam = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y).unwrap();
        let before = cam;
        // Straight up is parallel to the up hint.
        assert!(matches!(
            cam.look_at(Vec3::new(0.0, 10.0, 5.0)),
            Err(MathError::Degenerate { .. })
        ));
        assert_eq!(cam, before);
        // Target on top of the camera.
        assert!(cam.look_at(Vec3::new(0.0, 0.0, 5.0)).is_err());
        assert_eq!(cam, before);
    }

    #[test]
    fn set_position_keeps_orientation() {
        let mut cam = Camera::default();
        cam.set_position(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(cam.forward(), Vec3::NEG_Z);
        assert_eq!(cam.position(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn projection_maps_near_and_far() {
        let proj = Projection::default().matrix(1.0).unwrap();
        let near = proj * Vec4::new(0.0, 0.0, -0.1, 1.0);
        let far = proj * Vec4::new(0.0, 0.0, -100.0, 1.0);
        assert!((near.z / near.w + 1.0).abs() < 1e-4);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn camera_perspective_matches_projection() {
        let cam = Camera::default();
        let a = cam.perspective_matrix(60.0, 4.0 / 3.0, 0.1, 100.0).unwrap();
        let b = Projection::default().matrix(4.0 / 3.0).unwrap();
        assert_eq!(a, b);
        assert!(cam.perspective_matrix(0.0, 1.0, 0.1, 100.0).is_err());
    }
}

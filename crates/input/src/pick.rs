use cubeview_common::Viewport;
use cubeview_kernel::Puzzle;
use cubeview_math::{MathError, Matrix4, Result, Vec3, Vec4, vector};
use cubeview_mesh::{CubeMesh, Face};
use cubeview_render::Camera;
use glam::IVec3;
use serde::Serialize;

/// Smallest determinant treated as a front-facing hit.
const DET_EPSILON: f32 = 1e-7;
/// Slack on barycentric bounds so rays through shared edges still hit.
const BARY_EPSILON: f32 = 1e-5;

/// A half-line in world space. `direction` is unit length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Ray from the camera through pixel `(px, py)`, with `(0, 0)` the top-left
/// corner of the viewport.
pub fn pick_ray(
    camera: &Camera,
    projection: &Matrix4,
    viewport: Viewport,
    px: f32,
    py: f32,
) -> Result<Ray> {
    if viewport.is_empty() {
        return Err(MathError::degenerate("viewport has no area"));
    }
    let x = 2.0 * px / viewport.width as f32 - 1.0;
    let y = 1.0 - 2.0 * py / viewport.height as f32;

    let eye = projection.inverse()? * Vec4::new(x, y, -1.0, 1.0);
    let eye = Vec4::new(eye.x, eye.y, -1.0, 0.0);
    let world = camera.view_matrix().inverse()? * eye;

    Ok(Ray {
        origin: camera.position(),
        direction: vector::normalize(world.truncate())?,
    })
}

/// Möller–Trumbore ray/triangle test with back-face culling.
///
/// Returns the ray parameter of the hit. Only triangles wound
/// counter-clockwise as seen from the ray origin can be hit.
pub fn intersect_triangle(ray: &Ray, [a, b, c]: [Vec3; 3]) -> Option<f32> {
    let e1 = b - a;
    let e2 = c - a;
    let p = ray.direction.cross(e2);
    let det = e1.dot(p);
    if det < DET_EPSILON {
        return None;
    }
    let inv = 1.0 / det;

    let s = ray.origin - a;
    let u = s.dot(p) * inv;
    if !(-BARY_EPSILON..=1.0 + BARY_EPSILON).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = ray.direction.dot(q) * inv;
    if v < -BARY_EPSILON || u + v > 1.0 + BARY_EPSILON {
        return None;
    }

    let t = e2.dot(q) * inv;
    (t > DET_EPSILON).then_some(t)
}

/// The nearest face under a pick ray.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PickHit {
    /// Cubie id in mesh order.
    pub cubie: usize,
    /// Face of the cubie as built in the mesh.
    pub face: Face,
    /// Mesh triangle number.
    pub triangle: usize,
    /// Ray parameter of the hit.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
    /// Outward normal of the hit face in puzzle space, after layer turns.
    pub normal: IVec3,
}

/// Nearest front-facing triangle of the puzzle hit by `ray`.
///
/// Mesh vertices are carried through each cubie's transform and the puzzle
/// model transform, so the test runs against what is actually on screen.
pub fn pick_mesh(ray: &Ray, mesh: &CubeMesh, puzzle: &Puzzle) -> Option<PickHit> {
    let model = puzzle.model_matrix();
    let transforms: Vec<Matrix4> = puzzle
        .cubie_matrices()
        .into_iter()
        .map(|m| model * m)
        .collect();

    let mut best: Option<PickHit> = None;
    for tri in mesh.triangles() {
        let m = transforms.get(tri.cubie)?;
        let world = tri.positions.map(|v| m.transform_point(v));
        let Some(t) = intersect_triangle(ray, world) else {
            continue;
        };
        if best.is_some_and(|b| b.distance <= t) {
            continue;
        }
        let cubie = puzzle.cubie(tri.cubie)?;
        let normal = cubie.orientation.rotate(tri.face.normal()).round().as_ivec3();
        best = Some(PickHit {
            cubie: tri.cubie,
            face: tri.face,
            triangle: tri.index,
            distance: t,
            point: ray.at(t),
            normal,
        });
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubeview_kernel::LayerTurn;
    use cubeview_math::vector::approx_eq;
    use cubeview_render::Projection;

    const EPS: f32 = 1e-4;

    fn front_camera() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y).unwrap()
    }

    fn projection(viewport: Viewport) -> Matrix4 {
        Projection::default().matrix(viewport.aspect()).unwrap()
    }

    #[test]
    fn center_pixel_looks_forward() {
        let cam = front_camera();
        let vp = Viewport::new(800, 600);
        let ray = pick_ray(&cam, &projection(vp), vp, 400.0, 300.0).unwrap();
        assert_eq!(ray.origin, cam.position());
        assert!(approx_eq(ray.direction, Vec3::NEG_Z, EPS));
    }

    #[test]
    fn corner_pixels_follow_screen_axes() {
        let cam = front_camera();
        let vp = Viewport::new(800, 600);
        let proj = projection(vp);
        let top_left = pick_ray(&cam, &proj, vp, 0.0, 0.0).unwrap();
        assert!(top_left.direction.x < 0.0 && top_left.direction.y > 0.0);
        let bottom_right = pick_ray(&cam, &proj, vp, 800.0, 600.0).unwrap();
        assert!(bottom_right.direction.x > 0.0 && bottom_right.direction.y < 0.0);
        // Top edge sits at half the vertical field of view.
        let top = pick_ray(&cam, &proj, vp, 400.0, 0.0).unwrap();
        let angle = top.direction.angle_between(Vec3::NEG_Z).to_degrees();
        assert!((angle - 30.0).abs() < 1e-2);
    }

    #[test]
    fn ray_through_projected_point_hits_it() {
        let cam = Camera::new(Vec3::new(5.0, 4.0, 7.0), Vec3::ZERO, Vec3::Y).unwrap();
        let vp = Viewport::new(1024, 768);
        let proj = projection(vp);
        let target = Vec3::new(1.0, 1.5, 0.5);
        let clip = proj * cam.view_matrix() * target.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        let px = (ndc.x + 1.0) * 0.5 * vp.width as f32;
        let py = (1.0 - ndc.y) * 0.5 * vp.height as f32;
        let ray = pick_ray(&cam, &proj, vp, px, py).unwrap();
        let expected = (target - cam.position()).normalize();
        assert!(approx_eq(ray.direction, expected, EPS));
    }

    #[test]
    fn singular_projection_skips_pick() {
        let vp = Viewport::new(800, 600);
        let err = pick_ray(&front_camera(), &Matrix4::ZERO, vp, 1.0, 1.0);
        assert!(matches!(err, Err(MathError::SingularMatrix { .. })));
        assert!(pick_ray(&front_camera(), &projection(vp), Viewport::new(0, 0), 0.0, 0.0).is_err());
    }

    #[test]
    fn triangle_hit_and_miss() {
        let tri = [
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let toward = Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            direction: Vec3::NEG_Z,
        };
        assert!((intersect_triangle(&toward, tri).unwrap() - 5.0).abs() < EPS);

        let wide = Ray {
            origin: Vec3::new(3.0, 0.0, 5.0),
            direction: Vec3::NEG_Z,
        };
        assert_eq!(intersect_triangle(&wide, tri), None);

        // Same triangle from behind is culled.
        let behind = Ray {
            origin: Vec3::new(0.0, 0.0, -5.0),
            direction: Vec3::Z,
        };
        assert_eq!(intersect_triangle(&behind, tri), None);

        // Pointing away.
        let away = Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            direction: Vec3::Z,
        };
        assert_eq!(intersect_triangle(&away, tri), None);
    }

    #[test]
    fn shared_edge_is_not_a_gap() {
        let tri = [Vec3::ZERO, Vec3::X, Vec3::Y];
        // Exactly through the hypotenuse.
        let ray = Ray {
            origin: Vec3::new(0.5, 0.5, 1.0),
            direction: Vec3::NEG_Z,
        };
        assert!(intersect_triangle(&ray, tri).is_some());
    }

    #[test]
    fn center_ray_hits_front_center_sticker() {
        let mesh = cubeview_mesh::generate_mesh();
        let puzzle = Puzzle::new();
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 10.0),
            direction: Vec3::NEG_Z,
        };
        let hit = pick_mesh(&ray, &mesh, &puzzle).unwrap();
        assert_eq!(mesh.offsets()[hit.cubie], IVec3::new(0, 0, 1));
        assert_eq!(hit.face, Face::Back);
        assert_eq!(hit.normal, IVec3::Z);
        assert!((hit.distance - 8.5).abs() < EPS);
        assert!(approx_eq(hit.point, Vec3::new(0.0, 0.0, 1.5), EPS));
    }

    #[test]
    fn off_center_ray_hits_corner() {
        let mesh = cubeview_mesh::generate_mesh();
        let puzzle = Puzzle::new();
        let ray = Ray {
            origin: Vec3::new(1.2, 1.1, 10.0),
            direction: Vec3::NEG_Z,
        };
        let hit = pick_mesh(&ray, &mesh, &puzzle).unwrap();
        assert_eq!(hit.cubie, 0);
        assert_eq!(hit.face, Face::Back);
    }

    #[test]
    fn ray_past_puzzle_misses() {
        let mesh = cubeview_mesh::generate_mesh();
        let ray = Ray {
            origin: Vec3::new(0.0, 3.0, 10.0),
            direction: Vec3::NEG_Z,
        };
        assert_eq!(pick_mesh(&ray, &mesh, &Puzzle::new()), None);
    }

    #[test]
    fn pick_follows_orbit_and_turns() {
        let mesh = cubeview_mesh::generate_mesh();
        let mut puzzle = Puzzle::new();
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 10.0),
            direction: Vec3::NEG_Z,
        };

        // A middle-slice turn about Y brings the old -X center to the front.
        puzzle
            .turn_layer(LayerTurn::new(
                cubeview_kernel::Layer::new(cubeview_common::Axis::Y, 0).unwrap(),
                1,
            ))
            .unwrap();
        let hit = pick_mesh(&ray, &mesh, &puzzle).unwrap();
        assert_eq!(mesh.offsets()[hit.cubie], IVec3::new(-1, 0, 0));
        assert_eq!(hit.face, Face::Left);
        assert_eq!(hit.normal, IVec3::Z);

        // Orbiting half a turn about Y shows the back of the puzzle.
        let half = cubeview_math::Quaternion::from_axis_angle(Vec3::Y, 180.0).unwrap();
        puzzle.orbit(half).unwrap();
        let hit = pick_mesh(&ray, &mesh, &puzzle).unwrap();
        assert_eq!(mesh.offsets()[hit.cubie], IVec3::new(1, 0, 0));
        assert_eq!(hit.normal, IVec3::NEG_Z);
        assert!((hit.distance - 8.5).abs() < EPS);
    }
}

use crate::face::{Face, FaceColor};
use glam::{IVec3, Vec3};

pub const NUM_CUBIES: usize = 26;
pub const FACES_PER_CUBIE: usize = 6;
pub const VERTICES_PER_FACE: usize = 4;
pub const TRIANGLES_PER_FACE: usize = 2;
pub const VERTICES_PER_CUBIE: usize = FACES_PER_CUBIE * VERTICES_PER_FACE;
pub const INDICES_PER_CUBIE: usize = FACES_PER_CUBIE * TRIANGLES_PER_FACE * 3;
pub const TRIANGLES_PER_CUBIE: usize = FACES_PER_CUBIE * TRIANGLES_PER_FACE;
/// Floats per vertex in the position array.
pub const POSITION_SIZE: usize = 3;
/// Floats per vertex in the tag array: `u, v, color id`.
pub const TAG_SIZE: usize = 3;

/// Unit cube centered on the origin, 4 vertices per face in [`Face::ALL`] order.
#[rustfmt::skip]
const TEMPLATE_VERTICES: [[f32; 3]; VERTICES_PER_CUBIE] = [
    // Up (y + 0.5)
    [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5], [-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5],
    // Down (y - 0.5)
    [ 0.5, -0.5, -0.5], [-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5],
    // Right (x + 0.5)
    [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5, -0.5, -0.5],
    // Left (x - 0.5)
    [-0.5,  0.5, -0.5], [-0.5,  0.5,  0.5], [-0.5, -0.5,  0.5], [-0.5, -0.5, -0.5],
    // Front (z - 0.5)
    [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5], [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5],
    // Back (z + 0.5)
    [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5],
];

/// Two triangles per face, counter-clockwise seen from outside.
#[rustfmt::skip]
const TEMPLATE_INDICES: [u32; INDICES_PER_CUBIE] = [
    0, 1, 2,    2, 3, 0,    // Up
    4, 7, 6,    6, 5, 4,    // Down
    8, 9, 10,   10, 11, 8,  // Right
    12, 15, 14, 14, 13, 12, // Left
    16, 19, 18, 18, 17, 16, // Front
    20, 21, 22, 22, 23, 20, // Back
];

/// Texture coordinates of a face's 4 vertices.
const FACE_UVS: [[f32; 2]; VERTICES_PER_FACE] = [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]];

/// Grid offsets of the 26 cubies in numbering order.
///
/// `y` is the outermost loop, then `z`, then `x`, each running from `1` down
/// to `-1`; the hidden center is skipped. Cubie `k` in this list is cube
/// number `k + 1`.
pub fn cubie_offsets() -> Vec<IVec3> {
    let mut offsets = Vec::with_capacity(NUM_CUBIES);
    for y in (-1..=1).rev() {
        for z in (-1..=1).rev() {
            for x in (-1..=1).rev() {
                if (x, y, z) != (0, 0, 0) {
                    offsets.push(IVec3::new(x, y, z));
                }
            }
        }
    }
    offsets
}

/// Color of `face` on the cubie at `offset`: its puzzle color if the face lies
/// on the puzzle's boundary, otherwise [`FaceColor::Black`].
pub fn face_color(offset: IVec3, face: Face) -> FaceColor {
    if face.axis().component(offset) == face.sign() {
        face.puzzle_color()
    } else {
        FaceColor::Black
    }
}

/// One triangle of the mesh together with where it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshTriangle {
    /// Triangle number, `0..NUM_CUBIES * TRIANGLES_PER_CUBIE`.
    pub index: usize,
    /// Cubie number in [`cubie_offsets`] order.
    pub cubie: usize,
    pub face: Face,
    /// Vertex indices into the position array.
    pub indices: [u32; 3],
    pub positions: [Vec3; 3],
}

/// The static puzzle mesh: three parallel arrays sized for 26 cubies.
///
/// Generated once; the mesh never changes afterwards. Moving cubies is done
/// with per-cubie transforms selected by `vertex / VERTICES_PER_CUBIE`.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeMesh {
    offsets: Vec<IVec3>,
    vertices: Vec<f32>,
    indices: Vec<u32>,
    tags: Vec<f32>,
}

impl CubeMesh {
    /// Build the 26-cubie mesh.
    pub fn generate() -> Self {
        let offsets = cubie_offsets();
        let mut vertices = Vec::with_capacity(NUM_CUBIES * VERTICES_PER_CUBIE * POSITION_SIZE);
        let mut indices = Vec::with_capacity(NUM_CUBIES * INDICES_PER_CUBIE);
        let mut tags = Vec::with_capacity(NUM_CUBIES * VERTICES_PER_CUBIE * TAG_SIZE);

        for (cubie, offset) in offsets.iter().enumerate() {
            let shift = offset.as_vec3();
            for [x, y, z] in TEMPLATE_VERTICES {
                vertices.extend_from_slice(&[x + shift.x, y + shift.y, z + shift.z]);
            }

            let base = (cubie * VERTICES_PER_CUBIE) as u32;
            indices.extend(TEMPLATE_INDICES.iter().map(|i| i + base));

            for face in Face::ALL {
                let color = face_color(*offset, face).id();
                for [u, v] in FACE_UVS {
                    tags.extend_from_slice(&[u, v, color]);
                }
            }
        }

        tracing::debug!(
            cubies = offsets.len(),
            vertices = vertices.len() / POSITION_SIZE,
            triangles = indices.len() / 3,
            "generated puzzle mesh"
        );

        Self {
            offsets,
            vertices,
            indices,
            tags,
        }
    }

    /// Flat `x, y, z` positions, 24 vertices per cubie.
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    /// Triangle list indices into [`CubeMesh::vertices`].
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Flat `u, v, color id` tags parallel to the positions.
    pub fn tags(&self) -> &[f32] {
        &self.tags
    }

    /// Home grid offset of each cubie.
    pub fn offsets(&self) -> &[IVec3] {
        &self.offsets
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / POSITION_SIZE
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn position(&self, vertex: usize) -> Vec3 {
        let i = vertex * POSITION_SIZE;
        Vec3::new(self.vertices[i], self.vertices[i + 1], self.vertices[i + 2])
    }

    /// Color tag of a vertex.
    pub fn color(&self, vertex: usize) -> Option<FaceColor> {
        FaceColor::from_id(self.tags[vertex * TAG_SIZE + 2])
    }

    /// Color of one face of one cubie.
    pub fn face_color(&self, cubie: usize, face: Face) -> Option<FaceColor> {
        self.color(cubie * VERTICES_PER_CUBIE + face.index() * VERTICES_PER_FACE)
    }

    /// The cubie a vertex belongs to.
    pub fn cubie_of_vertex(vertex: u32) -> usize {
        vertex as usize / VERTICES_PER_CUBIE
    }

    pub fn triangle(&self, index: usize) -> Option<MeshTriangle> {
        let idx = self.indices.get(index * 3..index * 3 + 3)?;
        let indices = [idx[0], idx[1], idx[2]];
        let within = index % TRIANGLES_PER_CUBIE;
        Some(MeshTriangle {
            index,
            cubie: index / TRIANGLES_PER_CUBIE,
            face: Face::from_index(within / TRIANGLES_PER_FACE)?,
            indices,
            positions: indices.map(|i| self.position(i as usize)),
        })
    }

    pub fn triangles(&self) -> impl Iterator<Item = MeshTriangle> + '_ {
        (0..self.triangle_count()).filter_map(|i| self.triangle(i))
    }
}

/// Generate the puzzle mesh. Call once at startup.
pub fn generate_mesh() -> CubeMesh {
    CubeMesh::generate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_26_cubies_without_center() {
        let offsets = cubie_offsets();
        assert_eq!(offsets.len(), NUM_CUBIES);
        assert!(!offsets.contains(&IVec3::ZERO));
        for o in &offsets {
            assert!(o.abs().max_element() <= 1);
        }
    }

    #[test]
    fn numbering_follows_y_z_x_descending() {
        let offsets = cubie_offsets();
        assert_eq!(offsets[0], IVec3::new(1, 1, 1));
        assert_eq!(offsets[1], IVec3::new(0, 1, 1));
        assert_eq!(offsets[3], IVec3::new(1, 1, 0));
        // Cube 14 sits right after the skipped center.
        assert_eq!(offsets[13], IVec3::new(-1, 0, 0));
        assert_eq!(offsets[25], IVec3::new(-1, -1, -1));
    }

    #[test]
    fn array_sizes() {
        let mesh = generate_mesh();
        assert_eq!(mesh.vertices().len(), 26 * 6 * 4 * 3);
        assert_eq!(mesh.indices().len(), 26 * 6 * 2 * 3);
        assert_eq!(mesh.tags().len(), 26 * 6 * 4 * 3);
        assert_eq!(mesh.triangle_count(), 26 * 12);
    }

    #[test]
    fn indices_stay_in_range_and_in_their_cubie() {
        let mesh = generate_mesh();
        assert!(mesh.indices().iter().all(|&i| (i as usize) < 26 * 6 * 4));
        for (n, chunk) in mesh.indices().chunks(INDICES_PER_CUBIE).enumerate() {
            for &i in chunk {
                assert_eq!(CubeMesh::cubie_of_vertex(i), n);
            }
        }
    }

    #[test]
    fn triangles_wind_outward() {
        let mesh = generate_mesh();
        for tri in mesh.triangles() {
            let [a, b, c] = tri.positions;
            let normal = (b - a).cross(c - a).normalize();
            assert!(
                normal.dot(tri.face.normal()) > 0.99,
                "triangle {} of cubie {} faces {normal:?}",
                tri.index,
                tri.cubie
            );
            let center = mesh.offsets()[tri.cubie].as_vec3();
            assert!(normal.dot((a + b + c) / 3.0 - center) > 0.0);
        }
    }

    #[test]
    fn face_vertices_lie_on_face_plane() {
        let mesh = generate_mesh();
        for (cubie, offset) in mesh.offsets().iter().enumerate() {
            for face in Face::ALL {
                let plane = offset.as_vec3() + face.normal() * 0.5;
                for k in 0..VERTICES_PER_FACE {
                    let v = mesh.position(cubie * VERTICES_PER_CUBIE + face.index() * 4 + k);
                    let d = (v - plane).dot(face.normal());
                    assert!(d.abs() < 1e-6);
                }
            }
        }
    }

    #[test]
    fn corner_colors_match_table() {
        let mesh = generate_mesh();
        // Cube 1 at (1, 1, 1).
        assert_eq!(mesh.face_color(0, Face::Up), Some(FaceColor::Yellow));
        assert_eq!(mesh.face_color(0, Face::Down), Some(FaceColor::Black));
        assert_eq!(mesh.face_color(0, Face::Right), Some(FaceColor::Red));
        assert_eq!(mesh.face_color(0, Face::Left), Some(FaceColor::Black));
        assert_eq!(mesh.face_color(0, Face::Front), Some(FaceColor::Black));
        assert_eq!(mesh.face_color(0, Face::Back), Some(FaceColor::Blue));
        // Cube 26 at (-1, -1, -1).
        assert_eq!(mesh.face_color(25, Face::Down), Some(FaceColor::White));
        assert_eq!(mesh.face_color(25, Face::Left), Some(FaceColor::Orange));
        assert_eq!(mesh.face_color(25, Face::Front), Some(FaceColor::Green));
        assert_eq!(mesh.face_color(25, Face::Up), Some(FaceColor::Black));
    }

    #[test]
    fn center_cubies_show_one_sticker() {
        let mesh = generate_mesh();
        // Cube 5 is the top center, cube 22 the bottom center.
        for (cubie, face) in [(4, Face::Up), (21, Face::Down)] {
            for other in Face::ALL {
                let expected = if other == face {
                    face.puzzle_color()
                } else {
                    FaceColor::Black
                };
                assert_eq!(mesh.face_color(cubie, other), Some(expected));
            }
        }
    }

    #[test]
    fn fifty_four_stickers() {
        let mesh = generate_mesh();
        let stickers = (0..NUM_CUBIES)
            .flat_map(|c| Face::ALL.map(|f| mesh.face_color(c, f)))
            .filter(|c| *c != Some(FaceColor::Black))
            .count();
        assert_eq!(stickers, 54);
    }

    #[test]
    fn uv_pattern_repeats_per_face() {
        let mesh = generate_mesh();
        let tags = mesh.tags();
        for face in 0..NUM_CUBIES * FACES_PER_CUBIE {
            for (k, [u, v]) in FACE_UVS.iter().enumerate() {
                let t = (face * VERTICES_PER_FACE + k) * TAG_SIZE;
                assert_eq!((tags[t], tags[t + 1]), (*u, *v));
            }
        }
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(generate_mesh(), generate_mesh());
    }
}

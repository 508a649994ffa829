//! Puzzle mesh: 26 unit cubies in a 3×3×3 grid with the center omitted.
//!
//! # Invariants
//! - The mesh is generated once and never mutated.
//! - Cubie `k` owns vertices `24k..24k+24` and indices `36k..36k+36`.
//! - Triangles wind counter-clockwise seen from outside each cubie.

mod cube;
mod face;

pub use cube::{
    CubeMesh, FACES_PER_CUBIE, INDICES_PER_CUBIE, MeshTriangle, NUM_CUBIES, POSITION_SIZE,
    TAG_SIZE, TRIANGLES_PER_CUBIE, TRIANGLES_PER_FACE, VERTICES_PER_CUBIE, VERTICES_PER_FACE,
    cubie_offsets, face_color, generate_mesh,
};
pub use face::{Face, FaceColor};

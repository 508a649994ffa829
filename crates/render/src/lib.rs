//! Rendering adapter: camera model, scene state and uniform upload.
//!
//! # Invariants
//! - Renderers never mutate puzzle truth.
//! - The camera basis is orthonormal; a failed `look_at` keeps the old one.
//! - Frame matrices derive from the scene each frame and are never cached.

mod camera;
mod renderer;
mod scene;
mod uniforms;

pub use camera::{Camera, Projection};
pub use renderer::{DebugTextRenderer, Renderer};
pub use scene::Scene;
pub use uniforms::{FrameMatrices, UniformSink};

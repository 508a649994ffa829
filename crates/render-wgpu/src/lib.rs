//! wgpu render backend for the puzzle.
//!
//! Draws the static 26-cubie mesh in one indexed call. Layer turns and
//! orbiting only change the uniform block.
//!
//! # Invariants
//! - The renderer never mutates puzzle state.
//! - The vertex buffer is written once at startup.
//! - Matrices are uploaded column-major through [`cubeview_render::UniformSink`].

mod gpu;
mod shaders;

pub use gpu::WgpuRenderer;

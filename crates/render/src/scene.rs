use crate::camera::{Camera, Projection};
use crate::uniforms::FrameMatrices;
use cubeview_common::{ViewerConfig, Viewport};
use cubeview_kernel::Puzzle;
use cubeview_math::{Matrix4, Result, Vec3};
use cubeview_mesh::CubeMesh;
use std::sync::Arc;

/// The application state one frame is drawn from.
///
/// Owns the camera and the puzzle; the mesh is generated once and shared
/// read-only with any backend that uploads it.
#[derive(Debug, Clone)]
pub struct Scene {
    pub camera: Camera,
    pub projection: Projection,
    pub viewport: Viewport,
    pub puzzle: Puzzle,
    pub mesh: Arc<CubeMesh>,
}

impl Scene {
    /// Build a scene from config: camera placement, projection and window size.
    pub fn from_config(config: &ViewerConfig) -> Result<Self> {
        let cam = &config.camera;
        let camera = Camera::new(
            Vec3::from(cam.position),
            Vec3::from(cam.target),
            Vec3::from(cam.up_hint),
        )?;
        let projection = Projection {
            fovy_degrees: cam.fovy_degrees,
            near: cam.near,
            far: cam.far,
        };
        // Fail early on parameters the projection would reject every frame.
        projection.matrix(1.0)?;

        Ok(Self {
            camera,
            projection,
            viewport: Viewport::new(config.window.width, config.window.height),
            puzzle: Puzzle::new(),
            mesh: Arc::new(cubeview_mesh::generate_mesh()),
        })
    }

    /// Track a framebuffer resize. Zero-sized viewports are ignored.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport.is_empty() {
            tracing::debug!(?viewport, "ignoring empty viewport");
            return;
        }
        self.viewport = viewport;
    }

    pub fn view_matrix(&self) -> Matrix4 {
        self.camera.view_matrix()
    }

    pub fn projection_matrix(&self) -> Result<Matrix4> {
        self.projection.matrix(self.viewport.aspect())
    }

    /// Matrices for the current frame.
    pub fn frame_matrices(&self) -> Result<FrameMatrices> {
        Ok(FrameMatrices {
            model: self.puzzle.model_matrix(),
            view: self.view_matrix(),
            projection: self.projection_matrix()?,
            cubies: self.puzzle.cubie_matrices(),
        })
    }
}

impl Default for Scene {
    fn default() -> Self {
        let config = ViewerConfig::default();
        let cam = &config.camera;
        Self {
            camera: Camera::new(
                Vec3::from(cam.position),
                Vec3::from(cam.target),
                Vec3::from(cam.up_hint),
            )
            .unwrap_or_default(),
            projection: Projection::default(),
            viewport: Viewport::new(config.window.width, config.window.height),
            puzzle: Puzzle::new(),
            mesh: Arc::new(cubeview_mesh::generate_mesh()),
        }
    }
}

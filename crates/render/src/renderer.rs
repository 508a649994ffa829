use crate::scene::Scene;
use std::fmt::Write;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene and produces output. It never mutates the
/// puzzle; puzzle truth is kernel-owned.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene.
    fn render(&self, scene: &Scene) -> Self::Output;
}

/// Human-readable dump of the scene. Used by the CLI and in tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene) -> String {
        let mut out = String::new();
        let cam = &scene.camera;
        let q = scene.puzzle.orientation();
        let (p, f) = (cam.position(), cam.forward());

        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "=== Puzzle ({}x{}, {} triangles) ===",
            scene.viewport.width,
            scene.viewport.height,
            scene.mesh.triangle_count()
        );
        let _ = writeln!(
            out,
            "Camera: pos=({:.2}, {:.2}, {:.2}) forward=({:.2}, {:.2}, {:.2}) fovy={:.0}",
            p.x, p.y, p.z, f.x, f.y, f.z, scene.projection.fovy_degrees
        );
        let _ = writeln!(
            out,
            "Orientation: ({:.3}, {:.3}, {:.3}; {:.3})",
            q.x, q.y, q.z, q.s
        );
        let displaced = scene.puzzle.cubies().iter().filter(|c| !c.is_home()).count();
        let _ = writeln!(out, "Cubies displaced: {displaced}");

        for c in scene.puzzle.cubies() {
            let _ = writeln!(
                out,
                "  [{:2}] home=({:2}, {:2}, {:2}) pos=({:2}, {:2}, {:2})",
                c.id + 1,
                c.home.x,
                c.home.y,
                c.home.z,
                c.position.x,
                c.position.y,
                c.position.z
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubeview_kernel::LayerTurn;

    #[test]
    fn debug_renderer_fresh_puzzle() {
        let scene = Scene::default();
        let output = DebugTextRenderer::new().render(&scene);
        assert!(output.contains("312 triangles"));
        assert!(output.contains("Cubies displaced: 0"));
        assert!(output.contains("[26] home=(-1, -1, -1)"));
    }

    #[test]
    fn debug_renderer_reports_turns() {
        let mut scene = Scene::default();
        scene
            .puzzle
            .turn_layer(LayerTurn::from_notation("R").unwrap())
            .unwrap();
        let output = DebugTextRenderer::new().render(&scene);
        // The face center keeps its slot but is rotated, so all 9 count.
        assert!(output.contains("Cubies displaced: 9"));
    }
}

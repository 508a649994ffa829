use cubeview_math::Matrix4;
use std::collections::BTreeMap;

/// Anything that accepts named 4×4 matrices for a draw call.
pub trait UniformSink {
    fn set_mat4(&mut self, name: &str, value: &Matrix4);
}

/// Collects uploads by name. Used by headless frontends and tests.
impl UniformSink for BTreeMap<String, Matrix4> {
    fn set_mat4(&mut self, name: &str, value: &Matrix4) {
        self.insert(name.to_string(), *value);
    }
}

/// Everything a frame needs to position the puzzle on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameMatrices {
    pub model: Matrix4,
    pub view: Matrix4,
    pub projection: Matrix4,
    /// Per-cubie transforms in mesh order.
    pub cubies: Vec<Matrix4>,
}

impl FrameMatrices {
    pub const MODEL: &'static str = "model";
    pub const VIEW: &'static str = "view";
    pub const PROJECTION: &'static str = "projection";

    /// Send `model`, `view`, `projection` and `cubies[k]` to `sink`.
    pub fn upload(&self, sink: &mut impl UniformSink) {
        sink.set_mat4(Self::MODEL, &self.model);
        sink.set_mat4(Self::VIEW, &self.view);
        sink.set_mat4(Self::PROJECTION, &self.projection);
        for (k, m) in self.cubies.iter().enumerate() {
            sink.set_mat4(&format!("cubies[{k}]"), m);
        }
    }

    /// `projection · view · model`.
    pub fn model_view_projection(&self) -> Matrix4 {
        self.projection * self.view * self.model
    }
}

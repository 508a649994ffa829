use crate::error::PuzzleError;
use cubeview_common::Axis;
use cubeview_math::{Matrix4, Quaternion, Result as MathResult};
use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

/// One of the 26 visible sub-cubes.
///
/// `home` is where the cubie starts (and where its mesh vertices are built);
/// `position` and `orientation` track where turns have carried it. Since
/// every turn rotates about the puzzle center, `position == orientation·home`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cubie {
    pub id: usize,
    pub home: IVec3,
    pub position: IVec3,
    pub orientation: Quaternion,
}

impl Cubie {
    fn new(id: usize, home: IVec3) -> Self {
        Self {
            id,
            home,
            position: home,
            orientation: Quaternion::IDENTITY,
        }
    }

    /// Model transform of this cubie relative to the puzzle.
    pub fn matrix(&self) -> Matrix4 {
        self.orientation.to_rotation_matrix()
    }

    pub fn is_home(&self) -> bool {
        self.position == self.home && self.orientation.same_rotation(&Quaternion::IDENTITY, 1e-4)
    }
}

/// The cubies sharing `depth` along `axis`: 9 for an outer layer, 8 for a
/// middle slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Layer {
    pub axis: Axis,
    pub depth: i32,
}

impl Layer {
    pub fn new(axis: Axis, depth: i32) -> Result<Self, PuzzleError> {
        if !(-1..=1).contains(&depth) {
            return Err(PuzzleError::InvalidLayer { depth });
        }
        Ok(Self { axis, depth })
    }

    pub fn contains(&self, position: IVec3) -> bool {
        self.axis.component(position) == self.depth
    }
}

/// A rotation of one layer by `quarter_turns × 90°` about the positive
/// direction of the layer's axis (right-hand rule).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerTurn {
    pub layer: Layer,
    pub quarter_turns: i32,
}

impl LayerTurn {
    pub fn new(layer: Layer, quarter_turns: i32) -> Self {
        Self {
            layer,
            quarter_turns,
        }
    }

    /// The turn that undoes this one.
    pub fn inverse(&self) -> Self {
        Self::new(self.layer, -self.quarter_turns)
    }

    /// Turn count reduced to `0..4`.
    pub fn normalized_quarters(&self) -> i32 {
        self.quarter_turns.rem_euclid(4)
    }

    /// The turn as a unit quaternion.
    pub fn rotation(&self) -> MathResult<Quaternion> {
        Quaternion::from_axis_angle(
            self.layer.axis.unit(),
            90.0 * self.normalized_quarters() as f32,
        )
    }
}

/// Rotate a grid point by +90° about `axis`.
fn quarter_turn(v: IVec3, axis: Axis) -> IVec3 {
    match axis {
        Axis::X => IVec3::new(v.x, -v.z, v.y),
        Axis::Y => IVec3::new(v.z, v.y, -v.x),
        Axis::Z => IVec3::new(-v.y, v.x, v.z),
    }
}

/// Rotate a grid point by `quarter_turns × 90°` about `axis`.
pub fn rotate_grid(v: IVec3, axis: Axis, quarter_turns: i32) -> IVec3 {
    (0..quarter_turns.rem_euclid(4)).fold(v, |p, _| quarter_turn(p, axis))
}

/// A record of every mutation, for logging and replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PuzzleEvent {
    /// Whole puzzle rotated by `delta`, applied after the previous orientation.
    Orbited { delta: Quaternion },
    /// One layer turned.
    LayerTurned { turn: LayerTurn },
    /// Orientation and cubies returned to their initial state.
    Reset,
}

/// The authoritative puzzle state.
///
/// Owns the whole-puzzle orientation used for orbiting and the grid state of
/// every cubie. Renderers and input derive from it; nothing else mutates it.
#[derive(Debug, Clone, Serialize)]
pub struct Puzzle {
    position: Vec3,
    orientation: Quaternion,
    cubies: Vec<Cubie>,
    #[serde(skip)]
    event_log: Vec<PuzzleEvent>,
}

impl Default for Puzzle {
    fn default() -> Self {
        Self::new()
    }
}

impl Puzzle {
    /// A solved puzzle at the origin with identity orientation.
    pub fn new() -> Self {
        let cubies = cubeview_mesh::cubie_offsets()
            .into_iter()
            .enumerate()
            .map(|(id, home)| Cubie::new(id, home))
            .collect();
        Self {
            position: Vec3::ZERO,
            orientation: Quaternion::IDENTITY,
            cubies,
            event_log: Vec::new(),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn orientation(&self) -> Quaternion {
        self.orientation
    }

    /// Direct access to the orientation. Writes through this are not logged.
    pub fn orientation_mut(&mut self) -> &mut Quaternion {
        &mut self.orientation
    }

    /// Rotate the whole puzzle by `delta`, applied after the current
    /// orientation, then renormalize.
    pub fn orbit(&mut self, delta: Quaternion) -> MathResult<()> {
        self.orientation = delta.compose(self.orientation).normalized()?;
        self.event_log.push(PuzzleEvent::Orbited { delta });
        Ok(())
    }

    /// Puzzle model transform: translate by position after rotating by the
    /// orientation.
    pub fn model_matrix(&self) -> Matrix4 {
        Matrix4::translation(self.position) * self.orientation.to_rotation_matrix()
    }

    pub fn cubies(&self) -> &[Cubie] {
        &self.cubies
    }

    pub fn cubie(&self, id: usize) -> Option<&Cubie> {
        self.cubies.get(id)
    }

    /// The cubie currently at grid point `position`.
    pub fn cubie_at(&self, position: IVec3) -> Option<&Cubie> {
        self.cubies.iter().find(|c| c.position == position)
    }

    pub fn cubie_matrix(&self, id: usize) -> Option<Matrix4> {
        self.cubie(id).map(Cubie::matrix)
    }

    /// Per-cubie transforms in mesh order.
    pub fn cubie_matrices(&self) -> Vec<Matrix4> {
        self.cubies.iter().map(Cubie::matrix).collect()
    }

    /// Ids of the cubies currently in `layer`.
    pub fn layer_cubies(&self, layer: Layer) -> Vec<usize> {
        self.cubies
            .iter()
            .filter(|c| layer.contains(c.position))
            .map(|c| c.id)
            .collect()
    }

    /// Rotate the cubies of a layer. The turn is instantaneous.
    pub fn turn_layer(&mut self, turn: LayerTurn) -> Result<(), PuzzleError> {
        let layer = Layer::new(turn.layer.axis, turn.layer.depth)?;
        let quarters = turn.normalized_quarters();
        if quarters == 0 {
            return Ok(());
        }
        let rotation = turn.rotation()?;

        let mut turned = Vec::with_capacity(9);
        for cubie in self.cubies.iter().filter(|c| layer.contains(c.position)) {
            let position = rotate_grid(cubie.position, layer.axis, quarters);
            let orientation = rotation.compose(cubie.orientation).normalized()?;
            turned.push((cubie.id, position, orientation));
        }
        for (id, position, orientation) in turned {
            let cubie = &mut self.cubies[id];
            cubie.position = position;
            cubie.orientation = orientation;
        }

        tracing::info!(
            axis = %layer.axis,
            depth = layer.depth,
            quarter_turns = turn.quarter_turns,
            "turned layer"
        );
        self.event_log.push(PuzzleEvent::LayerTurned { turn });
        Ok(())
    }

    /// Apply a sequence of turns, stopping at the first invalid one.
    pub fn apply_turns(&mut self, turns: &[LayerTurn]) -> Result<(), PuzzleError> {
        turns.iter().try_for_each(|t| self.turn_layer(*t))
    }

    /// Put every cubie back home and clear the orientation.
    pub fn reset(&mut self) {
        for cubie in &mut self.cubies {
            cubie.position = cubie.home;
            cubie.orientation = Quaternion::IDENTITY;
        }
        self.orientation = Quaternion::IDENTITY;
        tracing::info!("puzzle reset");
        self.event_log.push(PuzzleEvent::Reset);
    }

    /// True if every cubie is in its home slot with its home orientation.
    pub fn is_home(&self) -> bool {
        self.cubies.iter().all(Cubie::is_home)
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<PuzzleEvent> {
        std::mem::take(&mut self.event_log)
    }

    pub fn events(&self) -> &[PuzzleEvent] {
        &self.event_log
    }

    /// Rebuild a puzzle from a fresh state by applying `events` in order.
    pub fn replay(events: &[PuzzleEvent]) -> Result<Self, PuzzleError> {
        let mut puzzle = Self::new();
        for event in events {
            match event {
                PuzzleEvent::Orbited { delta } => puzzle.orbit(*delta)?,
                PuzzleEvent::LayerTurned { turn } => puzzle.turn_layer(*turn)?,
                PuzzleEvent::Reset => puzzle.reset(),
            }
        }
        Ok(puzzle)
    }
}

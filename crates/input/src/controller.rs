use crate::action::Action;
use crate::pick::{PickHit, pick_mesh, pick_ray};
use cubeview_common::{Axis, ControlsConfig};
use cubeview_kernel::{Layer, LayerTurn, Puzzle};
use cubeview_math::{MathError, Quaternion, Result, Vec2, Vec3, vector};
use cubeview_render::{Camera, Scene};

/// Pointer buttons the controller distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Grabs a face under the cursor, or orbits when nothing is hit.
    Primary,
    /// Always orbits.
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Orbiting,
    Grabbing {
        hit: PickHit,
        travelled: Vec2,
        turned: bool,
    },
}

/// Rotation for a pointer drag of `(dx, dy)` pixels.
///
/// The axis lies in the view plane, perpendicular to the drag, so the puzzle
/// surface facing the camera follows the pointer. A zero drag is rejected.
pub fn orbit_delta(camera: &Camera, dx: f32, dy: f32, sensitivity: f32) -> Result<Quaternion> {
    let length = Vec2::new(dx, dy).length();
    if length.is_nan() || length < vector::TOLERANCE {
        return Err(MathError::degenerate("zero-length drag"));
    }
    let axis = (camera.up() * dx + camera.left() * -dy) / length;
    Quaternion::from_axis_angle(axis, length * sensitivity)
}

/// The layer turn a drag across a grabbed face asks for.
///
/// The drag is carried from screen space into puzzle space; the turn axis is
/// the dominant component of `normal × drag` off the face's own axis, and the
/// layer is the grabbed cubie's slot along that axis.
pub fn turn_from_drag(
    hit: &PickHit,
    drag: Vec2,
    camera: &Camera,
    puzzle: &Puzzle,
) -> Option<LayerTurn> {
    let world = camera.right() * drag.x - camera.up() * drag.y;
    let local = puzzle.orientation().conjugate().rotate(world);
    let normal = hit.normal.as_vec3();

    let mut torque = normal.cross(local);
    let face_axis = Axis::dominant(normal).0;
    torque[face_axis.index()] = 0.0;

    let (axis, component) = Axis::dominant(torque);
    if component.abs() < vector::TOLERANCE {
        return None;
    }
    let cubie = puzzle.cubie(hit.cubie)?;
    let layer = Layer::new(axis, axis.component(cubie.position)).ok()?;
    Some(LayerTurn::new(layer, component.signum() as i32))
}

/// Turns pointer events into [`Action`]s.
///
/// Holds only gesture state; the puzzle and camera are read from the scene
/// passed to each call.
#[derive(Debug, Clone)]
pub struct PointerController {
    sensitivity: f32,
    turn_threshold: f32,
    cursor: Option<Vec2>,
    primary_held: bool,
    secondary_held: bool,
    state: DragState,
}

impl Default for PointerController {
    fn default() -> Self {
        Self::new(&ControlsConfig::default())
    }
}

impl PointerController {
    pub fn new(controls: &ControlsConfig) -> Self {
        Self {
            sensitivity: controls.orbit_sensitivity,
            turn_threshold: controls.turn_threshold,
            cursor: None,
            primary_held: false,
            secondary_held: false,
            state: DragState::Idle,
        }
    }

    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    pub fn is_orbiting(&self) -> bool {
        self.state == DragState::Orbiting
    }

    /// The face currently held, if any.
    pub fn grabbed(&self) -> Option<&PickHit> {
        match &self.state {
            DragState::Grabbing { hit, .. } => Some(hit),
            _ => None,
        }
    }

    /// Press or release of a button. Each button is tracked separately, so a
    /// gesture only ends once no button is held.
    pub fn on_pointer_button(
        &mut self,
        button: PointerButton,
        pressed: bool,
        scene: &Scene,
    ) -> Action {
        match button {
            PointerButton::Primary => self.primary_held = pressed,
            PointerButton::Secondary => self.secondary_held = pressed,
        }
        if !pressed {
            if !self.primary_held && !self.secondary_held {
                self.state = DragState::Idle;
            } else if button == PointerButton::Primary {
                // Secondary is still down.
                self.state = DragState::Orbiting;
            }
            return Action::Noop;
        }
        match button {
            PointerButton::Secondary => {
                self.state = DragState::Orbiting;
                Action::Noop
            }
            PointerButton::Primary => match self.pick(scene) {
                Some(hit) => {
                    tracing::debug!(cubie = hit.cubie, face = ?hit.face, "grabbed face");
                    self.state = DragState::Grabbing {
                        hit,
                        travelled: Vec2::ZERO,
                        turned: false,
                    };
                    Action::Pick(hit)
                }
                None => {
                    self.state = DragState::Orbiting;
                    Action::Noop
                }
            },
        }
    }

    /// Absolute cursor position in pixels. The first event only records the
    /// position.
    pub fn on_cursor_moved(&mut self, x: f32, y: f32, scene: &Scene) -> Action {
        let position = Vec2::new(x, y);
        let previous = self.cursor.replace(position);
        match previous {
            Some(p) => self.on_pointer_move(x - p.x, y - p.y, scene),
            None => Action::Noop,
        }
    }

    /// The cursor left the window. The next position only re-anchors it.
    pub fn on_cursor_left(&mut self) {
        self.cursor = None;
    }

    /// Relative pointer motion in pixels, `+y` down.
    pub fn on_pointer_move(&mut self, dx: f32, dy: f32, scene: &Scene) -> Action {
        match &mut self.state {
            DragState::Idle => Action::Noop,
            DragState::Orbiting => match orbit_delta(&scene.camera, dx, dy, self.sensitivity) {
                Ok(delta) => Action::Orbit(delta),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping orbit update");
                    Action::Noop
                }
            },
            DragState::Grabbing {
                hit,
                travelled,
                turned,
            } => {
                if *turned {
                    return Action::Noop;
                }
                *travelled += Vec2::new(dx, dy);
                if travelled.length() < self.turn_threshold {
                    return Action::Noop;
                }
                match turn_from_drag(hit, *travelled, &scene.camera, &scene.puzzle) {
                    Some(turn) => {
                        *turned = true;
                        Action::TurnLayer(turn)
                    }
                    None => Action::Noop,
                }
            }
        }
    }

    /// Face under the cursor, if any. Singular matrices skip the pick.
    fn pick(&self, scene: &Scene) -> Option<PickHit> {
        let cursor = self.cursor?;
        let ray = scene
            .projection_matrix()
            .and_then(|p| pick_ray(&scene.camera, &p, scene.viewport, cursor.x, cursor.y));
        match ray {
            Ok(ray) => pick_mesh(&ray, &scene.mesh, &scene.puzzle),
            Err(e) => {
                tracing::warn!(error = %e, "pick skipped");
                None
            }
        }
    }
}

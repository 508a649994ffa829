//! Pointer interaction: raw pointer events in, puzzle actions out.
//!
//! # Invariants
//! - Input never mutates the puzzle directly; it produces [`Action`]s.
//! - Degenerate gestures (zero drag, singular matrices) yield `Noop`.
//! - A grab turns at most one layer.

pub mod action;
pub mod controller;
pub mod pick;

pub use action::Action;
pub use controller::{PointerButton, PointerController, orbit_delta, turn_from_drag};
pub use pick::{PickHit, Ray, intersect_triangle, pick_mesh, pick_ray};

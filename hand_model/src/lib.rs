//! # hand_model
//!
//! Data model for a detected hand: 21 normalized landmarks in the
//! MediaPipe ordering, plus the planar geometry primitives everything
//! downstream is built from.
//!
//! Coordinates are normalized to the frame, so `(0.0, 0.0)` is the
//! top-left corner and `(1.0, 1.0)` the bottom-right. A `z` depth is
//! carried through from the detector but no geometry here uses it.

pub mod geometry;
pub mod landmark;

pub use landmark::{HandLandmarks, Landmark};

//! # hand_volume
//!
//! Continuous volume control from hand openness: open your hand wide and
//! the volume rises, close it and the volume falls. Each frame the hand
//! source delivers a mirrored camera image plus (at most) one detected
//! hand; the openness estimate feeds a smoothed volume mapper and the
//! overlay renderer.
//!
//! ## Per-frame pipeline
//!
//! | Step | Component |
//! |---|---|
//! | grab mirrored frame + landmarks | [`source::HandSource`] |
//! | 21 points → openness % | `openness::Strategy` |
//! | smooth + rescale + set level | `volume_map::VolumeMapper` |
//! | bar, readout, palm circle, skeleton | [`overlay`] |
//! | present + poll keys | [`visualizer::Visualizer`] |
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: a keyboard-steered synthetic hand.
//!   No camera, no detector, no hardware needed.
//! * `camera` — **Hardware mode**: OpenCV webcam capture and MediaPipe
//!   hand landmarks via a Python subprocess.
//!
//! ### Simulation keyboard controls
//!
//! | Key | Effect |
//! |---|---|
//! | `O` / hold | Open the hand (volume up) |
//! | `C` / hold | Close the hand (volume down) |
//! | Arrow keys | Move the hand around the frame |
//! | `H` | Toggle hand presence (simulates losing detection) |
//! | `Q` | Quit |

pub mod app;
pub mod endpoint;
pub mod frame;
pub mod overlay;
pub mod source;
pub mod visualizer;

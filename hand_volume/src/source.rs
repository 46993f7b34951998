//! Hand sources — a real camera + detector, or a keyboard simulation.
//!
//! The public interface is [`HandSource`], polled synchronously once per
//! loop iteration. The orchestrator doesn't need to know whether a
//! capture came from real hardware or the simulator.

use anyhow::Result;

use hand_model::landmark::{indices, Landmark, LANDMARK_COUNT};
use hand_model::HandLandmarks;

use crate::frame::Frame;

// ════════════════════════════════════════════════════════════════════════════
// DetectorConfig
// ════════════════════════════════════════════════════════════════════════════

/// Knobs forwarded to the external landmark detector.
#[derive(Clone, Copy, Debug)]
pub struct DetectorConfig {
    /// The system is single-hand by design.
    pub max_hands: usize,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig {
            max_hands: 1,
            min_detection_confidence: 0.7,
            min_tracking_confidence: 0.5,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Capture + HandSource trait
// ════════════════════════════════════════════════════════════════════════════

/// One loop iteration's input: a mirrored frame and at most one hand.
/// Owned by the orchestrator and discarded at the end of the iteration.
pub struct Capture {
    pub frame: Frame,
    pub hand: Option<HandLandmarks>,
}

/// Anything that can deliver one [`Capture`] per frame.
///
/// `Ok(None)` means the source is exhausted (camera disconnected) — the
/// loop ends gracefully rather than retrying.
pub trait HandSource {
    fn grab(&mut self) -> Result<Option<Capture>>;
}

// ════════════════════════════════════════════════════════════════════════════
// SimSource — keyboard-steered synthetic hand (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Steering input for the simulated hand, produced by the visualizer's
/// key polling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimSteer {
    Open,
    Close,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    ToggleHand,
}

/// A parametric 21-point hand: an anchor position plus a single
/// openness parameter in [0, 1] that extends the digits radially.
///
/// Geometry is chosen so the palm-distance estimate sweeps most of the
/// 0–100 range as `open` goes 0 → 1 under the default calibration.
pub struct SimSource {
    width: usize,
    height: usize,
    cx: f32,
    cy: f32,
    open: f32,
    present: bool,
}

/// Digit ray directions, degrees clockwise from straight up.
const DIGIT_ANGLES: [f32; 5] = [-55.0, -20.0, 0.0, 20.0, 42.0];

/// MCP knuckle distance from the palm anchor.
const KNUCKLE_RADIUS: f32 = 0.07;

/// Fingertip reach beyond the knuckle at `open` 0 and 1.
const REACH_CLOSED: f32 = 0.015;
const REACH_OPEN: f32 = 0.21;

impl SimSource {
    pub fn new(width: usize, height: usize) -> Self {
        SimSource {
            width,
            height,
            cx: 0.5,
            cy: 0.45,
            open: 0.5,
            present: true,
        }
    }

    /// Apply one steering input (called per held key, per frame).
    pub fn steer(&mut self, s: SimSteer) {
        const MOVE_STEP: f32 = 0.012;
        const OPEN_STEP: f32 = 0.03;
        match s {
            SimSteer::Open => self.open = (self.open + OPEN_STEP).min(1.0),
            SimSteer::Close => self.open = (self.open - OPEN_STEP).max(0.0),
            SimSteer::MoveLeft => self.cx -= MOVE_STEP,
            SimSteer::MoveRight => self.cx += MOVE_STEP,
            SimSteer::MoveUp => self.cy -= MOVE_STEP,
            SimSteer::MoveDown => self.cy += MOVE_STEP,
            SimSteer::ToggleHand => self.present = !self.present,
        }
        // Keep the whole hand inside the frame.
        self.cx = self.cx.clamp(0.3, 0.7);
        self.cy = self.cy.clamp(0.3, 0.65);
    }

    pub fn openness_param(&self) -> f32 {
        self.open
    }

    /// Build the 21 landmarks for the current pose.
    pub fn landmarks(&self) -> HandLandmarks {
        synthesize_hand(self.cx, self.cy, self.open)
    }

    fn background(&self) -> Frame {
        // Vertical gradient so the window doesn't look dead.
        let mut f = Frame::filled(self.width, self.height, 0xFF1A1A2E);
        for y in 0..self.height {
            let shade = 0x1A + (y * 0x14 / self.height.max(1)) as u32;
            let color = 0xFF000000 | (shade << 16) | (shade << 8) | (shade + 0x10);
            for x in 0..self.width {
                f.set(x, y, color);
            }
        }
        f
    }
}

impl HandSource for SimSource {
    fn grab(&mut self) -> Result<Option<Capture>> {
        let hand = self.present.then(|| self.landmarks());
        Ok(Some(Capture {
            frame: self.background(),
            hand,
        }))
    }
}

/// 21 landmarks for a hand anchored at `(cx, cy)` with digits extended
/// by `open` in [0, 1]. All coordinates are normalized frame space.
pub fn synthesize_hand(cx: f32, cy: f32, open: f32) -> HandLandmarks {
    let open = open.clamp(0.0, 1.0);
    let reach = REACH_CLOSED + open * (REACH_OPEN - REACH_CLOSED);

    let mut pts = [Landmark::default(); LANDMARK_COUNT];
    pts[indices::WRIST] = Landmark::new(cx, cy + 0.13);

    // Per digit: (CMC-ish base joint, MCP, two mid joints, tip).
    let chains: [[usize; 4]; 5] = [
        [indices::THUMB_MCP, indices::THUMB_IP, indices::THUMB_TIP, indices::THUMB_TIP],
        [indices::INDEX_MCP, indices::INDEX_PIP, indices::INDEX_DIP, indices::INDEX_TIP],
        [indices::MIDDLE_MCP, indices::MIDDLE_PIP, indices::MIDDLE_DIP, indices::MIDDLE_TIP],
        [indices::RING_MCP, indices::RING_PIP, indices::RING_DIP, indices::RING_TIP],
        [indices::PINKY_MCP, indices::PINKY_PIP, indices::PINKY_DIP, indices::PINKY_TIP],
    ];

    for (digit, chain) in chains.iter().enumerate() {
        let theta = DIGIT_ANGLES[digit].to_radians();
        let (dx, dy) = (theta.sin(), -theta.cos());

        let kx = cx + dx * KNUCKLE_RADIUS;
        let ky = cy + dy * KNUCKLE_RADIUS;
        pts[chain[0]] = Landmark::new(kx, ky);
        pts[chain[1]] = Landmark::new(kx + dx * reach * 0.45, ky + dy * reach * 0.45);
        pts[chain[2]] = Landmark::new(kx + dx * reach * 0.75, ky + dy * reach * 0.75);
        pts[chain[3]] = Landmark::new(kx + dx * reach, ky + dy * reach);
    }

    // Thumb base sits between wrist and thumb knuckle.
    let tt = DIGIT_ANGLES[0].to_radians();
    pts[indices::THUMB_CMC] = Landmark::new(
        cx + tt.sin() * KNUCKLE_RADIUS * 0.5,
        cy + 0.06 - tt.cos() * KNUCKLE_RADIUS * 0.2,
    );

    HandLandmarks::new(pts)
}

// ════════════════════════════════════════════════════════════════════════════
// CameraSource — real webcam + MediaPipe subprocess (feature = "camera")
// ════════════════════════════════════════════════════════════════════════════

/// Webcam capture via OpenCV plus hand landmarks from a MediaPipe
/// detector running in a Python subprocess.
///
/// # Protocol
///
/// Per frame, the parent writes a 12-byte little-endian header
/// (width, height, channels) followed by raw BGR bytes; the child
/// answers with one JSON line:
///
/// ```json
/// {"hands": [{"handedness": "Right", "score": 0.93, "landmarks": [{"x":..,"y":..,"z":..}, ...]}]}
/// ```
///
/// Requires `hand_detect.py` next to the working directory and a Python
/// environment with `mediapipe` installed (`.venv/bin/python`).
#[cfg(feature = "camera")]
pub struct CameraSource {
    cap: opencv::videoio::VideoCapture,
    child: std::process::Child,
    stdout: std::io::BufReader<std::process::ChildStdout>,
    config: DetectorConfig,
}

#[cfg(feature = "camera")]
mod wire {
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct LandmarkJson {
        pub x: f32,
        pub y: f32,
        pub z: f32,
    }

    #[derive(Deserialize, Debug)]
    pub struct HandJson {
        #[allow(dead_code)]
        pub handedness: String,
        pub score: f32,
        pub landmarks: Vec<LandmarkJson>,
    }

    #[derive(Deserialize, Debug)]
    pub struct DetectionResult {
        pub hands: Vec<HandJson>,
        #[serde(default)]
        pub error: Option<String>,
    }
}

#[cfg(feature = "camera")]
impl CameraSource {
    pub fn new(width: usize, height: usize, config: DetectorConfig) -> Result<Self> {
        use anyhow::Context;
        use opencv::prelude::*;
        use opencv::videoio;
        use std::io::BufRead;
        use std::process::{Command, Stdio};

        let mut cap = videoio::VideoCapture::new(0, videoio::CAP_ANY)
            .context("Failed to create camera capture")?;
        if !cap.is_opened().unwrap_or(false) {
            anyhow::bail!("Could not open camera device 0");
        }
        let _ = cap.set(videoio::CAP_PROP_FRAME_WIDTH, width as f64);
        let _ = cap.set(videoio::CAP_PROP_FRAME_HEIGHT, height as f64);
        log::info!("Camera opened at {}x{} (requested)", width, height);

        let script = std::env::current_dir()?.join("hand_detect.py");
        let python = std::env::current_dir()?.join(".venv/bin/python");
        if !script.exists() {
            anyhow::bail!("Hand detection script not found at {:?}", script);
        }

        let mut child = Command::new(&python)
            .arg(&script)
            .arg(format!("--max-hands={}", config.max_hands))
            .arg(format!(
                "--min-detection-confidence={}",
                config.min_detection_confidence
            ))
            .arg(format!(
                "--min-tracking-confidence={}",
                config.min_tracking_confidence
            ))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .context("Failed to start MediaPipe subprocess")?;

        let stdout = child.stdout.take().context("Detector stdout unavailable")?;
        let mut stdout = std::io::BufReader::new(stdout);

        let mut ready = String::new();
        stdout.read_line(&mut ready)?;
        if ready.trim() != "READY" {
            anyhow::bail!("Detector did not signal ready, got: {}", ready);
        }
        log::info!("MediaPipe hand detector ready");

        Ok(CameraSource {
            cap,
            child,
            stdout,
            config,
        })
    }

    fn detect(&mut self, mat: &opencv::core::Mat) -> Result<Option<HandLandmarks>> {
        use anyhow::Context;
        use opencv::prelude::*;
        use std::io::{BufRead, Write};

        let width = mat.cols() as u32;
        let height = mat.rows() as u32;
        let channels = mat.channels() as u32;
        let data = mat.data_bytes()?;

        let stdin = self.child.stdin.as_mut().context("Detector stdin closed")?;
        stdin.write_all(&width.to_le_bytes())?;
        stdin.write_all(&height.to_le_bytes())?;
        stdin.write_all(&channels.to_le_bytes())?;
        stdin.write_all(data)?;
        stdin.flush()?;

        let mut line = String::new();
        self.stdout.read_line(&mut line)?;
        let result: wire::DetectionResult =
            serde_json::from_str(&line).context("Malformed detector response")?;

        if let Some(err) = result.error {
            log::warn!("Detector error: {}", err);
            return Ok(None);
        }

        // First hand at or above the detection threshold wins.
        for hand in result.hands {
            if hand.score < self.config.min_detection_confidence {
                continue;
            }
            let pts: Vec<Landmark> = hand
                .landmarks
                .iter()
                .map(|l| Landmark { x: l.x, y: l.y, z: l.z })
                .collect();
            match HandLandmarks::from_points(&pts) {
                Some(h) => return Ok(Some(h)),
                None => {
                    log::warn!("Expected {} landmarks, got {}", LANDMARK_COUNT, pts.len());
                }
            }
        }
        Ok(None)
    }
}

#[cfg(feature = "camera")]
impl HandSource for CameraSource {
    fn grab(&mut self) -> Result<Option<Capture>> {
        use opencv::core::Mat;
        use opencv::prelude::*;

        let mut raw = Mat::default();
        let ok = self.cap.read(&mut raw)?;
        if !ok || raw.empty() {
            // Camera disconnect is terminal, not retried.
            return Ok(None);
        }

        // Mirror before detection so landmark coordinates match the
        // displayed image.
        let mut mirrored = Mat::default();
        opencv::core::flip(&raw, &mut mirrored, 1)?;

        let hand = self.detect(&mirrored)?;

        let w = mirrored.cols() as usize;
        let h = mirrored.rows() as usize;
        let bytes = mirrored.data_bytes()?;
        let mut px = Vec::with_capacity(w * h);
        for chunk in bytes.chunks_exact(3) {
            let (b, g, r) = (chunk[0] as u32, chunk[1] as u32, chunk[2] as u32);
            px.push(0xFF000000 | (r << 16) | (g << 8) | b);
        }
        let frame = Frame::from_pixels(w, h, px)
            .ok_or_else(|| anyhow::anyhow!("Camera produced a non-3-channel frame"))?;

        Ok(Some(Capture { frame, hand }))
    }
}

#[cfg(feature = "camera")]
impl Drop for CameraSource {
    fn drop(&mut self) {
        let _ = self.child.kill();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use openness::{Calibration, Strategy};

    #[test]
    fn detector_defaults_match_contract() {
        let d = DetectorConfig::default();
        assert_eq!(d.max_hands, 1);
        assert!((d.min_detection_confidence - 0.7).abs() < 1e-6);
        assert!((d.min_tracking_confidence - 0.5).abs() < 1e-6);
    }

    #[test]
    fn synthetic_hand_is_normalized_when_centered() {
        for &open in &[0.0f32, 0.5, 1.0] {
            let hand = synthesize_hand(0.5, 0.45, open);
            for p in hand.points() {
                assert!((0.0..=1.0).contains(&p.x), "x {} out of frame", p.x);
                assert!((0.0..=1.0).contains(&p.y), "y {} out of frame", p.y);
            }
        }
    }

    #[test]
    fn synthetic_openness_tracks_parameter() {
        let cal = Calibration::default();
        let closed = Strategy::PalmDistance.estimate(&synthesize_hand(0.5, 0.45, 0.0), &cal);
        let half = Strategy::PalmDistance.estimate(&synthesize_hand(0.5, 0.45, 0.5), &cal);
        let open = Strategy::PalmDistance.estimate(&synthesize_hand(0.5, 0.45, 1.0), &cal);
        assert!(closed < half && half < open, "{} {} {}", closed, half, open);
        assert!(closed < 35, "closed fist estimated at {}", closed);
        assert!(open > 75, "open hand estimated at {}", open);
    }

    #[test]
    fn sim_source_grab_always_yields_a_capture() {
        let mut src = SimSource::new(64, 48);
        let cap = src.grab().unwrap().expect("sim source never ends");
        assert_eq!(cap.frame.width(), 64);
        assert!(cap.hand.is_some());
    }

    #[test]
    fn sim_toggle_hides_the_hand() {
        let mut src = SimSource::new(64, 48);
        src.steer(SimSteer::ToggleHand);
        let cap = src.grab().unwrap().unwrap();
        assert!(cap.hand.is_none());
        src.steer(SimSteer::ToggleHand);
        assert!(src.grab().unwrap().unwrap().hand.is_some());
    }

    #[test]
    fn sim_open_close_clamps_to_unit_range() {
        let mut src = SimSource::new(64, 48);
        for _ in 0..100 {
            src.steer(SimSteer::Open);
        }
        assert_eq!(src.openness_param(), 1.0);
        for _ in 0..100 {
            src.steer(SimSteer::Close);
        }
        assert_eq!(src.openness_param(), 0.0);
    }

    #[test]
    fn sim_movement_stays_in_bounds() {
        let mut src = SimSource::new(64, 48);
        for _ in 0..200 {
            src.steer(SimSteer::MoveLeft);
            src.steer(SimSteer::MoveUp);
        }
        let hand = src.landmarks();
        for p in hand.points() {
            assert!((0.0..=1.0).contains(&p.x));
            assert!((0.0..=1.0).contains(&p.y));
        }
    }
}

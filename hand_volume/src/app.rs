//! Top-level frame loop.
//!
//! `run` owns every resource: the hand source, the volume mapper and
//! the window. One thread of control, one iteration per frame; the only
//! state carried across frames is the mapper's smoothed volume. All
//! resources release on drop, so any exit path — quit key, camera
//! disconnect, error — still closes the hardware handles.

use std::time::Duration;

use anyhow::Result;

use openness::{Calibration, Strategy, DEFAULT_OPENNESS};
use volume_map::{VolumeMapper, DEFAULT_ALPHA};

use hand_model::HandLandmarks;

use crate::endpoint;
use crate::overlay;
use crate::source::{DetectorConfig, HandSource};
use crate::visualizer::Visualizer;

#[cfg(not(feature = "camera"))]
use crate::source::SimSource;

#[cfg(feature = "camera")]
use crate::source::CameraSource;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
pub struct AppConfig {
    /// Requested capture/window resolution.
    pub width: usize,
    pub height: usize,
    pub detector: DetectorConfig,
    /// Active openness algorithm.
    pub strategy: Strategy,
    pub calibration: Calibration,
    /// Exponential smoothing factor for the volume.
    pub smoothing_alpha: f64,
    /// MIDI channel for the volume endpoint.
    pub midi_channel: u8,
    /// Window update-rate limit (bounded display wait).
    pub frame_wait_ms: u64,
    /// Pause between setup and the first frame.
    pub startup_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            width: 640,
            height: 480,
            detector: DetectorConfig::default(),
            strategy: Strategy::default(),
            calibration: Calibration::default(),
            smoothing_alpha: DEFAULT_ALPHA,
            midi_channel: 0,
            frame_wait_ms: 16,
            // Camera warm-up grace; pointless in simulation.
            startup_delay: if cfg!(feature = "camera") {
                Duration::from_secs(3)
            } else {
                Duration::ZERO
            },
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Phase — the loop's state machine
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Init,
    Running,
    Stopped,
}

impl Phase {
    /// Legal transitions: `Init → Running`, `Init → Stopped` (setup
    /// failure) and `Running → Stopped`. `Stopped` is terminal.
    pub fn can_enter(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Init, Phase::Running)
                | (Phase::Init, Phase::Stopped)
                | (Phase::Running, Phase::Stopped)
        )
    }

    fn enter(&mut self, next: Phase) {
        debug_assert!(self.can_enter(next), "illegal transition {:?} → {:?}", self, next);
        log::debug!("phase {:?} → {:?}", self, next);
        *self = next;
    }
}

/// Openness for one frame: the active strategy when a hand is present,
/// the neutral default otherwise.
pub fn frame_openness(hand: Option<&HandLandmarks>, strategy: Strategy, cal: &Calibration) -> u8 {
    match hand {
        Some(h) => strategy.estimate(h, cal),
        None => DEFAULT_OPENNESS,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application. Returns when the user quits, the window
/// closes or the frame source ends.
pub fn run(cfg: AppConfig) -> Result<()> {
    let mut phase = Phase::Init;

    // ── Hand source ───────────────────────────────────────────────────────
    // Camera failure is the one fatal setup error.
    #[cfg(feature = "camera")]
    let mut source = match CameraSource::new(cfg.width, cfg.height, cfg.detector) {
        Ok(s) => s,
        Err(e) => {
            phase.enter(Phase::Stopped);
            return Err(e.context("Could not open the camera"));
        }
    };
    #[cfg(not(feature = "camera"))]
    let mut source = SimSource::new(cfg.width, cfg.height);

    // ── Volume endpoint (best-effort) ─────────────────────────────────────
    let ep = endpoint::open_endpoint(cfg.midi_channel);
    let mut mapper = VolumeMapper::new(ep, cfg.smoothing_alpha);
    if mapper.has_endpoint() {
        let r = mapper.range();
        log::info!(
            "Volume range: {:.1} to {:.1}",
            r.min_level(),
            r.max_level()
        );
    } else {
        log::info!("Running in visualization-only mode");
    }

    // ── Window ────────────────────────────────────────────────────────────
    let mut vis = Visualizer::new(cfg.width, cfg.height, cfg.frame_wait_ms)?;

    if !cfg.startup_delay.is_zero() {
        log::info!("Starting in {:.0?}…", cfg.startup_delay);
        std::thread::sleep(cfg.startup_delay);
    }

    phase.enter(Phase::Running);

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        // 1. Keys
        let input = vis.poll_input();
        if input.quit {
            log::info!("Quit requested");
            break;
        }
        #[cfg(not(feature = "camera"))]
        for steer in input.steers.iter().copied() {
            source.steer(steer);
        }

        // 2. One capture per iteration
        let capture = match source.grab()? {
            Some(c) => c,
            None => {
                log::info!("Frame source ended — stopping");
                break;
            }
        };

        // 3. Openness → smoothed volume (the endpoint is updated inside)
        let openness = frame_openness(capture.hand.as_ref(), cfg.strategy, &cfg.calibration);
        let volume = mapper.apply(openness);

        // 4. Overlay + present; the capture is dropped at the end of the
        //    iteration, nothing from it survives the frame.
        let mut frame = capture.frame;
        overlay::draw_overlay(&mut frame, openness, volume, capture.hand.as_ref());
        vis.present(&frame)?;
    }

    phase.enter(Phase::Stopped);
    log::info!(
        "Stopped at volume {:.0}%",
        mapper.smoothed_percent()
    );
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{SimSource, SimSteer};

    #[test]
    fn config_defaults_match_contract() {
        let cfg = AppConfig::default();
        assert_eq!((cfg.width, cfg.height), (640, 480));
        assert_eq!(cfg.strategy, Strategy::PalmDistance);
        assert!((cfg.smoothing_alpha - 0.2).abs() < 1e-12);
        assert_eq!(cfg.detector.max_hands, 1);
    }

    #[test]
    fn phase_transitions() {
        assert!(Phase::Init.can_enter(Phase::Running));
        assert!(Phase::Init.can_enter(Phase::Stopped));
        assert!(Phase::Running.can_enter(Phase::Stopped));
        assert!(!Phase::Stopped.can_enter(Phase::Running));
        assert!(!Phase::Stopped.can_enter(Phase::Init));
        assert!(!Phase::Running.can_enter(Phase::Init));
    }

    #[test]
    fn no_hand_yields_default_openness() {
        let cal = Calibration::default();
        assert_eq!(
            frame_openness(None, Strategy::PalmDistance, &cal),
            DEFAULT_OPENNESS
        );
    }

    #[test]
    fn hand_openness_uses_the_active_strategy() {
        let cal = Calibration::default();
        let hand = crate::source::synthesize_hand(0.5, 0.45, 1.0);
        let direct = Strategy::PalmDistance.estimate(&hand, &cal);
        assert_eq!(
            frame_openness(Some(&hand), Strategy::PalmDistance, &cal),
            direct
        );
    }

    #[test]
    fn lost_hand_drifts_volume_toward_default() {
        // Ten hand-less frames through the real per-frame pipeline:
        // openness defaults to 50 each frame and the smoothed volume
        // converges toward it monotonically from above.
        let cal = Calibration::default();
        let mut src = SimSource::new(64, 48);
        let mut mapper = VolumeMapper::new(None, 0.2);

        // Drive the volume up with a fully open hand first.
        for _ in 0..40 {
            src.steer(SimSteer::Open);
        }
        for _ in 0..20 {
            let cap = src.grab().unwrap().unwrap();
            let o = frame_openness(cap.hand.as_ref(), Strategy::PalmDistance, &cal);
            mapper.apply(o);
        }
        assert!(mapper.smoothed_percent() > 80.0);

        // Now the hand disappears.
        src.steer(SimSteer::ToggleHand);
        let mut prev = mapper.smoothed_percent();
        for _ in 0..10 {
            let cap = src.grab().unwrap().unwrap();
            let o = frame_openness(cap.hand.as_ref(), Strategy::PalmDistance, &cal);
            assert_eq!(o, DEFAULT_OPENNESS);
            let now = mapper.apply(o);
            assert!(now < prev && now >= 50.0, "no overshoot past 50");
            prev = now;
        }
    }
}

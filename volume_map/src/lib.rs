//! # volume_map
//!
//! Maps an openness percentage onto a device volume level:
//!
//! 1. a single-pole exponential low-pass ([`Smoother`]) damps the raw
//!    per-frame openness so the volume never snaps;
//! 2. the smoothed percentage is rescaled linearly into the endpoint's
//!    native range ([`VolumeRange`]);
//! 3. the level is forwarded to a [`VolumeEndpoint`], if one is present.
//!
//! The smoothed state is the only value this system carries across
//! frames. Everything here is synchronous and endpoint-agnostic; the
//! application crate supplies the actual device binding.

// ════════════════════════════════════════════════════════════════════════════
// VolumeRange
// ════════════════════════════════════════════════════════════════════════════

/// An endpoint's native level range, fetched once at startup.
///
/// Units are device-specific (decibel attenuation on a system mixer,
/// 0–127 on a MIDI controller). `min_level <= max_level` always holds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VolumeRange {
    min_level: f64,
    max_level: f64,
}

impl VolumeRange {
    /// The bounds are ordered on construction, so a backend reporting
    /// them swapped cannot break the invariant.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            VolumeRange { min_level: a, max_level: b }
        } else {
            VolumeRange { min_level: b, max_level: a }
        }
    }

    pub fn min_level(&self) -> f64 {
        self.min_level
    }

    pub fn max_level(&self) -> f64 {
        self.max_level
    }

    /// Linear rescale of a percentage in [0, 100] onto this range.
    ///
    /// The percentage is clamped first, so the result is always a finite
    /// in-range level — nothing out of range can reach an endpoint.
    pub fn level_for(&self, percent: f64) -> f64 {
        let p = if percent.is_finite() { percent.clamp(0.0, 100.0) } else { 50.0 };
        self.min_level + p / 100.0 * (self.max_level - self.min_level)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Smoother
// ════════════════════════════════════════════════════════════════════════════

/// Single-pole exponential low-pass over the openness percentage.
///
/// `state' = α·sample + (1-α)·state` — a convex combination, so given
/// clamped samples the state stays in [0, 100] and converges toward a
/// held sample with exact geometric decay `(1-α)^N`.
#[derive(Clone, Copy, Debug)]
pub struct Smoother {
    alpha: f64,
    state: f64,
}

/// Default smoothing factor: visibly responsive, lag-damped.
pub const DEFAULT_ALPHA: f64 = 0.2;

/// Startup value of the smoothed percentage.
pub const INITIAL_PERCENT: f64 = 50.0;

impl Smoother {
    pub fn new(alpha: f64) -> Self {
        Smoother {
            alpha: alpha.clamp(0.0, 1.0),
            state: INITIAL_PERCENT,
        }
    }

    /// Fold one openness sample into the state; returns the new state.
    pub fn update(&mut self, openness: u8) -> f64 {
        let sample = f64::from(openness.min(100));
        self.state = self.alpha * sample + (1.0 - self.alpha) * self.state;
        self.state
    }

    pub fn state(&self) -> f64 {
        self.state
    }
}

impl Default for Smoother {
    fn default() -> Self {
        Smoother::new(DEFAULT_ALPHA)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// VolumeEndpoint — the external audio collaborator seam
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can report a native level range and accept a master
/// level. Implemented by the application's device backends and by test
/// doubles.
pub trait VolumeEndpoint {
    fn range(&self) -> VolumeRange;
    fn set_level(&mut self, level: f64);
}

// ════════════════════════════════════════════════════════════════════════════
// VolumeMapper
// ════════════════════════════════════════════════════════════════════════════

/// Owns the smoothed state and the (optional) endpoint.
///
/// With no endpoint the mapper still smooths — the on-screen readout
/// keeps working in visualization-only mode — but the level forwarding
/// step is a no-op and can never fail the frame loop.
pub struct VolumeMapper {
    smoother: Smoother,
    endpoint: Option<Box<dyn VolumeEndpoint>>,
    range: VolumeRange,
}

impl VolumeMapper {
    pub fn new(endpoint: Option<Box<dyn VolumeEndpoint>>, alpha: f64) -> Self {
        let range = endpoint
            .as_ref()
            .map(|e| e.range())
            .unwrap_or(VolumeRange::new(0.0, 100.0));
        VolumeMapper {
            smoother: Smoother::new(alpha),
            endpoint,
            range,
        }
    }

    /// Fold one frame's openness in and push the resulting level to the
    /// endpoint. Returns the smoothed percentage for display.
    pub fn apply(&mut self, openness: u8) -> f64 {
        let smoothed = self.smoother.update(openness);
        if let Some(ep) = self.endpoint.as_mut() {
            ep.set_level(self.range.level_for(smoothed));
        }
        smoothed
    }

    /// The smoothed percentage without folding in a new sample.
    pub fn smoothed_percent(&self) -> f64 {
        self.smoother.state()
    }

    pub fn range(&self) -> VolumeRange {
        self.range
    }

    pub fn has_endpoint(&self) -> bool {
        self.endpoint.is_some()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn smoother_first_steps_match_decay_law() {
        // α=0.2, state₀=50, held sample 100: 60.0 then 68.0.
        let mut s = Smoother::new(0.2);
        close(s.update(100), 60.0);
        close(s.update(100), 68.0);
    }

    #[test]
    fn smoother_geometric_decay_exact() {
        // |state_N − v| = (1-α)^N · |state₀ − v|
        let mut s = Smoother::new(0.2);
        let v = 100.0;
        let gap0 = (s.state() - v).abs();
        for n in 1..=20 {
            s.update(100);
            close((s.state() - v).abs(), 0.8f64.powi(n) * gap0);
        }
    }

    #[test]
    fn smoother_converges_monotonically_without_overshoot() {
        // Drift toward the no-hand default from above.
        let mut s = Smoother::new(0.2);
        for _ in 0..5 {
            s.update(100);
        }
        let mut prev = s.state();
        assert!(prev > 50.0);
        for _ in 0..10 {
            let now = s.update(50);
            assert!(now < prev, "state must decrease toward 50");
            assert!(now >= 50.0, "state must never undershoot 50");
            prev = now;
        }
    }

    #[test]
    fn smoother_stays_in_percent_bounds() {
        let mut s = Smoother::new(0.9);
        for o in [0u8, 100, 0, 100, 100, 0] {
            let v = s.update(o);
            assert!((0.0..=100.0).contains(&v));
        }
    }

    #[test]
    fn range_rescale_boundaries() {
        let r = VolumeRange::new(-40.0, 0.0);
        assert_eq!(r.level_for(0.0), -40.0);
        assert_eq!(r.level_for(100.0), 0.0);
        assert_eq!(r.level_for(50.0), -20.0);
    }

    #[test]
    fn range_orders_swapped_bounds() {
        let r = VolumeRange::new(0.0, -40.0);
        assert_eq!(r.min_level(), -40.0);
        assert_eq!(r.max_level(), 0.0);
    }

    #[test]
    fn range_clamps_out_of_bounds_percent() {
        let r = VolumeRange::new(-40.0, 0.0);
        assert_eq!(r.level_for(-10.0), -40.0);
        assert_eq!(r.level_for(250.0), 0.0);
        let lvl = r.level_for(f64::NAN);
        assert!(lvl.is_finite());
        assert!((r.min_level()..=r.max_level()).contains(&lvl));
    }

    // ── mapper with a recording endpoint ─────────────────────────────────

    struct RecordingEndpoint {
        levels: Rc<RefCell<Vec<f64>>>,
    }

    impl VolumeEndpoint for RecordingEndpoint {
        fn range(&self) -> VolumeRange {
            VolumeRange::new(-40.0, 0.0)
        }
        fn set_level(&mut self, level: f64) {
            self.levels.borrow_mut().push(level);
        }
    }

    #[test]
    fn mapper_forwards_in_range_levels() {
        let levels = Rc::new(RefCell::new(Vec::new()));
        let ep = RecordingEndpoint { levels: levels.clone() };
        let mut mapper = VolumeMapper::new(Some(Box::new(ep)), 0.2);

        for o in [100u8, 100, 0, 50, 50] {
            mapper.apply(o);
        }
        let sent = levels.borrow();
        assert_eq!(sent.len(), 5);
        for &lvl in sent.iter() {
            assert!((-40.0..=0.0).contains(&lvl), "level {} out of range", lvl);
        }
        // First sample: 50 → 60 percent → -40 + 0.6·40 = -16 dB.
        close(sent[0], -16.0);
    }

    #[test]
    fn mapper_without_endpoint_is_noop_but_still_smooths() {
        let mut mapper = VolumeMapper::new(None, 0.2);
        assert!(!mapper.has_endpoint());
        close(mapper.apply(100), 60.0);
        close(mapper.apply(100), 68.0);
    }

    #[test]
    fn mapper_drifts_to_default_when_hand_lost() {
        let mut mapper = VolumeMapper::new(None, 0.2);
        for _ in 0..10 {
            mapper.apply(100);
        }
        let mut prev = mapper.smoothed_percent();
        for _ in 0..10 {
            let now = mapper.apply(50);
            assert!(now < prev && now >= 50.0);
            prev = now;
        }
    }
}

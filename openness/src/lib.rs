//! # openness
//!
//! Converts one 21-point [`HandLandmarks`] set into a single openness
//! percentage in [0, 100] — how extended/spread the fingers are.
//!
//! Three interchangeable strategies are provided; exactly one is active
//! at a time, selected at construction:
//!
//! | Strategy | Idea |
//! |---|---|
//! | [`Strategy::ExtensionSpread`] | finger extension ratio (weight 0.6) + spread ratio (weight 0.4) |
//! | [`Strategy::FingerAngle`] | mean knuckle angle across the five digits, rescaled from [0°, 180°] |
//! | [`Strategy::PalmDistance`] | mean fingertip distance from the palm center, rescaled between calibrated closed/open references (default) |
//!
//! All three are pure and total: malformed geometry yields the neutral
//! fallback [`DEFAULT_OPENNESS`] or a clamped value, never a panic.
//!
//! The reference constants each strategy leans on are calibration
//! parameters, not derived quantities — they live in [`Calibration`] so
//! callers can tune them.

use hand_model::geometry::{angle, distance};
use hand_model::landmark::indices;
use hand_model::HandLandmarks;

/// Neutral openness reported when no hand is detected or the geometry is
/// degenerate.
pub const DEFAULT_OPENNESS: u8 = 50;

// ════════════════════════════════════════════════════════════════════════════
// Calibration
// ════════════════════════════════════════════════════════════════════════════

/// Tunable constants for the three strategies.
///
/// The defaults are the empirically chosen values the system ships with;
/// none of them is derived from hand anatomy.
#[derive(Clone, Copy, Debug)]
pub struct Calibration {
    /// Weight of the extension ratio in the extension/spread blend.
    pub extension_weight: f32,
    /// Weight of the spread ratio in the extension/spread blend.
    pub spread_weight: f32,
    /// Knuckle angle treated as a fully extended digit, in degrees.
    pub full_extension_deg: f32,
    /// Mean tip-to-palm distance of a closed hand, normalized units.
    pub closed_hand_dist: f32,
    /// Mean tip-to-palm distance of a fully open hand, normalized units.
    pub open_hand_dist: f32,
}

impl Default for Calibration {
    fn default() -> Self {
        Calibration {
            extension_weight: 0.6,
            spread_weight: 0.4,
            full_extension_deg: 180.0,
            closed_hand_dist: 0.05,
            open_hand_dist: 0.25,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Strategy
// ════════════════════════════════════════════════════════════════════════════

/// The active openness algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Wrist→middle-tip extension blended with thumb-tip→pinky-tip spread.
    ExtensionSpread,
    /// Mean angle at each digit's base knuckle between tip and wrist.
    FingerAngle,
    /// Mean fingertip distance from the palm center. Most robust in
    /// practice, hence the default.
    #[default]
    PalmDistance,
}

impl Strategy {
    /// Estimate how open `hand` is, as a percentage in [0, 100].
    pub fn estimate(self, hand: &HandLandmarks, cal: &Calibration) -> u8 {
        match self {
            Strategy::ExtensionSpread => extension_spread(hand, cal),
            Strategy::FingerAngle => finger_angle(hand, cal),
            Strategy::PalmDistance => palm_distance(hand, cal),
        }
    }
}

/// Clamp to [0, 100] and truncate to an integer percentage.
fn to_percent(value: f32) -> u8 {
    value.clamp(0.0, 100.0) as u8
}

// ════════════════════════════════════════════════════════════════════════════
// Extension/spread
// ════════════════════════════════════════════════════════════════════════════

fn extension_spread(hand: &HandLandmarks, cal: &Calibration) -> u8 {
    let wrist = hand.wrist();
    let middle_tip = hand.point(indices::MIDDLE_TIP);
    let middle_base = hand.point(indices::MIDDLE_MCP);

    let hand_length = distance(wrist, middle_tip);
    let palm_size = distance(wrist, middle_base);
    if hand_length <= 0.0 || palm_size <= 0.0 {
        return DEFAULT_OPENNESS;
    }

    let hand_width = distance(
        hand.point(indices::THUMB_TIP),
        hand.point(indices::PINKY_TIP),
    );

    let extension_ratio = hand_length / palm_size;
    let spread_ratio = hand_width / hand_length;
    let openness = extension_ratio * cal.extension_weight + spread_ratio * cal.spread_weight;
    to_percent(openness * 100.0)
}

// ════════════════════════════════════════════════════════════════════════════
// Finger angle
// ════════════════════════════════════════════════════════════════════════════

fn finger_angle(hand: &HandLandmarks, cal: &Calibration) -> u8 {
    let wrist = hand.wrist();
    let mut total = 0.0;
    let mut valid = 0u32;

    for (&tip, &knuckle) in indices::TIPS.iter().zip(indices::KNUCKLES.iter()) {
        let deg = angle(hand.point(tip), hand.point(knuckle), wrist);
        // A digit contributes only when its angle is non-degenerate.
        if deg > 0.0 {
            total += deg;
            valid += 1;
        }
    }

    if valid == 0 {
        return DEFAULT_OPENNESS;
    }
    let avg = total / valid as f32;
    to_percent(avg / cal.full_extension_deg * 100.0)
}

// ════════════════════════════════════════════════════════════════════════════
// Palm distance
// ════════════════════════════════════════════════════════════════════════════

fn palm_distance(hand: &HandLandmarks, cal: &Calibration) -> u8 {
    let center = hand.palm_center();
    let tips = hand.fingertips();

    let mean: f32 = tips.iter().map(|&t| distance(t, center)).sum::<f32>() / tips.len() as f32;

    let span = cal.open_hand_dist - cal.closed_hand_dist;
    if span <= 0.0 {
        return DEFAULT_OPENNESS;
    }
    to_percent((mean - cal.closed_hand_dist) / span * 100.0)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_model::landmark::{Landmark, LANDMARK_COUNT};

    fn p(x: f32, y: f32) -> Landmark {
        Landmark::new(x, y)
    }

    /// A hand with every palm reference point at `center` and every
    /// fingertip at distance `tip_dist` from it (spread over five rays
    /// for the non-boundary cases would change nothing for the
    /// palm-distance mean, so a single ray keeps the math exact).
    fn radial_hand(center: Landmark, tip_dist: f32) -> HandLandmarks {
        let mut pts = [center; LANDMARK_COUNT];
        for &tip in &indices::TIPS {
            pts[tip] = p(center.x + tip_dist, center.y);
        }
        HandLandmarks::new(pts)
    }

    /// A plausibly open hand: wrist at the bottom, knuckles above it,
    /// fingertips extended further along each digit ray.
    fn open_hand() -> HandLandmarks {
        let mut pts = [p(0.5, 0.6); LANDMARK_COUNT];
        pts[indices::WRIST] = p(0.5, 0.8);
        let rays = [
            (indices::THUMB_MCP, indices::THUMB_TIP, -0.12f32, -0.02f32),
            (indices::INDEX_MCP, indices::INDEX_TIP, -0.05, -0.10),
            (indices::MIDDLE_MCP, indices::MIDDLE_TIP, 0.00, -0.12),
            (indices::RING_MCP, indices::RING_TIP, 0.05, -0.10),
            (indices::PINKY_MCP, indices::PINKY_TIP, 0.10, -0.06),
        ];
        for (mcp, tip, dx, dy) in rays {
            pts[mcp] = p(0.5 + dx, 0.62 + dy * 0.3);
            pts[tip] = p(0.5 + dx * 2.2, 0.62 + dy * 2.2);
        }
        pts[indices::THUMB_CMC] = p(0.45, 0.72);
        HandLandmarks::new(pts)
    }

    /// A closed fist: everything bunched near the palm.
    fn closed_hand() -> HandLandmarks {
        let mut pts = [p(0.5, 0.55); LANDMARK_COUNT];
        pts[indices::WRIST] = p(0.5, 0.62);
        for &tip in &indices::TIPS {
            pts[tip] = p(0.51, 0.53);
        }
        HandLandmarks::new(pts)
    }

    #[test]
    fn all_strategies_stay_within_percent_bounds() {
        let cal = Calibration::default();
        let hands = [open_hand(), closed_hand(), radial_hand(p(0.5, 0.5), 0.9)];
        for hand in &hands {
            for s in [
                Strategy::ExtensionSpread,
                Strategy::FingerAngle,
                Strategy::PalmDistance,
            ] {
                let v = s.estimate(hand, &cal);
                assert!(v <= 100, "{:?} produced {}", s, v);
            }
        }
    }

    #[test]
    fn palm_distance_closed_boundary_is_zero() {
        // All fingertips coincident with the palm center.
        let hand = radial_hand(p(0.5, 0.5), 0.0);
        let v = Strategy::PalmDistance.estimate(&hand, &Calibration::default());
        assert_eq!(v, 0);
    }

    #[test]
    fn palm_distance_open_boundary_is_hundred() {
        let cal = Calibration::default();
        let hand = radial_hand(p(0.5, 0.5), cal.open_hand_dist);
        assert_eq!(Strategy::PalmDistance.estimate(&hand, &cal), 100);

        // Beyond the open reference the value clamps rather than grows.
        let far = radial_hand(p(0.5, 0.5), cal.open_hand_dist * 2.0);
        assert_eq!(Strategy::PalmDistance.estimate(&far, &cal), 100);
    }

    #[test]
    fn palm_distance_orders_open_above_closed() {
        let cal = Calibration::default();
        let open = Strategy::PalmDistance.estimate(&open_hand(), &cal);
        let closed = Strategy::PalmDistance.estimate(&closed_hand(), &cal);
        assert!(open > closed, "open {} should exceed closed {}", open, closed);
    }

    #[test]
    fn extension_spread_degenerate_hand_falls_back() {
        // Every point coincident: zero hand length and palm size.
        let hand = radial_hand(p(0.5, 0.5), 0.0);
        let v = Strategy::ExtensionSpread.estimate(&hand, &Calibration::default());
        assert_eq!(v, DEFAULT_OPENNESS);
    }

    #[test]
    fn finger_angle_degenerate_hand_falls_back() {
        // All landmarks coincident: every per-digit angle is 0, so no
        // digit is valid.
        let hand = radial_hand(p(0.5, 0.5), 0.0);
        let v = Strategy::FingerAngle.estimate(&hand, &Calibration::default());
        assert_eq!(v, DEFAULT_OPENNESS);
    }

    #[test]
    fn finger_angle_straight_digits_saturate() {
        // Wrist, knuckles and tips collinear with the knuckle between:
        // every digit angle is 180°, mean 180° → 100%.
        let mut pts = [p(0.5, 0.5); LANDMARK_COUNT];
        pts[indices::WRIST] = p(0.5, 0.9);
        for (&tip, &knuckle) in indices::TIPS.iter().zip(indices::KNUCKLES.iter()) {
            pts[knuckle] = p(0.5, 0.5);
            pts[tip] = p(0.5, 0.1);
        }
        let hand = HandLandmarks::new(pts);
        let v = Strategy::FingerAngle.estimate(&hand, &Calibration::default());
        assert_eq!(v, 100);
    }

    #[test]
    fn default_strategy_is_palm_distance() {
        assert_eq!(Strategy::default(), Strategy::PalmDistance);
    }

    #[test]
    fn calibration_is_tunable() {
        // Doubling the open-hand reference halves the reported openness
        // for a mid-range hand.
        let hand = radial_hand(p(0.5, 0.5), 0.15);
        let base = Calibration::default();
        let wide = Calibration {
            open_hand_dist: 0.45,
            ..base
        };
        let v_base = Strategy::PalmDistance.estimate(&hand, &base);
        let v_wide = Strategy::PalmDistance.estimate(&hand, &wide);
        assert!(v_wide < v_base);
    }
}

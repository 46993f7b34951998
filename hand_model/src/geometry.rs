//! Planar geometry over normalized landmark coordinates.

use crate::landmark::Landmark;

/// Euclidean distance between two landmarks in the frame plane.
///
/// Depth is ignored; the detector's `z` is relative and not comparable
/// between points at this scale.
pub fn distance(a: Landmark, b: Landmark) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Angle in degrees at vertex `b`, formed by the rays `b→a` and `b→c`.
///
/// The cosine is clamped to [-1, 1] before `acos` to absorb floating-point
/// drift, so the result is always in [0, 180]. Returns 0 when either arm
/// vector has zero magnitude (degenerate, non-fatal).
pub fn angle(a: Landmark, b: Landmark, c: Landmark) -> f32 {
    let (bax, bay) = (a.x - b.x, a.y - b.y);
    let (bcx, bcy) = (c.x - b.x, c.y - b.y);

    let mag_ba = (bax * bax + bay * bay).sqrt();
    let mag_bc = (bcx * bcx + bcy * bcy).sqrt();
    if mag_ba == 0.0 || mag_bc == 0.0 {
        return 0.0;
    }

    let cos = ((bax * bcx + bay * bcy) / (mag_ba * mag_bc)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> Landmark {
        Landmark::new(x, y)
    }

    #[test]
    fn distance_to_self_is_zero() {
        let a = p(0.37, 0.81);
        assert_eq!(distance(a, a), 0.0);
    }

    #[test]
    fn distance_unit_axes() {
        assert!((distance(p(0.0, 0.0), p(1.0, 0.0)) - 1.0).abs() < 1e-6);
        assert!((distance(p(0.0, 0.0), p(0.0, 1.0)) - 1.0).abs() < 1e-6);
        assert!((distance(p(0.0, 0.0), p(3.0, 4.0)) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = p(0.1, 0.9);
        let b = p(0.6, 0.2);
        assert_eq!(distance(a, b), distance(b, a));
    }

    #[test]
    fn angle_same_ray_is_zero() {
        let a = p(0.5, 0.0);
        let b = p(0.0, 0.0);
        assert_eq!(angle(a, b, a), 0.0);
    }

    #[test]
    fn angle_right_angle() {
        let deg = angle(p(1.0, 0.0), p(0.0, 0.0), p(0.0, 1.0));
        assert!((deg - 90.0).abs() < 1e-3);
    }

    #[test]
    fn angle_straight_line_is_180() {
        let deg = angle(p(-1.0, 0.0), p(0.0, 0.0), p(1.0, 0.0));
        assert!((deg - 180.0).abs() < 1e-3);
    }

    #[test]
    fn angle_degenerate_arm_is_zero() {
        let b = p(0.5, 0.5);
        assert_eq!(angle(b, b, p(0.9, 0.9)), 0.0);
        assert_eq!(angle(p(0.9, 0.9), b, b), 0.0);
    }

    #[test]
    fn angle_always_within_bounds() {
        let samples = [
            (p(0.2, 0.3), p(0.5, 0.5), p(0.9, 0.1)),
            (p(0.0, 1.0), p(0.5, 0.5), p(1.0, 0.0)),
            (p(0.01, 0.02), p(0.5, 0.49), p(0.98, 0.97)),
        ];
        for (a, b, c) in samples {
            let deg = angle(a, b, c);
            assert!((0.0..=180.0).contains(&deg), "angle {} out of range", deg);
        }
    }
}

//! Hand landmarks in the 21-point MediaPipe convention.

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices
// ════════════════════════════════════════════════════════════════════════════

/// Landmark indices, fixed by the MediaPipe hand landmark convention.
/// See: https://google.github.io/mediapipe/solutions/hands.html
pub mod indices {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;

    /// The five fingertip indices, thumb first.
    pub const TIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

    /// Base knuckle for each digit, matched index-wise with [`TIPS`].
    /// The thumb uses its MCP (index 2); the fingers use theirs.
    pub const KNUCKLES: [usize; 5] = [THUMB_MCP, INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];

    /// Wrist plus the five MCP joints — the reference points whose mean
    /// defines the palm center.
    pub const PALM: [usize; 6] = [WRIST, THUMB_CMC, INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];
}

/// Number of landmarks per hand.
pub const LANDMARK_COUNT: usize = 21;

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// A single keypoint on a detected hand.
///
/// `x` and `y` are normalized to the frame; `z` is the detector's relative
/// depth estimate (unused by the geometry in this crate).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Landmark { x, y, z: 0.0 }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandLandmarks
// ════════════════════════════════════════════════════════════════════════════

/// One detected hand: exactly [`LANDMARK_COUNT`] landmarks.
///
/// Produced fresh each frame by the detector and discarded at the end of
/// the loop iteration — never retained across frames.
#[derive(Clone, Debug)]
pub struct HandLandmarks {
    points: [Landmark; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        HandLandmarks { points }
    }

    /// Build from a detector's point list. Returns `None` for anything
    /// other than exactly 21 points.
    pub fn from_points(points: &[Landmark]) -> Option<Self> {
        if points.len() != LANDMARK_COUNT {
            return None;
        }
        let mut arr = [Landmark::default(); LANDMARK_COUNT];
        arr.copy_from_slice(points);
        Some(HandLandmarks { points: arr })
    }

    pub fn point(&self, index: usize) -> Landmark {
        self.points[index]
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }

    pub fn wrist(&self) -> Landmark {
        self.points[indices::WRIST]
    }

    /// The five fingertips, thumb first.
    pub fn fingertips(&self) -> [Landmark; 5] {
        indices::TIPS.map(|i| self.points[i])
    }

    /// Unweighted mean of the wrist and the five MCP joints.
    ///
    /// Used both by the palm-distance openness estimate and by the
    /// on-screen indicator circle.
    pub fn palm_center(&self) -> Landmark {
        let mut cx = 0.0;
        let mut cy = 0.0;
        for &i in &indices::PALM {
            cx += self.points[i].x;
            cy += self.points[i].y;
        }
        let n = indices::PALM.len() as f32;
        Landmark::new(cx / n, cy / n)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

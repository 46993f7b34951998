//! Owned ARGB pixel buffer, the unit of work for one loop iteration.

/// A single video frame: `0xAARRGGBB` pixels, row-major.
#[derive(Clone, Debug)]
pub struct Frame {
    width: usize,
    height: usize,
    data: Vec<u32>,
}

impl Frame {
    /// A frame filled with `color`.
    pub fn filled(width: usize, height: usize, color: u32) -> Self {
        Frame {
            width,
            height,
            data: vec![color; width * height],
        }
    }

    /// Wrap an existing pixel buffer. Returns `None` on a size mismatch.
    pub fn from_pixels(width: usize, height: usize, data: Vec<u32>) -> Option<Self> {
        if data.len() != width * height {
            return None;
        }
        Some(Frame { width, height, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.data
    }

    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.data[y * self.width + x]
    }

    /// Out-of-bounds writes are silently dropped so drawing code never
    /// needs to pre-clip.
    pub fn set(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = color;
        }
    }

    /// Flip left-right in place — the "mirror" interaction, so moving a
    /// hand right moves it right on screen.
    pub fn mirror_horizontal(&mut self) {
        for row in self.data.chunks_mut(self.width) {
            row.reverse();
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pixels_checks_size() {
        assert!(Frame::from_pixels(4, 4, vec![0; 15]).is_none());
        assert!(Frame::from_pixels(4, 4, vec![0; 16]).is_some());
    }

    #[test]
    fn mirror_swaps_columns() {
        let mut f = Frame::filled(3, 2, 0);
        f.set(0, 0, 1);
        f.set(2, 1, 2);
        f.mirror_horizontal();
        assert_eq!(f.get(2, 0), 1);
        assert_eq!(f.get(0, 1), 2);
        assert_eq!(f.get(1, 0), 0);
    }

    #[test]
    fn mirror_twice_is_identity() {
        let mut f = Frame::filled(4, 3, 0);
        for i in 0..12 {
            f.set(i % 4, i / 4, i as u32);
        }
        let before = f.pixels().to_vec();
        f.mirror_horizontal();
        f.mirror_horizontal();
        assert_eq!(f.pixels(), &before[..]);
    }

    #[test]
    fn set_out_of_bounds_is_ignored() {
        let mut f = Frame::filled(2, 2, 0);
        f.set(5, 5, 0xFF);
        assert!(f.pixels().iter().all(|&p| p == 0));
    }
}

//! Software-rendered overlay: volume bar, numeric readout, palm
//! indicator circle, hand skeleton and the instruction block.
//!
//! Everything draws into a [`Frame`] and is clip-safe, so it is fully
//! unit-testable without a window.

use hand_model::HandLandmarks;

use crate::frame::Frame;

// ════════════════════════════════════════════════════════════════════════════
// Layout + palette
// ════════════════════════════════════════════════════════════════════════════

const BAR_W: usize = 300;
const BAR_H: usize = 30;
/// Distance from the bottom edge to the top of the bar.
const BAR_BOTTOM_MARGIN: usize = 100;

const COLOR_RED: u32 = 0xFFFF3030;
const COLOR_YELLOW: u32 = 0xFFFFE030;
const COLOR_GREEN: u32 = 0xFF30E030;
const COLOR_CYAN: u32 = 0xFF30E0E0;
const COLOR_WHITE: u32 = 0xFFF0F0F0;
const COLOR_BAR_BG: u32 = 0xFF323232;
const COLOR_BONE: u32 = 0xFFB0B0C8;

/// Landmark connection pairs in the MediaPipe hand convention.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1), (1, 2), (2, 3), (3, 4),       // thumb
    (0, 5), (5, 6), (6, 7), (7, 8),       // index
    (5, 9), (9, 10), (10, 11), (11, 12),  // middle
    (9, 13), (13, 14), (14, 15), (15, 16),// ring
    (13, 17), (17, 18), (18, 19), (19, 20),// pinky
    (0, 17),                              // palm edge
];

/// Bar/indicator color for an openness percentage: red when nearly
/// closed, yellow mid-range, green when open.
pub fn bar_color(openness: u8) -> u32 {
    if openness < 30 {
        COLOR_RED
    } else if openness < 70 {
        COLOR_YELLOW
    } else {
        COLOR_GREEN
    }
}

/// Indicator circle radius in pixels, growing with openness.
pub fn indicator_radius(openness: u8) -> usize {
    10 + openness as usize * 20 / 100
}

// ════════════════════════════════════════════════════════════════════════════
// Top-level overlay
// ════════════════════════════════════════════════════════════════════════════

/// Draw the full interface for one frame.
///
/// `openness` is the raw per-frame estimate, `volume` the smoothed
/// percentage actually applied to the endpoint.
pub fn draw_overlay(frame: &mut Frame, openness: u8, volume: f64, hand: Option<&HandLandmarks>) {
    if let Some(h) = hand {
        draw_skeleton(frame, h);
        draw_palm_indicator(frame, h, openness);
    }
    draw_volume_bar(frame, openness, volume);
    draw_info_block(frame, openness, volume);
}

// ── Volume bar ────────────────────────────────────────────────────────────

fn draw_volume_bar(frame: &mut Frame, openness: u8, volume: f64) {
    let w = frame.width();
    let h = frame.height();
    let bar_w = BAR_W.min(w.saturating_sub(8));
    let bar_x = (w.saturating_sub(bar_w)) / 2;
    let bar_y = h.saturating_sub(BAR_BOTTOM_MARGIN);

    fill_rect(frame, bar_x, bar_y, bar_w, BAR_H, COLOR_BAR_BG);

    // Fill tracks the smoothed volume; color tracks the raw openness.
    let fill = (bar_w as f64 * volume.clamp(0.0, 100.0) / 100.0) as usize;
    fill_rect(frame, bar_x, bar_y, fill, BAR_H, bar_color(openness));
    rect_border(frame, bar_x, bar_y, bar_w, BAR_H, COLOR_WHITE);

    let text = format!("VOLUME: {}%  (OPENNESS: {}%)", volume as u32, openness);
    let tw = text_width(&text, 1);
    let tx = bar_x + bar_w.saturating_sub(tw) / 2;
    draw_text(frame, &text, tx, bar_y.saturating_sub(12), COLOR_WHITE, 1);
}

// ── Palm indicator ────────────────────────────────────────────────────────

fn draw_palm_indicator(frame: &mut Frame, hand: &HandLandmarks, openness: u8) {
    let c = hand.palm_center();
    let px = (c.x * frame.width() as f32) as isize;
    let py = (c.y * frame.height() as f32) as isize;
    let r = indicator_radius(openness);
    let color = bar_color(openness);

    circle_outline(frame, px, py, r as isize, color);
    let label = format!("{}%", openness);
    let lx = (px - text_width(&label, 1) as isize / 2).max(0) as usize;
    let ly = (py - r as isize - 10).max(0) as usize;
    draw_text(frame, &label, lx, ly, color, 1);
}

// ── Skeleton ──────────────────────────────────────────────────────────────

fn draw_skeleton(frame: &mut Frame, hand: &HandLandmarks) {
    let w = frame.width() as f32;
    let h = frame.height() as f32;
    let px = |i: usize| {
        let p = hand.point(i);
        ((p.x * w) as isize, (p.y * h) as isize)
    };

    for &(a, b) in &HAND_CONNECTIONS {
        let (x0, y0) = px(a);
        let (x1, y1) = px(b);
        draw_line(frame, x0, y0, x1, y1, COLOR_BONE);
    }
    for i in 0..21 {
        let (x, y) = px(i);
        fill_circle(frame, x, y, 2, COLOR_WHITE);
    }
}

// ── Instruction block ─────────────────────────────────────────────────────

fn draw_info_block(frame: &mut Frame, openness: u8, volume: f64) {
    let percent_color = if openness > 50 { COLOR_GREEN } else { COLOR_RED };
    let lines: [(&str, u32); 8] = [
        ("HAND VOLUME CONTROL", COLOR_YELLOW),
        ("", COLOR_WHITE),
        ("OPEN HAND WIDE - HIGH VOLUME", COLOR_CYAN),
        ("CLOSE HAND - LOW VOLUME", COLOR_CYAN),
        ("", COLOR_WHITE),
        ("OPENNESS", percent_color),
        ("VOLUME", percent_color),
        ("PRESS Q TO QUIT", COLOR_WHITE),
    ];

    let mut y = 14;
    for (i, (line, color)) in lines.iter().enumerate() {
        let text = match i {
            5 => format!("OPENNESS: {}%", openness),
            6 => format!("VOLUME: {}%", volume as u32),
            _ => (*line).to_string(),
        };
        if !text.is_empty() {
            draw_text(frame, &text, 10, y, *color, 1);
        }
        y += 14;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Primitive drawing helpers
// ════════════════════════════════════════════════════════════════════════════

fn fill_rect(frame: &mut Frame, x: usize, y: usize, w: usize, h: usize, color: u32) {
    for row in y..y + h {
        for col in x..x + w {
            frame.set(col, row, color);
        }
    }
}

fn rect_border(frame: &mut Frame, x: usize, y: usize, w: usize, h: usize, color: u32) {
    if w == 0 || h == 0 {
        return;
    }
    for col in x..x + w {
        frame.set(col, y, color);
        frame.set(col, y + h - 1, color);
    }
    for row in y..y + h {
        frame.set(x, row, color);
        frame.set(x + w - 1, row, color);
    }
}

fn draw_line(frame: &mut Frame, mut x0: isize, mut y0: isize, x1: isize, y1: isize, color: u32) {
    // Bresenham
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        if x0 >= 0 && y0 >= 0 {
            frame.set(x0 as usize, y0 as usize, color);
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn circle_outline(frame: &mut Frame, cx: isize, cy: isize, r: isize, color: u32) {
    // Midpoint circle
    let mut x = r;
    let mut y = 0isize;
    let mut err = 1 - r;
    while x >= y {
        for &(px, py) in &[
            (cx + x, cy + y), (cx - x, cy + y),
            (cx + x, cy - y), (cx - x, cy - y),
            (cx + y, cy + x), (cx - y, cy + x),
            (cx + y, cy - x), (cx - y, cy - x),
        ] {
            if px >= 0 && py >= 0 {
                frame.set(px as usize, py as usize, color);
            }
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

fn fill_circle(frame: &mut Frame, cx: isize, cy: isize, r: isize, color: u32) {
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r {
                let (px, py) = (cx + dx, cy + dy);
                if px >= 0 && py >= 0 {
                    frame.set(px as usize, py as usize, color);
                }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Built-in 4×6 bitmap font
// ════════════════════════════════════════════════════════════════════════════

/// Advance width of one glyph at `scale` 1 (4 columns + 1 gap).
const GLYPH_ADVANCE: usize = 5;

pub fn text_width(text: &str, scale: usize) -> usize {
    text.chars().count() * GLYPH_ADVANCE * scale
}

/// Draw `text` with its top-left corner at `(x, y)`.
pub fn draw_text(frame: &mut Frame, text: &str, x: usize, y: usize, color: u32, scale: usize) {
    let scale = scale.max(1);
    let mut cx = x;
    for ch in text.chars() {
        let rows = glyph(ch);
        for (ry, &bits) in rows.iter().enumerate() {
            for rx in 0..4usize {
                if bits & (1 << (3 - rx)) != 0 {
                    fill_rect(frame, cx + rx * scale, y + ry * scale, scale, scale, color);
                }
            }
        }
        cx += GLYPH_ADVANCE * scale;
    }
}

/// 4 columns × 6 rows per character, one `u8` per row (high bit = left).
fn glyph(c: char) -> [u8; 6] {
    match c.to_ascii_uppercase() {
        '0' => [0b0110, 0b1001, 0b1011, 0b1101, 0b1001, 0b0110],
        '1' => [0b0010, 0b0110, 0b0010, 0b0010, 0b0010, 0b0111],
        '2' => [0b0110, 0b1001, 0b0001, 0b0010, 0b0100, 0b1111],
        '3' => [0b1110, 0b0001, 0b0110, 0b0001, 0b1001, 0b0110],
        '4' => [0b0010, 0b0110, 0b1010, 0b1111, 0b0010, 0b0010],
        '5' => [0b1111, 0b1000, 0b1110, 0b0001, 0b1001, 0b0110],
        '6' => [0b0110, 0b1000, 0b1110, 0b1001, 0b1001, 0b0110],
        '7' => [0b1111, 0b0001, 0b0010, 0b0010, 0b0100, 0b0100],
        '8' => [0b0110, 0b1001, 0b0110, 0b1001, 0b1001, 0b0110],
        '9' => [0b0110, 0b1001, 0b1001, 0b0111, 0b0001, 0b0110],
        'A' => [0b0110, 0b1001, 0b1001, 0b1111, 0b1001, 0b1001],
        'B' => [0b1110, 0b1001, 0b1110, 0b1001, 0b1001, 0b1110],
        'C' => [0b0110, 0b1001, 0b1000, 0b1000, 0b1001, 0b0110],
        'D' => [0b1110, 0b1001, 0b1001, 0b1001, 0b1001, 0b1110],
        'E' => [0b1111, 0b1000, 0b1110, 0b1000, 0b1000, 0b1111],
        'F' => [0b1111, 0b1000, 0b1110, 0b1000, 0b1000, 0b1000],
        'G' => [0b0110, 0b1000, 0b1011, 0b1001, 0b1001, 0b0111],
        'H' => [0b1001, 0b1001, 0b1111, 0b1001, 0b1001, 0b1001],
        'I' => [0b0111, 0b0010, 0b0010, 0b0010, 0b0010, 0b0111],
        'J' => [0b0001, 0b0001, 0b0001, 0b0001, 0b1001, 0b0110],
        'K' => [0b1001, 0b1010, 0b1100, 0b1100, 0b1010, 0b1001],
        'L' => [0b1000, 0b1000, 0b1000, 0b1000, 0b1000, 0b1111],
        'M' => [0b1001, 0b1111, 0b1111, 0b1001, 0b1001, 0b1001],
        'N' => [0b1001, 0b1101, 0b1111, 0b1011, 0b1001, 0b1001],
        'O' => [0b0110, 0b1001, 0b1001, 0b1001, 0b1001, 0b0110],
        'P' => [0b1110, 0b1001, 0b1001, 0b1110, 0b1000, 0b1000],
        'Q' => [0b0110, 0b1001, 0b1001, 0b1001, 0b1010, 0b0101],
        'R' => [0b1110, 0b1001, 0b1001, 0b1110, 0b1010, 0b1001],
        'S' => [0b0111, 0b1000, 0b0110, 0b0001, 0b0001, 0b1110],
        'T' => [0b1111, 0b0010, 0b0010, 0b0010, 0b0010, 0b0010],
        'U' => [0b1001, 0b1001, 0b1001, 0b1001, 0b1001, 0b0110],
        'V' => [0b1001, 0b1001, 0b1001, 0b1001, 0b0110, 0b0110],
        'W' => [0b1001, 0b1001, 0b1001, 0b1111, 0b1111, 0b1001],
        'X' => [0b1001, 0b1001, 0b0110, 0b0110, 0b1001, 0b1001],
        'Y' => [0b1001, 0b1001, 0b0110, 0b0010, 0b0010, 0b0010],
        'Z' => [0b1111, 0b0001, 0b0010, 0b0100, 0b1000, 0b1111],
        '%' => [0b1001, 0b0001, 0b0010, 0b0100, 0b1000, 0b1001],
        ':' => [0b0000, 0b0010, 0b0000, 0b0000, 0b0010, 0b0000],
        '-' => [0b0000, 0b0000, 0b1111, 0b0000, 0b0000, 0b0000],
        '/' => [0b0001, 0b0001, 0b0010, 0b0100, 0b1000, 0b1000],
        '.' => [0b0000, 0b0000, 0b0000, 0b0000, 0b0000, 0b0010],
        '(' => [0b0010, 0b0100, 0b0100, 0b0100, 0b0100, 0b0010],
        ')' => [0b0100, 0b0010, 0b0010, 0b0010, 0b0010, 0b0100],
        ' ' => [0; 6],
        _ => [0b0000, 0b0000, 0b0110, 0b0110, 0b0000, 0b0000],
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

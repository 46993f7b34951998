//! Window presentation and key polling via `minifb`.
//!
//! The visualizer owns the window; per frame it presents one [`Frame`]
//! and translates held/pressed keys into [`SimSteer`] inputs plus a
//! quit flag. In camera mode the steering inputs are simply ignored by
//! the source.

use anyhow::anyhow;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use crate::frame::Frame;
use crate::source::SimSteer;

/// What the window reported for this frame.
#[derive(Debug, Default)]
pub struct InputState {
    pub steers: Vec<SimSteer>,
    pub quit: bool,
}

pub struct Visualizer {
    window: Window,
    width: usize,
    height: usize,
}

impl Visualizer {
    pub fn new(width: usize, height: usize, frame_wait_ms: u64) -> anyhow::Result<Self> {
        let mut window = Window::new(
            "Hand Volume Control",
            width,
            height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| anyhow!("Failed to open window: {}", e))?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(frame_wait_ms)));

        Ok(Visualizer {
            window,
            width,
            height,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Sample the keyboard. Held keys repeat every frame so the sim
    /// hand moves continuously; toggles fire once per press.
    pub fn poll_input(&mut self) -> InputState {
        let mut input = InputState::default();
        if !self.window.is_open() {
            input.quit = true;
            return input;
        }

        if self.window.is_key_pressed(Key::Q, KeyRepeat::No) {
            input.quit = true;
            return input;
        }
        if self.window.is_key_pressed(Key::H, KeyRepeat::No) {
            input.steers.push(SimSteer::ToggleHand);
        }

        let held = [
            (Key::O, SimSteer::Open),
            (Key::C, SimSteer::Close),
            (Key::Left, SimSteer::MoveLeft),
            (Key::Right, SimSteer::MoveRight),
            (Key::Up, SimSteer::MoveUp),
            (Key::Down, SimSteer::MoveDown),
        ];
        for (key, steer) in held {
            if self.window.is_key_down(key) {
                input.steers.push(steer);
            }
        }
        input
    }

    /// Present one frame. Frames of the wrong size are reported rather
    /// than letting minifb panic.
    pub fn present(&mut self, frame: &Frame) -> anyhow::Result<()> {
        if frame.width() != self.width || frame.height() != self.height {
            return Err(anyhow!(
                "Frame size {}x{} does not match window {}x{}",
                frame.width(),
                frame.height(),
                self.width,
                self.height
            ));
        }
        self.window
            .update_with_buffer(frame.pixels(), self.width, self.height)
            .map_err(|e| anyhow!("Window update failed: {}", e))
    }
}

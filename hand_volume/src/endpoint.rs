//! Volume endpoint backends.
//!
//! The real backend drives MIDI CC#7 (channel volume) on the first
//! usable output port, so any connected synthesizer tracks the hand.
//! When no port can be opened the application runs in
//! visualization-only mode — the mapper simply has no endpoint.

use volume_map::{VolumeEndpoint, VolumeRange};

/// MIDI continuous controller number for channel volume.
const CC_VOLUME: u8 = 7;

/// Native level range of a MIDI controller value.
const MIDI_RANGE: (f64, f64) = (0.0, 127.0);

// ════════════════════════════════════════════════════════════════════════════
// MidiVolume — midir backend
// ════════════════════════════════════════════════════════════════════════════

pub struct MidiVolume {
    conn: midir::MidiOutputConnection,
    channel: u8,
    /// Last value sent, to suppress duplicate messages.
    last_sent: Option<u8>,
}

impl VolumeEndpoint for MidiVolume {
    fn range(&self) -> VolumeRange {
        VolumeRange::new(MIDI_RANGE.0, MIDI_RANGE.1)
    }

    fn set_level(&mut self, level: f64) {
        let value = cc_value(level);
        if self.last_sent == Some(value) {
            return;
        }
        let _ = self
            .conn
            .send(&[0xB0 | (self.channel & 0x0F), CC_VOLUME, value]);
        self.last_sent = Some(value);
    }
}

/// Round and clamp a native-range level to a 7-bit controller value.
fn cc_value(level: f64) -> u8 {
    if level.is_nan() {
        return 0;
    }
    level.round().clamp(MIDI_RANGE.0, MIDI_RANGE.1) as u8
}

// ════════════════════════════════════════════════════════════════════════════
// open_endpoint — enumerate ports and pick the first usable one
// ════════════════════════════════════════════════════════════════════════════

/// Try to open a volume endpoint on the first available MIDI output
/// port, preferring a softsynth. Returns `None` (visualization-only
/// mode) when nothing can be opened — never an error, because audio
/// setup failure is non-fatal by design.
pub fn open_endpoint(channel: u8) -> Option<Box<dyn VolumeEndpoint>> {
    let midi_out = match midir::MidiOutput::new("hand_volume") {
        Ok(m) => m,
        Err(e) => {
            log::warn!("MIDI init error: {} — volume display only", e);
            return None;
        }
    };

    let ports = midi_out.ports();
    if ports.is_empty() {
        log::warn!("No MIDI output ports found — volume display only.");
        log::warn!("Connect a synthesiser (fluidsynth, timidity, a GS wavetable) to control real volume.");
        return None;
    }

    // Prefer a softsynth if visible
    let port_idx = ports
        .iter()
        .enumerate()
        .find(|(_, p)| {
            midi_out
                .port_name(p)
                .map(|n| {
                    let n = n.to_lowercase();
                    n.contains("fluid")
                        || n.contains("timidity")
                        || n.contains("microsoft")
                        || n.contains("synth")
                })
                .unwrap_or(false)
        })
        .map(|(i, _)| i)
        .unwrap_or(0);

    let port = &ports[port_idx];
    let name = midi_out
        .port_name(port)
        .unwrap_or_else(|_| "Unknown".to_string());

    match midi_out.connect(port, "hand-volume") {
        Ok(conn) => {
            log::info!("Volume endpoint: MIDI CC#7 on port {}", name);
            Some(Box::new(MidiVolume {
                conn,
                channel,
                last_sent: None,
            }))
        }
        Err(e) => {
            log::warn!("Failed to connect to {}: {} — volume display only", name, e);
            None
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
    fn cc_value_rounds_and_clamps() {
        assert_eq!(cc_value(0.0), 0);
        assert_eq!(cc_value(127.0), 127);
        assert_eq!(cc_value(63.4), 63);
        assert_eq!(cc_value(63.6), 64);
        assert_eq!(cc_value(-12.0), 0);
        assert_eq!(cc_value(300.0), 127);
    }

    #[test]
    fn cc_value_handles_non_finite() {
        assert_eq!(cc_value(f64::NAN), 0);
        assert_eq!(cc_value(f64::INFINITY), 127);
    }
}

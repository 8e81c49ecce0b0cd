//! Instrument definitions: channel, program, and the playable envelope
//! (pitch and velocity ranges) every resolved note is clamped into.

use serde::{Deserialize, Serialize};

/// One performer in the arrangement, mapped to a MIDI channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// Display name used for track names and statistics.
    #[serde(default)]
    pub name: String,
    /// MIDI channel (0–15). Unique per instrument.
    #[serde(alias = "channel")]
    pub midi_channel: u8,
    /// General MIDI program number.
    #[serde(default, alias = "program")]
    pub program_number: u8,
    /// Velocity used when a pattern declares none.
    #[serde(default = "Instrument::default_velocity")]
    pub default_velocity: u8,
    /// Inclusive velocity bounds.
    #[serde(default = "Instrument::default_velocity_range")]
    pub velocity_range: (u8, u8),
    /// Inclusive pitch bounds.
    #[serde(default = "Instrument::default_note_range")]
    pub note_range: (u8, u8),
    /// Fixed note for single-pitch percussion layers.
    #[serde(default)]
    pub drum_note: Option<u8>,
}

impl Instrument {
    fn default_velocity() -> u8 {
        100
    }

    fn default_velocity_range() -> (u8, u8) {
        (1, 127)
    }

    fn default_note_range() -> (u8, u8) {
        (0, 127)
    }

    /// Pull a pitch into the playable range. Out-of-range pitches move to the
    /// nearest bound; they are never dropped.
    pub fn clamp_pitch(&self, pitch: i32) -> u8 {
        let (lo, hi) = self.note_range;
        pitch.clamp(lo as i32, hi as i32) as u8
    }

    /// Pull a velocity into the instrument's velocity range.
    pub fn clamp_velocity(&self, velocity: i32) -> u8 {
        let (lo, hi) = self.velocity_range;
        velocity.clamp(lo as i32, hi as i32) as u8
    }

    /// The note a `drum_note` source plays: the configured drum note, or the
    /// bottom of the note range.
    pub fn fixed_note(&self) -> u8 {
        self.drum_note.unwrap_or(self.note_range.0)
    }

    /// Name for display, falling back to the given id.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        if self.name.is_empty() {
            id
        } else {
            &self.name
        }
    }
}

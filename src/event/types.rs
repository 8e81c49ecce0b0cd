//! Event data model: the engine's output unit.
//!
//! An [`Event`] is one sounding note at an absolute tick: which instrument
//! plays it, its pitch, velocity and length. Events are created once by the
//! section realizer and never mutated afterwards.

use std::fmt;

/// Identifies an instrument by its configured id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstrumentId(pub String);

impl InstrumentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstrumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A single scheduled note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Owning instrument.
    pub instrument: InstrumentId,
    /// MIDI channel of the owning instrument (0–15), used for tie-breaking.
    pub channel: u8,
    /// Absolute start position in ticks.
    pub tick: u64,
    /// MIDI note number, already clamped to the instrument's range.
    pub pitch: u8,
    /// MIDI velocity, already clamped to the instrument's range.
    pub velocity: u8,
    /// Length in ticks. Always > 0.
    pub duration: u64,
}

impl Event {
    /// Tick at which the note stops sounding.
    pub fn end_tick(&self) -> u64 {
        self.tick + self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(tick: u64, duration: u64) -> Event {
        Event {
            instrument: InstrumentId::from("piano"),
            channel: 0,
            tick,
            pitch: 60,
            velocity: 80,
            duration,
        }
    }

    #[test]
    fn end_tick_adds_duration() {
        assert_eq!(note(480, 240).end_tick(), 720);
    }

    #[test]
    fn instrument_id_display() {
        let id = InstrumentId::from("bass");
        assert_eq!(id.to_string(), "bass");
        assert_eq!(id.as_str(), "bass");
    }
}

//! MIDI file output and inspection.

pub mod inspect;
pub mod writer;

pub use inspect::inspect;
pub use writer::{song_to_smf, write_midi};

use std::fmt;

/// Errors from writing or reading a MIDI file.
#[derive(Debug)]
pub enum MidiError {
    Io(std::io::Error),
    Parse(midly::Error),
    /// Two consecutive events of a track are further apart than a delta
    /// time can encode.
    DeltaOverflow { track: String, tick: u64, delta: u64 },
}

impl fmt::Display for MidiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "MIDI I/O error: {e}"),
            Self::Parse(e) => write!(f, "invalid MIDI file: {e}"),
            Self::DeltaOverflow { track, tick, delta } => write!(
                f,
                "track '{track}': gap of {delta} ticks before tick {tick} exceeds the MIDI delta range"
            ),
        }
    }
}

impl std::error::Error for MidiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::DeltaOverflow { .. } => None,
        }
    }
}

impl From<std::io::Error> for MidiError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<midly::Error> for MidiError {
    fn from(e: midly::Error) -> Self {
        Self::Parse(e)
    }
}

//! Event model: tick grid, note events, and the ordered song timeline.
//!
//! The realizer produces [`Event`]s against a [`Meter`]; the assembler
//! collects them on a [`Timeline`] which yields the final, deterministic
//! ordering handed to the MIDI writer.

pub mod meter;
pub mod timeline;
pub mod types;

pub use meter::{Meter, Subdivision, DEFAULT_BEATS_PER_BAR, DEFAULT_TICKS_PER_BEAT};
pub use timeline::Timeline;
pub use types::{Event, InstrumentId};

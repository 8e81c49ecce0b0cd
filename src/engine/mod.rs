//! Generation engine: turns a [`SongConfig`] into a sorted event list.
//!
//! [`generate`] takes the humanization generator from the caller;
//! [`generate_seeded`] builds a `ChaCha8Rng` from a seed so identical
//! inputs reproduce identical output.

pub mod section;
pub mod song;
pub mod step;

pub use section::SectionRealizer;
pub use song::{assemble, SectionSpan};
pub use step::{StepResolver, StepValues};

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::config::{Instrument, Metadata, SongConfig};
use crate::error::GenerateError;
use crate::event::Event;

/// A realized song: pass-through metadata, the instruments that play it,
/// and every note in final order.
#[derive(Debug, Clone)]
pub struct GeneratedSong {
    pub metadata: Metadata,
    pub instruments: BTreeMap<String, Instrument>,
    pub events: Vec<Event>,
    pub sections: Vec<SectionSpan>,
}

/// Per-instrument note count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackStats {
    pub instrument: String,
    pub name: String,
    pub channel: u8,
    pub notes: usize,
}

/// Summary of a generated song.
#[derive(Debug, Clone, PartialEq)]
pub struct SongStats {
    pub title: String,
    pub tempo: f64,
    pub total_notes: usize,
    pub total_tracks: usize,
    pub end_tick: u64,
    /// Ordered by channel.
    pub tracks: Vec<TrackStats>,
}

impl GeneratedSong {
    /// Instruments ordered by MIDI channel, the order tracks are written in.
    pub fn instruments_by_channel(&self) -> Vec<(&str, &Instrument)> {
        let mut list: Vec<(&str, &Instrument)> = self
            .instruments
            .iter()
            .map(|(id, inst)| (id.as_str(), inst))
            .collect();
        list.sort_by_key(|(_, inst)| inst.midi_channel);
        list
    }

    /// Latest tick at which any note is still sounding, or the end of the
    /// last section if that is later.
    pub fn end_tick(&self) -> u64 {
        let notes = self.events.iter().map(Event::end_tick).max().unwrap_or(0);
        let bars = self.sections.last().map_or(0, |s| s.end_tick);
        notes.max(bars)
    }

    pub fn stats(&self) -> SongStats {
        let tracks: Vec<TrackStats> = self
            .instruments_by_channel()
            .into_iter()
            .map(|(id, inst)| TrackStats {
                instrument: id.to_string(),
                name: inst.display_name(id).to_string(),
                channel: inst.midi_channel,
                notes: self
                    .events
                    .iter()
                    .filter(|e| e.instrument.as_str() == id)
                    .count(),
            })
            .collect();
        SongStats {
            title: self.metadata.title.clone(),
            tempo: self.metadata.tempo,
            total_notes: self.events.len(),
            total_tracks: tracks.len(),
            end_tick: self.end_tick(),
            tracks,
        }
    }
}

/// Generate a song, drawing humanization jitter from `rng`.
pub fn generate<R: Rng + ?Sized>(
    config: &SongConfig,
    rng: &mut R,
) -> Result<GeneratedSong, GenerateError> {
    let (events, sections) = assemble(config, rng)?;
    let song = GeneratedSong {
        metadata: config.metadata.clone(),
        instruments: config.instruments.clone(),
        events,
        sections,
    };
    info!(
        title = song.metadata.title.as_str(),
        events = song.events.len(),
        end_tick = song.end_tick(),
        "generated song"
    );
    Ok(song)
}

/// Generate a song with a generator seeded from `seed`.
pub fn generate_seeded(config: &SongConfig, seed: u64) -> Result<GeneratedSong, GenerateError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate(config, &mut rng)
}

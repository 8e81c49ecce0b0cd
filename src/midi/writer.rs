//! Standard MIDI File output.
//!
//! Format 1: track 0 holds the conductor meta events (title, tempo, time
//! signature); every instrument gets its own track in channel order with a
//! name and a program change ahead of its notes.

use std::path::Path;

use midly::{
    num::{u4, u7, u15, u24, u28},
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
};

use crate::config::Metadata;
use crate::engine::GeneratedSong;
use crate::event::Event;

use super::MidiError;

const MAX_DELTA: u64 = 0x0FFF_FFFF;
const MAX_TEMPO: u32 = 0x00FF_FFFF;

/// Render a song and write it to `path`.
pub fn write_midi(song: &GeneratedSong, path: &Path) -> Result<(), MidiError> {
    let smf = song_to_smf(song)?;
    let mut buf = Vec::new();
    smf.write_std(&mut buf)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &buf)?;
    Ok(())
}

/// Render a song to an in-memory SMF borrowing its names.
///
/// Fails if two consecutive events of a track are further apart than a
/// variable-length delta can hold.
pub fn song_to_smf(song: &GeneratedSong) -> Result<Smf<'_>, MidiError> {
    let meta = &song.metadata;
    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(meta.ticks_per_beat.min(0x7fff) as u16)),
    ));
    smf.tracks.push(conductor_track(meta));

    for (id, inst) in song.instruments_by_channel() {
        let channel = u4::new(inst.midi_channel.min(15));
        let mut track: Track<'_> = vec![
            TrackEvent {
                delta: u28::new(0),
                kind: TrackEventKind::Meta(MetaMessage::TrackName(
                    inst.display_name(id).as_bytes(),
                )),
            },
            TrackEvent {
                delta: u28::new(0),
                kind: TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::ProgramChange {
                        program: u7::new(inst.program_number.min(127)),
                    },
                },
            },
        ];
        let notes = song.events.iter().filter(|e| e.instrument.as_str() == id);
        track.extend(note_messages(id, notes, channel)?);
        track.push(end_of_track());
        smf.tracks.push(track);
    }

    Ok(smf)
}

fn conductor_track(meta: &Metadata) -> Track<'_> {
    let micros = (60_000_000.0 / meta.tempo).round().clamp(1.0, MAX_TEMPO as f64) as u32;
    let (num, den) = meta.time_signature;
    vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TrackName(meta.title.as_bytes())),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(micros))),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TimeSignature(
                num.min(255) as u8,
                den.max(1).trailing_zeros() as u8,
                24,
                8,
            )),
        },
        end_of_track(),
    ]
}

/// Note-on/off pairs as delta-encoded events. At equal ticks note-offs come
/// first so a repeated pitch is released before it restarts.
fn note_messages<'e>(
    id: &str,
    notes: impl Iterator<Item = &'e Event>,
    channel: u4,
) -> Result<Vec<TrackEvent<'static>>, MidiError> {
    // (tick, on?, message)
    let mut timed: Vec<(u64, bool, MidiMessage)> = Vec::new();
    for e in notes {
        let key = u7::new(e.pitch.min(127));
        timed.push((
            e.tick,
            true,
            MidiMessage::NoteOn {
                key,
                vel: u7::new(e.velocity.clamp(1, 127)),
            },
        ));
        timed.push((
            e.end_tick(),
            false,
            MidiMessage::NoteOff {
                key,
                vel: u7::new(0),
            },
        ));
    }
    timed.sort_by_key(|&(tick, on, _)| (tick, on));

    let mut last = 0u64;
    timed
        .into_iter()
        .map(|(tick, _, message)| {
            let delta = tick - last;
            if delta > MAX_DELTA {
                return Err(MidiError::DeltaOverflow {
                    track: id.to_string(),
                    tick,
                    delta,
                });
            }
            last = tick;
            Ok(TrackEvent {
                delta: u28::new(delta as u32),
                kind: TrackEventKind::Midi { channel, message },
            })
        })
        .collect()
}

fn end_of_track() -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    }
}

//! Human-readable dump of a Standard MIDI File.

use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};

use super::MidiError;

/// Parse `bytes` and list its events, at most `limit` per track.
///
/// Each event line shows its index, absolute tick, and (for metrical files)
/// its position in beats.
pub fn inspect(bytes: &[u8], limit: usize) -> Result<Vec<String>, MidiError> {
    let smf = Smf::parse(bytes)?;
    let ticks_per_beat = match smf.header.timing {
        Timing::Metrical(t) => Some(t.as_int() as f64),
        Timing::Timecode(..) => None,
    };

    let mut lines = vec![
        format!("Format: {:?}", smf.header.format),
        match ticks_per_beat {
            Some(t) => format!("Ticks per beat: {t}"),
            None => "Ticks per beat: timecode".to_string(),
        },
        format!("Tracks: {}", smf.tracks.len()),
    ];

    for (n, track) in smf.tracks.iter().enumerate() {
        lines.push(format!("Track {n}:"));
        let mut tick = 0u64;
        for (i, event) in track.iter().enumerate() {
            if i >= limit {
                lines.push(format!("  ... ({} more events)", track.len() - limit));
                break;
            }
            tick += event.delta.as_int() as u64;
            let beat = ticks_per_beat
                .map(|t| format!(" (beat {:6.2})", tick as f64 / t))
                .unwrap_or_default();
            lines.push(format!("  {i:4}: tick {tick:6}{beat} - {}", describe(&event.kind)));
        }
    }
    Ok(lines)
}

fn describe(kind: &TrackEventKind<'_>) -> String {
    match kind {
        TrackEventKind::Midi { channel, message } => {
            let ch = channel.as_int();
            match message {
                MidiMessage::NoteOn { key, vel } => {
                    format!("note_on channel={ch} note={} velocity={}", key.as_int(), vel.as_int())
                }
                MidiMessage::NoteOff { key, vel } => {
                    format!("note_off channel={ch} note={} velocity={}", key.as_int(), vel.as_int())
                }
                MidiMessage::ProgramChange { program } => {
                    format!("program_change channel={ch} program={}", program.as_int())
                }
                other => format!("{other:?} channel={ch}"),
            }
        }
        TrackEventKind::Meta(MetaMessage::Tempo(us)) => {
            format!("tempo {:.1} BPM", 60_000_000.0 / us.as_int().max(1) as f64)
        }
        TrackEventKind::Meta(MetaMessage::TrackName(name)) => {
            format!("track_name {:?}", String::from_utf8_lossy(name))
        }
        TrackEventKind::Meta(MetaMessage::TimeSignature(num, pow, _, _)) => {
            format!("time_signature {num}/{}", 1u32 << (*pow).min(7))
        }
        TrackEventKind::Meta(MetaMessage::EndOfTrack) => "end_of_track".to_string(),
        other => format!("{other:?}"),
    }
}

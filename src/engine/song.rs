//! Song assembler: lays sections end to end and orders the result.

use rand::Rng;
use tracing::debug;

use crate::config::SongConfig;
use crate::error::GenerateError;
use crate::event::{Event, Timeline};

use super::section::SectionRealizer;

/// Where a performed section landed on the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSpan {
    pub name: String,
    pub start_tick: u64,
    pub length_bars: u32,
    pub end_tick: u64,
}

/// Realize every section in performance order.
///
/// Each section starts where the previous one's bars end, regardless of
/// notes ringing past the boundary. The returned events are stable-sorted by
/// `(tick, channel)`; on error nothing is returned.
pub fn assemble<R: Rng + ?Sized>(
    config: &SongConfig,
    rng: &mut R,
) -> Result<(Vec<Event>, Vec<SectionSpan>), GenerateError> {
    let realizer = SectionRealizer::new(config);
    let meter = realizer.meter();
    let mut timeline = Timeline::new();
    let mut spans = Vec::with_capacity(config.song_structure.sections.len());
    let mut section_start_tick = 0u64;

    for name in &config.song_structure.sections {
        let section = config
            .song_structure
            .section_definitions
            .get(name)
            .ok_or_else(|| GenerateError::UnknownSection { name: name.clone() })?;

        timeline.insert_batch(realizer.realize(name, section, section_start_tick, rng)?);

        let end_tick = section_start_tick + meter.bars_to_ticks(section.length_bars);
        spans.push(SectionSpan {
            name: name.clone(),
            start_tick: section_start_tick,
            length_bars: section.length_bars,
            end_tick,
        });
        section_start_tick = end_tick;
    }

    debug!(
        sections = spans.len(),
        events = timeline.len(),
        end_tick = timeline.end_tick(),
        "assembled song"
    );
    Ok((timeline.into_events(), spans))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const CONFIG: &str = r#"{
        "instruments": {
            "drums": {"name": "Kit", "midi_channel": 9, "drum_note": 36},
            "keys": {"name": "Keys", "midi_channel": 0}
        },
        "chord_library": {
            "C": {"root_note": 60, "chord_tones": [0, 4, 7], "voicings": {"close": [60, 64, 67]}}
        },
        "pattern_library": {
            "kick": {"note_pattern": [1, 0, 1, 0], "note_source": "drum_note"},
            "comp": {"note_pattern": [1, 1, 1, 1], "note_source": "chord_voicing_close"}
        },
        "song_structure": {
            "sections": ["intro", "verse", "intro"],
            "section_definitions": {
                "intro": {"length_bars": 4, "chord_progression": ["C"],
                          "pattern_assignment": {"drums": "kick"}},
                "verse": {"length_bars": 8, "chord_progression": ["C"],
                          "pattern_assignment": {"drums": "kick", "keys": "comp"}}
            }
        }
    }"#;

    fn run(cfg: &SongConfig) -> Result<(Vec<Event>, Vec<SectionSpan>), GenerateError> {
        assemble(cfg, &mut ChaCha8Rng::seed_from_u64(3))
    }

    #[test]
    fn sections_are_laid_end_to_end() {
        let cfg = SongConfig::from_json_str(CONFIG).unwrap();
        let (_, spans) = run(&cfg).unwrap();
        let starts: Vec<u64> = spans.iter().map(|s| s.start_tick).collect();
        assert_eq!(starts, vec![0, 7680, 23040]);
        assert_eq!(spans[2].end_tick, 30720);
    }

    #[test]
    fn ties_break_by_channel() {
        let cfg = SongConfig::from_json_str(CONFIG).unwrap();
        let (events, _) = run(&cfg).unwrap();
        assert!(events.windows(2).all(|w| w[0].tick <= w[1].tick));
        let at_verse: Vec<u8> = events
            .iter()
            .filter(|e| e.tick == 7680)
            .map(|e| e.channel)
            .collect();
        assert_eq!(at_verse, vec![0, 9]);
    }

    #[test]
    fn unknown_section_fails() {
        let mut cfg = SongConfig::from_json_str(CONFIG).unwrap();
        cfg.song_structure.sections.push("bridge".into());
        assert_eq!(
            run(&cfg).unwrap_err(),
            GenerateError::UnknownSection {
                name: "bridge".into()
            }
        );
    }

    #[test]
    fn empty_structure_yields_no_events() {
        let mut cfg = SongConfig::from_json_str(CONFIG).unwrap();
        cfg.song_structure.sections.clear();
        let (events, spans) = run(&cfg).unwrap();
        assert!(events.is_empty());
        assert!(spans.is_empty());
    }
}

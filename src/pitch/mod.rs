//! Pitch resolution: turns a pattern step into concrete MIDI pitches.
//!
//! A pattern's `note_source` string is parsed once into a [`NoteSource`] and
//! bundled with the pattern's generator parameters in a [`PitchResolver`].
//! The resolver is then asked for pitches step by step with a
//! [`StepContext`] describing the bar being realized.
//!
//! Every pitch leaves the resolver clamped to the owning instrument's
//! `note_range`.

pub mod arpeggio;
pub mod scale;
pub mod walking;

use std::fmt;

use crate::config::{Chord, Instrument, MelodicDirection, Pattern};
use crate::error::GenerateError;
use crate::event::Meter;

use arpeggio::arpeggio_pitch;
use scale::scale_pitch;
use walking::WalkingLine;

/// Which strategy supplies a step's pitch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteSource {
    /// The chord's bass note.
    BassNote,
    /// The Nth pitch (1-indexed by selector) of a named voicing.
    ChordVoicing(String),
    /// Every pitch of a named voicing at once.
    ChordStack(String),
    /// A degree of a named scale built on the chord root.
    Scale(String),
    ArpeggioUp,
    ArpeggioDown,
    Walking,
    /// The instrument's fixed percussion note.
    DrumNote,
}

impl NoteSource {
    /// Parse a `note_source` specifier. Returns `None` for anything
    /// unrecognised, including prefixed forms with an empty name.
    pub fn parse(text: &str) -> Option<Self> {
        let named = |prefix: &str| {
            text.strip_prefix(prefix)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
        };
        match text {
            "bass_note" => Some(Self::BassNote),
            "drum_note" => Some(Self::DrumNote),
            "walking_pattern" | "walking_bass" => Some(Self::Walking),
            "arpeggio_up" => Some(Self::ArpeggioUp),
            "arpeggio_down" => Some(Self::ArpeggioDown),
            _ => named("chord_voicing_")
                .map(Self::ChordVoicing)
                .or_else(|| named("chord_stack_").map(Self::ChordStack))
                .or_else(|| named("scale_").map(Self::Scale)),
        }
    }
}

impl fmt::Display for NoteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BassNote => f.write_str("bass_note"),
            Self::ChordVoicing(v) => write!(f, "chord_voicing_{v}"),
            Self::ChordStack(v) => write!(f, "chord_stack_{v}"),
            Self::Scale(s) => write!(f, "scale_{s}"),
            Self::ArpeggioUp => f.write_str("arpeggio_up"),
            Self::ArpeggioDown => f.write_str("arpeggio_down"),
            Self::Walking => f.write_str("walking_pattern"),
            Self::DrumNote => f.write_str("drum_note"),
        }
    }
}

/// Where in the song a step is being resolved.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    /// Symbol of the active chord, for error messages.
    pub chord_symbol: &'a str,
    pub chord: &'a Chord,
    /// Chord of the following bar (cyclic within the section).
    pub next_chord: &'a Chord,
    pub instrument: &'a Instrument,
    pub meter: Meter,
    pub step_index: usize,
    pub step_count: usize,
    /// The nonzero `note_pattern` value at this step.
    pub selector: u8,
}

/// A pattern's pitch strategy with its parameters, selected once.
#[derive(Debug, Clone)]
pub struct PitchResolver {
    source: NoteSource,
    direction: MelodicDirection,
    start_degree: i32,
    arpeggio_octaves: u32,
    walking: WalkingLine,
}

impl PitchResolver {
    /// Build the resolver for a pattern, failing on an unparseable source.
    pub fn for_pattern(name: &str, pattern: &Pattern) -> Result<Self, GenerateError> {
        let source =
            NoteSource::parse(&pattern.note_source).ok_or_else(|| GenerateError::InvalidNoteSource {
                pattern: name.to_string(),
                source: pattern.note_source.clone(),
            })?;
        Ok(Self {
            source,
            direction: pattern.melodic_direction,
            start_degree: pattern.scale_start_degree,
            arpeggio_octaves: pattern.arpeggio_octaves,
            walking: WalkingLine {
                algorithm: pattern.walking_algorithm,
                approach_distance: pattern.approach_distance,
            },
        })
    }

    pub fn source(&self) -> &NoteSource {
        &self.source
    }

    /// Resolve the pitches sounding at a step. Every source except
    /// [`NoteSource::ChordStack`] yields exactly one pitch.
    pub fn resolve(&self, ctx: &StepContext<'_>) -> Result<Vec<u8>, GenerateError> {
        let clamp = |p: i32| ctx.instrument.clamp_pitch(p);
        let root = ctx.chord.root_note as i32;

        let pitch = match &self.source {
            NoteSource::BassNote => ctx.chord.bass() as i32,
            NoteSource::DrumNote => ctx.instrument.fixed_note() as i32,
            NoteSource::ChordVoicing(name) => {
                let voicing = self.voicing(ctx, name)?;
                let idx = (ctx.selector as usize).saturating_sub(1).min(voicing.len() - 1);
                voicing[idx] as i32
            }
            NoteSource::ChordStack(name) => {
                let voicing = self.voicing(ctx, name)?;
                return Ok(voicing.iter().map(|&p| clamp(p as i32)).collect());
            }
            NoteSource::Scale(name) => {
                let scale = ctx.chord.scale(name).ok_or_else(|| GenerateError::UnknownScale {
                    chord: ctx.chord_symbol.to_string(),
                    scale: name.clone(),
                })?;
                let selector = self.direction.apply(ctx.selector as i32, ctx.step_index);
                scale_pitch(root, scale, self.start_degree, selector)
            }
            NoteSource::ArpeggioUp => arpeggio_pitch(
                root,
                ctx.chord.tones(),
                self.arpeggio_octaves,
                ctx.step_index,
                false,
            ),
            NoteSource::ArpeggioDown => arpeggio_pitch(
                root,
                ctx.chord.tones(),
                self.arpeggio_octaves,
                ctx.step_index,
                true,
            ),
            NoteSource::Walking => self.walking.pitch(
                ctx.chord,
                ctx.next_chord,
                ctx.meter,
                ctx.step_index,
                ctx.step_count,
            ),
        };
        Ok(vec![clamp(pitch)])
    }

    /// A non-empty voicing of the active chord.
    fn voicing<'c>(&self, ctx: &StepContext<'c>, name: &str) -> Result<&'c [u8], GenerateError> {
        ctx.chord
            .voicing(name)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| GenerateError::UnknownVoicing {
                chord: ctx.chord_symbol.to_string(),
                voicing: name.to_string(),
            })
    }
}

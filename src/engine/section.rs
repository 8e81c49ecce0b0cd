//! Measure/section realizer: expands one section into events.
//!
//! Bars are walked in order; within a bar every assigned instrument is
//! walked in id order, and within an instrument every pattern step in
//! order. That order is also the order humanization draws from the
//! generator, so it must not change between runs.

use rand::Rng;
use tracing::{debug, warn};

use crate::config::{Chord, Instrument, Pattern, SectionDefinition, SongConfig};
use crate::error::GenerateError;
use crate::event::{Event, InstrumentId, Meter};
use crate::modifier::{ModifierStack, StepPosition};
use crate::pitch::{NoteSource, PitchResolver, StepContext};

use super::step::StepResolver;

/// One instrument's pattern, prepared for a section.
struct Lane<'a> {
    id: &'a str,
    instrument: &'a Instrument,
    pattern: &'a Pattern,
    pitch: PitchResolver,
    values: StepResolver<'a>,
}

/// Realizes sections of one song against its libraries and modifiers.
pub struct SectionRealizer<'a> {
    config: &'a SongConfig,
    meter: Meter,
    modifiers: ModifierStack<'a>,
}

impl<'a> SectionRealizer<'a> {
    pub fn new(config: &'a SongConfig) -> Self {
        let meter = config.meter();
        Self {
            config,
            meter,
            modifiers: ModifierStack::new(&config.global_modifiers, meter),
        }
    }

    pub fn meter(&self) -> Meter {
        self.meter
    }

    /// Realize `section` starting at `start_tick`. Events come back in
    /// (bar, instrument, step) order, not globally sorted.
    pub fn realize<R: Rng + ?Sized>(
        &self,
        name: &str,
        section: &SectionDefinition,
        start_tick: u64,
        rng: &mut R,
    ) -> Result<Vec<Event>, GenerateError> {
        let lanes = self.lanes(name, section)?;
        let needs_next = lanes
            .iter()
            .any(|l| matches!(l.pitch.source(), NoteSource::Walking));
        let ticks_per_bar = self.meter.ticks_per_bar();
        let mut events = Vec::new();

        for bar in 0..section.length_bars {
            let (symbol, chord) = self.chord(name, section, bar)?;
            let next_chord = if needs_next {
                self.chord(name, section, bar + 1)?.1
            } else {
                chord
            };
            let bar_start = start_tick + bar as u64 * ticks_per_bar;

            for lane in &lanes {
                let step_count = lane.pattern.step_count();
                let ticks_per_step = lane.values.ticks_per_step();

                for (step, &selector) in lane.pattern.note_pattern.iter().enumerate() {
                    if selector == 0 {
                        continue;
                    }
                    let pitches = lane.pitch.resolve(&StepContext {
                        chord_symbol: symbol,
                        chord,
                        next_chord,
                        instrument: lane.instrument,
                        meter: self.meter,
                        step_index: step,
                        step_count,
                        selector,
                    })?;
                    let values = lane.values.resolve(step);
                    if values.is_silent() {
                        continue;
                    }

                    let bar_tick = step as u64 * ticks_per_step;
                    let pos = StepPosition {
                        section: name,
                        bar_index: bar,
                        length_bars: section.length_bars,
                        bar_tick,
                    };
                    let grid_tick = (bar_start + bar_tick) as i64;
                    let shaped = self.modifiers.apply(
                        rng,
                        &pos,
                        grid_tick.saturating_add(values.offset),
                        values.velocity,
                        lane.instrument,
                    );

                    events.extend(pitches.into_iter().map(|pitch| Event {
                        instrument: InstrumentId::from(lane.id),
                        channel: lane.instrument.midi_channel,
                        tick: shaped.tick,
                        pitch,
                        velocity: shaped.velocity,
                        duration: values.duration,
                    }));
                }
            }
        }

        debug!(
            section = name,
            start_tick,
            bars = section.length_bars,
            events = events.len(),
            "realized section"
        );
        Ok(events)
    }

    /// Resolve the section's instrument → pattern assignment.
    fn lanes(&self, name: &str, section: &SectionDefinition) -> Result<Vec<Lane<'a>>, GenerateError> {
        let config = self.config;
        let mut lanes = Vec::with_capacity(section.pattern_assignment.len());
        for (inst_id, pattern_name) in &section.pattern_assignment {
            let (id, instrument) = config.instruments.get_key_value(inst_id).ok_or_else(|| {
                GenerateError::UnknownInstrumentReference {
                    section: name.to_string(),
                    instrument: inst_id.clone(),
                }
            })?;
            let pattern = config.pattern_library.get(pattern_name).ok_or_else(|| {
                GenerateError::UnknownPattern {
                    section: name.to_string(),
                    pattern: pattern_name.clone(),
                }
            })?;
            if !self.meter.divides_evenly(pattern.step_count()) {
                warn!(
                    pattern = pattern_name.as_str(),
                    steps = pattern.step_count(),
                    ticks_per_bar = self.meter.ticks_per_bar(),
                    "step count does not divide the bar evenly"
                );
            }
            lanes.push(Lane {
                id: id.as_str(),
                instrument,
                pattern,
                pitch: PitchResolver::for_pattern(pattern_name, pattern)?,
                values: StepResolver::new(pattern_name, pattern, instrument, self.meter)?,
            });
        }
        Ok(lanes)
    }

    fn chord<'s>(
        &'s self,
        name: &str,
        section: &'s SectionDefinition,
        bar: u32,
    ) -> Result<(&'s str, &'s Chord), GenerateError> {
        let symbol = section.chord_at(bar).unwrap_or_default();
        let chord = self.config.chord_library.get(symbol).ok_or_else(|| {
            GenerateError::UnknownChordSymbol {
                section: name.to_string(),
                symbol: symbol.to_string(),
            }
        })?;
        Ok((symbol, chord))
    }
}

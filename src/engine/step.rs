//! Step value resolution: velocity, duration, and timing offset per step.
//!
//! Each of the three value fields is either a scalar broadcast to every step
//! or a per-step sequence. Sequence lengths are checked once, when the
//! resolver is built, so a mismatch fails the pattern even if the offending
//! step is a rest.

use crate::config::{Instrument, Pattern, StepValue};
use crate::error::GenerateError;
use crate::event::Meter;

/// Resolved values for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepValues {
    /// Clamped to the instrument's velocity range.
    pub velocity: u8,
    /// Ticks. Zero means the step is silenced.
    pub duration: u64,
    /// Signed tick displacement from the grid position.
    pub offset: i64,
}

impl StepValues {
    pub fn is_silent(&self) -> bool {
        self.duration == 0
    }
}

/// Resolves step values for one pattern played by one instrument.
#[derive(Debug, Clone, Copy)]
pub struct StepResolver<'a> {
    pattern: &'a Pattern,
    instrument: &'a Instrument,
    ticks_per_step: u64,
}

impl<'a> StepResolver<'a> {
    /// Build a resolver, failing if any sequence disagrees with the
    /// `note_pattern` length.
    pub fn new(
        name: &str,
        pattern: &'a Pattern,
        instrument: &'a Instrument,
        meter: Meter,
    ) -> Result<Self, GenerateError> {
        let expected = pattern.step_count();
        let fields = [
            ("velocity_pattern", &pattern.velocity_pattern),
            ("duration_pattern", &pattern.duration_pattern),
            ("timing_offset", &pattern.timing_offset),
        ];
        for (field, value) in fields {
            if let Some(found) = value.as_ref().and_then(StepValue::declared_len) {
                if found != expected {
                    return Err(GenerateError::PatternLengthMismatch {
                        pattern: name.to_string(),
                        field,
                        expected,
                        found,
                    });
                }
            }
        }
        Ok(Self {
            pattern,
            instrument,
            ticks_per_step: meter.ticks_per_step(expected),
        })
    }

    pub fn ticks_per_step(&self) -> u64 {
        self.ticks_per_step
    }

    /// Values at `step`. Absent fields fall back to the instrument's default
    /// velocity, one full step of duration, and no offset.
    pub fn resolve(&self, step: usize) -> StepValues {
        let at = |v: &Option<StepValue>| v.as_ref().and_then(|v| v.at(step));

        let velocity = at(&self.pattern.velocity_pattern)
            .map(|v| self.instrument.clamp_velocity(saturate_i32(v)))
            .unwrap_or_else(|| {
                self.instrument
                    .clamp_velocity(self.instrument.default_velocity as i32)
            });
        let duration = at(&self.pattern.duration_pattern)
            .map(|d| d.max(0) as u64)
            .unwrap_or(self.ticks_per_step);
        let offset = at(&self.pattern.timing_offset).unwrap_or(0);

        StepValues {
            velocity,
            duration,
            offset,
        }
    }
}

fn saturate_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> Instrument {
        Instrument {
            name: "Keys".into(),
            midi_channel: 2,
            program_number: 4,
            default_velocity: 70,
            velocity_range: (20, 110),
            note_range: (0, 127),
            drum_note: None,
        }
    }

    fn pattern(json: serde_json::Value) -> Pattern {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn defaults_when_fields_absent() {
        let p = pattern(serde_json::json!({
            "note_pattern": [1, 0, 1, 0],
            "note_source": "bass_note"
        }));
        let inst = keys();
        let r = StepResolver::new("p", &p, &inst, Meter::new(480, 4)).unwrap();
        let v = r.resolve(2);
        assert_eq!(v.velocity, 70);
        assert_eq!(v.duration, 480);
        assert_eq!(v.offset, 0);
    }

    #[test]
    fn scalar_broadcasts_and_sequence_indexes() {
        let p = pattern(serde_json::json!({
            "note_pattern": [1, 1, 1, 1],
            "note_source": "bass_note",
            "velocity_pattern": [100, 60, 90, 50],
            "duration_pattern": 240,
            "timing_offset": [0, 5, 0, -5]
        }));
        let inst = keys();
        let r = StepResolver::new("p", &p, &inst, Meter::new(480, 4)).unwrap();
        assert_eq!(r.resolve(1).velocity, 60);
        assert_eq!(r.resolve(3).duration, 240);
        assert_eq!(r.resolve(3).offset, -5);
    }

    #[test]
    fn velocity_clamped_to_instrument_range() {
        let p = pattern(serde_json::json!({
            "note_pattern": [1, 1],
            "note_source": "bass_note",
            "velocity_pattern": [127, 3]
        }));
        let inst = keys();
        let r = StepResolver::new("p", &p, &inst, Meter::new(480, 4)).unwrap();
        assert_eq!(r.resolve(0).velocity, 110);
        assert_eq!(r.resolve(1).velocity, 20);
    }

    #[test]
    fn zero_or_negative_duration_is_silent() {
        let p = pattern(serde_json::json!({
            "note_pattern": [1, 1, 1],
            "note_source": "bass_note",
            "duration_pattern": [120, 0, -10]
        }));
        let inst = keys();
        let r = StepResolver::new("p", &p, &inst, Meter::new(480, 4)).unwrap();
        assert!(!r.resolve(0).is_silent());
        assert!(r.resolve(1).is_silent());
        assert!(r.resolve(2).is_silent());
    }

    #[test]
    fn length_mismatch_reported_per_field() {
        let p = pattern(serde_json::json!({
            "note_pattern": [1, 0, 1, 0],
            "note_source": "bass_note",
            "duration_pattern": [120, 120, 120]
        }));
        let inst = keys();
        let err = StepResolver::new("comp", &p, &inst, Meter::new(480, 4)).unwrap_err();
        assert_eq!(
            err,
            GenerateError::PatternLengthMismatch {
                pattern: "comp".into(),
                field: "duration_pattern",
                expected: 4,
                found: 3,
            }
        );
    }
}

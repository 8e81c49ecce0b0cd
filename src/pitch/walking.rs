//! Walking-bass generator.
//!
//! Each beat of the bar plays a chord function above the bass (root, 3rd,
//! 5th, 7th by beat position modulo 4). The last beat of the bar instead
//! plays an approach note leading into the next bar's root. Steps that fall
//! between beats repeat their beat's note.
//!
//! Approach direction: from below when the current bass is at or below the
//! next root, from above when it is higher. A repeated root (equal pitches)
//! is therefore approached from below.

use crate::config::{Chord, WalkingAlgorithm};
use crate::event::Meter;

use super::scale::scale_pitch;

/// Walking-line parameters taken from a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkingLine {
    pub algorithm: WalkingAlgorithm,
    pub approach_distance: i32,
}

impl WalkingLine {
    /// Pitch for a step of a bar over `chord`, leading into `next`.
    pub fn pitch(
        &self,
        chord: &Chord,
        next: &Chord,
        meter: Meter,
        step_index: usize,
        step_count: usize,
    ) -> i32 {
        let beats = meter.beats_per_bar();
        let bar_tick = step_index as u64 * meter.ticks_per_step(step_count);
        let beat = (bar_tick / meter.ticks_per_beat() as u64) as u32;
        let bass = chord.bass() as i32;

        if beats > 1 && beat == beats - 1 {
            return self.approach(bass, next);
        }
        bass.saturating_add(chord.function_interval(beat as usize % 4))
    }

    /// Approach note toward the next chord's bass.
    pub fn approach(&self, current_bass: i32, next: &Chord) -> i32 {
        let target = next.bass() as i32;
        let distance = self.approach_distance.saturating_abs();
        let from_below = current_bass <= target;
        let offset = if from_below { -distance } else { distance };

        match (self.algorithm, next.primary_scale()) {
            (WalkingAlgorithm::Diatonic, Some(scale)) => scale_pitch(target, scale, 1, offset),
            _ => target.saturating_add(offset),
        }
    }
}

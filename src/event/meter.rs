//! Musical time grid measured in integer ticks.
//!
//! All positions are integer tick counts relative to a configurable
//! `ticks_per_beat` resolution. Bars are `beats_per_bar` beats long, and a
//! pattern divides each bar into equal steps. No floating-point time is ever
//! accumulated; fractional quantities (swing) are rounded once per event.

use serde::{Deserialize, Serialize};

/// Default resolution when a config leaves `ticks_per_beat` unset.
pub const DEFAULT_TICKS_PER_BEAT: u32 = 480;

/// Default time signature numerator: 4 beats per bar.
pub const DEFAULT_BEATS_PER_BAR: u32 = 4;

/// Subdivision grids that swing can be applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subdivision {
    Eighth,
    Sixteenth,
}

/// The tick grid for one song: resolution plus bar length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meter {
    ticks_per_beat: u32,
    beats_per_bar: u32,
}

impl Meter {
    /// Create a meter. Zero values are clamped to one so the grid never
    /// collapses.
    pub fn new(ticks_per_beat: u32, beats_per_bar: u32) -> Self {
        Self {
            ticks_per_beat: ticks_per_beat.max(1),
            beats_per_bar: beats_per_bar.max(1),
        }
    }

    pub fn ticks_per_beat(self) -> u32 {
        self.ticks_per_beat
    }

    pub fn beats_per_bar(self) -> u32 {
        self.beats_per_bar
    }

    /// Length of one bar in ticks.
    pub fn ticks_per_bar(self) -> u64 {
        self.ticks_per_beat as u64 * self.beats_per_bar as u64
    }

    /// Length of `bars` whole bars in ticks.
    pub fn bars_to_ticks(self, bars: u32) -> u64 {
        bars as u64 * self.ticks_per_bar()
    }

    /// Length of one pattern step when a bar is split into `step_count` steps.
    ///
    /// Integer division: a step count that does not divide the bar leaves a
    /// short remainder at the end of the bar.
    pub fn ticks_per_step(self, step_count: usize) -> u64 {
        if step_count == 0 {
            return self.ticks_per_bar();
        }
        self.ticks_per_bar() / step_count as u64
    }

    /// Whether a bar splits into `step_count` steps without remainder.
    pub fn divides_evenly(self, step_count: usize) -> bool {
        step_count > 0 && self.ticks_per_bar() % step_count as u64 == 0
    }

    /// Length of a swing subdivision in ticks.
    pub fn subdivision_ticks(self, subdivision: Subdivision) -> u64 {
        match subdivision {
            Subdivision::Eighth => self.ticks_per_beat as u64 / 2,
            Subdivision::Sixteenth => self.ticks_per_beat as u64 / 4,
        }
    }

    /// Whether a bar-relative tick sits on the "off" half of a subdivision
    /// pair (the second eighth or second sixteenth of its group).
    pub fn is_off_subdivision(self, bar_tick: u64, subdivision: Subdivision) -> bool {
        let len = self.subdivision_ticks(subdivision);
        if len == 0 || bar_tick % len != 0 {
            return false;
        }
        (bar_tick / len) % 2 == 1
    }

    /// 1-based beat number of a bar-relative tick, if it falls exactly on a
    /// beat boundary.
    pub fn beat_number(self, bar_tick: u64) -> Option<u32> {
        let tpb = self.ticks_per_beat as u64;
        if bar_tick % tpb != 0 {
            return None;
        }
        Some((bar_tick / tpb) as u32 + 1)
    }
}

impl Default for Meter {
    fn default() -> Self {
        Self::new(DEFAULT_TICKS_PER_BEAT, DEFAULT_BEATS_PER_BAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_time_bar_length() {
        let m = Meter::new(480, 4);
        assert_eq!(m.ticks_per_bar(), 1920);
        assert_eq!(m.bars_to_ticks(4), 7680);
    }

    #[test]
    fn sixteen_steps_are_sixteenth_notes() {
        let m = Meter::new(480, 4);
        assert_eq!(m.ticks_per_step(16), 120);
        assert_eq!(m.ticks_per_step(8), 240);
        assert!(m.divides_evenly(16));
    }

    #[test]
    fn uneven_step_count_detected() {
        let m = Meter::new(480, 3);
        assert!(!m.divides_evenly(7));
        assert!(m.divides_evenly(12));
    }

    #[test]
    fn zero_values_clamped() {
        let m = Meter::new(0, 0);
        assert_eq!(m.ticks_per_beat(), 1);
        assert_eq!(m.beats_per_bar(), 1);
        assert_eq!(m.ticks_per_step(0), 1);
    }

    #[test]
    fn off_subdivisions() {
        let m = Meter::new(480, 4);
        assert!(!m.is_off_subdivision(0, Subdivision::Sixteenth));
        assert!(m.is_off_subdivision(120, Subdivision::Sixteenth));
        assert!(!m.is_off_subdivision(240, Subdivision::Sixteenth));
        assert!(m.is_off_subdivision(240, Subdivision::Eighth));
        assert!(!m.is_off_subdivision(480, Subdivision::Eighth));
        // Off-grid ticks are never swung.
        assert!(!m.is_off_subdivision(130, Subdivision::Sixteenth));
    }

    #[test]
    fn beat_numbers_are_one_based() {
        let m = Meter::new(480, 4);
        assert_eq!(m.beat_number(0), Some(1));
        assert_eq!(m.beat_number(960), Some(3));
        assert_eq!(m.beat_number(120), None);
    }
}

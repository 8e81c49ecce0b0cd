//! Dynamics: section-wide velocity ramps and per-beat accents.

use crate::config::DynamicsConfig;
use crate::event::Meter;

/// Velocity factor for a bar of a section.
///
/// Crescendo sections ramp linearly from 1.0 on the first bar to
/// `crescendo_peak` on the last; diminuendo sections ramp toward
/// `diminuendo_trough`. A one-bar section is never scaled. A section listed
/// under both ramps is treated as a crescendo.
pub fn section_factor(dynamics: &DynamicsConfig, section: &str, bar_index: u32, length_bars: u32) -> f64 {
    let target = if dynamics.crescendo_sections.contains(section) {
        dynamics.crescendo_peak
    } else if dynamics.diminuendo_sections.contains(section) {
        dynamics.diminuendo_trough
    } else {
        return 1.0;
    };
    if length_bars <= 1 {
        return 1.0;
    }
    let progress = bar_index.min(length_bars - 1) as f64 / (length_bars - 1) as f64;
    1.0 + (target - 1.0) * progress
}

/// Additive boost for a nominal bar-relative tick that lands on an accented
/// beat.
pub fn accent(dynamics: &DynamicsConfig, meter: Meter, bar_tick: u64) -> i32 {
    match meter.beat_number(bar_tick) {
        Some(beat) if dynamics.accent_beats.contains(&beat) => dynamics.accent_boost,
        _ => 0,
    }
}

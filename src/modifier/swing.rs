//! Swing: delays off-beat subdivisions.

use crate::config::SwingConfig;
use crate::event::Meter;

/// Tick shift for a nominal bar-relative position.
///
/// Every configured subdivision whose "off" half the position falls on
/// contributes `(ratio - 0.5) * subdivision_ticks`, truncated toward zero.
/// A ratio of 0.5 contributes nothing; ratios below 0.5 pull the off-beat
/// earlier.
pub fn swing_shift(swing: &SwingConfig, meter: Meter, bar_tick: u64) -> i64 {
    if !swing.enabled {
        return 0;
    }
    swing
        .apply_to_subdivisions
        .iter()
        .filter(|&&sub| meter.is_off_subdivision(bar_tick, sub))
        .map(|&sub| ((swing.ratio - 0.5) * meter.subdivision_ticks(sub) as f64).trunc() as i64)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Subdivision;
    use std::collections::BTreeSet;

    fn swing(ratio: f64, subs: &[Subdivision]) -> SwingConfig {
        SwingConfig {
            enabled: true,
            ratio,
            apply_to_subdivisions: subs.iter().copied().collect::<BTreeSet<_>>(),
        }
    }

    #[test]
    fn straight_ratio_is_noop() {
        let s = swing(0.5, &[Subdivision::Eighth, Subdivision::Sixteenth]);
        let m = Meter::new(480, 4);
        for tick in (0..1920).step_by(120) {
            assert_eq!(swing_shift(&s, m, tick), 0);
        }
    }

    #[test]
    fn sixteenth_offbeats_shift_later() {
        let s = swing(0.75, &[Subdivision::Sixteenth]);
        let m = Meter::new(480, 4);
        // Sixteenth = 120 ticks; (0.75 - 0.5) * 120 = 30.
        assert_eq!(swing_shift(&s, m, 0), 0);
        assert_eq!(swing_shift(&s, m, 120), 30);
        assert_eq!(swing_shift(&s, m, 240), 0);
        assert_eq!(swing_shift(&s, m, 360), 30);
    }

    #[test]
    fn eighth_swing_ignores_sixteenth_offs() {
        let s = swing(0.67, &[Subdivision::Eighth]);
        let m = Meter::new(480, 4);
        assert_eq!(swing_shift(&s, m, 120), 0);
        // (0.67 - 0.5) * 240 = 40.8, truncated.
        assert_eq!(swing_shift(&s, m, 240), 40);
    }

    #[test]
    fn early_swing_truncates_toward_zero() {
        let s = swing(0.33, &[Subdivision::Eighth]);
        let m = Meter::new(480, 4);
        // (0.33 - 0.5) * 240 = -40.8.
        assert_eq!(swing_shift(&s, m, 240), -40);
    }

    #[test]
    fn disabled_is_noop() {
        let mut s = swing(0.9, &[Subdivision::Eighth]);
        s.enabled = false;
        assert_eq!(swing_shift(&s, Meter::new(480, 4), 240), 0);
    }
}

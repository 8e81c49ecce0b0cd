//! Arpeggio generator: cycles chord tones through stacked octave layers.

use super::scale::saturate;

/// Pitch of an arpeggio at a step.
///
/// The cycle is `tones.len() * octaves` long: each lap through the chord
/// tones moves up one octave layer, and after the top layer it wraps back to
/// the bottom. A descending arpeggio walks the same cycle from the top.
pub fn arpeggio_pitch(root: i32, tones: &[i32], octaves: u32, step: usize, descending: bool) -> i32 {
    if tones.is_empty() {
        return root;
    }
    let n = tones.len();
    let total = n.saturating_mul(octaves.max(1) as usize);
    let mut k = step % total;
    if descending {
        k = total - 1 - k;
    }
    let layer = (k / n) as i64 * 12;
    saturate(root as i64 + tones[k % n] as i64 + layer)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIAD: [i32; 3] = [0, 4, 7];

    #[test]
    fn ascending_single_octave_wraps() {
        let pitches: Vec<i32> = (0..5).map(|s| arpeggio_pitch(60, &TRIAD, 1, s, false)).collect();
        assert_eq!(pitches, vec![60, 64, 67, 60, 64]);
    }

    #[test]
    fn ascending_two_octaves_climbs_then_wraps() {
        let pitches: Vec<i32> = (0..7).map(|s| arpeggio_pitch(60, &TRIAD, 2, s, false)).collect();
        assert_eq!(pitches, vec![60, 64, 67, 72, 76, 79, 60]);
    }

    #[test]
    fn descending_starts_at_the_top() {
        let pitches: Vec<i32> = (0..6).map(|s| arpeggio_pitch(60, &TRIAD, 2, s, true)).collect();
        assert_eq!(pitches, vec![79, 76, 72, 67, 64, 60]);
    }

    #[test]
    fn huge_octave_count_descending_saturates() {
        assert_eq!(arpeggio_pitch(60, &TRIAD, u32::MAX, 0, true), i32::MAX);
        // Ascending from the bottom layer is unaffected.
        assert_eq!(arpeggio_pitch(60, &TRIAD, u32::MAX, 1, false), 64);
    }

    #[test]
    fn zero_octaves_treated_as_one() {
        assert_eq!(arpeggio_pitch(48, &TRIAD, 0, 3, false), 48);
    }
}

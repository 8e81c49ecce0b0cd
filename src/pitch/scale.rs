//! Scale-degree arithmetic shared by the scale source and diatonic walking
//! approaches.

/// Pitch of a scale position counted from a 1-based start degree.
///
/// The position `(start_degree - 1) + selector` indexes the scale with
/// wrap-around; every full lap adds (or, below zero, removes) an octave.
/// An empty scale yields the root. Positions far outside the MIDI range
/// saturate instead of overflowing; the caller clamps to the instrument.
pub fn scale_pitch(root: i32, scale: &[i32], start_degree: i32, selector: i32) -> i32 {
    if scale.is_empty() {
        return root;
    }
    let len = scale.len() as i64;
    let pos = (start_degree as i64 - 1) + selector as i64;
    let octave = pos.div_euclid(len).saturating_mul(12);
    let pitch = (root as i64 + scale[pos.rem_euclid(len) as usize] as i64).saturating_add(octave);
    saturate(pitch)
}

pub(crate) fn saturate(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

//! Pattern library entries: the per-step grid an instrument plays in each
//! bar, plus the parameters of its pitch source.

use serde::{Deserialize, Serialize};

/// A per-step value declared either once for every step or step by step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepValue {
    Scalar(i64),
    Sequence(Vec<i64>),
}

impl StepValue {
    /// Declared length, or `None` for a scalar.
    pub fn declared_len(&self) -> Option<usize> {
        match self {
            Self::Scalar(_) => None,
            Self::Sequence(v) => Some(v.len()),
        }
    }

    /// Value at a step. Scalars broadcast; sequences are indexed directly.
    pub fn at(&self, step: usize) -> Option<i64> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::Sequence(v) => v.get(step).copied(),
        }
    }
}

/// How the step selector is reinterpreted before a scale lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MelodicDirection {
    #[default]
    Ascending,
    Descending,
    /// Sign alternates every step: even steps up, odd steps down.
    Mixed,
    /// Even steps move down, odd steps up.
    Contrary,
}

impl MelodicDirection {
    /// Apply the direction to a selector at a given step index.
    pub fn apply(self, selector: i32, step_index: usize) -> i32 {
        let even = step_index % 2 == 0;
        match self {
            Self::Ascending => selector,
            Self::Descending => -selector,
            Self::Mixed if even => selector,
            Self::Mixed => -selector,
            Self::Contrary if even => -selector,
            Self::Contrary => selector,
        }
    }
}

/// How a walking line reaches the next bar's root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkingAlgorithm {
    /// Approach by `approach_distance` semitones.
    #[serde(alias = "chromatic")]
    ChromaticApproach,
    /// Approach by `approach_distance` steps of the next chord's scale.
    #[default]
    Diatonic,
}

/// A named rhythmic/melodic pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    /// The instrument this pattern was written for. Informational; sections
    /// assign patterns to instruments explicitly.
    #[serde(default)]
    pub instrument: Option<String>,
    /// 0 = rest, 1..K = voice index or scale-degree selector.
    pub note_pattern: Vec<u8>,
    #[serde(default)]
    pub velocity_pattern: Option<StepValue>,
    #[serde(default)]
    pub duration_pattern: Option<StepValue>,
    #[serde(default)]
    pub timing_offset: Option<StepValue>,
    /// Pitch source specifier, e.g. `bass_note`, `chord_voicing_close`,
    /// `scale_major`, `arpeggio_up`, `walking_pattern`, `drum_note`.
    pub note_source: String,
    #[serde(default)]
    pub melodic_direction: MelodicDirection,
    /// 1-based scale degree the selector counts from.
    #[serde(default = "Pattern::one")]
    pub scale_start_degree: i32,
    /// Octave layers an arpeggio spans.
    #[serde(default = "Pattern::one_u32")]
    pub arpeggio_octaves: u32,
    #[serde(default)]
    pub walking_algorithm: WalkingAlgorithm,
    /// Semitones (chromatic) or scale steps (diatonic) between an approach
    /// note and its target.
    #[serde(default = "Pattern::one")]
    pub approach_distance: i32,
}

impl Pattern {
    fn one() -> i32 {
        1
    }

    fn one_u32() -> u32 {
        1
    }

    /// Number of steps in one bar of this pattern.
    pub fn step_count(&self) -> usize {
        self.note_pattern.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_value_scalar_broadcasts() {
        let v = StepValue::Scalar(90);
        assert_eq!(v.declared_len(), None);
        assert_eq!(v.at(0), Some(90));
        assert_eq!(v.at(15), Some(90));
    }

    #[test]
    fn step_value_sequence_indexes() {
        let v = StepValue::Sequence(vec![100, 60]);
        assert_eq!(v.declared_len(), Some(2));
        assert_eq!(v.at(1), Some(60));
        assert_eq!(v.at(2), None);
    }

    #[test]
    fn step_value_untagged_parse() {
        let s: StepValue = serde_json::from_str("120").unwrap();
        assert_eq!(s, StepValue::Scalar(120));
        let q: StepValue = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(q, StepValue::Sequence(vec![1, 2, 3]));
    }

    #[test]
    fn direction_reinterprets_selector() {
        assert_eq!(MelodicDirection::Ascending.apply(3, 1), 3);
        assert_eq!(MelodicDirection::Descending.apply(3, 0), -3);
        assert_eq!(MelodicDirection::Mixed.apply(3, 0), 3);
        assert_eq!(MelodicDirection::Mixed.apply(3, 1), -3);
        assert_eq!(MelodicDirection::Contrary.apply(3, 2), -3);
        assert_eq!(MelodicDirection::Contrary.apply(3, 3), 3);
    }

    #[test]
    fn pattern_defaults() {
        let p: Pattern = serde_json::from_str(
            r#"{"note_pattern": [1, 0, 1, 0], "note_source": "bass_note"}"#,
        )
        .unwrap();
        assert_eq!(p.step_count(), 4);
        assert_eq!(p.melodic_direction, MelodicDirection::Ascending);
        assert_eq!(p.scale_start_degree, 1);
        assert_eq!(p.arpeggio_octaves, 1);
        assert_eq!(p.walking_algorithm, WalkingAlgorithm::Diatonic);
        assert_eq!(p.approach_distance, 1);
        assert!(p.velocity_pattern.is_none());
    }

    #[test]
    fn walking_algorithm_aliases() {
        let a: WalkingAlgorithm = serde_json::from_str(r#""chromatic_approach""#).unwrap();
        let b: WalkingAlgorithm = serde_json::from_str(r#""chromatic""#).unwrap();
        assert_eq!(a, WalkingAlgorithm::ChromaticApproach);
        assert_eq!(b, WalkingAlgorithm::ChromaticApproach);
    }
}

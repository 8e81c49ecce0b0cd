//! Chord library entries: root, chord-tone intervals, named voicings and
//! scales. Looked up by symbol once per bar during section realization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A chord symbol's full pitch material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    /// MIDI pitch of the chord root.
    #[serde(alias = "root")]
    pub root_note: u8,
    /// Explicit bass pitch. Falls back to the root when absent.
    #[serde(default)]
    pub bass_note: Option<u8>,
    /// Chord-tone intervals above the root, in semitones.
    #[serde(default)]
    pub chord_tones: Vec<i32>,
    /// Named voicings: ordered absolute pitch lists.
    #[serde(default)]
    pub voicings: BTreeMap<String, Vec<u8>>,
    /// Named scales: ordered interval lists from the root.
    #[serde(default)]
    pub scales: BTreeMap<String, Vec<i32>>,
    /// Optional upper-structure intervals (7ths, 9ths, ...).
    #[serde(default)]
    pub extensions: Vec<i32>,
}

impl Chord {
    pub fn bass(&self) -> u8 {
        self.bass_note.unwrap_or(self.root_note)
    }

    /// Chord-tone intervals, or a bare root when none are declared.
    pub fn tones(&self) -> &[i32] {
        if self.chord_tones.is_empty() {
            &[0]
        } else {
            &self.chord_tones
        }
    }

    /// Interval for the nth chord function (0 = root, 1 = 3rd, 2 = 5th,
    /// 3 = 7th). Missing functions come from the extensions first, then wrap
    /// around the declared tones.
    pub fn function_interval(&self, n: usize) -> i32 {
        let tones = self.tones();
        if let Some(&iv) = tones.get(n) {
            return iv;
        }
        if let Some(&iv) = self.extensions.get(n - tones.len()) {
            return iv;
        }
        tones[n % tones.len()]
    }

    pub fn voicing(&self, name: &str) -> Option<&[u8]> {
        self.voicings.get(name).map(Vec::as_slice)
    }

    pub fn scale(&self, name: &str) -> Option<&[i32]> {
        self.scales.get(name).map(Vec::as_slice)
    }

    /// The first declared scale in name order, if any.
    pub fn primary_scale(&self) -> Option<&[i32]> {
        self.scales.values().next().map(Vec::as_slice)
    }
}

//! Song configuration: the declarative input to the generator.
//!
//! A [`SongConfig`] holds instruments, the chord library, the pattern
//! library, the song structure, and global modifiers. It is loaded from JSON
//! or YAML and structurally validated here; referential checks (does this
//! chord have that voicing?) happen lazily in the engine at the point of use.

pub mod chord;
pub mod error;
pub mod instrument;
pub mod modifiers;
pub mod pattern;

pub use chord::Chord;
pub use error::ConfigError;
pub use instrument::Instrument;
pub use modifiers::{DynamicsConfig, GlobalModifiers, HumanizationConfig, SwingConfig};
pub use pattern::{MelodicDirection, Pattern, StepValue, WalkingAlgorithm};

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::event::{Meter, DEFAULT_BEATS_PER_BAR, DEFAULT_TICKS_PER_BEAT};

/// Song-level metadata. Passed through to the MIDI writer untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default = "Metadata::default_title")]
    pub title: String,
    /// Tempo in quarter-note BPM.
    #[serde(default = "Metadata::default_tempo")]
    pub tempo: f64,
    /// `(numerator, denominator)`.
    #[serde(default = "Metadata::default_time_signature")]
    pub time_signature: (u32, u32),
    #[serde(default = "Metadata::default_ticks_per_beat")]
    pub ticks_per_beat: u32,
    #[serde(default)]
    pub output_filename: Option<String>,
    /// Humanization seed used when the caller supplies none.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Metadata {
    fn default_title() -> String {
        "Untitled".to_string()
    }

    fn default_tempo() -> f64 {
        120.0
    }

    fn default_time_signature() -> (u32, u32) {
        (DEFAULT_BEATS_PER_BAR, 4)
    }

    fn default_ticks_per_beat() -> u32 {
        DEFAULT_TICKS_PER_BEAT
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            title: Self::default_title(),
            tempo: Self::default_tempo(),
            time_signature: Self::default_time_signature(),
            ticks_per_beat: Self::default_ticks_per_beat(),
            output_filename: None,
            seed: None,
        }
    }
}

/// A reusable block of bars with its own progression and pattern assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDefinition {
    pub length_bars: u32,
    /// One chord symbol per bar, cycled when shorter than the section.
    pub chord_progression: Vec<String>,
    /// Instrument id → pattern name.
    #[serde(default)]
    pub pattern_assignment: BTreeMap<String, String>,
}

impl SectionDefinition {
    /// Chord symbol active in a bar.
    pub fn chord_at(&self, bar_index: u32) -> Option<&str> {
        if self.chord_progression.is_empty() {
            return None;
        }
        let i = bar_index as usize % self.chord_progression.len();
        Some(&self.chord_progression[i])
    }
}

/// Performance order plus the section definitions it refers to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SongStructure {
    /// Section names in performance order. Repeats allowed.
    pub sections: Vec<String>,
    #[serde(default)]
    pub section_definitions: BTreeMap<String, SectionDefinition>,
}

/// The complete declarative song description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SongConfig {
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub instruments: BTreeMap<String, Instrument>,
    #[serde(default, alias = "chords")]
    pub chord_library: BTreeMap<String, Chord>,
    #[serde(default, alias = "patterns")]
    pub pattern_library: BTreeMap<String, Pattern>,
    pub song_structure: SongStructure,
    #[serde(default)]
    pub global_modifiers: GlobalModifiers,
}

impl SongConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// The tick grid this song is realized on.
    pub fn meter(&self) -> Meter {
        Meter::new(self.metadata.ticks_per_beat, self.metadata.time_signature.0)
    }

    /// Structural validation. Does not check cross references; the engine
    /// reports those when it meets them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let meta = &self.metadata;
        if meta.ticks_per_beat == 0 || meta.ticks_per_beat > 0x7fff {
            return Err(ConfigError::invalid(format!(
                "ticks_per_beat must be in 1..=32767, got {}",
                meta.ticks_per_beat
            )));
        }
        let (num, den) = meta.time_signature;
        if num == 0 || num > 255 || !den.is_power_of_two() || den > 128 {
            return Err(ConfigError::invalid(format!(
                "unsupported time signature {num}/{den}"
            )));
        }
        if !(meta.tempo.is_finite() && meta.tempo > 0.0) {
            return Err(ConfigError::invalid(format!(
                "tempo must be positive, got {}",
                meta.tempo
            )));
        }

        let mut channels = HashSet::new();
        for (id, inst) in &self.instruments {
            if inst.midi_channel > 15 {
                return Err(ConfigError::invalid(format!(
                    "instrument '{id}': midi_channel {} out of range 0..=15",
                    inst.midi_channel
                )));
            }
            if !channels.insert(inst.midi_channel) {
                return Err(ConfigError::invalid(format!(
                    "instrument '{id}': midi_channel {} already in use",
                    inst.midi_channel
                )));
            }
            if inst.program_number > 127 {
                return Err(ConfigError::invalid(format!(
                    "instrument '{id}': program_number {} out of range 0..=127",
                    inst.program_number
                )));
            }
            check_range(id, "note_range", inst.note_range)?;
            check_range(id, "velocity_range", inst.velocity_range)?;
        }

        for (name, pattern) in &self.pattern_library {
            if pattern.note_pattern.is_empty() {
                return Err(ConfigError::invalid(format!(
                    "pattern '{name}': note_pattern is empty"
                )));
            }
        }

        for (name, section) in &self.song_structure.section_definitions {
            if section.length_bars == 0 {
                return Err(ConfigError::invalid(format!(
                    "section '{name}': length_bars must be at least 1"
                )));
            }
            if section.chord_progression.is_empty() {
                return Err(ConfigError::invalid(format!(
                    "section '{name}': chord_progression is empty"
                )));
            }
        }

        let ratio = self.global_modifiers.swing.ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(ConfigError::invalid(format!(
                "swing ratio must be within [0, 1], got {ratio}"
            )));
        }
        Ok(())
    }
}

fn check_range(id: &str, field: &str, (lo, hi): (u8, u8)) -> Result<(), ConfigError> {
    if lo > hi || hi > 127 {
        return Err(ConfigError::invalid(format!(
            "instrument '{id}': {field} [{lo}, {hi}] must be ordered within 0..=127"
        )));
    }
    Ok(())
}

/// Load a configuration file. `.yaml`/`.yml` files are read as YAML,
/// everything else as JSON.
pub fn load_config(path: &Path) -> Result<SongConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    if is_yaml {
        SongConfig::from_yaml_str(&content)
    } else {
        SongConfig::from_json_str(&content)
    }
}

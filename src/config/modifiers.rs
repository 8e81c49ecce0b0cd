//! Global modifier configuration: swing, humanization, and dynamics.
//!
//! Every block is optional and defaults to inactive, so a config without
//! `global_modifiers` realizes patterns exactly as written.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::event::Subdivision;

/// The `global_modifiers` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalModifiers {
    #[serde(default, alias = "swing_timing")]
    pub swing: SwingConfig,
    #[serde(default)]
    pub humanization: HumanizationConfig,
    #[serde(default)]
    pub dynamics: DynamicsConfig,
}

/// Delays off-beat subdivisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwingConfig {
    #[serde(default)]
    pub enabled: bool,
    /// 0.5 = straight; above 0.5 pushes off-beats later.
    #[serde(default = "SwingConfig::default_ratio", alias = "swing_ratio")]
    pub ratio: f64,
    #[serde(default = "SwingConfig::default_subdivisions")]
    pub apply_to_subdivisions: BTreeSet<Subdivision>,
}

impl SwingConfig {
    fn default_ratio() -> f64 {
        0.67
    }

    fn default_subdivisions() -> BTreeSet<Subdivision> {
        BTreeSet::from([Subdivision::Sixteenth])
    }
}

impl Default for SwingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            ratio: Self::default_ratio(),
            apply_to_subdivisions: Self::default_subdivisions(),
        }
    }
}

/// Bounded uniform jitter on tick and velocity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanizationConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Maximum tick displacement in either direction.
    #[serde(default = "HumanizationConfig::default_timing_variance")]
    pub timing_variance: u32,
    /// Maximum velocity displacement in either direction.
    #[serde(default = "HumanizationConfig::default_velocity_variance")]
    pub velocity_variance: u32,
}

impl HumanizationConfig {
    fn default_timing_variance() -> u32 {
        5
    }

    fn default_velocity_variance() -> u32 {
        8
    }
}

impl Default for HumanizationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            timing_variance: Self::default_timing_variance(),
            velocity_variance: Self::default_velocity_variance(),
        }
    }
}

/// Section-level velocity shaping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicsConfig {
    #[serde(default)]
    pub crescendo_sections: BTreeSet<String>,
    #[serde(default)]
    pub diminuendo_sections: BTreeSet<String>,
    /// Velocity factor reached on the last bar of a crescendo section.
    #[serde(default = "DynamicsConfig::default_peak")]
    pub crescendo_peak: f64,
    /// Velocity factor reached on the last bar of a diminuendo section.
    #[serde(default = "DynamicsConfig::default_trough")]
    pub diminuendo_trough: f64,
    /// 1-based beat numbers within a bar that receive the accent boost.
    #[serde(default)]
    pub accent_beats: BTreeSet<u32>,
    #[serde(default = "DynamicsConfig::default_accent_boost")]
    pub accent_boost: i32,
}

impl DynamicsConfig {
    fn default_peak() -> f64 {
        1.3
    }

    fn default_trough() -> f64 {
        0.6
    }

    fn default_accent_boost() -> i32 {
        10
    }

    /// Whether any dynamics shaping is configured.
    pub fn is_active(&self) -> bool {
        !self.crescendo_sections.is_empty()
            || !self.diminuendo_sections.is_empty()
            || !self.accent_beats.is_empty()
    }
}

impl Default for DynamicsConfig {
    fn default() -> Self {
        Self {
            crescendo_sections: BTreeSet::new(),
            diminuendo_sections: BTreeSet::new(),
            crescendo_peak: Self::default_peak(),
            diminuendo_trough: Self::default_trough(),
            accent_beats: BTreeSet::new(),
            accent_boost: Self::default_accent_boost(),
        }
    }
}

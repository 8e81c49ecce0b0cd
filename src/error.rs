//! Errors raised while realizing a song.
//!
//! Every variant is fatal for the whole generation call: a bad reference
//! corrupts the section it appears in, so no partial event list is returned.

use std::fmt;

/// A referential or shape error found during generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    UnknownChordSymbol {
        section: String,
        symbol: String,
    },
    UnknownVoicing {
        chord: String,
        voicing: String,
    },
    UnknownScale {
        chord: String,
        scale: String,
    },
    PatternLengthMismatch {
        pattern: String,
        field: &'static str,
        expected: usize,
        found: usize,
    },
    UnknownInstrumentReference {
        section: String,
        instrument: String,
    },
    InvalidNoteSource {
        pattern: String,
        source: String,
    },
    UnknownSection {
        name: String,
    },
    UnknownPattern {
        section: String,
        pattern: String,
    },
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownChordSymbol { section, symbol } => {
                write!(f, "section '{section}': unknown chord symbol '{symbol}'")
            }
            Self::UnknownVoicing { chord, voicing } => {
                write!(f, "chord '{chord}' has no voicing '{voicing}'")
            }
            Self::UnknownScale { chord, scale } => {
                write!(f, "chord '{chord}' has no scale '{scale}'")
            }
            Self::PatternLengthMismatch {
                pattern,
                field,
                expected,
                found,
            } => write!(
                f,
                "pattern '{pattern}': {field} has {found} steps, note_pattern has {expected}"
            ),
            Self::UnknownInstrumentReference {
                section,
                instrument,
            } => write!(f, "section '{section}': unknown instrument '{instrument}'"),
            Self::InvalidNoteSource { pattern, source } => {
                write!(f, "pattern '{pattern}': invalid note source '{source}'")
            }
            Self::UnknownSection { name } => write!(f, "unknown section '{name}'"),
            Self::UnknownPattern { section, pattern } => {
                write!(f, "section '{section}': unknown pattern '{pattern}'")
            }
        }
    }
}

impl std::error::Error for GenerateError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let e = GenerateError::UnknownVoicing {
            chord: "Cmaj7".into(),
            voicing: "drop2".into(),
        };
        assert_eq!(e.to_string(), "chord 'Cmaj7' has no voicing 'drop2'");

        let e = GenerateError::PatternLengthMismatch {
            pattern: "comp".into(),
            field: "velocity_pattern",
            expected: 16,
            found: 8,
        };
        assert!(e.to_string().contains("velocity_pattern has 8 steps"));
    }
}

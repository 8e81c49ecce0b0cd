//! Midigen: declarative pattern realization and MIDI event scheduling.
//!
//! A [`config::SongConfig`] describes instruments, chords, patterns, and a
//! song structure; [`engine::generate`] realizes it into a sorted list of
//! [`event::Event`]s, and [`midi::write_midi`] serializes the result.

pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod midi;
pub mod modifier;
pub mod pitch;

pub use error::GenerateError;

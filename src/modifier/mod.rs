//! Timing modifier stack: swing, humanization, and dynamics.
//!
//! Transforms are applied to a step's base tick and velocity in a fixed
//! order: swing (tick), humanization (tick), dynamics (velocity),
//! humanization (velocity). Each stage is toggled by its own config block.
//! Swing and accents look at the step's nominal grid position, so a
//! pattern's timing offset never moves a step onto or off an accent.

pub mod dynamics;
pub mod humanize;
pub mod swing;

use rand::Rng;

use crate::config::{GlobalModifiers, Instrument};
use crate::event::Meter;

/// Where a step sits in the song, as the modifiers see it.
#[derive(Debug, Clone, Copy)]
pub struct StepPosition<'a> {
    pub section: &'a str,
    pub bar_index: u32,
    pub length_bars: u32,
    /// Grid position within the bar, before any offset.
    pub bar_tick: u64,
}

/// Final timing and velocity of an emitted note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shaped {
    pub tick: u64,
    pub velocity: u8,
}

/// The configured modifiers bound to a song's meter.
#[derive(Debug, Clone, Copy)]
pub struct ModifierStack<'a> {
    modifiers: &'a GlobalModifiers,
    meter: Meter,
}

impl<'a> ModifierStack<'a> {
    pub fn new(modifiers: &'a GlobalModifiers, meter: Meter) -> Self {
        Self { modifiers, meter }
    }

    /// Shape one emitting step.
    ///
    /// `tick` is the absolute grid tick with the pattern's timing offset
    /// already added. When humanization is on, exactly two draws are taken
    /// from `rng`: tick first, then velocity. The result tick saturates at 0
    /// and the velocity is clamped to the instrument's range.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        pos: &StepPosition<'_>,
        tick: i64,
        velocity: u8,
        instrument: &Instrument,
    ) -> Shaped {
        let human = &self.modifiers.humanization;
        let dyn_cfg = &self.modifiers.dynamics;

        let mut tick =
            tick.saturating_add(swing::swing_shift(&self.modifiers.swing, self.meter, pos.bar_tick));
        if human.enabled {
            tick = tick.saturating_add(humanize::jitter(rng, human.timing_variance));
        }

        let mut vel = velocity as i64;
        if dyn_cfg.is_active() {
            let factor =
                dynamics::section_factor(dyn_cfg, pos.section, pos.bar_index, pos.length_bars);
            vel = ((velocity as f64 * factor).round() as i64)
                .saturating_add(dynamics::accent(dyn_cfg, self.meter, pos.bar_tick) as i64);
        }
        vel = vel.clamp(0, 127);
        if human.enabled {
            vel += humanize::jitter(rng, human.velocity_variance);
        }

        Shaped {
            tick: tick.max(0) as u64,
            velocity: instrument.clamp_velocity(vel.clamp(0, 127) as i32),
        }
    }
}

//! Globally ordered event storage for an assembled song.
//!
//! Sections append their events in realization order. Batch insertion defers
//! sorting until the events are read, and the sort is stable on
//! `(tick, channel)` so simultaneous events keep their insertion order.

use super::types::Event;

/// An append-then-sort list of events.
#[derive(Debug, Default)]
pub struct Timeline {
    events: Vec<Event>,
    dirty: bool,
}

impl Timeline {
    /// Create an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch of events. Sorting is deferred until the next read.
    pub fn insert_batch(&mut self, events: impl IntoIterator<Item = Event>) {
        let before = self.events.len();
        self.events.extend(events);
        if self.events.len() != before {
            self.dirty = true;
        }
    }

    /// Total number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the timeline is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Consume the timeline, returning its events in final order.
    pub fn into_events(mut self) -> Vec<Event> {
        self.ensure_sorted();
        self.events
    }

    /// Latest tick at which any note is still sounding.
    pub fn end_tick(&self) -> u64 {
        self.events.iter().map(Event::end_tick).max().unwrap_or(0)
    }

    fn ensure_sorted(&mut self) {
        if self.dirty {
            self.events.sort_by_key(|e| (e.tick, e.channel));
            self.dirty = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::types::InstrumentId;

    fn event(tick: u64, channel: u8, pitch: u8) -> Event {
        Event {
            instrument: InstrumentId(format!("ch{channel}")),
            channel,
            tick,
            pitch,
            velocity: 90,
            duration: 120,
        }
    }

    #[test]
    fn empty_timeline() {
        let tl = Timeline::new();
        assert!(tl.is_empty());
        assert_eq!(tl.end_tick(), 0);
        assert!(tl.into_events().is_empty());
    }

    #[test]
    fn batch_insert_sorts_on_read() {
        let mut tl = Timeline::new();
        tl.insert_batch(vec![event(960, 0, 60), event(0, 0, 62), event(480, 0, 64)]);
        assert_eq!(tl.len(), 3);

        let ticks: Vec<u64> = tl.into_events().iter().map(|e| e.tick).collect();
        assert_eq!(ticks, vec![0, 480, 960]);
    }

    #[test]
    fn ties_broken_by_channel() {
        let mut tl = Timeline::new();
        tl.insert_batch(vec![event(0, 9, 36), event(0, 1, 48), event(0, 0, 60)]);

        let channels: Vec<u8> = tl.into_events().iter().map(|e| e.channel).collect();
        assert_eq!(channels, vec![0, 1, 9]);
    }

    #[test]
    fn same_tick_and_channel_keeps_insertion_order() {
        let mut tl = Timeline::new();
        tl.insert_batch(vec![event(240, 0, 67), event(0, 0, 60)]);
        tl.insert_batch(vec![event(240, 0, 64), event(240, 0, 72)]);

        let pitches: Vec<u8> = tl.into_events().iter().map(|e| e.pitch).collect();
        assert_eq!(pitches, vec![60, 67, 64, 72]);
    }

    #[test]
    fn end_tick_uses_latest_note_off() {
        let mut tl = Timeline::new();
        let mut long = event(0, 0, 60);
        long.duration = 4000;
        tl.insert_batch(vec![long, event(1920, 1, 48)]);
        assert_eq!(tl.end_tick(), 4000);
    }
}

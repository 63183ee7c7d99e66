use crate::chart::{Chart, NoteEvent};

/// Fixed-step slot clock plus the pending-note view of the chart.
///
/// `advance` ticks at most one slot per call no matter how much time has
/// elapsed; a long frame stretches the song slightly rather than dumping a
/// burst of notes. `last_tick` accumulates by whole slot durations instead of
/// snapping to the caller's clock, so frame-time jitter never drifts the
/// rhythm.
pub struct Scheduler {
    seconds_per_slot: f64,
    slots_per_bar: i32,
    current_slot: i32, // starts at -1 so the first tick lands on slot 0
    current_bar: i32,
    last_tick: f64,
    pending: Vec<NoteEvent>, // not-yet-spawned working copy; the chart stays untouched
}

impl Scheduler {
    pub fn new(chart: &Chart, beats_per_bar: u32) -> Self {
        Self {
            seconds_per_slot: chart.seconds_per_slot(beats_per_bar),
            slots_per_bar: chart.slots_per_bar as i32,
            current_slot: -1,
            current_bar: 0,
            last_tick: 0.0,
            pending: chart.notes.clone(),
        }
    }

    /// Advance the clock by at most one slot and drain the notes due at it.
    /// `elapsed` is seconds since session start, from the caller's single
    /// time source.
    pub fn advance(&mut self, elapsed: f64) -> Vec<NoteEvent> {
        if elapsed - self.last_tick < self.seconds_per_slot {
            return Vec::new();
        }
        let next = (self.current_slot + 1).rem_euclid(self.slots_per_bar);
        if next < self.current_slot {
            self.current_bar += 1;
        }
        self.current_slot = next;
        self.last_tick += self.seconds_per_slot;

        // chart addressing is 1-based
        let bar = (self.current_bar + 1) as u32;
        let slot = (self.current_slot + 1) as u32;
        let mut due = Vec::new();
        self.pending.retain(|note| {
            if note.bar == bar && note.slot == slot {
                due.push(*note);
                false
            } else {
                true
            }
        });
        due
    }

    pub fn current_bar(&self) -> i32 {
        self.current_bar
    }

    pub fn current_slot(&self) -> i32 {
        self.current_slot
    }
}

// Chart data: the declarative note list a song is played from. Immutable once
// loaded; the scheduler works off its own pending copy of the notes.

mod loader;

pub use loader::{index_charts_in_dir, load_chart};

/// Duration class of a note. Only decides which glyph is drawn; all notes are
/// struck the same way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteKind {
    Quarter,
    Half,
    Whole,
}

impl NoteKind {
    // chart files carry the original asset keys: 4, 8, 16
    pub fn from_chart_code(code: &str) -> Option<Self> {
        match code {
            "4" => Some(NoteKind::Quarter),
            "8" => Some(NoteKind::Half),
            "16" => Some(NoteKind::Whole),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            NoteKind::Quarter => '♩',
            NoteKind::Half => '♪',
            NoteKind::Whole => 'o',
        }
    }
}

/// One chart-defined note. `bar` and `slot` are 1-based; `pitch % 7` is the
/// playable key, `pitch / 7` the octave offset above the minimum octave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoteEvent {
    pub bar: u32,
    pub slot: u32,
    pub kind: NoteKind,
    pub pitch: i32,
}

#[derive(Clone, Debug)]
pub struct Chart {
    pub bpm: u32,
    pub slots_per_bar: u32,
    pub b_path: Option<String>, // backing track, relative to the audio dir
    pub notes: Vec<NoteEvent>,
}

impl Chart {
    /// Length of one rhythmic slot. With the defaults (bpm 120, 16 slots,
    /// 4 beats) this is exactly 0.125s.
    pub fn seconds_per_slot(&self, beats_per_bar: u32) -> f64 {
        60.0 / (self.bpm as f64 * self.slots_per_bar as f64 / beats_per_bar as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_per_slot_default_chart() {
        let chart = Chart {
            bpm: 120,
            slots_per_bar: 16,
            b_path: None,
            notes: vec![],
        };
        assert_eq!(chart.seconds_per_slot(4), 0.125);
    }

    #[test]
    fn chart_codes_map_to_kinds() {
        assert_eq!(NoteKind::from_chart_code("4"), Some(NoteKind::Quarter));
        assert_eq!(NoteKind::from_chart_code("8"), Some(NoteKind::Half));
        assert_eq!(NoteKind::from_chart_code("16"), Some(NoteKind::Whole));
        assert_eq!(NoteKind::from_chart_code("32"), None);
    }
}

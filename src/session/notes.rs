use crate::chart::{NoteEvent, NoteKind};
use crate::shared::{GameConfig, KeyState, NUM_KEYS};

/// A chart note that has been spawned onto the play field.
#[derive(Clone, Copy, Debug)]
pub struct ActiveNote {
    pub kind: NoteKind,
    pub pitch: i32,
    pub x: f32,
    pub y: f32,
    pub mirrored: bool, // drawn stem-down, hanging below the staff
    pub hit: bool,
    pub score: u32, // 0 until hit, then 100/500/1000
}

/// Owns the active notes: spawning, hit detection, motion, and removal.
/// Nothing else holds references into the set; callers only see the
/// read-only `notes()` view for rendering.
pub struct NoteField {
    cfg: GameConfig,
    active: Vec<ActiveNote>,
}

impl NoteField {
    pub fn new(cfg: GameConfig) -> Self {
        Self {
            cfg,
            active: Vec::new(),
        }
    }

    /// Place a newly due note at the spawn line. Treble-style placement:
    /// pitches at or above the mirror threshold sit below the staff with a
    /// flipped glyph, the rest above it.
    pub fn spawn(&mut self, event: NoteEvent) {
        let mirrored = event.pitch >= self.cfg.mirror_pitch;
        let y = if mirrored {
            260.0 - event.pitch as f32 * 10.0
        } else {
            180.0 - event.pitch as f32 * 10.0
        };
        self.active.push(ActiveNote {
            kind: event.kind,
            pitch: event.pitch,
            x: self.cfg.spawn_x,
            y,
            mirrored,
            hit: false,
            score: 0,
        });
    }

    /// Judge this frame's key state against every unhit note inside the hit
    /// window. A note needs both the right key and the right octave; a right
    /// key at the wrong octave leaves the note pending. Notes never steal
    /// each other's presses: each is judged independently.
    pub fn check_hit(&mut self, keys: &KeyState, octave: u8) {
        let center = self.cfg.play_center();
        let margin = self.cfg.play_margin();
        for note in &mut self.active {
            if note.hit || (note.x - center).abs() > margin {
                continue;
            }
            let note_key = note.pitch.rem_euclid(NUM_KEYS as i32) as usize;
            let note_octave = (note.pitch / NUM_KEYS as i32) as u8 + self.cfg.min_octave;
            if keys[note_key] && note_octave == octave {
                let distance = (note.x - center).abs();
                note.score = if distance < margin / 3.0 {
                    1000
                } else if distance < margin / 2.0 {
                    500
                } else {
                    100
                };
                note.hit = true;
            }
        }
    }

    /// Collect finished notes and move the rest. Hit notes pay out their
    /// score; notes that drifted past the miss line pay nothing and are just
    /// as gone. Removal happens before motion so hit tests always saw the
    /// settled position from last frame.
    pub fn advance(&mut self, dt: f32) -> u32 {
        let miss_x = self.cfg.miss_x;
        let mut score = 0;
        self.active.retain(|note| {
            if note.hit || note.x < miss_x {
                score += note.score; // 0 for misses
                false
            } else {
                true
            }
        });
        for note in &mut self.active {
            note.x -= dt * self.cfg.note_velocity;
        }
        score
    }

    pub fn notes(&self) -> &[ActiveNote] {
        &self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> NoteField {
        NoteField::new(GameConfig::default())
    }

    fn event(pitch: i32) -> NoteEvent {
        NoteEvent {
            bar: 1,
            slot: 1,
            kind: NoteKind::Quarter,
            pitch,
        }
    }

    // park a note at a given distance from the play center
    fn place(field: &mut NoteField, pitch: i32, distance: f32) {
        field.spawn(event(pitch));
        let center = GameConfig::default().play_center();
        field.active.last_mut().unwrap().x = center + distance;
    }

    fn keys_with(pressed: usize) -> KeyState {
        let mut keys = [false; NUM_KEYS];
        keys[pressed] = true;
        keys
    }

    #[test]
    fn spawn_places_by_pitch() {
        let mut f = field();
        f.spawn(event(0));
        f.spawn(event(7)); // first mirrored pitch
        let notes = f.notes();
        assert_eq!(notes[0].x, 1200.0);
        assert_eq!(notes[0].y, 180.0);
        assert!(!notes[0].mirrored);
        assert_eq!(notes[1].y, 190.0);
        assert!(notes[1].mirrored);
    }

    #[test]
    fn notes_move_left_at_constant_velocity() {
        let mut f = field();
        f.spawn(event(0));
        f.advance(0.1);
        assert_eq!(f.notes()[0].x, 1200.0 - 30.0);
        f.advance(0.1);
        assert_eq!(f.notes()[0].x, 1200.0 - 60.0);
    }

    #[test]
    fn hit_tiers_by_distance_to_center() {
        // margin 25: <8.33 => 1000, <12.5 => 500, inside window => 100
        for (distance, expected) in [(0.0, 1000), (10.0, 500), (20.0, 100)] {
            let mut f = field();
            place(&mut f, 0, distance);
            f.check_hit(&keys_with(0), 5);
            assert!(f.notes()[0].hit, "distance {distance}");
            assert_eq!(f.notes()[0].score, expected, "distance {distance}");
        }
    }

    #[test]
    fn outside_the_window_is_no_hit_at_all() {
        let mut f = field();
        place(&mut f, 0, 26.0);
        f.check_hit(&keys_with(0), 5);
        assert!(!f.notes()[0].hit);
        assert_eq!(f.notes()[0].score, 0);
    }

    #[test]
    fn wrong_octave_never_hits() {
        let mut f = field();
        place(&mut f, 0, 0.0); // pitch 0 lives in octave 5
        f.check_hit(&keys_with(0), 6);
        assert!(!f.notes()[0].hit);
        // same key, right octave: now it lands
        f.check_hit(&keys_with(0), 5);
        assert!(f.notes()[0].hit);
    }

    #[test]
    fn wrong_key_never_hits() {
        let mut f = field();
        place(&mut f, 2, 0.0);
        f.check_hit(&keys_with(3), 5);
        assert!(!f.notes()[0].hit);
    }

    #[test]
    fn overlapping_notes_are_judged_independently() {
        let mut f = field();
        place(&mut f, 0, 0.0);
        place(&mut f, 2, 0.0);
        let mut keys = keys_with(0);
        keys[2] = true;
        f.check_hit(&keys, 5);
        assert!(f.notes().iter().all(|n| n.hit));
    }

    #[test]
    fn hits_pay_out_and_misses_pay_nothing() {
        let mut f = field();
        place(&mut f, 0, 0.0);
        f.check_hit(&keys_with(0), 5);
        assert_eq!(f.advance(0.0), 1000);
        assert!(f.notes().is_empty());

        // a note past the miss line disappears with zero score
        f.spawn(event(0));
        f.active[0].x = 99.0;
        assert_eq!(f.advance(0.0), 0);
        assert!(f.notes().is_empty());
    }
}

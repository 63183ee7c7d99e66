// The keyboard layout:
//
// Playable keys (one per diatonic position, low to high):
//   a s d f g h j     //  held state only, sampled once per frame
//
// Everything else:
//   Up / Down         //  Up / Down (octave in game, cursor in the menu)
//   Enter             //  Select (menu only)
//   Esc               //  Quit (back to menu in game, exit in the menu)
//
// The game logic never touches crossterm key codes; the tui layer resolves
// them into these events and maintains the held state of the seven keys.

pub const NUM_KEYS: usize = 7;

/// Diatonic note names, index-aligned with the playable keys. Used to build
/// sample file names like "c5.wav".
pub const NOTE_NAMES: [&str; NUM_KEYS] = ["c", "d", "e", "f", "g", "a", "b"];

/// Labels shown under the play field.
pub const KEY_LABELS: [char; NUM_KEYS] = ['a', 's', 'd', 'f', 'g', 'h', 'j'];

/// Pressed-state of the seven playable keys, sampled once per frame.
pub type KeyState = [bool; NUM_KEYS];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Up,
    Down,
    Select,
    Quit,
}

/// Session tunables. One immutable value of this is handed to every session
/// at construction; there is no process-wide config.
#[derive(Clone, Copy, Debug)]
pub struct GameConfig {
    // logical play field, in the original's 1280x720 pixel space
    pub field_width: f32,
    pub field_height: f32,

    pub beats_per_bar: u32,
    pub note_velocity: f32, // px/s leftward
    pub spawn_x: f32,
    pub miss_x: f32, // notes past this unhit are gone

    // play box (x, y, w, h); hits register around its horizontal center
    pub play_box: (f32, f32, f32, f32),

    pub min_octave: u8,
    pub max_octave: u8,
    pub mirror_pitch: i32, // pitches at or above this render mirrored, below the staff

    pub fadeout_secs: f32, // key-release fade
    pub b_track_gain: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: 1280.0,
            field_height: 720.0,
            beats_per_bar: 4,
            note_velocity: 300.0,
            spawn_x: 1200.0,
            miss_x: 100.0,
            play_box: (350.0, 100.0, 50.0, 130.0),
            min_octave: 5,
            max_octave: 6,
            mirror_pitch: 7,
            fadeout_secs: 0.25,
            b_track_gain: 0.5,
        }
    }
}

impl GameConfig {
    /// Horizontal center of the play box; the hit-line notes are judged against.
    pub fn play_center(&self) -> f32 {
        self.play_box.0 + self.play_box.2 / 2.0
    }

    /// Half-width of the play box; the hit-window tolerance on either side.
    pub fn play_margin(&self) -> f32 {
        self.play_box.2 / 2.0
    }

    pub fn num_octaves(&self) -> usize {
        (self.max_octave - self.min_octave) as usize + 1
    }
}

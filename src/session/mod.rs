// One play-through of one song. The session owns the timing engine and is
// pure game logic: it consumes this frame's input and clock, and returns a
// signal plus the audio commands for the caller to send. No device handles,
// no terminal, which is also what makes it testable end to end.

mod notes;
mod scheduler;
mod sync;

pub use notes::ActiveNote;

use crate::assets::GameAssets;
use crate::audio_api::AudioCommand;
use crate::chart::Chart;
use crate::shared::{GameConfig, InputEvent, KeyState, NUM_KEYS};

use notes::NoteField;
use scheduler::Scheduler;
use sync::{BackingSync, KeyAudio};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionSignal {
    Playing,
    ExitRequested,
}

pub struct Session {
    cfg: GameConfig,
    scheduler: Scheduler,
    field: NoteField,
    backing: BackingSync,
    key_audio: KeyAudio,
    start: f64, // the caller's `now` at construction
    score: u32,
    octave: u8,
    prev_keys: KeyState,
}

/// Read-only snapshot for the renderer.
pub struct SessionView<'a> {
    pub notes: &'a [ActiveNote],
    pub score: u32,
    pub octave: u8,
    pub bar: u32,  // 1-based, matching chart addressing
    pub slot: u32, // 0 until the first tick lands
    pub cfg: &'a GameConfig,
}

impl Session {
    pub fn new(chart: &Chart, assets: &GameAssets, cfg: GameConfig, now: f64) -> Self {
        Self {
            scheduler: Scheduler::new(chart, cfg.beats_per_bar),
            field: NoteField::new(cfg),
            backing: BackingSync::new(&cfg, assets.backing),
            key_audio: KeyAudio::new(assets.key_samples.clone(), &cfg),
            start: now,
            score: 0,
            octave: cfg.min_octave,
            prev_keys: [false; NUM_KEYS],
            cfg,
        }
    }

    /// One frame. `now` and `dt` come from the caller's single clock; `keys`
    /// is the key state sampled once for this frame and used for both hit
    /// detection and sound triggering.
    pub fn update(
        &mut self,
        now: f64,
        dt: f64,
        events: &[InputEvent],
        keys: &KeyState,
    ) -> (SessionSignal, Vec<AudioCommand>) {
        let mut cmds = Vec::new();

        for event in events {
            match event {
                InputEvent::Quit => {
                    cmds.extend(self.backing.stop());
                    return (SessionSignal::ExitRequested, cmds);
                }
                InputEvent::Up => {
                    if self.octave < self.cfg.max_octave {
                        self.octave += 1;
                    }
                }
                InputEvent::Down => {
                    if self.octave > self.cfg.min_octave {
                        self.octave -= 1;
                    }
                }
                // Select only means something in the menu
                InputEvent::Select => {}
            }
        }

        let elapsed = now - self.start;

        // hit tests see last frame's settled positions, then the tick spawns,
        // then everything moves
        self.field.check_hit(keys, self.octave);
        for event in self.scheduler.advance(elapsed) {
            self.field.spawn(event);
        }
        self.score += self.field.advance(dt as f32);

        self.key_audio
            .transitions(&self.prev_keys, keys, self.octave, &mut cmds);
        cmds.extend(self.backing.maybe_start(elapsed));
        self.prev_keys = *keys;

        (SessionSignal::Playing, cmds)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            notes: self.field.notes(),
            score: self.score,
            octave: self.octave,
            bar: (self.scheduler.current_bar() + 1) as u32,
            slot: (self.scheduler.current_slot() + 1).max(0) as u32,
            cfg: &self.cfg,
        }
    }
}

use crate::assets::KeySamples;
use crate::audio_api::AudioCommand;
use crate::shared::{GameConfig, KeyState, NUM_KEYS};

/// Starts the backing track so it lines up with the visuals: a note spawned
/// at the spawn line takes `(spawn_x - play_center) / velocity` seconds to
/// reach the hit-line, and the track comes in exactly then.
pub struct BackingSync {
    delay: f64,
    gain: f32,
    sample: Option<crate::audio::SampleId>,
    started: bool,
}

impl BackingSync {
    pub fn new(cfg: &GameConfig, sample: Option<crate::audio::SampleId>) -> Self {
        Self {
            delay: ((cfg.spawn_x - cfg.play_center()) / cfg.note_velocity) as f64,
            gain: cfg.b_track_gain,
            sample,
            started: false,
        }
    }

    /// Fires at most once, when the travel delay has passed. With no loaded
    /// track the trigger still latches (and stays a no-op) so the check isn't
    /// re-run every frame for the rest of the song.
    pub fn maybe_start(&mut self, elapsed: f64) -> Option<AudioCommand> {
        if self.started || elapsed < self.delay {
            return None;
        }
        self.started = true;
        self.sample
            .map(|id| AudioCommand::StartBacking { id, gain: self.gain })
    }

    /// Cut the track on quit-to-menu. Nothing to do if it never started.
    pub fn stop(&mut self) -> Option<AudioCommand> {
        if self.started && self.sample.is_some() {
            Some(AudioCommand::StopBacking)
        } else {
            None
        }
    }

    pub fn delay(&self) -> f64 {
        self.delay
    }
}

/// Turns per-frame key state into note-on/note-off commands. Edges only: a
/// key held across frames sounds once and sustains until released.
pub struct KeyAudio {
    samples: KeySamples,
    fadeout_secs: f32,
    min_octave: u8,
}

impl KeyAudio {
    pub fn new(samples: KeySamples, cfg: &GameConfig) -> Self {
        Self {
            samples,
            fadeout_secs: cfg.fadeout_secs,
            min_octave: cfg.min_octave,
        }
    }

    pub fn transitions(
        &self,
        prev: &KeyState,
        cur: &KeyState,
        octave: u8,
        out: &mut Vec<AudioCommand>,
    ) {
        for key in 0..NUM_KEYS {
            if cur[key] && !prev[key] {
                if let Some(id) = self.samples.get(key, octave, self.min_octave) {
                    out.push(AudioCommand::NoteOn { id, gain: 1.0 });
                }
            } else if !cur[key] && prev[key] {
                // fade this key in every octave register; the player may have
                // switched octave while holding the key
                for oct in self.samples.octaves(self.min_octave) {
                    if let Some(id) = self.samples.get(key, oct, self.min_octave) {
                        out.push(AudioCommand::NoteOff {
                            id,
                            fade_secs: self.fadeout_secs,
                        });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::next_sample_id;

    #[test]
    fn backing_delay_is_travel_time_to_the_hit_line() {
        // (1200 - 375) / 300
        let sync = BackingSync::new(&GameConfig::default(), None);
        assert_eq!(sync.delay(), 2.75);
    }

    #[test]
    fn backing_starts_exactly_once() {
        let id = next_sample_id();
        let mut sync = BackingSync::new(&GameConfig::default(), Some(id));
        assert!(sync.maybe_start(2.5).is_none());
        assert!(matches!(
            sync.maybe_start(2.75),
            Some(AudioCommand::StartBacking { .. })
        ));
        // repeated calls past the threshold stay quiet
        assert!(sync.maybe_start(2.8).is_none());
        assert!(sync.maybe_start(10.0).is_none());
    }

    #[test]
    fn missing_track_is_a_silent_no_op() {
        let mut sync = BackingSync::new(&GameConfig::default(), None);
        assert!(sync.maybe_start(5.0).is_none());
        assert!(sync.stop().is_none());
    }

    #[test]
    fn stop_only_after_start() {
        let id = next_sample_id();
        let mut sync = BackingSync::new(&GameConfig::default(), Some(id));
        assert!(sync.stop().is_none());
        sync.maybe_start(3.0);
        assert!(matches!(sync.stop(), Some(AudioCommand::StopBacking)));
    }

    fn key_audio() -> (KeyAudio, crate::audio::SampleId, crate::audio::SampleId) {
        let cfg = GameConfig::default();
        let mut samples = KeySamples::empty(cfg.num_octaves());
        let low = next_sample_id();
        let high = next_sample_id();
        samples.set(0, 5, cfg.min_octave, low);
        samples.set(0, 6, cfg.min_octave, high);
        (KeyAudio::new(samples, &cfg), low, high)
    }

    #[test]
    fn press_sounds_the_current_octave_only() {
        let (audio, low, _) = key_audio();
        let mut out = Vec::new();
        audio.transitions(&[false; 7], &[true, false, false, false, false, false, false], 5, &mut out);
        assert_eq!(out.len(), 1);
        assert!(matches!(out[0], AudioCommand::NoteOn { id, .. } if id == low));
    }

    #[test]
    fn release_fades_both_octave_registers() {
        let (audio, low, high) = key_audio();
        let mut out = Vec::new();
        audio.transitions(&[true, false, false, false, false, false, false], &[false; 7], 5, &mut out);
        let faded: Vec<_> = out
            .iter()
            .map(|cmd| match cmd {
                AudioCommand::NoteOff { id, .. } => *id,
                other => panic!("unexpected command {other:?}"),
            })
            .collect();
        assert_eq!(faded, vec![low, high]);
    }

    #[test]
    fn held_keys_do_not_retrigger() {
        let (audio, _, _) = key_audio();
        let mut out = Vec::new();
        let held = [true, false, false, false, false, false, false];
        audio.transitions(&held, &held, 5, &mut out);
        assert!(out.is_empty());
    }
}

use std::collections::HashMap;

use crate::audio_api::AudioCommand;

use super::frame::StereoFrame;
use super::sample_buffer::SampleBuffer;
use super::sample_id::SampleId;
use super::voice::Voice;

const MAX_VOICES: usize = 32; // hard cap so we won't malloc in the audio callback

pub struct Engine {
    sample_rate: f32,
    samples: HashMap<SampleId, SampleBuffer>,
    voices: [Option<Voice>; MAX_VOICES], // fixed pool of key-sound voices
    backing: Option<Voice>,              // the one backing-track slot
}

impl Engine {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate as f32,
            samples: HashMap::new(),
            voices: [None; MAX_VOICES],
            backing: None,
        }
    }

    pub fn handle_cmd(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::RegisterSample { id, buffer } => {
                self.samples.insert(id, buffer);
            }
            AudioCommand::NoteOn { id, gain } => self.start_voice(id, gain),
            AudioCommand::NoteOff { id, fade_secs } => {
                let frames = fade_secs * self.sample_rate;
                for voice in self.voices.iter_mut().flatten() {
                    if voice.active && voice.sample_id == id {
                        voice.release(frames);
                    }
                }
            }
            AudioCommand::StartBacking { id, gain } => {
                // unknown id means the track never loaded; leave the slot empty
                if self.samples.contains_key(&id) {
                    self.backing = Some(Voice::new(id, gain));
                }
            }
            AudioCommand::StopBacking => self.backing = None,
        }
    }

    fn start_voice(&mut self, id: SampleId, gain: f32) {
        if !self.samples.contains_key(&id) {
            return;
        }
        // free slot, or steal slot 0 when the pool is full
        let slot = self
            .voices
            .iter()
            .position(|v| v.is_none_or(|v| !v.active))
            .unwrap_or(0);
        self.voices[slot] = Some(Voice::new(id, gain));
    }

    pub fn render_block(&mut self, out: &mut [StereoFrame]) {
        for frame in out.iter_mut() {
            *frame = StereoFrame::zero();
        }
        for voice in self.voices.iter_mut().flatten() {
            if let Some(buffer) = self.samples.get(&voice.sample_id) {
                voice.render_into(buffer, out);
            }
        }
        if let Some(backing) = &mut self.backing {
            if let Some(buffer) = self.samples.get(&backing.sample_id) {
                backing.render_into(buffer, out);
            }
        }
        if self.backing.is_some_and(|b| !b.active) {
            self.backing = None;
        }
    }
}

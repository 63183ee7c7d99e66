pub use crate::audio::{SampleBuffer, SampleId};

#[derive(Clone, Debug)]
pub enum AudioCommand {
    // The engine can't load files (would stall the callback), so buffers are
    // decoded up front (see sample_loader.rs) and registered before use.
    RegisterSample { id: SampleId, buffer: SampleBuffer },

    // Key sounds. NoteOff fades every voice playing `id` rather than cutting
    // it, so releases sound like lifting a piano key.
    NoteOn { id: SampleId, gain: f32 },
    NoteOff { id: SampleId, fade_secs: f32 },

    // The backing track has its own slot in the engine: starting replaces
    // whatever was there, stopping cuts it immediately.
    StartBacking { id: SampleId, gain: f32 },
    StopBacking,
}

use std::path::Path;

use crate::audio::{SampleBuffer, SampleId, next_sample_id};

// Decode a WAV from disk at the device rate, ready to register with the engine
pub fn load(path: &Path, target_rate: u32) -> anyhow::Result<(SampleId, SampleBuffer)> {
    let id = next_sample_id();
    let buffer = SampleBuffer::load_wav(path, target_rate)?;
    Ok((id, buffer))
}

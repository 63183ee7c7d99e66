use super::frame::StereoFrame;
use super::sample_buffer::SampleBuffer;
use super::sample_id::SampleId;

/// One playing sample. Buffers are pre-resampled to the device rate, so a
/// voice just walks the buffer one frame at a time; the only per-frame math
/// is the release fade.
#[derive(Clone, Copy, Debug)]
pub struct Voice {
    pub sample_id: SampleId,
    pub active: bool,
    pos: usize,
    gain: f32,
    level: f32,          // 1.0 while held, ramps to 0.0 after release
    fade_per_frame: f32, // 0.0 = sustained
}

impl Voice {
    pub fn new(sample_id: SampleId, gain: f32) -> Self {
        Self {
            sample_id,
            active: true,
            pos: 0,
            gain,
            level: 1.0,
            fade_per_frame: 0.0,
        }
    }

    /// Start fading out over `frames` output frames. A shorter fade already
    /// in progress wins, so a re-release can't stretch a dying voice.
    pub fn release(&mut self, frames: f32) {
        let step = if frames <= 1.0 { 1.0 } else { 1.0 / frames };
        if step > self.fade_per_frame {
            self.fade_per_frame = step;
        }
    }

    pub fn render_into(&mut self, buffer: &SampleBuffer, out: &mut [StereoFrame]) {
        if !self.active {
            return;
        }
        for frame in out.iter_mut() {
            let Some(&sample) = buffer.data.get(self.pos) else {
                self.active = false; // ran off the end of the sample
                break;
            };
            frame.add_scaled(sample, self.gain * self.level);
            self.pos += 1;

            if self.fade_per_frame > 0.0 {
                self.level -= self.fade_per_frame;
                if self.level <= 0.0 {
                    self.active = false;
                    break;
                }
            }
        }
    }
}

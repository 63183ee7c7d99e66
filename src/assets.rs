use std::collections::HashMap;
use std::path::Path;

use crate::audio::SampleId;
use crate::audio_api::AudioCommand;
use crate::loader::sample_loader;
use crate::shared::{GameConfig, NOTE_NAMES, NUM_KEYS};

/// One lookup table for every playable note sound, indexed by
/// (octave, key) instead of parallel per-octave maps.
#[derive(Clone, Debug)]
pub struct KeySamples {
    by_octave: Vec<[Option<SampleId>; NUM_KEYS]>,
}

impl KeySamples {
    pub fn empty(num_octaves: usize) -> Self {
        Self {
            by_octave: vec![[None; NUM_KEYS]; num_octaves],
        }
    }

    pub fn set(&mut self, key: usize, octave: u8, min_octave: u8, id: SampleId) {
        if let Some(row) = self.by_octave.get_mut((octave - min_octave) as usize) {
            row[key] = Some(id);
        }
    }

    pub fn get(&self, key: usize, octave: u8, min_octave: u8) -> Option<SampleId> {
        let idx = octave.checked_sub(min_octave)? as usize;
        *self.by_octave.get(idx)?.get(key)?
    }

    pub fn octaves(&self, min_octave: u8) -> impl Iterator<Item = u8> + '_ {
        (0..self.by_octave.len()).map(move |i| min_octave + i as u8)
    }
}

/// Everything a session needs from disk: the note samples and the chart's
/// backing track. Holds only ids; the decoded buffers live in the engine.
pub struct GameAssets {
    pub key_samples: KeySamples,
    pub backing: Option<SampleId>,
    // load-once memo per track path: the engine never evicts registered
    // buffers, so replaying a song must reuse its id, and a track that
    // failed to load is not retried
    backing_cache: HashMap<String, Option<SampleId>>,
}

impl GameAssets {
    pub fn new(key_samples: KeySamples) -> Self {
        Self {
            key_samples,
            backing: None,
            backing_cache: HashMap::new(),
        }
    }

    /// Load the note samples once at startup. They follow the fixed naming
    /// scheme c5.wav .. b6.wav under `audio_dir`; a missing file is reported
    /// here and its key simply stays silent in game. Returns the register
    /// commands to send to the engine.
    pub fn load(audio_dir: &Path, cfg: &GameConfig, sample_rate: u32) -> (Self, Vec<AudioCommand>) {
        let mut key_samples = KeySamples::empty(cfg.num_octaves());
        let mut cmds = Vec::new();

        for octave in cfg.min_octave..=cfg.max_octave {
            for (key, name) in NOTE_NAMES.iter().enumerate() {
                let path = audio_dir.join(format!("{name}{octave}.wav"));
                match sample_loader::load(&path, sample_rate) {
                    Ok((id, buffer)) => {
                        key_samples.set(key, octave, cfg.min_octave, id);
                        cmds.push(AudioCommand::RegisterSample { id, buffer });
                    }
                    Err(e) => {
                        eprintln!(
                            "pianotty: note sample {}: {e} (key stays silent)",
                            path.display()
                        );
                    }
                }
            }
        }

        (Self::new(key_samples), cmds)
    }

    /// Point this asset set at a chart's backing track. Each distinct track
    /// is decoded and registered at most once; replaying a song reuses the
    /// cached id. A broken track means the song plays silently with full
    /// scoring; its warning is returned (for the menu footer, since stderr
    /// is unreadable in raw mode) on the first attempt only, and the
    /// failure is memoized so the load is never retried.
    pub fn for_chart(
        &mut self,
        audio_dir: &Path,
        b_path: Option<&str>,
        sample_rate: u32,
    ) -> (Vec<AudioCommand>, Option<String>) {
        let mut cmds = Vec::new();
        let mut warning = None;

        self.backing = match b_path {
            None => None,
            Some(rel) => {
                if let Some(&cached) = self.backing_cache.get(rel) {
                    cached
                } else {
                    let path = audio_dir.join(rel);
                    let loaded = match sample_loader::load(&path, sample_rate) {
                        Ok((id, buffer)) => {
                            cmds.push(AudioCommand::RegisterSample { id, buffer });
                            Some(id)
                        }
                        Err(e) => {
                            warning = Some(format!(
                                "backing track {}: {e} (song plays silently)",
                                path.display()
                            ));
                            None
                        }
                    };
                    self.backing_cache.insert(rel.to_string(), loaded);
                    loaded
                }
            }
        };

        (cmds, warning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_audio_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "pianotty-assets-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_wav(dir: &Path, name: &str) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(dir.join(name), spec).unwrap();
        for _ in 0..64 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn assets() -> GameAssets {
        GameAssets::new(KeySamples::empty(2))
    }

    #[test]
    fn backing_track_is_decoded_and_registered_once_across_replays() {
        let dir = temp_audio_dir();
        write_wav(&dir, "track.wav");
        let mut assets = assets();

        let (cmds, warning) = assets.for_chart(&dir, Some("track.wav"), 44_100);
        assert_eq!(cmds.len(), 1);
        assert!(warning.is_none());
        let first_id = assets.backing.unwrap();

        // replaying the same song: no new decode, no new registration, same id
        let (cmds, warning) = assets.for_chart(&dir, Some("track.wav"), 44_100);
        assert!(cmds.is_empty());
        assert!(warning.is_none());
        assert_eq!(assets.backing, Some(first_id));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn missing_backing_track_warns_once_and_is_not_retried() {
        let dir = temp_audio_dir();
        let mut assets = assets();

        let (cmds, warning) = assets.for_chart(&dir, Some("nope.wav"), 44_100);
        assert!(cmds.is_empty());
        assert!(warning.is_some());
        assert_eq!(assets.backing, None);

        // second select of the same song: still silent, no repeat warning
        let (cmds, warning) = assets.for_chart(&dir, Some("nope.wav"), 44_100);
        assert!(cmds.is_empty());
        assert!(warning.is_none());
        assert_eq!(assets.backing, None);

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn trackless_chart_clears_any_previous_backing() {
        let dir = temp_audio_dir();
        write_wav(&dir, "track.wav");
        let mut assets = assets();

        assets.for_chart(&dir, Some("track.wav"), 44_100);
        assert!(assets.backing.is_some());

        assets.for_chart(&dir, None, 44_100);
        assert_eq!(assets.backing, None);

        std::fs::remove_dir_all(dir).ok();
    }
}

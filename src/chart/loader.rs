use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::shared::{GameConfig, NUM_KEYS};

use super::{Chart, NoteEvent, NoteKind};

// Raw mirror of the chart file. Charts in the wild write note_type as either
// a bare int or a string, so accept both.
#[derive(Deserialize)]
struct RawChart {
    bpm: u32,
    slots_per_bar: u32,
    #[serde(default)]
    b_path: Option<String>,
    notes: Vec<RawNote>,
}

#[derive(Deserialize)]
struct RawNote {
    bar: u32,
    slot: u32,
    note_type: NoteTypeField,
    pitch: i32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NoteTypeField {
    Num(u32),
    Text(String),
}

impl NoteTypeField {
    fn code(&self) -> String {
        match self {
            NoteTypeField::Num(n) => n.to_string(),
            NoteTypeField::Text(s) => s.clone(),
        }
    }
}

/// Load a chart file. A missing or malformed file is fatal to the caller;
/// individual bad notes are skipped with a warning so a typo in one note
/// can't take the whole song down.
pub fn load_chart(path: &Path, cfg: &GameConfig) -> anyhow::Result<Chart> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading chart {}", path.display()))?;
    let raw: RawChart = serde_json::from_str(&data)
        .with_context(|| format!("parsing chart {}", path.display()))?;

    anyhow::ensure!(raw.bpm > 0, "chart {}: bpm must be positive", path.display());
    anyhow::ensure!(
        raw.slots_per_bar > 0,
        "chart {}: slots_per_bar must be positive",
        path.display()
    );

    let max_pitch = (cfg.num_octaves() * NUM_KEYS) as i32 - 1;
    let mut notes = Vec::with_capacity(raw.notes.len());
    for note in &raw.notes {
        let Some(kind) = NoteKind::from_chart_code(&note.note_type.code()) else {
            eprintln!(
                "pianotty: {}: unknown note_type {:?}, skipping note",
                path.display(),
                note.note_type.code()
            );
            continue;
        };
        if note.bar < 1 || note.slot < 1 || note.slot > raw.slots_per_bar {
            eprintln!(
                "pianotty: {}: note at bar {} slot {} is out of range, skipping",
                path.display(),
                note.bar,
                note.slot
            );
            continue;
        }
        if note.pitch < 0 || note.pitch > max_pitch {
            eprintln!(
                "pianotty: {}: pitch {} outside 0..={}, skipping note",
                path.display(),
                note.pitch,
                max_pitch
            );
            continue;
        }
        notes.push(NoteEvent {
            bar: note.bar,
            slot: note.slot,
            kind,
            pitch: note.pitch,
        });
    }

    Ok(Chart {
        bpm: raw.bpm,
        slots_per_bar: raw.slots_per_bar,
        b_path: raw.b_path,
        notes,
    })
}

/// All chart files in a directory, sorted by name for a stable menu order.
pub fn index_charts_in_dir(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("reading songs dir {}", dir.display()))?
    {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_chart(body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "pianotty-chart-{}-{:?}.json",
            std::process::id(),
            std::thread::current().id()
        ));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn loads_a_minimal_chart() {
        let path = write_chart(
            r#"{"bpm":120,"slots_per_bar":16,
                "notes":[{"bar":1,"slot":1,"note_type":"4","pitch":0},
                         {"bar":2,"slot":16,"note_type":8,"pitch":13}]}"#,
        );
        let chart = load_chart(&path, &GameConfig::default()).unwrap();
        assert_eq!(chart.bpm, 120);
        assert_eq!(chart.b_path, None);
        assert_eq!(chart.notes.len(), 2);
        assert_eq!(chart.notes[0].kind, NoteKind::Quarter);
        assert_eq!(chart.notes[1].kind, NoteKind::Half); // int note_type accepted
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn bad_notes_are_skipped_not_fatal() {
        let path = write_chart(
            r#"{"bpm":120,"slots_per_bar":16,"b_path":"track.wav",
                "notes":[{"bar":1,"slot":1,"note_type":"4","pitch":0},
                         {"bar":1,"slot":17,"note_type":"4","pitch":0},
                         {"bar":1,"slot":2,"note_type":"3","pitch":0},
                         {"bar":1,"slot":3,"note_type":"4","pitch":99}]}"#,
        );
        let chart = load_chart(&path, &GameConfig::default()).unwrap();
        assert_eq!(chart.notes.len(), 1);
        assert_eq!(chart.b_path.as_deref(), Some("track.wav"));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_required_field_is_fatal() {
        let path = write_chart(r#"{"bpm":120,"notes":[]}"#);
        assert!(load_chart(&path, &GameConfig::default()).is_err());
        std::fs::remove_file(path).ok();
    }
}

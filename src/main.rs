mod assets;
mod audio;
mod audio_api;
mod chart;
mod loader;
mod session;
mod shared;
mod tui;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::terminal;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use assets::GameAssets;
use session::{Session, SessionSignal};
use shared::{GameConfig, InputEvent};
use tui::input::HeldKeys;

enum Screen {
    Menu,
    Playing(Session),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let root: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
    let songs_dir = root.join("songs");
    let audio_dir = root.join("audio");

    // index and load before raw mode so warnings land on a sane stderr
    let chart_paths = chart::index_charts_in_dir(&songs_dir)?;
    anyhow::ensure!(
        !chart_paths.is_empty(),
        "no chart files (*.json) in {}",
        songs_dir.display()
    );
    let song_names: Vec<String> = chart_paths
        .iter()
        .map(|p| {
            p.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.display().to_string())
        })
        .collect();

    let cfg = GameConfig::default();
    let audio = audio::start_audio()?;
    let (mut base_assets, cmds) = GameAssets::load(&audio_dir, &cfg, audio.sample_rate());
    for cmd in cmds {
        audio.send(cmd);
    }

    terminal::enable_raw_mode()?;
    // Enable keyboard enhancement for real press/release detection.
    // Falls back gracefully if the terminal doesn't support it.
    let _ = crossterm::execute!(
        std::io::stdout(),
        crossterm::event::PushKeyboardEnhancementFlags(
            crossterm::event::KeyboardEnhancementFlags::REPORT_EVENT_TYPES
        )
    );
    let _guard = RawModeGuard; // auto drops when out of scope

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let tick_rate = Duration::from_millis(16); // ~60fps
    let clock = Instant::now(); // the one time source for everything
    let mut last_now = 0.0f64;

    let mut screen = Screen::Menu;
    let mut cursor = 0usize;
    let mut status: Option<String> = None;
    let mut held = HeldKeys::default();

    loop {
        let next = match &mut screen {
            Screen::Menu => {
                term.draw(|frame| {
                    tui::view::render_menu(
                        frame,
                        frame.area(),
                        &song_names,
                        cursor,
                        status.as_deref(),
                    );
                })?;

                let mut next = None;
                for event in tui::input::poll_input(tick_rate, &mut held)? {
                    match event {
                        InputEvent::Quit => return Ok(()),
                        InputEvent::Up => cursor = cursor.saturating_sub(1),
                        InputEvent::Down => cursor = (cursor + 1).min(song_names.len() - 1),
                        InputEvent::Select => {
                            match chart::load_chart(&chart_paths[cursor], &cfg) {
                                Ok(chart) => {
                                    let (cmds, warning) = base_assets.for_chart(
                                        &audio_dir,
                                        chart.b_path.as_deref(),
                                        audio.sample_rate(),
                                    );
                                    for cmd in cmds {
                                        audio.send(cmd);
                                    }
                                    held.clear();
                                    // a broken backing track is not fatal;
                                    // the footer shows it once back in the menu
                                    status = warning;
                                    let now = clock.elapsed().as_secs_f64();
                                    last_now = now;
                                    next = Some(Screen::Playing(Session::new(
                                        &chart,
                                        &base_assets,
                                        cfg,
                                        now,
                                    )));
                                }
                                // chart-load failure is the one hard error;
                                // surface it and stay in the menu
                                Err(e) => status = Some(format!("{e:#}")),
                            }
                        }
                        _ => {}
                    }
                }
                next
            }

            Screen::Playing(session) => {
                term.draw(|frame| {
                    tui::view::render_session(frame, frame.area(), &session.view());
                })?;

                let events = tui::input::poll_input(tick_rate, &mut held)?;
                let now = clock.elapsed().as_secs_f64();
                let dt = now - last_now;
                last_now = now;

                let keys = *held.state();
                let (signal, cmds) = session.update(now, dt, &events, &keys);
                for cmd in cmds {
                    audio.send(cmd);
                }

                match signal {
                    SessionSignal::Playing => None,
                    SessionSignal::ExitRequested => {
                        held.clear();
                        Some(Screen::Menu)
                    }
                }
            }
        };

        if let Some(next) = next {
            screen = next;
        }
    }
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::event::PopKeyboardEnhancementFlags
        );
        let _ = terminal::disable_raw_mode();
    }
}

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};

use crate::shared::{InputEvent, KEY_LABELS, KeyState};

/// Held state of the seven playable keys, maintained from the press/release
/// pairs the keyboard-enhancement protocol gives us. Terminals that never
/// report releases leave keys latched, so notes sustain instead of fading;
/// degraded but playable, which is all the enhancement-flags fallback
/// promises.
#[derive(Default)]
pub struct HeldKeys {
    state: KeyState,
}

impl HeldKeys {
    pub fn state(&self) -> &KeyState {
        &self.state
    }

    // entering or leaving a session; nothing may stay stuck down
    pub fn clear(&mut self) {
        self.state = KeyState::default();
    }
}

// poll for input, track playable-key holds, resolve everything else into
// semantic events for the menu/session to handle
pub fn poll_input(timeout: Duration, held: &mut HeldKeys) -> anyhow::Result<Vec<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(vec![]);
    }

    let mut events = Vec::new();
    // drain everything queued this frame so chords arrive as one key state
    loop {
        if let Event::Key(key) = event::read()? {
            resolve_key(key.code, key.kind, held, &mut events);
        }
        if !event::poll(Duration::ZERO)? {
            break;
        }
    }
    Ok(events)
}

fn resolve_key(
    code: KeyCode,
    kind: KeyEventKind,
    held: &mut HeldKeys,
    out: &mut Vec<InputEvent>,
) {
    if let KeyCode::Char(c) = code {
        if let Some(key) = char_to_key(c) {
            // playable keys never become events; their held state is the
            // whole story, sampled once per frame by the session
            match kind {
                KeyEventKind::Press => held.state[key as usize] = true,
                KeyEventKind::Release => held.state[key as usize] = false,
                KeyEventKind::Repeat => {} // already held, nothing new
            }
            return;
        }
    }

    if kind != KeyEventKind::Press {
        return;
    }
    match code {
        KeyCode::Esc => out.push(InputEvent::Quit),
        KeyCode::Up => out.push(InputEvent::Up),
        KeyCode::Down => out.push(InputEvent::Down),
        KeyCode::Enter => out.push(InputEvent::Select),
        _ => {}
    }
}

// playable keys sit on the home row, one per diatonic position
fn char_to_key(c: char) -> Option<u8> {
    KEY_LABELS
        .iter()
        .position(|&label| label == c.to_ascii_lowercase())
        .map(|i| i as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_row_maps_to_diatonic_positions() {
        assert_eq!(char_to_key('a'), Some(0));
        assert_eq!(char_to_key('j'), Some(6));
        assert_eq!(char_to_key('A'), Some(0)); // shift doesn't change the key
        assert_eq!(char_to_key('k'), None);
    }

    #[test]
    fn playable_keys_update_held_state_without_events() {
        let mut held = HeldKeys::default();
        let mut out = Vec::new();

        resolve_key(KeyCode::Char('a'), KeyEventKind::Press, &mut held, &mut out);
        assert!(held.state()[0]);

        // auto-repeat while held changes nothing
        resolve_key(KeyCode::Char('a'), KeyEventKind::Press, &mut held, &mut out);
        resolve_key(KeyCode::Char('a'), KeyEventKind::Repeat, &mut held, &mut out);
        assert!(held.state()[0]);

        resolve_key(KeyCode::Char('a'), KeyEventKind::Release, &mut held, &mut out);
        assert!(!held.state()[0]);

        // the seven note keys are state, not events
        assert!(out.is_empty());
    }

    #[test]
    fn control_keys_become_events_on_press_only() {
        let mut held = HeldKeys::default();
        let mut out = Vec::new();

        resolve_key(KeyCode::Esc, KeyEventKind::Press, &mut held, &mut out);
        resolve_key(KeyCode::Up, KeyEventKind::Press, &mut held, &mut out);
        resolve_key(KeyCode::Up, KeyEventKind::Release, &mut held, &mut out);
        assert_eq!(out, vec![InputEvent::Quit, InputEvent::Up]);
    }
}

// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Terminal input: translating crossterm key events and the event loop that
//! feeds them to the editor.

use crate::terminal_renderer::TerminalRenderer;
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ry_core::{ChromeAction, Editor, FileLoader, KeyEvent, KeyKind, Modifiers, Renderer};
use std::io::Write;
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

/// Capacity of the channel between the input task and the event loop
pub const INPUT_CHANNEL_CAPACITY: usize = 1024;

fn crossterm_modifier_translate(modifiers: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: modifiers.contains(KeyModifiers::CONTROL),
        shift: modifiers.contains(KeyModifiers::SHIFT),
        alt: modifiers.contains(KeyModifiers::ALT),
        meta: modifiers.contains(KeyModifiers::META) || modifiers.contains(KeyModifiers::SUPER),
    }
}

/// Translate a crossterm key press into an editor key. Keys the editor has no
/// name for are dropped.
pub fn crossterm_key_translate(code: &KeyCode, modifiers: KeyModifiers) -> Option<KeyEvent> {
    let mut modifiers = crossterm_modifier_translate(modifiers);
    let kind = match code {
        KeyCode::Char(c) => {
            // Shift is already folded into the character.
            modifiers.shift = false;
            match *c {
                ' ' => KeyKind::Space,
                // Ctrl+Space arrives as NUL on some terminals
                '\x00' => KeyKind::Space,
                c => return Some(KeyEvent::new(modifiers, KeyKind::Rune, c)),
            }
        }
        KeyCode::Backspace => KeyKind::Backspace,
        KeyCode::Delete => KeyKind::Delete,
        KeyCode::Enter => KeyKind::Return,
        KeyCode::Esc => KeyKind::Escape,
        KeyCode::Tab => KeyKind::Tab,
        KeyCode::Left => KeyKind::Left,
        KeyCode::Right => KeyKind::Right,
        KeyCode::Up => KeyKind::Up,
        KeyCode::Down => KeyKind::Down,
        _ => return None,
    };
    Some(KeyEvent::new(modifiers, kind, '\0'))
}

/// Spawn the task reading terminal events. It stops when the event stream
/// ends or the receiving side is dropped.
pub fn spawn_input_task() -> mpsc::Receiver<Event> {
    let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
    tokio::spawn(async move {
        let mut events = EventStream::new();
        while let Some(event) = events.next().await {
            match event {
                Ok(event) => {
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "terminal event stream failed");
                    break;
                }
            }
        }
        debug!("input task finished");
    });
    rx
}

/// Run the editor until it asks to quit or the input channel closes.
///
/// While a key sequence is ambiguous the next event is awaited for at most
/// `sequence_timeout_ms`; on timeout the shorter binding is committed.
pub async fn event_loop_with_renderer<W: Write>(
    renderer: &mut TerminalRenderer<W>,
    editor: &mut Editor,
    events: &mut mpsc::Receiver<Event>,
    loader: &dyn FileLoader,
) -> Result<(), std::io::Error> {
    renderer.render(editor)?;

    loop {
        let event = if editor.matcher.is_ambiguous() {
            let wait = Duration::from_millis(editor.config.sequence_timeout_ms);
            match timeout(wait, events.recv()).await {
                Ok(event) => event,
                Err(_) => {
                    let actions = editor.flush_pending();
                    if handle_chrome_actions(editor, loader, actions).await {
                        return Ok(());
                    }
                    renderer.render(editor)?;
                    continue;
                }
            }
        } else {
            events.recv().await
        };

        let Some(event) = event else {
            info!("input closed");
            return Ok(());
        };

        let actions = match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                match crossterm_key_translate(&key.code, key.modifiers) {
                    Some(key) => editor.handle_key(key),
                    None => Vec::new(),
                }
            }
            Event::Resize(width, height) => {
                renderer.resize(width, height);
                Vec::new()
            }
            _ => continue,
        };

        if handle_chrome_actions(editor, loader, actions).await {
            return Ok(());
        }
        renderer.render(editor)?;
    }
}

/// Carry out what the editor asked for. Returns true when it is time to quit.
async fn handle_chrome_actions(
    editor: &mut Editor,
    loader: &dyn FileLoader,
    actions: Vec<ChromeAction>,
) -> bool {
    for action in actions {
        match action {
            ChromeAction::Quit => return true,
            ChromeAction::OpenFile(path) => {
                editor.open_file(loader, &path).await;
            }
        }
    }
    false
}

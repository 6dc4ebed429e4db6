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

//! What a frontend needs to draw the editor: the `Renderer` trait and the
//! frontend-independent parts of a frame (window placement, gutter text,
//! tab expansion, status and echo lines).

use crate::editor::{Editor, MessageKind};
use crate::gutter::{calculate_gutter_width, format_line_number, GutterConfig};
use crate::window::Rect;
use crate::WindowId;

/// Rows at the bottom of the screen used for messages and prompts
pub const ECHO_AREA_HEIGHT: u16 = 1;

/// Characters drawn with the `special` face
pub const SPECIAL_CHARS: &str = "[]{}()/\\";

/// Face names, also the keys of the config color table
pub const FACE_DEFAULT: &str = "default";
pub const FACE_CURSOR: &str = "cursor";
pub const FACE_SPECIAL: &str = "special";
pub const FACE_LINE_NUMBER: &str = "linenumber";
pub const FACE_STATUS_BAR: &str = "statusbar";
pub const FACE_STATUS_BAR_HIGHLIGHT: &str = "statusbar.highlight";
pub const FACE_MESSAGE_ERROR: &str = "message.error";

/// A frontend able to draw an editor.
pub trait Renderer {
    type Error;

    /// Draw everything. Takes the editor mutably since laying out windows
    /// updates their scroll offsets.
    fn render(&mut self, editor: &mut Editor) -> Result<(), Self::Error>;

    /// Forget what is on screen so the next render repaints it all.
    fn invalidate(&mut self);
}

/// One window's place on screen. The last row of `rect` is its status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowFrame {
    pub window: WindowId,
    pub rect: Rect,
    pub active: bool,
}

/// Lay the windows out over a `width` x `height` screen, leaving the echo
/// area free, and scroll each so its cursor is visible.
pub fn frame_layout(editor: &mut Editor, width: u16, height: u16) -> Vec<WindowFrame> {
    let area = Rect::new(0, 0, width, height.saturating_sub(ECHO_AREA_HEIGHT));
    let current = editor.windows.current();
    let layout = editor.windows.layout(area);
    for (window, rect) in &layout {
        editor.adjust_scroll(*window, rect.h);
    }
    layout
        .into_iter()
        .map(|(window, rect)| WindowFrame {
            window,
            rect,
            active: window == current,
        })
        .collect()
}

/// Gutter width for a buffer of `line_count` lines under the editor config.
pub fn gutter_width(editor: &Editor, line_count: usize) -> usize {
    calculate_gutter_width(line_count, &GutterConfig::from_numbers(editor.config.numbers))
}

/// Gutter text for a line, empty when numbers are off.
pub fn gutter_text(line_index: usize, gutter_width: usize) -> String {
    if gutter_width == 0 {
        return String::new();
    }
    format!("{} ", format_line_number(line_index, gutter_width - 1))
}

/// One screen cell of a buffer line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    /// Column in the buffer line this cell shows
    pub column: usize,
    pub face: &'static str,
}

/// Expand a buffer line into screen cells. A tab becomes a `>` followed by
/// spaces up to the next tab stop.
pub fn line_cells(text: &str, tab_width: usize) -> Vec<Cell> {
    let tab_width = tab_width.max(1);
    let mut cells = Vec::with_capacity(text.len());
    for (column, ch) in text.chars().enumerate() {
        if ch == '\t' {
            let span = tab_width - cells.len() % tab_width;
            cells.push(Cell {
                ch: '>',
                column,
                face: FACE_SPECIAL,
            });
            cells.extend((1..span).map(|_| Cell {
                ch: ' ',
                column,
                face: FACE_DEFAULT,
            }));
        } else {
            let face = if SPECIAL_CHARS.contains(ch) {
                FACE_SPECIAL
            } else {
                FACE_DEFAULT
            };
            cells.push(Cell { ch, column, face });
        }
    }
    cells
}

/// Status bar pieces for a window: the highlighted mode tag, the buffer name
/// and the position summary drawn at the right edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub mode: String,
    pub name: String,
    pub position: String,
}

pub fn status_line(editor: &Editor, window: WindowId) -> Option<StatusLine> {
    let view = editor.windows.view(window)?;
    let buffer = editor.buffers.get(view.buffer)?;
    let cursor = buffer.cursor();
    let modified = if buffer.is_modified() { " [+]" } else { "" };
    Some(StatusLine {
        mode: format!(" {} ", editor.mode_name(view.buffer)),
        name: format!(" {}{}", buffer.name(), modified),
        position: format!(
            "({},{}) {} ",
            cursor.column + 1,
            cursor.line + 1,
            buffer.line_count()
        ),
    })
}

/// Text for the echo area and the face to draw it with. An open prompt wins
/// over a message, a message over the keys typed so far.
pub fn echo_line(editor: &Editor) -> (String, &'static str) {
    if let Some(prompt) = &editor.prompt {
        return (format!("{}{}", prompt.kind.label(), prompt.input), FACE_DEFAULT);
    }
    if let Some(message) = &editor.message {
        let face = match message.kind {
            MessageKind::Info => FACE_DEFAULT,
            MessageKind::Error => FACE_MESSAGE_ERROR,
        };
        return (message.text.clone(), face);
    }
    (editor.matcher.pending().to_string(), FACE_DEFAULT)
}

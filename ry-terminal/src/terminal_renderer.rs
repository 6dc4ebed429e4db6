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

use crossterm::style::{Color, Print, Stylize};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, queue};
use ry_core::renderer::{
    echo_line, frame_layout, gutter_text, gutter_width, line_cells, status_line, Renderer,
    WindowFrame, FACE_CURSOR, FACE_DEFAULT, FACE_LINE_NUMBER, FACE_STATUS_BAR,
    FACE_STATUS_BAR_HIGHLIGHT,
};
use ry_core::{Config, Editor, Location};
use std::collections::HashMap;
use std::io::Write;

/// Parse a color name or `#rrggbb` into a crossterm color. `default` and
/// unknown names leave the terminal's own color.
pub fn parse_color(name: &str) -> Color {
    if let Some(hex) = name.strip_prefix('#') {
        if hex.len() == 6 && hex.is_ascii() {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Color::Rgb { r, g, b };
            }
        }
        return Color::Reset;
    }
    match name.to_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "maroon" => Color::DarkRed,
        "green" | "lime" => Color::Green,
        "darkgreen" => Color::DarkGreen,
        "yellow" => Color::Yellow,
        "olive" => Color::DarkYellow,
        "blue" => Color::Blue,
        "navy" => Color::DarkBlue,
        "magenta" | "fuchsia" => Color::Magenta,
        "purple" => Color::DarkMagenta,
        "cyan" | "aqua" => Color::Cyan,
        "teal" => Color::DarkCyan,
        "white" => Color::White,
        "grey" | "gray" | "silver" => Color::Grey,
        "darkgrey" | "darkgray" => Color::DarkGrey,
        _ => Color::Reset,
    }
}

/// Face colors resolved from the config once at startup
#[derive(Debug, Clone)]
pub struct Theme {
    faces: HashMap<String, (Color, Color)>,
    default: (Color, Color),
}

impl Theme {
    pub fn from_config(config: &Config) -> Self {
        let faces: HashMap<_, _> = config
            .colors
            .iter()
            .map(|(name, style)| (name.clone(), (parse_color(&style.fg), parse_color(&style.bg))))
            .collect();
        let default = faces
            .get(FACE_DEFAULT)
            .copied()
            .unwrap_or((Color::Reset, Color::Reset));
        Self { faces, default }
    }

    /// Foreground and background for a face, falling back to `default`.
    pub fn face(&self, name: &str) -> (Color, Color) {
        self.faces.get(name).copied().unwrap_or(self.default)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

fn print_face(
    device: &mut impl Write,
    theme: &Theme,
    face: &str,
    text: &str,
) -> Result<(), std::io::Error> {
    let (fg, bg) = theme.face(face);
    queue!(device, Print(text.with(fg).on(bg)))
}

/// Keep the first `width` chars of `text`.
fn clip(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

pub struct TerminalRenderer<W: Write> {
    pub device: W,
    pub theme: Theme,
    width: u16,
    height: u16,
    clear_pending: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(device: W, theme: Theme, width: u16, height: u16) -> Self {
        Self {
            device,
            theme,
            width,
            height,
            clear_pending: true,
        }
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.invalidate();
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    type Error = std::io::Error;

    fn render(&mut self, editor: &mut Editor) -> Result<(), std::io::Error> {
        if self.clear_pending {
            queue!(self.device, Clear(ClearType::All))?;
            self.clear_pending = false;
        }
        queue!(self.device, cursor::Hide)?;

        let frames = frame_layout(editor, self.width, self.height);
        for frame in &frames {
            draw_window(&mut self.device, editor, frame, &self.theme)?;
        }
        draw_echo_area(&mut self.device, editor, self.width, self.height, &self.theme)?;

        self.device.flush()
    }

    fn invalidate(&mut self) {
        self.clear_pending = true;
    }
}

/// Draw one window: gutter and text rows, then its status bar on the last row.
pub fn draw_window(
    device: &mut impl Write,
    editor: &Editor,
    frame: &WindowFrame,
    theme: &Theme,
) -> Result<(), std::io::Error> {
    let Some(view) = editor.windows.view(frame.window) else {
        return Ok(());
    };
    let Some(buffer) = editor.buffers.get(view.buffer) else {
        return Ok(());
    };
    let rect = frame.rect;
    if rect.w == 0 || rect.h == 0 {
        return Ok(());
    }
    let width = rect.w as usize;
    let text_rows = rect.h - 1;
    let gutter = gutter_width(editor, buffer.line_count()).min(width);
    let cursor = frame.active.then(|| buffer.cursor());

    for row in 0..text_rows {
        let line = view.scroll_offset + row as usize;
        queue!(device, cursor::MoveTo(rect.x, rect.y + row))?;
        if line >= buffer.line_count() {
            print_face(device, theme, FACE_DEFAULT, &" ".repeat(width))?;
            continue;
        }

        let number = clip(&gutter_text(line, gutter), width);
        print_face(device, theme, FACE_LINE_NUMBER, &number)?;
        let mut used = number.chars().count();
        let cells = line_cells(buffer.line(line).unwrap_or(""), editor.config.tab_width);
        let mut prev_column = None;
        for cell in &cells {
            if used >= width {
                break;
            }
            let at = Location::new(line, cell.column);
            let first_of_column = prev_column != Some(cell.column);
            prev_column = Some(cell.column);
            let face = if first_of_column && cursor == Some(at) {
                FACE_CURSOR
            } else if let Some(h) = view.highlights.iter().find(|h| h.contains(at)) {
                h.face
            } else {
                cell.face
            };
            print_face(device, theme, face, cell.ch.encode_utf8(&mut [0; 4]))?;
            used += 1;
        }
        // The cursor can sit one past the last char.
        let line_len = buffer.line_len(line);
        if used < width && cursor == Some(Location::new(line, line_len)) {
            print_face(device, theme, FACE_CURSOR, " ")?;
            used += 1;
        }
        if used < width {
            print_face(device, theme, FACE_DEFAULT, &" ".repeat(width - used))?;
        }
    }

    draw_status_bar(device, editor, frame, theme)
}

fn draw_status_bar(
    device: &mut impl Write,
    editor: &Editor,
    frame: &WindowFrame,
    theme: &Theme,
) -> Result<(), std::io::Error> {
    let Some(status) = status_line(editor, frame.window) else {
        return Ok(());
    };
    let rect = frame.rect;
    let width = rect.w as usize;
    let mode = clip(&status.mode, width);
    let position_len = status.position.chars().count();
    let middle = width
        .saturating_sub(mode.chars().count())
        .saturating_sub(position_len);
    let name = format!("{:<middle$}", clip(&status.name, middle), middle = middle);

    queue!(device, cursor::MoveTo(rect.x, rect.y + rect.h - 1))?;
    print_face(device, theme, FACE_STATUS_BAR_HIGHLIGHT, &mode)?;
    print_face(device, theme, FACE_STATUS_BAR, &name)?;
    let rest = width.saturating_sub(mode.chars().count() + middle);
    print_face(device, theme, FACE_STATUS_BAR, &clip(&status.position, rest))
}

/// The bottom line: the prompt being typed, the last message, or the keys of
/// an unfinished sequence.
pub fn draw_echo_area(
    device: &mut impl Write,
    editor: &Editor,
    width: u16,
    height: u16,
    theme: &Theme,
) -> Result<(), std::io::Error> {
    if height == 0 {
        return Ok(());
    }
    let (text, face) = echo_line(editor);
    let text = clip(&text, width as usize);
    queue!(
        device,
        cursor::MoveTo(0, height - 1),
        Clear(ClearType::CurrentLine)
    )?;
    print_face(device, theme, face, &text)?;
    if editor.prompt.is_some() && text.chars().count() < width as usize {
        print_face(device, theme, FACE_CURSOR, " ")?;
    }
    Ok(())
}

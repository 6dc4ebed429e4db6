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

//! Cursor movement over a [`Buffer`], in lines and columns and by words.

use crate::buffer::{Buffer, Location, Point};

/// Letters, digits and underscore make up words. Everything else, line feeds
/// included, separates them.
pub fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl Buffer {
    /// Place the cursor at `column` on `line`. The line is clamped to the
    /// buffer, then the column to that line (one past its last char allowed).
    pub fn move_to(&mut self, column: usize, line: usize) {
        let line = line.min(self.line_count().saturating_sub(1));
        let column = column.min(self.line_len(line));
        let offset = self.location_to_offset(line, column);
        self.set_point(offset as Point - 1);
    }

    /// Move relative to the cursor. Vertical moves keep the column the cursor
    /// had before the move, clamped to the target line.
    pub fn move_by(&mut self, columns: isize, lines: isize) {
        let Location { line, column } = self.cursor();
        let line = line.saturating_add_signed(lines);
        let column = column.saturating_add_signed(columns);
        self.move_to(column, line);
    }

    pub fn move_line_start(&mut self) {
        let line = self.cursor().line;
        self.move_to(0, line);
    }

    pub fn move_line_end(&mut self) {
        let line = self.cursor().line;
        self.move_to(self.line_len(line), line);
    }

    pub fn move_top(&mut self) {
        self.move_to(0, 0);
    }

    pub fn move_bottom(&mut self) {
        self.move_to(0, self.line_count().saturating_sub(1));
    }

    /// Jump `lines` lines up (negative) or down (positive).
    pub fn move_jump(&mut self, lines: isize) {
        self.move_by(0, lines);
    }

    /// The char the cursor sits on, if any.
    pub fn char_under_cursor(&self) -> Option<char> {
        let offset = (self.point() + 1) as usize;
        (offset < self.len()).then(|| self.text().char_at(offset))
    }

    /// The word touching the cursor, scanning out from the char under it.
    pub fn word_under_cursor(&self) -> Option<String> {
        let offset = (self.point() + 1) as usize;
        if !self.char_under_cursor().is_some_and(is_word) {
            return None;
        }
        let text = self.text();
        let mut start = offset;
        while start > 0 && is_word(text.char_at(start - 1)) {
            start -= 1;
        }
        let mut end = offset;
        while end < self.len() && is_word(text.char_at(end)) {
            end += 1;
        }
        Some(text.slice(start..end))
    }

    /// Move to the start of the next word, crossing line boundaries. Returns
    /// false, without moving, when no word follows the cursor.
    pub fn move_word_forward(&mut self) -> bool {
        let len = self.len();
        let start = (self.point() + 1) as usize;
        if start >= len {
            return false;
        }
        let mut chars = self.text().chars_at(start).peekable();
        let mut offset = start;
        while chars.next_if(|c| is_word(*c)).is_some() {
            offset += 1;
        }
        while chars.next_if(|c| !is_word(*c)).is_some() {
            offset += 1;
        }
        if offset >= len {
            return false;
        }
        self.set_point(offset as Point - 1);
        true
    }

    /// Move to the start of the previous word, crossing line boundaries.
    /// Returns false, without moving, when no word precedes the cursor.
    pub fn move_word_backward(&mut self) -> bool {
        let text = self.text();
        let mut offset = (self.point() + 1) as usize;
        while offset > 0 && !is_word(text.char_at(offset - 1)) {
            offset -= 1;
        }
        if offset == 0 {
            return false;
        }
        while offset > 0 && is_word(text.char_at(offset - 1)) {
            offset -= 1;
        }
        self.set_point(offset as Point - 1);
        true
    }

    /// Open an empty line below the cursor line and move onto it.
    pub fn open_line_below(&mut self) {
        self.move_line_end();
        self.insert("\n");
    }

    /// Open an empty line above the cursor line and move onto it.
    pub fn open_line_above(&mut self) {
        self.move_line_start();
        self.insert("\n");
        self.point_move(-1);
    }
}

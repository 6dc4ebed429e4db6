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

use ropey::Rope;
use std::ops::Range;

/// Character-addressed text storage backed by a rope.
///
/// All offsets are in chars, not bytes. Insertion accepts `0..=len`, access
/// accepts `0..len`. Callers are expected to clamp; out-of-range offsets are a
/// contract violation and panic inside ropey.
#[derive(Debug, Clone, Default)]
pub struct TextStore {
    rope: Rope,
}

impl TextStore {
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Insert `text` so that its first char lands at `offset`. O(log N)
    pub fn insert(&mut self, offset: usize, text: &str) {
        self.rope.insert(offset, text);
    }

    /// Remove `count` chars starting at `offset`. O(log N)
    pub fn delete(&mut self, offset: usize, count: usize) {
        self.rope.remove(offset..offset + count);
    }

    pub fn len(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    pub fn char_at(&self, offset: usize) -> char {
        self.rope.char(offset)
    }

    pub fn slice(&self, range: Range<usize>) -> String {
        self.rope.slice(range).to_string()
    }

    /// Index of the line containing `offset`. Only `\n` separates lines.
    pub fn char_to_line(&self, offset: usize) -> usize {
        self.rope.char_to_line(offset)
    }

    pub fn line_to_char(&self, line: usize) -> usize {
        self.rope.line_to_char(line)
    }

    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    /// Iterate chars starting at `offset`.
    pub fn chars_at(&self, offset: usize) -> ropey::iter::Chars<'_> {
        self.rope.chars_at(offset)
    }
}

impl std::fmt::Display for TextStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_len() {
        let mut store = TextStore::new();
        store.insert(0, "hello");
        store.insert(5, " world");
        store.insert(0, ">");
        assert_eq!(store.to_string(), ">hello world");
        assert_eq!(store.len(), 12);
    }

    #[test]
    fn test_delete() {
        let mut store = TextStore::from_text("hello cruel world");
        store.delete(6, 6);
        assert_eq!(store.to_string(), "hello world");
        store.delete(0, 0);
        assert_eq!(store.len(), 11);
    }

    #[test]
    fn test_char_offsets_not_bytes() {
        let mut store = TextStore::from_text("héllo");
        assert_eq!(store.len(), 5);
        assert_eq!(store.char_at(1), 'é');
        store.insert(2, "ü");
        assert_eq!(store.to_string(), "héüllo");
        store.delete(1, 2);
        assert_eq!(store.to_string(), "hllo");
    }

    #[test]
    fn test_lines_only_break_on_newline() {
        let store = TextStore::from_text("one\r\ntwo\nthree");
        assert_eq!(store.len_lines(), 3);
        assert_eq!(store.line_to_char(1), 5);
        assert_eq!(store.char_to_line(9), 2);
    }
}

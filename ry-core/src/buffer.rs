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

use crate::mode::ModeKind;
use crate::text_store::TextStore;
use crate::{MarkId, ModeId};
use slotmap::SlotMap;
use std::path::{Path, PathBuf};

/// Offset of the character immediately before the cursor. `-1` means the
/// cursor sits before the first character; text is inserted at `point + 1`.
pub type Point = isize;

/// A (line, column) position, both zero-based and counted in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A remembered point in a buffer.
///
/// Regular marks follow the text they sit in when edits happen before them.
/// Fixed marks keep their raw offset and are only clamped back into range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    pub location: Point,
    pub fixed: bool,
}

/// One editable document: text, cursor, marks and the modes active on it.
pub struct Buffer {
    name: String,
    path: Option<PathBuf>,
    text: TextStore,
    point: Point,
    modified: bool,
    marks: SlotMap<MarkId, Mark>,
    /// Active modes in the order they were added.
    modes: Vec<(ModeId, ModeKind)>,
    /// Text split on '\n', rebuilt after every mutation.
    lines: Vec<String>,
    /// Bumped on every mutation so observers can notice changes cheaply.
    version: u64,
}

impl Buffer {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_text(name, "")
    }

    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        let mut buffer = Self {
            name: name.into(),
            path: None,
            text: TextStore::from_text(text),
            point: -1,
            modified: false,
            marks: SlotMap::with_key(),
            modes: Vec::new(),
            lines: Vec::new(),
            version: 0,
        };
        buffer.cache_lines();
        buffer
    }

    /// Create a buffer for file contents. The buffer takes the path as its name.
    pub fn from_file(path: &Path, text: &str) -> Self {
        let mut buffer = Self::from_text(path.display().to_string(), text);
        buffer.path = Some(path.to_path_buf());
        buffer
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn point(&self) -> Point {
        self.point
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn text(&self) -> &TextStore {
        &self.text
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, line: usize) -> Option<&str> {
        self.lines.get(line).map(String::as_str)
    }

    pub fn content(&self) -> String {
        self.text.to_string()
    }

    fn cache_lines(&mut self) {
        self.lines = self.text.to_string().split('\n').map(str::to_string).collect();
    }

    fn touch(&mut self) {
        self.modified = true;
        self.version += 1;
        self.cache_lines();
    }

    /// Insert `text` after the point and advance the point past it.
    pub fn insert(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let offset = (self.point + 1) as usize;
        let count = text.chars().count();
        self.text.insert(offset, text);
        self.shift_marks_for_insert(offset, count);
        self.touch();
        self.point_move(count as isize);
    }

    pub fn new_line_and_indent(&mut self) {
        self.insert("\n");
    }

    /// Remove up to `count` chars after the point. The point stays put.
    pub fn delete(&mut self, count: usize) {
        let offset = (self.point + 1) as usize;
        if offset >= self.text.len() || count == 0 {
            return;
        }
        let count = count.min(self.text.len() - offset);
        self.text.delete(offset, count);
        self.shift_marks_for_delete(offset, count);
        self.touch();
    }

    /// Remove the character before the cursor and step the point back over it.
    pub fn backspace(&mut self) {
        if self.point < 0 {
            return;
        }
        let offset = self.point as usize;
        self.text.delete(offset, 1);
        self.shift_marks_for_delete(offset, 1);
        self.point -= 1;
        self.touch();
    }

    /// Move the point by `delta`, clamped to `-1..=len-1`.
    pub fn point_move(&mut self, delta: isize) {
        self.point = self.clamp_point(self.point.saturating_add(delta));
    }

    /// Place the point directly, clamped like `point_move`.
    pub fn set_point(&mut self, point: Point) {
        self.point = self.clamp_point(point);
    }

    fn clamp_point(&self, point: Point) -> Point {
        point.clamp(-1, self.text.len() as isize - 1)
    }

    /// Cursor position as (line, column). The cursor sits at offset `point + 1`.
    pub fn cursor(&self) -> Location {
        self.offset_to_location((self.point + 1) as usize)
    }

    pub fn offset_to_location(&self, offset: usize) -> Location {
        let offset = offset.min(self.text.len());
        let line = self.text.char_to_line(offset);
        Location::new(line, offset - self.text.line_to_char(line))
    }

    /// Char offset of `column` on `line`. Both must be in range.
    pub fn location_to_offset(&self, line: usize, column: usize) -> usize {
        self.text.line_to_char(line) + column
    }

    /// Line length in chars, excluding the line feed.
    pub fn line_len(&self, line: usize) -> usize {
        self.lines.get(line).map_or(0, |l| l.chars().count())
    }

    /// Scan forward from the point for `needle`. On success the point lands on
    /// the first char of the match.
    pub fn find_first_forward(&mut self, needle: &str) -> bool {
        let needle: Vec<char> = needle.chars().collect();
        if needle.is_empty() {
            return false;
        }
        let haystack: Vec<char> = self.text.to_string().chars().collect();
        let start = self.point.max(0) as usize;
        if start + needle.len() > haystack.len() {
            return false;
        }
        let found = (start..=haystack.len() - needle.len())
            .find(|&s| haystack[s..s + needle.len()] == needle[..]);
        match found {
            Some(s) => {
                self.point = s as Point;
                true
            }
            None => false,
        }
    }

    /// Scan backward from the point for the nearest match ending at or before it.
    pub fn find_first_backward(&mut self, needle: &str) -> bool {
        let needle: Vec<char> = needle.chars().collect();
        if needle.is_empty() || self.point < 0 {
            return false;
        }
        let haystack: Vec<char> = self.text.to_string().chars().collect();
        let end = self.point as usize + 1;
        if end < needle.len() {
            return false;
        }
        let found = (0..=end - needle.len())
            .rev()
            .find(|&s| haystack[s..s + needle.len()] == needle[..]);
        match found {
            Some(s) => {
                self.point = s as Point;
                true
            }
            None => false,
        }
    }

    pub fn mark_create(&mut self) -> MarkId {
        self.marks.insert(Mark {
            location: self.point,
            fixed: false,
        })
    }

    pub fn mark_create_fixed(&mut self) -> MarkId {
        self.marks.insert(Mark {
            location: self.point,
            fixed: true,
        })
    }

    pub fn mark_delete(&mut self, mark: MarkId) -> Option<Mark> {
        self.marks.remove(mark)
    }

    pub fn mark(&self, mark: MarkId) -> Option<Mark> {
        self.marks.get(mark).copied()
    }

    pub fn mark_count(&self) -> usize {
        self.marks.len()
    }

    pub fn is_point_at_mark(&self, mark: MarkId) -> bool {
        self.marks
            .get(mark)
            .is_some_and(|m| m.location == self.point)
    }

    /// Move the point to the mark. Returns false for a stale handle.
    pub fn goto_mark(&mut self, mark: MarkId) -> bool {
        match self.marks.get(mark) {
            Some(m) => {
                self.point = self.clamp_point(m.location);
                true
            }
            None => false,
        }
    }

    fn shift_marks_for_insert(&mut self, offset: usize, count: usize) {
        let offset = offset as isize;
        let count = count as isize;
        for mark in self.marks.values_mut().filter(|m| !m.fixed) {
            if mark.location >= offset {
                mark.location += count;
            }
        }
    }

    fn shift_marks_for_delete(&mut self, offset: usize, count: usize) {
        let start = offset as isize;
        let end = start + count as isize;
        let last = self.text.len() as isize - 1;
        for mark in self.marks.values_mut() {
            if mark.fixed {
                mark.location = mark.location.min(last);
            } else if mark.location >= end {
                mark.location -= count as isize;
            } else if mark.location >= start {
                mark.location = start - 1;
            }
        }
    }

    /// Activate a mode. An editing or major mode replaces the one of the same
    /// kind; minor modes stack.
    pub fn mode_add(&mut self, mode: ModeId, kind: ModeKind) {
        if kind != ModeKind::Minor {
            self.modes.retain(|(_, k)| *k != kind);
        }
        self.modes.retain(|(id, _)| *id != mode);
        self.modes.push((mode, kind));
    }

    pub fn mode_remove(&mut self, mode: ModeId) {
        self.modes.retain(|(id, _)| *id != mode);
    }

    /// Active modes, oldest first.
    pub fn modes(&self) -> impl DoubleEndedIterator<Item = ModeId> + '_ {
        self.modes.iter().map(|(id, _)| *id)
    }

    pub fn has_mode(&self, mode: ModeId) -> bool {
        self.modes.iter().any(|(id, _)| *id == mode)
    }

    pub fn mode_of_kind(&self, kind: ModeKind) -> Option<ModeId> {
        self.modes.iter().find(|(_, k)| *k == kind).map(|(id, _)| *id)
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("name", &self.name)
            .field("point", &self.point)
            .field("len", &self.text.len())
            .field("modified", &self.modified)
            .finish()
    }
}

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

use crate::buffer::{Buffer, Location};
use crate::window::Highlight;
use crate::BufferId;
use regex::Regex;
use tracing::debug;

/// Face used for search matches.
pub const SEARCH_FACE: &str = "search";

/// One match of the current search, in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    pub at: Location,
    pub len: usize,
}

/// Literal text search over one buffer's lines.
///
/// Results are recomputed whenever the searched buffer changes, so `n`/`N`
/// keep working after edits.
#[derive(Debug, Default)]
pub struct Search {
    query: Option<String>,
    pattern: Option<Regex>,
    buffer: Option<BufferId>,
    results: Vec<SearchMatch>,
    index: usize,
    seen_version: u64,
    /// Whether matches should be drawn.
    pub highlight: bool,
}

impl Search {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn buffer(&self) -> Option<BufferId> {
        self.buffer
    }

    pub fn results(&self) -> &[SearchMatch] {
        &self.results
    }

    pub fn current(&self) -> Option<SearchMatch> {
        self.results.get(self.index).copied()
    }

    /// Search `buffer` for `query` and move to the first match. Returns false
    /// when there is nothing to find.
    pub fn find(&mut self, id: BufferId, buffer: &mut Buffer, query: &str) -> bool {
        self.clear();
        if query.is_empty() {
            return false;
        }
        let pattern = match Regex::new(&regex::escape(query)) {
            Ok(pattern) => pattern,
            Err(e) => {
                debug!(%e, "search pattern rejected");
                return false;
            }
        };
        self.query = Some(query.to_string());
        self.pattern = Some(pattern);
        self.buffer = Some(id);
        self.highlight = true;
        self.compute(buffer);
        debug!(query, matches = self.results.len(), "search");
        self.next(buffer)
    }

    fn compute(&mut self, buffer: &Buffer) {
        self.results.clear();
        self.seen_version = buffer.version();
        let Some(pattern) = &self.pattern else {
            return;
        };
        for (line, text) in buffer.lines().iter().enumerate() {
            for m in pattern.find_iter(text) {
                self.results.push(SearchMatch {
                    at: Location::new(line, text[..m.start()].chars().count()),
                    len: m.as_str().chars().count(),
                });
            }
        }
        // The next `next` lands on the first match.
        self.index = self.results.len().saturating_sub(1);
    }

    /// Recompute results if `buffer` changed since the last search.
    pub fn refresh(&mut self, id: BufferId, buffer: &Buffer) -> bool {
        if self.buffer != Some(id) || self.seen_version == buffer.version() {
            return false;
        }
        self.compute(buffer);
        true
    }

    fn goto(&self, buffer: &mut Buffer) -> bool {
        match self.current() {
            Some(m) => {
                buffer.move_to(m.at.column, m.at.line);
                true
            }
            None => false,
        }
    }

    pub fn next(&mut self, buffer: &mut Buffer) -> bool {
        if self.results.is_empty() {
            return false;
        }
        self.index = (self.index + 1) % self.results.len();
        self.goto(buffer)
    }

    pub fn prev(&mut self, buffer: &mut Buffer) -> bool {
        if self.results.is_empty() {
            return false;
        }
        self.index = (self.index + self.results.len() - 1) % self.results.len();
        self.goto(buffer)
    }

    pub fn clear(&mut self) {
        *self = Search::default();
    }

    /// Highlight ranges for the matches, empty when highlighting is off.
    pub fn highlights(&self) -> Vec<Highlight> {
        if !self.highlight {
            return Vec::new();
        }
        self.results
            .iter()
            .map(|m| Highlight {
                start: m.at,
                end: Location::new(m.at.line, m.at.column + m.len),
                face: SEARCH_FACE,
            })
            .collect()
    }
}

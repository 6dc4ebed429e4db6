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

//! Turns a stream of chords into binding invocations.
//!
//! Every chord is appended to one pending sequence. Concrete bindings match
//! against the trailing chords of that sequence. When none matches, the
//! catch-all (if any table has one) gets the latest chord and the pending
//! sequence is cleared. Without a catch-all the chords stay pending so that
//! multi-chord bindings can complete.
//!
//! When a shorter binding matches but a longer one is still reachable (`g`
//! and `g g` bound together) the shorter match is deferred. It runs when the
//! next chord rules the longer binding out, or when the caller gives up
//! waiting and calls [`SequenceMatcher::flush`].

use crate::key::{KeyEvent, KeySequence};
use crate::mode::{Action, Keymap};
use std::fmt;
use tracing::trace;

/// A binding that matched, ready to run.
#[derive(Clone)]
pub struct Invocation {
    pub action: Action,
    /// The chords that matched, or just the last chord for a catch-all.
    pub keys: KeySequence,
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("keys", &self.keys.to_string())
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct SequenceMatcher {
    pending: KeySequence,
    /// A held-back match and the pending length at the time it matched.
    deferred: Option<(Invocation, usize)>,
}

enum Resolution {
    Fire(Invocation),
    Defer(Invocation),
    Wait,
    NoMatch,
}

impl SequenceMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &KeySequence {
        &self.pending
    }

    /// Chords have been typed that do not resolve to anything yet.
    pub fn is_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// A match is being held back because a longer binding is still possible.
    pub fn is_ambiguous(&self) -> bool {
        self.deferred.is_some()
    }

    pub fn reset(&mut self) {
        self.pending.clear();
        self.deferred = None;
    }

    /// Feed one chord. `tables` are searched in priority order, first wins
    /// between equally long matches.
    pub fn feed(&mut self, event: KeyEvent, tables: &[&Keymap]) -> Vec<Invocation> {
        let mut fired = Vec::new();
        self.pending.push(event);
        let max_len = tables.iter().map(|t| t.max_len()).max().unwrap_or(0);

        // With a match held back, only sequences reaching back into it count.
        let floor = match &self.deferred {
            Some((_, at)) => self.pending.len() - at + 1,
            None => 1,
        };

        match self.resolve(tables, floor) {
            Resolution::Fire(invocation) => {
                trace!(keys = %invocation.keys, "sequence matched");
                self.reset();
                fired.push(invocation);
            }
            Resolution::Defer(invocation) => {
                trace!(keys = %invocation.keys, "match deferred");
                self.deferred = Some((invocation, self.pending.len()));
            }
            Resolution::Wait if self.deferred.is_some() => {}
            Resolution::Wait | Resolution::NoMatch => {
                if let Some((deferred, _)) = self.deferred.take() {
                    // The longer binding is out of reach: commit the held
                    // match and start over with the chord that broke it.
                    self.pending.clear();
                    fired.push(deferred);
                    fired.extend(self.feed(event, tables));
                } else if let Some(invocation) = self.catch_all(event, tables) {
                    fired.push(invocation);
                } else {
                    self.pending.truncate_front(max_len);
                }
            }
        }
        fired
    }

    /// Hand the latest chord to the first catch-all among `tables`, dropping
    /// whatever was pending before it.
    fn catch_all(&mut self, event: KeyEvent, tables: &[&Keymap]) -> Option<Invocation> {
        let action = tables.iter().find_map(|t| t.default_action())?;
        trace!(key = %event, "catch-all");
        self.pending.clear();
        Some(Invocation {
            action: action.clone(),
            keys: KeySequence::from(event),
        })
    }

    /// Commit a deferred match. Called when no further chord arrived in time.
    pub fn flush(&mut self) -> Option<Invocation> {
        let (deferred, _) = self.deferred.take()?;
        self.pending.clear();
        Some(deferred)
    }

    fn resolve(&self, tables: &[&Keymap], floor: usize) -> Resolution {
        let mut best: Option<(&KeySequence, &Action)> = None;
        for table in tables {
            for (sequence, action) in table.sequences() {
                if sequence.len() >= floor
                    && self.pending.ends_with(sequence)
                    && best.map_or(true, |(b, _)| sequence.len() > b.len())
                {
                    best = Some((sequence, action));
                }
            }
        }

        // Only suffixes at least as long as the match can outrank it.
        let min_len = best.map_or(floor, |(b, _)| b.len());
        let reachable = (min_len..=self.pending.len()).any(|n| {
            self.pending
                .suffix(n)
                .is_some_and(|suffix| tables.iter().any(|t| t.extends(&suffix)))
        });

        match (best, reachable) {
            (Some((sequence, action)), false) => Resolution::Fire(Invocation {
                action: action.clone(),
                keys: sequence.clone(),
            }),
            (Some((sequence, action)), true) => Resolution::Defer(Invocation {
                action: action.clone(),
                keys: sequence.clone(),
            }),
            (None, true) => Resolution::Wait,
            (None, false) => Resolution::NoMatch,
        }
    }
}

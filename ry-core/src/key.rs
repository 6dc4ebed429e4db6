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

//! Key chords and sequences, and the textual notation used to bind them.
//!
//! A chord is written as modifier letters followed by a key, joined with `-`:
//! `C-x`, `M-S-a`, `RET`, `C-SPC`. A sequence is chords separated by single
//! spaces: `g g`, `C-w s`. Parsing and rendering round-trip.

use crate::error::KeyParseError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        shift: false,
        alt: false,
        meta: false,
    };

    pub fn is_empty(&self) -> bool {
        !(self.ctrl || self.shift || self.alt || self.meta)
    }
}

/// The named keys a chord can carry. Everything printable is a `Rune`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Rune,
    Delete,
    Backspace,
    Return,
    Space,
    Escape,
    Tab,
    Left,
    Right,
    Up,
    Down,
}

const KEY_NAMES: &[(KeyKind, &str)] = &[
    (KeyKind::Delete, "DEL"),
    (KeyKind::Backspace, "BAK"),
    (KeyKind::Return, "RET"),
    (KeyKind::Space, "SPC"),
    (KeyKind::Escape, "ESC"),
    (KeyKind::Tab, "TAB"),
    (KeyKind::Left, "LEFT"),
    (KeyKind::Right, "RIGHT"),
    (KeyKind::Up, "UP"),
    (KeyKind::Down, "DOWN"),
];

impl KeyKind {
    pub fn name(&self) -> Option<&'static str> {
        KEY_NAMES
            .iter()
            .find(|(kind, _)| kind == self)
            .map(|(_, name)| *name)
    }

    fn from_name(name: &str) -> Option<KeyKind> {
        KEY_NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(kind, _)| *kind)
    }
}

/// One normalized key press. Only `Rune` chords carry a meaningful rune;
/// the others hold `'\0'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub modifiers: Modifiers,
    pub kind: KeyKind,
    pub rune: char,
}

impl KeyEvent {
    pub fn new(modifiers: Modifiers, kind: KeyKind, rune: char) -> Self {
        let rune = if kind == KeyKind::Rune { rune } else { '\0' };
        Self {
            modifiers,
            kind,
            rune,
        }
    }

    pub fn rune(rune: char) -> Self {
        Self::new(Modifiers::NONE, KeyKind::Rune, rune)
    }

    pub fn key(kind: KeyKind) -> Self {
        Self::new(Modifiers::NONE, kind, '\0')
    }

    pub fn ctrl(rune: char) -> Self {
        Self::new(Modifiers::CTRL, KeyKind::Rune, rune)
    }

    /// Collapse the different ways a terminal reports the same chord.
    ///
    /// Ctrl+Backspace arrives as `C-h` on most terminals, so both become
    /// `C-h`. Ctrl with a capital letter is folded to the lower-case rune.
    pub fn normalized(self) -> Self {
        if !self.modifiers.ctrl {
            return self;
        }
        match self.kind {
            KeyKind::Backspace => KeyEvent::new(self.modifiers, KeyKind::Rune, 'h'),
            KeyKind::Rune if self.rune.is_ascii_uppercase() => KeyEvent::new(
                self.modifiers,
                KeyKind::Rune,
                self.rune.to_ascii_lowercase(),
            ),
            _ => self,
        }
    }

    /// The text this chord types in an insert-like mode, if any.
    pub fn text(&self) -> Option<char> {
        if self.modifiers.ctrl || self.modifiers.alt || self.modifiers.meta {
            return None;
        }
        match self.kind {
            KeyKind::Rune => Some(self.rune),
            KeyKind::Space => Some(' '),
            _ => None,
        }
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.modifiers;
        for (set, letter) in [(m.ctrl, "C-"), (m.shift, "S-"), (m.alt, "A-"), (m.meta, "M-")] {
            if set {
                f.write_str(letter)?;
            }
        }
        match self.kind.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.rune),
        }
    }
}

impl FromStr for KeyEvent {
    type Err = KeyParseError;

    fn from_str(chord: &str) -> Result<Self, Self::Err> {
        if chord.is_empty() {
            return Err(KeyParseError::EmptyChord(chord.to_string()));
        }
        // A literal '-' is the key itself, not a separator.
        let (prefix, key) = if chord == "-" {
            ("", "-")
        } else if let Some(prefix) = chord.strip_suffix("--") {
            (prefix, "-")
        } else {
            match chord.rsplit_once('-') {
                Some((prefix, key)) => (prefix, key),
                None => ("", chord),
            }
        };

        let mut modifiers = Modifiers::NONE;
        if !prefix.is_empty() {
            for token in prefix.split('-') {
                match token {
                    "C" => modifiers.ctrl = true,
                    "S" => modifiers.shift = true,
                    "A" => modifiers.alt = true,
                    "M" => modifiers.meta = true,
                    "" => return Err(KeyParseError::EmptyChord(chord.to_string())),
                    other => {
                        return Err(KeyParseError::UnknownModifier {
                            modifier: other.to_string(),
                            chord: chord.to_string(),
                        })
                    }
                }
            }
        }

        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Err(KeyParseError::EmptyChord(chord.to_string())),
            (Some(c), None) => Ok(KeyEvent::new(modifiers, KeyKind::Rune, c)),
            _ => KeyKind::from_name(key)
                .map(|kind| KeyEvent::new(modifiers, kind, '\0'))
                .ok_or_else(|| KeyParseError::UnknownKey(key.to_string())),
        }
    }
}

/// An ordered run of chords.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct KeySequence {
    events: Vec<KeyEvent>,
}

impl KeySequence {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn events(&self) -> &[KeyEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn push(&mut self, event: KeyEvent) {
        self.events.push(event);
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn last(&self) -> Option<&KeyEvent> {
        self.events.last()
    }

    /// The trailing `len` chords, or `None` if the sequence is shorter.
    pub fn suffix(&self, len: usize) -> Option<KeySequence> {
        let start = self.events.len().checked_sub(len)?;
        Some(KeySequence {
            events: self.events[start..].to_vec(),
        })
    }

    pub fn ends_with(&self, other: &KeySequence) -> bool {
        self.events.ends_with(&other.events)
    }

    pub fn starts_with(&self, other: &KeySequence) -> bool {
        self.events.starts_with(&other.events)
    }

    /// Drop chords from the front until at most `len` remain.
    pub fn truncate_front(&mut self, len: usize) {
        if self.events.len() > len {
            self.events.drain(..self.events.len() - len);
        }
    }
}

impl From<KeyEvent> for KeySequence {
    fn from(event: KeyEvent) -> Self {
        Self {
            events: vec![event],
        }
    }
}

impl From<Vec<KeyEvent>> for KeySequence {
    fn from(events: Vec<KeyEvent>) -> Self {
        Self { events }
    }
}

impl fmt::Display for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, event) in self.events.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{event}")?;
        }
        Ok(())
    }
}

impl FromStr for KeySequence {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(KeyParseError::Empty);
        }
        let events = s
            .split(' ')
            .map(str::parse)
            .collect::<Result<Vec<KeyEvent>, _>>()?;
        Ok(KeySequence { events })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(s: &str) -> KeySequence {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_plain_rune() {
        let key: KeyEvent = "a".parse().unwrap();
        assert_eq!(key, KeyEvent::rune('a'));
        assert_eq!(key.to_string(), "a");
    }

    #[test]
    fn test_parse_modifiers() {
        let key: KeyEvent = "C-M-x".parse().unwrap();
        assert!(key.modifiers.ctrl && key.modifiers.meta);
        assert!(!key.modifiers.shift && !key.modifiers.alt);
        assert_eq!(key.rune, 'x');
    }

    #[test]
    fn test_named_keys_carry_no_rune() {
        let key: KeyEvent = "C-SPC".parse().unwrap();
        assert_eq!(key.kind, KeyKind::Space);
        assert_eq!(key.rune, '\0');
        assert!(key.modifiers.ctrl);
    }

    #[test]
    fn test_round_trip() {
        for notation in [
            "a", "G", "$", "0", "-", "C--", "C-a", "S-a", "A-b", "M-c", "C-S-A-M-z", "DEL", "BAK",
            "RET", "SPC", "ESC", "TAB", "LEFT", "RIGHT", "UP", "DOWN", "C-BAK", "M-RET",
        ] {
            let key: KeyEvent = notation.parse().unwrap();
            assert_eq!(key.to_string(), notation);
        }
        for notation in ["g g", "C-w s", "SPC n", "z z", "C-x C-c", "' a"] {
            assert_eq!(seq(notation).to_string(), notation);
        }
    }

    #[test]
    fn test_modifier_order_is_canonical() {
        let key: KeyEvent = "M-C-x".parse().unwrap();
        assert_eq!(key.to_string(), "C-M-x");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<KeySequence>(), Err(KeyParseError::Empty));
        assert!(matches!(
            "X-a".parse::<KeyEvent>(),
            Err(KeyParseError::UnknownModifier { .. })
        ));
        assert_eq!(
            "FOO".parse::<KeyEvent>(),
            Err(KeyParseError::UnknownKey("FOO".to_string()))
        );
        assert!("g  g".parse::<KeySequence>().is_err());
        assert!("C-".parse::<KeyEvent>().is_err());
    }

    #[test]
    fn test_normalize_ctrl_backspace() {
        let raw = KeyEvent::new(Modifiers::CTRL, KeyKind::Backspace, '\0');
        assert_eq!(raw.normalized(), KeyEvent::ctrl('h'));
    }

    #[test]
    fn test_normalize_ctrl_upper() {
        assert_eq!(KeyEvent::ctrl('U').normalized(), KeyEvent::ctrl('u'));
        assert_eq!(KeyEvent::rune('U').normalized(), KeyEvent::rune('U'));
    }

    #[test]
    fn test_sequence_suffix() {
        let s = seq("g g j");
        assert_eq!(s.suffix(1), Some(seq("j")));
        assert_eq!(s.suffix(2), Some(seq("g j")));
        assert_eq!(s.suffix(4), None);
        assert!(s.ends_with(&seq("g j")));
        assert!(s.starts_with(&seq("g g")));
    }

    #[test]
    fn test_truncate_front() {
        let mut s = seq("a b c d");
        s.truncate_front(2);
        assert_eq!(s, seq("c d"));
    }

    #[test]
    fn test_text() {
        assert_eq!(KeyEvent::rune('x').text(), Some('x'));
        assert_eq!(KeyEvent::key(KeyKind::Space).text(), Some(' '));
        assert_eq!(KeyEvent::ctrl('x').text(), None);
        assert_eq!(KeyEvent::key(KeyKind::Return).text(), None);
    }
}

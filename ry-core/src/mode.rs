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

use crate::editor::Editor;
use crate::error::KeyParseError;
use crate::key::KeySequence;
use crate::{BufferId, ModeId};
use slotmap::SlotMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// What a binding runs: the editor, the buffer the key was typed into, and the
/// chords that matched.
pub type Action = Arc<dyn Fn(&mut Editor, BufferId, &KeySequence) + Send + Sync>;

/// Wrap a closure as an [`Action`].
pub fn action<F>(f: F) -> Action
where
    F: Fn(&mut Editor, BufferId, &KeySequence) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Modes of the same non-minor kind replace each other on a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeKind {
    /// Normal/insert style modes that decide how keys edit text.
    Editing,
    /// Per-buffer language or content modes.
    Major,
    /// Stackable extras.
    Minor,
}

/// When a binding fires: on a concrete chord sequence, or as the catch-all
/// for anything the concrete bindings did not take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Sequence(KeySequence),
    Default,
}

#[derive(Clone)]
pub struct Binding {
    pub trigger: Trigger,
    pub action: Action,
}

/// The binding table for one mode.
#[derive(Clone, Default)]
pub struct Keymap {
    bindings: Vec<Binding>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `notation` (e.g. `"g g"`, `"C-u"`) to `action`, replacing any
    /// earlier binding of the same sequence.
    pub fn bind(&mut self, notation: &str, action: Action) -> Result<(), KeyParseError> {
        let sequence: KeySequence = notation.parse()?;
        self.bind_sequence(sequence, action);
        Ok(())
    }

    pub fn bind_sequence(&mut self, sequence: KeySequence, action: Action) {
        self.insert(Trigger::Sequence(sequence), action);
    }

    /// Install the catch-all binding.
    pub fn bind_default(&mut self, action: Action) {
        self.insert(Trigger::Default, action);
    }

    fn insert(&mut self, trigger: Trigger, action: Action) {
        match self.bindings.iter_mut().find(|b| b.trigger == trigger) {
            Some(existing) => existing.action = action,
            None => self.bindings.push(Binding { trigger, action }),
        }
    }

    /// Concrete bindings in registration order.
    pub fn sequences(&self) -> impl Iterator<Item = (&KeySequence, &Action)> {
        self.bindings.iter().filter_map(|b| match &b.trigger {
            Trigger::Sequence(s) => Some((s, &b.action)),
            Trigger::Default => None,
        })
    }

    pub fn default_action(&self) -> Option<&Action> {
        self.bindings
            .iter()
            .find(|b| b.trigger == Trigger::Default)
            .map(|b| &b.action)
    }

    pub fn lookup(&self, sequence: &KeySequence) -> Option<&Action> {
        self.sequences()
            .find(|(s, _)| *s == sequence)
            .map(|(_, a)| a)
    }

    /// Length of the longest concrete sequence.
    pub fn max_len(&self) -> usize {
        self.sequences().map(|(s, _)| s.len()).max().unwrap_or(0)
    }

    /// Whether some concrete binding is strictly longer than `prefix` and
    /// starts with it.
    pub fn extends(&self, prefix: &KeySequence) -> bool {
        self.sequences()
            .any(|(s, _)| s.len() > prefix.len() && s.starts_with(prefix))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl fmt::Debug for Keymap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.bindings.iter().map(|b| &b.trigger))
            .finish()
    }
}

/// A named binding table. Modes are built once and never change after
/// registration.
#[derive(Debug, Clone)]
pub struct Mode {
    pub name: String,
    pub kind: ModeKind,
    pub keymap: Keymap,
}

impl Mode {
    pub fn new(name: impl Into<String>, kind: ModeKind, keymap: Keymap) -> Self {
        Self {
            name: name.into(),
            kind,
            keymap,
        }
    }
}

/// All modes known to the editor, addressed by id or by name.
#[derive(Debug, Default)]
pub struct ModeRegistry {
    modes: SlotMap<ModeId, Mode>,
    by_name: HashMap<String, ModeId>,
}

impl ModeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mode. A later mode with the same name takes over the name.
    pub fn register(&mut self, mode: Mode) -> ModeId {
        let name = mode.name.clone();
        let id = self.modes.insert(mode);
        self.by_name.insert(name, id);
        id
    }

    pub fn get(&self, id: ModeId) -> Option<&Mode> {
        self.modes.get(id)
    }

    pub fn by_name(&self, name: &str) -> Option<ModeId> {
        self.by_name.get(name).copied()
    }

    pub fn keymap(&self, id: ModeId) -> Option<&Keymap> {
        self.modes.get(id).map(|m| &m.keymap)
    }

    pub fn kind(&self, id: ModeId) -> Option<ModeKind> {
        self.modes.get(id).map(|m| m.kind)
    }

    pub fn name(&self, id: ModeId) -> Option<&str> {
        self.modes.get(id).map(|m| m.name.as_str())
    }
}

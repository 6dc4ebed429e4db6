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

use crate::bindings;
use crate::buffer::Buffer;
use crate::commands::{create_default_registry, parse_command_line, CommandRegistry};
use crate::config::Config;
use crate::dispatch::{Invocation, SequenceMatcher};
use crate::error::EditorError;
use crate::file::FileLoader;
use crate::key::KeyEvent;
use crate::mode::{Keymap, ModeKind, ModeRegistry};
use crate::search::{Search, SEARCH_FACE};
use crate::window::{Orientation, WindowTree};
use crate::{BufferId, ModeId, WindowId};
use slotmap::SlotMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Name of the buffer that exists before any file is opened.
pub const SCRATCH_BUFFER: &str = "*scratch*";

/// Things only the surrounding application can do, handed back from key
/// handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChromeAction {
    /// Quit the editor
    Quit,
    /// Load a file and show it in the current window
    OpenFile(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// A line shown in the message area below the windows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// `:` command line
    Command,
    /// `/` search
    Search,
}

impl PromptKind {
    pub fn label(&self) -> char {
        match self {
            PromptKind::Command => ':',
            PromptKind::Search => '/',
        }
    }
}

/// A line being typed into the message area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

/// The whole editor state. Every binding and command gets it mutably.
pub struct Editor {
    pub buffers: SlotMap<BufferId, Buffer>,
    pub windows: WindowTree,
    pub modes: ModeRegistry,
    pub commands: CommandRegistry,
    pub matcher: SequenceMatcher,
    pub search: Search,
    pub config: Config,
    pub message: Option<Message>,
    pub prompt: Option<Prompt>,
    chrome: Vec<ChromeAction>,
    normal_mode: ModeId,
    insert_mode: ModeId,
    prompt_mode: ModeId,
}

impl Editor {
    /// Create an editor showing an empty scratch buffer in normal mode.
    pub fn new(config: Config) -> Result<Self, EditorError> {
        let mut modes = ModeRegistry::new();
        let normal_mode = modes.register(bindings::normal_mode()?);
        let insert_mode = modes.register(bindings::insert_mode()?);
        let prompt_mode = modes.register(bindings::prompt_mode()?);

        let mut buffers = SlotMap::with_key();
        let mut scratch = Buffer::new(SCRATCH_BUFFER);
        scratch.mode_add(normal_mode, ModeKind::Editing);
        let scratch = buffers.insert(scratch);

        Ok(Self {
            buffers,
            windows: WindowTree::new(scratch),
            modes,
            commands: create_default_registry(),
            matcher: SequenceMatcher::new(),
            search: Search::new(),
            config,
            message: None,
            prompt: None,
            chrome: Vec::new(),
            normal_mode,
            insert_mode,
            prompt_mode,
        })
    }

    // === BUFFERS ===

    pub fn current_window(&self) -> WindowId {
        self.windows.current()
    }

    pub fn current_buffer_id(&self) -> BufferId {
        self.windows.current_view().buffer
    }

    pub fn current_buffer(&self) -> Option<&Buffer> {
        self.buffers.get(self.current_buffer_id())
    }

    pub fn current_buffer_mut(&mut self) -> Option<&mut Buffer> {
        let id = self.current_buffer_id();
        self.buffers.get_mut(id)
    }

    /// Run `f` on a buffer if it still exists.
    pub fn with_buffer<R>(
        &mut self,
        id: BufferId,
        f: impl FnOnce(&mut Buffer) -> R,
    ) -> Option<R> {
        self.buffers.get_mut(id).map(f)
    }

    pub fn buffer_by_name(&self, name: &str) -> Option<BufferId> {
        self.buffers
            .iter()
            .find(|(_, b)| b.name() == name)
            .map(|(id, _)| id)
    }

    fn buffer_by_path(&self, path: &Path) -> Option<BufferId> {
        self.buffers
            .iter()
            .find(|(_, b)| b.path() == Some(path))
            .map(|(id, _)| id)
    }

    /// Add a buffer holding `text` for `path`, in normal mode, and show it in
    /// the current window. A buffer already open for `path` is reused.
    pub fn open_buffer(&mut self, path: &Path, text: &str) -> BufferId {
        if let Some(id) = self.buffer_by_path(path) {
            self.show_buffer(id);
            return id;
        }
        let mut buffer = Buffer::from_file(path, text);
        buffer.mode_add(self.normal_mode, ModeKind::Editing);
        let id = self.buffers.insert(buffer);
        info!(path = %path.display(), "opened buffer");
        self.show_buffer(id);
        id
    }

    /// Load `path` through `loader` and show it. On failure the error goes to
    /// the message area and no buffer is created.
    pub async fn open_file(&mut self, loader: &dyn FileLoader, path: &Path) -> Option<BufferId> {
        if let Some(id) = self.buffer_by_path(path) {
            self.show_buffer(id);
            return Some(id);
        }
        match loader.load(path).await {
            Ok(text) => Some(self.open_buffer(path, &text)),
            Err(e) => {
                warn!(error = %e, "failed to open file");
                self.error(e.to_string());
                None
            }
        }
    }

    /// Point the current window at `id`.
    pub fn show_buffer(&mut self, id: BufferId) {
        let view = self.windows.current_view_mut();
        if view.buffer != id {
            view.buffer = id;
            view.scroll_offset = 0;
            view.highlights.clear();
        }
        self.sync_highlights();
    }

    // === MODES ===

    pub fn enter_insert_mode(&mut self, buffer: BufferId) {
        let mode = self.insert_mode;
        self.with_buffer(buffer, |b| b.mode_add(mode, ModeKind::Editing));
    }

    pub fn enter_normal_mode(&mut self, buffer: BufferId) {
        let mode = self.normal_mode;
        self.with_buffer(buffer, |b| b.mode_add(mode, ModeKind::Editing));
    }

    /// Name of the editing mode active on `buffer`, for the status bar.
    pub fn mode_name(&self, buffer: BufferId) -> &str {
        self.buffers
            .get(buffer)
            .and_then(|b| b.mode_of_kind(ModeKind::Editing))
            .and_then(|id| self.modes.name(id))
            .unwrap_or("")
    }

    /// Modes consulted for the next key, highest priority first. An open
    /// prompt shadows the buffer's own modes.
    fn active_modes(&self, buffer: BufferId) -> Vec<ModeId> {
        if self.prompt.is_some() {
            return vec![self.prompt_mode];
        }
        self.buffers
            .get(buffer)
            .map(|b| b.modes().rev().collect())
            .unwrap_or_default()
    }

    // === KEY DISPATCH ===

    /// Dispatch one key press against the current window's buffer.
    pub fn handle_key(&mut self, event: KeyEvent) -> Vec<ChromeAction> {
        let event = event.normalized();
        if event == KeyEvent::ctrl('q') {
            self.matcher.reset();
            return vec![ChromeAction::Quit];
        }
        self.message = None;

        let buffer = self.current_buffer_id();
        let active = self.active_modes(buffer);
        let tables: Vec<&Keymap> = active
            .iter()
            .filter_map(|id| self.modes.keymap(*id))
            .collect();
        let invocations = self.matcher.feed(event, &tables);
        debug!(
            key = %event,
            pending = %self.matcher.pending(),
            fired = invocations.len(),
            "key"
        );
        self.run(buffer, invocations)
    }

    /// Commit a key sequence that was waiting on a longer binding. Called by
    /// the event loop once `sequence_timeout_ms` passes without input.
    pub fn flush_pending(&mut self) -> Vec<ChromeAction> {
        match self.matcher.flush() {
            Some(invocation) => {
                let buffer = self.current_buffer_id();
                self.run(buffer, vec![invocation])
            }
            None => Vec::new(),
        }
    }

    fn run(&mut self, buffer: BufferId, invocations: Vec<Invocation>) -> Vec<ChromeAction> {
        for invocation in invocations {
            (invocation.action)(self, buffer, &invocation.keys);
        }
        if let Some(id) = self.search.buffer() {
            if let Some(searched) = self.buffers.get(id) {
                self.search.refresh(id, searched);
            }
        }
        self.sync_highlights();
        std::mem::take(&mut self.chrome)
    }

    pub fn push_chrome(&mut self, action: ChromeAction) {
        self.chrome.push(action);
    }

    // === MESSAGES ===

    pub fn message(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            text: text.into(),
            kind: MessageKind::Info,
        });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            text: text.into(),
            kind: MessageKind::Error,
        });
    }

    // === PROMPT ===

    pub fn open_prompt(&mut self, kind: PromptKind) {
        self.prompt = Some(Prompt {
            kind,
            input: String::new(),
        });
    }

    pub fn prompt_push(&mut self, c: char) {
        if let Some(prompt) = &mut self.prompt {
            prompt.input.push(c);
        }
    }

    /// Delete the last typed char. Backspacing an empty prompt closes it.
    pub fn prompt_backspace(&mut self) {
        match &mut self.prompt {
            Some(prompt) if !prompt.input.is_empty() => {
                prompt.input.pop();
            }
            _ => self.prompt = None,
        }
    }

    pub fn prompt_cancel(&mut self) {
        self.prompt = None;
    }

    /// Complete a command name when exactly one command starts with the input.
    pub fn prompt_complete(&mut self) {
        let Some(prompt) = &mut self.prompt else {
            return;
        };
        if prompt.kind != PromptKind::Command || prompt.input.contains(' ') {
            return;
        }
        if let [only] = self.commands.find_commands(&prompt.input)[..] {
            prompt.input = format!("{} ", only.name);
        }
    }

    pub fn prompt_submit(&mut self) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        match prompt.kind {
            PromptKind::Command => {
                if let Err(e) = self.execute_command_line(&prompt.input) {
                    self.error(e.to_string());
                }
            }
            PromptKind::Search => self.search_find(&prompt.input),
        }
    }

    /// Run a `:` command line such as `e notes.txt`.
    pub fn execute_command_line(&mut self, line: &str) -> Result<(), EditorError> {
        let Some((name, args)) = parse_command_line(line) else {
            return Ok(());
        };
        let handler = self
            .commands
            .get_command(name)
            .map(|c| c.handler.clone())
            .ok_or_else(|| EditorError::UnknownCommand(name.to_string()))?;
        debug!(command = name, "execute");
        handler(self, &args)
    }

    // === SEARCH ===

    pub fn search_find(&mut self, query: &str) {
        let id = self.current_buffer_id();
        let Some(buffer) = self.buffers.get_mut(id) else {
            return;
        };
        if !self.search.find(id, buffer, query) {
            self.error("No search result.");
        }
        self.sync_highlights();
    }

    fn search_step(&mut self, forward: bool) {
        let id = self.current_buffer_id();
        if self.search.buffer() != Some(id) {
            // Searching a buffer other than the one shown: start over here.
            match self.search.query().map(str::to_string) {
                Some(query) => self.search_find(&query),
                None => self.error("No previous search."),
            }
            return;
        }
        let Some(buffer) = self.buffers.get_mut(id) else {
            return;
        };
        let moved = if forward {
            self.search.next(buffer)
        } else {
            self.search.prev(buffer)
        };
        if !moved {
            self.error("No search result.");
        }
        // `n` after `SPC n` shows the matches again.
        self.search.highlight = true;
        self.sync_highlights();
    }

    pub fn search_next(&mut self) {
        self.search_step(true);
    }

    pub fn search_prev(&mut self) {
        self.search_step(false);
    }

    pub fn search_word_under_cursor(&mut self) {
        match self.current_buffer().and_then(|b| b.word_under_cursor()) {
            Some(word) => self.search_find(&word),
            None => self.error("No word under cursor."),
        }
    }

    /// Hide search highlights. The last query stays available to `n`/`N`.
    pub fn search_clear(&mut self) {
        self.search.highlight = false;
        self.sync_highlights();
    }

    /// Push search matches into every view of the searched buffer.
    fn sync_highlights(&mut self) {
        let target = self.search.buffer();
        let highlights = self.search.highlights();
        for (_, view) in self.windows.views_mut() {
            view.highlights.retain(|h| h.face != SEARCH_FACE);
            if Some(view.buffer) == target {
                view.highlights.extend(highlights.iter().cloned());
            }
        }
    }

    // === WINDOWS ===

    pub fn split_window(&mut self, orientation: Orientation) {
        let id = self.windows.split(orientation);
        info!(window = ?id, ?orientation, "split window");
        self.sync_highlights();
    }

    pub fn close_window(&mut self) -> Result<(), EditorError> {
        let closed = self.windows.current();
        self.windows.close_current()?;
        info!(window = ?closed, "closed window");
        Ok(())
    }

    pub fn only_window(&mut self) {
        self.windows.only();
    }

    pub fn other_window(&mut self) {
        self.windows.next_window();
    }

    /// Remember the cursor under `name` in the current window.
    pub fn set_view_mark(&mut self, name: char) {
        let Some(cursor) = self.current_buffer().map(|b| b.cursor()) else {
            return;
        };
        self.windows.current_view_mut().marks.insert(name, cursor);
        self.message(format!("Mark '{name}' set."));
    }

    pub fn goto_view_mark(&mut self, name: char) {
        let Some(location) = self.windows.current_view().marks.get(&name).copied() else {
            self.error(format!("Mark '{name}' not set."));
            return;
        };
        if let Some(buffer) = self.current_buffer_mut() {
            buffer.move_to(location.column, location.line);
        }
    }

    /// Scroll `window` so its buffer's cursor is visible in `height` rows.
    pub fn adjust_scroll(&mut self, window: WindowId, height: u16) {
        let Some(view) = self.windows.view_mut(window) else {
            return;
        };
        let line = self.buffers.get(view.buffer).map_or(0, |b| b.cursor().line);
        view.adjust_scroll(height as usize, line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Location;
    use crate::error::FileError;
    use crate::key::{KeyKind, KeySequence};
    use async_trait::async_trait;

    fn test_editor(text: &str) -> Editor {
        let mut editor = Editor::new(Config::default()).unwrap();
        editor.open_buffer(Path::new("test.txt"), text);
        editor
    }

    fn type_keys(editor: &mut Editor, notation: &str) -> Vec<ChromeAction> {
        let keys: KeySequence = notation.parse().unwrap();
        keys.events()
            .iter()
            .flat_map(|k| editor.handle_key(*k))
            .collect()
    }

    fn content(editor: &Editor) -> String {
        editor.current_buffer().unwrap().content()
    }

    fn cursor(editor: &Editor) -> Location {
        editor.current_buffer().unwrap().cursor()
    }

    #[test]
    fn test_starts_with_scratch() {
        let editor = Editor::new(Config::default()).unwrap();
        assert_eq!(editor.current_buffer().unwrap().name(), SCRATCH_BUFFER);
        assert_eq!(editor.mode_name(editor.current_buffer_id()), "normal");
    }

    #[test]
    fn test_insert_and_escape() {
        let mut editor = test_editor("world");
        type_keys(&mut editor, "i h i SPC ESC");
        assert_eq!(content(&editor), "hi world");
        assert_eq!(editor.mode_name(editor.current_buffer_id()), "normal");
        // Back in normal mode letters move instead of typing.
        type_keys(&mut editor, "l l");
        assert_eq!(content(&editor), "hi world");
        assert_eq!(cursor(&editor), Location::new(0, 5));
    }

    #[test]
    fn test_append_and_open_line() {
        let mut editor = test_editor("one\ntwo");
        type_keys(&mut editor, "A ! ESC j o x ESC");
        assert_eq!(content(&editor), "one!\ntwo\nx");
    }

    #[test]
    fn test_insert_mode_editing_keys() {
        let mut editor = test_editor("abc");
        type_keys(&mut editor, "a BAK RET DEL");
        assert_eq!(content(&editor), "\nc");
        type_keys(&mut editor, "C-h TAB");
        assert_eq!(content(&editor), "\tc");
    }

    #[test]
    fn test_tab_to_spaces() {
        let mut config = Config::default();
        config.tab_to_spaces = true;
        config.tab_width = 2;
        let mut editor = Editor::new(config).unwrap();
        type_keys(&mut editor, "i TAB x");
        assert_eq!(content(&editor), "  x");
    }

    #[test]
    fn test_normal_mode_movement() {
        let text = (0..40).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let mut editor = test_editor(&text);
        type_keys(&mut editor, "G");
        assert_eq!(cursor(&editor), Location::new(39, 0));
        type_keys(&mut editor, "C-u");
        assert_eq!(cursor(&editor), Location::new(24, 0));
        type_keys(&mut editor, "$");
        assert_eq!(cursor(&editor), Location::new(24, 7));
        type_keys(&mut editor, "0 w");
        assert_eq!(cursor(&editor), Location::new(24, 5));
        type_keys(&mut editor, "g g");
        assert_eq!(cursor(&editor), Location::new(0, 0));
        type_keys(&mut editor, "C-d j");
        assert_eq!(cursor(&editor), Location::new(16, 0));
    }

    #[test]
    fn test_delete_char_keeps_newline() {
        let mut editor = test_editor("ab\ncd");
        type_keys(&mut editor, "x x x");
        assert_eq!(content(&editor), "\ncd");
    }

    #[test]
    fn test_center() {
        let text = "x\n".repeat(100);
        let mut editor = test_editor(&text);
        editor.current_buffer_mut().unwrap().move_to(0, 50);
        type_keys(&mut editor, "z z");
        let window = editor.current_window();
        editor.adjust_scroll(window, 20);
        assert_eq!(editor.windows.current_view().scroll_offset, 41);
    }

    #[test]
    fn test_search_keys() {
        let mut editor = test_editor("foo bar\nbar foo\nfoo");
        type_keys(&mut editor, "/ f o o RET");
        assert!(editor.prompt.is_none());
        assert_eq!(cursor(&editor), Location::new(0, 0));
        type_keys(&mut editor, "n");
        assert_eq!(cursor(&editor), Location::new(1, 4));
        type_keys(&mut editor, "N N");
        assert_eq!(cursor(&editor), Location::new(2, 0));
        assert_eq!(editor.windows.current_view().highlights.len(), 3);
        type_keys(&mut editor, "SPC n");
        assert!(editor.windows.current_view().highlights.is_empty());
    }

    #[test]
    fn test_search_word_under_cursor() {
        let mut editor = test_editor("alpha beta\nbeta alpha");
        type_keys(&mut editor, "w *");
        assert_eq!(editor.search.query(), Some("beta"));
        assert_eq!(cursor(&editor), Location::new(0, 6));
        type_keys(&mut editor, "n");
        assert_eq!(cursor(&editor), Location::new(1, 0));
    }

    #[test]
    fn test_search_no_result() {
        let mut editor = test_editor("abc");
        type_keys(&mut editor, "/ z RET");
        let message = editor.message.clone().unwrap();
        assert_eq!(message.text, "No search result.");
        assert_eq!(message.kind, MessageKind::Error);
    }

    #[test]
    fn test_search_follows_edits() {
        let mut editor = test_editor("ab\nab");
        type_keys(&mut editor, "/ a b RET");
        assert_eq!(editor.search.results().len(), 2);
        type_keys(&mut editor, "G A SPC a b ESC");
        assert_eq!(editor.search.results().len(), 3);
        assert_eq!(editor.windows.current_view().highlights.len(), 3);
    }

    #[test]
    fn test_command_prompt() {
        let mut editor = test_editor("abc");
        type_keys(&mut editor, ": v s RET");
        assert_eq!(editor.windows.leaves().len(), 2);
        type_keys(&mut editor, ": c l o s e RET");
        assert_eq!(editor.windows.leaves().len(), 1);
        let chrome = type_keys(&mut editor, ": q RET");
        assert_eq!(chrome, vec![ChromeAction::Quit]);
    }

    #[test]
    fn test_command_errors() {
        let mut editor = test_editor("abc");
        type_keys(&mut editor, ": n o p e RET");
        assert_eq!(
            editor.message.as_ref().map(|m| m.text.as_str()),
            Some("unknown command: nope")
        );
        type_keys(&mut editor, ": c l o RET");
        assert_eq!(editor.message.as_ref().map(|m| m.kind), Some(MessageKind::Error));
    }

    #[test]
    fn test_prompt_editing() {
        let mut editor = test_editor("abc");
        type_keys(&mut editor, ": o n x BAK");
        assert_eq!(editor.prompt.as_ref().map(|p| p.input.as_str()), Some("on"));
        type_keys(&mut editor, "ESC");
        assert!(editor.prompt.is_none());
        // Buffer untouched by prompt typing.
        assert_eq!(content(&editor), "abc");
        type_keys(&mut editor, ": BAK");
        assert!(editor.prompt.is_none());
    }

    #[test]
    fn test_prompt_completion() {
        let mut editor = test_editor("abc");
        type_keys(&mut editor, ": v s p TAB");
        assert_eq!(
            editor.prompt.as_ref().map(|p| p.input.as_str()),
            Some("vsplit ")
        );
    }

    #[test]
    fn test_edit_command_requests_file() {
        let mut editor = test_editor("abc");
        let chrome = type_keys(&mut editor, ": e SPC n o t e s RET");
        assert_eq!(chrome, vec![ChromeAction::OpenFile(PathBuf::from("notes"))]);
    }

    #[test]
    fn test_window_keys() {
        let mut editor = test_editor("abc");
        let first = editor.current_window();
        type_keys(&mut editor, "C-w s");
        let second = editor.current_window();
        assert_ne!(first, second);
        type_keys(&mut editor, "C-w w");
        assert_eq!(editor.current_window(), first);
        type_keys(&mut editor, "C-w o");
        assert_eq!(editor.windows.leaves(), vec![first]);
        type_keys(&mut editor, "C-w c");
        assert_eq!(
            editor.message.as_ref().map(|m| m.text.as_str()),
            Some("cannot close the last window")
        );
    }

    #[test]
    fn test_view_marks() {
        let mut editor = test_editor("one\ntwo\nthree");
        type_keys(&mut editor, "j l m a G");
        assert_eq!(cursor(&editor), Location::new(2, 0));
        type_keys(&mut editor, "' a");
        assert_eq!(cursor(&editor), Location::new(1, 1));
        type_keys(&mut editor, "' b");
        assert_eq!(editor.message.as_ref().map(|m| m.kind), Some(MessageKind::Error));
    }

    #[test]
    fn test_ctrl_q_bypasses_dispatch() {
        let mut editor = test_editor("abc");
        type_keys(&mut editor, "i");
        let chrome = editor.handle_key(KeyEvent::ctrl('Q'));
        assert_eq!(chrome, vec![ChromeAction::Quit]);
        assert_eq!(content(&editor), "abc");
    }

    #[test]
    fn test_ctrl_backspace_in_insert_mode() {
        let mut editor = test_editor("abc");
        type_keys(&mut editor, "A");
        editor.handle_key(KeyEvent::new(
            crate::key::Modifiers::CTRL,
            KeyKind::Backspace,
            '\0',
        ));
        assert_eq!(content(&editor), "ab");
    }

    #[test]
    fn test_overlap_timeout_flush() {
        use crate::mode::{action, Mode};
        let mut editor = test_editor("abc");
        let mut keymap = Keymap::new();
        keymap
            .bind("q", action(|e, _, _| e.message("short")))
            .unwrap();
        keymap
            .bind("q q", action(|e, _, _| e.message("long")))
            .unwrap();
        let minor = editor
            .modes
            .register(Mode::new("test-minor", ModeKind::Minor, keymap));
        let buffer = editor.current_buffer_id();
        editor.with_buffer(buffer, |b| b.mode_add(minor, ModeKind::Minor));

        type_keys(&mut editor, "q");
        assert!(editor.matcher.is_ambiguous());
        assert!(editor.message.is_none());
        editor.flush_pending();
        assert_eq!(editor.message.as_ref().map(|m| m.text.as_str()), Some("short"));

        type_keys(&mut editor, "q q");
        assert_eq!(editor.message.as_ref().map(|m| m.text.as_str()), Some("long"));
        assert!(editor.flush_pending().is_empty());
    }

    #[test]
    fn test_insert_keeps_chords_of_unfinished_minor_sequence() {
        use crate::mode::{action, Mode};
        let mut editor = test_editor("");
        let mut keymap = Keymap::new();
        keymap
            .bind("j k", action(|e, b, _| e.enter_normal_mode(b)))
            .unwrap();
        let minor = editor
            .modes
            .register(Mode::new("escape-chord", ModeKind::Minor, keymap));
        let buffer = editor.current_buffer_id();
        editor.with_buffer(buffer, |b| b.mode_add(minor, ModeKind::Minor));

        type_keys(&mut editor, "i j x");
        assert_eq!(content(&editor), "jx");
        assert!(!editor.matcher.is_pending());
        type_keys(&mut editor, "j j y");
        assert_eq!(content(&editor), "jxjjy");
    }

    #[test]
    fn test_word_motion_reports_boundary() {
        let mut editor = test_editor("one two");
        type_keys(&mut editor, "w");
        assert_eq!(cursor(&editor), Location::new(0, 4));
        assert!(editor.message.is_none());

        type_keys(&mut editor, "w");
        assert_eq!(cursor(&editor), Location::new(0, 4));
        let message = editor.message.clone().unwrap();
        assert_eq!(message.kind, MessageKind::Error);
        assert_eq!(message.text, "No next word.");

        type_keys(&mut editor, "0 b");
        assert_eq!(cursor(&editor), Location::new(0, 0));
        assert_eq!(
            editor.message.as_ref().map(|m| m.text.as_str()),
            Some("No previous word.")
        );
    }

    #[test]
    fn test_with_buffer_returns_result() {
        let mut editor = test_editor("abc");
        let buffer = editor.current_buffer_id();
        assert_eq!(editor.with_buffer(buffer, |b| b.content()), Some("abc".to_string()));
        let stale = editor.buffer_by_name(SCRATCH_BUFFER).unwrap();
        editor.buffers.remove(stale);
        assert_eq!(editor.with_buffer(stale, |b| b.content()), None);
    }

    struct FailingLoader;

    #[async_trait]
    impl FileLoader for FailingLoader {
        async fn load(&self, path: &Path) -> Result<String, FileError> {
            Err(FileError::Read {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        }
    }

    #[tokio::test]
    async fn test_open_file_failure_keeps_running() {
        let mut editor = Editor::new(Config::default()).unwrap();
        let opened = editor.open_file(&FailingLoader, Path::new("secret.txt")).await;
        assert!(opened.is_none());
        assert_eq!(editor.buffers.len(), 1);
        let message = editor.message.clone().unwrap();
        assert_eq!(message.kind, MessageKind::Error);
        assert!(message.text.contains("secret.txt"));
        type_keys(&mut editor, "i o k");
        assert_eq!(content(&editor), "ok");
    }

    #[tokio::test]
    async fn test_open_file_reuses_buffer() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"data").unwrap();
        let mut editor = Editor::new(Config::default()).unwrap();
        let a = editor.open_file(&crate::file::FsLoader, file.path()).await;
        let b = editor.open_file(&crate::file::FsLoader, file.path()).await;
        assert!(a.is_some());
        assert_eq!(a, b);
        assert_eq!(editor.buffers.len(), 2);
        assert_eq!(content(&editor), "data");
    }
}

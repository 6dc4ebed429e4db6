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

use slotmap::new_key_type;

pub mod bindings;
pub mod buffer;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod editor;
pub mod error;
pub mod file;
pub mod gutter;
pub mod key;
pub mod mode;
pub mod movement;
pub mod renderer;
pub mod search;
pub mod text_store;
pub mod window;

new_key_type! {
    pub struct WindowId;
}

new_key_type! {
    pub struct BufferId;
}

new_key_type! {
    pub struct ModeId;
}

new_key_type! {
    pub struct MarkId;
}

pub use buffer::{Buffer, Location, Point};
pub use config::Config;
pub use dispatch::SequenceMatcher;
pub use editor::{ChromeAction, Editor, Message, MessageKind, Prompt, PromptKind};
pub use error::{ConfigError, EditorError, FileError, KeyParseError};
pub use file::{FileLoader, FsLoader};
pub use key::{KeyEvent, KeyKind, KeySequence, Modifiers};
pub use mode::{Action, Keymap, Mode, ModeKind, ModeRegistry, Trigger};
pub use renderer::Renderer;
pub use text_store::TextStore;
pub use window::{Orientation, Rect, View, WindowTree};

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

//! Named commands run from the `:` prompt.

use crate::editor::{ChromeAction, Editor};
use crate::error::EditorError;
use crate::window::Orientation;
use std::path::PathBuf;
use std::sync::Arc;

pub const CMD_QUIT: &str = "quit";
pub const CMD_CLEAR_SEARCH: &str = "clearsearch";
pub const CMD_SPLIT: &str = "split";
pub const CMD_VSPLIT: &str = "vsplit";
pub const CMD_CLOSE: &str = "close";
pub const CMD_ONLY: &str = "only";
pub const CMD_EDIT: &str = "edit";
pub const CMD_BUFFER: &str = "buffer";

/// Handler function type for commands. Receives the words after the name.
pub type CommandHandler = Arc<dyn Fn(&mut Editor, &[&str]) -> Result<(), EditorError> + Send + Sync>;

/// A single command that can be executed
#[derive(Clone)]
pub struct Command {
    /// Command name as typed at the prompt
    pub name: String,
    /// Short forms that also run this command
    pub aliases: Vec<String>,
    /// Human-readable description
    pub description: String,
    pub handler: CommandHandler,
}

impl Command {
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Editor, &[&str]) -> Result<(), EditorError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: description.into(),
            handler: Arc::new(handler),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .finish()
    }
}

/// Registry of all available commands
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Register a new command, replacing any with the same name
    pub fn register_command(&mut self, command: Command) {
        self.commands.retain(|c| c.name != command.name);
        self.commands.push(command);
    }

    /// All commands whose name starts with `prefix`, sorted by name
    pub fn find_commands(&self, prefix: &str) -> Vec<&Command> {
        let mut matches: Vec<&Command> = self
            .commands
            .iter()
            .filter(|cmd| cmd.name.starts_with(prefix))
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        matches
    }

    /// Look a command up by name or alias
    pub fn get_command(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|cmd| cmd.answers_to(name))
    }

    pub fn all_commands(&self) -> &[Command] {
        &self.commands
    }
}

/// Split a prompt line into command name and arguments.
pub fn parse_command_line(line: &str) -> Option<(&str, Vec<&str>)> {
    let mut words = line.split_whitespace();
    let name = words.next()?;
    Some((name, words.collect()))
}

/// The built-in commands.
pub fn create_default_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    registry.register_command(
        Command::new(CMD_QUIT, "Quit the editor", |editor, _| {
            editor.push_chrome(ChromeAction::Quit);
            Ok(())
        })
        .alias("q"),
    );

    registry.register_command(
        Command::new(CMD_CLEAR_SEARCH, "Clear search highlights", |editor, _| {
            editor.search_clear();
            Ok(())
        })
        .alias("cs"),
    );

    registry.register_command(
        Command::new(CMD_SPLIT, "Split the window, stacked", |editor, _| {
            editor.split_window(Orientation::Vertical);
            Ok(())
        })
        .alias("sp"),
    );

    registry.register_command(
        Command::new(CMD_VSPLIT, "Split the window, side by side", |editor, _| {
            editor.split_window(Orientation::Horizontal);
            Ok(())
        })
        .alias("vs"),
    );

    registry.register_command(
        Command::new(CMD_CLOSE, "Close the current window", |editor, _| {
            editor.close_window()
        })
        .alias("clo"),
    );

    registry.register_command(
        Command::new(CMD_ONLY, "Close all other windows", |editor, _| {
            editor.only_window();
            Ok(())
        })
        .alias("on"),
    );

    registry.register_command(
        Command::new(CMD_EDIT, "Open a file in the current window", |editor, args| {
            match args.first() {
                Some(path) => {
                    editor.push_chrome(ChromeAction::OpenFile(PathBuf::from(path)));
                    Ok(())
                }
                None => Err(EditorError::MissingArgument(CMD_EDIT.to_string())),
            }
        })
        .alias("e"),
    );

    registry.register_command(
        Command::new(CMD_BUFFER, "Show a buffer by name", |editor, args| {
            let name = args.join(" ");
            let id = editor
                .buffer_by_name(&name)
                .ok_or(EditorError::NoSuchBuffer(name))?;
            editor.show_buffer(id);
            Ok(())
        })
        .alias("b"),
    );

    registry
}

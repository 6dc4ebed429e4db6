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

//! The built-in modes: `normal`, `insert` and the `prompt` used by `:` and `/`.

use crate::error::KeyParseError;
use crate::key::KeySequence;
use crate::mode::{action, Keymap, Mode, ModeKind};
use crate::window::Orientation;

pub const NORMAL_MODE: &str = "normal";
pub const INSERT_MODE: &str = "insert";
pub const PROMPT_MODE: &str = "prompt";

/// Letters usable as view mark names.
const MARK_NAMES: std::ops::RangeInclusive<char> = 'a'..='z';

fn last_char(keys: &KeySequence) -> Option<char> {
    keys.last().map(|k| k.rune)
}

pub fn normal_mode() -> Result<Mode, KeyParseError> {
    let mut keys = Keymap::new();

    // Movement
    for notation in ["h", "LEFT"] {
        keys.bind(notation, action(|e, b, _| { e.with_buffer(b, |buf| buf.move_by(-1, 0)); }))?;
    }
    for notation in ["l", "RIGHT"] {
        keys.bind(notation, action(|e, b, _| { e.with_buffer(b, |buf| buf.move_by(1, 0)); }))?;
    }
    for notation in ["j", "DOWN"] {
        keys.bind(notation, action(|e, b, _| { e.with_buffer(b, |buf| buf.move_by(0, 1)); }))?;
    }
    for notation in ["k", "UP"] {
        keys.bind(notation, action(|e, b, _| { e.with_buffer(b, |buf| buf.move_by(0, -1)); }))?;
    }
    keys.bind("0", action(|e, b, _| { e.with_buffer(b, |buf| buf.move_line_start()); }))?;
    keys.bind("$", action(|e, b, _| { e.with_buffer(b, |buf| buf.move_line_end()); }))?;
    keys.bind("g g", action(|e, b, _| { e.with_buffer(b, |buf| buf.move_top()); }))?;
    keys.bind("G", action(|e, b, _| { e.with_buffer(b, |buf| buf.move_bottom()); }))?;
    keys.bind(
        "C-u",
        action(|e, b, _| {
            let lines = e.config.jump_lines as isize;
            e.with_buffer(b, |buf| buf.move_jump(-lines));
        }),
    )?;
    keys.bind(
        "C-d",
        action(|e, b, _| {
            let lines = e.config.jump_lines as isize;
            e.with_buffer(b, |buf| buf.move_jump(lines));
        }),
    )?;
    keys.bind("z z", action(|e, _, _| e.windows.current_view_mut().center_pending = true))?;
    keys.bind(
        "w",
        action(|e, b, _| {
            if e.with_buffer(b, |buf| buf.move_word_forward()) == Some(false) {
                e.error("No next word.");
            }
        }),
    )?;
    keys.bind(
        "b",
        action(|e, b, _| {
            if e.with_buffer(b, |buf| buf.move_word_backward()) == Some(false) {
                e.error("No previous word.");
            }
        }),
    )?;

    // Entering insert mode
    keys.bind("i", action(|e, b, _| e.enter_insert_mode(b)))?;
    keys.bind(
        "a",
        action(|e, b, _| {
            e.with_buffer(b, |buf| {
                if buf.char_under_cursor().is_some_and(|c| c != '\n') {
                    buf.point_move(1);
                }
            });
            e.enter_insert_mode(b);
        }),
    )?;
    keys.bind(
        "A",
        action(|e, b, _| {
            e.with_buffer(b, |buf| buf.move_line_end());
            e.enter_insert_mode(b);
        }),
    )?;
    keys.bind(
        "o",
        action(|e, b, _| {
            e.with_buffer(b, |buf| buf.open_line_below());
            e.enter_insert_mode(b);
        }),
    )?;
    keys.bind(
        "O",
        action(|e, b, _| {
            e.with_buffer(b, |buf| buf.open_line_above());
            e.enter_insert_mode(b);
        }),
    )?;
    keys.bind(
        "x",
        action(|e, b, _| {
            e.with_buffer(b, |buf| {
                if buf.char_under_cursor().is_some_and(|c| c != '\n') {
                    buf.delete(1);
                }
            });
        }),
    )?;

    // Search
    keys.bind("/", action(|e, _, _| e.open_prompt(crate::editor::PromptKind::Search)))?;
    keys.bind("n", action(|e, _, _| e.search_next()))?;
    keys.bind("N", action(|e, _, _| e.search_prev()))?;
    keys.bind("*", action(|e, _, _| e.search_word_under_cursor()))?;
    keys.bind("SPC n", action(|e, _, _| e.search_clear()))?;

    // Commands and windows
    keys.bind(":", action(|e, _, _| e.open_prompt(crate::editor::PromptKind::Command)))?;
    keys.bind("C-w s", action(|e, _, _| e.split_window(Orientation::Vertical)))?;
    keys.bind("C-w v", action(|e, _, _| e.split_window(Orientation::Horizontal)))?;
    keys.bind("C-w w", action(|e, _, _| e.other_window()))?;
    keys.bind(
        "C-w c",
        action(|e, _, _| {
            if let Err(err) = e.close_window() {
                e.error(err.to_string());
            }
        }),
    )?;
    keys.bind("C-w o", action(|e, _, _| e.only_window()))?;

    // View marks
    for name in MARK_NAMES {
        keys.bind(
            &format!("m {name}"),
            action(|e, _, keys| {
                if let Some(name) = last_char(keys) {
                    e.set_view_mark(name);
                }
            }),
        )?;
        keys.bind(
            &format!("' {name}"),
            action(|e, _, keys| {
                if let Some(name) = last_char(keys) {
                    e.goto_view_mark(name);
                }
            }),
        )?;
    }

    Ok(Mode::new(NORMAL_MODE, ModeKind::Editing, keys))
}

pub fn insert_mode() -> Result<Mode, KeyParseError> {
    let mut keys = Keymap::new();

    keys.bind("ESC", action(|e, b, _| e.enter_normal_mode(b)))?;
    keys.bind("RET", action(|e, b, _| { e.with_buffer(b, |buf| buf.new_line_and_indent()); }))?;
    for notation in ["BAK", "C-h"] {
        keys.bind(notation, action(|e, b, _| { e.with_buffer(b, |buf| buf.backspace()); }))?;
    }
    keys.bind("DEL", action(|e, b, _| { e.with_buffer(b, |buf| buf.delete(1)); }))?;
    keys.bind("SPC", action(|e, b, _| { e.with_buffer(b, |buf| buf.insert(" ")); }))?;
    keys.bind(
        "TAB",
        action(|e, b, _| {
            let tab = if e.config.tab_to_spaces {
                " ".repeat(e.config.tab_width)
            } else {
                "\t".to_string()
            };
            e.with_buffer(b, |buf| buf.insert(&tab));
        }),
    )?;
    keys.bind("LEFT", action(|e, b, _| { e.with_buffer(b, |buf| buf.point_move(-1)); }))?;
    keys.bind("RIGHT", action(|e, b, _| { e.with_buffer(b, |buf| buf.point_move(1)); }))?;
    keys.bind("UP", action(|e, b, _| { e.with_buffer(b, |buf| buf.move_by(0, -1)); }))?;
    keys.bind("DOWN", action(|e, b, _| { e.with_buffer(b, |buf| buf.move_by(0, 1)); }))?;
    keys.bind_default(action(|e, b, keys| {
        if let Some(c) = keys.last().and_then(|k| k.text()) {
            e.with_buffer(b, |buf| buf.insert(c.encode_utf8(&mut [0; 4])));
        }
    }));

    Ok(Mode::new(INSERT_MODE, ModeKind::Editing, keys))
}

/// Line editing for the `:` and `/` prompts. Consulted alone while a prompt
/// is open.
pub fn prompt_mode() -> Result<Mode, KeyParseError> {
    let mut keys = Keymap::new();

    keys.bind("ESC", action(|e, _, _| e.prompt_cancel()))?;
    keys.bind("C-g", action(|e, _, _| e.prompt_cancel()))?;
    keys.bind("RET", action(|e, _, _| e.prompt_submit()))?;
    for notation in ["BAK", "C-h"] {
        keys.bind(notation, action(|e, _, _| e.prompt_backspace()))?;
    }
    keys.bind("TAB", action(|e, _, _| e.prompt_complete()))?;
    keys.bind_default(action(|e, _, keys| {
        if let Some(c) = keys.last().and_then(|k| k.text()) {
            e.prompt_push(c);
        }
    }));

    Ok(Mode::new(PROMPT_MODE, ModeKind::Minor, keys))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_modes_parse() {
        let normal = normal_mode().unwrap();
        assert_eq!(normal.kind, ModeKind::Editing);
        assert!(normal.keymap.lookup(&"g g".parse().unwrap()).is_some());
        assert!(normal.keymap.lookup(&"' q".parse().unwrap()).is_some());
        assert!(normal.keymap.default_action().is_none());

        let insert = insert_mode().unwrap();
        assert!(insert.keymap.default_action().is_some());
        assert_eq!(insert.keymap.max_len(), 1);

        let prompt = prompt_mode().unwrap();
        assert_eq!(prompt.kind, ModeKind::Minor);
    }
}

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

//! Editor configuration, read once at startup from a TOML file.
//!
//! ```toml
//! tab_to_spaces = true
//! tab_width = 2
//!
//! [colors.statusbar]
//! fg = "black"
//! bg = "green"
//! ```
//!
//! Every key is optional. Color entries given in the file replace the
//! built-in entry of the same name; the rest keep their defaults.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Foreground and background color names, e.g. `"black"`, `"aqua"`, or
/// `"default"` for the terminal's own color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default = "default_color")]
    pub fg: String,
    #[serde(default = "default_color")]
    pub bg: String,
}

impl Style {
    pub fn new(fg: &str, bg: &str) -> Self {
        Self {
            fg: fg.to_string(),
            bg: bg.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Insert spaces instead of a tab character
    #[serde(default)]
    pub tab_to_spaces: bool,

    /// Columns per tab, both for display and for tab-to-spaces
    #[serde(default = "default_tab_width")]
    pub tab_width: usize,

    /// Show line numbers in the left fringe
    #[serde(default = "default_numbers")]
    pub numbers: bool,

    /// Lines moved by C-u / C-d
    #[serde(default = "default_jump_lines")]
    pub jump_lines: usize,

    /// How long an ambiguous key sequence waits for more input
    #[serde(default = "default_sequence_timeout_ms")]
    pub sequence_timeout_ms: u64,

    #[serde(default = "default_colors")]
    pub colors: BTreeMap<String, Style>,
}

fn default_color() -> String {
    "default".to_string()
}

fn default_tab_width() -> usize {
    4
}

fn default_numbers() -> bool {
    true
}

fn default_jump_lines() -> usize {
    15
}

fn default_sequence_timeout_ms() -> u64 {
    500
}

fn default_colors() -> BTreeMap<String, Style> {
    [
        ("default", Style::new("white", "default")),
        ("cursor", Style::new("black", "white")),
        ("linenumber", Style::new("yellow", "default")),
        ("special", Style::new("aqua", "default")),
        ("statusbar", Style::new("black", "aqua")),
        ("statusbar.highlight", Style::new("black", "yellow")),
        ("search", Style::new("black", "yellow")),
        ("message.error", Style::new("red", "default")),
    ]
    .into_iter()
    .map(|(name, style)| (name.to_string(), style))
    .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tab_to_spaces: false,
            tab_width: default_tab_width(),
            numbers: default_numbers(),
            jump_lines: default_jump_lines(),
            sequence_timeout_ms: default_sequence_timeout_ms(),
            colors: default_colors(),
        }
    }
}

impl Config {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        let mut config: Config = toml::from_str(text)?;
        for (name, style) in default_colors() {
            config.colors.entry(name).or_insert(style);
        }
        Ok(config)
    }

    /// Style for `name`, falling back to the `default` entry.
    pub fn style(&self, name: &str) -> Style {
        self.colors
            .get(name)
            .or_else(|| self.colors.get("default"))
            .cloned()
            .unwrap_or_else(|| Style::new("default", "default"))
    }
}

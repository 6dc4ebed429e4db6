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

use std::path::PathBuf;
use thiserror::Error;

/// Failure to parse a chord or sequence written in key notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("empty key notation")]
    Empty,
    #[error("empty chord in {0:?}")]
    EmptyChord(String),
    #[error("unknown modifier {modifier:?} in {chord:?}")]
    UnknownModifier { modifier: String, chord: String },
    #[error("unknown key name {0:?}")]
    UnknownKey(String),
}

/// Failure to read a file into a buffer.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to load the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors surfaced by editor operations invoked from commands and bindings.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    File(#[from] FileError),
    #[error(transparent)]
    KeyParse(#[from] KeyParseError),
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("{0}: argument required")]
    MissingArgument(String),
    #[error("cannot close the last window")]
    LastWindow,
    #[error("no buffer named {0}")]
    NoSuchBuffer(String),
}

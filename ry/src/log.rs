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

//! Logging setup. The terminal is in raw mode while the editor runs, so logs
//! only ever go to a file.
//!
//! The filter comes from `RY_LOG`, then `RUST_LOG`, then defaults to `warn`
//! globally and `info` for the ry crates. A bare level in `RY_LOG` (e.g.
//! `RY_LOG=debug`) applies to the ry crates only.
//!
//! Default file: `<data_local_dir>/ry/logs/ry-<pid>.log`, overridden with
//! `--log-file`.

use std::env;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

const RY_CRATES: [&str; 3] = ["ry", "ry_core", "ry_terminal"];

/// Must be held for the life of the program; dropping it flushes the log file.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

pub fn init(log_file: Option<PathBuf>) -> Result<LogGuard, Box<dyn std::error::Error + Send + Sync>> {
    let (dir, filename) = resolve_log_path(log_file);
    std::fs::create_dir_all(&dir)?;

    let file_appender = tracing_appender::rolling::never(&dir, &filename);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_filter(create_filter(env::var("RY_LOG").ok(), env::var("RUST_LOG").ok()));

    Registry::default().with(file_layer).try_init()?;

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file: dir.join(filename),
    })
}

fn resolve_log_path(override_path: Option<PathBuf>) -> (PathBuf, String) {
    let filename = format!("ry-{}.log", std::process::id());

    if let Some(path) = override_path {
        if path.extension().is_some() {
            let dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(filename);
            return (dir, name);
        }
        return (path, filename);
    }

    let dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ry")
        .join("logs");
    (dir, filename)
}

fn create_filter(ry_log: Option<String>, rust_log: Option<String>) -> EnvFilter {
    EnvFilter::new(filter_directives(ry_log.as_deref(), rust_log.as_deref()))
}

fn filter_directives(ry_log: Option<&str>, rust_log: Option<&str>) -> String {
    if let Some(ry_log) = ry_log {
        if ry_log.contains(&['=', ':', ','][..]) {
            return ry_log.to_string();
        }
        return expand(ry_log);
    }
    if let Some(rust_log) = rust_log {
        return rust_log.to_string();
    }
    expand("info")
}

fn expand(level: &str) -> String {
    let crates: Vec<String> = RY_CRATES.iter().map(|c| format!("{c}={level}")).collect();
    format!("warn,{}", crates.join(","))
}

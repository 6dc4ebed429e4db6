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

mod log;

use clap::Parser;
use crossterm::execute;
use ry_core::{BufferId, Config, Editor, FileLoader, FsLoader};
use ry_terminal::{event_loop_with_renderer, spawn_input_task, TerminalRenderer, Theme};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// A small modal text editor for the terminal
#[derive(Debug, Parser)]
#[command(name = "ry", version, about)]
struct Args {
    /// Files to open
    files: Vec<PathBuf>,

    /// Config file [default: <config_dir>/ry/config.toml]
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log file or directory [default: <data_local_dir>/ry/logs]
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ry").join("config.toml"))
}

fn load_config(path: Option<&Path>) -> Config {
    let Some(path) = path.map(Path::to_path_buf).or_else(default_config_path) else {
        return Config::default();
    };
    match Config::load(&path) {
        Ok(config) => config,
        Err(e) => {
            // Raw mode is not on yet, so this reaches the user.
            eprintln!("ry: {e}; using defaults");
            error!(error = %e, "config not loaded");
            Config::default()
        }
    }
}

// Everything to run in raw_mode
async fn terminal_main<W: Write>(
    stdout: W,
    config: Config,
    files: Vec<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (width, height) = crossterm::terminal::size()?;
    let theme = Theme::from_config(&config);
    let mut editor = Editor::new(config)?;

    let loader = FsLoader;
    let mut first = None;
    for path in &files {
        let opened = open_or_create(&mut editor, &loader, path).await;
        first = first.or(opened);
    }
    if let Some(id) = first {
        editor.show_buffer(id);
    }

    let mut renderer = TerminalRenderer::new(stdout, theme, width, height);
    let mut events = spawn_input_task();
    event_loop_with_renderer(&mut renderer, &mut editor, &mut events, &loader).await?;
    Ok(())
}

/// Open `path`, or start an empty buffer for it when the file does not exist.
async fn open_or_create(
    editor: &mut Editor,
    loader: &dyn FileLoader,
    path: &Path,
) -> Option<BufferId> {
    if path.exists() {
        editor.open_file(loader, path).await
    } else {
        info!(path = %path.display(), "new file");
        Some(editor.open_buffer(path, ""))
    }
}

fn exit_state(device: &mut impl Write) -> Result<(), std::io::Error> {
    execute!(
        device,
        crossterm::terminal::Clear(crossterm::terminal::ClearType::All),
        crossterm::cursor::MoveTo(0, 0),
        crossterm::cursor::Show,
        crossterm::terminal::LeaveAlternateScreen
    )?;
    crossterm::terminal::disable_raw_mode()?;
    Ok(())
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let args = Args::parse();

    let log_guard = match log::init(args.log_file.clone()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("ry: logging disabled: {e}");
            None
        }
    };
    if let Some(guard) = &log_guard {
        info!(log_file = %guard.log_file.display(), "ry starting");
    }

    let config = load_config(args.config.as_deref());

    // Set panic handler to clean up terminal state while preserving panic info
    std::panic::set_hook(Box::new(|panic_info| {
        let _ = exit_state(&mut std::io::stdout());
        error!(%panic_info, "panic");
        eprintln!("ry crashed: {panic_info}");
    }));

    let mut stdout = std::io::stdout();
    let setup = crossterm::terminal::enable_raw_mode()
        .and_then(|_| execute!(stdout, crossterm::terminal::EnterAlternateScreen));
    if let Err(e) = setup {
        let _ = exit_state(&mut stdout);
        error!(error = %e, "terminal setup failed");
        eprintln!("ry: cannot initialize terminal: {e}");
        return std::process::ExitCode::FAILURE;
    }

    let result = terminal_main(&mut stdout, config, args.files).await;

    // Always clean up terminal state, regardless of success or failure
    if let Err(cleanup_err) = exit_state(&mut stdout) {
        eprintln!("ry: failed to restore terminal: {cleanup_err}");
    }

    match result {
        Ok(()) => {
            info!("ry exiting");
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "fatal");
            eprintln!("ry: {e}");
            std::process::ExitCode::FAILURE
        }
    }
}

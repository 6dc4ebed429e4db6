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

//! Line number gutter shown on the left of every window.
//!
//! Layout: `[line_number][separator]`, the number right-aligned to the
//! width needed by the buffer's last line.

/// Configuration for gutter rendering
#[derive(Debug, Clone)]
pub struct GutterConfig {
    /// Whether to show line numbers
    pub show_line_numbers: bool,
    /// Minimum width for line numbers (in characters)
    pub min_line_number_width: usize,
}

impl Default for GutterConfig {
    fn default() -> Self {
        Self {
            show_line_numbers: true,
            min_line_number_width: 1,
        }
    }
}

impl GutterConfig {
    pub fn from_numbers(show_line_numbers: bool) -> Self {
        Self {
            show_line_numbers,
            ..Default::default()
        }
    }
}

/// Width of the gutter in characters, separator included. Zero when line
/// numbers are off.
pub fn calculate_gutter_width(total_lines: usize, config: &GutterConfig) -> usize {
    if !config.show_line_numbers {
        return 0;
    }
    let digits_needed = total_lines.max(1).to_string().len();
    digits_needed.max(config.min_line_number_width) + 1
}

/// Format a zero-based line index as its one-based number, right-aligned in
/// `width` columns.
pub fn format_line_number(line_index: usize, width: usize) -> String {
    format!("{:>width$}", line_index + 1, width = width)
}

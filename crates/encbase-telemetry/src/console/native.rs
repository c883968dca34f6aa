// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Color through the console's own attribute API.
//!
//! The message stream never sees a color code. Pending text is flushed, then
//! the console attributes are switched out of band, so colors land on the
//! right characters.

use super::ColorBackend;
use crossterm::style::{Color, ResetColor, SetForegroundColor};
use encbase_core::{ConsoleColor, LogLevel};
use std::io::{self, Write};

/// Changes the text attributes of the process console.
pub trait ConsoleDevice: Send + Sync {
    /// Switches the console foreground to `color`.
    fn apply(&self, color: ConsoleColor) -> io::Result<()>;

    /// Restores the console's original attributes.
    fn restore(&self) -> io::Result<()>;
}

fn to_crossterm(color: ConsoleColor) -> Color {
    match color {
        ConsoleColor::Red => Color::Red,
        ConsoleColor::Yellow => Color::Yellow,
        ConsoleColor::Green => Color::Green,
        ConsoleColor::Cyan => Color::Cyan,
        ConsoleColor::Default => Color::Reset,
    }
}

/// The console attached to stdout, driven through `crossterm`.
///
/// On Windows this calls the console attribute API directly. Elsewhere the
/// terminal is the console and `crossterm` drives it on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrosstermConsole;

#[cfg(windows)]
impl ConsoleDevice for CrosstermConsole {
    fn apply(&self, color: ConsoleColor) -> io::Result<()> {
        use crossterm::Command;
        SetForegroundColor(to_crossterm(color)).execute_winapi()
    }

    fn restore(&self) -> io::Result<()> {
        use crossterm::Command;
        ResetColor.execute_winapi()
    }
}

#[cfg(not(windows))]
impl ConsoleDevice for CrosstermConsole {
    fn apply(&self, color: ConsoleColor) -> io::Result<()> {
        let mut stdout = io::stdout();
        crossterm::execute!(stdout, SetForegroundColor(to_crossterm(color)))
    }

    fn restore(&self) -> io::Result<()> {
        let mut stdout = io::stdout();
        crossterm::execute!(stdout, ResetColor)
    }
}

/// Colors every level through a [`ConsoleDevice`].
///
/// Each message is bracketed by a set/reset pair, informational ones
/// included, and the console is restored after every write.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeConsole<D = CrosstermConsole> {
    device: D,
}

impl<D: ConsoleDevice> NativeConsole<D> {
    /// Creates a backend driving `device`.
    pub fn with_device(device: D) -> Self {
        Self { device }
    }
}

impl NativeConsole {
    /// Creates a backend for the stdout console.
    pub fn new() -> Self {
        Self::with_device(CrosstermConsole)
    }
}

impl<D: ConsoleDevice> ColorBackend for NativeConsole<D> {
    fn set_color(&self, out: &mut dyn Write, color: ConsoleColor) -> io::Result<()> {
        out.flush()?;
        self.device.apply(color)
    }

    fn reset_color(&self, out: &mut dyn Write) -> io::Result<()> {
        out.flush()?;
        self.device.restore()
    }

    fn wraps(&self, _level: LogLevel) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "native"
    }
}

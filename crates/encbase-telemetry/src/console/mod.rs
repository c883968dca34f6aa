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

//! Console color handling.
//!
//! The logger never emits color codes itself. It asks a [`ColorBackend`] to
//! switch the console color before a message and to restore it afterwards.
//! [`AnsiColors`] writes SGR escape sequences into the stream,
//! [`NativeConsole`] changes the console attributes out of band and
//! [`PlainConsole`] leaves colors alone.

mod ansi;
mod native;
mod plain;

pub use ansi::AnsiColors;
pub use native::{ConsoleDevice, CrosstermConsole, NativeConsole};
pub use plain::PlainConsole;

use encbase_core::{ColorMode, ConsoleColor, LogLevel};
use std::io::{self, Write};

/// Sets and resets the console color around a message.
pub trait ColorBackend: Send + Sync {
    /// Switches subsequent output to `color`.
    fn set_color(&self, out: &mut dyn Write, color: ConsoleColor) -> io::Result<()>;

    /// Restores the console's neutral color.
    fn reset_color(&self, out: &mut dyn Write) -> io::Result<()>;

    /// Whether messages of `level` are bracketed by [`set_color`](Self::set_color)
    /// and [`reset_color`](Self::reset_color).
    fn wraps(&self, level: LogLevel) -> bool;

    /// A short name used in diagnostics.
    fn name(&self) -> &'static str;
}

/// Picks the backend for a color policy.
///
/// `is_terminal` tells whether the output stream is an interactive terminal;
/// it only matters for [`ColorMode::Auto`].
pub fn select_backend(mode: ColorMode, is_terminal: bool) -> Box<dyn ColorBackend> {
    match mode {
        ColorMode::Always => Box::new(AnsiColors),
        ColorMode::Native => Box::new(NativeConsole::new()),
        ColorMode::Never => Box::new(PlainConsole),
        ColorMode::Auto if is_terminal => terminal_backend(),
        ColorMode::Auto => Box::new(PlainConsole),
    }
}

#[cfg(windows)]
fn terminal_backend() -> Box<dyn ColorBackend> {
    Box::new(NativeConsole::new())
}

#[cfg(not(windows))]
fn terminal_backend() -> Box<dyn ColorBackend> {
    Box::new(AnsiColors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_mode_follows_the_terminal() {
        let expected = if cfg!(windows) { "native" } else { "ansi" };
        assert_eq!(select_backend(ColorMode::Auto, true).name(), expected);
        assert_eq!(select_backend(ColorMode::Auto, false).name(), "plain");
    }

    #[test]
    fn explicit_modes_ignore_the_terminal() {
        assert_eq!(select_backend(ColorMode::Always, false).name(), "ansi");
        assert_eq!(select_backend(ColorMode::Native, false).name(), "native");
        assert_eq!(select_backend(ColorMode::Never, true).name(), "plain");
    }
}

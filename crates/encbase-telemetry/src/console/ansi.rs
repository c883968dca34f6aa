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

//! SGR escape sequences for ANSI-capable terminals.

use super::ColorBackend;
use encbase_core::{ConsoleColor, LogLevel};
use std::io::{self, Write};

// ANSI color codes
const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[1;31m";
const YELLOW: &str = "\x1b[1;33m";
const GREEN: &str = "\x1b[1;32m";
const CYAN: &str = "\x1b[1;36m";

/// Colors output with inline ANSI escape sequences.
///
/// Informational and unprefixed messages are printed as-is, without any
/// escape sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiColors;

impl AnsiColors {
    /// The escape sequence selecting `color`.
    pub fn code(color: ConsoleColor) -> &'static str {
        match color {
            ConsoleColor::Red => RED,
            ConsoleColor::Yellow => YELLOW,
            ConsoleColor::Green => GREEN,
            ConsoleColor::Cyan => CYAN,
            ConsoleColor::Default => RESET,
        }
    }
}

impl ColorBackend for AnsiColors {
    fn set_color(&self, out: &mut dyn Write, color: ConsoleColor) -> io::Result<()> {
        out.write_all(Self::code(color).as_bytes())
    }

    fn reset_color(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(RESET.as_bytes())
    }

    fn wraps(&self, level: LogLevel) -> bool {
        level.is_emphasized()
    }

    fn name(&self) -> &'static str {
        "ansi"
    }
}

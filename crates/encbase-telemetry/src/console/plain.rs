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

//! Uncolored output.

use super::ColorBackend;
use encbase_core::{ConsoleColor, LogLevel};
use std::io::{self, Write};

/// Writes messages uncolored, for pipes, files and consoles without color support.
///
/// No level is wrapped, so the set/reset calls are never made.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainConsole;

impl ColorBackend for PlainConsole {
    fn set_color(&self, _out: &mut dyn Write, _color: ConsoleColor) -> io::Result<()> {
        Ok(())
    }

    fn reset_color(&self, _out: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }

    fn wraps(&self, _level: LogLevel) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "plain"
    }
}

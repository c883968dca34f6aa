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

//! # Encbase Telemetry
//!
//! Human-facing diagnostics for the encoding pipeline: the leveled, colorized
//! console logger and the file-backed trace sink used for deterministic
//! debugging.
//!
//! The trace sink is compiled only with the `trace` feature. Without it,
//! [`TraceSink`] keeps the same API and every call is an empty inline function.

#![warn(missing_docs)]

pub mod console;
pub mod error;
pub mod logger;
pub mod trace;

pub use console::{
    select_backend, AnsiColors, ColorBackend, ConsoleDevice, CrosstermConsole, NativeConsole,
    PlainConsole,
};
pub use error::TelemetryError;
pub use logger::{install_as_global, ConsoleLogger, LOG_BUFFER_HINT};
pub use trace::{TraceSink, TraceState};

pub use encbase_core::{LogLevel, VerbositySource};

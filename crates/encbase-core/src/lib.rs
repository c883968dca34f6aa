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

//! # Encbase Core
//!
//! Foundational crate shared by every stage of the encoding pipeline. It holds
//! the severity levels and verbosity contract used by the console logger, the
//! diagnostics configuration, the monotonic microsecond timer and the thread
//! spawning primitive.
//!
//! Nothing in here depends on anything else in the crate beyond the shared
//! error type; callers compose the pieces themselves.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod level;
pub mod thread;
pub mod timer;

pub use config::{ColorMode, DiagnosticsConfig, ThreadConfig};
pub use error::{CoreError, CoreResult};
pub use level::{is_visible, ConsoleColor, LogLevel, ParseLevelError, VerbositySource, LEVEL_MASK};
pub use thread::{spawn, ThreadEntry, ThreadHandle, ThreadSpawner};
pub use timer::{
    monotonic_now, ClockSource, CoarseClock, HighResClock, MonotonicTimer, Stopwatch, Timestamp,
};

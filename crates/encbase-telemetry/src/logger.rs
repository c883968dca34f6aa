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

//! Leveled, colorized console logging.
//!
//! [`ConsoleLogger::log`] filters a message against the verbosity threshold of
//! an optional context, renders it and writes it with the level's prefix and
//! color. Logging never fails the caller: formatting and I/O errors are
//! swallowed and the message is lost.
//!
//! Messages are written verbatim; callers add their own trailing newline.

use crate::console::{select_backend, ColorBackend};
use crate::error::TelemetryError;
use encbase_core::level::is_visible;
use encbase_core::{ColorMode, DiagnosticsConfig, LogLevel, VerbositySource};
use std::fmt::{self, Write as _};
use std::io::{self, IsTerminal, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Initial capacity of the buffer a message is rendered into. Longer messages grow it.
pub const LOG_BUFFER_HINT: usize = 2048;

/// Writes leveled messages to a console-like sink.
///
/// The logger holds no threshold of its own; every call reads it from the
/// context it is given. It is safe to share between threads: one message is
/// written under a single lock, so lines from different threads do not mix.
pub struct ConsoleLogger {
    backend: Box<dyn ColorBackend>,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleLogger {
    /// Creates a logger writing to stdout with the given color policy.
    pub fn new(mode: ColorMode) -> Self {
        let backend = select_backend(mode, io::stdout().is_terminal());
        Self::with_backend(backend, Box::new(io::stdout()))
    }

    /// Creates a stdout logger using the color policy of a configuration.
    pub fn from_config(config: &DiagnosticsConfig) -> Self {
        Self::new(config.color)
    }

    /// Creates a logger writing to an arbitrary sink.
    ///
    /// The sink is never treated as a terminal, so [`ColorMode::Auto`] selects plain output.
    pub fn with_sink(mode: ColorMode, sink: Box<dyn Write + Send>) -> Self {
        Self::with_backend(select_backend(mode, false), sink)
    }

    /// Creates a logger from an explicit color backend and sink.
    pub fn with_backend(backend: Box<dyn ColorBackend>, sink: Box<dyn Write + Send>) -> Self {
        Self {
            backend,
            sink: Mutex::new(sink),
        }
    }

    /// Name of the active color backend.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Logs a formatted message.
    ///
    /// `context` supplies the threshold; `None` shows every message. `level` is
    /// a [`LogLevel`] or a raw level value. Bits above the level mask are
    /// ignored by the filter, but a value carrying them prints as unknown.
    pub fn log(
        &self,
        context: Option<&dyn VerbositySource>,
        level: impl Into<i32>,
        args: fmt::Arguments<'_>,
    ) {
        let raw = level.into();
        if !is_visible(raw, context) {
            return;
        }

        match args.as_str() {
            Some(text) => self.emit(LogLevel::from_raw(raw), text),
            None => {
                let mut message = String::with_capacity(LOG_BUFFER_HINT);
                if message.write_fmt(args).is_err() {
                    return;
                }
                self.emit(LogLevel::from_raw(raw), &message);
            }
        }
    }

    /// Logs a message that is already rendered.
    pub fn log_str(
        &self,
        context: Option<&dyn VerbositySource>,
        level: impl Into<i32>,
        message: &str,
    ) {
        let raw = level.into();
        if is_visible(raw, context) {
            self.emit(LogLevel::from_raw(raw), message);
        }
    }

    fn emit(&self, level: LogLevel, message: &str) {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = self.write_message(&mut **sink, level, message);
    }

    fn write_message(&self, out: &mut dyn Write, level: LogLevel, message: &str) -> io::Result<()> {
        let wrapped = self.backend.wraps(level);
        if wrapped {
            self.backend.set_color(out, level.color())?;
        }
        let written = out
            .write_all(level.prefix().as_bytes())
            .and_then(|_| out.write_all(message.as_bytes()));
        if wrapped {
            // Restore the neutral color even when the message itself failed.
            self.backend.reset_color(out)?;
        }
        written?;
        out.flush()
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new(ColorMode::Auto)
    }
}

impl fmt::Debug for ConsoleLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleLogger")
            .field("backend", &self.backend.name())
            .finish_non_exhaustive()
    }
}

/// Routes records of the `log` facade into a [`ConsoleLogger`].
struct FacadeLogger {
    console: Arc<ConsoleLogger>,
    threshold: i32,
}

impl log::Log for FacadeLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        let level = LogLevel::from(metadata.level());
        is_visible(level.as_raw(), Some(&self.threshold))
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            let level = LogLevel::from(record.level());
            self.console.log(
                Some(&self.threshold),
                level,
                format_args!("{}\n", record.args()),
            );
        }
    }

    fn flush(&self) {
        let mut sink = self
            .console
            .sink
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let _ = sink.flush();
    }
}

fn level_filter(threshold: i32) -> log::LevelFilter {
    match threshold {
        t if t < LogLevel::Error.as_raw() => log::LevelFilter::Off,
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        _ => log::LevelFilter::Trace,
    }
}

/// Installs `console` as the process-wide `log` facade logger.
///
/// Records above `threshold` are discarded; `log::Level::Trace` is printed as debug.
///
/// ## Errors
/// [`TelemetryError::LoggerAlreadySet`] if another facade logger is installed.
pub fn install_as_global(
    console: Arc<ConsoleLogger>,
    threshold: impl VerbositySource,
) -> Result<(), TelemetryError> {
    let threshold = threshold.log_level();
    log::set_boxed_logger(Box::new(FacadeLogger { console, threshold }))
        .map_err(|_| TelemetryError::LoggerAlreadySet)?;
    log::set_max_level(level_filter(threshold));
    Ok(())
}

/// Logs through a [`ConsoleLogger`] at an explicit level.
///
/// ```ignore
/// enc_log!(logger, Some(&config), LogLevel::Info, "frame {} done\n", n);
/// ```
#[macro_export]
macro_rules! enc_log {
    ($logger:expr, $ctx:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($ctx, $level, ::std::format_args!($($arg)+))
    };
}

/// Logs an error message.
#[macro_export]
macro_rules! enc_error {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::enc_log!($logger, $ctx, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Logs a warning message.
#[macro_export]
macro_rules! enc_warn {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::enc_log!($logger, $ctx, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Logs an informational message.
#[macro_export]
macro_rules! enc_info {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::enc_log!($logger, $ctx, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Logs a debug message.
#[macro_export]
macro_rules! enc_debug {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::enc_log!($logger, $ctx, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Prints text without a level prefix.
#[macro_export]
macro_rules! enc_print {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::enc_log!($logger, $ctx, $crate::LogLevel::NoPrefix, $($arg)+)
    };
}

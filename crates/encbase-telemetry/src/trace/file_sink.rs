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

//! File-backed trace sink.

use super::TraceState;
use encbase_core::{CoreError, CoreResult, DiagnosticsConfig};
use std::fmt::{self, Write as _};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct SinkInner {
    state: TraceState,
    file: Option<File>,
    path: Option<PathBuf>,
}

/// Writes trace messages to a file, flushing after every call.
///
/// Concurrent `trace` calls are serialized by an internal lock, so a message
/// is never split by another thread's output.
#[derive(Debug)]
pub struct TraceSink {
    inner: Mutex<SinkInner>,
    active: AtomicBool,
    symbols: AtomicU64,
    bits: AtomicU64,
}

impl TraceSink {
    /// Creates an uninitialized sink. Trace calls are no-ops until [`init`](Self::init).
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SinkInner {
                state: TraceState::Uninitialized,
                file: None,
                path: None,
            }),
            active: AtomicBool::new(false),
            symbols: AtomicU64::new(0),
            bits: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SinkInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens the trace file at `path`, truncating any previous content.
    ///
    /// An empty path leaves tracing disabled. A file left open by an earlier
    /// `init` is closed first. Symbol and bit counters restart from zero.
    ///
    /// ## Errors
    /// [`CoreError::TraceFileOpen`] if the file cannot be created.
    pub fn init(&self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();
        let mut inner = self.lock();

        if let Some(mut previous) = inner.file.take() {
            let _ = previous.flush();
        }
        inner.path = None;
        self.active.store(false, Ordering::Release);
        self.symbols.store(0, Ordering::Relaxed);
        self.bits.store(0, Ordering::Relaxed);

        if path.as_os_str().is_empty() {
            inner.state = TraceState::Disabled;
            return Ok(());
        }

        match File::create(path) {
            Ok(file) => {
                log::info!("Trace file opened at {}", path.display());
                inner.file = Some(file);
                inner.path = Some(path.to_path_buf());
                inner.state = TraceState::Open;
                self.active.store(true, Ordering::Release);
                Ok(())
            }
            Err(source) => {
                log::error!("trace: can't write to {}", path.display());
                inner.state = TraceState::Disabled;
                Err(CoreError::TraceFileOpen {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    /// Same as [`init`](Self::init) with the configured trace file.
    pub fn init_from_config(&self, config: &DiagnosticsConfig) -> CoreResult<()> {
        self.init(&config.trace_file)
    }

    /// Appends a formatted message to the trace file and flushes it.
    ///
    /// Returns the number of bytes written, or 0 when no file is open. Write
    /// errors are swallowed and also yield 0.
    pub fn trace(&self, args: fmt::Arguments<'_>) -> usize {
        if !self.active.load(Ordering::Acquire) {
            return 0;
        }

        let owned;
        let text = match args.as_str() {
            Some(text) => text,
            None => {
                let mut buffer = String::new();
                if buffer.write_fmt(args).is_err() {
                    return 0;
                }
                owned = buffer;
                owned.as_str()
            }
        };

        let mut inner = self.lock();
        let Some(file) = inner.file.as_mut() else {
            return 0;
        };
        match file.write_all(text.as_bytes()).and_then(|_| file.flush()) {
            Ok(()) => text.len(),
            Err(e) => {
                log::warn!("Failed to append to trace file: {e}");
                0
            }
        }
    }

    /// Counts one coded symbol of `bits` bits. Ignored unless a file is open.
    pub fn record_symbol(&self, bits: u32) {
        if self.active.load(Ordering::Acquire) {
            self.symbols.fetch_add(1, Ordering::Relaxed);
            self.bits.fetch_add(u64::from(bits), Ordering::Relaxed);
        }
    }

    /// Symbols recorded since the last `init`.
    pub fn symbol_count(&self) -> u64 {
        self.symbols.load(Ordering::Relaxed)
    }

    /// Bits recorded since the last `init`.
    pub fn bit_count(&self) -> u64 {
        self.bits.load(Ordering::Relaxed)
    }

    /// The current lifecycle state.
    pub fn state(&self) -> TraceState {
        self.lock().state
    }

    /// Returns `true` while a trace file is open.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Path of the open trace file, if any.
    pub fn path(&self) -> Option<PathBuf> {
        self.lock().path.clone()
    }

    /// Closes the trace file if one is open. Safe to call repeatedly.
    pub fn shutdown(&self) {
        let mut inner = self.lock();
        self.active.store(false, Ordering::Release);
        if let Some(mut file) = inner.file.take() {
            let _ = file.flush();
            if let Some(path) = inner.path.take() {
                log::info!("Trace file closed at {}", path.display());
            }
        }
        inner.state = TraceState::Closed;
    }
}

impl Default for TraceSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TraceSink {
    fn drop(&mut self) {
        self.shutdown();
    }
}

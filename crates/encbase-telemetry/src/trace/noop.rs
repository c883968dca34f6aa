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

//! Trace sink used when the `trace` feature is disabled.

use super::TraceState;
use encbase_core::{CoreResult, DiagnosticsConfig};
use std::fmt;
use std::path::{Path, PathBuf};

/// A trace sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceSink;

impl TraceSink {
    /// Creates the sink.
    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// Accepts any path and never opens a file.
    #[inline]
    pub fn init(&self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() {
            log::debug!("Tracing is compiled out, ignoring {}", path.display());
        }
        Ok(())
    }

    /// Same as [`init`](Self::init) with the configured trace file.
    #[inline]
    pub fn init_from_config(&self, config: &DiagnosticsConfig) -> CoreResult<()> {
        self.init(&config.trace_file)
    }

    /// Discards the message.
    #[inline]
    pub fn trace(&self, _args: fmt::Arguments<'_>) -> usize {
        0
    }

    /// Does nothing.
    #[inline]
    pub fn record_symbol(&self, _bits: u32) {}

    /// Always zero.
    #[inline]
    pub fn symbol_count(&self) -> u64 {
        0
    }

    /// Always zero.
    #[inline]
    pub fn bit_count(&self) -> u64 {
        0
    }

    /// Always [`TraceState::Disabled`].
    #[inline]
    pub fn state(&self) -> TraceState {
        TraceState::Disabled
    }

    /// Always `false`.
    #[inline]
    pub fn is_active(&self) -> bool {
        false
    }

    /// Always `None`.
    #[inline]
    pub fn path(&self) -> Option<PathBuf> {
        None
    }

    /// Does nothing.
    #[inline]
    pub fn shutdown(&self) {}
}

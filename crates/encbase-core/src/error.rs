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

//! Defines the error taxonomy for the diagnostics substrate.
//!
//! Only resource acquisition can fail: opening the trace file, creating a
//! thread, and reading the configuration. Steady-state calls (`log`, `trace`,
//! `monotonic_now`) never return an error.

use std::io;
use std::path::PathBuf;

/// Result alias used throughout the crate.
pub type CoreResult<T> = Result<T, CoreError>;

/// An error raised while acquiring one of the resources owned by the core.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The configured trace file could not be created or truncated.
    ///
    /// This is a configuration error and aborts the encoding session.
    #[error("trace: can't write to '{}': {source}", .path.display())]
    TraceFileOpen {
        /// The path that was configured as the trace file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The operating system refused to create a new thread.
    #[error("failed to spawn thread '{name}': {source}")]
    ThreadSpawn {
        /// The name requested for the thread.
        name: String,
        /// The underlying I/O error reported by the OS.
        #[source]
        source: io::Error,
    },

    /// A spawned thread panicked before returning a status.
    #[error("thread '{name}' panicked")]
    ThreadPanicked {
        /// The name of the thread that panicked.
        name: String,
    },

    /// The configuration file could not be read.
    #[error("failed to read configuration from '{}': {source}", .path.display())]
    ConfigRead {
        /// The path of the configuration file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration document is not valid.
    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl CoreError {
    /// Returns `true` if the error stems from a resource the OS could not hand out.
    pub fn is_resource_exhaustion(&self) -> bool {
        matches!(self, CoreError::ThreadSpawn { .. })
    }

    /// Returns `true` if the error is a fatal configuration problem.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CoreError::TraceFileOpen { .. }
                | CoreError::ConfigRead { .. }
                | CoreError::ConfigParse(_)
        )
    }
}

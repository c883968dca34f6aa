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

//! Diagnostics settings consumed from the encoder's parameter set.
//!
//! Only the handful of fields the substrate needs live here: the console
//! verbosity threshold, the trace file path, the color policy and how
//! worker threads are named.

use crate::error::{CoreError, CoreResult};
use crate::level::{LogLevel, VerbositySource};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Whether console output is colorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color only when stdout is a terminal: native console attributes on
    /// Windows, ANSI escape sequences elsewhere.
    #[default]
    Auto,
    /// Always emit ANSI colors.
    Always,
    /// Drive the console's own color attributes; no escape sequence enters the stream.
    Native,
    /// Never emit escape sequences.
    Never,
}

/// How spawned worker threads are configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadConfig {
    /// Prefix of every thread name; a sequence number is appended.
    pub name_prefix: String,
    /// Stack size in bytes. `None` keeps the platform default.
    pub stack_size: Option<usize>,
}

impl Default for ThreadConfig {
    fn default() -> Self {
        Self {
            name_prefix: "encbase-worker".to_string(),
            stack_size: None,
        }
    }
}

/// Diagnostics settings for one encoder session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Verbosity threshold. `-1` silences every leveled message.
    pub log_level: i32,
    /// Trace file path. Empty disables tracing.
    pub trace_file: String,
    /// Console color policy.
    pub color: ColorMode,
    /// Worker thread settings.
    pub threads: ThreadConfig,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Debug.as_raw(),
            trace_file: String::new(),
            color: ColorMode::default(),
            threads: ThreadConfig::default(),
        }
    }
}

impl DiagnosticsConfig {
    /// Parses a configuration from a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CoreError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        log::debug!("Loaded diagnostics configuration from {}", path.display());
        Ok(config)
    }

    /// Returns `true` if a trace file is configured.
    pub fn tracing_requested(&self) -> bool {
        !self.trace_file.is_empty()
    }
}

impl VerbositySource for DiagnosticsConfig {
    fn log_level(&self) -> i32 {
        self.log_level
    }
}

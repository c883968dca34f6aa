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

//! The execution trace sink.
//!
//! A [`TraceSink`] is an owned, append-only text sink bound to the trace file
//! of one encoder session. It is created empty, opened by
//! [`TraceSink::init`] and closed by [`TraceSink::shutdown`]:
//!
//! ```text
//! Uninitialized -> Disabled (empty path) | Open (file created) -> Closed
//! ```
//!
//! With the `trace` feature off, the sink is a zero-sized type whose methods
//! do nothing, so call sites never need their own conditional compilation.

#[cfg(feature = "trace")]
mod file_sink;
#[cfg(not(feature = "trace"))]
mod noop;

#[cfg(feature = "trace")]
pub use file_sink::TraceSink;
#[cfg(not(feature = "trace"))]
pub use noop::TraceSink;

/// Lifecycle of a [`TraceSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceState {
    /// `init` has not been called yet.
    Uninitialized,
    /// Initialized without a trace file; every trace call is a no-op.
    Disabled,
    /// A trace file is open and receives every trace call.
    Open,
    /// `shutdown` has been called.
    Closed,
}

/// Appends a formatted message to a [`TraceSink`] and returns the number of bytes written.
///
/// ```ignore
/// enc_trace!(sink, "POC {} slice {}\n", poc, slice);
/// ```
#[macro_export]
macro_rules! enc_trace {
    ($sink:expr, $($arg:tt)+) => {
        $sink.trace(::std::format_args!($($arg)+))
    };
}

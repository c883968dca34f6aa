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

//! Severity levels and the verbosity contract used to filter console output.
//!
//! A level travels as a raw `i32`. Its low nibble ([`LEVEL_MASK`]) is the
//! severity, lower meaning more severe; the remaining bits are flags a caller
//! may layer on top. Filtering ignores them: a message is shown when its
//! masked level is less than or equal to the threshold of the active
//! [`VerbositySource`], or always when no source is given. Presentation does
//! not, so a flagged value prints with the unknown prefix.

use std::fmt;
use std::str::FromStr;

/// Bits of a raw level value that carry the severity.
pub const LEVEL_MASK: i32 = 0x0F;

/// The severity attached to a console message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(i32)]
pub enum LogLevel {
    /// A failure the user must see.
    Error = 0,
    /// Something suspicious that does not stop the encode.
    Warning = 1,
    /// Regular progress reporting.
    Info = 2,
    /// Verbose developer output.
    Debug = 3,
    /// Raw text printed without any prefix (banners, tables).
    NoPrefix = 4,
    /// Any value outside the known levels.
    #[default]
    Unknown = LEVEL_MASK,
}

/// The foreground color a level is rendered with on a color-capable console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsoleColor {
    /// Bright red.
    Red,
    /// Bright yellow.
    Yellow,
    /// Bright green.
    Green,
    /// Bright cyan.
    Cyan,
    /// The console's neutral default color.
    Default,
}

impl LogLevel {
    /// All levels, in raw-value order.
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::NoPrefix,
        LogLevel::Unknown,
    ];

    /// Decodes a raw level value for presentation.
    ///
    /// Only the exact values of the known levels decode to them. A value
    /// carrying flag bits above [`LEVEL_MASK`] decodes to [`LogLevel::Unknown`];
    /// filtering masks those bits separately in [`is_visible`].
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => LogLevel::Error,
            1 => LogLevel::Warning,
            2 => LogLevel::Info,
            3 => LogLevel::Debug,
            4 => LogLevel::NoPrefix,
            _ => LogLevel::Unknown,
        }
    }

    /// Returns the raw value of this level.
    #[inline]
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    /// The prefix printed in front of every message of this level.
    pub fn prefix(self) -> &'static str {
        match self {
            LogLevel::Error => "[error]: ",
            LogLevel::Warning => "[warning]: ",
            LogLevel::Info => "[info]: ",
            LogLevel::Debug => "[debug]: ",
            LogLevel::NoPrefix => "",
            LogLevel::Unknown => "[unknown]: ",
        }
    }

    /// The color this level is rendered with.
    pub fn color(self) -> ConsoleColor {
        match self {
            LogLevel::Error => ConsoleColor::Red,
            LogLevel::Warning => ConsoleColor::Yellow,
            LogLevel::Info => ConsoleColor::Green,
            LogLevel::Debug | LogLevel::NoPrefix => ConsoleColor::Cyan,
            LogLevel::Unknown => ConsoleColor::Default,
        }
    }

    /// Whether a terminal should visually emphasize this level.
    ///
    /// Informational output and unprefixed text are printed plain.
    pub fn is_emphasized(self) -> bool {
        !matches!(self, LogLevel::Info | LogLevel::NoPrefix)
    }
}

impl From<LogLevel> for i32 {
    fn from(level: LogLevel) -> Self {
        level.as_raw()
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warning,
            log::Level::Info => LogLevel::Info,
            log::Level::Debug | log::Level::Trace => LogLevel::Debug,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::NoPrefix => "noprefix",
            LogLevel::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Error returned when a level name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized log level '{0}'")]
pub struct ParseLevelError(
    /// The rejected input.
    pub String,
);

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "noprefix" => Ok(LogLevel::NoPrefix),
            other => Err(ParseLevelError(other.to_string())),
        }
    }
}

/// Anything that can provide the verbosity threshold for a log call.
///
/// The threshold is read at every call, so changing the underlying
/// configuration takes effect on the next message.
pub trait VerbositySource {
    /// Returns the current threshold. Messages with a masked level above it are dropped.
    fn log_level(&self) -> i32;
}

impl VerbositySource for i32 {
    fn log_level(&self) -> i32 {
        *self
    }
}

impl VerbositySource for LogLevel {
    fn log_level(&self) -> i32 {
        self.as_raw()
    }
}

impl<T: VerbositySource + ?Sized> VerbositySource for &T {
    fn log_level(&self) -> i32 {
        (**self).log_level()
    }
}

/// Decides whether a message with the given raw level passes the threshold.
///
/// An absent context means "show everything".
#[inline]
pub fn is_visible(raw_level: i32, context: Option<&dyn VerbositySource>) -> bool {
    match context {
        None => true,
        Some(source) => (raw_level & LEVEL_MASK) <= source.log_level(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_level_has_one_prefix_and_one_color() {
        let table = [
            (LogLevel::Error, "[error]: ", ConsoleColor::Red),
            (LogLevel::Warning, "[warning]: ", ConsoleColor::Yellow),
            (LogLevel::Info, "[info]: ", ConsoleColor::Green),
            (LogLevel::Debug, "[debug]: ", ConsoleColor::Cyan),
            (LogLevel::NoPrefix, "", ConsoleColor::Cyan),
            (LogLevel::Unknown, "[unknown]: ", ConsoleColor::Default),
        ];
        for (level, prefix, color) in table {
            assert_eq!(level.prefix(), prefix, "prefix of {level}");
            assert_eq!(level.color(), color, "color of {level}");
        }
    }

    #[test]
    fn out_of_range_values_decode_to_unknown() {
        for raw in 5..=LEVEL_MASK {
            let level = LogLevel::from_raw(raw);
            assert_eq!(level, LogLevel::Unknown);
            assert_eq!(level.prefix(), "[unknown]: ");
        }
    }

    #[test]
    fn flagged_values_decode_to_unknown() {
        assert_eq!(LogLevel::from_raw(0x10 | 1), LogLevel::Unknown);
        assert_eq!(LogLevel::from_raw(0x100 | 3), LogLevel::Unknown);
        assert_eq!(LogLevel::from_raw(-1), LogLevel::Unknown);
        assert_eq!(LogLevel::from_raw(9).color(), ConsoleColor::Default);
        // Filtering still sees the masked level.
        assert!(is_visible(0x10 | 1, Some(&LogLevel::Warning)));
    }

    #[test]
    fn known_values_decode_exactly() {
        for level in LogLevel::ALL {
            assert_eq!(LogLevel::from_raw(level.as_raw()), level);
        }
    }

    #[test]
    fn visibility_follows_threshold_for_every_pair() {
        for threshold in -1..=LEVEL_MASK {
            for level in LogLevel::ALL {
                let expected = level.as_raw() <= threshold;
                assert_eq!(
                    is_visible(level.as_raw(), Some(&threshold)),
                    expected,
                    "level {level} threshold {threshold}"
                );
                // Flags must not change the outcome.
                assert_eq!(
                    is_visible(level.as_raw() | 0x40, Some(&threshold)),
                    expected
                );
            }
        }
    }

    #[test]
    fn absent_context_shows_everything() {
        for level in LogLevel::ALL {
            assert!(is_visible(level.as_raw(), None));
        }
        assert!(is_visible(0x7F, None));
    }

    #[test]
    fn only_info_and_noprefix_are_plain() {
        let plain: Vec<_> = LogLevel::ALL
            .into_iter()
            .filter(|l| !l.is_emphasized())
            .collect();
        assert_eq!(plain, vec![LogLevel::Info, LogLevel::NoPrefix]);
    }

    #[test]
    fn names_round_trip_through_from_str() {
        assert_eq!("WARN".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert_eq!(" debug ".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn facade_levels_map_onto_console_levels() {
        assert_eq!(LogLevel::from(log::Level::Warn), LogLevel::Warning);
        assert_eq!(LogLevel::from(log::Level::Trace), LogLevel::Debug);
    }
}

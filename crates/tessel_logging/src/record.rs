use core::fmt;

use crate::TimeStamp;

/// Severity of a log message, ordered from most to least severe.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum LogLevel {
    /// Unrecoverable, the program is about to go down
    Severe,
    /// An operation failed, e.g. an allocation could not be satisfied
    Error,
    /// Something suspicious that did not fail, e.g. a fallback path was taken
    Warning,
    /// General info
    Info,
    /// More detailed info
    Verbose,
    /// Everything, including internals like reallocations
    Debug,
}

impl LogLevel {
    /// Fixed width tag written in front of every message of this level.
    pub const fn tag(self) -> &'static str {
        match self {
            LogLevel::Severe  => "SEVERE ",
            LogLevel::Error   => "ERROR  ",
            LogLevel::Warning => "WARNING",
            LogLevel::Info    => "INFO   ",
            LogLevel::Verbose => "VERBOSE",
            LogLevel::Debug   => "DEBUG  ",
        }
    }

    const fn ansi_style(self) -> &'static str {
        match self {
            LogLevel::Severe  => "\x1B[1m\x1B[41m\x1B[30m",
            LogLevel::Error   => "\x1B[91m",
            LogLevel::Warning => "\x1B[93m",
            LogLevel::Info    => "\x1B[37m",
            LogLevel::Verbose => "\x1B[90m",
            LogLevel::Debug   => "\x1B[94m",
        }
    }

    /// Does a message of this level carry the location it was logged from.
    pub const fn shows_location(self) -> bool {
        matches!(self, LogLevel::Severe | LogLevel::Error | LogLevel::Debug)
    }

    pub(crate) const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => LogLevel::Severe,
            1 => LogLevel::Error,
            2 => LogLevel::Warning,
            3 => LogLevel::Info,
            4 => LogLevel::Verbose,
            _ => LogLevel::Debug,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]\x1B[0m", self.ansi_style(), self.tag())
    }
}

/// Subsystem a message belongs to, optionally narrowed down by a sub-category, e.g. `Alloc(Linear)`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LogCategory {
    name: &'static str,
    sub:  Option<&'static str>,
}

impl LogCategory {
    pub const fn new(name: &'static str) -> Self {
        Self { name, sub: None }
    }

    pub const fn new_with_sub(name: &'static str, sub: &'static str) -> Self {
        Self { name, sub: Some(sub) }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn sub_category(&self) -> Option<&'static str> {
        self.sub
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)?;
        if let Some(sub) = self.sub {
            write!(f, "({sub})")?;
        }
        Ok(())
    }
}

/// Where and when a message was logged.
#[derive(Clone, Copy, Debug)]
pub struct LogLocation {
    file: &'static str,
    line: u32,
    func: &'static str,
    time: TimeStamp,
}

impl LogLocation {
    pub const fn new(file: &'static str, line: u32, func: &'static str, time: TimeStamp) -> Self {
        Self { file, line, func, time }
    }

    pub const fn file(&self) -> &'static str { self.file }
    pub const fn line(&self) -> u32 { self.line }
    /// Name of the function the message was logged from, empty when it was not provided.
    pub const fn function(&self) -> &'static str { self.func }
    pub const fn timestamp(&self) -> TimeStamp { self.time }
}

/// Writes the message header: timestamp, level, category, and the location for the levels that show it.
pub(crate) fn write_header(out: &mut impl fmt::Write, category: LogCategory, level: LogLevel, loc: &LogLocation) -> fmt::Result {
    write!(out, "\x1B[38m{}\x1B[0m {level} [{category}]", loc.time)?;
    if level.shows_location() {
        write!(out, " ({}:{}: {})", loc.file, loc.line, loc.func)?;
    }
    out.write_str(": ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_display() {
        assert_eq!(LogCategory::new("Alloc").to_string(), "Alloc");
        assert_eq!(LogCategory::new_with_sub("Alloc", "Linear").to_string(), "Alloc(Linear)");
    }

    #[test]
    fn level_order_and_raw_round_trip() {
        assert!(LogLevel::Severe < LogLevel::Debug);
        for level in [LogLevel::Severe, LogLevel::Error, LogLevel::Warning, LogLevel::Info, LogLevel::Verbose, LogLevel::Debug] {
            assert_eq!(LogLevel::from_u8(level as u8), level);
            assert_eq!(level.tag().len(), 7);
        }
    }

    #[test]
    fn header_shows_location_for_errors_only() {
        let loc = LogLocation::new("array.rs", 12, "grow", TimeStamp::from_unix_millis(0));
        let mut out = String::new();
        write_header(&mut out, LogCategory::new("Collections"), LogLevel::Error, &loc).unwrap();
        assert!(out.contains("[Collections]"));
        assert!(out.contains("(array.rs:12: grow)"));

        let mut out = String::new();
        write_header(&mut out, LogCategory::new("Collections"), LogLevel::Info, &loc).unwrap();
        assert!(!out.contains("array.rs"));
    }
}

use core::{
    fmt::{self, Write as _},
    sync::atomic::{AtomicU8, Ordering},
};
use std::io;

use parking_lot::{const_mutex, Mutex};
use tessel_base::KiB;

use crate::record::{write_header, LogCategory, LogLevel, LogLocation};

/// Boxed output that log messages get written to
pub type LogWriter = Box<dyn io::Write + Send>;

/// Pending output and the places it ends up in.
struct Sinks {
    writers:        Vec<Option<LogWriter>>,
    pending:        String,
    always_flush:   bool,
    log_to_console: bool,
}

impl Sinks {
    const fn new(always_flush: bool) -> Self {
        Self { writers: Vec::new(), pending: String::new(), always_flush, log_to_console: true }
    }

    fn append(&mut self, category: LogCategory, level: LogLevel, loc: &LogLocation, message: fmt::Arguments) {
        // Formatting into a `String` only fails if a `Display` impl reports an error, the partial line is kept then.
        _ = write_header(&mut self.pending, category, level, loc);
        _ = self.pending.write_fmt(message);
        self.pending.push('\n');

        if self.always_flush || self.pending.len() > Logger::PENDING_LIMIT {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        if self.log_to_console {
            print!("{}", self.pending);
        }
        for writer in self.writers.iter_mut().flatten() {
            _ = writer.write_all(self.pending.as_bytes());
            _ = writer.flush();
        }
        self.pending.clear();
    }
}

/// Logger buffering messages and writing them to the console and up to [`Logger::MAX_WRITERS`] writers.
///
/// Messages above the maximum level are dropped before they are formatted.
pub struct Logger {
    sinks:     Mutex<Sinks>,
    max_level: AtomicU8,
}

impl Logger {
    /// Maximum number of writers that can be attached at the same time.
    pub const MAX_WRITERS: usize = 8;
    const PENDING_LIMIT: usize = KiB(4);

    /// Create a buffered logger that lets every level through.
    pub const fn new() -> Self {
        Self {
            sinks: const_mutex(Sinks::new(false)),
            max_level: AtomicU8::new(LogLevel::Debug as u8),
        }
    }

    /// Create a logger that writes out every message immediately, only letting levels up to `max_level` through.
    pub const fn new_unbuffered(max_level: LogLevel) -> Self {
        Self {
            sinks: const_mutex(Sinks::new(true)),
            max_level: AtomicU8::new(max_level as u8),
        }
    }

    pub fn max_level(&self) -> LogLevel {
        LogLevel::from_u8(self.max_level.load(Ordering::Relaxed))
    }

    /// Set the least severe level that still gets logged.
    pub fn set_max_level(&self, level: LogLevel) {
        self.max_level.store(level as u8, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level as u8 <= self.max_level.load(Ordering::Relaxed)
    }

    pub fn set_always_flush(&self, always_flush: bool) {
        let mut sinks = self.sinks.lock();
        sinks.always_flush = always_flush;
        if always_flush {
            sinks.flush();
        }
    }

    /// Enable or disable echoing to stdout, pending messages are written out first under the old setting.
    pub fn set_log_to_console(&self, log_to_console: bool) {
        let mut sinks = self.sinks.lock();
        sinks.flush();
        sinks.log_to_console = log_to_console;
    }

    /// Attach a writer, returning the slot it was put in, or the writer itself when all slots are taken.
    pub fn add_writer(&self, writer: LogWriter) -> Result<usize, LogWriter> {
        let mut sinks = self.sinks.lock();
        if let Some(idx) = sinks.writers.iter().position(Option::is_none) {
            sinks.writers[idx] = Some(writer);
            Ok(idx)
        } else if sinks.writers.len() < Self::MAX_WRITERS {
            sinks.writers.push(Some(writer));
            Ok(sinks.writers.len() - 1)
        } else {
            Err(writer)
        }
    }

    /// Detach the writer in slot `index`, pending messages are written to it first.
    pub fn remove_writer(&self, index: usize) -> Option<LogWriter> {
        let mut sinks = self.sinks.lock();
        sinks.flush();
        sinks.writers.get_mut(index).and_then(Option::take)
    }

    pub fn log(&self, category: LogCategory, level: LogLevel, loc: LogLocation, text: &str) {
        self.log_fmt(category, level, loc, format_args!("{text}"));
    }

    pub fn log_fmt(&self, category: LogCategory, level: LogLevel, loc: LogLocation, message: fmt::Arguments) {
        if self.is_enabled(level) {
            self.sinks.lock().append(category, level, &loc, message);
        }
    }

    pub fn flush(&self) {
        self.sinks.lock().flush();
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.sinks.get_mut().flush();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{log_location, TimeStamp};
    use super::*;

    const CAT: LogCategory = LogCategory::new("Test");

    /// Writer sharing its buffer, so the test can inspect what was written
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    fn quiet_logger() -> (Logger, SharedBuf) {
        let logger = Logger::new();
        logger.set_log_to_console(false);
        let buf = SharedBuf::default();
        assert_eq!(logger.add_writer(Box::new(buf.clone())).ok(), Some(0));
        (logger, buf)
    }

    #[test]
    fn messages_wait_for_flush() {
        let (logger, buf) = quiet_logger();
        logger.log(CAT, LogLevel::Info, log_location!(), "hello");
        assert!(buf.text().is_empty());

        logger.flush();
        let text = buf.text();
        assert!(text.contains("[Test]"));
        assert!(text.ends_with("hello\n"));
    }

    #[test]
    fn max_level_filters() {
        let (logger, buf) = quiet_logger();
        logger.set_always_flush(true);
        logger.set_max_level(LogLevel::Warning);
        assert_eq!(logger.max_level(), LogLevel::Warning);

        let value = 42;
        logger.log_fmt(CAT, LogLevel::Debug, log_location!(), format_args!("hidden {value}"));
        assert!(buf.text().is_empty());

        logger.log_fmt(CAT, LogLevel::Error, log_location!(max_level_filters), format_args!("shown {value}"));
        let text = buf.text();
        assert!(text.contains("shown 42"));
        assert!(text.contains("max_level_filters"));
    }

    #[test]
    fn pending_limit_triggers_flush() {
        let (logger, buf) = quiet_logger();
        let loc = LogLocation::new("", 0, "", TimeStamp::from_unix_millis(0));
        let line = "x".repeat(256);
        for _ in 0..32 {
            logger.log(CAT, LogLevel::Info, loc, &line);
        }
        assert!(!buf.text().is_empty());
    }

    #[test]
    fn writer_slots() {
        let logger = Logger::new();
        for i in 0..Logger::MAX_WRITERS {
            assert_eq!(logger.add_writer(Box::new(io::sink())).ok(), Some(i));
        }
        assert!(logger.add_writer(Box::new(io::sink())).is_err());
        assert!(logger.remove_writer(3).is_some());
        assert!(logger.remove_writer(3).is_none());
        assert!(logger.remove_writer(100).is_none());
        assert_eq!(logger.add_writer(Box::new(io::sink())).ok(), Some(3));
    }
}

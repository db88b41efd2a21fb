//! Category and level based logging, used by the allocators and containers to report failures and reallocations.
//!
//! Messages go to the global logger installed with [`set_logger`]. Until one is installed, an unbuffered fallback logger
//! writes warnings and worse to the console.

use once_cell::sync::OnceCell;

mod logger;
mod record;
pub mod time;

pub use logger::{Logger, LogWriter};
pub use record::{LogCategory, LogLevel, LogLocation};
pub use crate::time::{TimeStamp, get_timestamp};

static LOGGER: OnceCell<&'static Logger> = OnceCell::new();
static FALLBACK_LOGGER: Logger = Logger::new_unbuffered(LogLevel::Warning);

/// Install the global logger.
///
/// This can only happen once, later calls hand the provided logger back.
pub fn set_logger(logger: &'static Logger) -> Result<(), &'static Logger> {
    LOGGER.set(logger).map_err(|_| logger)
}

/// Get the global logger, or the fallback logger if none was installed yet.
pub fn get_logger() -> &'static Logger {
    LOGGER.get().copied().unwrap_or(&FALLBACK_LOGGER)
}

/// Get the path of the function `f` refers to, used by the logging macros to record where a message came from.
pub fn get_func_name<F>(_f: F) -> &'static str {
    core::any::type_name::<F>()
}

/// Build a [`LogLocation`] for the current line, optionally with the function the message comes from.
#[macro_export]
macro_rules! log_location {
    () => {
        $crate::LogLocation::new(file!(), line!(), "", $crate::get_timestamp())
    };
    ($func:expr) => {
        $crate::LogLocation::new(file!(), line!(), $crate::get_func_name($func), $crate::get_timestamp())
    };
}

/// Log a message at a given level, the level is only known at runtime.
///
/// The location is only captured when the level is enabled.
#[macro_export]
macro_rules! log {
    ($category:expr, $level:expr, $func:expr, $($arg:tt)+) => {{
        let level = $level;
        let logger = $crate::get_logger();
        if logger.is_enabled(level) {
            logger.log_fmt($category, level, $crate::log_location!($func), format_args!($($arg)+));
        }
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_at {
    ($level:ident, $category:expr, $loc:expr, $($arg:tt)+) => {{
        let logger = $crate::get_logger();
        if logger.is_enabled($crate::LogLevel::$level) {
            logger.log_fmt($category, $crate::LogLevel::$level, $loc, format_args!($($arg)+));
        }
    }};
}

/// Log a severe message, including the function it was logged from.
#[macro_export]
macro_rules! log_severe {
    ($category:expr, $func:expr, $($arg:tt)+) => {
        $crate::__log_at!(Severe, $category, $crate::log_location!($func), $($arg)+)
    };
}

/// Log an error, including the function it was logged from.
#[macro_export]
macro_rules! log_error {
    ($category:expr, $func:expr, $($arg:tt)+) => {
        $crate::__log_at!(Error, $category, $crate::log_location!($func), $($arg)+)
    };
}

#[macro_export]
macro_rules! log_warning {
    ($category:expr, $($arg:tt)+) => {
        $crate::__log_at!(Warning, $category, $crate::log_location!(), $($arg)+)
    };
}

#[macro_export]
macro_rules! log_info {
    ($category:expr, $($arg:tt)+) => {
        $crate::__log_at!(Info, $category, $crate::log_location!(), $($arg)+)
    };
}

#[macro_export]
macro_rules! log_verbose {
    ($category:expr, $($arg:tt)+) => {
        $crate::__log_at!(Verbose, $category, $crate::log_location!(), $($arg)+)
    };
}

/// Log a debug message, including the function it was logged from.
#[macro_export]
macro_rules! log_debug {
    ($category:expr, $func:expr, $($arg:tt)+) => {
        $crate::__log_at!(Debug, $category, $crate::log_location!($func), $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_logger_filters_below_warning() {
        assert!(FALLBACK_LOGGER.is_enabled(LogLevel::Error));
        assert!(FALLBACK_LOGGER.is_enabled(LogLevel::Warning));
        assert!(!FALLBACK_LOGGER.is_enabled(LogLevel::Info));
    }

    #[test]
    fn func_name_is_the_full_path() {
        fn grow() {}
        assert!(get_func_name(grow).ends_with("grow"));
    }

    #[test]
    fn macros_expand() {
        const CAT: LogCategory = LogCategory::new("Test");
        // Everything below warning is filtered by the fallback logger, this only checks the macros expand
        log_debug!(CAT, fallback_logger_filters_below_warning, "debug {}", 1);
        log_verbose!(CAT, "verbose {}", 2);
        log_info!(CAT, "info");
        log!(CAT, LogLevel::Debug, macros_expand, "dynamic {}", 3);
    }
}

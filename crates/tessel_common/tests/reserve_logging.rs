//! Runs in its own process, as it installs the global logger.

use std::{io, panic, sync::Arc};

use parking_lot::Mutex;
use tessel_common::{alloc::primitives::LinearAllocator, collections::DynArr};
use tessel_logging::{set_logger, LogLevel, Logger};

static LOGGER: Logger = Logger::new();

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
    fn take_text(&self) -> String {
        let bytes = std::mem::take(&mut *self.0.lock());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

#[test]
fn only_unrecoverable_failures_are_errors() {
    LOGGER.set_log_to_console(false);
    LOGGER.set_max_level(LogLevel::Warning);
    let buf = SharedBuf::default();
    assert!(LOGGER.add_writer(Box::new(buf.clone())).is_ok());
    assert!(set_logger(&LOGGER).is_ok());

    let arena = LinearAllocator::new(64, 8).unwrap();
    let mut arr = DynArr::<u32, _>::new_in(&arena);

    // A failure handed back to the caller is not worth more than a debug message
    assert!(arr.try_reserve(1000).is_err());
    assert!(arr.try_reserve_exact(1000).is_err());
    assert!(arr.try_push(1).is_ok());
    LOGGER.flush();
    assert_eq!(buf.take_text(), "");

    let result = panic::catch_unwind(panic::AssertUnwindSafe(|| arr.reserve(1000)));
    assert!(result.is_err());
    LOGGER.flush();
    let text = buf.take_text();
    assert!(text.contains("ERROR"), "{text}");
    assert!(text.contains("[Collections]"), "{text}");
    assert!(text.contains("requested capacity of 1001 elements"), "{text}");
}

mod alloc;

pub mod primitives;
pub mod composable;

pub use alloc::*;
pub use core::alloc::Layout;

use tessel_logging::LogCategory;

pub(crate) const LOG_CAT: LogCategory = LogCategory::new("Alloc");

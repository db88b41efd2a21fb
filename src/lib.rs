//! Allocator-aware containers.
//!
//! Re-exports the workspace crates under shorter names, see [`common`] for the containers and allocators.

pub use tessel_base as base;
pub use tessel_logging as logging;
pub use tessel_common as common;

pub use tessel_common::{alloc, collections, mem, dynarr};

pub mod prelude {
    pub use tessel_common::prelude::*;
    pub use tessel_logging::{LogCategory, LogLevel, Logger, set_logger, get_logger};
}

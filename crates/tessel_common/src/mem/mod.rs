//! Process wide memory statistics for allocations going through the [`Mallocator`](crate::alloc::primitives::Mallocator).

mod stats;

pub use stats::*;

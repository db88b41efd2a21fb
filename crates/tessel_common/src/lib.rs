//! Common allocation and container building blocks.
//!
//! Everything allocating memory in here goes through an [`alloc::Allocator`], which also owns the
//! construction and destruction of the elements placed in that memory.

pub mod alloc;
pub mod mem;
pub mod collections;

pub use tessel_base::*;

pub mod prelude;

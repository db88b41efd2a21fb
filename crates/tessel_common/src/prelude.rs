pub use core::prelude::*;

pub use tessel_base::{KB, MB, KiB, MiB};

pub use crate::alloc::{Allocator, Layout};
pub use crate::alloc::primitives::{Mallocator, LinearAllocator};
pub use crate::alloc::composable::TrackingAllocator;

pub use crate::collections::{DynArr, TryReserveError, IndexOutOfRange};
pub use crate::dynarr;

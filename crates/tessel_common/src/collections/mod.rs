mod imp;

mod dynarr;

use core::{alloc::Layout, fmt};

use tessel_logging::LogCategory;

pub use dynarr::*;

pub(crate) const LOG_CAT: LogCategory = LogCategory::new("Collections");

//--------------------------------------------------------------

macro_rules! impl_slice_partial_eq_generic {
    ([$($vars:tt)*] $lhs:ty, $rhs:ty $(where $ty:ty: $bound:ident)?) => {
        impl<T, U, $($vars)*> PartialEq<$rhs> for $lhs  where
            T : PartialEq<U>,
            $($ty: $bound)?
        {
            #[inline]
            fn eq(&self, other: &$rhs) -> bool { self[..] == other[..] }
            #[inline]
            fn ne(&self, other: &$rhs) -> bool { self[..] != other[..] }
        }
    };
}
use impl_slice_partial_eq_generic;

//--------------------------------------------------------------

/// Error returned when a container could not reserve the memory it needed.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TryReserveError {
    /// The requested number of elements is more than the allocator can ever provide for a single allocation.
    AllocationLimitExceeded {
        requested: usize,
        max:       usize,
    },
    /// The allocator could not provide memory for the given layout.
    OutOfMemory(Layout),
}

impl fmt::Display for TryReserveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryReserveError::AllocationLimitExceeded { requested, max } => write!(f, "requested capacity of {requested} elements exceeds the allocation limit of {max} elements"),
            TryReserveError::OutOfMemory(layout) => write!(f, "out of memory while allocating {} bytes (alignment {})", layout.size(), layout.align()),
        }
    }
}

impl std::error::Error for TryReserveError {}

/// Error returned by checked element access.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct IndexOutOfRange {
    pub index: usize,
    pub len:   usize,
}

impl fmt::Display for IndexOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "index {} is out of range for a length of {}", self.index, self.len)
    }
}

impl std::error::Error for IndexOutOfRange {}

//--------------------------------------------------------------

/// A trait used to define a strategy to reserve additional memory for containers.
pub trait ReserveStrategy {
    /// Calculate the new capacity for a container.
    ///
    /// `cur_capacity` represents the current capacity of the container.
    ///
    /// `min_capacity` represents the minimum required capacity to be able to resize.
    ///
    /// Returns `Err(())` if the capacity were to overflow, the container then falls back to the largest capacity its allocator allows.
    fn calculate(cur_capacity: usize, min_capacity: usize) -> Result<usize, ()>;
}

/// A reserve strategy that will try to either return double the current capacity, or the minimum required capacity, whichever is bigger.
pub struct DoubleOrMinReserveStrategy;

impl ReserveStrategy for DoubleOrMinReserveStrategy {
    fn calculate(cur_capacity: usize, min_capacity: usize) -> Result<usize, ()> {
        let double_cap = cur_capacity.checked_mul(2).ok_or(())?;
        let new_cap = if double_cap > min_capacity { double_cap } else { min_capacity };
        if new_cap <= isize::MAX as usize {
            Ok(new_cap)
        } else {
            Err(())
        }
    }
}

/// A reserve strategy that will return a power of 2 capacity
pub struct Pow2ReserveStrategy;

impl ReserveStrategy for Pow2ReserveStrategy {
    fn calculate(_cur_capacity: usize, min_capacity: usize) -> Result<usize, ()> {
        min_capacity.checked_next_power_of_two().ok_or(())
    }
}

/// A reserve stategy that grows the capacity by 1.5
pub struct ThreeHalvesReserveStrategy;

impl ReserveStrategy for ThreeHalvesReserveStrategy {
    fn calculate(cur_capacity: usize, min_capacity: usize) -> Result<usize, ()> {
        let mut cap = cur_capacity.max(1);
        while cap < min_capacity {
            cap = (cap << 1) - (cap >> 1);
            if cap >= isize::MAX as usize {
                return Err(());
            }
        }
        Ok(cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_or_min() {
        assert_eq!(DoubleOrMinReserveStrategy::calculate(0, 1), Ok(1));
        assert_eq!(DoubleOrMinReserveStrategy::calculate(4, 5), Ok(8));
        assert_eq!(DoubleOrMinReserveStrategy::calculate(4, 20), Ok(20));
        assert_eq!(DoubleOrMinReserveStrategy::calculate(usize::MAX / 2 + 1, usize::MAX / 2 + 2), Err(()));
    }

    #[test]
    fn pow2() {
        assert_eq!(Pow2ReserveStrategy::calculate(0, 1), Ok(1));
        assert_eq!(Pow2ReserveStrategy::calculate(8, 9), Ok(16));
        assert_eq!(Pow2ReserveStrategy::calculate(0, usize::MAX), Err(()));
    }

    #[test]
    fn three_halves_grows_from_empty() {
        assert_eq!(ThreeHalvesReserveStrategy::calculate(0, 1), Ok(1));
        assert_eq!(ThreeHalvesReserveStrategy::calculate(0, 2), Ok(2));
        assert_eq!(ThreeHalvesReserveStrategy::calculate(2, 3), Ok(3));
        assert_eq!(ThreeHalvesReserveStrategy::calculate(4, 5), Ok(6));
    }

    #[test]
    fn errors_display() {
        let err = TryReserveError::AllocationLimitExceeded { requested: 10, max: 4 };
        assert_eq!(err.to_string(), "requested capacity of 10 elements exceeds the allocation limit of 4 elements");
        let err = IndexOutOfRange { index: 3, len: 3 };
        assert_eq!(err.to_string(), "index 3 is out of range for a length of 3");
    }
}

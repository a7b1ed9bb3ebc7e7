mod imp;

mod dynlist;

use core::{alloc::Layout, fmt};

pub use dynlist::*;

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

/// Smallest capacity a growing container will allocate.
pub const MIN_NON_ZERO_CAP: usize = 4;

static_assertions::const_assert!(MIN_NON_ZERO_CAP.is_power_of_two());

/// Errors that can occur when a container tries to grow its buffer.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TryReserveError {
    /// The computed capacity exceeds `isize::MAX` bytes, or overflowed a `usize`.
    CapacityOverflow,
    /// The allocator could not provide memory for the given layout.
    AllocError(Layout),
}

impl fmt::Display for TryReserveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryReserveError::CapacityOverflow => f.write_str("capacity overflow"),
            TryReserveError::AllocError(layout) => write!(f, "failed to allocate {} bytes (align {})", layout.size(), layout.align()),
        }
    }
}

impl std::error::Error for TryReserveError {}

/// Errors returned by the checked, index based operations.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ListError {
    /// `index` does not refer to a live element of a container of length `len`.
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListError::IndexOutOfRange { index, len } => write!(f, "index (is {index}) should be < len (is {len})"),
        }
    }
}

impl std::error::Error for ListError {}

//--------------------------------------------------------------

/// A trait used to define a strategy to reserve additional memory for containers.
pub trait ReserveStrategy {
    /// Calculate the new capacity for a container.
    ///
    /// `cur_capacity` represents the current capacity of the container.
    ///
    /// `min_capacity` represents the minimum required capacity to be able to resize.
    ///
    /// Returns `Err(TryReserveError::CapacityOverflow)` if the capacity were to overflow
    fn calculate(cur_capacity: usize, min_capacity: usize) -> Result<usize, TryReserveError>;
}

/// A reserve strategy that will try to either return double the current capacity (at least [`MIN_NON_ZERO_CAP`]), or the minimum required capacity, whichever is bigger.
pub struct DoubleOrMinReserveStrategy;

impl ReserveStrategy for DoubleOrMinReserveStrategy {
    fn calculate(cur_capacity: usize, min_capacity: usize) -> Result<usize, TryReserveError> {
        let double_cap = cur_capacity.checked_mul(2).ok_or(TryReserveError::CapacityOverflow)?;
        let double_cap = double_cap.max(MIN_NON_ZERO_CAP);
        let new_cap = if double_cap > min_capacity { double_cap } else { min_capacity };
        if new_cap <= isize::MAX as usize {
            Ok(new_cap)
        } else {
            Err(TryReserveError::CapacityOverflow)
        }
    }
}

/// A reserve strategy that will return the smallest power of 2 that fits the minimum capacity, but never less than [`MIN_NON_ZERO_CAP`].
///
/// The current capacity is ignored, the result only depends on the total required size.
pub struct Pow2ReserveStrategy;

impl ReserveStrategy for Pow2ReserveStrategy {
    fn calculate(_cur_capacity: usize, min_capacity: usize) -> Result<usize, TryReserveError> {
        match min_capacity.checked_next_power_of_two() {
            Some(new_cap) if new_cap <= isize::MAX as usize => Ok(new_cap.max(MIN_NON_ZERO_CAP)),
            _ => Err(TryReserveError::CapacityOverflow),
        }
    }
}

/// A reserve stategy that grows the capacity by 1.5
pub struct ThreeHalvesReserveStrategy;

impl ReserveStrategy for ThreeHalvesReserveStrategy {
    fn calculate(cur_capacity: usize, min_capacity: usize) -> Result<usize, TryReserveError> {
        let mut cap = cur_capacity.max(MIN_NON_ZERO_CAP);
        while cap < min_capacity {
            cap = (cap << 1) - (cap >> 1);
            if cap >= isize::MAX as usize {
                return Err(TryReserveError::CapacityOverflow);
            }
        }
        Ok(cap)
    }
}

//--------------------------------------------------------------

cfg_if::cfg_if! {
    if #[cfg(feature = "growth_logging")] {
        use dynlist_logging::{LogCategory, log_verbose, log_warning};

        pub(crate) const LOG_CAT : LogCategory = LogCategory::new_with_sub("Collections", "DynList");

        pub(crate) fn trace_realloc<T>(old_cap: usize, new_cap: usize) {
            log_verbose!(LOG_CAT, "reallocated buffer of `{}` from {old_cap} to {new_cap} slots", core::any::type_name::<T>());
        }

        pub(crate) fn trace_discarded(op: &'static str, err: &TryReserveError) {
            log_warning!(LOG_CAT, "`{op}` was dropped silently: {err}");
        }
    } else {
        #[inline(always)]
        pub(crate) fn trace_realloc<T>(_old_cap: usize, _new_cap: usize) {}

        #[inline(always)]
        pub(crate) fn trace_discarded(_op: &'static str, _err: &TryReserveError) {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_or_min() {
        assert_eq!(DoubleOrMinReserveStrategy::calculate(0, 1), Ok(4));
        assert_eq!(DoubleOrMinReserveStrategy::calculate(4, 5), Ok(8));
        assert_eq!(DoubleOrMinReserveStrategy::calculate(8, 9), Ok(16));
        // Doubling is not enough, grow to the exact need
        assert_eq!(DoubleOrMinReserveStrategy::calculate(4, 21), Ok(21));
        // A capacity hint that is not a power of 2 keeps doubling from there
        assert_eq!(DoubleOrMinReserveStrategy::calculate(5, 6), Ok(10));
        assert_eq!(DoubleOrMinReserveStrategy::calculate(usize::MAX / 2 + 1, usize::MAX), Err(TryReserveError::CapacityOverflow));
    }

    #[test]
    fn pow2() {
        assert_eq!(Pow2ReserveStrategy::calculate(0, 0), Ok(4));
        assert_eq!(Pow2ReserveStrategy::calculate(0, 3), Ok(4));
        assert_eq!(Pow2ReserveStrategy::calculate(0, 4), Ok(4));
        assert_eq!(Pow2ReserveStrategy::calculate(0, 10), Ok(16));
        assert_eq!(Pow2ReserveStrategy::calculate(64, 17), Ok(32));
        assert_eq!(Pow2ReserveStrategy::calculate(0, 1024), Ok(1024));
        assert_eq!(Pow2ReserveStrategy::calculate(0, usize::MAX), Err(TryReserveError::CapacityOverflow));
    }

    #[test]
    fn three_halves() {
        assert_eq!(ThreeHalvesReserveStrategy::calculate(0, 1), Ok(4));
        assert_eq!(ThreeHalvesReserveStrategy::calculate(4, 5), Ok(6));
        assert_eq!(ThreeHalvesReserveStrategy::calculate(6, 10), Ok(14));
    }

    #[test]
    fn error_display() {
        let err = ListError::IndexOutOfRange { index: 7, len: 3 };
        assert_eq!(err.to_string(), "index (is 7) should be < len (is 3)");
        assert_eq!(TryReserveError::CapacityOverflow.to_string(), "capacity overflow");
    }
}

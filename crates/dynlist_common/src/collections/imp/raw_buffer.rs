use std::{
    alloc::{self, Layout},
    marker::PhantomData,
    mem::size_of,
    ptr::NonNull,
};

use crate::collections::{trace_realloc, ReserveStrategy, TryReserveError};


/// Low level utility for more ergonomically allocating, reallocating, and deallocating
/// a buffer of memory without having to worry about all the corner cases involved.
/// In particular:
///
/// - Produces a dangling pointer on zero-sized types and on zero-length allocations.
/// - Avoids freeing the dangling pointer.
/// - Catches all overflows in capacity computations (promotes them to "capacity overflow" errors).
/// - Keeps track of the logical capacity for zero-sized types, so the growth policy stays observable.
///
/// This type does not in anyway inspect the memory it manages. When dropped it *will* free its memory, but it *won't* try to drop its contents.
/// It is up to the user of `RawBuffer` to handle the actual things *stored* inside of `RawBuffer`.
pub(crate) struct RawBuffer<T> {
    ptr:      NonNull<T>,
    cap:      usize,
    _phantom: PhantomData<T>,
}

// SAFETY: `RawBuffer` owns its allocation, sending it sends the `T`s it may contain
unsafe impl<T: Send> Send for RawBuffer<T> {}
// SAFETY: `RawBuffer` only hands out shared access to its contents through `&self`
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

impl<T> RawBuffer<T> {
    /// Creates a `RawBuffer` with a capacity of `0`, without allocating.
    #[must_use]
    pub const fn new() -> Self {
        Self { ptr: NonNull::dangling(), cap: 0, _phantom: PhantomData }
    }

    /// Creates a `RawBuffer` with exactly the capacity and alignment requirements for a `[T; capacity]`.
    ///
    /// # Panics
    ///
    /// Panics if the requested capacity exceeds `isize::MAX` bytes.
    ///
    /// # Aborts
    ///
    /// Aborts on OOM
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(buf) => buf,
            Err(err) => handle_error(err),
        }
    }

    /// Tries to create a `RawBuffer` with exactly the capacity and alignment requirements for a `[T; capacity]`.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let mut buf = Self::new();
        if capacity != 0 {
            buf.finalize_grow(capacity)?;
        }
        Ok(buf)
    }

    /// Get the capacity of the allocation.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.cap
    }

    /// Get a raw pointer to the start of the allocation.
    /// Note that this is a dangling pointer when either `capacity() == 0` or `T` is zero-sized.
    #[inline]
    pub const fn ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    fn current_memory(&self) -> Option<(NonNull<u8>, Layout)> {
        if size_of::<T>() == 0 || self.cap == 0 {
            None
        } else {
            // The layout was already validated when the memory was allocated
            Layout::array::<T>(self.cap).ok().map(|layout| (self.ptr.cast(), layout))
        }
    }

    /// Returns if the buffer needs to grow to fulfill the needed extra capacity.
    #[inline]
    pub fn needs_to_grow(&self, len: usize, additional: usize) -> bool {
        additional > self.cap.wrapping_sub(len)
    }

    /// Ensures that the buffer contains at least enough space to hold `len + additional` elements,
    /// using `R` to decide the new capacity.
    ///
    /// `len` may not exceed `self.capacity()`.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` bytes.
    ///
    /// # Aborts
    ///
    /// Aborts on OOM.
    pub fn reserve<R: ReserveStrategy>(&mut self, len: usize, additional: usize) {
        // Callers expect this function to be very cheap when there is already sufficient capacity,
        // so keep the resizing and error handling behind a cold call.
        #[cold]
        fn do_reserve_and_handle<T, R: ReserveStrategy>(slf: &mut RawBuffer<T>, len: usize, additional: usize) {
            if let Err(err) = slf.grow::<R>(len, additional) {
                handle_error(err);
            }
        }

        if self.needs_to_grow(len, additional) {
            do_reserve_and_handle::<T, R>(self, len, additional);
        }
    }

    /// The same as `reserve`, but returns on errors instead of panicking or aborting.
    pub fn try_reserve<R: ReserveStrategy>(&mut self, len: usize, additional: usize) -> Result<(), TryReserveError> {
        if self.needs_to_grow(len, additional) {
            self.grow::<R>(len, additional)?;
        }
        Ok(())
    }

    /// Grows the buffer to the capacity `R` computes for `len + additional` elements, whenever that is more than the current capacity.
    ///
    /// Unlike `reserve`, the strategy is consulted even when the elements already fit, so the buffer gets right-sized to the target.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` bytes.
    ///
    /// # Aborts
    ///
    /// Aborts on OOM.
    pub fn reserve_to_target<R: ReserveStrategy>(&mut self, len: usize, additional: usize) {
        if let Err(err) = self.grow::<R>(len, additional) {
            handle_error(err);
        }
    }

    /// The same as `reserve_to_target`, but returns on errors instead of panicking or aborting.
    pub fn try_reserve_to_target<R: ReserveStrategy>(&mut self, len: usize, additional: usize) -> Result<(), TryReserveError> {
        self.grow::<R>(len, additional)
    }

    /// Shrinks the buffer down to the specified capacity.
    /// If the given amount is 0, actually completely deallocates.
    ///
    /// # Panics
    ///
    /// Panics if the given amount is *larger* than the current capacity.
    ///
    /// # Aborts
    ///
    /// Aborts on OOM.
    pub fn shrink_to_fit(&mut self, cap: usize) {
        if let Err(err) = self.shrink(cap) {
            handle_error(err);
        }
    }

    //--------------------------------------------------------------

    fn grow<R: ReserveStrategy>(&mut self, len: usize, additional: usize) -> Result<(), TryReserveError> {
        debug_assert!(len <= self.cap);

        let required_cap = len.checked_add(additional).ok_or(TryReserveError::CapacityOverflow)?;
        let new_cap = R::calculate(self.cap, required_cap)?;

        // Strategies that right-size the buffer may come up with less than we already have
        if new_cap <= self.cap {
            return Ok(());
        }
        self.finalize_grow(new_cap)
    }

    fn shrink(&mut self, cap: usize) -> Result<(), TryReserveError> {
        assert!(cap <= self.cap, "Tried to shrink to a larger capacity");

        let old_cap = self.cap;
        if let Some((ptr, layout)) = self.current_memory() {
            if cap == 0 {
                // SAFETY: `ptr` was allocated with `layout` by the global allocator
                unsafe { alloc::dealloc(ptr.as_ptr(), layout) };
                self.ptr = NonNull::dangling();
            } else {
                let new_layout = Layout::array::<T>(cap).map_err(|_| TryReserveError::CapacityOverflow)?;
                // SAFETY:
                // - `ptr` was allocated with `layout` by the global allocator.
                // - `new_layout.size()` is non-zero and smaller than `layout.size()`, so it can't overflow `isize::MAX`.
                let new_ptr = unsafe { alloc::realloc(ptr.as_ptr(), layout, new_layout.size()) };
                self.ptr = NonNull::new(new_ptr.cast()).ok_or(TryReserveError::AllocError(new_layout))?;
            }
        }
        self.cap = cap;

        trace_realloc::<T>(old_cap, cap);
        Ok(())
    }

    fn finalize_grow(&mut self, new_cap: usize) -> Result<(), TryReserveError> {
        let new_layout = Layout::array::<T>(new_cap).map_err(|_| TryReserveError::CapacityOverflow)?;

        let old_cap = self.cap;
        if new_layout.size() != 0 {
            let new_ptr = match self.current_memory() {
                // SAFETY:
                // - `ptr` was allocated with `layout` by the global allocator.
                // - `Layout::array` made sure the new size does not exceed `isize::MAX`.
                Some((ptr, layout)) => unsafe { alloc::realloc(ptr.as_ptr(), layout, new_layout.size()) },
                // SAFETY: `new_layout` has a non-zero size
                None => unsafe { alloc::alloc(new_layout) },
            };
            self.ptr = NonNull::new(new_ptr.cast()).ok_or(TryReserveError::AllocError(new_layout))?;
        }
        self.cap = new_cap;

        trace_realloc::<T>(old_cap, new_cap);
        Ok(())
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        if let Some((ptr, layout)) = self.current_memory() {
            // SAFETY: `ptr` was allocated with `layout` by the global allocator
            unsafe { alloc::dealloc(ptr.as_ptr(), layout) };
        }
    }
}

/// Central function for reserve error handling
#[cold]
#[track_caller]
pub(crate) fn handle_error(e: TryReserveError) -> ! {
    match e {
        TryReserveError::CapacityOverflow => capacity_overflow(),
        TryReserveError::AllocError(layout) => alloc::handle_alloc_error(layout),
    }
}

#[track_caller]
fn capacity_overflow() -> ! {
    panic!("capacity overflow");
}

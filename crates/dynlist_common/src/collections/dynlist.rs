use core::{
    fmt,
    hash::Hash,
    marker::PhantomData,
    mem::ManuallyDrop,
    ops::{self, Index, IndexMut},
    ptr,
    slice::{self, SliceIndex},
};

use super::{
    imp::raw_buffer::{handle_error, RawBuffer},
    impl_slice_partial_eq_generic, trace_discarded,
    DoubleOrMinReserveStrategy, ListError, Pow2ReserveStrategy, ReserveStrategy, TryReserveError,
};


/// A contiguous growable list with an explicit capacity policy.
///
/// `DynList` has *O*(1) indexing and amortized *O*(1) append. Unlike [`Vec`], the way its capacity grows is part of its contract:
///
/// - Single element growth (`append`, `insert_at`, `reserve`) uses the incremental strategy `I`,
///   by default double the current capacity, at least [`MIN_NON_ZERO_CAP`](super::MIN_NON_ZERO_CAP), or the exact need if that is still not enough.
/// - Bulk growth (construction from a sequence, `append_range`) uses the bulk strategy `B`,
///   by default the smallest power of 2 that fits the total size, at least [`MIN_NON_ZERO_CAP`](super::MIN_NON_ZERO_CAP).
/// - [`DynList::with_capacity`] uses the given capacity verbatim.
///
/// The capacity only shrinks when calling [`DynList::trim_to_length`].
///
/// # Examples
///
/// ```
/// use dynlist_common::{collections::DynList, dynlist};
///
/// let mut list = DynList::<i32>::new();
/// list.append(1);
/// list.append(2);
///
/// assert_eq!(list.len(), 2);
/// assert_eq!(list.capacity(), 4);
/// assert_eq!(list[0], 1);
///
/// list.append_range(&[3, 4, 5]);
/// assert_eq!(list, [1, 2, 3, 4, 5]);
/// assert_eq!(list.capacity(), 8);
///
/// let mut other = dynlist![1, 2, 3, 4, 5];
/// assert_eq!(list, other);
///
/// // Same elements, but a different capacity
/// other.trim_to_length();
/// assert!(list.not_equals(&other));
/// ```
///
/// # Equality
///
/// Two lists are only equal when they have the same length, the same capacity and pairwise equal elements.
/// Comparing a list against a slice or array only looks at the elements.
pub struct DynList<T, I = DoubleOrMinReserveStrategy, B = Pow2ReserveStrategy> {
    buf:      RawBuffer<T>,
    len:      usize,
    _phantom: PhantomData<fn() -> (I, B)>,
}

static_assertions::assert_impl_all!(DynList<u32>: Send, Sync);
static_assertions::assert_not_impl_any!(DynList<std::rc::Rc<u32>>: Send, Sync);

impl<T, I: ReserveStrategy, B: ReserveStrategy> DynList<T, I, B> {
    /// Constructs a new, empty `DynList<T>`.
    ///
    /// The list will not allocate until elements are added to it, its capacity is 0.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { buf: RawBuffer::new(), len: 0, _phantom: PhantomData }
    }

    /// Constructs a new, empty `DynList<T>` with exactly the specified capacity.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` bytes.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { buf: RawBuffer::with_capacity(capacity), len: 0, _phantom: PhantomData }
    }

    /// Tries to construct a new, empty `DynList<T>` with exactly the specified capacity.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        Ok(Self { buf: RawBuffer::try_with_capacity(capacity)?, len: 0, _phantom: PhantomData })
    }

    /// Constructs an empty list, sized by the bulk strategy to hold `len` elements.
    fn with_bulk_capacity(len: usize) -> Self {
        match B::calculate(0, len) {
            Ok(capacity) => Self::with_capacity(capacity),
            Err(err) => handle_error(err),
        }
    }

    /// Returns the total number of elements the list can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Returns the number of elements in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Forces the length of the list to `new_len`.
    ///
    /// # Safety
    ///
    /// - `new_len` must be less than or equal to [`capacity()`](DynList::capacity).
    /// - The elements at `old_len..new_len` must be initialized.
    #[inline]
    pub unsafe fn set_len(&mut self, new_len: usize) {
        debug_assert!(new_len <= self.capacity());
        self.len = new_len;
    }

    /// Returns a raw pointer to the list's buffer, or a dangling pointer if the list didn't allocate.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.buf.ptr()
    }

    /// Returns a mutable raw pointer to the list's buffer, or a dangling pointer if the list didn't allocate.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.ptr()
    }

    /// Extracts a slice containing the live elements.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `[0, len)` is always initialized
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    /// Extracts a mutable slice containing the live elements.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: `[0, len)` is always initialized
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
    }

    /// Reserves capacity for at least `additional` more elements, using the incremental growth strategy.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` bytes.
    pub fn reserve(&mut self, additional: usize) {
        self.buf.reserve::<I>(self.len, additional);
    }

    /// Tries to reserve capacity for at least `additional` more elements, using the incremental growth strategy.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.buf.try_reserve::<I>(self.len, additional)
    }

    /// Returns a reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfRange`] if `index >= len`.
    pub fn get(&self, index: usize) -> Result<&T, ListError> {
        let len = self.len;
        self.as_slice().get(index).ok_or(ListError::IndexOutOfRange { index, len })
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfRange`] if `index >= len`.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, ListError> {
        let len = self.len;
        self.as_mut_slice().get_mut(index).ok_or(ListError::IndexOutOfRange { index, len })
    }

    /// Overwrites the element at `index`, dropping the old value.
    ///
    /// Setting the element at `index == len` appends `value` instead.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfRange`] if `index > len`, the list is left unchanged.
    pub fn set(&mut self, index: usize, value: T) -> Result<(), ListError> {
        if index == self.len {
            self.append(value);
        } else {
            *self.get_mut(index)? = value;
        }
        Ok(())
    }

    /// Appends an element to the back of the list.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` bytes.
    pub fn append(&mut self, value: T) {
        if self.len == self.capacity() {
            self.buf.reserve::<I>(self.len, 1);
        }
        // SAFETY: there is at least one free slot at `len`
        unsafe { self.as_mut_ptr().add(self.len).write(value) };
        self.len += 1;
    }

    /// Appends an element to the back of the list, returning an error instead of panicking when the list can't grow.
    ///
    /// On error, `value` is dropped and the list is left unchanged.
    pub fn try_append(&mut self, value: T) -> Result<(), TryReserveError> {
        self.buf.try_reserve::<I>(self.len, 1)?;
        // SAFETY: there is at least one free slot at `len`
        unsafe { self.as_mut_ptr().add(self.len).write(value) };
        self.len += 1;
        Ok(())
    }

    /// Appends an element, silently ignoring a failure to grow.
    pub fn insert(&mut self, value: T) {
        if let Err(err) = self.try_append(value) {
            trace_discarded("insert", &err);
        }
    }

    /// Inserts an element at `index`, shifting all elements after it to the right.
    ///
    /// An `index` past the end appends the element. A failure to grow is silently ignored and leaves the list unchanged.
    pub fn insert_at(&mut self, index: usize, value: T) {
        if let Err(err) = self.try_insert_at(index, value) {
            trace_discarded("insert_at", &err);
        }
    }

    /// Inserts an element at `index`, shifting all elements after it to the right.
    ///
    /// An `index` past the end appends the element.
    pub fn try_insert_at(&mut self, index: usize, value: T) -> Result<(), TryReserveError> {
        let len = self.len;
        let index = index.min(len);

        self.buf.try_reserve::<I>(len, 1)?;
        // SAFETY: there is at least one free slot at `len`, and `index <= len`
        unsafe {
            let p = self.as_mut_ptr().add(index);
            if index < len {
                ptr::copy(p, p.add(1), len - index);
            }
            ptr::write(p, value);
        }
        self.len = len + 1;
        Ok(())
    }

    /// Removes and returns the element at `index`, shifting all elements after it to the left.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfRange`] if `index >= len`, the list is left unchanged.
    pub fn remove_at(&mut self, index: usize) -> Result<T, ListError> {
        let len = self.len;
        if index >= len {
            return Err(ListError::IndexOutOfRange { index, len });
        }

        // SAFETY: `index < len`, so the read is of a live element and the copy stays in bounds
        let value = unsafe {
            let p = self.as_mut_ptr().add(index);
            let value = ptr::read(p);
            ptr::copy(p.add(1), p, len - index - 1);
            value
        };
        self.len = len - 1;
        Ok(value)
    }

    /// Drops all elements, keeping the capacity.
    pub fn clear(&mut self) {
        let elems: *mut [T] = self.as_mut_slice();
        // SAFETY: `elems` are live, and `len` is reset before dropping so a panicking `Drop` can't cause a double drop
        unsafe {
            self.len = 0;
            ptr::drop_in_place(elems);
        }
    }

    /// Reallocates the buffer to exactly fit the current length, releasing it completely when the list is empty.
    pub fn trim_to_length(&mut self) {
        if self.capacity() > self.len {
            self.buf.shrink_to_fit(self.len);
        }
    }

    /// Reverses the order of the elements, in place.
    pub fn reverse(&mut self) {
        self.as_mut_slice().reverse();
    }

    /// Clones `values` into the spare capacity, which needs to be large enough to hold them.
    fn clone_into_spare(&mut self, values: &[T]) where
        T: Clone
    {
        debug_assert!(self.capacity() - self.len >= values.len());

        let dst = self.buf.ptr();
        // Only elements that were fully cloned are counted if `clone` panics
        let mut len = scopeguard::guard(self.len, |len| self.len = len);
        for value in values {
            // SAFETY: the slot at `len` is within capacity and uninitialized
            unsafe { dst.add(*len).write(value.clone()) };
            *len += 1;
        }
    }
}

impl<T: Clone, I: ReserveStrategy, B: ReserveStrategy> DynList<T, I, B> {
    /// Constructs a list holding clones of `values`, sized by the bulk strategy.
    ///
    /// ```
    /// use dynlist_common::collections::DynList;
    ///
    /// let list = DynList::<u8>::from_slice(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    /// assert_eq!(list.len(), 10);
    /// assert_eq!(list.capacity(), 16);
    /// ```
    pub fn from_slice(values: &[T]) -> Self {
        let mut list = Self::with_bulk_capacity(values.len());
        list.clone_into_spare(values);
        list
    }

    /// Appends clones of all `values`, growing the list with the bulk strategy based on the total length.
    ///
    /// The capacity becomes the bulk target whenever that is larger, even if `values` would already fit. It never shrinks.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` bytes.
    pub fn append_range(&mut self, values: &[T]) {
        self.buf.reserve_to_target::<B>(self.len, values.len());
        self.clone_into_spare(values);
    }

    /// Appends clones of all `values`, returning an error instead of panicking when the list can't grow.
    ///
    /// On error, the list is left unchanged.
    pub fn try_append_range(&mut self, values: &[T]) -> Result<(), TryReserveError> {
        self.buf.try_reserve_to_target::<B>(self.len, values.len())?;
        self.clone_into_spare(values);
        Ok(())
    }

    /// Returns an owned copy of the live elements, independent of the list's buffer.
    pub fn to_snapshot(&self) -> Box<[T]> {
        Box::from(self.as_slice())
    }

    /// Constructs a new list with the elements of `a` followed by the elements of `b`.
    ///
    /// The capacity of the result is exactly `a.len() + b.len()`.
    pub fn concat(a: &Self, b: &Self) -> Self {
        let capacity = match a.len.checked_add(b.len) {
            Some(capacity) => capacity,
            None => handle_error(TryReserveError::CapacityOverflow),
        };

        let mut list = Self::with_capacity(capacity);
        list.clone_into_spare(a);
        list.clone_into_spare(b);
        list
    }

    fn extend_with(&mut self, n: usize, value: T) {
        self.reserve(n);
        if n == 0 {
            return;
        }

        let dst = self.buf.ptr();
        let mut len = scopeguard::guard(self.len, |len| self.len = len);
        for _ in 1..n {
            // SAFETY: the slot at `len` is within capacity and uninitialized
            unsafe { dst.add(*len).write(value.clone()) };
            *len += 1;
        }
        // The last element is moved instead of cloned
        // SAFETY: see above
        unsafe { dst.add(*len).write(value) };
        *len += 1;
    }
}

impl<T: PartialEq, I: ReserveStrategy, B: ReserveStrategy> DynList<T, I, B> {
    /// Returns the index of the first element equal to `value`, or `None` if there is no such element.
    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.as_slice().iter().position(|elem| elem == value)
    }

    /// Returns `true` if the list contains an element equal to `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.index_of(value).is_some()
    }

    /// Removes and returns the first element equal to `value`.
    ///
    /// Returns `None`, leaving the list unchanged, when there is no such element.
    pub fn remove_value(&mut self, value: &T) -> Option<T> {
        let index = self.index_of(value)?;
        self.remove_at(index).ok()
    }

    /// Returns `true` if both lists have the same length, the same capacity and pairwise equal elements.
    pub fn equals(&self, other: &Self) -> bool {
        self.len == other.len &&
        self.capacity() == other.capacity() &&
        self.as_slice() == other.as_slice()
    }

    /// Negation of [`DynList::equals`].
    pub fn not_equals(&self, other: &Self) -> bool {
        !self.equals(other)
    }
}

impl<T: Ord, I: ReserveStrategy, B: ReserveStrategy> DynList<T, I, B> {
    /// Sorts the list in ascending order.
    ///
    /// This sort is unstable, equal elements may be reordered.
    pub fn sort_in_place(&mut self) {
        self.as_mut_slice().sort_unstable();
    }

    /// Binary searches this sorted list for `value`.
    ///
    /// Returns `Ok` with the index of a matching element, or `Err` with the index where `value` could be inserted while keeping the list sorted.
    /// If the list is not sorted, the result is unspecified.
    pub fn binary_search(&self, value: &T) -> Result<usize, usize> {
        self.as_slice().binary_search(value)
    }
}

/// Creates a list holding `n` clones of `elem`, sized by the bulk strategy.
#[doc(hidden)]
pub fn from_elem<T: Clone>(elem: T, n: usize) -> DynList<T> {
    let mut list = DynList::with_bulk_capacity(n);
    list.extend_with(n, elem);
    list
}

/// Creates a [`DynList`] containing the arguments.
///
/// - Create a list containing a given list of elements:
///
/// ```
/// use dynlist_common::dynlist;
///
/// let list = dynlist![1, 2, 3];
/// assert_eq!(list, [1, 2, 3]);
/// ```
///
/// - Create a list from a given element and size:
///
/// ```
/// use dynlist_common::dynlist;
///
/// let list = dynlist![1; 3];
/// assert_eq!(list, [1, 1, 1]);
/// ```
///
/// Both forms size the list with the bulk strategy, like any list built from a sequence.
#[macro_export]
macro_rules! dynlist {
    () => {
        <$crate::collections::DynList<_>>::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::collections::from_elem($elem, $n)
    };
    ($($x:expr),+ $(,)?) => {
        <$crate::collections::DynList<_>>::from([$($x),+])
    };
}

//------------------------------------------------------------------------------------------------------------------------------

impl<T, I: ReserveStrategy, B: ReserveStrategy> ops::Deref for DynList<T, I, B> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T, I: ReserveStrategy, B: ReserveStrategy> ops::DerefMut for DynList<T, I, B> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T: Clone, I: ReserveStrategy, B: ReserveStrategy> Clone for DynList<T, I, B> {
    /// Clones the list, keeping its capacity so the clone [`equals`](DynList::equals) the original.
    fn clone(&self) -> Self {
        let mut list = Self::with_capacity(self.capacity());
        list.clone_into_spare(self);
        list
    }
}

impl<T: Hash, I: ReserveStrategy, B: ReserveStrategy> Hash for DynList<T, I, B> {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        Hash::hash(self.as_slice(), state)
    }
}

impl<T, Idx: SliceIndex<[T]>, I: ReserveStrategy, B: ReserveStrategy> Index<Idx> for DynList<T, I, B> {
    type Output = Idx::Output;

    fn index(&self, index: Idx) -> &Self::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, Idx: SliceIndex<[T]>, I: ReserveStrategy, B: ReserveStrategy> IndexMut<Idx> for DynList<T, I, B> {
    fn index_mut(&mut self, index: Idx) -> &mut Self::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<'a, T, I: ReserveStrategy, B: ReserveStrategy> IntoIterator for &'a DynList<T, I, B> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, I: ReserveStrategy, B: ReserveStrategy> IntoIterator for &'a mut DynList<T, I, B> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

impl<T: PartialEq, I: ReserveStrategy, B: ReserveStrategy> PartialEq for DynList<T, I, B> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }

    #[inline]
    fn ne(&self, other: &Self) -> bool {
        self.not_equals(other)
    }
}

impl<T: Eq, I: ReserveStrategy, B: ReserveStrategy> Eq for DynList<T, I, B> {}

impl_slice_partial_eq_generic!([I: ReserveStrategy, B: ReserveStrategy] DynList<T, I, B>, &[U]);
impl_slice_partial_eq_generic!([I: ReserveStrategy, B: ReserveStrategy] DynList<T, I, B>, &mut [U]);
impl_slice_partial_eq_generic!([I: ReserveStrategy, B: ReserveStrategy] &[T], DynList<U, I, B>);
impl_slice_partial_eq_generic!([I: ReserveStrategy, B: ReserveStrategy] DynList<T, I, B>, [U]);
impl_slice_partial_eq_generic!([I: ReserveStrategy, B: ReserveStrategy] [T], DynList<U, I, B>);
impl_slice_partial_eq_generic!([I: ReserveStrategy, B: ReserveStrategy, const N: usize] DynList<T, I, B>, [U; N]);
impl_slice_partial_eq_generic!([I: ReserveStrategy, B: ReserveStrategy, const N: usize] [T; N], DynList<U, I, B>);

impl<T, I, B> Drop for DynList<T, I, B> {
    fn drop(&mut self) {
        // SAFETY: `[0, len)` holds live elements, `RawBuffer` handles deallocation
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.buf.ptr(), self.len)) }
    }
}

impl<T, I: ReserveStrategy, B: ReserveStrategy> Default for DynList<T, I, B> {
    /// Creates an empty `DynList<T>` with a capacity of 0.
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, I: ReserveStrategy, B: ReserveStrategy> fmt::Debug for DynList<T, I, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

impl<T, I: ReserveStrategy, B: ReserveStrategy> AsRef<[T]> for DynList<T, I, B> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T, I: ReserveStrategy, B: ReserveStrategy> AsMut<[T]> for DynList<T, I, B> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T: Clone, I: ReserveStrategy, B: ReserveStrategy> From<&[T]> for DynList<T, I, B> {
    fn from(values: &[T]) -> Self {
        Self::from_slice(values)
    }
}

impl<T, I: ReserveStrategy, B: ReserveStrategy, const N: usize> From<[T; N]> for DynList<T, I, B> {
    /// Moves the elements of the array into a list sized by the bulk strategy.
    ///
    /// ```
    /// use dynlist_common::collections::DynList;
    ///
    /// let list = DynList::<i32>::from([1, 2, 3]);
    /// assert_eq!(list.capacity(), 4);
    /// ```
    fn from(values: [T; N]) -> Self {
        let mut list = Self::with_bulk_capacity(N);
        let values = ManuallyDrop::new(values);
        // SAFETY: the list has room for `N` elements, ownership of the elements moves into the list
        unsafe {
            ptr::copy_nonoverlapping(values.as_ptr(), list.as_mut_ptr(), N);
            list.set_len(N);
        }
        list
    }
}

impl<T, I: ReserveStrategy, B: ReserveStrategy> From<Vec<T>> for DynList<T, I, B> {
    fn from(mut values: Vec<T>) -> Self {
        let len = values.len();
        let mut list = Self::with_bulk_capacity(len);
        // SAFETY: the list has room for `len` elements, the vec forgets them before the copy becomes observable
        unsafe {
            values.set_len(0);
            ptr::copy_nonoverlapping(values.as_ptr(), list.as_mut_ptr(), len);
            list.set_len(len);
        }
        list
    }
}

impl<T, I: ReserveStrategy, B: ReserveStrategy> FromIterator<T> for DynList<T, I, B> {
    /// Collects an iterator into a list sized by the bulk strategy, commonly called via [`Iterator::collect()`].
    fn from_iter<It: IntoIterator<Item = T>>(iter: It) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

//! Allocator traits
//!
//! The system is built around two layers:
//! - `Allocator`: byte-level allocation/deallocation driven by a [`Layout`]
//! - `ElementAllocator`: the strategy contract containers are written
//!   against. It is bound to one element type, splits storage management
//!   (`allocate`/`deallocate`) from object lifetime (`construct`/`destroy`),
//!   and can be rebound to other element types.
//!
//! # Safety
//!
//! Both traits are `unsafe` to implement. Containers trust the pointers they
//! receive:
//! - **Allocator**: returned blocks must be valid, aligned for the layout and
//!   exclusive until deallocated
//! - **ElementAllocator**: `allocate(n)` must return storage valid for `n`
//!   values of `Value`, and `construct`/`destroy` must initialize and tear
//!   down exactly one value in place

use core::alloc::Layout;
use core::mem;
use core::ptr::NonNull;

use crate::error::AllocResult;

/// Byte-level allocator
///
/// # Safety Requirements
///
/// Implementors must ensure that:
/// - Returned pointers are valid for reads and writes of `layout.size()` bytes
/// - Memory is aligned to `layout.align()`
/// - A block stays valid until it is passed to `deallocate`
pub unsafe trait Allocator {
    /// Allocates memory with the given layout
    ///
    /// # Safety
    /// - Memory content is uninitialized and must be initialized before use
    ///
    /// # Errors
    /// - Returns an error if memory cannot be allocated
    unsafe fn allocate(&self, layout: Layout) -> AllocResult<NonNull<[u8]>>;

    /// Deallocates memory at the given pointer with the specified layout
    ///
    /// # Safety
    /// - `ptr` must have been allocated by this allocator
    /// - `layout` must match the original allocation layout exactly
    /// - Double-free is undefined behavior
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Returns the maximum supported allocation size in bytes
    fn max_allocation_size() -> usize {
        // Layout::max_size() is unstable, use safe maximum
        isize::MAX as usize
    }
}

/// Blanket implementation of Allocator for references
unsafe impl<T: Allocator + ?Sized> Allocator for &T {
    unsafe fn allocate(&self, layout: Layout) -> AllocResult<NonNull<[u8]>> {
        // SAFETY: same contract as T::allocate
        unsafe { (**self).allocate(layout) }
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: same contract as T::deallocate
        unsafe { (**self).deallocate(ptr, layout) }
    }

    fn max_allocation_size() -> usize {
        T::max_allocation_size()
    }
}

/// Largest element count a single call may request for `T`
///
/// Computed as `usize::MAX / size_of::<T>()`; zero-sized types get
/// `usize::MAX`.
#[inline]
pub const fn max_elements<T>() -> usize {
    match mem::size_of::<T>() {
        0 => usize::MAX,
        size => usize::MAX / size,
    }
}

/// Allocation strategy bound to a single element type
///
/// Generic containers take an `ElementAllocator` as a type parameter and
/// route every storage operation through it. A container must:
/// - call `allocate` before any `construct`
/// - call `construct` before exposing an element as live
/// - call `destroy` before reusing or releasing an element's storage
/// - call `deallocate` only on storage without live elements, passing the
///   exact count given to the matching `allocate`
///
/// Node-based containers allocate their internal nodes through
/// [`Rebind`](ElementAllocator::Rebind), which keeps the strategy's class
/// while changing the element type.
///
/// # Safety
///
/// Implementors must guarantee that `allocate(n)` returns storage valid and
/// aligned for `n` consecutive `Value`s, and that this storage stays valid
/// until the matching `deallocate`.
pub unsafe trait ElementAllocator: Sized {
    /// Element type this strategy hands out storage for
    type Value;

    /// The same strategy bound to element type `U`
    type Rebind<U>: ElementAllocator<Value = U>;

    /// Returns the address of a live element
    #[inline]
    fn address(&self, value: &Self::Value) -> NonNull<Self::Value> {
        NonNull::from(value)
    }

    /// Upper bound on the element count of a single `allocate` call
    #[inline]
    fn max_size(&self) -> usize {
        max_elements::<Self::Value>()
    }

    /// Reserves uninitialized storage for `n` contiguous elements
    ///
    /// `hint` is a locality hint and may be ignored.
    ///
    /// # Errors
    /// - `ExceedsMaxSize` when `n` is above [`max_size`](Self::max_size)
    /// - `OutOfMemory` when the underlying allocator cannot satisfy the
    ///   request; it is never retried
    fn allocate(
        &self,
        n: usize,
        hint: Option<NonNull<Self::Value>>,
    ) -> AllocResult<NonNull<Self::Value>>;

    /// Releases storage previously returned by `allocate(n)`
    ///
    /// # Safety
    /// - `ptr` must come from `allocate(n, ..)` on an equivalent instance
    /// - `n` must equal the count passed to that call
    /// - no element in the block may still be live
    unsafe fn deallocate(&self, ptr: NonNull<Self::Value>, n: usize);

    /// Moves `value` into the storage at `ptr`, making it a live element
    ///
    /// # Safety
    /// - `ptr` must point into storage obtained from `allocate`
    /// - the slot must not currently hold a live element
    unsafe fn construct(&self, ptr: NonNull<Self::Value>, value: Self::Value);

    /// Runs the element's destructor in place, keeping the storage allocated
    ///
    /// # Safety
    /// - `ptr` must hold a live element created by `construct`
    unsafe fn destroy(&self, ptr: NonNull<Self::Value>);

    /// Produces the equivalent strategy for element type `U`
    fn rebind<U>(&self) -> Self::Rebind<U>;
}

/// Layout for `n` elements of `T`, validated against the raw allocator limit
pub(crate) fn array_layout<T, A: Allocator>(n: usize) -> AllocResult<Layout> {
    let max = max_elements::<T>();
    if n > max {
        return Err(crate::AllocError::exceeds_max_size(n, max));
    }

    let layout =
        Layout::array::<T>(n).map_err(|_| crate::AllocError::exceeds_max_size(n, max))?;
    if layout.size() > A::max_allocation_size() {
        return Err(crate::AllocError::exceeds_max_size(n, max));
    }
    Ok(layout)
}

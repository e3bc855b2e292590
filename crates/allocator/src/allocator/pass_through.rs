//! Pass-through strategy
//!
//! The baseline [`ElementAllocator`]: storage comes straight from the raw
//! allocator and elements are initialized and torn down in place. It behaves
//! exactly like the platform default apart from the diagnostic lines.

use core::fmt;
use core::marker::PhantomData;
use core::ptr::NonNull;

use super::traits::array_layout;
use super::{Allocator, ElementAllocator, SystemAllocator};
use crate::diagnostics;
use crate::error::AllocResult;

/// Stateless strategy delegating to a raw allocator
///
/// Copies and rebinds are free and carry no state besides the raw allocator,
/// which is zero-sized for [`SystemAllocator`].
pub struct PassThroughAllocator<T, A = SystemAllocator> {
    raw: A,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PassThroughAllocator<T> {
    /// Creates a strategy backed by the system allocator
    #[inline]
    pub const fn new() -> Self {
        Self::with_allocator(SystemAllocator::new())
    }
}

impl<T, A> PassThroughAllocator<T, A> {
    /// Creates a strategy backed by `raw`
    #[inline]
    pub const fn with_allocator(raw: A) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    /// Gets a reference to the underlying raw allocator
    pub fn raw(&self) -> &A {
        &self.raw
    }
}

impl<T, A: Default> Default for PassThroughAllocator<T, A> {
    fn default() -> Self {
        Self::with_allocator(A::default())
    }
}

impl<T, A: Clone> Clone for PassThroughAllocator<T, A> {
    fn clone(&self) -> Self {
        Self::with_allocator(self.raw.clone())
    }
}

impl<T, A: Copy> Copy for PassThroughAllocator<T, A> {}

impl<T, A: fmt::Debug> fmt::Debug for PassThroughAllocator<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassThroughAllocator")
            .field("value_type", &core::any::type_name::<T>())
            .field("raw", &self.raw)
            .finish()
    }
}

/// Interchangeable whenever the raw allocators are, regardless of `T`/`U`
impl<T, U, A: PartialEq> PartialEq<PassThroughAllocator<U, A>> for PassThroughAllocator<T, A> {
    fn eq(&self, other: &PassThroughAllocator<U, A>) -> bool {
        self.raw == other.raw
    }
}

impl<T, A: Eq> Eq for PassThroughAllocator<T, A> {}

// SAFETY: storage comes from `A` with `Layout::array::<T>(n)`, so it is valid
// and aligned for `n` values of `T` until released with the same layout.
unsafe impl<T, A: Allocator + Clone> ElementAllocator for PassThroughAllocator<T, A> {
    type Value = T;
    type Rebind<U> = PassThroughAllocator<U, A>;

    fn allocate(&self, n: usize, _hint: Option<NonNull<T>>) -> AllocResult<NonNull<T>> {
        let layout = array_layout::<T, A>(n)?;
        // SAFETY: layout validated above
        let block = unsafe { self.raw.allocate(layout)? };
        let ptr = block.cast::<T>();

        diagnostics::allocated(n, ptr);
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        diagnostics::deallocated(n, ptr);

        // The layout was accepted when the block was allocated
        if let Ok(layout) = array_layout::<T, A>(n) {
            // SAFETY: ptr was allocated by self.raw with this layout (caller contract)
            unsafe { self.raw.deallocate(ptr.cast(), layout) };
        }
    }

    unsafe fn construct(&self, ptr: NonNull<T>, value: T) {
        // SAFETY: ptr is valid, aligned and unoccupied (caller contract)
        unsafe { ptr.as_ptr().write(value) };
        diagnostics::constructed(ptr);
    }

    unsafe fn destroy(&self, ptr: NonNull<T>) {
        diagnostics::destroyed(ptr);
        // SAFETY: ptr holds a live T (caller contract)
        unsafe { ptr.as_ptr().drop_in_place() };
    }

    fn rebind<U>(&self) -> PassThroughAllocator<U, A> {
        PassThroughAllocator::with_allocator(self.raw.clone())
    }
}

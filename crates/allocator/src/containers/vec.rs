//! Contiguous container backed by an element allocator

use core::fmt;
use core::mem;
use core::ptr::{self, NonNull};
use core::slice;

use crate::allocator::{AllocError, AllocResult, ElementAllocator};

/// Growable array whose single block comes from `A`
///
/// Growth allocates a new block, moves the elements over bitwise and
/// releases the old block with its exact capacity, so every block shows up
/// as exactly one allocate/deallocate pair on the strategy.
///
/// Zero-sized elements never need storage: the capacity is `usize::MAX`
/// from the start and only `construct`/`destroy` reach the strategy.
pub struct AllocVec<T, A: ElementAllocator<Value = T>> {
    ptr: NonNull<T>,
    len: usize,
    cap: usize,
    alloc: A,
}

impl<T, A: ElementAllocator<Value = T>> AllocVec<T, A> {
    /// Smallest non-zero capacity, following the std growth policy
    const MIN_NON_ZERO_CAP: usize = if mem::size_of::<T>() <= 1024 { 4 } else { 1 };

    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// Creates an empty vector; nothing is allocated until the first push
    pub fn new_in(alloc: A) -> Self {
        Self {
            ptr: NonNull::dangling(),
            len: 0,
            cap: if Self::IS_ZST { usize::MAX } else { 0 },
            alloc,
        }
    }

    /// Creates an empty vector holding exactly `capacity` slots
    pub fn with_capacity_in(capacity: usize, alloc: A) -> AllocResult<Self> {
        let mut vec = Self::new_in(alloc);
        if capacity > vec.cap {
            vec.reallocate(capacity)?;
        }
        Ok(vec)
    }

    /// Number of live elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the vector holds no elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated slots
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// The strategy this vector allocates through
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Appends `value`, growing the block when full
    ///
    /// On allocation failure `value` is dropped and the vector is unchanged.
    pub fn push(&mut self, value: T) -> AllocResult<()> {
        if self.len == self.cap {
            self.grow()?;
        }

        // SAFETY: len < cap, so the slot is inside the block and unoccupied
        unsafe {
            let slot = self.ptr.add(self.len);
            self.alloc.construct(slot, value);
        }
        self.len += 1;
        Ok(())
    }

    /// Appends every item of `iter`, stopping at the first allocation failure
    pub fn try_extend<I: IntoIterator<Item = T>>(&mut self, iter: I) -> AllocResult<()> {
        for value in iter {
            self.push(value)?;
        }
        Ok(())
    }

    /// Element at `index`, if live
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Live elements as a slice
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first len slots hold live elements; ptr is dangling
        // but aligned when len == 0
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Iterator over live elements
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Destroys every element, keeping the block allocated
    pub fn clear(&mut self) {
        let len = mem::replace(&mut self.len, 0);
        for index in 0..len {
            // SAFETY: slots below the old len hold live elements, each
            // destroyed exactly once
            unsafe { self.alloc.destroy(self.ptr.add(index)) };
        }
    }

    fn grow(&mut self) -> AllocResult<()> {
        let new_cap = match self.cap {
            0 => Self::MIN_NON_ZERO_CAP,
            cap => cap
                .checked_mul(2)
                .ok_or_else(|| AllocError::exceeds_max_size(cap, self.alloc.max_size()))?,
        };
        self.reallocate(new_cap)
    }

    fn reallocate(&mut self, new_cap: usize) -> AllocResult<()> {
        debug_assert!(new_cap >= self.len);
        let new_ptr = self.alloc.allocate(new_cap, Some(self.ptr))?;

        if self.cap > 0 {
            // SAFETY: both blocks hold at least len slots and do not overlap;
            // the old block has no live elements left after the move
            unsafe {
                ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), self.len);
                self.alloc.deallocate(self.ptr, self.cap);
            }
        }

        self.ptr = new_ptr;
        self.cap = new_cap;
        Ok(())
    }
}

impl<T, A: ElementAllocator<Value = T>> Drop for AllocVec<T, A> {
    fn drop(&mut self) {
        self.clear();

        if self.cap > 0 && !Self::IS_ZST {
            // SAFETY: block was allocated with cap slots and is now empty
            unsafe { self.alloc.deallocate(self.ptr, self.cap) };
        }
    }
}

impl<T: fmt::Debug, A: ElementAllocator<Value = T>> fmt::Debug for AllocVec<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T, A: ElementAllocator<Value = T>> IntoIterator for &'a AllocVec<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

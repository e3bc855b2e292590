//! System allocator implementation
//!
//! Provides an allocator that wraps the process-wide default allocator.
//! Every strategy in this crate obtains its raw storage from here unless a
//! different [`Allocator`] is supplied.

use core::alloc::{GlobalAlloc, Layout};
use core::ptr::NonNull;
use std::alloc::System;

use super::Allocator;
use crate::error::{AllocError, AllocResult};

/// Wrapper for the system's default allocator
///
/// All instances are interchangeable: memory allocated through one may be
/// released through any other, so equality always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SystemAllocator;

impl SystemAllocator {
    /// Creates a new SystemAllocator
    ///
    /// This is a zero-cost operation as the SystemAllocator contains no state.
    #[inline]
    pub const fn new() -> Self {
        SystemAllocator
    }
}

unsafe impl Allocator for SystemAllocator {
    #[inline]
    unsafe fn allocate(&self, layout: Layout) -> AllocResult<NonNull<[u8]>> {
        if layout.size() == 0 {
            // Well-aligned dangling pointer, never dereferenced
            let dangling = core::ptr::without_provenance_mut::<u8>(layout.align());
            // SAFETY: alignment is a non-zero power of two
            let ptr = unsafe { NonNull::new_unchecked(dangling) };
            return Ok(NonNull::slice_from_raw_parts(ptr, 0));
        }

        // SAFETY: layout has non-zero size (checked above)
        let ptr = unsafe { System.alloc(layout) };

        match NonNull::new(ptr) {
            Some(non_null) => Ok(NonNull::slice_from_raw_parts(non_null, layout.size())),
            None => Err(AllocError::out_of_memory_with_layout(layout)),
        }
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() == 0 {
            return; // Nothing to deallocate for zero-sized allocations
        }

        // SAFETY: ptr was returned by System.alloc with this layout (caller contract)
        unsafe { System.dealloc(ptr.as_ptr(), layout) };
    }
}

#[cfg(test)]
mod tests {
    use core::alloc::Layout;

    use super::*;

    #[test]
    fn test_basic_allocation() {
        let allocator = SystemAllocator::new();
        let layout = Layout::new::<u64>();

        unsafe {
            let ptr = allocator.allocate(layout).unwrap();
            assert_eq!(ptr.len(), layout.size());
            assert_eq!(ptr.cast::<u8>().as_ptr() as usize % layout.align(), 0);

            allocator.deallocate(ptr.cast(), layout);
        }
    }

    #[test]
    fn test_zero_sized_allocation() {
        let allocator = SystemAllocator::new();
        let layout = Layout::from_size_align(0, 16).unwrap();

        unsafe {
            let ptr = allocator.allocate(layout).unwrap();
            assert_eq!(ptr.len(), 0);
            assert_eq!(ptr.cast::<u8>().as_ptr() as usize % 16, 0);
            // Should not crash
            allocator.deallocate(ptr.cast(), layout);
        }
    }

    #[test]
    fn test_max_allocation_size() {
        let max_size = SystemAllocator::max_allocation_size();
        assert!(max_size > 0);
        assert!(max_size <= isize::MAX as usize);
    }

    #[test]
    fn test_instances_are_interchangeable() {
        assert_eq!(SystemAllocator::new(), SystemAllocator);
    }
}

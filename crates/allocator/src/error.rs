//! Error types for nebula-allocator
//!
//! Two distinct failure paths exist:
//! - [`AllocError`] is the recoverable path. It is returned through
//!   [`AllocResult`] whenever the environment cannot satisfy a request.
//! - [`InvariantViolation`] is the fatal path. It signals that a caller broke
//!   the allocator contract (unbalanced destroy, leaked storage) and is raised
//!   as a panic, never returned.

use core::alloc::Layout;

use thiserror::Error;
use tracing::error;

/// Result alias for allocation operations
pub type AllocResult<T> = core::result::Result<T, AllocError>;

/// Recoverable allocation errors
#[must_use = "errors should be handled"]
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocError {
    /// The underlying allocator could not satisfy the request
    #[error("out of memory: {size} bytes with {align} byte alignment")]
    OutOfMemory {
        /// Requested size in bytes
        size: usize,
        /// Requested alignment in bytes
        align: usize,
    },

    /// The requested element count cannot be represented as a single block
    #[error("allocation of {count} elements exceeds maximum of {max}")]
    ExceedsMaxSize {
        /// Requested element count
        count: usize,
        /// Largest count a single call accepts
        max: usize,
    },

    /// Raw layout parameters were rejected
    #[error("invalid memory layout: {reason}")]
    InvalidLayout {
        /// Why the layout was rejected
        reason: String,
    },
}

impl AllocError {
    /// Create an out-of-memory error
    pub fn out_of_memory(size: usize, align: usize) -> Self {
        Self::OutOfMemory { size, align }
    }

    /// Create an out-of-memory error from a layout
    pub fn out_of_memory_with_layout(layout: Layout) -> Self {
        Self::out_of_memory(layout.size(), layout.align())
    }

    /// Create an error for an element count that cannot be allocated at once
    pub fn exceeds_max_size(count: usize, max: usize) -> Self {
        Self::ExceedsMaxSize { count, max }
    }

    /// Create an invalid layout error
    pub fn invalid_layout(reason: &str) -> Self {
        Self::InvalidLayout {
            reason: reason.to_string(),
        }
    }

    /// Check whether this is an out-of-memory condition
    #[must_use]
    pub fn is_out_of_memory(&self) -> bool {
        matches!(self, Self::OutOfMemory { .. })
    }

    /// Check whether the request was too large to express
    #[must_use]
    pub fn is_exceeds_max_size(&self) -> bool {
        matches!(self, Self::ExceedsMaxSize { .. })
    }

    /// Get error code for categorization
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::OutOfMemory { .. } => "MEM:ALLOC:OOM",
            Self::ExceedsMaxSize { .. } => "MEM:ALLOC:MAX",
            Self::InvalidLayout { .. } => "MEM:ALLOC:LAYOUT",
        }
    }
}

/// Broken allocator contract detected by a counting strategy
///
/// These indicate a bug in the calling container, not an environmental
/// condition, so they are never surfaced as values. Use [`raise`] to
/// terminate the current operation.
///
/// [`raise`]: InvariantViolation::raise
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// `destroy` called while no constructed element is live
    #[error("invariant violation: destroy called with no live constructions")]
    DestroyWithoutConstruct,

    /// `deallocate` released more elements than are live
    #[error(
        "invariant violation: deallocate of {requested} element(s) with only {live} live allocation(s)"
    )]
    DeallocateUnderflow {
        /// Elements passed to `deallocate`
        requested: usize,
        /// Elements live at the time of the call
        live: usize,
    },

    /// Counter store dropped while storage was still allocated
    #[error("invariant violation: {count} element(s) allocated but never deallocated")]
    LeakedAllocations {
        /// Elements still allocated
        count: usize,
    },

    /// Counter store dropped while elements were still constructed
    #[error("invariant violation: {count} element(s) constructed but never destroyed")]
    LiveConstructions {
        /// Elements still constructed
        count: usize,
    },
}

impl InvariantViolation {
    /// Get error code for categorization
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::DestroyWithoutConstruct => "MEM:INVARIANT:DESTROY",
            Self::DeallocateUnderflow { .. } => "MEM:INVARIANT:DEALLOC",
            Self::LeakedAllocations { .. } => "MEM:INVARIANT:LEAK",
            Self::LiveConstructions { .. } => "MEM:INVARIANT:LIVE",
        }
    }

    /// Log the violation and panic with its message
    #[track_caller]
    #[cold]
    pub fn raise(self) -> ! {
        error!(code = self.code(), "{}", self);
        panic!("{self}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AllocError::out_of_memory(8, 8).code(), "MEM:ALLOC:OOM");
        assert_eq!(AllocError::exceeds_max_size(10, 5).code(), "MEM:ALLOC:MAX");
        assert_eq!(
            AllocError::invalid_layout("bad align").code(),
            "MEM:ALLOC:LAYOUT"
        );
    }

    #[test]
    fn test_predicates() {
        let oom = AllocError::out_of_memory_with_layout(Layout::new::<u64>());
        assert!(oom.is_out_of_memory());
        assert!(!oom.is_exceeds_max_size());
        assert_eq!(oom, AllocError::OutOfMemory { size: 8, align: 8 });
    }

    #[test]
    fn test_display() {
        let err = AllocError::exceeds_max_size(usize::MAX, 42);
        assert_eq!(
            err.to_string(),
            format!("allocation of {} elements exceeds maximum of 42", usize::MAX)
        );

        let violation = InvariantViolation::LeakedAllocations { count: 2 };
        assert_eq!(
            violation.to_string(),
            "invariant violation: 2 element(s) allocated but never deallocated"
        );
    }

    #[test]
    #[should_panic(expected = "destroy called with no live constructions")]
    fn test_raise_panics() {
        InvariantViolation::DestroyWithoutConstruct.raise();
    }
}

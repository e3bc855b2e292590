//! Per-operation diagnostic lines
//!
//! Every strategy reports its storage traffic as `tracing` events on the
//! [`TARGET`] target. The message of each event is a single line:
//!
//! ```text
//! allocate 3 element(s) of size 8 at: 0x55d0c1a2b3c0
//! construct 1 element(s) of size 8 at: 0x55d0c1a2b3c0
//! destroy 1 element(s) of size 8 at: 0x55d0c1a2b3c0
//! deallocate 3 element(s) of size 8 at: 0x55d0c1a2b3c0
//! ```
//!
//! `allocate`/`deallocate` are emitted at `DEBUG`, `construct`/`destroy` at
//! `TRACE`. Where the lines end up is decided by the installed subscriber.
//! They are an observability channel only; nothing in the crate reads them.

use core::fmt;
use core::mem;
use core::ptr::NonNull;

use tracing::{debug, trace};

/// Target used for all diagnostic events
pub const TARGET: &str = "nebula_allocator::diagnostics";

/// Allocator operation reported by a diagnostic line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Storage reserved
    Allocate,
    /// Storage released
    Deallocate,
    /// Element initialized in place
    Construct,
    /// Element torn down in place
    Destroy,
}

impl Operation {
    /// Keyword that starts the diagnostic line
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allocate => "allocate",
            Self::Deallocate => "deallocate",
            Self::Construct => "construct",
            Self::Destroy => "destroy",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One diagnostic line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticLine {
    /// Operation performed
    pub operation: Operation,
    /// Number of elements involved
    pub count: usize,
    /// Size of one element in bytes
    pub element_size: usize,
    /// Start of the affected storage
    pub address: *const u8,
}

impl DiagnosticLine {
    /// Build a line for `count` elements of `T` at `ptr`
    pub fn new<T>(operation: Operation, count: usize, ptr: NonNull<T>) -> Self {
        Self {
            operation,
            count,
            element_size: mem::size_of::<T>(),
            address: ptr.as_ptr().cast_const().cast(),
        }
    }
}

impl fmt::Display for DiagnosticLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} element(s) of size {} at: {:p}",
            self.operation, self.count, self.element_size, self.address
        )
    }
}

#[inline]
pub(crate) fn allocated<T>(count: usize, ptr: NonNull<T>) {
    debug!(target: TARGET, "{}", DiagnosticLine::new(Operation::Allocate, count, ptr));
}

#[inline]
pub(crate) fn deallocated<T>(count: usize, ptr: NonNull<T>) {
    debug!(target: TARGET, "{}", DiagnosticLine::new(Operation::Deallocate, count, ptr));
}

#[inline]
pub(crate) fn constructed<T>(ptr: NonNull<T>) {
    trace!(target: TARGET, "{}", DiagnosticLine::new(Operation::Construct, 1, ptr));
}

#[inline]
pub(crate) fn destroyed<T>(ptr: NonNull<T>) {
    trace!(target: TARGET, "{}", DiagnosticLine::new(Operation::Destroy, 1, ptr));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_format() {
        let value = 7u64;
        let ptr = NonNull::from(&value);
        let line = DiagnosticLine::new(Operation::Allocate, 3, ptr);

        assert_eq!(line.element_size, 8);
        assert_eq!(
            line.to_string(),
            format!("allocate 3 element(s) of size 8 at: {:p}", &raw const value)
        );
    }

    #[test]
    fn test_operation_keywords() {
        assert_eq!(Operation::Deallocate.to_string(), "deallocate");
        assert_eq!(Operation::Construct.as_str(), "construct");
        assert_eq!(Operation::Destroy.as_str(), "destroy");
    }
}

//! Live allocation/construction counters
//!
//! A [`LiveCounter`] holds the two balances a counting strategy maintains.
//! Where the counter lives is decided by the [`CounterStore`]:
//!
//! - `LiveCounter` itself: every copy of a strategy owns its counter, and
//!   cloning duplicates the current values. Each copy is checked on its own
//!   when it is dropped.
//! - `Rc<LiveCounter>`: copies and rebinds share one ledger, checked once
//!   when the last sharer goes away.

use core::cell::Cell;
use std::rc::Rc;

use crate::error::InvariantViolation;

/// Point-in-time read of a counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LiveCounts {
    /// Elements allocated and not yet deallocated
    pub allocations: usize,
    /// Elements constructed and not yet destroyed
    pub constructions: usize,
}

impl LiveCounts {
    /// Both balances are zero
    pub fn is_balanced(&self) -> bool {
        self.allocations == 0 && self.constructions == 0
    }
}

/// Live allocation and construction balances
///
/// Single-threaded: updates go through [`Cell`], so the type is `!Sync`.
/// Dropping a counter with a non-zero balance raises an
/// [`InvariantViolation`], unless the thread is already panicking.
#[derive(Debug, Default)]
pub struct LiveCounter {
    allocations: Cell<usize>,
    constructions: Cell<usize>,
}

impl LiveCounter {
    /// Creates a counter with both balances at zero
    pub const fn new() -> Self {
        Self::with_counts(LiveCounts {
            allocations: 0,
            constructions: 0,
        })
    }

    /// Creates a counter starting from `counts`
    pub const fn with_counts(counts: LiveCounts) -> Self {
        Self {
            allocations: Cell::new(counts.allocations),
            constructions: Cell::new(counts.constructions),
        }
    }

    /// Elements allocated and not yet deallocated
    pub fn allocations(&self) -> usize {
        self.allocations.get()
    }

    /// Elements constructed and not yet destroyed
    pub fn constructions(&self) -> usize {
        self.constructions.get()
    }

    /// Current balances
    pub fn counts(&self) -> LiveCounts {
        LiveCounts {
            allocations: self.allocations(),
            constructions: self.constructions(),
        }
    }

    pub(crate) fn record_allocation(&self, n: usize) {
        // Live elements never exceed the address space; saturate instead of wrapping
        self.allocations.set(self.allocations.get().saturating_add(n));
    }

    pub(crate) fn record_deallocation(&self, n: usize) {
        let live = self.allocations.get();
        match live.checked_sub(n) {
            Some(remaining) => self.allocations.set(remaining),
            None => InvariantViolation::DeallocateUnderflow { requested: n, live }.raise(),
        }
    }

    pub(crate) fn record_construction(&self) {
        self.constructions
            .set(self.constructions.get().saturating_add(1));
    }

    pub(crate) fn record_destruction(&self) {
        match self.constructions.get() {
            0 => InvariantViolation::DestroyWithoutConstruct.raise(),
            live => self.constructions.set(live - 1),
        }
    }
}

/// Copies the current values; the copy is balanced independently
impl Clone for LiveCounter {
    fn clone(&self) -> Self {
        Self::with_counts(self.counts())
    }
}

impl Drop for LiveCounter {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }

        let counts = self.counts();
        if counts.allocations != 0 {
            InvariantViolation::LeakedAllocations {
                count: counts.allocations,
            }
            .raise();
        }
        if counts.constructions != 0 {
            InvariantViolation::LiveConstructions {
                count: counts.constructions,
            }
            .raise();
        }
    }
}

/// Owner of the counter used by a counting strategy
///
/// `Clone` decides the copy semantics of the strategy: duplicate for
/// [`LiveCounter`], share for `Rc<LiveCounter>`.
pub trait CounterStore: Clone {
    /// The counter updated by this store
    fn counter(&self) -> &LiveCounter;

    /// Whether `self` and `other` update the same counter
    fn shares_with(&self, other: &Self) -> bool {
        core::ptr::eq(self.counter(), other.counter())
    }
}

impl CounterStore for LiveCounter {
    fn counter(&self) -> &LiveCounter {
        self
    }
}

impl CounterStore for Rc<LiveCounter> {
    fn counter(&self) -> &LiveCounter {
        self
    }
}

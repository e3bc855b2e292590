//! Counting strategy
//!
//! Wraps the pass-through behavior with live allocation and construction
//! balances, asserting both return to zero when the counter goes away.
//!
//! # Invariants
//!
//! - `allocate(n)` adds `n` after the raw allocation succeeds; a failed
//!   allocation leaves the balance untouched
//! - `deallocate(p, n)` subtracts `n` before the storage is released
//! - `construct` adds 1 after the value is written
//! - `destroy` checks for a live construction, subtracts 1, then drops
//!
//! # Copies and rebinds
//!
//! The counter store `S` decides what a copy observes. With the default
//! [`LiveCounter`] a clone or rebind starts from the current values and is
//! balanced on its own afterwards, so copies never see each other's traffic.
//! [`SharedCountingAllocator`] uses `Rc<LiveCounter>` instead, so all copies
//! and rebinds update one ledger.

use core::fmt;
use core::marker::PhantomData;
use core::ptr::NonNull;
use std::rc::Rc;

use super::counter::{CounterStore, LiveCounter, LiveCounts};
use super::traits::array_layout;
use super::{Allocator, ElementAllocator, SystemAllocator};
use crate::diagnostics;
use crate::error::AllocResult;

/// Counting strategy whose copies share a single reference-counted ledger
pub type SharedCountingAllocator<T, A = SystemAllocator> =
    CountingAllocator<T, Rc<LiveCounter>, A>;

/// Strategy that tracks live allocations and constructions
pub struct CountingAllocator<T, S = LiveCounter, A = SystemAllocator> {
    store: S,
    raw: A,
    _marker: PhantomData<fn() -> T>,
}

impl<T> CountingAllocator<T> {
    /// Creates a strategy with per-instance counters at zero
    pub fn new() -> Self {
        Self::with_parts(LiveCounter::new(), SystemAllocator::new())
    }
}

impl<T> CountingAllocator<T, Rc<LiveCounter>> {
    /// Creates a strategy with a fresh shared ledger
    ///
    /// Name the store through the alias: `SharedCountingAllocator::<T>::shared()`.
    pub fn shared() -> Self {
        Self::with_parts(Rc::new(LiveCounter::new()), SystemAllocator::new())
    }
}

impl<T, S, A> CountingAllocator<T, S, A> {
    /// Creates a strategy from an explicit counter store and raw allocator
    pub fn with_parts(store: S, raw: A) -> Self {
        Self {
            store,
            raw,
            _marker: PhantomData,
        }
    }

    /// Gets a reference to the underlying raw allocator
    pub fn raw(&self) -> &A {
        &self.raw
    }

    /// Gets a reference to the counter store
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<T, S: CounterStore, A> CountingAllocator<T, S, A> {
    /// Borrows the counter this instance updates
    pub fn counter(&self) -> &LiveCounter {
        self.store.counter()
    }

    /// Elements allocated through this counter and not yet deallocated
    pub fn live_allocations(&self) -> usize {
        self.counter().allocations()
    }

    /// Elements constructed through this counter and not yet destroyed
    pub fn live_constructions(&self) -> usize {
        self.counter().constructions()
    }

    /// Current balances
    pub fn counts(&self) -> LiveCounts {
        self.counter().counts()
    }

    /// Whether `other` updates the same counter, whatever its element type
    pub fn shares_counter_with<U>(&self, other: &CountingAllocator<U, S, A>) -> bool {
        self.store.shares_with(&other.store)
    }
}

impl<T, A: Default> Default for CountingAllocator<T, LiveCounter, A> {
    fn default() -> Self {
        Self::with_parts(LiveCounter::new(), A::default())
    }
}

impl<T, A: Default> Default for CountingAllocator<T, Rc<LiveCounter>, A> {
    fn default() -> Self {
        Self::with_parts(Rc::new(LiveCounter::new()), A::default())
    }
}

impl<T, S: Clone, A: Clone> Clone for CountingAllocator<T, S, A> {
    fn clone(&self) -> Self {
        Self::with_parts(self.store.clone(), self.raw.clone())
    }
}

impl<T, S: CounterStore, A: fmt::Debug> fmt::Debug for CountingAllocator<T, S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountingAllocator")
            .field("value_type", &core::any::type_name::<T>())
            .field("counts", &self.counts())
            .field("raw", &self.raw)
            .finish()
    }
}

/// Equality reflects interchangeability of memory, not counter state
impl<T, U, S, A: PartialEq> PartialEq<CountingAllocator<U, S, A>> for CountingAllocator<T, S, A> {
    fn eq(&self, other: &CountingAllocator<U, S, A>) -> bool {
        self.raw == other.raw
    }
}

impl<T, S, A: Eq> Eq for CountingAllocator<T, S, A> {}

// SAFETY: storage comes from `A` with `Layout::array::<T>(n)`, so it is valid
// and aligned for `n` values of `T` until released with the same layout.
// Counter updates never touch the storage.
unsafe impl<T, S, A> ElementAllocator for CountingAllocator<T, S, A>
where
    S: CounterStore,
    A: Allocator + Clone,
{
    type Value = T;
    type Rebind<U> = CountingAllocator<U, S, A>;

    fn allocate(&self, n: usize, _hint: Option<NonNull<T>>) -> AllocResult<NonNull<T>> {
        let layout = array_layout::<T, A>(n)?;
        // SAFETY: layout validated above
        let block = unsafe { self.raw.allocate(layout)? };
        let ptr = block.cast::<T>();

        self.counter().record_allocation(n);
        diagnostics::allocated(n, ptr);
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        self.counter().record_deallocation(n);
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
        self.counter().record_construction();
        diagnostics::constructed(ptr);
    }

    unsafe fn destroy(&self, ptr: NonNull<T>) {
        self.counter().record_destruction();
        diagnostics::destroyed(ptr);
        // SAFETY: ptr holds a live T (caller contract)
        unsafe { ptr.as_ptr().drop_in_place() };
    }

    fn rebind<U>(&self) -> CountingAllocator<U, S, A> {
        CountingAllocator::with_parts(self.store.clone(), self.raw.clone())
    }
}

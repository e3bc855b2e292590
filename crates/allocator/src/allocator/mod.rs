//!
//! Allocation strategies for generic containers
//!
//! This module provides the raw allocator layer, the element allocator
//! contract, and the two strategies built on it: pass-through and counting.

mod counter;
mod counting;
mod pass_through;
mod system;
mod traits;

pub use counter::{CounterStore, LiveCounter, LiveCounts};
pub use counting::{CountingAllocator, SharedCountingAllocator};
pub use pass_through::PassThroughAllocator;
pub use system::SystemAllocator;
pub use traits::{Allocator, ElementAllocator, max_elements};

pub use crate::error::{AllocError, AllocResult};

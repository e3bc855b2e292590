//! Pluggable element allocators for Nebula containers
//!
//! This crate provides an allocator contract that generic containers take as
//! a type parameter, plus the strategies that implement it:
//!
//! - [`PassThroughAllocator`]: stateless, forwards to the raw allocator and
//!   reports each operation as a diagnostic line
//! - [`CountingAllocator`]: tracks live allocations and constructions and
//!   asserts both are zero when its counter goes away
//! - [`SharedCountingAllocator`]: counting with one ledger shared by every
//!   copy and rebind
//!
//! A strategy bound to `T` can be rebound to any `U` through
//! [`ElementAllocator::rebind`], which is how node-based containers
//! allocate their internal nodes.
//!
//! # Example
//!
//! ```
//! use nebula_allocator::prelude::*;
//!
//! fn main() -> AllocResult<()> {
//!     let mut list = AllocList::new_in(CountingAllocator::<u32>::new());
//!     list.push_back(1)?;
//!     list.push_back(2)?;
//!     assert_eq!(list.allocator().live_allocations(), 2);
//!
//!     list.clear();
//!     assert!(list.allocator().counts().is_balanced());
//!     Ok(())
//! }
//! ```
//!
//! # Diagnostics
//!
//! Storage traffic is emitted as `tracing` events on the
//! [`diagnostics::TARGET`] target. Install a subscriber to see them.

#![allow(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod allocator;
pub mod containers;
pub mod diagnostics;
pub mod error;

pub use allocator::{
    Allocator, CounterStore, CountingAllocator, ElementAllocator, LiveCounter, LiveCounts,
    PassThroughAllocator, SharedCountingAllocator, SystemAllocator, max_elements,
};
pub use containers::{AllocList, AllocVec};
pub use error::{AllocError, AllocResult, InvariantViolation};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commonly used types
pub mod prelude {
    pub use crate::allocator::{
        CountingAllocator, ElementAllocator, PassThroughAllocator, SharedCountingAllocator,
        SystemAllocator,
    };
    pub use crate::containers::{AllocList, AllocVec};
    pub use crate::error::{AllocError, AllocResult};
}

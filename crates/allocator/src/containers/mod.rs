//! Generic containers bound to an element allocator
//!
//! Both containers take the strategy as a type parameter and route every
//! storage operation through it. [`AllocVec`] keeps one contiguous block;
//! [`AllocList`] rebinds the strategy to its node type and allocates one
//! node per element.

mod list;
mod vec;

pub use list::{AllocList, Iter as ListIter, ListNode};
pub use vec::AllocVec;

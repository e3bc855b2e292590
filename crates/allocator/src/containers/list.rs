//! Node-based container backed by a rebound element allocator

use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ptr::NonNull;

use crate::allocator::{AllocResult, ElementAllocator};

type Link<T> = Option<NonNull<ListNode<T>>>;

/// Storage unit of [`AllocList`]: the payload plus its neighbours
pub struct ListNode<T> {
    value: T,
    prev: Link<T>,
    next: Link<T>,
}

impl<T> ListNode<T> {
    /// The payload carried by this node
    pub fn value(&self) -> &T {
        &self.value
    }
}

/// Doubly linked list allocating one node per element
///
/// The user's strategy is rebound to [`ListNode<T>`] at construction and
/// only the rebound instance is kept. Each element costs one `allocate(1)`
/// and one `construct` on that instance.
pub struct AllocList<T, A: ElementAllocator<Value = T>> {
    head: Link<T>,
    tail: Link<T>,
    len: usize,
    alloc: A::Rebind<ListNode<T>>,
    _marker: PhantomData<ListNode<T>>,
}

impl<T, A: ElementAllocator<Value = T>> AllocList<T, A> {
    /// Creates an empty list allocating nodes through `alloc` rebound
    pub fn new_in(alloc: A) -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
            alloc: alloc.rebind::<ListNode<T>>(),
            _marker: PhantomData,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the list holds no elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The node strategy this list allocates through
    pub fn allocator(&self) -> &A::Rebind<ListNode<T>> {
        &self.alloc
    }

    /// First element
    pub fn front(&self) -> Option<&T> {
        // SAFETY: linked nodes are live until the list releases them
        self.head.map(|node| unsafe { &node.as_ref().value })
    }

    /// Last element
    pub fn back(&self) -> Option<&T> {
        // SAFETY: linked nodes are live until the list releases them
        self.tail.map(|node| unsafe { &node.as_ref().value })
    }

    /// Appends `value` at the end
    ///
    /// On allocation failure `value` is dropped and the list is unchanged.
    pub fn push_back(&mut self, value: T) -> AllocResult<()> {
        let node = self.alloc.allocate(1, self.tail)?;
        // SAFETY: node is fresh storage for one ListNode
        unsafe {
            self.alloc.construct(
                node,
                ListNode {
                    value,
                    prev: self.tail,
                    next: None,
                },
            );
        }

        match self.tail {
            // SAFETY: tail is a live node owned by this list
            Some(mut tail) => unsafe { tail.as_mut().next = Some(node) },
            None => self.head = Some(node),
        }
        self.tail = Some(node);
        self.len += 1;
        Ok(())
    }

    /// Prepends `value` at the front
    ///
    /// On allocation failure `value` is dropped and the list is unchanged.
    pub fn push_front(&mut self, value: T) -> AllocResult<()> {
        let node = self.alloc.allocate(1, self.head)?;
        // SAFETY: node is fresh storage for one ListNode
        unsafe {
            self.alloc.construct(
                node,
                ListNode {
                    value,
                    prev: None,
                    next: self.head,
                },
            );
        }

        match self.head {
            // SAFETY: head is a live node owned by this list
            Some(mut head) => unsafe { head.as_mut().prev = Some(node) },
            None => self.tail = Some(node),
        }
        self.head = Some(node);
        self.len += 1;
        Ok(())
    }

    /// Iterator from front to back
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            front: self.head,
            back: self.tail,
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    /// Destroys and releases every node
    pub fn clear(&mut self) {
        let mut cursor = self.head.take();
        self.tail = None;
        self.len = 0;

        while let Some(node) = cursor {
            // SAFETY: each node is live, unlinked from the list and released
            // exactly once
            unsafe {
                cursor = node.as_ref().next;
                self.alloc.destroy(node);
                self.alloc.deallocate(node, 1);
            }
        }
    }
}

impl<T, A: ElementAllocator<Value = T>> Drop for AllocList<T, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: fmt::Debug, A: ElementAllocator<Value = T>> fmt::Debug for AllocList<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T, A: ElementAllocator<Value = T>> IntoIterator for &'a AllocList<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator over an [`AllocList`]
pub struct Iter<'a, T> {
    front: Link<T>,
    back: Link<T>,
    remaining: usize,
    _marker: PhantomData<&'a ListNode<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        self.front.map(|node| {
            // SAFETY: the list outlives 'a and is not mutated while borrowed
            let node = unsafe { node.as_ref() };
            self.front = node.next;
            self.remaining -= 1;
            &node.value
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        self.back.map(|node| {
            // SAFETY: the list outlives 'a and is not mutated while borrowed
            let node = unsafe { node.as_ref() };
            self.back = node.prev;
            self.remaining -= 1;
            &node.value
        })
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::allocator::{CountingAllocator, PassThroughAllocator};

    #[test]
    fn test_push_both_ends() {
        let mut list = AllocList::new_in(PassThroughAllocator::<i32>::new());
        list.push_back(2).unwrap();
        list.push_back(3).unwrap();
        list.push_front(1).unwrap();

        assert_eq!(list.len(), 3);
        assert_eq!(list.front(), Some(&1));
        assert_eq!(list.back(), Some(&3));
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(format!("{list:?}"), "[1, 2, 3]");
    }

    #[test]
    fn test_iterates_from_both_ends() {
        let mut list = AllocList::new_in(PassThroughAllocator::<char>::new());
        for c in ['a', 'b', 'c', 'd'] {
            list.push_back(c).unwrap();
        }

        assert_eq!(list.iter().rev().collect::<String>(), "dcba");

        let mut iter = list.iter();
        assert_eq!(iter.next(), Some(&'a'));
        assert_eq!(iter.next_back(), Some(&'d'));
        assert_eq!(iter.next(), Some(&'b'));
        assert_eq!(iter.next_back(), Some(&'c'));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn test_one_allocation_per_node() {
        let mut list = AllocList::new_in(CountingAllocator::<u64>::new());
        for value in 0..5 {
            list.push_back(value).unwrap();
        }

        assert_eq!(list.allocator().live_allocations(), 5);
        assert_eq!(list.allocator().live_constructions(), 5);

        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.front(), None);
        assert!(list.allocator().counts().is_balanced());
    }

    #[test]
    fn test_empty_iteration() {
        let list = AllocList::new_in(PassThroughAllocator::<String>::new());
        let mut iter = list.iter();
        assert_eq!(iter.len(), 0);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }
}

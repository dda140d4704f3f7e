//! Arena-backed Fibonacci heap
//!
//! A Fibonacci heap is a mergeable priority queue with:
//! - O(1) amortized insert, find-min, meld, and decrease_key
//! - O(log n) amortized delete-min and arbitrary delete
//!
//! The structure is a forest of heap-ordered trees whose roots form a
//! circular doubly linked list, per Fredman and Tarjan's "Fibonacci Heaps and
//! Their Uses in Improved Network Optimization Algorithms" (JACM 34:3, 1987).
//! The cheap decrease_key is what makes it attractive for shortest-path and
//! MST style algorithms.
//!
//! All nodes live in an [`Arena`], a slot map that is their sole owner. Links
//! between nodes are plain generational keys rather than pointers, so the
//! cyclic parent/child/sibling graph needs no reference counting and stale
//! handles are detected instead of dangling. A [`Heap`] is a lightweight
//! handle naming the minimum root of one queue inside the arena; any number
//! of heaps can share an arena, and [`Arena::meld`] splices two of them in
//! O(1) without touching their nodes.
//!
//! # Example
//!
//! ```rust
//! use fibonacci_heap::{Arena, Heap};
//!
//! let mut arena = Arena::new();
//! let mut heap = Heap::new();
//!
//! let five = arena.insert(&mut heap, 5, "five");
//! arena.insert(&mut heap, 3, "three");
//! assert_eq!(arena.find_min(&heap), Some((&3, &"three")));
//!
//! arena.decrease_key(&mut heap, five, 1).unwrap();
//! assert_eq!(arena.find_min(&heap), Some((&1, &"five")));
//! assert_eq!(arena.delete_min(&mut heap), Some((1, "five")));
//! ```

mod dump;
mod heap;
mod validate;

pub use heap::{Arena, Heap, HeapError, NodeId};

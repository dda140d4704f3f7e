//! Core Fibonacci heap operations.
//!
//! Nodes are stored in a [`SlotMap`] arena and reference each other through
//! [`NodeId`] keys; the slot map's null key is the "no link" sentinel. Every
//! node is a member of exactly one circular sibling ring (the root ring of
//! its heap, or a parent's child ring), and a [`Heap`] is nothing more than
//! the key of its minimum root plus an element count.
//!
//! The public operations are thin orchestrators over four structural
//! primitives: ring splicing (`splice_one`, `splice_ring`), `link` (attach
//! one tree beneath another during consolidation), `cut` plus `cascade`
//! (detach a node and promote marked ancestors), and the rank-indexed
//! consolidation table in [`Arena::delete_min`].

use std::fmt;

use slotmap::{new_key_type, Key, SlotMap};

new_key_type! {
    /// Handle to a node in an [`Arena`].
    ///
    /// Returned by [`Arena::insert`] and consumed by [`Arena::decrease_key`]
    /// and [`Arena::delete`]. A `NodeId` stays valid across [`Arena::meld`]
    /// (nodes never move) and is invalidated the moment its node is removed
    /// by [`Arena::delete_min`] or [`Arena::delete`]. Keys are generational,
    /// so using an invalidated id afterwards panics rather than corrupting
    /// the structure; [`Arena::get`] can be used to probe liveness.
    pub struct NodeId;
}

/// Error returned by [`Arena::decrease_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// The proposed priority is greater than the node's current priority.
    OrderViolation,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::OrderViolation => {
                write!(f, "new priority is greater than current priority")
            }
        }
    }
}

impl std::error::Error for HeapError {}

#[derive(Debug)]
pub(crate) struct Node<T, P> {
    pub(crate) item: T,
    pub(crate) priority: P,
    /// Null while the node is a root.
    pub(crate) parent: NodeId,
    /// One representative member of the child ring; null if childless.
    pub(crate) child: NodeId,
    pub(crate) prev: NodeId,
    pub(crate) next: NodeId,
    /// Number of direct children (degree).
    pub(crate) rank: usize,
    /// Whether the node has lost a child since it last became a non-root.
    pub(crate) mark: bool,
}

/// One priority queue inside an [`Arena`].
///
/// A `Heap` identifies the minimum-valued root of its forest; the default
/// value is a valid empty heap. It is deliberately neither `Copy` nor
/// `Clone`: two handles onto the same root ring would let independent
/// mutations corrupt it, and melding a heap with itself becomes
/// unrepresentable because [`Arena::meld`] takes both heaps `&mut`.
#[derive(Debug, Default)]
pub struct Heap {
    pub(crate) min: NodeId,
    pub(crate) len: usize,
}

impl Heap {
    /// Creates an empty heap. Equivalent to `Heap::default()`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of elements in this heap.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if this heap contains no elements.
    pub fn is_empty(&self) -> bool {
        self.min.is_null()
    }
}

/// Owner of every node of every [`Heap`] built from it.
///
/// All heap operations are methods on the arena; the heaps themselves are
/// plain handles. Heaps and [`NodeId`]s must only be used with the arena
/// that created them — mixing arenas is a precondition violation that
/// panics in the best case and silently corrupts queues in the worst.
///
/// # Example
///
/// ```rust
/// use fibonacci_heap::{Arena, Heap};
///
/// let mut arena = Arena::new();
/// let mut a = Heap::new();
/// let mut b = Heap::new();
/// arena.insert(&mut a, 2, "two");
/// arena.insert(&mut b, 1, "one");
/// arena.meld(&mut a, &mut b);
/// assert!(b.is_empty());
/// assert_eq!(arena.delete_min(&mut a), Some((1, "one")));
/// ```
#[derive(Debug)]
pub struct Arena<T, P: Ord> {
    pub(crate) nodes: SlotMap<NodeId, Node<T, P>>,
}

impl<T, P: Ord> Default for Arena<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: Ord> Arena<T, P> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Creates an empty arena with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotMap::with_capacity_and_key(capacity),
        }
    }

    /// Returns the priority and item of `node`, or `None` if the node has
    /// been removed from its heap.
    pub fn get(&self, node: NodeId) -> Option<(&P, &T)> {
        self.nodes.get(node).map(|n| (&n.priority, &n.item))
    }

    /// Inserts `item` with `priority` into `heap` as a new singleton root.
    ///
    /// Returns a handle for later use with [`Arena::decrease_key`] or
    /// [`Arena::delete`]. O(1).
    pub fn insert(&mut self, heap: &mut Heap, priority: P, item: T) -> NodeId {
        let id = self.nodes.insert_with_key(|k| Node {
            item,
            priority,
            parent: NodeId::null(),
            child: NodeId::null(),
            prev: k,
            next: k,
            rank: 0,
            mark: false,
        });
        if heap.min.is_null() {
            heap.min = id;
        } else {
            self.splice_one(heap.min, id);
            if self.less(id, heap.min) {
                heap.min = id;
            }
        }
        heap.len += 1;
        id
    }

    /// Returns the minimum priority and its item, or `None` if `heap` is
    /// empty. O(1), no mutation.
    pub fn find_min(&self, heap: &Heap) -> Option<(&P, &T)> {
        self.nodes.get(heap.min).map(|n| (&n.priority, &n.item))
    }

    /// Merges all elements of `other` into `heap`, leaving `other` empty.
    ///
    /// The root rings are spliced in O(1); no node moves, so handles into
    /// `other` stay valid and now refer into `heap`. Both heaps must belong
    /// to this arena.
    pub fn meld(&mut self, heap: &mut Heap, other: &mut Heap) {
        if other.min.is_null() {
            return;
        }
        if heap.min.is_null() {
            heap.min = other.min;
        } else {
            self.splice_ring(heap.min, other.min);
            if self.less(other.min, heap.min) {
                heap.min = other.min;
            }
        }
        heap.len += other.len;
        *other = Heap::new();
    }

    /// Lowers the priority of `node` to `new_priority`.
    ///
    /// Returns [`HeapError::OrderViolation`] and leaves the heap unchanged
    /// if `new_priority` is greater than the current priority (equal is
    /// allowed). Otherwise the node is cut from its parent if it has one,
    /// spliced into the root ring, and marked ancestors are promoted by the
    /// cascading cut. Amortized O(1).
    ///
    /// # Panics
    ///
    /// Panics if `node` was already removed or belongs to another arena.
    pub fn decrease_key(
        &mut self,
        heap: &mut Heap,
        node: NodeId,
        new_priority: P,
    ) -> Result<(), HeapError> {
        if self.nodes[node].priority < new_priority {
            return Err(HeapError::OrderViolation);
        }
        self.nodes[node].priority = new_priority;
        if node == heap.min {
            // It was the minimum before and only got smaller.
            return Ok(());
        }
        if self.nodes[node].parent.is_null() {
            if self.less(node, heap.min) {
                heap.min = node;
            }
            return Ok(());
        }
        self.cut_and_promote(heap, node);
        if self.less(node, heap.min) {
            heap.min = node;
        }
        Ok(())
    }

    /// Removes the minimum element of `heap` and returns it, or `None` if
    /// the heap is empty.
    ///
    /// This is where all deferred restructuring happens: the remaining
    /// roots and the children of the removed minimum are consolidated until
    /// every surviving root has a distinct rank. Amortized O(log n).
    pub fn delete_min(&mut self, heap: &mut Heap) -> Option<(P, T)> {
        let min = heap.min;
        let node = self.nodes.remove(min)?;
        heap.len -= 1;

        // The linking step runs over a virtual list: the roots other than
        // the minimum, then the minimum's children. There is no point in
        // materializing it; each node goes straight into the rank table.
        let mut table: Vec<NodeId> = Vec::new();
        let mut r = node.next;
        while r != min {
            let n = self.nodes[r].next;
            self.add_root(&mut table, r);
            r = n;
        }
        let c = node.child;
        if !c.is_null() {
            self.nodes[c].parent = NodeId::null();
            self.nodes[c].mark = false;
            let mut r = self.nodes[c].next;
            self.add_root(&mut table, c);
            while r != c {
                let n = self.nodes[r].next;
                self.nodes[r].parent = NodeId::null();
                self.nodes[r].mark = false;
                self.add_root(&mut table, r);
                r = n;
            }
        }

        // Relink the survivors, which all have distinct ranks now, into a
        // fresh root ring and track the new minimum.
        heap.min = NodeId::null();
        for r in table {
            if r.is_null() {
                continue;
            }
            if heap.min.is_null() {
                heap.min = r;
            } else {
                self.splice_one(heap.min, r);
                if self.less(r, heap.min) {
                    heap.min = r;
                }
            }
        }
        Some((node.priority, node.item))
    }

    /// Removes `node` from `heap` and returns its priority and item.
    ///
    /// If `node` is the current minimum this is exactly [`Arena::delete_min`].
    /// Otherwise the node is cut out (with the same cascading cut as
    /// [`Arena::decrease_key`]) and its children are spliced into the root
    /// ring as-is; re-establishing rank uniqueness is left to the next
    /// `delete_min`. Amortized O(log n), O(1) when the node is not the
    /// minimum.
    ///
    /// # Panics
    ///
    /// Panics if `node` was already removed or belongs to another arena.
    pub fn delete(&mut self, heap: &mut Heap, node: NodeId) -> (P, T) {
        if node == heap.min {
            match self.delete_min(heap) {
                Some(entry) => return entry,
                None => panic!("delete: node does not belong to this heap"),
            }
        }
        if self.nodes[node].parent.is_null() {
            let prev = self.nodes[node].prev;
            let next = self.nodes[node].next;
            self.nodes[prev].next = next;
            self.nodes[next].prev = prev;
        } else {
            let parent = self.cut(node);
            self.cascade(heap, parent);
        }
        let removed = self.nodes.remove(node).unwrap();
        heap.len -= 1;

        let child = removed.child;
        if !child.is_null() {
            let mut c = child;
            loop {
                self.nodes[c].parent = NodeId::null();
                self.nodes[c].mark = false;
                c = self.nodes[c].next;
                if c == child {
                    break;
                }
            }
            self.splice_ring(heap.min, child);
        }
        (removed.priority, removed.item)
    }

    fn less(&self, a: NodeId, b: NodeId) -> bool {
        self.nodes[a].priority < self.nodes[b].priority
    }

    /// Splices `single` into the ring containing `list`, just before `list`.
    /// `single`'s own ring links need not be initialized.
    fn splice_one(&mut self, list: NodeId, single: NodeId) {
        let tail = self.nodes[list].prev;
        self.nodes[tail].next = single;
        self.nodes[single].prev = tail;
        self.nodes[single].next = list;
        self.nodes[list].prev = single;
    }

    /// Splices two disjoint rings, given one member of each, into one ring.
    fn splice_ring(&mut self, a: NodeId, b: NodeId) {
        let a_prev = self.nodes[a].prev;
        let b_prev = self.nodes[b].prev;
        self.nodes[a_prev].next = b;
        self.nodes[b_prev].next = a;
        self.nodes[a].prev = b_prev;
        self.nodes[b].prev = a_prev;
    }

    /// Attaches `child`, a detached tree root, beneath `parent`.
    fn link(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child].parent = parent;
        self.nodes[child].mark = false;
        let c = self.nodes[parent].child;
        if c.is_null() {
            self.nodes[child].prev = child;
            self.nodes[child].next = child;
            self.nodes[parent].child = child;
        } else {
            self.splice_one(c, child);
        }
        self.nodes[parent].rank += 1;
    }

    /// Detaches `node` from its parent's child ring, repairing the ring and
    /// the parent's rank and child link. Returns the parent, which the
    /// caller must run [`Arena::cascade`] on.
    fn cut(&mut self, node: NodeId) -> NodeId {
        let parent = self.nodes[node].parent;
        self.nodes[parent].rank -= 1;
        if self.nodes[parent].rank == 0 {
            self.nodes[parent].child = NodeId::null();
        } else {
            let prev = self.nodes[node].prev;
            let next = self.nodes[node].next;
            self.nodes[parent].child = next;
            self.nodes[prev].next = next;
            self.nodes[next].prev = prev;
        }
        parent
    }

    /// Makes `node`, just detached by [`Arena::cut`], a root of `heap`.
    fn promote(&mut self, heap: &Heap, node: NodeId) {
        self.nodes[node].parent = NodeId::null();
        self.nodes[node].mark = false;
        self.splice_one(heap.min, node);
    }

    fn cut_and_promote(&mut self, heap: &mut Heap, node: NodeId) {
        let parent = self.cut(node);
        self.promote(heap, node);
        self.cascade(heap, parent);
    }

    /// Walks up from a node that just lost a child. An unmarked non-root
    /// absorbs the loss and is marked; a marked one has now lost a second
    /// child and is promoted to a root, continuing the cascade at its own
    /// parent. Roots are never marked.
    fn cascade(&mut self, heap: &mut Heap, mut node: NodeId) {
        while !self.nodes[node].parent.is_null() {
            if !self.nodes[node].mark {
                self.nodes[node].mark = true;
                return;
            }
            let parent = self.cut(node);
            self.promote(heap, node);
            node = parent;
        }
    }

    /// Feeds one candidate root into the rank table, linking same-rank
    /// trees until the candidate lands on a free rank.
    fn add_root(&mut self, table: &mut Vec<NodeId>, mut r: NodeId) {
        self.nodes[r].prev = r;
        self.nodes[r].next = r;
        loop {
            let rank = self.nodes[r].rank;
            if rank >= table.len() {
                table.resize(rank + 1, NodeId::null());
            }
            if table[rank].is_null() {
                table[rank] = r;
                return;
            }
            let mut x = std::mem::replace(&mut table[rank], NodeId::null());
            if self.less(x, r) {
                std::mem::swap(&mut x, &mut r);
            }
            self.link(r, x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut arena = Arena::new();
        let mut heap = Heap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);
        assert_eq!(arena.find_min(&heap), None);

        arena.insert(&mut heap, 5, "a");
        arena.insert(&mut heap, 3, "b");
        arena.insert(&mut heap, 7, "c");

        assert_eq!(heap.len(), 3);
        assert_eq!(arena.find_min(&heap), Some((&3, &"b")));

        assert_eq!(arena.delete_min(&mut heap), Some((3, "b")));
        assert_eq!(arena.find_min(&heap), Some((&5, &"a")));
        assert_eq!(arena.delete_min(&mut heap), Some((5, "a")));
        assert_eq!(arena.delete_min(&mut heap), Some((7, "c")));
        assert_eq!(arena.delete_min(&mut heap), None);
        assert!(heap.is_empty());
        arena.validate(&heap).unwrap();
    }

    #[test]
    fn test_decrease_key() {
        let mut arena = Arena::new();
        let mut heap = Heap::new();
        let _h1 = arena.insert(&mut heap, 10, "a");
        let h2 = arena.insert(&mut heap, 20, "b");
        let h3 = arena.insert(&mut heap, 30, "c");

        assert_eq!(arena.find_min(&heap), Some((&10, &"a")));

        arena.decrease_key(&mut heap, h2, 5).unwrap();
        assert_eq!(arena.find_min(&heap), Some((&5, &"b")));

        arena.decrease_key(&mut heap, h3, 1).unwrap();
        assert_eq!(arena.find_min(&heap), Some((&1, &"c")));
        arena.validate(&heap).unwrap();
    }

    #[test]
    fn test_decrease_key_below_parent_cuts() {
        let mut arena = Arena::new();
        let mut heap = Heap::new();
        let mut handles = Vec::new();
        for i in 0..16 {
            handles.push(arena.insert(&mut heap, i * 10, i));
        }
        // Force consolidation so some nodes gain parents.
        assert_eq!(arena.delete_min(&mut heap), Some((0, 0)));
        arena.validate(&heap).unwrap();

        arena.decrease_key(&mut heap, handles[15], 1).unwrap();
        assert_eq!(arena.find_min(&heap), Some((&1, &15)));
        arena.validate(&heap).unwrap();

        arena.decrease_key(&mut heap, handles[14], 0).unwrap();
        assert_eq!(arena.find_min(&heap), Some((&0, &14)));
        arena.validate(&heap).unwrap();
    }

    #[test]
    fn test_decrease_key_order_violation() {
        let mut arena = Arena::new();
        let mut heap = Heap::new();
        let h = arena.insert(&mut heap, 10, "a");
        arena.insert(&mut heap, 5, "b");

        assert_eq!(
            arena.decrease_key(&mut heap, h, 11),
            Err(HeapError::OrderViolation)
        );
        // Structure untouched.
        assert_eq!(arena.get(h), Some((&10, &"a")));
        assert_eq!(arena.find_min(&heap), Some((&5, &"b")));
        assert_eq!(heap.len(), 2);
        arena.validate(&heap).unwrap();

        // Equal priority is allowed.
        assert_eq!(arena.decrease_key(&mut heap, h, 10), Ok(()));
    }

    #[test]
    fn test_meld() {
        let mut arena: Arena<&str, i32> = Arena::new();

        // Two empty heaps.
        let mut a = Heap::new();
        let mut b = Heap::new();
        arena.meld(&mut a, &mut b);
        assert!(a.is_empty() && b.is_empty());

        // Non-empty into empty.
        arena.insert(&mut b, 5, "b");
        arena.meld(&mut a, &mut b);
        assert!(b.is_empty());
        assert_eq!(arena.find_min(&a), Some((&5, &"b")));

        // Empty into non-empty.
        arena.meld(&mut a, &mut b);
        assert_eq!(arena.find_min(&a), Some((&5, &"b")));

        // Non-empty into non-empty; new minimum is the lesser of the two.
        arena.insert(&mut b, 3, "c");
        arena.insert(&mut b, 7, "d");
        arena.meld(&mut a, &mut b);
        assert!(b.is_empty());
        assert_eq!(b.len(), 0);
        assert_eq!(a.len(), 3);
        assert_eq!(arena.find_min(&a), Some((&3, &"c")));
        arena.validate(&a).unwrap();
        arena.validate(&b).unwrap();
    }

    #[test]
    fn test_handles_survive_meld() {
        let mut arena = Arena::new();
        let mut a = Heap::new();
        let mut b = Heap::new();
        arena.insert(&mut a, 10, "a");
        let hb = arena.insert(&mut b, 20, "b");

        arena.meld(&mut a, &mut b);
        arena.decrease_key(&mut a, hb, 1).unwrap();
        assert_eq!(arena.find_min(&a), Some((&1, &"b")));
        arena.validate(&a).unwrap();
    }

    #[test]
    fn test_delete_root() {
        let mut arena = Arena::new();
        let mut heap = Heap::new();
        let r = arena.insert(&mut heap, 20, "rat");
        arena.insert(&mut heap, 10, "cat");
        arena.insert(&mut heap, 30, "bat");

        assert_eq!(arena.delete(&mut heap, r), (20, "rat"));
        assert_eq!(heap.len(), 2);
        assert_eq!(arena.get(r), None);
        assert_eq!(arena.find_min(&heap), Some((&10, &"cat")));
        arena.validate(&heap).unwrap();
    }

    #[test]
    fn test_delete_min_node_delegates() {
        let mut arena = Arena::new();
        let mut heap = Heap::new();
        let m = arena.insert(&mut heap, 10, "cat");
        arena.insert(&mut heap, 20, "rat");

        assert_eq!(arena.delete(&mut heap, m), (10, "cat"));
        assert_eq!(arena.find_min(&heap), Some((&20, &"rat")));
        arena.validate(&heap).unwrap();
    }

    #[test]
    fn test_delete_internal_node() {
        let mut arena = Arena::new();
        let mut heap = Heap::new();
        let mut handles = Vec::new();
        for i in 0..32 {
            handles.push(arena.insert(&mut heap, i, i));
        }
        // Consolidate so most nodes are internal.
        assert_eq!(arena.delete_min(&mut heap), Some((0, 0)));
        arena.validate(&heap).unwrap();

        assert_eq!(arena.delete(&mut heap, handles[17]), (17, 17));
        assert_eq!(heap.len(), 30);
        arena.validate(&heap).unwrap();

        let mut expect: Vec<i32> = (1..32).filter(|&i| i != 17).collect();
        expect.sort();
        for v in expect {
            assert_eq!(arena.delete_min(&mut heap), Some((v, v)));
        }
        assert!(heap.is_empty());
    }

    #[test]
    fn test_stale_handle_is_detected() {
        let mut arena = Arena::new();
        let mut heap = Heap::new();
        let h = arena.insert(&mut heap, 1, "a");
        arena.insert(&mut heap, 2, "b");
        assert_eq!(arena.get(h), Some((&1, &"a")));
        arena.delete_min(&mut heap);
        assert_eq!(arena.get(h), None);
    }

    #[test]
    fn test_duplicate_priorities() {
        let mut arena = Arena::new();
        let mut heap = Heap::new();
        for _ in 0..10 {
            arena.insert(&mut heap, 7, "x");
        }
        arena.insert(&mut heap, 7, "y");
        for _ in 0..11 {
            let (p, _) = arena.delete_min(&mut heap).unwrap();
            assert_eq!(p, 7);
            arena.validate(&heap).unwrap();
        }
        assert!(heap.is_empty());
    }
}

//! Read-only structural validation, for tests and debugging.

use std::collections::HashSet;

use slotmap::Key;

use crate::heap::{Arena, Heap, NodeId};

impl<T, P: Ord> Arena<T, P> {
    /// Walks `heap` without mutating it and checks the structural
    /// invariants:
    ///
    /// 1. every node's rank equals the size of its child ring;
    /// 2. heap order holds between every parent and each direct child;
    /// 3. every root is parentless and unmarked;
    /// 4. every sibling ring is circular and mutually linked;
    /// 5. the tracked minimum carries the smallest priority in the heap,
    ///    and the node count matches `heap.len()`.
    ///
    /// Returns a description of the first violation found. This is a
    /// diagnostic for test code; the production operations never call it.
    pub fn validate(&self, heap: &Heap) -> Result<(), String> {
        if heap.min.is_null() {
            if heap.len != 0 {
                return Err(format!("empty heap reports len {}", heap.len));
            }
            return Ok(());
        }
        if !self.nodes.contains_key(heap.min) {
            return Err("tracked minimum is not a live node".to_string());
        }

        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut count = 0usize;

        let roots = self.ring_members(heap.min)?;
        for &root in &roots {
            if !self.nodes[root].parent.is_null() {
                return Err(format!("root {root:?} has a parent"));
            }
            if self.nodes[root].mark {
                return Err(format!("root {root:?} is marked"));
            }
            if self.nodes[root].priority < self.nodes[heap.min].priority {
                return Err(format!(
                    "root {root:?} is smaller than the tracked minimum"
                ));
            }
        }

        // Depth-first over every tree, checking each child ring as a unit.
        let mut stack = roots;
        while let Some(node) = stack.pop() {
            if !seen.insert(node) {
                return Err(format!("node {node:?} reachable twice"));
            }
            count += 1;

            let child = self.nodes[node].child;
            if child.is_null() {
                if self.nodes[node].rank != 0 {
                    return Err(format!(
                        "childless node {node:?} has rank {}",
                        self.nodes[node].rank
                    ));
                }
                continue;
            }
            let children = self.ring_members(child)?;
            if children.len() != self.nodes[node].rank {
                return Err(format!(
                    "node {node:?} has rank {} but {} children",
                    self.nodes[node].rank,
                    children.len()
                ));
            }
            for &c in &children {
                if self.nodes[c].parent != node {
                    return Err(format!(
                        "child {c:?} does not point back to parent {node:?}"
                    ));
                }
                if self.nodes[c].priority < self.nodes[node].priority {
                    return Err(format!(
                        "heap order violated between {node:?} and child {c:?}"
                    ));
                }
            }
            stack.extend(children);
        }

        if count != heap.len {
            return Err(format!(
                "heap reports len {} but {count} nodes are reachable",
                heap.len
            ));
        }
        Ok(())
    }

    /// Collects the members of the ring containing `start`, checking that
    /// each link is live and mutually consistent.
    pub(crate) fn ring_members(&self, start: NodeId) -> Result<Vec<NodeId>, String> {
        let mut members = Vec::new();
        let mut x = start;
        loop {
            if !self.nodes.contains_key(x) {
                return Err(format!("ring member {x:?} is not a live node"));
            }
            let next = self.nodes[x].next;
            let prev = self.nodes[x].prev;
            if !self.nodes.contains_key(next) || !self.nodes.contains_key(prev) {
                return Err(format!("ring links around {x:?} are dangling"));
            }
            if self.nodes[next].prev != x || self.nodes[prev].next != x {
                return Err(format!("ring links around {x:?} are inconsistent"));
            }
            members.push(x);
            if members.len() > self.nodes.len() {
                return Err(format!("ring through {start:?} does not close"));
            }
            x = next;
            if x == start {
                return Ok(members);
            }
        }
    }
}

//! Human-readable rendering of the forest, for debugging.

use std::fmt::{self, Write};

use slotmap::Key;

use crate::heap::{Arena, Heap, NodeId};

impl<T: fmt::Debug, P: Ord + fmt::Debug> Arena<T, P> {
    /// Renders `heap` breadth-first, one line per node: the root ring
    /// first, then each level of children. Intended for inspection while
    /// debugging; the format is not stable.
    pub fn dump(&self, heap: &Heap) -> String {
        let mut out = String::new();
        if heap.min.is_null() {
            out.push_str("empty heap\n");
            return out;
        }
        let node = &self.nodes[heap.min];
        let _ = writeln!(out, "min {:?} / {:?} ({:?})", node.priority, node.item, heap.min);

        let mut level = self.ring(heap.min);
        let _ = writeln!(out, "roots:");
        for depth in 1.. {
            for &id in &level {
                let n = &self.nodes[id];
                let _ = writeln!(
                    out,
                    "  {:?} {:?} / {:?} rank {} mark {}",
                    id, n.priority, n.item, n.rank, n.mark
                );
            }
            let next: Vec<NodeId> = level
                .iter()
                .filter(|&&id| !self.nodes[id].child.is_null())
                .flat_map(|&id| self.ring(self.nodes[id].child))
                .collect();
            if next.is_empty() {
                break;
            }
            let _ = writeln!(out, "level {depth}:");
            level = next;
        }
        out
    }

    fn ring(&self, start: NodeId) -> Vec<NodeId> {
        let mut members = vec![start];
        let mut x = self.nodes[start].next;
        while x != start {
            members.push(x);
            x = self.nodes[x].next;
        }
        members
    }
}

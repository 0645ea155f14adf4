//! Max-ordered queue of nodes waiting to be expanded.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use super::node::NodeId;

#[derive(Debug, PartialEq, Eq)]
struct Entry {
    score: u64,
    // Earlier pushes pop first among equal scores.
    seq: Reverse<u64>,
    id: NodeId,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue of pending nodes keyed by their score at push time.
///
/// Among nodes with equal scores, the one pushed first is popped first, which
/// makes the visiting order, and so a seeded search, reproducible.
#[derive(Debug, Default)]
pub struct Worklist {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
}

impl Worklist {
    /// Creates an empty worklist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a node behind every earlier node with the same score.
    ///
    /// # Arguments
    /// * `id`: The node to expand later.
    /// * `score`: Its priority. Later changes to the node's score do not reorder it.
    pub fn push(&mut self, id: NodeId, score: u64) {
        let seq = Reverse(self.next_seq);
        self.next_seq += 1;
        self.heap.push(Entry { score, seq, id });
    }

    /// Removes and returns the node with the greatest score.
    pub fn pop_max(&mut self) -> Option<NodeId> {
        self.heap.pop().map(|entry| entry.id)
    }

    /// True when no node is waiting.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of pending nodes.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Drops any pending entries and restarts the tie-break sequence,
    /// keeping the allocated storage for the next search.
    pub fn reset(&mut self) {
        self.heap.clear();
        self.next_seq = 0;
    }
}

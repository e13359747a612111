//! Min-ordered queue entries for the wavefront.

use std::cmp::Ordering;

/// Tentative distance of a pixel, keyed by its buffer offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct HeapNode {
    pub value: f32,
    pub offset: usize,
}

impl Eq for HeapNode {}

impl Ord for HeapNode {
    // Reversed so `BinaryHeap` pops the smallest value; ties pop the lower
    // offset first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .value
            .total_cmp(&self.value)
            .then_with(|| other.offset.cmp(&self.offset))
    }
}

impl PartialOrd for HeapNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

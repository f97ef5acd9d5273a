/// Streaming top-N selection by size.
///
/// The scan never holds the full list of entries: each entry is offered to a
/// bounded [`TopNSet`] as it arrives and only the N largest survive. A min-heap
/// keeps the current smallest survivor at the top so every offer is
/// O(log N) and rejection of small entries is O(1).
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// One retained item with its ranking key.
///
/// Ordered by size, then by *earlier* arrival, so that among equal sizes the
/// first-seen item ranks higher (stable tie-break).
#[derive(Debug)]
struct Slot<T> {
    size: u64,
    seq: u64,
    item: T,
}

impl<T> Slot<T> {
    #[inline]
    fn key(&self) -> (u64, Reverse<u64>) {
        (self.size, Reverse(self.seq))
    }
}

impl<T> PartialEq for Slot<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<T> Eq for Slot<T> {}

impl<T> PartialOrd for Slot<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Slot<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Bounded ranked collection of the `capacity` largest items seen so far.
#[derive(Debug)]
pub struct TopNSet<T> {
    capacity: usize,
    /// Arrival counter; every offer consumes one number, admitted or not.
    next_seq: u64,
    /// Min-heap over the ranking key: the top is the weakest survivor.
    heap: BinaryHeap<Reverse<Slot<T>>>,
}

impl<T> TopNSet<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            next_seq: 0,
            // Bound the up-front allocation; callers may pass huge N.
            heap: BinaryHeap::with_capacity(capacity.min(1_024) + 1),
        }
    }

    /// Offer an item. Returns `true` if it was admitted.
    ///
    /// A capacity of zero admits nothing and never panics.
    pub fn offer(&mut self, size: u64, item: T) -> bool {
        let slot = Slot {
            size,
            seq: self.next_seq,
            item,
        };
        self.next_seq += 1;

        if self.capacity == 0 {
            return false;
        }
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(slot));
            return true;
        }

        // Full: replace the weakest survivor only if the newcomer beats it.
        // Later arrivals lose ties, so an equal size is rejected.
        let admit = match self.heap.peek() {
            Some(Reverse(weakest)) => slot > *weakest,
            None => false,
        };
        if admit {
            self.heap.pop();
            self.heap.push(Reverse(slot));
        }
        admit
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Current ranking with sizes, largest first, without consuming the set.
    #[cfg(test)]
    fn ranked(&self) -> Vec<(u64, &T)> {
        let mut slots: Vec<&Slot<T>> = self.heap.iter().map(|Reverse(s)| s).collect();
        slots.sort_unstable_by(|a, b| b.cmp(a));
        slots.into_iter().map(|s| (s.size, &s.item)).collect()
    }

    /// Consume the set, returning items largest first.
    pub fn into_ranked(self) -> Vec<T> {
        // `into_sorted_vec` is ascending over `Reverse`, i.e. strongest first.
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(slot)| slot.item)
            .collect()
    }
}

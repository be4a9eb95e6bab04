//! A stable priority queue of pending orders, the basis for the Entry/Exit Stages' matching
//! loops.
//!
//! `std::collections::BinaryHeap` is a max-heap with no tiebreak guarantee between equal keys,
//! so entries carry an explicit monotonic sequence number and `Ord` is implemented to break
//! ties by earliest insertion.
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// An order awaiting a match, queued by [`PriceQueue`].
#[derive(Clone, Debug, PartialEq)]
pub struct PendingOrder<T> {
    pub limit_price: f64,
    pub remaining: f64,
    pub payload: T,
}

#[derive(Clone, Debug)]
struct Entry<T> {
    key: f64,
    seq: u64,
    order: PendingOrder<T>,
}

impl<T: PartialEq> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.seq == other.seq
    }
}
impl<T: PartialEq> Eq for Entry<T> {}

impl<T: PartialEq> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: PartialEq> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .partial_cmp(&other.key)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Ordering direction of a [`PriceQueue`]: `Max` pops the highest limit price first (for the
/// short/sell side), `Min` pops the lowest first (for the long/buy side).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueueOrder {
    Max,
    Min,
}

/// A priority queue of [`PendingOrder`]s, ordered by limit price with insertion order breaking
/// ties (earliest-queued order of equal price wins, matching FIFO price-time priority).
#[derive(Clone, Debug)]
pub struct PriceQueue<T> {
    order: QueueOrder,
    next_seq: u64,
    heap: BinaryHeap<Entry<T>>,
}

impl<T: PartialEq> PriceQueue<T> {
    pub fn new(order: QueueOrder) -> Self {
        Self {
            order,
            next_seq: 0,
            heap: BinaryHeap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn push(&mut self, limit_price: f64, remaining: f64, payload: T) {
        let key = match self.order {
            QueueOrder::Max => limit_price,
            QueueOrder::Min => -limit_price,
        };
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry {
            key,
            seq,
            order: PendingOrder {
                limit_price,
                remaining,
                payload,
            },
        });
    }

    /// Removes and returns the highest-priority order, if any.
    pub fn pop(&mut self) -> Option<PendingOrder<T>> {
        self.heap.pop().map(|entry| entry.order)
    }

    /// Peeks the highest-priority order's limit price without removing it.
    pub fn peek_price(&self) -> Option<f64> {
        self.heap.peek().map(|entry| entry.order.limit_price)
    }

    /// Re-queues a partially-filled order at its original limit price, preserving its original
    /// insertion priority over orders queued after it by assigning a fresh (later) sequence
    /// number — a partial fill goes to the back of its price level, not the front.
    pub fn push_back(&mut self, order: PendingOrder<T>) {
        self.push(order.limit_price, order.remaining, order.payload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_heap_pops_lowest_price_first() {
        let mut queue = PriceQueue::new(QueueOrder::Min);
        queue.push(101.0, 1.0, "a");
        queue.push(99.0, 1.0, "b");
        queue.push(100.0, 1.0, "c");
        assert_eq!(queue.pop().unwrap().payload, "b");
        assert_eq!(queue.pop().unwrap().payload, "c");
        assert_eq!(queue.pop().unwrap().payload, "a");
    }

    #[test]
    fn max_heap_pops_highest_price_first() {
        let mut queue = PriceQueue::new(QueueOrder::Max);
        queue.push(99.0, 1.0, "a");
        queue.push(101.0, 1.0, "b");
        queue.push(100.0, 1.0, "c");
        assert_eq!(queue.pop().unwrap().payload, "b");
        assert_eq!(queue.pop().unwrap().payload, "c");
        assert_eq!(queue.pop().unwrap().payload, "a");
    }

    #[test]
    fn equal_price_breaks_tie_by_insertion_order() {
        let mut queue = PriceQueue::new(QueueOrder::Max);
        queue.push(100.0, 1.0, "first");
        queue.push(100.0, 1.0, "second");
        assert_eq!(queue.pop().unwrap().payload, "first");
        assert_eq!(queue.pop().unwrap().payload, "second");
    }
}

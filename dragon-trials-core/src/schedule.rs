//! Logical-millisecond timeline used to sequence delayed game events.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Clone, Debug)]
struct Pending<T> {
    due_ms: u64,
    seq: u64,
    event: T,
}

impl<T> PartialEq for Pending<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.seq == other.seq
    }
}

impl<T> Eq for Pending<T> {}

impl<T> PartialOrd for Pending<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Pending<T> {
    // BinaryHeap is a max-heap; invert so the earliest entry pops first,
    // with the sequence number breaking ties FIFO.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Queue of events pinned to a logical clock.
///
/// Drivers pull due events one at a time with [`Schedule::pop_due_until`] so
/// that handlers which enqueue follow-up events do so relative to the moment
/// the popped event fired, then settle the clock with [`Schedule::settle_at`].
#[derive(Clone, Debug)]
pub struct Schedule<T> {
    now_ms: u64,
    seq: u64,
    queue: BinaryHeap<Pending<T>>,
}

impl<T> Default for Schedule<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Schedule<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    /// Current position of the logical clock.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Enqueue `event` to fire `delay_ms` after the current clock position.
    pub fn after(&mut self, delay_ms: u64, event: T) {
        let due_ms = self.now_ms.saturating_add(delay_ms);
        let seq = self.seq;
        self.seq += 1;
        self.queue.push(Pending { due_ms, seq, event });
    }

    /// Pop the next event due at or before `target_ms`, moving the clock to
    /// its due time. Returns `None` once nothing fires within the window.
    pub fn pop_due_until(&mut self, target_ms: u64) -> Option<T> {
        let due = self.queue.peek()?.due_ms;
        if due > target_ms {
            return None;
        }
        self.now_ms = self.now_ms.max(due);
        self.queue.pop().map(|pending| pending.event)
    }

    /// Move the clock forward to `target_ms` without firing anything.
    pub fn settle_at(&mut self, target_ms: u64) {
        self.now_ms = self.now_ms.max(target_ms);
    }

    /// Cancel every pending event.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Milliseconds until the next pending event, if any.
    pub fn next_due_in(&self) -> Option<u64> {
        self.queue
            .peek()
            .map(|pending| pending.due_ms.saturating_sub(self.now_ms))
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

//! Priority queue of pending tasks
//!
//! Highest weight pops first. Equal weights pop in submission order, so a
//! sweep over the same queue always dispatches in the same order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::task::Task;

struct Queued {
    weight: u8,
    seq: u64,
    task: Box<dyn Task>,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: larger weight wins, then the earlier sequence number
        self.weight.cmp(&other.weight).then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Tasks waiting to be dispatched
#[derive(Default)]
pub struct TaskQueue {
    heap: BinaryHeap<Queued>,
    next_seq: u64,
}

impl TaskQueue {
    /// Add a task
    pub fn push(&mut self, task: Box<dyn Task>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Queued {
            weight: task.priority().weight(),
            seq,
            task,
        });
    }

    /// Remove the highest-priority task
    pub fn pop(&mut self) -> Option<Box<dyn Task>> {
        self.heap.pop().map(|queued| queued.task)
    }

    /// Number of queued tasks
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Drop every queued task, returning how many there were
    pub fn clear(&mut self) -> usize {
        let dropped = self.heap.len();
        self.heap.clear();
        dropped
    }
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("len", &self.heap.len())
            .field("next_seq", &self.next_seq)
            .finish()
    }
}

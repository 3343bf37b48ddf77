//! Run Queue Management
//!
//! Provides the two queues the round-robin driver works from.
//!
//! - [`ReadyQueue`]: FIFO of processes that have arrived and wait for the CPU.
//!   Preempted processes and processes whose allocation failed go back to the
//!   tail.
//! - [`ArrivalQueue`]: processes that have not arrived yet, ordered by arrival
//!   time and then by input position. The input file need not be sorted.
//!
//! Both queues hold process indices only; process state lives in the
//! scheduler's process table.

use std::collections::VecDeque;

use entities_process::{ProcessDescriptor, ProcessIndex};

/// FIFO ready queue
#[derive(Debug, Clone, Default)]
pub struct ReadyQueue {
    queue: VecDeque<ProcessIndex>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a process at the tail
    pub fn enqueue(&mut self, process: ProcessIndex) {
        self.queue.push_back(process);
    }

    /// Dequeue the process at the head
    pub fn dequeue(&mut self) -> Option<ProcessIndex> {
        self.queue.pop_front()
    }

    pub fn front(&self) -> Option<ProcessIndex> {
        self.queue.front().copied()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn contains(&self, process: ProcessIndex) -> bool {
        self.queue.contains(&process)
    }

    /// Queued processes, head first
    pub fn iter(&self) -> impl Iterator<Item = ProcessIndex> + '_ {
        self.queue.iter().copied()
    }
}

/// Processes not yet admitted, in admission order
#[derive(Debug, Clone, Default)]
pub struct ArrivalQueue {
    /// (arrival time, process index), sorted
    pending: VecDeque<(u32, ProcessIndex)>,
}

impl ArrivalQueue {
    /// Order `descriptors` by `(arrival_time, input position)`
    pub fn new(descriptors: &[ProcessDescriptor]) -> Self {
        let mut pending: Vec<(u32, ProcessIndex)> = descriptors
            .iter()
            .enumerate()
            .map(|(index, descriptor)| (descriptor.arrival_time, index))
            .collect();
        pending.sort_unstable();
        Self {
            pending: pending.into(),
        }
    }

    /// Remove and return every process that has arrived by `now`
    pub fn take_arrived(&mut self, now: u32) -> Vec<ProcessIndex> {
        let mut arrived = Vec::new();
        while let Some(&(arrival, index)) = self.pending.front() {
            if arrival > now {
                break;
            }
            self.pending.pop_front();
            arrived.push(index);
        }
        arrived
    }

    /// Arrival time of the next process still to come
    pub fn next_arrival(&self) -> Option<u32> {
        self.pending.front().map(|&(arrival, _)| arrival)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

//! Process Entity
//!
//! Provides the Process struct and related types for the simulator.
//!
//! A process is created from a [`ProcessDescriptor`] read from the input and
//! lives for the whole run. Its memory state records either the contiguous block
//! or the page frames it holds, depending on the active strategy; the process
//! only keeps a block id or frame indices, never the memory records themselves.

use entities_memory::BlockId;

/// Position of a process in the input (and in every per-process table)
pub type ProcessIndex = usize;

/// Longest process name accepted
pub const MAX_NAME_LEN: usize = 7;

/// Static description of a process as read from the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessDescriptor {
    /// Simulated time at which the process becomes ready
    pub arrival_time: u32,
    /// Unique process name
    pub name: String,
    /// Total CPU time the process needs
    pub service_time: u32,
    /// Memory the process needs, in KB
    pub memory_requirement: u32,
}

impl ProcessDescriptor {
    pub fn new(arrival_time: u32, name: impl Into<String>, service_time: u32, memory_requirement: u32) -> Self {
        Self {
            arrival_time,
            name: name.into(),
            service_time,
            memory_requirement,
        }
    }
}

/// Scheduling state of a process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    /// Arrival time not reached yet
    Pending,
    /// Waiting in the ready queue
    Ready,
    /// Dispatched for the current quantum
    Running,
    /// All service time consumed
    Finished,
}

impl ProcessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessStatus::Pending => "PENDING",
            ProcessStatus::Ready => "READY",
            ProcessStatus::Running => "RUNNING",
            ProcessStatus::Finished => "FINISHED",
        }
    }
}

/// Memory held by one process
///
/// Exactly one of `block` and `frames` is meaningful, depending on the active
/// strategy. `allocated` is the runnable flag: under virtual memory a process may
/// still hold a few frames while not runnable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessMemory {
    /// Frame indices in the order they were assigned
    frames: Vec<usize>,
    /// Contiguous block held under first-fit
    block: Option<BlockId>,
    allocated: bool,
}

impl ProcessMemory {
    pub fn frames(&self) -> &[usize] {
        &self.frames
    }

    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn block(&self) -> Option<BlockId> {
        self.block
    }

    pub fn set_block(&mut self, block: Option<BlockId>) {
        self.block = block;
    }

    pub fn is_allocated(&self) -> bool {
        self.allocated
    }

    pub fn set_allocated(&mut self, allocated: bool) {
        self.allocated = allocated;
    }

    /// Make room for `capacity` frames up front
    ///
    /// Called on the first allocation request so retries reuse the same buffer.
    pub fn reserve_frames(&mut self, capacity: usize) {
        self.frames.reserve(capacity.saturating_sub(self.frames.len()));
    }

    /// Append newly assigned frames after the ones already held
    pub fn extend_frames(&mut self, frames: &[usize]) {
        self.frames.extend_from_slice(frames);
    }

    /// Keep only the first `len` frames (rollback of a short top-up)
    pub fn truncate_frames(&mut self, len: usize) {
        self.frames.truncate(len);
    }

    /// Remove the first `count` frames, keeping the order of the rest
    ///
    /// # Returns
    /// The removed frame indices
    pub fn take_front_frames(&mut self, count: usize) -> Vec<usize> {
        let count = count.min(self.frames.len());
        self.frames.drain(..count).collect()
    }

    /// Forget every frame and the block, and mark not runnable
    ///
    /// # Returns
    /// The frames that were held
    pub fn clear(&mut self) -> Vec<usize> {
        self.block = None;
        self.allocated = false;
        std::mem::take(&mut self.frames)
    }
}

/// Simulated process
#[derive(Debug, Clone)]
pub struct Process {
    descriptor: ProcessDescriptor,
    remaining_time: u32,
    completion_time: Option<u32>,
    status: ProcessStatus,
    memory: ProcessMemory,
}

impl Process {
    /// Create a pending process with all of its service time left
    pub fn new(descriptor: ProcessDescriptor) -> Self {
        Self {
            remaining_time: descriptor.service_time,
            descriptor,
            completion_time: None,
            status: ProcessStatus::Pending,
            memory: ProcessMemory::default(),
        }
    }

    pub fn descriptor(&self) -> &ProcessDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn arrival_time(&self) -> u32 {
        self.descriptor.arrival_time
    }

    pub fn service_time(&self) -> u32 {
        self.descriptor.service_time
    }

    /// Memory requirement in KB
    pub fn memory_requirement(&self) -> u32 {
        self.descriptor.memory_requirement
    }

    pub fn remaining_time(&self) -> u32 {
        self.remaining_time
    }

    pub fn status(&self) -> ProcessStatus {
        self.status
    }

    pub fn set_status(&mut self, status: ProcessStatus) {
        self.status = status;
    }

    pub fn memory(&self) -> &ProcessMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut ProcessMemory {
        &mut self.memory
    }

    pub fn is_finished(&self) -> bool {
        self.status == ProcessStatus::Finished
    }

    /// Consume one quantum of service time
    ///
    /// # Returns
    /// `true` if no service time is left afterwards
    pub fn run_for(&mut self, quantum: u32) -> bool {
        self.remaining_time = self.remaining_time.saturating_sub(quantum);
        self.remaining_time == 0
    }

    /// Mark the process finished at `time`
    pub fn complete(&mut self, time: u32) {
        self.status = ProcessStatus::Finished;
        self.remaining_time = 0;
        self.completion_time = Some(time);
    }

    pub fn completion_time(&self) -> Option<u32> {
        self.completion_time
    }

    /// Completion record, once the process has finished
    pub fn completion_record(&self) -> Option<CompletionRecord> {
        self.completion_time.map(|completion_time| CompletionRecord {
            name: self.descriptor.name.clone(),
            arrival_time: self.descriptor.arrival_time,
            service_time: self.descriptor.service_time,
            completion_time,
        })
    }
}

/// Timing of a finished process, input to performance statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRecord {
    pub name: String,
    pub arrival_time: u32,
    pub service_time: u32,
    pub completion_time: u32,
}

impl CompletionRecord {
    /// Completion time minus arrival time
    pub fn turnaround_time(&self) -> u32 {
        self.completion_time.saturating_sub(self.arrival_time)
    }

    /// Turnaround time divided by service time
    pub fn overhead(&self) -> f64 {
        if self.service_time == 0 {
            return 0.0;
        }
        self.turnaround_time() as f64 / self.service_time as f64
    }
}

//! Round-Robin Scheduler
//!
//! Drives the simulation: admits arrived processes, dispatches the head of the
//! ready queue for one quantum and asks the active allocator for memory on
//! every dispatch of a process that is not runnable yet.
//!
//! ## Dispatch cycle
//!
//! Each iteration of the loop:
//!
//! 1. admits every process whose arrival time has been reached
//! 2. puts the process preempted by the previous quantum back at the tail
//! 3. dequeues the head; with an empty queue the clock idles one quantum
//! 4. allocates memory if needed; on failure the process goes back to the tail
//!    and no time passes
//! 5. runs the process for one quantum, recording the dispatch time for LRU
//!
//! A RUNNING event is published only when the dispatched process is not the
//! one that ran the previous quantum. When a process finishes, its memory is
//! released (an EVICTED event under the paged strategies), arrivals up to the
//! completion time are admitted and a FINISHED event reports the queue length.

use std::fmt;
use std::io;

use entities_process::{
    CompletionRecord, Process, ProcessDescriptor, ProcessIndex, ProcessStatus, RecencyTable, TraceEvent, TraceSink,
};
use usecases_memory_management::{create_allocator, AllocationError, MemoryAllocator, MemoryContext};

use crate::config::{ConfigError, SimulationConfig};
use crate::run_queue::{ArrivalQueue, ReadyQueue};

/// Scheduler error types
#[derive(Debug)]
pub enum ScheduleError {
    /// Allocator bookkeeping is broken
    Allocation(AllocationError),
    /// Every ready process failed allocation and nothing can change that
    Stalled { time: u32, waiting: usize },
    /// The trace sink failed
    TraceOutput(io::Error),
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::Allocation(err) => write!(f, "{}", err),
            ScheduleError::Stalled { time, waiting } => write!(
                f,
                "Simulation stalled at time {}: none of the {} ready processes can be allocated",
                time, waiting
            ),
            ScheduleError::TraceOutput(err) => write!(f, "Failed to write trace: {}", err),
        }
    }
}

impl std::error::Error for ScheduleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScheduleError::Allocation(err) => Some(err),
            ScheduleError::TraceOutput(err) => Some(err),
            ScheduleError::Stalled { .. } => None,
        }
    }
}

impl From<AllocationError> for ScheduleError {
    fn from(err: AllocationError) -> Self {
        ScheduleError::Allocation(err)
    }
}

impl From<io::Error> for ScheduleError {
    fn from(err: io::Error) -> Self {
        ScheduleError::TraceOutput(err)
    }
}

/// Outcome of a complete run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationReport {
    /// One record per process, in input order
    pub completions: Vec<CompletionRecord>,
    /// Simulated time when the last process finished
    pub makespan: u32,
}

/// Round-robin scheduler state
pub struct Scheduler {
    config: SimulationConfig,
    processes: Vec<Process>,
    allocator: Box<dyn MemoryAllocator>,
    recency: RecencyTable,
    ready: ReadyQueue,
    arrivals: ArrivalQueue,
    time: u32,
    /// Process that ran the previous quantum and was not finished by it
    interrupted: Option<ProcessIndex>,
    completed: usize,
    /// Consecutive allocation failures since the last dispatch
    failed_attempts: usize,
    /// Events produced by the allocator, not yet forwarded
    pending_events: Vec<TraceEvent>,
}

impl Scheduler {
    /// Create a scheduler for `descriptors` using the standard memory geometry
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::RequirementTooLarge` for a process the configured
    /// strategy could never admit.
    pub fn new(config: SimulationConfig, descriptors: Vec<ProcessDescriptor>) -> Result<Self, ConfigError> {
        Self::with_allocator(config, descriptors, create_allocator(config.strategy()))
    }

    /// Create a scheduler around an existing allocator
    pub fn with_allocator(
        config: SimulationConfig,
        descriptors: Vec<ProcessDescriptor>,
        allocator: Box<dyn MemoryAllocator>,
    ) -> Result<Self, ConfigError> {
        if let Some(descriptor) = descriptors
            .iter()
            .find(|descriptor| !allocator.can_ever_fit(descriptor.memory_requirement))
        {
            return Err(ConfigError::RequirementTooLarge {
                name: descriptor.name.clone(),
                requirement_kb: descriptor.memory_requirement,
                strategy: config.strategy(),
            });
        }

        let arrivals = ArrivalQueue::new(&descriptors);
        let processes: Vec<Process> = descriptors.into_iter().map(Process::new).collect();
        Ok(Self {
            config,
            recency: RecencyTable::new(processes.len()),
            processes,
            allocator,
            ready: ReadyQueue::new(),
            arrivals,
            time: 0,
            interrupted: None,
            completed: 0,
            failed_attempts: 0,
            pending_events: Vec::new(),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn allocator(&self) -> &dyn MemoryAllocator {
        self.allocator.as_ref()
    }

    /// Current simulated time
    pub fn time(&self) -> u32 {
        self.time
    }

    pub fn ready_queue(&self) -> &ReadyQueue {
        &self.ready
    }

    pub fn is_complete(&self) -> bool {
        self.completed == self.processes.len()
    }

    /// Run until every process has finished
    ///
    /// # Arguments
    /// * `sink` - Receives every trace event in simulated-time order
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError` on broken allocator bookkeeping, a stall, or a
    /// failing sink. The trace written so far stays valid up to that point.
    pub fn run(&mut self, sink: &mut dyn TraceSink) -> Result<SimulationReport, ScheduleError> {
        log::info!(
            "simulating {} processes with {} memory, quantum {}",
            self.processes.len(),
            self.config.strategy(),
            self.config.quantum()
        );
        while !self.is_complete() {
            self.step(sink)?;
        }
        log::info!("all processes finished at time {}", self.time);
        Ok(self.report())
    }

    /// Execute one iteration of the dispatch cycle
    pub fn step(&mut self, sink: &mut dyn TraceSink) -> Result<(), ScheduleError> {
        self.admit_arrivals();

        let previous = self.interrupted.take();
        if let Some(index) = previous {
            self.processes[index].set_status(ProcessStatus::Ready);
            self.ready.enqueue(index);
        }

        let Some(index) = self.ready.dequeue() else {
            log::trace!("idle at time {}", self.time);
            self.time += self.config.quantum().get();
            return Ok(());
        };

        if !self.processes[index].memory().is_allocated() && !self.try_allocate(index, sink)? {
            self.ready.enqueue(index);
            self.failed_attempts += 1;
            if self.failed_attempts >= self.ready.len() {
                log::warn!(
                    "no ready process can be allocated at time {} ({} waiting)",
                    self.time,
                    self.ready.len()
                );
                return Err(ScheduleError::Stalled {
                    time: self.time,
                    waiting: self.ready.len(),
                });
            }
            return Ok(());
        }
        self.failed_attempts = 0;

        self.dispatch(index, previous, sink)
    }

    /// Simulation results so far
    pub fn report(&self) -> SimulationReport {
        SimulationReport {
            completions: self.processes.iter().filter_map(Process::completion_record).collect(),
            makespan: self.time,
        }
    }

    fn admit_arrivals(&mut self) {
        for index in self.arrivals.take_arrived(self.time) {
            log::trace!("{} arrives at time {}", self.processes[index].name(), self.time);
            self.processes[index].set_status(ProcessStatus::Ready);
            self.ready.enqueue(index);
        }
    }

    /// Ask the allocator for memory, forwarding any eviction notices
    fn try_allocate(&mut self, index: ProcessIndex, sink: &mut dyn TraceSink) -> Result<bool, ScheduleError> {
        let mut ctx = MemoryContext {
            processes: &mut self.processes,
            recency: &self.recency,
            now: self.time,
            events: &mut self.pending_events,
        };
        let outcome = self.allocator.allocate(index, &mut ctx)?;
        self.allocator.check_invariants()?;
        self.flush_events(sink)?;
        Ok(outcome.is_allocated())
    }

    fn dispatch(
        &mut self,
        index: ProcessIndex,
        previous: Option<ProcessIndex>,
        sink: &mut dyn TraceSink,
    ) -> Result<(), ScheduleError> {
        let now = self.time;
        let process = &mut self.processes[index];
        process.set_status(ProcessStatus::Running);
        if previous != Some(index) {
            sink.emit(&TraceEvent::Running {
                time: now,
                name: process.name().to_string(),
                remaining_time: process.remaining_time(),
                memory: self.allocator.memory_view(process),
            })?;
        }
        log::trace!("dispatch {} at time {}", process.name(), now);
        self.recency.record_dispatch(index, now);
        self.allocator.on_dispatch(process, now);

        let quantum = self.config.quantum().get();
        let finished = process.run_for(quantum);
        self.time += quantum;
        if finished {
            self.finish(index, sink)
        } else {
            self.interrupted = Some(index);
            Ok(())
        }
    }

    fn finish(&mut self, index: ProcessIndex, sink: &mut dyn TraceSink) -> Result<(), ScheduleError> {
        self.processes[index].complete(self.time);
        self.completed += 1;

        let mut ctx = MemoryContext {
            processes: &mut self.processes,
            recency: &self.recency,
            now: self.time,
            events: &mut self.pending_events,
        };
        self.allocator.release(index, &mut ctx)?;
        self.allocator.check_invariants()?;
        self.flush_events(sink)?;

        self.admit_arrivals();
        let process = &self.processes[index];
        log::debug!("{} finished at time {}", process.name(), self.time);
        sink.emit(&TraceEvent::Finished {
            time: self.time,
            name: process.name().to_string(),
            proc_remaining: self.ready.len(),
        })?;
        Ok(())
    }

    fn flush_events(&mut self, sink: &mut dyn TraceSink) -> Result<(), ScheduleError> {
        for event in self.pending_events.drain(..) {
            sink.emit(&event)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entities_process::MemoryView;
    use usecases_memory_management::MemoryStrategy;

    fn scheduler(strategy: MemoryStrategy, quantum: u32, descriptors: Vec<ProcessDescriptor>) -> Scheduler {
        Scheduler::new(SimulationConfig::new(strategy, quantum).unwrap(), descriptors).unwrap()
    }

    #[test]
    fn test_single_process_runs_to_completion() {
        let mut sched = scheduler(
            MemoryStrategy::Infinite,
            2,
            vec![ProcessDescriptor::new(0, "P1", 5, 100)],
        );
        let mut events: Vec<TraceEvent> = Vec::new();
        let report = sched.run(&mut events).unwrap();
        assert_eq!(
            events,
            vec![
                TraceEvent::Running {
                    time: 0,
                    name: "P1".to_string(),
                    remaining_time: 5,
                    memory: MemoryView::Unlimited,
                },
                TraceEvent::Finished {
                    time: 6,
                    name: "P1".to_string(),
                    proc_remaining: 0,
                },
            ]
        );
        assert_eq!(report.makespan, 6);
        assert_eq!(report.completions[0].completion_time, 6);
    }

    #[test]
    fn test_idle_ticks_until_first_arrival() {
        let mut sched = scheduler(
            MemoryStrategy::Infinite,
            3,
            vec![ProcessDescriptor::new(4, "late", 1, 10)],
        );
        let mut events: Vec<TraceEvent> = Vec::new();
        sched.run(&mut events).unwrap();
        // idle at 0 and 3, dispatched at 6
        assert_eq!(events[0].time(), 6);
        assert_eq!(sched.time(), 9);
    }

    #[test]
    fn test_requirement_too_large_is_rejected() {
        let config = SimulationConfig::new(MemoryStrategy::FirstFit, 1).unwrap();
        let result = Scheduler::new(config, vec![ProcessDescriptor::new(0, "big", 1, 4096)]);
        assert!(matches!(result, Err(ConfigError::RequirementTooLarge { .. })));

        let config = SimulationConfig::new(MemoryStrategy::Virtual, 1).unwrap();
        assert!(Scheduler::new(config, vec![ProcessDescriptor::new(0, "big", 1, 4096)]).is_ok());
    }

    #[test]
    fn test_stall_is_reported() {
        use entities_memory::{BlockList, BlockState};
        use usecases_memory_management::FirstFitAllocator;

        // 100 KB permanently taken out of a 150 KB space: a 60 KB process never fits
        let blocks = BlockList::from_layout(&[(BlockState::Used, 100), (BlockState::Hole, 50)]).unwrap();
        let config = SimulationConfig::new(MemoryStrategy::FirstFit, 1).unwrap();
        let mut sched = Scheduler::with_allocator(
            config,
            vec![ProcessDescriptor::new(0, "P1", 1, 60)],
            Box::new(FirstFitAllocator::with_blocks(blocks)),
        )
        .unwrap();
        let mut events: Vec<TraceEvent> = Vec::new();
        let err = sched.run(&mut events).unwrap_err();
        assert!(matches!(err, ScheduleError::Stalled { time: 0, waiting: 1 }));
        assert!(events.is_empty());
    }

    #[test]
    fn test_schedule_error_display() {
        let err = ScheduleError::Stalled { time: 4, waiting: 2 };
        assert_eq!(
            format!("{}", err),
            "Simulation stalled at time 4: none of the 2 ready processes can be allocated"
        );
        let err: ScheduleError = AllocationError::UnknownProcess(3).into();
        assert!(std::error::Error::source(&err).is_some());
    }
}

//! Use Cases Layer: Process Scheduling
//!
//! Provides the round-robin scheduler that drives the memory simulation.
//!
//! ## Overview
//!
//! The `usecases_scheduling` crate owns the simulation loop. It keeps the
//! process table, the ready and arrival queues, the dispatch recency table and
//! the simulated clock, and calls into the configured
//! [`MemoryAllocator`](usecases_memory_management::MemoryAllocator) whenever a
//! dispatched process has no memory. Observable events go to a
//! [`TraceSink`](entities_process::TraceSink) supplied by the caller.
//!
//! ## Modules
//!
//! - **[`config`](config/index.html)**: Strategy and quantum validation
//!
//! - **[`run_queue`](run_queue/index.html)**: FIFO ready queue and arrival ordering
//!
//! - **[`scheduler`](scheduler/index.html)**: The dispatch loop, completion handling and
//!   the scheduler error type
//!
//! ## Examples
//!
//! ```rust
//! use entities_process::{ProcessDescriptor, TraceEvent};
//! use usecases_memory_management::MemoryStrategy;
//! use usecases_scheduling::{Scheduler, SimulationConfig};
//!
//! let config = SimulationConfig::new(MemoryStrategy::Paged, 2).unwrap();
//! let mut scheduler = Scheduler::new(config, vec![ProcessDescriptor::new(0, "P1", 4, 64)]).unwrap();
//! let mut events: Vec<TraceEvent> = Vec::new();
//! let report = scheduler.run(&mut events).unwrap();
//! assert_eq!(report.makespan, 4);
//! ```
//!
//! ## See Also
//!
//! - [`usecases_memory_management`](../usecases_memory_management/index.html): Allocation strategies
//! - [`entities_process`](../entities_process/index.html): Process entity and trace events

pub mod config;
pub mod run_queue;
pub mod scheduler;

pub use config::{ConfigError, Quantum, SimulationConfig};
pub use run_queue::{ArrivalQueue, ReadyQueue};
pub use scheduler::{ScheduleError, Scheduler, SimulationReport};

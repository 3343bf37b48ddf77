//! Entities Layer: Process Management
//!
//! Provides the simulated process entity and the records that surround it: the
//! per-process memory state, the dispatch recency table used for LRU eviction,
//! the trace events emitted while the simulation runs and the completion
//! records from which performance statistics are computed.
//!
//! The [`TraceSink`] trait lets the scheduler and allocators publish events
//! without depending on how (or whether) they are printed.

pub mod process;
pub mod recency;
pub mod trace;

// Re-export main types for convenience
pub use process::{
    CompletionRecord, Process, ProcessDescriptor, ProcessIndex, ProcessMemory, ProcessStatus,
    MAX_NAME_LEN,
};
pub use recency::RecencyTable;
pub use trace::{MemoryView, TraceEvent, TraceSink};

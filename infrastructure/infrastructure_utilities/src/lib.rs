//! Infrastructure Layer: Utilities
//!
//! Provides the I/O edges of the simulator: reading the process file,
//! rendering trace events as text lines and computing the closing performance
//! statistics. Depends on the Entities layer only (dependencies flow inward).
//!
//! ## Modules
//!
//! - **[`process_loading`](process_loading/index.html)**: Parses the whitespace-separated
//!   process file into process descriptors, reporting errors with line numbers
//!
//! - **[`trace_format`](trace_format/index.html)**: Trace line formatting and a
//!   [`TraceSink`](entities_process::TraceSink) that writes lines to any `io::Write`
//!
//! - **[`statistics`](statistics/index.html)**: Turnaround, overhead and makespan summary

pub mod process_loading;
pub mod statistics;
pub mod trace_format;

pub use process_loading::{load_processes, parse_processes, ParseError};
pub use statistics::PerformanceStats;
pub use trace_format::{format_event, format_frames, TraceWriter};

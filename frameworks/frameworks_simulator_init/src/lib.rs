//! Frameworks Layer: Simulator Initialization
//!
//! Wires the layers together for the `allocate` binary: validated
//! configuration, the process file, the round-robin scheduler and the trace
//! and summary output.
//!
//! ## Overview
//!
//! The `frameworks_simulator_init` crate is the outermost layer of the
//! workspace. It owns no simulation logic; [`run_simulation`] only connects:
//! - Infrastructure layer: process file loading, trace writer, statistics
//! - Use cases layer: configuration, scheduler, allocators
//!
//! ## Modules
//!
//! - **[`args`](args/index.html)**: Command-line argument parsing
//!
//! ## Output
//!
//! Trace lines and the performance summary go to the supplied writer (stdout
//! for the binary); diagnostics go through `log` to stderr.

pub mod args;

use std::fmt;
use std::io::{self, Write};
use std::path::Path;

use infrastructure_utilities::{load_processes, ParseError, PerformanceStats, TraceWriter};
use usecases_scheduling::{ConfigError, ScheduleError, Scheduler, SimulationConfig};

pub use args::SimulatorArgs;

/// Any error that ends a simulator run
#[derive(Debug)]
pub enum SimulatorError {
    /// Invalid strategy, quantum or workload
    Config(ConfigError),
    /// The process file could not be read
    Parse(ParseError),
    /// The simulation itself failed
    Schedule(ScheduleError),
    /// Writing the summary failed
    Output(io::Error),
}

impl fmt::Display for SimulatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulatorError::Config(err) => write!(f, "{}", err),
            SimulatorError::Parse(err) => write!(f, "{}", err),
            SimulatorError::Schedule(err) => write!(f, "{}", err),
            SimulatorError::Output(err) => write!(f, "Failed to write output: {}", err),
        }
    }
}

impl std::error::Error for SimulatorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulatorError::Config(err) => Some(err),
            SimulatorError::Parse(err) => Some(err),
            SimulatorError::Schedule(err) => Some(err),
            SimulatorError::Output(err) => Some(err),
        }
    }
}

impl From<ConfigError> for SimulatorError {
    fn from(err: ConfigError) -> Self {
        SimulatorError::Config(err)
    }
}

impl From<ParseError> for SimulatorError {
    fn from(err: ParseError) -> Self {
        SimulatorError::Parse(err)
    }
}

impl From<ScheduleError> for SimulatorError {
    fn from(err: ScheduleError) -> Self {
        SimulatorError::Schedule(err)
    }
}

impl From<io::Error> for SimulatorError {
    fn from(err: io::Error) -> Self {
        SimulatorError::Output(err)
    }
}

/// Run a whole simulation and write its trace and summary to `out`
///
/// # Arguments
/// * `config` - Validated strategy and quantum
/// * `file` - Process file to load
/// * `out` - Destination of trace lines and summary
///
/// # Returns
/// The summary statistics that were written
pub fn run_simulation(
    config: SimulationConfig,
    file: &Path,
    out: &mut dyn Write,
) -> Result<PerformanceStats, SimulatorError> {
    let descriptors = load_processes(file)?;
    let mut scheduler = Scheduler::new(config, descriptors)?;

    let mut writer = TraceWriter::new(&mut *out);
    let report = scheduler.run(&mut writer)?;
    log::debug!("{} trace lines written", writer.lines());

    let stats = PerformanceStats::compute(&report.completions, report.makespan);
    writeln!(out, "{}", stats)?;
    out.flush()?;
    Ok(stats)
}

/// Entry point used by the binary after argument parsing
pub fn run(args: &SimulatorArgs, out: &mut dyn Write) -> Result<PerformanceStats, SimulatorError> {
    let config = args.config()?;
    run_simulation(config, &args.file, out)
}

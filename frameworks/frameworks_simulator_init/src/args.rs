//! Command-Line Argument Parsing Module
//!
//! Provides argument parsing for the `allocate` binary.
//! Uses clap for type-safe argument parsing; strategy and quantum are kept as
//! text here and validated into a [`SimulationConfig`] afterwards so invalid
//! values produce the simulator's own error messages.

use std::path::PathBuf;

use clap::Parser;
use usecases_scheduling::{ConfigError, SimulationConfig};

/// Memory allocation simulator command-line arguments
#[derive(Parser, Debug)]
#[command(name = "allocate")]
#[command(about = "Simulates round-robin scheduling under different memory allocation strategies")]
pub struct SimulatorArgs {
    /// Process file: one `<arrival> <name> <service> <memory-kb>` per line
    #[arg(short = 'f', long = "file")]
    pub file: PathBuf,

    /// Memory strategy: infinite, first-fit, paged or virtual
    #[arg(short = 'm', long = "memory", default_value = "infinite")]
    pub memory: String,

    /// Scheduling quantum, 1 to 3
    #[arg(short = 'q', long = "quantum")]
    pub quantum: String,
}

impl SimulatorArgs {
    /// Validate strategy and quantum
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidStrategy` or `ConfigError::InvalidQuantum`.
    pub fn config(&self) -> Result<SimulationConfig, ConfigError> {
        SimulationConfig::parse(&self.memory, &self.quantum)
    }
}

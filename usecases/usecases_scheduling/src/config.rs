//! Simulation Configuration
//!
//! Validated settings for one simulation run: the memory strategy and the
//! scheduling quantum. Everything else about the machine (memory size, frame
//! size, minimum runnable frames) is fixed.
//!
//! Values arrive as text from the command line; this module turns them into
//! typed settings or a [`ConfigError`] before the simulation loop starts.

use std::fmt;
use std::str::FromStr;

use usecases_memory_management::{MemoryStrategy, UnknownStrategy};

/// Configuration errors
///
/// Detected before the first dispatch; all of them are fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Strategy name is not one of `infinite`, `first-fit`, `paged`, `virtual`
    InvalidStrategy(String),
    /// Quantum is not an integer in `1..=3`
    InvalidQuantum(String),
    /// A process could never be admitted under the chosen strategy
    RequirementTooLarge {
        name: String,
        requirement_kb: u32,
        strategy: MemoryStrategy,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidStrategy(name) => write!(f, "Invalid memory strategy {}", name),
            ConfigError::InvalidQuantum(value) => write!(f, "Invalid quantum time of {}", value),
            ConfigError::RequirementTooLarge {
                name,
                requirement_kb,
                strategy,
            } => write!(
                f,
                "Process {} needs {} KB and can never run under {} memory",
                name, requirement_kb, strategy
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<UnknownStrategy> for ConfigError {
    fn from(err: UnknownStrategy) -> Self {
        ConfigError::InvalidStrategy(err.0)
    }
}

/// Scheduling quantum, always in `1..=3`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantum(u32);

impl Quantum {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 3;

    /// Validate a quantum value
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidQuantum` outside `1..=3`.
    pub fn new(value: u32) -> Result<Self, ConfigError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ConfigError::InvalidQuantum(value.to_string()))
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl FromStr for Quantum {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidQuantum(s.to_string()))?;
        Quantum::new(value)
    }
}

impl fmt::Display for Quantum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Settings for one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    strategy: MemoryStrategy,
    quantum: Quantum,
}

impl SimulationConfig {
    /// Build a configuration, re-validating the quantum
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidQuantum` if `quantum` is outside `1..=3`.
    pub fn new(strategy: MemoryStrategy, quantum: u32) -> Result<Self, ConfigError> {
        Ok(Self {
            strategy,
            quantum: Quantum::new(quantum)?,
        })
    }

    /// Build a configuration from command-line text
    ///
    /// # Arguments
    /// * `strategy` - Strategy name, e.g. `first-fit`
    /// * `quantum` - Quantum as typed by the user
    pub fn parse(strategy: &str, quantum: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            strategy: strategy.parse()?,
            quantum: quantum.parse()?,
        })
    }

    pub fn strategy(&self) -> MemoryStrategy {
        self.strategy
    }

    pub fn quantum(&self) -> Quantum {
        self.quantum
    }
}

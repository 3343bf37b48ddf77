//! Allocator Trait and Types
//!
//! Defines the allocator interface and strategy selection for the simulator.
//!
//! ## Overview
//!
//! Every strategy answers two questions for the scheduler: can this process
//! get its memory now (`allocate`), and take back everything a finished process
//! holds (`release`). An allocation that cannot be satisfied right now is not
//! an error; it is reported as [`AllocationOutcome::NotAllocated`] and the
//! scheduler retries on a later dispatch. Errors are reserved for broken
//! bookkeeping and abort the run.
//!
//! ## Strategies
//!
//! - **Infinite**: Memory is never a constraint
//! - **FirstFit**: Contiguous blocks, first sufficient hole in address order
//! - **Paged**: 4 KB frames, all-or-nothing, whole-process LRU eviction
//! - **Virtual**: 4 KB frames, partial admission, frame-granular LRU eviction
//!
//! ## Examples
//!
//! ```rust
//! use usecases_memory_management::{create_allocator, MemoryStrategy};
//!
//! let strategy: MemoryStrategy = "first-fit".parse().unwrap();
//! let allocator = create_allocator(strategy);
//! assert_eq!(allocator.strategy(), MemoryStrategy::FirstFit);
//! ```

use std::fmt;
use std::str::FromStr;

use entities_memory::MemoryTableError;
use entities_process::{MemoryView, Process, ProcessIndex, RecencyTable, TraceEvent};

use crate::firstfit::FirstFitAllocator;
use crate::infinite::InfiniteAllocator;
use crate::paged::PagedAllocator;
use crate::virtual_memory::VirtualAllocator;

/// Memory allocation strategy types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryStrategy {
    /// Unlimited memory
    Infinite,
    /// Contiguous first-fit allocation
    FirstFit,
    /// Fixed-size paging with whole-process eviction
    Paged,
    /// Paging with partial admission and frame-granular eviction
    Virtual,
}

impl MemoryStrategy {
    /// Every strategy, in command-line order
    pub const ALL: [MemoryStrategy; 4] = [
        MemoryStrategy::Infinite,
        MemoryStrategy::FirstFit,
        MemoryStrategy::Paged,
        MemoryStrategy::Virtual,
    ];

    /// Name used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryStrategy::Infinite => "infinite",
            MemoryStrategy::FirstFit => "first-fit",
            MemoryStrategy::Paged => "paged",
            MemoryStrategy::Virtual => "virtual",
        }
    }

    /// Whether the strategy manages page frames
    pub fn uses_frames(&self) -> bool {
        matches!(self, MemoryStrategy::Paged | MemoryStrategy::Virtual)
    }
}

impl fmt::Display for MemoryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A strategy name that does not match any known strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStrategy(pub String);

impl fmt::Display for UnknownStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid memory strategy {}", self.0)
    }
}

impl std::error::Error for UnknownStrategy {}

impl FromStr for MemoryStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MemoryStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}

/// Result of an allocation attempt that did not hit a bookkeeping bug
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationOutcome {
    /// The process now holds enough memory to run
    Allocated,
    /// Resources are exhausted for now; nothing was changed, retry later
    NotAllocated,
}

impl AllocationOutcome {
    pub fn is_allocated(&self) -> bool {
        matches!(self, AllocationOutcome::Allocated)
    }
}

/// Allocation errors
///
/// All variants are fatal: they mean the block or frame accounting can no
/// longer be trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// Eviction or allocation logic reached a state it asserts cannot happen
    InvariantViolation(String),
    /// The process index is not part of the simulation
    UnknownProcess(ProcessIndex),
    /// The underlying memory table rejected an operation
    Table(MemoryTableError),
}

impl fmt::Display for AllocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationError::InvariantViolation(msg) => write!(f, "Allocator invariant violated: {}", msg),
            AllocationError::UnknownProcess(index) => write!(f, "Unknown process index {}", index),
            AllocationError::Table(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AllocationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AllocationError::Table(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MemoryTableError> for AllocationError {
    fn from(err: MemoryTableError) -> Self {
        AllocationError::Table(err)
    }
}

/// Simulation state an allocator may read or mutate during one call
///
/// Allocators push eviction notices into `events` in the order they happen;
/// the scheduler forwards them to the trace sink before anything else it emits.
pub struct MemoryContext<'a> {
    /// Every process of the run, indexed by [`ProcessIndex`]
    pub processes: &'a mut [Process],
    /// Last-dispatch times for LRU victim selection
    pub recency: &'a RecencyTable,
    /// Current simulated time
    pub now: u32,
    /// Outgoing trace events
    pub events: &'a mut Vec<TraceEvent>,
}

impl<'a> MemoryContext<'a> {
    pub fn process(&self, index: ProcessIndex) -> Result<&Process, AllocationError> {
        self.processes.get(index).ok_or(AllocationError::UnknownProcess(index))
    }

    pub fn process_mut(&mut self, index: ProcessIndex) -> Result<&mut Process, AllocationError> {
        self.processes
            .get_mut(index)
            .ok_or(AllocationError::UnknownProcess(index))
    }
}

/// Allocator trait for the memory strategies
///
/// Implementations must never leave partially mutated state behind when they
/// report [`AllocationOutcome::NotAllocated`]: anything touched during the
/// attempt is rolled back first.
pub trait MemoryAllocator {
    /// Strategy implemented by this allocator
    fn strategy(&self) -> MemoryStrategy;

    /// Try to give `requester` enough memory to run
    ///
    /// May evict other processes (paged strategies), pushing one
    /// `TraceEvent::Evicted` per eviction into `ctx.events` before the frames
    /// are released.
    ///
    /// # Errors
    ///
    /// Returns an `AllocationError` only for bookkeeping bugs.
    fn allocate(
        &mut self,
        requester: ProcessIndex,
        ctx: &mut MemoryContext<'_>,
    ) -> Result<AllocationOutcome, AllocationError>;

    /// Take back everything `process` holds (called when it finishes)
    fn release(&mut self, process: ProcessIndex, ctx: &mut MemoryContext<'_>) -> Result<(), AllocationError>;

    /// Memory details reported when `process` is dispatched
    fn memory_view(&self, process: &Process) -> MemoryView;

    /// Hook called each time `process` is dispatched at `now`
    fn on_dispatch(&mut self, _process: &Process, _now: u32) {}

    /// Whether a request of `requirement_kb` could ever be satisfied
    fn can_ever_fit(&self, _requirement_kb: u32) -> bool {
        true
    }

    /// Verify the allocator's own table is consistent
    fn check_invariants(&self) -> Result<(), AllocationError> {
        Ok(())
    }
}

/// Build the allocator for `strategy` with the standard memory geometry
pub fn create_allocator(strategy: MemoryStrategy) -> Box<dyn MemoryAllocator> {
    match strategy {
        MemoryStrategy::Infinite => Box::new(InfiniteAllocator::new()),
        MemoryStrategy::FirstFit => Box::new(FirstFitAllocator::new()),
        MemoryStrategy::Paged => Box::new(PagedAllocator::new()),
        MemoryStrategy::Virtual => Box::new(VirtualAllocator::new()),
    }
}

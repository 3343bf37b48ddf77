//! Entities Layer: Memory Tables
//!
//! Provides the two physical-memory bookkeeping structures shared by every
//! allocation strategy of the simulator.
//!
//! ## Overview
//!
//! The `entities_memory` crate is the innermost layer of the simulator workspace.
//! It owns no policy: it only knows how to split, merge, claim and release, and
//! how to verify that its own accounting is still consistent. Allocation
//! policies (first-fit, paging, virtual memory) live in
//! `usecases_memory_management` and drive these tables.
//!
//! ## Modules
//!
//! - **[`constants`](constants/index.html)**: Fixed memory geometry (2048 KB, 4 KB frames,
//!   512 frames, minimum runnable frame count) and the rounding helpers used for usage
//!   percentages and frame counts
//!
//! - **[`block`](block/index.html)**: Index-addressed, address-ordered doubly-linked arena of
//!   contiguous memory blocks with splitting and coalescing
//!
//! - **[`frame`](frame/index.html)**: Fixed-size page frame table with an always-consistent
//!   in-use counter
//!
//! ## See Also
//!
//! - [`usecases_memory_management`](../usecases_memory_management/index.html): Allocation strategies

pub mod block;
pub mod constants;
pub mod frame;

pub use block::{Block, BlockId, BlockList, BlockState};
pub use constants::{
    ceil_percent, frames_for, FRAME_SIZE_KB, MEMORY_SIZE_KB, MIN_PAGE_ALLOCATION, TOTAL_FRAMES,
};
pub use frame::{Frame, FrameTable};

use std::fmt;

/// Errors raised when a memory table is used inconsistently
///
/// Every variant indicates a bookkeeping bug in the caller or in the table
/// itself. None of them is recoverable by retrying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryTableError {
    /// A table invariant no longer holds (gap, overlap, adjacent holes, counter drift)
    IntegrityViolation(String),
    /// A block layout handed to [`BlockList::from_layout`] is not a valid list
    InvalidLayout(String),
    /// A block id does not refer to a live block record
    UnknownBlock(BlockId),
    /// The block is already a hole
    BlockNotUsed(BlockId),
    /// A frame index is outside the table
    FrameOutOfRange(usize),
    /// The frame is not currently allocated
    FrameNotAllocated(usize),
}

impl fmt::Display for MemoryTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryTableError::IntegrityViolation(msg) => write!(f, "Memory table integrity violation: {}", msg),
            MemoryTableError::InvalidLayout(msg) => write!(f, "Invalid block layout: {}", msg),
            MemoryTableError::UnknownBlock(id) => write!(f, "Unknown memory block {}", id),
            MemoryTableError::BlockNotUsed(id) => write!(f, "Memory block {} is not in use", id),
            MemoryTableError::FrameOutOfRange(index) => write!(f, "Frame {} is out of range", index),
            MemoryTableError::FrameNotAllocated(index) => write!(f, "Frame {} is not allocated", index),
        }
    }
}

impl std::error::Error for MemoryTableError {}

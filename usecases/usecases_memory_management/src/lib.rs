//! Use Cases Layer: Memory Management
//!
//! Provides the memory allocation strategies of the simulator. Each strategy
//! implements the same [`MemoryAllocator`] contract so the scheduler never
//! branches on the active policy.
//!
//! ## Allocation Strategies
//!
//! - **[`infinite`](infinite/index.html)**: Unlimited memory - every request succeeds
//!
//! - **[`firstfit`](firstfit/index.html)**: Contiguous first-fit allocator - first hole in
//!   address order that is large enough, with block splitting and coalescing; never evicts
//!
//! - **[`paged`](paged/index.html)**: Fixed-size paging - whole requirement or nothing,
//!   evicting whole processes in least-recently-used order when frames run out
//!
//! - **[`virtual_memory`](virtual_memory/index.html)**: Paging with partial admission - runs a
//!   process with as few as four frames, evicting individual frames from LRU processes
//!
//! - **[`allocator`](allocator/index.html)**: Common allocator interface, strategy selection
//!   and error types
//!
//! - **[`eviction`](eviction/index.html)**: LRU victim planning shared by the paged strategies
//!
//! ## Architecture
//!
//! Allocators own their memory table (block list or frame table). Everything
//! else they need (all processes, the recency table, the current time and the
//! outgoing event buffer) is passed in explicitly through a [`MemoryContext`].
//!
//! ## See Also
//!
//! - [`entities_memory`](../entities_memory/index.html): Block list and frame table
//! - [`entities_process`](../entities_process/index.html): Process memory state

pub mod allocator;
pub mod eviction;
pub mod firstfit;
pub mod infinite;
pub mod paged;
pub mod virtual_memory;

pub use allocator::{
    create_allocator, AllocationError, AllocationOutcome, MemoryAllocator, MemoryContext, MemoryStrategy,
    UnknownStrategy,
};
pub use firstfit::FirstFitAllocator;
pub use infinite::InfiniteAllocator;
pub use paged::PagedAllocator;
pub use virtual_memory::VirtualAllocator;

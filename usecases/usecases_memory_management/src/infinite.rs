//! Infinite Allocator
//!
//! Memory is never a constraint: every request succeeds immediately and nothing
//! is tracked beyond the runnable flag.

use entities_process::{MemoryView, Process, ProcessIndex};

use crate::allocator::{AllocationError, AllocationOutcome, MemoryAllocator, MemoryContext, MemoryStrategy};

/// Allocator for unlimited memory
#[derive(Debug, Default)]
pub struct InfiniteAllocator;

impl InfiniteAllocator {
    pub fn new() -> Self {
        Self
    }
}

impl MemoryAllocator for InfiniteAllocator {
    fn strategy(&self) -> MemoryStrategy {
        MemoryStrategy::Infinite
    }

    fn allocate(
        &mut self,
        requester: ProcessIndex,
        ctx: &mut MemoryContext<'_>,
    ) -> Result<AllocationOutcome, AllocationError> {
        ctx.process_mut(requester)?.memory_mut().set_allocated(true);
        Ok(AllocationOutcome::Allocated)
    }

    fn release(&mut self, process: ProcessIndex, ctx: &mut MemoryContext<'_>) -> Result<(), AllocationError> {
        ctx.process_mut(process)?.memory_mut().clear();
        Ok(())
    }

    fn memory_view(&self, _process: &Process) -> MemoryView {
        MemoryView::Unlimited
    }
}

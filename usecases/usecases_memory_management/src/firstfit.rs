//! First-Fit Allocator
//!
//! Implements contiguous first-fit allocation over the fixed 2048 KB address
//! space.
//!
//! First-fit scans the block list in ascending address order and takes the
//! first hole large enough for the request: no best-fit, no next-fit. A larger
//! hole is split, the remainder staying behind as a new hole right after the
//! claimed block. Releasing a block relabels it as a hole and coalesces every
//! run of adjacent holes. This strategy never evicts; a request that does not
//! fit waits for other processes to finish.

use entities_memory::{ceil_percent, BlockId, BlockList, MEMORY_SIZE_KB};
use entities_process::{MemoryView, Process, ProcessIndex};

use crate::allocator::{AllocationError, AllocationOutcome, MemoryAllocator, MemoryContext, MemoryStrategy};

/// First-fit allocator implementation
///
/// Owns the block list exclusively; processes only keep the id of their block.
#[derive(Debug, Clone)]
pub struct FirstFitAllocator {
    blocks: BlockList,
}

impl FirstFitAllocator {
    /// Allocator over a single 2048 KB hole
    pub fn new() -> Self {
        Self::with_blocks(BlockList::new(MEMORY_SIZE_KB))
    }

    /// Allocator over an existing block list (e.g. a fragmented layout)
    pub fn with_blocks(blocks: BlockList) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &BlockList {
        &self.blocks
    }

    /// First hole, in address order, of at least `requirement` KB
    pub fn find_first_fit(&self, requirement: u32) -> Option<BlockId> {
        self.blocks
            .iter()
            .find(|(_, block)| block.is_hole() && block.length() >= requirement)
            .map(|(id, _)| id)
    }

    /// Claim `requirement` KB from the first sufficient hole
    ///
    /// # Returns
    /// * `Ok(Some(id))` - the block now used for the request
    /// * `Ok(None)` - no hole is large enough; nothing changed
    pub fn allocate_block(&mut self, requirement: u32) -> Result<Option<BlockId>, AllocationError> {
        let Some(id) = self.find_first_fit(requirement) else {
            return Ok(None);
        };
        self.blocks.claim(id, requirement)?;
        Ok(Some(id))
    }

    /// Return a block to the free pool, coalescing neighbouring holes
    pub fn release_block(&mut self, id: BlockId) -> Result<(), AllocationError> {
        self.blocks.release(id)?;
        Ok(())
    }

    /// Memory in use, rounded-up percent of the address space
    pub fn usage_percent(&self) -> u32 {
        ceil_percent(self.blocks.used_size() as u64, self.blocks.total_size() as u64)
    }
}

impl Default for FirstFitAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAllocator for FirstFitAllocator {
    fn strategy(&self) -> MemoryStrategy {
        MemoryStrategy::FirstFit
    }

    fn allocate(
        &mut self,
        requester: ProcessIndex,
        ctx: &mut MemoryContext<'_>,
    ) -> Result<AllocationOutcome, AllocationError> {
        let process = ctx.process_mut(requester)?;
        if let Some(held) = process.memory().block() {
            return Err(AllocationError::InvariantViolation(format!(
                "process {} already holds block {}",
                process.name(),
                held
            )));
        }

        let requirement = process.memory_requirement();
        match self.allocate_block(requirement)? {
            Some(id) => {
                let memory = process.memory_mut();
                memory.set_block(Some(id));
                memory.set_allocated(true);
                log::debug!(
                    "first-fit: {} KB for {} at {}",
                    requirement,
                    process.name(),
                    self.blocks.get(id).map_or(0, |block| block.start())
                );
                Ok(AllocationOutcome::Allocated)
            }
            None => {
                log::debug!(
                    "first-fit: no hole of {} KB for {} ({} KB free)",
                    requirement,
                    process.name(),
                    self.blocks.free_size()
                );
                Ok(AllocationOutcome::NotAllocated)
            }
        }
    }

    fn release(&mut self, process: ProcessIndex, ctx: &mut MemoryContext<'_>) -> Result<(), AllocationError> {
        let memory = ctx.process_mut(process)?.memory_mut();
        if let Some(id) = memory.block() {
            self.release_block(id)?;
        }
        memory.clear();
        Ok(())
    }

    fn memory_view(&self, process: &Process) -> MemoryView {
        let address = process
            .memory()
            .block()
            .and_then(|id| self.blocks.get(id))
            .map_or(0, |block| block.start());
        MemoryView::Contiguous {
            usage_percent: self.usage_percent(),
            address,
        }
    }

    fn can_ever_fit(&self, requirement_kb: u32) -> bool {
        requirement_kb <= self.blocks.total_size()
    }

    fn check_invariants(&self) -> Result<(), AllocationError> {
        self.blocks.check_integrity()?;
        Ok(())
    }
}

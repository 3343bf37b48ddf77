//! Paged Allocator
//!
//! Implements fixed-size paging over the 512-frame table.
//!
//! A process needs `ceil(requirement / 4 KB)` frames and gets all of them or
//! none. Frames are handed out greedily by ascending frame index. When too few
//! frames are free, whole processes are evicted in least-recently-used order
//! until the request fits; each eviction publishes an `EVICTED` notice listing
//! the victim's frames before they are released.

use entities_memory::{frames_for, FrameTable, TOTAL_FRAMES};
use entities_process::{MemoryView, Process, ProcessIndex, ProcessMemory, TraceEvent};

use crate::allocator::{AllocationError, AllocationOutcome, MemoryAllocator, MemoryContext, MemoryStrategy};
use crate::eviction::plan_whole_process;

/// Paged allocator implementation
#[derive(Debug, Clone)]
pub struct PagedAllocator {
    table: FrameTable,
}

impl PagedAllocator {
    pub fn new() -> Self {
        Self::with_frames(TOTAL_FRAMES)
    }

    /// Allocator over a table of `count` frames
    pub fn with_frames(count: usize) -> Self {
        Self {
            table: FrameTable::new(count),
        }
    }

    pub fn frame_table(&self) -> &FrameTable {
        &self.table
    }
}

impl Default for PagedAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Append `count` frames to `memory`, or none at all
///
/// New frames continue the process's logical page numbering. If the table
/// cannot supply `count` frames, only the frames added by this call are given
/// back and `memory` keeps exactly what it held before.
///
/// # Returns
/// `true` if all `count` frames were appended
pub(crate) fn claim_frames(
    table: &mut FrameTable,
    memory: &mut ProcessMemory,
    count: usize,
) -> Result<bool, AllocationError> {
    let held = memory.num_frames();
    let claimed = table.claim_lowest(count, held);
    memory.extend_frames(&claimed);
    if claimed.len() < count {
        table.release_all(&claimed)?;
        memory.truncate_frames(held);
        return Ok(false);
    }
    Ok(true)
}

/// Take every frame from `victim`, publishing the eviction notice first
pub(crate) fn evict_whole_process(
    table: &mut FrameTable,
    ctx: &mut MemoryContext<'_>,
    victim: ProcessIndex,
) -> Result<(), AllocationError> {
    let now = ctx.now;
    let process = ctx.process_mut(victim)?;
    let frames = process.memory().frames().to_vec();
    log::debug!("evicting all {} frames of {}", frames.len(), process.name());

    ctx.events.push(TraceEvent::Evicted {
        time: now,
        frames: frames.clone(),
    });
    table.release_all(&frames)?;
    ctx.process_mut(victim)?.memory_mut().clear();
    Ok(())
}

impl MemoryAllocator for PagedAllocator {
    fn strategy(&self) -> MemoryStrategy {
        MemoryStrategy::Paged
    }

    fn allocate(
        &mut self,
        requester: ProcessIndex,
        ctx: &mut MemoryContext<'_>,
    ) -> Result<AllocationOutcome, AllocationError> {
        let process = ctx.process_mut(requester)?;
        let required = frames_for(process.memory_requirement());
        if process.memory().num_frames() > 0 {
            return Err(AllocationError::InvariantViolation(format!(
                "process {} requests frames while holding {}",
                process.name(),
                process.memory().num_frames()
            )));
        }
        process.memory_mut().reserve_frames(required);

        let free = self.table.free_frames();
        if free < required {
            let Some(victims) = plan_whole_process(ctx.processes, ctx.recency, requester, required - free) else {
                log::debug!(
                    "paged: {} frames needed, {} free and not enough to evict",
                    required,
                    free
                );
                return Ok(AllocationOutcome::NotAllocated);
            };
            for victim in victims {
                evict_whole_process(&mut self.table, ctx, victim)?;
            }
        }

        let process = ctx.process_mut(requester)?;
        if !claim_frames(&mut self.table, process.memory_mut(), required)? {
            return Err(AllocationError::InvariantViolation(format!(
                "{} frames still unavailable for {} after eviction",
                required,
                process.name()
            )));
        }
        process.memory_mut().set_allocated(true);
        log::debug!("paged: {} frames for {}", required, process.name());
        Ok(AllocationOutcome::Allocated)
    }

    fn release(&mut self, process: ProcessIndex, ctx: &mut MemoryContext<'_>) -> Result<(), AllocationError> {
        evict_whole_process(&mut self.table, ctx, process)
    }

    fn memory_view(&self, process: &Process) -> MemoryView {
        MemoryView::Framed {
            usage_percent: self.table.usage_percent(),
            frames: process.memory().frames().to_vec(),
        }
    }

    fn on_dispatch(&mut self, process: &Process, now: u32) {
        self.table.touch(process.memory().frames(), now);
    }

    fn can_ever_fit(&self, requirement_kb: u32) -> bool {
        frames_for(requirement_kb) <= self.table.len()
    }

    fn check_invariants(&self) -> Result<(), AllocationError> {
        self.table.check_conservation()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entities_process::{ProcessDescriptor, RecencyTable};

    #[test]
    fn test_claim_frames_rolls_back_short_claim() {
        let mut table = FrameTable::new(5);
        let mut memory = ProcessMemory::default();
        assert!(claim_frames(&mut table, &mut memory, 2).unwrap());
        assert!(!claim_frames(&mut table, &mut memory, 4).unwrap());
        assert_eq!(memory.frames(), &[0, 1]);
        assert_eq!(table.frames_in_use(), 2);
        table.check_conservation().unwrap();
    }

    #[test]
    fn test_allocates_ascending_frames() {
        let mut processes = vec![
            Process::new(ProcessDescriptor::new(0, "A", 4, 10)),
            Process::new(ProcessDescriptor::new(0, "B", 4, 8)),
        ];
        let recency = RecencyTable::new(2);
        let mut events = Vec::new();
        let mut ctx = MemoryContext {
            processes: &mut processes,
            recency: &recency,
            now: 0,
            events: &mut events,
        };
        let mut allocator = PagedAllocator::new();
        allocator.allocate(0, &mut ctx).unwrap();
        allocator.allocate(1, &mut ctx).unwrap();
        assert_eq!(ctx.processes[0].memory().frames(), &[0, 1, 2]);
        assert_eq!(ctx.processes[1].memory().frames(), &[3, 4]);
        assert_eq!(allocator.frame_table().frames_in_use(), 5);
        assert!(events.is_empty());
    }

    #[test]
    fn test_release_publishes_frames() {
        let mut processes = vec![Process::new(ProcessDescriptor::new(0, "A", 4, 10))];
        let recency = RecencyTable::new(1);
        let mut events = Vec::new();
        let mut ctx = MemoryContext {
            processes: &mut processes,
            recency: &recency,
            now: 12,
            events: &mut events,
        };
        let mut allocator = PagedAllocator::new();
        allocator.allocate(0, &mut ctx).unwrap();
        allocator.release(0, &mut ctx).unwrap();
        assert!(!ctx.processes[0].memory().is_allocated());
        assert_eq!(allocator.frame_table().frames_in_use(), 0);
        assert_eq!(events, vec![TraceEvent::Evicted { time: 12, frames: vec![0, 1, 2] }]);
    }
}

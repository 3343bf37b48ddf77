//! Virtual Memory Allocator
//!
//! Paging with partial admission: a process may run once it holds at least
//! `min(required, 4)` frames, even if it needs more.
//!
//! ## Admission ladder
//!
//! With `missing` the frames still needed for the full requirement and
//! `min_missing` the frames still needed to become runnable:
//!
//! 1. enough free frames for `missing`: take them all
//! 2. enough free frames for `min_missing`: take every free frame
//! 3. otherwise evict individual frames, least recently used process first,
//!    until exactly `min_missing` frames are free, then take them
//!
//! A victim loses frames from the front of its frame list and keeps the rest.
//! If it is left with fewer frames than it needs to run it becomes not runnable
//! and goes through the ladder again on its next dispatch, topping up the frames
//! it kept.

use entities_memory::{frames_for, FrameTable, MIN_PAGE_ALLOCATION, TOTAL_FRAMES};
use entities_process::{MemoryView, Process, ProcessIndex, ProcessMemory, TraceEvent};

use crate::allocator::{AllocationError, AllocationOutcome, MemoryAllocator, MemoryContext, MemoryStrategy};
use crate::eviction::{plan_frame_granular, VictimShare};
use crate::paged::{claim_frames, evict_whole_process};

/// Frames a process of `requirement_kb` needs before it may run
pub fn min_runnable_frames(requirement_kb: u32) -> usize {
    frames_for(requirement_kb).min(MIN_PAGE_ALLOCATION)
}

/// Virtual memory allocator implementation
#[derive(Debug, Clone)]
pub struct VirtualAllocator {
    table: FrameTable,
}

impl VirtualAllocator {
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

    /// Append `count` free frames to `memory`, or none if fewer are free
    pub fn allocate_frames(&mut self, memory: &mut ProcessMemory, count: usize) -> Result<bool, AllocationError> {
        claim_frames(&mut self.table, memory, count)
    }

    /// Carry out a frame-granular eviction plan
    ///
    /// One `EVICTED` notice lists every frame taken, ascending, and is
    /// published before any frame is released.
    fn evict_frames(&mut self, ctx: &mut MemoryContext<'_>, plan: &[VictimShare]) -> Result<(), AllocationError> {
        let mut taken = Vec::with_capacity(plan.len());
        for share in plan {
            let victim = ctx.process_mut(share.process)?;
            let frames = victim.memory_mut().take_front_frames(share.frames);
            log::debug!(
                "virtual: evicting {} frames of {}, {} left",
                frames.len(),
                victim.name(),
                victim.memory().num_frames()
            );
            taken.push((share.process, frames));
        }

        let mut released: Vec<usize> = taken.iter().flat_map(|(_, frames)| frames.iter().copied()).collect();
        released.sort_unstable();
        ctx.events.push(TraceEvent::Evicted {
            time: ctx.now,
            frames: released,
        });

        for (index, frames) in taken {
            self.table.release_all(&frames)?;
            let victim = ctx.process_mut(index)?;
            for (page, &frame) in victim.memory().frames().iter().enumerate() {
                self.table.set_page(frame, page)?;
            }
            if victim.memory().num_frames() < min_runnable_frames(victim.memory_requirement()) {
                log::trace!("virtual: {} is no longer runnable", victim.name());
                victim.memory_mut().set_allocated(false);
            }
        }
        Ok(())
    }
}

impl Default for VirtualAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAllocator for VirtualAllocator {
    fn strategy(&self) -> MemoryStrategy {
        MemoryStrategy::Virtual
    }

    fn allocate(
        &mut self,
        requester: ProcessIndex,
        ctx: &mut MemoryContext<'_>,
    ) -> Result<AllocationOutcome, AllocationError> {
        let process = ctx.process_mut(requester)?;
        let required = frames_for(process.memory_requirement());
        let held = process.memory().num_frames();
        let missing = required.saturating_sub(held);
        let min_missing = min_runnable_frames(process.memory_requirement()).saturating_sub(held);
        process.memory_mut().reserve_frames(required);

        let free = self.table.free_frames();
        let take = if free >= missing {
            missing
        } else if free >= min_missing {
            free
        } else {
            let Some(plan) = plan_frame_granular(ctx.processes, ctx.recency, requester, min_missing - free) else {
                log::debug!(
                    "virtual: {} frames needed to run, {} free and not enough to evict",
                    min_missing,
                    free
                );
                return Ok(AllocationOutcome::NotAllocated);
            };
            self.evict_frames(ctx, &plan)?;
            min_missing
        };

        let process = ctx.process_mut(requester)?;
        if !claim_frames(&mut self.table, process.memory_mut(), take)? {
            return Err(AllocationError::InvariantViolation(format!(
                "{} frames unavailable for {} after planning",
                take,
                process.name()
            )));
        }
        process.memory_mut().set_allocated(true);
        log::debug!(
            "virtual: {} now holds {} of {} frames",
            process.name(),
            process.memory().num_frames(),
            required
        );
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
        min_runnable_frames(requirement_kb) <= self.table.len()
    }

    fn check_invariants(&self) -> Result<(), AllocationError> {
        self.table.check_conservation()?;
        Ok(())
    }
}

//! Page Frame Table
//!
//! Fixed-size table of physical page frames used by paged and virtual memory.
//!
//! Frames are created once and never destroyed, only toggled between free and
//! allocated. The table keeps `frames_in_use` equal to the number of allocated
//! entries after every mutation; [`FrameTable::check_conservation`] verifies it.

use crate::constants::{ceil_percent, TOTAL_FRAMES};
use crate::MemoryTableError;

/// One physical page frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frame {
    /// Logical page of the owning process stored here (meaningful only while allocated)
    page: Option<usize>,
    allocated: bool,
    /// Simulated time the owner was last dispatched while holding this frame
    last_used_time: Option<u32>,
}

impl Frame {
    pub fn page(&self) -> Option<usize> {
        if self.allocated {
            self.page
        } else {
            None
        }
    }

    pub fn is_allocated(&self) -> bool {
        self.allocated
    }

    pub fn last_used_time(&self) -> Option<u32> {
        self.last_used_time
    }
}

/// Table of page frames with an in-use counter
#[derive(Debug, Clone)]
pub struct FrameTable {
    frames: Vec<Frame>,
    in_use: usize,
}

impl FrameTable {
    /// Create a table of `count` free frames
    pub fn new(count: usize) -> Self {
        Self {
            frames: vec![Frame::default(); count],
            in_use: 0,
        }
    }

    /// Total number of frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames_in_use(&self) -> usize {
        self.in_use
    }

    pub fn free_frames(&self) -> usize {
        self.frames.len() - self.in_use
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn is_allocated(&self, index: usize) -> bool {
        self.frames.get(index).is_some_and(Frame::is_allocated)
    }

    /// Percentage of frames in use, rounded up
    pub fn usage_percent(&self) -> u32 {
        ceil_percent(self.in_use as u64, self.frames.len() as u64)
    }

    /// Claim up to `count` free frames in ascending index order
    ///
    /// The k-th claimed frame stores logical page `first_page + k`. Fewer than
    /// `count` frames are returned when the table runs out; the caller decides
    /// whether to keep or roll back a short claim.
    ///
    /// # Returns
    /// The indices claimed, ascending
    pub fn claim_lowest(&mut self, count: usize, first_page: usize) -> Vec<usize> {
        let mut claimed = Vec::with_capacity(count.min(self.free_frames()));
        for (index, frame) in self.frames.iter_mut().enumerate() {
            if claimed.len() == count {
                break;
            }
            if !frame.allocated {
                frame.allocated = true;
                frame.page = Some(first_page + claimed.len());
                frame.last_used_time = None;
                claimed.push(index);
            }
        }
        self.in_use += claimed.len();
        claimed
    }

    /// Return one frame to the free pool
    ///
    /// # Errors
    ///
    /// Returns `MemoryTableError::FrameOutOfRange` or
    /// `MemoryTableError::FrameNotAllocated`; the table is untouched in both cases.
    pub fn release(&mut self, index: usize) -> Result<(), MemoryTableError> {
        let frame = self
            .frames
            .get_mut(index)
            .ok_or(MemoryTableError::FrameOutOfRange(index))?;
        if !frame.allocated {
            return Err(MemoryTableError::FrameNotAllocated(index));
        }
        *frame = Frame::default();
        self.in_use -= 1;
        Ok(())
    }

    /// Release every frame in `indices`
    ///
    /// All indices are validated first, so a bad index leaves the table untouched.
    pub fn release_all(&mut self, indices: &[usize]) -> Result<(), MemoryTableError> {
        for &index in indices {
            match self.frames.get(index) {
                None => return Err(MemoryTableError::FrameOutOfRange(index)),
                Some(frame) if !frame.allocated => return Err(MemoryTableError::FrameNotAllocated(index)),
                Some(_) => {}
            }
        }
        for &index in indices {
            self.release(index)?;
        }
        Ok(())
    }

    /// Record which logical page an allocated frame holds
    pub fn set_page(&mut self, index: usize, page: usize) -> Result<(), MemoryTableError> {
        let frame = self
            .frames
            .get_mut(index)
            .ok_or(MemoryTableError::FrameOutOfRange(index))?;
        if !frame.allocated {
            return Err(MemoryTableError::FrameNotAllocated(index));
        }
        frame.page = Some(page);
        Ok(())
    }

    /// Stamp the last-used time of the given frames
    ///
    /// Unallocated or out-of-range indices are skipped.
    pub fn touch(&mut self, indices: &[usize], time: u32) {
        for &index in indices {
            if let Some(frame) = self.frames.get_mut(index).filter(|f| f.allocated) {
                frame.last_used_time = Some(time);
            }
        }
    }

    /// Verify `frames_in_use` matches the number of allocated entries
    pub fn check_conservation(&self) -> Result<(), MemoryTableError> {
        let allocated = self.frames.iter().filter(|f| f.allocated).count();
        if allocated != self.in_use {
            return Err(MemoryTableError::IntegrityViolation(format!(
                "{} frames allocated but counter says {}",
                allocated, self.in_use
            )));
        }
        Ok(())
    }
}

impl Default for FrameTable {
    fn default() -> Self {
        Self::new(TOTAL_FRAMES)
    }
}

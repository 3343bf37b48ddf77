//! Memory geometry shared by every strategy.

/// Total simulated memory in KB
pub const MEMORY_SIZE_KB: u32 = 2048;

/// Size of one page frame in KB
pub const FRAME_SIZE_KB: u32 = 4;

/// Number of page frames in the frame table
pub const TOTAL_FRAMES: usize = (MEMORY_SIZE_KB / FRAME_SIZE_KB) as usize;

/// Frames a process must hold to be runnable under virtual memory
pub const MIN_PAGE_ALLOCATION: usize = 4;

/// Number of frames needed to hold `requirement_kb` (rounded up)
pub fn frames_for(requirement_kb: u32) -> usize {
    requirement_kb.div_ceil(FRAME_SIZE_KB) as usize
}

/// `used / total` as a percentage, rounded up
///
/// Returns 0 for an empty total.
pub fn ceil_percent(used: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    (used * 100).div_ceil(total) as u32
}

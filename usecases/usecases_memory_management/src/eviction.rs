//! LRU Eviction Planning
//!
//! Victim selection for the paged strategies. A victim is any process other
//! than the requester that currently holds frames, ranked by the time it was
//! last dispatched (earliest first, ties by lowest process index).
//!
//! Plans are computed before anything is mutated. If the candidates together
//! cannot cover the shortfall the planner returns `None` and the caller reports
//! `NotAllocated` without touching a single victim.

use entities_process::{Process, ProcessIndex, RecencyTable};

/// Frames to take from one victim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VictimShare {
    pub process: ProcessIndex,
    pub frames: usize,
}

/// Processes holding frames, excluding `requester`, least recently used first
pub fn lru_candidates(processes: &[Process], recency: &RecencyTable, requester: ProcessIndex) -> Vec<ProcessIndex> {
    let mut candidates: Vec<ProcessIndex> = processes
        .iter()
        .enumerate()
        .filter(|(index, process)| *index != requester && process.memory().num_frames() > 0)
        .map(|(index, _)| index)
        .collect();
    candidates.sort_by_key(|&index| recency.eviction_rank(index));
    candidates
}

/// Whole processes to evict so that at least `shortfall` frames come free
///
/// Takes victims in LRU order and stops as soon as the shortfall is covered,
/// so no more processes are evicted than necessary.
pub fn plan_whole_process(
    processes: &[Process],
    recency: &RecencyTable,
    requester: ProcessIndex,
    shortfall: usize,
) -> Option<Vec<ProcessIndex>> {
    let mut victims = Vec::new();
    let mut freed = 0usize;
    for candidate in lru_candidates(processes, recency, requester) {
        if freed >= shortfall {
            break;
        }
        freed += processes[candidate].memory().num_frames();
        victims.push(candidate);
    }
    (freed >= shortfall).then_some(victims)
}

/// Individual frames to evict so that exactly `shortfall` frames come free
///
/// Each victim in LRU order gives up as many of its frames as are still
/// needed, up to all of them; only the last victim can be evicted partially.
pub fn plan_frame_granular(
    processes: &[Process],
    recency: &RecencyTable,
    requester: ProcessIndex,
    shortfall: usize,
) -> Option<Vec<VictimShare>> {
    let mut shares = Vec::new();
    let mut needed = shortfall;
    for candidate in lru_candidates(processes, recency, requester) {
        if needed == 0 {
            break;
        }
        let frames = processes[candidate].memory().num_frames().min(needed);
        needed -= frames;
        shares.push(VictimShare {
            process: candidate,
            frames,
        });
    }
    (needed == 0).then_some(shares)
}

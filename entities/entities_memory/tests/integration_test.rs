//! Integration tests for entities_memory
//!
//! Drives the block list and frame table through long mixed sequences and
//! checks their invariants after every mutation.

use entities_memory::{BlockList, BlockState, FrameTable, MemoryTableError, MEMORY_SIZE_KB};

/// Small deterministic generator so the sequences are reproducible
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

#[test]
fn test_block_list_integrity_under_churn() {
    let mut list = BlockList::new(MEMORY_SIZE_KB);
    let mut held: Vec<u32> = Vec::new();
    let mut rng = Lcg(7);

    for _ in 0..500 {
        let release = !held.is_empty() && rng.next() % 3 == 0;
        if release {
            let pick = (rng.next() as usize) % held.len();
            let start = held.swap_remove(pick);
            let id = list
                .iter()
                .find(|(_, b)| b.start() == start && !b.is_hole())
                .map(|(id, _)| id)
                .unwrap();
            list.release(id).unwrap();
        } else {
            let size = 1 + (rng.next() % 200) as u32;
            let hole = list
                .iter()
                .find(|(_, b)| b.is_hole() && b.length() >= size)
                .map(|(id, b)| (id, b.start()));
            if let Some((id, start)) = hole {
                list.claim(id, size).unwrap();
                held.push(start);
            }
        }

        list.check_integrity().unwrap();
        let sum: u32 = list.iter().map(|(_, b)| b.length()).sum();
        assert_eq!(sum, MEMORY_SIZE_KB);
    }

    for start in held {
        let id = list.iter().find(|(_, b)| b.start() == start).map(|(id, _)| id).unwrap();
        list.release(id).unwrap();
    }
    assert_eq!(list.len(), 1);
    assert_eq!(list.free_size(), MEMORY_SIZE_KB);
}

#[test]
fn test_release_long_run_of_holes() {
    // U H U H U: releasing the used blocks one by one must end with a single hole
    let mut list = BlockList::from_layout(&[
        (BlockState::Used, 10),
        (BlockState::Hole, 20),
        (BlockState::Used, 30),
        (BlockState::Hole, 40),
        (BlockState::Used, 50),
    ])
    .unwrap();

    list.release(2).unwrap();
    assert_eq!(list.len(), 3);
    let merged = list.get(1).unwrap();
    assert_eq!((merged.start(), merged.length()), (10, 90));

    list.release(0).unwrap();
    list.release(4).unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list.get(0).unwrap().length(), 150);
    list.check_integrity().unwrap();
}

#[test]
fn test_frame_table_conservation_under_churn() {
    let mut table = FrameTable::default();
    let mut owned: Vec<Vec<usize>> = Vec::new();
    let mut rng = Lcg(11);

    for _ in 0..300 {
        if !owned.is_empty() && rng.next() % 2 == 0 {
            let pick = (rng.next() as usize) % owned.len();
            let frames = owned.swap_remove(pick);
            table.release_all(&frames).unwrap();
        } else {
            let want = 1 + (rng.next() % 40) as usize;
            let frames = table.claim_lowest(want, 0);
            if !frames.is_empty() {
                owned.push(frames);
            }
        }
        table.check_conservation().unwrap();
        let held: usize = owned.iter().map(Vec::len).sum();
        assert_eq!(table.frames_in_use(), held);
    }
}

#[test]
fn test_error_display() {
    assert_eq!(format!("{}", MemoryTableError::FrameOutOfRange(3)), "Frame 3 is out of range");
    assert_eq!(format!("{}", MemoryTableError::BlockNotUsed(1)), "Memory block 1 is not in use");
}

//! Contiguous Memory Blocks
//!
//! Provides the address-ordered block list used by contiguous allocation.
//!
//! The list is an index-addressed arena: every block record lives in a slot of a
//! `Vec`, and `next`/`prev` are slot indices rather than pointers. Splitting a
//! block and merging neighbours are O(1) splices; records freed by merging are
//! recycled through a vacant-slot stack.
//!
//! At every point between calls the list spans the whole address space with no
//! gaps and no overlaps, and no two adjacent blocks are both holes.

use crate::MemoryTableError;

/// Slot index of a block record inside a [`BlockList`]
pub type BlockId = usize;

/// Whether a block is free or owned by a process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
    /// Unused memory
    Hole,
    /// Memory held by a process
    Used,
}

/// One contiguous range of memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    state: BlockState,
    start: u32,
    length: u32,
    next: Option<BlockId>,
    prev: Option<BlockId>,
}

impl Block {
    pub fn state(&self) -> BlockState {
        self.state
    }

    /// Start offset in KB
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Length in KB
    pub fn length(&self) -> u32 {
        self.length
    }

    /// One past the last KB covered by this block
    pub fn end(&self) -> u32 {
        self.start + self.length
    }

    pub fn is_hole(&self) -> bool {
        self.state == BlockState::Hole
    }

    pub fn next(&self) -> Option<BlockId> {
        self.next
    }

    pub fn prev(&self) -> Option<BlockId> {
        self.prev
    }
}

/// Address-ordered arena of memory blocks
///
/// Created as a single hole covering the whole address space. Blocks are never
/// destroyed individually; a record only disappears when coalescing absorbs it
/// into its left neighbour. The head record therefore never moves.
#[derive(Debug, Clone)]
pub struct BlockList {
    /// Block records (None = vacant slot)
    slots: Vec<Option<Block>>,
    /// Vacant slots available for reuse
    vacant: Vec<BlockId>,
    /// Lowest-address block
    head: BlockId,
    /// Size of the address space in KB
    total_size: u32,
}

impl BlockList {
    /// Create a list holding one hole of `total_size` KB at offset 0
    pub fn new(total_size: u32) -> Self {
        Self {
            slots: vec![Some(Block {
                state: BlockState::Hole,
                start: 0,
                length: total_size,
                next: None,
                prev: None,
            })],
            vacant: Vec::new(),
            head: 0,
            total_size,
        }
    }

    /// Build a list from consecutive `(state, length)` pairs starting at offset 0
    ///
    /// Useful to reproduce a fragmented memory state directly.
    ///
    /// # Errors
    ///
    /// Returns `MemoryTableError::InvalidLayout` if the layout is empty or places
    /// two holes next to each other (an uncoalesced state the list never reaches
    /// on its own).
    pub fn from_layout(layout: &[(BlockState, u32)]) -> Result<Self, MemoryTableError> {
        if layout.is_empty() {
            return Err(MemoryTableError::InvalidLayout("layout has no blocks".to_string()));
        }
        if let Some(pos) = layout
            .windows(2)
            .position(|pair| pair[0].0 == BlockState::Hole && pair[1].0 == BlockState::Hole)
        {
            return Err(MemoryTableError::InvalidLayout(format!(
                "blocks {} and {} are adjacent holes",
                pos,
                pos + 1
            )));
        }

        let count = layout.len();
        let mut slots = Vec::with_capacity(count);
        let mut start = 0u32;
        for (index, &(state, length)) in layout.iter().enumerate() {
            slots.push(Some(Block {
                state,
                start,
                length,
                next: if index + 1 < count { Some(index + 1) } else { None },
                prev: index.checked_sub(1),
            }));
            start += length;
        }

        Ok(Self {
            slots,
            vacant: Vec::new(),
            head: 0,
            total_size: start,
        })
    }

    /// Size of the whole address space in KB
    pub fn total_size(&self) -> u32 {
        self.total_size
    }

    pub fn head(&self) -> BlockId {
        self.head
    }

    /// Look up a live block record
    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.slots.get(id).and_then(Option::as_ref)
    }

    /// Number of live block records
    pub fn len(&self) -> usize {
        self.slots.len() - self.vacant.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate blocks in ascending address order
    pub fn iter(&self) -> BlockIter<'_> {
        BlockIter {
            list: self,
            cursor: Some(self.head),
        }
    }

    /// Total KB currently held by processes
    pub fn used_size(&self) -> u32 {
        self.iter()
            .filter(|(_, block)| !block.is_hole())
            .map(|(_, block)| block.length)
            .sum()
    }

    /// Total KB currently free
    pub fn free_size(&self) -> u32 {
        self.total_size - self.used_size()
    }

    /// Label a hole as used, carving `length` KB off its front
    ///
    /// If the hole is larger than `length`, the remainder becomes a new hole
    /// spliced in immediately after the claimed block.
    ///
    /// # Errors
    ///
    /// Returns `MemoryTableError::UnknownBlock` for a dead id and
    /// `MemoryTableError::IntegrityViolation` if the block is not a hole or is
    /// too small.
    pub fn claim(&mut self, id: BlockId, length: u32) -> Result<(), MemoryTableError> {
        let (start, available, next) = {
            let block = self.node(id)?;
            if !block.is_hole() {
                return Err(MemoryTableError::IntegrityViolation(format!(
                    "block {} at {} is already in use",
                    id, block.start
                )));
            }
            if block.length < length {
                return Err(MemoryTableError::IntegrityViolation(format!(
                    "block {} holds {} KB, {} KB requested",
                    id, block.length, length
                )));
            }
            (block.start, block.length, block.next)
        };

        let leftover = available - length;
        if leftover > 0 {
            let hole = self.insert_record(Block {
                state: BlockState::Hole,
                start: start + length,
                length: leftover,
                next,
                prev: Some(id),
            });
            if let Some(after) = next {
                self.node_mut(after)?.prev = Some(hole);
            }
            let block = self.node_mut(id)?;
            block.next = Some(hole);
            block.length = length;
            log::trace!("split block {} at {}: {} KB used, {} KB hole", id, start, length, leftover);
        }

        self.node_mut(id)?.state = BlockState::Used;
        Ok(())
    }

    /// Return a used block to the free pool and coalesce
    ///
    /// Relabels the block as a hole, then makes one linear pass over the list
    /// merging every run of adjacent holes into its leftmost block.
    ///
    /// # Errors
    ///
    /// Returns `MemoryTableError::UnknownBlock` for a dead id and
    /// `MemoryTableError::BlockNotUsed` if the block is already a hole.
    pub fn release(&mut self, id: BlockId) -> Result<(), MemoryTableError> {
        let block = self.node_mut(id)?;
        if block.is_hole() {
            return Err(MemoryTableError::BlockNotUsed(id));
        }
        block.state = BlockState::Hole;
        self.coalesce()
    }

    fn coalesce(&mut self) -> Result<(), MemoryTableError> {
        let mut cursor = self.head;
        while let Some(next_id) = self.node(cursor)?.next {
            let mergeable = self.node(cursor)?.is_hole() && self.node(next_id)?.is_hole();
            if !mergeable {
                cursor = next_id;
                continue;
            }

            let absorbed = self.remove_record(next_id)?;
            let survivor = self.node_mut(cursor)?;
            survivor.length += absorbed.length;
            survivor.next = absorbed.next;
            if let Some(after) = absorbed.next {
                self.node_mut(after)?.prev = Some(cursor);
            }
            log::trace!("merged block {} into block {}", next_id, cursor);
        }
        Ok(())
    }

    /// Verify the list covers the address space exactly
    ///
    /// Checks that blocks are contiguous from offset 0, that back links mirror
    /// forward links, that no two neighbours are both holes and that the lengths
    /// sum to the total size.
    pub fn check_integrity(&self) -> Result<(), MemoryTableError> {
        let mut expected_start = 0u32;
        let mut previous: Option<(BlockId, bool)> = None;
        let mut visited = 0usize;

        for (id, block) in self.iter() {
            visited += 1;
            if visited > self.slots.len() {
                return Err(MemoryTableError::IntegrityViolation("block list contains a cycle".to_string()));
            }
            if block.start != expected_start {
                return Err(MemoryTableError::IntegrityViolation(format!(
                    "block {} starts at {}, expected {}",
                    id, block.start, expected_start
                )));
            }
            if block.prev != previous.map(|(prev_id, _)| prev_id) {
                return Err(MemoryTableError::IntegrityViolation(format!(
                    "block {} has a stale back link",
                    id
                )));
            }
            if let Some((prev_id, true)) = previous {
                if block.is_hole() {
                    return Err(MemoryTableError::IntegrityViolation(format!(
                        "blocks {} and {} are adjacent holes",
                        prev_id, id
                    )));
                }
            }
            expected_start = block.end();
            previous = Some((id, block.is_hole()));
        }

        if visited != self.len() {
            return Err(MemoryTableError::IntegrityViolation(format!(
                "{} live records but {} reachable",
                self.len(),
                visited
            )));
        }
        if expected_start != self.total_size {
            return Err(MemoryTableError::IntegrityViolation(format!(
                "blocks cover {} KB of {} KB",
                expected_start, self.total_size
            )));
        }
        Ok(())
    }

    fn node(&self, id: BlockId) -> Result<&Block, MemoryTableError> {
        self.get(id).ok_or(MemoryTableError::UnknownBlock(id))
    }

    fn node_mut(&mut self, id: BlockId) -> Result<&mut Block, MemoryTableError> {
        self.slots
            .get_mut(id)
            .and_then(Option::as_mut)
            .ok_or(MemoryTableError::UnknownBlock(id))
    }

    fn insert_record(&mut self, block: Block) -> BlockId {
        match self.vacant.pop() {
            Some(id) => {
                self.slots[id] = Some(block);
                id
            }
            None => {
                self.slots.push(Some(block));
                self.slots.len() - 1
            }
        }
    }

    fn remove_record(&mut self, id: BlockId) -> Result<Block, MemoryTableError> {
        let block = self
            .slots
            .get_mut(id)
            .and_then(Option::take)
            .ok_or(MemoryTableError::UnknownBlock(id))?;
        self.vacant.push(id);
        Ok(block)
    }
}

/// Address-order iterator over a [`BlockList`]
pub struct BlockIter<'a> {
    list: &'a BlockList,
    cursor: Option<BlockId>,
}

impl<'a> Iterator for BlockIter<'a> {
    type Item = (BlockId, &'a Block);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let block = self.list.get(id)?;
        self.cursor = block.next;
        Some((id, block))
    }
}

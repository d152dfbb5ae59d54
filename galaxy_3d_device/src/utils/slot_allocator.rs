/// Bounded pool of `u32` slot indices.
///
/// The device hands these out as indirect-draw slots: each slot addresses one
/// argument record in the indirect draw buffer, so the pool is capped at the
/// number of records the buffer holds. The whole pool is recycled at the
/// start of every frame with [`SlotAllocator::reset`].
///
/// ```ignore
/// let mut slots = SlotAllocator::with_limit(2);
/// assert_eq!(slots.alloc(), Some(0));
/// assert_eq!(slots.alloc(), Some(1));
/// assert_eq!(slots.alloc(), None);   // buffer full
/// slots.release(0);
/// assert_eq!(slots.alloc(), Some(0));
/// ```
#[derive(Debug)]
pub struct SlotAllocator {
    limit: u32,
    released: Vec<u32>,
    next: u32,
}

impl SlotAllocator {
    /// Pool of slots `0..limit`
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit,
            released: Vec::new(),
            next: 0,
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Lowest recycled slot, else the next fresh one. None when all `limit` slots are taken.
    pub fn alloc(&mut self) -> Option<u32> {
        if let Some(slot) = self.released.pop() {
            return Some(slot);
        }
        if self.next == self.limit {
            return None;
        }
        self.next += 1;
        Some(self.next - 1)
    }

    /// Give a slot back before the end of the frame
    pub fn release(&mut self, slot: u32) {
        debug_assert!(slot < self.next, "releasing a slot never handed out: {}", slot);
        debug_assert!(!self.released.contains(&slot), "slot {} released twice", slot);
        self.released.push(slot);
        self.released.sort_unstable_by(|a, b| b.cmp(a));
    }

    /// Release every slot at once. Indices restart from zero.
    pub fn reset(&mut self) {
        self.released.clear();
        self.next = 0;
    }

    /// Records touched since the last reset, the range a backend needs to flush
    pub fn high_water_mark(&self) -> u32 {
        self.next
    }

    /// Slots currently handed out
    pub fn in_use(&self) -> u32 {
        self.next - self.released.len() as u32
    }
}

#[cfg(test)]
#[path = "slot_allocator_tests.rs"]
mod tests;

/// Utility types shared across the device layer

pub mod slot_allocator;

pub use slot_allocator::SlotAllocator;

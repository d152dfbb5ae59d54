use super::*;

#[test]
fn test_slots_are_sequential_up_to_limit() {
    let mut slots = SlotAllocator::with_limit(3);
    assert_eq!(slots.alloc(), Some(0));
    assert_eq!(slots.alloc(), Some(1));
    assert_eq!(slots.alloc(), Some(2));
    assert_eq!(slots.alloc(), None);
    assert_eq!(slots.in_use(), 3);
    assert_eq!(slots.limit(), 3);
}

#[test]
fn test_released_slots_come_back_lowest_first() {
    let mut slots = SlotAllocator::with_limit(8);
    for _ in 0..4 {
        slots.alloc();
    }
    slots.release(2);
    slots.release(0);

    assert_eq!(slots.in_use(), 2);
    assert_eq!(slots.alloc(), Some(0));
    assert_eq!(slots.alloc(), Some(2));
    assert_eq!(slots.alloc(), Some(4));
}

#[test]
fn test_full_pool_reuses_released_slot() {
    let mut slots = SlotAllocator::with_limit(1);
    assert_eq!(slots.alloc(), Some(0));
    assert_eq!(slots.alloc(), None);
    slots.release(0);
    assert_eq!(slots.alloc(), Some(0));
}

#[test]
fn test_reset_restarts_from_zero() {
    let mut slots = SlotAllocator::with_limit(16);
    for _ in 0..5 {
        slots.alloc();
    }
    slots.release(3);
    assert_eq!(slots.high_water_mark(), 5);

    slots.reset();
    assert_eq!(slots.in_use(), 0);
    assert_eq!(slots.high_water_mark(), 0);
    assert_eq!(slots.alloc(), Some(0));
}

#[test]
fn test_zero_limit_never_allocates() {
    let mut slots = SlotAllocator::with_limit(0);
    assert_eq!(slots.alloc(), None);
    assert_eq!(slots.high_water_mark(), 0);
}

//! Single-producer single-consumer lock-free ring buffer
//!
//! Fixed capacity, rounded up to the next power of two with one slot
//! reserved, so a ring built for `capacity` holds `capacity` items when
//! `capacity` is already a power of two minus one. Exactly one thread may
//! push and exactly one thread may pop; the type is `Sync` only under that
//! contract.
//!
//! Index protocol: the producer reads `tail` relaxed (it is the only
//! writer), acquires `head`, and releases `tail` after writing the slot;
//! the consumer is the mirror image. Head and tail live on separate
//! cache lines.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};

#[repr(align(64))]
struct CachePadded<T>(T);

pub struct SpscRing<T> {
    buffer: Box<[UnsafeCell<MaybeUninit<T>>]>,
    mask: usize,
    /// Consumer index: next slot to read.
    head: CachePadded<AtomicUsize>,
    /// Producer index: next slot to write.
    tail: CachePadded<AtomicUsize>,
}

// SAFETY: slots are handed off between exactly one producer and one
// consumer through the release/acquire pair on `tail` and `head`; a slot
// is never accessed by both sides at once.
unsafe impl<T: Send> Send for SpscRing<T> {}
unsafe impl<T: Send> Sync for SpscRing<T> {}

impl<T> SpscRing<T> {
    /// Build a ring sized to the next power of two at or above `capacity`.
    /// One slot is reserved, so the usable capacity is `size - 1`.
    pub fn with_capacity(capacity: usize) -> Self {
        let size = capacity.next_power_of_two().max(2);
        let buffer = (0..size)
            .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            buffer,
            mask: size - 1,
            head: CachePadded(AtomicUsize::new(0)),
            tail: CachePadded(AtomicUsize::new(0)),
        }
    }

    /// Producer side. Returns the item back on a full ring.
    pub fn try_push(&self, item: T) -> Result<(), T> {
        let tail = self.tail.0.load(Ordering::Relaxed);
        let next = (tail + 1) & self.mask;

        if next == self.head.0.load(Ordering::Acquire) {
            return Err(item); // full
        }

        // SAFETY: head != next, so the consumer has released this slot.
        unsafe {
            (*self.buffer[tail].get()).write(item);
        }
        self.tail.0.store(next, Ordering::Release);
        Ok(())
    }

    /// Consumer side. Returns `None` on an empty ring.
    pub fn try_pop(&self) -> Option<T> {
        let head = self.head.0.load(Ordering::Relaxed);

        if head == self.tail.0.load(Ordering::Acquire) {
            return None; // empty
        }

        // SAFETY: head != tail, so the producer has published this slot
        // and will not touch it again until head moves past it.
        let item = unsafe { (*self.buffer[head].get()).assume_init_read() };
        self.head.0.store((head + 1) & self.mask, Ordering::Release);
        Some(item)
    }

    pub fn is_empty(&self) -> bool {
        self.head.0.load(Ordering::Acquire) == self.tail.0.load(Ordering::Acquire)
    }

    /// Approximate occupancy; exact only when one side is quiescent.
    pub fn len(&self) -> usize {
        let head = self.head.0.load(Ordering::Acquire);
        let tail = self.tail.0.load(Ordering::Acquire);
        tail.wrapping_sub(head) & self.mask
    }

    /// Usable capacity (one slot is reserved).
    pub fn capacity(&self) -> usize {
        self.mask
    }
}

impl<T> Drop for SpscRing<T> {
    fn drop(&mut self) {
        while self.try_pop().is_some() {}
    }
}

//! Counting global allocator
//!
//! Wraps [`System`] and keeps byte/object counters for heap profiles and the
//! GC statistics line. Install it in the binary:
//!
//! ```rust,ignore
//! #[global_allocator]
//! static ALLOCATOR: CountingAllocator = CountingAllocator::new();
//! ```

// GlobalAlloc is an unsafe trait; every method forwards to System unchanged
#![allow(unsafe_code)]

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, Ordering};

use profkit_common::MemoryCounters;

/// Allocator counters, updated with relaxed atomics
///
/// Must not allocate: it runs inside the allocator.
pub struct CountingAllocator {
    allocated: AtomicU64,
    total_allocated: AtomicU64,
    allocations: AtomicU64,
    frees: AtomicU64,
}

impl CountingAllocator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            allocated: AtomicU64::new(0),
            total_allocated: AtomicU64::new(0),
            allocations: AtomicU64::new(0),
            frees: AtomicU64::new(0),
        }
    }

    fn on_alloc(&self, size: usize) {
        let size = size as u64;
        self.allocated.fetch_add(size, Ordering::Relaxed);
        self.total_allocated.fetch_add(size, Ordering::Relaxed);
        self.allocations.fetch_add(1, Ordering::Relaxed);
    }

    fn on_dealloc(&self, size: usize) {
        self.allocated.fetch_sub(size as u64, Ordering::Relaxed);
        self.frees.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot the counters. `system` is left at zero; the provider fills it.
    #[must_use]
    pub fn counters(&self) -> MemoryCounters {
        MemoryCounters {
            allocated: self.allocated.load(Ordering::Relaxed),
            total_allocated: self.total_allocated.load(Ordering::Relaxed),
            system: 0,
            allocations: self.allocations.load(Ordering::Relaxed),
            frees: self.frees.load(Ordering::Relaxed),
        }
    }
}

impl Default for CountingAllocator {
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            self.on_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            self.on_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        self.on_dealloc(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            // Counted as a free of the old block and an allocation of the new one
            self.on_dealloc(layout.size());
            self.on_alloc(new_size);
        }
        new_ptr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_and_dealloc_are_counted() {
        let allocator = CountingAllocator::new();
        let layout = Layout::from_size_align(128, 8).unwrap();

        let ptr = unsafe { allocator.alloc(layout) };
        assert!(!ptr.is_null());

        let during = allocator.counters();
        assert_eq!(during.allocated, 128);
        assert_eq!(during.total_allocated, 128);
        assert_eq!(during.allocations, 1);

        unsafe { allocator.dealloc(ptr, layout) };

        let after = allocator.counters();
        assert_eq!(after.allocated, 0);
        assert_eq!(after.total_allocated, 128);
        assert_eq!(after.frees, 1);
        assert_eq!(after.live_objects(), 0);
    }

    #[test]
    fn test_realloc_moves_live_bytes() {
        let allocator = CountingAllocator::new();
        let layout = Layout::from_size_align(64, 8).unwrap();

        unsafe {
            let ptr = allocator.alloc(layout);
            let grown = allocator.realloc(ptr, layout, 256);
            assert!(!grown.is_null());

            let counters = allocator.counters();
            assert_eq!(counters.allocated, 256);
            assert_eq!(counters.total_allocated, 64 + 256);

            allocator.dealloc(grown, Layout::from_size_align(256, 8).unwrap());
        }

        assert_eq!(allocator.counters().allocated, 0);
    }
}

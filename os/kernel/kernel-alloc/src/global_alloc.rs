//! `GlobalAlloc` adapter over a locked [`BumpHeap`].
//!
//! Lets `alloc` collections run on a bump arena during bring-up. The library
//! does not install it; a kernel binary opts in with
//!
//! ```ignore
//! static ARENA: HeapArena<{ 256 * 1024 }> = HeapArena::new();
//!
//! #[global_allocator]
//! static GLOBAL: BumpGlobalAlloc<{ 256 * 1024 }> =
//!     BumpGlobalAlloc::new(unsafe { BumpHeap::from_shared(&ARENA) });
//! ```
//!
//! The lock only guards the cursor, so live `Box`es and `Vec`s are never
//! covered by the reference the next allocation takes.

use crate::bump_heap::BumpHeap;
use core::alloc::{GlobalAlloc, Layout};
use core::ptr;
use kernel_sync::SpinLock;

/// A bump heap usable as the global allocator. `dealloc` never reclaims.
pub struct BumpGlobalAlloc<const N: usize> {
    heap: SpinLock<BumpHeap<'static, N>>,
}

impl<const N: usize> BumpGlobalAlloc<N> {
    #[must_use]
    pub const fn new(heap: BumpHeap<'static, N>) -> Self {
        Self {
            heap: SpinLock::new(heap),
        }
    }

    /// Bytes consumed so far, padding included.
    #[must_use]
    pub fn used(&self) -> usize {
        self.heap.with_lock(|h| h.used())
    }
}

unsafe impl<const N: usize> GlobalAlloc for BumpGlobalAlloc<N> {
    /// # Safety
    /// The `GlobalAlloc` contract applies. A null return signals exhaustion.
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        self.heap.with_lock(|heap| {
            heap.allocate_layout(layout)
                .map_or(ptr::null_mut(), |block| heap.as_ptr(&block).as_ptr())
        })
    }

    unsafe fn dealloc(&self, _ptr: *mut u8, _layout: Layout) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bump_heap::HeapArena;

    static ARENA: HeapArena<4096> = HeapArena::new();
    // Safety: `ARENA` backs only this heap.
    static HEAP: BumpGlobalAlloc<4096> =
        BumpGlobalAlloc::new(unsafe { BumpHeap::from_shared(&ARENA) });

    #[test]
    fn alloc_honors_layout_and_never_reuses() {
        let small = Layout::from_size_align(3, 1).unwrap();
        let wide = Layout::from_size_align(40, 64).unwrap();

        let a = unsafe { HEAP.alloc(small) };
        let b = unsafe { HEAP.alloc(wide) };
        assert!(!a.is_null() && !b.is_null());
        assert_eq!(a as usize % 16, 0);
        assert_eq!(b as usize % 64, 0);
        assert!(b as usize >= a as usize + 16);

        unsafe {
            b.write_bytes(0x5A, 40);
            assert_eq!(*b.add(39), 0x5A);
            HEAP.dealloc(a, small);
        }
        let c = unsafe { HEAP.alloc(small) };
        assert!(c as usize > b as usize);

        let used = HEAP.used();
        let huge = Layout::from_size_align(8192, 16).unwrap();
        assert!(unsafe { HEAP.alloc(huge) }.is_null());
        assert_eq!(HEAP.used(), used);
    }

    #[test]
    fn live_allocations_survive_later_ones() {
        static VEC_ARENA: HeapArena<1024> = HeapArena::new();
        // Safety: `VEC_ARENA` backs only this heap.
        static VEC_HEAP: BumpGlobalAlloc<1024> =
            BumpGlobalAlloc::new(unsafe { BumpHeap::from_shared(&VEC_ARENA) });

        let layout = Layout::new::<[u64; 4]>();
        let first = unsafe { VEC_HEAP.alloc(layout) }.cast::<[u64; 4]>();
        unsafe { first.write([1, 2, 3, 4]) };

        let second = unsafe { VEC_HEAP.alloc(layout) }.cast::<[u64; 4]>();
        unsafe {
            second.write([5; 4]);
            (*first)[3] = 40;
            assert_eq!(first.read(), [1, 2, 3, 40]);
            assert_eq!(second.read(), [5; 4]);
        }
    }
}

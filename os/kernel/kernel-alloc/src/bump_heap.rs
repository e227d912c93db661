//! # Bump Heap
//!
//! Fixed-capacity arena handing out 16-byte granular blocks by advancing an
//! offset. Blocks are never reclaimed; the arena never grows.
//!
//! ```text
//! arena:  [ blk 0 (16) | blk 1 (32)       | free ........................ ]
//!         ^ 0          ^ 16               ^ offset                        ^ N
//! ```

use crate::error::HeapError;
use crate::frame_alloc::AllocatorState;
use core::alloc::Layout;
use core::cell::UnsafeCell;
use core::marker::PhantomData;
use core::ptr::NonNull;
use kernel_info::memory::HEAP_ALIGN;
use log::trace;

/// Round `value` up to a multiple of `align` (a power of two).
///
/// Uses `(value + (align - 1)) & !(align - 1)`; `None` if the addition overflows.
#[inline]
#[must_use]
pub const fn checked_align_up(value: usize, align: usize) -> Option<usize> {
    debug_assert!(align.is_power_of_two());
    match value.checked_add(align - 1) {
        Some(v) => Some(v & !(align - 1)),
        None => None,
    }
}

/// Backing storage of a [`BumpHeap`], aligned so that 16-byte offsets are
/// 16-byte addresses.
///
/// The bytes are only ever reached through raw pointers derived from the
/// cell, never through a reference covering the whole arena. A heap's
/// bookkeeping can therefore sit behind a lock while blocks handed out
/// earlier stay writable.
#[repr(C, align(16))]
pub struct HeapArena<const N: usize>(UnsafeCell<[u8; N]>);

const _: () = assert!(align_of::<HeapArena<0>>() == HEAP_ALIGN);

// Safety: the bytes are only accessed through the single `BumpHeap` built over
// the arena, which hands out disjoint ranges.
unsafe impl<const N: usize> Sync for HeapArena<N> {}

impl<const N: usize> Default for HeapArena<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> HeapArena<N> {
    #[must_use]
    pub const fn new() -> Self {
        Self(UnsafeCell::new([0; N]))
    }

    const fn base(&self) -> NonNull<u8> {
        // Safety: `UnsafeCell::get` never returns null.
        unsafe { NonNull::new_unchecked(self.0.get().cast()) }
    }
}

/// A reserved range `[offset, offset + len)` inside a [`BumpHeap`].
///
/// `len` is the rounded size, so it is always a non-zero multiple of 16.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct HeapBlock {
    offset: usize,
    len: usize,
}

impl HeapBlock {
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always `false`; zero-sized blocks are never handed out.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Exclusive end offset.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Bump allocator over an `N`-byte [`HeapArena`].
///
/// Only the arena's base pointer and the cursor live here, so locking or
/// moving the heap does not touch bytes that were already handed out.
pub struct BumpHeap<'a, const N: usize> {
    base: NonNull<u8>,
    /// Next free byte; `0 <= offset <= N`, never decreases.
    offset: usize,
    _arena: PhantomData<&'a HeapArena<N>>,
}

// Safety: `base` points into an arena that outlives `'a` and is `Sync`.
unsafe impl<const N: usize> Send for BumpHeap<'_, N> {}

impl<'a, const N: usize> BumpHeap<'a, N> {
    /// Heap over an arena it borrows exclusively.
    #[must_use]
    #[allow(clippy::needless_pass_by_ref_mut)]
    pub const fn new(arena: &'a mut HeapArena<N>) -> Self {
        Self {
            base: arena.base(),
            offset: 0,
            _arena: PhantomData,
        }
    }

    /// Heap over a shared arena, for `static` heaps.
    ///
    /// # Safety
    /// No other heap may ever be built over `arena`, and nothing else may
    /// access its bytes.
    #[must_use]
    pub const unsafe fn from_shared(arena: &'a HeapArena<N>) -> Self {
        Self {
            base: arena.base(),
            offset: 0,
            _arena: PhantomData,
        }
    }

    /// Reserve `size` bytes, rounded up to [`HEAP_ALIGN`].
    ///
    /// # Errors
    /// - [`HeapError::InvalidRequest`] for `size == 0`.
    /// - [`HeapError::Exhausted`] if the rounded size does not fit.
    ///
    /// The offset is unchanged on error.
    pub fn allocate(&mut self, size: usize) -> Result<HeapBlock, HeapError> {
        if size == 0 {
            return Err(HeapError::InvalidRequest);
        }
        let len = checked_align_up(size, HEAP_ALIGN).ok_or(HeapError::Exhausted)?;
        self.reserve(self.offset, len)
    }

    /// Reserve a block for `layout`, honoring alignments above [`HEAP_ALIGN`].
    ///
    /// Padding skipped to reach the alignment is consumed and counts against
    /// capacity.
    ///
    /// # Errors
    /// As [`allocate`](Self::allocate).
    pub fn allocate_layout(&mut self, layout: Layout) -> Result<HeapBlock, HeapError> {
        if layout.size() == 0 {
            return Err(HeapError::InvalidRequest);
        }
        let len = checked_align_up(layout.size(), HEAP_ALIGN).ok_or(HeapError::Exhausted)?;
        let align = layout.align().max(HEAP_ALIGN);

        // Align the address, not the offset; the arena itself is only 16-aligned.
        let base = self.base.as_ptr().addr();
        let start = base
            .checked_add(self.offset)
            .and_then(|addr| checked_align_up(addr, align))
            .ok_or(HeapError::Exhausted)?
            - base;
        self.reserve(start, len)
    }

    fn reserve(&mut self, start: usize, len: usize) -> Result<HeapBlock, HeapError> {
        let Some(end) = start.checked_add(len).filter(|end| *end <= N) else {
            trace!(
                "kernel heap request of {} bytes denied ({} of {} bytes used)",
                len,
                self.offset,
                N
            );
            return Err(HeapError::Exhausted);
        };

        self.offset = end;
        trace!("kernel heap block {start:#x}+{len:#x}");
        Ok(HeapBlock { offset: start, len })
    }

    /// Accepted for symmetry; blocks are never reclaimed.
    #[allow(clippy::unused_self, clippy::needless_pass_by_ref_mut)]
    pub const fn free(&mut self, _block: HeapBlock) {}

    /// The bytes of `block`.
    ///
    /// # Panics
    /// If `block` does not lie within this heap's arena.
    #[must_use]
    pub fn bytes(&self, block: &HeapBlock) -> &[u8] {
        assert!(block.end() <= N, "heap block outside of arena");
        // Safety: in bounds; the shared borrow of the heap excludes `bytes_mut`.
        unsafe { core::slice::from_raw_parts(self.block_ptr(block).as_ptr(), block.len) }
    }

    /// The bytes of `block`, writable.
    ///
    /// # Panics
    /// If `block` does not lie within this heap's arena.
    pub fn bytes_mut(&mut self, block: &HeapBlock) -> &mut [u8] {
        assert!(block.end() <= N, "heap block outside of arena");
        // Safety: in bounds; the exclusive borrow of the heap excludes other
        // slices of this block.
        unsafe { core::slice::from_raw_parts_mut(self.block_ptr(block).as_ptr(), block.len) }
    }

    /// Raw start pointer of `block`, for handing out to C-style callers.
    ///
    /// # Panics
    /// If `block` does not lie within this heap's arena.
    #[must_use]
    pub fn as_ptr(&self, block: &HeapBlock) -> NonNull<u8> {
        assert!(block.end() <= N, "heap block outside of arena");
        self.block_ptr(block)
    }

    fn block_ptr(&self, block: &HeapBlock) -> NonNull<u8> {
        // Safety: callers checked `block.end() <= N`, so the result stays
        // inside (or one past) the arena.
        unsafe { self.base.add(block.offset) }
    }

    /// Bytes handed out so far, including rounding and alignment padding.
    #[must_use]
    pub const fn used(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    #[must_use]
    pub const fn remaining(&self) -> usize {
        N - self.offset
    }

    /// Exhausted once not even a single 16-byte block fits.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining() < HEAP_ALIGN
    }

    #[must_use]
    pub const fn state(&self) -> AllocatorState {
        if self.is_exhausted() {
            AllocatorState::Exhausted
        } else {
            AllocatorState::Active
        }
    }
}

//! Monotonic 2 MiB physical frame allocator for early kernel use.
//!
//! Frames are handed out from a fixed, identity-mapped window by bumping a
//! cursor. There is no free list; once the cursor reaches the end of the
//! window every further request fails.

use crate::error::FrameAllocError;
use kernel_info::memory::{FRAME_REGION_END, FRAME_REGION_START, FRAME_SIZE};
use kernel_memory_addresses::{PageSize, PhysicalAddress, PhysicalPage, Size2M};
use log::{trace, warn};

/// A 2 MiB physical frame.
pub type Frame = PhysicalPage<Size2M>;

/// Sentinel returned by [`BumpFrameAlloc::allocate_frame_raw`] on exhaustion.
///
/// Address zero is never inside a managed window.
pub const NO_FRAME: u64 = 0;

const _: () = assert!(FRAME_SIZE == Size2M::SIZE);

/// Source of physical frames for code that only needs to allocate and release.
pub trait FrameAlloc {
    /// Hand out one 2 MiB frame, or `None` when none is left.
    fn alloc_2m(&mut self) -> Option<Frame>;

    /// Return a frame previously handed out by [`alloc_2m`](Self::alloc_2m).
    fn free_2m(&mut self, frame: Frame);
}

/// Lifecycle of a bump allocator. The transition is one-way.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AllocatorState {
    /// At least one more allocation can succeed.
    Active,
    /// The cursor reached the bound; every further allocation fails.
    Exhausted,
}

/// Bump allocator over `[start, end)` in [`FRAME_SIZE`] steps.
///
/// # Invariants
/// - `start <= next <= end`, all three aligned to [`FRAME_SIZE`].
/// - `next` never decreases.
#[derive(Debug, Clone)]
pub struct BumpFrameAlloc {
    start: PhysicalAddress,
    end: PhysicalAddress,
    next: PhysicalAddress,
}

impl Default for BumpFrameAlloc {
    fn default() -> Self {
        Self::new()
    }
}

impl BumpFrameAlloc {
    /// Allocator over the kernel's default window
    /// `[FRAME_REGION_START, FRAME_REGION_END)`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            start: PhysicalAddress::new(FRAME_REGION_START),
            end: PhysicalAddress::new(FRAME_REGION_END),
            next: PhysicalAddress::new(FRAME_REGION_START),
        }
    }

    /// Allocator over a custom window `[start, end)`.
    ///
    /// # Errors
    /// [`FrameAllocError::InvalidRegion`] if `start` is zero, either bound is
    /// not 2 MiB aligned, or `end < start`.
    pub fn with_region(start: u64, end: u64) -> Result<Self, FrameAllocError> {
        let (Ok(first), Ok(bound)) = (
            Frame::try_from(PhysicalAddress::new(start)),
            Frame::try_from(PhysicalAddress::new(end)),
        ) else {
            return Err(FrameAllocError::InvalidRegion);
        };
        if start == 0 || bound < first {
            return Err(FrameAllocError::InvalidRegion);
        }
        Ok(Self {
            start: first.base(),
            end: bound.base(),
            next: first.base(),
        })
    }

    /// Hand out the frame at the cursor and advance by one frame.
    ///
    /// # Errors
    /// [`FrameAllocError::Exhausted`] when the frame would cross the end of the
    /// window. The cursor is left untouched in that case.
    pub fn allocate_frame(&mut self) -> Result<Frame, FrameAllocError> {
        let Some(after) = self
            .next
            .checked_add(FRAME_SIZE)
            .filter(|after| *after <= self.end)
        else {
            trace!("frame request denied, window {}..{} exhausted", self.start, self.end);
            return Err(FrameAllocError::Exhausted);
        };

        let frame = self.next.page::<Size2M>();
        self.next = after;
        trace!("allocated 2 MiB frame at {}", frame.base());

        if self.is_exhausted() {
            warn!(
                "frame window {}..{} exhausted after {} frames",
                self.start,
                self.end,
                self.allocated_frames()
            );
        }
        Ok(frame)
    }

    /// Like [`allocate_frame`](Self::allocate_frame) but returns the raw base
    /// address, or [`NO_FRAME`] on exhaustion.
    pub fn allocate_frame_raw(&mut self) -> u64 {
        self.allocate_frame().map_or(NO_FRAME, u64::from)
    }

    /// Accepted for symmetry; this allocator never reclaims frames.
    #[allow(clippy::unused_self, clippy::needless_pass_by_ref_mut)]
    pub const fn free_frame(&mut self, _frame: Frame) {}

    /// Raw-address variant of [`free_frame`](Self::free_frame); also a no-op.
    #[allow(clippy::unused_self, clippy::needless_pass_by_ref_mut)]
    pub const fn free_frame_raw(&mut self, _phys: u64) {}

    #[must_use]
    pub const fn start(&self) -> PhysicalAddress {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> PhysicalAddress {
        self.end
    }

    /// Base of the frame the next successful call will return.
    #[must_use]
    pub const fn next_free(&self) -> PhysicalAddress {
        self.next
    }

    #[must_use]
    pub const fn capacity_frames(&self) -> u64 {
        (self.end.as_u64() - self.start.as_u64()) / FRAME_SIZE
    }

    #[must_use]
    pub const fn allocated_frames(&self) -> u64 {
        (self.next.as_u64() - self.start.as_u64()) / FRAME_SIZE
    }

    #[must_use]
    pub const fn remaining_frames(&self) -> u64 {
        (self.end.as_u64() - self.next.as_u64()) / FRAME_SIZE
    }

    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining_frames() == 0
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

impl FrameAlloc for BumpFrameAlloc {
    fn alloc_2m(&mut self) -> Option<Frame> {
        self.allocate_frame().ok()
    }

    fn free_2m(&mut self, frame: Frame) {
        self.free_frame(frame);
    }
}

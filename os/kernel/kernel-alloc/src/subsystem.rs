//! # Memory Subsystem Lifecycle
//!
//! Process-wide allocator instances and the C-style entry points the rest of
//! the kernel calls.
//!
//! [`init`] is an explicit step of the kernel's startup sequence and must run
//! exactly once before any allocation. It does no work yet; it is the place
//! where building page tables for the frame window will go.

use crate::bump_heap::{BumpHeap, HeapArena};
use crate::error::InitError;
use crate::frame_alloc::BumpFrameAlloc;
use core::ptr::NonNull;
use core::sync::atomic::{AtomicBool, Ordering};
use kernel_info::memory::{FRAME_REGION_END, FRAME_REGION_START, KERNEL_HEAP_SIZE};
use kernel_sync::SpinLock;
use log::{info, trace, warn};

/// The kernel heap as a concrete type.
pub type KernelHeap = BumpHeap<'static, KERNEL_HEAP_SIZE>;

/// Physical frames of the boot identity window.
static FRAMES: SpinLock<BumpFrameAlloc> = SpinLock::new(BumpFrameAlloc::new());

/// Backing storage of the kernel heap, placed in a dedicated `.bss` section.
#[cfg_attr(target_os = "none", unsafe(link_section = ".bss.kheap"))]
static KERNEL_ARENA: HeapArena<KERNEL_HEAP_SIZE> = HeapArena::new();

/// Cursor of the kernel heap. The lock covers the cursor, not the arena.
// Safety: `KERNEL_ARENA` is private and backs no other heap.
static KERNEL_HEAP: SpinLock<KernelHeap> =
    SpinLock::new(unsafe { KernelHeap::from_shared(&KERNEL_ARENA) });

/// Set by the first successful [`init`].
static DID_INIT: AtomicBool = AtomicBool::new(false);

/// Bring up the memory subsystem.
///
/// # Errors
/// [`InitError::AlreadyInitialized`] on every call after the first. A repeated
/// call changes nothing.
pub fn init() -> Result<(), InitError> {
    if DID_INIT.swap(true, Ordering::AcqRel) {
        warn!("memory subsystem initialized twice; ignoring");
        return Err(InitError::AlreadyInitialized);
    }

    info!(
        "memory: frame window {:#x}..{:#x} ({} frames of 2 MiB), kernel heap {} KiB",
        FRAME_REGION_START,
        FRAME_REGION_END,
        FRAMES.with_lock(|f| f.capacity_frames()),
        KERNEL_HEAP_SIZE / 1024
    );
    Ok(())
}

/// Whether [`init`] has run.
#[inline]
#[must_use]
pub fn is_initialized() -> bool {
    DID_INIT.load(Ordering::Acquire)
}

/// Allocators work before [`init`] since it has nothing to set up yet, but
/// such a caller skipped a startup step; say so instead of aborting.
fn warn_if_uninitialized(what: &str) {
    if !is_initialized() {
        warn!("{what} used before memory init");
    }
}

/// Run `f` with exclusive access to the global frame allocator.
///
/// Logs a warning if [`init`] has not run; the call still goes through.
pub fn with_frame_allocator<R>(f: impl FnOnce(&mut BumpFrameAlloc) -> R) -> R {
    warn_if_uninitialized("frame allocator");
    FRAMES.with_lock(f)
}

/// Run `f` with exclusive access to the kernel heap.
///
/// Logs a warning if [`init`] has not run; the call still goes through.
pub fn with_kernel_heap<R>(f: impl FnOnce(&mut KernelHeap) -> R) -> R {
    warn_if_uninitialized("kernel heap");
    KERNEL_HEAP.with_lock(f)
}

/// Allocate one 2 MiB physical frame; returns its base or `0` when none is left.
#[must_use]
pub fn pmm_alloc_2m() -> u64 {
    with_frame_allocator(BumpFrameAlloc::allocate_frame_raw)
}

/// Release a frame. No-op: frames are never reclaimed.
pub fn pmm_free_2m(phys: u64) {
    with_frame_allocator(|f| f.free_frame_raw(phys));
}

/// Allocate `size` bytes from the kernel heap, 16-byte aligned.
///
/// Returns `None` for `size == 0` or when the heap is exhausted.
#[must_use]
pub fn kmalloc(size: usize) -> Option<NonNull<u8>> {
    with_kernel_heap(|heap| match heap.allocate(size) {
        Ok(block) => Some(heap.as_ptr(&block)),
        Err(e) => {
            trace!("kmalloc({size}) failed: {e}");
            None
        }
    })
}

/// Release a kernel heap block. No-op: the heap is a bump allocator.
pub fn kfree(_ptr: NonNull<u8>) {}

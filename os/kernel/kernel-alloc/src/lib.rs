//! # Bootstrap Kernel Memory Allocation
//!
//! This crate provides the two allocators the kernel relies on before any
//! virtual memory management exists, together with the lifecycle hook that
//! gates their use.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              Memory Subsystem Lifecycle             │
//! │    • init() once at kernel startup                  │
//! │    • pmm_alloc_2m / pmm_free_2m                     │
//! │    • kmalloc / kfree                                │
//! └──────────────┬───────────────────────┬──────────────┘
//!                │                       │
//! ┌──────────────▼─────────────┐ ┌───────▼──────────────────────┐
//! │   Physical Frame Allocator │ │      Kernel Heap             │
//! │    • 2 MiB frames          │ │    • 64 KiB static arena     │
//! │    • [2 MiB, 64 MiB)       │ │    • 16-byte granular blocks │
//! │    • monotonic cursor      │ │    • monotonic offset        │
//! └────────────────────────────┘ └──────────────────────────────┘
//! ```
//!
//! Both allocators share one shape: a cursor that only moves forward and a
//! fixed bound. Neither reclaims memory; their `free` operations exist for API
//! symmetry and do nothing. Once a cursor reaches its bound the allocator is
//! exhausted for good.
//!
//! ## Core Components
//!
//! ### Physical Frame Allocator ([`frame_alloc`])
//! [`BumpFrameAlloc`] hands out 2 MiB frames from an identity-mapped window.
//! The window is injectable so tests and future callers can run their own
//! instance; [`BumpFrameAlloc::new`] uses the kernel layout from `kernel-info`.
//!
//! ### Kernel Heap ([`bump_heap`])
//! [`BumpHeap`] carves 16-byte aligned blocks from a [`HeapArena`]. The heap
//! holds only the arena's base pointer and a cursor, so blocks handed out
//! earlier stay valid while the heap is locked for the next request.
//! Requests are rounded with `(size + 15) & !15`; zero-sized requests are
//! rejected.
//!
//! ### Lifecycle and Singletons ([`subsystem`])
//! Process-wide instances behind a [`SpinLock`](kernel_sync::SpinLock), the
//! explicit [`init`] step, and the C-style entry points.
//!
//! ## Usage Patterns
//!
//! ```rust
//! use kernel_alloc::{BumpFrameAlloc, BumpHeap, HeapArena, HeapError};
//!
//! let mut frames = BumpFrameAlloc::new();
//! let frame = frames.allocate_frame().unwrap();
//! assert_eq!(frame.base().as_u64(), 0x20_0000);
//!
//! let mut arena = HeapArena::<1024>::new();
//! let mut heap = BumpHeap::new(&mut arena);
//! let block = heap.allocate(10).unwrap();
//! assert_eq!((block.offset(), block.len()), (0, 16));
//! assert_eq!(heap.allocate(0), Err(HeapError::InvalidRequest));
//! ```
//!
//! ## Error Handling
//!
//! Allocators never panic and never halt. Failures are reported as
//! [`FrameAllocError`] / [`HeapError`] and leave the allocator unchanged; what
//! to do about them is the caller's decision.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

pub mod bump_heap;
mod error;
pub mod frame_alloc;
pub mod global_alloc;
pub mod subsystem;

pub use bump_heap::{BumpHeap, HeapArena, HeapBlock};
pub use error::{FrameAllocError, HeapError, InitError};
pub use frame_alloc::{AllocatorState, BumpFrameAlloc, Frame, FrameAlloc, NO_FRAME};
pub use global_alloc::BumpGlobalAlloc;
pub use subsystem::{
    KernelHeap, init, is_initialized, kfree, kmalloc, pmm_alloc_2m, pmm_free_2m,
    with_frame_allocator, with_kernel_heap,
};

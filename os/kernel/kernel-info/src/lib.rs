//! # Kernel Memory Layout
//!
//! This crate is the single source of truth for the constants that shape the
//! kernel's bootstrap memory subsystem. The allocators in `kernel-alloc`, the
//! startup sequence in `kernel` and the tests all read their bounds from here,
//! so a layout change is made in exactly one place.
//!
//! ## Physical Frame Window
//!
//! Early in boot only a small, identity-mapped window of physical memory is
//! usable. The frame allocator hands out 2 MiB frames from that window:
//!
//! ```text
//! 0x0000_0000 ┌──────────────────────────────┐
//!             │  Boot image, stacks, tables  │  (reserved, never handed out)
//! 0x0020_0000 ├──────────────────────────────┤  FRAME_REGION_START
//!             │                              │
//!             │   31 × 2 MiB frames          │
//!             │                              │
//! 0x0400_0000 └──────────────────────────────┘  FRAME_REGION_END (exclusive)
//! ```
//!
//! ## Kernel Heap
//!
//! A fixed [`KERNEL_HEAP_SIZE`](memory::KERNEL_HEAP_SIZE) byte arena is
//! reserved statically for kernel-internal allocations. Every block carved
//! from it is rounded up to [`HEAP_ALIGN`](memory::HEAP_ALIGN) bytes.

#![cfg_attr(not(any(test, doctest)), no_std)]

pub mod memory;

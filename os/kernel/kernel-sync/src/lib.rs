//! # Kernel synchronization primitives
//!
//! The bootstrap kernel runs on a single CPU with interrupts off, but its
//! allocator singletons still go through a [`SpinLock`]: a cursor bump is a
//! read-then-write sequence and must never be observed half-done once a second
//! context (an interrupt handler, an application processor) exists.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod spin_lock;

pub use spin_lock::{SpinLock, SpinLockGuard};

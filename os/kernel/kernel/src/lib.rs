//! # Kernel
//!
//! Startup sequence of the kernel once the loader has switched to long mode:
//!
//! 1. bring up COM1 and announce ourselves,
//! 2. install the [`ConsoleLogger`](kernel_console::ConsoleLogger),
//! 3. clear the VGA text console and greet,
//! 4. initialize the memory subsystem and probe it with two frame
//!    allocations ([`boot::start_memory`]),
//! 5. idle.
//!
//! The library holds the steps that also build on the host so they can be
//! tested there. The binary (`src/main.rs`) links them into the bare-metal
//! entry point `kernel_main` together with the panic handler.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

pub mod boot;
pub mod halt;

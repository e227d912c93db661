//! # Kernel Entry Point
//!
//! On bare metal (`target_os = "none"`) this is the kernel image: the loader
//! jumps to `kernel_main` in long mode. On a host target the binary runs the
//! memory bring-up against a string console and prints what the kernel would
//! have sent to COM1.

#![cfg_attr(target_os = "none", no_std, no_main)]
#![allow(unsafe_code)]

#[cfg(target_os = "none")]
mod entry;

#[cfg(not(target_os = "none"))]
fn main() {
    let mut console = String::new();
    let report = kernel::boot::start_memory(&mut console);
    print!("{console}");
    println!("{report:?}");
}

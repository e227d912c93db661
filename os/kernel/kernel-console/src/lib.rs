//! # Kernel Console
//!
//! Diagnostic output sinks for the kernel and a [`log`] backend on top of them.
//!
//! ```text
//! log::info!(..) ──► ConsoleLogger<W> ──► W: fmt::Write
//!                                          ├─ SerialPort<P>  COM1 0x3F8 (16550)
//!                                          ├─ DebugCon<P>    QEMU port 0x402
//!                                          └─ VgaText<B>     80×25 text @ 0xB8000
//! ```
//!
//! Port-based devices are generic over [`PortIo`]; the kernel passes
//! [`X86Ports`], tests pass a recorder. The VGA console is generic over
//! [`CellBuffer`] for the same reason.
//!
//! ## Features
//!
//! * `enabled` (default): [`X86Ports`] performs real `in`/`out` instructions.
//!   Without it every port write is dropped and reads return `0xFF`.
//!
//! ## QEMU
//!
//! ```bash
//! qemu-system-x86_64 ... -serial stdio -debugcon file:debug.log
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod debugcon;
mod logger;
mod port;
mod serial;
mod vga;

pub use debugcon::{DebugCon, QEMU_DEBUG_PORT};
pub use logger::ConsoleLogger;
pub use port::{PortIo, X86Ports};
pub use serial::{
    COM1, FifoControl, LineControl, LineStatus, ModemControl, SerialPort, UART_CLOCK_HZ,
    divisor_for,
};
pub use vga::{
    CellBuffer, DEFAULT_ATTRIBUTE, VGA_COLS, VGA_ROWS, VGA_TEXT_BUFFER, VgaMmio, VgaText,
    vga_cell,
};

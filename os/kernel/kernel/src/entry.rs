//! Bare-metal entry point and panic handler.

use kernel::{boot, halt};
use core::fmt::Write;
use core::panic::PanicInfo;
use kernel_console::{COM1, ConsoleLogger, SerialPort, VgaMmio, VgaText, X86Ports};
use log::{LevelFilter, info};

// Safety: the kernel runs at CPL0, so port I/O is permitted.
static LOGGER: ConsoleLogger<SerialPort<X86Ports>> =
    ConsoleLogger::new(SerialPort::new(unsafe { X86Ports::new() }, COM1), LevelFilter::Trace);

/// Called by the loader's long-mode trampoline with paging set up and
/// `0xB8000` identity mapped.
#[unsafe(no_mangle)]
pub extern "C" fn kernel_main() -> ! {
    // Safety: see `LOGGER`. `SerialPort` holds no state besides its base, so
    // this handle may coexist with the logger's.
    let mut serial = SerialPort::new(unsafe { X86Ports::new() }, COM1);
    serial.init();
    let _ = serial.write_str("[kernel] entered long mode\n");

    if LOGGER.init().is_err() {
        let _ = serial.write_str("[kernel] logger already installed\n");
    }

    // Safety: the text buffer is mapped and nothing else draws to it.
    let mut vga = VgaText::new(unsafe { VgaMmio::new() });
    vga.clear();
    let _ = vga.write_str("Hello, Kernel\n");
    let _ = serial.write_str("[kernel] printed to VGA\n");

    let report = boot::start_memory(&mut serial);
    info!("boot complete: {report:?}");

    halt::idle_forever()
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    // Bypass the logger: its sink may be locked by the panicking code.
    // Safety: see `LOGGER`.
    let mut serial = SerialPort::new(unsafe { X86Ports::new() }, COM1);
    let _ = writeln!(serial, "[PANIC] {info}");
    halt::halt_forever()
}

//! Stopping the CPU.

/// Disable interrupts and halt for good.
///
/// Used after unrecoverable errors. Allocators never call this; they report
/// failures to their caller instead.
pub fn halt_forever() -> ! {
    loop {
        #[cfg(all(target_arch = "x86_64", target_os = "none"))]
        // Safety: `cli; hlt` touches no memory; we are at CPL0 on bare metal.
        unsafe {
            core::arch::asm!("cli", "hlt", options(nomem, nostack));
        }

        #[cfg(not(all(target_arch = "x86_64", target_os = "none")))]
        core::hint::spin_loop();
    }
}

/// Sleep until the next interrupt, forever. Interrupts stay as they are.
pub fn idle_forever() -> ! {
    loop {
        #[cfg(all(target_arch = "x86_64", target_os = "none"))]
        // Safety: `hlt` touches no memory; we are at CPL0 on bare metal.
        unsafe {
            core::arch::asm!("hlt", options(nomem, nostack, preserves_flags));
        }

        #[cfg(not(all(target_arch = "x86_64", target_os = "none")))]
        core::hint::spin_loop();
    }
}

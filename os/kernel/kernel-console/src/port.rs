//! x86 I/O port access.

/// Byte-wide access to the I/O port address space.
///
/// Device drivers are generic over this trait so they can be exercised
/// against a recording fake instead of real hardware.
pub trait PortIo {
    fn outb(&mut self, port: u16, value: u8);
    fn inb(&mut self, port: u16) -> u8;
}

impl<P: PortIo + ?Sized> PortIo for &mut P {
    #[inline]
    fn outb(&mut self, port: u16, value: u8) {
        (**self).outb(port, value);
    }

    #[inline]
    fn inb(&mut self, port: u16) -> u8 {
        (**self).inb(port)
    }
}

/// The CPU's real I/O ports, via `in`/`out`.
///
/// Without the `enabled` feature (or off x86-64) writes are dropped and reads
/// return `0xFF`, the value of an undriven bus.
#[derive(Debug, Copy, Clone)]
pub struct X86Ports {
    _private: (),
}

impl X86Ports {
    /// # Safety
    /// Port I/O is privileged; the caller must run at CPL0 (or have IOPL/TSS
    /// permission for every port it touches).
    #[must_use]
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

#[cfg(all(feature = "enabled", target_arch = "x86_64"))]
impl PortIo for X86Ports {
    #[inline]
    fn outb(&mut self, port: u16, value: u8) {
        // Safety: constructing `X86Ports` asserted port access is permitted.
        unsafe {
            core::arch::asm!(
                "out dx, al",
                in("dx") port,
                in("al") value,
                options(nomem, nostack, preserves_flags)
            );
        }
    }

    #[inline]
    fn inb(&mut self, port: u16) -> u8 {
        let value: u8;
        // Safety: constructing `X86Ports` asserted port access is permitted.
        unsafe {
            core::arch::asm!(
                "in al, dx",
                in("dx") port,
                out("al") value,
                options(nomem, nostack, preserves_flags)
            );
        }
        value
    }
}

#[cfg(not(all(feature = "enabled", target_arch = "x86_64")))]
impl PortIo for X86Ports {
    #[inline]
    fn outb(&mut self, _port: u16, _value: u8) {}

    #[inline]
    fn inb(&mut self, _port: u16) -> u8 {
        0xFF
    }
}

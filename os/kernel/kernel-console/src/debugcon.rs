//! QEMU debug console (`-debugcon`), port `0x402`.
//!
//! Write-only and unbuffered: every byte goes straight to the host.

use crate::port::PortIo;
use core::fmt;

/// The port number for QEMU's debug port.
pub const QEMU_DEBUG_PORT: u16 = 0x402;

pub struct DebugCon<P> {
    ports: P,
}

impl<P: PortIo> DebugCon<P> {
    #[must_use]
    pub const fn new(ports: P) -> Self {
        Self { ports }
    }

    #[inline]
    pub fn putc(&mut self, c: u8) {
        self.ports.outb(QEMU_DEBUG_PORT, c);
    }

    #[must_use]
    pub fn into_inner(self) -> P {
        self.ports
    }
}

impl<P: PortIo> fmt::Write for DebugCon<P> {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for b in s.bytes() {
            self.putc(b);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::fake::RecordingPorts;
    use core::fmt::Write;

    #[test]
    fn utf8_is_sent_bytewise() {
        let mut con = DebugCon::new(RecordingPorts::default());
        write!(con, "µ={}", 2).unwrap();
        let ports = con.into_inner();
        assert_eq!(ports.bytes_to(QEMU_DEBUG_PORT), "µ=2".as_bytes());
        assert!(ports.reads.is_empty());
    }
}

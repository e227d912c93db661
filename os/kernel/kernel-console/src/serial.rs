//! 16550 UART serial port.
//!
//! The kernel talks to COM1 at 115200 baud, 8N1, which QEMU forwards to the
//! host with `-serial stdio`.

use crate::port::PortIo;
use bitfield_struct::bitfield;
use core::fmt;
use core::hint::spin_loop;

/// I/O base of the first serial port.
pub const COM1: u16 = 0x3F8;

/// Input clock of the UART divided by 16.
pub const UART_CLOCK_HZ: u32 = 115_200;

/// Register offsets from the port base.
mod reg {
    /// Transmit holding / receive buffer; divisor low byte while DLAB is set.
    pub const DATA: u16 = 0;
    /// Interrupt enable; divisor high byte while DLAB is set.
    pub const IER: u16 = 1;
    /// FIFO control (write only).
    pub const FCR: u16 = 2;
    pub const LCR: u16 = 3;
    pub const MCR: u16 = 4;
    pub const LSR: u16 = 5;
}

/// Line Control Register.
#[bitfield(u8, order = Lsb)]
#[derive(Eq, PartialEq)]
pub struct LineControl {
    /// Bits 0-1: word length minus 5 (`0b11` = 8 bits).
    #[bits(2)]
    pub word_length: u8,

    /// Two stop bits (1.5 for 5-bit words).
    pub two_stop_bits: bool,

    /// Bits 3-5: parity mode, `0` is none.
    #[bits(3)]
    pub parity: u8,

    /// Force break.
    pub break_enable: bool,

    /// Bit 7 (`DLAB`) maps the divisor latch over `DATA`/`IER`.
    pub dlab: bool,
}

/// FIFO Control Register.
#[bitfield(u8, order = Lsb)]
#[derive(Eq, PartialEq)]
pub struct FifoControl {
    pub enable: bool,
    pub clear_receive: bool,
    pub clear_transmit: bool,
    pub dma_mode: bool,

    #[bits(2)]
    pub reserved: u8,

    /// Receive trigger level; `0b11` = 14 bytes.
    #[bits(2)]
    pub trigger_level: u8,
}

/// Modem Control Register.
#[bitfield(u8, order = Lsb)]
#[derive(Eq, PartialEq)]
pub struct ModemControl {
    pub dtr: bool,
    pub rts: bool,
    pub out1: bool,
    /// Gates the UART interrupt line on PC hardware.
    pub out2: bool,
    pub loopback: bool,

    #[bits(3)]
    pub reserved: u8,
}

/// Line Status Register (read only).
#[bitfield(u8, order = Lsb)]
#[derive(Eq, PartialEq)]
pub struct LineStatus {
    pub data_ready: bool,
    pub overrun_error: bool,
    pub parity_error: bool,
    pub framing_error: bool,
    pub break_interrupt: bool,
    /// Bit 5 (`THRE`): a byte may be written.
    pub thr_empty: bool,
    pub transmitter_empty: bool,
    pub fifo_error: bool,
}

/// Divisor latch value for `baud`, clamped to `1..=u16::MAX`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn divisor_for(baud: u32) -> u16 {
    let div = UART_CLOCK_HZ / if baud == 0 { 1 } else { baud };
    if div == 0 {
        1
    } else if div > 0xFFFF {
        u16::MAX
    } else {
        div as u16
    }
}

/// A 16550-compatible UART at `base`.
pub struct SerialPort<P> {
    ports: P,
    base: u16,
}

impl<P: PortIo> SerialPort<P> {
    #[must_use]
    pub const fn new(ports: P, base: u16) -> Self {
        Self { ports, base }
    }

    /// Program 115200 baud, 8N1, FIFOs on with a 14-byte threshold,
    /// DTR/RTS/OUT2 asserted. Interrupts stay masked.
    pub fn init(&mut self) {
        self.init_with_baud(UART_CLOCK_HZ);
    }

    pub fn init_with_baud(&mut self, baud: u32) {
        let [div_lo, div_hi] = divisor_for(baud).to_le_bytes();
        let eight_n_one = LineControl::new().with_word_length(0b11);

        self.write_reg(reg::IER, 0x00);
        self.write_reg(reg::LCR, LineControl::new().with_dlab(true).into_bits());
        self.write_reg(reg::DATA, div_lo);
        self.write_reg(reg::IER, div_hi);
        self.write_reg(reg::LCR, eight_n_one.into_bits());
        self.write_reg(
            reg::FCR,
            FifoControl::new()
                .with_enable(true)
                .with_clear_receive(true)
                .with_clear_transmit(true)
                .with_trigger_level(0b11)
                .into_bits(),
        );
        self.write_reg(
            reg::MCR,
            ModemControl::new()
                .with_dtr(true)
                .with_rts(true)
                .with_out2(true)
                .into_bits(),
        );
    }

    pub fn line_status(&mut self) -> LineStatus {
        LineStatus::from_bits(self.ports.inb(self.base + reg::LSR))
    }

    /// Busy-wait until the transmitter can take a byte, then send it.
    pub fn write_byte(&mut self, byte: u8) {
        while !self.line_status().thr_empty() {
            spin_loop();
        }
        self.write_reg(reg::DATA, byte);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.write_byte(b);
        }
    }

    #[must_use]
    pub const fn base(&self) -> u16 {
        self.base
    }

    #[must_use]
    pub fn into_inner(self) -> P {
        self.ports
    }

    fn write_reg(&mut self, offset: u16, value: u8) {
        self.ports.outb(self.base + offset, value);
    }
}

impl<P: PortIo> fmt::Write for SerialPort<P> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_bytes(s.as_bytes());
        Ok(())
    }
}

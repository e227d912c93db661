//! VGA text mode console (80×25 cells at `0xB8000`).
//!
//! Each cell is `character | attribute << 8`. The cursor wraps back to the
//! top row instead of scrolling.

use core::fmt;

pub const VGA_COLS: usize = 80;
pub const VGA_ROWS: usize = 25;

/// Physical (and identity-mapped) address of the text buffer.
pub const VGA_TEXT_BUFFER: usize = 0xB8000;

/// White on black.
pub const DEFAULT_ATTRIBUTE: u8 = 0x0F;

/// Something that stores `VGA_COLS * VGA_ROWS` text cells.
pub trait CellBuffer {
    fn write_cell(&mut self, index: usize, cell: u16);
}

impl CellBuffer for [u16] {
    fn write_cell(&mut self, index: usize, cell: u16) {
        if let Some(slot) = self.get_mut(index) {
            *slot = cell;
        }
    }
}

impl<const N: usize> CellBuffer for [u16; N] {
    fn write_cell(&mut self, index: usize, cell: u16) {
        self.as_mut_slice().write_cell(index, cell);
    }
}

/// The memory-mapped hardware text buffer; writes are volatile.
pub struct VgaMmio {
    base: *mut u16,
}

// Safety: the buffer is a fixed device region, not tied to a thread.
unsafe impl Send for VgaMmio {}

impl VgaMmio {
    /// # Safety
    /// [`VGA_TEXT_BUFFER`] must be mapped and writable, and no other code may
    /// write to it concurrently.
    #[must_use]
    pub const unsafe fn new() -> Self {
        Self {
            base: VGA_TEXT_BUFFER as *mut u16,
        }
    }
}

impl CellBuffer for VgaMmio {
    fn write_cell(&mut self, index: usize, cell: u16) {
        if index < VGA_COLS * VGA_ROWS {
            // Safety: in bounds of the 80×25 buffer guaranteed by `new`.
            unsafe { self.base.add(index).write_volatile(cell) }
        }
    }
}

#[inline]
#[must_use]
#[allow(clippy::cast_lossless)]
pub const fn vga_cell(c: u8, attribute: u8) -> u16 {
    (c as u16) | ((attribute as u16) << 8)
}

pub struct VgaText<B> {
    buffer: B,
    row: usize,
    col: usize,
    attribute: u8,
}

impl<B: CellBuffer> VgaText<B> {
    #[must_use]
    pub const fn new(buffer: B) -> Self {
        Self {
            buffer,
            row: 0,
            col: 0,
            attribute: DEFAULT_ATTRIBUTE,
        }
    }

    pub const fn set_attribute(&mut self, attribute: u8) {
        self.attribute = attribute;
    }

    /// Blank every cell and home the cursor.
    pub fn clear(&mut self) {
        let blank = vga_cell(b' ', self.attribute);
        for index in 0..VGA_COLS * VGA_ROWS {
            self.buffer.write_cell(index, blank);
        }
        self.row = 0;
        self.col = 0;
    }

    pub fn put_byte(&mut self, c: u8) {
        if c == b'\n' {
            self.new_line();
            return;
        }

        self.buffer
            .write_cell(self.row * VGA_COLS + self.col, vga_cell(c, self.attribute));
        self.col += 1;
        if self.col >= VGA_COLS {
            self.new_line();
        }
    }

    fn new_line(&mut self) {
        self.col = 0;
        self.row = (self.row + 1) % VGA_ROWS;
    }

    /// Current `(row, col)`.
    #[must_use]
    pub const fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    #[must_use]
    pub fn into_inner(self) -> B {
        self.buffer
    }
}

impl<B: CellBuffer> fmt::Write for VgaText<B> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for b in s.bytes() {
            // Code page 437 has no UTF-8; show non-ASCII as a filled block.
            self.put_byte(if b.is_ascii() { b } else { 0xFE });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    fn screen() -> [u16; VGA_COLS * VGA_ROWS] {
        [0xDEAD; VGA_COLS * VGA_ROWS]
    }

    fn text_at(cells: &[u16], row: usize, len: usize) -> String {
        cells[row * VGA_COLS..row * VGA_COLS + len]
            .iter()
            .map(|c| char::from((c & 0xFF) as u8))
            .collect()
    }

    #[test]
    fn clear_blanks_with_attribute() {
        let mut vga = VgaText::new(screen());
        vga.clear();
        let cells = vga.into_inner();
        assert!(cells.iter().all(|&c| c == 0x0F20));
    }

    #[test]
    fn writes_text_and_handles_newline() {
        let mut vga = VgaText::new(screen());
        vga.clear();
        vga.write_str("Hello, Kernel\nok").unwrap();
        assert_eq!(vga.cursor(), (1, 2));
        let cells = vga.into_inner();
        assert_eq!(text_at(&cells[..], 0, 13), "Hello, Kernel");
        assert_eq!(text_at(&cells[..], 1, 2), "ok");
        assert_eq!(cells[0] >> 8, u16::from(DEFAULT_ATTRIBUTE));
    }

    #[test]
    fn long_lines_wrap_and_last_row_wraps_to_top() {
        let mut vga = VgaText::new(screen());
        vga.clear();
        for _ in 0..VGA_COLS {
            vga.put_byte(b'x');
        }
        assert_eq!(vga.cursor(), (1, 0));

        for _ in 1..VGA_ROWS {
            vga.put_byte(b'\n');
        }
        assert_eq!(vga.cursor(), (0, 0));
        vga.put_byte(b'y');
        let cells = vga.into_inner();
        assert_eq!(cells[0], vga_cell(b'y', DEFAULT_ATTRIBUTE));
    }

    #[test]
    fn out_of_range_slice_writes_are_ignored() {
        let mut small = [0u16; 4];
        small.write_cell(10, 1);
        assert_eq!(small, [0; 4]);
    }
}

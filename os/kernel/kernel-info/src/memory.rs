//! # Memory Layout

/// One mebibyte.
pub const MIB: u64 = 1024 * 1024;

/// Size of a physical frame handed out by the bootstrap frame allocator.
pub const FRAME_SIZE: u64 = 2 * MIB;

/// First physical address managed by the frame allocator.
///
/// Everything below is left to the boot image (identity map, early page
/// tables, boot stack) and is never handed out.
pub const FRAME_REGION_START: u64 = 2 * MIB;

/// Exclusive upper bound of the identity-mapped frame window.
pub const FRAME_REGION_END: u64 = 64 * MIB;

/// Number of frames available in `[FRAME_REGION_START, FRAME_REGION_END)`.
pub const FRAME_COUNT: u64 = (FRAME_REGION_END - FRAME_REGION_START) / FRAME_SIZE;

/// Capacity of the statically reserved kernel heap arena in bytes.
pub const KERNEL_HEAP_SIZE: usize = 64 * 1024;

/// Granularity and minimum alignment of kernel heap blocks.
pub const HEAP_ALIGN: usize = 16;

const _: () = {
    assert!(FRAME_SIZE.is_power_of_two());
    assert!(FRAME_REGION_START > 0, "address zero is the exhaustion sentinel");
    assert!(FRAME_REGION_START.is_multiple_of(FRAME_SIZE));
    assert!(FRAME_REGION_END.is_multiple_of(FRAME_SIZE));
    assert!(FRAME_REGION_END > FRAME_REGION_START);
    assert!(HEAP_ALIGN.is_power_of_two());
    assert!(KERNEL_HEAP_SIZE.is_multiple_of(HEAP_ALIGN));
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_holds_31_frames() {
        assert_eq!(FRAME_COUNT, 31);
        assert_eq!(FRAME_REGION_START + FRAME_COUNT * FRAME_SIZE, FRAME_REGION_END);
    }
}

//! Allocation error types.
//!
//! Every failure leaves the allocator that reported it unchanged, so all of
//! these are recoverable from the caller's point of view.

/// Failure of the physical frame allocator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameAllocError {
    /// The managed window has no room for another frame.
    #[error("physical frame window exhausted")]
    Exhausted,
    /// The requested window is reversed, unaligned, or starts at address zero.
    #[error("invalid physical frame window")]
    InvalidRegion,
}

/// Failure of the kernel heap bump allocator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeapError {
    /// Zero-sized requests never produce a block.
    #[error("zero-sized heap request")]
    InvalidRequest,
    /// The arena cannot hold the (aligned) request.
    #[error("kernel heap exhausted")]
    Exhausted,
}

/// Failure of the memory subsystem lifecycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InitError {
    #[error("memory subsystem already initialized")]
    AlreadyInitialized,
}

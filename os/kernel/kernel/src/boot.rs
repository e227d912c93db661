//! Memory bring-up during kernel startup.

use core::fmt::{self, Write};
use kernel_alloc::{FrameAlloc, InitError, NO_FRAME, with_frame_allocator};
use log::{info, warn};

/// Number of frames allocated to check the frame allocator is alive.
pub const PROBE_FRAMES: usize = 2;

/// Outcome of [`start_memory`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BootReport {
    pub init: Result<(), InitError>,
    /// Base address of each probe frame, or [`NO_FRAME`] if it failed.
    pub frames: [u64; PROBE_FRAMES],
}

impl BootReport {
    #[must_use]
    pub fn allocated(&self) -> usize {
        self.frames.iter().filter(|&&f| f != NO_FRAME).count()
    }

    /// Print one `[pmm] allocated 2MiB frame N` line per successful probe,
    /// numbered from 1.
    ///
    /// # Errors
    /// Propagates failures of `out`.
    pub fn write_to(&self, out: &mut impl Write) -> fmt::Result {
        for (n, _) in self
            .frames
            .iter()
            .enumerate()
            .filter(|&(_, &f)| f != NO_FRAME)
        {
            writeln!(out, "[pmm] allocated 2MiB frame {}", n + 1)?;
        }
        Ok(())
    }
}

/// Allocate [`PROBE_FRAMES`] frames from `alloc`. They are not returned.
pub fn probe_frames(alloc: &mut impl FrameAlloc) -> [u64; PROBE_FRAMES] {
    core::array::from_fn(|_| alloc.alloc_2m().map_or(NO_FRAME, u64::from))
}

/// Initialize the memory subsystem and probe the global frame allocator.
///
/// Results are reported on `console`; output errors are ignored since the
/// console is the only place they could be reported to.
pub fn start_memory(console: &mut impl Write) -> BootReport {
    let init = kernel_alloc::init();
    if let Err(e) = init {
        warn!("continuing after memory init failure: {e}");
    }

    let frames = with_frame_allocator(probe_frames);
    let report = BootReport { init, frames };
    info!("{} of {PROBE_FRAMES} probe frames allocated", report.allocated());

    let _ = report.write_to(console);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel_alloc::{BumpFrameAlloc, Frame};
    use kernel_info::memory::MIB;

    /// Hands out nothing; counts requests.
    #[derive(Default)]
    struct DryAlloc {
        requests: usize,
    }

    impl FrameAlloc for DryAlloc {
        fn alloc_2m(&mut self) -> Option<Frame> {
            self.requests += 1;
            None
        }

        fn free_2m(&mut self, _frame: Frame) {}
    }

    #[test]
    fn probe_takes_two_consecutive_frames() {
        let mut alloc = BumpFrameAlloc::new();
        assert_eq!(probe_frames(&mut alloc), [2 * MIB, 4 * MIB]);
        assert_eq!(alloc.allocated_frames(), 2);
    }

    #[test]
    fn probe_reports_sentinel_when_window_runs_out() {
        let mut alloc = BumpFrameAlloc::with_region(8 * MIB, 10 * MIB).unwrap();
        assert_eq!(probe_frames(&mut alloc), [8 * MIB, NO_FRAME]);

        let mut dry = DryAlloc::default();
        assert_eq!(probe_frames(&mut dry), [NO_FRAME; PROBE_FRAMES]);
        assert_eq!(dry.requests, PROBE_FRAMES);
    }

    #[test]
    fn report_prints_only_successful_frames() {
        let report = BootReport {
            init: Ok(()),
            frames: [NO_FRAME, 4 * MIB],
        };
        let mut out = String::new();
        report.write_to(&mut out).unwrap();
        assert_eq!(out, "[pmm] allocated 2MiB frame 2\n");
        assert_eq!(report.allocated(), 1);

        let full = BootReport {
            init: Err(InitError::AlreadyInitialized),
            frames: [2 * MIB, 4 * MIB],
        };
        let mut out = String::new();
        full.write_to(&mut out).unwrap();
        assert_eq!(
            out,
            "[pmm] allocated 2MiB frame 1\n[pmm] allocated 2MiB frame 2\n"
        );
    }
}

use kernel::boot::{BootReport, start_memory};
use kernel_alloc::{InitError, is_initialized};
use kernel_info::memory::MIB;

// The memory subsystem is process-global, so the whole sequence lives in one
// test.
#[test]
fn start_memory_initializes_once_and_keeps_allocating() {
    assert!(!is_initialized());

    let mut console = String::new();
    let first = start_memory(&mut console);
    assert_eq!(
        first,
        BootReport {
            init: Ok(()),
            frames: [2 * MIB, 4 * MIB],
        }
    );
    assert!(is_initialized());
    assert_eq!(
        console,
        "[pmm] allocated 2MiB frame 1\n[pmm] allocated 2MiB frame 2\n"
    );

    console.clear();
    let second = start_memory(&mut console);
    assert_eq!(second.init, Err(InitError::AlreadyInitialized));
    assert_eq!(second.frames, [6 * MIB, 8 * MIB]);
    assert_eq!(second.allocated(), 2);
    assert_eq!(console.lines().count(), 2);
}

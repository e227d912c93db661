//! The singletons are process-wide, so the whole lifecycle runs as one test.

use kernel_alloc::{
    InitError, NO_FRAME, init, is_initialized, kfree, kmalloc, pmm_alloc_2m, pmm_free_2m,
    with_frame_allocator, with_kernel_heap,
};
use kernel_info::memory::{FRAME_COUNT, FRAME_REGION_START, FRAME_SIZE, KERNEL_HEAP_SIZE};

#[test]
fn lifecycle_of_the_global_allocators() {
    assert!(!is_initialized());
    assert_eq!(init(), Ok(()));
    assert!(is_initialized());
    assert_eq!(init(), Err(InitError::AlreadyInitialized));
    assert!(is_initialized());

    // frames
    let first = pmm_alloc_2m();
    assert_eq!(first, FRAME_REGION_START);
    pmm_free_2m(first);
    let second = pmm_alloc_2m();
    assert_eq!(second, first + FRAME_SIZE);

    let mut last = second;
    for _ in 2..FRAME_COUNT {
        let next = pmm_alloc_2m();
        assert_eq!(next, last + FRAME_SIZE);
        last = next;
    }
    assert_eq!(pmm_alloc_2m(), NO_FRAME);
    assert_eq!(pmm_alloc_2m(), NO_FRAME);
    assert!(with_frame_allocator(|f| f.is_exhausted()));

    // heap
    assert!(kmalloc(0).is_none());
    assert_eq!(with_kernel_heap(|h| h.used()), 0);

    let a = kmalloc(10).expect("first block");
    let b = kmalloc(1).expect("second block");
    assert_eq!(a.as_ptr() as usize % 16, 0);
    assert_eq!(b.as_ptr() as usize - a.as_ptr() as usize, 16);

    unsafe {
        a.as_ptr().write_bytes(0xEE, 16);
        assert_eq!(*a.as_ptr().add(15), 0xEE);
    }
    assert_eq!(with_kernel_heap(|h| h.used()), 32);

    // Later allocations must not invalidate earlier blocks.
    let c = kmalloc(16).expect("third block");
    unsafe {
        a.as_ptr().write(1);
        c.as_ptr().write(2);
        b.as_ptr().write(3);
        assert_eq!(a.as_ptr().read(), 1);
        assert_eq!(c.as_ptr().read(), 2);
    }
    assert_eq!(with_kernel_heap(|h| h.used()), 48);

    assert!(kmalloc(KERNEL_HEAP_SIZE).is_none());
    assert_eq!(with_kernel_heap(|h| h.used()), 48);
    assert!(kmalloc(KERNEL_HEAP_SIZE - 48).is_some());
    assert!(kmalloc(1).is_none());
    unsafe { a.as_ptr().write(4) };
    kfree(a);
    assert!(with_kernel_heap(|h| h.is_exhausted()));
}

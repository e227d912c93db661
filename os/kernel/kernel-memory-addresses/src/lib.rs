//! # Physical Memory Address Types
//!
//! Strongly typed wrappers for physical addresses and the page-aligned frames
//! the bootstrap allocators hand out.
//!
//! ## Overview
//!
//! | Type | Description |
//! |------|-------------|
//! | [`PhysicalAddress`] | A raw 64-bit physical address. |
//! | [`PhysicalPage<S>`] | The page-aligned base of a physical frame of size `S`. |
//!
//! ## Page Sizes
//!
//! Page sizes are marker types implementing [`PageSize`]. The bootstrap
//! allocators only deal in [`Size2M`] frames.
//!
//! ## Typical Usage
//!
//! ```rust
//! # use kernel_memory_addresses::*;
//! let pa = PhysicalAddress::new(0x0060_1234);
//! let frame = pa.page::<Size2M>();
//! assert_eq!(frame.base().as_u64(), 0x0060_0000);
//! assert_eq!(frame.end().as_u64(), 0x0080_0000);
//! assert!(frame.contains(pa));
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(clippy::inline_always)]

use core::fmt;
use core::hash::Hash;
use core::marker::PhantomData;

/// Sealed trait pattern to restrict `PageSize` impls to our markers.
mod sealed {
    pub trait Sealed {}
}

/// Marker trait for supported page sizes.
pub trait PageSize:
    sealed::Sealed + Clone + Copy + Eq + PartialEq + Ord + PartialOrd + Hash + fmt::Display + fmt::Debug
{
    /// Page size in bytes (power of two).
    const SIZE: u64;
    /// log2(SIZE), i.e., number of low bits used for the offset.
    const SHIFT: u32;

    fn as_str() -> &'static str;
}

/// 2 MiB page (`2_097_152` bytes).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Size2M;
impl sealed::Sealed for Size2M {}
impl PageSize for Size2M {
    const SIZE: u64 = 2 * 1024 * 1024;
    const SHIFT: u32 = 21;

    fn as_str() -> &'static str {
        "2M"
    }
}

macro_rules! page_size_fmt {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    f.write_str(Self::as_str())
                }
            }

            impl fmt::Debug for $ty {
                fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    fmt::Display::fmt(&self, f)
                }
            }
        )*
    };
}

page_size_fmt!(Size2M);

/// Physical memory address.
///
/// Denotes host RAM (or MMIO) as seen before any translation. While the kernel
/// runs on the boot identity map, the numeric value is also directly usable as
/// a pointer.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PhysicalAddress(u64);

impl PhysicalAddress {
    #[inline(always)]
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[inline(always)]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Whether the address is a multiple of `S::SIZE`.
    #[inline]
    #[must_use]
    pub const fn is_aligned<S: PageSize>(self) -> bool {
        self.0 & (S::SIZE - 1) == 0
    }

    #[inline]
    #[must_use]
    pub const fn checked_add(self, rhs: u64) -> Option<Self> {
        match self.0.checked_add(rhs) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// The `S` page containing this address.
    #[inline]
    #[must_use]
    pub const fn page<S: PageSize>(self) -> PhysicalPage<S> {
        PhysicalPage::containing(self)
    }
}

impl fmt::Display for PhysicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018X}", self.0)
    }
}

impl fmt::Debug for PhysicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PA({:#018X})", self.0)
    }
}

impl From<u64> for PhysicalAddress {
    #[inline]
    fn from(v: u64) -> Self {
        Self::new(v)
    }
}

impl From<PhysicalAddress> for u64 {
    #[inline]
    fn from(a: PhysicalAddress) -> Self {
        a.as_u64()
    }
}

/// Physical memory page (frame) of size `S`.
///
/// ### Invariants
/// - The low `S::SHIFT` bits of the base are always zero (page aligned).
///
/// ### Examples
/// ```rust
/// # use kernel_memory_addresses::*;
/// let frame = PhysicalPage::<Size2M>::try_from(PhysicalAddress::new(0x0040_0000)).unwrap();
/// assert_eq!(frame.next().map(|f| f.base().as_u64()), Some(0x0060_0000));
/// assert!(PhysicalPage::<Size2M>::try_from(PhysicalAddress::new(0x0040_1000)).is_err());
/// ```
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PhysicalPage<S: PageSize> {
    base: u64,
    _size: PhantomData<S>,
}

impl<S: PageSize> PhysicalPage<S> {
    /// The page containing `addr`.
    #[inline]
    #[must_use]
    pub const fn containing(addr: PhysicalAddress) -> Self {
        Self {
            base: addr.0 & !(S::SIZE - 1),
            _size: PhantomData,
        }
    }

    #[inline]
    #[must_use]
    pub const fn base(self) -> PhysicalAddress {
        PhysicalAddress(self.base)
    }

    /// Exclusive end address, saturating at `u64::MAX`.
    #[inline]
    #[must_use]
    pub const fn end(self) -> PhysicalAddress {
        PhysicalAddress(self.base.saturating_add(S::SIZE))
    }

    /// The directly following page, or `None` past the end of the address space.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.base.checked_add(S::SIZE) {
            Some(base) => Some(Self {
                base,
                _size: PhantomData,
            }),
            None => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, addr: PhysicalAddress) -> bool {
        addr.0 >= self.base && addr.0 - self.base < S::SIZE
    }

    #[inline]
    #[must_use]
    pub const fn overlaps(self, other: Self) -> bool {
        self.base == other.base
    }
}

impl<S: PageSize> fmt::Display for PhysicalPage<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.base(), f)
    }
}

impl<S: PageSize> fmt::Debug for PhysicalPage<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PhysicalPage<{}>({:#018X})", S::as_str(), self.base)
    }
}

impl<S: PageSize> TryFrom<PhysicalAddress> for PhysicalPage<S> {
    type Error = PhysicalAddress;

    /// Accepts only page-aligned addresses; hands the address back otherwise.
    #[inline]
    fn try_from(pa: PhysicalAddress) -> Result<Self, PhysicalAddress> {
        if pa.is_aligned::<S>() {
            Ok(pa.page())
        } else {
            Err(pa)
        }
    }
}

impl<S: PageSize> From<PhysicalPage<S>> for PhysicalAddress {
    #[inline]
    fn from(value: PhysicalPage<S>) -> Self {
        value.base()
    }
}

impl<S: PageSize> From<PhysicalPage<S>> for u64 {
    #[inline]
    fn from(value: PhysicalPage<S>) -> Self {
        value.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u64 = 1024 * 1024;

    #[test]
    fn alignment_helpers_2m() {
        let pa = PhysicalAddress::new(2 * MIB + 0x345);
        assert!(!pa.is_aligned::<Size2M>());
        assert_eq!(pa.page::<Size2M>().base().as_u64(), 2 * MIB);
        assert!(PhysicalAddress::new(8 * MIB).is_aligned::<Size2M>());
    }

    #[test]
    fn checked_add_overflow_is_none() {
        let pa = PhysicalAddress::new(u64::MAX - 1);
        assert_eq!(pa.checked_add(2), None);
        assert_eq!(pa.checked_add(1).map(PhysicalAddress::as_u64), Some(u64::MAX));
    }

    #[test]
    fn page_bounds_and_contains() {
        let frame = PhysicalAddress::new(2 * MIB).page::<Size2M>();
        assert_eq!(frame.end().as_u64(), 4 * MIB);
        assert!(frame.contains(PhysicalAddress::new(4 * MIB - 1)));
        assert!(!frame.contains(PhysicalAddress::new(4 * MIB)));
        assert!(!frame.contains(PhysicalAddress::new(2 * MIB - 1)));
        assert_eq!(frame.next().map(|f| f.base().as_u64()), Some(4 * MIB));
    }

    #[test]
    fn last_page_has_no_successor() {
        let last = PhysicalAddress::new(u64::MAX).page::<Size2M>();
        assert_eq!(last.next(), None);
        assert_eq!(last.end().as_u64(), u64::MAX);
    }

    #[test]
    fn try_from_rejects_unaligned() {
        let ok = PhysicalPage::<Size2M>::try_from(PhysicalAddress::new(4 * MIB));
        assert_eq!(ok.map(PhysicalPage::base), Ok(PhysicalAddress::new(4 * MIB)));

        let err = PhysicalPage::<Size2M>::try_from(PhysicalAddress::new(4 * MIB + 4096));
        assert_eq!(err, Err(PhysicalAddress::new(4 * MIB + 4096)));
    }

    #[test]
    fn formatting() {
        let frame = PhysicalAddress::new(2 * MIB).page::<Size2M>();
        assert_eq!(format!("{frame:?}"), "PhysicalPage<2M>(0x0000000000200000)");
        assert_eq!(format!("{}", frame.base()), "0x0000000000200000");
    }
}

//! Buffer size constants.
//!
//! # Invariant
//!
//! The following relationships must hold between the constants:
//!
//! - `MIN_CAPACITY` is a power of 2 and at least 16 bytes
//! - `DEFAULT_CAPACITY` is a power of 2 multiple of `MIN_CAPACITY`
//! - `MAX_CAPACITY > DEFAULT_CAPACITY`
//!
//! A reader's capacity is always within `MIN_CAPACITY..=MAX_CAPACITY`.

/// Default buffer capacity (2 KiB) used by [`FwdReader::new`](crate::FwdReader::new).
///
/// Small enough to keep many readers around, large enough that a typical header or length-prefixed
/// frame can be peeked without growing the buffer.
pub const DEFAULT_CAPACITY: usize =
    // 2^11 = 2048 = 2 KiB
    1 << 11;

/// Minimum buffer capacity (16 bytes).
///
/// Requested capacities below this are raised to it.
pub const MIN_CAPACITY: usize = 16;

/// Maximum buffer capacity.
///
/// A `Vec<u8>` can't hold more than `isize::MAX` bytes, so any growth past this is rejected with
/// [`Error::TooLarge`](crate::Error::TooLarge) instead of aborting on allocation.
pub const MAX_CAPACITY: usize = isize::MAX as usize;

#[cfg(test)]
mod tests;

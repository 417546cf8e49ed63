//! Tests for the constants
//!
//! This test validates the invariants between the buffer size constants.

use super::*;

#[test]
#[expect(
    clippy::assertions_on_constants,
    reason = "Asserting an invariant on the constants"
)]
fn test_invariant() {
    // MIN_CAPACITY is at least 16 bytes
    assert!(MIN_CAPACITY >= 16);

    // MIN_CAPACITY is a power of two
    assert_eq!(MIN_CAPACITY & (MIN_CAPACITY - 1), 0);

    // DEFAULT_CAPACITY is larger than MIN_CAPACITY
    assert!(DEFAULT_CAPACITY > MIN_CAPACITY);

    // DEFAULT_CAPACITY is a multiple of MIN_CAPACITY
    assert_eq!(DEFAULT_CAPACITY % MIN_CAPACITY, 0);

    // DEFAULT_CAPACITY is a power of two multiple of MIN_CAPACITY
    let k = DEFAULT_CAPACITY / MIN_CAPACITY;
    assert_eq!(k & (k - 1), 0);

    // MAX_CAPACITY is larger than DEFAULT_CAPACITY
    assert!(MAX_CAPACITY > DEFAULT_CAPACITY);

    // MAX_CAPACITY fits a Vec allocation
    assert_eq!(MAX_CAPACITY, isize::MAX as usize);
}

#[test]
fn test_default_values() {
    assert_eq!(DEFAULT_CAPACITY, 2048);
    assert_eq!(MIN_CAPACITY, 16);
}

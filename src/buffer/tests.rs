//! Tests for the Buffer
//!
//! These tests are in the same narrative order as the main file, and are designed to not depend on
//! things that we've yet to have written tests for, at least narratively.

#![expect(
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing,
    clippy::unwrap_used,
    reason = "Okay in tests"
)]

use super::*;
use std::collections::VecDeque;
use std::io;

/// A source that replays a fixed script of pulls and records the space it was offered.
#[derive(Default)]
struct Script {
    steps: VecDeque<Step>,
    offered: Vec<usize>,
}

enum Step {
    Data(&'static [u8]),
    Nothing,
    Fail(io::ErrorKind),
}

impl Script {
    fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            offered: Vec::new(),
        }
    }
}

impl Source for Script {
    fn pull(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.offered.push(buf.len());
        match self.steps.pop_front() {
            None => Err(Error::EndOfData),
            Some(Step::Data(data)) => {
                let n = cmp::min(data.len(), buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                Ok(n)
            }
            Some(Step::Nothing) => Ok(0),
            Some(Step::Fail(kind)) => Err(Error::Io(kind.into())),
        }
    }
}

/// Fills `buffer` from a slice and checks it all went in with one pull.
fn inject(buffer: &mut Buffer, data: &[u8]) {
    let mut source = data;
    assert_eq!(buffer.fill(&mut source).unwrap(), data.len());
}

// -----------------------------------------------------------------------------
// Buffer - Creation
// -----------------------------------------------------------------------------

#[test]
fn test_buffer_with_capacity() {
    let buffer = Buffer::with_capacity(100);

    // Check that the internal Vec state matches expectations
    assert_eq!(buffer.buf.len(), 100);

    // Check internal state matches expectations
    assert_eq!(buffer.cap(), 100);
    assert_eq!(buffer.len, 0);
    assert_eq!(buffer.pos, 0);
}

#[test]
fn test_buffer_with_capacity_floor() {
    // Anything below the floor is raised to it
    assert_eq!(Buffer::with_capacity(0).cap(), MIN_CAPACITY);
    assert_eq!(Buffer::with_capacity(MIN_CAPACITY - 1).cap(), MIN_CAPACITY);

    // The floor itself and anything above is exact
    assert_eq!(Buffer::with_capacity(MIN_CAPACITY).cap(), MIN_CAPACITY);
    assert_eq!(Buffer::with_capacity(MIN_CAPACITY + 1).cap(), MIN_CAPACITY + 1);
}

// -----------------------------------------------------------------------------
// Buffer - Accessors
// -----------------------------------------------------------------------------

#[test]
fn test_buffer_accessors() {
    let mut buffer = Buffer::with_capacity(32);

    // Starts empty
    assert!(buffer.is_empty());
    assert_eq!(buffer.len(), 0);
    assert_eq!(buffer.pos(), 0);
    assert_eq!(buffer.available(), 0);
    assert_eq!(buffer.unconsumed(), b"");

    // Pretend we have data, part of it consumed
    buffer.buf[..13].copy_from_slice(b"Hello, World!");
    buffer.len = 13;
    buffer.pos = 7;

    assert!(!buffer.is_empty());
    assert_eq!(buffer.len(), 13);
    assert_eq!(buffer.pos(), 7);
    assert_eq!(buffer.available(), 6);
    assert_eq!(buffer.unconsumed(), b"World!");
}

// -----------------------------------------------------------------------------
// Buffer - State mutation
// -----------------------------------------------------------------------------

#[test]
fn test_buffer_consume() {
    let mut buffer = Buffer::with_capacity(64);

    // Calling consume on an empty buffer shouldn't move pos
    buffer.consume(12);
    assert_eq!(buffer.pos(), 0);

    // Pretend we have data
    buffer.len = 45;

    // Consuming some bytes should now move pos
    buffer.consume(12);
    assert_eq!(buffer.pos(), 12);

    // Consuming more than available should cap out
    buffer.consume(500);
    assert_eq!(buffer.pos(), 45);
    assert_eq!(buffer.pos(), buffer.len()); // to show len didn't change

    // Consuming usize::MAX must not overflow
    buffer.consume(usize::MAX);
    assert_eq!(buffer.pos(), 45);
}

#[test]
fn test_buffer_clear() {
    let mut buffer = Buffer::with_capacity(64);

    // Pretend we have data
    buffer.len = 45;
    buffer.pos = 12;

    // Clearing the buffer should make it empty without changing capacity
    buffer.clear();
    assert!(buffer.is_empty());
    assert_eq!(buffer.pos(), 0);
    assert_eq!(buffer.cap(), 64);
}

#[test]
fn test_buffer_compact() {
    let mut buffer = Buffer::with_capacity(32);

    // Calling it on an empty buffer shouldn't change anything
    buffer.compact();
    assert!(buffer.is_empty());
    assert_eq!(buffer.pos(), 0);

    // Push data and consume some of it
    inject(&mut buffer, b"Hello, World!");
    buffer.consume(7);

    // Compacting moves "World!" to the start
    buffer.compact();
    assert_eq!(&buffer.buf[..6], b"World!");
    assert_eq!(buffer.len(), 6);
    assert_eq!(buffer.pos(), 0);
    assert_eq!(buffer.unconsumed(), b"World!");

    // Consume the rest, compacting makes it empty
    buffer.consume(6);
    buffer.compact();
    assert!(buffer.is_empty());
    assert_eq!(buffer.pos(), 0);
}

// -----------------------------------------------------------------------------
// Buffer - Growth
// -----------------------------------------------------------------------------

#[test]
fn test_buffer_grow_exact_empty() {
    let mut buffer = Buffer::with_capacity(16);

    buffer.grow_exact(100).unwrap();
    assert_eq!(buffer.cap(), 100);
    assert!(buffer.is_empty());
}

#[test]
fn test_buffer_grow_exact_keeps_unconsumed() {
    let mut buffer = Buffer::with_capacity(16);
    inject(&mut buffer, b"0123456789abcdef");
    buffer.consume(10);

    buffer.grow_exact(40).unwrap();

    // Sized to the request plus what was still unread, which now sits at the front
    assert_eq!(buffer.cap(), 46);
    assert_eq!(buffer.pos(), 0);
    assert_eq!(buffer.len(), 6);
    assert_eq!(buffer.unconsumed(), b"abcdef");
}

#[test]
fn test_buffer_grow_exact_too_large() {
    let mut buffer = Buffer::with_capacity(16);
    inject(&mut buffer, b"abc");

    let err = buffer.grow_exact(usize::MAX).unwrap_err();
    assert!(matches!(err, Error::TooLarge { requested } if requested == usize::MAX));

    let err = buffer.grow_exact(MAX_CAPACITY).unwrap_err();
    assert!(matches!(err, Error::TooLarge { .. }));

    // Untouched
    assert_eq!(buffer.cap(), 16);
    assert_eq!(buffer.unconsumed(), b"abc");
}

// -----------------------------------------------------------------------------
// Buffer - Filling
// -----------------------------------------------------------------------------

#[test]
fn test_buffer_fill_single_pull() {
    let mut buffer = Buffer::with_capacity(16);
    let mut source = Script::new([Step::Data(b"abc"), Step::Data(b"def")]);

    // Only one pull happens even though more data and space are available
    assert_eq!(buffer.fill(&mut source).unwrap(), 3);
    assert_eq!(source.offered, [16]);
    assert_eq!(buffer.unconsumed(), b"abc");
}

#[test]
fn test_buffer_fill_compacts_first() {
    let mut buffer = Buffer::with_capacity(16);
    let mut source = Script::new([Step::Data(b"0123456789"), Step::Data(b"XYZ")]);

    buffer.fill(&mut source).unwrap();
    buffer.consume(8);

    // The 2 unread bytes move to the front so the pull is offered 14 bytes, not 6
    assert_eq!(buffer.fill(&mut source).unwrap(), 3);
    assert_eq!(source.offered, [16, 14]);
    assert_eq!(buffer.pos(), 0);
    assert_eq!(buffer.unconsumed(), b"89XYZ");
}

#[test]
fn test_buffer_fill_full_does_not_pull() {
    let mut buffer = Buffer::with_capacity(16);
    inject(&mut buffer, b"0123456789abcdef");

    let mut source = Script::new([Step::Data(b"never")]);
    assert_eq!(buffer.fill(&mut source).unwrap(), 0);
    assert!(source.offered.is_empty());
}

#[test]
fn test_buffer_fill_no_progress() {
    let mut buffer = Buffer::with_capacity(16);
    let mut source = Script::new([Step::Nothing]);

    let err = buffer.fill(&mut source).unwrap_err();
    assert!(matches!(err, Error::NoProgress));
    assert!(buffer.is_empty());
}

#[test]
fn test_buffer_fill_errors_pass_through() {
    let mut buffer = Buffer::with_capacity(16);
    let mut source = Script::new([Step::Data(b"ab"), Step::Fail(io::ErrorKind::TimedOut)]);

    buffer.fill(&mut source).unwrap();

    // An error leaves the data already buffered alone
    let err = buffer.fill(&mut source).unwrap_err();
    assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::TimedOut));
    assert_eq!(buffer.unconsumed(), b"ab");

    // End of data is reported as-is
    let err = buffer.fill(&mut source).unwrap_err();
    assert!(err.is_end_of_data());
}

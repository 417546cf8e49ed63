//! Look-ahead buffer with compaction and exact growth.
//!
//! The [`Buffer`] type owns the storage behind a [`FwdReader`](crate::FwdReader). It splits its
//! storage in three regions at all times:
//!
//! ```text
//! 0           pos              len               cap
//! | consumed  | buffered       | free            |
//! ```
//!
//! - `buf[..pos]` has been consumed but not yet discarded.
//! - `buf[pos..len]` is buffered and available to peek, consume or skip.
//! - `buf[len..cap]` is free space for the next [`fill`](Buffer::fill).
//!
//! # Example
//!
//! ```
//! use fwd_reader::buffer::Buffer;
//!
//! let mut buffer = Buffer::with_capacity(16);
//! let mut source: &[u8] = b"Hello, World!";
//!
//! // One pull from the source
//! let n = buffer.fill(&mut source).unwrap();
//! assert_eq!(n, 13);
//!
//! // Consume what we processed
//! buffer.consume(7);
//! assert_eq!(buffer.unconsumed(), b"World!");
//!
//! // The next fill moves "World!" to the front before pulling again
//! buffer.compact();
//! assert_eq!(buffer.pos(), 0);
//! assert_eq!(buffer.len(), 6);
//! ```

use std::cmp;

use crate::Source;
use crate::constants::{MAX_CAPACITY, MIN_CAPACITY};
use crate::error::{Error, Result};

/// A fixed capacity buffer that only grows on explicit request.
///
/// # Invariants
///
/// This buffer maintains the invariant `0 <= self.pos <= self.len <= self.cap() == self.buf.len()`
/// at all times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    /// Internal buffer storage, its length is the capacity.
    buf: Vec<u8>,
    /// Number of bytes currently stored in the buffer.
    len: usize,
    /// Number of bytes that have been consumed (read position).
    pos: usize,
}

impl Buffer {
    /// Creates a new buffer with exactly the given capacity, raised to [`MIN_CAPACITY`] if smaller.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fwd_reader::buffer::Buffer;
    /// # use fwd_reader::constants::MIN_CAPACITY;
    /// assert_eq!(Buffer::with_capacity(100).cap(), 100);
    /// assert_eq!(Buffer::with_capacity(1).cap(), MIN_CAPACITY);
    /// ```
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0; cmp::max(capacity, MIN_CAPACITY)],
            len: 0,
            pos: 0,
        }
    }

    /// Returns the total capacity of the buffer.
    #[inline]
    pub fn cap(&self) -> usize {
        self.buf.len()
    }

    /// Returns the end of the stored data.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no data is stored, consumed or not.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the read position.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Returns the number of buffered, unconsumed bytes.
    #[expect(clippy::arithmetic_side_effects, reason = "Safe by invariant")]
    #[inline]
    pub fn available(&self) -> usize {
        self.len - self.pos
    }

    /// Returns the buffered, unconsumed bytes.
    #[expect(clippy::indexing_slicing, reason = "Safe by invariant")]
    #[inline]
    pub fn unconsumed(&self) -> &[u8] {
        &self.buf[self.pos..self.len]
    }

    /// Returns up to `n` of the most recently consumed bytes, which are still in the buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fwd_reader::buffer::Buffer;
    /// let mut buffer = Buffer::with_capacity(16);
    /// buffer.fill(&mut &b"Hello, World!"[..]).unwrap();
    /// buffer.consume(7);
    /// assert_eq!(buffer.peek_behind(7), b"Hello, ");
    /// assert_eq!(buffer.peek_behind(100), b"Hello, ");
    /// ```
    #[expect(
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing,
        reason = "Safe by invariant"
    )]
    #[inline]
    pub fn peek_behind(&self, n: usize) -> &[u8] {
        &self.buf[self.pos - cmp::min(n, self.pos)..self.pos]
    }

    /// Marks `amt` bytes as consumed, advancing the read position.
    ///
    /// If `amt` exceeds the available data, the position is clamped to [`len()`](Self::len).
    #[expect(clippy::arithmetic_side_effects, reason = "Safe by invariant")]
    #[inline]
    pub fn consume(&mut self, amt: usize) {
        self.pos += cmp::min(amt, self.available());
    }

    /// Discards all data in the buffer, keeping the capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.pos = 0;
        self.len = 0;
    }

    /// Moves the unconsumed data to the start of the buffer and resets the read position to 0.
    ///
    /// This maximizes the contiguous free space at the end of the buffer.
    #[expect(clippy::arithmetic_side_effects, reason = "Safe by invariant")]
    #[inline]
    pub fn compact(&mut self) {
        if self.pos == 0 {
            return;
        }

        self.buf.copy_within(self.pos..self.len, 0);
        self.len -= self.pos;
        self.pos = 0;
    }

    /// Replaces the storage with one of exactly `n + self.available()` bytes, keeping the
    /// unconsumed data, in order, at its start.
    ///
    /// The growth is exact rather than amortized: callers ask for a size they already know.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fwd_reader::buffer::Buffer;
    /// let mut buffer = Buffer::with_capacity(16);
    /// let mut source: &[u8] = b"0123456789";
    /// buffer.fill(&mut source).unwrap();
    /// buffer.consume(4);
    ///
    /// buffer.grow_exact(32).unwrap();
    /// assert_eq!(buffer.cap(), 32 + 6);
    /// assert_eq!(buffer.pos(), 0);
    /// assert_eq!(buffer.unconsumed(), b"456789");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooLarge`] without touching the buffer if the new size would exceed
    /// [`MAX_CAPACITY`].
    #[expect(clippy::indexing_slicing, reason = "Safe by construction")]
    pub fn grow_exact(&mut self, n: usize) -> Result<()> {
        let available = self.available();
        let cap = n
            .checked_add(available)
            .filter(|&cap| cap <= MAX_CAPACITY)
            .ok_or(Error::TooLarge { requested: n })?;

        let mut buf = vec![0; cap];
        buf[..available].copy_from_slice(self.unconsumed());

        log::trace!("buffer grown from {} to {} bytes", self.cap(), cap);

        self.buf = buf;
        self.len = available;
        self.pos = 0;

        Ok(())
    }

    /// Pulls once from `source` into the free space, after compacting.
    ///
    /// Exactly one [`Source::pull`] is issued, offered all of `cap - len` after compaction, and the
    /// number of bytes it delivered is returned. When there is no free space no pull is issued and
    /// `Ok(0)` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fwd_reader::buffer::Buffer;
    /// let mut buffer = Buffer::with_capacity(16);
    /// let mut source: &[u8] = b"Hello";
    /// assert_eq!(buffer.fill(&mut source).unwrap(), 5);
    ///
    /// // The source is now exhausted
    /// assert!(buffer.fill(&mut source).unwrap_err().is_end_of_data());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns the source's error as-is, or [`Error::NoProgress`] if the source delivered nothing
    /// without reporting an error.
    #[expect(
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing,
        reason = "Safe by invariant"
    )]
    pub fn fill<S: Source + ?Sized>(&mut self, source: &mut S) -> Result<usize> {
        self.compact();

        if self.len >= self.cap() {
            debug_assert!(self.len == self.cap());

            // Buffer is full, nothing to pull into.
            return Ok(0);
        }

        match source.pull(&mut self.buf[self.len..])? {
            0 => Err(Error::NoProgress),
            n => {
                // A misbehaving source can't push us past the capacity.
                let n = cmp::min(n, self.cap() - self.len);
                self.len += n;
                Ok(n)
            }
        }
    }
}

#[cfg(test)]
mod tests;

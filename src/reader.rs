use std::cmp;
use std::io::{self, BufRead, Read, Write};
use std::mem;

use crate::Source;
use crate::buffer::Buffer;
use crate::constants::DEFAULT_CAPACITY;
use crate::error::{Error, Incomplete, Result};

/// A buffered look-ahead reader.
///
/// See the [crate documentation](crate) for an overview.
///
/// # Borrowing
///
/// [`peek`](Self::peek), [`next`](Self::next) and [`buffer`](Self::buffer) return slices into the
/// internal buffer. They borrow the reader, so they can't outlive the next call that mutates it.
///
/// # Errors
///
/// The reader holds at most one pending error from its source. While one is pending the source is
/// not pulled again, and every operation that stops on it also clears it.
#[derive(Debug)]
pub struct FwdReader<S> {
    buffer: Buffer,
    state: Option<Error>,
    seekable: bool,
    source: S,
}

impl<S: Source> FwdReader<S> {
    /// Creates a new `FwdReader` with a [`DEFAULT_CAPACITY`] buffer.
    pub fn new(source: S) -> FwdReader<S> {
        FwdReader::builder(source).build()
    }

    /// Creates a new `FwdReader` with the given buffer capacity.
    ///
    /// Capacities below [`MIN_CAPACITY`](crate::constants::MIN_CAPACITY) are raised to it.
    pub fn with_capacity(capacity: usize, source: S) -> FwdReader<S> {
        FwdReader::builder(source).capacity(capacity).build()
    }

    /// Returns a [`FwdReaderBuilder`] for configuring a new `FwdReader`.
    pub fn builder(source: S) -> FwdReaderBuilder<S> {
        FwdReaderBuilder {
            source,
            capacity: None,
        }
    }
}

/// A builder for constructing a [`FwdReader`] with a custom capacity.
#[must_use]
pub struct FwdReaderBuilder<S> {
    source: S,
    capacity: Option<usize>,
}

impl<S: Source> FwdReaderBuilder<S> {
    /// Sets the initial buffer capacity. Defaults to [`DEFAULT_CAPACITY`].
    pub fn capacity(mut self, cap: usize) -> Self {
        self.capacity = Some(cap);
        self
    }

    /// Builds the [`FwdReader`] with the configured settings.
    pub fn build(self) -> FwdReader<S> {
        let buffer = Buffer::with_capacity(self.capacity.unwrap_or(DEFAULT_CAPACITY));

        FwdReader {
            buffer,
            state: None,
            seekable: self.source.can_seek(),
            source: self.source,
        }
    }
}

impl<S> FwdReader<S> {
    /// Returns the number of bytes buffered and not yet consumed.
    pub fn buffered(&self) -> usize {
        self.buffer.available()
    }

    /// Returns the total capacity of the buffer.
    pub fn buffer_size(&self) -> usize {
        self.buffer.cap()
    }

    /// Returns the buffered, unconsumed bytes without reading from the source.
    pub fn buffer(&self) -> &[u8] {
        self.buffer.unconsumed()
    }

    /// Whether skips past the buffer are delegated to the source's seek capability.
    pub fn is_seekable(&self) -> bool {
        self.seekable
    }

    /// Gets a reference to the underlying source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Gets a mutable reference to the underlying source.
    ///
    /// Reading from or seeking the source directly desynchronizes it from the buffered data.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Unwraps the reader, returning the underlying source.
    ///
    /// Any buffered data is lost.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Pops the pending error.
    fn take_err(&mut self) -> Error {
        // Only called once a fill loop stopped short, which requires a pending error.
        self.state.take().unwrap_or(Error::NoProgress)
    }

    /// Pops the pending error, relabelling end-of-data as unexpected.
    fn take_err_no_eof(&mut self) -> Error {
        self.take_err().upgrade()
    }
}

impl<S: Source> FwdReader<S> {
    /// Points the reader at a new source, returning the old one.
    ///
    /// The buffer is emptied (its capacity is kept), any pending error is dropped and the seek
    /// capability of the new source is probed.
    pub fn reset(&mut self, source: S) -> S {
        self.buffer.clear();
        self.state = None;
        self.seekable = source.can_seek();

        log::trace!("reader reset, seekable: {}", self.seekable);

        mem::replace(&mut self.source, source)
    }

    /// Pulls once from the source unless an error is pending. Errors are kept as pending.
    fn more(&mut self) {
        if self.state.is_some() {
            return;
        }

        if let Err(err) = self.buffer.fill(&mut self.source) {
            self.state = Some(err);
        }
    }

    /// Makes room for `n` buffered bytes and pulls until they're buffered or an error is pending.
    fn fill_to(&mut self, n: usize) -> Result<()> {
        if self.buffer.cap() < n {
            self.buffer.grow_exact(n)?;
        }

        while self.buffered() < n && self.state.is_none() {
            self.more();
        }

        Ok(())
    }

    /// Returns the next `n` bytes without advancing the reader.
    ///
    /// The buffer grows to fit `n` if needed. Calling `peek` again with no mutating call in between
    /// returns the same bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fwd_reader::FwdReader;
    /// let mut reader = FwdReader::new(&b"Hello, World!"[..]);
    /// assert_eq!(reader.peek(5).unwrap(), b"Hello");
    /// assert_eq!(reader.peek(5).unwrap(), b"Hello");
    ///
    /// // Running out of data is reported as-is
    /// let err = reader.peek(20).unwrap_err();
    /// assert_eq!(err.count, 13);
    /// assert!(err.error.is_end_of_data());
    /// assert_eq!(reader.buffer(), b"Hello, World!");
    /// ```
    ///
    /// # Errors
    ///
    /// If fewer than `n` bytes can be buffered, the source's error is returned unchanged, with
    /// [`Error::EndOfData`] *not* upgraded, alongside the number of bytes that are buffered. Those
    /// bytes stay available through [`buffer`](Self::buffer).
    #[expect(clippy::indexing_slicing, reason = "Length checked by fill_to")]
    pub fn peek(&mut self, n: usize) -> std::result::Result<&[u8], Incomplete> {
        self.fill_to(n)
            .map_err(|err| Incomplete::new(self.buffered(), err))?;

        if self.buffered() < n {
            let err = self.take_err();
            return Err(Incomplete::new(self.buffered(), err));
        }

        Ok(&self.buffer.unconsumed()[..n])
    }

    /// Returns the next `n` bytes and advances the reader past them.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fwd_reader::{Error, FwdReader};
    /// let mut reader = FwdReader::new(&b"Hello, World!"[..]);
    /// assert_eq!(reader.next(7).unwrap(), b"Hello, ");
    /// assert_eq!(reader.next(6).unwrap(), b"World!");
    ///
    /// // Asking for bytes that aren't there is unexpected
    /// let err = reader.next(1).unwrap_err();
    /// assert!(matches!(err.error, Error::UnexpectedEnd));
    /// ```
    ///
    /// # Errors
    ///
    /// If fewer than `n` bytes can be buffered, the reader is not advanced and the source's error
    /// is returned with [`Error::EndOfData`] upgraded to [`Error::UnexpectedEnd`], alongside the
    /// number of bytes that are buffered.
    pub fn next(&mut self, n: usize) -> std::result::Result<&[u8], Incomplete> {
        self.fill_to(n)
            .map_err(|err| Incomplete::new(self.buffered(), err))?;

        if self.buffered() < n {
            let err = self.take_err_no_eof();
            return Err(Incomplete::new(self.buffered(), err));
        }

        self.buffer.consume(n);

        Ok(self.buffer.peek_behind(n))
    }

    /// Advances the reader by `n` bytes without copying them, returning `n` on success.
    ///
    /// If `n` bytes are already buffered the source isn't touched. Otherwise, if the source has a
    /// seek capability, the buffer is discarded and the source is seeked forward by the remaining
    /// bytes. Without one, the bytes are pulled and discarded.
    ///
    /// A successful seek is trusted to have moved the full distance, even past the end of the
    /// source. Many sources only report their end on the next read.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fwd_reader::{FwdReader, Pull};
    /// let mut reader = FwdReader::new(Pull::new(&b"Hello, World!"[..]));
    /// assert_eq!(reader.skip(7).unwrap(), 7);
    /// assert_eq!(reader.next(5).unwrap(), b"World");
    ///
    /// let err = reader.skip(10).unwrap_err();
    /// assert_eq!(err.count, 1);
    /// ```
    ///
    /// # Errors
    ///
    /// When seeking fails the seek's error is returned with a count of `0`. The seek capability
    /// can't report partial progress, so no guarantee is made about where the source was left.
    ///
    /// When pulling runs short, the source's error is returned with [`Error::EndOfData`] upgraded
    /// to [`Error::UnexpectedEnd`], alongside the number of bytes actually skipped.
    #[expect(clippy::arithmetic_side_effects, reason = "Bounds checked")]
    pub fn skip(&mut self, n: usize) -> std::result::Result<usize, Incomplete> {
        // Fast path
        if self.buffered() >= n {
            self.buffer.consume(n);
            return Ok(n);
        }

        if self.seekable {
            return self.skip_seek(n);
        }

        // Discard what's buffered, then pull and discard until done
        let mut remaining = n;
        loop {
            let step = cmp::min(self.buffered(), remaining);
            self.buffer.consume(step);
            remaining -= step;

            if remaining == 0 || self.state.is_some() {
                break;
            }

            self.more();
        }

        if remaining == 0 {
            return Ok(n);
        }

        let err = self.take_err_no_eof();
        Err(Incomplete::new(n - remaining, err))
    }

    /// Skips with the source's seek capability. Only called when `n > self.buffered()`.
    #[expect(clippy::arithmetic_side_effects, reason = "n > self.buffered()")]
    fn skip_seek(&mut self, n: usize) -> std::result::Result<usize, Incomplete> {
        let remaining = n - self.buffered();
        let offset = i64::try_from(remaining)
            .map_err(|_| Incomplete::new(0, Error::TooLarge { requested: n }))?;

        self.buffer.clear();

        log::trace!("skipping {} bytes by seeking the source", remaining);

        // We either skipped everything or nothing, the seek can't tell us otherwise
        match self.source.seek_by(offset) {
            Ok(_) => Ok(n),
            Err(err) => Err(Incomplete::new(0, err)),
        }
    }

    /// Reads exactly `buf.len()` bytes into `buf`, returning the number of bytes read.
    ///
    /// # Errors
    ///
    /// If the source runs short, its error is returned with [`Error::EndOfData`] upgraded to
    /// [`Error::UnexpectedEnd`], alongside the number of bytes copied into `buf`.
    #[expect(
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing,
        reason = "Bounds checked"
    )]
    pub fn read_full(&mut self, buf: &mut [u8]) -> std::result::Result<usize, Incomplete> {
        let mut copied = 0;

        while copied < buf.len() {
            if self.buffered() == 0 {
                self.more();
            }

            copied += self.copy_to(&mut buf[copied..]);

            if copied < buf.len() && self.state.is_some() {
                let err = self.take_err_no_eof();
                return Err(Incomplete::new(copied, err));
            }
        }

        Ok(copied)
    }

    /// Reads a single byte.
    ///
    /// # Errors
    ///
    /// The source's error, unchanged. [`Error::EndOfData`] is how a stream ends.
    #[expect(clippy::indexing_slicing, reason = "Length checked")]
    pub fn read_byte(&mut self) -> Result<u8> {
        while self.buffered() < 1 && self.state.is_none() {
            self.more();
        }

        if self.buffered() < 1 {
            return Err(self.take_err());
        }

        let byte = self.buffer.unconsumed()[0];
        self.buffer.consume(1);

        Ok(byte)
    }

    /// Forwards the rest of the source to `sink`, returning the number of bytes written.
    ///
    /// Buffered bytes go first. After that each pull from the source is written out in one go and
    /// the buffer emptied, until the source is exhausted.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fwd_reader::FwdReader;
    /// let mut reader = FwdReader::with_capacity(16, &b"Hello, World! Hello, World!"[..]);
    /// reader.skip(7).unwrap();
    ///
    /// let mut sink = Vec::new();
    /// assert_eq!(reader.write_to(&mut sink).unwrap(), 20);
    /// assert_eq!(sink, b"World! Hello, World!");
    /// ```
    ///
    /// # Errors
    ///
    /// Reaching the end of the source isn't an error. Any other source error is returned
    /// unchanged, and a failing write stops immediately. Either way the error comes with the
    /// number of bytes written so far; bytes that weren't written stay buffered.
    pub fn write_to<W: Write + ?Sized>(
        &mut self,
        sink: &mut W,
    ) -> std::result::Result<u64, Incomplete> {
        let mut written = 0u64;

        loop {
            if self.buffered() > 0 {
                let mut done = 0;
                let result = write_counted(sink, self.buffer.unconsumed(), &mut done);
                self.buffer.consume(done);
                written = written.saturating_add(done as u64);

                if let Err(err) = result {
                    return Err(Incomplete {
                        count: written,
                        error: err.into(),
                    });
                }

                self.buffer.clear();
            }

            if self.state.is_some() {
                break;
            }

            self.more();
        }

        match self.take_err() {
            Error::EndOfData => Ok(written),
            err => Err(Incomplete {
                count: written,
                error: err,
            }),
        }
    }

    /// Copies as much as fits into `buf` from the buffer and consumes it.
    #[expect(clippy::indexing_slicing, reason = "Bounded by both lengths")]
    fn copy_to(&mut self, buf: &mut [u8]) -> usize {
        let data = self.buffer.unconsumed();
        let count = cmp::min(buf.len(), data.len());
        buf[..count].copy_from_slice(&data[..count]);

        self.buffer.consume(count);
        count
    }
}

/// Writes all of `data` to `sink`, counting the bytes written in `done`.
///
/// A sink that accepts nothing fails with [`io::ErrorKind::WriteZero`]. Interrupted writes are
/// retried.
#[expect(
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing,
    reason = "Bounded by data.len()"
)]
fn write_counted<W: Write + ?Sized>(sink: &mut W, data: &[u8], done: &mut usize) -> io::Result<()> {
    while *done < data.len() {
        match sink.write(&data[*done..]) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "failed to write whole buffer",
                ));
            }
            Ok(n) => *done += cmp::min(n, data.len() - *done),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

impl<S: Source> Read for FwdReader<S> {
    /// Reads at most one pull's worth of data.
    ///
    /// If `buf` fits in what's buffered it's served from the buffer alone. Otherwise the source is
    /// pulled exactly once and whatever is then buffered is copied, which may be less than
    /// `buf.len()`. End of data is reported as `Ok(0)`.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.len() <= self.buffered() {
            return Ok(self.copy_to(buf));
        }

        self.more();

        if self.buffered() > 0 {
            return Ok(self.copy_to(buf));
        }

        match self.take_err() {
            Error::EndOfData => Ok(0),
            err => Err(err.into()),
        }
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.read_full(buf)?;
        Ok(())
    }
}

impl<S: Source> BufRead for FwdReader<S> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.buffered() == 0 {
            self.more();

            if self.buffered() == 0 {
                match self.take_err() {
                    Error::EndOfData => {}
                    err => return Err(err.into()),
                }
            }
        }

        Ok(self.buffer.unconsumed())
    }

    fn consume(&mut self, amt: usize) {
        self.buffer.consume(amt);
    }
}

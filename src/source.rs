//! Byte sources a [`FwdReader`](crate::FwdReader) can wrap.
//!
//! A [`Source`] delivers bytes through [`pull`](Source::pull) and may additionally expose a seek
//! capability. The reader probes [`can_seek`](Source::can_seek) once when it's constructed or
//! reset and from then on either delegates skips to [`seek_by`](Source::seek_by) or never calls it.
//!
//! Any [`Read`] can be wrapped in [`Pull`], and any [`Read`] + [`Seek`] in [`Seekable`]. The common
//! standard library readers implement [`Source`] directly.
//!
//! # Example
//!
//! ```
//! use fwd_reader::{FwdReader, Pull, Seekable};
//! use std::io::{BufReader, Cursor};
//!
//! // A cursor can seek, so skips past the buffer become seeks
//! let reader = FwdReader::new(Cursor::new(b"abc".to_vec()));
//! assert!(reader.is_seekable());
//!
//! // Hide the seek capability to force buffered skips
//! let reader = FwdReader::new(Pull::new(Cursor::new(b"abc".to_vec())));
//! assert!(!reader.is_seekable());
//!
//! // Or expose it for a reader that doesn't implement `Source`
//! let reader = FwdReader::new(Seekable::new(BufReader::new(Cursor::new(b"abc".to_vec()))));
//! assert!(reader.is_seekable());
//! ```

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::net::TcpStream;

use crate::error::{Error, Result};

/// A producer of bytes with an optional relative seek capability.
///
/// # Contract
///
/// - [`pull`](Self::pull) writes up to `buf.len()` bytes to the start of `buf` and returns how
///   many it wrote. It signals exhaustion with [`Error::EndOfData`]. Returning `Ok(0)` for a
///   non-empty `buf` is a contract violation, which the reader reports as [`Error::NoProgress`].
/// - [`can_seek`](Self::can_seek) must give the same answer for the lifetime of the source.
/// - [`seek_by`](Self::seek_by) is only called when `can_seek` returned `true`.
pub trait Source {
    /// Delivers up to `buf.len()` bytes into `buf`.
    ///
    /// # Errors
    ///
    /// [`Error::EndOfData`] once the source is exhausted, or whatever failure the source has.
    fn pull(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Whether this source supports [`seek_by`](Self::seek_by).
    fn can_seek(&self) -> bool {
        false
    }

    /// Moves the read position by `offset` bytes relative to the current position and returns the
    /// new absolute position.
    ///
    /// Implementations may move past their logical end without error; the end is then reported by
    /// the next [`pull`](Self::pull).
    ///
    /// # Errors
    ///
    /// Whatever the seek reports. Sources without the capability return
    /// [`io::ErrorKind::Unsupported`].
    fn seek_by(&mut self, offset: i64) -> Result<u64> {
        let _ = offset;
        Err(Error::Io(io::ErrorKind::Unsupported.into()))
    }
}

/// Reads from `reader` following the [`Source`] contract.
///
/// `Ok(0)` for a non-empty `buf` is the [`Read`] end-of-file signal and becomes
/// [`Error::EndOfData`]. Interrupted reads are retried.
pub(crate) fn pull_from<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    loop {
        match reader.read(buf) {
            Ok(0) if !buf.is_empty() => return Err(Error::EndOfData),
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(Error::Io(e)),
        }
    }
}

fn seek_from<S: Seek + ?Sized>(seeker: &mut S, offset: i64) -> Result<u64> {
    Ok(seeker.seek(SeekFrom::Current(offset))?)
}

/// Adapts a [`Read`] into a pull-only [`Source`].
///
/// Also useful to hide the seek capability of a reader, for example for a [`File`] that is actually
/// a pipe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pull<R>(R);

impl<R: Read> Pull<R> {
    /// Wraps `reader`.
    pub fn new(reader: R) -> Self {
        Self(reader)
    }
}

impl<R> Pull<R> {
    /// Unwraps the reader.
    pub fn into_inner(self) -> R {
        self.0
    }

    /// Gets a reference to the reader.
    pub fn get_ref(&self) -> &R {
        &self.0
    }
}

impl<R: Read> Source for Pull<R> {
    fn pull(&mut self, buf: &mut [u8]) -> Result<usize> {
        pull_from(&mut self.0, buf)
    }
}

/// Adapts a [`Read`] + [`Seek`] into a [`Source`] with the seek capability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seekable<R>(R);

impl<R: Read + Seek> Seekable<R> {
    /// Wraps `reader`.
    pub fn new(reader: R) -> Self {
        Self(reader)
    }
}

impl<R> Seekable<R> {
    /// Unwraps the reader.
    pub fn into_inner(self) -> R {
        self.0
    }

    /// Gets a reference to the reader.
    pub fn get_ref(&self) -> &R {
        &self.0
    }
}

impl<R: Read + Seek> Source for Seekable<R> {
    fn pull(&mut self, buf: &mut [u8]) -> Result<usize> {
        pull_from(&mut self.0, buf)
    }

    fn can_seek(&self) -> bool {
        true
    }

    fn seek_by(&mut self, offset: i64) -> Result<u64> {
        seek_from(&mut self.0, offset)
    }
}

// -----------------------------------------------------------------------------
// Standard library sources
// -----------------------------------------------------------------------------

impl Source for &[u8] {
    fn pull(&mut self, buf: &mut [u8]) -> Result<usize> {
        pull_from(self, buf)
    }
}

impl<T: AsRef<[u8]>> Source for io::Cursor<T> {
    fn pull(&mut self, buf: &mut [u8]) -> Result<usize> {
        pull_from(self, buf)
    }

    fn can_seek(&self) -> bool {
        true
    }

    fn seek_by(&mut self, offset: i64) -> Result<u64> {
        seek_from(self, offset)
    }
}

impl Source for File {
    fn pull(&mut self, buf: &mut [u8]) -> Result<usize> {
        pull_from(self, buf)
    }

    fn can_seek(&self) -> bool {
        true
    }

    fn seek_by(&mut self, offset: i64) -> Result<u64> {
        seek_from(self, offset)
    }
}

impl Source for io::Stdin {
    fn pull(&mut self, buf: &mut [u8]) -> Result<usize> {
        pull_from(self, buf)
    }
}

impl Source for io::StdinLock<'_> {
    fn pull(&mut self, buf: &mut [u8]) -> Result<usize> {
        pull_from(self, buf)
    }
}

impl Source for TcpStream {
    fn pull(&mut self, buf: &mut [u8]) -> Result<usize> {
        pull_from(self, buf)
    }
}

impl Source for io::Empty {
    fn pull(&mut self, buf: &mut [u8]) -> Result<usize> {
        pull_from(self, buf)
    }
}

// -----------------------------------------------------------------------------
// Forwarding
// -----------------------------------------------------------------------------

impl<S: Source + ?Sized> Source for &mut S {
    fn pull(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).pull(buf)
    }

    fn can_seek(&self) -> bool {
        (**self).can_seek()
    }

    fn seek_by(&mut self, offset: i64) -> Result<u64> {
        (**self).seek_by(offset)
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn pull(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).pull(buf)
    }

    fn can_seek(&self) -> bool {
        (**self).can_seek()
    }

    fn seek_by(&mut self, offset: i64) -> Result<u64> {
        (**self).seek_by(offset)
    }
}

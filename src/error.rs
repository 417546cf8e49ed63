//! Error types for the reader and its sources.
//!
//! There are two severities of end-of-data. [`Error::EndOfData`] is the plain condition reported
//! by a source and is returned whenever running out of data is a legitimate way for a stream to
//! end ([`peek`], [`read_byte`], [`write_to`]). [`Error::UnexpectedEnd`] is the same condition
//! relabelled by [`Error::upgrade`] when the caller asked for an exact number of bytes ([`next`],
//! [`skip`], [`read_full`]).
//!
//! Operations that can make partial progress report it through [`Incomplete`].
//!
//! [`peek`]: crate::FwdReader::peek
//! [`next`]: crate::FwdReader::next
//! [`skip`]: crate::FwdReader::skip
//! [`read_byte`]: crate::FwdReader::read_byte
//! [`read_full`]: crate::FwdReader::read_full
//! [`write_to`]: crate::FwdReader::write_to

use std::io;

use thiserror::Error;

/// Result type with [`Error`] as the error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by a [`Source`](crate::Source) or synthesized by the reader.
#[derive(Error, Debug)]
pub enum Error {
    /// The source is exhausted.
    #[error("end of data")]
    EndOfData,

    /// The source was exhausted before an exact number of requested bytes was delivered.
    #[error("unexpected end of data")]
    UnexpectedEnd,

    /// The source claimed success while delivering zero bytes.
    #[error("source returned no data and no error")]
    NoProgress,

    /// The requested size can't be held in a single buffer or seek.
    #[error("requested size {requested} exceeds the maximum buffer capacity")]
    TooLarge { requested: usize },

    /// Any other failure of the source or its seek capability, as reported.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Relabels [`Error::EndOfData`] as [`Error::UnexpectedEnd`]; every other error is returned
    /// unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fwd_reader::Error;
    /// assert!(matches!(Error::EndOfData.upgrade(), Error::UnexpectedEnd));
    /// assert!(matches!(Error::NoProgress.upgrade(), Error::NoProgress));
    /// ```
    pub fn upgrade(self) -> Self {
        match self {
            Self::EndOfData => Self::UnexpectedEnd,
            other => other,
        }
    }

    /// Returns `true` for the plain end-of-data condition.
    pub fn is_end_of_data(&self) -> bool {
        matches!(self, Self::EndOfData)
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::EndOfData | Error::UnexpectedEnd => {
                io::Error::new(io::ErrorKind::UnexpectedEof, err)
            }
            Error::TooLarge { .. } => io::Error::new(io::ErrorKind::InvalidInput, err),
            Error::NoProgress => io::Error::other(err),
            Error::Io(e) => e,
        }
    }
}

/// An [`Error`] together with the progress made before it occurred.
///
/// `count` is the number of bytes skipped, copied or forwarded before the operation stopped. For
/// [`peek`](crate::FwdReader::peek) and [`next`](crate::FwdReader::next) it is the number of bytes
/// left buffered, which are still visible through [`buffer`](crate::FwdReader::buffer).
#[derive(Error, Debug)]
#[error("{error} after {count} bytes")]
pub struct Incomplete {
    /// Bytes of progress before the error.
    pub count: u64,
    /// The error that stopped the operation.
    #[source]
    pub error: Error,
}

impl Incomplete {
    pub(crate) fn new(count: usize, error: Error) -> Self {
        Self {
            count: count as u64,
            error,
        }
    }

    /// Discards the progress, returning the underlying error.
    pub fn into_error(self) -> Error {
        self.error
    }
}

impl From<Incomplete> for io::Error {
    fn from(err: Incomplete) -> Self {
        err.error.into()
    }
}

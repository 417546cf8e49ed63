//! A buffered reader that can look ahead and skip forward an arbitrary number of bytes.
//!
//! [`FwdReader`] wraps a byte [`Source`] and lets you inspect upcoming bytes without consuming them
//! ([`peek`](FwdReader::peek)), consume bytes and borrow them in place
//! ([`next`](FwdReader::next)), or drop bytes without looking at them ([`skip`](FwdReader::skip)).
//! It is also a regular [`Read`](std::io::Read) and [`BufRead`](std::io::BufRead), so it fits
//! wherever a byte stream is expected.
//!
//! # When to use this
//!
//! This crate is a good fit for decoders of length-prefixed or tag-driven binary formats: peek at
//! a header, decide how much to take, then take or skip it. If the source can seek, skips past the
//! buffered data turn into a single seek instead of reading and discarding.
//!
//! # Quick start
//!
//! ```
//! use fwd_reader::{Error, FwdReader};
//! use std::io::Cursor;
//!
//! let data = b"\x05Hello\x06World!";
//! let mut reader = FwdReader::new(Cursor::new(data.as_slice()));
//!
//! // Peek at the length prefix without consuming it
//! assert_eq!(reader.peek(1).unwrap(), [5]);
//!
//! // Take it, then take the payload
//! let len = usize::from(reader.read_byte().unwrap());
//! assert_eq!(reader.next(len).unwrap(), b"Hello");
//!
//! // Skip the next record entirely
//! let len = usize::from(reader.read_byte().unwrap());
//! assert_eq!(reader.skip(len).unwrap(), 6);
//!
//! // A stream ending on a record boundary is fine
//! assert!(matches!(reader.read_byte(), Err(Error::EndOfData)));
//! ```
//!
//! # Capacity configuration
//!
//! The buffer starts at [`DEFAULT_CAPACITY`](constants::DEFAULT_CAPACITY) bytes and only grows
//! when a [`peek`](FwdReader::peek) or [`next`](FwdReader::next) asks for more than fits. Growth is
//! exact, to the requested size plus whatever is still unread.
//!
//! ```
//! use fwd_reader::FwdReader;
//!
//! let data = [0u8; 1024];
//! let mut reader = FwdReader::builder(&data[..])
//!     .capacity(64)
//!     .build();
//! assert_eq!(reader.buffer_size(), 64);
//!
//! reader.peek(100).unwrap();
//! assert_eq!(reader.buffer_size(), 100);
//! ```
//!
//! # Errors
//!
//! Running out of data is [`Error::EndOfData`] when that's a legitimate end of the stream
//! ([`peek`](FwdReader::peek), [`read_byte`](FwdReader::read_byte)) and
//! [`Error::UnexpectedEnd`] when an exact number of bytes was demanded
//! ([`next`](FwdReader::next), [`skip`](FwdReader::skip), [`read_full`](FwdReader::read_full)).
//! Operations that can make partial progress report it with [`Incomplete`].
//!
//! # Crate organisation
//!
//! - [`FwdReader`]: the primary type, wrapping any [`Source`] with a look-ahead buffer.
//! - [`FwdReaderBuilder`]: configures the initial capacity before constructing a [`FwdReader`].
//! - [`Source`]: the byte producer trait, with [`Pull`] and [`Seekable`] adapters for
//!   [`std::io`] readers.
//! - [`buffer::Buffer`]: the standalone buffer for users who want direct control.
//! - [`constants`]: buffer size constants.

pub mod buffer;
pub mod constants;
mod error;
mod reader;
mod source;

pub use error::{Error, Incomplete, Result};
pub use reader::{FwdReader, FwdReaderBuilder};
pub use source::{Pull, Seekable, Source};

//! Stream decorators that route every call through a shared latch.
//!
//! Hand a decorated stream to code that knows nothing about the latch and it
//! gains first-error-wins semantics for free: once anything sharing the
//! latch fails, every read and write short-circuits without touching the
//! underlying primitive, while close still reaches it so resources are not
//! leaked by an earlier failure.
//!
//! # Examples
//!
//! ```
//! use std::io::Write;
//! use error_latch::ErrorLatch;
//!
//! let latch = ErrorLatch::new();
//! let mut sink = Vec::new();
//! let mut wrapped = latch.writer(&mut sink);
//!
//! wrapped.write_all(b"ok")?;
//! assert!(latch.first_error().is_none());
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, Read, Write};

use crate::io::Close;
use crate::latch::ErrorLatch;

impl ErrorLatch {
    /// Wraps `reader` so every read is guarded by this latch.
    pub fn reader<R: Read>(&self, reader: R) -> LatchedReader<'_, R> {
        LatchedReader {
            latch: self,
            inner: reader,
        }
    }

    /// Wraps `writer` so every write and flush is guarded by this latch.
    pub fn writer<W: Write>(&self, writer: W) -> LatchedWriter<'_, W> {
        LatchedWriter {
            latch: self,
            inner: writer,
        }
    }

    /// Wraps `closer` so close runs through the forced path of this latch.
    pub fn closer<C: Close>(&self, closer: C) -> LatchedCloser<'_, C> {
        LatchedCloser {
            latch: self,
            inner: closer,
        }
    }

    /// Wraps a combined reader-writer; both sides share this latch, so a
    /// failure on one short-circuits the other.
    pub fn stream<S>(&self, stream: S) -> LatchedStream<'_, S> {
        LatchedStream {
            latch: self,
            inner: stream,
        }
    }
}

macro_rules! decorator_accessors {
    ($type:ident, $what:literal) => {
        impl<'l, T> $type<'l, T> {
            #[doc = concat!("Shared reference to the wrapped ", $what, ".")]
            #[inline]
            pub fn get_ref(&self) -> &T {
                &self.inner
            }

            #[doc = concat!("Mutable reference to the wrapped ", $what, ".")]
            ///
            /// Calls made directly on it bypass the latch.
            #[inline]
            pub fn get_mut(&mut self) -> &mut T {
                &mut self.inner
            }

            #[doc = concat!("Unwraps the decorator, returning the ", $what, ".")]
            #[inline]
            pub fn into_inner(self) -> T {
                self.inner
            }

            /// The latch guarding this decorator.
            #[inline]
            pub fn latch(&self) -> &'l ErrorLatch {
                self.latch
            }
        }
    };
}

/// Reader decorator; see [`ErrorLatch::reader`].
#[derive(Debug)]
pub struct LatchedReader<'l, R> {
    latch: &'l ErrorLatch,
    inner: R,
}

decorator_accessors!(LatchedReader, "reader");

impl<R: Read> Read for LatchedReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.latch
            .read(&mut self.inner, buf)
            .map_err(io::Error::from)
    }
}

/// Writer decorator; see [`ErrorLatch::writer`].
#[derive(Debug)]
pub struct LatchedWriter<'l, W> {
    latch: &'l ErrorLatch,
    inner: W,
}

decorator_accessors!(LatchedWriter, "writer");

impl<W: Write> Write for LatchedWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.latch
            .write(&mut self.inner, buf)
            .map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        let inner = &mut self.inner;
        self.latch.attempt(|| inner.flush()).map_err(io::Error::from)
    }
}

/// Closer decorator; see [`ErrorLatch::closer`].
#[derive(Debug)]
pub struct LatchedCloser<'l, C> {
    latch: &'l ErrorLatch,
    inner: C,
}

decorator_accessors!(LatchedCloser, "closer");

impl<C: Close> Close for LatchedCloser<'_, C> {
    fn close(&mut self) -> io::Result<()> {
        self.latch
            .close(&mut self.inner)
            .map_err(io::Error::from)
    }
}

/// Combined reader-writer decorator; see [`ErrorLatch::stream`].
#[derive(Debug)]
pub struct LatchedStream<'l, S> {
    latch: &'l ErrorLatch,
    inner: S,
}

decorator_accessors!(LatchedStream, "stream");

impl<S: Read> Read for LatchedStream<'_, S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.latch
            .read(&mut self.inner, buf)
            .map_err(io::Error::from)
    }
}

impl<S: Write> Write for LatchedStream<'_, S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.latch
            .write(&mut self.inner, buf)
            .map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        let inner = &mut self.inner;
        self.latch.attempt(|| inner.flush()).map_err(io::Error::from)
    }
}

impl<S: Close> Close for LatchedStream<'_, S> {
    fn close(&mut self) -> io::Result<()> {
        self.latch
            .close(&mut self.inner)
            .map_err(io::Error::from)
    }
}

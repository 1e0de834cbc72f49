//! Capability traits and guarded I/O helpers.
//!
//! The helpers here are the typed surface of the guard: each one wraps a
//! single stream call in [`attempt`](crate::ErrorLatch::attempt) (or
//! [`force`](crate::ErrorLatch::force), for close) and contributes no
//! semantics of its own.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::{self, ByteOrder};
use crate::error::LatchedError;
use crate::latch::ErrorLatch;

/// Minimal close capability, the third stream primitive next to [`Read`] and
/// [`Write`].
///
/// std has no close trait; resources with an explicit, fallible close
/// (sockets, archive writers, handles into foreign code) implement this so
/// the latch can route release through the forced path.
pub trait Close {
    /// Releases the underlying resource.
    fn close(&mut self) -> io::Result<()>;
}

impl<C: Close + ?Sized> Close for &mut C {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

impl<C: Close + ?Sized> Close for Box<C> {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

impl Close for TcpStream {
    fn close(&mut self) -> io::Result<()> {
        self.shutdown(Shutdown::Both)
    }
}

impl ErrorLatch {
    /// Attempt-wraps a single read into `buf`, returning the bytes read.
    pub fn read<R>(&self, reader: &mut R, buf: &mut [u8]) -> Result<usize, LatchedError>
    where
        R: Read + ?Sized,
    {
        self.attempt(|| reader.read(buf))
    }

    /// Attempt-wraps a single write of `buf`, returning the bytes written.
    pub fn write<W>(&self, writer: &mut W, buf: &[u8]) -> Result<usize, LatchedError>
    where
        W: Write + ?Sized,
    {
        self.attempt(|| writer.write(buf))
    }

    /// Attempt-wraps a bulk copy of `reader` into `writer`, returning the
    /// bytes copied.
    pub fn copy<R, W>(&self, reader: &mut R, writer: &mut W) -> Result<u64, LatchedError>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
    {
        self.attempt(|| io::copy(reader, writer))
    }

    /// Force-wraps a close: the underlying resource is released even on an
    /// already-failed latch, and the first error keeps precedence over
    /// anything close itself reports.
    pub fn close<C>(&self, closer: &mut C) -> Result<(), LatchedError>
    where
        C: Close + ?Sized,
    {
        self.force(|| closer.close())
    }

    /// Attempt-wraps a fixed-layout decode from `reader`.
    pub fn decode<T, R>(&self, reader: &mut R, order: ByteOrder) -> Result<T, LatchedError>
    where
        T: DeserializeOwned,
        R: Read + ?Sized,
    {
        self.attempt(|| codec::decode_from(reader, order))
    }

    /// Attempt-wraps a fixed-layout encode of `value` into `writer`.
    pub fn encode<T, W>(
        &self,
        writer: &mut W,
        order: ByteOrder,
        value: &T,
    ) -> Result<(), LatchedError>
    where
        T: Serialize + ?Sized,
        W: Write + ?Sized,
    {
        self.attempt(|| codec::encode_into(writer, order, value))
    }
}

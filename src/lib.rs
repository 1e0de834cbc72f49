//! Sticky first-error guard for sequential I/O.
//!
//! An [`ErrorLatch`] runs a sequence of fallible operations and records only
//! the first failure: an operation error, a panic converted to an error, or
//! an upstream cancellation reason. From then on every guarded operation
//! short-circuits: it returns the original failure, with the stack trace
//! captured when it was recorded, without doing real work. Call sites stop
//! checking an error after every step of a read/write/close sequence and
//! still keep the earliest failure.
//!
//! The guard is single-threaded by contract: all calls on a latch and on the
//! decorators sharing it must be serialized by the caller.
//!
//! # Examples
//!
//! ## Guarded call sequence
//!
//! ```
//! use std::io;
//! use error_latch::ErrorLatch;
//!
//! let latch = ErrorLatch::new();
//! let mut out = Vec::new();
//!
//! latch.write(&mut out, b"record")?;
//! let failed = latch.attempt(|| -> io::Result<()> { Err(io::Error::other("disk full")) });
//! assert!(failed.is_err());
//!
//! // The sequence keeps "running", but nothing touches `out` any more.
//! assert!(latch.write(&mut out, b"more").is_err());
//! assert_eq!(out, b"record");
//! assert_eq!(latch.message(), "disk full");
//! # Ok::<(), error_latch::LatchedError>(())
//! ```
//!
//! ## Decorated streams
//!
//! Code that only knows [`Read`](std::io::Read) and
//! [`Write`](std::io::Write) gains guard semantics when handed a decorated
//! stream:
//!
//! ```
//! use std::io::{Read, Write};
//! use error_latch::ErrorLatch;
//!
//! fn pump(mut from: impl Read, mut to: impl Write) -> std::io::Result<u64> {
//!     std::io::copy(&mut from, &mut to)
//! }
//!
//! let latch = ErrorLatch::new();
//! let mut sink = Vec::new();
//! let copied = pump(latch.reader(&b"payload"[..]), latch.writer(&mut sink))?;
//! assert_eq!(copied, 7);
//! assert!(latch.first_error().is_none());
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! ## Cancellation
//!
//! ```
//! use std::time::Duration;
//! use error_latch::{Deadline, ErrorLatch};
//!
//! let latch = ErrorLatch::with_cancel(Deadline::after(Duration::ZERO));
//!
//! // Reported on the status check, before any attempt has run.
//! assert_eq!(latch.first_error().unwrap().to_string(), "deadline exceeded");
//! assert!(latch.run(|| unreachable!("skipped")).is_err());
//! ```

/// Polled cancellation sources.
pub mod cancel;
/// Fixed-layout binary codec with a runtime byte-order parameter.
pub mod codec;
/// The shared first-failure value and panic conversion.
pub mod error;
/// Capability traits and guarded I/O helpers.
pub mod io;
/// The sticky first-error guard.
pub mod latch;
/// Convenience re-exports for quick starts.
pub mod prelude;
/// Stream decorators that share one latch.
pub mod wrap;

pub use cancel::{CancelSource, Cancelled, Deadline, DeadlineExceeded, ManualCancel};
pub use codec::ByteOrder;
pub use error::{BoxError, LatchedError};
pub use io::Close;
pub use latch::ErrorLatch;
pub use wrap::{LatchedCloser, LatchedReader, LatchedStream, LatchedWriter};

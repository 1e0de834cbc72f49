//! Convenience re-exports for the common surface.
//!
//! Import everything with:
//!
//! ```
//! use error_latch::prelude::*;
//! ```
//!
//! # Examples
//!
//! ```
//! use std::io::Write;
//! use error_latch::prelude::*;
//!
//! let latch = ErrorLatch::new();
//! let mut sink = Vec::new();
//! latch.writer(&mut sink).write_all(b"guarded")?;
//! assert!(!latch.is_failed());
//! # Ok::<(), std::io::Error>(())
//! ```

pub use crate::cancel::{CancelSource, Deadline, ManualCancel};
pub use crate::codec::ByteOrder;
pub use crate::error::{BoxError, LatchedError};
pub use crate::io::Close;
pub use crate::latch::ErrorLatch;
pub use crate::wrap::{LatchedCloser, LatchedReader, LatchedStream, LatchedWriter};

//! The shared first-failure value.
//!
//! [`LatchedError`] is what an [`ErrorLatch`](crate::ErrorLatch) hands out
//! once a failure has been recorded. The recorded error and the stack trace
//! captured at recording time live behind one shared allocation, so cloning
//! is cheap and every short-circuited call returns a handle to the one
//! original failure rather than a copy of it.

use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::fmt;
use std::io;
use std::sync::Arc;

/// Open-world error currency accepted by the latch primitives.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

struct Recording {
    error: BoxError,
    trace: Backtrace,
}

/// First failure recorded by an [`ErrorLatch`](crate::ErrorLatch), together
/// with the stack trace captured at the moment it was recorded.
///
/// Clones stay tied to the same recording; use
/// [`same_error`](Self::same_error) to check that two handles refer to one
/// recording.
///
/// # Examples
///
/// ```
/// use std::io;
/// use error_latch::ErrorLatch;
///
/// let latch = ErrorLatch::new();
/// let first = latch
///     .attempt(|| -> io::Result<()> { Err(io::Error::other("disk full")) })
///     .unwrap_err();
///
/// assert_eq!(first.to_string(), "disk full");
/// assert_eq!(
///     first.downcast_ref::<io::Error>().map(io::Error::kind),
///     Some(io::ErrorKind::Other),
/// );
/// ```
#[derive(Clone)]
pub struct LatchedError {
    recording: Arc<Recording>,
}

impl LatchedError {
    /// Records `error` now, capturing the stack trace unconditionally (the
    /// cost is paid once per failure, not per guarded call).
    pub(crate) fn record(error: BoxError) -> Self {
        Self {
            recording: Arc::new(Recording {
                error,
                trace: Backtrace::force_capture(),
            }),
        }
    }

    /// Stack trace captured when the error was first recorded.
    #[inline]
    pub fn backtrace(&self) -> &Backtrace {
        &self.recording.trace
    }

    /// Attempts to downcast the recorded error to a concrete type.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: Error + 'static,
    {
        self.recording.error.downcast_ref::<E>()
    }

    /// Returns `true` if `self` and `other` are handles to the same
    /// recording.
    #[inline]
    #[must_use]
    pub fn same_error(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.recording, &other.recording)
    }

    fn io_kind(&self) -> io::ErrorKind {
        match self.downcast_ref::<io::Error>() {
            Some(error) => error.kind(),
            None => io::ErrorKind::Other,
        }
    }
}

impl fmt::Display for LatchedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.recording.error, f)
    }
}

impl fmt::Debug for LatchedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.recording.error, f)?;
        if self.recording.trace.status() == BacktraceStatus::Captured {
            write!(f, "\n\nStack backtrace:\n{}", self.recording.trace)?;
        }
        Ok(())
    }
}

impl Error for LatchedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.recording.error.source()
    }
}

/// Preserves the underlying `io::ErrorKind` where there is one, so decorated
/// streams surface the latch through `std::io` without flattening kinds.
impl From<LatchedError> for io::Error {
    fn from(error: LatchedError) -> Self {
        io::Error::new(error.io_kind(), error)
    }
}

/// Converts a payload caught by `catch_unwind` into the error to record.
///
/// Payloads that already are errors pass through unwrapped. String payloads
/// keep their text behind a `panic handled: ` prefix. Any other payload type
/// cannot be rendered and is recorded as opaque.
pub(crate) fn error_from_panic(payload: Box<dyn Any + Send>) -> BoxError {
    let payload = match payload.downcast::<BoxError>() {
        Ok(error) => return *error,
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<io::Error>() {
        Ok(error) => return (*error).into(),
        Err(payload) => payload,
    };
    let message = match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(message) => (*message).to_owned(),
            Err(_) => return "panic handled: opaque panic payload".into(),
        },
    };
    format!("panic handled: {message}").into()
}

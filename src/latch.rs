//! The sticky first-error guard.

use std::cell::RefCell;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::cancel::CancelSource;
use crate::error::{error_from_panic, BoxError, LatchedError};

/// Sticky first-error guard for one unit of work.
///
/// An `ErrorLatch` runs fallible operations through
/// [`attempt`](Self::attempt) and records only the first failure it sees:
/// an operation error, a panic converted to an error, or a reason reported
/// by an attached [`CancelSource`]. Once a failure is recorded, every
/// further guarded operation becomes a cheap no-op that returns the original
/// failure (with the stack trace captured when it was recorded) until
/// [`reset`](Self::reset). Cleanup work that must run on failed units too
/// goes through [`force`](Self::force).
///
/// All primitives take `&self`, so any number of
/// [decorators](crate::wrap) can share one latch by reference. The latch is
/// not thread-safe: calls across everything sharing it must come from one
/// thread of control. The type is not `Sync`; callers that need concurrent
/// access must put their own lock around it.
///
/// Panics raised inside a guarded operation never unwind the caller; they
/// are converted to errors and recorded like any other failure.
///
/// # Examples
///
/// ```
/// use std::io;
/// use error_latch::ErrorLatch;
///
/// let latch = ErrorLatch::new();
/// let mut out = Vec::new();
///
/// let written = latch.write(&mut out, b"header")?;
/// assert_eq!(written, 6);
///
/// let failed = latch.attempt(|| -> io::Result<()> { Err(io::Error::other("disk full")) });
/// assert!(failed.is_err());
///
/// // Later steps keep "running" but never execute.
/// let skipped = latch.attempt(|| -> io::Result<()> { unreachable!() });
/// assert!(skipped.unwrap_err().same_error(&failed.unwrap_err()));
/// assert_eq!(latch.message(), "disk full");
/// # Ok::<(), error_latch::LatchedError>(())
/// ```
#[derive(Default)]
pub struct ErrorLatch {
    first: RefCell<Option<LatchedError>>,
    cancel: Option<Box<dyn CancelSource>>,
}

impl ErrorLatch {
    /// Creates a latch with no recorded error and no cancellation source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a latch that polls `cancel` before every attempt.
    #[must_use]
    pub fn with_cancel(cancel: impl CancelSource + 'static) -> Self {
        Self {
            first: RefCell::new(None),
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Attaches (or replaces) the cancellation source.
    ///
    /// [`reset`](Self::reset) does not detach it.
    pub fn set_cancel(&mut self, cancel: impl CancelSource + 'static) {
        self.cancel = Some(Box::new(cancel));
    }

    /// Returns the recorded first error, if any.
    ///
    /// When nothing is recorded yet and the attached cancellation source
    /// reports a reason, that reason is recorded first-wins and returned;
    /// repeated calls keep returning the same recording.
    pub fn first_error(&self) -> Option<LatchedError> {
        let stored = self.first.borrow().clone();
        if stored.is_some() {
            return stored;
        }
        match &self.cancel {
            Some(cancel) => cancel.cancelled().map(|reason| self.record(reason)),
            None => None,
        }
    }

    /// Returns `true` once a first error has been recorded.
    ///
    /// Reads stored state only; unlike [`first_error`](Self::first_error) it
    /// does not poll the cancellation source.
    #[inline]
    pub fn is_failed(&self) -> bool {
        self.first.borrow().is_some()
    }

    /// Runs `op` unless an error is already recorded or cancellation is
    /// signaling, recording its failure first-wins.
    ///
    /// Returns `op`'s value on success, otherwise the recorded first error,
    /// whether that recording came from `op` itself, from an earlier
    /// operation, or from cancellation.
    pub fn attempt<T, E, F>(&self, op: F) -> Result<T, LatchedError>
    where
        F: FnOnce() -> Result<T, E>,
        E: Into<BoxError>,
    {
        if let Some(first) = self.first_error() {
            return Err(first);
        }
        self.invoke(op)
    }

    /// Runs `op` unconditionally, even after a prior failure or under
    /// cancellation.
    ///
    /// Failures (including a cancellation reason observed on the way in) are
    /// still recorded first-wins, and a stored first error wins over a
    /// successful forced value. Meant for cleanup that must run on failed
    /// units of work, such as releasing resources.
    pub fn force<T, E, F>(&self, op: F) -> Result<T, LatchedError>
    where
        F: FnOnce() -> Result<T, E>,
        E: Into<BoxError>,
    {
        let prior = self.first_error();
        let outcome = self.invoke(op);
        match prior {
            Some(first) => Err(first),
            None => outcome,
        }
    }

    /// Runs an infallible procedure under the same short-circuit and panic
    /// conversion as [`attempt`](Self::attempt).
    pub fn run<T, F>(&self, op: F) -> Result<T, LatchedError>
    where
        F: FnOnce() -> T,
    {
        self.attempt(|| Ok::<T, std::convert::Infallible>(op()))
    }

    /// Clears the recorded error and its captured trace.
    ///
    /// The cancellation source stays attached: a latch whose source still
    /// reports a reason will re-latch on the next status check.
    pub fn reset(&self) {
        self.first.borrow_mut().take();
        #[cfg(feature = "tracing")]
        tracing::trace!("error latch reset");
    }

    /// Message of the recorded error, or the literal `"<nil>"` placeholder.
    ///
    /// Display helper only; does not poll the cancellation source.
    #[must_use]
    pub fn message(&self) -> String {
        match self.first.borrow().as_ref() {
            Some(first) => first.to_string(),
            None => "<nil>".to_owned(),
        }
    }

    /// Runs `op` behind an unwind boundary and records any failure.
    ///
    /// No interior borrow is held while `op` runs, so operations may call
    /// back into the same latch.
    fn invoke<T, E, F>(&self, op: F) -> Result<T, LatchedError>
    where
        F: FnOnce() -> Result<T, E>,
        E: Into<BoxError>,
    {
        match catch_unwind(AssertUnwindSafe(op)) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(error)) => Err(self.record(error.into())),
            Err(payload) => Err(self.record(error_from_panic(payload))),
        }
    }

    /// First-wins store: returns the existing recording untouched, or records
    /// `error` as the first.
    fn record(&self, error: BoxError) -> LatchedError {
        let mut slot = self.first.borrow_mut();
        if let Some(first) = &*slot {
            return first.clone();
        }
        let first = LatchedError::record(error);
        #[cfg(feature = "tracing")]
        tracing::debug!(error = %first, "latched first error");
        *slot = Some(first.clone());
        first
    }
}

impl fmt::Display for ErrorLatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl fmt::Debug for ErrorLatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorLatch")
            .field("first", &*self.first.borrow())
            .field("cancel", &self.cancel.is_some())
            .finish()
    }
}

//! Polled cancellation sources.
//!
//! A [`CancelSource`] is the external collaborator that tells a latch its
//! unit of work should stop early. The latch polls it before each attempt
//! and on status checks, and records the first reason it observes; it never
//! drives the source, and it never interrupts an operation already in
//! flight.

use std::cell::RefCell;
use std::error::Error;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::error::BoxError;

/// External signal that a unit of work should stop early.
///
/// Implementations may allocate a fresh reason on every poll; the latch
/// records only the first one it sees, so repeated status checks after
/// cancellation stay identical.
pub trait CancelSource {
    /// Reason the unit of work should stop, or `None` while it may proceed.
    fn cancelled(&self) -> Option<BoxError>;
}

impl<F> CancelSource for F
where
    F: Fn() -> Option<BoxError>,
{
    fn cancelled(&self) -> Option<BoxError> {
        self()
    }
}

/// Reason reported by an expired [`Deadline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineExceeded;

impl fmt::Display for DeadlineExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("deadline exceeded")
    }
}

impl Error for DeadlineExceeded {}

/// Cancellation source that fires once a point in time has passed.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use error_latch::{Deadline, ErrorLatch};
///
/// let latch = ErrorLatch::with_cancel(Deadline::after(Duration::ZERO));
///
/// // Already expired: reported before any attempt has run.
/// assert_eq!(latch.first_error().unwrap().to_string(), "deadline exceeded");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Deadline at a fixed instant.
    #[must_use]
    pub fn at(at: Instant) -> Self {
        Self { at }
    }

    /// Deadline `timeout` from now.
    #[must_use]
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now() + timeout,
        }
    }
}

impl CancelSource for Deadline {
    fn cancelled(&self) -> Option<BoxError> {
        (Instant::now() >= self.at).then(|| DeadlineExceeded.into())
    }
}

/// Reason recorded by [`ManualCancel::cancel`].
#[derive(Debug, Clone)]
pub struct Cancelled {
    reason: String,
}

impl Cancelled {
    /// Caller-supplied reason text.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cancelled: {}", self.reason)
    }
}

impl Error for Cancelled {}

/// Hand-driven cancellation flag for one thread of control.
///
/// Clones share the flag, so a handle kept at the call site can stop work
/// running behind a latch elsewhere on the same thread. The first reason
/// sticks; later [`cancel`](Self::cancel) calls are ignored.
#[derive(Debug, Clone, Default)]
pub struct ManualCancel {
    state: Rc<RefCell<Option<String>>>,
}

impl ManualCancel {
    /// Creates a flag that is not yet cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the unit of work cancelled with `reason`.
    pub fn cancel(&self, reason: impl Into<String>) {
        let mut state = self.state.borrow_mut();
        if state.is_none() {
            *state = Some(reason.into());
        }
    }

    /// Returns `true` once cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.state.borrow().is_some()
    }
}

impl CancelSource for ManualCancel {
    fn cancelled(&self) -> Option<BoxError> {
        self.state.borrow().as_ref().map(|reason| {
            Cancelled {
                reason: reason.clone(),
            }
            .into()
        })
    }
}

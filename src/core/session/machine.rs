use parking_lot::Mutex;
use tracing::debug;

use super::state::{CANCELLED_MESSAGE, SessionState, StateError};

/// An admitted submission.
///
/// Settled by [`RequestSession::finish`]. Dropping it unsettled (the submit
/// future was dropped, e.g. by a timeout) moves the session to
/// `Failed(CANCELLED_MESSAGE)`, unless `reset` or `close` already moved on.
#[derive(Debug)]
pub struct Admission<'a, T: Clone> {
    session: &'a RequestSession<T>,
    epoch: u64,
    previous: SessionState<T>,
    settled: bool,
}

impl<T: Clone> Admission<'_, T> {
    /// The state this submission replaced
    pub fn previous(&self) -> &SessionState<T> {
        &self.previous
    }

    pub fn take_previous(&mut self) -> SessionState<T> {
        std::mem::take(&mut self.previous)
    }
}

impl<T: Clone> Drop for Admission<'_, T> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        let mut inner = self.session.inner.lock();
        if inner.is_current(self.epoch) {
            inner.state = SessionState::Failed(CANCELLED_MESSAGE.to_string());
            debug!(session = self.session.label, "Submission dropped; state -> failed");
        }
    }
}

#[derive(Debug)]
struct Inner<T> {
    state: SessionState<T>,
    epoch: u64,
    closed: bool,
}

impl<T> Inner<T> {
    fn is_current(&self, epoch: u64) -> bool {
        !self.closed && self.epoch == epoch && self.state.is_pending()
    }
}

/// Request lifecycle state machine: `Idle -> Pending -> Succeeded | Failed -> Idle`.
///
/// Every method is a short critical section; the lock is never held while a
/// network call is in flight. `reset` and `close` advance an epoch so that a
/// result arriving for an older submission is discarded instead of applied.
#[derive(Debug)]
pub struct RequestSession<T> {
    label: &'static str,
    inner: Mutex<Inner<T>>,
}

impl<T: Clone> RequestSession<T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            inner: Mutex::new(Inner {
                state: SessionState::Idle,
                epoch: 0,
                closed: false,
            }),
        }
    }

    pub fn state(&self) -> SessionState<T> {
        self.inner.lock().state.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.inner.lock().state.is_pending()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    /// Fail fast if a submission could not be admitted right now
    pub fn ensure_available(&self) -> Result<(), StateError> {
        let inner = self.inner.lock();
        if inner.closed {
            Err(StateError::Closed)
        } else if inner.state.is_pending() {
            Err(StateError::AlreadyPending)
        } else {
            Ok(())
        }
    }

    /// Move to `Pending`, or reject without any transition
    pub fn begin(&self) -> Result<Admission<'_, T>, StateError> {
        let mut inner = self.inner.lock();
        if inner.closed {
            return Err(StateError::Closed);
        }
        if inner.state.is_pending() {
            debug!(session = self.label, "Rejected submit while pending");
            return Err(StateError::AlreadyPending);
        }

        let previous = std::mem::replace(&mut inner.state, SessionState::Pending);
        debug!(session = self.label, from = previous.name(), "State -> pending");
        Ok(Admission {
            session: self,
            epoch: inner.epoch,
            previous,
            settled: false,
        })
    }

    /// Apply the result of an admitted submission.
    ///
    /// `apply` runs under the session lock and must leave the state `Succeeded`
    /// or `Failed`. Returns `None`, without calling `apply`, when the
    /// admission was invalidated by `reset` or `close`.
    pub fn finish<R>(
        &self,
        mut admission: Admission<'_, T>,
        apply: impl FnOnce(&mut SessionState<T>) -> R,
    ) -> Option<R> {
        admission.settled = true;
        let mut inner = self.inner.lock();
        if !inner.is_current(admission.epoch) {
            debug!(session = self.label, "Discarded stale result");
            return None;
        }

        let result = apply(&mut inner.state);
        debug!(session = self.label, to = inner.state.name(), "State -> settled");
        Some(result)
    }

    /// Return to `Idle` from any state, invalidating an in-flight submission.
    ///
    /// Returns the replaced state so the caller can release what it held.
    pub fn reset(&self) -> SessionState<T> {
        let mut inner = self.inner.lock();
        inner.epoch += 1;
        let previous = std::mem::take(&mut inner.state);
        debug!(session = self.label, from = previous.name(), "State -> idle");
        previous
    }

    /// Tear the session down; later submissions are rejected and late results dropped
    pub fn close(&self) -> SessionState<T> {
        let mut inner = self.inner.lock();
        inner.closed = true;
        inner.epoch += 1;
        std::mem::take(&mut inner.state)
    }
}

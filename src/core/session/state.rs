use thiserror::Error;

use crate::core::validation::ValidationError;

/// Failure recorded when a submission is dropped before it settles
pub const CANCELLED_MESSAGE: &str = "Request was cancelled";

/// Lifecycle of one logical user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState<T> {
    Idle,
    Pending,
    Succeeded(T),
    Failed(String),
}

impl<T> Default for SessionState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> SessionState<T> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            Self::Succeeded(payload) => Some(payload),
            _ => None,
        }
    }

    /// Reason of the last failure, displayed until the next submit or reset
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Operation attempted against an incompatible session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("A request is already in progress")]
    AlreadyPending,

    #[error("Session has been closed")]
    Closed,
}

/// Result of a `submit` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome<T> {
    /// The call completed and the session is now `Succeeded`
    Succeeded(T),
    /// The call completed with an error and the session is now `Failed`
    Failed(String),
    /// The session refused the submission; no call was made
    Rejected(StateError),
    /// Client-side validation failed; no call was made
    Invalid(ValidationError),
    /// The session was reset or closed while the call was in flight
    Discarded,
}

impl<T> SubmitOutcome<T> {
    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// Whether a network call was issued for this submission
    pub fn reached_network(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_) | Self::Discarded)
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            Self::Succeeded(payload) => Some(payload),
            _ => None,
        }
    }

    /// Human-readable reason for anything other than success
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Succeeded(_) => None,
            Self::Failed(reason) => Some(reason.clone()),
            Self::Rejected(e) => Some(e.to_string()),
            Self::Invalid(e) => Some(e.to_string()),
            Self::Discarded => Some(CANCELLED_MESSAGE.to_string()),
        }
    }
}

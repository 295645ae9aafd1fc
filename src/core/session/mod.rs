//! Per-view request sessions.
//!
//! A session admits one submission at a time, records its outcome and owns
//! whatever the outcome produced until the view resets or goes away.

mod clone;
mod machine;
mod state;
mod tts;

pub use clone::{CLONE_FAILURE_MESSAGE, VoiceCloneSession};
pub use machine::{Admission, RequestSession};
pub use state::{CANCELLED_MESSAGE, SessionState, StateError, SubmitOutcome};
pub use tts::{TTS_FAILURE_MESSAGE, TtsResult, TtsSession};

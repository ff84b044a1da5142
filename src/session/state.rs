//! Request state machine
//!
//! Two states and a deterministic transition table:
//!
//! ```text
//! Idle     --Submit-->    InFlight
//! InFlight --Complete-->  Idle
//! InFlight --Fail-->      Idle
//! ```
//!
//! Anything else is rejected. `Submit` while InFlight is the re-entrancy
//! guard and maps to `AlreadyInFlight`.

use crate::errors::{Result, SummaryError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Session request states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RequestState {
    /// Ready for a new summarization
    #[default]
    Idle,

    /// A summarization is streaming
    InFlight,
}

/// Events driving request state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestEvent {
    /// Validated reference submitted
    Submit,

    /// Stream exhausted
    Complete,

    /// Request or stream failed
    Fail,
}

/// What a failed request does to the state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Return to Idle on every failure path
    #[default]
    ResetToIdle,

    /// Stay InFlight after a failed request, blocking further submissions
    HoldInFlight,
}

impl RequestState {
    pub fn transition(&self, event: RequestEvent) -> Result<RequestState> {
        use RequestEvent::*;
        use RequestState::*;

        match (self, event) {
            (Idle, Submit) => Ok(InFlight),
            (InFlight, Complete) => Ok(Idle),
            (InFlight, Fail) => Ok(Idle),
            (InFlight, Submit) => Err(SummaryError::AlreadyInFlight),
            (from, event) => Err(SummaryError::InvalidTransition {
                from: format!("{:?}", from),
                event: format!("{:?}", event),
            }),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, RequestState::Idle)
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, RequestState::InFlight)
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestState::Idle => write!(f, "idle"),
            RequestState::InFlight => write!(f, "in-flight"),
        }
    }
}

impl FailurePolicy {
    /// State to settle in after a failure while InFlight
    pub fn settle(&self, state: RequestState) -> Result<RequestState> {
        match self {
            FailurePolicy::ResetToIdle => state.transition(RequestEvent::Fail),
            FailurePolicy::HoldInFlight => Ok(state),
        }
    }
}

//! Pure state transition function.
//!
//! The transition function is the core of the state machine. It takes the
//! current state and an event, and returns the new state and a list of effects.
//! This function has NO side effects - it is pure and deterministic.
//!
//! Each state has its own handler module with co-located tests:
//! - `idle`: Idle state transitions
//! - `starting`: Starting state transitions
//! - `interviewing`: Interviewing state transitions (answer validation, stale answers)
//! - `submitting`: Submitting state transitions
//! - `completion`: CompletePending and Fetching transitions (result retry policy)
//! - `done`: Done state transitions

mod completion;
mod done;
mod idle;
mod interviewing;
mod starting;
mod submitting;

use super::effect::{Effect, LogLevel, Notice, NoticeKind};
use super::event::Event;
use super::state::InterviewState;
use crate::config::ResultRetryPolicy;
use crate::error::ErrorKind;

/// Result of a state transition.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    /// The new state after the transition.
    pub state: InterviewState,
    /// Effects to execute.
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: InterviewState, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }

    pub fn no_change(state: InterviewState) -> Self {
        Self {
            state,
            effects: vec![],
        }
    }
}

/// Pure state transition function using the default result retry policy.
pub fn transition(state: InterviewState, event: Event) -> TransitionResult {
    transition_with_policy(state, event, &ResultRetryPolicy::default())
}

/// Pure state transition function.
///
/// Given the current state and an event, returns the new state and effects to
/// execute. `policy` only affects what happens after a failed result fetch.
pub fn transition_with_policy(
    state: InterviewState,
    event: Event,
    policy: &ResultRetryPolicy,
) -> TransitionResult {
    match &state {
        InterviewState::Idle => idle::handle(state, event),
        InterviewState::Starting => starting::handle(state, event),
        InterviewState::Interviewing { .. } => interviewing::handle(state, event),
        InterviewState::Submitting { .. } => submitting::handle(state, event),
        InterviewState::CompletePending { .. } | InterviewState::Fetching { .. } => {
            completion::handle(state, event, policy)
        }
        InterviewState::Done { .. } => done::handle(state, event),
    }
}

/// Leave the state untouched and note the dropped event at debug level.
pub(crate) fn ignore(state: &InterviewState, event: &Event) -> TransitionResult {
    TransitionResult::new(
        state.clone(),
        vec![Effect::Log {
            level: LogLevel::Debug,
            message: format!(
                "Ignoring {} in {} state",
                event.log_summary(),
                state.name()
            ),
        }],
    )
}

pub(crate) fn notify(kind: NoticeKind, message: String, cause: Option<ErrorKind>) -> Effect {
    Effect::Notify {
        notice: Notice {
            kind,
            message,
            cause,
        },
    }
}

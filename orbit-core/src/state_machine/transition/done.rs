//! Done state transitions.

use super::{ignore, TransitionResult};
use crate::state_machine::effect::{Effect, LogLevel};
use crate::state_machine::event::Event;
use crate::state_machine::state::InterviewState;

/// Handle transitions from the Done state.
///
/// The result is final for the session: nothing here triggers another fetch.
/// Only a reset leaves this state.
pub fn handle(state: InterviewState, event: Event) -> TransitionResult {
    match (&state, event) {
        (InterviewState::Done { result, .. }, Event::ResetRequested) => TransitionResult::new(
            InterviewState::Idle,
            vec![Effect::Log {
                level: LogLevel::Info,
                message: format!("Session {} closed", result.session_id),
            }],
        ),

        (_, event) => ignore(&state, &event),
    }
}

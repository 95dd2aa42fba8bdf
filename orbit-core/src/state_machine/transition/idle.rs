//! Idle state transitions.

use super::{ignore, TransitionResult};
use crate::state_machine::effect::Effect;
use crate::state_machine::event::Event;
use crate::state_machine::state::InterviewState;

/// Handle transitions from the Idle state.
///
/// Only a start request does anything here; a failed start also lands back
/// in Idle, so starting again is the retry path.
pub fn handle(state: InterviewState, event: Event) -> TransitionResult {
    match (&state, event) {
        (InterviewState::Idle, Event::StartRequested) => {
            TransitionResult::new(InterviewState::Starting, vec![Effect::StartSession])
        }

        (InterviewState::Idle, Event::ResetRequested) => {
            TransitionResult::no_change(state.clone())
        }

        (_, event) => ignore(&state, &event),
    }
}

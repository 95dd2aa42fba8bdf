//! Interviewing state transitions.

use super::{ignore, notify, TransitionResult};
use crate::render::validate_answer;
use crate::state_machine::effect::{Effect, LogLevel, NoticeKind};
use crate::state_machine::event::Event;
use crate::state_machine::state::InterviewState;

/// Handle transitions from the Interviewing state.
///
/// Answers are accepted only for the current question. An answer naming any
/// other question comes from a superseded renderer callback and is dropped
/// without a state change or a request.
pub fn handle(state: InterviewState, event: Event) -> TransitionResult {
    match (&state, event) {
        (
            InterviewState::Interviewing {
                session_id,
                question,
            },
            Event::AnswerSubmitted {
                question_id,
                answer,
            },
        ) => {
            if question_id != question.id {
                return TransitionResult::new(
                    state.clone(),
                    vec![Effect::Log {
                        level: LogLevel::Debug,
                        message: format!(
                            "Discarding stale answer for question {} (current question is {})",
                            question_id, question.id
                        ),
                    }],
                );
            }

            match validate_answer(question, &answer) {
                Ok(answer) => TransitionResult::new(
                    InterviewState::Submitting {
                        session_id: session_id.clone(),
                        question: question.clone(),
                        answer: answer.clone(),
                    },
                    vec![Effect::SubmitResponse {
                        session_id: session_id.clone(),
                        question_id,
                        answer,
                    }],
                ),
                Err(rejection) => TransitionResult::new(
                    state.clone(),
                    vec![notify(NoticeKind::InvalidAnswer, rejection.to_string(), None)],
                ),
            }
        }

        (InterviewState::Interviewing { session_id, .. }, Event::ResetRequested) => {
            TransitionResult::new(
                InterviewState::Idle,
                vec![Effect::Log {
                    level: LogLevel::Info,
                    message: format!("Session {} abandoned", session_id),
                }],
            )
        }

        (_, event) => ignore(&state, &event),
    }
}

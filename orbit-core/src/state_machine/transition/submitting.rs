//! Submitting state transitions.

use super::{ignore, notify, TransitionResult};
use crate::error::ApiOperation;
use crate::state_machine::effect::{Effect, LogLevel, NoticeKind};
use crate::state_machine::event::Event;
use crate::state_machine::state::InterviewState;

/// Handle transitions from the Submitting state (answer in flight).
pub fn handle(state: InterviewState, event: Event) -> TransitionResult {
    match (&state, event) {
        // Next question supersedes the one just answered
        (
            InterviewState::Submitting { session_id, .. },
            Event::NextQuestionReceived { question },
        ) => TransitionResult::no_change(InterviewState::Interviewing {
            session_id: session_id.clone(),
            question,
        }),

        // Server is done: fetch the result right away, no user action needed
        (
            InterviewState::Submitting { .. },
            Event::SessionCompleted { session_id, reason },
        ) => {
            let message = match &reason {
                Some(reason) => format!(
                    "Session {} complete ({}); fetching result",
                    session_id, reason
                ),
                None => format!("Session {} complete; fetching result", session_id),
            };
            TransitionResult::new(
                InterviewState::Fetching {
                    session_id: session_id.clone(),
                    reason,
                    attempt: 1,
                },
                vec![
                    Effect::Log {
                        level: LogLevel::Info,
                        message,
                    },
                    Effect::FetchResult {
                        session_id,
                        delay: None,
                    },
                ],
            )
        }

        // Failure (including a malformed response): keep the prior question
        // so the user can answer again
        (
            InterviewState::Submitting {
                session_id,
                question,
                ..
            },
            Event::SubmitFailed { error },
        ) => TransitionResult::new(
            InterviewState::Interviewing {
                session_id: session_id.clone(),
                question: question.clone(),
            },
            vec![
                Effect::Log {
                    level: LogLevel::Warn,
                    message: format!(
                        "Failed to submit answer for question {}: {}",
                        question.id, error
                    ),
                },
                notify(
                    NoticeKind::SubmitFailed,
                    error.user_message(ApiOperation::SubmitResponse),
                    Some(error.kind()),
                ),
            ],
        ),

        (_, event) => ignore(&state, &event),
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::api::{Answer, CompletionReason, QuestionId};
    use crate::error::{ApiError, ErrorKind};
    use crate::state_machine::effect::Notice;

    fn submitting() -> InterviewState {
        InterviewState::Submitting {
            session_id: session_id(),
            question: hobby_question(),
            answer: hiking(),
        }
    }

    #[test]
    fn test_next_question_replaces_current() {
        let result = handle(
            submitting(),
            Event::NextQuestionReceived {
                question: slider_question(),
            },
        );

        assert_eq!(
            result.state,
            InterviewState::Interviewing {
                session_id: session_id(),
                question: slider_question(),
            }
        );
        assert!(result.effects.is_empty());
    }

    #[test]
    fn test_completion_fetches_result_immediately() {
        let result = handle(
            submitting(),
            Event::SessionCompleted {
                session_id: session_id(),
                reason: Some(CompletionReason::NoMoreQuestions),
            },
        );

        assert_eq!(
            result.state,
            InterviewState::Fetching {
                session_id: session_id(),
                reason: Some(CompletionReason::NoMoreQuestions),
                attempt: 1,
            }
        );
        assert!(result.state.current_question().is_none());
        assert_eq!(
            result.effects.last(),
            Some(&Effect::FetchResult {
                session_id: session_id(),
                delay: None,
            })
        );
    }

    #[test]
    fn test_protocol_violation_keeps_prior_question() {
        let result = handle(
            submitting(),
            Event::SubmitFailed {
                error: ApiError::protocol_violation(
                    "response carries neither a next question nor done",
                ),
            },
        );

        assert_eq!(
            result.state,
            InterviewState::Interviewing {
                session_id: session_id(),
                question: hobby_question(),
            }
        );
        assert!(result.effects.iter().any(|e| matches!(
            e,
            Effect::Notify {
                notice: Notice {
                    kind: NoticeKind::SubmitFailed,
                    cause: Some(ErrorKind::ProtocolViolation),
                    ..
                }
            }
        )));
        assert!(!result
            .effects
            .iter()
            .any(|e| matches!(e, Effect::SubmitResponse { .. })));
    }

    #[test]
    fn test_server_error_allows_answering_again() {
        let result = handle(
            submitting(),
            Event::SubmitFailed {
                error: ApiError::Server {
                    status: 404,
                    message: "Session not found".to_string(),
                },
            },
        );

        // Answering the same question again resubmits
        let retry = super::super::transition(
            result.state,
            Event::AnswerSubmitted {
                question_id: QuestionId::from("qid_1"),
                answer: Answer::from("Painting"),
            },
        );
        assert!(matches!(retry.state, InterviewState::Submitting { .. }));
    }

    #[test]
    fn test_answer_during_submission_is_ignored() {
        let result = handle(
            submitting(),
            Event::AnswerSubmitted {
                question_id: QuestionId::from("qid_1"),
                answer: Answer::from("Painting"),
            },
        );

        assert_eq!(result.state, submitting());
        assert!(!result
            .effects
            .iter()
            .any(|e| matches!(e, Effect::SubmitResponse { .. })));
    }
}

//! CompletePending and Fetching transitions.
//!
//! Once the server reports completion the client fetches the result. Failed
//! fetches are retried automatically with backoff up to the policy limit;
//! after that the session waits in CompletePending for an explicit retry.
//! Protocol violations are not retried automatically since the same response
//! would come back.

use super::{ignore, notify, TransitionResult};
use crate::config::ResultRetryPolicy;
use crate::error::{ApiOperation, ErrorKind};
use crate::state_machine::effect::{Effect, LogLevel, NoticeKind};
use crate::state_machine::event::Event;
use crate::state_machine::state::InterviewState;

pub fn handle(
    state: InterviewState,
    event: Event,
    policy: &ResultRetryPolicy,
) -> TransitionResult {
    match (&state, event) {
        (InterviewState::Fetching { reason, .. }, Event::ResultFetched { result }) => {
            TransitionResult::new(
                InterviewState::Done {
                    reason: reason.clone(),
                    result,
                },
                vec![Effect::Log {
                    level: LogLevel::Info,
                    message: "Result received".to_string(),
                }],
            )
        }

        (
            InterviewState::Fetching {
                session_id,
                reason,
                attempt,
            },
            Event::ResultFetchFailed { error },
        ) => {
            let next_attempt = attempt + 1;
            let retry_delay = match error.kind() {
                ErrorKind::ProtocolViolation => None,
                _ => policy.delay_before(next_attempt),
            };

            match retry_delay {
                Some(delay) => TransitionResult::new(
                    InterviewState::Fetching {
                        session_id: session_id.clone(),
                        reason: reason.clone(),
                        attempt: next_attempt,
                    },
                    vec![
                        Effect::Log {
                            level: LogLevel::Warn,
                            message: format!(
                                "Result fetch attempt {} for session {} failed: {}; retrying in {:?}",
                                attempt, session_id, error, delay
                            ),
                        },
                        Effect::FetchResult {
                            session_id: session_id.clone(),
                            delay: Some(delay),
                        },
                    ],
                ),
                None => TransitionResult::new(
                    InterviewState::CompletePending {
                        session_id: session_id.clone(),
                        reason: reason.clone(),
                        failed_attempts: *attempt,
                    },
                    vec![
                        Effect::Log {
                            level: LogLevel::Error,
                            message: format!(
                                "Giving up on result for session {} after {} attempt(s): {}",
                                session_id, attempt, error
                            ),
                        },
                        notify(
                            NoticeKind::ResultUnavailable,
                            error.user_message(ApiOperation::FetchResult),
                            Some(error.kind()),
                        ),
                    ],
                ),
            }
        }

        // Manual retry starts a fresh round
        (
            InterviewState::CompletePending {
                session_id, reason, ..
            },
            Event::RetryResultRequested,
        ) => TransitionResult::new(
            InterviewState::Fetching {
                session_id: session_id.clone(),
                reason: reason.clone(),
                attempt: 1,
            },
            vec![Effect::FetchResult {
                session_id: session_id.clone(),
                delay: None,
            }],
        ),

        (InterviewState::CompletePending { session_id, .. }, Event::ResetRequested) => {
            TransitionResult::new(
                InterviewState::Idle,
                vec![Effect::Log {
                    level: LogLevel::Info,
                    message: format!("Session {} abandoned before its result arrived", session_id),
                }],
            )
        }

        (_, event) => ignore(&state, &event),
    }
}

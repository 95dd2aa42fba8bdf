//! Starting state transitions.

use super::{ignore, notify, TransitionResult};
use crate::error::ApiOperation;
use crate::state_machine::effect::{Effect, LogLevel, NoticeKind};
use crate::state_machine::event::Event;
use crate::state_machine::state::InterviewState;

/// Handle transitions from the Starting state (start request in flight).
pub fn handle(state: InterviewState, event: Event) -> TransitionResult {
    match (&state, event) {
        (
            InterviewState::Starting,
            Event::SessionStarted {
                session_id,
                question,
            },
        ) => TransitionResult::new(
            InterviewState::Interviewing {
                session_id: session_id.clone(),
                question: question.clone(),
            },
            vec![Effect::Log {
                level: LogLevel::Info,
                message: format!(
                    "Session {} started with question {}",
                    session_id, question.id
                ),
            }],
        ),

        // Back to Idle; starting again retries from scratch
        (InterviewState::Starting, Event::StartFailed { error }) => TransitionResult::new(
            InterviewState::Idle,
            vec![
                Effect::Log {
                    level: LogLevel::Warn,
                    message: format!("Failed to start session: {}", error),
                },
                notify(
                    NoticeKind::StartFailed,
                    error.user_message(ApiOperation::StartSession),
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
    use crate::error::{ApiError, ErrorKind};
    use crate::state_machine::effect::Notice;

    #[test]
    fn test_session_started_presents_first_question() {
        let result = handle(
            InterviewState::Starting,
            Event::SessionStarted {
                session_id: session_id(),
                question: hobby_question(),
            },
        );

        assert_eq!(
            result.state,
            InterviewState::Interviewing {
                session_id: session_id(),
                question: hobby_question(),
            }
        );
        assert_eq!(result.state.current_question(), Some(&hobby_question()));
    }

    #[test]
    fn test_connectivity_failure_returns_to_idle_with_notice() {
        let result = handle(
            InterviewState::Starting,
            Event::StartFailed {
                error: ApiError::connectivity("request timed out"),
            },
        );

        assert_eq!(result.state, InterviewState::Idle);
        assert!(result.effects.contains(&Effect::Notify {
            notice: Notice {
                kind: NoticeKind::StartFailed,
                message: "request timed out".to_string(),
                cause: Some(ErrorKind::Connectivity),
            }
        }));
    }

    #[test]
    fn test_server_failure_surfaces_detail() {
        let result = handle(
            InterviewState::Starting,
            Event::StartFailed {
                error: ApiError::Server {
                    status: 500,
                    message: "database unavailable".to_string(),
                },
            },
        );

        assert_eq!(result.state, InterviewState::Idle);
        let notice = result.effects.iter().find_map(|e| match e {
            Effect::Notify { notice } => Some(notice),
            _ => None,
        });
        assert_eq!(
            notice.map(|n| n.message.as_str()),
            Some("database unavailable")
        );
    }

    #[test]
    fn test_double_start_is_ignored() {
        let result = handle(InterviewState::Starting, Event::StartRequested);

        assert_eq!(result.state, InterviewState::Starting);
        assert!(!result.effects.contains(&Effect::StartSession));
    }

    #[test]
    fn test_reset_while_starting_is_ignored() {
        let result = handle(InterviewState::Starting, Event::ResetRequested);
        assert_eq!(result.state, InterviewState::Starting);
    }
}

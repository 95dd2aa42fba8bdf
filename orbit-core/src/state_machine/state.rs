//! State types for the interview state machine.
//!
//! Each variant carries exactly the data that is valid in that state, so a
//! question can only exist while the interview is running and a result only
//! once it has been fetched.

use crate::api::{Answer, CompletionReason, InterviewResult, Question, SessionId};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum InterviewState {
    /// No session yet.
    #[default]
    Idle,

    /// Start request in flight.
    Starting,

    /// A question is current and no request is in flight.
    Interviewing {
        session_id: SessionId,
        question: Question,
    },

    /// An answer for `question` is in flight. The question stays current
    /// until the server supersedes it.
    Submitting {
        session_id: SessionId,
        question: Question,
        answer: Answer,
    },

    /// The server reported completion but no result is available; entered
    /// when automatic fetch attempts are exhausted.
    CompletePending {
        session_id: SessionId,
        reason: Option<CompletionReason>,
        /// Fetch attempts that failed in the last round.
        failed_attempts: u32,
    },

    /// Result request in flight.
    Fetching {
        session_id: SessionId,
        reason: Option<CompletionReason>,
        /// 1-based attempt number within the current round.
        attempt: u32,
    },

    /// Result available. Terminal for the session.
    Done {
        result: InterviewResult,
        reason: Option<CompletionReason>,
    },
}

impl InterviewState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Starting => "Starting",
            Self::Interviewing { .. } => "Interviewing",
            Self::Submitting { .. } => "Submitting",
            Self::CompletePending { .. } => "CompletePending",
            Self::Fetching { .. } => "Fetching",
            Self::Done { .. } => "Done",
        }
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        match self {
            Self::Idle | Self::Starting => None,
            Self::Interviewing { session_id, .. }
            | Self::Submitting { session_id, .. }
            | Self::CompletePending { session_id, .. }
            | Self::Fetching { session_id, .. } => Some(session_id),
            Self::Done { result, .. } => Some(&result.session_id),
        }
    }

    /// The question currently on screen, if any.
    pub fn current_question(&self) -> Option<&Question> {
        match self {
            Self::Interviewing { question, .. } | Self::Submitting { question, .. } => {
                Some(question)
            }
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&InterviewResult> {
        match self {
            Self::Done { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Whether a request is in flight. User input is rejected while busy.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            Self::Starting | Self::Submitting { .. } | Self::Fetching { .. }
        )
    }

    /// Whether the server has reported the session complete.
    pub fn is_complete(&self) -> bool {
        matches!(
            self,
            Self::CompletePending { .. } | Self::Fetching { .. } | Self::Done { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{QuestionId, QuestionType};

    fn question() -> Question {
        Question {
            id: QuestionId::from("qid_1"),
            text: "Pick one".to_string(),
            question_type: QuestionType::Slider,
            options: None,
        }
    }

    #[test]
    fn test_default_is_idle() {
        assert_eq!(InterviewState::default(), InterviewState::Idle);
    }

    #[test]
    fn test_question_only_while_interviewing() {
        let interviewing = InterviewState::Interviewing {
            session_id: SessionId::from("s1"),
            question: question(),
        };
        assert_eq!(interviewing.current_question(), Some(&question()));
        assert!(!interviewing.is_busy());
        assert!(!interviewing.is_complete());

        let fetching = InterviewState::Fetching {
            session_id: SessionId::from("s1"),
            reason: None,
            attempt: 1,
        };
        assert_eq!(fetching.current_question(), None);
        assert!(fetching.is_busy());
        assert!(fetching.is_complete());
        assert_eq!(fetching.session_id(), Some(&SessionId::from("s1")));
    }
}

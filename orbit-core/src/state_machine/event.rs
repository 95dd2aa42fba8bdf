//! Events that trigger state transitions.
//!
//! Events are either user actions or the outcomes of transport calls. They
//! are the only input to the pure transition function.

use crate::api::{Answer, CompletionReason, InterviewResult, Question, QuestionId, SessionId};
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // =========================================================================
    // User Actions
    // =========================================================================
    /// User asked to begin an interview.
    StartRequested,

    /// User committed an answer to the question with `question_id`.
    AnswerSubmitted {
        question_id: QuestionId,
        answer: Answer,
    },

    /// User asked to try fetching the result again.
    RetryResultRequested,

    /// User asked to abandon the session and return to the start.
    ResetRequested,

    // =========================================================================
    // Start Results
    // =========================================================================
    SessionStarted {
        session_id: SessionId,
        question: Question,
    },

    StartFailed { error: ApiError },

    // =========================================================================
    // Submit Results
    // =========================================================================
    NextQuestionReceived { question: Question },

    /// Server reported that the session is done.
    SessionCompleted {
        session_id: SessionId,
        reason: Option<CompletionReason>,
    },

    SubmitFailed { error: ApiError },

    // =========================================================================
    // Result Fetch Results
    // =========================================================================
    ResultFetched { result: InterviewResult },

    ResultFetchFailed { error: ApiError },
}

impl Event {
    /// One-line description for logs. Answers are not included.
    pub fn log_summary(&self) -> String {
        match self {
            Event::StartRequested => "StartRequested".to_string(),
            Event::AnswerSubmitted { question_id, .. } => {
                format!("AnswerSubmitted {{ question: {} }}", question_id)
            }
            Event::RetryResultRequested => "RetryResultRequested".to_string(),
            Event::ResetRequested => "ResetRequested".to_string(),
            Event::SessionStarted {
                session_id,
                question,
            } => format!(
                "SessionStarted {{ session: {}, question: {} }}",
                session_id, question.id
            ),
            Event::StartFailed { error } => format!("StartFailed {{ {} }}", error),
            Event::NextQuestionReceived { question } => {
                format!("NextQuestionReceived {{ question: {} }}", question.id)
            }
            Event::SessionCompleted { session_id, reason } => match reason {
                Some(reason) => format!(
                    "SessionCompleted {{ session: {}, reason: {} }}",
                    session_id, reason
                ),
                None => format!("SessionCompleted {{ session: {} }}", session_id),
            },
            Event::SubmitFailed { error } => format!("SubmitFailed {{ {} }}", error),
            Event::ResultFetched { result } => format!(
                "ResultFetched {{ session: {}, recommendations: {} }}",
                result.session_id,
                result.recommendations.len()
            ),
            Event::ResultFetchFailed { error } => format!("ResultFetchFailed {{ {} }}", error),
        }
    }
}

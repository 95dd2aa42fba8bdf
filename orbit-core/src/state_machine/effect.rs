//! Effects (side effects as data).
//!
//! Effects describe what should happen as a result of a state transition.
//! The interpreter executes them; the transition function only returns them.

use std::time::Duration;

use crate::api::{Answer, QuestionId, SessionId};
use crate::error::ErrorKind;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    // =========================================================================
    // Transport Effects
    // =========================================================================
    /// `POST /session/start`
    StartSession,

    /// `POST /response`
    SubmitResponse {
        session_id: SessionId,
        question_id: QuestionId,
        answer: Answer,
    },

    /// `GET /session/{id}/result`, after waiting `delay` if set.
    FetchResult {
        session_id: SessionId,
        delay: Option<Duration>,
    },

    // =========================================================================
    // User-Facing Effects
    // =========================================================================
    /// Surface a dismissible message to the user.
    Notify { notice: Notice },

    // =========================================================================
    // Logging Effects
    // =========================================================================
    Log { level: LogLevel, message: String },
}

/// A user-visible failure message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    /// Classification of the transport failure behind this notice, if any.
    pub cause: Option<ErrorKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    StartFailed,
    SubmitFailed,
    InvalidAnswer,
    ResultUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

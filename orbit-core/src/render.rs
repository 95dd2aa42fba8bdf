//! Renderer contracts.
//!
//! Renderers are the presentation layer around the state machine. A
//! [`QuestionRenderer`] turns the current question into an answer event; a
//! [`ResultsRenderer`] displays a completed result. Neither holds session
//! state: both are handed immutable snapshots.

use anyhow::Result;
use thiserror::Error;

use crate::api::{
    Answer, CompletionReason, InterviewResult, Question, QuestionId, QuestionType, Recommendation,
};
use crate::state_machine::Event;

/// Single-use answer callback bound to the question it was issued for.
///
/// The event it produces names that question, so an answer that arrives after
/// the question was superseded is recognised as stale and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerCallback {
    question_id: QuestionId,
}

impl AnswerCallback {
    pub fn for_question(question: &Question) -> Self {
        Self {
            question_id: question.id.clone(),
        }
    }

    pub fn question_id(&self) -> &QuestionId {
        &self.question_id
    }

    /// Commit an answer. Consumes the callback: one accepted value per question.
    pub fn answer(self, answer: impl Into<Answer>) -> Event {
        Event::AnswerSubmitted {
            question_id: self.question_id,
            answer: answer.into(),
        }
    }
}

pub trait QuestionRenderer {
    /// Present `question` and return the event produced by `respond`.
    fn render_question(&mut self, question: &Question, respond: AnswerCallback) -> Result<Event>;
}

pub trait ResultsRenderer {
    fn render_results(&mut self, view: &ResultsView) -> Result<()>;
}

/// Why an answer does not fit the question it claims to answer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnswerRejection {
    #[error("a {question_type} question expects a {expected} answer")]
    WrongType {
        question_type: QuestionType,
        expected: &'static str,
    },
    #[error("'{answer}' is not one of the offered options")]
    NotAnOption { answer: Answer },
    #[error("this question has no options to choose from")]
    NoOptions,
    #[error("{value} is outside the range 0 to 1")]
    OutOfRange { value: f64 },
    #[error("the answer is empty")]
    Empty,
}

/// Check an answer against the question's type tag.
///
/// Returns the answer to submit: free text is trimmed, everything else is
/// passed through unchanged.
pub fn validate_answer(question: &Question, answer: &Answer) -> Result<Answer, AnswerRejection> {
    let wrong_type = |expected| AnswerRejection::WrongType {
        question_type: question.question_type,
        expected,
    };

    match question.question_type {
        QuestionType::MultipleChoice => {
            let text = answer.as_text().ok_or_else(|| wrong_type("text"))?;
            let choices = question.choices().ok_or(AnswerRejection::NoOptions)?;
            if choices.iter().any(|choice| choice == text) {
                Ok(answer.clone())
            } else {
                Err(AnswerRejection::NotAnOption {
                    answer: answer.clone(),
                })
            }
        }
        QuestionType::Likert => {
            let value = answer.as_number().ok_or_else(|| wrong_type("numeric"))?;
            let scale = question.scale().ok_or(AnswerRejection::NoOptions)?;
            if scale.iter().any(|option| *option == value) {
                Ok(answer.clone())
            } else {
                Err(AnswerRejection::NotAnOption {
                    answer: answer.clone(),
                })
            }
        }
        QuestionType::Slider => {
            let value = answer.as_number().ok_or_else(|| wrong_type("numeric"))?;
            if value.is_finite() && (0.0..=1.0).contains(&value) {
                Ok(answer.clone())
            } else {
                Err(AnswerRejection::OutOfRange { value })
            }
        }
        QuestionType::FreeText => {
            let text = answer.as_text().ok_or_else(|| wrong_type("text"))?;
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Err(AnswerRejection::Empty)
            } else {
                Ok(Answer::Text(trimmed.to_string()))
            }
        }
    }
}

/// One recommendation as the results renderer sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationView {
    pub rank: u32,
    pub archetype_id: String,
    pub name: String,
    pub fit_score: f64,
    pub explanation: String,
}

impl RecommendationView {
    /// Fit score as a whole percentage, e.g. `0.82` -> `"82%"`. Halves round
    /// up, so `0.125` -> `"13%"`.
    pub fn fit_percent(&self) -> String {
        format!("{}%", (self.fit_score * 100.0).round())
    }
}

impl From<&Recommendation> for RecommendationView {
    fn from(r: &Recommendation) -> Self {
        Self {
            rank: r.rank,
            archetype_id: r.archetype_id.clone(),
            name: r.name.clone(),
            fit_score: r.fit_score,
            explanation: r.explanation.clone(),
        }
    }
}

/// Snapshot of a completed result for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    /// Ascending by rank, starting at 1.
    pub recommendations: Vec<RecommendationView>,
    /// Exactly the server-reported count.
    pub questions_answered: u32,
    pub completion_reason: Option<CompletionReason>,
}

impl ResultsView {
    pub fn new(result: &InterviewResult, completion_reason: Option<&CompletionReason>) -> Self {
        Self {
            recommendations: result
                .recommendations
                .iter()
                .map(RecommendationView::from)
                .collect(),
            questions_answered: result.questions_answered,
            completion_reason: completion_reason.cloned(),
        }
    }
}

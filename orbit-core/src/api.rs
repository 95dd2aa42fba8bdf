//! Wire types for the interview API.
//!
//! The raw response DTOs mirror the JSON the server sends. They are converted
//! into the validated domain types (`SessionStart`, `SubmitOutcome`,
//! `InterviewResult`) before anything else in the crate sees them, so a
//! malformed response is rejected once, at the boundary.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::error::ApiError;

/// Newtype for the server-assigned session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Newtype for a question identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for QuestionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for QuestionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The closed set of question types the server can present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    Likert,
    Slider,
    FreeText,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple_choice",
            Self::Likert => "likert",
            Self::Slider => "slider",
            Self::FreeText => "free_text",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selectable option values. Strings for multiple-choice, numbers for likert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionOptions {
    Choices(Vec<String>),
    Scale(Vec<f64>),
}

impl QuestionOptions {
    pub fn len(&self) -> usize {
        match self {
            Self::Choices(choices) => choices.len(),
            Self::Scale(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One server-presented prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<QuestionOptions>,
}

impl Question {
    /// Option strings, if this question carries string options.
    pub fn choices(&self) -> Option<&[String]> {
        match &self.options {
            Some(QuestionOptions::Choices(choices)) => Some(choices),
            _ => None,
        }
    }

    /// Option numbers, if this question carries numeric options.
    pub fn scale(&self) -> Option<&[f64]> {
        match &self.options {
            Some(QuestionOptions::Scale(values)) => Some(values),
            _ => None,
        }
    }
}

/// An answer value. Meaningful only for the question it answers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Text(String),
    Number(f64),
}

impl Answer {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

// Whole numbers go out as JSON integers so likert answers read `3`, not `3.0`.
impl Serialize for Answer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(text) => serializer.serialize_str(text),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
                serializer.serialize_i64(*n as i64)
            }
            Self::Number(n) => serializer.serialize_f64(*n),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Answer {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Answer {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for Answer {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Why the server ended the interview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionReason {
    TimeLimit,
    QuestionLimit,
    NoMoreQuestions,
    Other(String),
}

impl From<String> for CompletionReason {
    fn from(s: String) -> Self {
        match s.as_str() {
            "time_limit" => Self::TimeLimit,
            "question_limit" => Self::QuestionLimit,
            "no_more_questions" => Self::NoMoreQuestions,
            _ => Self::Other(s),
        }
    }
}

impl fmt::Display for CompletionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimeLimit => write!(f, "time limit reached"),
            Self::QuestionLimit => write!(f, "question limit reached"),
            Self::NoMoreQuestions => write!(f, "no more questions"),
            Self::Other(reason) => write!(f, "{}", reason),
        }
    }
}

/// One ranked recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub rank: u32,
    pub archetype_id: String,
    pub name: String,
    pub fit_score: f64,
    pub explanation: String,
}

// =============================================================================
// Domain results of the three operations
// =============================================================================

/// A freshly started session with its first question.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStart {
    pub session_id: SessionId,
    pub question: Question,
}

/// Outcome of submitting an answer. Exactly one of the two cases.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    NextQuestion(Question),
    Completed {
        session_id: SessionId,
        reason: Option<CompletionReason>,
    },
}

/// The final recommendations for a completed session.
///
/// Recommendations are sorted by rank, and ranks are exactly `1..=n`.
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewResult {
    pub session_id: SessionId,
    pub recommendations: Vec<Recommendation>,
    pub confidence: Option<f64>,
    pub average_uncertainty: Option<f64>,
    pub questions_answered: u32,
}

// =============================================================================
// Raw wire DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SessionStartResponse {
    pub session_id: String,
    pub question: Question,
}

impl From<SessionStartResponse> for SessionStart {
    fn from(response: SessionStartResponse) -> Self {
        Self {
            session_id: SessionId(response.session_id),
            question: response.question,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResponseRequest<'a> {
    pub session_id: &'a SessionId,
    pub question_id: &'a QuestionId,
    pub answer: &'a Answer,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseResponse {
    #[serde(default)]
    pub question: Option<Question>,
    #[serde(default)]
    pub done: Option<bool>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl ResponseResponse {
    /// Classify the response for the session the answer was submitted to.
    ///
    /// A body with both a question and `done: true`, or with neither, matches
    /// no case of the protocol and is rejected.
    pub fn into_outcome(self, submitted_for: &SessionId) -> Result<SubmitOutcome, ApiError> {
        let done = self.done.unwrap_or(false);
        match (self.question, done) {
            (Some(_), true) => Err(ApiError::protocol_violation(
                "response carries both a next question and done",
            )),
            (Some(question), false) => Ok(SubmitOutcome::NextQuestion(question)),
            (None, true) => {
                let session_id = match self.session_id {
                    Some(id) if id != submitted_for.0 => {
                        return Err(ApiError::protocol_violation(format!(
                            "completion reported for session {} but answer was submitted to {}",
                            id, submitted_for
                        )));
                    }
                    Some(id) => SessionId(id),
                    None => submitted_for.clone(),
                };
                Ok(SubmitOutcome::Completed {
                    session_id,
                    reason: self.reason.map(CompletionReason::from),
                })
            }
            (None, false) => Err(ApiError::protocol_violation(
                "response carries neither a next question nor done",
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ResultResponse {
    pub session_id: String,
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub average_uncertainty: Option<f64>,
    pub questions_answered: u32,
}

impl ResultResponse {
    /// Validate the result for the session it was requested for.
    pub fn into_result(self, requested: &SessionId) -> Result<InterviewResult, ApiError> {
        if self.session_id != requested.0 {
            return Err(ApiError::protocol_violation(format!(
                "result is for session {} but {} was requested",
                self.session_id, requested
            )));
        }

        let recommendations = rank_recommendations(self.recommendations)?;

        Ok(InterviewResult {
            session_id: SessionId(self.session_id),
            recommendations,
            confidence: self.confidence,
            average_uncertainty: self.average_uncertainty,
            questions_answered: self.questions_answered,
        })
    }
}

/// Sort recommendations by rank and require the ranks to be exactly `1..=n`.
pub fn rank_recommendations(
    mut recommendations: Vec<Recommendation>,
) -> Result<Vec<Recommendation>, ApiError> {
    recommendations.sort_by_key(|r| r.rank);

    for (expected, recommendation) in (1u32..).zip(&recommendations) {
        if recommendation.rank != expected {
            return Err(ApiError::protocol_violation(format!(
                "recommendation ranks must be contiguous from 1; expected rank {} but found {}",
                expected, recommendation.rank
            )));
        }
    }

    Ok(recommendations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn recommendation(rank: u32) -> Recommendation {
        Recommendation {
            rank,
            archetype_id: format!("arch_{}", rank),
            name: format!("Archetype {}", rank),
            fit_score: 0.5,
            explanation: "because".to_string(),
        }
    }

    #[test]
    fn test_question_deserializes_string_options() {
        let question: Question = serde_json::from_value(json!({
            "id": "qid_1",
            "text": "Pick one",
            "type": "multiple_choice",
            "options": ["Hiking", "Painting"]
        }))
        .unwrap();

        assert_eq!(question.id, QuestionId::from("qid_1"));
        assert_eq!(question.question_type, QuestionType::MultipleChoice);
        assert_eq!(
            question.choices(),
            Some(&["Hiking".to_string(), "Painting".to_string()][..])
        );
        assert_eq!(question.scale(), None);
    }

    #[test]
    fn test_question_deserializes_numeric_options() {
        let question: Question = serde_json::from_value(json!({
            "id": "qid_2",
            "text": "How much?",
            "type": "likert",
            "options": [1, 2, 3, 4, 5]
        }))
        .unwrap();

        assert_eq!(question.scale(), Some(&[1.0, 2.0, 3.0, 4.0, 5.0][..]));
    }

    #[test]
    fn test_question_without_options() {
        let question: Question = serde_json::from_value(json!({
            "id": "qid_3",
            "text": "Slide",
            "type": "slider",
            "options": null
        }))
        .unwrap();

        assert_eq!(question.options, None);
    }

    #[test]
    fn test_unknown_question_type_is_rejected() {
        let result: Result<Question, _> = serde_json::from_value(json!({
            "id": "qid_4",
            "text": "?",
            "type": "ranking"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_answer_serializes_whole_numbers_as_integers() {
        assert_eq!(serde_json::to_value(Answer::Number(3.0)).unwrap(), json!(3));
        assert_eq!(
            serde_json::to_value(Answer::Number(0.37)).unwrap(),
            json!(0.37)
        );
        assert_eq!(
            serde_json::to_value(Answer::from("Hiking")).unwrap(),
            json!("Hiking")
        );
    }

    #[test]
    fn test_response_with_next_question() {
        let response: ResponseResponse = serde_json::from_value(json!({
            "question": {"id": "qid_2", "text": "Next", "type": "slider"},
            "done": null,
            "session_id": null,
            "reason": null
        }))
        .unwrap();

        let outcome = response.into_outcome(&SessionId::from("s1")).unwrap();
        assert!(matches!(outcome, SubmitOutcome::NextQuestion(q) if q.id.0 == "qid_2"));
    }

    #[test]
    fn test_done_response_carries_reason() {
        let response: ResponseResponse = serde_json::from_value(json!({
            "done": true,
            "session_id": "s1",
            "reason": "question_limit"
        }))
        .unwrap();

        let outcome = response.into_outcome(&SessionId::from("s1")).unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Completed {
                session_id: SessionId::from("s1"),
                reason: Some(CompletionReason::QuestionLimit),
            }
        );
    }

    #[test]
    fn test_done_without_session_id_uses_submitted_session() {
        let response: ResponseResponse = serde_json::from_value(json!({"done": true})).unwrap();

        let outcome = response.into_outcome(&SessionId::from("s1")).unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Completed {
                session_id: SessionId::from("s1"),
                reason: None,
            }
        );
    }

    #[test]
    fn test_done_for_other_session_is_protocol_violation() {
        let response: ResponseResponse =
            serde_json::from_value(json!({"done": true, "session_id": "s2"})).unwrap();

        let err = response.into_outcome(&SessionId::from("s1")).unwrap_err();
        assert!(matches!(err, ApiError::ProtocolViolation { .. }));
    }

    #[test]
    fn test_done_with_question_is_protocol_violation() {
        let response: ResponseResponse = serde_json::from_value(json!({
            "question": {"id": "qid_2", "text": "Next", "type": "slider"},
            "done": true,
            "session_id": "s1"
        }))
        .unwrap();

        let err = response.into_outcome(&SessionId::from("s1")).unwrap_err();
        assert!(matches!(err, ApiError::ProtocolViolation { .. }));
    }

    #[test]
    fn test_empty_response_is_protocol_violation() {
        let response: ResponseResponse = serde_json::from_value(json!({})).unwrap();

        let err = response.into_outcome(&SessionId::from("s1")).unwrap_err();
        assert!(matches!(err, ApiError::ProtocolViolation { .. }));
    }

    #[test]
    fn test_done_false_without_question_is_protocol_violation() {
        let response: ResponseResponse = serde_json::from_value(json!({"done": false})).unwrap();

        let err = response.into_outcome(&SessionId::from("s1")).unwrap_err();
        assert!(matches!(err, ApiError::ProtocolViolation { .. }));
    }

    #[test]
    fn test_result_for_other_session_is_protocol_violation() {
        let response = ResultResponse {
            session_id: "s2".to_string(),
            recommendations: vec![recommendation(1)],
            confidence: None,
            average_uncertainty: None,
            questions_answered: 4,
        };

        let err = response.into_result(&SessionId::from("s1")).unwrap_err();
        assert!(matches!(err, ApiError::ProtocolViolation { .. }));
    }

    #[test]
    fn test_five_ranks_are_sorted_ascending() {
        let shuffled = vec![
            recommendation(3),
            recommendation(1),
            recommendation(5),
            recommendation(2),
            recommendation(4),
        ];

        let ranked = rank_recommendations(shuffled).unwrap();
        let ranks: Vec<u32> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_duplicate_rank_is_rejected() {
        let err = rank_recommendations(vec![recommendation(1), recommendation(1)]).unwrap_err();
        assert!(matches!(err, ApiError::ProtocolViolation { .. }));
    }

    #[test]
    fn test_rank_gap_is_rejected() {
        let err = rank_recommendations(vec![recommendation(1), recommendation(3)]).unwrap_err();
        assert!(matches!(err, ApiError::ProtocolViolation { .. }));
    }

    #[test]
    fn test_empty_recommendations_are_accepted() {
        assert_eq!(rank_recommendations(vec![]).unwrap(), vec![]);
    }

    proptest! {
        #[test]
        fn ranked_output_is_contiguous_from_one(n in 0u32..20, seed in any::<u64>()) {
            let mut recommendations: Vec<Recommendation> = (1..=n).map(recommendation).collect();
            // Deterministic shuffle driven by the seed.
            let len = recommendations.len();
            if len > 1 {
                for i in 0..len {
                    let j = (seed.wrapping_mul(i as u64 + 1) % len as u64) as usize;
                    recommendations.swap(i, j);
                }
            }

            let ranked = rank_recommendations(recommendations).unwrap();
            let ranks: Vec<u32> = ranked.iter().map(|r| r.rank).collect();
            prop_assert_eq!(ranks, (1..=n).collect::<Vec<u32>>());
        }

        #[test]
        fn any_duplicate_rank_is_rejected(n in 1u32..20, dup in 0usize..20) {
            let mut recommendations: Vec<Recommendation> = (1..=n).map(recommendation).collect();
            let dup_rank = recommendations[dup % recommendations.len()].rank;
            recommendations.push(recommendation(dup_rank));

            prop_assert!(rank_recommendations(recommendations).is_err());
        }
    }
}

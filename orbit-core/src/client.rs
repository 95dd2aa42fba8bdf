//! HTTP transport for the three interview operations.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

use crate::api::{
    Answer, InterviewResult, QuestionId, ResponseRequest, ResponseResponse, ResultResponse,
    SessionId, SessionStart, SessionStartResponse, SubmitOutcome,
};
use crate::config::Config;
use crate::error::{ApiError, ApiOperation};
use crate::recording::{CorrelationId, RecordingLogger, RecordingMiddleware};

/// The network boundary of the interview.
///
/// Implementations are stateless with respect to the interview: they are
/// handed the identifiers they need and never hold on to session state.
#[async_trait]
pub trait Transport: Send + Sync {
    /// `POST /session/start`
    async fn start_session(&self) -> Result<SessionStart, ApiError>;

    /// `POST /response`
    async fn submit_response(
        &self,
        session_id: &SessionId,
        question_id: &QuestionId,
        answer: &Answer,
    ) -> Result<SubmitOutcome, ApiError>;

    /// `GET /session/{session_id}/result`
    async fn fetch_result(&self, session_id: &SessionId) -> Result<InterviewResult, ApiError>;
}

#[derive(Clone)]
pub struct OrbitClient {
    client: ClientWithMiddleware,
    base_url: String,
}

impl OrbitClient {
    pub fn new(config: &Config) -> Result<Self> {
        Self::new_with_recording(config, None)
    }

    pub fn new_with_recording(
        config: &Config,
        recording_logger: Option<RecordingLogger>,
    ) -> Result<Self> {
        let client = create_orbit_client(config.request_timeout, recording_logger)?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an endpoint URL by appending path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let invalid = |reason: String| {
            ApiError::connectivity(format!(
                "Invalid API base URL '{}': {}",
                self.base_url, reason
            ))
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Read a response body, classifying failures.
    async fn read_json<T: DeserializeOwned>(
        &self,
        operation: ApiOperation,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::connectivity(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            error!("API error during {}: {} - {}", operation, status, body);
            return Err(ApiError::from_status(status, &body));
        }

        debug!(operation = %operation, payload = %body, "Response payload");

        serde_json::from_str(&body).map_err(|e| {
            ApiError::protocol_violation(format!("malformed {} response: {}", operation, e))
        })
    }
}

#[async_trait]
impl Transport for OrbitClient {
    async fn start_session(&self) -> Result<SessionStart, ApiError> {
        let url = self.endpoint(&["session", "start"])?;

        let response = self
            .client
            .post(url)
            .with_extension(CorrelationId::generate())
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        let body: SessionStartResponse = self
            .read_json(ApiOperation::StartSession, response)
            .await?;
        Ok(body.into())
    }

    async fn submit_response(
        &self,
        session_id: &SessionId,
        question_id: &QuestionId,
        answer: &Answer,
    ) -> Result<SubmitOutcome, ApiError> {
        let url = self.endpoint(&["response"])?;
        let request = ResponseRequest {
            session_id,
            question_id,
            answer,
        };

        let response = self
            .client
            .post(url)
            .with_extension(CorrelationId::generate())
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        let body: ResponseResponse = self
            .read_json(ApiOperation::SubmitResponse, response)
            .await?;
        body.into_outcome(session_id)
    }

    async fn fetch_result(&self, session_id: &SessionId) -> Result<InterviewResult, ApiError> {
        let url = self.endpoint(&["session", &session_id.0, "result"])?;

        let response = self
            .client
            .get(url)
            .with_extension(CorrelationId::generate())
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        let body: ResultResponse = self.read_json(ApiOperation::FetchResult, response).await?;
        body.into_result(session_id)
    }
}

pub fn create_orbit_client(
    timeout: Duration,
    recording_logger: Option<RecordingLogger>,
) -> Result<ClientWithMiddleware> {
    let client = Client::builder()
        .user_agent(concat!("orbit-core/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .context("Failed to create HTTP client")?;

    Ok(ClientBuilder::new(client)
        .with(RecordingMiddleware::new(recording_logger))
        .build())
}

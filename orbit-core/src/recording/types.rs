use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RecordedEvent {
    pub timestamp: String,      // ISO 8601 timestamp
    pub correlation_id: String, // Groups a request with its response
    pub direction: Direction,
    pub operation: String, // e.g. "POST /session/start", "response_200"
    pub data: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Request,
    Response,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RequestData {
    pub method: String,
    pub url: String,
    pub headers: HashMap<String, String>, // Sanitized headers
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResponseData {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body_size: u64,
}

/// Per-call id carried in request extensions; sent as [`CORRELATION_ID_HEADER`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorrelationId(pub String);

impl CorrelationId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

use super::sanitizer::Sanitizer;
use super::types::{
    CorrelationId, Direction, RecordedEvent, RequestData, ResponseData, CORRELATION_ID_HEADER,
};
use super::RecordingLogger;
use http::{Extensions, HeaderValue};
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next, Result as MiddlewareResult};
use std::collections::HashMap;
use tracing::{info, warn};

/// Logs every API call on entry and completion, and optionally records it.
///
/// Purely observational: the request and its outcome pass through untouched
/// apart from the correlation header.
pub struct RecordingMiddleware {
    logger: Option<RecordingLogger>,
}

impl RecordingMiddleware {
    pub fn new(logger: Option<RecordingLogger>) -> Self {
        Self { logger }
    }
}

#[async_trait::async_trait]
impl Middleware for RecordingMiddleware {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> MiddlewareResult<Response> {
        let correlation_id = match req.headers().get(CORRELATION_ID_HEADER) {
            Some(existing) => existing
                .to_str()
                .map(str::to_string)
                .unwrap_or_else(|_| CorrelationId::generate().0),
            None => extensions
                .get::<CorrelationId>()
                .cloned()
                .unwrap_or_else(CorrelationId::generate)
                .0,
        };

        if !req.headers().contains_key(CORRELATION_ID_HEADER) {
            if let Ok(value) = HeaderValue::from_str(&correlation_id) {
                req.headers_mut().insert(CORRELATION_ID_HEADER, value);
            }
        }

        let request_data = extract_request_data(&req);
        info!(
            correlation_id = %correlation_id,
            "Making {} request to: {}",
            request_data.method,
            request_data.url
        );
        self.record(
            &correlation_id,
            Direction::Request,
            format!("{} {}", request_data.method, extract_path(&request_data.url)),
            serde_json::to_value(&request_data).unwrap_or(serde_json::Value::Null),
        );

        let response = next.run(req, extensions).await;

        match &response {
            Ok(resp) => {
                let response_data = extract_response_data(resp);
                info!(
                    correlation_id = %correlation_id,
                    "Response received: {}",
                    response_data.status_code
                );
                self.record(
                    &correlation_id,
                    Direction::Response,
                    format!("response_{}", response_data.status_code),
                    serde_json::to_value(&response_data).unwrap_or(serde_json::Value::Null),
                );
            }
            Err(err) => {
                warn!(correlation_id = %correlation_id, "Response error: {}", err);
                self.record(
                    &correlation_id,
                    Direction::Response,
                    "error".to_string(),
                    serde_json::json!({
                        "error": err.to_string(),
                        "error_type": format!("{:?}", err)
                    }),
                );
            }
        }

        response
    }
}

impl RecordingMiddleware {
    fn record(
        &self,
        correlation_id: &str,
        direction: Direction,
        operation: String,
        data: serde_json::Value,
    ) {
        if let Some(logger) = &self.logger {
            logger.record(RecordedEvent {
                timestamp: chrono::Utc::now().to_rfc3339(),
                correlation_id: correlation_id.to_string(),
                direction,
                operation,
                data,
            });
        }
    }
}

fn header_map(headers: &http::HeaderMap) -> HashMap<String, String> {
    let headers: HashMap<String, String> = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.to_string(), v.to_string()))
        })
        .collect();
    Sanitizer::sanitize_headers(&headers)
}

fn extract_request_data(request: &Request) -> RequestData {
    let body = request
        .body()
        .and_then(|body| body.as_bytes())
        .map(|bytes| match serde_json::from_slice::<serde_json::Value>(bytes) {
            Ok(json) => Sanitizer::sanitize_json(&json),
            Err(_) => serde_json::Value::String(format!("[NON_JSON_BODY_{}b]", bytes.len())),
        });

    RequestData {
        method: request.method().to_string(),
        url: request.url().to_string(),
        headers: header_map(request.headers()),
        body,
    }
}

fn extract_response_data(response: &Response) -> ResponseData {
    ResponseData {
        status_code: response.status().as_u16(),
        headers: header_map(response.headers()),
        body_size: response.content_length().unwrap_or(0),
    }
}

fn extract_path(url: &str) -> String {
    url::Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| url.to_string())
}

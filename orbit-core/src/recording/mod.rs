//! Request/response recording for the interview API.
//!
//! The middleware logs every call through `tracing`; when a
//! [`RecordingLogger`] is attached it also appends sanitized JSON lines to a
//! file for later inspection.

pub mod logger;
pub mod middleware;
pub mod sanitizer;
pub mod types;

pub use logger::RecordingLogger;
pub use middleware::RecordingMiddleware;
pub use sanitizer::{Sanitizer, SENSITIVE_HEADERS};
pub use types::*;

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod recording;
pub mod render;
pub mod state_machine;

pub use api::*;
pub use client::{create_orbit_client, OrbitClient, Transport};
pub use config::{Config, ResultRetryPolicy, DEFAULT_API_URL};
pub use error::{ApiError, ApiOperation, ErrorKind};
pub use recording::{RecordedEvent, RecordingLogger, RecordingMiddleware, Sanitizer};
pub use render::{
    validate_answer, AnswerCallback, AnswerRejection, QuestionRenderer, RecommendationView,
    ResultsRenderer, ResultsView,
};
pub use state_machine::{
    Effect, Event, InterviewDriver, InterviewState, LogLevel, Notice, NoticeKind,
};

//! Effect interpreter that executes effects against the transport.
//!
//! The interpreter is the boundary between the pure state machine and the
//! network. It takes effects (descriptions of what to do) and executes them,
//! returning result events. Transport failures never escape as errors: they
//! come back as failure events so the transition function decides what
//! happens next.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::effect::{Effect, LogLevel, Notice};
use super::event::Event;
use crate::api::{Answer, QuestionId, SessionId, SubmitOutcome};
use crate::client::Transport;

/// Context needed by the interpreter to execute effects.
#[derive(Clone)]
pub struct InterpreterContext {
    pub transport: Arc<dyn Transport>,
}

impl InterpreterContext {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

/// What a batch of effects produced.
#[derive(Debug, Default, PartialEq)]
pub struct EffectOutput {
    /// Result events to feed back into the state machine, in order.
    pub events: Vec<Event>,
    /// Messages for the user.
    pub notices: Vec<Notice>,
}

/// Execute a list of effects sequentially.
pub async fn execute_effects(ctx: &InterpreterContext, effects: Vec<Effect>) -> EffectOutput {
    let mut output = EffectOutput::default();

    for effect in effects {
        execute_effect(ctx, effect, &mut output).await;
    }

    output
}

/// Execute a single effect, appending whatever it produces to `output`.
async fn execute_effect(ctx: &InterpreterContext, effect: Effect, output: &mut EffectOutput) {
    match effect {
        Effect::StartSession => {
            let event = execute_start_session(ctx).await;
            output.events.push(event);
        }

        Effect::SubmitResponse {
            session_id,
            question_id,
            answer,
        } => {
            let event = execute_submit_response(ctx, &session_id, &question_id, &answer).await;
            output.events.push(event);
        }

        Effect::FetchResult { session_id, delay } => {
            if let Some(delay) = delay.filter(|d| !d.is_zero()) {
                debug!("Waiting {:?} before fetching result", delay);
                tokio::time::sleep(delay).await;
            }
            let event = execute_fetch_result(ctx, &session_id).await;
            output.events.push(event);
        }

        Effect::Notify { notice } => output.notices.push(notice),

        Effect::Log { level, message } => {
            match level {
                LogLevel::Debug => debug!("{}", message),
                LogLevel::Info => info!("{}", message),
                LogLevel::Warn => warn!("{}", message),
                LogLevel::Error => error!("{}", message),
            }
        }
    }
}

async fn execute_start_session(ctx: &InterpreterContext) -> Event {
    match ctx.transport.start_session().await {
        Ok(start) => {
            info!("Started session {}", start.session_id);
            Event::SessionStarted {
                session_id: start.session_id,
                question: start.question,
            }
        }
        Err(error) => Event::StartFailed { error },
    }
}

async fn execute_submit_response(
    ctx: &InterpreterContext,
    session_id: &SessionId,
    question_id: &QuestionId,
    answer: &Answer,
) -> Event {
    match ctx
        .transport
        .submit_response(session_id, question_id, answer)
        .await
    {
        Ok(SubmitOutcome::NextQuestion(question)) => Event::NextQuestionReceived { question },
        Ok(SubmitOutcome::Completed { session_id, reason }) => {
            Event::SessionCompleted { session_id, reason }
        }
        Err(error) => Event::SubmitFailed { error },
    }
}

async fn execute_fetch_result(ctx: &InterpreterContext, session_id: &SessionId) -> Event {
    match ctx.transport.fetch_result(session_id).await {
        Ok(result) => Event::ResultFetched { result },
        Err(error) => Event::ResultFetchFailed { error },
    }
}

//! Event loop owning the authoritative interview state.

use std::sync::Arc;

use tracing::info;

use super::effect::Notice;
use super::event::Event;
use super::interpreter::{execute_effects, InterpreterContext};
use super::state::InterviewState;
use super::transition::{transition_with_policy, TransitionResult};
use crate::api::{Answer, QuestionId};
use crate::client::Transport;
use crate::config::ResultRetryPolicy;

/// Drives one client's interview.
///
/// Every state change goes through [`InterviewDriver::process_event`], which
/// runs the transition function, executes the resulting effects and feeds
/// their result events back in until the machine settles.
pub struct InterviewDriver {
    state: InterviewState,
    policy: ResultRetryPolicy,
    ctx: InterpreterContext,
}

impl InterviewDriver {
    pub fn new(transport: Arc<dyn Transport>, policy: ResultRetryPolicy) -> Self {
        Self {
            state: InterviewState::default(),
            policy,
            ctx: InterpreterContext::new(transport),
        }
    }

    pub fn state(&self) -> &InterviewState {
        &self.state
    }

    /// Process an event and everything it triggers.
    ///
    /// Returns the notices raised along the way, oldest first.
    pub async fn process_event(&mut self, event: Event) -> Vec<Notice> {
        let mut notices = Vec::new();
        let mut events_to_process = vec![event];

        while let Some(event) = events_to_process.pop() {
            info!(
                "Processing event {} in state {}",
                event.log_summary(),
                self.state.name()
            );

            let current = std::mem::take(&mut self.state);
            let TransitionResult { state, effects } =
                transition_with_policy(current, event, &self.policy);
            self.state = state;

            if effects.is_empty() {
                continue;
            }

            let output = execute_effects(&self.ctx, effects).await;
            notices.extend(output.notices);

            // Reverse so result events are processed in order
            for result_event in output.events.into_iter().rev() {
                events_to_process.push(result_event);
            }
        }

        info!("Settled in state {}", self.state.name());
        notices
    }

    pub async fn start(&mut self) -> Vec<Notice> {
        self.process_event(Event::StartRequested).await
    }

    pub async fn submit_answer(
        &mut self,
        question_id: QuestionId,
        answer: impl Into<Answer>,
    ) -> Vec<Notice> {
        self.process_event(Event::AnswerSubmitted {
            question_id,
            answer: answer.into(),
        })
        .await
    }

    pub async fn retry_result(&mut self) -> Vec<Notice> {
        self.process_event(Event::RetryResultRequested).await
    }

    pub async fn reset(&mut self) -> Vec<Notice> {
        self.process_event(Event::ResetRequested).await
    }
}

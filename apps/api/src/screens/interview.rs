//! Mock interview: a scripted opening turn, then one blocking turn per answer.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::chat::prompts::{INTERVIEW_ERROR_REPLY, INTERVIEW_START_ERROR_REPLY};
use crate::chat::{ChatLog, ChatSession, SessionState};
use crate::errors::AppError;
use crate::llm_client::{LlmBackend, LlmError};
use crate::models::ChatMessage;

pub struct MockInterview {
    target_role: String,
    /// `None` while a turn (including the opening) is in flight.
    session: Option<ChatSession>,
    log: ChatLog,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewSnapshot {
    pub target_role: String,
    pub state: SessionState,
    pub messages: Vec<ChatMessage>,
    pub busy: bool,
    /// Answers are accepted once the opening question has resolved.
    pub accepting_answers: bool,
}

impl MockInterview {
    /// Creates the interview and returns the session for its opening turn.
    pub fn mount(llm: Arc<dyn LlmBackend>, target_role: &str) -> (Self, ChatSession) {
        let session = ChatSession::interviewer(llm, target_role);
        (
            Self {
                target_role: target_role.to_string(),
                session: None,
                log: ChatLog::new(),
            },
            session,
        )
    }

    pub fn is_busy(&self) -> bool {
        self.session.is_none()
    }

    pub fn apply_opening(&mut self, session: ChatSession, result: Result<String, LlmError>) {
        match result {
            Ok(question) => self.log.push_model(question),
            Err(e) => {
                warn!("Mock interview failed to start: {e}");
                self.log.push_model(INTERVIEW_START_ERROR_REPLY);
            }
        }
        self.session = Some(session);
    }

    pub fn begin_answer(&mut self, answer: &str) -> Result<ChatSession, AppError> {
        if answer.trim().is_empty() {
            return Err(AppError::Validation("answer cannot be empty".to_string()));
        }
        if self.log.is_empty() {
            return Err(AppError::Conflict("the interview has not started yet".to_string()));
        }
        let session = self
            .session
            .take()
            .ok_or_else(|| AppError::Conflict("the interviewer is still replying".to_string()))?;
        self.log.push_user(answer);
        Ok(session)
    }

    pub fn finish_answer(&mut self, session: ChatSession, result: Result<String, LlmError>) {
        match result {
            Ok(reply) => self.log.push_model(reply),
            Err(e) => {
                warn!("Mock interview turn failed: {e}");
                self.log.fail_reply(INTERVIEW_ERROR_REPLY);
            }
        }
        self.session = Some(session);
    }

    pub fn snapshot(&self) -> InterviewSnapshot {
        InterviewSnapshot {
            target_role: self.target_role.clone(),
            state: self
                .session
                .as_ref()
                .map_or(SessionState::AwaitingResponse, ChatSession::state),
            messages: self.log.messages().to_vec(),
            busy: self.is_busy(),
            accepting_answers: !self.is_busy() && !self.log.is_empty(),
        }
    }
}

//! Mentor chat: open-ended conversation whose replies stream into the log.

use std::sync::Arc;

use serde::Serialize;

use crate::chat::prompts::MENTOR_ERROR_REPLY;
use crate::chat::{ChatLog, ChatSession, SessionState};
use crate::errors::AppError;
use crate::llm_client::LlmBackend;
use crate::models::{ChatMessage, ChatRole};

pub struct MentorChat {
    /// `None` while a turn is in flight: the running turn owns the session.
    session: Option<ChatSession>,
    log: ChatLog,
}

#[derive(Debug, Clone, Serialize)]
pub struct MentorSnapshot {
    pub state: SessionState,
    pub messages: Vec<ChatMessage>,
    pub streaming: bool,
    pub busy: bool,
    /// Waiting for the first fragment of the reply.
    pub typing: bool,
}

impl MentorChat {
    /// A fresh mentor session with an empty log.
    pub fn new(llm: Arc<dyn LlmBackend>) -> Self {
        Self {
            session: Some(ChatSession::mentor(llm)),
            log: ChatLog::new(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.session.is_none()
    }

    /// Records the user's message and hands out the session for the turn.
    pub fn begin_turn(&mut self, message: &str) -> Result<ChatSession, AppError> {
        if message.trim().is_empty() {
            return Err(AppError::Validation("message cannot be empty".to_string()));
        }
        let session = self
            .session
            .take()
            .ok_or_else(|| AppError::Conflict("the mentor is still replying".to_string()))?;
        self.log.push_user(message);
        Ok(session)
    }

    /// Publishes the reply text received so far.
    pub fn apply_fragment(&mut self, text: &str) {
        self.log.update_reply(text);
    }

    /// Gives the session back. A failed turn ends with an apology in the log.
    pub fn finish_turn(&mut self, session: ChatSession, succeeded: bool) {
        if succeeded {
            self.log.finish_reply();
        } else {
            self.log.fail_reply(MENTOR_ERROR_REPLY);
        }
        self.session = Some(session);
    }

    pub fn snapshot(&self) -> MentorSnapshot {
        let busy = self.is_busy();
        let state = match &self.session {
            Some(session) => session.state(),
            None if self.log.is_streaming() => SessionState::Streaming,
            None => SessionState::AwaitingResponse,
        };
        MentorSnapshot {
            state,
            messages: self.log.messages().to_vec(),
            streaming: self.log.is_streaming(),
            busy,
            typing: busy && self.log.last().is_some_and(|m| m.role == ChatRole::User),
        }
    }
}

//! Chat session: one persona-scoped conversation with the model.
//!
//! The persona is fixed at creation. A turn is committed to the history only
//! once it completes, so a failed turn leaves the session usable.
//!
//! `send` and `send_stream` take `&mut self`: a session can have at most one
//! outstanding turn. Controllers additionally take the session out of their
//! state while a turn runs, which is how a second submit gets rejected.

use std::sync::Arc;

use futures::StreamExt;
use serde::Serialize;
use tracing::debug;

use crate::chat::prompts::{interviewer_persona, MENTOR_PERSONA};
use crate::llm_client::{LlmBackend, LlmError, TextStream};
use crate::models::ChatMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    AwaitingResponse,
    Streaming,
}

pub struct ChatSession {
    llm: Arc<dyn LlmBackend>,
    persona: String,
    history: Vec<ChatMessage>,
    state: SessionState,
}

impl ChatSession {
    pub fn new(llm: Arc<dyn LlmBackend>, persona: impl Into<String>) -> Self {
        Self {
            llm,
            persona: persona.into(),
            history: Vec::new(),
            state: SessionState::Idle,
        }
    }

    pub fn mentor(llm: Arc<dyn LlmBackend>) -> Self {
        Self::new(llm, MENTOR_PERSONA)
    }

    pub fn interviewer(llm: Arc<dyn LlmBackend>, target_role: &str) -> Self {
        Self::new(llm, interviewer_persona(target_role))
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Sends one utterance and waits for the whole reply.
    pub async fn send(&mut self, message: &str) -> Result<String, LlmError> {
        self.state = SessionState::AwaitingResponse;
        let result = self
            .llm
            .converse(&self.persona, &self.history, message)
            .await;
        self.state = SessionState::Idle;

        let reply = result?;
        self.commit(message, &reply);
        Ok(reply)
    }

    /// Sends one utterance and returns a handle yielding the reply in fragments.
    pub async fn send_stream(&mut self, message: &str) -> Result<StreamingReply<'_>, LlmError> {
        self.state = SessionState::Streaming;
        let stream = match self
            .llm
            .converse_stream(&self.persona, &self.history, message)
            .await
        {
            Ok(stream) => stream,
            Err(e) => {
                self.state = SessionState::Idle;
                return Err(e);
            }
        };

        Ok(StreamingReply {
            session: self,
            stream,
            message: message.to_string(),
            text: String::new(),
            finished: false,
        })
    }

    fn commit(&mut self, message: &str, reply: &str) {
        self.history.push(ChatMessage::user(message));
        self.history.push(ChatMessage::model(reply));
        debug!("Chat turn committed, history length {}", self.history.len());
    }
}

/// A reply arriving in fragments. The turn is committed to the session when
/// the stream ends cleanly; dropping the handle early abandons the turn.
pub struct StreamingReply<'a> {
    session: &'a mut ChatSession,
    stream: TextStream,
    message: String,
    text: String,
    finished: bool,
}

impl StreamingReply<'_> {
    /// Next fragment in arrival order, or `None` once the reply is complete.
    /// After an error the reply is finished and the turn is not committed.
    /// A stream that ends without any text is reported as `EmptyContent`.
    pub async fn next_fragment(&mut self) -> Option<Result<String, LlmError>> {
        if self.finished {
            return None;
        }

        match self.stream.next().await {
            Some(Ok(fragment)) => {
                self.text.push_str(&fragment);
                Some(Ok(fragment))
            }
            Some(Err(e)) => {
                self.finished = true;
                self.session.state = SessionState::Idle;
                Some(Err(e))
            }
            None => {
                self.finished = true;
                self.session.state = SessionState::Idle;
                if self.text.is_empty() {
                    return Some(Err(LlmError::EmptyContent));
                }
                self.session.commit(&self.message, &self.text);
                None
            }
        }
    }

    /// Everything received so far, concatenated in arrival order.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Drop for StreamingReply<'_> {
    fn drop(&mut self) {
        self.session.state = SessionState::Idle;
    }
}

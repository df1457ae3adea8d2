//! The visible message log of one chat screen.
//!
//! Append-only, except for the reply under construction: at most one model
//! message is being streamed at any time, and it is always the last entry.

use serde::Serialize;

use crate::models::{ChatMessage, ChatRole};

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
    /// True while the last message is a model reply still receiving text.
    streaming: bool,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.finish_reply();
        self.messages.push(ChatMessage::user(text));
    }

    pub fn push_model(&mut self, text: impl Into<String>) {
        self.finish_reply();
        self.messages.push(ChatMessage::model(text));
    }

    /// Opens an empty model reply. No-op if one is already open.
    pub fn begin_reply(&mut self) {
        if self.streaming {
            return;
        }
        self.messages.push(ChatMessage::model(""));
        self.streaming = true;
    }

    /// Replaces the text of the open reply, opening one first if needed.
    pub fn update_reply(&mut self, text: &str) {
        self.begin_reply();
        if let Some(last) = self.messages.last_mut() {
            last.text.clear();
            last.text.push_str(text);
        }
    }

    pub fn finish_reply(&mut self) {
        self.streaming = false;
    }

    /// Ends the current turn with an apology. An open reply is closed first:
    /// kept if text already arrived, removed if it is still empty.
    pub fn fail_reply(&mut self, apology: &str) {
        if self.streaming {
            self.streaming = false;
            let empty_reply = self
                .messages
                .last()
                .is_some_and(|m| m.role == ChatRole::Model && m.text.is_empty());
            if empty_reply {
                self.messages.pop();
            }
        }
        self.messages.push(ChatMessage::model(apology));
    }
}

//! Scripted in-memory `LlmBackend` for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use tokio::sync::Notify;

use super::{LlmBackend, LlmError, TextStream};
use crate::models::ChatMessage;

/// A recorded conversational call.
#[derive(Debug, Clone)]
pub struct RecordedTurn {
    pub system: String,
    pub history: Vec<ChatMessage>,
    pub message: String,
}

/// How a scripted streaming call behaves.
pub enum StreamScript {
    /// The call itself fails before any fragment arrives.
    Refuse,
    /// Fragments in order; `fail_after` ends the stream with an error.
    Fragments {
        fragments: Vec<String>,
        fail_after: bool,
    },
}

#[derive(Default)]
pub struct FakeLlm {
    text: Mutex<VecDeque<Option<String>>>,
    json: Mutex<VecDeque<Option<String>>>,
    turns: Mutex<VecDeque<Option<String>>>,
    streams: Mutex<VecDeque<StreamScript>>,
    recorded: Mutex<Vec<RecordedTurn>>,
    gate: Mutex<Option<Arc<Notify>>>,
    text_calls: AtomicUsize,
    json_calls: AtomicUsize,
}

fn api_error() -> LlmError {
    LlmError::Api {
        status: 503,
        message: "scripted failure".to_string(),
    }
}

fn next(queue: &Mutex<VecDeque<Option<String>>>) -> Result<String, LlmError> {
    match queue.lock().unwrap().pop_front() {
        Some(Some(text)) => Ok(text),
        Some(None) => Err(api_error()),
        None => Err(LlmError::EmptyContent),
    }
}

impl FakeLlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_text(&self, text: impl Into<String>) -> &Self {
        self.text.lock().unwrap().push_back(Some(text.into()));
        self
    }

    pub fn fail_text(&self) -> &Self {
        self.text.lock().unwrap().push_back(None);
        self
    }

    pub fn push_json(&self, text: impl Into<String>) -> &Self {
        self.json.lock().unwrap().push_back(Some(text.into()));
        self
    }

    pub fn fail_json(&self) -> &Self {
        self.json.lock().unwrap().push_back(None);
        self
    }

    pub fn push_turn(&self, text: impl Into<String>) -> &Self {
        self.turns.lock().unwrap().push_back(Some(text.into()));
        self
    }

    pub fn fail_turn(&self) -> &Self {
        self.turns.lock().unwrap().push_back(None);
        self
    }

    pub fn push_stream(&self, fragments: &[&str]) -> &Self {
        self.streams.lock().unwrap().push_back(StreamScript::Fragments {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            fail_after: false,
        });
        self
    }

    pub fn push_broken_stream(&self, fragments: &[&str]) -> &Self {
        self.streams.lock().unwrap().push_back(StreamScript::Fragments {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            fail_after: true,
        });
        self
    }

    pub fn refuse_stream(&self) -> &Self {
        self.streams.lock().unwrap().push_back(StreamScript::Refuse);
        self
    }

    /// Holds the next text or turn call until the returned handle is notified.
    pub fn hold_next_call(&self) -> Arc<Notify> {
        let release = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(release.clone());
        release
    }

    async fn wait_if_held(&self) {
        let gate = self.gate.lock().unwrap().take();
        if let Some(release) = gate {
            release.notified().await;
        }
    }

    pub fn text_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }

    pub fn json_calls(&self) -> usize {
        self.json_calls.load(Ordering::SeqCst)
    }

    pub fn recorded(&self) -> Vec<RecordedTurn> {
        self.recorded.lock().unwrap().clone()
    }

    fn record(&self, system: &str, history: &[ChatMessage], message: &str) {
        self.recorded.lock().unwrap().push(RecordedTurn {
            system: system.to_string(),
            history: history.to_vec(),
            message: message.to_string(),
        });
    }
}

#[async_trait]
impl LlmBackend for FakeLlm {
    async fn generate_text(&self, _prompt: &str) -> Result<String, LlmError> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_if_held().await;
        next(&self.text)
    }

    async fn generate_json(&self, _prompt: &str, _schema: &Value) -> Result<String, LlmError> {
        self.json_calls.fetch_add(1, Ordering::SeqCst);
        next(&self.json)
    }

    async fn converse(
        &self,
        system: &str,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, LlmError> {
        self.record(system, history, message);
        self.wait_if_held().await;
        next(&self.turns)
    }

    async fn converse_stream(
        &self,
        system: &str,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<TextStream, LlmError> {
        self.record(system, history, message);
        let script = self.streams.lock().unwrap().pop_front();
        match script {
            Some(StreamScript::Fragments {
                fragments,
                fail_after,
            }) => {
                let mut items: Vec<Result<String, LlmError>> =
                    fragments.into_iter().map(Ok).collect();
                if fail_after {
                    items.push(Err(api_error()));
                }
                Ok(stream::iter(items).boxed())
            }
            Some(StreamScript::Refuse) => Err(api_error()),
            None => Err(LlmError::EmptyContent),
        }
    }
}

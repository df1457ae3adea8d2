use std::sync::Arc;

use tokio::sync::Mutex;

use crate::llm_client::LlmBackend;
use crate::shell::AppShell;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The guidance session. Critical sections are short; never held across an LLM call.
    pub shell: Arc<Mutex<AppShell>>,
    pub llm: Arc<dyn LlmBackend>,
}

impl AppState {
    pub fn new(llm: Arc<dyn LlmBackend>) -> Self {
        Self {
            shell: Arc::new(Mutex::new(AppShell::new(llm.clone()))),
            llm,
        }
    }
}

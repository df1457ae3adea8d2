// Multi-turn conversations: persona-scoped sessions and the visible chat log.
// No direct provider calls here; all LLM calls go through llm_client.

pub mod prompts;
pub mod session;
pub mod transcript;

pub use session::{ChatSession, SessionState};
pub use transcript::ChatLog;

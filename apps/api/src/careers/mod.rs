// Career suggestions: prompt, delimited-text parser, and the service call.
// No direct provider calls here; all LLM calls go through llm_client.

pub mod parser;
pub mod prompts;
pub mod suggestions;

pub use suggestions::suggest_careers;

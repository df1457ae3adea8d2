// Resume feedback and the markdown subset used to display model feedback.
// No direct provider calls here; all LLM calls go through llm_client.

pub mod feedback;
pub mod markdown;
pub mod prompts;

pub use feedback::get_resume_feedback;
pub use markdown::render_markdown;

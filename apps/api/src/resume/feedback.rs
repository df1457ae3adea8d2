use tracing::error;

use crate::llm_client::prompts::fill_template;
use crate::llm_client::{LlmBackend, LlmError};
use crate::resume::prompts::RESUME_FEEDBACK_PROMPT_TEMPLATE;

/// Asks the model to review `resume_text`. Returns the raw markdown feedback.
pub async fn get_resume_feedback(
    llm: &dyn LlmBackend,
    resume_text: &str,
) -> Result<String, LlmError> {
    let prompt = fill_template(RESUME_FEEDBACK_PROMPT_TEMPLATE, &[("resume_text", resume_text)]);
    llm.generate_text(&prompt).await.map_err(|e| {
        error!("Error getting resume feedback: {e}");
        e
    })
}

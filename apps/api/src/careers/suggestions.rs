use tracing::{error, info};

use crate::careers::parser::parse_career_suggestions;
use crate::careers::prompts::SUGGESTION_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{fill_template, profile_json};
use crate::llm_client::LlmBackend;
use crate::models::{CareerSuggestion, Profile};

/// Asks the model for career paths that fit `profile`.
///
/// Never fails: a backend error is logged and reported as "no suggestions",
/// the same as an answer the parser cannot use.
pub async fn suggest_careers(llm: &dyn LlmBackend, profile: &Profile) -> Vec<CareerSuggestion> {
    let prompt = fill_template(
        SUGGESTION_PROMPT_TEMPLATE,
        &[("profile_json", &profile_json(profile))],
    );

    match llm.generate_text(&prompt).await {
        Ok(text) => {
            let suggestions = parse_career_suggestions(&text);
            info!("Parsed {} career suggestions", suggestions.len());
            suggestions
        }
        Err(e) => {
            error!("Error generating career suggestions: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::fake::FakeLlm;

    #[tokio::test]
    async fn test_backend_failure_degrades_to_empty_list() {
        let llm = FakeLlm::new();
        llm.fail_text();
        let suggestions = suggest_careers(&llm, &Profile::default()).await;
        assert!(suggestions.is_empty());
        assert_eq!(llm.text_calls(), 1);
    }

    #[tokio::test]
    async fn test_parses_model_answer() {
        let llm = FakeLlm::new();
        llm.push_text(
            "###\n**Career:** Data Analyst\n**Description:** Analyzes data.\n**Key Skills:** SQL, Python\n###",
        );
        let suggestions = suggest_careers(&llm, &Profile::default()).await;
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].skills, vec!["SQL", "Python"]);
    }
}

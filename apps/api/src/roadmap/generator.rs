use tracing::{error, info};

use crate::llm_client::prompts::{fill_template, profile_json};
use crate::llm_client::LlmBackend;
use crate::models::{Milestone, Profile, Roadmap};
use crate::roadmap::decoder::decode_milestones;
use crate::roadmap::prompts::{milestone_schema, ROADMAP_PROMPT_TEMPLATE};
use crate::roadmap::RoadmapError;

/// Generates a fresh roadmap for `target_role`. Each milestone starts as `todo`.
pub async fn generate_roadmap(
    llm: &dyn LlmBackend,
    profile: &Profile,
    target_role: &str,
) -> Result<Roadmap, RoadmapError> {
    let prompt = fill_template(
        ROADMAP_PROMPT_TEMPLATE,
        &[
            ("target_role", target_role),
            ("profile_json", &profile_json(profile)),
        ],
    );

    match request_milestones(llm, &prompt).await {
        Ok(milestones) => {
            info!(
                "Generated roadmap for '{}' with {} milestones",
                target_role,
                milestones.len()
            );
            Ok(Roadmap::new(target_role, milestones))
        }
        Err(e) => {
            error!("Error generating learning roadmap: {e}");
            Err(e)
        }
    }
}

async fn request_milestones(
    llm: &dyn LlmBackend,
    prompt: &str,
) -> Result<Vec<Milestone>, RoadmapError> {
    let text = llm.generate_json(prompt, &milestone_schema()).await?;
    decode_milestones(&text)
}

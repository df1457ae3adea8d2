use serde_json::{json, Value};

use crate::models::MilestoneKind;

/// Roadmap prompt template. Replace `{target_role}` and `{profile_json}` before sending.
pub const ROADMAP_PROMPT_TEMPLATE: &str = r#"A student with the profile below wants to become a {target_role}.
Create a detailed, personalized learning roadmap with 5-7 milestones.
For each milestone, provide a title, type (course, project, certification, or task), a brief description, and one relevant online resource URL.

Profile: {profile_json}"#;

/// Response schema for roadmap generation: an array of milestone objects,
/// all four fields required and `type` limited to the milestone kinds.
pub fn milestone_schema() -> Value {
    let kinds: Vec<&str> = MilestoneKind::ALL.iter().map(|k| k.as_str()).collect();
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "type": { "type": "STRING", "enum": kinds },
                "description": { "type": "STRING" },
                "resources": { "type": "ARRAY", "items": { "type": "STRING" } }
            },
            "required": ["title", "type", "description", "resources"]
        }
    })
}

//! Roadmap decoder: maps the schema-constrained JSON answer onto milestones.
//!
//! The provider already enforced the schema, so this is structural mapping only.
//! Every decoded milestone starts as `todo` regardless of what the input says.

use serde::Deserialize;

use crate::llm_client::strip_json_fences;
use crate::models::{Milestone, MilestoneKind, MilestoneStatus};
use crate::roadmap::RoadmapError;

#[derive(Debug, Deserialize)]
struct MilestoneRecord {
    title: String,
    #[serde(rename = "type")]
    kind: MilestoneKind,
    description: String,
    resources: Vec<String>,
}

impl From<MilestoneRecord> for Milestone {
    fn from(record: MilestoneRecord) -> Self {
        Milestone {
            title: record.title,
            kind: record.kind,
            description: record.description,
            resources: record.resources,
            status: MilestoneStatus::Todo,
        }
    }
}

/// Decodes a JSON array of milestone records. Any malformed record fails the whole decode.
pub fn decode_milestones(text: &str) -> Result<Vec<Milestone>, RoadmapError> {
    let records: Vec<MilestoneRecord> = serde_json::from_str(strip_json_fences(text))?;
    Ok(records.into_iter().map(Milestone::from).collect())
}

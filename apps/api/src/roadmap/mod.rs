// Learning roadmaps: schema-constrained generation and milestone decoding.
// No direct provider calls here; all LLM calls go through llm_client.

pub mod decoder;
pub mod generator;
pub mod prompts;

use thiserror::Error;

pub use generator::generate_roadmap;

/// A roadmap could not be produced. Never degraded to a partial roadmap.
#[derive(Debug, Error)]
pub enum RoadmapError {
    #[error("roadmap generation failed: {0}")]
    Generation(#[from] crate::llm_client::LlmError),

    #[error("roadmap generation failed: malformed milestones: {0}")]
    Decode(#[from] serde_json::Error),
}

//! Dashboard: career suggestions fetched on every mount, plus derived stats.

use serde::Serialize;

use crate::models::{CareerSuggestion, Profile, Roadmap, Skill};
use crate::scoring::readiness_score;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SuggestionsState {
    Loading,
    /// An empty list is the "no suggestions" state, not an error.
    Ready { suggestions: Vec<CareerSuggestion> },
}

#[derive(Debug, Clone)]
pub struct DashboardView {
    suggestions: SuggestionsState,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub suggestions: SuggestionsState,
    pub readiness_score: u32,
    pub roadmap_target_role: Option<String>,
    pub completed_milestones: usize,
    pub total_milestones: usize,
    pub skills: Vec<Skill>,
}

impl DashboardView {
    /// A freshly mounted dashboard waiting for suggestions.
    pub fn loading() -> Self {
        Self {
            suggestions: SuggestionsState::Loading,
        }
    }

    pub fn apply_suggestions(&mut self, suggestions: Vec<CareerSuggestion>) {
        self.suggestions = SuggestionsState::Ready { suggestions };
    }

    pub fn snapshot(&self, profile: &Profile, roadmap: Option<&Roadmap>) -> DashboardSnapshot {
        DashboardSnapshot {
            suggestions: self.suggestions.clone(),
            readiness_score: readiness_score(profile, roadmap),
            roadmap_target_role: roadmap.map(|r| r.target_role.clone()),
            completed_milestones: roadmap.map(Roadmap::completed_count).unwrap_or(0),
            total_milestones: roadmap.map(|r| r.milestones.len()).unwrap_or(0),
            skills: profile.skills.clone(),
        }
    }
}

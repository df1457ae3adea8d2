//! Roadmap screen: reuses the cached roadmap when it targets the requested
//! role, otherwise requests a new one. Milestone toggling happens here.

use serde::Serialize;

use crate::errors::AppError;
use crate::models::{Milestone, MilestoneStatus, Roadmap};
use crate::roadmap::RoadmapError;

pub const ROADMAP_ERROR_MESSAGE: &str =
    "Failed to generate your learning roadmap. Please try again.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RoadmapPhase {
    Loading,
    Ready,
    Failed { error: String },
}

#[derive(Debug, Clone)]
pub struct RoadmapView {
    target_role: String,
    phase: RoadmapPhase,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoadmapSnapshot {
    pub target_role: String,
    #[serde(flatten)]
    pub phase: RoadmapPhase,
    pub milestones: Vec<Milestone>,
    pub completed_milestones: usize,
    pub progress: f64,
}

/// A cached roadmap is reused only for the exact role it was generated for.
pub fn needs_generation(cached: Option<&Roadmap>, target_role: &str) -> bool {
    !cached.is_some_and(|r| r.targets(target_role))
}

impl RoadmapView {
    /// Mounts the screen for `target_role`. The flag says whether a new
    /// roadmap must be generated.
    pub fn mount(target_role: &str, cached: Option<&Roadmap>) -> (Self, bool) {
        let generate = needs_generation(cached, target_role);
        let phase = if generate {
            RoadmapPhase::Loading
        } else {
            RoadmapPhase::Ready
        };
        (
            Self {
                target_role: target_role.to_string(),
                phase,
            },
            generate,
        )
    }

    /// Stores a generated roadmap in `cache`, replacing whatever was there.
    pub fn apply_result(&mut self, result: Result<Roadmap, RoadmapError>, cache: &mut Option<Roadmap>) {
        match result {
            Ok(roadmap) => {
                *cache = Some(roadmap);
                self.phase = RoadmapPhase::Ready;
            }
            Err(_) => {
                self.phase = RoadmapPhase::Failed {
                    error: ROADMAP_ERROR_MESSAGE.to_string(),
                };
            }
        }
    }

    pub fn toggle(&self, index: usize, cache: &mut Option<Roadmap>) -> Result<MilestoneStatus, AppError> {
        if self.phase != RoadmapPhase::Ready {
            return Err(AppError::Conflict("roadmap is not ready".to_string()));
        }
        let roadmap = cache
            .as_mut()
            .filter(|r| r.targets(&self.target_role))
            .ok_or_else(|| AppError::Conflict("roadmap is not ready".to_string()))?;
        roadmap
            .toggle(index)
            .ok_or_else(|| AppError::NotFound(format!("Milestone {index} not found")))
    }

    pub fn snapshot(&self, cache: Option<&Roadmap>) -> RoadmapSnapshot {
        let roadmap = cache.filter(|r| self.phase == RoadmapPhase::Ready && r.targets(&self.target_role));
        RoadmapSnapshot {
            target_role: self.target_role.clone(),
            phase: self.phase.clone(),
            milestones: roadmap.map(|r| r.milestones.clone()).unwrap_or_default(),
            completed_milestones: roadmap.map(Roadmap::completed_count).unwrap_or(0),
            progress: roadmap.map(Roadmap::progress).unwrap_or(0.0),
        }
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneKind {
    Course,
    Project,
    Certification,
    Task,
}

impl MilestoneKind {
    pub const ALL: [MilestoneKind; 4] = [
        MilestoneKind::Course,
        MilestoneKind::Project,
        MilestoneKind::Certification,
        MilestoneKind::Task,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneKind::Course => "course",
            MilestoneKind::Project => "project",
            MilestoneKind::Certification => "certification",
            MilestoneKind::Task => "task",
        }
    }
}

/// Lifecycle of a milestone. `InProgress` is accepted and preserved but no
/// operation produces it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: MilestoneKind,
    pub description: String,
    pub resources: Vec<String>,
    pub status: MilestoneStatus,
}

impl Milestone {
    pub fn is_done(&self) -> bool {
        self.status == MilestoneStatus::Done
    }

    /// Flips between `Done` and `Todo`. Any status other than `Done` becomes `Done`.
    pub fn toggle(&mut self) -> MilestoneStatus {
        self.status = match self.status {
            MilestoneStatus::Done => MilestoneStatus::Todo,
            MilestoneStatus::Todo | MilestoneStatus::InProgress => MilestoneStatus::Done,
        };
        self.status
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roadmap {
    pub target_role: String,
    pub milestones: Vec<Milestone>,
}

impl Roadmap {
    pub fn new(target_role: impl Into<String>, milestones: Vec<Milestone>) -> Self {
        Self {
            target_role: target_role.into(),
            milestones,
        }
    }

    /// True when this roadmap can be reused for `target_role`.
    pub fn targets(&self, target_role: &str) -> bool {
        self.target_role == target_role
    }

    pub fn completed_count(&self) -> usize {
        self.milestones.iter().filter(|m| m.is_done()).count()
    }

    /// Completed milestones as a percentage of all milestones, 0 when empty.
    pub fn progress(&self) -> f64 {
        if self.milestones.is_empty() {
            return 0.0;
        }
        self.completed_count() as f64 / self.milestones.len() as f64 * 100.0
    }

    /// Toggles milestone `index`, returning its new status, or `None` if out of range.
    pub fn toggle(&mut self, index: usize) -> Option<MilestoneStatus> {
        self.milestones.get_mut(index).map(Milestone::toggle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn milestone(status: MilestoneStatus) -> Milestone {
        Milestone {
            title: "Learn SQL".to_string(),
            kind: MilestoneKind::Course,
            description: "Joins and window functions".to_string(),
            resources: vec!["https://example.com/sql".to_string()],
            status,
        }
    }

    #[test]
    fn test_toggle_twice_restores_status() {
        for start in [MilestoneStatus::Todo, MilestoneStatus::Done] {
            let mut m = milestone(start);
            m.toggle();
            assert_ne!(m.status, start);
            m.toggle();
            assert_eq!(m.status, start);
        }
    }

    #[test]
    fn test_toggle_in_progress_goes_to_done() {
        let mut m = milestone(MilestoneStatus::InProgress);
        assert_eq!(m.toggle(), MilestoneStatus::Done);
    }

    #[test]
    fn test_progress_is_derived_from_statuses() {
        let mut roadmap = Roadmap::new(
            "Data Analyst",
            vec![
                milestone(MilestoneStatus::Todo),
                milestone(MilestoneStatus::Todo),
                milestone(MilestoneStatus::Todo),
                milestone(MilestoneStatus::Todo),
            ],
        );
        assert_eq!(roadmap.progress(), 0.0);
        roadmap.toggle(0);
        assert_eq!(roadmap.completed_count(), 1);
        assert!((roadmap.progress() - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_progress_of_empty_roadmap_is_zero() {
        assert_eq!(Roadmap::new("X", vec![]).progress(), 0.0);
    }

    #[test]
    fn test_toggle_out_of_range_is_none() {
        let mut roadmap = Roadmap::new("X", vec![milestone(MilestoneStatus::Todo)]);
        assert_eq!(roadmap.toggle(3), None);
        assert_eq!(roadmap.toggle(0), Some(MilestoneStatus::Done));
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&MilestoneStatus::InProgress).unwrap();
        assert_eq!(json, r#""in_progress""#);
        let kind: MilestoneKind = serde_json::from_str(r#""certification""#).unwrap();
        assert_eq!(kind, MilestoneKind::Certification);
    }
}

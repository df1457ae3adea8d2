use crate::models::{Profile, Roadmap};

/// Career readiness as a whole percentage.
///
/// Mean of the average skill proficiency and the roadmap completion
/// percentage. Either half counts as 0 when missing (no skills, no roadmap,
/// or a roadmap without milestones).
pub fn readiness_score(profile: &Profile, roadmap: Option<&Roadmap>) -> u32 {
    let proficiency = profile.average_proficiency();
    let completion = roadmap.map(Roadmap::progress).unwrap_or(0.0);
    ((proficiency + completion) / 2.0).round() as u32
}

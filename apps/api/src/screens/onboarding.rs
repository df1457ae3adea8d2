//! Onboarding form: the only writer of the profile.

use serde::Serialize;

use crate::errors::AppError;
use crate::models::profile::split_list;
use crate::models::{Profile, Skill};

/// Proficiency given to a newly added skill.
pub const DEFAULT_PROFICIENCY: i64 = 50;

/// Pre-filled example student shown when onboarding starts.
pub fn sample_profile() -> Profile {
    Profile {
        name: "Aisha Sharma".to_string(),
        education: "B.Sc. Computer Science".to_string(),
        major: "Computer Science".to_string(),
        interests: vec!["Data Science".to_string(), "Machine Learning".to_string()],
        target_roles: vec![
            "Data Analyst".to_string(),
            "Machine Learning Engineer".to_string(),
        ],
        skills: vec![
            Skill::new("Python", 60),
            Skill::new("Statistics", 40),
            Skill::new("SQL", 50),
            Skill::new("React", 30),
        ],
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OnboardingForm {
    draft: Profile,
}

impl OnboardingForm {
    pub fn new(initial: Profile) -> Self {
        Self { draft: initial }
    }

    pub fn draft(&self) -> &Profile {
        &self.draft
    }

    pub fn set_name(&mut self, value: &str) {
        self.draft.name = value.to_string();
    }

    pub fn set_education(&mut self, value: &str) {
        self.draft.education = value.to_string();
    }

    pub fn set_major(&mut self, value: &str) {
        self.draft.major = value.to_string();
    }

    /// Comma-separated interests.
    pub fn set_interests(&mut self, text: &str) {
        self.draft.interests = split_list(text);
    }

    /// Comma-separated target roles.
    pub fn set_target_roles(&mut self, text: &str) {
        self.draft.target_roles = split_list(text);
    }

    /// Appends a skill at the default proficiency. Returns its index.
    pub fn add_skill(&mut self, name: &str) -> Result<usize, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("skill name cannot be empty".to_string()));
        }
        if self.draft.has_skill(name) {
            return Err(AppError::Validation(format!("skill '{name}' already added")));
        }
        self.draft.skills.push(Skill::new(name, DEFAULT_PROFICIENCY));
        Ok(self.draft.skills.len() - 1)
    }

    pub fn rename_skill(&mut self, index: usize, name: &str) -> Result<(), AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("skill name cannot be empty".to_string()));
        }
        if matches!(self.draft.skill_index(name), Some(other) if other != index) {
            return Err(AppError::Validation(format!("skill '{name}' already added")));
        }
        self.skill_mut(index)?.set_name(name);
        Ok(())
    }

    /// Returns the stored (clamped) proficiency.
    pub fn set_skill_proficiency(&mut self, index: usize, value: i64) -> Result<u8, AppError> {
        let skill = self.skill_mut(index)?;
        skill.set_proficiency(value);
        Ok(skill.proficiency())
    }

    pub fn remove_skill(&mut self, index: usize) -> Result<Skill, AppError> {
        if index >= self.draft.skills.len() {
            return Err(skill_not_found(index));
        }
        Ok(self.draft.skills.remove(index))
    }

    pub fn submit(&self) -> Profile {
        self.draft.clone()
    }

    fn skill_mut(&mut self, index: usize) -> Result<&mut Skill, AppError> {
        self.draft
            .skills
            .get_mut(index)
            .ok_or_else(|| skill_not_found(index))
    }
}

fn skill_not_found(index: usize) -> AppError {
    AppError::NotFound(format!("Skill {index} not found"))
}

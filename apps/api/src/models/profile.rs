use serde::{Deserialize, Deserializer, Serialize};

pub const MIN_PROFICIENCY: u8 = 0;
pub const MAX_PROFICIENCY: u8 = 100;

/// A self-reported skill. Proficiency is a percentage in `0..=100`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    name: String,
    #[serde(deserialize_with = "deserialize_proficiency")]
    proficiency: u8,
}

impl Skill {
    pub fn new(name: impl Into<String>, proficiency: i64) -> Self {
        Self {
            name: name.into(),
            proficiency: clamp_proficiency(proficiency),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn proficiency(&self) -> u8 {
        self.proficiency
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Writes the proficiency, clamped to `0..=100`.
    pub fn set_proficiency(&mut self, value: i64) {
        self.proficiency = clamp_proficiency(value);
    }
}

fn clamp_proficiency(value: i64) -> u8 {
    value.clamp(MIN_PROFICIENCY as i64, MAX_PROFICIENCY as i64) as u8
}

fn deserialize_proficiency<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let raw = f64::deserialize(deserializer)?;
    Ok(clamp_proficiency(raw.round() as i64))
}

/// The student's background. Built by the onboarding form and read-only afterwards.
///
/// Skill names are unique case-insensitively; the onboarding form is the only
/// writer and enforces it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub education: String,
    pub major: String,
    pub interests: Vec<String>,
    pub target_roles: Vec<String>,
    pub skills: Vec<Skill>,
}

impl Profile {
    pub fn has_skill(&self, name: &str) -> bool {
        self.skill_index(name).is_some()
    }

    /// Position of the skill whose name matches `name` ignoring case.
    pub fn skill_index(&self, name: &str) -> Option<usize> {
        let needle = name.trim().to_lowercase();
        self.skills
            .iter()
            .position(|s| s.name().trim().to_lowercase() == needle)
    }

    /// Mean proficiency across all skills, 0 when there are none.
    pub fn average_proficiency(&self) -> f64 {
        if self.skills.is_empty() {
            return 0.0;
        }
        let total: u32 = self.skills.iter().map(|s| s.proficiency() as u32).sum();
        total as f64 / self.skills.len() as f64
    }

    pub fn primary_target_role(&self) -> Option<&str> {
        self.target_roles
            .iter()
            .map(|r| r.trim())
            .find(|r| !r.is_empty())
    }
}

/// Splits comma-separated form input into trimmed, non-empty items.
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

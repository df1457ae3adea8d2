use serde::{Deserialize, Serialize};

/// One career path proposed by the model for the current profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerSuggestion {
    pub name: String,
    pub description: String,
    pub skills: Vec<String>,
}

//! Career suggestion parser: turns the model's `###`-delimited answer into
//! typed suggestions.
//!
//! Malformed model output is expected. Blocks missing any of the three labelled
//! lines are dropped, and the parser never fails: the worst case is an empty list.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::careers::prompts::SUGGESTION_DELIMITER;
use crate::models::CareerSuggestion;

struct FieldPatterns {
    name: Regex,
    description: Regex,
    skills: Regex,
}

fn field_patterns() -> Option<&'static FieldPatterns> {
    static PATTERNS: OnceLock<Option<FieldPatterns>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            let build = || -> Result<FieldPatterns, regex::Error> {
                Ok(FieldPatterns {
                    name: Regex::new(r"\*\*Career:\*\*\s*(.*)")?,
                    description: Regex::new(r"\*\*Description:\*\*\s*(.*)")?,
                    skills: Regex::new(r"\*\*Key Skills:\*\*\s*(.*)")?,
                })
            };
            build()
                .map_err(|e| warn!("Career suggestion patterns failed to compile: {e}"))
                .ok()
        })
        .as_ref()
}

/// Extracts every well-formed suggestion block from `text`.
pub fn parse_career_suggestions(text: &str) -> Vec<CareerSuggestion> {
    let Some(patterns) = field_patterns() else {
        warn!("Career suggestion parsing unavailable, returning no suggestions");
        return Vec::new();
    };

    let mut suggestions = Vec::new();
    for block in text
        .split(SUGGESTION_DELIMITER)
        .filter(|b| !b.trim().is_empty())
    {
        match parse_block(patterns, block) {
            Some(suggestion) => suggestions.push(suggestion),
            None => debug!("Dropping incomplete career suggestion block: {:?}", block.trim()),
        }
    }
    suggestions
}

fn parse_block(patterns: &FieldPatterns, block: &str) -> Option<CareerSuggestion> {
    let capture = |re: &Regex| -> Option<String> {
        re.captures(block)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
    };

    let name = capture(&patterns.name)?;
    let description = capture(&patterns.description)?;
    let skills_line = capture(&patterns.skills)?;

    let skills = skills_line
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    Some(CareerSuggestion {
        name,
        description,
        skills,
    })
}

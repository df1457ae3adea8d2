// Shared prompt-building utilities.
// Each feature that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::warn;

use crate::models::Profile;

/// Renders the student profile as pretty-printed JSON for inclusion in a prompt.
pub fn profile_json(profile: &Profile) -> String {
    serde_json::to_string_pretty(profile).unwrap_or_default()
}

fn placeholder() -> Option<&'static Regex> {
    static PLACEHOLDER: OnceLock<Option<Regex>> = OnceLock::new();
    PLACEHOLDER
        .get_or_init(|| {
            Regex::new(r"\{(\w+)\}")
                .map_err(|e| warn!("Prompt placeholder pattern failed to compile: {e}"))
                .ok()
        })
        .as_ref()
}

/// Fills `{key}` placeholders in a prompt template in one pass, so text
/// inserted for one key is never searched for another. Unknown keys are left as is.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let Some(placeholder) = placeholder() else {
        return template.to_string();
    };
    placeholder
        .replace_all(template, |caps: &Captures| {
            values
                .iter()
                .find(|(key, _)| *key == &caps[1])
                .map_or_else(|| caps[0].to_string(), |(_, value)| value.to_string())
        })
        .into_owned()
}

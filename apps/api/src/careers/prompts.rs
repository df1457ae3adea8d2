/// Delimiter between suggestion blocks in the model's answer.
pub const SUGGESTION_DELIMITER: &str = "###";

/// Career suggestion prompt template. Replace `{profile_json}` before sending.
pub const SUGGESTION_PROMPT_TEMPLATE: &str = r#"Based on the following student profile, suggest 3 diverse and suitable career paths.
For each career, provide a brief description and the key skills required.
Format each suggestion exactly like this, separated by '###':

###
**Career:** [Career Name]
**Description:** [A brief description of the career]
**Key Skills:** [skill1, skill2, skill3]
###

Profile:
{profile_json}"#;

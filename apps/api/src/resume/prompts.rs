/// Resume review prompt template. Replace `{resume_text}` before sending.
pub const RESUME_FEEDBACK_PROMPT_TEMPLATE: &str = r#"Act as a professional career coach. Review the following resume text and provide constructive feedback.
Focus on clarity, impact, and formatting. Provide the feedback in markdown format with headings for different sections like 'Overall Impression', 'Strengths', and 'Areas for Improvement'.

Resume Text:
---
{resume_text}
---"#;

pub const RESUME_FEEDBACK_ERROR: &str = "Sorry, there was an error getting feedback.";

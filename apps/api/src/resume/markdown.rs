//! Minimal markdown-subset renderer for model feedback.
//!
//! Handles `### ` headings, `**bold**`, `- ` list items and line breaks.
//! Best-effort and cosmetic: input is HTML-escaped first and rendering never fails.

use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

struct Rules {
    heading: Regex,
    bold: Regex,
    list_item: Regex,
}

fn rules() -> Option<&'static Rules> {
    static RULES: OnceLock<Option<Rules>> = OnceLock::new();
    RULES
        .get_or_init(|| {
            let build = || -> Result<Rules, regex::Error> {
                Ok(Rules {
                    heading: Regex::new(r"### (.*)")?,
                    bold: Regex::new(r"\*\*([^*]+)\*\*")?,
                    list_item: Regex::new(r"(?m)^- (.*)$")?,
                })
            };
            build()
                .map_err(|e| warn!("Markdown rules failed to compile: {e}"))
                .ok()
        })
        .as_ref()
}

pub fn render_markdown(text: &str) -> String {
    let escaped = escape_html(&text.replace("\r\n", "\n"));
    let Some(rules) = rules() else {
        return escaped.replace('\n', "<br />");
    };

    let html = rules.heading.replace_all(&escaped, "<h3>$1</h3>");
    let html = rules.bold.replace_all(&html, "<strong>$1</strong>");
    let html = rules.list_item.replace_all(&html, "<li>$1</li>");
    html.replace('\n', "<br />")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_bold_and_list() {
        let text = "### Strengths\n**Clear** summary\n- Quantified impact\n- Good layout";
        assert_eq!(
            render_markdown(text),
            "<h3>Strengths</h3><br /><strong>Clear</strong> summary<br /><li>Quantified impact</li><br /><li>Good layout</li>"
        );
    }

    #[test]
    fn test_html_in_feedback_is_escaped() {
        assert_eq!(
            render_markdown("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_unbalanced_markers_pass_through() {
        assert_eq!(render_markdown("**open bold"), "**open bold");
        assert_eq!(render_markdown(""), "");
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(render_markdown("a\r\n- b"), "a<br /><li>b</li>");
    }
}

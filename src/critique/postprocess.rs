//! Response postprocessing - fenced JSON extraction and HTML rendering

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

/// First fenced code block explicitly tagged as JSON.
/// The opening token must start a line; the closing token matches it.
static JSON_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?ms)^```json[ \t]*\r?\n(.*?)^```").unwrap());

/// A single rewrite suggestion parsed from model output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteSuggestion {
    pub bad_phrase: String,
    pub suggested_rewrite: String,
}

/// Wire response body for the meta-critique endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CritiqueResponse {
    pub meta_feedback: String,
    pub rewrite_suggestions: Vec<RewriteSuggestion>,
    pub full_rewrite: String,
}

impl CritiqueResponse {
    /// Response carrying only a message, with suggestions and rewrite empty.
    /// Used for every failure path so partial responses are never returned.
    pub fn message_only(meta_feedback: impl Into<String>) -> Self {
        Self {
            meta_feedback: meta_feedback.into(),
            rewrite_suggestions: Vec::new(),
            full_rewrite: String::new(),
        }
    }
}

/// Error raised when the embedded JSON block is present but malformed.
/// Surfaced as a 500-class error rather than silently substituting an
/// empty suggestion list.
#[derive(Debug, Error)]
pub enum PostprocessError {
    #[error("malformed rewrite_suggestions block: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Shape of the embedded JSON payload
#[derive(Debug, Deserialize)]
struct SuggestionBlock {
    rewrite_suggestions: Vec<RewriteSuggestion>,
}

/// Split raw model text into a Markdown body and optional rewrite
/// suggestions, rendering the HTML rewrite document when suggestions exist.
pub fn postprocess_completion(
    raw: &str,
    student_name: &str,
) -> Result<CritiqueResponse, PostprocessError> {
    let Some(captures) = JSON_FENCE_RE.captures(raw) else {
        return Ok(CritiqueResponse {
            meta_feedback: raw.trim().to_string(),
            rewrite_suggestions: Vec::new(),
            full_rewrite: String::new(),
        });
    };

    let fence = captures.get(0).unwrap();
    let block = captures.get(1).unwrap().as_str();

    let parsed: SuggestionBlock = serde_json::from_str(block)?;

    let meta_feedback = raw[..fence.start()].trim_end().to_string();
    let full_rewrite = if parsed.rewrite_suggestions.is_empty() {
        String::new()
    } else {
        render_full_rewrite(student_name, &parsed.rewrite_suggestions)
    };

    Ok(CritiqueResponse {
        meta_feedback,
        rewrite_suggestions: parsed.rewrite_suggestions,
        full_rewrite,
    })
}

/// Render a self-contained HTML document listing the suggested rewrites.
/// The student name and suggestion text are escaped to prevent injection.
pub fn render_full_rewrite(student_name: &str, suggestions: &[RewriteSuggestion]) -> String {
    let name = html_escape(student_name);
    let mut doc = String::new();
    doc.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    doc.push_str(&format!("<title>Rewrite Suggestions for {}</title>\n", name));
    doc.push_str("</head>\n<body>\n");
    doc.push_str(&format!("<h1>Rewrite Suggestions for {}</h1>\n", name));
    doc.push_str("<ul>\n");
    for suggestion in suggestions {
        doc.push_str(&format!(
            "<li>{}</li>\n",
            html_escape(&suggestion.suggested_rewrite)
        ));
    }
    doc.push_str("</ul>\n</body>\n</html>\n");
    doc
}

/// Escape HTML-significant characters
pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

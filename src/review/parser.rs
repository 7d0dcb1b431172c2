//! Tolerant parsing of the model's review text.
//!
//! Models are instructed to emit a three-field JSON object but routinely
//! wrap it in markdown fences or prose. Parsing tries the raw text, a
//! brace-extracted slice, and fenced blocks, and degrades to defaults
//! rather than failing: by the time this runs the fetch and generation
//! cost is already sunk, so returning something beats erroring.

use serde_json::Value;
use tracing::debug;

use crate::models::{Comments, ReviewSummary};

/// Conclusion used when the response cannot be parsed at all.
const FALLBACK_CONCLUSION: &str = "The code review is complete based on the provided files.";

/// Parse raw model output into a [`ReviewSummary`]. Never fails.
///
/// Field extraction is by name with defaults: comments → empty list,
/// rating → `"N/A"`, conclusion → empty string. Unparseable text becomes a
/// degraded summary carrying the raw text as a single comment blob.
pub fn parse_review(raw: &str) -> ReviewSummary {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return ReviewSummary {
            comments: Comments::default(),
            rating: "N/A".to_string(),
            conclusion: FALLBACK_CONCLUSION.to_string(),
        };
    }

    for candidate in extract_json_candidates(trimmed) {
        if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(&candidate) {
            return ReviewSummary {
                comments: extract_comments(fields.get("Downsides/Comments")),
                rating: extract_rating(fields.get("Rating")),
                conclusion: fields
                    .get("Conclusion")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            };
        }
    }

    debug!(len = trimmed.len(), "review text is not structured, degrading");
    ReviewSummary {
        comments: Comments::Text(trimmed.to_string()),
        rating: "N/A".to_string(),
        conclusion: FALLBACK_CONCLUSION.to_string(),
    }
}

/// Comments may arrive as a list of discrete strings (current prompt) or a
/// single text blob (legacy shape). Lists pass through untouched; blobs get
/// paragraph breaks collapsed and bold markers stripped.
fn extract_comments(value: Option<&Value>) -> Comments {
    match value {
        Some(Value::Array(items)) => Comments::List(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
        ),
        Some(Value::String(text)) => Comments::Text(normalize_comment_text(text)),
        _ => Comments::default(),
    }
}

/// Ratings are requested as "X/10" strings, but models occasionally emit a
/// bare number; accept both.
fn extract_rating(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => "N/A".to_string(),
    }
}

/// Collapse paragraph-break sequences to single spaces and strip markdown
/// bold markers from a legacy comment blob.
fn normalize_comment_text(text: &str) -> String {
    text.replace("\n\n", " ").replace("**", "")
}

/// Regex for extracting content inside markdown code fences.
///
/// The closing ``` must appear at the start of a line to avoid matching
/// triple-backticks embedded inside JSON string values.
static FENCE_RE: std::sync::LazyLock<regex::Regex> =
    std::sync::LazyLock::new(|| regex::Regex::new(r"(?s)```(?:json)?\s*\n(.*?)\n```").unwrap());

/// Candidate JSON strings to try, most-direct first: the raw text, the slice
/// between the first `{` and last `}`, then any fenced blocks.
fn extract_json_candidates(text: &str) -> Vec<String> {
    let mut candidates = vec![text.to_string()];

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            candidates.push(text[start..=end].to_string());
        }
    }

    for cap in FENCE_RE.captures_iter(text) {
        if let Some(inner) = cap.get(1) {
            let inner = inner.as_str().trim();
            if !inner.is_empty() {
                candidates.push(inner.to_string());
            }
        }
    }

    candidates
}

//! Structured review feedback types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Itemized downsides/comments from the review.
///
/// Current models are asked for a list of discrete strings; older prompt
/// revisions produced a single text blob, and cached consumers may still
/// send either shape downstream, so both serialize transparently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Comments {
    List(Vec<String>),
    Text(String),
}

impl Comments {
    pub fn is_empty(&self) -> bool {
        match self {
            Comments::List(items) => items.is_empty(),
            Comments::Text(text) => text.is_empty(),
        }
    }
}

impl Default for Comments {
    fn default() -> Self {
        Comments::List(Vec::new())
    }
}

/// The three review fields, always fully populated.
///
/// Produced by the response parser; on parse failure the parser fills in
/// defaults rather than erroring, so a summary is never partial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub comments: Comments,
    /// Free-form, intended to read as "X/10".
    pub rating: String,
    pub conclusion: String,
}

/// The JSON shape the model is instructed to emit.
///
/// Field names match the prompt's output-format instruction verbatim.
/// Also handed to providers that support schema-constrained generation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReviewSchema {
    /// One discrete comment per entry.
    #[serde(rename = "Downsides/Comments")]
    pub comments: Vec<String>,
    /// Score formatted as "<value>/10".
    #[serde(rename = "Rating")]
    pub rating: String,
    #[serde(rename = "Conclusion")]
    pub conclusion: String,
}

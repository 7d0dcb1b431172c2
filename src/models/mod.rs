//! Shared types used across all modules.
//!
//! Defines the request/response shapes of the review endpoint and the
//! enumerations other modules build on. Other modules import from here
//! rather than reaching into each other's internals.

pub mod fileset;
pub mod review;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use fileset::FileSet;
pub use review::{Comments, ReviewSummary};

/// Skill level of the candidate whose submission is being reviewed.
///
/// A closed set: the HTTP layer rejects anything else at deserialization,
/// before any collaborator is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandidateLevel {
    Junior,
    Middle,
    Senior,
}

impl CandidateLevel {
    /// The canonical token used in cache keys and prompts.
    pub fn as_str(self) -> &'static str {
        match self {
            CandidateLevel::Junior => "Junior",
            CandidateLevel::Middle => "Middle",
            CandidateLevel::Senior => "Senior",
        }
    }
}

impl fmt::Display for CandidateLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /review`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRequest {
    /// Free-text description of the coding assignment.
    pub assignment_description: String,
    /// Repository locator; must resolve to an owner/name path.
    pub github_repo_url: String,
    pub candidate_level: CandidateLevel,
}

/// Body of a successful `POST /review` response.
///
/// The `downsides or comments` key (space included) is the service's
/// published wire format; renaming it would break existing consumers.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    /// File paths in traversal order, as fetched from the repository.
    pub files_found: Vec<String>,
    #[serde(rename = "downsides or comments")]
    pub downsides_or_comments: Comments,
    pub rating: String,
    pub conclusion: String,
}

impl ReviewResponse {
    /// Assemble the response from the fetched paths and parsed summary.
    pub fn new(files_found: Vec<String>, summary: ReviewSummary) -> Self {
        Self {
            files_found,
            downsides_or_comments: summary.comments,
            rating: summary.rating,
            conclusion: summary.conclusion,
        }
    }
}

/// Supported LLM provider backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderName {
    #[default]
    Gemini,
    Anthropic,
    #[serde(rename = "openai")]
    OpenAI,
    /// Any OpenAI-compatible API (e.g. Ollama, Together, local servers).
    #[serde(rename = "openai-compatible")]
    OpenAICompatible,
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderName::Gemini => write!(f, "gemini"),
            ProviderName::Anthropic => write!(f, "anthropic"),
            ProviderName::OpenAI => write!(f, "openai"),
            ProviderName::OpenAICompatible => write!(f, "openai-compatible"),
        }
    }
}

impl std::str::FromStr for ProviderName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(ProviderName::Gemini),
            "anthropic" => Ok(ProviderName::Anthropic),
            "openai" => Ok(ProviderName::OpenAI),
            "openai-compatible" => Ok(ProviderName::OpenAICompatible),
            other => Err(format!(
                "unsupported provider: '{other}'. Supported: gemini, anthropic, openai, \
                 openai-compatible"
            )),
        }
    }
}

impl ProviderName {
    /// Returns the provider-specific environment variable name for the API key.
    ///
    /// These match the env var names used by rig-core's `from_env()` implementations.
    pub fn api_key_env_var(self) -> &'static str {
        match self {
            ProviderName::Gemini => "GEMINI_API_KEY",
            ProviderName::Anthropic => "ANTHROPIC_API_KEY",
            ProviderName::OpenAI | ProviderName::OpenAICompatible => "OPENAI_API_KEY",
        }
    }
}

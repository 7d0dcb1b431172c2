//! ReviewProvider trait and LLM integration.
//!
//! Provides an abstraction layer over rig-core to decouple the
//! codebase from the specific LLM library.

pub mod rig;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the review provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("LLM API error: {0}")]
    ApiError(String),

    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

/// Trait for LLM-backed text generation.
///
/// Implementations send the prompt to their backend and return the raw
/// response text; structural parsing happens downstream in the response
/// parser, which tolerates whatever shape comes back.
#[async_trait]
pub trait ReviewProvider: Send + Sync {
    /// Generate review text from a prompt.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

//! rig-core integration for LLM-backed review generation.
//!
//! Uses rig-core's provider clients and Agent abstraction for
//! multi-provider support: Gemini, Anthropic, OpenAI, and any
//! OpenAI-compatible API.
//!
//! When the provider is configured with `structured_output`, the completion
//! is constrained to the review JSON schema. The response parser runs over
//! the returned text either way, so the flag only raises the odds of
//! well-formed output — it is not required for correctness.

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers;

use crate::config::ProviderConfig;
use crate::models::review::ReviewSchema;
use crate::models::ProviderName;

use super::{ProviderError, ReviewProvider};

/// Maximum tokens per completion response.
///
/// A review is a few KB of JSON; the headroom is for thinking models
/// (e.g. Gemini 2.5) that consume part of the budget for reasoning tokens.
const MAX_TOKENS: u64 = 16384;

/// System preamble for every review completion.
const SYSTEM_PROMPT: &str =
    "You are a rigorous but fair software engineering reviewer. Follow the output format \
     instructions in the user message exactly.";

/// Build an agent from a rig-core client and prompt it.
///
/// Always sets `max_tokens`: every rig-core provider accepts it, and some
/// (e.g. Gemini) truncate responses behind a low default without it.
/// Branches on `$structured` so the schema constraint is only attached for
/// providers configured with that capability.
macro_rules! prompt_review {
    ($client:expr, $model:expr, $user:expr, $structured:expr, $label:expr) => {{
        let result = if $structured {
            let agent = $client
                .agent($model)
                .preamble(SYSTEM_PROMPT)
                .temperature(0.0)
                .max_tokens(MAX_TOKENS)
                .output_schema::<ReviewSchema>()
                .build();
            agent.prompt($user).await
        } else {
            let agent = $client
                .agent($model)
                .preamble(SYSTEM_PROMPT)
                .temperature(0.0)
                .max_tokens(MAX_TOKENS)
                .build();
            agent.prompt($user).await
        };
        result.map_err(|e| ProviderError::ApiError(format!("{} API error: {e}", $label)))
    }};
}

/// Create a rig-core client using the `Client::new(api_key)` convention.
macro_rules! new_client {
    ($provider_mod:path, $api_key:expr, $label:expr) => {{
        <$provider_mod>::new($api_key).map_err(|e| {
            ProviderError::ApiError(format!("failed to create {} client: {e}", $label))
        })
    }};
}

/// rig-core based review provider.
///
/// The provider name in config selects which rig-core client to use.
pub struct RigProvider {
    config: ProviderConfig,
}

impl RigProvider {
    /// Create a new RigProvider with the given configuration.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_none() {
            return Err(ProviderError::NotConfigured(format!(
                "no API key found for provider '{}'. Set {} or the provider-specific env var.",
                config.name,
                crate::constants::ENV_API_KEY
            )));
        }
        Ok(Self { config })
    }

    /// Get the API key or return an error.
    fn api_key(&self) -> Result<&str, ProviderError> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::NotConfigured("missing API key".to_string()))
    }

    /// Require `base_url` for OpenAI-compatible providers.
    fn require_base_url(&self) -> Result<&str, ProviderError> {
        self.config.base_url.as_deref().ok_or_else(|| {
            ProviderError::NotConfigured(
                "openai-compatible provider requires base_url to be set".to_string(),
            )
        })
    }
}

#[async_trait]
impl ReviewProvider for RigProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let api_key = self.api_key()?;
        let model = self.config.model.as_str();
        let structured = self.config.structured_output;

        match self.config.name {
            ProviderName::Gemini => {
                let client = new_client!(providers::gemini::Client, api_key, "Gemini")?;
                prompt_review!(client, model, prompt, structured, "Gemini")
            }
            ProviderName::Anthropic => {
                let client: providers::anthropic::Client = providers::anthropic::Client::builder()
                    .api_key(api_key)
                    .build()
                    .map_err(|e| {
                        ProviderError::ApiError(format!("failed to create Anthropic client: {e}"))
                    })?;
                prompt_review!(client, model, prompt, structured, "Anthropic")
            }
            ProviderName::OpenAI => {
                let mut builder = providers::openai::CompletionsClient::builder().api_key(api_key);
                if let Some(ref base_url) = self.config.base_url {
                    builder = builder.base_url(base_url);
                }
                let client: providers::openai::CompletionsClient =
                    builder.build().map_err(|e| {
                        ProviderError::ApiError(format!("failed to create OpenAI client: {e}"))
                    })?;
                prompt_review!(client, model, prompt, structured, "OpenAI")
            }
            ProviderName::OpenAICompatible => {
                let base_url = self.require_base_url()?;
                let client: providers::openai::CompletionsClient =
                    providers::openai::CompletionsClient::builder()
                        .api_key(api_key)
                        .base_url(base_url)
                        .build()
                        .map_err(|e| {
                            ProviderError::ApiError(format!(
                                "failed to create OpenAI-compatible client: {e}"
                            ))
                        })?;
                prompt_review!(client, model, prompt, structured, "OpenAI-compatible")
            }
        }
    }
}

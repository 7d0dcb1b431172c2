//! Configuration loading and layering.
//!
//! Handles `critiq.toml` loading, environment variable resolution,
//! and default merging with proper priority ordering.

pub mod loader;

pub use loader::{
    CacheConfig, Config, GithubConfig, ProviderConfig, RateLimitConfig, ServerConfig,
};

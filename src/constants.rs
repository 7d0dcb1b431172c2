//! App-wide constants.
//!
//! Centralises the service name, config paths, environment variable names,
//! and defaults so a rename only requires changing this file.

/// Display name of the service (lowercase).
pub const APP_NAME: &str = "critiq";

/// Crate version, injected by cargo.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Local config filename (e.g. `critiq.toml` in the working directory).
pub const CONFIG_FILENAME: &str = "critiq.toml";

/// Directory name under `~/.config/` for global config and cache.
pub const CONFIG_DIR: &str = "critiq";

/// User-Agent sent on outbound HTTP calls. GitHub rejects requests without one.
pub const USER_AGENT: &str = concat!("critiq/", env!("CARGO_PKG_VERSION"));

/// Base URL of the GitHub REST API.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Default listen address for the HTTP server.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Default time-to-live for cached repository file sets: one day.
pub const CACHE_TTL_SECS: u64 = 60 * 60 * 24;

/// Default fixed-window rate limit: requests per window, per client address.
pub const RATE_LIMIT_MAX_REQUESTS: u32 = 5;

/// Default fixed-window rate limit: window length in seconds.
pub const RATE_LIMIT_WINDOW_SECS: u64 = 300;

// ── Environment variable names ──────────────────────────────────────

pub const ENV_PROVIDER: &str = "CRITIQ_PROVIDER";
pub const ENV_MODEL: &str = "CRITIQ_MODEL";
pub const ENV_API_KEY: &str = "CRITIQ_API_KEY";
pub const ENV_BASE_URL: &str = "CRITIQ_BASE_URL";
pub const ENV_BIND: &str = "CRITIQ_BIND";
pub const ENV_CACHE_DIR: &str = "CRITIQ_CACHE_DIR";
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";

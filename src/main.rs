//! critiq — AI-powered coding assignment review service.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use critiq::cache::CacheEngine;
use critiq::config::Config;
use critiq::constants;
use critiq::env::Env;
use critiq::github::GithubClient;
use critiq::providers::rig::RigProvider;
use critiq::review::ReviewService;
use critiq::server::{self, rate_limit::FixedWindowLimiter, AppContext};

use std::process;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::args::{CacheAction, Cli, Command, ServeArgs};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => run_serve(args).await,
        Command::Cache { action } => run_cache(action).await,
        Command::Version => run_version(),
    }
}

/// Start the HTTP server with all collaborators wired up.
async fn run_serve(args: ServeArgs) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let env = Env::real();
    let working_dir = std::env::current_dir().ok();
    let mut config =
        Config::load(working_dir.as_deref(), &env).context("failed to load configuration")?;

    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    let host = GithubClient::new_with_base(&config.github.api_base, config.github.token.clone())
        .context("failed to create GitHub client")?;
    let provider =
        RigProvider::new(config.provider.clone()).context("failed to create review provider")?;
    let cache = CacheEngine::new(
        config.cache.enabled,
        config.cache.dir.clone(),
        Duration::from_secs(config.cache.ttl_secs),
    );

    let service = ReviewService::new(Arc::new(host), Arc::new(provider), Arc::new(cache));
    let limiter = FixedWindowLimiter::new(
        config.rate_limit.max_requests,
        Duration::from_secs(config.rate_limit.window_secs),
    );
    let ctx = Arc::new(AppContext::new(service, limiter));

    info!(
        provider = %config.provider.name,
        model = %config.provider.model,
        cache_enabled = config.cache.enabled,
        "starting critiq {}",
        constants::VERSION
    );

    server::start_server(ctx, &config.server.bind).await
}

/// Cache maintenance operations.
async fn run_cache(action: CacheAction) -> Result<()> {
    let env = Env::real();
    let working_dir = std::env::current_dir().ok();
    let config =
        Config::load(working_dir.as_deref(), &env).context("failed to load configuration")?;
    let cache = CacheEngine::new(
        true,
        config.cache.dir.clone(),
        Duration::from_secs(config.cache.ttl_secs),
    );

    match action {
        CacheAction::Clear => {
            let stats = cache.clear().context("failed to clear cache")?;
            println!(
                "Removed {} cached entr{} ({}).",
                stats.entries,
                if stats.entries == 1 { "y" } else { "ies" },
                stats.human_size()
            );
        }
        CacheAction::Stats => {
            let stats = cache.stats().context("failed to read cache")?;
            println!("{} entries, {}", stats.entries, stats.human_size());
        }
        CacheAction::Path => match cache.path() {
            Some(path) => println!("{}", path.display()),
            None => println!("No cache directory available."),
        },
    }

    Ok(())
}

/// Print version information.
fn run_version() -> Result<()> {
    println!("critiq {}", constants::VERSION);
    Ok(())
}

//! Clap argument types.

use clap::Parser;

/// AI-powered coding assignment review service.
#[derive(Parser, Debug)]
#[command(
    name = "critiq",
    version = critiq::constants::VERSION,
    about = "AI-powered coding assignment review service",
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server.
    Serve(ServeArgs),

    /// Manage the fetched-content cache.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Print version information.
    Version,
}

/// Arguments for the `serve` subcommand.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Listen address (overrides config and CRITIQ_BIND).
    #[arg(long)]
    pub bind: Option<String>,
}

/// Cache management subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum CacheAction {
    /// Remove all cached repository content.
    Clear,
    /// Show cache statistics (entry count and size).
    Stats,
    /// Print the cache directory path.
    Path,
}

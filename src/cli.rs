// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two kinds of arguments live here:
// - Global options (credentials, API endpoints, crawl budget) that apply to
//   every subcommand. Most of them can also come from environment variables,
//   which is how tokens are usually provided.
// - Subcommands: `roast` (the full pipeline) and `fetch` (content only).
//
// The raw values parsed here are turned into a validated `Settings` value in
// config.rs before anything else uses them.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use url::Url;

#[derive(Parser, Debug)]
#[command(
    name = "git-roast",
    version,
    about = "Samples a GitHub repository and asks Gemini to roast it",
    long_about = "git-roast reads a repository's README and a handful of source files through the \
                  GitHub API, then asks a Gemini model for a brutally honest critique and a score \
                  from 0 (fine) to 100 (pure trash)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub options: GlobalOptions,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Roast a GitHub repository
    ///
    /// Example: git-roast roast https://github.com/acme/widgets
    Roast {
        /// GitHub repository URL (e.g., https://github.com/user/repo)
        repo_url: String,

        /// Output the result as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Only gather the repository content that would be sent for roasting
    ///
    /// Does not need a Gemini API key.
    Fetch {
        /// GitHub repository URL (e.g., https://github.com/user/repo)
        repo_url: String,

        /// Output the excerpts as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

// Options shared by all subcommands
//
// `global = true` lets them appear before or after the subcommand name
#[derive(Args, Debug)]
pub struct GlobalOptions {
    /// GitHub token; requests fall back to anonymous access when it is rejected
    #[arg(long, env = "GITHUB_TOKEN", global = true, hide_env_values = true)]
    pub github_token: Option<String>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", global = true, hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Base URL of the GitHub REST API
    #[arg(long, global = true, default_value = "https://api.github.com", value_parser = parse_base_url)]
    pub github_api_base: Url,

    /// Base URL of the Gemini API
    #[arg(
        long,
        global = true,
        default_value = "https://generativelanguage.googleapis.com/v1beta",
        value_parser = parse_base_url
    )]
    pub gemini_api_base: Url,

    /// Model used when discovery is unavailable
    #[arg(long, env = "GEMINI_MODEL", global = true, default_value = "gemini-1.5-flash")]
    pub default_model: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Maximum number of source files to sample
    #[arg(long, global = true, default_value_t = 4)]
    pub max_files: usize,

    /// Maximum directory depth to crawl (0 = repository root only)
    #[arg(long, global = true, default_value_t = 2)]
    pub max_depth: usize,

    /// Maximum bytes kept from each sampled file
    #[arg(long, global = true, default_value_t = 1500)]
    pub max_file_bytes: usize,

    /// Enable debug logging (RUST_LOG overrides this)
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

// Used as a clap value_parser: only absolute http(s) URLs are accepted
fn parse_base_url(value: &str) -> Result<Url, String> {
    let url = Url::parse(value).map_err(|e| format!("invalid URL '{}': {}", value, e))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported URL scheme '{}'", other)),
    }
}

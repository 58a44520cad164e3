// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments (and environment variables) using clap
// 2. Set up logging to stderr
// 3. Dispatch to the appropriate subcommand handler
// 4. Print the result and exit with a proper code (0 = success, 2 = error)
//
// All the real work lives in the modules below; this file only wires the
// CLI to `roast::submit_roast_request` and `roast::fetch_content`.
// =============================================================================

mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - validated settings
mod crawl; // src/crawl/ - budgeted repository crawl
mod error; // src/error.rs - RoastError
mod gemini; // src/gemini/ - model selection and the retry loop
mod github; // src/github/ - GitHub URL parsing, client, content fetcher
mod roast; // src/roast.rs - the end-to-end operation

use anyhow::Result;
use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use config::Settings;
use crawl::{AggregatedContent, Excerpt};
use error::RoastError;
use gemini::{RoastResult, MODEL_CACHE};
use github::RepositoryRef;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = roast (or fetch) succeeded
//   Ok(2) = classified failure, already printed
//   Err   = unexpected error (e.g. output serialization)
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.options.verbose);

    let settings = Settings::from_options(&cli.options);

    match cli.command {
        Commands::Roast { repo_url, json } => handle_roast(&settings, &repo_url, json).await,
        Commands::Fetch { repo_url, json } => handle_fetch(&settings, &repo_url, json).await,
    }
}

// RUST_LOG wins; otherwise info, or debug with --verbose
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn handle_roast(settings: &Settings, repo_url: &str, json: bool) -> Result<i32> {
    match roast::submit_roast_request(settings, &MODEL_CACHE, repo_url).await {
        Ok(result) => {
            print_roast(&result, json)?;
            Ok(0)
        }
        Err(e) => {
            print_error(&e, json)?;
            Ok(2)
        }
    }
}

async fn handle_fetch(settings: &Settings, repo_url: &str, json: bool) -> Result<i32> {
    match roast::fetch_content(settings, repo_url).await {
        Ok((repo, content)) => {
            print_content(&repo, &content, json)?;
            Ok(0)
        }
        Err(e) => {
            print_error(&e, json)?;
            Ok(2)
        }
    }
}

fn print_roast(result: &RoastResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!("🔥 {}", result.roast);
        println!();
        println!("💀 Trash score: {:.0}/100", result.score);
    }
    Ok(())
}

fn print_content(repo: &RepositoryRef, content: &AggregatedContent, json: bool) -> Result<()> {
    if json {
        let output = json!({ "repo": repo.to_string(), "excerpts": content });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("📄 {} excerpt(s) from {}", content.len(), repo);
    for excerpt in content.excerpts() {
        print_excerpt(excerpt);
    }
    Ok(())
}

fn print_excerpt(excerpt: &Excerpt) {
    println!();
    println!("--- {} ({} bytes) ---", excerpt.label, excerpt.text.len());
    println!("{}", excerpt.text);
}

fn print_error(error: &RoastError, json: bool) -> Result<()> {
    if json {
        let output = json!({ "detail": error.code(), "message": error.to_string() });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        eprintln!("❌ {}", error);
    }
    Ok(())
}

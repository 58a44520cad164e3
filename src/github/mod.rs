// src/github/mod.rs
// =============================================================================
// This module handles everything GitHub-specific.
//
// Currently implements:
// - Parsing GitHub URLs to extract owner/repo
// - An HTTP client that retries rejected tokenized requests anonymously
// - Fetching the README plus a crawl of the file tree through the REST API
// =============================================================================

mod client;
mod fetch;
mod parse;

pub use client::GitHubClient;
pub use fetch::ContentFetcher;
pub use parse::{parse_github_url, RepositoryRef};

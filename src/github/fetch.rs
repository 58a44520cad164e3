// src/github/fetch.rs
// =============================================================================
// Gathers the text we send for roasting.
//
// Strategy:
// - README phase (best effort): ask the API where the README lives, download
//   it and keep the first README_CHAR_CAP bytes. Any failure is only logged.
// - Crawl phase: breadth-first walk of the contents API, see crawl::queue.
// - If both phases come back empty there is nothing to roast.
// =============================================================================

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info};

use super::{GitHubClient, RepositoryRef};
use crate::config::Settings;
use crate::crawl::{crawl_repository, truncate, AggregatedContent, ContentBudget};
use crate::error::RoastError;

const README_CHAR_CAP: usize = 2000;
const README_LABEL: &str = "README.md";

// The only field we need from GET /repos/{owner}/{name}/readme
#[derive(Debug, Deserialize)]
struct ReadmeMetadata {
    download_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ContentFetcher {
    client: GitHubClient,
    api_base: String,
    budget: ContentBudget,
}

impl ContentFetcher {
    pub fn new(client: GitHubClient, api_base: impl Into<String>, budget: ContentBudget) -> Self {
        ContentFetcher {
            client,
            api_base: api_base.into(),
            budget,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, RoastError> {
        let client = GitHubClient::new(settings.github_token.clone(), settings.timeout)?;
        Ok(Self::new(
            client,
            settings.github_api_base.clone(),
            settings.budget.clone(),
        ))
    }

    // Gathers the text for one repository
    //
    // Parameters:
    //   repo: owner/name of the repository to sample
    //
    // Returns: Result<AggregatedContent, RoastError>
    //   Success: README excerpt (if any) followed by the crawled files
    //   Error: NoContentFound if both phases came back empty, or a root
    //          listing error from the crawl (not found / rate limited)
    pub async fn fetch(&self, repo: &RepositoryRef) -> Result<AggregatedContent, RoastError> {
        let mut content = AggregatedContent::new();

        if let Some(readme) = self.fetch_readme(repo).await {
            content.push(README_LABEL, readme);
        }

        let root_url = format!("{}/repos/{}/{}/contents", self.api_base, repo.owner, repo.name);
        crawl_repository(&self.client, &root_url, repo, &self.budget, &mut content).await?;

        if content.is_empty() {
            info!(repo = %repo, "no content found");
            return Err(RoastError::NoContentFound {
                owner: repo.owner.clone(),
                name: repo.name.clone(),
            });
        }

        info!(repo = %repo, excerpts = content.len(), "content fetched");
        Ok(content)
    }

    // Best effort: None on any failure, never an error
    async fn fetch_readme(&self, repo: &RepositoryRef) -> Option<String> {
        let url = format!("{}/repos/{}/{}/readme", self.api_base, repo.owner, repo.name);

        let response = self.client.get(&url).await?;
        if response.status() != StatusCode::OK {
            debug!(repo = %repo, status = response.status().as_u16(), "no readme");
            return None;
        }

        let metadata: ReadmeMetadata = match response.json().await {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!(repo = %repo, error = %e, "unreadable readme metadata");
                return None;
            }
        };

        let text = self.client.get_text(metadata.download_url.as_deref()?).await?;
        Some(truncate(&text, README_CHAR_CAP).to_string())
    }
}

// src/github/client.rs
// =============================================================================
// A thin wrapper around reqwest for talking to GitHub.
//
// Two rules apply to every request made through it:
// 1. If a token is configured, try with it first. When GitHub answers 401,
//    403 or 404, try exactly once more without it. A token scoped to other
//    repos (or simply expired) must never hide a public repository, and
//    GitHub reports "no access" as 404 rather than 403.
// 2. Network errors and timeouts are not errors for the caller, they just
//    mean "no result" (None). The crawler skips that node and moves on.
// =============================================================================

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use tracing::{debug, warn};

use crate::error::RoastError;

const USER_AGENT: &str = concat!("git-roast/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(token: Option<String>, timeout: Duration) -> Result<Self, RoastError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(GitHubClient { http, token })
    }

    /// GET `url`, with the anonymous fallback described above
    pub async fn get(&self, url: &str) -> Option<Response> {
        if let Some(token) = &self.token {
            match self.send(url, Some(token)).await {
                Some(response) if should_retry_anonymously(response.status()) => {
                    debug!(
                        url,
                        status = response.status().as_u16(),
                        "request rejected with token, retrying without it"
                    );
                }
                other => return other,
            }
        }

        self.send(url, None).await
    }

    /// GET `url` and return the body if the answer was 200
    pub async fn get_text(&self, url: &str) -> Option<String> {
        let response = self.get(url).await?;
        if response.status() != StatusCode::OK {
            debug!(url, status = response.status().as_u16(), "skipping non-200 body");
            return None;
        }

        match response.text().await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(url, error = %e, "failed to read response body");
                None
            }
        }
    }

    async fn send(&self, url: &str, token: Option<&str>) -> Option<Response> {
        let mut request = self.http.get(url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        debug!(url, authenticated = token.is_some(), "github request");
        match request.send().await {
            Ok(response) => {
                debug!(url, status = response.status().as_u16(), "github response");
                Some(response)
            }
            Err(e) => {
                warn!(url, error = %e, "github request failed");
                None
            }
        }
    }
}

fn should_retry_anonymously(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND
    )
}

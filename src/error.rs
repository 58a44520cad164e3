// src/error.rs
// =============================================================================
// Every failure a roast request can end in.
//
// The CLI (and any other front end) only ever sees one of these variants or a
// RoastResult, never a raw reqwest/serde error. Transient inference problems
// (rate limits, stale models) are handled inside gemini::invoke and do not
// show up here unless they turn into something fatal.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoastError {
    /// The input did not contain a `github.com/owner/name` pair
    #[error("invalid GitHub repository URL: {0}")]
    InvalidReference(String),

    /// Root listing returned 404, even after the unauthenticated retry
    #[error("repository {owner}/{name} was not found or is private")]
    RepositoryNotFoundOrPrivate { owner: String, name: String },

    /// Root listing returned 403
    #[error("GitHub API rate limit exceeded")]
    RateLimited,

    /// Neither the README nor the crawl produced any text
    #[error("could not fetch any content from {owner}/{name} (are there any code files?)")]
    NoContentFound { owner: String, name: String },

    #[error("missing credentials: {0} is not set")]
    MissingCredentials(&'static str),

    /// The inference provider answered with a status we do not know how to retry
    #[error("inference provider returned HTTP {status}: {body}")]
    ProviderFatal { status: u16, body: String },

    /// The HTTP client itself could not be built (bad TLS setup etc.)
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl RoastError {
    /// Stable machine-readable code, used for `--json` error output
    pub fn code(&self) -> &'static str {
        match self {
            RoastError::InvalidReference(_) => "INVALID_GITHUB_URL",
            RoastError::RepositoryNotFoundOrPrivate { .. } => "REPO_NOT_FOUND_OR_PRIVATE",
            RoastError::RateLimited => "GITHUB_RATE_LIMIT_EXCEEDED",
            RoastError::NoContentFound { .. } => "COULD_NOT_FETCH_GITHUB_CONTENT",
            RoastError::MissingCredentials(_) => "MISSING_CREDENTIALS",
            RoastError::ProviderFatal { .. } => "PROVIDER_FATAL",
            RoastError::HttpClient(_) => "HTTP_CLIENT_ERROR",
        }
    }
}

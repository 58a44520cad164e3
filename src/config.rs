// src/config.rs
// =============================================================================
// Validated, immutable configuration built once from the CLI options.
//
// Everything downstream (GitHub client, crawler, Gemini client, retry loop)
// reads from a `&Settings`; nothing reads environment variables directly.
// =============================================================================

use std::time::Duration;

use crate::cli::GlobalOptions;
use crate::crawl::ContentBudget;
use crate::error::RoastError;
use crate::gemini::BackoffPolicy;

// Value shipped in the sample .env file; treat it as "no token"
const TOKEN_PLACEHOLDER: &str = "your_github_token_here";

#[derive(Debug, Clone)]
pub struct Settings {
    pub github_token: Option<String>,
    pub gemini_api_key: Option<String>,
    /// No trailing slash
    pub github_api_base: String,
    /// No trailing slash
    pub gemini_api_base: String,
    pub default_model: String,
    pub timeout: Duration,
    pub budget: ContentBudget,
    pub backoff: BackoffPolicy,
}

impl Settings {
    pub fn from_options(options: &GlobalOptions) -> Self {
        Settings {
            github_token: clean_secret(options.github_token.as_deref())
                .filter(|token| token != TOKEN_PLACEHOLDER),
            gemini_api_key: clean_secret(options.gemini_api_key.as_deref()),
            github_api_base: options.github_api_base.as_str().trim_end_matches('/').to_string(),
            gemini_api_base: options.gemini_api_base.as_str().trim_end_matches('/').to_string(),
            default_model: options.default_model.clone(),
            timeout: Duration::from_secs(options.timeout_secs),
            budget: ContentBudget {
                max_files: options.max_files,
                max_depth: options.max_depth,
                max_bytes_per_file: options.max_file_bytes,
                ..ContentBudget::default()
            },
            backoff: BackoffPolicy::default(),
        }
    }

    /// The Gemini key, or `MissingCredentials` when it was never configured
    pub fn require_gemini_api_key(&self) -> Result<&str, RoastError> {
        self.gemini_api_key
            .as_deref()
            .ok_or(RoastError::MissingCredentials("GEMINI_API_KEY"))
    }

    /// Settings pointed at local mock servers, with millisecond backoff
    #[cfg(test)]
    pub fn for_endpoints(github_api_base: &str, gemini_api_base: &str) -> Self {
        Settings {
            github_token: None,
            gemini_api_key: Some("test-key".to_string()),
            github_api_base: github_api_base.trim_end_matches('/').to_string(),
            gemini_api_base: gemini_api_base.trim_end_matches('/').to_string(),
            default_model: "gemini-1.5-flash".to_string(),
            timeout: Duration::from_secs(5),
            budget: ContentBudget::default(),
            backoff: BackoffPolicy {
                base: Duration::from_millis(1),
                max_jitter: Duration::ZERO,
                max_attempts: 3,
            },
        }
    }
}

// Trims whitespace and drops empty values
fn clean_secret(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// src/roast.rs
// =============================================================================
// The one operation front ends call:
//
//   repo URL -> RepositoryRef -> AggregatedContent -> InvocationLoop -> RoastResult
//
// Cheap checks (URL shape, Gemini key present) happen before any network
// traffic, so a misconfigured run fails immediately.
// =============================================================================

use tracing::info;

use crate::config::Settings;
use crate::crawl::AggregatedContent;
use crate::error::RoastError;
use crate::gemini::{GeminiClient, InvocationLoop, ModelCache, ModelSelector, RoastResult};
use crate::github::{parse_github_url, ContentFetcher, RepositoryRef};

// Roasts one repository
//
// Parameters:
//   settings: validated configuration (credentials, endpoints, budget)
//   cache: model cache shared by every request in the process
//   repo_url: whatever the user typed, e.g. "https://github.com/acme/widgets"
//
// Returns: Result<RoastResult, RoastError>
//   Success: a roast, possibly the degraded one if Gemini kept failing
//   Error: one of the classified failures in error.rs
pub async fn submit_roast_request(
    settings: &Settings,
    cache: &ModelCache,
    repo_url: &str,
) -> Result<RoastResult, RoastError> {
    let repo = parse_github_url(repo_url)?;
    let api_key = settings.require_gemini_api_key()?;
    info!(repo = %repo, "roast requested");

    let content = ContentFetcher::from_settings(settings)?.fetch(&repo).await?;

    let client = GeminiClient::new(settings.gemini_api_base.clone(), api_key, settings.timeout)?;
    let selector = ModelSelector::new(&client, cache, &settings.default_model);
    let result = InvocationLoop::new(&client, selector, settings.backoff)
        .run(&repo, &content)
        .await?;

    info!(repo = %repo, score = result.score, "roast complete");
    Ok(result)
}

/// Content phase only; no Gemini credentials involved
pub async fn fetch_content(
    settings: &Settings,
    repo_url: &str,
) -> Result<(RepositoryRef, AggregatedContent), RoastError> {
    let repo = parse_github_url(repo_url)?;
    let content = ContentFetcher::from_settings(settings)?.fetch(&repo).await?;
    Ok((repo, content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_invalid_url_fails_before_network() {
        let settings = Settings::for_endpoints("http://127.0.0.1:9", "http://127.0.0.1:9");
        let err = submit_roast_request(&settings, &ModelCache::new(), "https://gitlab.com/a/b")
            .await
            .unwrap_err();
        assert!(matches!(err, RoastError::InvalidReference(_)));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        let mut settings = Settings::for_endpoints("http://127.0.0.1:9", "http://127.0.0.1:9");
        settings.gemini_api_key = None;
        let err = submit_roast_request(&settings, &ModelCache::new(), "https://github.com/a/b")
            .await
            .unwrap_err();
        assert!(matches!(err, RoastError::MissingCredentials(_)));
    }

    #[tokio::test]
    async fn test_end_to_end() {
        let github = MockServer::start().await;
        let gemini = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/readme"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&github)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/widgets/contents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "type": "file", "name": "app.js", "path": "app.js",
                  "download_url": format!("{}/raw/app.js", github.uri()) },
            ])))
            .mount(&github)
            .await;
        Mock::given(method("GET"))
            .and(path("/raw/app.js"))
            .respond_with(ResponseTemplate::new(200).set_body_string("var x = eval(userInput); // trust me"))
            .mount(&github)
            .await;

        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "models": [{ "name": "models/gemini-1.5-flash", "supportedGenerationMethods": ["generateContent"] }]
            })))
            .mount(&gemini)
            .await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-1.5-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "{\"roast\": \"eval? really?\", \"score\": 91}" }] } }]
            })))
            .mount(&gemini)
            .await;

        let settings = Settings::for_endpoints(&github.uri(), &gemini.uri());
        let result = submit_roast_request(&settings, &ModelCache::new(), "https://github.com/acme/widgets.git")
            .await
            .unwrap();

        assert_eq!(result.roast, "eval? really?");
        assert_eq!(result.score, 91.0);
    }
}

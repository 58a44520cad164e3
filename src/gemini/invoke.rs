// src/gemini/invoke.rs
// =============================================================================
// The retry loop around generateContent.
//
// Each attempt (at most BackoffPolicy::max_attempts):
//   1. get a model from the selector (cached, or freshly discovered)
//   2. call generateContent
//   3. classify the answer:
//      - 200  -> decode and return, always ends the loop
//      - 404  -> the cached model is gone: invalidate and go again right away
//      - 429  -> sleep base * 2^attempt + jitter, then go again
//      - else -> ProviderFatal with the upstream status and body
//
// Running out of attempts is not an error: the caller gets
// RoastResult::degraded() instead.
// =============================================================================

use reqwest::StatusCode;
use tracing::{info, warn};

use super::backoff::BackoffPolicy;
use super::client::GeminiClient;
use super::models::ModelSelector;
use super::prompt::build_prompt;
use super::response::{decode_roast, DecodedRoast, RoastResult};
use super::types::{GenerateRequest, GenerateResponse};
use crate::crawl::AggregatedContent;
use crate::error::RoastError;
use crate::github::RepositoryRef;

/// How one attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStatus {
    Success,
    RateLimited,
    ModelInvalid,
    Fatal,
}

impl AttemptStatus {
    pub fn classify(status: StatusCode) -> Self {
        match status {
            StatusCode::OK => AttemptStatus::Success,
            StatusCode::TOO_MANY_REQUESTS => AttemptStatus::RateLimited,
            StatusCode::NOT_FOUND => AttemptStatus::ModelInvalid,
            _ => AttemptStatus::Fatal,
        }
    }
}

pub struct InvocationLoop<'a> {
    client: &'a GeminiClient,
    selector: ModelSelector<'a>,
    backoff: BackoffPolicy,
}

impl<'a> InvocationLoop<'a> {
    pub fn new(client: &'a GeminiClient, selector: ModelSelector<'a>, backoff: BackoffPolicy) -> Self {
        InvocationLoop {
            client,
            selector,
            backoff,
        }
    }

    // Runs the retry loop until it has a result or runs out of attempts
    //
    // Parameters:
    //   repo: the repository being roasted (named in the prompt)
    //   content: README and file excerpts gathered by the crawler
    //
    // Returns:
    //   Ok(roast) on a 200 (decoded JSON, or raw text with a fixed score)
    //   Ok(RoastResult::degraded()) when every attempt was used up
    //   Err(ProviderFatal) for any status we do not retry
    pub async fn run(
        &self,
        repo: &RepositoryRef,
        content: &AggregatedContent,
    ) -> Result<RoastResult, RoastError> {
        // The prompt is the same for every attempt, build it once
        let request = GenerateRequest::unfiltered(build_prompt(repo, content));

        for attempt in 0..self.backoff.max_attempts {
            // Cached model, or a fresh discovery after a 404 cleared the cache
            let model = self.selector.current().await;
            info!(attempt, model = %model, "invoking model");

            let (status, body) = match self.client.generate(&model, &request).await {
                Ok(answer) => answer,
                Err(e) => {
                    // timeouts and dropped connections are retried like a 429
                    // `e` carries no URL, so the API key cannot end up in the log
                    warn!(attempt, error = %e, "generateContent request failed");
                    self.pause(attempt).await;
                    continue;
                }
            };

            match AttemptStatus::classify(status) {
                AttemptStatus::Success => return Ok(success_result(&body)),
                AttemptStatus::ModelInvalid => {
                    // No sleep: the next attempt rediscovers straight away
                    warn!(attempt, model = %model, "model not found, rediscovering");
                    self.selector.invalidate();
                }
                AttemptStatus::RateLimited => {
                    warn!(attempt, model = %model, "rate limited");
                    self.pause(attempt).await;
                }
                AttemptStatus::Fatal => {
                    warn!(attempt, status = status.as_u16(), "provider returned a fatal status");
                    return Err(RoastError::ProviderFatal {
                        status: status.as_u16(),
                        body,
                    });
                }
            }
        }

        // Every attempt ended in 404, 429 or a transport error
        warn!(attempts = self.backoff.max_attempts, "retry budget exhausted, returning degraded roast");
        Ok(RoastResult::degraded())
    }

    // Sleeps before the next attempt; no sleep after the last one
    async fn pause(&self, attempt: u32) {
        if attempt + 1 >= self.backoff.max_attempts {
            return;
        }
        let delay = self.backoff.delay(attempt);
        info!(attempt, delay_ms = delay.as_millis() as u64, "backing off");
        tokio::time::sleep(delay).await;
    }
}

// Turns the body of a 200 answer into a RoastResult
//
// Returns the degraded result when the body holds no candidate text
// (e.g. the answer was blocked), otherwise whatever decode_roast makes of it
fn success_result(body: &str) -> RoastResult {
    let text = serde_json::from_str::<GenerateResponse>(body)
        .ok()
        .and_then(|response| response.text());

    let Some(text) = text else {
        warn!("model answered 200 without any text");
        return RoastResult::degraded();
    };

    match decode_roast(&text) {
        DecodedRoast::Structured(result) => result,
        fallback @ DecodedRoast::RawTextFallback(_) => {
            warn!("model did not answer with JSON, using raw text");
            fallback.into_result()
        }
    }
}

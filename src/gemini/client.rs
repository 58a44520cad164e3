// src/gemini/client.rs
// =============================================================================
// HTTP access to the Gemini API. The API key travels as the `key` query
// parameter on every call.
//
// This layer does not classify anything: `list_models` reduces every failure
// to None, and `generate` hands back the raw status and body so the retry
// loop in invoke.rs can decide what they mean.
//
// reqwest errors print the full request URL, key included. Every error that
// leaves this file (or gets logged here) goes through `redact` first.
// =============================================================================

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use super::types::{GenerateRequest, ModelDescriptor, ModelList};
use crate::error::RoastError;

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    api_base: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RoastError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(GeminiClient {
            http,
            api_base: api_base.into(),
            api_key: api_key.into(),
        })
    }

    // Lists every model visible to this key
    //
    // Returns:
    //   Some(models) when GET /models answered 2xx with valid JSON
    //   None on any transport error, rejected status or bad body
    pub async fn list_models(&self) -> Option<Vec<ModelDescriptor>> {
        let url = format!("{}/models", self.api_base);

        // Send the request; a refused connection or timeout ends discovery
        let response = match self.http.get(&url).query(&[("key", &self.api_key)]).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %redact(e), "model listing request failed");
                return None;
            }
        };

        // 400 (bad key), 403 (no access), 5xx ... all mean "use the default"
        if !response.status().is_success() {
            warn!(status = response.status().as_u16(), "model listing rejected");
            return None;
        }

        match response.json::<ModelList>().await {
            Ok(list) => Some(list.models),
            Err(e) => {
                warn!(error = %redact(e), "model listing is not valid JSON");
                None
            }
        }
    }

    // Makes one generateContent call
    //
    // Parameters:
    //   model: model id without the "models/" prefix (e.g. "gemini-1.5-flash")
    //   request: the prompt plus safety settings
    //
    // Returns:
    //   Ok((status, body)) for ANY HTTP answer, including 404 and 429
    //   Err only for transport failures; the error never contains the URL
    pub async fn generate(
        &self,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<(StatusCode, String), reqwest::Error> {
        let url = format!("{}/models/{}:generateContent", self.api_base, model);
        debug!(model, "generateContent");

        let response = self
            .http
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(request)
            .send()
            .await
            .map_err(redact)?;

        let status = response.status();
        let body = response.text().await.map_err(redact)?;
        Ok((status, body))
    }
}

// Drops the request URL (and with it the `key` query parameter) from an error
fn redact(error: reqwest::Error) -> reqwest::Error {
    error.without_url()
}

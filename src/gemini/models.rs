// src/gemini/models.rs
// =============================================================================
// Picks a Gemini model that actually exists for this API key.
//
// Model names get retired regularly, so instead of hard-coding one we ask
// the API which models support generateContent and take the first one that
// matches our preference list. If discovery fails for any reason we fall
// back to the configured default and let the retry loop sort it out.
// =============================================================================

use tracing::{debug, info, warn};

use super::cache::ModelCache;
use super::client::GeminiClient;
use super::types::ModelDescriptor;

const REQUIRED_METHOD: &str = "generateContent";

// Substrings, most preferred first
const MODEL_PRIORITY: &[&str] = &[
    "gemini-flash-latest",
    "gemini-1.5-flash",
    "gemini-2.0-flash",
    "gemini-pro-latest",
    "gemini-1.5-pro",
];

/// Applies the priority policy to a model listing
///
/// Only models supporting generateContent are candidates. The first priority
/// substring that matches any candidate wins; otherwise the first candidate;
/// otherwise `default_model`.
pub fn choose_model(models: &[ModelDescriptor], default_model: &str) -> String {
    let candidates: Vec<&ModelDescriptor> =
        models.iter().filter(|m| m.supports(REQUIRED_METHOD)).collect();

    for preferred in MODEL_PRIORITY {
        if let Some(model) = candidates.iter().find(|m| m.id().contains(preferred)) {
            return model.id().to_string();
        }
    }

    candidates
        .first()
        .map(|m| m.id().to_string())
        .unwrap_or_else(|| default_model.to_string())
}

pub struct ModelSelector<'a> {
    client: &'a GeminiClient,
    cache: &'a ModelCache,
    default_model: &'a str,
}

impl<'a> ModelSelector<'a> {
    pub fn new(client: &'a GeminiClient, cache: &'a ModelCache, default_model: &'a str) -> Self {
        ModelSelector {
            client,
            cache,
            default_model,
        }
    }

    // Returns the model to call next
    //
    // Returns: the cached model if there is one; otherwise the result of
    // discovery (or the default), which is stored in the cache first
    pub async fn current(&self) -> String {
        if let Some(model) = self.cache.get() {
            debug!(model = %model, "using cached model");
            return model;
        }

        let model = self.discover().await;
        self.cache.set(model.clone());
        model
    }

    /// Forget the cached model; the next `current` call rediscovers
    pub fn invalidate(&self) {
        self.cache.invalidate();
    }

    async fn discover(&self) -> String {
        let Some(models) = self.client.list_models().await else {
            warn!(default = self.default_model, "model discovery failed, using default");
            return self.default_model.to_string();
        };

        let model = choose_model(&models, self.default_model);
        info!(model = %model, available = models.len(), "selected model");
        model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn model(name: &str, methods: &[&str]) -> ModelDescriptor {
        ModelDescriptor {
            name: name.to_string(),
            supported_generation_methods: methods.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn test_priority_beats_listing_order() {
        let models = vec![
            model("models/gemini-1.5-pro", &["generateContent"]),
            model("models/gemini-1.5-flash-002", &["generateContent"]),
        ];
        assert_eq!(choose_model(&models, "fallback"), "gemini-1.5-flash-002");
    }

    #[test]
    fn test_capability_filter() {
        let models = vec![
            model("models/gemini-1.5-flash", &["embedContent"]),
            model("models/text-bison-001", &["generateContent"]),
        ];
        assert_eq!(choose_model(&models, "fallback"), "text-bison-001");
    }

    #[test]
    fn test_no_candidates_uses_default() {
        let models = vec![model("models/embedding-001", &["embedContent"])];
        assert_eq!(choose_model(&models, "fallback"), "fallback");
        assert_eq!(choose_model(&[], "fallback"), "fallback");
    }

    #[tokio::test]
    async fn test_discovery_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "models": [
                    { "name": "models/embedding-001", "supportedGenerationMethods": ["embedContent"] },
                    { "name": "models/gemini-1.5-pro", "supportedGenerationMethods": ["generateContent"] },
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new(server.uri(), "test-key", Duration::from_secs(5)).unwrap();
        let cache = ModelCache::new();
        let selector = ModelSelector::new(&client, &cache, "gemini-1.5-flash");

        assert_eq!(selector.current().await, "gemini-1.5-pro");
        assert_eq!(selector.current().await, "gemini-1.5-pro");
        assert_eq!(cache.get().as_deref(), Some("gemini-1.5-pro"));
    }

    #[tokio::test]
    async fn test_listing_error_falls_back_to_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = GeminiClient::new(server.uri(), "test-key", Duration::from_secs(5)).unwrap();
        let cache = ModelCache::new();
        let selector = ModelSelector::new(&client, &cache, "gemini-1.5-flash");

        assert_eq!(selector.current().await, "gemini-1.5-flash");
    }
}

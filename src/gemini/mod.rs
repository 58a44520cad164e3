// src/gemini/mod.rs
// =============================================================================
// This module talks to the Gemini generative API.
//
// Submodules:
// - types: request/response wire format
// - client: raw HTTP calls
// - cache: process-wide "which model works" memory
// - models: model discovery and priority policy
// - backoff: delay calculation for rate limits
// - prompt: the roast prompt
// - response: turning model text into a RoastResult
// - invoke: the retry loop tying it all together
// =============================================================================

mod backoff;
mod cache;
mod client;
mod invoke;
mod models;
mod prompt;
mod response;
mod types;

pub use backoff::BackoffPolicy;
pub use cache::{ModelCache, MODEL_CACHE};
pub use client::GeminiClient;
pub use invoke::InvocationLoop;
pub use models::ModelSelector;
pub use response::RoastResult;

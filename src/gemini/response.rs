// src/gemini/response.rs
// =============================================================================
// Turning model output into a RoastResult.
//
// Models are asked for bare JSON but regularly wrap it in ```json fences or
// add a sentence before it. Decoding is therefore two-step:
//   1. strip fences and try the whole text as JSON (strict)
//   2. try the outermost {...} span (lenient)
// If both fail, the text itself (minus any outer fence) becomes the roast.
// =============================================================================

use serde::{Deserialize, Serialize};

/// Score used when the model answered in free text instead of JSON
pub const RAW_TEXT_SCORE: f64 = 75.0;

const DEGRADED_ROAST: &str =
    "The destruction was too intense even for the AI. Your code is a black hole of despair.";
const DEGRADED_SCORE: f64 = 99.0;

/// The only value handed back to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoastResult {
    pub roast: String,
    /// 0 = fine, 100 = pure trash
    pub score: f64,
}

impl RoastResult {
    /// Returned when the provider kept us waiting past the retry budget
    pub fn degraded() -> Self {
        RoastResult {
            roast: DEGRADED_ROAST.to_string(),
            score: DEGRADED_SCORE,
        }
    }

    fn clamped(mut self) -> Self {
        self.score = if self.score.is_finite() {
            self.score.clamp(0.0, 100.0)
        } else {
            DEGRADED_SCORE
        };
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DecodedRoast {
    Structured(RoastResult),
    RawTextFallback(String),
}

impl DecodedRoast {
    pub fn into_result(self) -> RoastResult {
        match self {
            DecodedRoast::Structured(result) => result,
            DecodedRoast::RawTextFallback(text) => RoastResult {
                roast: text,
                score: RAW_TEXT_SCORE,
            },
        }
    }
}

pub fn decode_roast(text: &str) -> DecodedRoast {
    let stripped = strip_code_fences(text);

    if let Ok(result) = serde_json::from_str::<RoastResult>(stripped) {
        return DecodedRoast::Structured(result.clamped());
    }

    if let Some(span) = outer_object(stripped) {
        if let Ok(result) = serde_json::from_str::<RoastResult>(span) {
            return DecodedRoast::Structured(result.clamped());
        }
    }

    DecodedRoast::RawTextFallback(stripped.to_string())
}

/// Removes a surrounding ``` / ```json fence, if the whole text is one
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // drop the info string ("json", "JSON", ...) up to the first newline
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

// From the first '{' to the last '}'
fn outer_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

// src/gemini/backoff.rs
// =============================================================================
// Exponential backoff for rate-limited inference calls.
//
//   delay(attempt) = base * 2^attempt + jitter,  jitter ~ U[0, max_jitter)
//
// `delay_for` is a pure function of the attempt index and a jitter fraction
// in [0, 1), so it can be tested without sleeping. `delay` draws the fraction
// from the thread RNG.
// =============================================================================

use std::time::Duration;

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub base: Duration,
    pub max_jitter: Duration,
    /// Total invocation attempts, including the first one
    pub max_attempts: u32,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        BackoffPolicy {
            base: Duration::from_secs(1),
            max_jitter: Duration::from_secs(1),
            max_attempts: 3,
        }
    }
}

impl BackoffPolicy {
    /// Delay after a failed attempt `attempt` (0-based)
    pub fn delay_for(&self, attempt: u32, jitter_fraction: f64) -> Duration {
        let exponential = self.base.saturating_mul(2u32.saturating_pow(attempt));
        let jitter = self.max_jitter.mul_f64(jitter_fraction.clamp(0.0, 1.0));
        exponential.saturating_add(jitter)
    }

    pub fn delay(&self, attempt: u32) -> Duration {
        self.delay_for(attempt, rand::thread_rng().gen::<f64>())
    }
}

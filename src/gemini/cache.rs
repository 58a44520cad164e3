// src/gemini/cache.rs
// =============================================================================
// Process-wide memory of which Gemini model currently works.
//
// This is advisory. Two requests may both see an empty cache and both run
// discovery, or one may invalidate while another is mid-call with the old
// model; the loser simply gets a 404 and rediscovers. The mutex only makes
// each individual read or write atomic.
// =============================================================================

use parking_lot::{const_mutex, Mutex};

#[derive(Debug)]
pub struct ModelCache {
    active: Mutex<Option<String>>,
}

/// The cache shared by every request in this process
pub static MODEL_CACHE: ModelCache = ModelCache::new();

impl ModelCache {
    pub const fn new() -> Self {
        ModelCache {
            active: const_mutex(None),
        }
    }

    pub fn get(&self) -> Option<String> {
        self.active.lock().clone()
    }

    pub fn set(&self, model: impl Into<String>) {
        *self.active.lock() = Some(model.into());
    }

    pub fn invalidate(&self) {
        *self.active.lock() = None;
    }
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new()
    }
}

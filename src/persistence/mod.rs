//! Scalar key/value persistence
//!
//! Records are plain strings under fixed keys with no versioning. Anything
//! missing or unreadable counts as zero.

use std::collections::HashMap;

/// Best runner score ever reached
pub const BEST_RUNNER_SCORE_KEY: &str = "cautio-best-runner-score";
/// Running total of kilometres across all runs
pub const TOTAL_DISTANCE_KEY: &str = "cautio-total-distance";
/// Best quiz percentage
pub const BEST_QUIZ_SCORE_KEY: &str = "cautio-best-quiz-score";

/// String key/value storage (LocalStorage on the web)
pub trait ScoreStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str);
}

/// In-memory store for native runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_owned(), value.to_owned());
    }
}

/// Read a non-negative integer record, defaulting to 0
pub fn read_scalar(store: &impl ScoreStore, key: &str) -> u64 {
    let Some(raw) = store.get_item(key) else {
        return 0;
    };
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<u64>() {
        return value;
    }
    // Older saves may hold a float
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value.floor() as u64,
        _ => {
            log::warn!("Ignoring unreadable value {:?} for {}", raw, key);
            0
        }
    }
}

pub fn write_scalar(store: &mut impl ScoreStore, key: &str, value: u64) {
    store.set_item(key, &value.to_string());
}

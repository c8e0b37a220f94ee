//! Best scores across runs
//!
//! Persisted through a `ScoreStore` (LocalStorage on the web).

use serde::{Deserialize, Serialize};

use crate::persistence::{
    BEST_QUIZ_SCORE_KEY, BEST_RUNNER_SCORE_KEY, ScoreStore, TOTAL_DISTANCE_KEY, read_scalar,
    write_scalar,
};
use crate::sim::RunSummary;

/// Persisted bests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BestScores {
    /// Highest runner score
    pub best_score: u64,
    /// Kilometres run across all sessions
    pub total_distance_km: u64,
    /// Best quiz percentage
    pub best_quiz: u64,
}

impl BestScores {
    pub fn load(store: &impl ScoreStore) -> Self {
        let scores = Self {
            best_score: read_scalar(store, BEST_RUNNER_SCORE_KEY),
            total_distance_km: read_scalar(store, TOTAL_DISTANCE_KEY),
            best_quiz: read_scalar(store, BEST_QUIZ_SCORE_KEY),
        };
        log::info!(
            "Loaded best score {}, {} km total, best quiz {}%",
            scores.best_score,
            scores.total_distance_km,
            scores.best_quiz
        );
        scores
    }

    pub fn save(&self, store: &mut impl ScoreStore) {
        write_scalar(store, BEST_RUNNER_SCORE_KEY, self.best_score);
        write_scalar(store, TOTAL_DISTANCE_KEY, self.total_distance_km);
        write_scalar(store, BEST_QUIZ_SCORE_KEY, self.best_quiz);
        log::info!("Best scores saved");
    }

    /// Fold a finished run in; returns true on a new best score
    pub fn record_run(&mut self, summary: &RunSummary, distance_scale: f32) -> bool {
        let km = if distance_scale > 0.0 {
            (summary.distance / distance_scale).floor().max(0.0) as u64
        } else {
            0
        };
        self.total_distance_km = self.total_distance_km.saturating_add(km);
        if summary.score > self.best_score {
            self.best_score = summary.score;
            true
        } else {
            false
        }
    }

    /// Fold a quiz percentage in; returns true on a new best
    pub fn record_quiz(&mut self, percentage: u64) -> bool {
        if percentage > self.best_quiz {
            self.best_quiz = percentage;
            true
        } else {
            false
        }
    }
}

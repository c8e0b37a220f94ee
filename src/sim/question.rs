//! Question events on the split road
//!
//! A question is drawn from a shuffled per-run pool, assigned a random
//! correct branch, and resolved by the player's left/right decision.

use serde::{Deserialize, Serialize};

use super::random::RandomSource;
use super::road::Side;
use crate::questions::RunnerQuestion;
use crate::tuning::Tuning;

/// Shuffled copy of the question source for one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionPool {
    remaining: Vec<RunnerQuestion>,
}

impl QuestionPool {
    /// Shuffle a copy of `source`; the source is never modified
    pub fn shuffled(source: &[RunnerQuestion], rng: &mut impl RandomSource) -> Self {
        let mut remaining = source.to_vec();
        rng.shuffle(&mut remaining);
        Self { remaining }
    }

    /// Next question; each one is handed out at most once
    pub fn draw(&mut self) -> Option<RunnerQuestion> {
        self.remaining.pop()
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }
}

/// The question currently on the road
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveQuestion {
    /// Distinguishes successive questions within a run
    pub serial: u32,
    pub prompt: String,
    pub correct_text: String,
    pub incorrect_text: String,
    pub explanation: String,
    pub correct_side: Side,
}

impl ActiveQuestion {
    pub fn new(serial: u32, question: RunnerQuestion, rng: &mut impl RandomSource) -> Self {
        let correct_side = if rng.coin_flip() { Side::Left } else { Side::Right };
        Self {
            serial,
            prompt: question.question,
            correct_text: question.correct,
            incorrect_text: question.incorrect,
            explanation: question.explanation,
            correct_side,
        }
    }

    /// Text shown on a branch
    pub fn text_for(&self, side: Side) -> &str {
        if side == self.correct_side {
            &self.correct_text
        } else {
            &self.incorrect_text
        }
    }

    pub fn is_correct(&self, side: Side) -> bool {
        side == self.correct_side
    }
}

/// Score-affecting run values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub score: u64,
    pub speed_multiplier: f32,
    pub size: f32,
    pub lives: u8,
    pub correct_answers: u32,
}

impl RunStats {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            speed_multiplier: 1.0,
            size: 1.0,
            lives: tuning.starting_lives,
            correct_answers: 0,
        }
    }
}

/// Which branch of the outcome table ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Reward,
    /// Penalties always cost a life
    Penalty,
}

/// Apply the reward or the penalty for an answer
pub fn apply_verdict(stats: &mut RunStats, correct: bool, tuning: &Tuning) -> Verdict {
    if correct {
        stats.correct_answers += 1;
        stats.score += tuning.correct_bonus;
        stats.speed_multiplier = (stats.speed_multiplier + tuning.speed_step).min(tuning.speed_cap);
        stats.size = (stats.size + tuning.size_step).min(tuning.size_cap);
        Verdict::Reward
    } else {
        stats.score = stats.score.saturating_sub(tuning.wrong_penalty);
        stats.speed_multiplier =
            (stats.speed_multiplier - tuning.speed_step).max(tuning.speed_floor);
        stats.size = (stats.size - tuning.size_step).max(tuning.size_floor);
        stats.lives = stats.lives.saturating_sub(1);
        Verdict::Penalty
    }
}

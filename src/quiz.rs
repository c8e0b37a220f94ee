//! Multiple-choice quiz session
//!
//! Phase flow: `Question -> Feedback -> Question ... -> Complete`. An empty
//! question set puts the session in the terminal `Error` phase.

use serde::{Deserialize, Serialize};

use crate::highscores::BestScores;
use crate::persistence::ScoreStore;
use crate::questions::QuizQuestion;
use crate::sim::RandomSource;

/// Points for a correct answer
pub const QUIZ_POINTS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizPhase {
    /// No questions available; the host sends the user back to the menu
    Error,
    Question,
    Feedback { correct: bool },
    Complete,
}

/// One submitted answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_index: usize,
    pub selected: usize,
    pub correct: bool,
}

/// Final tally
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResults {
    pub percentage: u64,
    pub correct: usize,
    pub incorrect: usize,
    pub total: usize,
    pub message: &'static str,
}

/// Performance message for a percentage
pub fn performance_message(percentage: u64) -> &'static str {
    match percentage {
        90.. => "Excellent! You have outstanding cybersecurity knowledge. Keep up the great work!",
        80..=89 => {
            "Great job! You have solid cybersecurity awareness. Review the areas you missed to improve further."
        }
        70..=79 => {
            "Good work! You have decent cybersecurity knowledge, but there's room for improvement."
        }
        60..=69 => {
            "Fair performance. Consider studying cybersecurity best practices to better protect yourself online."
        }
        _ => {
            "Your cybersecurity knowledge needs improvement. Please review the explanations and consider additional training."
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    current: usize,
    selected: Option<usize>,
    score: u64,
    answers: Vec<AnswerRecord>,
    phase: QuizPhase,
}

impl QuizSession {
    /// Shuffle a copy of `source` and show the first question
    pub fn new(source: &[QuizQuestion], rng: &mut impl RandomSource) -> Self {
        let mut questions = source.to_vec();
        rng.shuffle(&mut questions);
        let phase = if questions.is_empty() {
            log::warn!("No quiz questions available");
            QuizPhase::Error
        } else {
            log::info!("Quiz started with {} questions", questions.len());
            QuizPhase::Question
        };
        Self {
            questions,
            current: 0,
            selected: None,
            score: 0,
            answers: Vec::new(),
            phase,
        }
    }

    /// Start over with a fresh shuffle
    pub fn restart(&mut self, source: &[QuizQuestion], rng: &mut impl RandomSource) {
        *self = Self::new(source, rng);
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// 1-based number of the question on screen
    pub fn question_number(&self) -> usize {
        (self.current + 1).min(self.total())
    }

    /// Progress bar fill in percent
    pub fn progress_percent(&self) -> f32 {
        match self.phase {
            QuizPhase::Complete => 100.0,
            QuizPhase::Error => 0.0,
            _ => self.current as f32 / self.total() as f32 * 100.0,
        }
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self.phase {
            QuizPhase::Question | QuizPhase::Feedback { .. } => self.questions.get(self.current),
            QuizPhase::Error | QuizPhase::Complete => None,
        }
    }

    /// The feedback screen is showing the final question
    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.total()
    }

    /// Mark an option; only while a question is shown
    pub fn select(&mut self, index: usize) -> bool {
        let Some(question) = self.current_question() else {
            return false;
        };
        if self.phase != QuizPhase::Question || index >= question.options.len() {
            return false;
        }
        self.selected = Some(index);
        true
    }

    /// Grade the selection; ignored without one
    pub fn submit(&mut self) -> Option<bool> {
        if self.phase != QuizPhase::Question {
            return None;
        }
        let selected = self.selected?;
        let question = self.questions.get(self.current)?;
        let correct = selected == question.correct;
        self.answers.push(AnswerRecord {
            question_index: self.current,
            selected,
            correct,
        });
        if correct {
            self.score += QUIZ_POINTS;
        }
        self.phase = QuizPhase::Feedback { correct };
        Some(correct)
    }

    /// Leave the feedback screen
    pub fn next(&mut self) {
        if !matches!(self.phase, QuizPhase::Feedback { .. }) {
            return;
        }
        self.current += 1;
        self.selected = None;
        if self.current >= self.questions.len() {
            self.phase = QuizPhase::Complete;
            log::info!("Quiz complete: {} points", self.score);
        } else {
            self.phase = QuizPhase::Question;
        }
    }

    /// Results once complete
    pub fn results(&self) -> Option<QuizResults> {
        if self.phase != QuizPhase::Complete {
            return None;
        }
        let total = self.questions.len();
        let correct = self.answers.iter().filter(|a| a.correct).count();
        let percentage = (correct as f64 / total as f64 * 100.0).round() as u64;
        Some(QuizResults {
            percentage,
            correct,
            incorrect: total - correct,
            total,
            message: performance_message(percentage),
        })
    }

    /// Persist the percentage if it beats the stored best
    pub fn record_best(&self, store: &mut impl ScoreStore) -> Option<bool> {
        let results = self.results()?;
        let mut best = BestScores::load(store);
        let improved = best.record_quiz(results.percentage);
        if improved {
            best.save(store);
            log::info!("New best quiz score: {}%", results.percentage);
        }
        Some(improved)
    }
}

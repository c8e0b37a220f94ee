//! Question bank for the runner and the quiz
//!
//! The bank ships inside the binary as JSON. It is read-only: every run and
//! every quiz takes its own shuffled copy.

use serde::{Deserialize, Serialize};

use crate::error::DataError;

const EMBEDDED_QUESTIONS: &str = include_str!("../assets/questions.json");

/// Binary-choice question shown on a split road
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerQuestion {
    #[serde(default)]
    pub id: u32,
    pub question: String,
    /// Text on the safe branch
    pub correct: String,
    /// Text on the dangerous branch
    pub incorrect: String,
    #[serde(default)]
    pub explanation: String,
}

/// Four-option quiz question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    #[serde(default)]
    pub id: u32,
    pub question: String,
    pub options: [String; 4],
    /// Index into `options`
    pub correct: usize,
    #[serde(default)]
    pub explanation: String,
}

/// All question records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionBank {
    #[serde(default)]
    pub runner: Vec<RunnerQuestion>,
    #[serde(default)]
    pub quiz: Vec<QuizQuestion>,
}

impl QuestionBank {
    /// Parse a bank from JSON
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        if json.trim().is_empty() {
            return Err(DataError::Missing);
        }
        let bank: QuestionBank = serde_json::from_str(json)?;
        if let Some(bad) = bank.quiz.iter().find(|q| q.correct >= q.options.len()) {
            return Err(DataError::AnswerOutOfRange {
                id: bad.id,
                index: bad.correct,
            });
        }
        Ok(bank)
    }

    /// The bank compiled into the binary
    pub fn embedded() -> Result<Self, DataError> {
        Self::from_json(EMBEDDED_QUESTIONS)
    }

    /// Load the embedded bank, degrading to an empty one on failure
    pub fn load_or_empty() -> Self {
        match Self::embedded() {
            Ok(bank) => {
                log::info!(
                    "Loaded {} runner and {} quiz questions",
                    bank.runner.len(),
                    bank.quiz.len()
                );
                bank
            }
            Err(err) => {
                log::warn!("Questions not loaded: {}", err);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_bank_parses() {
        let bank = QuestionBank::embedded().unwrap();
        assert_eq!(bank.runner.len(), 25);
        assert_eq!(bank.quiz.len(), 15);
        assert!(bank.runner.iter().all(|q| q.correct != q.incorrect));
    }

    #[test]
    fn test_empty_input_is_missing() {
        assert!(matches!(QuestionBank::from_json("  "), Err(DataError::Missing)));
    }

    #[test]
    fn test_malformed_input_is_json_error() {
        assert!(matches!(QuestionBank::from_json("{ runner: "), Err(DataError::Json(_))));
    }

    #[test]
    fn test_out_of_range_answer_rejected() {
        let json = r#"{ "quiz": [{ "id": 9, "question": "q", "options": ["a","b","c","d"], "correct": 4 }] }"#;
        assert!(matches!(
            QuestionBank::from_json(json),
            Err(DataError::AnswerOutOfRange { id: 9, index: 4 })
        ));
    }

    #[test]
    fn test_partial_bank_defaults_missing_sections() {
        let json = r#"{ "runner": [{ "question": "q", "correct": "yes", "incorrect": "no" }] }"#;
        let bank = QuestionBank::from_json(json).unwrap();
        assert_eq!(bank.runner.len(), 1);
        assert!(bank.quiz.is_empty());
    }
}

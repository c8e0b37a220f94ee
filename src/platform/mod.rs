//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (`Clock`)
//! - HUD output (`HudSink`)
//! - Storage (LocalStorage on web, see `persistence`)

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::sim::{GameState, Side};

/// Millisecond wall clock used for deferred events
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Clock that only moves when told to
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: f64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, ms: f64) {
        self.now_ms += ms;
    }

    pub fn set(&mut self, ms: f64) {
        self.now_ms = ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }
}

/// Question text shown while the road is split
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionPrompt {
    pub prompt: String,
    pub left: String,
    pub right: String,
}

/// Everything the HUD displays for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub score: u64,
    pub distance_km: u64,
    pub speed_multiplier: f32,
    pub size: f32,
    pub lives: u8,
    pub max_lives: u8,
    pub question: Option<QuestionPrompt>,
}

impl HudSnapshot {
    pub fn from_state(state: &GameState) -> Self {
        let question = state.question.as_ref().map(|q| QuestionPrompt {
            prompt: q.prompt.clone(),
            left: q.text_for(Side::Left).to_owned(),
            right: q.text_for(Side::Right).to_owned(),
        });
        Self {
            score: state.stats.score,
            distance_km: state.distance_km(),
            speed_multiplier: state.stats.speed_multiplier,
            size: state.stats.size,
            lives: state.stats.lives,
            max_lives: state.tuning.starting_lives,
            question,
        }
    }

    /// Multiplier as displayed, e.g. `1.1x`
    pub fn format_multiplier(value: f32) -> String {
        format!("{:.1}x", value)
    }
}

/// One-way HUD output; never read back
pub trait HudSink {
    fn push(&mut self, snapshot: &HudSnapshot);
}

/// Discards every snapshot
#[derive(Debug, Default)]
pub struct NullHud;

impl HudSink for NullHud {
    fn push(&mut self, _snapshot: &HudSnapshot) {}
}

/// Keeps every snapshot, for tests and headless runs
#[derive(Debug, Default)]
pub struct RecordingHud {
    pub snapshots: Vec<HudSnapshot>,
}

impl RecordingHud {
    pub fn last(&self) -> Option<&HudSnapshot> {
        self.snapshots.last()
    }
}

impl HudSink for RecordingHud {
    fn push(&mut self, snapshot: &HudSnapshot) {
        self.snapshots.push(snapshot.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::RunnerQuestion;
    use crate::sim::{ScriptedRandom, TickInput, tick};
    use crate::tuning::Tuning;

    #[test]
    fn test_manual_clock() {
        let mut clock = ManualClock::new();
        clock.advance(16.5);
        clock.advance(16.5);
        assert_eq!(clock.now_ms(), 33.0);
        clock.set(5.0);
        assert_eq!(clock.now_ms(), 5.0);
    }

    #[test]
    fn test_snapshot_reports_km_and_question() {
        let mut rng = ScriptedRandom::constant(0.99);
        let mut state = GameState::new(Tuning::default());
        let source = vec![RunnerQuestion {
            id: 1,
            question: "Open the attachment?".into(),
            correct: "Verify the sender first".into(),
            incorrect: "Open it".into(),
            explanation: String::new(),
        }];
        state.start(&source, &mut rng);
        for _ in 0..160 {
            tick(&mut state, &TickInput::default(), 0.0, &mut rng);
        }

        let snapshot = HudSnapshot::from_state(&state);
        assert_eq!(snapshot.distance_km, 8);
        assert_eq!(snapshot.lives, 5);
        assert_eq!(snapshot.max_lives, 5);
        let question = snapshot.question.expect("question on screen");
        assert_eq!(question.prompt, "Open the attachment?");
        // 0.99 puts the safe answer on the right
        assert_eq!(question.right, "Verify the sender first");
        assert_eq!(question.left, "Open it");
    }

    #[test]
    fn test_format_multiplier() {
        assert_eq!(HudSnapshot::format_multiplier(1.1), "1.1x");
        assert_eq!(HudSnapshot::format_multiplier(0.5), "0.5x");
    }
}

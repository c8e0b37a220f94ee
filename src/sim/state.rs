//! Game state and core simulation types
//!
//! Everything a run needs lives in `GameState`; the session owns exactly one.

use serde::{Deserialize, Serialize};

use super::obstacles::{Obstacle, Scenery, relayout_obstacles};
use super::particles::ParticleSystem;
use super::physics::Player;
use super::question::{ActiveQuestion, QuestionPool, RunStats};
use super::random::RandomSource;
use super::road::{RoadGeometry, RoadSplit, SplitPhase};
use super::schedule::Scheduler;
use crate::questions::RunnerQuestion;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first start
    #[default]
    Waiting,
    Playing,
    /// Run over; waiting for a restart
    Ended,
}

/// How a run finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Lose,
}

/// Final numbers of a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    pub distance: f32,
    pub correct_answers: u32,
    pub outcome: Outcome,
}

/// Things that happened during a tick, in order
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    QuestionStarted { serial: u32 },
    QuestionAnswered { serial: u32, correct: bool },
    MergeStarted { serial: u32 },
    ObstacleHit { id: u32 },
    LifeLost { remaining: u8 },
    Ended(RunSummary),
}

/// Complete runner state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub outcome: Option<Outcome>,
    pub stats: RunStats,
    /// Base forward speed
    pub speed: f32,
    pub distance: f32,
    pub last_question_distance: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub road: RoadGeometry,
    pub split: RoadSplit,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub scenery: Vec<Scenery>,
    pub particles: ParticleSystem,
    pub pool: QuestionPool,
    pub question: Option<ActiveQuestion>,
    pub scheduler: Scheduler,
    question_serial: u32,
    next_id: u32,
}

impl GameState {
    /// Idle state on the default canvas
    pub fn new(tuning: Tuning) -> Self {
        let road = RoadGeometry::default();
        Self {
            stats: RunStats::new(&tuning),
            speed: tuning.base_speed,
            tuning,
            phase: GamePhase::Waiting,
            outcome: None,
            distance: 0.0,
            last_question_distance: 0.0,
            time_ticks: 0,
            player: Player::new(&road, 1.0),
            road,
            split: RoadSplit::default(),
            obstacles: Vec::new(),
            scenery: Vec::new(),
            particles: ParticleSystem::new(),
            pool: QuestionPool::default(),
            question: None,
            scheduler: Scheduler::new(),
            question_serial: 0,
            next_id: 1,
        }
    }

    /// Reset every run value and begin playing
    ///
    /// Road geometry and tuning carry over; everything else returns to its
    /// initial value, including pending deferred events.
    pub fn start(&mut self, source: &[RunnerQuestion], rng: &mut impl RandomSource) {
        self.scheduler.cancel_all();
        self.phase = GamePhase::Playing;
        self.outcome = None;
        self.stats = RunStats::new(&self.tuning);
        self.speed = self.tuning.base_speed;
        self.distance = 0.0;
        self.last_question_distance = 0.0;
        self.time_ticks = 0;
        self.split.reset();
        self.player = Player::new(&self.road, self.stats.size);
        self.obstacles.clear();
        self.scenery.clear();
        self.particles.clear();
        self.pool = QuestionPool::shuffled(source, rng);
        self.question = None;
        self.question_serial = 0;
        self.next_id = 1;
        log::info!("Run started with {} questions", self.pool.len());
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Serial for the next question
    pub fn next_question_serial(&mut self) -> u32 {
        self.question_serial += 1;
        self.question_serial
    }

    /// Forward speed including the multiplier
    #[inline]
    pub fn effective_speed(&self) -> f32 {
        self.speed * self.stats.speed_multiplier
    }

    /// Distance as shown to the player
    pub fn distance_km(&self) -> u64 {
        (self.distance / self.tuning.distance_scale).floor() as u64
    }

    /// The road is fully split and a question is waiting for an answer
    pub fn awaiting_decision(&self) -> bool {
        self.split.phase == SplitPhase::Split && self.question.is_some()
    }

    pub fn summary(&self, outcome: Outcome) -> RunSummary {
        RunSummary {
            score: self.stats.score,
            distance: self.distance,
            correct_answers: self.stats.correct_answers,
            outcome,
        }
    }

    /// Finish the run; repeated calls do nothing
    pub fn end_game(&mut self, outcome: Outcome, events: &mut Vec<GameEvent>) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.phase = GamePhase::Ended;
        self.outcome = Some(outcome);
        self.scheduler.cancel_all();
        let summary = self.summary(outcome);
        log::info!(
            "Run ended ({:?}): score {}, {} km, {} correct",
            outcome,
            summary.score,
            self.distance_km(),
            summary.correct_answers
        );
        events.push(GameEvent::Ended(summary));
    }

    /// Record a life already deducted from `stats`, ending the run at zero
    pub fn after_life_lost(&mut self, events: &mut Vec<GameEvent>) {
        events.push(GameEvent::LifeLost {
            remaining: self.stats.lives,
        });
        if self.stats.lives == 0 {
            self.end_game(Outcome::Lose, events);
        }
    }

    /// Remove one life, ending the run at zero
    pub fn lose_life(&mut self, events: &mut Vec<GameEvent>) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.stats.lives = self.stats.lives.saturating_sub(1);
        self.after_life_lost(events);
    }

    /// Recompute road geometry for a new canvas size
    pub fn resize(&mut self, width: f32, height: f32) {
        let from = self.road;
        let to = RoadGeometry::from_canvas(width, height);
        self.player.relayout(&from, &to, self.stats.size);
        relayout_obstacles(&mut self.obstacles, &from, &to);
        self.road = to;
        log::debug!("Road resized to {}x{}", width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::ScriptedRandom;
    use crate::sim::road::Lane;

    fn sample_questions() -> Vec<RunnerQuestion> {
        (1..=3)
            .map(|id| RunnerQuestion {
                id,
                question: format!("q{}", id),
                correct: "yes".into(),
                incorrect: "no".into(),
                explanation: String::new(),
            })
            .collect()
    }

    #[test]
    fn test_new_state_waits() {
        let state = GameState::new(Tuning::default());
        assert_eq!(state.phase, GamePhase::Waiting);
        assert!(state.pool.is_empty());
    }

    #[test]
    fn test_end_game_fires_once() {
        let mut state = GameState::new(Tuning::default());
        state.start(&sample_questions(), &mut ScriptedRandom::constant(0.3));
        let mut events = Vec::new();
        state.end_game(Outcome::Win, &mut events);
        state.end_game(Outcome::Lose, &mut events);
        assert_eq!(events.len(), 1);
        assert_eq!(state.outcome, Some(Outcome::Win));
    }

    #[test]
    fn test_last_life_ends_run() {
        let mut state = GameState::new(Tuning::default());
        state.start(&sample_questions(), &mut ScriptedRandom::constant(0.3));
        state.stats.lives = 1;
        let mut events = Vec::new();
        state.lose_life(&mut events);
        state.lose_life(&mut events);

        assert_eq!(state.stats.lives, 0);
        assert_eq!(state.phase, GamePhase::Ended);
        let ends = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Ended(s) if s.outcome == Outcome::Lose))
            .count();
        assert_eq!(ends, 1);
    }

    #[test]
    fn test_resize_preserves_lane() {
        let mut state = GameState::new(Tuning::default());
        state.start(&sample_questions(), &mut ScriptedRandom::constant(0.3));
        state.player.lane = Lane::Right;
        state.player.x = state.road.lane_x(Lane::Right);

        state.resize(1200.0, 500.0);
        assert_eq!(state.player.lane, Lane::Right);
        assert!((state.player.x - state.road.lane_x(Lane::Right)).abs() < 1e-3);
        assert_eq!(state.road.y, 300.0);
    }
}

//! One runner session
//!
//! Owns the game state together with its randomness, clock, HUD and score
//! storage. The host drives it with one `frame` call per display frame.

use crate::highscores::BestScores;
use crate::persistence::ScoreStore;
use crate::platform::{Clock, HudSink, HudSnapshot};
use crate::questions::RunnerQuestion;
use crate::sim::{GameEvent, GameState, RandomSource, RunSummary, TickInput, tick};
use crate::tuning::Tuning;

pub struct Session<R, C, H, S> {
    state: GameState,
    questions: Vec<RunnerQuestion>,
    rng: R,
    clock: C,
    hud: H,
    store: S,
    best: BestScores,
    last_summary: Option<RunSummary>,
    /// Set once the current run's results are stored
    persisted: bool,
}

impl<R, C, H, S> Session<R, C, H, S>
where
    R: RandomSource,
    C: Clock,
    H: HudSink,
    S: ScoreStore,
{
    pub fn new(
        tuning: Tuning,
        questions: Vec<RunnerQuestion>,
        rng: R,
        clock: C,
        hud: H,
        store: S,
    ) -> Self {
        let best = BestScores::load(&store);
        Self {
            state: GameState::new(tuning),
            questions,
            rng,
            clock,
            hud,
            store,
            best,
            last_summary: None,
            persisted: false,
        }
    }

    /// Start or restart a run
    pub fn start(&mut self) {
        self.state.start(&self.questions, &mut self.rng);
        self.last_summary = None;
        self.persisted = false;
        self.hud.push(&HudSnapshot::from_state(&self.state));
    }

    /// Advance one frame, refresh the HUD and store results when the run ends
    pub fn frame(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let now = self.clock.now_ms();
        let events = tick(&mut self.state, input, now, &mut self.rng);

        for event in &events {
            if let GameEvent::Ended(summary) = event {
                self.finish(summary.clone());
            }
        }
        self.hud.push(&HudSnapshot::from_state(&self.state));
        events
    }

    fn finish(&mut self, summary: RunSummary) {
        if self.persisted {
            return;
        }
        self.persisted = true;
        // Fold into what is stored now, not the startup copy
        let mut best = BestScores::load(&self.store);
        if best.record_run(&summary, self.state.tuning.distance_scale) {
            log::info!("New best score: {}", summary.score);
        }
        best.save(&mut self.store);
        self.best = best;
        self.last_summary = Some(summary);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(width, height);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn best(&self) -> &BestScores {
        &self.best
    }

    /// Results of the last finished run
    pub fn last_summary(&self) -> Option<&RunSummary> {
        self.last_summary.as_ref()
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn hud(&self) -> &H {
        &self.hud
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{
        BEST_QUIZ_SCORE_KEY, BEST_RUNNER_SCORE_KEY, MemoryStore, TOTAL_DISTANCE_KEY, read_scalar,
    };
    use crate::platform::{ManualClock, RecordingHud};
    use crate::sim::{GamePhase, Outcome, ScriptedRandom, SplitPhase};

    type TestSession = Session<ScriptedRandom, ManualClock, RecordingHud, MemoryStore>;

    fn questions(n: u32) -> Vec<RunnerQuestion> {
        (1..=n)
            .map(|id| RunnerQuestion {
                id,
                question: format!("Question {}?", id),
                correct: "Safe".into(),
                incorrect: "Risky".into(),
                explanation: String::new(),
            })
            .collect()
    }

    fn session(tuning: Tuning, n: u32, store: MemoryStore) -> TestSession {
        Session::new(
            tuning,
            questions(n),
            ScriptedRandom::constant(0.99),
            ManualClock::new(),
            RecordingHud::default(),
            store,
        )
    }

    #[test]
    fn test_frames_push_hud() {
        let mut s = session(Tuning::default(), 0, MemoryStore::new());
        s.start();
        for _ in 0..40 {
            s.frame(&TickInput::default());
        }
        assert_eq!(s.hud().snapshots.len(), 41);
        let last = s.hud().last().expect("snapshot");
        assert_eq!(last.score, 200);
        assert_eq!(last.distance_km, 2);
    }

    #[test]
    fn test_run_end_persists_once() {
        let tuning = Tuning {
            max_distance: 1000.0,
            ..Tuning::default()
        };
        let mut store = MemoryStore::new();
        store.set_item(TOTAL_DISTANCE_KEY, "7");
        let mut s = session(tuning, 0, store);
        s.start();

        let mut ends = 0;
        for _ in 0..300 {
            ends += s
                .frame(&TickInput::default())
                .iter()
                .filter(|e| matches!(e, GameEvent::Ended(_)))
                .count();
        }
        assert_eq!(ends, 1);
        assert_eq!(s.state().phase, GamePhase::Ended);
        let summary = s.last_summary().expect("finished");
        assert_eq!(summary.outcome, Outcome::Win);
        assert_eq!(read_scalar(s.store(), BEST_RUNNER_SCORE_KEY), 1000);
        assert_eq!(read_scalar(s.store(), TOTAL_DISTANCE_KEY), 17);
    }

    #[test]
    fn test_run_end_keeps_values_written_after_startup() {
        let tuning = Tuning {
            max_distance: 1000.0,
            ..Tuning::default()
        };
        let mut s = session(tuning, 0, MemoryStore::new());
        s.store_mut().set_item(BEST_QUIZ_SCORE_KEY, "90");
        s.store_mut().set_item(TOTAL_DISTANCE_KEY, "50");
        s.start();
        for _ in 0..300 {
            s.frame(&TickInput::default());
        }
        assert_eq!(s.state().phase, GamePhase::Ended);
        assert_eq!(read_scalar(s.store(), BEST_QUIZ_SCORE_KEY), 90);
        assert_eq!(read_scalar(s.store(), TOTAL_DISTANCE_KEY), 60);
        assert_eq!(s.best().best_quiz, 90);
        assert_eq!(s.best().total_distance_km, 60);
    }

    #[test]
    fn test_lower_score_keeps_best() {
        let mut store = MemoryStore::new();
        store.set_item(BEST_RUNNER_SCORE_KEY, "5000");
        let tuning = Tuning {
            max_distance: 100.0,
            ..Tuning::default()
        };
        let mut s = session(tuning, 0, store);
        s.start();
        for _ in 0..30 {
            s.frame(&TickInput::default());
        }
        assert_eq!(s.best().best_score, 5000);
        assert_eq!(read_scalar(s.store(), BEST_RUNNER_SCORE_KEY), 5000);
    }

    #[test]
    fn test_merge_follows_clock() {
        let mut s = session(Tuning::default(), 1, MemoryStore::new());
        s.start();
        while !s.state().awaiting_decision() {
            s.clock_mut().advance(16.0);
            s.frame(&TickInput::default());
        }
        s.frame(&TickInput {
            right: true,
            ..Default::default()
        });
        assert_eq!(s.state().split.phase, SplitPhase::Split);
        assert!(s.hud().last().is_some_and(|h| h.question.is_none()));

        s.clock_mut().advance(1999.0);
        s.frame(&TickInput::default());
        assert_eq!(s.state().split.phase, SplitPhase::Split);

        s.clock_mut().advance(1.0);
        let events = s.frame(&TickInput::default());
        assert!(events.contains(&GameEvent::MergeStarted { serial: 1 }));
    }

    #[test]
    fn test_restart_clears_summary() {
        let tuning = Tuning {
            max_distance: 50.0,
            ..Tuning::default()
        };
        let mut s = session(tuning, 0, MemoryStore::new());
        s.start();
        for _ in 0..20 {
            s.frame(&TickInput::default());
        }
        assert!(s.last_summary().is_some());

        s.start();
        assert!(s.last_summary().is_none());
        assert_eq!(s.state().phase, GamePhase::Playing);
        assert_eq!(s.state().distance, 0.0);
    }
}

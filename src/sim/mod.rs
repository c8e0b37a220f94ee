//! Deterministic runner simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per display frame
//! - Randomness only through `RandomSource`
//! - Time only through the `now_ms` passed to `tick`
//! - No rendering or platform dependencies

pub mod obstacles;
pub mod particles;
pub mod physics;
pub mod question;
pub mod random;
pub mod road;
pub mod schedule;
pub mod state;
pub mod tick;

pub use obstacles::{Obstacle, ObstacleKind, Scenery};
pub use particles::{BurstKind, Particle, ParticleSystem, ParticleTint};
pub use physics::{Player, Rect};
pub use question::{ActiveQuestion, QuestionPool, RunStats, Verdict, apply_verdict};
pub use random::{RandomSource, ScriptedRandom, seeded};
pub use road::{Lane, RoadGeometry, RoadSplit, Side, SplitPhase};
pub use schedule::{Deferred, Scheduler};
pub use state::{GameEvent, GamePhase, GameState, Outcome, RunSummary};
pub use tick::{TickInput, tick};

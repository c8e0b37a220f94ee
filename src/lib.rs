//! Cautio - cybersecurity awareness quiz and road-split runner
//!
//! Core modules:
//! - `sim`: Frame-driven runner simulation (physics, obstacles, questions)
//! - `session`: Owns one run and bridges it to the HUD and score storage
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Clock and HUD contracts, browser implementations
//! - `persistence`: Scalar key/value score storage
//! - `questions`: Embedded question bank
//! - `quiz`: Multiple-choice quiz flow
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod questions;
pub mod quiz;
pub mod renderer;
pub mod session;
pub mod sim;
pub mod tuning;

pub use error::{DataError, RenderError, TuningError};
pub use highscores::BestScores;
pub use questions::{QuestionBank, QuizQuestion, RunnerQuestion};
pub use session::Session;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Default canvas size before the host reports a real one
    pub const DEFAULT_CANVAS_WIDTH: f32 = 800.0;
    pub const DEFAULT_CANVAS_HEIGHT: f32 = 600.0;
    /// Largest canvas the web host will allocate
    pub const MAX_CANVAS_WIDTH: f32 = 1200.0;
    pub const MAX_CANVAS_HEIGHT: f32 = 600.0;

    /// Road layout, relative to the canvas
    pub const ROAD_BOTTOM_MARGIN: f32 = 200.0;
    pub const ROAD_HEIGHT: f32 = 160.0;
    pub const ROAD_LEFT_FRACTION: f32 = 0.2;
    pub const ROAD_WIDTH_FRACTION: f32 = 0.6;
    /// Number of obstacle lanes across the road
    pub const LANE_COUNT: usize = 3;

    /// Player bounding box at size 1.0
    pub const PLAYER_WIDTH: f32 = 30.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 40.0;
    pub const OBSTACLE_HEIGHT: f32 = 50.0;
    /// Obstacles appear this far past the forward edge
    pub const OBSTACLE_SPAWN_MARGIN: f32 = 50.0;

    /// Scenery (roadside trees)
    pub const SCENERY_WIDTH: f32 = 40.0;
    pub const SCENERY_MIN_HEIGHT: f32 = 60.0;
    pub const SCENERY_HEIGHT_JITTER: f32 = 40.0;
    pub const SCENERY_INSET: f32 = 20.0;
    /// Scenery is dropped this far below the canvas
    pub const SCENERY_CULL_MARGIN: f32 = 100.0;

    /// Impact burst on obstacle hit
    pub const IMPACT_PARTICLES: usize = 10;
    pub const IMPACT_LIFE: u32 = 30;
    pub const IMPACT_SPREAD: f32 = 10.0;
    pub const IMPACT_LIFT: f32 = 5.0;
    /// Bonus burst on answered question
    pub const BONUS_PARTICLES: usize = 15;
    pub const BONUS_LIFE: u32 = 40;
    pub const BONUS_SPREAD: f32 = 8.0;
    pub const BONUS_LIFT: f32 = 3.0;
    /// Downward drift added to particle velocity each frame
    pub const PARTICLE_GRAVITY: f32 = 0.2;
    /// Maximum live particles
    pub const MAX_PARTICLES: usize = 256;
}

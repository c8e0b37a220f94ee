//! Error types for data loading and GPU setup
//!
//! The simulation itself never fails. Errors come from parsing external data,
//! where callers degrade to safe defaults after logging, and from GPU setup.

use thiserror::Error;

/// Question data could not be loaded
#[derive(Error, Debug)]
pub enum DataError {
    #[error("question data is missing")]
    Missing,
    #[error("question data is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("quiz question {id} has answer index {index} out of range")]
    AnswerOutOfRange { id: u32, index: usize },
}

/// Tuning overrides could not be applied
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("tuning value `{field}` is out of range: {value}")]
    OutOfRange { field: &'static str, value: f32 },
}

/// The GPU surface could not be set up
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported texture formats")]
    NoSurfaceFormat,
}

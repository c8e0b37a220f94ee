//! WebGPU rendering module
//!
//! `scene` turns game state into a triangle list in canvas pixels;
//! `pipeline` uploads and draws it.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
